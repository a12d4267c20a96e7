/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 填充方式与输出尺寸计算
 *
 * 输出尺寸计算（卷积/池化）：
 * - same : out = ceil(in / stride)，总填充量 max((out-1)*stride + k - in, 0)，
 *          其中 floor(总量/2) 填在上/左侧，余下的填在下/右侧
 * - valid: out = (in - k) / stride + 1（in < k 时无合法输出）
 *
 * 输出尺寸计算（转置卷积）：
 * - same : out = in * stride
 * - valid: out = (in - 1) * stride + k
 */

use crate::nn::LayerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 填充方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    /// 补零使（步长为1时）输出空间尺寸与输入一致
    Same,
    /// 不填充
    Valid,
}

impl Padding {
    /// 卷积/池化沿单个空间维的输出长度，`None` 表示该配置下没有合法输出
    pub fn output_len(self, input: usize, kernel: usize, stride: usize) -> Option<usize> {
        if input == 0 || kernel == 0 || stride == 0 {
            return None;
        }
        match self {
            Self::Same => Some(input.div_ceil(stride)),
            Self::Valid => (input >= kernel).then(|| (input - kernel) / stride + 1),
        }
    }

    /// 卷积/池化沿单个空间维在前侧（上/左）的填充量
    pub fn pad_before(self, input: usize, kernel: usize, stride: usize) -> usize {
        match self {
            Self::Same => {
                let out = input.div_ceil(stride).max(1);
                ((out - 1) * stride + kernel).saturating_sub(input) / 2
            }
            Self::Valid => 0,
        }
    }

    /// 转置卷积沿单个空间维的输出长度
    pub fn transposed_output_len(
        self,
        input: usize,
        kernel: usize,
        stride: usize,
    ) -> Option<usize> {
        if input == 0 || kernel == 0 || stride == 0 {
            return None;
        }
        match self {
            Self::Same => Some(input * stride),
            Self::Valid => Some((input - 1) * stride + kernel),
        }
    }

    /// 转置卷积沿单个空间维需从前侧裁掉的长度
    pub fn transposed_crop_before(self, kernel: usize, stride: usize) -> usize {
        match self {
            Self::Same => kernel.saturating_sub(stride) / 2,
            Self::Valid => 0,
        }
    }
}

impl FromStr for Padding {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "same" => Ok(Self::Same),
            "valid" => Ok(Self::Valid),
            _ => Err(LayerError::UnknownPadding(s.to_string())),
        }
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Same => write!(f, "same"),
            Self::Valid => write!(f, "valid"),
        }
    }
}
