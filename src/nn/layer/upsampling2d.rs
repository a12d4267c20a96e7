/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : UpSampling2d (2D 上采样) 层：无可学习参数
 *
 * - 输入：[batch, C, H, W]
 * - 输出：[batch, C, H*sH, W*sW]
 *
 * 两种插值均采用半像素中心对齐：src = (dst + 0.5) / scale - 0.5
 */

use super::{IntoPair, LayerOptions, check_rank};
use crate::nn::{LayerError, Module};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const SUPPORTED_OPTIONS: &[&str] = &["name"];

/// 插值方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    Bilinear,
}

impl FromStr for Interpolation {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" => Ok(Self::Bilinear),
            _ => Err(LayerError::UnknownInterpolation(s.to_string())),
        }
    }
}

/// UpSampling2d (2D 上采样) 层
#[derive(Debug)]
pub struct UpSampling2d {
    size: (usize, usize),
    interpolation: Interpolation,
    name: String,
}

impl UpSampling2d {
    pub fn new(
        size: impl IntoPair,
        interpolation: Interpolation,
        options: &LayerOptions,
    ) -> Result<Self, LayerError> {
        options.ensure_supported("UpSampling2d", SUPPORTED_OPTIONS)?;
        let size = size.into_pair();
        if size.0 == 0 || size.1 == 0 {
            return Err(LayerError::InvalidOperation(format!(
                "UpSampling2d 的放大倍数 {size:?} 必须为正"
            )));
        }
        Ok(Self {
            size,
            interpolation,
            name: options.name.clone().unwrap_or_else(|| "up_sampling2d".to_string()),
        })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }
}

/// 沿单个维度的采样位置：(下界, 上界, 插值权重)
fn sample_points(
    out_len: usize,
    in_len: usize,
    scale: usize,
    mode: Interpolation,
) -> Vec<(usize, usize, f32)> {
    (0..out_len)
        .map(|dst| {
            let src = (dst as f32 + 0.5) / scale as f32;
            match mode {
                Interpolation::Nearest => {
                    let idx = (src.floor() as usize).min(in_len - 1);
                    (idx, idx, 0.0)
                }
                Interpolation::Bilinear => {
                    let src = src - 0.5;
                    let floor = src.floor();
                    let lower = (floor.max(0.0) as usize).min(in_len - 1);
                    let upper = (src.ceil().max(0.0) as usize).min(in_len - 1);
                    (lower, upper, src - floor)
                }
            }
        })
        .collect()
}

impl Module for UpSampling2d {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, LayerError> {
        check_rank(x, 4, &self.name, "[batch, C, H, W]")?;
        let (batch_size, c, in_h, in_w) = (x.shape()[0], x.shape()[1], x.shape()[2], x.shape()[3]);
        let (s_h, s_w) = self.size;
        let (out_h, out_w) = (in_h * s_h, in_w * s_w);
        let mut output = Tensor::zeros(&[batch_size, c, out_h, out_w]);
        if output.size() == 0 {
            return Ok(output);
        }

        let rows = sample_points(out_h, in_h, s_h, self.interpolation);
        let cols = sample_points(out_w, in_w, s_w, self.interpolation);
        for b in 0..batch_size {
            for ci in 0..c {
                for (oh, &(top, bottom, dy)) in rows.iter().enumerate() {
                    for (ow, &(left, right, dx)) in cols.iter().enumerate() {
                        let upper = x[[b, ci, top, left]]
                            + (x[[b, ci, top, right]] - x[[b, ci, top, left]]) * dx;
                        let lower = x[[b, ci, bottom, left]]
                            + (x[[b, ci, bottom, right]] - x[[b, ci, bottom, left]]) * dx;
                        output[[b, ci, oh, ow]] = upper + (lower - upper) * dy;
                    }
                }
            }
        }
        Ok(output)
    }
}
