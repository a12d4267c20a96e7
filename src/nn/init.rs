/*
 * @Author       : 老董
 * @Date         : 2026-01-08
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12
 * @Description  : 参数初始化策略
 */

use crate::nn::LayerError;
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// 参数初始化策略
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// 全零
    Zeros,
    /// 全一
    Ones,
    /// 均匀分布 [low, high]
    Uniform { low: f32, high: f32 },
    /// 正态分布
    Normal { mean: f32, std: f32 },
    /// Kaiming/He 初始化（适用于 `ReLU`）
    Kaiming,
    /// Xavier/Glorot 均匀初始化（适用于 Sigmoid/Tanh），卷积核的默认初始化
    Xavier,
}

impl Init {
    /// 校验分布参数：数值须有限，`std > 0`，`low <= high`
    ///
    /// 带权重的层在构造时经 `LayerOptions` 调用
    pub fn validate(&self) -> Result<(), LayerError> {
        let invalid = |msg: String| Err(LayerError::InvalidOperation(msg));
        match *self {
            Self::Constant(v) if !v.is_finite() => {
                invalid(format!("常数初始化的值须为有限数，实际为 {v}"))
            }
            Self::Uniform { low, high } if !(high - low).is_finite() => {
                invalid(format!("均匀分布的边界及区间长度须为有限数，实际为 [{low}, {high}]"))
            }
            Self::Uniform { low, high } if low > high => {
                invalid(format!("均匀分布须满足 low <= high，实际为 [{low}, {high}]"))
            }
            Self::Normal { mean, std } if !(mean.is_finite() && std.is_finite()) => {
                invalid(format!("正态分布的参数须为有限数，实际为 mean={mean}, std={std}"))
            }
            Self::Normal { std, .. } if std <= 0.0 => {
                invalid(format!("正态分布的 std 须大于 0，实际为 {std}"))
            }
            _ => Ok(()),
        }
    }

    /// 生成初始化后的 Tensor（使用指定的 RNG），参数须先经 [`Init::validate`] 校验
    pub fn generate(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        match self {
            Self::Constant(v) => Tensor::full(*v, shape),
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Uniform { low, high } => Tensor::new_random(*low, *high, shape, rng),
            Self::Normal { mean, std } => Tensor::new_normal(*mean, *std, shape, rng),
            Self::Kaiming => {
                let (fan_in, _) = fans(shape);
                let std = (2.0 / fan_in as f32).sqrt();
                Tensor::new_normal(0.0, std, shape, rng)
            }
            Self::Xavier => {
                let (fan_in, fan_out) = fans(shape);
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Tensor::new_random(-limit, limit, shape, rng)
            }
        }
    }
}

/// 根据参数形状推算 (fan_in, fan_out)
/// - 2D 全连接核 `[in, out]`
/// - 4D 卷积核 `[C_out, C_in, kH, kW]`（感受野 kH*kW 计入两侧）
/// - 其余形状按首维/次维粗略估计
fn fans(shape: &[usize]) -> (usize, usize) {
    let (fan_in, fan_out) = match shape {
        [] => (1, 1),
        [n] => (*n, *n),
        [fan_in, fan_out] => (*fan_in, *fan_out),
        [out, inp, rest @ ..] => {
            let receptive = rest.iter().product::<usize>();
            (inp * receptive, out * receptive)
        }
    };
    (fan_in.max(1), fan_out.max(1))
}

/// 由可选种子创建 RNG：给定种子则可复现，否则取系统熵
pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
