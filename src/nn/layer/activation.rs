/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12
 * @Description  : 激活函数与 Activation 层
 *
 * 激活函数可通过名称（如 "relu"）查表得到，名称表即 `ActivationFn::NAMES`。
 * 除 softmax 外均为逐元素运算；softmax 沿通道维（第 1 维，1 阶张量则为第 0 维）归一化。
 */

use crate::nn::{LayerError, Module};
use crate::tensor::Tensor;
use ndarray::Axis;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SELU_ALPHA: f32 = 1.673_263_2;
const SELU_SCALE: f32 = 1.050_701;
const LEAKY_RELU_ALPHA: f32 = 0.2;

/// 激活函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFn {
    /// 恒等：x
    Linear,
    /// `ReLU`：max(0, x)
    Relu,
    /// Tanh
    Tanh,
    /// Sigmoid：1 / (1 + exp(-x))
    Sigmoid,
    /// Softmax：沿通道维归一化
    Softmax,
    /// `SoftPlus`：ln(1 + exp(x))
    Softplus,
    /// Softsign：x / (1 + |x|)
    Softsign,
    /// ELU：x if x > 0 else exp(x) - 1
    Elu,
    /// SELU
    Selu,
    /// Swish：x * sigmoid(x)
    Swish,
    /// GELU（tanh 近似）
    Gelu,
    /// `LeakyReLU`：x if x > 0 else 0.2 * x
    LeakyRelu,
    /// 分段线性的 sigmoid 近似：clip(0.2 * x + 0.5, 0, 1)
    HardSigmoid,
    /// exp(x)
    Exponential,
}

impl ActivationFn {
    /// 名称表（与 `FromStr` 一致）
    pub const NAMES: [(&'static str, ActivationFn); 14] = [
        ("linear", Self::Linear),
        ("relu", Self::Relu),
        ("tanh", Self::Tanh),
        ("sigmoid", Self::Sigmoid),
        ("softmax", Self::Softmax),
        ("softplus", Self::Softplus),
        ("softsign", Self::Softsign),
        ("elu", Self::Elu),
        ("selu", Self::Selu),
        ("swish", Self::Swish),
        ("gelu", Self::Gelu),
        ("leaky_relu", Self::LeakyRelu),
        ("hard_sigmoid", Self::HardSigmoid),
        ("exponential", Self::Exponential),
    ];

    pub fn as_str(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, f)| *f == self)
            .map_or("linear", |(name, _)| name)
    }

    /// 逐元素激活；softmax 不是逐元素运算，这里对单个元素返回 1
    fn apply_elementwise(self, x: f32) -> f32 {
        match self {
            Self::Linear => x,
            Self::Relu => x.max(0.0),
            Self::Tanh => x.tanh(),
            Self::Sigmoid => sigmoid(x),
            Self::Softmax => 1.0,
            Self::Softplus => {
                // 数值稳定写法：max(x, 0) + ln(1 + exp(-|x|))
                x.max(0.0) + (-x.abs()).exp().ln_1p()
            }
            Self::Softsign => x / (1.0 + x.abs()),
            Self::Elu => {
                if x > 0.0 {
                    x
                } else {
                    x.exp_m1()
                }
            }
            Self::Selu => {
                if x > 0.0 {
                    SELU_SCALE * x
                } else {
                    SELU_SCALE * SELU_ALPHA * x.exp_m1()
                }
            }
            Self::Swish => x * sigmoid(x),
            Self::Gelu => {
                let c = (2.0 / std::f32::consts::PI).sqrt();
                0.5 * x * (1.0 + (c * (x + 0.044_715 * x.powi(3))).tanh())
            }
            Self::LeakyRelu => {
                if x > 0.0 {
                    x
                } else {
                    LEAKY_RELU_ALPHA * x
                }
            }
            Self::HardSigmoid => (0.2 * x + 0.5).clamp(0.0, 1.0),
            Self::Exponential => x.exp(),
        }
    }

    /// 对整个张量施加激活
    pub fn apply(self, x: &Tensor) -> Tensor {
        match self {
            Self::Linear => x.clone(),
            Self::Softmax => softmax(x),
            _ => Tensor::from_array(x.data().mapv(|v| self.apply_elementwise(v))),
        }
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(x: &Tensor) -> Tensor {
    if x.dimension() == 0 {
        return Tensor::ones(x.shape());
    }
    let axis = Axis(if x.dimension() == 1 { 0 } else { 1 });
    let mut data = x.data().clone();
    for mut lane in data.lanes_mut(axis) {
        let max = lane.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
        lane.mapv_inplace(|v| (v - max).exp());
        let sum = lane.sum();
        lane.mapv_inplace(|v| v / sum);
    }
    Tensor::from_array(data)
}

impl FromStr for ActivationFn {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, f)| *f)
            .ok_or_else(|| LayerError::UnknownActivation {
                name: s.to_string(),
                valid: Self::NAMES.iter().map(|(name, _)| name.to_string()).collect(),
            })
    }
}

impl fmt::Display for ActivationFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Activation 层：把一个激活函数包装成层
#[derive(Debug)]
pub struct Activation {
    function: ActivationFn,
    name: String,
}

impl Activation {
    pub fn new(function: ActivationFn) -> Self {
        Self {
            function,
            name: function.as_str().to_string(),
        }
    }

    /// 按名称创建，名称无法识别时返回 `LayerError::UnknownActivation`
    pub fn from_name(name: &str) -> Result<Self, LayerError> {
        name.parse().map(Self::new)
    }

    pub fn function(&self) -> ActivationFn {
        self.function
    }
}

impl Module for Activation {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, LayerError> {
        Ok(self.function.apply(x))
    }
}
