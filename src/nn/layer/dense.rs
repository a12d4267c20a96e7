/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12
 * @Description  : Dense (全连接) 层
 *
 * 作用于输入的最后一维：
 * - 输入：[..., in_features]（至少 2 阶，如 [batch, in_features]）
 * - 输出：[..., units]
 *
 * 计算：output = x · W + b，W: [in_features, units]，b: [units]
 */

use super::{LayerOptions, Weights, check_min_rank};
use crate::nn::{Init, LayerError, Module};
use crate::tensor::Tensor;
use ndarray::{ArrayView2, Ix2};
use std::sync::OnceLock;

const SUPPORTED_OPTIONS: &[&str] = &[
    "use_bias",
    "kernel_initializer",
    "bias_initializer",
    "seed",
    "name",
];

/// Dense (全连接) 层
#[derive(Debug)]
pub struct Dense {
    units: usize,
    use_bias: bool,
    kernel_initializer: Init,
    bias_initializer: Init,
    seed: Option<u64>,
    name: String,
    weights: OnceLock<Weights>,
}

impl Dense {
    pub fn new(units: usize, options: &LayerOptions) -> Result<Self, LayerError> {
        options.ensure_supported("Dense", SUPPORTED_OPTIONS)?;
        if units == 0 {
            return Err(LayerError::InvalidOperation(
                "Dense 的 units 必须大于 0".to_string(),
            ));
        }
        Ok(Self {
            units,
            use_bias: options.use_bias.unwrap_or(true),
            kernel_initializer: options.kernel_initializer.clone().unwrap_or(Init::Xavier),
            bias_initializer: options.bias_initializer.clone().unwrap_or(Init::Zeros),
            seed: options.seed,
            name: options.name.clone().unwrap_or_else(|| "dense".to_string()),
            weights: OnceLock::new(),
        })
    }

    /// 按输入形状创建参数（若已创建则只校验输入特征数）
    pub fn build(&self, input_shape: &[usize]) -> Result<(), LayerError> {
        self.weights(input_shape).map(|_| ())
    }

    fn weights(&self, input_shape: &[usize]) -> Result<&Weights, LayerError> {
        let Some(&in_features) = input_shape.last() else {
            return Err(LayerError::DimensionMismatch {
                expected: 2,
                got: 0,
                message: format!("{} 的输入至少是 [batch, in_features]", self.name),
            });
        };
        if in_features == 0 {
            return Err(LayerError::InvalidOperation(format!(
                "{} 的输入特征数（最后一维）必须大于 0",
                self.name
            )));
        }
        if let Some(weights) = self.weights.get() {
            let expected = weights.kernel.shape()[0];
            if expected != in_features {
                return Err(LayerError::ShapeMismatch {
                    expected: vec![expected],
                    got: vec![in_features],
                    message: format!("{} 已按 {expected} 个输入特征创建参数", self.name),
                });
            }
            return Ok(weights);
        }
        Ok(self.weights.get_or_init(|| {
            Weights::create(
                &[in_features, self.units],
                self.use_bias.then_some(self.units),
                &self.kernel_initializer,
                &self.bias_initializer,
                self.seed,
            )
        }))
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn kernel(&self) -> Option<&Tensor> {
        self.weights.get().map(|w| &w.kernel)
    }

    pub fn bias(&self) -> Option<&Tensor> {
        self.weights.get().and_then(|w| w.bias.as_ref())
    }
}

impl Module for Dense {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, LayerError> {
        check_min_rank(x, 2, &self.name, "[..., in_features]")?;
        let weights = self.weights(x.shape())?;
        let in_features = weights.kernel.shape()[0];
        let rows = x.size() / in_features;

        // 先把前面的所有维度压成一维，做一次矩阵乘法后再还原
        let flat = x.reshape(&[rows, in_features])?;
        let mut y = as_matrix(&flat, &self.name)?.dot(&as_matrix(&weights.kernel, &self.name)?);
        if let Some(bias) = &weights.bias {
            y += bias.data();
        }

        let mut out_shape = x.shape().to_vec();
        if let Some(last) = out_shape.last_mut() {
            *last = self.units;
        }
        Ok(Tensor::from_array(y.into_dyn()).reshape(&out_shape)?)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.weights.get().map(Weights::iter).unwrap_or_default()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.weights.get_mut().map(Weights::iter_mut).unwrap_or_default()
    }
}

fn as_matrix<'a>(t: &'a Tensor, name: &str) -> Result<ArrayView2<'a, f32>, LayerError> {
    t.data()
        .view()
        .into_dimensionality::<Ix2>()
        .map_err(|e| LayerError::InvalidOperation(format!("{name}: {e}")))
}
