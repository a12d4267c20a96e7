/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12
 * @Description  : Layer 模块 - 层引擎：块（block）工厂所包装的具体层
 *
 * 所有 2D 层均采用 Batch-First、通道优先布局 [batch, C, H, W]。
 * 带权重的层在首次前向传播时按输入形状创建参数（延迟构建）。
 */

mod activation;
mod conv2d;
mod conv_transpose2d;
mod dense;
mod identity;
mod instance_norm;
mod max_pool2d;
mod options;
mod padding;
mod upsampling2d;

pub use activation::{Activation, ActivationFn};
pub use conv_transpose2d::ConvTranspose2d;
pub use conv2d::Conv2d;
pub use dense::Dense;
pub use identity::Identity;
pub use instance_norm::{InstanceNorm, InstanceNormOptions};
pub use max_pool2d::MaxPool2d;
pub use options::LayerOptions;
pub use padding::Padding;
pub use upsampling2d::{Interpolation, UpSampling2d};

use super::{Init, LayerError, Module, init::rng_from_seed};
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

/// 块工厂可构建的所有具体层
#[enum_dispatch(Module)]
#[derive(Debug)]
pub enum Layer {
    Conv2d,
    Dense,
    MaxPool2d,
    ConvTranspose2d,
    UpSampling2d,
    Identity,
}

/// 可转换为 (高, 宽) 二元组的尺寸参数：`3` 等价于 `(3, 3)`
pub trait IntoPair {
    fn into_pair(self) -> (usize, usize);
}

impl IntoPair for usize {
    fn into_pair(self) -> (usize, usize) {
        (self, self)
    }
}

impl IntoPair for (usize, usize) {
    fn into_pair(self) -> (usize, usize) {
        self
    }
}

/// 核 + 可选偏置，供 Conv2d / ConvTranspose2d / Dense 共用
#[derive(Debug)]
pub(crate) struct Weights {
    pub(crate) kernel: Tensor,
    pub(crate) bias: Option<Tensor>,
}

impl Weights {
    pub(crate) fn create(
        kernel_shape: &[usize],
        bias_len: Option<usize>,
        kernel_init: &Init,
        bias_init: &Init,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = rng_from_seed(seed);
        let kernel = kernel_init.generate(kernel_shape, &mut rng);
        let bias = bias_len.map(|len| bias_init.generate(&[len], &mut rng));
        Self { kernel, bias }
    }

    pub(crate) fn iter(&self) -> Vec<&Tensor> {
        std::iter::once(&self.kernel).chain(self.bias.iter()).collect()
    }

    pub(crate) fn iter_mut(&mut self) -> Vec<&mut Tensor> {
        std::iter::once(&mut self.kernel)
            .chain(self.bias.iter_mut())
            .collect()
    }
}

pub(crate) fn check_rank(
    x: &Tensor,
    rank: usize,
    layer: &str,
    layout: &str,
) -> Result<(), LayerError> {
    if x.dimension() != rank {
        return Err(LayerError::DimensionMismatch {
            expected: rank,
            got: x.dimension(),
            message: format!("{layer} 的输入必须是 {layout}，得到 {:?}", x.shape()),
        });
    }
    Ok(())
}

pub(crate) fn check_min_rank(
    x: &Tensor,
    min_rank: usize,
    layer: &str,
    layout: &str,
) -> Result<(), LayerError> {
    if x.dimension() < min_rank {
        return Err(LayerError::DimensionMismatch {
            expected: min_rank,
            got: x.dimension(),
            message: format!("{layer} 的输入至少是 {layout}，得到 {:?}", x.shape()),
        });
    }
    Ok(())
}

pub(crate) fn output_len_or_err(
    len: Option<usize>,
    layer: &str,
    input: usize,
    kernel: usize,
) -> Result<usize, LayerError> {
    len.ok_or_else(|| {
        LayerError::InvalidOperation(format!(
            "{layer} 输出尺寸无效：输入长度 {input}，窗口 {kernel}"
        ))
    })
}
