/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 层块（block）：可配置的层工厂、名称注册表与由配置搭建网络
 *
 * 使用分两步：先得到块配置（`BlockSpec`，可由名称经 `as_block` 解析），
 * 再以输出通道（单元）数构建出 `Block`，最后对张量调用 `forward`。
 *
 * ```ignore
 * let spec = as_block("conv")?;
 * let block = spec.build(16)?;
 * let y = block.forward(&x)?;
 * ```
 */

/// 为块配置生成通用的构造与设置方法
macro_rules! impl_block_setters {
    ($block:ident) => {
        impl $block {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn with_activation(
                mut self,
                activation: impl Into<$crate::nn::block::ActivationSpec>,
            ) -> Self {
                self.activation = activation.into();
                self
            }

            pub fn with_instance_norm(
                mut self,
                instance_norm: impl Into<$crate::nn::block::InstanceNormSpec>,
            ) -> Self {
                self.instance_norm = instance_norm.into();
                self
            }

            /// 配置时的透传参数，与构建时的同名参数冲突时以此为准
            pub fn with_options(mut self, options: $crate::nn::layer::LayerOptions) -> Self {
                self.options = options;
                self
            }
        }
    };
}

mod architecture;
mod convolutional;
mod deconvolutional;
mod dense;
mod error;
mod identity;
mod pooling;
mod registry;
mod residual;
mod resolve;
mod spec;
mod transform;
mod upsample;

pub use architecture::{ArchitectureSpec, BlockRef, LayerEntry, Sequential};
pub use convolutional::ConvolutionalBlock;
pub use deconvolutional::DeconvolutionalBlock;
pub use dense::DenseBlock;
pub use error::BlockError;
pub use identity::IdentityBlock;
pub use pooling::PoolingBlock;
pub use registry::{BlockKind, REGISTRY, Registry};
pub use residual::{Residual, ResidualBlock};
pub use resolve::{BlockArg, as_block};
pub use spec::{ActivationSpec, InstanceNormSpec};
pub use transform::{SingleLayer, as_activation, single_layer_call};
pub use upsample::StaticUpsampleBlock;

use super::{LayerError, Module};
use crate::nn::layer::LayerOptions;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// 块配置的构建能力：以输出通道（单元）数构建出一个新的、参数独立的块
#[enum_dispatch]
pub trait BuildBlock {
    /// 不带构建时透传参数的构建
    fn build(&self, filters: usize) -> Result<Block, LayerError> {
        self.build_with(filters, &LayerOptions::default())
    }

    /// 构建时的 `options` 会被配置时的同名参数覆盖
    fn build_with(&self, filters: usize, options: &LayerOptions) -> Result<Block, LayerError>;
}

/// 尚未构建的块配置
#[enum_dispatch(BuildBlock)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockSpec {
    Convolutional(ConvolutionalBlock),
    Dense(DenseBlock),
    Pooling(PoolingBlock),
    Deconvolutional(DeconvolutionalBlock),
    StaticUpsample(StaticUpsampleBlock),
    Residual(ResidualBlock),
    Identity(IdentityBlock),
}

/// 已构建的块
#[enum_dispatch(Module)]
#[derive(Debug)]
pub enum Block {
    SingleLayer(SingleLayer),
    Residual(Residual),
}

#[cfg(test)]
mod tests;
