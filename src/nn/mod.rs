/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12
 * @Description  : 负责神经网络（neural network）层块的构建
 *
 * - layer：层引擎（卷积、全连接、池化、反卷积、上采样、实例归一化、激活）
 * - block：层块工厂、名称注册表及由名称/配置搭建网络结构
 */

mod error;
mod init;
mod module;
// enum_dispatch 要求 trait 先于实现它的枚举展开
pub mod block;
pub mod layer;

pub use block::{
    ActivationSpec, ArchitectureSpec, Block, BlockArg, BlockError, BlockKind, BlockRef, BlockSpec,
    BuildBlock, ConvolutionalBlock, DeconvolutionalBlock, DenseBlock, IdentityBlock,
    InstanceNormSpec, LayerEntry, PoolingBlock, REGISTRY, ResidualBlock, Sequential,
    StaticUpsampleBlock, as_activation, as_block, single_layer_call,
};
pub use error::LayerError;
pub use init::Init;
pub use layer::{LayerOptions, Padding};
pub use module::Module;

#[cfg(test)]
mod tests;
