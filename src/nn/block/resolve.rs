/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 把名称或块配置统一解析为块配置
 */

use super::{
    Block, BlockError, BlockSpec, ConvolutionalBlock, DeconvolutionalBlock, DenseBlock,
    IdentityBlock, PoolingBlock, REGISTRY, ResidualBlock, StaticUpsampleBlock,
};
use crate::nn::Module;

/// `as_block` 接受的参数
///
/// 已构建的块（`Built`）与层对象（`Layer`）不是块配置，解析时报错。
#[derive(Debug)]
pub enum BlockArg {
    Name(String),
    Spec(BlockSpec),
    Built(Block),
    Layer(Box<dyn Module>),
}

impl From<&str> for BlockArg {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for BlockArg {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<BlockSpec> for BlockArg {
    fn from(spec: BlockSpec) -> Self {
        Self::Spec(spec)
    }
}

impl From<Block> for BlockArg {
    fn from(block: Block) -> Self {
        Self::Built(block)
    }
}

impl From<Box<dyn Module>> for BlockArg {
    fn from(layer: Box<dyn Module>) -> Self {
        Self::Layer(layer)
    }
}

macro_rules! impl_from_factory {
    ($($factory:ident),*) => {
        $(
            impl From<$factory> for BlockArg {
                fn from(factory: $factory) -> Self {
                    Self::Spec(factory.into())
                }
            }
        )*
    };
}

impl_from_factory!(
    ConvolutionalBlock,
    DenseBlock,
    PoolingBlock,
    DeconvolutionalBlock,
    StaticUpsampleBlock,
    ResidualBlock,
    IdentityBlock
);

/// 解析块参数
///
/// - 名称：在注册表中查找对应的默认配置；不存在时返回列出所有有效名称的 `NameResolution`
/// - 块配置：原样返回
/// - 已构建的块或层对象：返回 `TypeMismatch`
pub fn as_block(block: impl Into<BlockArg>) -> Result<BlockSpec, BlockError> {
    match block.into() {
        BlockArg::Name(name) => REGISTRY.resolve(&name),
        BlockArg::Spec(spec) => Ok(spec),
        BlockArg::Built(built) => Err(BlockError::TypeMismatch(format!(
            "已构建的块 `{}`",
            built.name()
        ))),
        BlockArg::Layer(layer) => Err(BlockError::TypeMismatch(format!(
            "层对象 `{}`",
            layer.name()
        ))),
    }
}
