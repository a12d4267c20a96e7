/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 池化块：单个 MaxPool2d 层（filters 参数被忽略）
 */

use super::{ActivationSpec, Block, BuildBlock, InstanceNormSpec, SingleLayer};
use crate::nn::LayerError;
use crate::nn::layer::{IntoPair, LayerOptions, MaxPool2d, Padding};
use serde::{Deserialize, Serialize};

/// 单个 2D 最大池化层构成的块
///
/// 默认：2x2 窗口、same 填充、步长 1（因此默认不缩小空间尺寸）、无激活。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolingBlock {
    pub pool_size: (usize, usize),
    pub activation: ActivationSpec,
    pub padding: Padding,
    pub strides: (usize, usize),
    pub instance_norm: InstanceNormSpec,
    pub options: LayerOptions,
}

impl Default for PoolingBlock {
    fn default() -> Self {
        Self {
            pool_size: (2, 2),
            activation: ActivationSpec::None,
            padding: Padding::Same,
            strides: (1, 1),
            instance_norm: false.into(),
            options: LayerOptions::default(),
        }
    }
}

impl PoolingBlock {
    pub fn with_pool_size(mut self, pool_size: impl IntoPair) -> Self {
        self.pool_size = pool_size.into_pair();
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_strides(mut self, strides: impl IntoPair) -> Self {
        self.strides = strides.into_pair();
        self
    }
}

impl_block_setters!(PoolingBlock);

impl BuildBlock for PoolingBlock {
    fn build_with(&self, _filters: usize, options: &LayerOptions) -> Result<Block, LayerError> {
        let options = LayerOptions {
            padding: Some(self.padding),
            strides: Some(self.strides),
            ..self.options.merged_over(options)
        };
        let layer = MaxPool2d::new(self.pool_size, &options)?;
        Ok(SingleLayer::new(layer, self.instance_norm.clone(), self.activation.clone()).into())
    }
}
