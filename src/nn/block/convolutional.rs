/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 卷积块：单个 Conv2d 层
 */

use super::{ActivationSpec, Block, BuildBlock, InstanceNormSpec, SingleLayer};
use crate::nn::layer::{Conv2d, IntoPair, LayerOptions, Padding};
use crate::nn::LayerError;
use serde::{Deserialize, Serialize};

/// 单个 2D 卷积层构成的块
///
/// 默认：3x3 卷积核、same 填充、步长 1、relu 激活、不做实例归一化。
/// `options` 透传给 `Conv2d`（如 `use_bias`、`kernel_initializer`）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvolutionalBlock {
    pub kernel_size: (usize, usize),
    pub activation: ActivationSpec,
    pub padding: Padding,
    pub strides: (usize, usize),
    pub instance_norm: InstanceNormSpec,
    pub options: LayerOptions,
}

impl Default for ConvolutionalBlock {
    fn default() -> Self {
        Self {
            kernel_size: (3, 3),
            activation: "relu".into(),
            padding: Padding::Same,
            strides: (1, 1),
            instance_norm: false.into(),
            options: LayerOptions::default(),
        }
    }
}

impl ConvolutionalBlock {
    pub fn with_kernel_size(mut self, kernel_size: impl IntoPair) -> Self {
        self.kernel_size = kernel_size.into_pair();
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

impl_block_setters!(ConvolutionalBlock);

impl BuildBlock for ConvolutionalBlock {
    fn build_with(&self, filters: usize, options: &LayerOptions) -> Result<Block, LayerError> {
        let options = LayerOptions {
            padding: Some(self.padding),
            strides: Some(self.strides),
            ..self.options.merged_over(options)
        };
        let layer = Conv2d::new(filters, self.kernel_size, &options)?;
        Ok(SingleLayer::new(layer, self.instance_norm.clone(), self.activation.clone()).into())
    }
}
