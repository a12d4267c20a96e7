/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 反卷积块：单个 ConvTranspose2d 层
 */

use super::{ActivationSpec, Block, BuildBlock, InstanceNormSpec, SingleLayer};
use crate::nn::LayerError;
use crate::nn::layer::{ConvTranspose2d, IntoPair, LayerOptions, Padding};
use serde::{Deserialize, Serialize};

/// 单个 2D 转置卷积层构成的块
///
/// 默认：2x2 卷积核、same 填充、步长 1、无激活。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeconvolutionalBlock {
    pub kernel_size: (usize, usize),
    pub activation: ActivationSpec,
    pub padding: Padding,
    pub strides: (usize, usize),
    pub instance_norm: InstanceNormSpec,
    pub options: LayerOptions,
}

impl Default for DeconvolutionalBlock {
    fn default() -> Self {
        Self {
            kernel_size: (2, 2),
            activation: ActivationSpec::None,
            padding: Padding::Same,
            strides: (1, 1),
            instance_norm: false.into(),
            options: LayerOptions::default(),
        }
    }
}

impl DeconvolutionalBlock {
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

impl_block_setters!(DeconvolutionalBlock);

impl BuildBlock for DeconvolutionalBlock {
    fn build_with(&self, filters: usize, options: &LayerOptions) -> Result<Block, LayerError> {
        let options = LayerOptions {
            padding: Some(self.padding),
            strides: Some(self.strides),
            ..self.options.merged_over(options)
        };
        let layer = ConvTranspose2d::new(filters, self.kernel_size, &options)?;
        Ok(SingleLayer::new(layer, self.instance_norm.clone(), self.activation.clone()).into())
    }
}
