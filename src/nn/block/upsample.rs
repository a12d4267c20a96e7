/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 静态上采样块：单个不可训练的 UpSampling2d 层（filters 参数被忽略）
 */

use super::{ActivationSpec, Block, BuildBlock, InstanceNormSpec, SingleLayer};
use crate::nn::LayerError;
use crate::nn::layer::{Interpolation, IntoPair, LayerOptions, UpSampling2d};
use serde::{Deserialize, Serialize};

/// 单个 2D 上采样层构成的块
///
/// 默认：放大 2x2、双线性插值、无激活。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticUpsampleBlock {
    pub size: (usize, usize),
    pub activation: ActivationSpec,
    pub interpolation: Interpolation,
    pub instance_norm: InstanceNormSpec,
    pub options: LayerOptions,
}

impl Default for StaticUpsampleBlock {
    fn default() -> Self {
        Self {
            size: (2, 2),
            activation: ActivationSpec::None,
            interpolation: Interpolation::Bilinear,
            instance_norm: false.into(),
            options: LayerOptions::default(),
        }
    }
}

impl StaticUpsampleBlock {
    pub fn with_size(mut self, size: impl IntoPair) -> Self {
        self.size = size.into_pair();
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }
}

impl_block_setters!(StaticUpsampleBlock);

impl BuildBlock for StaticUpsampleBlock {
    fn build_with(&self, _filters: usize, options: &LayerOptions) -> Result<Block, LayerError> {
        let layer = UpSampling2d::new(
            self.size,
            self.interpolation,
            &self.options.merged_over(options),
        )?;
        Ok(SingleLayer::new(layer, self.instance_norm.clone(), self.activation.clone()).into())
    }
}
