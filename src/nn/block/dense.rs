/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 全连接块：单个 Dense 层
 */

use super::{ActivationSpec, Block, BuildBlock, InstanceNormSpec, SingleLayer};
use crate::nn::LayerError;
use crate::nn::layer::{Dense, LayerOptions};
use serde::{Deserialize, Serialize};

/// 单个全连接层构成的块，`filters` 即输出单元数
///
/// 默认：tanh 激活、不做实例归一化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenseBlock {
    pub activation: ActivationSpec,
    pub instance_norm: InstanceNormSpec,
    pub options: LayerOptions,
}

impl Default for DenseBlock {
    fn default() -> Self {
        Self {
            activation: "tanh".into(),
            instance_norm: false.into(),
            options: LayerOptions::default(),
        }
    }
}

impl_block_setters!(DenseBlock);

impl BuildBlock for DenseBlock {
    fn build_with(&self, filters: usize, options: &LayerOptions) -> Result<Block, LayerError> {
        let layer = Dense::new(filters, &self.options.merged_over(options))?;
        Ok(SingleLayer::new(layer, self.instance_norm.clone(), self.activation.clone()).into())
    }
}
