/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 恒等块：原样返回输入，可选实例归一化与激活
 */

use super::{ActivationSpec, Block, BuildBlock, InstanceNormSpec, SingleLayer};
use crate::nn::LayerError;
use crate::nn::layer::{Identity, LayerOptions};
use serde::{Deserialize, Serialize};

/// 恒等块
///
/// `filters` 只为与其他块保持同样的构建签名，不参与计算。
/// 只有构建时给出的 `LayerOptions` 会传给底层的 Identity 层，配置时的 `options` 不参与。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityBlock {
    pub activation: ActivationSpec,
    pub instance_norm: InstanceNormSpec,
    pub options: LayerOptions,
}

impl Default for IdentityBlock {
    fn default() -> Self {
        Self {
            activation: ActivationSpec::None,
            instance_norm: false.into(),
            options: LayerOptions::default(),
        }
    }
}

impl_block_setters!(IdentityBlock);

impl BuildBlock for IdentityBlock {
    fn build_with(&self, _filters: usize, options: &LayerOptions) -> Result<Block, LayerError> {
        let layer = Identity::new(options)?;
        Ok(SingleLayer::new(layer, self.instance_norm.clone(), self.activation.clone()).into())
    }
}
