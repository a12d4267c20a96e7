/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 单层块的前向传播：层 -> （可选）实例归一化 -> 激活
 *
 * 注意：实例归一化层与激活层在每次前向传播时都会重新构造，
 * 归一化的 gamma/beta 因此总是初始值（全一/全零），不会在两次调用之间保留。
 */

use super::{ActivationSpec, InstanceNormSpec};
use crate::nn::layer::{Activation, Identity, InstanceNorm, Layer};
use crate::nn::{LayerError, Module};
use crate::tensor::Tensor;
use std::sync::Arc;

/// 把激活选择解析为一个层
///
/// - `None` -> 恒等层
/// - `Layer` -> 原样返回（同一个层对象）
/// - `Name` -> 按名称查激活函数表；名称无效时返回层引擎的 `UnknownActivation` 错误
pub fn as_activation(activation: &ActivationSpec) -> Result<Arc<dyn Module>, LayerError> {
    Ok(match activation {
        ActivationSpec::None => Arc::new(Identity::default()),
        ActivationSpec::Layer(layer) => Arc::clone(layer),
        ActivationSpec::Name(name) => Arc::new(Activation::from_name(name)?),
    })
}

/// 依次施加 `layer`、（开启时）新构造的实例归一化、激活，不修改输入
pub fn single_layer_call(
    x: &Tensor,
    layer: &dyn Module,
    instance_norm: &InstanceNormSpec,
    activation: &ActivationSpec,
) -> Result<Tensor, LayerError> {
    let mut y = layer.forward(x)?;
    if let Some(options) = instance_norm.options() {
        y = InstanceNorm::new(options).forward(&y)?;
    }
    as_activation(activation)?.forward(&y)
}

/// 由单个层构成的块（除残差块外的所有块）
#[derive(Debug)]
pub struct SingleLayer {
    layer: Layer,
    instance_norm: InstanceNormSpec,
    activation: ActivationSpec,
}

impl SingleLayer {
    pub fn new(
        layer: impl Into<Layer>,
        instance_norm: InstanceNormSpec,
        activation: ActivationSpec,
    ) -> Self {
        Self {
            layer: layer.into(),
            instance_norm,
            activation,
        }
    }

    /// 被包装的层
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut Layer {
        &mut self.layer
    }

    pub fn instance_norm(&self) -> &InstanceNormSpec {
        &self.instance_norm
    }

    pub fn activation(&self) -> &ActivationSpec {
        &self.activation
    }
}

impl Module for SingleLayer {
    fn name(&self) -> &str {
        self.layer.name()
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, LayerError> {
        single_layer_call(x, &self.layer, &self.instance_norm, &self.activation)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.layer.parameters()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.layer.parameters_mut()
    }
}
