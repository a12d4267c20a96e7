/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 残差块：两层卷积 + 1x1 投影的跳跃连接
 *
 *      x ──> conv ─> norm ─> act ─> conv2 ─> norm ─> act ──> (+) ──> y
 *      └───────────────> identity(1x1 投影) ────────────────────┘
 */

use super::{ActivationSpec, Block, BuildBlock, InstanceNormSpec, single_layer_call};
use crate::nn::layer::{Conv2d, IntoPair, LayerOptions, Padding};
use crate::nn::{LayerError, Module};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// 残差块配置
///
/// 默认：3x3 卷积核、步长 1、relu 激活、开启实例归一化。
/// 第一层卷积使用配置的步长，第二层卷积步长恒为 1，两者均为 same 填充；
/// 投影卷积为 1x1、valid、步长 1，因此步长大于 1 时两条支路形状不一致，相加会失败。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidualBlock {
    pub kernel_size: (usize, usize),
    pub activation: ActivationSpec,
    pub strides: (usize, usize),
    pub instance_norm: InstanceNormSpec,
    pub options: LayerOptions,
}

impl Default for ResidualBlock {
    fn default() -> Self {
        Self {
            kernel_size: (3, 3),
            activation: "relu".into(),
            strides: (1, 1),
            instance_norm: true.into(),
            options: LayerOptions::default(),
        }
    }
}

impl ResidualBlock {
    pub fn with_kernel_size(mut self, kernel_size: impl IntoPair) -> Self {
        self.kernel_size = kernel_size.into_pair();
        self
    }

    pub fn with_strides(mut self, strides: impl IntoPair) -> Self {
        self.strides = strides.into_pair();
        self
    }
}

impl_block_setters!(ResidualBlock);

impl BuildBlock for ResidualBlock {
    fn build_with(&self, filters: usize, options: &LayerOptions) -> Result<Block, LayerError> {
        let merged = self.options.merged_over(options);
        let base_name = merged.name.clone().unwrap_or_else(|| "residual".to_string());
        // 三个卷积各用独立的种子，避免同一种子生成相同的参数
        let sub_options = |suffix: &str, offset: u64, padding: Padding, strides: (usize, usize)| {
            LayerOptions {
                padding: Some(padding),
                strides: Some(strides),
                seed: merged.seed.map(|s| s.wrapping_add(offset)),
                name: Some(format!("{base_name}_{suffix}")),
                ..merged.clone()
            }
        };

        let identity = Conv2d::new(
            filters,
            1,
            &sub_options("identity", 0, Padding::Valid, (1, 1)),
        )?;
        let conv = Conv2d::new(
            filters,
            self.kernel_size,
            &sub_options("conv", 1, Padding::Same, self.strides),
        )?;
        let conv2 = Conv2d::new(
            filters,
            self.kernel_size,
            &sub_options("conv2", 2, Padding::Same, (1, 1)),
        )?;

        Ok(Residual {
            name: base_name,
            identity,
            conv,
            conv2,
            instance_norm: self.instance_norm.clone(),
            activation: self.activation.clone(),
        }
        .into())
    }
}

/// 已构建的残差块
#[derive(Debug)]
pub struct Residual {
    name: String,
    identity: Conv2d,
    conv: Conv2d,
    conv2: Conv2d,
    instance_norm: InstanceNormSpec,
    activation: ActivationSpec,
}

impl Residual {
    /// 跳跃连接上的 1x1 投影卷积
    pub fn identity(&self) -> &Conv2d {
        &self.identity
    }

    pub fn identity_mut(&mut self) -> &mut Conv2d {
        &mut self.identity
    }

    pub fn conv(&self) -> &Conv2d {
        &self.conv
    }

    pub fn conv_mut(&mut self) -> &mut Conv2d {
        &mut self.conv
    }

    pub fn conv2(&self) -> &Conv2d {
        &self.conv2
    }

    pub fn conv2_mut(&mut self) -> &mut Conv2d {
        &mut self.conv2
    }
}

impl Module for Residual {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, LayerError> {
        let h = single_layer_call(x, &self.conv, &self.instance_norm, &self.activation)?;
        let h = single_layer_call(&h, &self.conv2, &self.instance_norm, &self.activation)?;
        let skip = self.identity.forward(x)?;
        if h.shape() != skip.shape() {
            return Err(LayerError::ShapeMismatch {
                expected: h.shape().to_vec(),
                got: skip.shape().to_vec(),
                message: format!("{} 的主支路与跳跃连接形状不一致，无法相加", self.name),
            });
        }
        Ok(h.checked_add(&skip)?)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        let mut params = self.identity.parameters();
        params.extend(self.conv.parameters());
        params.extend(self.conv2.parameters());
        params
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.identity.parameters_mut();
        params.extend(self.conv.parameters_mut());
        params.extend(self.conv2.parameters_mut());
        params
    }
}
