/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : InstanceNorm (实例归一化) 层
 *
 * 对每个样本的每个通道，在其余所有（空间）维度上做归一化：
 *   y = (x - mean) / sqrt(var + epsilon) * gamma + beta
 * - 输入：[batch, C, ...]（至少 2 阶），输出形状不变
 * - gamma、beta 形状均为 [C]，按首次输入的通道数创建，初始分别为全一、全零
 * - 仅有 2 阶输入（如全连接输出）时每组只有一个元素，输出恒等于 beta
 */

use super::check_min_rank;
use crate::nn::{LayerError, Module};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 实例归一化的可配置项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceNormOptions {
    /// 加在方差上的小常数，避免除零
    pub epsilon: f32,
    /// 是否加可学习的偏移 beta
    pub center: bool,
    /// 是否乘可学习的缩放 gamma
    pub scale: bool,
}

impl Default for InstanceNormOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-3,
            center: true,
            scale: true,
        }
    }
}

#[derive(Debug)]
struct NormParams {
    gamma: Option<Tensor>,
    beta: Option<Tensor>,
}

/// InstanceNorm (实例归一化) 层
#[derive(Debug)]
pub struct InstanceNorm {
    options: InstanceNormOptions,
    name: String,
    params: OnceLock<NormParams>,
}

impl Default for InstanceNorm {
    fn default() -> Self {
        Self::new(InstanceNormOptions::default())
    }
}

impl InstanceNorm {
    pub fn new(options: InstanceNormOptions) -> Self {
        Self {
            options,
            name: "instance_norm".to_string(),
            params: OnceLock::new(),
        }
    }

    pub fn options(&self) -> &InstanceNormOptions {
        &self.options
    }

    fn params(&self, channels: usize) -> Result<&NormParams, LayerError> {
        if let Some(params) = self.params.get() {
            let expected = params
                .gamma
                .as_ref()
                .or(params.beta.as_ref())
                .map_or(channels, |p| p.size());
            if expected != channels {
                return Err(LayerError::ShapeMismatch {
                    expected: vec![expected],
                    got: vec![channels],
                    message: format!("{} 已按 {expected} 个通道创建参数", self.name),
                });
            }
            return Ok(params);
        }
        Ok(self.params.get_or_init(|| NormParams {
            gamma: self.options.scale.then(|| Tensor::ones(&[channels])),
            beta: self.options.center.then(|| Tensor::zeros(&[channels])),
        }))
    }
}

impl Module for InstanceNorm {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, LayerError> {
        check_min_rank(x, 2, &self.name, "[batch, C, ...]")?;
        let (batch_size, channels) = (x.shape()[0], x.shape()[1]);
        let params = self.params(channels)?;
        let group_len = x.shape()[2..].iter().product::<usize>();

        let data = x.to_vec();
        let mut out = Vec::with_capacity(data.len());
        for (group_idx, group) in data.chunks(group_len.max(1)).enumerate() {
            let ci = group_idx % channels;
            let n = group.len() as f32;
            let mean = group.iter().sum::<f32>() / n;
            let var = group.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
            let inv_std = 1.0 / (var + self.options.epsilon).sqrt();
            let gamma = params.gamma.as_ref().map_or(1.0, |g| g[[ci]]);
            let beta = params.beta.as_ref().map_or(0.0, |b| b[[ci]]);
            out.extend(group.iter().map(|v| (v - mean) * inv_std * gamma + beta));
        }
        debug_assert_eq!(out.len(), batch_size * channels * group_len);
        Ok(Tensor::try_new(&out, x.shape())?)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.params
            .get()
            .map(|p| p.gamma.iter().chain(p.beta.iter()).collect())
            .unwrap_or_default()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.params
            .get_mut()
            .map(|p| p.gamma.iter_mut().chain(p.beta.iter_mut()).collect())
            .unwrap_or_default()
    }
}
