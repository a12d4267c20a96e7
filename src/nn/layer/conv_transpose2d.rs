/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : ConvTranspose2d (2D 转置卷积 / 反卷积) 层
 *
 * 输入/输出形状：
 * - 输入：[batch_size, in_channels, H, W]
 * - 输出：[batch_size, filters, H', W']，H' 见 padding.rs 的转置卷积公式
 *
 * 卷积核形状为 [in_channels, filters, kH, kW]。
 * 计算方式为“散射”：输入位置 (ih, iw) 乘以卷积核后累加到输出
 * (ih*sH + kh - crop_top, iw*sW + kw - crop_left)，越界部分丢弃。
 */

use super::{IntoPair, LayerOptions, Padding, Weights, check_rank};
use crate::nn::{Init, LayerError, Module};
use crate::tensor::Tensor;
use rayon::prelude::*;
use std::sync::OnceLock;

const SUPPORTED_OPTIONS: &[&str] = &[
    "padding",
    "strides",
    "use_bias",
    "kernel_initializer",
    "bias_initializer",
    "seed",
    "name",
];

/// ConvTranspose2d (2D 转置卷积) 层，常用于上采样
#[derive(Debug)]
pub struct ConvTranspose2d {
    filters: usize,
    kernel_size: (usize, usize),
    strides: (usize, usize),
    padding: Padding,
    use_bias: bool,
    kernel_initializer: Init,
    bias_initializer: Init,
    seed: Option<u64>,
    name: String,
    weights: OnceLock<Weights>,
}

impl ConvTranspose2d {
    /// 未给出时 padding 为 valid、步长为 1
    pub fn new(
        filters: usize,
        kernel_size: impl IntoPair,
        options: &LayerOptions,
    ) -> Result<Self, LayerError> {
        options.ensure_supported("ConvTranspose2d", SUPPORTED_OPTIONS)?;
        let kernel_size = kernel_size.into_pair();
        let strides = options.strides.unwrap_or((1, 1));
        if filters == 0 {
            return Err(LayerError::InvalidOperation(
                "ConvTranspose2d 的 filters 必须大于 0".to_string(),
            ));
        }
        if kernel_size.0 == 0 || kernel_size.1 == 0 || strides.0 == 0 || strides.1 == 0 {
            return Err(LayerError::InvalidOperation(format!(
                "ConvTranspose2d 的卷积核 {kernel_size:?} 与步长 {strides:?} 都必须为正"
            )));
        }
        Ok(Self {
            filters,
            kernel_size,
            strides,
            padding: options.padding.unwrap_or(Padding::Valid),
            use_bias: options.use_bias.unwrap_or(true),
            kernel_initializer: options.kernel_initializer.clone().unwrap_or(Init::Xavier),
            bias_initializer: options.bias_initializer.clone().unwrap_or(Init::Zeros),
            seed: options.seed,
            name: options
                .name
                .clone()
                .unwrap_or_else(|| "conv2d_transpose".to_string()),
            weights: OnceLock::new(),
        })
    }

    pub fn build(&self, input_shape: &[usize]) -> Result<(), LayerError> {
        self.weights(input_shape).map(|_| ())
    }

    fn weights(&self, input_shape: &[usize]) -> Result<&Weights, LayerError> {
        if input_shape.len() != 4 {
            return Err(LayerError::DimensionMismatch {
                expected: 4,
                got: input_shape.len(),
                message: format!("{} 的输入必须是 [batch, C_in, H, W]", self.name),
            });
        }
        let in_channels = input_shape[1];
        if let Some(weights) = self.weights.get() {
            let expected = weights.kernel.shape()[0];
            if expected != in_channels {
                return Err(LayerError::ShapeMismatch {
                    expected: vec![expected],
                    got: vec![in_channels],
                    message: format!("{} 已按 {expected} 个输入通道创建参数", self.name),
                });
            }
            return Ok(weights);
        }
        let (k_h, k_w) = self.kernel_size;
        Ok(self.weights.get_or_init(|| {
            Weights::create(
                &[in_channels, self.filters, k_h, k_w],
                self.use_bias.then_some(self.filters),
                &self.kernel_initializer,
                &self.bias_initializer,
                self.seed,
            )
        }))
    }

    pub fn filters(&self) -> usize {
        self.filters
    }

    pub fn kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }

    pub fn strides(&self) -> (usize, usize) {
        self.strides
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }
}

impl Module for ConvTranspose2d {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, LayerError> {
        check_rank(x, 4, &self.name, "[batch, C_in, H, W]")?;
        let weights = self.weights(x.shape())?;
        let (batch_size, in_c, in_h, in_w) =
            (x.shape()[0], x.shape()[1], x.shape()[2], x.shape()[3]);
        let (k_h, k_w) = self.kernel_size;
        let (s_h, s_w) = self.strides;
        let (Some(out_h), Some(out_w)) = (
            self.padding.transposed_output_len(in_h, k_h, s_h),
            self.padding.transposed_output_len(in_w, k_w, s_w),
        ) else {
            return Err(LayerError::InvalidOperation(format!(
                "{} 的输入空间尺寸 {in_h}x{in_w} 无效",
                self.name
            )));
        };
        let crop_top = self.padding.transposed_crop_before(k_h, s_h);
        let crop_left = self.padding.transposed_crop_before(k_w, s_w);

        let out_c = self.filters;
        let kernel = &weights.kernel;
        let bias = weights.bias.as_ref();
        let plane = out_h * out_w;

        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|b| {
                let mut sample_data = vec![0.0f32; out_c * plane];
                for ic in 0..in_c {
                    for ih in 0..in_h {
                        for iw in 0..in_w {
                            let x_val = x[[b, ic, ih, iw]];
                            for oc in 0..out_c {
                                for kh in 0..k_h {
                                    let Some(oh) = (ih * s_h + kh).checked_sub(crop_top) else {
                                        continue;
                                    };
                                    if oh >= out_h {
                                        continue;
                                    }
                                    for kw in 0..k_w {
                                        let Some(ow) = (iw * s_w + kw).checked_sub(crop_left) else {
                                            continue;
                                        };
                                        if ow >= out_w {
                                            continue;
                                        }
                                        sample_data[oc * plane + oh * out_w + ow] +=
                                            x_val * kernel[[ic, oc, kh, kw]];
                                    }
                                }
                            }
                        }
                    }
                }
                if let Some(bias) = bias {
                    for oc in 0..out_c {
                        let b_oc = bias[[oc]];
                        sample_data[oc * plane..(oc + 1) * plane]
                            .iter_mut()
                            .for_each(|v| *v += b_oc);
                    }
                }
                sample_data
            })
            .collect();

        let all_data: Vec<f32> = batch_results.into_iter().flatten().collect();
        Ok(Tensor::try_new(&all_data, &[batch_size, out_c, out_h, out_w])?)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.weights.get().map(Weights::iter).unwrap_or_default()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.weights.get_mut().map(Weights::iter_mut).unwrap_or_default()
    }
}
