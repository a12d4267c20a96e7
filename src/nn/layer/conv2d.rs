/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12
 * @Description  : Conv2d (2D 卷积) 层
 *
 * 输入/输出形状：
 * - 输入：[batch_size, in_channels, H, W]
 * - 输出：[batch_size, filters, H', W']
 *
 * 输出尺寸计算见 padding.rs；in_channels 由首次前向传播的输入推断，
 * 卷积核 [filters, in_channels, kH, kW] 与偏置 [filters] 在此时创建。
 *
 * 计算：output = conv2d(x, K) + b
 */

use super::{IntoPair, LayerOptions, Padding, Weights, check_rank, output_len_or_err};
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

/// Conv2d (2D 卷积) 层
///
/// # 使用示例
/// ```ignore
/// let opts = LayerOptions::default().with_padding(Padding::Same);
/// let conv = Conv2d::new(32, 3, &opts)?;
/// let h = conv.forward(&x)?; // x: [batch, C_in, H, W]
/// ```
#[derive(Debug)]
pub struct Conv2d {
    filters: usize,
    kernel_size: (usize, usize),
    strides: (usize, usize),
    padding: Padding,
    use_bias: bool,
    kernel_initializer: Init,
    bias_initializer: Init,
    seed: Option<u64>,
    name: String,
    /// 延迟创建的参数：kernel [filters, C_in, kH, kW]，bias [filters]
    weights: OnceLock<Weights>,
}

impl Conv2d {
    /// 创建新的 Conv2d 层（参数尚未创建）
    ///
    /// # 参数
    /// - `filters`: 输出通道数
    /// - `kernel_size`: 卷积核大小，`3` 或 `(3, 3)`
    /// - `options`: 透传参数；未给出时 padding 为 valid、步长为 1
    pub fn new(
        filters: usize,
        kernel_size: impl IntoPair,
        options: &LayerOptions,
    ) -> Result<Self, LayerError> {
        options.ensure_supported("Conv2d", SUPPORTED_OPTIONS)?;
        let kernel_size = kernel_size.into_pair();
        let strides = options.strides.unwrap_or((1, 1));
        if filters == 0 {
            return Err(LayerError::InvalidOperation(
                "Conv2d 的 filters 必须大于 0".to_string(),
            ));
        }
        if kernel_size.0 == 0 || kernel_size.1 == 0 || strides.0 == 0 || strides.1 == 0 {
            return Err(LayerError::InvalidOperation(format!(
                "Conv2d 的卷积核 {kernel_size:?} 与步长 {strides:?} 都必须为正"
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
            name: options.name.clone().unwrap_or_else(|| "conv2d".to_string()),
            weights: OnceLock::new(),
        })
    }

    /// 按输入形状创建参数（若已创建则只校验输入通道数）
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
            let expected = weights.kernel.shape()[1];
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
                &[self.filters, in_channels, k_h, k_w],
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

    pub fn use_bias(&self) -> bool {
        self.use_bias
    }

    /// 卷积核（首次前向传播前为 None）
    pub fn kernel(&self) -> Option<&Tensor> {
        self.weights.get().map(|w| &w.kernel)
    }

    /// 偏置（无偏置或首次前向传播前为 None）
    pub fn bias(&self) -> Option<&Tensor> {
        self.weights.get().and_then(|w| w.bias.as_ref())
    }
}

impl Module for Conv2d {
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

        let out_h =
            output_len_or_err(self.padding.output_len(in_h, k_h, s_h), &self.name, in_h, k_h)?;
        let out_w =
            output_len_or_err(self.padding.output_len(in_w, k_w, s_w), &self.name, in_w, k_w)?;
        let pad_top = self.padding.pad_before(in_h, k_h, s_h);
        let pad_left = self.padding.pad_before(in_w, k_w, s_w);

        let out_c = self.filters;
        let kernel = &weights.kernel;
        let bias = weights.bias.as_ref();
        let single_sample_size = out_c * out_h * out_w;

        // Rayon 并行计算每个 batch 样本；落在填充区的位置视为 0，直接跳过
        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|b| {
                let mut sample_data = vec![0.0f32; single_sample_size];
                for oc in 0..out_c {
                    let b_oc = bias.map_or(0.0, |bias| bias[[oc]]);
                    for oh in 0..out_h {
                        for ow in 0..out_w {
                            let mut sum = b_oc;
                            for ic in 0..in_c {
                                for kh in 0..k_h {
                                    let Some(ih) = (oh * s_h + kh).checked_sub(pad_top) else {
                                        continue;
                                    };
                                    if ih >= in_h {
                                        continue;
                                    }
                                    for kw in 0..k_w {
                                        let Some(iw) = (ow * s_w + kw).checked_sub(pad_left) else {
                                            continue;
                                        };
                                        if iw >= in_w {
                                            continue;
                                        }
                                        sum += x[[b, ic, ih, iw]] * kernel[[oc, ic, kh, kw]];
                                    }
                                }
                            }
                            sample_data[(oc * out_h + oh) * out_w + ow] = sum;
                        }
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
