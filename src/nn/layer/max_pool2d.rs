/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12
 * @Description  : MaxPool2d (2D 最大池化) 层
 *
 * - 输入格式：[batch_size, channels, H, W]
 * - 输出格式：[batch_size, channels, H', W']
 * - 无可学习参数
 * - 步长未指定时默认等于池化窗口大小；same 填充时填充位置永远不会成为最大值
 */

use super::{IntoPair, LayerOptions, Padding, check_rank, output_len_or_err};
use crate::nn::{LayerError, Module};
use crate::tensor::Tensor;

const SUPPORTED_OPTIONS: &[&str] = &["padding", "strides", "name"];

/// MaxPool2d (2D 最大池化) 层
#[derive(Debug)]
pub struct MaxPool2d {
    pool_size: (usize, usize),
    strides: (usize, usize),
    padding: Padding,
    name: String,
}

impl MaxPool2d {
    /// # 参数
    /// - `pool_size`: 池化窗口大小，`2` 或 `(2, 2)`
    /// - `options`: 透传参数；未给出时 padding 为 valid，步长等于 `pool_size`
    pub fn new(pool_size: impl IntoPair, options: &LayerOptions) -> Result<Self, LayerError> {
        options.ensure_supported("MaxPool2d", SUPPORTED_OPTIONS)?;
        let pool_size = pool_size.into_pair();
        let strides = options.strides.unwrap_or(pool_size);
        if pool_size.0 == 0 || pool_size.1 == 0 || strides.0 == 0 || strides.1 == 0 {
            return Err(LayerError::InvalidOperation(format!(
                "MaxPool2d 的窗口 {pool_size:?} 与步长 {strides:?} 都必须为正"
            )));
        }
        Ok(Self {
            pool_size,
            strides,
            padding: options.padding.unwrap_or(Padding::Valid),
            name: options.name.clone().unwrap_or_else(|| "max_pool2d".to_string()),
        })
    }

    pub fn pool_size(&self) -> (usize, usize) {
        self.pool_size
    }

    pub fn strides(&self) -> (usize, usize) {
        self.strides
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }
}

impl Module for MaxPool2d {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, LayerError> {
        check_rank(x, 4, &self.name, "[batch, C, H, W]")?;
        let (batch_size, c, in_h, in_w) =
            (x.shape()[0], x.shape()[1], x.shape()[2], x.shape()[3]);
        let (k_h, k_w) = self.pool_size;
        let (s_h, s_w) = self.strides;
        let out_h =
            output_len_or_err(self.padding.output_len(in_h, k_h, s_h), &self.name, in_h, k_h)?;
        let out_w =
            output_len_or_err(self.padding.output_len(in_w, k_w, s_w), &self.name, in_w, k_w)?;
        let pad_top = self.padding.pad_before(in_h, k_h, s_h);
        let pad_left = self.padding.pad_before(in_w, k_w, s_w);

        let mut output = Tensor::zeros(&[batch_size, c, out_h, out_w]);
        for b in 0..batch_size {
            for ci in 0..c {
                for oh in 0..out_h {
                    // 窗口与输入有效区域的交集
                    let h_start = (oh * s_h).saturating_sub(pad_top);
                    let h_end = (oh * s_h + k_h).saturating_sub(pad_top).min(in_h);
                    for ow in 0..out_w {
                        let w_start = (ow * s_w).saturating_sub(pad_left);
                        let w_end = (ow * s_w + k_w).saturating_sub(pad_left).min(in_w);
                        let mut max_val = f32::NEG_INFINITY;
                        for ih in h_start..h_end {
                            for iw in w_start..w_end {
                                max_val = max_val.max(x[[b, ci, ih, iw]]);
                            }
                        }
                        output[[b, ci, oh, ow]] = max_val;
                    }
                }
            }
        }
        Ok(output)
    }
}
