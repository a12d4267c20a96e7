/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : Conv2d 层单元测试（Batch-First 设计，含 PyTorch 数值对照）
 */

use crate::assert_err;
use crate::nn::layer::Conv2d;
use crate::nn::{Init, LayerError, LayerOptions, Module, Padding};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

// ==================== PyTorch 参考常量 ====================

// 简单前向传播 (batch=1, C_in=1, H=4, W=4, C_out=2, kernel=2x2, valid)
#[rustfmt::skip]
const PYTORCH_FWD_X: &[f32] = &[
    1.0, 2.0, 3.0, 4.0,
    5.0, 6.0, 7.0, 8.0,
    9.0, 10.0, 11.0, 12.0,
    13.0, 14.0, 15.0, 16.0,
];
#[rustfmt::skip]
const PYTORCH_FWD_KERNEL: &[f32] = &[
    1.0, 0.0, 0.0, 1.0,  // filter 0: 对角线
    0.0, 1.0, 1.0, 0.0,  // filter 1: 反对角线
];
const PYTORCH_FWD_BIAS: &[f32] = &[0.5, -0.5];
#[rustfmt::skip]
const PYTORCH_FWD_OUTPUT: &[f32] = &[
    7.5, 9.5, 11.5,
    15.5, 17.5, 19.5,
    23.5, 25.5, 27.5,
    6.5, 8.5, 10.5,
    14.5, 16.5, 18.5,
    22.5, 24.5, 26.5,
];

fn conv_with_reference_weights(options: &LayerOptions) -> Conv2d {
    let mut conv = Conv2d::new(2, 2, options).unwrap();
    conv.build(&[1, 1, 4, 4]).unwrap();
    conv.set_parameters(&[
        Tensor::new(PYTORCH_FWD_KERNEL, &[2, 1, 2, 2]),
        Tensor::new(PYTORCH_FWD_BIAS, &[2]),
    ])
    .unwrap();
    conv
}

#[test]
fn test_conv2d_defaults() {
    let conv = Conv2d::new(8, 3, &LayerOptions::default()).unwrap();
    assert_eq!(conv.name(), "conv2d");
    assert_eq!(conv.filters(), 8);
    assert_eq!(conv.kernel_size(), (3, 3));
    assert_eq!(conv.strides(), (1, 1));
    assert_eq!(conv.padding(), Padding::Valid);
    assert!(conv.use_bias());
    // 参数在首次前向传播前不存在
    assert!(conv.kernel().is_none());
    assert_eq!(conv.num_params(), 0);
}

#[test]
fn test_conv2d_forward_pytorch_reference() {
    let conv = conv_with_reference_weights(&LayerOptions::default());
    let x = Tensor::new(PYTORCH_FWD_X, &[1, 1, 4, 4]);
    let y = conv.forward(&x).unwrap();
    assert_eq!(y.shape(), &[1, 2, 3, 3]);
    for (actual, expected) in y.to_vec().iter().zip(PYTORCH_FWD_OUTPUT) {
        assert_abs_diff_eq!(actual, expected, epsilon = 1e-5);
    }
}

#[test]
fn test_conv2d_same_padding_pads_bottom_right() {
    // 2x2 卷积核、步长 1：总填充量为 1，全部落在下/右侧
    let conv = conv_with_reference_weights(&LayerOptions::default().with_padding(Padding::Same));
    let x = Tensor::new(PYTORCH_FWD_X, &[1, 1, 4, 4]);
    let y = conv.forward(&x).unwrap();
    assert_eq!(y.shape(), &[1, 2, 4, 4]);
    // 左上角与 valid 一致
    assert_abs_diff_eq!(y[[0, 0, 0, 0]], 7.5, epsilon = 1e-5);
    // 右下角只覆盖到 x[3][3]
    assert_abs_diff_eq!(y[[0, 0, 3, 3]], 16.5, epsilon = 1e-5);
    assert_abs_diff_eq!(y[[0, 1, 3, 3]], -0.5, epsilon = 1e-5);
}

#[test]
fn test_conv2d_strided_output_shape() {
    let options = LayerOptions::default()
        .with_padding(Padding::Same)
        .with_strides(2)
        .with_seed(1);
    let conv = Conv2d::new(4, 3, &options).unwrap();
    let y = conv.forward(&Tensor::ones(&[2, 3, 5, 5])).unwrap();
    assert_eq!(y.shape(), &[2, 4, 3, 3]);
    assert_eq!(conv.kernel().unwrap().shape(), &[4, 3, 3, 3]);
    assert_eq!(conv.bias().unwrap().shape(), &[4]);
    assert_eq!(conv.num_params(), 4 * 3 * 3 * 3 + 4);
}

#[test]
fn test_conv2d_batch_samples_are_independent() {
    let conv = conv_with_reference_weights(&LayerOptions::default());
    let mut data = PYTORCH_FWD_X.to_vec();
    data.extend(PYTORCH_FWD_X.iter().map(|v| v * 2.0));
    let y = conv.forward(&Tensor::new(&data, &[2, 1, 4, 4])).unwrap();
    assert_eq!(y.shape(), &[2, 2, 3, 3]);
    // 第二个样本：2 * (x11 + x22) + 0.5
    assert_abs_diff_eq!(y[[1, 0, 0, 0]], 14.5, epsilon = 1e-5);
}

#[test]
fn test_conv2d_seed_is_reproducible() {
    let options = LayerOptions::default().with_seed(42);
    let x = Tensor::ones(&[1, 2, 5, 5]);
    let a = Conv2d::new(3, 3, &options).unwrap();
    let b = Conv2d::new(3, 3, &options).unwrap();
    assert_eq!(a.forward(&x).unwrap(), b.forward(&x).unwrap());
}

#[test]
fn test_conv2d_initializers_and_no_bias() {
    let options = LayerOptions::default()
        .with_use_bias(false)
        .with_kernel_initializer(Init::Constant(0.5));
    let conv = Conv2d::new(1, 2, &options).unwrap();
    let y = conv.forward(&Tensor::ones(&[1, 1, 3, 3])).unwrap();
    assert!(conv.bias().is_none());
    assert_eq!(conv.parameters().len(), 1);
    assert_eq!(y.to_vec(), vec![2.0; 4]);
}

#[test]
fn test_conv2d_errors() {
    assert_err!(
        Conv2d::new(0, 3, &LayerOptions::default()),
        LayerError::InvalidOperation(msg) if msg.contains("filters")
    );

    let conv = Conv2d::new(2, 3, &LayerOptions::default()).unwrap();
    assert_err!(conv.forward(&Tensor::ones(&[3, 5, 5])), LayerError::DimensionMismatch(4, 3));
    // valid 填充下输入小于卷积核
    assert_err!(
        conv.forward(&Tensor::ones(&[1, 1, 2, 2])),
        LayerError::InvalidOperation(_)
    );

    // 参数已按 1 个输入通道创建，之后输入 2 通道报错
    conv.forward(&Tensor::ones(&[1, 1, 4, 4])).unwrap();
    assert_err!(
        conv.forward(&Tensor::ones(&[1, 2, 4, 4])),
        LayerError::ShapeMismatch([1], [2], "conv2d 已按 1 个输入通道创建参数")
    );
}
