/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 各层块工厂的单元测试：默认配置、输出形状、参数覆盖规则与参数独立性
 */

use crate::assert_err;
use crate::nn::block::{
    ActivationSpec, Block, BlockSpec, BuildBlock, ConvolutionalBlock, DeconvolutionalBlock,
    DenseBlock, IdentityBlock, InstanceNormSpec, PoolingBlock, SingleLayer, StaticUpsampleBlock,
};
use crate::nn::layer::{Interpolation, Layer};
use crate::nn::{Init, LayerError, LayerOptions, Module, Padding};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn random_input(shape: &[usize]) -> Tensor {
    Tensor::new_random(-1., 1., shape, &mut StdRng::seed_from_u64(0))
}

fn single_layer(block: &Block) -> &SingleLayer {
    match block {
        Block::SingleLayer(single) => single,
        Block::Residual(_) => panic!("预期单层块，实际得到残差块"),
    }
}

#[test]
fn test_convolutional_block_defaults() {
    let spec = ConvolutionalBlock::default();
    assert_eq!(spec.kernel_size, (3, 3));
    assert_eq!(spec.activation, ActivationSpec::from("relu"));
    assert_eq!(spec.padding, Padding::Same);
    assert_eq!(spec.strides, (1, 1));
    assert_eq!(spec.instance_norm, InstanceNormSpec::Flag(false));

    let block = spec.build(8).unwrap();
    let y = block.forward(&random_input(&[2, 3, 16, 16])).unwrap();
    assert_eq!(y.shape(), &[2, 8, 16, 16]);
    // relu 之后没有负数
    assert!(y.to_vec().iter().all(|v| *v >= 0.));
    assert_eq!(block.num_params(), 8 * 3 * 3 * 3 + 8);
}

#[test]
fn test_convolutional_block_strides_and_kernel() {
    let block = ConvolutionalBlock::new()
        .with_kernel_size((5, 3))
        .with_strides(2)
        .build(4)
        .unwrap();
    let y = block.forward(&random_input(&[1, 2, 9, 8])).unwrap();
    assert_eq!(y.shape(), &[1, 4, 5, 4]);
    let Layer::Conv2d(conv) = single_layer(&block).layer() else {
        panic!("预期 Conv2d 层");
    };
    assert_eq!(conv.kernel_size(), (5, 3));
    assert_eq!(conv.strides(), (2, 2));
}

#[test]
fn test_config_time_values_win_over_build_time_options() {
    // 块配置 padding=same，构建时传入 padding=valid：以 same 为准
    let build_options = LayerOptions::default().with_padding(Padding::Valid);
    let block = ConvolutionalBlock::new()
        .with_padding(Padding::Same)
        .build_with(4, &build_options)
        .unwrap();
    let Layer::Conv2d(conv) = single_layer(&block).layer() else {
        panic!("预期 Conv2d 层");
    };
    assert_eq!(conv.padding(), Padding::Same);
    let y = block.forward(&random_input(&[1, 1, 6, 6])).unwrap();
    assert_eq!(y.shape(), &[1, 4, 6, 6]);

    // 透传参数：配置时的 use_bias=false 覆盖构建时的 use_bias=true，不冲突的 name 保留
    let block = ConvolutionalBlock::new()
        .with_options(LayerOptions::default().with_use_bias(false))
        .build_with(
            4,
            &LayerOptions::default().with_use_bias(true).with_name("encoder_conv"),
        )
        .unwrap();
    let Layer::Conv2d(conv) = single_layer(&block).layer() else {
        panic!("预期 Conv2d 层");
    };
    assert!(!conv.use_bias());
    assert_eq!(block.name(), "encoder_conv");
}

#[test]
fn test_builds_do_not_share_weights() {
    let spec = ConvolutionalBlock::new();
    let mut first = spec.build(3).unwrap();
    let second = spec.build(3).unwrap();
    let x = random_input(&[1, 2, 5, 5]);
    first.forward(&x).unwrap();
    let before = second.forward(&x).unwrap();

    for param in first.parameters_mut() {
        param.fill(0.);
    }
    assert_eq!(first.forward(&x).unwrap(), Tensor::zeros(&[1, 3, 5, 5]));
    assert_eq!(second.forward(&x).unwrap(), before);
    assert!(second.parameters()[0].max_abs() > 0.);
}

#[test]
fn test_seeded_builds_are_reproducible_but_independent() {
    let spec = ConvolutionalBlock::new().with_options(LayerOptions::default().with_seed(11));
    let a = spec.build(2).unwrap();
    let b = spec.build(2).unwrap();
    let x = random_input(&[1, 1, 4, 4]);
    assert_eq!(a.forward(&x).unwrap(), b.forward(&x).unwrap());
    assert!(!std::ptr::eq(a.parameters()[0], b.parameters()[0]));
}

#[test]
fn test_dense_block() {
    let spec = DenseBlock::default();
    assert_eq!(spec.activation, ActivationSpec::from("tanh"));
    let block = spec.build(5).unwrap();
    let y = block.forward(&random_input(&[3, 7])).unwrap();
    assert_eq!(y.shape(), &[3, 5]);
    assert!(y.to_vec().iter().all(|v| v.abs() < 1.));
    let Layer::Dense(dense) = single_layer(&block).layer() else {
        panic!("预期 Dense 层");
    };
    assert_eq!(dense.units(), 5);
}

#[test]
fn test_dense_block_with_instance_norm_outputs_beta() {
    // 每个 (样本, 通道) 组只有一个元素，归一化后恒为 beta（初始为 0）
    let block = DenseBlock::new()
        .with_activation(ActivationSpec::None)
        .with_instance_norm(true)
        .build(4)
        .unwrap();
    let y = block.forward(&random_input(&[2, 3])).unwrap();
    assert_eq!(y, Tensor::zeros(&[2, 4]));
}

#[test]
fn test_pooling_block() {
    let spec = PoolingBlock::default();
    assert_eq!(spec.pool_size, (2, 2));
    assert!(spec.activation.is_none());
    // 默认 same + 步长 1：空间尺寸不变，filters 被忽略
    let block = spec.build(999).unwrap();
    let x = random_input(&[1, 3, 5, 5]);
    assert_eq!(block.forward(&x).unwrap().shape(), &[1, 3, 5, 5]);
    assert_eq!(block.num_params(), 0);

    let block = PoolingBlock::new().with_strides(2).build(0).unwrap();
    assert_eq!(block.forward(&x).unwrap().shape(), &[1, 3, 3, 3]);

    let block = PoolingBlock::new()
        .with_pool_size(3)
        .with_padding(Padding::Valid)
        .with_strides(3)
        .build(0)
        .unwrap();
    assert_eq!(block.forward(&x).unwrap().shape(), &[1, 3, 1, 1]);
}

#[test]
fn test_pooling_block_rejects_unsupported_options() {
    let result = PoolingBlock::new()
        .with_options(LayerOptions::default().with_kernel_initializer(Init::Zeros))
        .build(1);
    assert_err!(
        result,
        LayerError::UnsupportedOption {
            layer: "MaxPool2d",
            option: "kernel_initializer"
        }
    );
}

#[test]
fn test_deconvolutional_block() {
    let spec = DeconvolutionalBlock::default();
    assert_eq!(spec.kernel_size, (2, 2));
    assert!(spec.activation.is_none());
    let x = random_input(&[1, 2, 4, 4]);
    assert_eq!(spec.build(6).unwrap().forward(&x).unwrap().shape(), &[1, 6, 4, 4]);

    let block = DeconvolutionalBlock::new().with_strides(2).build(6).unwrap();
    assert_eq!(block.forward(&x).unwrap().shape(), &[1, 6, 8, 8]);

    let block = DeconvolutionalBlock::new()
        .with_kernel_size(3)
        .with_padding(Padding::Valid)
        .build(1)
        .unwrap();
    assert_eq!(block.forward(&x).unwrap().shape(), &[1, 1, 6, 6]);
}

#[test]
fn test_static_upsample_block() {
    let spec = StaticUpsampleBlock::default();
    assert_eq!(spec.size, (2, 2));
    assert_eq!(spec.interpolation, Interpolation::Bilinear);
    let block = spec.build(123).unwrap();
    let x = random_input(&[2, 3, 3, 4]);
    assert_eq!(block.forward(&x).unwrap().shape(), &[2, 3, 6, 8]);

    let block = StaticUpsampleBlock::new()
        .with_size((3, 1))
        .with_interpolation(Interpolation::Nearest)
        .build(0)
        .unwrap();
    let y = block.forward(&x).unwrap();
    assert_eq!(y.shape(), &[2, 3, 9, 4]);
    assert_eq!(y[[1, 2, 8, 3]], x[[1, 2, 2, 3]]);
}

#[test]
fn test_identity_block() {
    let x = random_input(&[2, 3]);
    let block = IdentityBlock::default().build(64).unwrap();
    assert_eq!(block.forward(&x).unwrap(), x);

    let block = IdentityBlock::new().with_activation("relu").build(0).unwrap();
    assert!(block.forward(&x).unwrap().to_vec().iter().all(|v| *v >= 0.));
}

#[test]
fn test_identity_block_forwards_only_build_time_options() {
    // 配置时的 options 不传给 Identity 层
    let spec = IdentityBlock::new().with_options(LayerOptions::default().with_use_bias(false));
    assert!(spec.build(1).is_ok());

    let block = spec
        .build_with(1, &LayerOptions::default().with_name("skip"))
        .unwrap();
    assert_eq!(block.name(), "skip");

    assert_err!(
        spec.build_with(1, &LayerOptions::default().with_use_bias(false)),
        LayerError::UnsupportedOption {
            layer: "Identity",
            option: "use_bias"
        }
    );
}

#[test]
fn test_engine_errors_propagate_unchanged() {
    // 块层不做校验，层引擎的错误原样返回
    assert_err!(
        ConvolutionalBlock::new().build(0),
        LayerError::InvalidOperation(msg) if msg.contains("filters")
    );
    let block = ConvolutionalBlock::new().build(2).unwrap();
    assert_err!(block.forward(&Tensor::ones(&[4, 4])), LayerError::DimensionMismatch(4, 2));
}

#[test]
fn test_block_spec_serde() {
    let json = r#"{
        "type": "convolutional",
        "kernel_size": [5, 5],
        "activation": "sigmoid",
        "instance_norm": {"epsilon": 0.01}
    }"#;
    let spec: BlockSpec = serde_json::from_str(json).unwrap();
    let expected = ConvolutionalBlock::new()
        .with_kernel_size(5)
        .with_activation("sigmoid")
        .with_instance_norm(crate::nn::layer::InstanceNormOptions {
            epsilon: 0.01,
            ..Default::default()
        });
    assert_eq!(spec, BlockSpec::from(expected));

    let spec: BlockSpec = serde_json::from_str(r#"{"type": "dense", "activation": null}"#).unwrap();
    assert_eq!(spec, BlockSpec::from(DenseBlock::new().with_activation(ActivationSpec::None)));

    let spec: BlockSpec = StaticUpsampleBlock::new().into();
    let text = serde_json::to_string(&spec).unwrap();
    assert!(text.contains(r#""type":"static_upsample""#));
    assert_eq!(serde_json::from_str::<BlockSpec>(&text).unwrap(), spec);
}
