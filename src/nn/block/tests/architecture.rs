/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 由 JSON / 名称列表搭建顺序网络的单元测试
 */

use crate::assert_err;
use crate::nn::block::{
    ArchitectureSpec, BlockError, BlockRef, BlockSpec, ConvolutionalBlock, PoolingBlock,
    ResidualBlock, Sequential,
};
use crate::nn::{ActivationSpec, LayerError, LayerOptions, Module};
use crate::tensor::Tensor;

const ENCODER_JSON: &str = r#"{
    "layers": [
        { "block": "conv", "filters": 8 },
        { "block": { "type": "pooling", "strides": [2, 2] } },
        { "block": { "type": "residual", "instance_norm": false }, "filters": 8 },
        { "block": "upsample", "filters": 4, "options": { "seed": 1 } }
    ]
}"#;

#[test]
fn test_architecture_from_json() {
    let arch = ArchitectureSpec::from_json(ENCODER_JSON).unwrap();
    assert_eq!(arch.layers.len(), 4);
    assert_eq!(arch.layers[0].block, BlockRef::Name("conv".to_string()));
    assert_eq!(arch.layers[1].filters, 0);
    assert_eq!(
        arch.layers[1].block,
        BlockRef::Spec(PoolingBlock::new().with_strides(2).into())
    );
    assert_eq!(arch.layers[3].options, LayerOptions::default().with_seed(1));

    let net = arch.build().unwrap();
    assert_eq!(net.len(), 4);
    let y = net.forward(&Tensor::ones(&[1, 3, 8, 8])).unwrap();
    assert_eq!(y.shape(), &[1, 4, 4, 4]);
}

#[test]
fn test_architecture_builder_matches_json() {
    let arch = ArchitectureSpec::new()
        .push("conv", 8)
        .push(BlockSpec::from(PoolingBlock::new().with_strides(2)), 0)
        .push(BlockSpec::from(ResidualBlock::new().with_instance_norm(false)), 8)
        .push_with("upsample", 4, LayerOptions::default().with_seed(1));
    assert_eq!(arch, ArchitectureSpec::from_json(ENCODER_JSON).unwrap());

    let text = arch.to_json().unwrap();
    assert_eq!(ArchitectureSpec::from_json(&text).unwrap(), arch);
}

#[test]
fn test_architecture_entries_resolve_through_registry() {
    let arch = ArchitectureSpec::new().push("dense", 3);
    assert_eq!(
        arch.layers[0].spec().unwrap(),
        BlockSpec::from(crate::nn::DenseBlock::default())
    );
    let net = arch.build().unwrap();
    let y = net.forward(&Tensor::ones(&[2, 5])).unwrap();
    assert_eq!(y.shape(), &[2, 3]);
}

#[test]
fn test_architecture_errors() {
    let arch = ArchitectureSpec::new().push("conv", 4).push("conv3d", 4);
    assert_err!(arch.build(), BlockError::NameResolution("conv3d"));

    assert_err!(ArchitectureSpec::from_json("{\"layers\": 3}"), BlockError::Config(_));

    // 层引擎错误包装为 BlockError::Layer
    let arch = ArchitectureSpec::new().push("conv", 0);
    assert_err!(
        arch.build(),
        BlockError::Layer(LayerError::InvalidOperation(_))
    );

    // 已实例化的激活层不能序列化
    let spec = ConvolutionalBlock::new()
        .with_activation(ActivationSpec::layer(crate::nn::layer::Identity::default()));
    let arch = ArchitectureSpec::new().push(BlockSpec::from(spec), 2);
    assert_err!(arch.to_json(), BlockError::Config(_));
}

#[test]
fn test_architecture_rejects_invalid_initializers() {
    let arch = ArchitectureSpec::from_json(
        r#"{ "layers": [
            { "block": "conv", "filters": 2,
              "options": { "kernel_initializer": { "normal": { "mean": 0.0, "std": 0.0 } } } }
        ] }"#,
    )
    .unwrap();
    assert_err!(
        arch.build(),
        BlockError::Layer(LayerError::InvalidOperation(msg)) if msg.contains("std")
    );

    let arch = ArchitectureSpec::from_json(
        r#"{ "layers": [
            { "block": "dense", "filters": 2,
              "options": { "bias_initializer": { "uniform": { "low": 1.0, "high": -1.0 } } } }
        ] }"#,
    )
    .unwrap();
    assert_err!(
        arch.build(),
        BlockError::Layer(LayerError::InvalidOperation(msg)) if msg.contains("low <= high")
    );
}

#[test]
fn test_sequential_forward_and_summary() {
    let mut net = Sequential::new();
    assert!(net.is_empty());
    assert_eq!(net.forward(&Tensor::ones(&[1, 2])).unwrap(), Tensor::ones(&[1, 2]));

    net.push(
        crate::nn::BuildBlock::build_with(
            &ConvolutionalBlock::new(),
            2,
            &LayerOptions::default().with_name("stem"),
        )
        .unwrap(),
    );
    net.forward(&Tensor::ones(&[1, 1, 4, 4])).unwrap();
    assert_eq!(net.num_params(), 2 * 9 + 2);
    assert_eq!(net.blocks().len(), 1);

    let summary = net.to_string();
    assert!(summary.starts_with("Sequential（1 个块）"));
    assert!(summary.contains("[0] stem"));
    assert!(summary.contains("参数总量: 20"));
}
