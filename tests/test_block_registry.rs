/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 块注册表集成测试：每个注册名都能解析、构建并前向传播
 */

use only_blocks::nn::{BlockError, BlockKind, BuildBlock, Module, REGISTRY, as_block};
use only_blocks::tensor::Tensor;

#[test]
fn test_every_registry_key_builds_and_runs() -> Result<(), BlockError> {
    println!("\n{}", "=".repeat(60));
    println!("=== 块注册表集成测试 ===");
    println!("{}\n", "=".repeat(60));

    let image = Tensor::ones(&[2, 3, 8, 8]);
    let features = Tensor::ones(&[2, 6]);

    for name in REGISTRY.names() {
        let kind: BlockKind = name.parse()?;
        let block = as_block(name)?.build(4)?;
        let x = match kind {
            BlockKind::Dense => &features,
            _ => &image,
        };
        let y = block.forward(x)?;
        println!("{name:<16} -> {:<20} 输出形状: {:?}", block.name(), y.shape());

        let expected: &[usize] = match kind {
            BlockKind::Convolutional | BlockKind::Deconvolutional => &[2, 4, 8, 8],
            BlockKind::Dense => &[2, 4],
            BlockKind::Pooling | BlockKind::Identity => &[2, 3, 8, 8],
        };
        assert_eq!(y.shape(), expected, "注册名 `{name}` 的输出形状不符");
    }
    Ok(())
}

#[test]
fn test_unknown_name_reports_valid_names() {
    let err = as_block("transformer").unwrap_err();
    let message = err.to_string();
    println!("{message}");
    assert!(matches!(err, BlockError::NameResolution { .. }));
    for name in REGISTRY.names() {
        assert!(message.contains(name));
    }
}
