/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12
 * @Description  : Module trait 定义
 */

use super::LayerError;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;
use std::fmt::Debug;

/// 模块 trait：层引擎中所有层（以及由层组合成的块）的公共接口
///
/// # 设计原则
/// - `new()` **不是** trait 方法（参数各异）
/// - `forward()` 统一为 `&Tensor -> Result<Tensor, LayerError>`，不修改输入
/// - 带权重的层在首次 `forward()` 时才按输入形状创建参数，因此 `parameters()`
///   在首次前向传播之前可能为空
/// - 要求 `Send + Sync`，以便块规格（可能持有自定义激活层）存放于全局注册表
///
/// # 使用示例
///
/// ```ignore
/// use only_blocks::nn::{Module, layer::Conv2d, LayerOptions};
///
/// let conv = Conv2d::new(16, (3, 3), &LayerOptions::default())?;
/// let y = conv.forward(&x)?;
/// assert_eq!(conv.num_params(), 16 * 3 * 3 * 3 + 16); // x 为 3 通道
/// ```
#[enum_dispatch]
pub trait Module: Send + Sync + Debug {
    /// 层名称
    fn name(&self) -> &str;

    /// 前向传播
    fn forward(&self, x: &Tensor) -> Result<Tensor, LayerError>;

    /// 获取所有（已创建的）可训练参数
    fn parameters(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    /// 获取所有（已创建的）可训练参数的可变引用，顺序与 `parameters()` 一致
    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        Vec::new()
    }

    /// 获取参数（标量）总数
    fn num_params(&self) -> usize {
        self.parameters().iter().map(|p| p.size()).sum()
    }

    /// 覆盖全部参数，数量与各自形状都须与 `parameters()` 一致
    fn set_parameters(&mut self, values: &[Tensor]) -> Result<(), LayerError> {
        let name = self.name().to_string();
        let mut params = self.parameters_mut();
        if params.len() != values.len() {
            return Err(LayerError::InvalidOperation(format!(
                "{name} 有 {} 个参数（尚未前向传播的层参数为空），但提供了 {} 个",
                params.len(),
                values.len()
            )));
        }
        for (param, value) in params.iter_mut().zip(values) {
            if !param.is_same_shape(value) {
                return Err(LayerError::ShapeMismatch {
                    expected: param.shape().to_vec(),
                    got: value.shape().to_vec(),
                    message: format!("{name} 的参数形状不一致"),
                });
            }
            **param = value.clone();
        }
        Ok(())
    }
}
