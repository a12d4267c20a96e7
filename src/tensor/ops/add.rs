/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12 10:30:02
 * @Description  : 张量的逐元素加法，支持 NumPy 风格的广播（broadcasting）。
 *                 形状无法广播时返回错误而不是panic，残差块的跳跃连接即由此相加。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;

impl Tensor {
    /// 判断两个张量能否按 NumPy 规则广播
    ///
    /// # 广播规则
    /// - 从右向左对齐维度
    /// - 每个维度必须相等，或其中一个为 1
    /// - 维度数不同时，较短的形状前面补 1
    pub fn can_broadcast_with(&self, other: &Self) -> bool {
        self.shape()
            .iter()
            .rev()
            .zip(other.shape().iter().rev())
            .all(|(&a, &b)| a == b || a == 1 || b == 1)
    }

    /// 带形状检查的加法，形状无法广播时返回错误而不是panic
    pub fn checked_add(&self, other: &Self) -> Result<Tensor, TensorError> {
        if !self.can_broadcast_with(other) {
            return Err(TensorError::OperatorError {
                operator: Operator::Add,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            });
        }
        // ndarray 的算术运算只支持单向广播，双向广播时先把两侧都扩展到公共形状
        let target = broadcast_shape(self.shape(), other.shape());
        match (self.data.broadcast(target.clone()), other.data.broadcast(target)) {
            (Some(a), Some(b)) => Ok(Tensor {
                data: &a + &b,
            }),
            _ => Err(TensorError::IncompatibleShape),
        }
    }
}

fn broadcast_shape(a: &[usize], b: &[usize]) -> Vec<usize> {
    let rank = a.len().max(b.len());
    let dim_of = |shape: &[usize], i: usize| {
        let offset = rank - shape.len();
        if i < offset { 1 } else { shape[i - offset] }
    };
    (0..rank).map(|i| dim_of(a, i).max(dim_of(b, i))).collect()
}
