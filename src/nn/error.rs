/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 层引擎（nn::layer）的错误类型
 */

use crate::errors::TensorError;
use thiserror::Error;

/// 层构建、前向传播相关错误
#[derive(Debug, Error, PartialEq)]
pub enum LayerError {
    /// 形状不匹配
    #[error("形状不匹配: 期望 {expected:?}, 实际 {got:?}。{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },

    /// 维度（阶数）不匹配
    #[error("维度不匹配: 期望 {expected} 阶, 实际 {got} 阶。{message}")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        message: String,
    },

    /// 无效操作（如非法的超参数）
    #[error("无效操作: {0}")]
    InvalidOperation(String),

    /// 激活函数名称无法识别
    #[error("未知的激活函数 `{name}`，可用的有: {}", .valid.join(", "))]
    UnknownActivation { name: String, valid: Vec<String> },

    /// 填充方式无法识别
    #[error("未知的填充方式 `{0}`，可用的有: same, valid")]
    UnknownPadding(String),

    /// 插值方式无法识别
    #[error("未知的插值方式 `{0}`，可用的有: nearest, bilinear")]
    UnknownInterpolation(String),

    /// 层不接受某个透传参数
    #[error("{layer} 不接受参数 `{option}`")]
    UnsupportedOption {
        layer: &'static str,
        option: &'static str,
    },

    /// 张量运算错误
    #[error(transparent)]
    Tensor(#[from] TensorError),
}
