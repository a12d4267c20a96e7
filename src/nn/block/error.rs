//! 层块（block）解析与搭建相关错误类型定义

use crate::nn::LayerError;
use thiserror::Error;

/// 层块解析与搭建相关错误
#[derive(Debug, Error)]
pub enum BlockError {
    /// 注册表中没有该名称
    #[error("无效的块名称 `{name}`，可用的名称有: {}", .valid.join(", "))]
    NameResolution { name: String, valid: Vec<String> },

    /// 传入的是已构建的块/层，而不是尚未构建的块规格
    #[error("层块应为尚未构建的块规格（BlockSpec），实际得到{0}")]
    TypeMismatch(String),

    /// 层引擎错误（原样透传）
    #[error(transparent)]
    Layer(#[from] LayerError),

    /// 网络结构配置解析失败
    #[error("网络结构配置解析失败: {0}")]
    Config(#[from] serde_json::Error),
}
