/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 块配置中的激活函数选择与实例归一化开关
 */

use crate::nn::Module;
use crate::nn::layer::{ActivationFn, InstanceNormOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// 激活函数选择
///
/// 序列化形式：`null` 为 `None`，字符串为 `Name`；`Layer` 不参与序列化。
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivationSpec {
    /// 不做激活（真正的恒等层）
    None,
    /// 激活函数名称，由层引擎的名称表解析（如 "relu"）
    Name(String),
    /// 已实例化的层，原样使用（多次构建共享同一个层对象）
    #[serde(skip)]
    Layer(Arc<dyn Module>),
}

impl ActivationSpec {
    /// 用一个已实例化的层作为激活
    pub fn layer(layer: impl Module + 'static) -> Self {
        Self::Layer(Arc::new(layer))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for ActivationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Layer(layer) => f.debug_tuple("Layer").field(&layer.name()).finish(),
        }
    }
}

impl PartialEq for ActivationSpec {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Name(a), Self::Name(b)) => a == b,
            (Self::Layer(a), Self::Layer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for ActivationSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ActivationSpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<ActivationFn> for ActivationSpec {
    fn from(function: ActivationFn) -> Self {
        Self::Name(function.as_str().to_string())
    }
}

impl<T: Into<ActivationSpec>> From<Option<T>> for ActivationSpec {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

/// 实例归一化开关：布尔值，或一组自定义配置（视为开启）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstanceNormSpec {
    Flag(bool),
    Options(InstanceNormOptions),
}

impl InstanceNormSpec {
    /// 开启时返回实际使用的配置
    pub fn options(&self) -> Option<InstanceNormOptions> {
        match self {
            Self::Flag(true) => Some(InstanceNormOptions::default()),
            Self::Flag(false) => None,
            Self::Options(options) => Some(options.clone()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Flag(false))
    }
}

impl From<bool> for InstanceNormSpec {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<InstanceNormOptions> for InstanceNormSpec {
    fn from(options: InstanceNormOptions) -> Self {
        Self::Options(options)
    }
}
