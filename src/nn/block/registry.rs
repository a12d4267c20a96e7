/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 块名称注册表：字符串名称 -> 默认配置的块
 */

use super::{BlockError, BlockSpec, ConvolutionalBlock, DeconvolutionalBlock, DenseBlock};
use super::{IdentityBlock, PoolingBlock};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// 注册表中可用的块种类（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Convolutional,
    Dense,
    Pooling,
    Deconvolutional,
    Identity,
}

impl BlockKind {
    /// 所有注册名及其对应种类，顺序即注册表顺序
    ///
    /// 注意："upsample" 对应的是反卷积块而非静态上采样块。
    pub const NAMES: [(&'static str, BlockKind); 10] = [
        ("conv", BlockKind::Convolutional),
        ("convolutional", BlockKind::Convolutional),
        ("dense", BlockKind::Dense),
        ("pool", BlockKind::Pooling),
        ("pooling", BlockKind::Pooling),
        ("upsample", BlockKind::Deconvolutional),
        ("deconv", BlockKind::Deconvolutional),
        ("deconvolutional", BlockKind::Deconvolutional),
        ("none", BlockKind::Identity),
        ("identity", BlockKind::Identity),
    ];

    /// 该种类的默认块配置
    pub fn default_spec(self) -> BlockSpec {
        match self {
            BlockKind::Convolutional => ConvolutionalBlock::default().into(),
            BlockKind::Dense => DenseBlock::default().into(),
            BlockKind::Pooling => PoolingBlock::default().into(),
            BlockKind::Deconvolutional => DeconvolutionalBlock::default().into(),
            BlockKind::Identity => IdentityBlock::default().into(),
        }
    }

    /// 映射到该种类的所有注册名
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(_, kind)| *kind == self)
            .map(|(name, _)| *name)
            .collect()
    }

    fn valid_names() -> Vec<String> {
        Self::NAMES.iter().map(|(name, _)| name.to_string()).collect()
    }
}

impl FromStr for BlockKind {
    type Err = BlockError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| BlockError::NameResolution {
                name: name.to_string(),
                valid: Self::valid_names(),
            })
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 种类的首个注册名即其规范名称
        let name = self.names().first().copied().unwrap_or_default();
        write!(f, "{name}")
    }
}

/// 只读的名称注册表，进程内首次访问时创建一次
#[derive(Debug)]
pub struct Registry {
    entries: Vec<(&'static str, BlockSpec)>,
}

impl Registry {
    fn new() -> Self {
        Self {
            entries: BlockKind::NAMES
                .iter()
                .map(|(name, kind)| (*name, kind.default_spec()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&BlockSpec> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, spec)| spec)
    }

    /// 所有注册名，按注册顺序
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &BlockSpec)> {
        self.entries.iter().map(|(name, spec)| (*name, spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按名称取出默认配置的副本
    pub fn resolve(&self, name: &str) -> Result<BlockSpec, BlockError> {
        self.get(name).cloned().ok_or_else(|| BlockError::NameResolution {
            name: name.to_string(),
            valid: self.names().iter().map(|n| n.to_string()).collect(),
        })
    }
}

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);
