/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 由名称/块配置列表（JSON）搭建顺序网络
 *
 * ```json
 * {
 *   "layers": [
 *     { "block": "conv", "filters": 16 },
 *     { "block": { "type": "pooling", "strides": [2, 2] } },
 *     { "block": "dense", "filters": 10, "options": { "use_bias": false } }
 *   ]
 * }
 * ```
 */

use super::{Block, BlockError, BlockSpec, BuildBlock, as_block};
use crate::nn::{LayerError, LayerOptions, Module};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 网络结构中的一个块：注册名或完整的块配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockRef {
    Name(String),
    Spec(BlockSpec),
}

impl From<&str> for BlockRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for BlockRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<BlockSpec> for BlockRef {
    fn from(spec: BlockSpec) -> Self {
        Self::Spec(spec)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerEntry {
    pub block: BlockRef,
    /// 输出通道（单元）数；池化、上采样与恒等块忽略该值
    #[serde(default)]
    pub filters: usize,
    /// 构建时的透传参数
    #[serde(default)]
    pub options: LayerOptions,
}

impl LayerEntry {
    pub fn spec(&self) -> Result<BlockSpec, BlockError> {
        match &self.block {
            BlockRef::Name(name) => as_block(name.as_str()),
            BlockRef::Spec(spec) => as_block(spec.clone()),
        }
    }
}

/// 顺序网络结构描述
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureSpec {
    pub layers: Vec<LayerEntry>,
}

impl ArchitectureSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个块
    pub fn push(mut self, block: impl Into<BlockRef>, filters: usize) -> Self {
        self.layers.push(LayerEntry {
            block: block.into(),
            filters,
            options: LayerOptions::default(),
        });
        self
    }

    /// 追加一个带构建时参数的块
    pub fn push_with(
        mut self,
        block: impl Into<BlockRef>,
        filters: usize,
        options: LayerOptions,
    ) -> Self {
        self.layers.push(LayerEntry {
            block: block.into(),
            filters,
            options,
        });
        self
    }

    pub fn from_json(json: &str) -> Result<Self, BlockError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, BlockError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 逐个解析并构建所有块；任一块失败则整体失败
    pub fn build(&self) -> Result<Sequential, BlockError> {
        let blocks = self
            .layers
            .iter()
            .map(|entry| Ok(entry.spec()?.build_with(entry.filters, &entry.options)?))
            .collect::<Result<Vec<_>, BlockError>>()?;
        Ok(Sequential { blocks })
    }
}

/// 按顺序依次执行的块序列
#[derive(Debug, Default)]
pub struct Sequential {
    blocks: Vec<Block>,
}

impl Sequential {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Module for Sequential {
    fn name(&self) -> &str {
        "sequential"
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, LayerError> {
        let mut y = x.clone();
        for block in &self.blocks {
            y = block.forward(&y)?;
        }
        Ok(y)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.blocks.iter().flat_map(|b| b.parameters()).collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.blocks
            .iter_mut()
            .flat_map(|b| b.parameters_mut())
            .collect()
    }
}

impl fmt::Display for Sequential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sequential（{} 个块）", self.blocks.len())?;
        for (i, block) in self.blocks.iter().enumerate() {
            writeln!(f, "  [{i}] {:<20} 参数量: {}", block.name(), block.num_params())?;
        }
        write!(f, "  参数总量: {}", self.num_params())
    }
}
