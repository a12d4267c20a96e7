//! # Only Blocks
//!
//! `only_blocks` 用纯 rust 提供一组可配置的神经网络层块（block）工厂：
//! 卷积、全连接、池化、反卷积、静态上采样、残差与恒等块，
//! 以及“名称 -> 默认块”的注册表，便于由字符串或 JSON 配置搭建网络结构。
//!
//! ```ignore
//! use only_blocks::nn::{as_block, BuildBlock, Module};
//! use only_blocks::tensor::Tensor;
//!
//! let block = as_block("conv")?.build(8)?;
//! let y = block.forward(&Tensor::zeros(&[1, 3, 16, 16]))?;
//! assert_eq!(y.shape(), &[1, 8, 16, 16]);
//! ```

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
