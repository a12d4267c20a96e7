/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : Identity 层：原样返回输入，无参数
 */

use super::LayerOptions;
use crate::nn::{LayerError, Module};
use crate::tensor::Tensor;

const SUPPORTED_OPTIONS: &[&str] = &["name"];

#[derive(Debug)]
pub struct Identity {
    name: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "identity".to_string(),
        }
    }
}

impl Identity {
    pub fn new(options: &LayerOptions) -> Result<Self, LayerError> {
        options.ensure_supported("Identity", SUPPORTED_OPTIONS)?;
        Ok(options
            .name
            .clone()
            .map_or_else(Self::default, |name| Self { name }))
    }
}

impl Module for Identity {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, LayerError> {
        Ok(x.clone())
    }
}
