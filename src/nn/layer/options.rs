/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 层的透传参数（keyword options）及其合并规则
 *
 * 块（block）在“配置时”与“构建时”都可以携带 LayerOptions，合并时配置时的取值优先：
 *   effective = config_options.merged_over(&build_options)
 * 块自身显式声明的超参数（kernel_size、padding、strides……）又优先于两者。
 */

use crate::nn::{Init, LayerError};
use serde::{Deserialize, Serialize};

/// 透传给具体层构造函数的可选参数，未设置（None）的项使用层的默认值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerOptions {
    /// 填充方式（卷积/反卷积/池化）
    pub padding: Option<super::Padding>,
    /// 步长 (sH, sW)（卷积/反卷积/池化）
    pub strides: Option<(usize, usize)>,
    /// 是否使用偏置（默认 true）
    pub use_bias: Option<bool>,
    /// 权重（核）初始化，默认 Xavier
    pub kernel_initializer: Option<Init>,
    /// 偏置初始化，默认全零
    pub bias_initializer: Option<Init>,
    /// 初始化随机种子，设置后参数可复现
    pub seed: Option<u64>,
    /// 层名称
    pub name: Option<String>,
}

impl LayerOptions {
    /// 以 `self` 为准合并：`self` 中已设置的项覆盖 `base` 中的同名项
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            padding: self.padding.or(base.padding),
            strides: self.strides.or(base.strides),
            use_bias: self.use_bias.or(base.use_bias),
            kernel_initializer: self
                .kernel_initializer
                .clone()
                .or_else(|| base.kernel_initializer.clone()),
            bias_initializer: self
                .bias_initializer
                .clone()
                .or_else(|| base.bias_initializer.clone()),
            seed: self.seed.or(base.seed),
            name: self.name.clone().or_else(|| base.name.clone()),
        }
    }

    pub fn with_padding(mut self, padding: super::Padding) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn with_strides(mut self, strides: impl super::IntoPair) -> Self {
        self.strides = Some(strides.into_pair());
        self
    }

    pub fn with_use_bias(mut self, use_bias: bool) -> Self {
        self.use_bias = Some(use_bias);
        self
    }

    pub fn with_kernel_initializer(mut self, init: Init) -> Self {
        self.kernel_initializer = Some(init);
        self
    }

    pub fn with_bias_initializer(mut self, init: Init) -> Self {
        self.bias_initializer = Some(init);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 已设置的参数名列表
    pub fn set_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.padding.is_some() {
            keys.push("padding");
        }
        if self.strides.is_some() {
            keys.push("strides");
        }
        if self.use_bias.is_some() {
            keys.push("use_bias");
        }
        if self.kernel_initializer.is_some() {
            keys.push("kernel_initializer");
        }
        if self.bias_initializer.is_some() {
            keys.push("bias_initializer");
        }
        if self.seed.is_some() {
            keys.push("seed");
        }
        if self.name.is_some() {
            keys.push("name");
        }
        keys
    }

    /// 检查是否设置了 `layer` 不接受的参数，并校验初始化器的分布参数
    pub(crate) fn ensure_supported(
        &self,
        layer: &'static str,
        supported: &[&str],
    ) -> Result<(), LayerError> {
        if let Some(option) = self.set_keys().into_iter().find(|k| !supported.contains(k)) {
            return Err(LayerError::UnsupportedOption { layer, option });
        }
        for init in [&self.kernel_initializer, &self.bias_initializer].into_iter().flatten() {
            init.validate()?;
        }
        Ok(())
    }
}
