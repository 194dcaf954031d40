//! 全局规则配置管理

use std::path::PathBuf;

/// 规则来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOrigin {
    Embedded,           // 内置规则（编译期 include_str!）
    LocalFile(PathBuf), // 本地 JSON 规则文件（运行时）
}

/// 关键词提取选项
/// 后处理顺序固定：小写 → 去首尾空白 → 折叠连续空白
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub lower_case: bool,
    pub trim: bool,
    pub collapse_whitespace: bool,
    /// 规则表未命中时是否启用朴素回退
    pub use_naive: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            lower_case: true,
            trim: true,
            collapse_whitespace: true,
            use_naive: false,
        }
    }
}

impl ExtractOptions {
    /// 关闭全部后处理，保留原始关键词
    pub fn raw() -> Self {
        Self {
            lower_case: false,
            trim: false,
            collapse_whitespace: false,
            use_naive: false,
        }
    }

    pub fn with_naive(mut self, use_naive: bool) -> Self {
        self.use_naive = use_naive;
        self
    }
}

/// 完整规则配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub origin: RuleOrigin,
    pub options: ExtractOptions,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            origin: RuleOrigin::Embedded,
            options: ExtractOptions::default(),
        }
    }
}

impl RuleConfig {
    /// 内置规则
    pub fn embedded() -> Self {
        Self::default()
    }

    /// 本地规则文件
    pub fn local_file(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: RuleOrigin::LocalFile(path.into()),
            options: ExtractOptions::default(),
        }
    }
}

/// 自定义构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: RuleConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(mut self, origin: RuleOrigin) -> Self {
        self.config.origin = origin;
        self
    }

    pub fn lower_case(mut self, enabled: bool) -> Self {
        self.config.options.lower_case = enabled;
        self
    }

    pub fn trim(mut self, enabled: bool) -> Self {
        self.config.options.trim = enabled;
        self
    }

    pub fn collapse_whitespace(mut self, enabled: bool) -> Self {
        self.config.options.collapse_whitespace = enabled;
        self
    }

    pub fn use_naive(mut self, enabled: bool) -> Self {
        self.config.options.use_naive = enabled;
        self
    }

    pub fn build(self) -> RuleConfig {
        self.config
    }
}
