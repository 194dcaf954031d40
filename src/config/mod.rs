//! 配置模块
pub mod rule;

pub use rule::{CustomConfigBuilder, ExtractOptions, RuleConfig, RuleOrigin};
