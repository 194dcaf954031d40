//! 规则加载管理器
//! 负责从内置规则或本地 JSON 文件读取原始规则表

use std::path::Path;
use std::time::Instant;

use serpextract_engine::RawRuleTable;

use crate::error::{SerpError, SerpResult};
use crate::{RuleConfig, RuleOrigin};

/// 规则加载管理器
#[derive(Debug, Default)]
pub struct RuleLoader;

impl RuleLoader {
    pub fn new() -> Self {
        Self
    }

    /// 按配置加载原始规则表（同步）
    pub fn load(&self, config: &RuleConfig) -> SerpResult<RawRuleTable> {
        match &config.origin {
            RuleOrigin::Embedded => Self::load_embedded(),
            RuleOrigin::LocalFile(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    SerpError::RuleLoadError(format!("本地规则文件[{}]读取失败: {}", path.display(), e))
                })?;
                Self::parse_local(path, &content)
            }
        }
    }

    /// 按配置加载原始规则表（异步文件读取）
    #[cfg(feature = "async-io")]
    pub async fn load_async(&self, config: &RuleConfig) -> SerpResult<RawRuleTable> {
        match &config.origin {
            RuleOrigin::Embedded => Self::load_embedded(),
            RuleOrigin::LocalFile(path) => {
                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    SerpError::RuleLoadError(format!("本地规则文件[{}]读取失败: {}", path.display(), e))
                })?;
                Self::parse_local(path, &content)
            }
        }
    }

    #[cfg(feature = "embedded-rules")]
    fn load_embedded() -> SerpResult<RawRuleTable> {
        let table = RawRuleTable::from_json_str(crate::serpextract_rules::EMBEDDED_RULES_JSON)?;
        log::debug!(
            "Embedded rule table parsed: engines={} entries={}",
            table.engine_count(),
            table.entry_count()
        );
        Ok(table)
    }

    #[cfg(not(feature = "embedded-rules"))]
    fn load_embedded() -> SerpResult<RawRuleTable> {
        Err(SerpError::RuleLoadError(
            "embedded-rules feature 未启用，无法使用内置规则".into(),
        ))
    }

    fn parse_local(path: &Path, content: &str) -> SerpResult<RawRuleTable> {
        let start = Instant::now();
        let table = RawRuleTable::from_json_str(content)?;
        log::info!(
            "Local rule table loaded: path={} engines={} entries={} elapsed={:?}",
            path.display(),
            table.engine_count(),
            table.entry_count(),
            start.elapsed()
        );
        Ok(table)
    }
}
