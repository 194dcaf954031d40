//! serpextract - 搜索引擎结果页（SERP）识别与搜索关键词提取

pub mod config;
pub mod detector;
pub mod error;
pub mod rule;
pub mod utils;

// 导出全局错误类型
pub use self::error::{SerpError, SerpResult};

// 导出配置模块核心结构体与构建器
pub use crate::config::rule::{CustomConfigBuilder, ExtractOptions, RuleConfig, RuleOrigin};

// 导出规则加载器
pub use crate::rule::RuleLoader;

// 导出关键词后处理工具
pub use crate::utils::KeywordNormalizer;

// 导出检测模块核心接口（检测器实例 + 全局单例便捷接口）
pub use crate::detector::{
    all_query_params, all_query_params_by_domain, extract, init_global_detector,
    init_global_detector_with_rules, is_serp, register_custom_rule, resolve_rule, SerpDetector,
};

// 导出内核常用类型
pub use serpextract_engine::{
    CoreError, EngineIndex, EngineRule, EngineRuleBuilder, ExtractResult, Extractor,
    HiddenKeyword, RawEngineDefinition, RawRuleTable, SerpUrl,
};

// 嵌入式规则表 - 仅在开启embedded-rules特性时编译
#[cfg(feature = "embedded-rules")]
pub mod serpextract_rules {
    use once_cell::sync::Lazy;
    use serpextract_engine::{EngineIndex, RawRuleTable, RuleCompiler};
    use std::sync::Arc;

    /// 编译期嵌入的原始规则表（JSON）
    pub static EMBEDDED_RULES_JSON: &str = include_str!("../data/search_engines.json");

    /// 全局懒加载的已编译内置规则索引 - 首次访问时编译，进程内仅一份，线程安全
    pub static EMBEDDED_ENGINE_INDEX: Lazy<Arc<EngineIndex>> = Lazy::new(|| {
        let table = RawRuleTable::from_json_str(EMBEDDED_RULES_JSON).unwrap_or_else(|e| {
            log::error!("Embedded rule table parse failed, fallback to empty index: error={}", e);
            RawRuleTable::default()
        });
        Arc::new(RuleCompiler::compile(&table))
    });
}
