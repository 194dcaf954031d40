// 内核错误定义
pub mod error;
// 核心数据模型：原始规则表+编译后规则+提取结果
pub mod core;
// 规则表编译+匹配键索引
pub mod indexer;
// 域名→规则解析
pub mod resolver;
// 关键词提取+朴素回退
pub mod extractor;
// URL 结构化解析+查询串解码
pub mod url;
// 工具：日志预览+域名拆分
pub mod utils;

// 顶层导出常用类型
pub use crate::core::{
    EngineRule, EngineRuleBuilder, ExtractResult, Extractor, HiddenKeyword, KeywordOutcome,
    RawEngineDefinition, RawEngineGroup, RawRuleTable, StringOrList, DEFAULT_CHARSET,
};
pub use error::{CoreError, CoreResult};
pub use extractor::{KeywordExtractor, NaiveFallback};
pub use indexer::{EngineIndex, RuleCompiler};
pub use resolver::DomainResolver;
pub use crate::url::{QueryMap, SerpUrl};
