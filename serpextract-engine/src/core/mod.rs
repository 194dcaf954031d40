//! 核心数据模型：原始规则表 / 编译后规则 / 提取结果
pub mod raw;
pub mod result;
pub mod rule;

pub use raw::{RawEngineDefinition, RawEngineGroup, RawRuleTable, StringOrList};
pub use result::{ExtractResult, KeywordOutcome};
pub use rule::{EngineRule, EngineRuleBuilder, Extractor, HiddenKeyword, DEFAULT_CHARSET};
