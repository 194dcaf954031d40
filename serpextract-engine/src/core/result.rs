use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::rule::EngineRule;

/// 单次提取尝试的三态结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeywordOutcome {
    /// 未找到
    #[default]
    NotFound,
    /// 找到关键词
    Found(String),
    /// 明确为空（空查询参数或命中隐藏关键词路径），仍视为SERP
    ExplicitEmpty,
}

impl KeywordOutcome {
    /// 物化为关键词字符串，NotFound 返回 None
    pub fn into_keyword(self) -> Option<String> {
        match self {
            KeywordOutcome::NotFound => None,
            KeywordOutcome::Found(keyword) => Some(keyword),
            KeywordOutcome::ExplicitEmpty => Some(String::new()),
        }
    }
}

/// SERP 提取结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractResult {
    pub engine_name: String,
    /// 空字符串表示"是SERP但无关键词"
    pub keyword: String,
    /// 命中的规则，朴素回退产生的结果为None
    #[serde(skip)]
    pub rule: Option<Arc<EngineRule>>,
}

impl ExtractResult {
    pub fn new(engine_name: impl Into<String>, keyword: impl Into<String>, rule: Option<Arc<EngineRule>>) -> Self {
        Self {
            engine_name: engine_name.into(),
            keyword: keyword.into(),
            rule,
        }
    }
}

impl fmt::Display for ExtractResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.engine_name, self.keyword)
    }
}
