use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::ExtractResult;
use crate::url::{QueryMap, SerpUrl};
use crate::utils::domain_label;

/// 主机名中出现 `search.`（可带前导点）即视为疑似搜索站点
static NAIVE_HOST_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.?search\.").unwrap());

/// 按优先级尝试的常见关键词参数名
pub const NAIVE_PARAMS: &[&str] = &["q", "query", "k", "keyword", "term"];

/// 朴素回退：规则表未覆盖的域名上做启发式提取
/// 仅使用 query（不含 fragment），结果不携带规则
pub struct NaiveFallback;

impl NaiveFallback {
    #[inline]
    pub fn is_candidate_host(host: &str) -> bool {
        NAIVE_HOST_REGEX.is_match(host)
    }

    pub fn extract(url: &SerpUrl) -> Option<ExtractResult> {
        if !Self::is_candidate_host(&url.netloc) {
            return None;
        }

        let query = QueryMap::parse(&url.query, true);
        let keyword = NAIVE_PARAMS.iter().find_map(|param| query.first(param))?;
        let engine_name = domain_label(&url.netloc).unwrap_or_default();

        log::debug!("Naive fallback matched: host={} engine={}", url.netloc, engine_name);
        Some(ExtractResult::new(engine_name, keyword, None))
    }
}
