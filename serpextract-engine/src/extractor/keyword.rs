use std::sync::Arc;

use crate::core::{EngineRule, ExtractResult, Extractor, KeywordOutcome};
use crate::url::{QueryMap, SerpUrl};
use crate::utils::preview_url;

use super::google;

/// 关键词提取器：在已解析出的引擎规则上执行提取策略
pub struct KeywordExtractor;

impl KeywordExtractor {
    /// 返回None表示"识别出引擎但无关键词且不属于隐藏关键词形态"
    pub fn extract(rule: &Arc<EngineRule>, url: &SerpUrl) -> Option<ExtractResult> {
        let query_string = url.search_query_string();
        let query = QueryMap::parse(&query_string, true);

        let special = google::apply(rule.engine_name(), url, &query_string, query);
        if let Some(keyword) = special.keyword {
            return Some(ExtractResult::new(special.engine_name, keyword, Some(Arc::clone(rule))));
        }

        let mut outcome = Self::run_extractors(rule.extractors(), url, &special.query);

        if !matches!(outcome, KeywordOutcome::Found(_)) && !rule.hidden_keyword_paths().is_empty() {
            let probe = url.path_with_query_and_fragment();
            if rule.hidden_keyword_paths().iter().any(|hidden| hidden.is_match(&probe)) {
                outcome = KeywordOutcome::ExplicitEmpty;
            }
        }

        match outcome.into_keyword() {
            Some(keyword) => Some(ExtractResult::new(special.engine_name, keyword, Some(Arc::clone(rule)))),
            None => {
                let raw = url.to_string();
                log::debug!(
                    "No keyword extracted: engine={} url={}",
                    rule.engine_name(),
                    preview_url(&raw)
                );
                None
            }
        }
    }

    /// 按声明顺序尝试提取器，首个给出确定结果者胜出
    /// 路径正则一旦命中即停止（捕获组1未参与匹配时结果为NotFound）
    fn run_extractors(extractors: &[Extractor], url: &SerpUrl, query: &QueryMap) -> KeywordOutcome {
        for extractor in extractors {
            match extractor {
                Extractor::PathPattern(re) => {
                    if let Some(caps) = re.captures(&url.path) {
                        return caps
                            .get(1)
                            .map(|m| KeywordOutcome::Found(m.as_str().to_string()))
                            .unwrap_or_default();
                    }
                }
                Extractor::QueryParam(name) => {
                    if let Some(value) = query.last(name) {
                        return if value.is_empty() {
                            KeywordOutcome::ExplicitEmpty
                        } else {
                            KeywordOutcome::Found(value.to_string())
                        };
                    }
                }
            }
        }
        KeywordOutcome::NotFound
    }
}
