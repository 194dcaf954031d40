//! 域名解析：Referrer URL → 适用的引擎规则
//! 优先级（先命中者胜出）：
//! 1. `host + path` 精确键
//! 2. `host` 与去 `www.` 后的 `host` 均不在索引中时，进入硬编码消歧分支
//! 3. `host`，其次去 `www.` 后的 `host`

use std::sync::Arc;

use crate::core::EngineRule;
use crate::indexer::EngineIndex;
use crate::url::SerpUrl;

/// Google 自定义搜索固定匹配键
pub const GOOGLE_CSE_KEY: &str = "google.com/cse";
/// InfoSpace 白标元搜索固定匹配键
pub const INFOSPACE_KEY: &str = "wsdsold.infospace.com";
/// Yahoo! 图片固定匹配键
pub const YAHOO_IMAGES_KEY: &str = "images.search.yahoo.com";
/// Yahoo! 固定匹配键
pub const YAHOO_KEY: &str = "search.yahoo.com";

const GOOGLE_CSE_QUERY_PREFIX: &str = "cx=partner-pub";
const INFOSPACE_PATH_PREFIX: &str = "/pemonitorhosted/ws/results/";
const YAHOO_IMAGES_HOST_MARKER: &str = ".images.search.yahoo.com";
const YAHOO_HOST_MARKER: &str = ".search.yahoo.com";

pub struct DomainResolver;

impl DomainResolver {
    pub fn resolve(index: &EngineIndex, url: &SerpUrl) -> Option<Arc<EngineRule>> {
        let host = url.netloc.as_str();
        let stripped = url.stripped_netloc();

        let with_path = format!("{}{}", host, url.path);
        if let Some(rule) = index.get(&with_path) {
            return Some(Arc::clone(rule));
        }

        let host_known = index.contains(host) || stripped.is_some_and(|s| index.contains(s));
        if !host_known {
            return Self::resolve_special(index, url);
        }

        index
            .get(host)
            .or_else(|| stripped.and_then(|s| index.get(s)))
            .cloned()
    }

    /// 域名不在索引中时的硬编码消歧
    fn resolve_special(index: &EngineIndex, url: &SerpUrl) -> Option<Arc<EngineRule>> {
        let key = Self::special_key(url)?;
        let rule = index.get(key);
        if rule.is_none() {
            log::debug!("Special-case key missing from index: key={} host={}", key, url.netloc);
        }
        rule.cloned()
    }

    fn special_key(url: &SerpUrl) -> Option<&'static str> {
        let query = url.search_query_string();
        if query.starts_with(GOOGLE_CSE_QUERY_PREFIX) {
            Some(GOOGLE_CSE_KEY)
        } else if url.path.starts_with(INFOSPACE_PATH_PREFIX) {
            Some(INFOSPACE_KEY)
        } else if url.netloc.contains(YAHOO_IMAGES_HOST_MARKER) {
            Some(YAHOO_IMAGES_KEY)
        } else if url.netloc.contains(YAHOO_HOST_MARKER) {
            Some(YAHOO_KEY)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> EngineIndex {
        let mut index = EngineIndex::new();
        let mut add = |key: &str, name: &str| {
            index.insert(key, Arc::new(EngineRule::builder(name).param("q").build().unwrap()));
        };
        add("www.google.com", "Google");
        add("google.com/imgres", "Google Images");
        add("www.google.com/imgres", "Google Images");
        add(GOOGLE_CSE_KEY, "Google Custom Search");
        add(INFOSPACE_KEY, "InfoSpace");
        add(YAHOO_IMAGES_KEY, "Yahoo! Images");
        add(YAHOO_KEY, "Yahoo!");
        add("bing.com", "Bing");
        add("search.example.net", "Plain");
        add("www.search.example.net", "WWW");
        add("поиск.рф", "Poisk");
        index
    }

    fn resolve(raw: &str) -> Option<String> {
        let url = SerpUrl::parse(raw).unwrap();
        DomainResolver::resolve(&index(), &url).map(|r| r.engine_name().to_string())
    }

    #[test]
    fn test_host_path_takes_precedence() {
        assert_eq!(resolve("http://www.google.com/imgres?q=x").as_deref(), Some("Google Images"));
        assert_eq!(resolve("http://www.google.com/search?q=x").as_deref(), Some("Google"));
    }

    #[test]
    fn test_www_stripped_fallback() {
        assert_eq!(resolve("http://www.bing.com/search?q=x").as_deref(), Some("Bing"));
        assert_eq!(resolve("http://bing.com/search?q=x").as_deref(), Some("Bing"));
    }

    #[test]
    fn test_exact_host_before_stripped() {
        assert_eq!(resolve("http://www.search.example.net/").as_deref(), Some("WWW"));
    }

    #[test]
    fn test_special_cases() {
        assert_eq!(
            resolve("http://www.example.org/results?cx=partner-pub-123&q=x").as_deref(),
            Some("Google Custom Search")
        );
        assert_eq!(
            resolve("http://search.partner.com/pemonitorhosted/ws/results/Web/rust/1").as_deref(),
            Some("InfoSpace")
        );
        assert_eq!(resolve("http://fr.images.search.yahoo.com/search?p=x").as_deref(), Some("Yahoo! Images"));
        assert_eq!(resolve("http://de.search.yahoo.com/search?p=x").as_deref(), Some("Yahoo!"));
        assert_eq!(resolve("http://www.example.com/").as_deref(), None);
    }

    #[test]
    fn test_special_cases_only_for_unknown_hosts() {
        // host 已在索引中但 host+path 未命中：不进入消歧分支
        assert_eq!(resolve("http://bing.com/x?cx=partner-pub-1").as_deref(), Some("Bing"));
    }

    #[test]
    fn test_match_keys_are_case_and_encoding_sensitive() {
        assert_eq!(resolve("http://WWW.BING.COM/search?q=x").as_deref(), None);
        assert_eq!(resolve("http://Bing.com/search?q=x").as_deref(), None);
        assert_eq!(resolve("http://поиск.рф/?q=x").as_deref(), Some("Poisk"));
        assert_eq!(resolve("http://www.поиск.рф/?q=x").as_deref(), Some("Poisk"));
    }
}
