use std::sync::Arc;
use std::time::Instant;

use rustc_hash::FxHashSet;

use crate::core::{EngineRule, RawEngineDefinition, RawEngineGroup, RawRuleTable, DEFAULT_CHARSET};

use super::country::{COUNTRY_CODES, SECOND_LEVEL_DOMAINS};
use super::library::EngineIndex;

/// 国家码占位符
const COUNTRY_PLACEHOLDER: &str = "{}";

/// 规则组级默认值快照
/// 由组内首个条目一次性捕获，后续条目只与该快照合并，不会回溯修改已注册的规则
#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupDefaults {
    params: Vec<String>,
    link_template: Option<String>,
    charsets: Vec<String>,
    hidden_keyword: Vec<String>,
}

impl Default for GroupDefaults {
    fn default() -> Self {
        Self {
            params: Vec::new(),
            link_template: None,
            charsets: vec![DEFAULT_CHARSET.to_string()],
            hidden_keyword: Vec::new(),
        }
    }
}

impl GroupDefaults {
    /// 第一阶段：以首个条目中出现的字段覆盖初始默认值
    fn capture(group: &RawEngineGroup) -> Self {
        let mut defaults = Self::default();
        let Some(first) = group.entries.first() else {
            return defaults;
        };

        if let Some(params) = first.params() {
            defaults.params = params;
        }
        if let Some(link) = &first.backlink {
            defaults.link_template = Some(link.clone());
        }
        if let Some(charsets) = first.charsets() {
            defaults.charsets = charsets;
        }
        if let Some(hidden) = first.hidden_keyword() {
            defaults.hidden_keyword = hidden;
        }
        defaults
    }

    /// 第二阶段：条目自身字段优先，缺失字段取快照值
    fn materialize(&self, engine_name: &str, entry: &RawEngineDefinition) -> EngineRule {
        let params = entry.params().unwrap_or_else(|| self.params.clone());
        let link_template = entry.backlink.as_deref().or(self.link_template.as_deref());
        let charsets = entry.charsets().unwrap_or_else(|| self.charsets.clone());
        let hidden_keyword = entry
            .hidden_keyword()
            .unwrap_or_else(|| self.hidden_keyword.clone());

        EngineRule::compile_lenient(engine_name, &params, link_template, &charsets, &hidden_keyword)
    }
}

/// 规则编译器
/// 核心职责：
/// 1. 按引擎名分组的原始规则表 → 扁平的 匹配键→规则 索引
/// 2. 展开匹配串中的国家码占位符
/// 3. 后出现的同名匹配键覆盖先出现者（规则表插入顺序）
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译完整规则表（尽力而为，不会因单个条目失败而中断）
    pub fn compile(table: &RawRuleTable) -> EngineIndex {
        let start = Instant::now();
        let mut index = EngineIndex::new();

        for group in &table.groups {
            Self::compile_group(group, &mut index);
        }

        log::info!(
            "Engine index built: groups={} keys={} elapsed={:?}",
            table.engine_count(),
            index.len(),
            start.elapsed()
        );
        index
    }

    /// 编译单个规则组并写入索引
    pub fn compile_group(group: &RawEngineGroup, index: &mut EngineIndex) {
        let defaults = GroupDefaults::capture(group);

        for entry in &group.entries {
            let keys = Self::expand_match_strings(&group.engine_name, &entry.urls());
            if keys.is_empty() {
                log::debug!("Rule entry has no usable match keys: engine={}", group.engine_name);
                continue;
            }

            let rule = Arc::new(defaults.materialize(&group.engine_name, entry));
            for key in keys {
                if let Some(prev) = index.insert(key.clone(), Arc::clone(&rule)) {
                    if prev.engine_name() != group.engine_name {
                        log::debug!(
                            "Match key overwritten: key={} old_engine={} new_engine={}",
                            key,
                            prev.engine_name(),
                            group.engine_name
                        );
                    }
                }
            }
        }
    }

    /// 展开条目内的全部匹配串
    /// - 含一个 `{}`：替换为每个国家码；末字符非字母数字时额外替换为 `co.<cc>` / `com.<cc>`
    /// - 含多个 `{}`：视为格式错误跳过
    /// - 不含占位符：原样保留
    pub fn expand_match_strings(engine_name: &str, urls: &[String]) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut keys = Vec::new();
        let mut push = |key: String| {
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        };

        for url in urls {
            if url.is_empty() {
                continue;
            }

            match url.matches(COUNTRY_PLACEHOLDER).count() {
                0 => push(url.clone()),
                1 => {
                    for cc in COUNTRY_CODES {
                        push(url.replace(COUNTRY_PLACEHOLDER, cc));
                    }
                    let ends_alnum = url.chars().last().is_some_and(char::is_alphanumeric);
                    if !ends_alnum {
                        for cc in COUNTRY_CODES {
                            for sld in SECOND_LEVEL_DOMAINS {
                                push(url.replace(COUNTRY_PLACEHOLDER, &format!("{sld}.{cc}")));
                            }
                        }
                    }
                }
                n => log::warn!(
                    "Skip malformed match template: engine={} url={} placeholders={}",
                    engine_name,
                    url,
                    n
                ),
            }
        }

        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Extractor, StringOrList};

    fn entry(urls: Vec<&str>) -> RawEngineDefinition {
        RawEngineDefinition {
            urls: Some(StringOrList::from(urls)),
            ..Default::default()
        }
    }

    #[test]
    fn test_country_code_expansion() {
        let table = RawRuleTable::new().with_group(
            "Example",
            vec![RawEngineDefinition {
                params: Some("q".into()),
                ..entry(vec!["example.{}"])
            }],
        );
        let index = RuleCompiler::compile(&table);

        for host in ["example.de", "example.co.uk", "example.com.au", "example.uk"] {
            assert_eq!(index.get(host).map(|r| r.engine_name()), Some("Example"), "{host}");
        }
        assert!(!index.contains("example.zz"));
        assert!(!index.contains("example.{}"));
    }

    #[test]
    fn test_expanded_keys_resolve_end_to_end() {
        use crate::extractor::KeywordExtractor;
        use crate::resolver::DomainResolver;
        use crate::url::SerpUrl;

        let table = RawRuleTable::new()
            .with_group(
                "Example",
                vec![RawEngineDefinition {
                    params: Some("q".into()),
                    ..entry(vec!["example.{}"])
                }],
            )
            .with_group(
                "Example Images",
                vec![RawEngineDefinition {
                    params: Some("q".into()),
                    ..entry(vec!["www.example.{}/images"])
                }],
            );
        let index = RuleCompiler::compile(&table);
        let resolve = |raw: &str| {
            let url = SerpUrl::parse(raw).unwrap();
            DomainResolver::resolve(&index, &url).map(|r| r.engine_name().to_string())
        };

        assert_eq!(resolve("http://example.de/?q=x").as_deref(), Some("Example"));
        // 经去 `www.` 回退命中二级展开出的键
        assert_eq!(resolve("http://www.example.co.uk/search?q=x").as_deref(), Some("Example"));
        assert_eq!(resolve("http://example.uk/find?q=x").as_deref(), Some("Example"));
        assert_eq!(resolve("http://www.example.de/images?q=x").as_deref(), Some("Example Images"));
        assert_eq!(resolve("http://example.zz/?q=x"), None);
        assert_eq!(resolve("http://www.example.zz/images?q=x"), None);

        let url = SerpUrl::parse("http://www.example.co.uk/search?q=rust").unwrap();
        let rule = DomainResolver::resolve(&index, &url).unwrap();
        let res = KeywordExtractor::extract(&rule, &url).unwrap();
        assert_eq!((res.engine_name.as_str(), res.keyword.as_str()), ("Example", "rust"));
    }

    #[test]
    fn test_second_level_expansion_requires_trailing_placeholder() {
        let keys = RuleCompiler::expand_match_strings("Google Images", &["www.google.{}/imgres".to_string()]);
        assert!(keys.contains(&"www.google.de/imgres".to_string()));
        assert!(!keys.iter().any(|k| k.contains(".co.")));
        assert_eq!(keys.len(), COUNTRY_CODES.len());
    }

    #[test]
    fn test_malformed_templates_skipped() {
        let keys = RuleCompiler::expand_match_strings(
            "Bad",
            &["{}.{}.example.com".to_string(), "".to_string(), "ok.example.com".to_string()],
        );
        assert_eq!(keys, vec!["ok.example.com".to_string()]);
    }

    #[test]
    fn test_group_defaults_propagation() {
        let table = RawRuleTable::new().with_group(
            "Example",
            vec![
                RawEngineDefinition {
                    params: Some("q".into()),
                    backlink: Some("search?q={k}".into()),
                    charsets: Some("ISO-8859-1".into()),
                    hidden_keyword: Some("/".into()),
                    ..entry(vec!["example.com", "www.example.com"])
                },
                entry(vec!["m.example.com"]),
                RawEngineDefinition {
                    params: Some(vec!["p"].into()),
                    ..entry(vec!["beta.example.com"])
                },
            ],
        );
        let index = RuleCompiler::compile(&table);
        assert_eq!(index.len(), 4);

        let inherited = index.get("m.example.com").unwrap();
        assert_eq!(inherited.extractors(), &[Extractor::QueryParam("q".into())]);
        assert_eq!(inherited.link_template(), Some("search?q={k}"));
        assert_eq!(inherited.charsets(), &["iso-8859-1".to_string()]);
        assert_eq!(inherited.hidden_keyword_paths().len(), 1);

        let overridden = index.get("beta.example.com").unwrap();
        assert_eq!(overridden.extractors(), &[Extractor::QueryParam("p".into())]);
        assert_eq!(overridden.link_template(), Some("search?q={k}"));
    }

    #[test]
    fn test_defaults_not_mutated_by_later_entries() {
        let table = RawRuleTable::new().with_group(
            "Example",
            vec![
                RawEngineDefinition {
                    params: Some("q".into()),
                    ..entry(vec!["a.example.com"])
                },
                RawEngineDefinition {
                    backlink: Some("find?q={k}".into()),
                    ..entry(vec!["b.example.com"])
                },
                entry(vec!["c.example.com"]),
            ],
        );
        let index = RuleCompiler::compile(&table);
        assert_eq!(index.get("a.example.com").unwrap().link_template(), None);
        assert_eq!(index.get("b.example.com").unwrap().link_template(), Some("find?q={k}"));
        assert_eq!(index.get("c.example.com").unwrap().link_template(), None);
        assert_eq!(index.get("c.example.com").unwrap().charsets(), &[DEFAULT_CHARSET.to_string()]);
    }

    #[test]
    fn test_later_key_overwrites_earlier() {
        let table = RawRuleTable::new()
            .with_group("First", vec![RawEngineDefinition { params: Some("q".into()), ..entry(vec!["shared.com"]) }])
            .with_group("Second", vec![RawEngineDefinition { params: Some("s".into()), ..entry(vec!["shared.com"]) }]);
        let index = RuleCompiler::compile(&table);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("shared.com").unwrap().engine_name(), "Second");
    }
}
