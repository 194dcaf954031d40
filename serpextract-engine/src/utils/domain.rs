//! 基于公共后缀列表（PSL）的域名拆分
//! 用于：1. 朴素回退时取二级域名标签作为引擎名 2. 按可注册域名聚合查询参数

use once_cell::sync::Lazy;
use tldextract::{TldExtractor, TldOption};

/// 全局共享的域名拆分器（内置PSL快照，不访问网络）
static TLD_EXTRACTOR: Lazy<TldExtractor> = Lazy::new(|| TldOption::default().build());

/// 域名拆分结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainParts {
    pub subdomain: Option<String>,
    pub domain: Option<String>,
    pub suffix: Option<String>,
}

impl DomainParts {
    /// 拆分主机名或匹配键（匹配键可能带路径，如 `google.com/cse`）
    pub fn parse(host_or_key: &str) -> Self {
        let target = if host_or_key.contains("://") {
            host_or_key.to_string()
        } else {
            format!("http://{host_or_key}")
        };

        match TLD_EXTRACTOR.extract(&target) {
            Ok(res) => Self {
                subdomain: res.subdomain.filter(|s| !s.is_empty()),
                domain: res.domain.filter(|s| !s.is_empty()),
                suffix: res.suffix.filter(|s| !s.is_empty()),
            },
            Err(e) => {
                log::debug!("Domain split failed: input={} error={:?}", host_or_key, e);
                Self::default()
            }
        }
    }

    /// 可注册域名：`domain.suffix`，任一缺失时返回None
    pub fn registrable_domain(&self) -> Option<String> {
        match (&self.domain, &self.suffix) {
            (Some(domain), Some(suffix)) => Some(format!("{domain}.{suffix}")),
            _ => None,
        }
    }
}

/// 二级域名标签（`search.example.co.uk` → `example`）
pub fn domain_label(host: &str) -> Option<String> {
    DomainParts::parse(host).domain
}

/// 可注册域名（`de.search.yahoo.com` → `yahoo.com`）
pub fn registrable_domain(host_or_key: &str) -> Option<String> {
    DomainParts::parse(host_or_key).registrable_domain()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrable_domain_multi_part_suffix() {
        assert_eq!(registrable_domain("www.google.co.uk").as_deref(), Some("google.co.uk"));
        assert_eq!(registrable_domain("de.search.yahoo.com").as_deref(), Some("yahoo.com"));
    }

    #[test]
    fn test_registrable_domain_with_path_key() {
        assert_eq!(registrable_domain("google.com/cse").as_deref(), Some("google.com"));
    }

    #[test]
    fn test_domain_label() {
        assert_eq!(domain_label("search.example.org").as_deref(), Some("example"));
        assert_eq!(domain_label("foo.search.piccshare.com").as_deref(), Some("piccshare"));
    }
}
