//! Referrer URL 结构化表示
//! 各组成部分直接切自原始输入（urlsplit 语义），不做大小写、百分号或 IDNA 归一化；
//! 匹配键按 `netloc`/`path` 原样拼接，规则表中的键与 Referrer 字节级一致才会命中。
//! `url::Url` 仅用于校验输入是否为合法URL。

use std::fmt;

use url::Url;

use crate::error::{CoreError, CoreResult};
use crate::utils::preview_url;

/// 解析后的 Referrer URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerpUrl {
    /// 小写 scheme
    pub scheme: String,
    /// `//` 之后、首个 `/?#` 之前的原文（含端口、用户信息）
    pub netloc: String,
    /// 原文路径，可能为空
    pub path: String,
    pub query: String,
    pub fragment: String,
}

/// 原始输入的切片视图；`None` 表示该部分的分隔符未出现
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawParts<'a> {
    scheme: Option<&'a str>,
    netloc: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> RawParts<'a> {
    /// scheme 取到首个 `:`，netloc 取 `//` 之后到首个 `/?#`，
    /// 之后依次切出 fragment（首个 `#`）与 query（首个 `?`），剩余为 path
    fn split(input: &'a str) -> Self {
        let (scheme, rest) = match input.split_once(':') {
            Some((scheme, rest)) if is_scheme(scheme) => (Some(scheme), rest),
            _ => (None, input),
        };

        let (netloc, rest) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after
                    .find(|c: char| matches!(c, '/' | '?' | '#'))
                    .unwrap_or(after.len());
                (Some(&after[..end]), &after[end..])
            }
            None => (None, rest),
        };

        let (rest, fragment) = match rest.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (rest, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        Self {
            scheme,
            netloc,
            path,
            query,
            fragment,
        }
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// 去掉首尾的控制字符与空格（与 URL 解析器的输入预处理一致）
fn trim_input(raw: &str) -> &str {
    raw.trim_matches(|c: char| c <= ' ')
}

impl SerpUrl {
    /// 直接由各组成部分构造（调用方已自行解析URL时使用）
    pub fn new(
        scheme: impl Into<String>,
        netloc: impl Into<String>,
        path: impl Into<String>,
        query: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            netloc: netloc.into(),
            path: path.into(),
            query: query.into(),
            fragment: fragment.into(),
        }
    }

    /// 解析原始URL字符串，失败时返回 `MalformedUrl`
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let input = trim_input(raw);
        Url::parse(input).map_err(|e| CoreError::MalformedUrl(format!("{} ({})", preview_url(raw), e)))?;

        let parts = RawParts::split(input);
        Ok(Self {
            scheme: parts.scheme.unwrap_or_default().to_ascii_lowercase(),
            netloc: parts.netloc.unwrap_or_default().to_string(),
            path: parts.path.to_string(),
            query: parts.query.unwrap_or_default().to_string(),
            fragment: parts.fragment.unwrap_or_default().to_string(),
        })
    }

    /// 以当前URL为基准解析（可能是相对的）引用，结果同样保持原文
    /// Google 图片预览页的 `prev` 参数即为形如 `/search?q=...` 的相对引用
    /// 相对路径只与基准目录拼接，不消解 `.`/`..` 段
    pub fn join(&self, reference: &str) -> CoreResult<Self> {
        let input = trim_input(reference);
        let parts = RawParts::split(input);

        if parts.scheme.is_some() {
            return Self::parse(input);
        }

        let fragment = parts.fragment.unwrap_or_default().to_string();
        if let Some(netloc) = parts.netloc {
            return Ok(Self::new(
                self.scheme.clone(),
                netloc,
                parts.path,
                parts.query.unwrap_or_default(),
                fragment,
            ));
        }

        let (path, query) = if parts.path.is_empty() {
            (self.path.clone(), parts.query.unwrap_or(&self.query).to_string())
        } else if parts.path.starts_with('/') {
            (parts.path.to_string(), parts.query.unwrap_or_default().to_string())
        } else {
            let dir = self.path.rfind('/').map_or("/", |idx| &self.path[..=idx]);
            (format!("{}{}", dir, parts.path), parts.query.unwrap_or_default().to_string())
        };

        Ok(Self {
            scheme: self.scheme.clone(),
            netloc: self.netloc.clone(),
            path,
            query,
            fragment,
        })
    }

    /// 搜索查询串：query，若fragment非空则追加 `&fragment`
    /// 部分搜索引擎把关键词放在fragment中（前端路由）
    pub fn search_query_string(&self) -> String {
        if self.fragment.is_empty() {
            self.query.clone()
        } else {
            format!("{}&{}", self.query, self.fragment)
        }
    }

    /// 隐藏关键词探测串：path，非空时依次追加 `?query`、`#fragment`
    pub fn path_with_query_and_fragment(&self) -> String {
        let mut probe = String::with_capacity(self.path.len() + self.query.len() + self.fragment.len() + 2);
        probe.push_str(&self.path);
        if !self.query.is_empty() {
            probe.push('?');
            probe.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            probe.push('#');
            probe.push_str(&self.fragment);
        }
        probe
    }

    /// 去除 `www.` 前缀后的主机名
    #[inline]
    pub fn stripped_netloc(&self) -> Option<&str> {
        self.netloc.strip_prefix("www.")
    }
}

impl fmt::Display for SerpUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.netloc, self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_components() {
        let url = SerpUrl::parse("http://www.google.com:8080/search?q=rust#frag").unwrap();
        assert_eq!(url.scheme, "http");
        assert_eq!(url.netloc, "www.google.com:8080");
        assert_eq!(url.path, "/search");
        assert_eq!(url.query, "q=rust");
        assert_eq!(url.fragment, "frag");
        assert_eq!(url.stripped_netloc(), Some("google.com:8080"));
    }

    #[test]
    fn test_parse_keeps_raw_components() {
        let url = SerpUrl::parse("https://www.bing.com:443/").unwrap();
        assert_eq!(url.netloc, "www.bing.com:443");
        assert_eq!(url.path, "/");

        let bare = SerpUrl::parse("https://www.google.co.uk").unwrap();
        assert_eq!(bare.netloc, "www.google.co.uk");
        assert_eq!(bare.path, "");

        let mixed = SerpUrl::parse("HTTP://WWW.Google.COM/Search?Q=X").unwrap();
        assert_eq!(mixed.scheme, "http");
        assert_eq!(mixed.netloc, "WWW.Google.COM");
        assert_eq!(mixed.path, "/Search");
        assert_eq!(mixed.query, "Q=X");
    }

    #[test]
    fn test_parse_does_not_encode_non_ascii() {
        let url = SerpUrl::parse("http://www.123people.de/s/müller").unwrap();
        assert_eq!(url.path, "/s/müller");

        let idn = SerpUrl::parse("http://поиск.рф/?q=x").unwrap();
        assert_eq!(idn.netloc, "поиск.рф");
        assert_eq!(idn.query, "q=x");
    }

    #[test]
    fn test_parse_splits_fragment_before_query() {
        let url = SerpUrl::parse("http://www.yahoo.com/#/%C2%BF??;%C2%AB99555$&&&4&").unwrap();
        assert_eq!(url.path, "/");
        assert_eq!(url.query, "");
        assert_eq!(url.fragment, "/%C2%BF??;%C2%AB99555$&&&4&");
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            SerpUrl::parse("not a url"),
            Err(CoreError::MalformedUrl(_))
        ));
        assert!(SerpUrl::parse("http://").is_err());
    }

    #[test]
    fn test_search_query_string_appends_fragment() {
        let url = SerpUrl::parse("http://www.something.com/?a=1#b=2").unwrap();
        assert_eq!(url.search_query_string(), "a=1&b=2");

        let no_frag = SerpUrl::parse("http://www.something.com/?a=1").unwrap();
        assert_eq!(no_frag.search_query_string(), "a=1");
    }

    #[test]
    fn test_path_with_query_and_fragment() {
        let url = SerpUrl::new("http", "example.com", "/search", "", "");
        assert_eq!(url.path_with_query_and_fragment(), "/search");

        let url = SerpUrl::new("http", "example.com", "/search", "q=1", "top");
        assert_eq!(url.path_with_query_and_fragment(), "/search?q=1#top");

        let url = SerpUrl::new("http", "example.com", "/", "", "x");
        assert_eq!(url.path_with_query_and_fragment(), "/#x");
    }

    #[test]
    fn test_join_relative_reference() {
        let url = SerpUrl::parse("http://www.google.com/imgres?imgurl=x").unwrap();
        let prev = url.join("/search?q=images&tbm=isch").unwrap();
        assert_eq!(prev.netloc, "www.google.com");
        assert_eq!(prev.path, "/search");
        assert_eq!(prev.query, "q=images&tbm=isch");
    }

    #[test]
    fn test_join_reference_forms() {
        let base = SerpUrl::parse("http://www.google.com/a/imgres?imgurl=x#f").unwrap();

        let absolute = base.join("https://images.google.de/search?q=1").unwrap();
        assert_eq!((absolute.scheme.as_str(), absolute.netloc.as_str()), ("https", "images.google.de"));

        let network = base.join("//www.google.fr/search?q=2").unwrap();
        assert_eq!((network.scheme.as_str(), network.netloc.as_str(), network.path.as_str()), ("http", "www.google.fr", "/search"));

        let relative = base.join("search?q=müller").unwrap();
        assert_eq!(relative.path, "/a/search");
        assert_eq!(relative.query, "q=müller");

        let query_only = base.join("?q=3").unwrap();
        assert_eq!((query_only.path.as_str(), query_only.query.as_str()), ("/a/imgres", "q=3"));
        assert_eq!(query_only.fragment, "");
    }
}
