//! 编译后的引擎规则
//! 核心职责：
//! 1. 提取器/隐藏关键词的"字符串或正则"多态在编译期一次性确定为枚举变体
//! 2. 规则不可变，索引中以 Arc 共享
//! 3. 提供自定义规则构建器（注册自定义规则时使用，错误会向上抛出）

use std::fmt;

use regex::Regex;

use crate::error::{CoreError, CoreResult};

/// 默认字符集
pub const DEFAULT_CHARSET: &str = "utf-8";

/// 关键词提取器
#[derive(Debug, Clone)]
pub enum Extractor {
    /// 查询参数名
    QueryParam(String),
    /// 路径正则（捕获组1为关键词）
    PathPattern(Regex),
}

impl Extractor {
    /// 由规则表中的提取器描述编译
    /// 以 `/` 开头视为路径正则，首尾所有 `/` 去除后编译
    pub fn from_spec(spec: &str) -> CoreResult<Self> {
        if !spec.starts_with('/') {
            return Ok(Extractor::QueryParam(spec.to_string()));
        }

        let regex = Regex::new(spec.trim_matches('/'))?;
        if regex.captures_len() < 2 {
            return Err(CoreError::InvalidInput(format!(
                "path pattern has no capture group: {}",
                spec
            )));
        }
        Ok(Extractor::PathPattern(regex))
    }

    /// 查询参数名（路径正则返回None）
    #[inline]
    pub fn query_param(&self) -> Option<&str> {
        match self {
            Extractor::QueryParam(name) => Some(name),
            Extractor::PathPattern(_) => None,
        }
    }
}

impl PartialEq for Extractor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Extractor::QueryParam(a), Extractor::QueryParam(b)) => a == b,
            (Extractor::PathPattern(a), Extractor::PathPattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extractor::QueryParam(name) => write!(f, "{:?}", name),
            Extractor::PathPattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// 隐藏关键词路径匹配器（无关键词但仍属于SERP的URL形态）
#[derive(Debug, Clone)]
pub enum HiddenKeyword {
    /// 完全相等匹配
    LiteralPath(String),
    /// 任意位置查找匹配
    PathRegex(Regex),
}

impl HiddenKeyword {
    /// 长度大于1且首尾均为 `/` 的描述视为正则，其余为字面路径（包括单独的 `/`）
    pub fn from_spec(spec: &str) -> CoreResult<Self> {
        if spec.len() > 1 && spec.starts_with('/') && spec.ends_with('/') {
            let regex = Regex::new(&spec[1..spec.len() - 1])?;
            Ok(HiddenKeyword::PathRegex(regex))
        } else {
            Ok(HiddenKeyword::LiteralPath(spec.to_string()))
        }
    }

    #[inline]
    pub fn is_match(&self, probe: &str) -> bool {
        match self {
            HiddenKeyword::LiteralPath(path) => path == probe,
            HiddenKeyword::PathRegex(re) => re.is_match(probe),
        }
    }
}

impl PartialEq for HiddenKeyword {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HiddenKeyword::LiteralPath(a), HiddenKeyword::LiteralPath(b)) => a == b,
            (HiddenKeyword::PathRegex(a), HiddenKeyword::PathRegex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for HiddenKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HiddenKeyword::LiteralPath(path) => write!(f, "{:?}", path),
            HiddenKeyword::PathRegex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// 单个引擎条目的编译后规则
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRule {
    engine_name: String,
    extractors: Vec<Extractor>,
    link_template: Option<String>,
    charsets: Vec<String>,
    hidden_keyword_paths: Vec<HiddenKeyword>,
}

impl EngineRule {
    /// 自定义规则构建器
    pub fn builder(engine_name: impl Into<String>) -> EngineRuleBuilder {
        EngineRuleBuilder::new(engine_name)
    }

    /// 规则表编译入口（尽力而为：非法正则跳过并告警，不中断编译）
    pub(crate) fn compile_lenient(
        engine_name: &str,
        params: &[String],
        link_template: Option<&str>,
        charsets: &[String],
        hidden_keyword: &[String],
    ) -> Self {
        let extractors = params
            .iter()
            .filter_map(|spec| match Extractor::from_spec(spec) {
                Ok(extractor) => Some(extractor),
                Err(e) => {
                    log::warn!("Skip extractor: engine={} spec={} error={}", engine_name, spec, e);
                    None
                }
            })
            .collect();

        let hidden_keyword_paths = hidden_keyword
            .iter()
            .filter_map(|spec| match HiddenKeyword::from_spec(spec) {
                Ok(hidden) => Some(hidden),
                Err(e) => {
                    log::warn!("Skip hidden keyword path: engine={} spec={} error={}", engine_name, spec, e);
                    None
                }
            })
            .collect();

        Self {
            engine_name: engine_name.to_string(),
            extractors,
            link_template: link_template.map(str::to_string),
            charsets: charsets.iter().map(|c| c.to_lowercase()).collect(),
            hidden_keyword_paths,
        }
    }

    #[inline]
    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    #[inline]
    pub fn extractors(&self) -> &[Extractor] {
        &self.extractors
    }

    #[inline]
    pub fn link_template(&self) -> Option<&str> {
        self.link_template.as_deref()
    }

    #[inline]
    pub fn charsets(&self) -> &[String] {
        &self.charsets
    }

    #[inline]
    pub fn hidden_keyword_paths(&self) -> &[HiddenKeyword] {
        &self.hidden_keyword_paths
    }

    /// 所有查询参数型提取器的参数名（按声明顺序）
    pub fn query_param_names(&self) -> impl Iterator<Item = &str> {
        self.extractors.iter().filter_map(Extractor::query_param)
    }

    /// 根据链接模板生成指定关键词的SERP链接
    /// base_url 形如 `<scheme>://<netloc>`；无模板时返回None
    pub fn serp_url(&self, base_url: &str, keyword: &str) -> Option<String> {
        let template = self.link_template.as_deref()?;
        Some(format!("{}/{}", base_url, template.replace("{k}", keyword)))
    }
}

impl fmt::Display for EngineRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineRule(engine_name={:?}, extractors=[", self.engine_name)?;
        write_joined(f, &self.extractors)?;
        write!(
            f,
            "], link_template={:?}, charsets={:?}, hidden_keywords=[",
            self.link_template, self.charsets
        )?;
        write_joined(f, &self.hidden_keyword_paths)?;
        f.write_str("])")
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// 自定义规则构建器（链式 API，严格校验）
#[derive(Debug, Clone, Default)]
pub struct EngineRuleBuilder {
    engine_name: String,
    extractor_specs: Vec<String>,
    link_template: Option<String>,
    charsets: Vec<String>,
    hidden_keyword_specs: Vec<String>,
}

impl EngineRuleBuilder {
    pub fn new(engine_name: impl Into<String>) -> Self {
        Self {
            engine_name: engine_name.into(),
            ..Default::default()
        }
    }

    /// 查询参数提取器
    pub fn param(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.extractor_specs.push(name);
        self
    }

    /// 路径正则提取器（不含 `/` 分隔符，需包含一个捕获组）
    pub fn path_pattern(mut self, pattern: impl AsRef<str>) -> Self {
        self.extractor_specs.push(format!("/{}/", pattern.as_ref()));
        self
    }

    pub fn link_template(mut self, template: impl Into<String>) -> Self {
        self.link_template = Some(template.into());
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charsets.push(charset.into());
        self
    }

    /// 隐藏关键词路径（规则表写法：`/.../` 为正则，其余为字面路径）
    pub fn hidden_keyword(mut self, spec: impl Into<String>) -> Self {
        self.hidden_keyword_specs.push(spec.into());
        self
    }

    pub fn build(self) -> CoreResult<EngineRule> {
        if self.engine_name.trim().is_empty() {
            return Err(CoreError::InvalidInput("engine name must not be empty".to_string()));
        }

        let extractors = self
            .extractor_specs
            .iter()
            .map(|spec| Extractor::from_spec(spec))
            .collect::<CoreResult<Vec<_>>>()?;
        let hidden_keyword_paths = self
            .hidden_keyword_specs
            .iter()
            .map(|spec| HiddenKeyword::from_spec(spec))
            .collect::<CoreResult<Vec<_>>>()?;
        let charsets = if self.charsets.is_empty() {
            vec![DEFAULT_CHARSET.to_string()]
        } else {
            self.charsets.iter().map(|c| c.to_lowercase()).collect()
        };

        Ok(EngineRule {
            engine_name: self.engine_name,
            extractors,
            link_template: self.link_template,
            charsets,
            hidden_keyword_paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_from_spec() {
        assert_eq!(Extractor::from_spec("q").unwrap(), Extractor::QueryParam("q".into()));

        let Extractor::PathPattern(re) = Extractor::from_spec("/s\\/([^\\/]+)/").unwrap() else {
            panic!("expected path pattern");
        };
        assert_eq!(re.as_str(), "s\\/([^\\/]+)");
        assert!(Extractor::from_spec("/no-group/").is_err());
        assert!(Extractor::from_spec("/(unclosed/").is_err());
    }

    #[test]
    fn test_hidden_keyword_from_spec() {
        assert_eq!(
            HiddenKeyword::from_spec("/").unwrap(),
            HiddenKeyword::LiteralPath("/".into())
        );
        assert_eq!(
            HiddenKeyword::from_spec("/search").unwrap(),
            HiddenKeyword::LiteralPath("/search".into())
        );

        let hidden = HiddenKeyword::from_spec("/^$/").unwrap();
        assert!(matches!(hidden, HiddenKeyword::PathRegex(_)));
        assert!(hidden.is_match(""));
        assert!(!hidden.is_match("/"));

        let literal = HiddenKeyword::from_spec("/search").unwrap();
        assert!(literal.is_match("/search"));
        assert!(!literal.is_match("/search?q=1"));
    }

    #[test]
    fn test_builder_and_serp_url() {
        let rule = EngineRule::builder("PiccShare")
            .param("q")
            .link_template("search.php?q={k}")
            .charset("UTF-8")
            .build()
            .unwrap();

        assert_eq!(rule.engine_name(), "PiccShare");
        assert_eq!(rule.charsets(), &["utf-8".to_string()]);
        assert_eq!(rule.query_param_names().collect::<Vec<_>>(), vec!["q"]);
        assert_eq!(
            rule.serp_url("http://search.piccshare.com", "rust").as_deref(),
            Some("http://search.piccshare.com/search.php?q=rust")
        );
    }

    #[test]
    fn test_builder_validation() {
        assert!(matches!(
            EngineRule::builder(" ").param("q").build(),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            EngineRule::builder("Bad").path_pattern("(oops").build(),
            Err(CoreError::RegexCompileError(_))
        ));

        let rule = EngineRule::builder("NoLink").param("q").build().unwrap();
        assert_eq!(rule.serp_url("http://x.com", "k"), None);
        assert_eq!(rule.charsets(), &[DEFAULT_CHARSET.to_string()]);
    }

    #[test]
    fn test_compile_lenient_skips_bad_specs() {
        let rule = EngineRule::compile_lenient(
            "Lenient",
            &["q".into(), "/(broken/".into(), "/p\\/(.+)/".into()],
            None,
            &["ISO-8859-1".into()],
            &["/[/".into(), "/".into()],
        );
        assert_eq!(rule.extractors().len(), 2);
        assert_eq!(rule.hidden_keyword_paths().len(), 1);
        assert_eq!(rule.charsets(), &["iso-8859-1".to_string()]);
    }

    #[test]
    fn test_display() {
        let rule = EngineRule::builder("Demo")
            .param("q")
            .path_pattern("s/(.+)")
            .hidden_keyword("/")
            .build()
            .unwrap();
        assert_eq!(
            rule.to_string(),
            r#"EngineRule(engine_name="Demo", extractors=["q", /s/(.+)/], link_template=None, charsets=["utf-8"], hidden_keywords=["/"])"#
        );
    }
}
