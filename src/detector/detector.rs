//! SERP detector core module
//! SERP 检测器核心
//! 核心职责：
//! 1. 规则表加载与编译（内置/本地规则）
//! 2. 域名→规则解析 + 关键词提取 + 朴素回退
//! 3. 关键词后处理
//! 4. 自定义规则注册（写时复制，读路径无阻塞）

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use serpextract_engine::utils::preview_url;
use serpextract_engine::{
    DomainResolver, EngineIndex, EngineRule, ExtractResult, KeywordExtractor, NaiveFallback,
    RawRuleTable, RuleCompiler, SerpUrl,
};

// 仅在embedded-rules开启时导入serpextract_rules
#[cfg(feature = "embedded-rules")]
use crate::serpextract_rules;
use crate::error::{SerpError, SerpResult};
use crate::utils::KeywordNormalizer;
use crate::{ExtractOptions, RuleConfig, RuleLoader};

/// SERP 检测器核心结构体
/// 设计说明：
/// - index: 编译后的规则索引（读多写少，注册时整体替换 Arc）
/// - config: 规则配置（提取选项默认值）
#[derive(Debug)]
pub struct SerpDetector {
    index: RwLock<Arc<EngineIndex>>,
    config: RuleConfig,
}

impl Clone for SerpDetector {
    fn clone(&self) -> Self {
        Self {
            index: RwLock::new(self.index()),
            config: self.config.clone(),
        }
    }
}

impl SerpDetector {
    /// 使用内存中的原始规则表创建检测器
    pub fn with_rules(table: &RawRuleTable, config: RuleConfig) -> Self {
        Self::with_index(RuleCompiler::compile(table), config)
    }

    /// 使用已编译的规则索引创建检测器
    pub fn with_index(index: EngineIndex, config: RuleConfig) -> Self {
        Self {
            index: RwLock::new(Arc::new(index)),
            config,
        }
    }

    /// 使用内置规则创建检测器（仅embedded-rules特性开启时可用）
    /// 共享进程内唯一的已编译内置索引，首次注册自定义规则时才复制
    #[cfg(feature = "embedded-rules")]
    pub fn with_embedded_rules(config: RuleConfig) -> Self {
        Self {
            index: RwLock::new(Arc::clone(&serpextract_rules::EMBEDDED_ENGINE_INDEX)),
            config,
        }
    }

    /// 按配置创建检测器
    /// 支持规则来源：
    /// 1. Embedded：内置规则（需开启embedded-rules特性）
    /// 2. LocalFile：运行时读取本地 JSON 规则文件
    pub fn new(config: RuleConfig) -> SerpResult<Self> {
        #[cfg(feature = "embedded-rules")]
        if config.origin == crate::RuleOrigin::Embedded {
            return Ok(Self::with_embedded_rules(config));
        }

        let start = Instant::now();
        let table = RuleLoader::new().load(&config)?;
        let detector = Self::with_rules(&table, config);
        log::info!(
            "SerpDetector created: keys={} elapsed={:?}",
            detector.len(),
            start.elapsed()
        );
        Ok(detector)
    }

    /// 按配置创建检测器（异步读取规则文件）
    #[cfg(feature = "async-io")]
    pub async fn new_async(config: RuleConfig) -> SerpResult<Self> {
        #[cfg(feature = "embedded-rules")]
        if config.origin == crate::RuleOrigin::Embedded {
            return Ok(Self::with_embedded_rules(config));
        }

        let table = RuleLoader::new().load_async(&config).await?;
        Ok(Self::with_rules(&table, config))
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// 当前规则索引快照
    pub fn index(&self) -> Arc<EngineIndex> {
        let guard = self.index.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn len(&self) -> usize {
        self.index().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index().is_empty()
    }

    // ===================== 解析 =====================

    /// 为URL查找适用规则；URL无法解析或无匹配时返回None
    pub fn resolve_rule(&self, url: &str) -> Option<Arc<EngineRule>> {
        let parsed = parse_url(url)?;
        self.resolve_rule_parsed(&parsed)
    }

    pub fn resolve_rule_parsed(&self, url: &SerpUrl) -> Option<Arc<EngineRule>> {
        DomainResolver::resolve(&self.index(), url)
    }

    // ===================== 提取 =====================

    /// 使用配置中的默认选项提取
    pub fn extract(&self, url: &str) -> Option<ExtractResult> {
        self.extract_with(url, None, &self.config.options)
    }

    /// 完整提取入口
    /// - rule: 预先解析出的规则（None 时按域名解析）
    /// - options: 后处理与朴素回退选项
    pub fn extract_with(
        &self,
        url: &str,
        rule: Option<&Arc<EngineRule>>,
        options: &ExtractOptions,
    ) -> Option<ExtractResult> {
        let parsed = parse_url(url)?;
        self.extract_parsed(&parsed, rule, options)
    }

    pub fn extract_parsed(
        &self,
        url: &SerpUrl,
        rule: Option<&Arc<EngineRule>>,
        options: &ExtractOptions,
    ) -> Option<ExtractResult> {
        let rule = match rule {
            Some(rule) => Some(Arc::clone(rule)),
            None => self.resolve_rule_parsed(url),
        };

        let mut result = match rule {
            Some(rule) => KeywordExtractor::extract(&rule, url)?,
            None if options.use_naive => NaiveFallback::extract(url)?,
            None => return None,
        };

        result.keyword = KeywordNormalizer::normalize(&result.keyword, options);
        Some(result)
    }

    /// 是否为SERP（使用配置中的默认选项）
    pub fn is_serp(&self, url: &str) -> bool {
        self.extract(url).is_some()
    }

    pub fn is_serp_with(&self, url: &str, rule: Option<&Arc<EngineRule>>, use_naive: bool) -> bool {
        let options = self.config.options.with_naive(use_naive);
        self.extract_with(url, rule, &options).is_some()
    }

    // ===================== 注册 =====================

    /// 注册自定义规则（新增或替换单个匹配键），返回被替换的旧规则
    /// 匹配键须为 `host` 或 `host/path` 形式：非空、不含空白、不含 `://`
    pub fn register_custom_rule(
        &self,
        match_key: &str,
        rule: EngineRule,
    ) -> SerpResult<Option<Arc<EngineRule>>> {
        validate_match_key(match_key)?;

        let mut guard = self.index.write().unwrap_or_else(PoisonError::into_inner);
        let previous = Arc::make_mut(&mut *guard).insert(match_key, Arc::new(rule));

        match &previous {
            Some(prev) => log::info!(
                "Custom rule replaced: key={} old_engine={}",
                match_key,
                prev.engine_name()
            ),
            None => log::info!("Custom rule registered: key={}", match_key),
        }
        Ok(previous)
    }

    // ===================== 汇总 =====================

    /// 全部查询参数名并集
    pub fn all_query_param_names(&self) -> BTreeSet<String> {
        self.index().all_query_param_names()
    }

    /// 按可注册域名聚合的查询参数名
    pub fn all_query_param_names_by_registrable_domain(&self) -> BTreeMap<String, Vec<String>> {
        self.index().query_param_names_by_domain()
    }

    /// 全部 (匹配键, 规则)，按引擎名、匹配键排序
    pub fn rules(&self) -> Vec<(String, Arc<EngineRule>)> {
        let index = self.index();
        let mut rules: Vec<_> = index
            .iter()
            .map(|(key, rule)| (key.to_string(), Arc::clone(rule)))
            .collect();
        rules.sort_by(|(ka, ra), (kb, rb)| {
            ra.engine_name()
                .cmp(rb.engine_name())
                .then_with(|| ka.cmp(kb))
        });
        rules
    }
}

fn parse_url(url: &str) -> Option<SerpUrl> {
    match SerpUrl::parse(url) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::debug!("Skip malformed URL: url={} error={}", preview_url(url), e);
            None
        }
    }
}

fn validate_match_key(match_key: &str) -> SerpResult<()> {
    if match_key.is_empty() {
        return Err(SerpError::InvalidInput("match key must not be empty".into()));
    }
    if match_key.chars().any(char::is_whitespace) {
        return Err(SerpError::InvalidInput(format!(
            "match key must not contain whitespace: {:?}",
            match_key
        )));
    }
    if match_key.contains("://") {
        return Err(SerpError::InvalidInput(format!(
            "match key must be host or host/path, not a URL: {}",
            match_key
        )));
    }
    Ok(())
}

/// 全局单例：为URL查找适用规则
#[inline(always)]
pub fn resolve_rule(url: &str) -> SerpResult<Option<Arc<EngineRule>>> {
    let detector = super::global::get_global_detector()?;
    Ok(detector.resolve_rule(url))
}

/// 全局单例：是否为SERP
/// - rule: 预先解析出的规则（None 时按域名解析）
#[inline(always)]
pub fn is_serp(url: &str, rule: Option<&Arc<EngineRule>>, use_naive: bool) -> SerpResult<bool> {
    let detector = super::global::get_global_detector()?;
    Ok(detector.is_serp_with(url, rule, use_naive))
}

/// 全局单例：按指定规则与选项提取
#[inline(always)]
pub fn extract(
    url: &str,
    rule: Option<&Arc<EngineRule>>,
    options: &ExtractOptions,
) -> SerpResult<Option<ExtractResult>> {
    let detector = super::global::get_global_detector()?;
    Ok(detector.extract_with(url, rule, options))
}

/// 全局单例：注册自定义规则
pub fn register_custom_rule(match_key: &str, rule: EngineRule) -> SerpResult<Option<Arc<EngineRule>>> {
    let detector = super::global::get_global_detector()?;
    detector.register_custom_rule(match_key, rule)
}

/// 全局单例：全部查询参数名
pub fn all_query_params() -> SerpResult<BTreeSet<String>> {
    let detector = super::global::get_global_detector()?;
    Ok(detector.all_query_param_names())
}

/// 全局单例：按可注册域名聚合的查询参数名
pub fn all_query_params_by_domain() -> SerpResult<BTreeMap<String, Vec<String>>> {
    let detector = super::global::get_global_detector()?;
    Ok(detector.all_query_param_names_by_registrable_domain())
}
