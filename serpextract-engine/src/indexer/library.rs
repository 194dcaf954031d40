use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::core::EngineRule;
use crate::utils::registrable_domain;

/// 编译后的引擎规则索引
/// Key：匹配键（主机名，或 主机名+路径），大小写敏感
/// 同一条目展开出的多个匹配键共享同一规则
#[derive(Debug, Clone, Default)]
pub struct EngineIndex {
    rules: FxHashMap<String, Arc<EngineRule>>,
}

impl EngineIndex {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Arc<EngineRule>> {
        self.rules.get(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// 插入或替换，返回被替换的旧规则
    pub fn insert(&mut self, key: impl Into<String>, rule: Arc<EngineRule>) -> Option<Arc<EngineRule>> {
        self.rules.insert(key.into(), rule)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 无序遍历 (匹配键, 规则)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<EngineRule>)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 全部查询参数型提取器的参数名并集
    pub fn all_query_param_names(&self) -> BTreeSet<String> {
        self.rules
            .values()
            .flat_map(|rule| rule.query_param_names())
            .map(str::to_string)
            .collect()
    }

    /// 按可注册域名聚合查询参数名（每个域名下排序去重）
    /// 无法得到可注册域名的匹配键（IP、单标签主机等）被跳过
    pub fn query_param_names_by_domain(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (key, rule) in &self.rules {
            let Some(domain) = registrable_domain(key) else {
                log::debug!("Skip key without registrable domain: key={}", key);
                continue;
            };
            grouped
                .entry(domain)
                .or_default()
                .extend(rule.query_param_names().map(str::to_string));
        }

        grouped
            .into_iter()
            .map(|(domain, params)| (domain, params.into_iter().collect()))
            .collect()
    }
}
