//! 查询串多值映射
//! 解码策略：`url::form_urlencoded`（`+`→空格，非法UTF-8按lossy替换，永不失败）

use rustc_hash::FxHashMap;
use url::form_urlencoded;

/// 查询参数多值映射：Key → 按出现顺序排列的值列表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    params: FxHashMap<String, Vec<String>>,
}

impl QueryMap {
    /// 解析查询串
    /// - keep_blank: 是否保留空值参数（`q=` / 仅有键的 `q`）
    pub fn parse(query: &str, keep_blank: bool) -> Self {
        let mut params: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() && !keep_blank {
                continue;
            }
            params
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Self { params }
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.params.get(key).map(Vec::as_slice)
    }

    /// 首个值
    #[inline]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// 末个值（重复参数以最后出现者为准）
    #[inline]
    pub fn last(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.last()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
