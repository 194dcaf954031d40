//! 原始规则表数据模型（外部输入）
//! 格式：引擎显示名 → 有序规则条目列表，条目字段见 [`RawEngineDefinition`]
//! 仅存储规则数据，无任何业务逻辑

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// 兼容"单个字符串或字符串列表"两种写法的字段
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            StringOrList::One(s) => vec![s.clone()],
            StringOrList::Many(list) => list.clone(),
        }
    }
}

impl From<&str> for StringOrList {
    fn from(value: &str) -> Self {
        StringOrList::One(value.to_string())
    }
}

impl From<Vec<&str>> for StringOrList {
    fn from(value: Vec<&str>) -> Self {
        StringOrList::Many(value.into_iter().map(str::to_string).collect())
    }
}

/// 单条原始规则定义（规则表中的一行）
/// 未识别字段忽略；`null` 等价于缺省
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawEngineDefinition {
    /// 匹配域名/域名+路径，可包含一个 `{}` 国家码占位符
    #[serde(default)]
    pub urls: Option<StringOrList>,
    /// 提取器：普通字符串为查询参数名，`/.../` 包裹为路径正则
    #[serde(default)]
    pub params: Option<StringOrList>,
    /// SERP 链接模板，`{k}` 为关键词占位符
    #[serde(default)]
    pub backlink: Option<String>,
    #[serde(default)]
    pub charsets: Option<StringOrList>,
    /// 隐藏关键词路径：字面路径或 `/.../` 包裹的正则
    #[serde(default, rename = "hiddenkeyword")]
    pub hidden_keyword: Option<StringOrList>,
}

impl RawEngineDefinition {
    pub fn urls(&self) -> Vec<String> {
        self.urls.as_ref().map(StringOrList::to_vec).unwrap_or_default()
    }

    pub fn params(&self) -> Option<Vec<String>> {
        self.params.as_ref().map(StringOrList::to_vec)
    }

    pub fn charsets(&self) -> Option<Vec<String>> {
        self.charsets.as_ref().map(StringOrList::to_vec)
    }

    pub fn hidden_keyword(&self) -> Option<Vec<String>> {
        self.hidden_keyword.as_ref().map(StringOrList::to_vec)
    }
}

/// 同一引擎显示名下的规则组（顺序即规则表中的顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEngineGroup {
    pub engine_name: String,
    pub entries: Vec<RawEngineDefinition>,
}

/// 完整原始规则表（按引擎名插入顺序保存）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRuleTable {
    pub groups: Vec<RawEngineGroup>,
}

impl RawRuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从JSON文本解析
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// 从已解析的JSON值构建
    /// - 顶层必须为对象，否则返回 `RuleParseError`
    /// - 单条目写成对象（而非数组）时按单元素列表处理
    /// - 无法反序列化的条目跳过并告警，不影响其余条目
    pub fn from_value(value: Value) -> CoreResult<Self> {
        let Value::Object(map) = value else {
            return Err(CoreError::RuleParseError(
                "rule table root must be a JSON object".to_string(),
            ));
        };

        let mut groups = Vec::with_capacity(map.len());
        for (engine_name, rules) in map {
            let items = match rules {
                Value::Array(items) => items,
                single @ Value::Object(_) => vec![single],
                other => {
                    log::warn!(
                        "Skip engine group with unsupported shape: engine={} kind={}",
                        engine_name,
                        json_kind(&other)
                    );
                    continue;
                }
            };

            let mut entries = Vec::with_capacity(items.len());
            for (idx, item) in items.into_iter().enumerate() {
                match serde_json::from_value::<RawEngineDefinition>(item) {
                    Ok(def) => entries.push(def),
                    Err(e) => log::warn!(
                        "Skip malformed rule entry: engine={} index={} error={}",
                        engine_name,
                        idx,
                        e
                    ),
                }
            }

            groups.push(RawEngineGroup {
                engine_name,
                entries,
            });
        }

        Ok(Self { groups })
    }

    /// 追加一个规则组（链式构造，便于内存中组装规则表）
    pub fn with_group(mut self, engine_name: impl Into<String>, entries: Vec<RawEngineDefinition>) -> Self {
        self.groups.push(RawEngineGroup {
            engine_name: engine_name.into(),
            entries,
        });
        self
    }

    pub fn engine_count(&self) -> usize {
        self.groups.len()
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_or_list_fields() {
        let table = RawRuleTable::from_json_str(
            r#"{
                "Example": [
                    {"urls": "example.com", "params": ["q", "/s\\/(.+)/"], "charsets": "UTF-8", "unknown": 1},
                    {"urls": ["m.example.com"], "params": null, "hiddenkeyword": ["/"]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(table.engine_count(), 1);
        let group = &table.groups[0];
        assert_eq!(group.engine_name, "Example");
        assert_eq!(group.entries[0].urls(), vec!["example.com"]);
        assert_eq!(group.entries[0].params(), Some(vec!["q".to_string(), "/s\\/(.+)/".to_string()]));
        assert_eq!(group.entries[0].charsets(), Some(vec!["UTF-8".to_string()]));
        assert_eq!(group.entries[1].params(), None);
        assert_eq!(group.entries[1].hidden_keyword(), Some(vec!["/".to_string()]));
    }

    #[test]
    fn test_parse_keeps_engine_order() {
        let table = RawRuleTable::from_json_str(
            r#"{"Zeta": [{"urls": ["z.com"]}], "Alpha": [{"urls": ["a.com"]}]}"#,
        )
        .unwrap();
        let names: Vec<_> = table.groups.iter().map(|g| g.engine_name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let table = RawRuleTable::from_json_str(
            r#"{"Bad": [{"urls": 42}, {"urls": ["ok.com"], "params": ["q"]}], "Worse": "x"}"#,
        )
        .unwrap();
        assert_eq!(table.engine_count(), 1);
        assert_eq!(table.entry_count(), 1);
    }

    #[test]
    fn test_parse_rejects_non_object_root() {
        assert!(matches!(
            RawRuleTable::from_json_str("[1, 2]"),
            Err(CoreError::RuleParseError(_))
        ));
        assert!(matches!(
            RawRuleTable::from_json_str("{not json"),
            Err(CoreError::JsonError(_))
        ));
    }
}
