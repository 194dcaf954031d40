//! 关键词后处理工具模块
//! 负责对提取出的原始关键词做大小写、首尾空白与内部空白的规范化

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ExtractOptions;

/// 连续空白（Unicode 空白字符）
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// 关键词规范化工具类
pub struct KeywordNormalizer;

impl KeywordNormalizer {
    /// 按选项规范化关键词
    ///
    /// 顺序固定：小写 → 去首尾空白 → 折叠连续空白为单个ASCII空格，
    /// 每一步可独立关闭
    pub fn normalize(keyword: &str, options: &ExtractOptions) -> String {
        let mut value: Cow<'_, str> = Cow::Borrowed(keyword);

        if options.lower_case {
            value = Cow::Owned(value.to_lowercase());
        }
        if options.trim {
            value = match value {
                Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
                Cow::Owned(s) => Cow::Owned(s.trim().to_string()),
            };
        }
        if options.collapse_whitespace {
            value = Cow::Owned(WHITESPACE_RUN.replace_all(&value, " ").into_owned());
        }

        value.into_owned()
    }
}
