//! serpextract-engine 内核错误定义
//! 封装内核层所有核心错误，与业务层错误解耦，基于thiserror实现类型安全处理
use thiserror::Error;

use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;

/// 内核核心错误枚举
/// 说明：提取/解析链路本身是"全函数"（返回Option），此处仅覆盖规则表解析与自定义规则构造
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================== 规则相关错误 =====================
    /// 规则表解析失败（顶层结构非对象等格式错误）
    #[error("Rule parse failed: {0}")]
    RuleParseError(String),

    /// 规则表JSON反序列化失败
    #[error("Rule JSON decode failed: {0}")]
    JsonError(#[from] SerdeJsonError),

    // ===================== 编译相关错误 =====================
    /// 正则表达式编译失败（仅自定义规则构造时向上抛出，规则表编译时跳过）
    #[error("Regex compilation failed: {0}")]
    RegexCompileError(#[from] RegexError),

    // ===================== 输入相关错误 =====================
    /// URL无法解析为 scheme/host/path/query/fragment
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    /// 无效输入参数（自定义规则注册的前置条件校验失败）
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// 内核层全局Result类型别名
pub type CoreResult<T> = Result<T, CoreError>;
