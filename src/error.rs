//! 全局错误类型定义
//! 提取/解析链路返回Option，不经过此处；此处仅覆盖规则加载、检测器初始化与自定义规则注册
use serpextract_engine::CoreError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerpError {
    // 内核错误（规则表解析/自定义规则构造）
    #[error("内核错误：{0}")]
    Core(#[from] CoreError),

    // 规则相关错误
    #[error("规则加载失败：{0}")]
    RuleLoadError(String),

    // 检测相关错误
    #[error("检测器初始化失败: {0}")]
    DetectorInitError(String),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

// 全局Result类型
pub type SerpResult<T> = Result<T, SerpError>;
