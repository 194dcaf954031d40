//! 规则模块：负责原始规则表的加载
pub mod loader;

// 导出核心接口
pub use self::loader::RuleLoader;
