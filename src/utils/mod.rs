//! 工具模块：提供通用工具函数
pub mod keyword_normalizer;

pub use self::keyword_normalizer::KeywordNormalizer;
