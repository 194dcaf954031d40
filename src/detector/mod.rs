//! 检测模块：SERP 识别与关键词提取
pub mod detector;
pub mod global;

// 导出核心接口
pub use self::detector::{
    all_query_params, all_query_params_by_domain, extract, is_serp, register_custom_rule,
    resolve_rule, SerpDetector,
};
pub use self::global::{init_global_detector, init_global_detector_with_rules};
