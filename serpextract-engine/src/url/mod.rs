//! URL 能力：结构化解析 + 宽松的查询串解码
pub mod query;
pub mod serp_url;

pub use query::QueryMap;
pub use serp_url::SerpUrl;
