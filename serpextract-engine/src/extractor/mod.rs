//! 关键词提取：规则驱动提取（含 Google 专属分支） + 朴素回退
mod google;
mod keyword;
mod naive;

pub use google::{GOOGLE, GOOGLE_IMAGES, GOOGLE_SHOPPING, GOOGLE_VIDEO};
pub use keyword::KeywordExtractor;
pub use naive::{NaiveFallback, NAIVE_PARAMS};
