//! Google 专属提取分支
//! 1. 图片预览页：关键词藏在 `prev` 参数（本身是带查询串的相对URL）
//! 2. 高级搜索：由 as_q / as_oq / as_epq / as_eq 拼出关键词
//! 3. 顶栏 tbm 参数：改写引擎名为 图片/视频/购物

use crate::url::{QueryMap, SerpUrl};

pub const GOOGLE: &str = "Google";
pub const GOOGLE_IMAGES: &str = "Google Images";
pub const GOOGLE_VIDEO: &str = "Google Video";
pub const GOOGLE_SHOPPING: &str = "Google Shopping";

const IMAGE_PREVIEW_MARKER: &str = "/imgres";
const ADVANCED_SEARCH_MARKER: &str = "as_";

/// 特殊分支处理后的上下文
#[derive(Debug, Clone)]
pub(crate) struct SpecialCase {
    /// 可能被改写的引擎名
    pub engine_name: String,
    /// 可能被 `prev` 替换的查询参数映射
    pub query: QueryMap,
    /// 高级搜索拼出的关键词（存在即短路通用提取）
    pub keyword: Option<String>,
}

pub(crate) fn apply(engine_name: &str, url: &SerpUrl, query_string: &str, query: QueryMap) -> SpecialCase {
    let mut case = SpecialCase {
        engine_name: engine_name.to_string(),
        query,
        keyword: None,
    };

    let is_google = engine_name == GOOGLE;
    if engine_name == GOOGLE_IMAGES || (is_google && query_string.contains(IMAGE_PREVIEW_MARKER)) {
        case.engine_name = GOOGLE_IMAGES.to_string();
        if let Some(prev) = case.query.first("prev").map(str::to_string) {
            match url.join(&prev) {
                Ok(prev_url) => case.query = QueryMap::parse(&prev_url.query, false),
                Err(e) => log::debug!("Keep original query, prev unparsable: error={}", e),
            }
        }
    } else if is_google && query_string.contains(ADVANCED_SEARCH_MARKER) {
        case.keyword = Some(advanced_search_keyword(&case.query));
    }

    if case.engine_name == GOOGLE {
        if let Some(name) = case.query.first("tbm").and_then(tbm_engine_name) {
            case.engine_name = name.to_string();
        }
    }

    case
}

/// 按固定顺序拼接高级搜索字段（各取首个值，存在即拼入，哪怕为空）
fn advanced_search_keyword(query: &QueryMap) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4);

    if let Some(all_words) = query.first("as_q") {
        parts.push(all_words.to_string());
    }
    if let Some(any_words) = query.first("as_oq") {
        parts.push(any_words.replace('+', " OR "));
    }
    if let Some(phrase) = query.first("as_epq") {
        parts.push(format!("\"{phrase}\""));
    }
    if let Some(excluded) = query.first("as_eq") {
        parts.push(format!("-{excluded}"));
    }

    parts.join(" ").trim().to_string()
}

fn tbm_engine_name(tbm: &str) -> Option<&'static str> {
    match tbm {
        "isch" => Some(GOOGLE_IMAGES),
        "vid" => Some(GOOGLE_VIDEO),
        "shop" => Some(GOOGLE_SHOPPING),
        _ => None,
    }
}
