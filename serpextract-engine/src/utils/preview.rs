use std::fmt::{self, Write};

/// 日志预览默认最大字符数（Referrer URL 可能非常长，例如 Google 图片跳转）
pub const DEFAULT_PREVIEW_LEN: usize = 120;

/// 日志预览：连续空白折叠为单个空格，超出长度追加省略号
/// 仅在Display时遍历，不创建中间String
#[inline(always)]
pub fn preview_compact<'a>(s: &'a str, max_len: usize) -> impl fmt::Display + 'a {
    struct CompactView<'a> {
        source: &'a str,
        max_length: usize,
    }

    impl fmt::Display for CompactView<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut written = 0;
            let mut pending_space = false;

            for ch in self.source.chars() {
                if ch.is_whitespace() {
                    pending_space = written > 0;
                    continue;
                }
                if written >= self.max_length {
                    return f.write_char('…');
                }
                if pending_space {
                    f.write_char(' ')?;
                    written += 1;
                    pending_space = false;
                }
                f.write_char(ch)?;
                written += 1;
            }
            Ok(())
        }
    }

    CompactView {
        source: s,
        max_length: max_len,
    }
}

/// 以默认长度预览URL
#[inline(always)]
pub fn preview_url(url: &str) -> impl fmt::Display + '_ {
    preview_compact(url, DEFAULT_PREVIEW_LEN)
}
