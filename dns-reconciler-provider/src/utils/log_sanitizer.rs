//! Log sanitization utilities
//!
//! Console pages are large HTML documents and session cookies are bearer
//! credentials; neither may reach the logs in full.

/// Maximum number of bytes of page text to include in log output.
const TRUNCATE_LIMIT: usize = 256;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a page body for logging.
///
/// Runs of whitespace (HTML indentation) are collapsed first, then the text is
/// cut at `TRUNCATE_LIMIT` bytes with a suffix giving the original length.
pub fn truncate_for_log(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.len() <= TRUNCATE_LIMIT {
        collapsed
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &collapsed[..floor_char_boundary(&collapsed, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// 遮蔽 `name=value` Cookie 的值，仅保留名称
pub fn mask_cookie(cookie: &str) -> String {
    match cookie.split_once('=') {
        Some((name, _)) => format!("{name}=***"),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- truncate_for_log ----

    #[test]
    fn short_string_unchanged() {
        assert_eq!(truncate_for_log("hello world"), "hello world");
    }

    #[test]
    fn html_whitespace_collapsed() {
        let page = "<div>\n    <span>Incorrect</span>\n</div>\n";
        assert_eq!(truncate_for_log(page), "<div> <span>Incorrect</span> </div>");
    }

    #[test]
    fn exactly_at_limit() {
        let s = "a".repeat(TRUNCATE_LIMIT);
        assert_eq!(truncate_for_log(&s), s);
    }

    #[test]
    fn over_limit_truncated() {
        let s = "a".repeat(TRUNCATE_LIMIT + 100);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
        assert!(result.contains(&format!("{} bytes]", TRUNCATE_LIMIT + 100)));
        assert!(result.len() < s.len());
    }

    #[test]
    fn multibyte_chars_safe() {
        let s = "你".repeat(200);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
    }

    // ---- mask_cookie ----

    #[test]
    fn cookie_value_masked() {
        assert_eq!(mask_cookie("CGISESSID=abcdef123456"), "CGISESSID=***");
        assert_eq!(mask_cookie("empty="), "empty=***");
        assert_eq!(mask_cookie("garbage"), "***");
    }
}
