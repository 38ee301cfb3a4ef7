//! Source normalization pre-pass
//!
//! Legacy article bodies mix markdown with a small HTML subset. This
//! pass rewrites that subset into markdown before block recognition so a
//! single inline grammar serves both: `<br>` variants become explicit
//! line-break marker lines, anchor tags become bracket links, and
//! autolinks become bracket-link form. Line endings are normalized to
//! `\n`.

use regex::Regex;
use std::sync::OnceLock;

/// Canonical explicit line-break marker emitted by normalization
///
/// The block parser treats a line consisting of exactly this marker as a
/// [`BlockKind::LineBreak`](super::blocks::BlockKind) block.
pub const LINE_BREAK_MARKER: &str = "<br>";

fn br_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("static pattern"))
}

fn anchor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<a\s+[^>]*href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#)
            .expect("static pattern")
    })
}

fn autolink_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<(https?://[^>\s]+)>").expect("static pattern"))
}

fn email_autolink_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<([A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,})>").expect("static pattern")
    })
}

/// Normalize raw article source for the block parser
pub fn normalize(source: &str) -> String {
    let text = source.replace("\r\n", "\n").replace('\r', "\n");

    // Break tags land on their own line so block recognition sees them as
    // one logical line regardless of surrounding text.
    let text = br_re().replace_all(&text, format!("\n{LINE_BREAK_MARKER}\n"));
    let text = anchor_re().replace_all(&text, "[$2]($1)");
    let text = autolink_re().replace_all(&text, "[$1]($1)");
    let text = email_autolink_re().replace_all(&text, "[$1](mailto:$1)");

    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_br_variants_become_marker_lines() {
        let out = normalize("one<br>two<BR/>three<br />four");
        let markers = out.matches(LINE_BREAK_MARKER).count();
        assert_eq!(markers, 3);
        for line in out.lines() {
            if line.contains(LINE_BREAK_MARKER) {
                assert_eq!(line, LINE_BREAK_MARKER);
            }
        }
    }

    #[test]
    fn test_anchor_rewritten_to_bracket_link() {
        let out = normalize(r#"see <a href="http://x">the site</a> now"#);
        assert_eq!(out, "see [the site](http://x) now");
    }

    #[test]
    fn test_single_quoted_anchor() {
        let out = normalize("<a href='http://y'>y</a>");
        assert_eq!(out, "[y](http://y)");
    }

    #[test]
    fn test_autolinks() {
        assert_eq!(normalize("<http://x/a>"), "[http://x/a](http://x/a)");
        assert_eq!(
            normalize("<ana@example.com>"),
            "[ana@example.com](mailto:ana@example.com)"
        );
    }
}
