//! Inline formatting tokenizer
//!
//! Converts a run of raw text into an ordered sequence of styled text
//! segments, handling nested and overlapping emphasis markers, links and
//! inline code. Scanning is a single left-to-right pass; nested markers
//! are resolved with depth-bounded recursion so pathological inputs can
//! never exhaust the stack.
//!
//! Output invariant: concatenating the produced segment texts in order
//! equals the input with all recognized markers removed and link targets
//! resolved. Markdown is never "invalid" here; an unmatched marker is
//! literal text.

use super::segment::TextSegment;

/// Maximum recursion depth for nested emphasis/link markers
///
/// Beyond this depth the remaining text is returned as one unformatted
/// segment. This is a termination contract, not a tuning knob.
pub const MAX_INLINE_DEPTH: u32 = 5;

/// Emphasis markers, longest first, with the style flags they apply
///
/// Adding a marker is a table edit, not new control flow.
const EMPHASIS_MARKERS: &[(&str, bool, bool)] = &[
    ("***", true, true),
    ("___", true, true),
    ("**", true, false),
    ("__", true, false),
    ("*", false, true),
    ("_", false, true),
];

/// Formatting state inherited from enclosing markers
#[derive(Debug, Clone, Copy, Default)]
struct InlineStyle<'a> {
    bold: bool,
    italic: bool,
    link: Option<&'a str>,
}

impl<'a> InlineStyle<'a> {
    fn with_emphasis(self, bold: bool, italic: bool) -> Self {
        Self {
            bold: self.bold || bold,
            italic: self.italic || italic,
            link: self.link,
        }
    }

    fn with_link(self, url: &'a str) -> Self {
        Self {
            link: Some(self.link.unwrap_or(url)),
            ..self
        }
    }

    fn segment(&self, text: impl Into<String>) -> TextSegment {
        TextSegment {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
            link: self.link.map(str::to_string),
        }
    }
}

/// Format a run of raw text into styled segments
pub fn format_inline(text: &str) -> Vec<TextSegment> {
    scan(text, 0, InlineStyle::default())
}

/// Depth-bounded scanning pass
///
/// `style` carries the formatting inherited from enclosing markers; at
/// [`MAX_INLINE_DEPTH`] the remaining text is passed through unformatted.
fn scan<'a>(text: &'a str, depth: u32, style: InlineStyle<'a>) -> Vec<TextSegment> {
    if text.is_empty() {
        return Vec::new();
    }
    if depth >= MAX_INLINE_DEPTH {
        return vec![TextSegment::plain(text)];
    }

    let mut segments: Vec<TextSegment> = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        // 1. Link syntax: [text](url "optional title")
        if rest.starts_with('[') {
            if let Some((label, url, consumed)) = parse_link(rest) {
                flush_plain(&mut plain, &mut segments, style);
                segments.extend(scan(label, depth + 1, style.with_link(url)));
                i += consumed;
                continue;
            }
        }

        // 2-4. Emphasis markers, longest first; a marker without a closer
        // falls through to the next shorter candidate, then to literal text.
        if let Some((consumed, styled)) = try_emphasis(text, i, depth, style) {
            flush_plain(&mut plain, &mut segments, style);
            segments.extend(styled);
            i += consumed;
            continue;
        }

        // 5. Inline code span: always a plain segment, even when the span
        // is wrapped in emphasis markers.
        if rest.starts_with('`') {
            if let Some(end) = rest[1..].find('`') {
                flush_plain(&mut plain, &mut segments, style);
                if end > 0 {
                    segments.push(TextSegment::plain(&rest[1..1 + end]));
                }
                i += end + 2;
                continue;
            }
        }

        // 6. Ordinary character, accumulate into the current run
        let c = rest.chars().next().expect("non-empty remainder");
        plain.push(c);
        i += c.len_utf8();
    }

    flush_plain(&mut plain, &mut segments, style);
    segments
}

/// Try every emphasis marker at position `i`, longest first
///
/// Returns the consumed byte count and the inner segments when an opener
/// with a matching closer is found.
fn try_emphasis<'a>(
    text: &'a str,
    i: usize,
    depth: u32,
    style: InlineStyle<'a>,
) -> Option<(usize, Vec<TextSegment>)> {
    let rest = &text[i..];
    for &(marker, bold, italic) in EMPHASIS_MARKERS {
        if !rest.starts_with(marker) {
            continue;
        }
        // A single marker is only an opener when it is not flanked by the
        // same marker character; this disambiguates `*` from `**`.
        if marker.len() == 1 {
            let mc = marker.as_bytes()[0];
            if rest.as_bytes().get(1) == Some(&mc) {
                continue;
            }
            if i > 0 && text.as_bytes()[i - 1] == mc {
                continue;
            }
        }
        // Single forward scan for the closing marker; none means the
        // opener is literal text and a shorter marker may still apply.
        let Some(close) = rest[marker.len()..].find(marker) else {
            continue;
        };
        let inner = &rest[marker.len()..marker.len() + close];
        let styled = scan(inner, depth + 1, style.with_emphasis(bold, italic));
        let consumed = marker.len() + close + marker.len();
        return Some((consumed, styled));
    }
    None
}

/// Parse `[label](url "optional title")` at the start of `rest`
///
/// Returns the label, the url with any title suffix stripped, and the
/// total byte length consumed. `None` means the bracket is literal.
fn parse_link(rest: &str) -> Option<(&str, &str, usize)> {
    let close_bracket = rest.find(']')?;
    let after = &rest[close_bracket + 1..];
    if !after.starts_with('(') {
        return None;
    }
    let close_paren = after.find(')')?;
    let label = &rest[1..close_bracket];
    let mut url = after[1..close_paren].trim();
    // Strip an optional `"title"` suffix from the target.
    if let Some(quote) = url.find(" \"") {
        url = url[..quote].trim_end();
    }
    let consumed = close_bracket + 1 + close_paren + 1;
    Some((label, url, consumed))
}

fn flush_plain(plain: &mut String, segments: &mut Vec<TextSegment>, style: InlineStyle<'_>) {
    if !plain.is_empty() {
        segments.push(style.segment(std::mem::take(plain)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_model::segment::plain_text;

    #[test]
    fn test_mixed_emphasis_scenario() {
        let segs = format_inline("**Bold** and *italic* and ***both***.");
        assert_eq!(
            segs,
            vec![
                TextSegment::styled("Bold", true, false),
                TextSegment::plain(" and "),
                TextSegment::styled("italic", false, true),
                TextSegment::plain(" and "),
                TextSegment::styled("both", true, true),
                TextSegment::plain("."),
            ]
        );
    }

    #[test]
    fn test_underscore_markers() {
        let segs = format_inline("__bold__ and _italic_");
        assert_eq!(
            segs,
            vec![
                TextSegment::styled("bold", true, false),
                TextSegment::plain(" and "),
                TextSegment::styled("italic", false, true),
            ]
        );
    }

    #[test]
    fn test_link_with_title_suffix() {
        let segs = format_inline("See [here](http://x \"Example\") now");
        assert_eq!(
            segs,
            vec![
                TextSegment::plain("See "),
                TextSegment::linked("here", "http://x"),
                TextSegment::plain(" now"),
            ]
        );
    }

    #[test]
    fn test_link_inside_bold() {
        let segs = format_inline("**see [docs](http://d)**");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0], TextSegment::styled("see ", true, false));
        assert!(segs[1].bold);
        assert_eq!(segs[1].text, "docs");
        assert_eq!(segs[1].link.as_deref(), Some("http://d"));
    }

    #[test]
    fn test_bold_inside_link_label() {
        let segs = format_inline("[**docs**](http://d)");
        assert_eq!(segs.len(), 1);
        assert!(segs[0].bold);
        assert_eq!(segs[0].text, "docs");
        assert_eq!(segs[0].link.as_deref(), Some("http://d"));
    }

    #[test]
    fn test_code_span_stays_plain_inside_bold() {
        let segs = format_inline("run **`cargo build`** now");
        let code = segs.iter().find(|s| s.text == "cargo build").unwrap();
        assert!(!code.bold && !code.italic);
    }

    #[test]
    fn test_unclosed_marker_is_literal() {
        let segs = format_inline("2 * 3 equals 6");
        assert_eq!(plain_text(&segs), "2 * 3 equals 6");
    }

    #[test]
    fn test_round_trip_strips_markers_losslessly() {
        let input = "a **b** c *d* e ***f*** [g](http://h) `i` j";
        let segs = format_inline(input);
        assert_eq!(plain_text(&segs), "a b c d e f g i j");
    }

    #[test]
    fn test_pathological_stars_terminate() {
        let input = "*".repeat(10_000);
        let segs = format_inline(&input);
        // Returns promptly, and never invents characters that were not
        // in the input.
        for seg in &segs {
            assert!(seg.text.chars().all(|c| c == '*'));
        }
    }

    #[test]
    fn test_adjacent_single_marker_rejected() {
        // `**` must never parse as two nested singles.
        let segs = format_inline("**x**");
        assert_eq!(segs, vec![TextSegment::styled("x", true, false)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(format_inline("").is_empty());
    }
}
