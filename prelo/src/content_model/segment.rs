//! Text segment representation with formatting
//!
//! A text segment is a contiguous run of text with one consistent
//! formatting state. This is the fundamental unit for rendering
//! formatted text in the layout engine.

/// A span of text with consistent formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    /// The text content
    pub text: String,

    /// Bold formatting
    pub bold: bool,

    /// Italic formatting
    pub italic: bool,

    /// Link target URL (if this text is part of a hyperlink)
    pub link: Option<String>,
}

impl TextSegment {
    /// Create a new plain text segment
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            link: None,
        }
    }

    /// Create a new text segment with the given emphasis flags
    pub fn styled(text: impl Into<String>, bold: bool, italic: bool) -> Self {
        Self {
            text: text.into(),
            bold,
            italic,
            link: None,
        }
    }

    /// Create a new link segment
    pub fn linked(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            link: Some(url.into()),
        }
    }

    /// Check if this segment has any formatting applied
    pub fn has_formatting(&self) -> bool {
        self.bold || self.italic || self.link.is_some()
    }
}

/// Join the text of a sequence of segments into the block's plain text
///
/// The inline formatter guarantees this concatenation reproduces the
/// input with all recognized markers stripped, so the result is the
/// lossless plain-text content of the block.
pub fn plain_text(segments: &[TextSegment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_segment_has_no_formatting() {
        let seg = TextSegment::plain("hello");
        assert!(!seg.has_formatting());
        assert_eq!(seg.text, "hello");
    }

    #[test]
    fn test_link_segment_has_formatting() {
        let seg = TextSegment::linked("here", "http://example.com");
        assert!(seg.has_formatting());
        assert_eq!(seg.link.as_deref(), Some("http://example.com"));
    }

    #[test]
    fn test_plain_text_concatenation() {
        let segs = vec![
            TextSegment::styled("Bold", true, false),
            TextSegment::plain(" and "),
            TextSegment::styled("italic", false, true),
        ];
        assert_eq!(plain_text(&segs), "Bold and italic");
    }
}
