//! Line-oriented block parser
//!
//! Splits normalized article source into an ordered sequence of typed
//! content blocks, delegating inline spans to the inline tokenizer.
//! Unrecognized constructs always degrade to paragraphs or literal text;
//! parsing never fails. Every multi-line scanning loop draws from an
//! explicit iteration budget, and list nesting is depth-bounded, so
//! adversarial input truncates gracefully instead of looping.

use super::blocks::ContentBlock;
use super::inline::format_inline;
use super::normalize::{normalize, LINE_BREAK_MARKER};

/// Explicit ceilings for the parser's scanning loops
///
/// The ceilings are part of the parse contract: exceeding one stops the
/// affected structure and keeps the blocks accumulated so far, reported
/// through [`ParseOutcome::truncated`].
#[derive(Debug, Clone, Copy)]
pub struct ParseLimits {
    /// Total loop-iteration budget across all scanning loops
    pub max_iterations: usize,

    /// Maximum nesting depth for sub-lists
    pub max_list_depth: u32,
}

impl ParseLimits {
    /// Default limits for an input with the given number of lines
    ///
    /// The iteration budget is proportional to input length; well-formed
    /// input consumes roughly one iteration per line.
    pub fn for_source(line_count: usize) -> Self {
        Self {
            max_iterations: line_count * 8 + 64,
            max_list_depth: 10,
        }
    }
}

/// Result of a bounded parse
#[derive(Debug)]
pub struct ParseOutcome {
    /// Blocks produced in source order
    pub blocks: Vec<ContentBlock>,

    /// True when an iteration ceiling was hit and parsing stopped early
    pub truncated: bool,
}

/// Parse article source into content blocks
///
/// Applies the normalization pre-pass, then block recognition with the
/// default limits. A hit ceiling is logged, never propagated.
pub fn parse(source: &str) -> Vec<ContentBlock> {
    let normalized = normalize(source);
    let limits = ParseLimits::for_source(normalized.lines().count());
    let outcome = parse_normalized(&normalized, limits);
    if outcome.truncated {
        log::warn!(
            "block parsing stopped at the iteration ceiling ({} iterations); kept {} blocks",
            limits.max_iterations,
            outcome.blocks.len()
        );
    }
    outcome.blocks
}

/// Parse with explicit limits, reporting truncation to the caller
pub fn parse_with_limits(source: &str, limits: ParseLimits) -> ParseOutcome {
    let normalized = normalize(source);
    parse_normalized(&normalized, limits)
}

fn parse_normalized(normalized: &str, limits: ParseLimits) -> ParseOutcome {
    let parser = BlockParser {
        lines: normalized.lines().collect(),
        pos: 0,
        blocks: Vec::new(),
        remaining: limits.max_iterations,
        truncated: false,
        max_list_depth: limits.max_list_depth,
    };
    parser.run()
}

/// Parser state for line-oriented block recognition
struct BlockParser<'a> {
    /// Input lines after normalization
    lines: Vec<&'a str>,
    /// Index of the next unconsumed line
    pos: usize,
    /// Blocks produced so far
    blocks: Vec<ContentBlock>,
    /// Remaining loop-iteration budget
    remaining: usize,
    /// Whether the budget ran out
    truncated: bool,
    /// List nesting ceiling
    max_list_depth: u32,
}

/// A recognized list item marker with its remaining text
enum ListMarker<'a> {
    Unordered(&'a str),
    Ordered(u32, &'a str),
}

impl<'a> BlockParser<'a> {
    /// Spend one iteration from the budget
    fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            self.truncated = true;
            return false;
        }
        self.remaining -= 1;
        true
    }

    fn run(mut self) -> ParseOutcome {
        while self.pos < self.lines.len() {
            if !self.tick() {
                break;
            }
            let raw = self.lines[self.pos];
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                self.pos += 1;
            } else if trimmed == LINE_BREAK_MARKER {
                self.blocks.push(ContentBlock::line_break());
                self.pos += 1;
            } else if is_horizontal_rule(trimmed) {
                self.blocks.push(ContentBlock::rule());
                self.pos += 1;
            } else if let Some((level, text)) = heading_line(trimmed) {
                self.blocks
                    .push(ContentBlock::heading(level, format_inline(text)));
                self.pos += 1;
            } else if trimmed.starts_with('>') {
                self.consume_blockquote(0);
            } else if list_marker(trimmed).is_some() {
                self.consume_list(indent_level(raw), 0);
            } else {
                self.consume_paragraph();
            }
        }
        ParseOutcome {
            blocks: self.blocks,
            truncated: self.truncated,
        }
    }

    /// Index of the next non-blank line at or after `from`
    fn next_non_blank(&self, from: usize) -> Option<usize> {
        (from..self.lines.len()).find(|&k| !self.lines[k].trim().is_empty())
    }

    /// Consume consecutive non-special lines into one logical paragraph
    fn consume_paragraph(&mut self) {
        let mut parts: Vec<&str> = Vec::new();
        while self.pos < self.lines.len() {
            if !self.tick() {
                break;
            }
            let trimmed = self.lines[self.pos].trim();
            if trimmed.is_empty() || is_block_start(trimmed) {
                break;
            }
            parts.push(trimmed);
            self.pos += 1;
        }
        if !parts.is_empty() {
            self.blocks
                .push(ContentBlock::paragraph(format_inline(&parts.join(" "))));
        }
    }

    /// Consume a contiguous run of quoted lines
    ///
    /// A blank line continues the quote only when the next non-blank line
    /// is itself `>`-prefixed; the accumulated body is then re-scanned
    /// line by line for nested headings and paragraphs.
    fn consume_blockquote(&mut self, indent: u32) {
        let mut body: Vec<&'a str> = Vec::new();
        while self.pos < self.lines.len() {
            if !self.tick() {
                break;
            }
            let trimmed = self.lines[self.pos].trim();
            if trimmed.starts_with('>') {
                body.push(trimmed);
                self.pos += 1;
                continue;
            }
            if trimmed.is_empty() {
                if let Some(k) = self.next_non_blank(self.pos + 1) {
                    if self.lines[k].trim().starts_with('>') {
                        // Paragraph separator inside a continued quote.
                        body.push("");
                        self.pos = k;
                        continue;
                    }
                }
            }
            break;
        }
        self.emit_quote_body(&body, indent);
    }

    /// Re-scan stripped quote lines into blockquote blocks
    fn emit_quote_body(&mut self, body: &[&str], indent: u32) {
        let mut para: Vec<&str> = Vec::new();
        let mut para_depth = 1;

        for line in body {
            if line.is_empty() {
                self.flush_quote_paragraph(&mut para, para_depth, indent);
                continue;
            }
            let (depth, content) = strip_quote_markers(line);
            let content = content.trim();
            if content.is_empty() {
                self.flush_quote_paragraph(&mut para, para_depth, indent);
                continue;
            }
            if let Some((_, text)) = heading_line(content) {
                self.flush_quote_paragraph(&mut para, para_depth, indent);
                // A heading inside a quote stays a quote block; its text
                // is emphasized rather than sized.
                let mut segments = format_inline(text);
                for seg in &mut segments {
                    seg.bold = true;
                }
                let mut block = ContentBlock::blockquote(segments, depth);
                block.indent = indent;
                self.blocks.push(block);
                continue;
            }
            if depth != para_depth {
                // A depth change ends the running quote paragraph.
                self.flush_quote_paragraph(&mut para, para_depth, indent);
                para_depth = depth;
            }
            para.push(content);
        }
        self.flush_quote_paragraph(&mut para, para_depth, indent);
    }

    fn flush_quote_paragraph(&mut self, para: &mut Vec<&str>, depth: u32, indent: u32) {
        if para.is_empty() {
            return;
        }
        let text = para.join(" ");
        para.clear();
        let mut block = ContentBlock::blockquote(format_inline(&text), depth);
        block.indent = indent;
        self.blocks.push(block);
    }

    /// Consume a list at `base` indent, recursing into deeper sub-lists
    fn consume_list(&mut self, base: u32, depth: u32) {
        if depth >= self.max_list_depth {
            log::warn!(
                "list nesting exceeded {} levels, flattening remainder",
                self.max_list_depth
            );
            self.consume_flat_list_paragraph(base);
            return;
        }

        let mut next_ordered: Option<u32> = None;
        while self.pos < self.lines.len() {
            if !self.tick() {
                return;
            }
            let raw = self.lines[self.pos];
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                // A blank ends the list only when the following non-blank
                // line is outdented below base and is not a list marker.
                let Some(k) = self.next_non_blank(self.pos + 1) else {
                    self.pos = self.lines.len();
                    return;
                };
                let next = self.lines[k];
                if indent_level(next) < base && list_marker(next.trim()).is_none() {
                    return;
                }
                self.pos = k;
                continue;
            }
            if trimmed == LINE_BREAK_MARKER
                || is_horizontal_rule(trimmed)
                || heading_line(trimmed).is_some()
            {
                return;
            }

            let indent = indent_level(raw);
            if indent < base {
                return;
            }
            if indent == base {
                match list_marker(trimmed) {
                    Some(ListMarker::Unordered(text)) => {
                        self.blocks
                            .push(ContentBlock::list_item(format_inline(text), base));
                        next_ordered = None;
                        self.pos += 1;
                    }
                    Some(ListMarker::Ordered(n, text)) => {
                        let index = next_ordered.unwrap_or(n);
                        self.blocks.push(ContentBlock::ordered_list_item(
                            format_inline(text),
                            base,
                            index,
                        ));
                        next_ordered = Some(index + 1);
                        self.pos += 1;
                    }
                    None => return,
                }
                continue;
            }

            // Deeper indent: sub-list, nested quote, or continuation text
            // belonging to the previous item.
            if list_marker(trimmed).is_some() {
                self.consume_list(indent, depth + 1);
            } else if trimmed.starts_with('>') {
                self.consume_blockquote(indent);
            } else {
                self.consume_continuation_paragraph(indent);
            }
        }
    }

    /// Continuation content of a list item, as an indented paragraph
    fn consume_continuation_paragraph(&mut self, indent: u32) {
        let mut parts: Vec<&str> = Vec::new();
        while self.pos < self.lines.len() {
            if !self.tick() {
                break;
            }
            let raw = self.lines[self.pos];
            let trimmed = raw.trim();
            if trimmed.is_empty() || indent_level(raw) < indent || is_block_start(trimmed) {
                break;
            }
            parts.push(trimmed);
            self.pos += 1;
        }
        if !parts.is_empty() {
            let mut block = ContentBlock::paragraph(format_inline(&parts.join(" ")));
            block.indent = indent;
            self.blocks.push(block);
        }
    }

    /// Nesting ceiling fallback: the rest of the structure as one paragraph
    fn consume_flat_list_paragraph(&mut self, base: u32) {
        let mut parts: Vec<&str> = Vec::new();
        while self.pos < self.lines.len() {
            if !self.tick() {
                break;
            }
            let raw = self.lines[self.pos];
            let trimmed = raw.trim();
            if trimmed.is_empty() || indent_level(raw) < base {
                break;
            }
            let text = match list_marker(trimmed) {
                Some(ListMarker::Unordered(text)) | Some(ListMarker::Ordered(_, text)) => text,
                None => trimmed,
            };
            parts.push(text);
            self.pos += 1;
        }
        if !parts.is_empty() {
            let mut block = ContentBlock::paragraph(format_inline(&parts.join(" ")));
            block.indent = base;
            self.blocks.push(block);
        }
    }
}

/// Strip leading `>` markers, returning the quote depth and the rest
///
/// Depth is the number of markers consumed and is at least 1; callers
/// only pass `>`-prefixed lines.
fn strip_quote_markers(line: &str) -> (u32, &str) {
    let mut depth = 0u32;
    let mut rest = line;
    while let Some(after) = rest.trim_start().strip_prefix('>') {
        depth += 1;
        rest = after;
    }
    (depth.max(1), rest)
}

/// Indent level of a line: `floor(leading_spaces / 4)`, tabs count as 4
fn indent_level(line: &str) -> u32 {
    let mut spaces = 0u32;
    for c in line.chars() {
        match c {
            ' ' => spaces += 1,
            '\t' => spaces += 4,
            _ => break,
        }
    }
    spaces / 4
}

/// `---` / `***` / `___` with at least three marker characters
fn is_horizontal_rule(trimmed: &str) -> bool {
    if trimmed.len() < 3 {
        return false;
    }
    let mut chars = trimmed.chars();
    let first = chars.next().expect("non-empty");
    matches!(first, '-' | '*' | '_') && chars.all(|c| c == first)
}

/// `#`..`###` followed by a space
fn heading_line(trimmed: &str) -> Option<(u32, &str)> {
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if !(1..=3).contains(&hashes) {
        return None;
    }
    let rest = trimmed[hashes..].strip_prefix(' ')?;
    Some((hashes as u32, rest.trim()))
}

/// Recognize `- ` / `* ` / `1. ` item markers
fn list_marker(trimmed: &str) -> Option<ListMarker<'_>> {
    if let Some(text) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        return Some(ListMarker::Unordered(text.trim_start()));
    }
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = trimmed[digits..].strip_prefix('.')?;
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let number = trimmed[..digits].parse().ok()?;
    Some(ListMarker::Ordered(number, rest.trim_start()))
}

/// Whether a line starts a different block (ends a running paragraph)
fn is_block_start(trimmed: &str) -> bool {
    trimmed == LINE_BREAK_MARKER
        || is_horizontal_rule(trimmed)
        || heading_line(trimmed).is_some()
        || trimmed.starts_with('>')
        || list_marker(trimmed).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_model::blocks::BlockKind;

    #[test]
    fn test_heading_para_list_scenario() {
        let blocks = parse("# Title\n\nPara one.\n\n- item a\n- item b");
        let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Heading1,
                BlockKind::Paragraph,
                BlockKind::ListItem,
                BlockKind::ListItem,
            ]
        );
        assert_eq!(blocks[0].plain_text(), "Title");
        assert_eq!(blocks[1].plain_text(), "Para one.");
        assert_eq!(blocks[2].plain_text(), "item a");
        assert_eq!(blocks[3].plain_text(), "item b");
    }

    #[test]
    fn test_heading_levels() {
        let blocks = parse("# One\n## Two\n### Three\n#### Four");
        assert_eq!(blocks[0].kind, BlockKind::Heading1);
        assert_eq!(blocks[1].kind, BlockKind::Heading2);
        assert_eq!(blocks[2].kind, BlockKind::Heading3);
        // Four hashes is not a supported heading; it degrades to a paragraph.
        assert_eq!(blocks[3].kind, BlockKind::Paragraph);
        assert_eq!(blocks[3].plain_text(), "#### Four");
    }

    #[test]
    fn test_horizontal_rules_and_breaks() {
        let blocks = parse("before\n\n---\n\nafter<br>rest");
        let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Paragraph,
                BlockKind::HorizontalRule,
                BlockKind::Paragraph,
                BlockKind::LineBreak,
                BlockKind::Paragraph,
            ]
        );
    }

    #[test]
    fn test_blockquote_joins_lines() {
        let blocks = parse("> Line one\n> Line two");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Blockquote);
        assert_eq!(blocks[0].plain_text(), "Line one Line two");
        assert_eq!(blocks[0].blockquote_depth, Some(1));
    }

    #[test]
    fn test_nested_blockquote_depth() {
        let blocks = parse("> outer\n> > inner");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].blockquote_depth, Some(1));
        assert_eq!(blocks[1].blockquote_depth, Some(2));
        assert_eq!(blocks[1].plain_text(), "inner");
    }

    #[test]
    fn test_quote_marker_stripping() {
        assert_eq!(strip_quote_markers("> text"), (1, " text"));
        assert_eq!(strip_quote_markers("> > inner"), (2, " inner"));
        assert_eq!(strip_quote_markers(">>tight"), (2, "tight"));
    }

    #[test]
    fn test_blockquote_depth_decrease_starts_new_block() {
        let blocks = parse("> > deep\n> shallow");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].blockquote_depth, Some(2));
        assert_eq!(blocks[0].plain_text(), "deep");
        assert_eq!(blocks[1].blockquote_depth, Some(1));
        assert_eq!(blocks[1].plain_text(), "shallow");
    }

    #[test]
    fn test_blockquote_blank_then_quote_continues() {
        let blocks = parse("> first\n\n> second\n\nplain");
        // Blank followed by another `>` line stays inside the quote run,
        // separating two quote paragraphs.
        assert_eq!(blocks[0].kind, BlockKind::Blockquote);
        assert_eq!(blocks[1].kind, BlockKind::Blockquote);
        assert_eq!(blocks[2].kind, BlockKind::Paragraph);
        assert_eq!(blocks[2].plain_text(), "plain");
    }

    #[test]
    fn test_ordered_list_indices() {
        let blocks = parse("3. a\n4. b\n5. c");
        assert_eq!(blocks[0].list_index, Some(3));
        assert_eq!(blocks[1].list_index, Some(4));
        assert_eq!(blocks[2].list_index, Some(5));
        assert!(blocks.iter().all(|b| b.kind == BlockKind::OrderedListItem));
    }

    #[test]
    fn test_nested_list_indent() {
        let blocks = parse("- top\n    - sub a\n    - sub b\n- top two");
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].indent, 0);
        assert_eq!(blocks[1].indent, 1);
        assert_eq!(blocks[2].indent, 1);
        assert_eq!(blocks[3].indent, 0);
        assert_eq!(blocks[3].plain_text(), "top two");
    }

    #[test]
    fn test_list_item_continuation_paragraph() {
        let blocks = parse("- item\n    more detail here\n- next");
        assert_eq!(blocks[0].kind, BlockKind::ListItem);
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(blocks[1].indent, 1);
        assert_eq!(blocks[1].plain_text(), "more detail here");
        assert_eq!(blocks[2].kind, BlockKind::ListItem);
    }

    #[test]
    fn test_blank_inside_list_absorbed() {
        let blocks = parse("- a\n\n- b\n\nout");
        let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::ListItem, BlockKind::ListItem, BlockKind::Paragraph]
        );
    }

    #[test]
    fn test_paragraph_lines_joined_with_spaces() {
        let blocks = parse("one\ntwo\nthree\n\nfour");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].plain_text(), "one two three");
        assert_eq!(blocks[1].plain_text(), "four");
    }

    #[test]
    fn test_deep_list_nesting_flattens() {
        let mut source = String::new();
        for depth in 0..50 {
            source.push_str(&" ".repeat(depth * 4));
            source.push_str(&format!("- level {depth}\n"));
        }
        let blocks = parse(&source);
        // Ten levels of real items, then the remainder as one flat paragraph.
        let items = blocks
            .iter()
            .filter(|b| b.kind == BlockKind::ListItem)
            .count();
        assert_eq!(items, 10);
        let flat = blocks.last().expect("flattened remainder");
        assert_eq!(flat.kind, BlockKind::Paragraph);
        assert!(flat.plain_text().contains("level 49"));
    }

    #[test]
    fn test_iteration_ceiling_is_honored() {
        let source = "line\n".repeat(1_000);
        let outcome = parse_with_limits(
            &source,
            ParseLimits {
                max_iterations: 20,
                max_list_depth: 10,
            },
        );
        assert!(outcome.truncated);
        assert!(outcome.blocks.len() <= 20);
    }

    #[test]
    fn test_html_subset_flows_through_normalization() {
        let blocks = parse(r#"Veja <a href="http://x">aqui</a> agora"#);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].plain_text(), "Veja aqui agora");
        assert!(blocks[0].segments.iter().any(|s| s.link.is_some()));
    }
}
