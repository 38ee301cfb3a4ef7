//! Block-level content elements
//!
//! This module defines the structured representation of article content
//! at the block level (headings, paragraphs, list items, blockquotes,
//! rules, breaks). Blocks are produced in source order by the block
//! parser and are read-only for the layout engine.

use super::segment::{plain_text, TextSegment};

/// The structural kind of a content block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A regular paragraph of formatted text
    Paragraph,
    /// Level 1 heading (`#`)
    Heading1,
    /// Level 2 heading (`##`)
    Heading2,
    /// Level 3 heading (`###`)
    Heading3,
    /// An unordered list item (`-` / `*`)
    ListItem,
    /// An ordered list item (`1.`)
    OrderedListItem,
    /// A quoted line or paragraph (`>`)
    Blockquote,
    /// A horizontal rule (`---`, `***`, `___`)
    HorizontalRule,
    /// An explicit line break (from `<br>` markers)
    LineBreak,
}

/// A block-level unit of article content
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    /// The structural kind of this block
    pub kind: BlockKind,

    /// Formatted text segments comprising the block content
    pub segments: Vec<TextSegment>,

    /// Indentation level (list nesting, continuation paragraphs)
    pub indent: u32,

    /// One-based item number for ordered list items
    pub list_index: Option<u32>,

    /// Quote nesting depth for blockquote blocks
    pub blockquote_depth: Option<u32>,
}

impl ContentBlock {
    /// Create a paragraph block at indent 0
    pub fn paragraph(segments: Vec<TextSegment>) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            segments,
            indent: 0,
            list_index: None,
            blockquote_depth: None,
        }
    }

    /// Create a heading block for levels 1..=3
    ///
    /// Levels outside the supported range clamp to the nearest edge.
    pub fn heading(level: u32, segments: Vec<TextSegment>) -> Self {
        let kind = match level {
            0 | 1 => BlockKind::Heading1,
            2 => BlockKind::Heading2,
            _ => BlockKind::Heading3,
        };
        Self {
            kind,
            segments,
            indent: 0,
            list_index: None,
            blockquote_depth: None,
        }
    }

    /// Create an unordered list item at the given indent level
    pub fn list_item(segments: Vec<TextSegment>, indent: u32) -> Self {
        Self {
            kind: BlockKind::ListItem,
            segments,
            indent,
            list_index: None,
            blockquote_depth: None,
        }
    }

    /// Create an ordered list item at the given indent level
    pub fn ordered_list_item(segments: Vec<TextSegment>, indent: u32, index: u32) -> Self {
        Self {
            kind: BlockKind::OrderedListItem,
            segments,
            indent,
            list_index: Some(index),
            blockquote_depth: None,
        }
    }

    /// Create a blockquote block with the tracked quote depth
    pub fn blockquote(segments: Vec<TextSegment>, depth: u32) -> Self {
        Self {
            kind: BlockKind::Blockquote,
            segments,
            indent: 0,
            list_index: None,
            blockquote_depth: Some(depth),
        }
    }

    /// Create a horizontal rule block
    pub fn rule() -> Self {
        Self {
            kind: BlockKind::HorizontalRule,
            segments: Vec::new(),
            indent: 0,
            list_index: None,
            blockquote_depth: None,
        }
    }

    /// Create an explicit line break block
    pub fn line_break() -> Self {
        Self {
            kind: BlockKind::LineBreak,
            segments: Vec::new(),
            indent: 0,
            list_index: None,
            blockquote_depth: None,
        }
    }

    /// The lossless plain-text content of this block
    pub fn plain_text(&self) -> String {
        plain_text(&self.segments)
    }
}
