//! Content model for the parsing stage
//!
//! This module defines the structures produced by the markdown parsing
//! stage: styled text segments and typed content blocks, plus the
//! normalization pre-pass, the inline tokenizer, and the block parser
//! that produce them.

// Submodules
mod blocks;
mod inline;
mod normalize;
mod parser;
mod segment;

// Re-export public types
pub use blocks::{BlockKind, ContentBlock};
pub use inline::{format_inline, MAX_INLINE_DEPTH};
pub use normalize::{normalize, LINE_BREAK_MARKER};
pub use parser::{parse, parse_with_limits, ParseLimits, ParseOutcome};
pub use segment::{plain_text, TextSegment};
