//! prelo - markdown article to paginated PDF
//!
//! Compiles a markdown article into a print-ready A4 PDF: inline
//! emphasis and links, block structure, deterministic page layout with
//! header band and page numbers, and direct PDF assembly.

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod article;
pub mod content_model;
pub mod fonts;
pub mod geometry;
pub mod layout_engine;
pub mod pdf_exporter;
pub mod pipeline;
pub mod rendered_document;

pub use article::{Article, Author};
pub use geometry::PageGeometry;
pub use pipeline::{generate, Artifact, GenerateError};
