//! End-to-end document generation
//!
//! Ties the stages together: load the logo (optional, failures degrade
//! to the text wordmark), parse the article body, lay out pages, stamp
//! page numbers, and assemble the PDF. The caller gets back the bytes
//! and a filesystem-safe filename derived from the title.

use std::path::Path;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::article::{Article, Author};
use crate::content_model::parse;
use crate::geometry::PageGeometry;
use crate::layout_engine::{render, stamp_page_numbers, PageHeader};
use crate::pdf_exporter::{export, Logo};

/// Wordmark shown in the header band when no logo is available
pub const WORDMARK: &str = "Ágora";

const MAX_SLUG_LEN: usize = 50;
const FALLBACK_SLUG: &str = "artigo";

/// A generated document ready to hand to the caller
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub filename: String,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("layout produced no pages")]
    EmptyDocument,
}

/// Generate the PDF for an article
pub fn generate(
    article: &Article,
    author: &Author,
    geometry: &PageGeometry,
    logo_path: Option<&Path>,
) -> Result<Artifact, GenerateError> {
    let logo = logo_path.and_then(load_logo);

    let blocks = parse(&article.content);
    let byline = article.byline(author);
    let header = PageHeader {
        wordmark: WORDMARK,
        title: &article.title,
        byline: &byline,
        logo: logo.as_ref().map(Logo::dimensions),
    };

    let mut doc = render(&blocks, geometry, &header);
    if doc.pages.is_empty() {
        return Err(GenerateError::EmptyDocument);
    }
    stamp_page_numbers(&mut doc, geometry);
    let bytes = export(doc, geometry, logo.as_ref());

    Ok(Artifact {
        bytes,
        filename: format!("{}.pdf", sanitize_title(&article.title)),
    })
}

/// Read and decode the logo, degrading to `None` on any failure
fn load_logo(path: &Path) -> Option<Logo> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("logo unreadable at {}: {err}, using wordmark", path.display());
            return None;
        }
    };
    match Logo::prepare(&bytes) {
        Ok(logo) => Some(logo),
        Err(err) => {
            log::warn!("logo decode failed for {}: {err}, using wordmark", path.display());
            None
        }
    }
}

/// Build a filesystem-safe slug from an article title
///
/// Diacritics are stripped via NFD decomposition, everything outside
/// `[a-z0-9 -]` is dropped, and whitespace runs collapse to hyphens.
pub fn sanitize_title(title: &str) -> String {
    let stripped: String = title
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect();
    let cleaned: String = stripped
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .collect();
    let slug: String = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(MAX_SLUG_LEN)
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_article(content: &str) -> (Article, Author) {
        (
            Article {
                id: 1,
                title: "Ágora: Relatório 2024!".into(),
                content: content.into(),
                tag: Some("economia".into()),
                author_id: 3,
                created_at: Some("2024-06-01".into()),
                updated_at: None,
            },
            Author { id: 3, name: "Ana Silva".into() },
        )
    }

    #[test]
    fn test_sanitize_strips_diacritics_and_punctuation() {
        assert_eq!(
            sanitize_title("Ágora: Relatório 2024!"),
            "agora-relatorio-2024"
        );
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_title("  Muitos   espaços \t aqui "), "muitos-espacos-aqui");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "palavra ".repeat(20);
        assert!(sanitize_title(&long).len() <= MAX_SLUG_LEN);
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_title("!!!"), "artigo");
        assert_eq!(sanitize_title(""), "artigo");
    }

    #[test]
    fn test_generate_produces_pdf_and_filename() {
        let (article, author) = sample_article("# Seção\n\nTexto do corpo.");
        let artifact = generate(&article, &author, &PageGeometry::default(), None).unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF-"));
        assert_eq!(artifact.filename, "agora-relatorio-2024.pdf");
    }

    #[test]
    fn test_generate_with_missing_logo_degrades() {
        let (article, author) = sample_article("Corpo simples.");
        let missing = Path::new("/nonexistent/logo.png");
        let artifact =
            generate(&article, &author, &PageGeometry::default(), Some(missing)).unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF-"));
    }
}
