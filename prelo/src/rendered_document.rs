//! Intermediate representation of a fully laid-out document
//!
//! The layout engine produces one content stream per page plus the link
//! regions collected while placing text. Coordinates here are top-down
//! (y grows toward the page bottom); the exporter converts to PDF space.

use pdf_writer::Content;

/// A clickable rectangle on a page, in top-down page coordinates
#[derive(Debug, Clone)]
pub struct LinkRegion {
    pub page_index: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub url: String,
}

/// A laid-out document awaiting PDF assembly
pub struct RenderedDocument {
    pub pages: Vec<Content>,
    pub links: Vec<LinkRegion>,
    pub title: String,
    pub uses_logo: bool,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Link regions that land on the given page
    pub fn links_on_page(&self, page_index: u32) -> impl Iterator<Item = &LinkRegion> {
        self.links.iter().filter(move |l| l.page_index == page_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_on_page_filters_by_index() {
        let doc = RenderedDocument {
            pages: vec![Content::new(), Content::new()],
            links: vec![
                LinkRegion {
                    page_index: 0,
                    x: 10.0,
                    y: 100.0,
                    width: 40.0,
                    height: 12.0,
                    url: "https://example.com".into(),
                },
                LinkRegion {
                    page_index: 1,
                    x: 10.0,
                    y: 200.0,
                    width: 40.0,
                    height: 12.0,
                    url: "https://example.org".into(),
                },
            ],
            title: "Teste".into(),
            uses_logo: false,
        };
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.links_on_page(1).count(), 1);
        assert_eq!(doc.links_on_page(1).next().unwrap().url, "https://example.org");
    }
}
