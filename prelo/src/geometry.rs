//! Page geometry configuration
//!
//! All sizes are in PDF points (1/72 inch). The defaults reproduce the
//! reference A4 layout; a `prelo.toml` file can override any subset of
//! the fields.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Size, margin and font constants governing page layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    /// Page width in points
    pub page_width: f64,

    /// Page height in points
    pub page_height: f64,

    /// Left content margin
    pub margin_left: f64,

    /// Right content margin
    pub margin_right: f64,

    /// Gap between the header band and the first content line
    pub margin_top: f64,

    /// Gap between the last content line and the footer band
    pub margin_bottom: f64,

    /// Height of the running header band
    pub header_height: f64,

    /// Height reserved for the footer band
    pub footer_height: f64,

    /// Font size for level 1 headings
    pub heading1_size: f64,

    /// Font size for level 2 headings
    pub heading2_size: f64,

    /// Font size for level 3 headings
    pub heading3_size: f64,

    /// Vertical spacing before a heading, by level (H1, H2, H3)
    pub heading_margin_before: [f64; 3],

    /// Vertical spacing after a heading, by level (H1, H2, H3)
    pub heading_margin_after: [f64; 3],

    /// Font size for body text
    pub body_size: f64,

    /// Font size for the footer page number
    pub footer_size: f64,

    /// Line height as a multiple of the font size
    pub line_height: f64,

    /// Horizontal offset per indent level
    pub indent_unit: f64,

    /// Extra left offset between a list marker and its item text
    pub list_marker_offset: f64,

    /// Vertical spacing appended after a paragraph
    pub paragraph_spacing: f64,

    /// Vertical spacing appended after a list item (tighter)
    pub list_spacing: f64,

    /// Fraction of a body line advanced by an explicit line break
    pub line_break_fraction: f64,

    /// Inner padding of the blockquote box (top/bottom and left of text)
    pub blockquote_padding: f64,

    /// Width of the colored left border of a blockquote box
    pub blockquote_border_width: f64,

    /// Background tint of the blockquote box (RGB, 0..1)
    pub blockquote_tint: [f64; 3],

    /// Color of the blockquote left border (RGB, 0..1)
    pub blockquote_border: [f64; 3],

    /// Vertical margin above and below a horizontal rule
    pub rule_margin: f64,

    /// Stroke thickness of a horizontal rule
    pub rule_thickness: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            // A4
            page_width: 595.28,
            page_height: 841.89,
            margin_left: 48.0,
            margin_right: 48.0,
            margin_top: 18.0,
            margin_bottom: 14.0,
            header_height: 54.0,
            footer_height: 36.0,
            heading1_size: 22.0,
            heading2_size: 17.0,
            heading3_size: 14.0,
            heading_margin_before: [14.0, 11.0, 9.0],
            heading_margin_after: [7.0, 5.0, 4.0],
            body_size: 11.0,
            footer_size: 9.0,
            line_height: 1.4,
            indent_unit: 18.0,
            list_marker_offset: 14.0,
            paragraph_spacing: 6.0,
            list_spacing: 3.0,
            line_break_fraction: 0.6,
            blockquote_padding: 8.0,
            blockquote_border_width: 3.0,
            blockquote_tint: [0.945, 0.945, 0.96],
            blockquote_border: [0.42, 0.45, 0.68],
            rule_margin: 10.0,
            rule_thickness: 0.8,
        }
    }
}

impl PageGeometry {
    /// Load geometry from a TOML file
    ///
    /// # Parameters
    /// * `path` - Path to the prelo.toml configuration file
    ///
    /// # Returns
    /// * `Ok(PageGeometry)` - Successfully loaded geometry
    /// * `Err(GeometryError)` - Error reading or parsing the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GeometryError> {
        let content = fs::read_to_string(&path).map_err(GeometryError::Io)?;
        let geometry: PageGeometry = toml::from_str(&content).map_err(GeometryError::Parse)?;
        Ok(geometry)
    }

    /// Horizontal width available for content
    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Y position of the first content line on a page (top-down)
    pub fn content_top(&self) -> f64 {
        self.header_height + self.margin_top
    }

    /// Y position content may not write past (top-down)
    pub fn content_limit(&self) -> f64 {
        self.page_height - self.footer_height - self.margin_bottom
    }

    /// Line height in points for the given font size
    pub fn line_height_for(&self, font_size: f64) -> f64 {
        font_size * self.line_height
    }

    /// Font size for a heading level 1..=3
    pub fn heading_size(&self, level: u32) -> f64 {
        match level {
            1 => self.heading1_size,
            2 => self.heading2_size,
            _ => self.heading3_size,
        }
    }

    /// Spacing before and after a heading of the given level
    pub fn heading_margins(&self, level: u32) -> (f64, f64) {
        let i = (level.clamp(1, 3) - 1) as usize;
        (self.heading_margin_before[i], self.heading_margin_after[i])
    }
}

/// Errors that can occur when loading page geometry
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[source] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_roundtrip() {
        let geometry = PageGeometry::default();
        let toml_str = toml::to_string_pretty(&geometry).unwrap();
        let parsed: PageGeometry = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.page_width, geometry.page_width);
        assert_eq!(parsed.heading1_size, geometry.heading1_size);
        assert_eq!(parsed.blockquote_tint, geometry.blockquote_tint);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: PageGeometry = toml::from_str("body_size = 12.5").unwrap();
        assert_eq!(parsed.body_size, 12.5);
        assert_eq!(parsed.page_height, PageGeometry::default().page_height);
    }

    #[test]
    fn test_content_helpers() {
        let g = PageGeometry::default();
        assert!(g.content_width() > 0.0);
        assert!(g.content_top() < g.content_limit());
        assert_eq!(g.heading_size(1), g.heading1_size);
        assert_eq!(g.heading_size(9), g.heading3_size);
    }

    #[test]
    fn test_heading_margins_shrink_with_level() {
        let g = PageGeometry::default();
        let (b1, a1) = g.heading_margins(1);
        let (b2, a2) = g.heading_margins(2);
        let (b3, a3) = g.heading_margins(3);
        assert!(b1 > b2 && b2 > b3);
        assert!(a1 > a2 && a2 > a3);
        assert_eq!(g.heading_margins(0), g.heading_margins(1));
    }
}
