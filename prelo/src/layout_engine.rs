//! Page layout
//!
//! Walks the parsed blocks and places text onto A4 pages, producing one
//! content stream per page plus the link regions needed for annotations.
//! All cursor math is done in f64 top-down coordinates (y grows toward
//! the page bottom) and only converted to bottom-up f32 at the
//! `pdf_writer::Content` boundary.

use pdf_writer::{Content, Name, Str};

use crate::content_model::{plain_text, BlockKind, ContentBlock, TextSegment};
use crate::fonts::{self, FontStyle, ASCENDER_RATIO};
use crate::geometry::PageGeometry;
use crate::rendered_document::{LinkRegion, RenderedDocument};

/// Name under which the logo XObject is registered on every page
pub const LOGO_RESOURCE: &[u8] = b"Logo";

const LINK_COLOR: [f64; 3] = [0.05, 0.25, 0.63];
const WORDMARK_SIZE: f64 = 16.0;
const BYLINE_GRAY: f64 = 0.38;

/// Pixel dimensions of a decoded logo, used for aspect-correct placement
#[derive(Debug, Clone, Copy)]
pub struct LogoDimensions {
    pub width: u32,
    pub height: u32,
}

/// Fixed chrome drawn around the article body
pub struct PageHeader<'a> {
    pub wordmark: &'a str,
    pub title: &'a str,
    pub byline: &'a str,
    pub logo: Option<LogoDimensions>,
}

/// A positioned word within a wrapped line
struct LineWord {
    text: String,
    style: FontStyle,
    x: f64,
    width: f64,
    link: Option<String>,
}

struct Line {
    words: Vec<LineWord>,
}

/// Lay the blocks out onto pages
pub fn render(
    blocks: &[ContentBlock],
    geometry: &PageGeometry,
    header: &PageHeader,
) -> RenderedDocument {
    let mut engine = LayoutEngine {
        geometry,
        header,
        pages: Vec::new(),
        links: Vec::new(),
        cursor: PageCursor { page_index: 0, y: 0.0 },
    };
    engine.start_page();
    engine.place_title();
    for block in blocks {
        engine.place_block(block);
    }
    log::debug!(
        "laid out {} blocks across {} pages ({} links)",
        blocks.len(),
        engine.pages.len(),
        engine.links.len()
    );
    RenderedDocument {
        pages: engine.pages,
        links: engine.links,
        title: header.title.to_string(),
        uses_logo: header.logo.is_some(),
    }
}

/// Draw the centered "n / m" page indicator onto every page
///
/// Runs after layout, once the total page count is known.
pub fn stamp_page_numbers(doc: &mut RenderedDocument, geometry: &PageGeometry) {
    let total = doc.pages.len();
    for (index, content) in doc.pages.iter_mut().enumerate() {
        let label = format!("{} / {}", index + 1, total);
        let width = fonts::text_width(&label, FontStyle::Regular, geometry.footer_size);
        let x = (geometry.page_width - width) / 2.0;
        let baseline = geometry.footer_height * 0.5;
        content
            .set_fill_gray(0.45)
            .begin_text()
            .set_font(
                Name(FontStyle::Regular.resource_name().as_bytes()),
                geometry.footer_size as f32,
            )
            .next_line(x as f32, baseline as f32)
            .show(Str(&fonts::to_winansi_bytes(&label)))
            .end_text()
            .set_fill_gray(0.0);
    }
}

/// Write position inside the current page, top-down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    pub page_index: u32,
    pub y: f64,
}

struct LayoutEngine<'a> {
    geometry: &'a PageGeometry,
    header: &'a PageHeader<'a>,
    pages: Vec<Content>,
    links: Vec<LinkRegion>,
    cursor: PageCursor,
}

impl LayoutEngine<'_> {
    fn page_index(&self) -> u32 {
        self.cursor.page_index
    }

    fn content(&mut self) -> &mut Content {
        self.pages.last_mut().expect("page started")
    }

    fn to_pdf_y(&self, top_down: f64) -> f64 {
        self.geometry.page_height - top_down
    }

    /// Open a fresh page and draw the header band
    fn start_page(&mut self) {
        let g = self.geometry;
        let mut content = Content::new();

        match self.header.logo {
            Some(dims) if dims.height > 0 => {
                let target_h = g.header_height - 20.0;
                let target_w = target_h * f64::from(dims.width) / f64::from(dims.height);
                let top = (g.header_height - target_h) / 2.0;
                let pdf_y = g.page_height - top - target_h;
                content
                    .save_state()
                    .transform([
                        target_w as f32,
                        0.0,
                        0.0,
                        target_h as f32,
                        g.margin_left as f32,
                        pdf_y as f32,
                    ])
                    .x_object(Name(LOGO_RESOURCE))
                    .restore_state();
            }
            _ => {
                let baseline = (g.header_height + WORDMARK_SIZE * ASCENDER_RATIO) / 2.0;
                content
                    .begin_text()
                    .set_font(
                        Name(FontStyle::Bold.resource_name().as_bytes()),
                        WORDMARK_SIZE as f32,
                    )
                    .next_line(g.margin_left as f32, (g.page_height - baseline) as f32)
                    .show(Str(&fonts::to_winansi_bytes(self.header.wordmark)))
                    .end_text();
            }
        }

        // separator under the header band
        content
            .set_fill_gray(0.8)
            .rect(
                g.margin_left as f32,
                (g.page_height - g.header_height) as f32,
                g.content_width() as f32,
                0.75,
            )
            .fill_nonzero()
            .set_fill_gray(0.0);

        self.pages.push(content);
        self.cursor = PageCursor {
            page_index: (self.pages.len() - 1) as u32,
            y: g.content_top(),
        };
    }

    /// Break to a new page when `height` does not fit above the footer
    fn ensure_room(&mut self, height: f64) {
        if self.cursor.y + height > self.geometry.content_limit() {
            self.start_page();
        }
    }

    /// Title and byline, first page only
    fn place_title(&mut self) {
        let g = self.geometry;
        let title_size = g.heading1_size;
        let lines = build_lines_uniform(
            self.header.title,
            FontStyle::Bold,
            title_size,
            g.content_width(),
        );
        for line in &lines {
            self.emit_line(line, g.margin_left, title_size);
            self.cursor.y += g.line_height_for(title_size);
        }
        if !self.header.byline.is_empty() {
            let byline_size = g.footer_size;
            self.content().set_fill_gray(BYLINE_GRAY as f32);
            let line = Line {
                words: vec![LineWord {
                    text: self.header.byline.to_string(),
                    style: FontStyle::Oblique,
                    x: 0.0,
                    width: fonts::text_width(self.header.byline, FontStyle::Oblique, byline_size),
                    link: None,
                }],
            };
            self.emit_line(&line, g.margin_left, byline_size);
            self.content().set_fill_gray(0.0);
            self.cursor.y += g.line_height_for(byline_size);
        }
        self.cursor.y += g.paragraph_spacing * 2.0;
    }

    fn place_block(&mut self, block: &ContentBlock) {
        let g = self.geometry;
        match block.kind {
            BlockKind::Paragraph => {
                let x = g.margin_left + f64::from(block.indent) * g.indent_unit;
                let width = g.content_width() - f64::from(block.indent) * g.indent_unit;
                self.place_wrapped(&block.segments, false, g.body_size, x, width);
                self.cursor.y += g.paragraph_spacing;
            }
            BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3 => {
                let level = match block.kind {
                    BlockKind::Heading1 => 1,
                    BlockKind::Heading2 => 2,
                    _ => 3,
                };
                let size = g.heading_size(level);
                let (before, after) = g.heading_margins(level);
                self.cursor.y += before;
                self.ensure_room(g.line_height_for(size) + g.line_height_for(g.body_size));
                self.place_wrapped(&block.segments, true, size, g.margin_left, g.content_width());
                self.cursor.y += after;
            }
            BlockKind::ListItem | BlockKind::OrderedListItem => {
                self.place_list_item(block);
            }
            BlockKind::Blockquote => {
                self.place_blockquote(block);
            }
            BlockKind::HorizontalRule => {
                self.ensure_room(g.rule_margin * 2.0 + g.rule_thickness);
                self.cursor.y += g.rule_margin;
                let pdf_y = self.to_pdf_y(self.cursor.y + g.rule_thickness);
                let (x, w) = (g.margin_left, g.content_width());
                self.content()
                    .set_fill_gray(0.6)
                    .rect(x as f32, pdf_y as f32, w as f32, g.rule_thickness as f32)
                    .fill_nonzero()
                    .set_fill_gray(0.0);
                self.cursor.y += g.rule_thickness + g.rule_margin;
            }
            BlockKind::LineBreak => {
                self.cursor.y += g.line_height_for(g.body_size) * g.line_break_fraction;
            }
        }
    }

    fn place_list_item(&mut self, block: &ContentBlock) {
        let g = self.geometry;
        let marker_x = g.margin_left + f64::from(block.indent) * g.indent_unit;
        let text_x = marker_x + g.list_marker_offset;
        let width = g.page_width - g.margin_right - text_x;
        let size = g.body_size;

        self.ensure_room(g.line_height_for(size));
        let marker = match block.kind {
            BlockKind::OrderedListItem => format!("{}.", block.list_index.unwrap_or(1)),
            _ => "\u{2022}".to_string(),
        };
        let marker_line = Line {
            words: vec![LineWord {
                width: fonts::text_width(&marker, FontStyle::Regular, size),
                text: marker,
                style: FontStyle::Regular,
                x: 0.0,
                link: None,
            }],
        };
        self.emit_line(&marker_line, marker_x, size);
        self.place_wrapped(&block.segments, false, size, text_x, width);
        self.cursor.y += g.list_spacing;
    }

    /// Tinted box with a left accent bar behind the quoted text
    fn place_blockquote(&mut self, block: &ContentBlock) {
        let g = self.geometry;
        let depth = block.blockquote_depth.unwrap_or(1).max(1);
        let left = g.margin_left + f64::from(depth - 1) * g.indent_unit;
        let box_width = g.page_width - g.margin_right - left;
        let text_x = left + g.blockquote_border_width + g.blockquote_padding;
        let text_width = box_width - g.blockquote_border_width - g.blockquote_padding * 2.0;
        let size = g.body_size;
        let line_h = g.line_height_for(size);

        let lines = build_block_lines(&block.segments, false, size, text_width);
        if lines.is_empty() {
            return;
        }

        // The box never splits across a page break; it moves whole.
        let height = lines.len() as f64 * line_h + g.blockquote_padding * 2.0;
        self.ensure_room(height);

        let pdf_y = self.to_pdf_y(self.cursor.y + height);
        let [tr, tg, tb] = g.blockquote_tint;
        let [br, bg, bb] = g.blockquote_border;
        self.content()
            .set_fill_rgb(tr as f32, tg as f32, tb as f32)
            .rect(left as f32, pdf_y as f32, box_width as f32, height as f32)
            .fill_nonzero()
            .set_fill_rgb(br as f32, bg as f32, bb as f32)
            .rect(
                left as f32,
                pdf_y as f32,
                g.blockquote_border_width as f32,
                height as f32,
            )
            .fill_nonzero()
            .set_fill_rgb(0.0, 0.0, 0.0);

        self.cursor.y += g.blockquote_padding;
        for line in &lines {
            self.emit_line(line, text_x, size);
            self.cursor.y += line_h;
        }
        self.cursor.y += g.blockquote_padding;
        self.cursor.y += g.paragraph_spacing;
    }

    /// Wrap and emit, breaking pages between lines
    fn place_wrapped(
        &mut self,
        segments: &[TextSegment],
        force_bold: bool,
        size: f64,
        x: f64,
        max_width: f64,
    ) {
        let line_h = self.geometry.line_height_for(size);
        let lines = build_block_lines(segments, force_bold, size, max_width);
        for line in &lines {
            self.ensure_room(line_h);
            self.emit_line(line, x, size);
            self.cursor.y += line_h;
        }
    }

    fn emit_line(&mut self, line: &Line, x_origin: f64, size: f64) {
        let g = self.geometry;
        let baseline = self.to_pdf_y(self.cursor.y + size * ASCENDER_RATIO);
        let line_top = self.cursor.y;
        let page = self.page_index();
        let line_h = g.line_height_for(size);
        let mut pending_links: Vec<LinkRegion> = Vec::new();

        let content = self.content();
        for word in &line.words {
            let x = x_origin + word.x;
            let linked = word.link.is_some();
            if linked {
                let [r, gc, b] = LINK_COLOR;
                content.set_fill_rgb(r as f32, gc as f32, b as f32);
            }
            content
                .begin_text()
                .set_font(Name(word.style.resource_name().as_bytes()), size as f32)
                .next_line(x as f32, baseline as f32)
                .show(Str(&fonts::to_winansi_bytes(&word.text)))
                .end_text();
            if let Some(url) = &word.link {
                content
                    .rect(
                        x as f32,
                        (baseline - 1.5) as f32,
                        word.width as f32,
                        0.6,
                    )
                    .fill_nonzero()
                    .set_fill_rgb(0.0, 0.0, 0.0);
                pending_links.push(LinkRegion {
                    page_index: page,
                    x,
                    y: line_top,
                    width: word.width,
                    height: line_h,
                    url: url.clone(),
                });
            }
        }
        self.links.extend(pending_links);
    }
}

/// Wrap a block's segments, picking the cheap single-style path when the
/// whole block is styled uniformly and carries no links
fn build_block_lines(
    segments: &[TextSegment],
    force_bold: bool,
    size: f64,
    max_width: f64,
) -> Vec<Line> {
    let uniform = segments.first().and_then(|first| {
        segments
            .iter()
            .all(|s| s.bold == first.bold && s.italic == first.italic && s.link.is_none())
            .then(|| FontStyle::select(first.bold || force_bold, first.italic))
    });
    match uniform {
        Some(style) => {
            let text = plain_text(segments);
            build_lines_uniform(&text, style, size, max_width)
        }
        None => build_lines(segments, force_bold, size, max_width),
    }
}

/// One-style greedy word wrap
fn build_lines_uniform(text: &str, style: FontStyle, size: f64, max_width: f64) -> Vec<Line> {
    let space_w = fonts::text_width(" ", style, size);
    let mut lines = Vec::new();
    let mut words: Vec<LineWord> = Vec::new();
    let mut x = 0.0;
    for token in text.split_whitespace() {
        let w = fonts::text_width(token, style, size);
        let advance = if words.is_empty() { w } else { space_w + w };
        if !words.is_empty() && x + advance > max_width {
            lines.push(Line {
                words: std::mem::take(&mut words),
            });
            x = 0.0;
        }
        let wx = if words.is_empty() { 0.0 } else { x + space_w };
        x = wx + w;
        words.push(LineWord {
            text: token.to_string(),
            style,
            x: wx,
            width: w,
            link: None,
        });
    }
    if !words.is_empty() {
        lines.push(Line { words });
    }
    lines
}

/// Word wrap across styled segments
///
/// Adjacent segments with no whitespace at the seam stay glued, so
/// "**bold**," renders as "bold," rather than "bold ,".
fn build_lines(
    segments: &[TextSegment],
    force_bold: bool,
    size: f64,
    max_width: f64,
) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut words: Vec<LineWord> = Vec::new();
    let mut x = 0.0;
    let mut prev_ended_ws = true;
    for seg in segments {
        if seg.text.is_empty() {
            continue;
        }
        let style = FontStyle::select(seg.bold || force_bold, seg.italic);
        let space_w = fonts::text_width(" ", style, size);
        let starts_ws = seg.text.starts_with(char::is_whitespace);
        let mut first = true;
        for token in seg.text.split_whitespace() {
            let w = fonts::text_width(token, style, size);
            let glued = first && !starts_ws && !prev_ended_ws && !words.is_empty();
            let advance = if words.is_empty() || glued { w } else { space_w + w };
            if !words.is_empty() && x + advance > max_width {
                // glued fragments wrap with the whole visual word
                let carried = if glued {
                    let mut tail = Vec::new();
                    while let Some(last) = words.last() {
                        let prev_end = words
                            .len()
                            .checked_sub(2)
                            .map(|i| words[i].x + words[i].width);
                        let is_glued = prev_end.map_or(false, |e| (last.x - e).abs() < 1e-9);
                        tail.push(words.pop().expect("checked non-empty"));
                        if !is_glued {
                            break;
                        }
                    }
                    tail.reverse();
                    tail
                } else {
                    Vec::new()
                };
                if !words.is_empty() || !carried.is_empty() {
                    if words.is_empty() {
                        // the carried fragments were the whole line, keep them
                        words = carried
                            .into_iter()
                            .scan(0.0, |cx, mut wd| {
                                wd.x = *cx;
                                *cx += wd.width;
                                Some(wd)
                            })
                            .collect();
                        x = words.last().map(|w| w.x + w.width).unwrap_or(0.0);
                    } else {
                        lines.push(Line {
                            words: std::mem::take(&mut words),
                        });
                        let mut cx = 0.0;
                        for mut wd in carried {
                            wd.x = cx;
                            cx += wd.width;
                            words.push(wd);
                        }
                        x = cx;
                    }
                }
            }
            let wx = if words.is_empty() {
                0.0
            } else if glued {
                x
            } else {
                x + space_w
            };
            x = wx + w;
            words.push(LineWord {
                text: token.to_string(),
                style,
                x: wx,
                width: w,
                link: seg.link.clone(),
            });
            first = false;
        }
        prev_ended_ws = seg.text.ends_with(char::is_whitespace);
    }
    if !words.is_empty() {
        lines.push(Line { words });
    }
    lines
}
