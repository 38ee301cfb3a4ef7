//! PDF assembly
//!
//! Turns a laid-out [`RenderedDocument`] into PDF bytes with
//! `pdf-writer`: base-14 Helvetica fonts, one content stream per page,
//! link annotations, and an optional logo image XObject shared by all
//! pages.

use std::io::Cursor;

use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::fonts::FontStyle;
use crate::geometry::PageGeometry;
use crate::layout_engine::{LogoDimensions, LOGO_RESOURCE};
use crate::rendered_document::RenderedDocument;

/// A logo prepared for embedding
pub struct Logo {
    width: u32,
    height: u32,
    encoding: LogoEncoding,
}

enum LogoEncoding {
    /// Raw JPEG bytes, embedded as-is with DCTDecode
    Jpeg(Vec<u8>),
    /// Zlib-compressed RGB samples, alpha as a separate soft mask
    Flate { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

impl Logo {
    /// Decode image bytes into an embeddable form
    ///
    /// JPEGs keep their compressed stream; everything else is decoded to
    /// RGBA and recompressed with zlib.
    pub fn prepare(bytes: &[u8]) -> Result<Logo, image::ImageError> {
        let reader = image::ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let format = reader.format();
        if format == Some(image::ImageFormat::Jpeg) {
            let (width, height) = reader.into_dimensions()?;
            return Ok(Logo {
                width,
                height,
                encoding: LogoEncoding::Jpeg(bytes.to_vec()),
            });
        }
        let rgba = reader.decode()?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let has_alpha = rgba.pixels().any(|p| p.0[3] != 255);
        let rgb_data: Vec<u8> = rgba
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();
        let rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);
        let alpha = if has_alpha {
            let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
            Some(miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6))
        } else {
            None
        };
        Ok(Logo {
            width,
            height,
            encoding: LogoEncoding::Flate { rgb, alpha },
        })
    }

    pub fn dimensions(&self) -> LogoDimensions {
        LogoDimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Serialize the document to PDF bytes
pub fn export(doc: RenderedDocument, geometry: &PageGeometry, logo: Option<&Logo>) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_ref = 1;
    let mut alloc = || {
        let r = Ref::new(next_ref);
        next_ref += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let font_refs: Vec<(FontStyle, Ref)> =
        FontStyle::all().into_iter().map(|s| (s, alloc())).collect();
    for (style, font_ref) in &font_refs {
        pdf.type1_font(*font_ref)
            .base_font(Name(style.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let logo_ref = match logo {
        Some(logo) if doc.uses_logo => Some(write_logo(&mut pdf, &mut alloc, logo)),
        _ => None,
    };

    let n = doc.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    // annotations are indirect objects referenced from each page
    let page_annot_refs: Vec<Vec<Ref>> = (0..n)
        .map(|page_index| {
            doc.links_on_page(page_index as u32)
                .map(|link| {
                    let annot_ref = alloc();
                    let y_bottom = geometry.page_height - link.y - link.height;
                    let y_top = geometry.page_height - link.y;
                    let mut annot = pdf.annotation(annot_ref);
                    annot
                        .subtype(AnnotationType::Link)
                        .rect(Rect::new(
                            link.x as f32,
                            y_bottom as f32,
                            (link.x + link.width) as f32,
                            y_top as f32,
                        ))
                        .border(0.0, 0.0, 0.0, None);
                    annot
                        .action()
                        .action_type(ActionType::Uri)
                        .uri(Str(link.url.as_bytes()));
                    annot_ref
                })
                .collect()
        })
        .collect();

    for (i, content) in doc.pages.into_iter().enumerate() {
        pdf.stream(content_ids[i], &content.finish());
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.document_info(info_id).title(TextStr(&doc.title));
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(
            0.0,
            0.0,
            geometry.page_width as f32,
            geometry.page_height as f32,
        ))
        .parent(pages_id)
        .contents(content_ids[i]);
        if !page_annot_refs[i].is_empty() {
            page.annotations(page_annot_refs[i].iter().copied());
        }
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (style, font_ref) in &font_refs {
                fonts.pair(Name(style.resource_name().as_bytes()), *font_ref);
            }
        }
        if let Some(logo_ref) = logo_ref {
            resources.x_objects().pair(Name(LOGO_RESOURCE), logo_ref);
        }
    }

    pdf.finish()
}

fn write_logo(pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref, logo: &Logo) -> Ref {
    let xobj_ref = alloc();
    match &logo.encoding {
        LogoEncoding::Jpeg(data) => {
            let mut xobj = pdf.image_xobject(xobj_ref, data);
            xobj.filter(Filter::DctDecode);
            xobj.width(logo.width as i32);
            xobj.height(logo.height as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
        }
        LogoEncoding::Flate { rgb, alpha } => {
            let mask_ref = alpha.as_ref().map(|compressed| {
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, compressed);
                mask.filter(Filter::FlateDecode);
                mask.width(logo.width as i32);
                mask.height(logo.height as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                mask_ref
            });
            let mut xobj = pdf.image_xobject(xobj_ref, rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(logo.width as i32);
            xobj.height(logo.height as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = mask_ref {
                xobj.s_mask(mask_ref);
            }
        }
    }
    xobj_ref
}
