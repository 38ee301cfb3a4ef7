//! Base-14 font metrics and text measurement
//!
//! The layout engine measures text against the standard AFM widths of
//! the Helvetica family (no font files are embedded), and text is shown
//! in WinAnsi encoding. Widths are expressed in units per 1000 of the
//! font size, so measurement is pure arithmetic and deterministic.

/// Font variant used for a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Oblique,
    BoldOblique,
}

impl FontStyle {
    /// Pick the variant for a segment's emphasis flags
    pub fn select(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (true, true) => FontStyle::BoldOblique,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Oblique,
            (false, false) => FontStyle::Regular,
        }
    }

    /// PostScript base font name
    pub fn base_font(self) -> &'static str {
        match self {
            FontStyle::Regular => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
            FontStyle::Oblique => "Helvetica-Oblique",
            FontStyle::BoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Resource name of this font in every page's font dictionary
    pub fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Oblique => "F3",
            FontStyle::BoldOblique => "F4",
        }
    }

    /// All variants, in resource-name order
    pub fn all() -> [FontStyle; 4] {
        [
            FontStyle::Regular,
            FontStyle::Bold,
            FontStyle::Oblique,
            FontStyle::BoldOblique,
        ]
    }

    fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldOblique)
    }
}

/// Helvetica ascender as a fraction of the font size
pub const ASCENDER_RATIO: f64 = 0.718;

/// Helvetica glyph widths for chars 32..=126, units per 1000
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold glyph widths for chars 32..=126, units per 1000
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width of one character in units per 1000 of the font size
///
/// Accented Latin letters measure as their base letter (the oblique
/// variants share the upright metrics). Characters without a metric fall
/// back to a typical letter width.
pub fn char_width_units(c: char, style: FontStyle) -> f64 {
    let table = if style.is_bold() {
        &HELVETICA_BOLD_WIDTHS
    } else {
        &HELVETICA_WIDTHS
    };
    let folded = fold_latin(c);
    let code = folded as usize;
    if (32..=126).contains(&code) {
        return f64::from(table[code - 32]);
    }
    match c {
        '\u{2022}' => 350.0,          // bullet
        '\u{2013}' => 556.0,          // en dash
        '\u{2014}' => 1000.0,         // em dash
        '\u{2018}' | '\u{2019}' => 222.0,
        '\u{201C}' | '\u{201D}' => 333.0,
        '\u{2026}' => 1000.0,         // ellipsis
        '\u{00A0}' => 278.0,          // nbsp
        _ => 556.0,
    }
}

/// Measured width of a text run in points
pub fn text_width(text: &str, style: FontStyle, font_size: f64) -> f64 {
    text.chars()
        .map(|c| char_width_units(c, style) * font_size / 1000.0)
        .sum()
}

/// Map an accented Latin-1 character to its base ASCII letter
fn fold_latin(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        'Ñ' => 'N',
        _ => c,
    }
}

/// Encode text as WinAnsi bytes for a `show` operation
///
/// ASCII and Latin-1 pass through; the common Windows-1252 punctuation
/// block is remapped; anything else becomes `?`.
pub fn to_winansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u8,
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}
