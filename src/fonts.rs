use std::sync::OnceLock;

use pdf_writer::{Name, Pdf, Ref};

/// Resource name of the single font used by the PDF preview.
pub(crate) const BODY_FONT: &[u8] = b"F1";

static HELVETICA_WIDTHS: OnceLock<Vec<f32>> = OnceLock::new();

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths() -> &'static [f32] {
    HELVETICA_WIDTHS.get_or_init(|| {
        (32u8..=255u8)
            .map(|b| match b {
                32 => 278.0,                          // space
                33..=47 => 333.0,                     // punctuation
                48..=57 => 556.0,                     // digits
                58..=64 => 333.0,                     // more punctuation
                73 | 74 => 278.0,                     // I J (narrow uppercase)
                77 => 833.0,                          // M (wide)
                65..=90 => 667.0,                     // uppercase A-Z (average)
                91..=96 => 333.0,                     // brackets etc.
                102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
                109 | 119 => 833.0,                   // m w (wide)
                97..=122 => 556.0,                    // lowercase a-z (average)
                0x92 => 222.0,                        // right single quote
                _ => 556.0,
            })
            .collect()
    })
}

/// Map a single Unicode char to its WinAnsi byte, or None if unmappable.
fn char_to_winansi(c: char) -> Option<u8> {
    let byte = match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Unmappable characters are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars().filter_map(char_to_winansi).collect()
}

pub(crate) fn char_width(ch: char, font_size: f32) -> f32 {
    let w = match char_to_winansi(ch) {
        Some(b) if b >= 32 => helvetica_widths()[(b - 32) as usize],
        _ => 0.0,
    };
    w * font_size / 1000.0
}

pub(crate) fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(|ch| char_width(ch, font_size)).sum()
}

/// Greedy word wrap into lines no wider than `max_width`. A single word wider
/// than the line still gets a line of its own.
pub(crate) fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let space_w = char_width(' ', font_size);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_w = 0.0f32;

    for word in text.split_whitespace() {
        let ww = text_width(word, font_size);
        if current.is_empty() {
            current.push_str(word);
            current_w = ww;
        } else if current_w + space_w + ww > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_w = ww;
        } else {
            current.push(' ');
            current.push_str(word);
            current_w += space_w + ww;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(crate) fn register_helvetica(pdf: &mut Pdf, font_ref: Ref) {
    pdf.type1_font(font_ref)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
}
