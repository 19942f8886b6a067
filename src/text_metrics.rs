//! Text measurement backing label bounding boxes.
//!
//! Resolves a system font through fontdb and sums glyph advances with
//! ttf-parser. When no face resolves (headless/container environments) a
//! per-character heuristic keeps measurements available, so overlap
//! resolution never depends on installed fonts.

use std::collections::HashMap;
use std::sync::Mutex;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use ttf_parser::Face;

static MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Average glyph advance as a fraction of font size, used when no font face
/// can be resolved.
const FALLBACK_ADVANCE_RATIO: f32 = 0.56;

/// Line box height as a fraction of font size.
const LINE_HEIGHT_RATIO: f32 = 1.0;

const DEFAULT_FAMILY: &str = "sans-serif";

/// Width of `text` at `font_size`, in canvas units.
pub fn text_width(text: &str, font_size: f32, font_family: Option<&str>) -> f32 {
    if text.is_empty() || font_size <= 0.0 {
        return 0.0;
    }
    let family = font_family.unwrap_or(DEFAULT_FAMILY);
    let measured = MEASURER
        .lock()
        .ok()
        .and_then(|mut guard| guard.measure(text, font_size, family));
    measured.unwrap_or_else(|| heuristic_width(text, font_size))
}

/// Width and height of a (single-line) label.
pub fn text_size(text: &str, font_size: f32, font_family: Option<&str>) -> (f32, f32) {
    let width = text_width(text, font_size, font_family);
    let height = if text.is_empty() {
        0.0
    } else {
        font_size * LINE_HEIGHT_RATIO
    };
    (width, height)
}

fn heuristic_width(text: &str, font_size: f32) -> f32 {
    text.chars().filter(|c| *c != '\n').count() as f32 * font_size * FALLBACK_ADVANCE_RATIO
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<StoredFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = font_family.trim().to_string();
        if !self.faces.contains_key(&key) {
            let face = self.load_face(font_family);
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get(&key)?.as_ref()?;
        face.measure(text, font_size)
    }

    fn load_face(&mut self, font_family: &str) -> Option<StoredFace> {
        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = Vec::with_capacity(names.len().max(1));
        for name in &names {
            match name.to_ascii_lowercase().as_str() {
                "serif" => families.push(Family::Serif),
                "sans-serif" | "system-ui" | "-apple-system" => families.push(Family::SansSerif),
                "monospace" | "ui-monospace" => families.push(Family::Monospace),
                "cursive" => families.push(Family::Cursive),
                "fantasy" => families.push(Family::Fantasy),
                _ => families.push(Family::Name(name.as_str())),
            }
        }
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded: Option<StoredFace> = None;
        self.db.with_face_data(id, |data, index| {
            loaded = StoredFace::parse(data.to_vec(), index);
        });
        loaded
    }
}

/// Owned font data plus a precomputed ASCII advance table. The face is
/// re-parsed for non-ASCII text, which keeps the struct free of
/// self-references.
struct StoredFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
}

impl StoredFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for (byte, advance) in ascii_advances.iter_mut().enumerate() {
            if let Some(glyph) = face.glyph_index(byte as u8 as char) {
                *advance = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        drop(face);
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
        })
    }

    fn measure(&self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * FALLBACK_ADVANCE_RATIO;

        if text.is_ascii() {
            let mut width = 0.0f32;
            for byte in text.bytes() {
                if byte == b'\n' {
                    continue;
                }
                let advance = self.ascii_advances[byte as usize];
                width += if advance == 0 {
                    fallback
                } else {
                    advance as f32 * scale
                };
            }
            return Some(width.max(0.0));
        }

        let face = Face::parse(&self.data, self.index).ok()?;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = face
                .glyph_index(ch)
                .and_then(|glyph| face.glyph_hor_advance(glyph));
            width += match advance {
                Some(units) => units as f32 * scale,
                None => fallback,
            };
        }
        Some(width.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_measures_zero() {
        assert_eq!(text_width("", 12.0, None), 0.0);
        assert_eq!(text_size("", 12.0, None), (0.0, 0.0));
    }

    #[test]
    fn non_empty_text_measures_positive() {
        let width = text_width("label", 12.0, None);
        assert!(width > 0.0, "expected positive width, got {width}");
    }

    #[test]
    fn width_scales_with_length() {
        let short = text_width("ab", 12.0, None);
        let long = text_width("abababab", 12.0, None);
        assert!(long > short);
    }

    #[test]
    fn heuristic_tracks_char_count_not_bytes() {
        let width = heuristic_width("日本語", 10.0);
        assert_eq!(width, 3.0 * 10.0 * FALLBACK_ADVANCE_RATIO);
    }
}
