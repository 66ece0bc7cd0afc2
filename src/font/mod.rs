//! Vector text via system fonts.
//!
//! - `fontdb` discovers system fonts and resolves a `FontQuery` to a face.
//! - `ttf-parser` reads metrics and glyph outlines.
//! - Outlines become `lyon::path::Path` (font units, y up) and are tessellated by the
//!   caller through `crate::tessellate`.
//!
//! Used by the ASCII flag demo to draw the flag text inside a button with a monospace face.

pub mod text;

use std::sync::Arc;

use fontdb::{Database, Family, ID, Query, Style, Weight};
use lyon::math::point;
use lyon::path::Path;

/// Font selection request.
#[derive(Debug, Clone)]
pub struct FontQuery {
    /// Family names in priority order. `serif`, `sans-serif` and `monospace` map to the
    /// generic families.
    pub families: Vec<String>,
    /// CSS-style weight (400 regular, 700 bold).
    pub weight: u16,
    pub italic: bool,
}

impl FontQuery {
    /// Monospace regular, preferring a few common faces.
    pub fn monospace() -> Self {
        Self {
            families: vec![
                "DejaVu Sans Mono".to_string(),
                "Consolas".to_string(),
                "Menlo".to_string(),
                "monospace".to_string(),
            ],
            weight: 400,
            italic: false,
        }
    }
}

impl Default for FontQuery {
    fn default() -> Self {
        Self::monospace()
    }
}

/// Vertical metrics in font units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontVMetrics {
    pub units_per_em: f32,
    pub ascender: f32,
    pub descender: f32,
    pub line_gap: f32,
}

impl FontVMetrics {
    /// Baseline-to-baseline distance in font units.
    #[inline]
    pub fn line_height(&self) -> f32 {
        self.ascender - self.descender + self.line_gap
    }
}

/// A resolved face: the font bytes plus the face index inside a collection.
#[derive(Debug, Clone)]
pub struct ResolvedFace {
    pub id: ID,
    pub bytes: Arc<[u8]>,
    pub index: u32,
    pub v_metrics: FontVMetrics,
}

impl ResolvedFace {
    /// Scale factor mapping font units to world units for `font_size`.
    #[inline]
    pub fn units_to_world_scale(&self, font_size: f32) -> f32 {
        font_size / self.v_metrics.units_per_em
    }

    /// Parse the face once for a batch of glyph lookups.
    pub fn glyphs(&self) -> Result<FaceGlyphs<'_>, FontError> {
        let face =
            ttf_parser::Face::parse(&self.bytes, self.index).map_err(|_| FontError::ParseFailed)?;
        Ok(FaceGlyphs { face })
    }
}

/// Glyph lookups on a parsed face borrowed from a `ResolvedFace`.
pub struct FaceGlyphs<'a> {
    face: ttf_parser::Face<'a>,
}

impl FaceGlyphs<'_> {
    /// Glyph id for a character.
    pub fn glyph_id(&self, ch: char) -> Result<ttf_parser::GlyphId, FontError> {
        self.face.glyph_index(ch).ok_or(FontError::MissingChar(ch))
    }

    /// Horizontal advance in font units.
    pub fn advance(&self, glyph: ttf_parser::GlyphId) -> Result<f32, FontError> {
        self.face
            .glyph_hor_advance(glyph)
            .map(f32::from)
            .ok_or(FontError::MissingGlyph { glyph_id: glyph.0 })
    }

    /// Glyph outline in font units (y up). `None` for glyphs without contours (space).
    pub fn outline(&self, glyph: ttf_parser::GlyphId) -> Option<Path> {
        let mut builder = LyonOutlineBuilder::new();
        self.face
            .outline_glyph(glyph, &mut builder)
            .map(|_| builder.build())
    }
}

/// Errors produced by the font subsystem.
#[derive(thiserror::Error, Debug)]
pub enum FontError {
    #[error("no fonts found on this system")]
    NoFontsAvailable,

    #[error("failed to resolve a font face for query: {0:?}")]
    ResolveFailed(FontQuery),

    #[error("failed to parse font face")]
    ParseFailed,

    #[error("font has no glyph for {0:?}")]
    MissingChar(char),

    #[error("glyph {glyph_id} has no horizontal metrics")]
    MissingGlyph { glyph_id: u16 },

    #[error("invalid text layout option: {0}")]
    InvalidOption(String),

    #[error(transparent)]
    Tessellate(#[from] crate::tessellate::TessellateError),
}

/// Owns the font database.
pub struct FontSystem {
    db: Database,
}

impl FontSystem {
    /// Load system fonts.
    pub fn new() -> Result<Self, FontError> {
        let mut db = Database::new();
        db.load_system_fonts();

        if db.faces().next().is_none() {
            return Err(FontError::NoFontsAvailable);
        }
        log::debug!("font: {} system faces", db.len());

        Ok(Self { db })
    }

    /// Resolve a query: named families in order, then the first face as a last resort.
    pub fn resolve(&self, query: &FontQuery) -> Result<ResolvedFace, FontError> {
        let style = if query.italic {
            Style::Italic
        } else {
            Style::Normal
        };
        let weight = Weight(query.weight.clamp(1, 1000));

        let families: Vec<Family<'_>> = query
            .families
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(|f| match f.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "sans" => Family::SansSerif,
                "monospace" | "mono" => Family::Monospace,
                _ => Family::Name(f),
            })
            .collect();

        let id = self
            .db
            .query(&Query {
                families: &families,
                weight,
                style,
                stretch: fontdb::Stretch::Normal,
            })
            .or_else(|| self.db.faces().next().map(|f| f.id))
            .ok_or_else(|| FontError::ResolveFailed(query.clone()))?;

        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (Arc::<[u8]>::from(data), index))
            .ok_or_else(|| FontError::ResolveFailed(query.clone()))?;

        let parsed = ttf_parser::Face::parse(&bytes, index).map_err(|_| FontError::ParseFailed)?;
        let v_metrics = FontVMetrics {
            units_per_em: f32::from(parsed.units_per_em()),
            ascender: f32::from(parsed.typographic_ascender().unwrap_or(parsed.ascender())),
            descender: f32::from(parsed.typographic_descender().unwrap_or(parsed.descender())),
            line_gap: f32::from(parsed.typographic_line_gap().unwrap_or(parsed.line_gap())),
        };

        if let Some(face) = self.db.face(id) {
            log::info!(
                "font: resolved {:?} -> {}",
                query.families,
                face.families
                    .first()
                    .map(|(name, _)| name.as_str())
                    .unwrap_or("<unnamed>")
            );
        }

        Ok(ResolvedFace {
            id,
            bytes,
            index,
            v_metrics,
        })
    }
}

/// Converts `ttf-parser` outline callbacks into a lyon path.
///
/// A glyph may have several contours; each `move_to` starts a new one.
struct LyonOutlineBuilder {
    builder: lyon::path::Builder,
    contour_open: bool,
}

impl LyonOutlineBuilder {
    fn new() -> Self {
        Self {
            builder: Path::builder(),
            contour_open: false,
        }
    }

    fn build(mut self) -> Path {
        if self.contour_open {
            self.builder.close();
        }
        self.builder.build()
    }
}

impl ttf_parser::OutlineBuilder for LyonOutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.contour_open {
            self.builder.close();
        }
        self.builder.begin(point(x, y));
        self.contour_open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(point(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quadratic_bezier_to(point(x1, y1), point(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder
            .cubic_bezier_to(point(x1, y1), point(x2, y2), point(x, y));
    }

    fn close(&mut self) {
        if self.contour_open {
            self.builder.close();
            self.contour_open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_parser::OutlineBuilder as _;

    #[test]
    fn line_height_spans_ascender_to_descender() {
        let m = FontVMetrics {
            units_per_em: 1000.0,
            ascender: 800.0,
            descender: -200.0,
            line_gap: 100.0,
        };
        assert_eq!(m.line_height(), 1100.0);
    }

    #[test]
    fn outline_builder_closes_every_contour() {
        let mut b = LyonOutlineBuilder::new();
        b.move_to(0.0, 0.0);
        b.line_to(10.0, 0.0);
        b.line_to(10.0, 10.0);
        // Second contour without an explicit close of the first.
        b.move_to(20.0, 0.0);
        b.quad_to(25.0, 5.0, 30.0, 0.0);
        let path = b.build();

        let closes = path
            .iter()
            .filter(|e| matches!(e, lyon::path::Event::End { close: true, .. }))
            .count();
        assert_eq!(closes, 2);
    }

    #[test]
    fn default_query_is_monospace() {
        assert!(FontQuery::default().families.iter().any(|f| f == "monospace"));
    }
}
