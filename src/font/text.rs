//! Multi-line text to mesh layout.
//!
//! The layout model is deliberately naive, which suits monospace ASCII art:
//! - one font size, no shaping or kerning
//! - pen advances by each glyph's horizontal advance
//! - `'\n'` starts a new line one line-height below
//!
//! Output coordinates are world units with y down: the top of the first line's ascender
//! sits at y = 0, x starts at 0.

use crate::font::{FontError, ResolvedFace};
use crate::scene::{Affine2, Mesh2D};
use crate::tessellate::{TessellateOptions, tessellate_path};

/// Layout options for `layout_text_to_mesh`.
#[derive(Debug, Clone)]
pub struct TextLayoutOptions {
    /// Em size in world units.
    pub font_size: f32,
    /// Tessellation tolerance in world units.
    pub tolerance: f32,
    /// Multiplier on the face's natural line height.
    pub line_spacing: f32,
}

impl Default for TextLayoutOptions {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            tolerance: 0.05,
            line_spacing: 1.0,
        }
    }
}

/// A laid-out block of text.
#[derive(Debug, Clone, Default)]
pub struct TextMesh {
    pub mesh: Mesh2D,
    /// Advance-based block size `[width, height]`, not tight glyph bounds.
    pub size: [f32; 2],
    pub line_count: usize,
}

/// Lay out `text` with `face` into one merged mesh.
///
/// Characters missing from the face are drawn as `'?'` when available, otherwise skipped
/// with a warning.
pub fn layout_text_to_mesh(
    face: &ResolvedFace,
    text: &str,
    opts: &TextLayoutOptions,
) -> Result<TextMesh, FontError> {
    if opts.font_size.is_nan() || opts.font_size <= 0.0 {
        return Err(FontError::InvalidOption(format!(
            "font_size must be > 0, got {}",
            opts.font_size
        )));
    }

    let scale = face.units_to_world_scale(opts.font_size);
    let ascent = face.v_metrics.ascender * scale;
    let line_height = face.v_metrics.line_height() * scale * opts.line_spacing.max(0.1);

    // Outline coordinates are in font units; scale there so tolerance stays in world units.
    let tess_opts = TessellateOptions {
        tolerance: opts.tolerance.max(0.0005) / scale,
        ..Default::default()
    };

    let glyphs = face.glyphs()?;
    let mut out = TextMesh::default();
    let mut max_width = 0.0f32;

    for (line_idx, line) in text.lines().enumerate() {
        let baseline = ascent + line_idx as f32 * line_height;
        let mut pen_x = 0.0f32;

        for ch in line.chars() {
            let glyph = match glyphs.glyph_id(ch) {
                Ok(g) => g,
                Err(FontError::MissingChar(_)) => match glyphs.glyph_id('?') {
                    Ok(g) => g,
                    Err(_) => {
                        log::warn!("text: no glyph for {ch:?}, skipping");
                        continue;
                    }
                },
                Err(e) => return Err(e),
            };

            if let Some(outline) = glyphs.outline(glyph) {
                // font units (y up) -> world (y down), positioned at the pen.
                let xf = Affine2::translate(pen_x, baseline).mul(Affine2::scale(scale, -scale));
                let glyph_mesh = tessellate_path(&outline, xf, tess_opts)?;

                if out.mesh.positions.len() + glyph_mesh.positions.len() > u16::MAX as usize {
                    return Err(FontError::InvalidOption(
                        "text too large for a single u16-indexed mesh".to_string(),
                    ));
                }
                out.mesh.append(&glyph_mesh);
            }

            pen_x += glyphs.advance(glyph)? * scale;
        }

        max_width = max_width.max(pen_x);
        out.line_count = line_idx + 1;
    }

    let descent = -face.v_metrics.descender * scale;
    out.size = if out.line_count == 0 {
        [0.0, 0.0]
    } else {
        [
            max_width,
            ascent + (out.line_count - 1) as f32 * line_height + descent,
        ]
    };

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontQuery, FontSystem};

    fn monospace() -> Option<ResolvedFace> {
        // Headless CI images may ship without fonts.
        FontSystem::new().ok()?.resolve(&FontQuery::monospace()).ok()
    }

    #[test]
    fn invalid_font_size_is_rejected() {
        let Some(face) = monospace() else { return };
        let opts = TextLayoutOptions {
            font_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            layout_text_to_mesh(&face, "x", &opts),
            Err(FontError::InvalidOption(_))
        ));
    }

    #[test]
    fn flag_text_lays_out_line_per_row() {
        let Some(face) = monospace() else { return };
        let text = crate::ascii::create_flag("*", "=").unwrap();
        let laid = layout_text_to_mesh(&face, &text, &TextLayoutOptions::default()).unwrap();

        assert_eq!(laid.line_count, 15);
        assert!(!laid.mesh.positions.is_empty());
        assert!(laid.size[0] > 0.0 && laid.size[1] > 0.0);

        // One more row adds exactly one line height.
        let taller = format!("{text}{}\n", "=".repeat(46));
        let laid_taller =
            layout_text_to_mesh(&face, &taller, &TextLayoutOptions::default()).unwrap();
        let line_height = face.v_metrics.line_height() * face.units_to_world_scale(16.0);
        assert!((laid_taller.size[1] - laid.size[1] - line_height).abs() < 1e-3);
    }
}
