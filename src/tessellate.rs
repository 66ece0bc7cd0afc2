//! Path tessellation helpers.
//!
//! Converts closed outlines (`lyon::path::Path`) into triangle meshes (`scene::Mesh2D`)
//! with `lyon::tessellation::FillTessellator`.
//!
//! Fill rule matters for self-intersecting outlines: a pentagram star only renders solid
//! under `FillRule::NonZero` (even-odd leaves the center pentagon empty), and font glyphs
//! are authored for non-zero too. Both rules are exposed.

use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, FillVertexConstructor,
    VertexBuffers,
};

use crate::geometry::{Rect, StarPolygon};
use crate::scene::{Affine2, Mesh2D};

/// Errors produced while tessellating.
#[derive(thiserror::Error, Debug)]
pub enum TessellateError {
    #[error("lyon tessellation failed: {0:?}")]
    Lyon(lyon::tessellation::TessellationError),
}

/// Tolerance and fill rule for fill tessellation.
#[derive(Debug, Copy, Clone)]
pub struct TessellateOptions {
    /// Smaller => more triangles on curves. Polygons are unaffected.
    pub tolerance: f32,
    pub fill_rule: FillRule,
}

impl Default for TessellateOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.02,
            fill_rule: FillRule::NonZero,
        }
    }
}

impl TessellateOptions {
    #[inline]
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }
}

/// Builds output positions from lyon's `FillVertex`, applying a transform.
struct PositionCtor {
    xf: Affine2,
}

impl FillVertexConstructor<[f32; 2]> for PositionCtor {
    fn new_vertex(&mut self, v: FillVertex) -> [f32; 2] {
        let p = v.position();
        let (x, y) = self.xf.transform_point(p.x, p.y);
        [x, y]
    }
}

/// Tessellate one outline path into a mesh, transforming every output vertex.
pub fn tessellate_path(
    path: &Path,
    transform: Affine2,
    opts: TessellateOptions,
) -> Result<Mesh2D, TessellateError> {
    let mut tess = FillTessellator::new();
    let mut buffers: VertexBuffers<[f32; 2], u16> = VertexBuffers::new();

    let fill = FillOptions::tolerance(opts.tolerance).with_fill_rule(opts.fill_rule);
    let ctor = PositionCtor { xf: transform };
    tess.tessellate_path(path, &fill, &mut BuffersBuilder::new(&mut buffers, ctor))
        .map_err(TessellateError::Lyon)?;

    Ok(Mesh2D {
        positions: buffers.vertices,
        indices: buffers.indices,
    })
}

/// Tessellate a star using the fill rule its shape needs.
pub fn star_mesh(star: &StarPolygon) -> Result<Mesh2D, TessellateError> {
    tessellate_path(
        &star.to_path(),
        Affine2::IDENTITY,
        TessellateOptions::default().with_fill_rule(star.shape.fill_rule()),
    )
}

/// Two-triangle mesh for an axis-aligned rectangle.
pub fn rect_mesh(rect: &Rect) -> Mesh2D {
    let [a, b, c, d] = rect.corners().map(|p| p.to_f32());
    Mesh2D {
        positions: vec![a, b, c, d],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}
