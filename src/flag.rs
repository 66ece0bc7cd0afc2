//! Flag layout.
//!
//! All geometry is derived from the flag size:
//! - 13 stripe bands; the 7 odd-numbered (red) ones are shapes, the white ones are the
//!   background showing through.
//! - Canton: `width / 2.1` wide, 7 bands tall, drawn over the stripes.
//! - 9 star rows alternating 6 and 5 stars (50 total), offset rows shifted by one cell.
//!
//! Only the stripes and the canton receive pointer input; the white gaps do not.

use crate::geometry::{GeometryError, Point2D, Rect, StarPolygon, StarShape, star_polygon};
use crate::scene::{Mobject2D, Rgba};
use crate::tessellate::{TessellateError, rect_mesh, star_mesh};

/// Name of the flag's root object in the scene.
pub const FLAG_ROOT: &str = "flag";

pub const FLAG_WIDTH: f64 = 800.0;
pub const FLAG_HEIGHT: f64 = 480.0;

const BAND_COUNT: u32 = 13;
const RED_STRIPES: usize = 7;
const CANTON_WIDTH_DIVISOR: f64 = 2.1;
const CANTON_BANDS: f64 = 7.0;

const STAR_ROWS: usize = 9;
const STAR_ORIGIN: f64 = 20.0;
const STAR_CELL_DIVISOR: f64 = 11.0;
const STAR_RADIUS_DIVISOR: f64 = 3.0;
const STAR_STEP_X: f64 = 1.8;
const STAR_STEP_Y_DIVISOR: f64 = 1.3;

const Z_STRIPES: i32 = 0;
const Z_CANTON: i32 = 1;
const Z_STARS: i32 = 2;

/// Errors while building the flag.
#[derive(thiserror::Error, Debug)]
pub enum FlagError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Tessellate(#[from] TessellateError),
}

/// Computed flag geometry in flag-local coordinates (origin top-left of the flag).
#[derive(Debug, Clone)]
pub struct FlagLayout {
    pub width: f64,
    pub height: f64,
    pub stripes: Vec<Rect>,
    pub canton: Rect,
    pub stars: Vec<StarPolygon>,
}

impl FlagLayout {
    /// Standard 800x480 flag.
    pub fn standard(shape: StarShape) -> Result<Self, FlagError> {
        Self::build(FLAG_WIDTH, FLAG_HEIGHT, shape)
    }

    /// Lay out a flag of the given size.
    pub fn build(width: f64, height: f64, shape: StarShape) -> Result<Self, FlagError> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(GeometryError::InvalidArgument(format!(
                "flag size must be positive, got {width}x{height}"
            ))
            .into());
        }

        let band = height / f64::from(BAND_COUNT);

        let stripes = (0..RED_STRIPES)
            .map(|i| Rect::new(0.0, band * 2.0 * i as f64, width, band))
            .collect();

        let canton = Rect::new(0.0, 0.0, width / CANTON_WIDTH_DIVISOR, band * CANTON_BANDS);

        let cell = canton.width / STAR_CELL_DIVISOR;
        let radius = cell / STAR_RADIUS_DIVISOR;

        let mut stars = Vec::with_capacity(50);
        let mut y = STAR_ORIGIN;
        for row in 0..STAR_ROWS {
            let (columns, mut x) = if row % 2 == 0 {
                (6, STAR_ORIGIN)
            } else {
                (5, STAR_ORIGIN + cell)
            };
            for _ in 0..columns {
                stars.push(star_polygon(x, y, radius, shape)?);
                x += cell * STAR_STEP_X;
            }
            y += cell / STAR_STEP_Y_DIVISOR;
        }

        Ok(Self {
            width,
            height,
            stripes,
            canton,
            stars,
        })
    }

    /// Whether a flag-local point hits a shape that receives pointer input.
    pub fn contains(&self, p: Point2D) -> bool {
        self.canton.contains(p) || self.stripes.iter().any(|s| s.contains(p))
    }

    /// Build the scene subtree: one root with stripe, canton and star children.
    pub fn to_mobject(&self) -> Result<Mobject2D, FlagError> {
        let mut stripes = Mobject2D::new("stripes")
            .with_fill(Rgba::RED)
            .with_z(Z_STRIPES);
        for (i, s) in self.stripes.iter().enumerate() {
            stripes.add_child(
                Mobject2D::new(format!("stripe_{i}"))
                    .with_mesh(rect_mesh(s))
                    .with_fill(Rgba::RED)
                    .with_z(Z_STRIPES),
            );
        }

        let canton = Mobject2D::new("canton")
            .with_mesh(rect_mesh(&self.canton))
            .with_fill(Rgba::BLUE)
            .with_z(Z_CANTON);

        let mut stars = Mobject2D::new("stars").with_z(Z_STARS);
        for (i, star) in self.stars.iter().enumerate() {
            stars.add_child(
                Mobject2D::new(format!("star_{i}"))
                    .with_mesh(star_mesh(star)?)
                    .with_fill(Rgba::WHITE)
                    .with_z(Z_STARS),
            );
        }

        Ok(Mobject2D::new(FLAG_ROOT)
            .with_child(stripes)
            .with_child(canton)
            .with_child(stars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn layout() -> FlagLayout {
        FlagLayout::standard(StarShape::Pentagram).unwrap()
    }

    #[test]
    fn stripes_alternate_bands() {
        let f = layout();
        assert_eq!(f.stripes.len(), 7);
        let band = FLAG_HEIGHT / 13.0;
        for (i, s) in f.stripes.iter().enumerate() {
            assert_relative_eq!(s.y, band * 2.0 * i as f64, epsilon = 1e-9);
            assert_relative_eq!(s.height, band, epsilon = 1e-9);
            assert_relative_eq!(s.width, FLAG_WIDTH);
        }
        // The last red stripe ends on the bottom edge.
        let last = f.stripes.last().unwrap();
        assert_relative_eq!(last.y + last.height, FLAG_HEIGHT, epsilon = 1e-9);
    }

    #[test]
    fn canton_covers_seven_bands() {
        let f = layout();
        assert_relative_eq!(f.canton.width, FLAG_WIDTH / 2.1, epsilon = 1e-9);
        assert_relative_eq!(f.canton.height, FLAG_HEIGHT / 13.0 * 7.0, epsilon = 1e-9);
    }

    #[test]
    fn fifty_stars_in_alternating_rows() {
        let f = layout();
        assert_eq!(f.stars.len(), 50);

        let mut rows: Vec<(f64, usize)> = Vec::new();
        for s in &f.stars {
            match rows.last_mut() {
                Some((y, n)) if (*y - s.center.y).abs() < 1e-9 => *n += 1,
                _ => rows.push((s.center.y, 1)),
            }
        }
        let counts: Vec<usize> = rows.iter().map(|r| r.1).collect();
        assert_eq!(counts, vec![6, 5, 6, 5, 6, 5, 6, 5, 6]);

        let cell = f.canton.width / 11.0;
        assert_relative_eq!(f.stars[0].center.x, 20.0);
        assert_relative_eq!(f.stars[6].center.x, 20.0 + cell, epsilon = 1e-9);
    }

    #[test]
    fn stars_stay_inside_the_canton() {
        let f = layout();
        for s in &f.stars {
            for p in s.points() {
                assert!(f.canton.contains(*p), "star point {p:?} outside canton");
            }
        }
    }

    #[test]
    fn hit_test_skips_white_stripes() {
        let f = layout();
        let band = FLAG_HEIGHT / 13.0;
        assert!(f.contains(Point2D::new(700.0, band * 0.5)));
        assert!(!f.contains(Point2D::new(700.0, band * 1.5)));
        assert!(f.contains(Point2D::new(50.0, band * 1.5)));
        assert!(!f.contains(Point2D::new(900.0, 10.0)));
    }

    #[test]
    fn scene_tree_has_one_mesh_per_shape() {
        let root = layout().to_mobject().unwrap();
        assert_eq!(root.name, FLAG_ROOT);
        let mut items = Vec::new();
        root.flatten(crate::scene::Affine2::IDENTITY, &mut items);
        assert_eq!(items.len(), 7 + 1 + 50);
        assert!(items.iter().all(|it| !it.mesh.is_empty()));

        let b = root.compute_local_bounds();
        assert_relative_eq!(b.size()[0], FLAG_WIDTH as f32, epsilon = 1e-3);
        assert_relative_eq!(b.size()[1], FLAG_HEIGHT as f32, epsilon = 1e-3);
        assert_relative_eq!(b.center()[0], 400.0, epsilon = 1e-3);
    }

    #[test]
    fn invalid_size_is_rejected() {
        assert!(FlagLayout::build(0.0, 480.0, StarShape::Pentagram).is_err());
    }
}
