//! Star geometry.
//!
//! Pure, renderer-agnostic vertex generation for five-point stars. Coordinates are in
//! surface space: origin top-left, y increasing downward, so an angle of -90° points
//! straight up from the center.
//!
//! Two shapes are supported:
//! - `StarShape::Pentagram`: all ten points on one circle of radius `size`, stepped by
//!   144°. The path crosses itself and relies on the non-zero fill rule to produce a
//!   solid star. This is the shape the flag layout uses by default.
//! - `StarShape::TwoRadius`: outer tips on radius `size`, inner notches on
//!   `size * inner_ratio`, stepped by 36°. A simple (non self-intersecting) polygon
//!   that fills the same way under either fill rule.

use lyon::path::Path;
use lyon::tessellation::FillRule;

/// Number of vertices in every star polygon.
pub const STAR_VERTEX_COUNT: usize = 10;

/// Inner/outer radius ratio of a regular five-point star (`1 / φ²`).
pub const REGULAR_INNER_RATIO: f64 = 0.381_966;

const START_ANGLE_DEG: f64 = -90.0;

/// Errors produced by geometry helpers.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A point in surface coordinates (y down).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_f32(self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }
}

/// Which star construction to use.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum StarShape {
    /// Single radius, 144° step, self-intersecting outline.
    #[default]
    Pentagram,
    /// Outer radius `size`, inner radius `size * inner_ratio`, 36° step.
    TwoRadius { inner_ratio: f64 },
}

impl StarShape {
    /// Regular two-radius star.
    #[inline]
    pub fn regular() -> Self {
        StarShape::TwoRadius {
            inner_ratio: REGULAR_INNER_RATIO,
        }
    }

    #[inline]
    fn step_deg(self) -> f64 {
        match self {
            StarShape::Pentagram => 144.0,
            StarShape::TwoRadius { .. } => 36.0,
        }
    }

    #[inline]
    fn radius(self, size: f64, i: usize) -> f64 {
        match self {
            StarShape::Pentagram => size,
            StarShape::TwoRadius { inner_ratio } => {
                if i % 2 == 0 {
                    size
                } else {
                    size * inner_ratio
                }
            }
        }
    }

    /// Fill rule under which the outline renders as a solid star.
    #[inline]
    pub fn fill_rule(self) -> FillRule {
        FillRule::NonZero
    }
}

/// A closed star outline: exactly `STAR_VERTEX_COUNT` points.
///
/// For `TwoRadius` stars, even indices are outer tips and odd indices are inner notches.
/// For `Pentagram` stars every point is a tip; points 5..10 retrace points 0..5.
#[derive(Debug, Clone, PartialEq)]
pub struct StarPolygon {
    pub center: Point2D,
    pub shape: StarShape,
    points: [Point2D; STAR_VERTEX_COUNT],
}

impl StarPolygon {
    #[inline]
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Outer tip vertices in path order.
    pub fn tips(&self) -> impl Iterator<Item = Point2D> + '_ {
        let take = match self.shape {
            StarShape::Pentagram => 5,
            StarShape::TwoRadius { .. } => STAR_VERTEX_COUNT,
        };
        let step = match self.shape {
            StarShape::Pentagram => 1,
            StarShape::TwoRadius { .. } => 2,
        };
        self.points[..take].iter().copied().step_by(step)
    }

    /// Build a closed lyon path from the outline (f32 precision).
    pub fn to_path(&self) -> Path {
        polygon_path(self.points.iter().map(|p| p.to_f32()))
    }
}

/// Compute the outline of one five-point star.
///
/// - `center_x`, `center_y`: star center in surface coordinates.
/// - `size`: radius of the outer tips; must be finite and `> 0`.
///
/// The first point lies directly above the center.
pub fn star_polygon(
    center_x: f64,
    center_y: f64,
    size: f64,
    shape: StarShape,
) -> Result<StarPolygon, GeometryError> {
    if !center_x.is_finite() || !center_y.is_finite() {
        return Err(GeometryError::InvalidArgument(format!(
            "star center must be finite, got ({center_x}, {center_y})"
        )));
    }
    if !size.is_finite() || size <= 0.0 {
        return Err(GeometryError::InvalidArgument(format!(
            "star size must be a positive finite number, got {size}"
        )));
    }
    if let StarShape::TwoRadius { inner_ratio } = shape {
        if !inner_ratio.is_finite() || inner_ratio <= 0.0 || inner_ratio >= 1.0 {
            return Err(GeometryError::InvalidArgument(format!(
                "inner_ratio must be in (0, 1), got {inner_ratio}"
            )));
        }
    }

    let mut points = [Point2D::default(); STAR_VERTEX_COUNT];
    for (i, p) in points.iter_mut().enumerate() {
        let theta = (START_ANGLE_DEG + shape.step_deg() * i as f64).to_radians();
        let r = shape.radius(size, i);
        *p = Point2D::new(center_x + r * theta.cos(), center_y + r * theta.sin());
    }

    Ok(StarPolygon {
        center: Point2D::new(center_x, center_y),
        shape,
        points,
    })
}

/// Build a closed polygon path from a point sequence.
pub fn polygon_path(points: impl IntoIterator<Item = [f32; 2]>) -> Path {
    let mut b = Path::builder();
    let mut open = false;
    for [x, y] in points {
        let p = lyon::math::point(x, y);
        if open {
            b.line_to(p);
        } else {
            b.begin(p);
            open = true;
        }
    }
    if open {
        b.close();
    }
    b.build()
}

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Corners in clockwise screen order starting top-left.
    #[inline]
    pub fn corners(&self) -> [Point2D; 4] {
        [
            Point2D::new(self.x, self.y),
            Point2D::new(self.x + self.width, self.y),
            Point2D::new(self.x + self.width, self.y + self.height),
            Point2D::new(self.x, self.y + self.height),
        ]
    }

    pub fn to_path(&self) -> Path {
        polygon_path(self.corners().into_iter().map(Point2D::to_f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn has_point(points: &[Point2D], x: f64, y: f64) -> bool {
        points
            .iter()
            .any(|p| (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9)
    }

    #[test]
    fn always_ten_points() {
        for shape in [StarShape::Pentagram, StarShape::regular()] {
            for &(cx, cy, size) in &[(0.0, 0.0, 3.0), (20.0, 20.0, 11.5), (-5.0, 7.0, 0.01)] {
                let star = star_polygon(cx, cy, size, shape).unwrap();
                assert_eq!(star.points().len(), STAR_VERTEX_COUNT);
            }
        }
    }

    #[test]
    fn first_point_is_above_center() {
        let star = star_polygon(0.0, 0.0, 3.0, StarShape::Pentagram).unwrap();
        let first = star.points()[0];
        assert_relative_eq!(first.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(first.y, -3.0, epsilon = 1e-12);

        let star = star_polygon(0.0, 0.0, 3.0, StarShape::regular()).unwrap();
        assert_relative_eq!(star.points()[0].y, -3.0, epsilon = 1e-12);
    }

    #[test]
    fn tips_are_mirror_symmetric_about_center_axis() {
        for shape in [StarShape::Pentagram, StarShape::regular()] {
            let star = star_polygon(10.0, 4.0, 5.0, shape).unwrap();
            let tips: Vec<_> = star.tips().collect();
            assert_eq!(tips.len(), 5);
            for t in &tips {
                let mirrored_x = 2.0 * star.center.x - t.x;
                assert!(
                    has_point(&tips, mirrored_x, t.y),
                    "{shape:?}: no mirror for ({}, {})",
                    t.x,
                    t.y
                );
            }
        }
    }

    #[test]
    fn pentagram_points_share_one_radius() {
        let star = star_polygon(1.0, 2.0, 4.0, StarShape::Pentagram).unwrap();
        for p in star.points() {
            let r = ((p.x - 1.0).powi(2) + (p.y - 2.0).powi(2)).sqrt();
            assert_relative_eq!(r, 4.0, epsilon = 1e-9);
        }
        // The second half retraces the first.
        for i in 0..5 {
            let (a, b) = (star.points()[i], star.points()[i + 5]);
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn two_radius_alternates_outer_and_inner() {
        let star = star_polygon(0.0, 0.0, 10.0, StarShape::regular()).unwrap();
        for (i, p) in star.points().iter().enumerate() {
            let r = p.x.hypot(p.y);
            let expected = if i % 2 == 0 {
                10.0
            } else {
                10.0 * REGULAR_INNER_RATIO
            };
            assert_relative_eq!(r, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn degenerate_size_is_rejected() {
        for size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = star_polygon(0.0, 0.0, size, StarShape::Pentagram).unwrap_err();
            assert!(matches!(err, GeometryError::InvalidArgument(_)));
        }
    }

    #[test]
    fn bad_inner_ratio_is_rejected() {
        let shape = StarShape::TwoRadius { inner_ratio: 1.5 };
        assert!(star_polygon(0.0, 0.0, 1.0, shape).is_err());
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let a = star_polygon(12.5, 40.0, 7.0, StarShape::Pentagram).unwrap();
        let b = star_polygon(12.5, 40.0, 7.0, StarShape::Pentagram).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 5.0);
        assert!(r.contains(Point2D::new(0.0, 0.0)));
        assert!(r.contains(Point2D::new(10.0, 5.0)));
        assert!(!r.contains(Point2D::new(10.1, 2.0)));
    }
}
