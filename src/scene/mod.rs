//! Scene graph abstractions.
//!
//! The scene is a small tree of named objects ("mobjects"), each with a local transform,
//! an optional filled mesh and children. A camera maps world coordinates to clip space and
//! renderers consume a flattened list of draw items.
//!
//! World units are logical window pixels with the origin at the top-left and y pointing
//! down, matching the layout constants of the flag. `Camera2D::y_down` flips the axis
//! when mapping to clip space.
//!
//! Transforms on a root object are split in two layers:
//! - `base_from_parent`: static placement from layout.
//! - `anim_from_parent`: written by `anim::Timeline` every frame.
//!
//! `local_from_parent` is always `base_from_parent * anim_from_parent`.

use std::collections::BTreeMap;

/// 2D affine transform stored as a 3x3 matrix in column-major order.
///
/// Convention:
/// - Column vectors (x, y, 1)
/// - Composition is `world_from_local = parent * local`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine2 {
    /// Column-major 3x3 matrix.
    pub m: [[f32; 3]; 3],
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2 {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [tx, ty, 1.0]],
        }
    }

    #[inline]
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Compose transforms: `self * rhs` (rhs applies first).
    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        let a = self.m;
        let b = rhs.m;

        let mut out = [[0.0f32; 3]; 3];
        for col in 0..3 {
            for row in 0..3 {
                out[col][row] =
                    a[0][row] * b[col][0] + a[1][row] * b[col][1] + a[2][row] * b[col][2];
            }
        }
        Self { m: out }
    }

    #[inline]
    pub fn transform_point(self, x: f32, y: f32) -> (f32, f32) {
        let nx = self.m[0][0] * x + self.m[1][0] * y + self.m[2][0];
        let ny = self.m[0][1] * x + self.m[1][1] * y + self.m[2][1];
        (nx, ny)
    }

    /// Inverse of the affine part, or `None` if the linear part is singular.
    pub fn inverse(self) -> Option<Self> {
        let [[a, b, _], [c, d, _], [tx, ty, _]] = self.m;
        let det = a * d - b * c;
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let (ia, ib, ic, id) = (d * inv, -b * inv, -c * inv, a * inv);
        Some(Self {
            m: [
                [ia, ib, 0.0],
                [ic, id, 0.0],
                [-(ia * tx + ic * ty), -(ib * tx + id * ty), 1.0],
            ],
        })
    }

    /// Translation component `(tx, ty)`.
    #[inline]
    pub fn translation(self) -> [f32; 2] {
        [self.m[2][0], self.m[2][1]]
    }

    /// Embed into a column-major 4x4 for GPU use.
    #[inline]
    pub fn to_mat4(self) -> glam::Mat4 {
        let m = self.m;
        glam::Mat4::from_cols_array_2d(&[
            [m[0][0], m[0][1], 0.0, m[0][2]],
            [m[1][0], m[1][1], 0.0, m[1][2]],
            [0.0, 0.0, 1.0, 0.0],
            [m[2][0], m[2][1], 0.0, m[2][2]],
        ])
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Aabb2 {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Aabb2 {
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: [f32::INFINITY, f32::INFINITY],
            max: [f32::NEG_INFINITY, f32::NEG_INFINITY],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    #[inline]
    pub fn include_point(&mut self, p: [f32; 2]) {
        self.min[0] = self.min[0].min(p[0]);
        self.min[1] = self.min[1].min(p[1]);
        self.max[0] = self.max[0].max(p[0]);
        self.max[1] = self.max[1].max(p[1]);
    }

    #[inline]
    pub fn center(&self) -> [f32; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }

    #[inline]
    pub fn size(&self) -> [f32; 2] {
        [self.max[0] - self.min[0], self.max[1] - self.min[1]]
    }
}

/// Simple RGBA color, components in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// An owned CPU triangle mesh (2D positions, u16 indices).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh2D {
    pub positions: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
}

impl Mesh2D {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append `other` into `self`, offsetting indices.
    ///
    /// Panics if the vertex count exceeds `u16::MAX`.
    pub fn append(&mut self, other: &Mesh2D) {
        let base = self.positions.len();
        assert!(
            base + other.positions.len() <= u16::MAX as usize,
            "Mesh2D::append: vertex count overflow for u16 indices"
        );

        self.positions.extend_from_slice(&other.positions);

        let base = base as u16;
        self.indices
            .extend(other.indices.iter().copied().map(|i| base + i));
    }
}

/// A draw item produced by flattening the scene graph.
///
/// - `world_from_local` is fully composed for this item.
/// - `z` is painter's order; higher draws later.
#[derive(Debug, Clone)]
pub struct DrawItem2D {
    pub mesh: Mesh2D,
    pub fill: Rgba,
    pub world_from_local: Affine2,
    pub z: i32,
}

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct Mobject2D {
    pub name: String,

    /// Static placement relative to the parent.
    pub base_from_parent: Affine2,
    /// Animated layer, owned by `anim::Timeline`.
    pub anim_from_parent: Affine2,
    /// `base_from_parent * anim_from_parent`; this is what flattening reads.
    pub local_from_parent: Affine2,

    pub z: i32,

    pub fill: Rgba,
    pub mesh: Option<Mesh2D>,

    pub children: Vec<Mobject2D>,
}

impl Default for Mobject2D {
    fn default() -> Self {
        Self {
            name: "mobject".to_string(),
            base_from_parent: Affine2::IDENTITY,
            anim_from_parent: Affine2::IDENTITY,
            local_from_parent: Affine2::IDENTITY,
            z: 0,
            fill: Rgba::WHITE,
            mesh: None,
            children: Vec::new(),
        }
    }
}

impl Mobject2D {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_mesh(mut self, mesh: Mesh2D) -> Self {
        self.mesh = Some(mesh);
        self
    }

    #[inline]
    pub fn with_fill(mut self, fill: Rgba) -> Self {
        self.fill = fill;
        self
    }

    #[inline]
    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// Set the static placement; the animated layer is kept.
    #[inline]
    pub fn with_transform(mut self, base_from_parent: Affine2) -> Self {
        self.base_from_parent = base_from_parent;
        self.local_from_parent = base_from_parent.mul(self.anim_from_parent);
        self
    }

    #[inline]
    pub fn with_child(mut self, child: Mobject2D) -> Self {
        self.children.push(child);
        self
    }

    #[inline]
    pub fn add_child(&mut self, child: Mobject2D) {
        self.children.push(child);
    }

    /// Replace the animated layer and recompose `local_from_parent`.
    #[inline]
    pub fn set_anim_transform(&mut self, anim_from_parent: Affine2) {
        self.anim_from_parent = anim_from_parent;
        self.local_from_parent = self.base_from_parent.mul(anim_from_parent);
    }

    /// Conservative local-space bounds of the mesh and all children.
    ///
    /// Child bounds are mapped through the child's transform by transforming the four corners.
    pub fn compute_local_bounds(&self) -> Aabb2 {
        let mut bounds = Aabb2::empty();

        if let Some(mesh) = &self.mesh {
            for &p in &mesh.positions {
                bounds.include_point(p);
            }
        }

        for child in &self.children {
            let child_bounds = child.compute_local_bounds();
            if child_bounds.is_empty() {
                continue;
            }

            let corners = [
                [child_bounds.min[0], child_bounds.min[1]],
                [child_bounds.max[0], child_bounds.min[1]],
                [child_bounds.max[0], child_bounds.max[1]],
                [child_bounds.min[0], child_bounds.max[1]],
            ];

            for c in corners {
                let (x, y) = child.local_from_parent.transform_point(c[0], c[1]);
                bounds.include_point([x, y]);
            }
        }

        bounds
    }

    /// Flatten this subtree into draw items, composing transforms.
    pub fn flatten(&self, world_from_parent: Affine2, out: &mut Vec<DrawItem2D>) {
        let world_from_local = world_from_parent.mul(self.local_from_parent);

        if let Some(mesh) = &self.mesh {
            out.push(DrawItem2D {
                mesh: mesh.clone(),
                fill: self.fill,
                world_from_local,
                z: self.z,
            });
        }

        for child in &self.children {
            child.flatten(world_from_local, out);
        }
    }
}

/// A 2D camera mapping world coordinates into clip space (-1..1).
///
/// - `center`: the world point that maps to the center of the viewport
/// - `zoom`: scale factor (world -> NDC)
/// - `viewport_aspect`: width / height, used for isotropic scaling
/// - `y_down`: world y grows downward (screen convention)
#[derive(Debug, Copy, Clone)]
pub struct Camera2D {
    pub center: [f32; 2],
    pub zoom: f32,
    pub viewport_aspect: f32,
    pub y_down: bool,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            zoom: 1.0,
            viewport_aspect: 1.0,
            y_down: true,
        }
    }
}

impl Camera2D {
    /// Set the viewport size in pixels to update the aspect ratio.
    #[inline]
    pub fn set_viewport_px(&mut self, width: u32, height: u32) {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        self.viewport_aspect = w / h;
    }

    #[inline]
    fn aspect_scale(&self) -> (f32, f32) {
        let ax = if self.viewport_aspect > 1.0 {
            1.0 / self.viewport_aspect
        } else {
            1.0
        };
        let ay = if self.viewport_aspect < 1.0 {
            self.viewport_aspect
        } else {
            1.0
        };
        (ax, ay)
    }

    /// Affine transform from world to clip space.
    pub fn clip_from_world(&self) -> Affine2 {
        let t = Affine2::translate(-self.center[0], -self.center[1]);
        let (ax, ay) = self.aspect_scale();
        let flip = if self.y_down { -1.0 } else { 1.0 };
        let s = Affine2::scale(self.zoom * ax, flip * self.zoom * ay);
        s.mul(t)
    }

    /// Frame a fixed canvas `[0, width] x [0, height]` so that it fills the viewport
    /// along its tighter axis.
    pub fn fit_canvas(&mut self, width: f32, height: f32) {
        let w = width.max(1e-3);
        let h = height.max(1e-3);
        self.center = [w * 0.5, h * 0.5];

        let (ax, ay) = self.aspect_scale();
        let zoom_x = 2.0 / (w * ax);
        let zoom_y = 2.0 / (h * ay);
        self.zoom = zoom_x.min(zoom_y);
    }

    /// Map a cursor position in physical pixels to world coordinates.
    ///
    /// Returns `None` for a degenerate viewport.
    pub fn screen_to_world(&self, px: [f32; 2], viewport_px: [u32; 2]) -> Option<[f32; 2]> {
        let (w, h) = (viewport_px[0] as f32, viewport_px[1] as f32);
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let ndc_x = px[0] / w * 2.0 - 1.0;
        let ndc_y = 1.0 - px[1] / h * 2.0;
        let world_from_clip = self.clip_from_world().inverse()?;
        let (x, y) = world_from_clip.transform_point(ndc_x, ndc_y);
        Some([x, y])
    }
}

/// A top-level scene holding named root objects.
#[derive(Debug, Default)]
pub struct Scene2D {
    pub camera: Camera2D,
    pub background: Option<Rgba>,
    pub roots: Vec<Mobject2D>,
    /// Root name -> index into `roots`.
    pub index: BTreeMap<String, usize>,
}

impl Scene2D {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, m: Mobject2D) {
        let idx = self.roots.len();
        self.index.insert(m.name.clone(), idx);
        self.roots.push(m);
    }

    pub fn get(&self, name: &str) -> Option<&Mobject2D> {
        self.index.get(name).and_then(|&i| self.roots.get(i))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Mobject2D> {
        let i = *self.index.get(name)?;
        self.roots.get_mut(i)
    }

    /// Flatten the full scene into draw items sorted by `z` (stable).
    pub fn flatten(&self) -> Vec<DrawItem2D> {
        let mut items = Vec::new();
        for root in &self.roots {
            root.flatten(Affine2::IDENTITY, &mut items);
        }
        items.sort_by_key(|it| it.z);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad(w: f32, h: f32) -> Mesh2D {
        Mesh2D {
            positions: vec![[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    #[test]
    fn inverse_round_trips() {
        let xf = Affine2::translate(10.0, -4.0)
            .mul(Affine2::scale(2.0, 0.5));
        let inv = xf.inverse().unwrap();
        let (x, y) = xf.transform_point(3.0, 7.0);
        let (bx, by) = inv.transform_point(x, y);
        assert_relative_eq!(bx, 3.0, epsilon = 1e-4);
        assert_relative_eq!(by, 7.0, epsilon = 1e-4);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Affine2::scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn flatten_composes_and_sorts_by_z() {
        let mut scene = Scene2D::new();
        let root = Mobject2D::new("root")
            .with_transform(Affine2::translate(5.0, 0.0))
            .with_child(Mobject2D::new("top").with_mesh(quad(1.0, 1.0)).with_z(2))
            .with_child(Mobject2D::new("bottom").with_mesh(quad(1.0, 1.0)).with_z(0));
        scene.add_root(root);

        let items = scene.flatten();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].z, 0);
        assert_eq!(items[1].z, 2);
        assert_eq!(items[0].world_from_local.translation(), [5.0, 0.0]);
    }

    #[test]
    fn anim_layer_composes_with_base() {
        let mut m = Mobject2D::new("m").with_transform(Affine2::translate(1.0, 2.0));
        m.set_anim_transform(Affine2::translate(10.0, 0.0));
        assert_eq!(m.local_from_parent.translation(), [11.0, 2.0]);
    }

    #[test]
    fn bounds_include_transformed_children() {
        let root = Mobject2D::new("root").with_child(
            Mobject2D::new("child")
                .with_mesh(quad(4.0, 2.0))
                .with_transform(Affine2::translate(10.0, 10.0)),
        );
        let b = root.compute_local_bounds();
        assert_eq!(b.min, [10.0, 10.0]);
        assert_eq!(b.max, [14.0, 12.0]);
    }

    #[test]
    fn fitted_canvas_maps_corners_to_clip_edges() {
        let mut cam = Camera2D::default();
        cam.set_viewport_px(1000, 500);
        cam.fit_canvas(1000.0, 500.0);

        let clip = cam.clip_from_world();
        let (x, y) = clip.transform_point(0.0, 0.0);
        assert_relative_eq!(x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(y, 1.0, epsilon = 1e-5);
        let (x, y) = clip.transform_point(1000.0, 500.0);
        assert_relative_eq!(x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(y, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn screen_to_world_uses_pixel_coordinates() {
        let mut cam = Camera2D::default();
        cam.set_viewport_px(2000, 1000);
        cam.fit_canvas(1000.0, 500.0);

        // HiDPI: physical 2000x1000 window showing a 1000x500 canvas.
        let p = cam.screen_to_world([500.0, 250.0], [2000, 1000]).unwrap();
        assert_relative_eq!(p[0], 250.0, epsilon = 1e-3);
        assert_relative_eq!(p[1], 125.0, epsilon = 1e-3);

        assert!(cam.screen_to_world([0.0, 0.0], [0, 10]).is_none());
    }

    #[test]
    fn mesh_append_offsets_indices() {
        let mut a = quad(1.0, 1.0);
        a.append(&quad(2.0, 2.0));
        assert_eq!(a.positions.len(), 8);
        assert_eq!(&a.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(a.triangle_count(), 4);
    }
}
