//! Rendering layer: winit app runner, GPU context, and the scene mesh renderer.
//!
//! Entry point: `render::app::run_with_builder(...)` with an `AppState` implementation.

pub mod app;

/// Device, queue and window surface.
pub mod gpu;

/// Window icon decoding.
pub mod icon;

/// Batched solid-color renderer for scene draw items.
pub mod mesh_renderer;

/// Frame timing helpers.
pub mod util;

use crate::scene::Rgba;

/// Convert a scene color into a clear color.
#[inline]
pub fn clear_color(c: Rgba) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(c.r),
        g: f64::from(c.g),
        b: f64::from(c.b),
        a: f64::from(c.a),
    }
}
