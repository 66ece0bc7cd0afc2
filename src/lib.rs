//! `stars` library crate root.
//!
//! Draws a vector American flag (stripes, canton, five-point stars) in a winit/wgpu window
//! and slides it horizontally on click, pausing on drag. `ascii` builds the text-art variant
//! of the same flag.
//!
//! The binaries stay thin: they set up logging and call one of the entrypoints below.

pub mod anim;
pub mod ascii;
pub mod flag;
pub mod flag_app;
pub mod font;
pub mod geometry;
pub mod input;
pub mod render;
pub mod scene;
pub mod slide;
pub mod tessellate;

pub use ascii::create_flag;
pub use geometry::{StarPolygon, StarShape, star_polygon};

use flag_app::{FlagConfig, FlagState};
use render::app::{AppConfig, run_with_builder};

/// Open the flag window with explicit window and flag settings.
///
/// Does not initialize logging; callers pick their own logger.
pub fn run_with_config(app: AppConfig, flag: FlagConfig) -> anyhow::Result<()> {
    run_with_builder(app, |window| async move { FlagState::new(window, flag).await })
}

/// Open the flag window with default settings.
pub fn run_app() -> anyhow::Result<()> {
    run_with_config(AppConfig::default(), FlagConfig::default())
}
