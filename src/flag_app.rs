//! The flag window: an 800x480 flag on a 1000x500 white canvas that slides back and forth
//! after a click and stops when dragged.
//!
//! `FlagScene` holds everything that does not touch the GPU (scene, layout, slide, pointer
//! state). `FlagState` wraps it with a window, a `Gpu` and a `MeshRenderer` for the app
//! runner.

use std::sync::Arc;

use winit::event::WindowEvent;
use winit::window::Window;

use crate::flag::{FLAG_ROOT, FLAG_WIDTH, FlagError, FlagLayout};
use crate::geometry::{Point2D, StarShape};
use crate::input::PointerTracker;
use crate::render::{
    app::AppState,
    clear_color,
    gpu::{FrameStatus, Gpu},
    mesh_renderer::MeshRenderer,
    util::FrameClock,
};
use crate::scene::{Rgba, Scene2D};
use crate::slide::{FlagInput, SlideAnimation, SlideConfig};

/// Canvas the camera frames, in scene units.
pub const CANVAS_WIDTH: f32 = 1000.0;
pub const CANVAS_HEIGHT: f32 = 500.0;

/// What the flag window shows and how it moves.
#[derive(Debug, Clone, Default)]
pub struct FlagConfig {
    pub star_shape: StarShape,
    pub slide: SlideConfig,
}

impl FlagConfig {
    pub fn with_star_shape(mut self, star_shape: StarShape) -> Self {
        self.star_shape = star_shape;
        self
    }

    pub fn with_slide(mut self, slide: SlideConfig) -> Self {
        self.slide = slide;
        self
    }
}

/// CPU side of the flag window.
#[derive(Debug)]
pub struct FlagScene {
    scene: Scene2D,
    layout: FlagLayout,
    slide: SlideAnimation,
    pointer: PointerTracker,
}

impl FlagScene {
    pub fn new(config: &FlagConfig) -> Result<Self, FlagError> {
        let layout = FlagLayout::standard(config.star_shape)?;

        let mut scene = Scene2D::new();
        scene.background = Some(Rgba::WHITE);
        scene.camera.fit_canvas(CANVAS_WIDTH, CANVAS_HEIGHT);
        scene.add_root(layout.to_mobject()?);

        let slide = SlideAnimation::new(&config.slide, FLAG_ROOT, (FLAG_WIDTH * 0.5) as f32);
        log::info!(
            "flag: {} stripes, {} stars ({:?})",
            layout.stripes.len(),
            layout.stars.len(),
            config.star_shape
        );

        Ok(Self {
            scene,
            layout,
            slide,
            pointer: PointerTracker::new(),
        })
    }

    #[inline]
    pub fn scene(&self) -> &Scene2D {
        &self.scene
    }

    #[inline]
    pub fn slide(&self) -> &SlideAnimation {
        &self.slide
    }

    /// Keep the canvas framed after the surface size changes.
    pub fn set_viewport_px(&mut self, width: u32, height: u32) {
        self.scene.camera.set_viewport_px(width, height);
        self.scene.camera.fit_canvas(CANVAS_WIDTH, CANVAS_HEIGHT);
    }

    /// Whether a world point is over a stripe or the canton, at the flag's current offset.
    pub fn hit(&self, world: [f32; 2]) -> bool {
        hit_flag(&self.layout, self.slide.offset_x(), world)
    }

    /// Route a gesture to the slide. Returns `true` if playback changed.
    pub fn handle_input(&mut self, input: FlagInput) -> bool {
        self.slide.handle(input)
    }

    /// Feed a raw window event; `viewport_px` is the surface size in physical pixels.
    pub fn handle_window_event(&mut self, event: &WindowEvent, viewport_px: [u32; 2]) -> bool {
        let camera = self.scene.camera;
        let offset_x = self.slide.offset_x();
        let layout = &self.layout;
        let input = self.pointer.handle_window_event(
            event,
            |px| camera.screen_to_world(px, viewport_px),
            |world| hit_flag(layout, offset_x, world),
        );
        input.is_some_and(|i| self.slide.handle(i))
    }

    /// Advance the slide by `dt` seconds and write it into the scene.
    pub fn update(&mut self, dt: f32) {
        self.slide.advance(dt);
        self.slide.apply(&mut self.scene);
    }
}

fn hit_flag(layout: &FlagLayout, offset_x: f32, world: [f32; 2]) -> bool {
    let local_x = world[0] - offset_x;
    layout.contains(Point2D::new(f64::from(local_x), f64::from(world[1])))
}

/// `AppState` for the flag window.
pub struct FlagState {
    window: Arc<Window>,
    gpu: Gpu,
    renderer: MeshRenderer,
    flag: FlagScene,
    clock: FrameClock,
}

impl FlagState {
    pub async fn new(window: Arc<Window>, config: FlagConfig) -> anyhow::Result<Self> {
        let gpu = Gpu::new(window.clone()).await?;
        let renderer = MeshRenderer::new(&gpu)?;

        let mut flag = FlagScene::new(&config)?;
        flag.set_viewport_px(gpu.size.width, gpu.size.height);

        Ok(Self {
            window,
            gpu,
            renderer,
            flag,
            clock: FrameClock::new(),
        })
    }
}

impl AppState for FlagState {
    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gpu.resize(new_size);
        self.flag.set_viewport_px(new_size.width, new_size.height);
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let dt = self.clock.tick();
        self.flag.update(dt);

        let scene = self.flag.scene();
        let items = scene.flatten();
        self.renderer.prepare(&self.gpu, &scene.camera, &items);

        let clear = clear_color(scene.background.unwrap_or(Rgba::WHITE));
        let renderer = &self.renderer;
        if self.gpu.render_frame(clear, |pass| renderer.draw(pass))? == FrameStatus::Skipped {
            return Ok(());
        }

        if self.flag.slide().is_playing() {
            self.window.request_redraw();
        }
        Ok(())
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }

    fn input(&mut self, event: &WindowEvent) {
        let viewport = [self.gpu.size.width, self.gpu.size.height];
        if self.flag.handle_window_event(event, viewport) {
            // The loop idles while paused; don't count that time.
            self.clock.reset();
            self.window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flag() -> FlagScene {
        FlagScene::new(&FlagConfig::default()).unwrap()
    }

    fn offset(f: &FlagScene) -> f32 {
        f.scene().get(FLAG_ROOT).unwrap().local_from_parent.translation()[0]
    }

    #[test]
    fn flag_rests_at_layout_position_until_clicked() {
        let mut f = flag();
        f.update(0.05);
        assert_relative_eq!(offset(&f), 0.0);
        assert!(f.hit([10.0, 10.0]));
        assert!(!f.hit([900.0, 10.0]));
    }

    #[test]
    fn click_starts_slide_from_path_start() {
        let mut f = flag();
        assert!(f.handle_input(FlagInput::Click));
        f.update(0.0);
        // Center at x = 680: shifted right by 280.
        assert_relative_eq!(offset(&f), 280.0);
        assert!(f.hit([900.0, 10.0]));
        assert!(!f.hit([100.0, 10.0]));

        f.update(0.1);
        assert_relative_eq!(offset(&f), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn drag_freezes_the_flag() {
        let mut f = flag();
        f.handle_input(FlagInput::Click);
        f.update(0.05);
        let held = offset(&f);

        assert!(f.handle_input(FlagInput::Drag));
        assert!(!f.handle_input(FlagInput::Drag));
        f.update(0.5);
        assert_relative_eq!(offset(&f), held);
    }

    #[test]
    fn config_builders_reach_the_scene() {
        let config = FlagConfig::default()
            .with_star_shape(StarShape::regular())
            .with_slide(SlideConfig::default().with_duration(std::time::Duration::from_secs(2)));
        let mut f = FlagScene::new(&config).unwrap();
        f.handle_input(FlagInput::Click);
        f.update(1.0);
        // Halfway through a two-second pass with ease in-out: halfway along the path.
        assert_relative_eq!(offset(&f), 140.0, epsilon = 1e-2);
    }

    #[test]
    fn background_is_white_and_canvas_is_framed() {
        let mut f = flag();
        f.set_viewport_px(1000, 500);
        let s = f.scene();
        assert_eq!(s.background, Some(Rgba::WHITE));
        let top_left = s.camera.screen_to_world([0.0, 0.0], [1000, 500]).unwrap();
        assert_relative_eq!(top_left[0], 0.0, epsilon = 1e-3);
        assert_relative_eq!(top_left[1], 0.0, epsilon = 1e-3);
    }
}
