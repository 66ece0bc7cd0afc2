//! ASCII flag inside a push button.
//!
//! The flag text from `stars::create_flag` is drawn as vector glyphs with a monospace
//! system font, on a button face with a border. Holding the left button on the face darkens
//! it; releasing over the face logs a click.
//!
//! Run:
//! - `cargo run --example ascii_flag_button`

use std::sync::Arc;

use anyhow::Context as _;
use winit::event::WindowEvent;
use winit::window::Window;

use stars::font::text::{TextLayoutOptions, layout_text_to_mesh};
use stars::font::{FontQuery, FontSystem};
use stars::geometry::{Point2D, Rect};
use stars::input::PointerTracker;
use stars::render::{
    app::{AppConfig, AppState, run_with_builder},
    clear_color,
    gpu::Gpu,
    mesh_renderer::MeshRenderer,
};
use stars::scene::{Affine2, Mobject2D, Rgba, Scene2D};
use stars::slide::FlagInput;
use stars::tessellate::rect_mesh;

const FONT_SIZE: f32 = 18.0;
const PADDING: f64 = 16.0;
const BORDER: f64 = 2.0;
const MARGIN: f32 = 24.0;

const BORDER_COLOR: Rgba = Rgba::rgb(0.45, 0.45, 0.48);
const FACE_COLOR: Rgba = Rgba::rgb(0.92, 0.92, 0.94);
const FACE_PRESSED: Rgba = Rgba::rgb(0.78, 0.78, 0.82);
const LABEL_COLOR: Rgba = Rgba::rgb(0.1, 0.1, 0.12);
const BACKGROUND: Rgba = Rgba::rgb(0.97, 0.97, 0.97);

struct ButtonState {
    window: Arc<Window>,
    gpu: Gpu,
    renderer: MeshRenderer,
    scene: Scene2D,
    canvas: [f32; 2],
    face: Rect,
    pointer: PointerTracker,
}

impl ButtonState {
    async fn new(window: Arc<Window>, label: String) -> anyhow::Result<Self> {
        let gpu = Gpu::new(window.clone()).await?;
        let renderer = MeshRenderer::new(&gpu)?;

        let fonts = FontSystem::new().context("font: failed to initialize FontSystem")?;
        let face = fonts
            .resolve(&FontQuery::monospace())
            .context("font: no monospace face")?;
        let text = layout_text_to_mesh(
            &face,
            &label,
            &TextLayoutOptions {
                font_size: FONT_SIZE,
                ..Default::default()
            },
        )
        .context("text: failed to lay out the flag")?;
        log::info!(
            "label: {} lines, {:.0}x{:.0}, {} triangles",
            text.line_count,
            text.size[0],
            text.size[1],
            text.mesh.triangle_count()
        );

        let m = f64::from(MARGIN);
        let border = Rect::new(
            m,
            m,
            f64::from(text.size[0]) + 2.0 * (PADDING + BORDER),
            f64::from(text.size[1]) + 2.0 * (PADDING + BORDER),
        );
        let face_rect = Rect::new(
            border.x + BORDER,
            border.y + BORDER,
            border.width - 2.0 * BORDER,
            border.height - 2.0 * BORDER,
        );
        let canvas = [
            border.width as f32 + 2.0 * MARGIN,
            border.height as f32 + 2.0 * MARGIN,
        ];

        let mut scene = Scene2D::new();
        scene.background = Some(BACKGROUND);
        scene.add_root(
            Mobject2D::new("button_border")
                .with_mesh(rect_mesh(&border))
                .with_fill(BORDER_COLOR)
                .with_z(0),
        );
        scene.add_root(
            Mobject2D::new("button_face")
                .with_mesh(rect_mesh(&face_rect))
                .with_fill(FACE_COLOR)
                .with_z(1),
        );
        scene.add_root(
            Mobject2D::new("button_label")
                .with_mesh(text.mesh)
                .with_fill(LABEL_COLOR)
                .with_transform(Affine2::translate(
                    (face_rect.x + PADDING) as f32,
                    (face_rect.y + PADDING) as f32,
                ))
                .with_z(2),
        );

        let mut state = Self {
            window,
            gpu,
            renderer,
            scene,
            canvas,
            face: face_rect,
            pointer: PointerTracker::new(),
        };
        state.frame();
        Ok(state)
    }

    fn frame(&mut self) {
        let camera = &mut self.scene.camera;
        camera.set_viewport_px(self.gpu.size.width, self.gpu.size.height);
        camera.fit_canvas(self.canvas[0], self.canvas[1]);
    }

    fn set_face_fill(&mut self, fill: Rgba) {
        if let Some(face) = self.scene.get_mut("button_face") {
            face.fill = fill;
        }
    }
}

impl AppState for ButtonState {
    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gpu.resize(new_size);
        self.frame();
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let items = self.scene.flatten();
        self.renderer.prepare(&self.gpu, &self.scene.camera, &items);

        let clear = clear_color(self.scene.background.unwrap_or(Rgba::WHITE));
        let renderer = &self.renderer;
        self.gpu.render_frame(clear, |pass| renderer.draw(pass))?;
        Ok(())
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }

    fn input(&mut self, event: &WindowEvent) {
        let was_pressed = self.pointer.is_pressed_on_target();

        let camera = self.scene.camera;
        let viewport = [self.gpu.size.width, self.gpu.size.height];
        let face = self.face;
        let gesture = self.pointer.handle_window_event(
            event,
            |px| camera.screen_to_world(px, viewport),
            |[x, y]| face.contains(Point2D::new(f64::from(x), f64::from(y))),
        );
        if gesture == Some(FlagInput::Click) {
            log::info!("button: clicked");
        }

        let pressed = self.pointer.is_pressed_on_target();
        if pressed != was_pressed {
            self.set_face_fill(if pressed { FACE_PRESSED } else { FACE_COLOR });
            self.window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let label = stars::create_flag("*", "=")?;

    run_with_builder(
        AppConfig::default()
            .with_title("Practical Activity 1 (ASCII)")
            .with_inner_size(760.0, 420.0)
            .with_resizable(true),
        |window| async move { ButtonState::new(window, label).await },
    )
}
