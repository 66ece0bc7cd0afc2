//! App entrypoint for the rendering layer.
//!
//! This module owns:
//! - the winit application lifecycle + event loop
//! - creating the window (size, title, icon)
//! - delegating to an injected async state builder
//!
//! The runner is generic over a state type `S: AppState`. The builder is async, receives the
//! created window, and runs once on the first `resumed`. Setup failures stop the event loop
//! and are returned from `run_with_builder`.

use std::{future::Future, pin::Pin, sync::Arc};

use anyhow::Context as _;
use log::{info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::render::icon::IconSource;

/// App-facing configuration for running the winit event loop.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Window title.
    pub title: String,
    /// ControlFlow for the event loop. States request redraws while they animate.
    pub control_flow: ControlFlow,
    /// Initial inner size in logical units.
    pub inner_size: LogicalSize<f64>,
    pub resizable: bool,
    /// Window icon; one that fails to load only logs a warning.
    pub icon: Option<IconSource>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Practical Activity 1".to_string(),
            control_flow: ControlFlow::Wait,
            inner_size: LogicalSize::new(1000.0, 500.0),
            resizable: false,
            icon: Some(IconSource::default()),
        }
    }
}

impl AppConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_inner_size(mut self, width: f64, height: f64) -> Self {
        self.inner_size = LogicalSize::new(width, height);
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_icon(mut self, icon: Option<IconSource>) -> Self {
        self.icon = icon;
        self
    }

    fn window_attributes(&self) -> WindowAttributes {
        let mut attrs = WindowAttributes::default()
            .with_title(self.title.as_str())
            .with_inner_size(self.inner_size)
            .with_resizable(self.resizable);

        if let Some(source) = &self.icon {
            match source.load() {
                Ok(icon) => attrs = attrs.with_window_icon(Some(icon)),
                Err(err) => warn!("icon: skipping {source}: {err}"),
            }
        }
        attrs
    }
}

/// Trait a state must implement to be driven by the app runner.
pub trait AppState: 'static {
    /// Handle window resize.
    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>);

    /// Render one frame.
    fn render(&mut self) -> anyhow::Result<()>;

    /// Request a redraw on the underlying window.
    fn request_redraw(&self);

    /// Window events not consumed by the runner (pointer, keyboard).
    fn input(&mut self, _event: &WindowEvent) {}
}

/// Run the winit event loop with an injected async state builder.
///
/// The builder is called once when the app is resumed (after the window is created) and
/// runs on the current thread using `pollster::block_on`.
pub fn run_with_builder<S, B, Fut>(config: AppConfig, builder: B) -> anyhow::Result<()>
where
    S: AppState,
    B: FnOnce(Arc<Window>) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<S>> + 'static,
{
    let event_loop = EventLoop::new().context("winit: failed to create EventLoop")?;
    event_loop.set_control_flow(config.control_flow);

    let mut app = App::<S>::new_with_builder(config, builder);
    event_loop
        .run_app(&mut app)
        .context("winit: run_app failed")?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Type-erased async builder for creating a state `S` from a created window.
///
/// The future is pinned and boxed so `pollster::block_on(...)` can drive it.
type BoxedStateBuilder<S> = Box<
    dyn FnOnce(Arc<Window>) -> Pin<Box<dyn Future<Output = anyhow::Result<S>> + 'static>> + 'static,
>;

/// Application state used by winit.
struct App<S: AppState> {
    config: AppConfig,
    builder: Option<BoxedStateBuilder<S>>,
    state: Option<S>,
    error: Option<anyhow::Error>,
    exiting: bool,
}

impl<S: AppState> App<S> {
    fn new_with_builder<B, Fut>(config: AppConfig, builder: B) -> Self
    where
        B: FnOnce(Arc<Window>) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<S>> + 'static,
    {
        Self {
            config,
            builder: Some(Box::new(|window| Box::pin(builder(window)))),
            state: None,
            error: None,
            exiting: false,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let Some(builder) = self.builder.take() else {
            // Resumed again after suspend; the state is kept.
            return Ok(());
        };

        let window = Arc::new(
            event_loop
                .create_window(self.config.window_attributes())
                .context("winit: failed to create window")?,
        );
        info!(
            "window created: {:?} {}x{}",
            self.config.title,
            self.config.inner_size.width,
            self.config.inner_size.height
        );

        let state = pollster::block_on(builder(window)).context("failed to initialize state")?;
        state.request_redraw();
        self.state = Some(state);
        Ok(())
    }
}

impl<S: AppState> ApplicationHandler for App<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.init(event_loop) {
            log::error!("{err:#}");
            self.error = Some(err);
            self.exiting = true;
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.exiting {
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested; exiting");
                self.exiting = true;
                self.state = None;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                state.resize(size);
                state.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = state.render() {
                    log::error!("render error: {err:#}");
                    self.error = Some(err);
                    self.exiting = true;
                    self.state = None;
                    event_loop.exit();
                }
            }
            other => state.input(&other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_matches_the_flag_scene() {
        let c = AppConfig::default();
        assert_eq!(c.title, "Practical Activity 1");
        assert_eq!(c.inner_size, LogicalSize::new(1000.0, 500.0));
        assert!(!c.resizable);
        // Embedded, so it loads regardless of the working directory.
        let icon = c.icon.expect("default icon");
        assert_eq!(icon, IconSource::default());
        assert!(icon.load().is_ok());
    }

    #[test]
    fn builders_override_fields() {
        let c = AppConfig::default()
            .with_title("ascii")
            .with_inner_size(640.0, 360.0)
            .with_resizable(true)
            .with_icon(None);
        assert_eq!(c.title, "ascii");
        assert_eq!(c.inner_size, LogicalSize::new(640.0, 360.0));
        assert!(c.resizable);
        assert!(c.icon.is_none());
    }
}
