//! Horizontal slide animation for the flag.
//!
//! The flag's center travels along a horizontal path from `from_x` to `to_x` and back,
//! forever. Playback is a two-state toggle:
//!
//! ```text
//!            Click
//!   Idle ------------> Playing
//!    ^                   |
//!    +------- Drag ------+
//! ```
//!
//! Pausing keeps the playhead, so the next click resumes where the flag stopped. Before
//! the first click the flag stays at its layout position.

use std::time::Duration;

use crate::anim::{AnimTarget, Ease, Keyframe, Timeline, Track};
use crate::render::util::ping_pong_01;
use crate::scene::Scene2D;

/// Pointer events the flag reacts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlagInput {
    Click,
    Drag,
}

/// Playback state of the slide.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Playback {
    #[default]
    Idle,
    Playing,
}

/// Slide path and timing.
#[derive(Debug, Clone)]
pub struct SlideConfig {
    /// Path start: x of the flag's center (scene units).
    pub from_x: f32,
    /// Path end: x of the flag's center (scene units).
    pub to_x: f32,
    /// One pass from `from_x` to `to_x`.
    pub duration: Duration,
    pub ease: Ease,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            from_x: 680.0,
            to_x: 400.0,
            duration: Duration::from_millis(100),
            ease: Ease::InOutQuad,
        }
    }
}

impl SlideConfig {
    #[inline]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Drives the translate-X of one scene root from pointer input and frame time.
#[derive(Debug, Clone)]
pub struct SlideAnimation {
    timeline: Timeline,
    duration_s: f32,
    playback: Playback,
    playhead_s: f32,
    started: bool,
}

impl SlideAnimation {
    /// `target`: root object to move. `center_x`: x of that object's center at rest.
    pub fn new(config: &SlideConfig, target: &str, center_x: f32) -> Self {
        // Clamp to keep the ping-pong period well defined.
        let duration_s = config.duration.as_secs_f32().max(1e-3);

        let mut timeline = Timeline::new();
        timeline.add_track(
            Track::new_translate_x(AnimTarget::Name(target.to_string())).with_keyframes(vec![
                Keyframe::at(0.0, config.from_x - center_x).ease(config.ease),
                Keyframe::at(duration_s, config.to_x - center_x),
            ]),
        );

        Self {
            timeline,
            duration_s,
            playback: Playback::Idle,
            playhead_s: 0.0,
            started: false,
        }
    }

    #[inline]
    pub fn playback(&self) -> Playback {
        self.playback
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }

    /// Apply a pointer event. Returns `true` if the playback state changed.
    pub fn handle(&mut self, input: FlagInput) -> bool {
        let next = match input {
            FlagInput::Click => Playback::Playing,
            FlagInput::Drag => Playback::Idle,
        };
        if next == self.playback {
            return false;
        }

        match next {
            Playback::Playing => {
                self.started = true;
                log::info!("slide: play at {:.3}s", self.playhead_s);
            }
            Playback::Idle => log::info!("slide: pause at {:.3}s", self.playhead_s),
        }
        self.playback = next;
        true
    }

    /// Advance the playhead by `dt` seconds while playing.
    ///
    /// The playhead wraps every full cycle (there and back) so it stays small enough for a
    /// single frame's `dt` to register.
    pub fn advance(&mut self, dt: f32) {
        if self.is_playing() {
            self.playhead_s = (self.playhead_s + dt.max(0.0)) % (2.0 * self.duration_s);
        }
    }

    /// Time within the current pass, mirrored on odd passes.
    #[inline]
    fn local_time(&self) -> f32 {
        ping_pong_01(self.playhead_s, self.duration_s) * self.duration_s
    }

    /// Current translate-X offset of the target.
    pub fn offset_x(&self) -> f32 {
        if !self.started {
            return 0.0;
        }
        self.timeline
            .tracks
            .first()
            .and_then(|t| t.sample(self.local_time()))
            .unwrap_or(0.0)
    }

    /// Write the current offset into the scene.
    pub fn apply(&self, scene: &mut Scene2D) {
        if self.started {
            self.timeline.apply(scene, self.local_time());
        }
    }
}
