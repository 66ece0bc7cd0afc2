//! Minimal keyframe timeline for `Scene2D`.
//!
//! A `Timeline` holds tracks; each track drives the horizontal translation of one root
//! object (on its animated transform layer) through sorted keyframes. Evaluation is
//! stateless: `apply(scene, t)` writes the sampled values for time `t` (seconds), so
//! callers own the clock and any looping policy.
//!
//! Usage sketch:
//! ```ignore
//! let mut tl = Timeline::new();
//! tl.add_track(Track::new_translate_x(AnimTarget::Name("flag".into()))
//!     .with_keyframes(vec![Keyframe::at(0.0, 280.0), Keyframe::at(0.1, 0.0)]));
//! tl.apply(&mut scene, 0.05);
//! ```

use std::collections::HashMap;

use crate::scene::{Affine2, Scene2D};

/// How to map a segment's normalized time into an interpolation factor.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum Ease {
    #[default]
    Linear,
    /// Slow start and stop, symmetric.
    InOutQuad,
}

impl Ease {
    #[inline]
    pub fn sample(self, x: f32) -> f32 {
        let t = x.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) * 0.5
                }
            }
        }
    }
}

/// Identifies which object in the scene to animate.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimTarget {
    /// A root object by name.
    Name(String),
}

impl AnimTarget {
    fn resolve_index(&self, scene: &Scene2D) -> Option<usize> {
        match self {
            AnimTarget::Name(name) => scene.index.get(name).copied(),
        }
    }
}

/// A keyframe in seconds with a scalar value.
///
/// `ease` shapes the segment that starts at this keyframe.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Keyframe {
    pub time_s: f32,
    pub value: f32,
    pub ease: Ease,
}

impl Keyframe {
    #[inline]
    pub fn at(time_s: f32, value: f32) -> Self {
        Self {
            time_s: time_s.max(0.0),
            value,
            ease: Ease::Linear,
        }
    }

    #[inline]
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

/// Interpolate across sorted keyframes; holds the first/last value outside the range.
fn sample_keyframes(frames: &[Keyframe], t_s: f32) -> Option<f32> {
    let first = frames.first()?;
    if frames.len() == 1 || t_s <= first.time_s {
        return Some(first.value);
    }

    let mut prev = *first;
    for next in &frames[1..] {
        if t_s < next.time_s {
            let dt = (next.time_s - prev.time_s).max(1e-6);
            let u = (t_s - prev.time_s) / dt;
            let k = prev.ease.sample(u);
            return Some(lerp(prev.value, next.value, k));
        }
        prev = *next;
    }

    frames.last().map(|k| k.value)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One track drives the translate-X of one target.
#[derive(Debug, Clone)]
pub struct Track {
    pub target: AnimTarget,
    keyframes: Vec<Keyframe>,
}

impl Track {
    pub fn new_translate_x(target: AnimTarget) -> Self {
        Self {
            target,
            keyframes: Vec::new(),
        }
    }

    /// Replace the keyframes; they are kept sorted by time.
    pub fn with_keyframes(mut self, mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
        self.keyframes = keyframes;
        self
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn sample(&self, t_s: f32) -> Option<f32> {
        sample_keyframes(&self.keyframes, t_s)
    }
}

/// A set of tracks evaluated independently at time `t`.
#[derive(Debug, Default, Clone)]
pub struct Timeline {
    pub tracks: Vec<Track>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_track(&mut self, track: Track) -> &mut Self {
        self.tracks.push(track);
        self
    }

    /// Apply this timeline to the scene at time `t_s`.
    ///
    /// Translation is absolute within the animated layer. Several tracks on the same
    /// target: last wins.
    pub fn apply(&self, scene: &mut Scene2D, t_s: f32) {
        let mut tx: HashMap<usize, f32> = HashMap::new();

        for tr in &self.tracks {
            let Some(idx) = tr.target.resolve_index(scene) else {
                continue;
            };
            if let Some(v) = tr.sample(t_s) {
                tx.insert(idx, v);
            }
        }

        for (idx, x) in tx {
            if let Some(obj) = scene.roots.get_mut(idx) {
                obj.set_anim_transform(Affine2::translate(x, 0.0));
            }
        }
    }
}
