//! Pointer input to `FlagInput` events.
//!
//! winit reports raw button and cursor events; the flag only cares about two gestures on
//! its shapes:
//! - click: left button released over the target after being pressed over it
//! - drag: cursor motion while the left button is held, with the press on the target
//!
//! A drag that ends over the target still produces a click on release.

use winit::event::{ElementState, MouseButton, WindowEvent};

use crate::slide::FlagInput;

/// Tracks left-button state and cursor position in world coordinates.
#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    cursor: Option<[f32; 2]>,
    pressed_on_target: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position in world coordinates.
    #[inline]
    pub fn cursor(&self) -> Option<[f32; 2]> {
        self.cursor
    }

    /// Whether the left button is currently held after pressing on the target.
    #[inline]
    pub fn is_pressed_on_target(&self) -> bool {
        self.pressed_on_target
    }

    pub fn on_cursor_moved(&mut self, world: [f32; 2]) -> Option<FlagInput> {
        self.cursor = Some(world);
        self.pressed_on_target.then_some(FlagInput::Drag)
    }

    pub fn on_cursor_left(&mut self) {
        self.cursor = None;
    }

    pub fn on_left_button(&mut self, pressed: bool, over_target: bool) -> Option<FlagInput> {
        if pressed {
            self.pressed_on_target = over_target;
            return None;
        }
        let was_pressed = std::mem::take(&mut self.pressed_on_target);
        (was_pressed && over_target).then_some(FlagInput::Click)
    }

    /// Feed a winit window event.
    ///
    /// - `to_world`: physical cursor pixels -> world coordinates
    /// - `hit`: whether a world point is over the target
    pub fn handle_window_event(
        &mut self,
        event: &WindowEvent,
        to_world: impl Fn([f32; 2]) -> Option<[f32; 2]>,
        hit: impl Fn([f32; 2]) -> bool,
    ) -> Option<FlagInput> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let world = to_world([position.x as f32, position.y as f32])?;
                self.on_cursor_moved(world)
            }
            WindowEvent::CursorLeft { .. } => {
                self.on_cursor_left();
                None
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let over = self.cursor.is_some_and(&hit);
                self.on_left_button(*state == ElementState::Pressed, over)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_on_target_is_a_click() {
        let mut p = PointerTracker::new();
        assert_eq!(p.on_cursor_moved([1.0, 1.0]), None);
        assert_eq!(p.on_left_button(true, true), None);
        assert!(p.is_pressed_on_target());
        assert_eq!(p.on_left_button(false, true), Some(FlagInput::Click));
        assert!(!p.is_pressed_on_target());
    }

    #[test]
    fn motion_while_held_is_a_drag() {
        let mut p = PointerTracker::new();
        p.on_left_button(true, true);
        assert_eq!(p.on_cursor_moved([2.0, 2.0]), Some(FlagInput::Drag));
        assert_eq!(p.on_cursor_moved([3.0, 2.0]), Some(FlagInput::Drag));
        // Release back over the target resumes.
        assert_eq!(p.on_left_button(false, true), Some(FlagInput::Click));
        assert_eq!(p.on_cursor_moved([4.0, 2.0]), None);
    }

    #[test]
    fn press_off_target_produces_nothing() {
        let mut p = PointerTracker::new();
        p.on_left_button(true, false);
        assert_eq!(p.on_cursor_moved([2.0, 2.0]), None);
        assert_eq!(p.on_left_button(false, true), None);
    }

    #[test]
    fn release_off_target_is_not_a_click() {
        let mut p = PointerTracker::new();
        p.on_left_button(true, true);
        assert_eq!(p.on_left_button(false, false), None);
    }

    #[test]
    fn cursor_left_forgets_position() {
        let mut p = PointerTracker::new();
        p.on_cursor_moved([5.0, 5.0]);
        p.on_cursor_left();
        assert_eq!(p.cursor(), None);
    }
}
