//! Per-frame input resource.
//!
//! Captures the subset of keyboard and mouse state the game cares about:
//! arrow keys for walking and jumping, Escape for going back, and left clicks
//! for the menu screens. `main` fills it from Raylib once per frame; tests
//! set the fields directly.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::player::MoveIntent;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is currently held this frame.
    pub active: bool,
    /// Whether the key was just pressed this frame.
    pub just_pressed: bool,
    /// The key bound to this action.
    pub key_binding: KeyboardKey,
}

impl BoolState {
    pub fn bound(key_binding: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            key_binding,
        }
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound(KeyboardKey::KEY_NULL)
    }
}

/// Resource capturing the per-frame input relevant to the game.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub left: BoolState,
    pub right: BoolState,
    pub jump: BoolState,
    pub back: BoolState,
    /// Cursor position in screen pixels.
    pub mouse_position: Vector2,
    /// Left button went down this frame.
    pub mouse_clicked: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            left: BoolState::bound(KeyboardKey::KEY_LEFT),
            right: BoolState::bound(KeyboardKey::KEY_RIGHT),
            jump: BoolState::bound(KeyboardKey::KEY_UP),
            back: BoolState::bound(KeyboardKey::KEY_ESCAPE),
            mouse_position: Vector2::zero(),
            mouse_clicked: false,
        }
    }
}

impl InputState {
    /// Held directional and jump keys as a player intent.
    pub fn move_intent(&self) -> MoveIntent {
        MoveIntent {
            left: self.left.active,
            right: self.right.active,
            jump: self.jump.active,
        }
    }

    /// Left click at `position`, as the menu screens see it.
    pub fn click_at(&mut self, position: Vector2) {
        self.mouse_position = position;
        self.mouse_clicked = true;
    }

    /// Forget one-frame edges (clicks, presses) after a frame was handled.
    pub fn clear_edges(&mut self) {
        self.mouse_clicked = false;
        for state in [&mut self.left, &mut self.right, &mut self.jump, &mut self.back] {
            state.just_pressed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputstate_default_key_bindings() {
        let input = InputState::default();
        assert_eq!(input.left.key_binding, KeyboardKey::KEY_LEFT);
        assert_eq!(input.right.key_binding, KeyboardKey::KEY_RIGHT);
        assert_eq!(input.jump.key_binding, KeyboardKey::KEY_UP);
        assert_eq!(input.back.key_binding, KeyboardKey::KEY_ESCAPE);
        assert!(!input.mouse_clicked);
    }

    #[test]
    fn test_move_intent_reflects_held_keys() {
        let mut input = InputState::default();
        input.right.active = true;
        input.jump.active = true;
        let intent = input.move_intent();
        assert!(!intent.left);
        assert!(intent.right);
        assert!(intent.jump);
    }

    #[test]
    fn test_clear_edges_keeps_held_state() {
        let mut input = InputState::default();
        input.back.active = true;
        input.back.just_pressed = true;
        input.click_at(Vector2::new(3.0, 4.0));
        input.clear_edges();
        assert!(input.back.active);
        assert!(!input.back.just_pressed);
        assert!(!input.mouse_clicked);
        assert_eq!(input.mouse_position, Vector2::new(3.0, 4.0));
    }
}
