//! Input polling.
//!
//! [`update_input_state`] reads hardware input from Raylib each frame and
//! writes the results into [`crate::resources::input::InputState`].
use raylib::ffi::{KeyboardKey, MouseButton};
use raylib::RaylibHandle;

use crate::resources::input::{BoolState, InputState};

/// Poll Raylib for keyboard and mouse input and update `input`.
pub fn update_input_state(input: &mut InputState, rl: &RaylibHandle) {
    let poll = |state: &mut BoolState| {
        let key: KeyboardKey = state.key_binding;
        state.active = rl.is_key_down(key);
        state.just_pressed = rl.is_key_pressed(key);
    };
    poll(&mut input.left);
    poll(&mut input.right);
    poll(&mut input.jump);
    poll(&mut input.back);

    input.mouse_position = rl.get_mouse_position();
    input.mouse_clicked = rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT);
}
