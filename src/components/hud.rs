//! Player HUD: life icons on the top-left, coin counter on the top-right.

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Rectangle, Vector2};

use crate::components::animation::FrameRect;
use crate::frame::{DrawCmd, Frame, TextAlign};

/// Tint of lost life icons and of the coin text.
const DECOR_COLOR: Color = Color::BLACK;

#[derive(Component, Clone, Debug)]
pub struct Hud {
    pub image: String,
    pub font: String,
    pub font_size: f32,
    pub live: FrameRect,
    pub coin: FrameRect,
}

impl Hud {
    /// Emit screen-space draw commands for the given counters.
    pub fn draw(&self, frame: &mut Frame, life: i32, total_life: i32, coins: i32) {
        debug_assert!(life <= total_life);
        let live_src = self.live.to_rectangle();
        for i in 0..total_life.max(0) {
            let dest = Rectangle::new(
                (i * self.live.width) as f32,
                0.0,
                live_src.width,
                live_src.height,
            );
            let tint = if i >= life { DECOR_COLOR } else { Color::WHITE };
            frame
                .overlay
                .push(DrawCmd::image(self.image.clone(), live_src, dest, tint));
        }

        let right = frame.screen.w as f32;
        let coin_src = self.coin.to_rectangle();
        let coin_left = right - coin_src.width;
        frame.overlay.push(DrawCmd::image(
            self.image.clone(),
            coin_src,
            Rectangle::new(coin_left, 0.0, coin_src.width, coin_src.height),
            Color::WHITE,
        ));
        frame.overlay.push(DrawCmd::Text {
            font_key: self.font.clone(),
            text: format!("{coins} x "),
            position: Vector2::new(coin_left, 0.0),
            size: self.font_size,
            color: DECOR_COLOR,
            align: TextAlign::Right,
        });
    }
}
