use bevy_ecs::prelude::Component;
use raylib::prelude::{Rectangle, Vector2};

/// Sprite is identified by a texture key (the resolved image path), its size in pixels
/// and an offset selecting the frame when the texture is a sprite sheet.
/// The origin is the pivot (in pixels) relative to the frame's top-left used for
/// placement and rotation; level entities keep it at the frame center.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub offset: Vector2,
    pub origin: Vector2,
}

impl Sprite {
    /// Whole-image sprite pivoted at its center.
    pub fn centered(tex_key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
            offset: Vector2::zero(),
            origin: Vector2::new(width / 2.0, height / 2.0),
        }
    }

    /// Point the sprite at another frame of its sheet, keeping the pivot centered.
    pub fn set_frame(&mut self, frame: Rectangle) {
        self.offset = Vector2::new(frame.x, frame.y);
        self.width = frame.width.abs();
        self.height = frame.height.abs();
        self.origin = Vector2::new(self.width / 2.0, self.height / 2.0);
    }

    pub fn source_rect(&self) -> Rectangle {
        Rectangle {
            x: self.offset.x,
            y: self.offset.y,
            width: self.width,
            height: self.height,
        }
    }
}
