//! Display list filled by the world and the screens each frame.
//!
//! Nothing in here touches the GPU. [`Frame`] records what should be drawn:
//! the camera target, the clear color, world-space commands drawn through the
//! camera and screen-space commands drawn on top. The raylib presenter in
//! [`crate::systems::render`] executes it; tests inspect it directly.

use raylib::prelude::{Color, Rectangle, Vector2};

use crate::resources::screensize::ScreenSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `position.x` is the left edge of the text.
    Left,
    /// `position.x` is the right edge of the text.
    Right,
}

#[derive(Debug, Clone)]
pub enum DrawCmd {
    Texture {
        tex_key: String,
        src: Rectangle,
        dest: Rectangle,
        origin: Vector2,
        rotation: f32,
        tint: Color,
    },
    Rect {
        rect: Rectangle,
        color: Color,
    },
    Text {
        font_key: String,
        text: String,
        position: Vector2,
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

impl DrawCmd {
    /// Draw a whole texture (or a part of it) at `dest` with no rotation.
    pub fn image(tex_key: impl Into<String>, src: Rectangle, dest: Rectangle, tint: Color) -> Self {
        DrawCmd::Texture {
            tex_key: tex_key.into(),
            src,
            dest,
            origin: Vector2::zero(),
            rotation: 0.0,
            tint,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub screen: ScreenSize,
    /// World point shown at the screen center. `None` draws world commands
    /// with the identity transform.
    pub camera_target: Option<Vector2>,
    pub background: Color,
    pub world: Vec<DrawCmd>,
    pub overlay: Vec<DrawCmd>,
}

impl Frame {
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            screen,
            camera_target: None,
            background: Color::WHITE,
            world: Vec::new(),
            overlay: Vec::new(),
        }
    }

    /// Reset for a new frame, keeping allocations.
    pub fn begin(&mut self, screen: ScreenSize) {
        self.screen = screen;
        self.camera_target = None;
        self.background = Color::WHITE;
        self.world.clear();
        self.overlay.clear();
    }

    /// World rectangle currently visible through the camera.
    pub fn view_rect(&self) -> Rectangle {
        let (w, h) = (self.screen.w as f32, self.screen.h as f32);
        match self.camera_target {
            Some(target) => Rectangle::new(target.x - w / 2.0, target.y - h / 2.0, w, h),
            None => Rectangle::new(0.0, 0.0, w, h),
        }
    }

    /// Every texture key referenced by this frame.
    pub fn texture_keys(&self) -> impl Iterator<Item = &str> {
        self.world.iter().chain(self.overlay.iter()).filter_map(|cmd| match cmd {
            DrawCmd::Texture { tex_key, .. } => Some(tex_key.as_str()),
            _ => None,
        })
    }

    /// Every font key referenced by this frame.
    pub fn font_keys(&self) -> impl Iterator<Item = &str> {
        self.world.iter().chain(self.overlay.iter()).filter_map(|cmd| match cmd {
            DrawCmd::Text { font_key, .. } => Some(font_key.as_str()),
            _ => None,
        })
    }
}
