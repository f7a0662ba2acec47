//! Screen size in pixels.
//!
//! Read by layout code (HUD, menu screens) and by the presenter to place the
//! camera. Filled from the window every frame in `main`.

/// Current screen size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl ScreenSize {
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}
