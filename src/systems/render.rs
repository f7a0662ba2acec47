use bevy_ecs::prelude::*;
use raylib::core::text::measure_text_ex;
use raylib::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::sprite::Sprite;
use crate::components::zindex::ZIndex;
use crate::frame::{DrawCmd, Frame, TextAlign};
use crate::resources::fontstore::FontStore;
use crate::resources::texturestore::TextureStore;

/// Spacing between glyphs for every text command.
const TEXT_SPACING: f32 = 1.0;

/// Queue every visible sprite into `frame.world`, in ZIndex order.
///
/// The camera target must already be set: culling uses the frame's view
/// rectangle. Rotated sprites are culled by their bounding circle.
pub fn draw_entities(world: &mut World, frame: &mut Frame) {
    let view = frame.view_rect();
    let view_min = Vector2::new(view.x, view.y);
    let view_max = Vector2::new(view.x + view.width, view.y + view.height);

    let mut to_draw: Vec<(Sprite, MapPosition, f32, ZIndex)> = {
        let mut q = world.query::<(&Sprite, &MapPosition, Option<&Rotation>, &ZIndex)>();
        q.iter(world)
            .filter_map(|(s, p, r, z)| {
                let degrees = r.map_or(0.0, |r| r.degrees);
                let (min, max) = if degrees == 0.0 {
                    let min = p.pos - s.origin;
                    (min, min + Vector2::new(s.width, s.height))
                } else {
                    let radius = (s.width * s.width + s.height * s.height).sqrt() / 2.0;
                    let extent = Vector2::new(radius, radius);
                    (p.pos - extent, p.pos + extent)
                };
                let overlap = !(max.x < view_min.x
                    || min.x > view_max.x
                    || max.y < view_min.y
                    || min.y > view_max.y);
                overlap.then(|| (s.clone(), *p, degrees, *z))
            })
            .collect()
    };

    to_draw.sort_by_key(|(_, _, _, z)| *z);

    for (sprite, pos, degrees, _z) in to_draw {
        // MapPosition is the pivot; the origin shifts the quad around it
        let dest = Rectangle {
            x: pos.pos.x,
            y: pos.pos.y,
            width: sprite.width,
            height: sprite.height,
        };
        frame.world.push(DrawCmd::Texture {
            src: sprite.source_rect(),
            tex_key: sprite.tex_key,
            dest,
            origin: sprite.origin,
            rotation: degrees,
            tint: Color::WHITE,
        });
    }
}

fn draw_cmds<D: RaylibDraw>(
    d: &mut D,
    cmds: &[DrawCmd],
    textures: &TextureStore,
    fonts: &FontStore,
    default_font: &WeakFont,
) {
    for cmd in cmds {
        match cmd {
            DrawCmd::Texture {
                tex_key,
                src,
                dest,
                origin,
                rotation,
                tint,
            } => {
                if let Some(tex) = textures.get(tex_key) {
                    d.draw_texture_pro(tex, *src, *dest, *origin, *rotation, *tint);
                }
            }
            DrawCmd::Rect { rect, color } => d.draw_rectangle_rec(*rect, *color),
            DrawCmd::Text {
                font_key,
                text,
                position,
                size,
                color,
                align,
            } => match fonts.get(font_key) {
                Some(font) => draw_text(d, font, text, *position, *size, *color, *align),
                None => draw_text(d, default_font, text, *position, *size, *color, *align),
            },
        }
    }
}

fn draw_text<D: RaylibDraw, F: AsRef<raylib::ffi::Font>>(
    d: &mut D,
    font: &F,
    text: &str,
    position: Vector2,
    size: f32,
    color: Color,
    align: TextAlign,
) {
    let mut at = position;
    if align == TextAlign::Right {
        at.x -= measure_text_ex(font, text, size, TEXT_SPACING).x;
    }
    d.draw_text_ex(font, text, at, size, TEXT_SPACING, color);
}

/// Execute a frame: world commands through a camera centered on the target,
/// then the overlay in screen space.
pub fn present(
    d: &mut RaylibDrawHandle,
    frame: &Frame,
    textures: &TextureStore,
    fonts: &FontStore,
    default_font: &WeakFont,
) {
    d.clear_background(Color::WHITE);
    let view = frame.view_rect();
    match frame.camera_target {
        Some(target) => {
            let camera = Camera2D {
                offset: Vector2::new(frame.screen.w as f32 / 2.0, frame.screen.h as f32 / 2.0),
                target,
                rotation: 0.0,
                zoom: 1.0,
            };
            let mut d2 = d.begin_mode2D(camera);
            d2.draw_rectangle_rec(view, frame.background);
            draw_cmds(&mut d2, &frame.world, textures, fonts, default_font);
        }
        None => {
            d.draw_rectangle_rec(view, frame.background);
            draw_cmds(d, &frame.world, textures, fonts, default_font);
        }
    }
    draw_cmds(d, &frame.overlay, textures, fonts, default_font);
}
