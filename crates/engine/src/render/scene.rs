use crate::math::Vec2;
use crate::render::textures::{Texture, TextureSet, TextureSlot};
use crate::sim::{Player, RayHit, Sprite, World};

/// Wall/sprite height is `(tile_size / distance) * PROJECTION_PLANE_SCALE`.
/// Tuned value carried over as-is; do not re-derive.
pub const PROJECTION_PLANE_SCALE: f32 = 277.0;

const CEILING_COLOR: [u8; 4] = [51, 51, 51, 255];
const FLOOR_COLOR: [u8; 4] = [85, 85, 85, 255];
const WALL_FALLBACK_VERTICAL: [u8; 4] = [153, 153, 153, 255];
const WALL_FALLBACK_HORIZONTAL: [u8; 4] = [170, 170, 170, 255];
/// Vertical-face hits draw darker than horizontal ones.
const VERTICAL_SHADE: f32 = 0.7;
/// Texels below this alpha are treated as fully transparent.
const ALPHA_THRESHOLD: u8 = 8;
const WEAPON_DROP_PX: f32 = 20.0;

/// Paints complete frames of a [`World`] into an RGBA byte buffer.
///
/// Owns only scratch space (the ray fan, which doubles as the z-buffer, and
/// the sprite draw order); all inputs are read-only, so any caller that can
/// hand over a `&mut [u8]` can render, including tests.
#[derive(Debug, Default)]
pub struct SceneRenderer {
    rays: Vec<RayHit>,
    sprite_order: Vec<usize>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders one frame. `frame` must hold `width * height` RGBA pixels.
    pub fn render(
        &mut self,
        world: &World,
        textures: &TextureSet,
        frame: &mut [u8],
        width: u32,
        height: u32,
    ) {
        if width == 0 || height == 0 || frame.len() != (width * height * 4) as usize {
            return;
        }

        draw_background(frame, width, height);

        world.cast_rays(&mut self.rays);
        draw_wall_columns(
            frame,
            width,
            height,
            &self.rays,
            world.map().tile_size(),
            textures.get(TextureSlot::Wall),
        );

        sorted_back_to_front(world.sprites(), &mut self.sprite_order);
        draw_sprites(
            frame,
            width,
            height,
            world.player().position,
            world.player().heading,
            world.raycaster().fov(),
            world.map().tile_size(),
            world.sprites(),
            &self.sprite_order,
            textures,
            &self.rays,
        );

        draw_weapon(frame, width, height, world.player(), textures);
    }
}

fn draw_background(frame: &mut [u8], width: u32, height: u32) {
    let split = height / 2;
    for y in 0..height {
        let color = if y < split { CEILING_COLOR } else { FLOOR_COLOR };
        let row_start = (y * width * 4) as usize;
        for pixel in frame[row_start..row_start + (width * 4) as usize].chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }
}

fn draw_wall_columns(
    frame: &mut [u8],
    width: u32,
    height: u32,
    rays: &[RayHit],
    tile_size: f32,
    wall_texture: Option<&Texture>,
) {
    if rays.is_empty() {
        return;
    }
    let column_width = width as f32 / rays.len() as f32;

    for (index, ray) in rays.iter().enumerate() {
        // Infinite distance means the march left the map: void, no wall.
        if !ray.distance.is_finite() || ray.distance <= 0.0 {
            continue;
        }
        let wall_height = (tile_size / ray.distance) * PROJECTION_PLANE_SCALE;
        let top = (height as f32 - wall_height) / 2.0;

        let x_start = (index as f32 * column_width) as i32;
        let x_end = (((index + 1) as f32 * column_width) as i32).max(x_start + 1);

        match wall_texture {
            Some(texture) => {
                let tex_x = (ray.texture_offset * texture.width() as f32) as u32;
                let y_start = top.max(0.0) as i32;
                let y_end = (top + wall_height).min(height as f32) as i32;
                for y in y_start..y_end {
                    let tex_y = (((y as f32 - top) / wall_height) * texture.height() as f32) as u32;
                    let mut color = texture.sample(tex_x, tex_y);
                    if ray.is_vertical {
                        color = shade(color, VERTICAL_SHADE);
                    }
                    for x in x_start..x_end {
                        put_pixel(frame, width, height, x, y, color);
                    }
                }
            }
            None => {
                let color = if ray.is_vertical {
                    WALL_FALLBACK_VERTICAL
                } else {
                    WALL_FALLBACK_HORIZONTAL
                };
                fill_rect(
                    frame,
                    width,
                    height,
                    x_start,
                    top as i32,
                    x_end,
                    (top + wall_height) as i32,
                    color,
                );
            }
        }
    }
}

/// Stable back-to-front order over the sprites' cached distances, so nearer
/// sprites paint over farther ones and equal distances keep insertion order.
fn sorted_back_to_front(sprites: &[Sprite], order: &mut Vec<usize>) {
    order.clear();
    order.extend(0..sprites.len());
    order.sort_by(|&a, &b| {
        sprites[b]
            .distance
            .partial_cmp(&sprites[a].distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[allow(clippy::too_many_arguments)]
fn draw_sprites(
    frame: &mut [u8],
    width: u32,
    height: u32,
    origin: Vec2,
    heading: f32,
    fov: f32,
    tile_size: f32,
    sprites: &[Sprite],
    order: &[usize],
    textures: &TextureSet,
    z_buffer: &[RayHit],
) {
    if z_buffer.is_empty() {
        return;
    }
    let num_rays = z_buffer.len();
    let projection_k = (width as f32 / 2.0) / (fov / 2.0).tan();

    for &index in order {
        let sprite = &sprites[index];
        // Not-yet-loaded texture: skip this sprite for this frame only.
        let Some(texture) = textures.get(sprite.texture_slot()) else {
            continue;
        };

        let relative = Vec2::new(
            sprite.position.x - origin.x,
            sprite.position.y - origin.y,
        )
        .rotated(-heading);
        let depth = relative.x;
        let lateral = relative.y;
        if depth <= 0.0 {
            continue;
        }

        let size = ((tile_size / depth) * PROJECTION_PLANE_SCALE).abs();
        if size < 1.0 {
            continue;
        }
        let screen_x = width as f32 / 2.0 + (lateral / depth) * projection_k;
        let top = (height as f32 - size) / 2.0;
        let left = (screen_x - size / 2.0).floor() as i32;
        let right = (screen_x + size / 2.0).floor() as i32;

        for stripe in left..right {
            if stripe < 0 || stripe >= width as i32 {
                continue;
            }
            let ray_index = ((stripe as usize * num_rays) / width as usize).min(num_rays - 1);
            if depth >= z_buffer[ray_index].distance {
                continue;
            }

            let tex_x =
                (((stripe - left) as f32 / size) * texture.width() as f32) as u32;
            let y_start = top.max(0.0) as i32;
            let y_end = (top + size).min(height as f32) as i32;
            for y in y_start..y_end {
                let tex_y = (((y as f32 - top) / size) * texture.height() as f32) as u32;
                let color = texture.sample(tex_x, tex_y);
                if color[3] < ALPHA_THRESHOLD {
                    continue;
                }
                put_pixel(frame, width, height, stripe, y, color);
            }
        }
    }
}

fn draw_weapon(frame: &mut [u8], width: u32, height: u32, player: &Player, textures: &TextureSet) {
    let slot = if player.is_firing() {
        TextureSlot::WeaponFire
    } else {
        TextureSlot::WeaponIdle
    };
    let Some(texture) = textures.get(slot) else {
        return;
    };

    let bob = player.bob_offset();
    let w = texture.width() as f32;
    let h = texture.height() as f32;
    let left = (width as f32 / 4.0 - w / 4.0 + bob.x) as i32;
    let top = (height as f32 - h + bob.y + WEAPON_DROP_PX) as i32;

    for ty in 0..texture.height() {
        for tx in 0..texture.width() {
            let color = texture.sample(tx, ty);
            if color[3] < ALPHA_THRESHOLD {
                continue;
            }
            put_pixel(frame, width, height, left + tx as i32, top + ty as i32, color);
        }
    }
}

fn shade(color: [u8; 4], factor: f32) -> [u8; 4] {
    [
        (color[0] as f32 * factor) as u8,
        (color[1] as f32 * factor) as u8,
        (color[2] as f32 * factor) as u8,
        color[3],
    ]
}

fn put_pixel(frame: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    let offset = ((y as u32 * width + x as u32) * 4) as usize;
    frame[offset..offset + 4].copy_from_slice(&color);
}

#[allow(clippy::too_many_arguments)]
fn fill_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x_start: i32,
    y_start: i32,
    x_end: i32,
    y_end: i32,
    color: [u8; 4],
) {
    for y in y_start.max(0)..y_end.min(height as i32) {
        for x in x_start.max(0)..x_end.min(width as i32) {
            put_pixel(frame, width, height, x, y, color);
        }
    }
}
