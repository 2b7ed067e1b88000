use crate::math::{normalize_angle, Vec2};
use crate::sim::map::GridMap;

pub const DEFAULT_FOV: f32 = 60.0 * (std::f32::consts::PI / 180.0);
pub const DEFAULT_NUM_RAYS: usize = 640;

/// Nudge applied when stepping against an axis so the crossing lands inside
/// the previous tile instead of exactly on the shared grid line.
const GRID_LINE_BACKOFF: f32 = 0.0001;

/// One wall intersection.
///
/// `angle` is the sweep angle the caller asked for (not normalized), so a
/// full fan is monotonically increasing. `distance` is perpendicular
/// (fish-eye corrected) and `f32::INFINITY` when the march left the map
/// without hitting anything. `texture_offset` is the fractional hit
/// coordinate along the wall face, in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub angle: f32,
    pub is_vertical: bool,
    pub texture_offset: f32,
}

/// Casts a fan of rays against a [`GridMap`] by marching horizontal and
/// vertical grid-line crossings.
#[derive(Debug, Clone, Copy)]
pub struct Raycaster {
    fov: f32,
    num_rays: usize,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self::new(DEFAULT_FOV, DEFAULT_NUM_RAYS)
    }
}

impl Raycaster {
    /// `fov` is clamped into an open `(0, π)` interval so the projection
    /// term `tan(fov / 2)` stays finite; `num_rays` is at least 1.
    pub fn new(fov: f32, num_rays: usize) -> Self {
        Self {
            fov: fov.clamp(0.01, std::f32::consts::PI - 0.01),
            num_rays: num_rays.max(1),
        }
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn num_rays(&self) -> usize {
        self.num_rays
    }

    /// Clears `rays` and fills it with exactly `num_rays` results, sweeping
    /// from `heading - fov/2` to `heading + fov/2` in equal steps.
    pub fn cast_all_rays(
        &self,
        map: &GridMap,
        origin: Vec2,
        heading: f32,
        rays: &mut Vec<RayHit>,
    ) {
        rays.clear();
        rays.reserve(self.num_rays);
        let delta_angle = self.fov / self.num_rays as f32;
        let mut ray_angle = heading - self.fov / 2.0;
        for _ in 0..self.num_rays {
            rays.push(self.cast_ray(map, origin, heading, ray_angle));
            ray_angle += delta_angle;
        }
    }

    /// Casts a single ray and returns the nearest wall intersection.
    ///
    /// The march checks the wall before stepping and breaks once a step
    /// leaves map bounds, so a ray into open space either ends at the
    /// world-bounding edge reported by `has_wall_at` or runs out with
    /// infinite depth.
    pub fn cast_ray(&self, map: &GridMap, origin: Vec2, heading: f32, angle: f32) -> RayHit {
        let ray_angle = normalize_angle(angle);
        let tile = map.tile_size();

        let sin_a = ray_angle.sin();
        let cos_a = ray_angle.cos();
        let tan_a = guarded_tan(ray_angle);

        // Horizontal grid-line crossings.
        let (mut x_hor, mut y_hor, dx_hor, dy_hor) = if sin_a > 0.0 {
            // Ray points toward +y: first crossing is the line below.
            let y = (origin.y / tile).floor() * tile + tile;
            let dy = tile;
            (origin.x + (y - origin.y) / tan_a, y, dy / tan_a, dy)
        } else {
            let y = (origin.y / tile).floor() * tile - GRID_LINE_BACKOFF;
            let dy = -tile;
            (origin.x + (y - origin.y) / tan_a, y, dy / tan_a, dy)
        };
        let mut depth_hor = f32::INFINITY;
        let mut hit_hor = Vec2::default();
        loop {
            if map.has_wall_at(x_hor, y_hor) {
                depth_hor = origin.distance_to(Vec2::new(x_hor, y_hor));
                hit_hor = Vec2::new(x_hor, y_hor);
                break;
            }
            x_hor += dx_hor;
            y_hor += dy_hor;
            if !map.in_bounds(x_hor, y_hor) {
                break;
            }
        }

        // Vertical grid-line crossings.
        let (mut x_vert, mut y_vert, dx_vert, dy_vert) = if cos_a > 0.0 {
            let x = (origin.x / tile).floor() * tile + tile;
            let dx = tile;
            (x, origin.y + (x - origin.x) * tan_a, dx, dx * tan_a)
        } else {
            let x = (origin.x / tile).floor() * tile - GRID_LINE_BACKOFF;
            let dx = -tile;
            (x, origin.y + (x - origin.x) * tan_a, dx, dx * tan_a)
        };
        let mut depth_vert = f32::INFINITY;
        let mut hit_vert = Vec2::default();
        loop {
            if map.has_wall_at(x_vert, y_vert) {
                depth_vert = origin.distance_to(Vec2::new(x_vert, y_vert));
                hit_vert = Vec2::new(x_vert, y_vert);
                break;
            }
            x_vert += dx_vert;
            y_vert += dy_vert;
            if !map.in_bounds(x_vert, y_vert) {
                break;
            }
        }

        // Ties break toward the vertical march; the choice picks the texture
        // source and shading, so it has to be consistent.
        let (mut depth, is_vertical, hit) = if depth_vert <= depth_hor {
            (depth_vert, true, hit_vert)
        } else {
            (depth_hor, false, hit_hor)
        };

        // Project radial depth onto the camera's forward axis so wall height
        // tracks perpendicular distance (fish-eye correction).
        depth *= (heading - angle).cos();

        let texture_offset = if is_vertical {
            (hit.y / tile).rem_euclid(1.0)
        } else {
            (hit.x / tile).rem_euclid(1.0)
        };

        RayHit {
            distance: depth,
            angle,
            is_vertical,
            texture_offset,
        }
    }
}

/// `tan` with exact zeros replaced by the smallest positive float.
///
/// An axis-parallel ray has `tan == 0`, and the horizontal march divides by
/// it. The substitute keeps the division well-defined while pushing the
/// first crossing so far out of bounds that the march terminates immediately
/// with an effectively infinite depth, never a NaN.
fn guarded_tan(angle: f32) -> f32 {
    let tan = angle.tan();
    if tan == 0.0 {
        f32::MIN_POSITIVE.copysign(tan)
    } else {
        tan
    }
}
