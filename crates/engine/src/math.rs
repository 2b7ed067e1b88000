use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(self, other: Vec2) -> f32 {
        Vec2 {
            x: other.x - self.x,
            y: other.y - self.y,
        }
        .length()
    }

    /// Rotates counter-clockwise by `angle` radians.
    pub fn rotated(self, angle: f32) -> Vec2 {
        let cos = angle.cos();
        let sin = angle.sin();
        Vec2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

/// Wraps an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle % TAU;
    if wrapped < 0.0 {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Smallest signed difference `a - b`, wrapped into `[-π, π]`.
pub fn angle_difference(a: f32, b: f32) -> f32 {
    let mut diff = a - b;
    while diff < -std::f32::consts::PI {
        diff += TAU;
    }
    while diff > std::f32::consts::PI {
        diff -= TAU;
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn length_of_axis_vectors() {
        assert!((Vec2::new(3.0, 4.0).length() - 5.0).abs() < 0.0001);
        assert_eq!(Vec2::default().length(), 0.0);
    }

    #[test]
    fn rotation_by_quarter_turn_maps_x_to_y() {
        let rotated = Vec2::new(1.0, 0.0).rotated(FRAC_PI_2);
        assert!(rotated.x.abs() < 0.0001);
        assert!((rotated.y - 1.0).abs() < 0.0001);
    }

    #[test]
    fn normalize_angle_wraps_negative_into_range() {
        let normalized = normalize_angle(-FRAC_PI_2);
        assert!((normalized - (TAU - FRAC_PI_2)).abs() < 0.0001);
        assert!(normalize_angle(TAU) < 0.0001);
    }

    #[test]
    fn angle_difference_takes_short_way_around() {
        let diff = angle_difference(0.1, TAU - 0.1);
        assert!((diff - 0.2).abs() < 0.0001);
        let diff = angle_difference(PI - 0.1, -(PI - 0.1));
        assert!((diff - -0.2).abs() < 0.0001);
    }
}
