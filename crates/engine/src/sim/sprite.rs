use crate::math::Vec2;
use crate::render::TextureSlot;

pub const ENEMY_START_HEALTH: u32 = 100;

/// What a pickup grants when collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupItem {
    Medkit,
    Armor,
}

/// Variant-specific sprite state.
///
/// Enemies die in place and keep rendering with the dead texture; pickups
/// are removed from the set the tick after being collected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    Enemy {
        health: u32,
        dead: bool,
        /// Seconds of tick time until the next melee attack is allowed.
        attack_cooldown: f32,
    },
    Pickup {
        item: PickupItem,
        collected: bool,
    },
}

/// A movable world entity: enemy or pickup.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub position: Vec2,
    pub kind: SpriteKind,
    /// Distance to the camera, recomputed every tick for depth sorting.
    pub distance: f32,
}

impl Sprite {
    pub fn enemy(position: Vec2) -> Self {
        Self {
            position,
            kind: SpriteKind::Enemy {
                health: ENEMY_START_HEALTH,
                dead: false,
                attack_cooldown: 0.0,
            },
            distance: 0.0,
        }
    }

    pub fn pickup(position: Vec2, item: PickupItem) -> Self {
        Self {
            position,
            kind: SpriteKind::Pickup {
                item,
                collected: false,
            },
            distance: 0.0,
        }
    }

    /// True for living enemies, the only valid hit-scan targets.
    pub fn is_live_target(&self) -> bool {
        matches!(
            self.kind,
            SpriteKind::Enemy { dead: false, .. }
        )
    }

    pub fn is_collected(&self) -> bool {
        matches!(self.kind, SpriteKind::Pickup { collected: true, .. })
    }

    /// The texture slot this sprite renders from in its current state.
    pub fn texture_slot(&self) -> TextureSlot {
        match self.kind {
            SpriteKind::Enemy { dead: false, .. } => TextureSlot::EnemyAlive,
            SpriteKind::Enemy { dead: true, .. } => TextureSlot::EnemyDead,
            SpriteKind::Pickup {
                item: PickupItem::Medkit,
                ..
            } => TextureSlot::Medkit,
            SpriteKind::Pickup {
                item: PickupItem::Armor,
                ..
            } => TextureSlot::Armor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_enemy_is_a_live_target() {
        let enemy = Sprite::enemy(Vec2::new(10.0, 10.0));
        assert!(enemy.is_live_target());
        assert_eq!(enemy.texture_slot(), TextureSlot::EnemyAlive);
    }

    #[test]
    fn dead_enemy_stops_being_a_target_but_keeps_a_texture() {
        let mut enemy = Sprite::enemy(Vec2::new(10.0, 10.0));
        enemy.kind = SpriteKind::Enemy {
            health: 0,
            dead: true,
            attack_cooldown: 0.0,
        };
        assert!(!enemy.is_live_target());
        assert_eq!(enemy.texture_slot(), TextureSlot::EnemyDead);
    }

    #[test]
    fn pickups_are_never_hit_scan_targets() {
        let medkit = Sprite::pickup(Vec2::new(5.0, 5.0), PickupItem::Medkit);
        assert!(!medkit.is_live_target());
        assert!(!medkit.is_collected());
        assert_eq!(medkit.texture_slot(), TextureSlot::Medkit);

        let armor = Sprite::pickup(Vec2::new(5.0, 5.0), PickupItem::Armor);
        assert_eq!(armor.texture_slot(), TextureSlot::Armor);
    }
}
