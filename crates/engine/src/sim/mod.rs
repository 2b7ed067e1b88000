mod map;
mod player;
mod raycast;
mod sprite;

pub use map::{GridMap, GridMapError};
pub use player::{
    Player, TurnIntent, WalkIntent, FIRE_ANIMATION_SECONDS, PLAYER_MAX_ARMOR, PLAYER_MAX_HEALTH,
    PLAYER_START_AMMO, PLAYER_START_HEALTH, PLAYER_TURN_SPEED, PLAYER_WALK_SPEED,
};
pub use raycast::{RayHit, Raycaster, DEFAULT_FOV, DEFAULT_NUM_RAYS};
pub use sprite::{PickupItem, Sprite, SpriteKind, ENEMY_START_HEALTH};

use tracing::{debug, info};

use crate::math::angle_difference;

pub const ENEMY_SPEED: f32 = 100.0;
pub const ENEMY_MIN_CHASE_DISTANCE: f32 = 64.0;
pub const ENEMY_MAX_CHASE_DISTANCE: f32 = 640.0;
pub const ENEMY_ATTACK_RANGE: f32 = 40.0;
pub const ENEMY_ATTACK_DAMAGE: u32 = 10;
pub const ENEMY_ATTACK_COOLDOWN_SECONDS: f32 = 1.0;
pub const PICKUP_RANGE: f32 = 32.0;
pub const MEDKIT_HEAL: u32 = 25;
pub const ARMOR_PICKUP_BONUS: u32 = 25;
pub const HITSCAN_DAMAGE: u32 = 25;
/// Half of the nominal sprite width; the hit-scan angular threshold is
/// `atan(HITSCAN_HALF_WIDTH / distance)`. Tuned value carried over as-is.
pub const HITSCAN_HALF_WIDTH: f32 = 32.0;

/// Intent flags for one tick. Input collaborators set these; the simulation
/// never sees raw device events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub walk: WalkIntent,
    pub turn: TurnIntent,
    pub fire_pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Dead,
}

/// Pull-based stats snapshot for an external HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    pub health: u32,
    pub ammo: u32,
    pub armor: u32,
}

/// The whole simulation: map, player, sprites, and the ray fan caster.
///
/// Everything is advanced by [`World::tick`] from a caller-owned loop; one
/// tick runs fire resolution, player integration, then sprite updates, and
/// nothing outlives a tick boundary.
#[derive(Debug, Clone)]
pub struct World {
    map: GridMap,
    player: Player,
    sprites: Vec<Sprite>,
    raycaster: Raycaster,
    status: GameStatus,
}

impl World {
    pub fn new(map: GridMap, player: Player, sprites: Vec<Sprite>, raycaster: Raycaster) -> Self {
        Self {
            map,
            player,
            sprites,
            raycaster,
            status: GameStatus::Playing,
        }
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn raycaster(&self) -> &Raycaster {
        &self.raycaster
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn player_stats(&self) -> PlayerStats {
        PlayerStats {
            health: self.player.health,
            ammo: self.player.ammo,
            armor: self.player.armor,
        }
    }

    /// Casts the full ray fan from the player's current viewpoint into
    /// `rays`; the result doubles as the frame's z-buffer.
    pub fn cast_rays(&self, rays: &mut Vec<RayHit>) {
        self.raycaster
            .cast_all_rays(&self.map, self.player.position, self.player.heading, rays);
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// After the terminal [`GameStatus::Dead`] transition, ticks become
    /// no-ops that keep reporting the terminal state.
    pub fn tick(&mut self, dt: f32, input: &TickInput) -> GameStatus {
        if self.status == GameStatus::Dead {
            return self.status;
        }

        self.player.walk = input.walk;
        self.player.turn = input.turn;
        if input.fire_pressed {
            self.fire();
        }
        self.player.integrate(&self.map, dt);
        self.update_sprites(dt);
        self.sprites.retain(|sprite| !sprite.is_collected());

        if self.player.health == 0 {
            self.status = GameStatus::Dead;
            info!("game_over");
        }
        self.status
    }

    /// Hit-scan shot: among live enemies within the angular threshold and
    /// not hidden behind a wall, the nearest takes damage.
    fn fire(&mut self) {
        if !self.player.start_firing() {
            return;
        }

        let origin = self.player.position;
        let heading = self.player.heading;
        let mut closest: Option<(usize, f32)> = None;
        for (index, sprite) in self.sprites.iter().enumerate() {
            if !sprite.is_live_target() {
                continue;
            }
            let dx = sprite.position.x - origin.x;
            let dy = sprite.position.y - origin.y;
            let distance = sprite.position.distance_to(origin);
            let bearing = dy.atan2(dx);
            let deviation = angle_difference(bearing, heading);
            let threshold = (HITSCAN_HALF_WIDTH / distance).atan();
            if deviation.abs() >= threshold {
                continue;
            }

            // Within the cone; a nearer wall along the bearing blocks it.
            let wall = self.raycaster.cast_ray(&self.map, origin, heading, bearing);
            if wall.distance <= distance {
                continue;
            }
            match closest {
                Some((_, best)) if best <= distance => {}
                _ => closest = Some((index, distance)),
            }
        }

        let Some((index, distance)) = closest else {
            debug!("shot_missed");
            return;
        };
        if let SpriteKind::Enemy { health, dead, .. } = &mut self.sprites[index].kind {
            *health = health.saturating_sub(HITSCAN_DAMAGE);
            if *health == 0 {
                *dead = true;
            }
            info!(distance, health = *health, dead = *dead, "enemy_hit");
        }
    }

    fn update_sprites(&mut self, dt: f32) {
        let map = &self.map;
        let player = &mut self.player;

        for sprite in &mut self.sprites {
            let dx = player.position.x - sprite.position.x;
            let dy = player.position.y - sprite.position.y;
            let distance = sprite.position.distance_to(player.position);

            match &mut sprite.kind {
                SpriteKind::Enemy {
                    dead,
                    attack_cooldown,
                    ..
                } => {
                    if *dead {
                        sprite.distance = distance;
                        continue;
                    }
                    *attack_cooldown = (*attack_cooldown - dt).max(0.0);

                    if distance > ENEMY_MIN_CHASE_DISTANCE && distance < ENEMY_MAX_CHASE_DISTANCE {
                        let step = ENEMY_SPEED * dt / distance;
                        let new_x = sprite.position.x + dx * step;
                        let new_y = sprite.position.y + dy * step;
                        // Same axis-separated slide rule as the player.
                        if !map.has_wall_at(new_x, sprite.position.y) {
                            sprite.position.x = new_x;
                        }
                        if !map.has_wall_at(sprite.position.x, new_y) {
                            sprite.position.y = new_y;
                        }
                    }

                    if distance < ENEMY_ATTACK_RANGE && *attack_cooldown == 0.0 {
                        player.take_damage(ENEMY_ATTACK_DAMAGE);
                        *attack_cooldown = ENEMY_ATTACK_COOLDOWN_SECONDS;
                        info!(health = player.health, "player_hit");
                    }
                }
                SpriteKind::Pickup { item, collected } => {
                    if !*collected && distance < PICKUP_RANGE {
                        match item {
                            PickupItem::Medkit if player.health < PLAYER_MAX_HEALTH => {
                                player.heal(MEDKIT_HEAL);
                                *collected = true;
                                info!(health = player.health, "medkit_collected");
                            }
                            PickupItem::Armor if player.armor < PLAYER_MAX_ARMOR => {
                                player.add_armor(ARMOR_PICKUP_BONUS);
                                *collected = true;
                                info!(armor = player.armor, "armor_collected");
                            }
                            _ => {}
                        }
                    }
                }
            }

            sprite.distance = sprite.position.distance_to(player.position);
        }
    }
}
