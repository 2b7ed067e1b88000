use crate::math::Vec2;
use crate::sim::map::GridMap;

pub const PLAYER_WALK_SPEED: f32 = 240.0;
pub const PLAYER_TURN_SPEED: f32 = std::f32::consts::PI;
pub const PLAYER_START_HEALTH: u32 = 100;
pub const PLAYER_MAX_HEALTH: u32 = 100;
pub const PLAYER_START_AMMO: u32 = 50;
pub const PLAYER_MAX_ARMOR: u32 = 100;

/// Fire animation window, in seconds of tick time.
pub const FIRE_ANIMATION_SECONDS: f32 = 0.25;

const BOB_FREQUENCY: f32 = 9.0;
const BOB_AMPLITUDE_PX: f32 = 10.0;
/// Idle decay factor applied once per 60 Hz tick worth of `dt`.
const BOB_IDLE_DECAY: f32 = 0.9;
const REFERENCE_TICK_RATE: f32 = 60.0;

/// Forward/backward walk intent, the `+1 / 0 / -1` flag set by input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkIntent {
    Backward,
    #[default]
    Stop,
    Forward,
}

impl WalkIntent {
    pub fn sign(self) -> f32 {
        match self {
            WalkIntent::Backward => -1.0,
            WalkIntent::Stop => 0.0,
            WalkIntent::Forward => 1.0,
        }
    }
}

/// Left/right turn intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnIntent {
    Left,
    #[default]
    Straight,
    Right,
}

impl TurnIntent {
    pub fn sign(self) -> f32 {
        match self {
            TurnIntent::Left => -1.0,
            TurnIntent::Straight => 0.0,
            TurnIntent::Right => 1.0,
        }
    }
}

/// The camera: position, heading, movement intents, and combat stats.
///
/// Input only ever writes the intent fields; `integrate` is the single
/// writer of position and heading, once per tick.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub heading: f32,
    pub walk_speed: f32,
    pub turn_speed: f32,
    pub walk: WalkIntent,
    pub turn: TurnIntent,
    pub health: u32,
    pub ammo: u32,
    pub armor: u32,
    bob_timer: f32,
    bob_offset: Vec2,
    firing: bool,
    fire_timer: f32,
}

impl Player {
    pub fn new(position: Vec2, heading: f32) -> Self {
        Self {
            position,
            heading,
            walk_speed: PLAYER_WALK_SPEED,
            turn_speed: PLAYER_TURN_SPEED,
            walk: WalkIntent::Stop,
            turn: TurnIntent::Straight,
            health: PLAYER_START_HEALTH,
            ammo: PLAYER_START_AMMO,
            armor: 0,
            bob_timer: 0.0,
            bob_offset: Vec2::default(),
            firing: false,
            fire_timer: 0.0,
        }
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    /// Screen-space weapon sway, in pixels.
    pub fn bob_offset(&self) -> Vec2 {
        self.bob_offset
    }

    /// Advances heading and position by one tick.
    ///
    /// Collision is resolved per axis: the tentative x and y are validated
    /// against the map independently and a blocked axis simply keeps its old
    /// value. That allows sliding along walls; it is not swept collision and
    /// a fast actor can clip a thin diagonal corner.
    pub fn integrate(&mut self, map: &GridMap, dt: f32) {
        self.heading += self.turn.sign() * self.turn_speed * dt;

        let move_step = self.walk.sign() * self.walk_speed * dt;
        if self.walk != WalkIntent::Stop {
            self.bob_timer += BOB_FREQUENCY * dt;
            self.bob_offset.x = self.bob_timer.cos() * BOB_AMPLITUDE_PX;
            self.bob_offset.y = self.bob_timer.sin().abs() * BOB_AMPLITUDE_PX;
        } else {
            let decay = BOB_IDLE_DECAY.powf(dt * REFERENCE_TICK_RATE);
            self.bob_offset.x *= decay;
            self.bob_offset.y *= decay;
            self.bob_timer = 0.0;
        }

        if self.firing {
            self.fire_timer += dt;
            if self.fire_timer > FIRE_ANIMATION_SECONDS {
                self.firing = false;
                self.fire_timer = 0.0;
            }
        }

        let new_x = self.position.x + self.heading.cos() * move_step;
        let new_y = self.position.y + self.heading.sin() * move_step;
        if !map.has_wall_at(new_x, self.position.y) {
            self.position.x = new_x;
        }
        if !map.has_wall_at(self.position.x, new_y) {
            self.position.y = new_y;
        }
    }

    /// Marks the start of a shot. Returns false (and changes nothing) when
    /// out of ammo or mid fire animation.
    pub(crate) fn start_firing(&mut self) -> bool {
        if self.firing || self.ammo == 0 {
            return false;
        }
        self.firing = true;
        self.fire_timer = 0.0;
        self.ammo -= 1;
        true
    }

    pub(crate) fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub(crate) fn heal(&mut self, amount: u32) {
        self.health = (self.health + amount).min(PLAYER_MAX_HEALTH);
    }

    pub(crate) fn add_armor(&mut self, amount: u32) {
        self.armor = (self.armor + amount).min(PLAYER_MAX_ARMOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    /// 6x6 ring of walls around an open interior, tile size 64.
    fn ring_map() -> GridMap {
        let mut walls = vec![false; 36];
        for col in 0..6usize {
            for row in 0..6usize {
                if col == 0 || row == 0 || col == 5 || row == 5 {
                    walls[row * 6 + col] = true;
                }
            }
        }
        GridMap::new(6, 6, 64.0, walls).expect("map")
    }

    #[test]
    fn turning_advances_heading_by_speed_times_dt() {
        let map = ring_map();
        let mut player = Player::new(Vec2::new(192.0, 192.0), 0.0);
        player.turn = TurnIntent::Right;
        player.integrate(&map, DT);
        assert!((player.heading - PLAYER_TURN_SPEED * DT).abs() < 0.0001);

        player.turn = TurnIntent::Left;
        player.integrate(&map, DT);
        player.integrate(&map, DT);
        assert!((player.heading - -(PLAYER_TURN_SPEED * DT)).abs() < 0.0001);
    }

    #[test]
    fn walking_moves_along_heading() {
        let map = ring_map();
        let mut player = Player::new(Vec2::new(192.0, 192.0), 0.0);
        player.walk = WalkIntent::Forward;
        player.integrate(&map, DT);
        assert!((player.position.x - (192.0 + PLAYER_WALK_SPEED * DT)).abs() < 0.001);
        assert!((player.position.y - 192.0).abs() < 0.001);
    }

    #[test]
    fn blocked_diagonal_still_slides_along_open_axis() {
        let map = ring_map();
        // Hug the east wall (wall tiles start at x = 320), aim up-right.
        let mut player = Player::new(Vec2::new(318.0, 192.0), -0.6);
        player.walk = WalkIntent::Forward;
        let before = player.position;
        player.integrate(&map, DT);

        // x is blocked by the wall, y keeps moving: sliding, not a full stop.
        assert_eq!(player.position.x, before.x);
        assert!(player.position.y < before.y);
    }

    #[test]
    fn walking_into_a_wall_never_tunnels() {
        let map = ring_map();
        let mut player = Player::new(Vec2::new(300.0, 192.0), 0.0);
        player.walk = WalkIntent::Forward;
        for _ in 0..120 {
            player.integrate(&map, DT);
        }
        // Wall tile face is at x = 320; the player stays on the open side.
        assert!(player.position.x < 320.0);
        assert!(!map.has_wall_at(player.position.x, player.position.y));
    }

    #[test]
    fn bob_builds_while_walking_and_decays_at_rest() {
        let map = ring_map();
        let mut player = Player::new(Vec2::new(192.0, 192.0), 0.0);
        player.walk = WalkIntent::Forward;
        player.integrate(&map, DT);
        let walking_bob = player.bob_offset();
        assert!(walking_bob.x.abs() > 0.0 || walking_bob.y.abs() > 0.0);

        player.walk = WalkIntent::Stop;
        player.integrate(&map, DT);
        let resting_bob = player.bob_offset();
        assert!(resting_bob.x.abs() <= walking_bob.x.abs());
        assert!(resting_bob.y.abs() <= walking_bob.y.abs());
    }

    #[test]
    fn firing_spends_ammo_and_runs_the_animation_window() {
        let map = ring_map();
        let mut player = Player::new(Vec2::new(192.0, 192.0), 0.0);
        assert!(player.start_firing());
        assert_eq!(player.ammo, PLAYER_START_AMMO - 1);
        assert!(player.is_firing());

        // A second trigger pull during the animation is rejected.
        assert!(!player.start_firing());
        assert_eq!(player.ammo, PLAYER_START_AMMO - 1);

        let ticks = (FIRE_ANIMATION_SECONDS / DT).ceil() as u32 + 1;
        for _ in 0..ticks {
            player.integrate(&map, DT);
        }
        assert!(!player.is_firing());
    }

    #[test]
    fn firing_with_zero_ammo_is_a_noop() {
        let mut player = Player::new(Vec2::new(192.0, 192.0), 0.0);
        player.ammo = 0;
        assert!(!player.start_firing());
        assert_eq!(player.ammo, 0);
        assert!(!player.is_firing());
    }

    #[test]
    fn health_and_armor_respect_floors_and_caps() {
        let mut player = Player::new(Vec2::new(0.0, 0.0), 0.0);
        player.take_damage(30);
        assert_eq!(player.health, 70);
        player.take_damage(1000);
        assert_eq!(player.health, 0);

        player.heal(25);
        assert_eq!(player.health, 25);
        player.heal(1000);
        assert_eq!(player.health, PLAYER_MAX_HEALTH);

        player.add_armor(25);
        assert_eq!(player.armor, 25);
        player.add_armor(1000);
        assert_eq!(player.armor, PLAYER_MAX_ARMOR);
    }
}
