use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::app::input::{ActionStates, InputAction};
use crate::app::metrics::MetricsAccumulator;
use crate::app::renderer::Renderer;
use crate::render::TextureSet;
use crate::sim::{GameStatus, PlayerStats, TickInput, World};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Gloam".to_string(),
            window_width: 1280,
            window_height: 720,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Runs the windowed game loop until quit or window close.
///
/// Simulation advances on a fixed timestep fed by a frame-time accumulator;
/// rendering happens once per redraw. After the terminal `Dead` status the
/// loop stops requesting simulation ticks and keeps presenting.
pub fn run_app(config: LoopConfig, mut world: World, textures: TextureSet) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let window_for_loop = Arc::clone(&window);
    let mut renderer = Renderer::new(window, textures).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        sprites = world.sprites().len(),
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_applied_title: Option<String> = None;
    let mut game_over_logged = false;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window_for_loop.inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        input_collector.handle_keyboard_input(&event);
                        if input_collector.quit_requested {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        input_collector.handle_mouse_input(button, state);
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                        last_frame_instant = now;

                        let game_over = world.status() == GameStatus::Dead;
                        if game_over {
                            // Terminal state: stop requesting ticks and drop
                            // the backlog so nothing replays later.
                            accumulator = Duration::ZERO;
                        } else {
                            let clamped = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                            accumulator = accumulator.saturating_add(clamped);
                        }

                        let step_plan =
                            plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                        for _ in 0..step_plan.ticks_to_run {
                            let input = input_collector.snapshot_for_tick();
                            let status = world.tick(fixed_dt_seconds, &input);
                            metrics_accumulator.record_tick();
                            if status == GameStatus::Dead {
                                if !game_over_logged {
                                    info!(reason = "player_dead", "simulation_halted");
                                    game_over_logged = true;
                                }
                                break;
                            }
                        }
                        accumulator = step_plan.remaining_accumulator;

                        if step_plan.dropped_backlog > Duration::ZERO {
                            warn!(
                                dropped_backlog_ms =
                                    step_plan.dropped_backlog.as_millis() as u64,
                                max_ticks_per_frame,
                                "sim_clamp_triggered"
                            );
                        }

                        if let Err(error) = renderer.render_world(&world) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                        metrics_accumulator.record_frame(raw_frame_dt);

                        let next_title =
                            hud_title(&config.window_title, world.player_stats(), world.status());
                        if last_applied_title.as_deref() != Some(next_title.as_str()) {
                            window_for_loop.set_title(&next_title);
                            last_applied_title = Some(next_title);
                        }

                        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                            info!(
                                fps = snapshot.fps,
                                tps = snapshot.tps,
                                frame_time_ms = snapshot.frame_time_ms,
                                sprites = world.sprites().len(),
                                "loop_metrics"
                            );
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window_for_loop.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Window-title HUD line, the pull-based stats surface.
fn hud_title(base_title: &str, stats: PlayerStats, status: GameStatus) -> String {
    match status {
        GameStatus::Playing => format!(
            "{base_title} | HP {} | AMMO {} | ARMOR {}",
            stats.health, stats.ammo, stats.armor
        ),
        GameStatus::Dead => format!("{base_title} | YOU DIED"),
    }
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
    fire_is_down: bool,
    fire_pressed_edge: bool,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        match key_event.physical_key {
            PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
                self.action_states.set(InputAction::WalkForward, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
                self.action_states
                    .set(InputAction::WalkBackward, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.action_states.set(InputAction::TurnLeft, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.action_states.set(InputAction::TurnRight, is_pressed);
            }
            PhysicalKey::Code(KeyCode::Space) => {
                self.action_states.set(InputAction::Fire, is_pressed);
                self.handle_fire_state(key_event.state);
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                self.action_states.set(InputAction::Quit, is_pressed);
                if is_pressed {
                    self.quit_requested = true;
                }
            }
            _ => {}
        }
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.handle_fire_state(state);
        }
    }

    /// Fire is edge-triggered: holding the key or button down fires once.
    fn handle_fire_state(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.fire_is_down {
                    self.fire_pressed_edge = true;
                }
                self.fire_is_down = true;
            }
            ElementState::Released => self.fire_is_down = false,
        }
    }

    fn snapshot_for_tick(&mut self) -> TickInput {
        let input = TickInput {
            walk: self.action_states.walk_intent(),
            turn: self.action_states.turn_intent(),
            fire_pressed: self.fire_pressed_edge,
        };
        self.fire_pressed_edge = false;
        input
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;
    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TurnIntent, WalkIntent};

    #[test]
    fn plan_runs_whole_ticks_and_keeps_the_remainder() {
        let fixed_dt = Duration::from_millis(16);
        let plan = plan_sim_steps(Duration::from_millis(40), fixed_dt, 5);
        assert_eq!(plan.ticks_to_run, 2);
        assert_eq!(plan.remaining_accumulator, Duration::from_millis(8));
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_drops_backlog_past_the_tick_cap() {
        let fixed_dt = Duration::from_millis(16);
        let plan = plan_sim_steps(Duration::from_millis(120), fixed_dt, 3);
        assert_eq!(plan.ticks_to_run, 3);
        assert_eq!(plan.remaining_accumulator, Duration::ZERO);
        assert_eq!(plan.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn frame_delta_is_clamped() {
        let max = Duration::from_millis(250);
        assert_eq!(clamp_frame_delta(Duration::from_secs(2), max), max);
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(16), max),
            Duration::from_millis(16)
        );
    }

    #[test]
    fn zero_durations_fall_back() {
        let fallback = Duration::from_secs(1);
        assert_eq!(
            normalize_non_zero_duration(Duration::ZERO, fallback),
            fallback
        );
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(5), fallback),
            Duration::from_millis(5)
        );
    }

    #[test]
    fn fire_edge_lasts_a_single_tick() {
        let mut input = InputCollector::default();
        input.handle_fire_state(ElementState::Pressed);
        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();
        assert!(first.fire_pressed);
        assert!(!second.fire_pressed);
    }

    #[test]
    fn held_fire_does_not_retrigger_without_release() {
        let mut input = InputCollector::default();
        input.handle_fire_state(ElementState::Pressed);
        assert!(input.snapshot_for_tick().fire_pressed);

        input.handle_fire_state(ElementState::Pressed);
        assert!(!input.snapshot_for_tick().fire_pressed);

        input.handle_fire_state(ElementState::Released);
        input.handle_fire_state(ElementState::Pressed);
        assert!(input.snapshot_for_tick().fire_pressed);
    }

    #[test]
    fn mouse_left_click_maps_to_the_fire_edge() {
        let mut input = InputCollector::default();
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        assert!(input.snapshot_for_tick().fire_pressed);
        input.handle_mouse_input(MouseButton::Right, ElementState::Pressed);
        assert!(!input.snapshot_for_tick().fire_pressed);
    }

    #[test]
    fn snapshot_carries_held_intents_every_tick() {
        let mut input = InputCollector::default();
        input.action_states.set(InputAction::WalkForward, true);
        input.action_states.set(InputAction::TurnLeft, true);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();
        for snapshot in [first, second] {
            assert_eq!(snapshot.walk, WalkIntent::Forward);
            assert_eq!(snapshot.turn, TurnIntent::Left);
        }
    }

    #[test]
    fn hud_title_reflects_stats_and_death() {
        let stats = PlayerStats {
            health: 80,
            ammo: 12,
            armor: 25,
        };
        assert_eq!(
            hud_title("Gloam", stats, GameStatus::Playing),
            "Gloam | HP 80 | AMMO 12 | ARMOR 25"
        );
        assert_eq!(
            hud_title("Gloam", stats, GameStatus::Dead),
            "Gloam | YOU DIED"
        );
    }
}
