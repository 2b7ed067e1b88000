use std::env;

use engine::{load_level, resolve_app_paths, LevelDef, LoopConfig, TextureSet};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const LEVEL_ENV_VAR: &str = "GLOAM_LEVEL";
const DEFAULT_LEVEL_FILE: &str = "outpost.json";

/// Fallback arena compiled into the binary, used when no level file can be
/// found so the game always has something to run.
const BUILTIN_LEVEL_JSON: &str = r#############"{
    "tile_size": 64.0,
    "grid": [
        "############",
        "#..........#",
        "#..##......#",
        "#..........#",
        "#......##..#",
        "#..........#",
        "#..........#",
        "#...##.....#",
        "#..........#",
        "#......#...#",
        "#..........#",
        "############"
    ],
    "player": { "x": 160.0, "y": 160.0, "heading": 0.0 },
    "sprites": [
        { "x": 600.0, "y": 600.0, "kind": "enemy" },
        { "x": 450.0, "y": 420.0, "kind": "enemy" },
        { "x": 200.0, "y": 600.0, "kind": "medkit" },
        { "x": 600.0, "y": 200.0, "kind": "armor" }
    ]
}"#############;

fn main() {
    init_tracing();
    info!("=== Gloam Startup ===");

    let (level, textures) = load_content();
    let world = match level.build() {
        Ok(world) => world,
        Err(err) => {
            error!(error = %err, "level_invalid");
            std::process::exit(1);
        }
    };

    let config = LoopConfig::default();
    if let Err(err) = engine::run_app(config, world, textures) {
        error!(error = %err, "startup_failed");
        std::process::exit(1);
    }
}

/// Resolves the asset root and loads the level plus textures, degrading to
/// the built-in arena and empty texture slots when assets are unavailable.
fn load_content() -> (LevelDef, TextureSet) {
    match resolve_app_paths() {
        Ok(paths) => {
            let level_path = paths.levels_dir.join(level_file_name());
            let level = match load_level(&level_path) {
                Ok(level) => {
                    info!(path = %level_path.display(), "level_loaded");
                    level
                }
                Err(err) => {
                    warn!(error = %err, "level_load_failed; using built-in arena");
                    builtin_level()
                }
            };
            (level, TextureSet::load_from_dir(&paths.textures_dir))
        }
        Err(err) => {
            warn!(error = %err, "asset_root_unresolved; using built-in arena");
            (builtin_level(), TextureSet::empty())
        }
    }
}

fn level_file_name() -> String {
    env::var(LEVEL_ENV_VAR).unwrap_or_else(|_| DEFAULT_LEVEL_FILE.to_string())
}

fn builtin_level() -> LevelDef {
    LevelDef::from_json(BUILTIN_LEVEL_JSON)
        .unwrap_or_else(|err| panic!("built-in level JSON is malformed: {err}"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{GameStatus, SpriteKind};

    #[test]
    fn builtin_level_parses_and_builds_a_playable_world() {
        let world = builtin_level().build().expect("world");
        assert_eq!(world.status(), GameStatus::Playing);
        assert_eq!(world.sprites().len(), 4);
        assert!(!world
            .map()
            .has_wall_at(world.player().position.x, world.player().position.y));

        let enemies = world
            .sprites()
            .iter()
            .filter(|sprite| matches!(sprite.kind, SpriteKind::Enemy { .. }))
            .count();
        assert_eq!(enemies, 2);
    }

    #[test]
    fn builtin_sprites_spawn_on_open_tiles() {
        let world = builtin_level().build().expect("world");
        for sprite in world.sprites() {
            assert!(
                !world.map().has_wall_at(sprite.position.x, sprite.position.y),
                "sprite at ({}, {}) spawned inside a wall",
                sprite.position.x,
                sprite.position.y
            );
        }
    }

    #[test]
    fn level_file_name_defaults_and_honors_the_env_var() {
        env::remove_var(LEVEL_ENV_VAR);
        assert_eq!(level_file_name(), DEFAULT_LEVEL_FILE);

        env::set_var(LEVEL_ENV_VAR, "crypt.json");
        assert_eq!(level_file_name(), "crypt.json");
        env::remove_var(LEVEL_ENV_VAR);
    }
}
