use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod level;
pub mod math;
pub mod render;
pub mod sim;

pub use app::{run_app, AppError, InputAction, LoopConfig, LoopMetricsSnapshot};
pub use level::{
    load_level, LevelDef, LevelError, LevelFileError, LevelParseError, PlayerSpawnDef,
    SpriteSpawnDef, SpriteSpawnKind,
};
pub use math::Vec2;
pub use render::{SceneRenderer, Texture, TextureSet, TextureSlot, PROJECTION_PLANE_SCALE};
pub use sim::{
    GameStatus, GridMap, GridMapError, PickupItem, Player, PlayerStats, RayHit, Raycaster, Sprite,
    SpriteKind, TickInput, TurnIntent, WalkIntent, World,
};

pub const ROOT_ENV_VAR: &str = "GLOAM_ROOT";

/// Resolved asset locations for a running game.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub levels_dir: PathBuf,
    pub textures_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "{env_var} is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and an assets/ directory."
    )]
    InvalidEnvRoot { env_var: &'static str, path: PathBuf },
    #[error(
        "could not detect the project root by walking upward from {start_dir}\n\
Expected a directory containing Cargo.toml and assets/. Set {env_var} explicitly, e.g.\n\
export {env_var}=/path/to/gloam"
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Locates the repository root and derives the asset directories.
///
/// `GLOAM_ROOT` wins when set; otherwise the ancestors of the running
/// executable are searched for the repo marker (Cargo.toml next to assets/).
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let assets = root.join("assets");
    Ok(AppPaths {
        levels_dir: assets.join("levels"),
        textures_dir: assets.join("textures"),
        root,
    })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(Path::new(&value));
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot {
                    env_var: ROOT_ENV_VAR,
                    path: normalized,
                })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && path.join("assets").is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_marker_requires_both_manifest_and_assets() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(!is_repo_marker(dir.path()));

        fs::write(dir.path().join("Cargo.toml"), "[workspace]").expect("write");
        assert!(!is_repo_marker(dir.path()));

        fs::create_dir(dir.path().join("assets")).expect("mkdir");
        assert!(is_repo_marker(dir.path()));
    }

    #[test]
    fn app_paths_derive_from_the_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Cargo.toml"), "[workspace]").expect("write");
        fs::create_dir(dir.path().join("assets")).expect("mkdir");

        env::set_var(ROOT_ENV_VAR, dir.path());
        let paths = resolve_app_paths().expect("paths");
        env::remove_var(ROOT_ENV_VAR);

        assert!(paths.levels_dir.ends_with("assets/levels"));
        assert!(paths.textures_dir.ends_with("assets/textures"));
    }
}
