use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::math::Vec2;
use crate::sim::{
    GridMap, GridMapError, PickupItem, Player, Raycaster, Sprite, World, DEFAULT_NUM_RAYS,
};

const WALL_GLYPH: char = '#';
const OPEN_GLYPH: char = '.';

fn default_tile_size() -> f32 {
    64.0
}

fn default_fov_degrees() -> f32 {
    60.0
}

fn default_num_rays() -> usize {
    DEFAULT_NUM_RAYS
}

/// A level document as authored in `assets/levels/*.json`.
///
/// The grid is a list of equal-length rows of `#` (wall) and `.` (open)
/// glyphs; positions are in continuous world units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelDef {
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    pub grid: Vec<String>,
    pub player: PlayerSpawnDef,
    #[serde(default)]
    pub sprites: Vec<SpriteSpawnDef>,
    #[serde(default = "default_fov_degrees")]
    pub fov_degrees: f32,
    #[serde(default = "default_num_rays")]
    pub num_rays: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerSpawnDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub heading: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpriteSpawnDef {
    pub x: f32,
    pub y: f32,
    pub kind: SpriteSpawnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteSpawnKind {
    Enemy,
    Medkit,
    Armor,
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level grid is empty")]
    EmptyGrid,
    #[error("grid row {row} has {actual} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown tile glyph {glyph:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, glyph: char },
    #[error(transparent)]
    Map(#[from] GridMapError),
    #[error("player spawn ({x}, {y}) is inside a wall")]
    PlayerSpawnBlocked { x: f32, y: f32 },
}

#[derive(Debug, Error)]
#[error("malformed level JSON: {0}")]
pub struct LevelParseError(#[from] serde_path_to_error::Error<serde_json::Error>);

#[derive(Debug, Error)]
pub enum LevelFileError {
    #[error("failed to read level file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse level file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: LevelParseError,
    },
}

impl LevelDef {
    /// Parses a level document, reporting the JSON path of the offending
    /// field on failure.
    pub fn from_json(text: &str) -> Result<Self, LevelParseError> {
        let mut deserializer = serde_json::Deserializer::from_str(text);
        Ok(serde_path_to_error::deserialize(&mut deserializer)?)
    }

    /// Builds the runnable [`World`] this definition describes.
    pub fn build(&self) -> Result<World, LevelError> {
        let map = self.build_map()?;
        let spawn = Vec2::new(self.player.x, self.player.y);
        if map.has_wall_at(spawn.x, spawn.y) {
            return Err(LevelError::PlayerSpawnBlocked {
                x: spawn.x,
                y: spawn.y,
            });
        }
        let player = Player::new(spawn, self.player.heading);

        let sprites = self
            .sprites
            .iter()
            .map(|def| {
                let position = Vec2::new(def.x, def.y);
                match def.kind {
                    SpriteSpawnKind::Enemy => Sprite::enemy(position),
                    SpriteSpawnKind::Medkit => Sprite::pickup(position, PickupItem::Medkit),
                    SpriteSpawnKind::Armor => Sprite::pickup(position, PickupItem::Armor),
                }
            })
            .collect::<Vec<_>>();

        let raycaster = Raycaster::new(self.fov_degrees.to_radians(), self.num_rays);
        info!(
            cols = map.cols(),
            rows = map.rows(),
            sprites = sprites.len(),
            "level_built"
        );
        Ok(World::new(map, player, sprites, raycaster))
    }

    fn build_map(&self) -> Result<GridMap, LevelError> {
        let rows = self.grid.len();
        if rows == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let cols = self.grid[0].chars().count();
        if cols == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let mut walls = Vec::with_capacity(rows * cols);
        for (row_index, row) in self.grid.iter().enumerate() {
            let actual = row.chars().count();
            if actual != cols {
                return Err(LevelError::RaggedRow {
                    row: row_index,
                    expected: cols,
                    actual,
                });
            }
            for (col_index, glyph) in row.chars().enumerate() {
                match glyph {
                    WALL_GLYPH => walls.push(true),
                    OPEN_GLYPH => walls.push(false),
                    other => {
                        return Err(LevelError::UnknownTile {
                            row: row_index,
                            col: col_index,
                            glyph: other,
                        })
                    }
                }
            }
        }

        Ok(GridMap::new(cols as u32, rows as u32, self.tile_size, walls)?)
    }
}

/// Reads and parses a level file.
pub fn load_level(path: &Path) -> Result<LevelDef, LevelFileError> {
    let text = fs::read_to_string(path).map_err(|source| LevelFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    LevelDef::from_json(&text).map_err(|source| LevelFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
