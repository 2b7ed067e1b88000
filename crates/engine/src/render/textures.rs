use std::path::Path;

use image::ImageReader;
use tracing::{info, warn};

/// Logical texture slots the renderer draws from.
///
/// Slots are resolved to files once at startup; a missing or unreadable file
/// leaves the slot empty and whatever uses it degrades for that frame (flat
/// wall colors, skipped sprites, no weapon overlay).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Wall,
    EnemyAlive,
    EnemyDead,
    Medkit,
    Armor,
    WeaponIdle,
    WeaponFire,
}

pub const TEXTURE_SLOT_COUNT: usize = 7;

impl TextureSlot {
    pub const ALL: [TextureSlot; TEXTURE_SLOT_COUNT] = [
        TextureSlot::Wall,
        TextureSlot::EnemyAlive,
        TextureSlot::EnemyDead,
        TextureSlot::Medkit,
        TextureSlot::Armor,
        TextureSlot::WeaponIdle,
        TextureSlot::WeaponFire,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TextureSlot::Wall => "wall.png",
            TextureSlot::EnemyAlive => "enemy.png",
            TextureSlot::EnemyDead => "enemy_dead.png",
            TextureSlot::Medkit => "medkit.png",
            TextureSlot::Armor => "armor.png",
            TextureSlot::WeaponIdle => "weapon_idle.png",
            TextureSlot::WeaponFire => "weapon_fire.png",
        }
    }

    const fn index(self) -> usize {
        match self {
            TextureSlot::Wall => 0,
            TextureSlot::EnemyAlive => 1,
            TextureSlot::EnemyDead => 2,
            TextureSlot::Medkit => 3,
            TextureSlot::Armor => 4,
            TextureSlot::WeaponIdle => 5,
            TextureSlot::WeaponFire => 6,
        }
    }
}

/// A decoded RGBA image.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Texture {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || rgba.len() != (width * height * 4) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    /// Uniform single-color texture; handy as a placeholder.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut rgba = vec![0u8; (width.max(1) * height.max(1) * 4) as usize];
        for pixel in rgba.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
        Self {
            width: width.max(1),
            height: height.max(1),
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel fetch with clamped coordinates.
    pub fn sample(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let offset = (y * self.width as usize + x) * 4;
        [
            self.rgba[offset],
            self.rgba[offset + 1],
            self.rgba[offset + 2],
            self.rgba[offset + 3],
        ]
    }
}

/// All texture slots for a running game, each possibly unloaded.
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    slots: [Option<Texture>; TEXTURE_SLOT_COUNT],
}

impl TextureSet {
    /// No textures loaded; everything renders through fallback paths.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads every slot from `dir`, tolerating missing or broken files.
    pub fn load_from_dir(dir: &Path) -> Self {
        let mut set = Self::default();
        let mut loaded = 0usize;
        for slot in TextureSlot::ALL {
            let path = dir.join(slot.file_name());
            match load_texture(&path) {
                Some(texture) => {
                    set.slots[slot.index()] = Some(texture);
                    loaded += 1;
                }
                None => {
                    warn!(slot = ?slot, path = %path.display(), "texture_unavailable");
                }
            }
        }
        info!(loaded, total = TEXTURE_SLOT_COUNT, "textures_loaded");
        set
    }

    pub fn get(&self, slot: TextureSlot) -> Option<&Texture> {
        self.slots[slot.index()].as_ref()
    }

    pub fn insert(&mut self, slot: TextureSlot, texture: Texture) {
        self.slots[slot.index()] = Some(texture);
    }
}

fn load_texture(path: &Path) -> Option<Texture> {
    let reader = ImageReader::open(path).ok()?;
    let decoded = reader.decode().ok()?;
    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    Texture::from_rgba(width, height, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_texture_samples_its_color_everywhere() {
        let texture = Texture::solid(4, 4, [10, 20, 30, 255]);
        assert_eq!(texture.sample(0, 0), [10, 20, 30, 255]);
        assert_eq!(texture.sample(3, 3), [10, 20, 30, 255]);
        // Clamped out-of-range fetch.
        assert_eq!(texture.sample(100, 100), [10, 20, 30, 255]);
    }

    #[test]
    fn from_rgba_rejects_mismatched_buffers() {
        assert!(Texture::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(Texture::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(Texture::from_rgba(0, 2, Vec::new()).is_none());
    }

    #[test]
    fn empty_set_reports_no_textures() {
        let set = TextureSet::empty();
        for slot in TextureSlot::ALL {
            assert!(set.get(slot).is_none());
        }
    }

    #[test]
    fn insert_makes_a_slot_available() {
        let mut set = TextureSet::empty();
        set.insert(TextureSlot::Wall, Texture::solid(2, 2, [255; 4]));
        assert!(set.get(TextureSlot::Wall).is_some());
        assert!(set.get(TextureSlot::EnemyAlive).is_none());
    }

    #[test]
    fn loading_from_a_missing_dir_degrades_to_empty_slots() {
        let set = TextureSet::load_from_dir(Path::new("/definitely/not/here"));
        for slot in TextureSlot::ALL {
            assert!(set.get(slot).is_none());
        }
    }

    #[test]
    fn every_slot_has_a_distinct_file_name() {
        let mut names: Vec<_> = TextureSlot::ALL.iter().map(|s| s.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TEXTURE_SLOT_COUNT);
    }
}
