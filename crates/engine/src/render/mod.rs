mod scene;
mod textures;

pub use scene::{SceneRenderer, PROJECTION_PLANE_SCALE};
pub use textures::{Texture, TextureSet, TextureSlot, TEXTURE_SLOT_COUNT};
