use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::render::{SceneRenderer, TextureSet};
use crate::sim::World;

/// Owns the presentation surface and hands frames to the scene renderer.
pub(crate) struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
    scene: SceneRenderer,
    textures: TextureSet,
}

impl Renderer {
    pub(crate) fn new(window: Arc<Window>, textures: TextureSet) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            width: size.width,
            height: size.height,
            scene: SceneRenderer::new(),
            textures,
        })
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub(crate) fn render_world(&mut self, world: &World) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        self.scene.render(
            world,
            &self.textures,
            self.pixels.frame_mut(),
            self.width,
            self.height,
        );
        self.pixels.render()
    }

    fn build_pixels(window: Arc<Window>, width: u32, height: u32) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }
}
