use std::collections::{HashMap, HashSet};

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use thiserror::Error;

use crate::page::BackgroundImage;

/// Errors that can occur while turning a background reference into a texture
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load background image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Background image {0} failed to load earlier")]
    PreviouslyFailed(String),
}

/// Caches GPU textures for page backgrounds, keyed by image reference.
///
/// References that fail to load are remembered so a broken file is not
/// re-read on every frame.
pub struct TextureManager {
    textures: HashMap<String, TextureHandle>,
    failed: HashSet<String>,
    /// Maximum number of textures to keep
    max_cache_size: usize,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("textures", &self.textures.len())
            .field("failed", &self.failed)
            .finish()
    }
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            textures: HashMap::new(),
            failed: HashSet::new(),
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Gets or loads the texture for `image`.
    pub fn get_or_load(&mut self, ctx: &Context, image: &BackgroundImage) -> Result<TextureId, TextureError> {
        if let Some(handle) = self.textures.get(&image.reference) {
            return Ok(handle.id());
        }
        if self.failed.contains(&image.reference) {
            return Err(TextureError::PreviouslyFailed(image.reference.clone()));
        }

        let color_image = match load_color_image(&image.reference) {
            Ok(color_image) => color_image,
            Err(e) => {
                log::warn!("Background {} could not be loaded: {e}", image.reference);
                self.failed.insert(image.reference.clone());
                return Err(e);
            }
        };

        if self.textures.len() >= self.max_cache_size {
            self.textures.clear();
        }
        let handle = ctx.load_texture(&image.reference, color_image, TextureOptions::LINEAR);
        let id = handle.id();
        self.textures.insert(image.reference.clone(), handle);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn load_color_image(reference: &str) -> Result<ColorImage, TextureError> {
    let rgba = image::open(reference)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
