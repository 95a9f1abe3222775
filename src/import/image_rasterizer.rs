use std::path::{Path, PathBuf};

use futures::FutureExt;
use futures::future::BoxFuture;

use super::{ImportError, ImportKind, ImportSource, Rasterizer};
use crate::id_generator::generate_id;
use crate::page::BackgroundImage;

/// Decodes images with the `image` crate and stores them as PNG in a cache
/// directory. The stored path is the page's image reference.
///
/// PDFs are left to an external renderer and rejected here.
#[derive(Debug, Clone)]
pub struct ImageRasterizer {
    cache_dir: PathBuf,
}

impl ImageRasterizer {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }
}

impl Rasterizer for ImageRasterizer {
    fn rasterize(&self, source: ImportSource) -> BoxFuture<'static, Result<BackgroundImage, ImportError>> {
        let cache_dir = self.cache_dir.clone();
        async move { rasterize_to_cache(&cache_dir, &source) }.boxed()
    }
}

fn rasterize_to_cache(cache_dir: &Path, source: &ImportSource) -> Result<BackgroundImage, ImportError> {
    if source.kind == ImportKind::Pdf {
        return Err(ImportError::Unsupported(format!("{} (PDF rendering is not available)", source.name)));
    }

    let image = image::load_from_memory(&source.bytes)?;
    log::debug!("Decoded {}: {}x{}", source.name, image.width(), image.height());

    std::fs::create_dir_all(cache_dir)?;
    let path = cache_dir.join(format!("{}.png", generate_id()));
    image.save_with_format(&path, image::ImageFormat::Png)?;
    log::info!("Rasterized {} to {}", source.name, path.display());

    Ok(BackgroundImage {
        reference: path.display().to_string(),
        width: image.width(),
        height: image.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_rasterizes_png_into_cache() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = ImageRasterizer::new(dir.path());
        let source = ImportSource::from_file_name("scan.png", png_bytes(4, 3));

        let bitmap = futures::executor::block_on(rasterizer.rasterize(source)).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (4, 3));
        assert!(Path::new(&bitmap.reference).exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = ImageRasterizer::new(dir.path());
        let source = ImportSource::from_file_name("broken.png", vec![1, 2, 3]);

        let result = futures::executor::block_on(rasterizer.rasterize(source));
        assert!(matches!(result, Err(ImportError::Decode(_))));
    }

    #[test]
    fn test_pdf_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = ImageRasterizer::new(dir.path());
        let source = ImportSource::from_file_name("notes.pdf", vec![b'%', b'P', b'D', b'F']);

        let result = futures::executor::block_on(rasterizer.rasterize(source));
        assert!(matches!(result, Err(ImportError::Unsupported(_))));
    }
}
