//! Collaborators that resolve later: rasterizing imported files and
//! detecting keywords for smart tape.
use std::path::Path;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::page::{BackgroundImage, PageId};

mod image_rasterizer;
mod keywords;
mod requests;

pub use image_rasterizer::ImageRasterizer;
pub use keywords::{DEMO_KEYWORDS, DemoKeywordDetector};
pub use requests::RequestQueue;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to write rasterized image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported import type: {0}")]
    Unsupported(String),

    #[error("Keyword detection failed: {0}")]
    Detection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Image,
    Pdf,
}

/// A file handed to the rasterizer.
#[derive(Debug, Clone)]
pub struct ImportSource {
    pub kind: ImportKind,
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImportSource {
    /// Classifies by extension; anything not a PDF is treated as an image.
    pub fn from_file_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let is_pdf = Path::new(&name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        Self {
            kind: if is_pdf { ImportKind::Pdf } else { ImportKind::Image },
            name,
            bytes,
        }
    }

    /// PDF imports retitle the page after the document.
    pub fn page_title(&self) -> Option<String> {
        match self.kind {
            ImportKind::Pdf => Path::new(&self.name)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned()),
            ImportKind::Image => None,
        }
    }
}

/// Turns an image or PDF into one displayable bitmap.
pub trait Rasterizer {
    fn rasterize(&self, source: ImportSource) -> BoxFuture<'static, Result<BackgroundImage, ImportError>>;
}

/// Finds candidate terms worth hiding under tape.
pub trait KeywordDetector {
    fn detect(&self, text: String) -> BoxFuture<'static, Result<Vec<String>, ImportError>>;
}

#[derive(Debug)]
pub enum Outcome {
    Background {
        result: Result<BackgroundImage, ImportError>,
        title: Option<String>,
    },
    Keywords(Vec<String>),
}

/// A finished request, tagged with the page it was made for.
#[derive(Debug)]
pub struct Resolution {
    pub page_id: PageId,
    pub sequence: u64,
    pub outcome: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_by_extension() {
        let pdf = ImportSource::from_file_name("Lecture 3.PDF", Vec::new());
        assert_eq!(pdf.kind, ImportKind::Pdf);
        assert_eq!(pdf.page_title().as_deref(), Some("Lecture 3"));

        let png = ImportSource::from_file_name("diagram.png", Vec::new());
        assert_eq!(png.kind, ImportKind::Image);
        assert_eq!(png.page_title(), None);
    }
}
