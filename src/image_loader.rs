//! Photo loading
//!
//! Every matched photo is decoded, downscaled and normalized to 8-bit RGB
//! before it reaches the PDF writer. A photo that fails here is skipped.

use crate::matcher::Asset;
use catalog_common::SkipReason;
use image::imageops::FilterType;
use image::ImageReader;

/// Decoded RGB8 pixels ready for embedding
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Turns an asset into embeddable pixels, or says why it cannot
pub trait AssetLoader {
    fn load(&self, asset: &Asset) -> Result<PreparedImage, SkipReason>;
}

/// `image`-backed loader with an upper bound on the longest side
#[derive(Debug, Clone)]
pub struct RgbLoader {
    max_px: u32,
}

impl RgbLoader {
    pub fn new(max_px: u32) -> Self {
        Self { max_px: max_px.max(1) }
    }
}

impl AssetLoader for RgbLoader {
    fn load(&self, asset: &Asset) -> Result<PreparedImage, SkipReason> {
        let image = ImageReader::open(&asset.path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| SkipReason::Unreadable(e.to_string()))?
            .decode()
            .map_err(|e| SkipReason::Unreadable(e.to_string()))?;

        if image.width() == 0 || image.height() == 0 {
            return Err(SkipReason::Invalid("zero-sized image".into()));
        }

        let image = if image.width() > self.max_px || image.height() > self.max_px {
            image.resize(self.max_px, self.max_px, FilterType::Triangle)
        } else {
            image
        };

        let rgb = image.to_rgb8();
        Ok(PreparedImage {
            width: rgb.width(),
            height: rgb.height(),
            rgb: rgb.into_raw(),
        })
    }
}
