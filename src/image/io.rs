//! Convenience helpers for reading and writing rasters via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{ImageView, OwnedImage};
use crate::util::{BandMatchError, BandMatchResult};
use image::{DynamicImage, GrayImage, RgbImage};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &GrayImage) -> BandMatchResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &GrayImage) -> BandMatchResult<OwnedImage> {
    OwnedImage::new(
        img.as_raw().clone(),
        img.width() as usize,
        img.height() as usize,
    )
}

/// Converts an RGB image to an owned grayscale image.
pub fn owned_gray_from_rgb(img: &RgbImage) -> BandMatchResult<OwnedImage> {
    owned_from_gray_image(&image::imageops::grayscale(img))
}

fn open<P: AsRef<Path>>(path: P) -> BandMatchResult<DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|err| BandMatchError::ImageIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

/// Loads a raster from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> BandMatchResult<OwnedImage> {
    owned_from_gray_image(&open(path)?.to_luma8())
}

/// Loads a raster from disk as 8-bit RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> BandMatchResult<RgbImage> {
    Ok(open(path)?.to_rgb8())
}

/// Writes an RGB image; the format follows the path extension.
pub fn save_rgb_image<P: AsRef<Path>>(path: P, img: &RgbImage) -> BandMatchResult<()> {
    let path = path.as_ref();
    img.save(path).map_err(|err| BandMatchError::OutputWrite {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}
