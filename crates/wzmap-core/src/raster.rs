//! Decoded authoring images and per-pixel classification.
//!
//! Every input image (heightmap, tilemap, cliffmap, gatemap) is decoded into a
//! [`Raster`]: a row-major byte buffer with 1, 3 or 4 channels per pixel.

use std::fmt;
use std::path::Path;

use image::{ColorType, DynamicImage};

use crate::environment::Palette;
use crate::error::MapError;

/// Pixel value above which a channel counts as "marked".
pub const MARK_THRESHOLD: u16 = 16;

/// Channel layout of a decoded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Single greyscale channel.
    Grey,
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Grey => 1,
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColorMode::Grey => "L",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
        };
        f.write_str(s)
    }
}

/// An 8-bit image held fully in memory, row-major.
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub mode: ColorMode,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap an already decoded image. `what` names the input in error messages.
    ///
    /// Only 8-bit greyscale, RGB and RGBA images are accepted; anything else is
    /// a fatal input error.
    pub fn from_image(img: &DynamicImage, what: &'static str) -> Result<Self, MapError> {
        let mode = match img.color() {
            ColorType::L8 => ColorMode::Grey,
            ColorType::Rgb8 => ColorMode::Rgb,
            ColorType::Rgba8 => ColorMode::Rgba,
            other => {
                return Err(MapError::UnsupportedColorMode {
                    what,
                    mode: format!("{other:?}"),
                })
            }
        };
        let width = img.width() as usize;
        let height = img.height() as usize;
        if width < 2 || height < 2 {
            return Err(MapError::TooSmall { width, height });
        }
        Ok(Self {
            width,
            height,
            mode,
            data: img.as_bytes().to_vec(),
        })
    }

    /// Open and decode an image file.
    pub fn open(path: &Path, what: &'static str) -> Result<Self, MapError> {
        let img = image::open(path)?;
        let raster = Self::from_image(&img, what)?;
        log::info!("Reading {what} {} as {}", path.display(), raster.mode);
        Ok(raster)
    }

    /// Channel bytes of the pixel at column `x`, row `y`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let n = self.mode.channels();
        let i = (y * self.width + x) * n;
        &self.data[i..i + n]
    }

    /// Fail unless `other` has the same dimensions as `self`.
    pub fn ensure_same_size(&self, other: &Raster, what: &'static str) -> Result<(), MapError> {
        if self.width != other.width || self.height != other.height {
            return Err(MapError::DimensionMismatch {
                what,
                expected_w: self.width,
                expected_h: self.height,
                found_w: other.width,
                found_h: other.height,
            });
        }
        Ok(())
    }
}

/// Look up the tile index painted at `pixel`. Alpha is ignored; a greyscale
/// value `v` is looked up as `(v, v, v)`.
///
/// Returns `None` for colours missing from the palette. The caller decides the
/// fallback and counts the miss.
pub fn classify_tile(pixel: &[u8], palette: &Palette) -> Option<u16> {
    let rgb = match pixel {
        [v] => [*v, *v, *v],
        [r, g, b, ..] => [*r, *g, *b],
        _ => return None,
    };
    palette.lookup(rgb)
}

/// Whether `pixel` marks a cliff or gate cell.
///
/// RGBA: alpha above the threshold. RGB: channel sum above the threshold
/// ("not black"). Greyscale: the single value above the threshold.
pub fn is_cliff_marked(pixel: &[u8], mode: ColorMode) -> bool {
    match mode {
        ColorMode::Rgba => u16::from(pixel[3]) > MARK_THRESHOLD,
        ColorMode::Rgb => {
            u16::from(pixel[0]) + u16::from(pixel[1]) + u16::from(pixel[2]) > MARK_THRESHOLD
        }
        ColorMode::Grey => u16::from(pixel[0]) > MARK_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use image::{GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

    #[test]
    fn palette_colours_round_trip() {
        for env in [Environment::Rockies, Environment::Arizona, Environment::Urban] {
            let palette = &env.tileset().palette;
            for &(rgb, tile) in palette.entries() {
                assert_eq!(classify_tile(&rgb, palette), Some(tile), "{env:?} {rgb:?}");
                let rgba = [rgb[0], rgb[1], rgb[2], 0];
                assert_eq!(classify_tile(&rgba, palette), Some(tile), "alpha must be ignored");
            }
        }
    }

    #[test]
    fn unknown_colour_is_none() {
        let palette = &Environment::Rockies.tileset().palette;
        assert_eq!(classify_tile(&[1, 2, 3], palette), None);
    }

    #[test]
    fn grey_pixel_classified_as_equal_channels() {
        // Urban concrete is painted as neutral grey.
        let palette = &Environment::Urban.tileset().palette;
        let (rgb, tile) = palette
            .entries()
            .iter()
            .copied()
            .find(|(c, _)| c[0] == c[1] && c[1] == c[2])
            .expect("urban palette has a neutral grey entry");
        assert_eq!(classify_tile(&[rgb[0]], palette), Some(tile));
    }

    #[test]
    fn mark_threshold_alpha() {
        assert!(!is_cliff_marked(&[255, 255, 255, 16], ColorMode::Rgba));
        assert!(is_cliff_marked(&[0, 0, 0, 17], ColorMode::Rgba));
    }

    #[test]
    fn mark_threshold_rgb_sum() {
        assert!(!is_cliff_marked(&[6, 5, 5], ColorMode::Rgb));
        assert!(is_cliff_marked(&[6, 6, 5], ColorMode::Rgb));
        // No overflow on bright pixels.
        assert!(is_cliff_marked(&[255, 255, 255], ColorMode::Rgb));
    }

    #[test]
    fn mark_threshold_grey() {
        assert!(!is_cliff_marked(&[16], ColorMode::Grey));
        assert!(is_cliff_marked(&[17], ColorMode::Grey));
    }

    #[test]
    fn raster_accepts_supported_modes() {
        let grey = DynamicImage::ImageLuma8(GrayImage::new(3, 2));
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(3, 2));
        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(3, 2));
        assert_eq!(Raster::from_image(&grey, "test").unwrap().mode, ColorMode::Grey);
        assert_eq!(Raster::from_image(&rgb, "test").unwrap().mode, ColorMode::Rgb);
        assert_eq!(Raster::from_image(&rgba, "test").unwrap().mode, ColorMode::Rgba);
    }

    #[test]
    fn raster_rejects_grey_alpha() {
        let img = DynamicImage::ImageLumaA8(GrayAlphaImage::new(2, 2));
        let err = Raster::from_image(&img, "heightmap").unwrap_err();
        assert!(matches!(err, MapError::UnsupportedColorMode { what: "heightmap", .. }));
    }

    #[test]
    fn raster_rejects_single_pixel_rows() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 1));
        assert!(matches!(
            Raster::from_image(&img, "tilemap"),
            Err(MapError::TooSmall { width: 4, height: 1 })
        ));
    }

    #[test]
    fn pixel_reads_row_major() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgb([9, 8, 7]));
        let raster = Raster::from_image(&DynamicImage::ImageRgb8(img), "test").unwrap();
        assert_eq!(raster.pixel(2, 1), &[9, 8, 7]);
        assert_eq!(raster.pixel(0, 0), &[0, 0, 0]);
    }
}
