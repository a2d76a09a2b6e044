use image::{Rgba, RgbaImage};

use crate::raster::{is_cliff_marked, Raster};

/// A 2D boolean grid, row-major. Built from a cliffmap or gatemap raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pub data: Vec<bool>,
    pub width: usize,
    pub height: usize,
}

impl Mask {
    /// Create an unmarked mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![false; width * height],
            width,
            height,
        }
    }

    /// Threshold every pixel of `raster` with [`is_cliff_marked`].
    pub fn from_raster(raster: &Raster) -> Self {
        let mut mask = Self::new(raster.width, raster.height);
        for y in 0..raster.height {
            for x in 0..raster.width {
                mask.set(x, y, is_cliff_marked(raster.pixel(x, y), raster.mode));
            }
        }
        mask
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, marked: bool) {
        self.data[y * self.width + x] = marked;
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&m| m).count()
    }

    /// Render as a cliffmap image: marked pixels opaque red, the rest fully
    /// transparent.
    pub fn to_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width as u32, self.height as u32);
        for y in 0..self.height {
            for x in 0..self.width {
                let px = if self.get(x, y) {
                    Rgba([255, 64, 64, 255])
                } else {
                    Rgba([0, 0, 0, 0])
                };
                img.put_pixel(x as u32, y as u32, px);
            }
        }
        img
    }
}
