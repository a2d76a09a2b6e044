use crate::error::MapError;
use crate::raster::Raster;

/// Per-pixel height samples (0-255) read from a heightmap, row-major.
///
/// A tile `(x, y)` spans the four samples `(x, y)` to `(x + 1, y + 1)`, so a
/// `w × h` heightmap describes `(w - 1) × (h - 1)` tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightGrid {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl HeightGrid {
    /// Create a grid filled with the given value.
    pub fn new(width: usize, height: usize, fill: u8) -> Self {
        Self {
            data: vec![fill; width * height],
            width,
            height,
        }
    }

    /// Take the first channel of every pixel (red for colour images).
    pub fn from_raster(raster: &Raster) -> Result<Self, MapError> {
        if raster.width < 2 || raster.height < 2 {
            return Err(MapError::TooSmall {
                width: raster.width,
                height: raster.height,
            });
        }
        let mut data = Vec::with_capacity(raster.width * raster.height);
        for y in 0..raster.height {
            for x in 0..raster.width {
                data.push(raster.pixel(x, y)[0]);
            }
        }
        Ok(Self {
            data,
            width: raster.width,
            height: raster.height,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, h: u8) {
        self.data[y * self.width + x] = h;
    }

    /// Tile grid dimensions described by this heightmap.
    pub fn tile_dims(&self) -> (usize, usize) {
        (self.width - 1, self.height - 1)
    }

    /// Corner heights of tile `(x, y)`, clockwise from the top-left:
    /// `[h(x,y), h(x+1,y), h(x+1,y+1), h(x,y+1)]`.
    ///
    /// Returns `None` on the last row or column, where no block exists.
    pub fn block_at(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x + 1 >= self.width || y + 1 >= self.height {
            return None;
        }
        Some([
            self.get(x, y),
            self.get(x + 1, y),
            self.get(x + 1, y + 1),
            self.get(x, y + 1),
        ])
    }

    pub fn min_height(&self) -> u8 {
        self.data.iter().copied().min().unwrap_or(0)
    }

    pub fn max_height(&self) -> u8 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}
