//! Square RGBA raster of raw file bytes

use std::path::Path;

use crate::error::{Result, WavescopeError};

pub const BYTES_PER_PIXEL: usize = 4;

/// Raw bytes laid out as RGBA pixels, row by row, in a square grid large
/// enough to hold every payload byte. Not encoded in any image format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    side: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// Paint `raw[payload_offset..]`, zero-filling past the end of the data.
    pub fn from_bytes(raw: &[u8], payload_offset: usize) -> Self {
        let payload = raw.get(payload_offset..).unwrap_or(&[]);
        let side = side_for(payload.len());

        let mut pixels = vec![0u8; side * side * BYTES_PER_PIXEL];
        pixels[..payload.len()].copy_from_slice(payload);

        log::debug!("Rasterized {} bytes into {}x{} pixels", payload.len(), side, side);
        Self { side, pixels }
    }

    pub fn width(&self) -> usize {
        self.side
    }

    pub fn height(&self) -> usize {
        self.side
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.side {
            return None;
        }
        let stride = self.side * BYTES_PER_PIXEL;
        Some(&self.pixels[y * stride..(y + 1) * stride])
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.side {
            return None;
        }
        let row = self.row(y)?;
        let p = &row[x * BYTES_PER_PIXEL..(x + 1) * BYTES_PER_PIXEL];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Dump the unencoded RGBA bytes.
    pub fn write_raw<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| WavescopeError::io(format!("Cannot create output directory: {}", e)))?;
            }
        }

        std::fs::write(path, &self.pixels)
            .map_err(|e| WavescopeError::io(format!("Cannot write raster {}: {}", path.display(), e)))
    }
}

/// Smallest square side whose pixels hold `len` bytes.
fn side_for(len: usize) -> usize {
    let pixel_count = len.div_ceil(BYTES_PER_PIXEL);
    let mut side = (pixel_count as f64).sqrt() as usize;
    // float sqrt can land one off either way for large counts
    while side * side > pixel_count {
        side -= 1;
    }
    while side * side < pixel_count {
        side += 1;
    }
    side
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_side_for() {
        assert_eq!(side_for(0), 0);
        assert_eq!(side_for(1), 1);
        assert_eq!(side_for(4), 1);
        assert_eq!(side_for(5), 2);
        assert_eq!(side_for(16), 2);
        assert_eq!(side_for(17), 3);
        assert_eq!(side_for(4 * 10_000), 100);
        assert_eq!(side_for(4 * 10_000 + 1), 101);
    }

    #[test]
    fn test_raster_skips_header_and_zero_fills() {
        let mut raw = vec![0xeeu8; 44];
        raw.extend(1..=6u8);
        let raster = Raster::from_bytes(&raw, 44);

        assert_eq!(raster.width(), 2);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.pixels().len(), 16);
        assert_eq!(raster.pixel(0, 0), Some([1, 2, 3, 4]));
        assert_eq!(raster.pixel(1, 0), Some([5, 6, 0, 0]));
        assert_eq!(raster.row(1), Some(&[0u8; 8][..]));
        assert_eq!(raster.pixel(2, 0), None);
        assert_eq!(raster.row(2), None);
    }

    #[test]
    fn test_offset_past_end() {
        let raster = Raster::from_bytes(&[1, 2, 3], 10);
        assert_eq!(raster.width(), 0);
        assert!(raster.pixels().is_empty());
        assert_eq!(raster.pixel(0, 0), None);
    }

    #[test]
    fn test_write_raw() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("out.rgba");

        let raster = Raster::from_bytes(&[9, 8, 7, 6, 5], 0);
        raster.write_raw(&path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, vec![9, 8, 7, 6, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }
}
