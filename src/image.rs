//! Bitmaps and the image codec interface.
//!
//! A [`Bitmap`] holds one or more frames of ARGB pixels; multi-frame bitmaps
//! carry a delay per frame and an active frame that animation advances.
//! Decoding and encoding go through the [`ImageCodec`] trait. [`BmpCodec`]
//! reads 24 and 32-bit BMP files and writes 32-bit top-down BMP.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

use crate::color::Color;
use crate::error::{Error, Result};

// ============================================================================
// Bitmap
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Frame {
    pixels: Vec<u32>,
    delay: Duration,
}

/// ARGB raster image with optional animation frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    frames: Vec<Frame>,
    active: usize,
}

impl Bitmap {
    /// Transparent single-frame bitmap.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Color::from_argb(0))
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid(format!(
                "bitmap size {width}x{height} is empty"
            )));
        }
        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            frames: vec![Frame {
                pixels: vec![color.to_argb(); len],
                delay: Duration::ZERO,
            }],
            active: 0,
        })
    }

    /// Single frame from row-major pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Color]) -> Result<Self> {
        let mut bmp = Self::new(width, height)?;
        bmp.check_len(pixels.len())?;
        bmp.frames[0].pixels = pixels.iter().map(|c| c.to_argb()).collect();
        Ok(bmp)
    }

    fn check_len(&self, len: usize) -> Result<()> {
        let expected = self.width as usize * self.height as usize;
        if len != expected {
            return Err(Error::invalid(format!(
                "expected {expected} pixels, got {len}"
            )));
        }
        Ok(())
    }

    /// Append a frame shown for `delay`.
    pub fn add_frame(&mut self, pixels: &[Color], delay: Duration) -> Result<()> {
        self.check_len(pixels.len())?;
        self.frames.push(Frame {
            pixels: pixels.iter().map(|c| c.to_argb()).collect(),
            delay,
        });
        Ok(())
    }

    pub fn set_frame_delay(&mut self, index: usize, delay: Duration) -> Result<()> {
        let count = self.frames.len();
        let frame = self
            .frames
            .get_mut(index)
            .ok_or_else(|| Error::invalid(format!("frame {index} out of {count}")))?;
        frame.delay = delay;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn frame_delay(&self, index: usize) -> Option<Duration> {
        self.frames.get(index).map(|f| f.delay)
    }

    pub fn active_frame(&self) -> usize {
        self.active
    }

    pub fn select_active_frame(&mut self, index: usize) -> Result<()> {
        if index >= self.frames.len() {
            return Err(Error::invalid(format!(
                "frame {index} out of {}",
                self.frames.len()
            )));
        }
        self.active = index;
        Ok(())
    }

    /// Select the next frame, wrapping to the first. Returns the new index.
    pub fn advance_frame(&mut self) -> usize {
        self.active = (self.active + 1) % self.frames.len();
        self.active
    }

    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::invalid(format!(
                "pixel ({x}, {y}) outside {}x{}",
                self.width, self.height
            )));
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Pixel of the active frame.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Color> {
        let i = self.index(x, y)?;
        Ok(Color::from_argb(self.frames[self.active].pixels[i]))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<()> {
        let i = self.index(x, y)?;
        self.frames[self.active].pixels[i] = color.to_argb();
        Ok(())
    }

    /// Pixel at coordinates already known to be in range.
    pub(crate) fn texel(&self, x: u32, y: u32) -> Color {
        let i = y as usize * self.width as usize + x as usize;
        self.frames[self.active]
            .pixels
            .get(i)
            .map_or(Color::TRANSPARENT, |&p| Color::from_argb(p))
    }

    /// Active frame as packed ARGB, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.frames[self.active].pixels
    }
}

// ============================================================================
// Codecs
// ============================================================================

/// Image decoder and encoder.
pub trait ImageCodec {
    fn decode(&self, data: &[u8]) -> Result<Bitmap>;

    /// Write the active frame of `bitmap`.
    fn encode(&self, bitmap: &Bitmap, out: &mut dyn Write) -> Result<()>;

    fn load(&self, path: &Path) -> Result<Bitmap> {
        let mut data = Vec::new();
        File::open(path)?.read_to_end(&mut data)?;
        self.decode(&data)
    }

    fn save(&self, bitmap: &Bitmap, path: &Path) -> Result<()> {
        let mut f = File::create(path)?;
        self.encode(bitmap, &mut f)
    }
}

/// Windows BMP: 24 and 32-bit uncompressed in, 32-bit top-down out.
#[derive(Debug, Clone, Copy, Default)]
pub struct BmpCodec;

/// Largest pixel count accepted from a BMP header.
const MAX_BMP_PIXELS: u64 = 1 << 28;

fn invalid_data(msg: &str) -> Error {
    Error::Io(io::Error::new(io::ErrorKind::InvalidData, msg.to_string()))
}

fn le_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

impl ImageCodec for BmpCodec {
    fn decode(&self, data: &[u8]) -> Result<Bitmap> {
        if data.len() < 54 || &data[0..2] != b"BM" {
            return Err(invalid_data("not a valid BMP file"));
        }

        let pixel_offset = le_u32(data, 10) as usize;
        let w = le_u32(data, 18) as i32;
        let h = le_u32(data, 22) as i32;
        let bpp = u16::from_le_bytes([data[28], data[29]]) as usize;
        let compression = le_u32(data, 30);

        if compression != 0 && !(compression == 3 && bpp == 32) {
            return Err(Error::Unsupported(format!("BMP compression {compression}")));
        }
        if bpp != 24 && bpp != 32 {
            return Err(Error::Unsupported(format!("{bpp}-bit BMP")));
        }

        let width = w.unsigned_abs();
        let height = h.unsigned_abs();
        let top_down = h < 0;
        let bytes_pp = bpp / 8;
        let too_large = || invalid_data("BMP dimensions too large");
        if (width as u64) * (height as u64) > MAX_BMP_PIXELS {
            return Err(too_large());
        }
        let row_stride = (width as usize)
            .checked_mul(bytes_pp)
            .map(|n| n.div_ceil(4) * 4)
            .ok_or_else(too_large)?;
        let data_end = row_stride
            .checked_mul(height as usize)
            .and_then(|n| n.checked_add(pixel_offset))
            .ok_or_else(too_large)?;
        if data_end > data.len() {
            return Err(invalid_data("BMP pixel data truncated"));
        }

        let mut bmp = Bitmap::new(width, height)?;
        let pixels = &mut bmp.frames[0].pixels;
        for y in 0..height as usize {
            let src_y = if top_down { y } else { height as usize - 1 - y };
            let row_offset = pixel_offset + src_y * row_stride;
            for x in 0..width as usize {
                let si = row_offset + x * bytes_pp;
                let a = if bytes_pp == 4 { data[si + 3] } else { 255 };
                pixels[y * width as usize + x] =
                    Color::from_rgba_components(a, data[si + 2], data[si + 1], data[si]).to_argb();
            }
        }
        Ok(bmp)
    }

    fn encode(&self, bitmap: &Bitmap, out: &mut dyn Write) -> Result<()> {
        let w = bitmap.width();
        let h = bitmap.height();
        let row_size = w * 4;
        let image_size = row_size * h;
        let file_size = 14 + 40 + image_size;

        // File header
        out.write_all(b"BM")?;
        out.write_all(&file_size.to_le_bytes())?;
        out.write_all(&[0u8; 4])?;
        out.write_all(&(14u32 + 40).to_le_bytes())?;

        // BITMAPINFOHEADER, negative height for top-down rows
        out.write_all(&40u32.to_le_bytes())?;
        out.write_all(&w.to_le_bytes())?;
        out.write_all(&(-(h as i32)).to_le_bytes())?;
        out.write_all(&1u16.to_le_bytes())?;
        out.write_all(&32u16.to_le_bytes())?;
        out.write_all(&0u32.to_le_bytes())?;
        out.write_all(&image_size.to_le_bytes())?;
        out.write_all(&[0u8; 8])?;
        out.write_all(&0u32.to_le_bytes())?;
        out.write_all(&0u32.to_le_bytes())?;

        let mut row = vec![0u8; row_size as usize];
        for line in bitmap.pixels().chunks(w as usize) {
            for (x, &p) in line.iter().enumerate() {
                let c = Color::from_argb(p);
                row[x * 4] = c.b();
                row[x * 4 + 1] = c.g();
                row[x * 4 + 2] = c.r();
                row[x * 4 + 3] = c.a();
            }
            out.write_all(&row)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
