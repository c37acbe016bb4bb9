//! Packed monochrome bitmaps
//!
//! Frames are stored exactly as the display controller expects them:
//! page-addressed, one byte per 8 vertically stacked pixels (LSB is the
//! top row of the page), columns left to right within a page, pages top
//! to bottom. A frame can therefore be sent to the controller verbatim.
//!
//! Every constructor and mutating call is bounds-checked; dimensions are
//! validated once at construction.

use core::fmt;

use heapless::Vec;

/// Largest frame a bitmap can hold (128x64 pixels)
pub const MAX_FRAME_BYTES: usize = 1024;

/// Pixel rows per controller page
pub const PAGE_HEIGHT: u16 = 8;

/// Bitmap errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitmapError {
    /// Byte sequence length does not match the bitmap size
    SizeMismatch {
        /// Bytes required (width * height / 8)
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
    /// Pixel coordinate outside `[0, width) x [0, height)`
    OutOfBounds { x: u16, y: u16 },
    /// Zero size, height not a multiple of 8, or larger than `MAX_FRAME_BYTES`
    InvalidDimensions,
}

/// Packed 1-bit-per-pixel raster in controller page layout
#[derive(Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    width: u16,
    height: u16,
    data: Vec<u8, MAX_FRAME_BYTES>,
}

impl PackedBitmap {
    /// Number of bytes a `width` x `height` frame occupies
    pub const fn byte_len(width: u16, height: u16) -> usize {
        (width as usize * height as usize) / 8
    }

    fn check_dimensions(width: u16, height: u16) -> Result<usize, BitmapError> {
        if width == 0 || height == 0 || height % PAGE_HEIGHT != 0 {
            return Err(BitmapError::InvalidDimensions);
        }
        let len = Self::byte_len(width, height);
        if len > MAX_FRAME_BYTES {
            return Err(BitmapError::InvalidDimensions);
        }
        Ok(len)
    }

    /// Create a blank (all pixels off) bitmap
    pub fn new(width: u16, height: u16) -> Result<Self, BitmapError> {
        let len = Self::check_dimensions(width, height)?;
        let mut data = Vec::new();
        data.resize(len, 0)
            .map_err(|_| BitmapError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a bitmap from bytes already in page layout
    pub fn from_bytes(width: u16, height: u16, bytes: &[u8]) -> Result<Self, BitmapError> {
        let mut bitmap = Self::new(width, height)?;
        bitmap.copy_from(bytes)?;
        Ok(bitmap)
    }

    /// Create a bitmap from a horizontal, row-major raster
    ///
    /// Each row occupies `ceil(width / 8)` bytes; bit 0 of a byte is the
    /// leftmost of its 8 pixels. This is the layout image converters emit
    /// for "mono" bitmaps, so assets can be shipped as exported.
    pub fn from_hmsb(width: u16, height: u16, bytes: &[u8]) -> Result<Self, BitmapError> {
        let mut bitmap = Self::new(width, height)?;
        let stride = (width as usize + 7) / 8;
        let expected = stride * height as usize;
        if bytes.len() != expected {
            return Err(BitmapError::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        for (y, row) in (0..height).zip(bytes.chunks_exact(stride)) {
            for x in 0..width {
                if (row[x as usize / 8] >> (x % 8)) & 1 != 0 {
                    let (idx, mask) = bitmap.locate(x, y);
                    bitmap.data[idx] |= mask;
                }
            }
        }

        Ok(bitmap)
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of controller pages (height / 8)
    pub fn pages(&self) -> u16 {
        self.height / PAGE_HEIGHT
    }

    /// Packed frame bytes in page layout
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of one page, `width` long
    pub fn page(&self, page: u16) -> Option<&[u8]> {
        let width = self.width as usize;
        let start = page as usize * width;
        self.data.get(start..start + width)
    }

    /// Overwrite the whole bitmap with `bytes`
    ///
    /// Fails without modifying anything if the length is wrong.
    pub fn copy_from(&mut self, bytes: &[u8]) -> Result<(), BitmapError> {
        if bytes.len() != self.data.len() {
            return Err(BitmapError::SizeMismatch {
                expected: self.data.len(),
                actual: bytes.len(),
            });
        }
        self.data.copy_from_slice(bytes);
        Ok(())
    }

    /// Set every pixel on or off
    pub fn fill(&mut self, on: bool) {
        let value = if on { 0xFF } else { 0x00 };
        self.data.fill(value);
    }

    /// Read one pixel
    pub fn pixel(&self, x: u16, y: u16) -> Result<bool, BitmapError> {
        let (idx, mask) = self.index(x, y)?;
        Ok(self.data[idx] & mask != 0)
    }

    /// Set or clear one pixel
    pub fn set_pixel(&mut self, x: u16, y: u16, on: bool) -> Result<(), BitmapError> {
        let (idx, mask) = self.index(x, y)?;
        if on {
            self.data[idx] |= mask;
        } else {
            self.data[idx] &= !mask;
        }
        Ok(())
    }

    fn index(&self, x: u16, y: u16) -> Result<(usize, u8), BitmapError> {
        if x >= self.width || y >= self.height {
            return Err(BitmapError::OutOfBounds { x, y });
        }
        Ok(self.locate(x, y))
    }

    /// Byte index and bit mask of an in-range pixel
    fn locate(&self, x: u16, y: u16) -> (usize, u8) {
        let idx = (y / PAGE_HEIGHT) as usize * self.width as usize + x as usize;
        (idx, 1 << (y % PAGE_HEIGHT))
    }

    /// Left/right mirror image
    pub fn mirror_horizontal(&self) -> Self {
        let mut mirrored = self.clone();
        for page in mirrored.data.chunks_exact_mut(self.width as usize) {
            page.reverse();
        }
        mirrored
    }

    /// Every pixel toggled
    pub fn invert(&self) -> Self {
        let mut inverted = self.clone();
        for byte in inverted.data.iter_mut() {
            *byte ^= 0xFF;
        }
        inverted
    }

    /// Image turned upside down (pixel (x, y) moves to (w-1-x, h-1-y))
    pub fn rotate_180(&self) -> Self {
        let mut rotated = self.clone();
        // Page p, column x lands on page P-1-p, column W-1-x: the whole
        // byte order reverses and so does the bit order inside each byte.
        for (dst, src) in rotated.data.iter_mut().zip(self.data.iter().rev()) {
            *dst = src.reverse_bits();
        }
        rotated
    }
}

impl fmt::Debug for PackedBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PackedBitmap {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PackedBitmap[{}x{}]", self.width, self.height);
    }
}
