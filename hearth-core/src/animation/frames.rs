//! Frame preparation
//!
//! Turns raw bitmap assets into display-ready frames once at startup, so
//! the animation loop only ever copies finished frames to the display.

use heapless::Vec;

use super::sequence::{SequenceError, MAX_FRAMES};
use crate::bitmap::{BitmapError, PackedBitmap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Byte layout of a raw asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AssetFormat {
    /// Controller page layout, used as-is
    #[default]
    Vlsb,
    /// Horizontal rows, LSB leftmost; converted on load
    Hmsb,
}

/// Prepared frames, in playback storage order
#[derive(Debug, Clone, Default)]
pub struct FrameSet {
    frames: Vec<PackedBitmap, MAX_FRAMES>,
}

impl FrameSet {
    /// Create an empty frame set
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Load one asset
    ///
    /// With `mirror` set, the asset's left/right mirror image is stored
    /// directly after it.
    pub fn push_asset(
        &mut self,
        width: u16,
        height: u16,
        bytes: &[u8],
        format: AssetFormat,
        mirror: bool,
    ) -> Result<(), SequenceError> {
        let needed = if mirror { 2 } else { 1 };
        if self.frames.len() + needed > MAX_FRAMES {
            return Err(SequenceError::TooManyFrames);
        }

        let index = self.frames.len();
        let frame = match format {
            AssetFormat::Vlsb => PackedBitmap::from_bytes(width, height, bytes),
            AssetFormat::Hmsb => PackedBitmap::from_hmsb(width, height, bytes),
        }
        .map_err(|e| match e {
            BitmapError::SizeMismatch { expected, actual } => SequenceError::SizeMismatch {
                index,
                expected,
                actual,
            },
            other => SequenceError::Bitmap(other),
        })?;

        let mirrored = mirror.then(|| frame.mirror_horizontal());
        self.frames
            .push(frame)
            .map_err(|_| SequenceError::TooManyFrames)?;
        if let Some(mirrored) = mirrored {
            self.frames
                .push(mirrored)
                .map_err(|_| SequenceError::TooManyFrames)?;
        }
        Ok(())
    }

    /// Load every asset in order
    pub fn load<'b, I>(
        &mut self,
        width: u16,
        height: u16,
        assets: I,
        format: AssetFormat,
        mirror: bool,
    ) -> Result<(), SequenceError>
    where
        I: IntoIterator<Item = &'b [u8]>,
    {
        for bytes in assets {
            self.push_asset(width, height, bytes, format, mirror)?;
        }
        Ok(())
    }

    /// Number of prepared frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if nothing has been loaded
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Prepared frames
    pub fn as_slice(&self) -> &[PackedBitmap] {
        &self.frames
    }
}
