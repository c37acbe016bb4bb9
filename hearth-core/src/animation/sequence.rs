//! Animation sequence
//!
//! An immutable, ordered set of frames plus the playlist that decides the
//! order they are shown in. The playlist is cyclic: after its last entry
//! playback continues with the first.

use heapless::Vec;

use crate::bitmap::{BitmapError, PackedBitmap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum frames in a sequence
pub const MAX_FRAMES: usize = 16;

/// Maximum playlist length (ping-pong visits inner frames twice)
pub const MAX_PLAYLIST: usize = 2 * MAX_FRAMES;

/// Order in which the frames are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Playback {
    /// 0, 1, ..., n-1, then from 0 again
    #[default]
    Cycle,
    /// Forward then backward without repeating the end frames:
    /// 0, 1, ..., n-1, n-2, ..., 1, then from 0 again
    PingPong,
}

/// Sequence construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// No frames supplied
    Empty,
    /// More than `MAX_FRAMES` frames
    TooManyFrames,
    /// A frame does not match the display's frame size
    SizeMismatch {
        /// Position of the offending frame
        index: usize,
        /// Bytes required by the display
        expected: usize,
        /// Bytes in the frame
        actual: usize,
    },
    /// A raw asset could not be turned into a frame
    Bitmap(BitmapError),
}

impl From<BitmapError> for SequenceError {
    fn from(e: BitmapError) -> Self {
        SequenceError::Bitmap(e)
    }
}

/// Frames and the order to show them in
#[derive(Debug, Clone)]
pub struct AnimationSequence<'a> {
    frames: &'a [PackedBitmap],
    playlist: Vec<u8, MAX_PLAYLIST>,
}

impl<'a> AnimationSequence<'a> {
    /// Build a sequence for a `width` x `height` display
    ///
    /// Every frame must hold exactly `width * height / 8` bytes.
    pub fn new(
        frames: &'a [PackedBitmap],
        width: u16,
        height: u16,
        playback: Playback,
    ) -> Result<Self, SequenceError> {
        if frames.is_empty() {
            return Err(SequenceError::Empty);
        }
        if frames.len() > MAX_FRAMES {
            return Err(SequenceError::TooManyFrames);
        }

        let expected = PackedBitmap::byte_len(width, height);
        for (index, frame) in frames.iter().enumerate() {
            let actual = frame.as_bytes().len();
            if actual != expected {
                return Err(SequenceError::SizeMismatch {
                    index,
                    expected,
                    actual,
                });
            }
        }

        Ok(Self {
            frames,
            playlist: build_playlist(frames.len(), playback),
        })
    }

    /// Number of playlist positions in one full cycle
    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    /// Always false; construction rejects empty sequences
    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    /// Number of distinct frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame indices in playback order
    pub fn playlist(&self) -> &[u8] {
        &self.playlist
    }

    /// Frame index shown at playlist `position` (wraps around)
    pub fn frame_index(&self, position: usize) -> u8 {
        self.playlist[position % self.playlist.len()]
    }

    /// Frame shown at playlist `position` (wraps around)
    pub fn frame_at(&self, position: usize) -> &'a PackedBitmap {
        &self.frames[self.frame_index(position) as usize]
    }

    /// All frames in storage order
    pub fn frames(&self) -> &'a [PackedBitmap] {
        self.frames
    }
}

fn build_playlist(count: usize, playback: Playback) -> Vec<u8, MAX_PLAYLIST> {
    // Forward pass plus at most count - 2 frames back fits MAX_PLAYLIST
    debug_assert!(count <= MAX_FRAMES);
    let count = count as u8;
    let back_until = match playback {
        Playback::Cycle => 1,
        Playback::PingPong => count.saturating_sub(1).max(1),
    };
    (0..count).chain((1..back_until).rev()).collect()
}
