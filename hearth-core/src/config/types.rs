//! Configuration type definitions

use crate::animation::{AssetFormat, Playback};
use crate::bitmap::{PackedBitmap, MAX_FRAME_BYTES, PAGE_HEIGHT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest data payload per bus transaction
pub const MAX_CHUNK: usize = 128;

/// Panel height limits; the multiplex ratio register accepts 15..=63
pub const MIN_HEIGHT: u16 = 16;
pub const MAX_HEIGHT: u16 = 64;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Address outside the 7-bit non-reserved range 0x03..=0x77
    InvalidAddress(u8),
    /// Panel size unusable (width outside 1..=128, height outside 16..=64
    /// or not a multiple of 8)
    InvalidDimensions { width: u16, height: u16 },
    /// Chunk size zero or above `MAX_CHUNK`
    InvalidChunk(usize),
}

/// Display controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// 7-bit bus address
    pub address: u8,
    /// Panel width in pixels
    pub width: u16,
    /// Panel height in pixels
    pub height: u16,
    /// Initial contrast
    pub contrast: u8,
    /// Remap segments and scan COM outputs in reverse (upright on most modules)
    pub flip: bool,
    /// Data bytes per bus transaction
    pub max_chunk: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            address: 0x3C,
            width: 128,
            height: 64,
            contrast: 0xFF,
            flip: true,
            max_chunk: MAX_CHUNK,
        }
    }
}

impl DisplayConfig {
    /// Bytes in one full frame
    pub const fn frame_len(&self) -> usize {
        PackedBitmap::byte_len(self.width, self.height)
    }

    /// Number of 8-row pages
    pub const fn pages(&self) -> u16 {
        self.height / PAGE_HEIGHT
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0x03..=0x77).contains(&self.address) {
            return Err(ConfigError::InvalidAddress(self.address));
        }
        if self.width == 0
            || self.width > 128
            || self.height < MIN_HEIGHT
            || self.height > MAX_HEIGHT
            || self.height % PAGE_HEIGHT != 0
            || self.frame_len() > MAX_FRAME_BYTES
        {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_chunk == 0 || self.max_chunk > MAX_CHUNK {
            return Err(ConfigError::InvalidChunk(self.max_chunk));
        }
        Ok(())
    }
}

/// Animation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimationConfig {
    /// Hold time per frame
    pub frame_interval_ms: u32,
    /// Frame visiting order
    pub playback: Playback,
    /// Add each asset's mirror image as an extra frame
    pub mirror: bool,
    /// Layout of the raw assets
    pub format: AssetFormat,
    /// Log a snapshot every this many frames (0 = never)
    pub log_every: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 100,
            playback: Playback::PingPong,
            mirror: true,
            format: AssetFormat::Vlsb,
            log_every: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_display_is_valid() {
        let config = DisplayConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.frame_len(), 1024);
        assert_eq!(config.pages(), 8);
    }

    #[test]
    fn test_small_panel() {
        let config = DisplayConfig {
            width: 64,
            height: 32,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.frame_len(), 256);
        assert_eq!(config.pages(), 4);
    }

    #[test]
    fn test_height_limits() {
        for height in [MIN_HEIGHT, 24, 48, MAX_HEIGHT] {
            let config = DisplayConfig {
                height,
                ..Default::default()
            };
            assert_eq!(config.validate(), Ok(()));
        }
    }

    #[test]
    fn test_invalid_address() {
        let config = DisplayConfig {
            address: 0x78,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidAddress(0x78)));
    }

    #[test]
    fn test_invalid_dimensions() {
        for (width, height) in [
            (0, 64),
            (128, 0),
            (128, 8),
            (128, 60),
            (129, 64),
            (128, 72),
            (64, 128),
            (8, 1024),
        ] {
            let config = DisplayConfig {
                width,
                height,
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidDimensions { width, height })
            );
        }
    }

    #[test]
    fn test_invalid_chunk() {
        for max_chunk in [0, 129] {
            let config = DisplayConfig {
                max_chunk,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::InvalidChunk(max_chunk)));
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let display = DisplayConfig {
            address: 0x3D,
            height: 32,
            flip: false,
            max_chunk: 32,
            ..Default::default()
        };
        let bytes = postcard::to_allocvec(&display).unwrap();
        let decoded: DisplayConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, display);

        let animation = AnimationConfig {
            playback: Playback::Cycle,
            format: AssetFormat::Hmsb,
            log_every: 0,
            ..Default::default()
        };
        let bytes = postcard::to_allocvec(&animation).unwrap();
        let decoded: AnimationConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, animation);
    }

    #[test]
    fn test_animation_defaults() {
        let config = AnimationConfig::default();
        assert_eq!(config.frame_interval_ms, 100);
        assert_eq!(config.playback, Playback::PingPong);
        assert!(config.mirror);
    }
}
