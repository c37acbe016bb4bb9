//! I2C bus abstractions
//!
//! Provides the I2C master operations the display driver needs. Chip HALs
//! implement this for their blocking I2C peripheral; tests implement it
//! with a recording mock.

/// I2C bus master
///
/// Only writes are needed: the display controller is write-only over I2C
/// and the frame buffer is never read back.
pub trait I2cBus {
    /// Error type for I2C operations
    ///
    /// A missing acknowledge (no device, wrong address, wiring fault) must
    /// be reported as an error, never silently ignored.
    type Error;

    /// Write data to a device at the given address in one transaction
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write (control byte first for display controllers)
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, data)
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::FAST
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
    };

    /// Build a config from a frequency in Hz
    ///
    /// Returns `None` unless the frequency is one of the standard bus rates.
    pub const fn from_hz(frequency: u32) -> Option<Self> {
        match frequency {
            100_000 | 400_000 | 1_000_000 => Some(Self { frequency }),
            _ => None,
        }
    }
}
