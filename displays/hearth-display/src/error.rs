//! Display driver errors

use hearth_core::config::ConfigError;
use hearth_core::BitmapError;

/// Display driver errors
///
/// `E` is the bus error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// The controller did not accept the initialisation sequence
    HardwareInit(E),
    /// A bus transaction failed after initialisation
    Bus(E),
    /// Frame length does not match the panel size
    SizeMismatch {
        /// Bytes per frame for this panel
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
    /// Pixel coordinate outside the panel
    OutOfBounds { x: u16, y: u16 },
    /// Buffer dimensions unusable
    InvalidDimensions,
    /// Configuration rejected
    Config(ConfigError),
    /// `init()` has not completed successfully
    NotInitialized,
}

impl<E> From<BitmapError> for DisplayError<E> {
    fn from(e: BitmapError) -> Self {
        match e {
            BitmapError::SizeMismatch { expected, actual } => {
                DisplayError::SizeMismatch { expected, actual }
            }
            BitmapError::OutOfBounds { x, y } => DisplayError::OutOfBounds { x, y },
            BitmapError::InvalidDimensions => DisplayError::InvalidDimensions,
        }
    }
}

impl<E> From<ConfigError> for DisplayError<E> {
    fn from(e: ConfigError) -> Self {
        DisplayError::Config(e)
    }
}
