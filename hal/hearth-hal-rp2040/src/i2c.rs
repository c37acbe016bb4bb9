//! Blocking I2C master
//!
//! Wraps an `embassy-rp` blocking I2C driver so the display driver can use
//! it through `hearth_hal::I2cBus`.

use embassy_rp::i2c::{self, AbortReason, Blocking, I2c, Instance};
use hearth_hal::{I2cBus, I2cConfig};

/// I2C transaction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// No device acknowledged the address or a data byte
    NoAcknowledge,
    /// Another master took the bus
    ArbitrationLoss,
    /// Address outside the 7-bit range or reserved
    InvalidAddress(u16),
    /// Write longer than the peripheral accepts in one transaction
    WriteTooLong,
    /// Any other peripheral abort
    Other,
}

impl From<i2c::Error> for I2cBusError {
    fn from(e: i2c::Error) -> Self {
        match e {
            i2c::Error::Abort(AbortReason::NoAcknowledge) => I2cBusError::NoAcknowledge,
            i2c::Error::Abort(AbortReason::ArbitrationLoss) => I2cBusError::ArbitrationLoss,
            i2c::Error::AddressOutOfRange(addr) | i2c::Error::AddressReserved(addr) => {
                I2cBusError::InvalidAddress(addr)
            }
            i2c::Error::InvalidWriteBufferLength => I2cBusError::WriteTooLong,
            _ => I2cBusError::Other,
        }
    }
}

/// Peripheral configuration for the given bus settings
pub fn peripheral_config(config: I2cConfig) -> i2c::Config {
    let mut c = i2c::Config::default();
    c.frequency = config.frequency;
    c
}

/// Blocking I2C master on an RP2040 I2C peripheral
pub struct BlockingI2c<'d, T: Instance> {
    inner: I2c<'d, T, Blocking>,
}

impl<'d, T: Instance> BlockingI2c<'d, T> {
    /// Wrap an already configured peripheral
    pub fn new(inner: I2c<'d, T, Blocking>) -> Self {
        Self { inner }
    }

    /// Get the underlying peripheral back
    pub fn into_inner(self) -> I2c<'d, T, Blocking> {
        self.inner
    }
}

impl<T: Instance> I2cBus for BlockingI2c<'_, T> {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner
            .blocking_write(address, data)
            .map_err(I2cBusError::from)
    }
}
