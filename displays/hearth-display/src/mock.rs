//! Recording I2C bus for driver tests

use hearth_hal::I2cBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nack;

/// Bus that records every write and can refuse from a given one on
pub struct MockBus {
    pub writes: Vec<(u8, Vec<u8>)>,
    /// Zero-based number of the first write to NACK; all later writes fail too
    pub nack_from: Option<usize>,
    attempts: usize,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            nack_from: None,
            attempts: 0,
        }
    }

    /// A bus with nothing attached
    pub fn absent() -> Self {
        Self {
            nack_from: Some(0),
            ..Self::new()
        }
    }

    /// Write attempts, including refused ones
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Single-byte commands, in order
    pub fn commands(&self) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(_, w)| w[0] == 0x00)
            .map(|(_, w)| w[1])
            .collect()
    }

    /// Data payloads, control byte stripped
    pub fn data_chunks(&self) -> Vec<&[u8]> {
        self.writes
            .iter()
            .filter(|(_, w)| w[0] == 0x40)
            .map(|(_, w)| &w[1..])
            .collect()
    }

    /// Concatenated data payloads
    pub fn data(&self) -> Vec<u8> {
        self.data_chunks().concat()
    }

    pub fn reset(&mut self) {
        self.writes.clear();
    }
}

impl I2cBus for MockBus {
    type Error = Nack;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Nack> {
        let n = self.attempts;
        self.attempts += 1;
        if matches!(self.nack_from, Some(from) if n >= from) {
            return Err(Nack);
        }
        self.writes.push((address, data.to_vec()));
        Ok(())
    }
}
