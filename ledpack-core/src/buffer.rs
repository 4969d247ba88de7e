//! Display buffer
//!
//! In-memory image of the HT16K33 display RAM: 8 rows of 16 bits. Row
//! `i` drives digit/row position `i`. The buffer is the source of truth;
//! the device only mirrors it after a flush.
//!
//! Wire format: for each row in index order, low byte then high byte
//! (16 bytes total), written starting at display RAM address 0x00.

use core::fmt;

/// Number of 16-bit rows
pub const BUFFER_ROWS: usize = 8;

/// Serialized frame length in bytes
pub const FRAME_BYTES: usize = BUFFER_ROWS * 2;

/// Decimal point / colon flag within a row
pub const DECIMAL_POINT: u16 = 1 << 7;

/// Buffer access errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferError {
    /// Row index outside `0..len`
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::OutOfRange { index, len } => {
                write!(f, "buffer row {} out of range 0..{}", index, len)
            }
        }
    }
}

/// Display RAM image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayBuffer {
    rows: [u16; BUFFER_ROWS],
}

impl DisplayBuffer {
    /// Zeroed buffer
    pub const fn new() -> Self {
        Self {
            rows: [0; BUFFER_ROWS],
        }
    }

    /// Store a segment pattern, OR'ing in the decimal point flag
    ///
    /// Pattern bits are stored as given. An out-of-range index is rejected
    /// and leaves the buffer untouched.
    pub fn set(&mut self, index: usize, pattern: u16, decimal_point: bool) -> Result<(), BufferError> {
        let row = self.rows.get_mut(index).ok_or(BufferError::OutOfRange {
            index,
            len: BUFFER_ROWS,
        })?;
        *row = pattern | if decimal_point { DECIMAL_POINT } else { 0 };
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<u16> {
        self.rows.get(index).copied()
    }

    /// Zero every row. Does not touch the device.
    pub fn clear(&mut self) {
        self.rows.fill(0);
    }

    pub fn rows(&self) -> &[u16; BUFFER_ROWS] {
        &self.rows
    }

    /// Little-endian frame, full 16 bits per row
    pub fn serialize(&self) -> [u8; FRAME_BYTES] {
        let mut frame = [0u8; FRAME_BYTES];
        for (chunk, row) in frame.chunks_exact_mut(2).zip(self.rows.iter()) {
            chunk.copy_from_slice(&row.to_le_bytes());
        }
        frame
    }
}
