//! Non-volatile memory abstractions
//!
//! Models the EEPROM emulation found on most touchscreen boards: a
//! byte-addressable window that is written into a RAM shadow and made
//! persistent by an explicit commit.

/// Errors from non-volatile memory operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvmError {
    /// Access extends past the end of the device
    OutOfRange,
    /// Underlying flash or bus operation failed
    Device,
}

/// Byte-addressable non-volatile memory
///
/// Implementations should handle:
/// - Bounds checking against [`Nvm::capacity`]
/// - Deferring physical writes until [`Nvm::commit`] where the medium
///   requires sector erases
pub trait Nvm {
    /// Total number of addressable bytes
    fn capacity(&self) -> usize;

    /// Read `buffer.len()` bytes starting at `offset`
    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), NvmError>;

    /// Write `data` starting at `offset`
    ///
    /// The write may only become persistent after [`Nvm::commit`].
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), NvmError>;

    /// Flush pending writes to the physical medium
    fn commit(&mut self) -> Result<(), NvmError>;

    /// Read a single byte
    fn read_u8(&mut self, offset: usize) -> Result<u8, NvmError> {
        let mut byte = [0u8; 1];
        self.read(offset, &mut byte)?;
        Ok(byte[0])
    }

    /// Write a single byte
    fn write_u8(&mut self, offset: usize, value: u8) -> Result<(), NvmError> {
        self.write(offset, &[value])
    }

    /// Check that `len` bytes starting at `offset` lie inside the device
    fn check_range(&self, offset: usize, len: usize) -> Result<(), NvmError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.capacity() => Ok(()),
            _ => Err(NvmError::OutOfRange),
        }
    }
}
