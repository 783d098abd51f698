//! RAM-backed non-volatile memory

use tapui_hal::{Nvm, NvmError};

/// Erased byte value
const ERASED: u8 = 0xff;

/// In-memory EEPROM emulation
///
/// Writes land in a shadow copy and only reach the "persisted" copy on
/// [`Nvm::commit`], like the flash-backed EEPROM emulation on the device.
/// [`RamNvm::power_cycle`] drops uncommitted writes.
#[derive(Debug, Clone)]
pub struct RamNvm<const N: usize> {
    shadow: [u8; N],
    persisted: [u8; N],
    commits: usize,
}

impl<const N: usize> RamNvm<N> {
    /// Create an erased device
    pub const fn new() -> Self {
        Self {
            shadow: [ERASED; N],
            persisted: [ERASED; N],
            commits: 0,
        }
    }

    /// Number of commits so far
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Discard uncommitted writes
    pub fn power_cycle(&mut self) {
        self.shadow = self.persisted;
    }

    /// Persisted contents
    pub fn persisted(&self) -> &[u8] {
        &self.persisted
    }
}

impl<const N: usize> Default for RamNvm<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Nvm for RamNvm<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), NvmError> {
        self.check_range(offset, buffer.len())?;
        buffer.copy_from_slice(&self.shadow[offset..offset + buffer.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), NvmError> {
        self.check_range(offset, data.len())?;
        self.shadow[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), NvmError> {
        self.persisted = self.shadow;
        self.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_erased() {
        let mut nvm: RamNvm<8> = RamNvm::new();
        assert_eq!(nvm.read_u8(7), Ok(0xff));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut nvm: RamNvm<8> = RamNvm::new();
        assert_eq!(nvm.write(6, &[1, 2, 3]), Err(NvmError::OutOfRange));
        assert_eq!(nvm.read(usize::MAX, &mut [0u8; 2]), Err(NvmError::OutOfRange));
    }

    #[test]
    fn test_uncommitted_writes_lost_on_power_cycle() {
        let mut nvm: RamNvm<8> = RamNvm::new();
        nvm.write_u8(0, 1).unwrap();
        nvm.commit().unwrap();
        nvm.write_u8(1, 2).unwrap();

        nvm.power_cycle();

        assert_eq!(nvm.read_u8(0), Ok(1));
        assert_eq!(nvm.read_u8(1), Ok(0xff));
        assert_eq!(nvm.commits(), 1);
    }
}
