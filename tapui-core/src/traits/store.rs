//! Persistent string store trait

use tapui_hal::NvmError;

/// Errors reported by a string store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// No free index entry or not enough space left on the device
    Full,
    /// No string stored under the requested id
    NotFound,
    /// String longer than a single record can hold
    TooLong,
    /// Output buffer cannot hold a single byte
    BufferTooSmall,
    /// Underlying memory failed
    Device(NvmError),
    /// Stored layout is inconsistent
    Corrupted,
}

impl From<NvmError> for StoreError {
    fn from(e: NvmError) -> Self {
        StoreError::Device(e)
    }
}

/// Append-only store of short strings addressed by a small integer id
///
/// Ids are handed out in storage order starting at 0 and stay valid
/// until [`StringStore::clear_index`].
pub trait StringStore {
    /// Forget every stored string
    fn clear_index(&mut self) -> Result<(), StoreError>;

    /// Persist `text`, returning its id
    fn store_string(&mut self, text: &str) -> Result<u8, StoreError>;

    /// Copy the string stored under `id` into `buffer`
    ///
    /// Strings longer than `buffer` are truncated. Returns the number of
    /// bytes written. Truncation may split a multi-byte character.
    fn load_string(&mut self, id: u8, buffer: &mut [u8]) -> Result<usize, StoreError>;
}
