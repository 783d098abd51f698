//! Tagged string store on non-volatile memory
//!
//! # Layout
//!
//! ```text
//! offset 0        4       5
//!        ┌────────┬───────┬─────┬──────────┬─────┬──────────┬───
//!        │ tag[4] │ count │ len │ bytes... │ len │ bytes... │ ...
//!        └────────┴───────┴─────┴──────────┴─────┴──────────┴───
//! ```
//!
//! Records are appended in id order. A tag mismatch on start-up (first use,
//! or another application's data) resets the store to empty.

mod ram;

pub use ram::RamNvm;

use heapless::Vec;
use tapui_core::traits::{StoreError, StringStore};
use tapui_hal::Nvm;

/// Length of the identifying tag
pub const TAG_LEN: usize = 4;

/// Maximum number of records
pub const MAX_RECORDS: usize = 10;

/// Longest record in bytes
pub const MAX_RECORD_LEN: usize = u8::MAX as usize;

const COUNT_OFFSET: usize = TAG_LEN;
const DATA_OFFSET: usize = TAG_LEN + 1;

#[derive(Debug, Clone, Copy)]
struct Record {
    offset: usize,
    len: u8,
}

/// Append-only string store
///
/// The index is rebuilt from the device on [`NvmStringStore::init`] and
/// kept in RAM; every store commits.
pub struct NvmStringStore<N> {
    nvm: N,
    tag: [u8; TAG_LEN],
    records: Vec<Record, MAX_RECORDS>,
    /// Offset of the next record's length byte
    write_point: usize,
}

impl<N: Nvm> NvmStringStore<N> {
    /// Open the store on `nvm`, resetting it unless it carries `tag`
    ///
    /// A layout that runs past the end of the device counts as corrupted
    /// and is reset too.
    pub fn init(nvm: N, tag: [u8; TAG_LEN]) -> Result<Self, StoreError> {
        nvm.check_range(0, DATA_OFFSET)?;
        let mut store = Self {
            nvm,
            tag,
            records: Vec::new(),
            write_point: DATA_OFFSET,
        };

        let mut stored = [0u8; TAG_LEN];
        store.nvm.read(0, &mut stored)?;
        if stored != tag {
            info!("store: tag mismatch, initializing");
            store.reset()?;
            return Ok(store);
        }

        match store.rebuild_index() {
            Ok(()) => {
                info!("store: {=usize} records", store.records.len());
                Ok(store)
            }
            Err(StoreError::Corrupted) => {
                warn!("store: corrupted index, initializing");
                store.reset()?;
                Ok(store)
            }
            Err(e) => Err(e),
        }
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        self.nvm.write(0, &self.tag)?;
        self.nvm.write_u8(COUNT_OFFSET, 0)?;
        self.nvm.commit()?;
        self.records.clear();
        self.write_point = DATA_OFFSET;
        Ok(())
    }

    fn rebuild_index(&mut self) -> Result<(), StoreError> {
        let count = self.nvm.read_u8(COUNT_OFFSET)? as usize;
        if count > MAX_RECORDS {
            return Err(StoreError::Corrupted);
        }

        self.records.clear();
        let mut point = DATA_OFFSET;
        for _ in 0..count {
            if point >= self.nvm.capacity() {
                return Err(StoreError::Corrupted);
            }
            let len = self.nvm.read_u8(point)?;
            let offset = point + 1;
            if self.nvm.check_range(offset, len as usize).is_err() {
                return Err(StoreError::Corrupted);
            }
            self.records
                .push(Record { offset, len })
                .map_err(|_| StoreError::Corrupted)?;
            point = offset + len as usize;
        }
        self.write_point = point;
        Ok(())
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Free bytes left for records, including their length bytes
    pub fn remaining(&self) -> usize {
        self.nvm.capacity().saturating_sub(self.write_point)
    }

    /// Append `data` as a new record and commit, returning its id
    pub fn store_bytes(&mut self, data: &[u8]) -> Result<u8, StoreError> {
        if data.len() > MAX_RECORD_LEN {
            return Err(StoreError::TooLong);
        }
        if self.records.is_full() || self.nvm.check_range(self.write_point, data.len() + 1).is_err()
        {
            warn!("store: full");
            return Err(StoreError::Full);
        }

        let id = self.records.len();
        let record = Record {
            offset: self.write_point + 1,
            len: data.len() as u8,
        };
        self.nvm.write_u8(self.write_point, record.len)?;
        self.nvm.write(record.offset, data)?;
        self.nvm.write_u8(COUNT_OFFSET, (id + 1) as u8)?;
        self.nvm.commit()?;

        self.records
            .push(record)
            .map_err(|_| StoreError::Full)?;
        self.write_point = record.offset + data.len();
        debug!(
            "store: id={=usize} pos={=usize} size={=u8}",
            id,
            record.offset,
            record.len
        );
        Ok(id as u8)
    }

    /// Copy record `id` into `buffer`, truncating to its length
    pub fn load_bytes(&mut self, id: u8, buffer: &mut [u8]) -> Result<usize, StoreError> {
        let Some(record) = self.records.get(id as usize).copied() else {
            debug!("load: no record {=u8}", id);
            return Err(StoreError::NotFound);
        };
        if buffer.is_empty() && record.len > 0 {
            return Err(StoreError::BufferTooSmall);
        }
        let len = buffer.len().min(record.len as usize);
        self.nvm.read(record.offset, &mut buffer[..len])?;
        Ok(len)
    }

    /// Forget every record and commit
    pub fn clear_index(&mut self) -> Result<(), StoreError> {
        self.nvm.write_u8(COUNT_OFFSET, 0)?;
        self.nvm.commit()?;
        self.records.clear();
        self.write_point = DATA_OFFSET;
        info!("store: index cleared");
        Ok(())
    }

    pub fn nvm(&self) -> &N {
        &self.nvm
    }

    /// Give back the underlying memory
    pub fn release(self) -> N {
        self.nvm
    }
}

impl<N: Nvm> StringStore for NvmStringStore<N> {
    fn clear_index(&mut self) -> Result<(), StoreError> {
        NvmStringStore::clear_index(self)
    }

    fn store_string(&mut self, text: &str) -> Result<u8, StoreError> {
        self.store_bytes(text.as_bytes())
    }

    fn load_string(&mut self, id: u8, buffer: &mut [u8]) -> Result<usize, StoreError> {
        self.load_bytes(id, buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tapui_hal::NvmError;

    const TAG: [u8; TAG_LEN] = *b"TAP1";

    fn fresh<const SIZE: usize>() -> NvmStringStore<RamNvm<SIZE>> {
        NvmStringStore::init(RamNvm::new(), TAG).unwrap()
    }

    #[test]
    fn test_first_use_writes_header() {
        let store = fresh::<64>();
        assert!(store.is_empty());
        assert_eq!(&store.nvm().persisted()[..DATA_OFFSET], b"TAP1\0");
    }

    #[test]
    fn test_records_survive_reopen() {
        let mut store = fresh::<64>();
        assert_eq!(store.store_string("home-ap"), Ok(0));
        assert_eq!(store.store_string("s3cret"), Ok(1));

        let mut nvm = store.release();
        nvm.power_cycle();
        let mut store = NvmStringStore::init(nvm, TAG).unwrap();

        assert_eq!(store.len(), 2);
        let mut buf = [0u8; 16];
        let n = store.load_string(1, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"s3cret");
    }

    #[test]
    fn test_other_tag_resets() {
        let mut store = fresh::<64>();
        store.store_string("old").unwrap();

        let store = NvmStringStore::init(store.release(), *b"APP2").unwrap();
        assert!(store.is_empty());
        assert_eq!(&store.nvm().persisted()[..TAG_LEN], b"APP2");
    }

    #[test]
    fn test_corrupted_count_resets() {
        let mut nvm: RamNvm<32> = RamNvm::new();
        nvm.write(0, &TAG).unwrap();
        nvm.write_u8(COUNT_OFFSET, 3).unwrap();
        // first record claims more bytes than the device holds
        nvm.write_u8(DATA_OFFSET, 200).unwrap();

        let store = NvmStringStore::init(nvm, TAG).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.remaining(), 32 - DATA_OFFSET);
    }

    #[test]
    fn test_device_too_small() {
        let result = NvmStringStore::init(RamNvm::<3>::new(), TAG);
        assert!(matches!(
            result,
            Err(StoreError::Device(NvmError::OutOfRange))
        ));
    }

    #[test]
    fn test_index_full() {
        let mut store = fresh::<256>();
        for i in 0..MAX_RECORDS {
            assert_eq!(store.store_string("x"), Ok(i as u8));
        }
        assert_eq!(store.store_string("x"), Err(StoreError::Full));
    }

    #[test]
    fn test_device_full() {
        let mut store = fresh::<16>();
        assert_eq!(store.store_string("abcdefghi"), Ok(0));
        assert_eq!(store.remaining(), 1);
        assert_eq!(store.store_string("a"), Err(StoreError::Full));
        assert_eq!(store.store_string(""), Ok(1));
    }

    #[test]
    fn test_too_long() {
        let mut store = fresh::<512>();
        let long = [b'a'; MAX_RECORD_LEN + 1];
        assert_eq!(store.store_bytes(&long), Err(StoreError::TooLong));
        assert_eq!(store.store_bytes(&long[..MAX_RECORD_LEN]), Ok(0));
    }

    #[test]
    fn test_load_truncates_and_reports_missing() {
        let mut store = fresh::<64>();
        store.store_string("truncate me").unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(store.load_string(0, &mut buf), Ok(4));
        assert_eq!(&buf, b"trun");
        assert_eq!(store.load_string(1, &mut buf), Err(StoreError::NotFound));
        assert_eq!(store.load_string(0, &mut []), Err(StoreError::BufferTooSmall));
    }

    #[test]
    fn test_clear_index_reuses_space() {
        let mut store = fresh::<32>();
        store.store_string("0123456789").unwrap();
        store.clear_index().unwrap();

        assert!(store.is_empty());
        assert_eq!(store.store_string("again"), Ok(0));

        let mut nvm = store.release();
        nvm.power_cycle();
        let store = NvmStringStore::init(nvm, TAG).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_text_edit_round_trip() {
        use tapui_core::{RenderContext, TextEdit, UiConfig};

        let mut ctx = RenderContext::new(&UiConfig::default());
        let mut store = fresh::<64>();
        let mut edit = TextEdit::new(16);
        edit.set_text(&mut ctx, "ネットワーク");

        let id = edit.save_to(&mut store).unwrap();
        let mut restored = TextEdit::new(16);
        assert_eq!(restored.load_from(&mut ctx, &mut store, id), Ok(true));
        assert_eq!(restored.text().as_str(), "ネットワーク");
        assert_eq!(restored.load_from(&mut ctx, &mut store, id + 1), Ok(false));
    }

    proptest! {
        #[test]
        fn prop_stored_strings_read_back(texts in proptest::collection::vec("[ -~]{0,20}", 0..=MAX_RECORDS)) {
            let mut store = fresh::<512>();
            for (i, text) in texts.iter().enumerate() {
                prop_assert_eq!(store.store_string(text), Ok(i as u8));
            }

            let mut nvm = store.release();
            nvm.power_cycle();
            let mut store = NvmStringStore::init(nvm, TAG).unwrap();

            let mut buf = [0u8; 32];
            for (i, text) in texts.iter().enumerate() {
                let n = store.load_string(i as u8, &mut buf).unwrap();
                prop_assert_eq!(&buf[..n], text.as_bytes());
            }
        }
    }
}
