//! Slot File
//!
//! Raw fixed-size slot I/O over the backing file. Every transfer is an
//! explicit seek followed by a read or write; there is no buffering layer.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::SyncStrategy;
use crate::error::{Result, ShelfError};
use crate::record::RECORD_SIZE;

/// Exclusively owned handle to the backing slot file
#[derive(Debug)]
pub struct SlotFile {
    /// Path of the backing file
    path: PathBuf,
    /// Read/write handle
    file: File,
    /// When writes are forced to disk
    sync_strategy: SyncStrategy,
}

impl SlotFile {
    /// Open or create the backing file for read/write
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            sync_strategy,
        })
    }

    /// Current file size in bytes
    pub fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// True if the file holds no bytes at all
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Read the slot at `offset`
    ///
    /// Returns `IncompleteRead` when the file ends before a full slot.
    pub fn read_slot(&mut self, offset: u64) -> Result<[u8; RECORD_SIZE]> {
        self.file.seek(SeekFrom::Start(offset))?;

        let mut block = [0u8; RECORD_SIZE];
        let mut got = 0;
        while got < RECORD_SIZE {
            match self.file.read(&mut block[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if got < RECORD_SIZE {
            return Err(ShelfError::IncompleteRead {
                offset,
                expected: RECORD_SIZE,
                got,
            });
        }

        tracing::trace!(offset, "read slot");
        Ok(block)
    }

    /// Write one full slot at `offset`
    pub fn write_slot(&mut self, offset: u64, block: &[u8]) -> Result<()> {
        debug_assert_eq!(block.len(), RECORD_SIZE);

        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(block)?;

        if self.sync_strategy == SyncStrategy::EveryWrite {
            self.file.sync_data()?;
        }

        tracing::trace!(offset, "wrote slot");
        Ok(())
    }

    /// Drop every byte and rewind to the start
    pub fn truncate(&mut self) -> Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Force all written data to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
