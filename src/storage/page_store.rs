//! Page Store
//!
//! Raw block I/O over a single table file.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::{Page, PageId, PAGE_SIZE};

/// Maps page indices to fixed-size blocks in a backing file
///
/// Page `i` lives at byte offset `i * PAGE_SIZE`. The store never interprets
/// page contents; reads past the end of the file yield zeroed pages.
pub struct PageStore {
    path: PathBuf,
    file: File,
}

impl PageStore {
    /// Open or create the backing file
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Open an existing backing file without creating it
    ///
    /// Fails with an `Io` error of kind `NotFound` if the file is absent.
    pub fn open_existing(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    fn page_offset(id: PageId) -> u64 {
        id * PAGE_SIZE as u64
    }

    /// Read the page at `id`
    ///
    /// A page that was never written (fully or partially past EOF) comes back
    /// zero-filled in the missing range.
    pub fn read_page(&mut self, id: PageId) -> Result<Page> {
        let mut data = vec![0u8; PAGE_SIZE];
        self.file.seek(SeekFrom::Start(Self::page_offset(id)))?;

        let mut filled = 0;
        while filled < PAGE_SIZE {
            match self.file.read(&mut data[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled < PAGE_SIZE {
            tracing::trace!(
                "page {} of {} short by {} bytes, zero-filled",
                id,
                self.path.display(),
                PAGE_SIZE - filled
            );
        }

        Page::from_bytes(id, data)
    }

    /// Write a full page at its offset, extending the file if needed
    pub fn write_page(&mut self, page: &Page) -> Result<()> {
        self.file.seek(SeekFrom::Start(Self::page_offset(page.id())))?;
        self.file.write_all(page.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }

    /// Return the next unused page index
    ///
    /// Nothing is written. The index is `file_len / PAGE_SIZE`, so two
    /// allocations without an intervening write return the same index.
    pub fn allocate_page(&self) -> Result<PageId> {
        Ok(self.len()? / PAGE_SIZE as u64)
    }

    /// Current file length in bytes
    pub fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Whether the file holds no bytes at all
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Force written pages to disk
    pub fn sync(&self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
