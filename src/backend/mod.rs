use crate::error::Error;
use crate::Result;
use memmap2::{MmapMut, MmapOptions, RemapOptions};
use std::fs::{File, OpenOptions};
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// A file mapped read-write/shared that can grow in place.
///
/// The mapping and the file descriptor are exclusively owned; the struct is
/// move-only. Every byte the file gains through [`MappedFile::resize`] or
/// [`MappedFile::reset`] reads as zero, which callers rely on for blank cells.
pub struct MappedFile {
    file: File,
    map: MmapMut,
}

impl MappedFile {
    /// Opens `path`, creating it with `initial_size` zero bytes if the file
    /// is missing or empty. An existing file is mapped with its current
    /// length.
    pub fn open<P: AsRef<Path>>(path: P, initial_size: usize) -> Result<Self> {
        fn inner(path: &Path, initial_size: usize) -> Result<MappedFile> {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(path)
                .map_err(Error::Open)?;

            let file_size = file.metadata().map_err(Error::Open)?.len();
            if file_size == 0 {
                file.set_len(initial_size as u64).map_err(Error::Extend)?;
            }

            MappedFile::from_file(file)
        }

        inner(path.as_ref(), initial_size)
    }

    /// Maps a `MappedFile` directly from a `File`.
    pub fn from_file(file: File) -> Result<Self> {
        let map = unsafe { MmapOptions::new().map_mut(&file).map_err(Error::Map)? };
        Ok(MappedFile { file, map })
    }

    /// The amount of mapped bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grows file and mapping to `new_len` bytes. The added bytes read as
    /// zero. `new_len` must not be smaller than the current mapping.
    pub fn resize(&mut self, new_len: usize) -> Result<()> {
        self.file.set_len(new_len as u64).map_err(Error::Extend)?;
        unsafe {
            self.map
                .remap(new_len, RemapOptions::new().may_move(true))
                .map_err(Error::Map)?;
        }
        Ok(())
    }

    /// Discards all content and maps `initial_size` fresh zero bytes.
    pub fn reset(&mut self, initial_size: usize) -> Result<()> {
        self.file.set_len(0).map_err(Error::Truncate)?;
        self.file.set_len(initial_size as u64).map_err(Error::Extend)?;
        unsafe {
            self.map
                .remap(initial_size, RemapOptions::new().may_move(true))
                .map_err(Error::Map)?;
        }
        Ok(())
    }

    /// Shrinks the backing file to `new_len` bytes without touching the
    /// mapping. Mapped accesses past the new end are invalid afterwards; this
    /// runs right before the file is released.
    pub fn truncate(&mut self, new_len: usize) -> Result<()> {
        self.file.set_len(new_len as u64).map_err(Error::Truncate)
    }

    /// Writes the whole mapping back to the file.
    pub fn flush(&mut self) -> Result<()> {
        self.map.flush().map_err(Error::Sync)
    }

    #[inline]
    pub fn flush_range(&mut self, start: usize, len: usize) -> Result<()> {
        self.map.flush_range(start, len).map_err(Error::Sync)
    }

    /// Flushes the mapping, syncs the file and releases both.
    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        self.file.sync_all().map_err(Error::Close)?;
        Ok(())
    }
}

impl Drop for MappedFile {
    fn drop(&mut self) {
        let _ = self.map.flush();
    }
}

impl Deref for MappedFile {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.map.deref()
    }
}

impl DerefMut for MappedFile {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.map.deref_mut()
    }
}
