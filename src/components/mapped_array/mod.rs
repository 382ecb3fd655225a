use crate::backend::MappedFile;
use crate::traits::fixed_int::FixedInt;
use crate::Result;
use std::marker::PhantomData;
use std::path::Path;

/// The amount of elements a freshly created array is extended to.
pub const INITIAL_LEN: usize = 4096;

/// The amount of elements the mapping grows by when an index runs past it.
pub const GROW_LEN: usize = 4096;

/// Interprets a [`MappedFile`] as a growable persistent array of `T`.
///
/// Reads and writes never grow the mapping on their own; callers guarantee
/// capacity with [`MappedArray::expand_to`] first and get a panic otherwise.
/// Elements a growth step exposes always read as zero.
pub struct MappedArray<T, const N: usize> {
    storage: MappedFile,
    p: PhantomData<T>,
}

impl<T, const N: usize> MappedArray<T, N> {
    #[inline]
    fn byte_index(index: usize) -> usize {
        index * N
    }

    /// The amount of elements the mapping currently holds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len() / N
    }
}

impl<T, const N: usize> MappedArray<T, N>
where
    T: FixedInt<N>,
{
    /// Opens the array file at `path`, creating it with [`INITIAL_LEN`] zero
    /// elements if it is missing or empty. An existing file is mapped with
    /// its current length as capacity.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = MappedFile::open(path, INITIAL_LEN * N)?;
        Ok(Self {
            storage,
            p: PhantomData,
        })
    }

    /// Reads the element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> T {
        let at = Self::byte_index(index);
        let raw: [u8; N] = (&self.storage[at..at + N]).try_into().unwrap();
        T::from_bytes(raw)
    }

    /// Writes the element at `index`.
    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        let at = Self::byte_index(index);
        self.storage[at..at + N].copy_from_slice(&value.to_bytes());
    }

    /// Makes sure `index` is within the mapped capacity, growing the backing
    /// file in [`GROW_LEN`] element steps. Fresh elements read as zero.
    pub fn expand_to(&mut self, index: usize) -> Result<()> {
        let mut capacity = self.capacity();
        if index < capacity {
            return Ok(());
        }

        while capacity <= index {
            capacity += GROW_LEN;
        }

        self.storage.resize(capacity * N)
    }

    /// Zeroes the array and shrinks it back to [`INITIAL_LEN`] elements.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.reset(INITIAL_LEN * N)
    }

    /// Shrinks the backing file to `len` elements. Used on shutdown so the
    /// file doesn't keep the unused mapped tail.
    pub fn truncate(&mut self, len: usize) -> Result<()> {
        self.storage.truncate(len * N)
    }

    /// Writes all mapped elements back to the file.
    pub fn flush(&mut self) -> Result<()> {
        self.storage.flush()
    }

    /// Flushes and releases the array.
    pub fn close(self) -> Result<()> {
        self.storage.close()
    }
}
