mod freelist;
mod insertion;
pub mod presets;
mod slots;

use crate::components::mapped_array::MappedArray;
use crate::error::Error;
use crate::traits::fixed_int::FixedInt;
use crate::Result;
use num_traits::{NumCast, PrimInt, Signed, Unsigned};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A persistent set of symbol sequences, encoded as a double array trie over
/// two [`MappedArray`]s.
///
/// The transition on symbol `c` out of state `s` lands at `base[s] + c` and
/// is confirmed by `check[base[s] + c] == s`; a negative BASE marks an
/// accepting leaf. Cell `0` of both arrays is the header (`base[0]` the key
/// count, `check[0]` the last in-use index), cell `1` the root state.
///
/// `I` is the signed cell type taking `N` bytes on disk, `K` the unsigned
/// symbol type. Keys are slices of symbols in `[1, max]` ending in the
/// terminal symbol; symbol `0` is reserved for blank cells.
///
/// A single instance exclusively owns its two backing files. Dropping it
/// truncates both to the in-use region and flushes, best effort.
pub struct DoubleArray<I, K, const N: usize>
where
    I: PrimInt + Signed + FixedInt<N>,
    K: PrimInt + Unsigned,
{
    base: MappedArray<I, N>,
    check: MappedArray<I, N>,
    /// Head of the free slot list, zero while the list is inactive.
    e_head: I,
    term: K,
    max: K,
}

/// Backing array position of cell `i`.
#[inline]
fn cell<I: PrimInt>(i: I) -> usize {
    i.to_usize().expect("cell index is negative")
}

/// Where a key walk stopped.
enum WalkEnd<I> {
    /// On an accepting leaf; `complete` tells whether the whole key was
    /// consumed getting there.
    Leaf { index: I, complete: bool },
    /// At a state with no edge for `key[pos - 1]`.
    Missing { index: I, pos: usize },
    /// Ran out of symbols while still on internal states.
    Exhausted,
}

impl<I, K, const N: usize> DoubleArray<I, K, N>
where
    I: PrimInt + Signed + FixedInt<N>,
    K: PrimInt + Unsigned,
{
    /// Opens a double array over the two given backing files.
    ///
    /// With `initialize` the files are wiped and a blank trie is written;
    /// otherwise they are mapped as left behind by the instance that wrote
    /// them. `term` is the terminal symbol every key ends with, `max` the
    /// largest symbol value keys may carry.
    pub fn open<P: AsRef<Path>>(
        base_path: P,
        check_path: P,
        term: K,
        max: K,
        initialize: bool,
    ) -> Result<Self> {
        if term.is_zero() || term > max {
            return Err(Error::InvalidTerminal);
        }
        if <I as NumCast>::from(max).is_none() {
            return Err(Error::InvalidAlphabet);
        }

        let mut base = MappedArray::open(base_path)?;
        let mut check = MappedArray::open(check_path)?;

        if initialize {
            base.clear()?;
            check.clear()?;
            base.set(1, I::one()); // root state
            check.set(0, I::one()); // in-use region ends at the root
        }

        Ok(Self {
            base,
            check,
            e_head: I::zero(),
            term,
            max,
        })
    }

    /// The amount of keys currently stored.
    #[inline]
    pub fn num_keys(&self) -> I {
        self.base.get(0)
    }

    /// Looks `key` up and returns its leaf index, zero if it is not present.
    pub fn search(&self, key: &[K]) -> I {
        if self.num_keys().is_zero() {
            return I::zero();
        }

        let n = self.key_len(key);
        match self.walk(key, n) {
            WalkEnd::Leaf {
                index,
                complete: true,
            } => index,
            _ => I::zero(),
        }
    }

    /// Adds `key`. Returns `true` if it was newly added and `false` if it was
    /// already present.
    pub fn add(&mut self, key: &[K]) -> Result<bool> {
        let n = self.key_len(key);
        let added = match self.walk(key, n) {
            WalkEnd::Missing { index, pos } => {
                self.insert(index, pos, key, n)?;
                let keys = self.num_keys() + I::one();
                self.set_num_keys(keys);
                true
            }
            _ => false,
        };

        if self.e_head.is_zero() {
            self.build_free_list();
        }
        Ok(added)
    }

    /// Removes `key`. Returns `true` if it was present.
    ///
    /// Only the leaf cell is reclaimed; internal states that become childless
    /// keep their cells until a later relocation reuses them.
    pub fn remove(&mut self, key: &[K]) -> Result<bool> {
        let n = self.key_len(key);
        match self.walk(key, n) {
            WalkEnd::Leaf {
                index,
                complete: true,
            } => {
                self.w_base(index, I::zero())?;
                self.w_check(index, I::zero())?;
                let keys = self.num_keys() - I::one();
                self.set_num_keys(keys);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Adds every line of the file at `path` as a key, the stripped line
    /// break standing in for the terminal symbol. Returns the amount of keys
    /// that were newly added.
    pub fn load_word_list<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let file = File::open(path)?;
        let mut count = 0;

        for line in BufReader::new(file).lines() {
            let line = line?;
            let mut key = Vec::with_capacity(line.len() + 1);
            for b in line.bytes() {
                key.push(K::from(b).ok_or(Error::InvalidAlphabet)?);
            }
            key.push(self.term);

            if self.add(&key)? {
                count += 1;
            }
        }

        Ok(count)
    }

    /// Follows `key` from the root until it either completes, hits a leaf or
    /// falls off the trie.
    fn walk(&self, key: &[K], n: usize) -> WalkEnd<I> {
        let mut index = I::one();
        let mut pos = 1;

        while pos <= n + 1 {
            let t = self.forward(index, key[pos - 1]);
            if t.is_zero() {
                return WalkEnd::Missing { index, pos };
            }

            index = t;
            pos += 1;

            if self.base.get(cell(index)) < I::zero() {
                return WalkEnd::Leaf {
                    index,
                    complete: pos == n + 2,
                };
            }
        }

        WalkEnd::Exhausted
    }

    /// The amount of symbols in `key` before the terminal.
    fn key_len(&self, key: &[K]) -> usize {
        key.iter()
            .position(|c| *c == self.term)
            .expect("key has no terminal symbol")
    }

    /// Prints the in-use region of both arrays, fifteen columns at a time.
    pub fn dump(&self)
    where
        I: Display,
    {
        let size = cell(self.da_size());
        let mut i = 1;
        while i <= size {
            let end = (i + 14).min(size);

            print!("      ");
            for j in i..=end {
                print!("{j:6}");
            }
            println!();

            print!(" BASE ");
            for j in i..=end {
                print!("{:6}", self.base.get(j));
            }
            println!();

            print!("CHECK ");
            for j in i..=end {
                print!("{:6}", self.check.get(j));
            }
            println!();
            println!();

            i = end + 1;
        }
    }

    /// Prints counters and capacities of the trie.
    pub fn print_info(&self)
    where
        I: Display,
    {
        println!("keys:           {}", self.num_keys());
        println!("in-use cells:   {}", self.da_size());
        println!("free list head: {}", self.e_head);
        println!("base capacity:  {}", self.base.capacity());
        println!("check capacity: {}", self.check.capacity());
    }
}

impl<I, K, const N: usize> Drop for DoubleArray<I, K, N>
where
    I: PrimInt + Signed + FixedInt<N>,
    K: PrimInt + Unsigned,
{
    fn drop(&mut self) {
        let end = cell(self.da_size()) + 1;
        let _ = self.base.flush();
        let _ = self.check.flush();
        let _ = self.base.truncate(end);
        let _ = self.check.truncate(end);
    }
}
