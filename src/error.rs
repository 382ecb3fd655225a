use std::fmt::Display;
use std::io;

#[derive(Debug)]
pub enum Error {
    /// Opening or creating a backing file failed.
    Open(io::Error),
    /// Extending a backing file failed.
    Extend(io::Error),
    /// Shrinking a backing file failed.
    Truncate(io::Error),
    /// Mapping or remapping a backing file into memory failed.
    Map(io::Error),
    /// Writing mapped data back to its file failed.
    Sync(io::Error),
    /// Releasing a backing file failed.
    Close(io::Error),
    /// I/O outside the backing store, eg. reading a word list.
    Io(io::Error),
    /// The terminal symbol is not within `[1, max]`.
    InvalidTerminal,
    /// The maximal symbol doesn't fit into the index type.
    InvalidAlphabet,
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Open(..), Self::Open(..)) => true,
            (Self::Extend(..), Self::Extend(..)) => true,
            (Self::Truncate(..), Self::Truncate(..)) => true,
            (Self::Map(..), Self::Map(..)) => true,
            (Self::Sync(..), Self::Sync(..)) => true,
            (Self::Close(..), Self::Close(..)) => true,
            (Self::Io(..), Self::Io(..)) => true,
            (Self::InvalidTerminal, Self::InvalidTerminal) => true,
            (Self::InvalidAlphabet, Self::InvalidAlphabet) => true,
            (_, _) => false,
        }
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {}
