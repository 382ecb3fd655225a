use super::DoubleArray;

/// Double arrays over byte alphabets with 32 bit cells.
pub type ByteDoubleArray = DoubleArray<i32, u8, 4>;

/// Wide variant for alphabets that don't fit a byte.
pub type WideDoubleArray = DoubleArray<i64, u16, 8>;
