//! The 32-bit/64-bit offset-width parameter shared by variable-binary and list arrays.
//!
//! A `BIG: bool` template parameter (`BIG = false` selects `int32_t`, `BIG = true` selects
//! `int64_t`) would be the natural C++ expression of this choice. A boolean const generic is not
//! idiomatic here; a small sealed trait over the two offset integer types reads the way buffer
//! element kinds are parameterized elsewhere in this crate.

use std::fmt::Debug;

/// A signed integer type usable as an offset: `i32` for the 32-bit offset formats (`u`, `+l`),
/// `i64` for their 64-bit counterparts (`U`, `+L`).
pub trait OffsetSize:
    Copy + Debug + PartialEq + Eq + 'static + Into<i64> + TryFrom<usize>
{
    /// Size in bytes of one offset value.
    const WIDTH: usize;

    /// Zero, as this offset type.
    fn zero() -> Self;

    /// Converts a byte length to an offset value, panicking on overflow.
    fn from_len(len: usize) -> Self {
        Self::try_from(len).unwrap_or_else(|_| panic!("length does not fit in offset type"))
    }

    /// Converts this offset back to a `usize` index, panicking if negative.
    fn to_usize(self) -> usize {
        let v: i64 = self.into();
        usize::try_from(v).expect("offset must be non-negative")
    }
}

impl OffsetSize for i32 {
    const WIDTH: usize = 4;

    fn zero() -> Self {
        0
    }
}

impl OffsetSize for i64 {
    const WIDTH: usize = 8;

    fn zero() -> Self {
        0
    }
}
