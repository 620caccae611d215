//! Format tags: the only external identifiers of element type, matching the Arrow C data
//! interface's `format` field vocabulary.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A format tag identifying an element type and its physical layout family.
///
/// These strings must remain stable: they are the wire-level contract between this crate and any
/// Arrow C data interface consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Format {
    /// `b` — boolean.
    Bool,
    /// `c` — signed 8 bit integer.
    Int8,
    /// `C` — unsigned 8 bit integer.
    UInt8,
    /// `s` — signed 16 bit integer.
    Int16,
    /// `S` — unsigned 16 bit integer.
    UInt16,
    /// `i` — signed 32 bit integer.
    Int32,
    /// `I` — unsigned 32 bit integer.
    UInt32,
    /// `l` — signed 64 bit integer.
    Int64,
    /// `L` — unsigned 64 bit integer.
    UInt64,
    /// `f` — 32 bit float.
    Float32,
    /// `g` — 64 bit float.
    Float64,
    /// `u` — utf8 text, 32 bit offsets.
    Utf8,
    /// `U` — utf8 text, 64 bit offsets.
    LargeUtf8,
    /// `+l` — list, 32 bit offsets.
    List,
    /// `+L` — list, 64 bit offsets.
    LargeList,
    /// `+s` — struct.
    Struct,
    /// `+ud` — dense union. Reserved, no further semantics defined.
    DenseUnion,
    /// `+us` — sparse union. Reserved, no further semantics defined.
    SparseUnion,
}

impl Format {
    /// The canonical format string for this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Bool => "b",
            Format::Int8 => "c",
            Format::UInt8 => "C",
            Format::Int16 => "s",
            Format::UInt16 => "S",
            Format::Int32 => "i",
            Format::UInt32 => "I",
            Format::Int64 => "l",
            Format::UInt64 => "L",
            Format::Float32 => "f",
            Format::Float64 => "g",
            Format::Utf8 => "u",
            Format::LargeUtf8 => "U",
            Format::List => "+l",
            Format::LargeList => "+L",
            Format::Struct => "+s",
            Format::DenseUnion => "+ud",
            Format::SparseUnion => "+us",
        }
    }

    /// Parses a format string into a tag, returning `None` for anything unrecognized.
    pub fn parse(format: &str) -> Option<Format> {
        Some(match format {
            "b" => Format::Bool,
            "c" => Format::Int8,
            "C" => Format::UInt8,
            "s" => Format::Int16,
            "S" => Format::UInt16,
            "i" => Format::Int32,
            "I" => Format::UInt32,
            "l" => Format::Int64,
            "L" => Format::UInt64,
            "f" => Format::Float32,
            "g" => Format::Float64,
            "u" => Format::Utf8,
            "U" => Format::LargeUtf8,
            "+l" => Format::List,
            "+L" => Format::LargeList,
            "+s" => Format::Struct,
            "+ud" => Format::DenseUnion,
            "+us" => Format::SparseUnion,
            _ => return None,
        })
    }

    /// Whether this format lacks a validity buffer at `buffers[0]` (the reserved union family).
    pub fn is_union(self) -> bool {
        matches!(self, Format::DenseUnion | Format::SparseUnion)
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a primitive scalar Rust type to its format tag and byte width.
///
/// This is the Rust-idiomatic replacement for the source's `primitive_to_format<T>()` constexpr
/// function: a trait implemented once per scalar kind instead of a chain of `if constexpr`.
pub trait Primitive: Copy + PartialEq + 'static {
    /// The format tag this scalar kind is stored under.
    const FORMAT: Format;
}

macro_rules! impl_primitive {
    ($t:ty, $format:expr) => {
        impl Primitive for $t {
            const FORMAT: Format = $format;
        }
    };
}

impl_primitive!(bool, Format::Bool);
impl_primitive!(i8, Format::Int8);
impl_primitive!(u8, Format::UInt8);
impl_primitive!(i16, Format::Int16);
impl_primitive!(u16, Format::UInt16);
impl_primitive!(i32, Format::Int32);
impl_primitive!(u32, Format::UInt32);
impl_primitive!(i64, Format::Int64);
impl_primitive!(u64, Format::UInt64);
impl_primitive!(f32, Format::Float32);
impl_primitive!(f64, Format::Float64);
