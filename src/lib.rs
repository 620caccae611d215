//! # About
//!
//! `columnar-core` is the in-memory layout-and-access layer of a typed, nullable, columnar data
//! library: a shared byte [`Buffer`], a format-tagged [`ArrayData`] record binding buffers,
//! children, and a dictionary together, a family of typed arrays built on top of it
//! ([`array::PrimitiveArray`], [`array::GenericStringArray`], [`array::GenericListArray`],
//! [`array::StructArray`]), and a type-erased [`ArrayRef`]/[`Value`] surface for callers that
//! cannot statically know which kind of column they hold.
//!
//! The buffer layout this crate produces matches the Arrow C data interface's `format` tag
//! vocabulary (see [`Format`]), so arrays built here can be handed to, or received from, any
//! consumer speaking that convention.
//!
//! ```
//! use columnar_core::array::{Array, PrimitiveArray};
//!
//! let values = [1i32, 2, 3, 4, 5];
//! let validity = [true, true, true, false, true];
//! let array = PrimitiveArray::<i32>::from_values(&values, &validity).unwrap();
//! assert_eq!(array.len(), 5);
//! assert_eq!(array.optional_value(3).unwrap(), None);
//! assert_eq!(array.optional_value(4).unwrap(), Some(5));
//! ```

mod array_data;
mod buffer;
mod error;
mod format;
mod offset;
mod value;

pub mod array;

pub use array_data::{ArrayData, ArrayDataBuilder};
pub use buffer::Buffer;
pub use error::Error;
pub use format::{Format, Primitive};
pub use offset::OffsetSize;

pub use array::{ArrayRef, Visitor};
pub use value::{ListValue, StructValue, Value};
