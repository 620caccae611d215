use std::marker::PhantomData;

use crate::array::Array;
use crate::array_data::pack_validity;
use crate::{ArrayData, ArrayDataBuilder, Buffer, Error, Format, Primitive};

/// A fixed-width scalar column: `[validity, values]`, values cached as a raw base pointer derived
/// once at construction.
///
/// `T` determines both the element type and, through [`Primitive::FORMAT`], the format tag this
/// array carries. Every scalar kind except `bool` shares one generic representation; `bool` gets
/// its own storage rule gated by the `bool-bitpacked` feature (see the module-level constructors
/// below), so its `Array` impl is written by hand rather than through the shared macro.
pub struct PrimitiveArray<T: Primitive> {
    data: ArrayData,
    values_ptr: *const u8,
    _marker: PhantomData<T>,
}

// SAFETY: `values_ptr` is derived once from `data`'s second buffer, which `data` (an `Arc`-shared
// `ArrayData`) keeps alive for as long as this array exists. The pointer is read-only; nothing
// ever writes through it.
unsafe impl<T: Primitive> Send for PrimitiveArray<T> {}
unsafe impl<T: Primitive> Sync for PrimitiveArray<T> {}

macro_rules! impl_primitive_array {
    ($t:ty) => {
        impl PrimitiveArray<$t> {
            /// Wraps an already-built `ArrayData` record, checking its format matches `T::FORMAT`.
            pub fn try_new(data: ArrayData) -> Result<Self, Error> {
                if data.format() != <$t as Primitive>::FORMAT {
                    return Err(Error::FormatUnsupported {
                        format: data.format().to_string(),
                    });
                }
                let values_ptr = data.buffers()[1].data();
                Ok(PrimitiveArray {
                    data,
                    values_ptr,
                    _marker: PhantomData,
                })
            }

            /// Builds a new array from parallel `values`/`validity` ranges.
            pub fn from_values(values: &[$t], validity: &[bool]) -> Result<Self, Error> {
                if values.len() != validity.len() {
                    return Err(Error::LengthMismatch {
                        expected: values.len(),
                        actual: validity.len(),
                    });
                }
                let length = values.len();
                let (validity_buf, null_count) = pack_validity(length, validity.iter().copied());
                let values_buf = Buffer::pack_pod(values);
                let data = ArrayDataBuilder::new(<$t as Primitive>::FORMAT)
                    .length(length)
                    .null_count(null_count)
                    .add_buffer(validity_buf)
                    .add_buffer(values_buf)
                    .build()?;
                Self::try_new(data)
            }

            /// The backing layout record.
            pub fn array_data(&self) -> &ArrayData {
                &self.data
            }
        }

        impl Array for PrimitiveArray<$t> {
            type Item<'a> = $t;

            fn array_data(&self) -> &ArrayData {
                &self.data
            }

            #[track_caller]
            fn value(&self, i: usize) -> $t {
                let len = self.len();
                assert!(i < len, "index {i} out of bounds for array of length {len}");
                let idx = self.data.offset() + i;
                // SAFETY: `values_ptr` points at `data.buffers()[1]`, validated at construction to
                // hold at least `data.length()` elements of this width; `idx < data.length()`.
                unsafe { *(self.values_ptr as *const $t).add(idx) }
            }
        }
    };
}

impl_primitive_array!(i8);
impl_primitive_array!(u8);
impl_primitive_array!(i16);
impl_primitive_array!(u16);
impl_primitive_array!(i32);
impl_primitive_array!(u32);
impl_primitive_array!(i64);
impl_primitive_array!(u64);
impl_primitive_array!(f32);
impl_primitive_array!(f64);

impl PrimitiveArray<bool> {
    /// Wraps an already-built `ArrayData` record for the `bool` format.
    pub fn try_new(data: ArrayData) -> Result<Self, Error> {
        if data.format() != Format::Bool {
            return Err(Error::FormatUnsupported {
                format: data.format().to_string(),
            });
        }
        let values_ptr = data.buffers()[1].data();
        Ok(PrimitiveArray {
            data,
            values_ptr,
            _marker: PhantomData,
        })
    }

    /// Builds a new `bool` array from parallel `values`/`validity` ranges.
    ///
    /// Storage is one byte per element unless the `bool-bitpacked` feature is enabled, in which
    /// case values are packed one bit per element, the same layout as the validity bitmap.
    pub fn from_values(values: &[bool], validity: &[bool]) -> Result<Self, Error> {
        if values.len() != validity.len() {
            return Err(Error::LengthMismatch {
                expected: values.len(),
                actual: validity.len(),
            });
        }
        let length = values.len();
        let (validity_buf, null_count) = pack_validity(length, validity.iter().copied());
        let values_buf = pack_bool_values(values);
        let data = ArrayDataBuilder::new(Format::Bool)
            .length(length)
            .null_count(null_count)
            .add_buffer(validity_buf)
            .add_buffer(values_buf)
            .build()?;
        Self::try_new(data)
    }

    /// The backing layout record.
    pub fn array_data(&self) -> &ArrayData {
        &self.data
    }
}

#[cfg(not(feature = "bool-bitpacked"))]
fn pack_bool_values(values: &[bool]) -> Buffer {
    let bytes: Vec<u8> = values.iter().map(|&v| v as u8).collect();
    Buffer::pack_pod(&bytes)
}

#[cfg(feature = "bool-bitpacked")]
fn pack_bool_values(values: &[bool]) -> Buffer {
    Buffer::pack_bitmap(values.iter().copied())
}

#[cfg(not(feature = "bool-bitpacked"))]
impl Array for PrimitiveArray<bool> {
    type Item<'a> = bool;

    fn array_data(&self) -> &ArrayData {
        &self.data
    }

    #[track_caller]
    fn value(&self, i: usize) -> bool {
        let len = self.len();
        assert!(i < len, "index {i} out of bounds for array of length {len}");
        let idx = self.data.offset() + i;
        // SAFETY: one byte per element, validated at construction.
        unsafe { *self.values_ptr.add(idx) != 0 }
    }
}

#[cfg(feature = "bool-bitpacked")]
impl Array for PrimitiveArray<bool> {
    type Item<'a> = bool;

    fn array_data(&self) -> &ArrayData {
        &self.data
    }

    #[track_caller]
    fn value(&self, i: usize) -> bool {
        let len = self.len();
        assert!(i < len, "index {i} out of bounds for array of length {len}");
        let idx = self.data.offset() + i;
        // SAFETY: LSB-first bit-packed, validated at construction to hold at least
        // `ceil(data.length() / 8)` bytes.
        unsafe {
            let byte = *self.values_ptr.add(idx >> 3);
            byte & (1 << (idx & 7)) != 0
        }
    }
}
