use std::marker::PhantomData;

use crate::array::Array;
use crate::array_data::{fill_offsets, pack_validity};
use crate::offset::OffsetSize;
use crate::{ArrayData, ArrayDataBuilder, Buffer, Error, Format};

/// Variable-length byte-string column: `[validity, offsets, values]`, offsets and values cached
/// as raw base pointers derived once at construction.
///
/// `O` selects the offset width: `i32` for the small format (`u`), `i64` for the big one (`U`).
/// This crate's only variable-binary format tags are the UTF-8 text family, so [`GenericBinaryArray`]
/// itself is crate-visible plumbing; [`GenericStringArray`] is the public, UTF-8-checked wrapper
/// applications construct.
pub(crate) struct GenericBinaryArray<O: OffsetSize> {
    data: ArrayData,
    offsets_ptr: *const u8,
    values_ptr: *const u8,
    _marker: PhantomData<O>,
}

// SAFETY: both pointers are derived once from `data`'s buffers, which `data` keeps alive for as
// long as this array exists; both are read-only.
unsafe impl<O: OffsetSize> Send for GenericBinaryArray<O> {}
unsafe impl<O: OffsetSize> Sync for GenericBinaryArray<O> {}

fn format_for<O: OffsetSize>() -> Format {
    if O::WIDTH == 4 {
        Format::Utf8
    } else {
        Format::LargeUtf8
    }
}

impl<O: OffsetSize> GenericBinaryArray<O> {
    pub(crate) fn try_new(data: ArrayData) -> Result<Self, Error> {
        let expected = format_for::<O>();
        if data.format() != expected {
            return Err(Error::FormatUnsupported {
                format: data.format().to_string(),
            });
        }
        let offsets_ptr = data.buffers()[1].data();
        let values_ptr = data.buffers()[2].data();
        Ok(GenericBinaryArray {
            data,
            offsets_ptr,
            values_ptr,
            _marker: PhantomData,
        })
    }

    pub(crate) fn from_byte_values<V: AsRef<[u8]>>(
        values: &[V],
        validity: &[bool],
    ) -> Result<Self, Error> {
        if values.len() != validity.len() {
            return Err(Error::LengthMismatch {
                expected: values.len(),
                actual: validity.len(),
            });
        }
        let length = values.len();
        let (validity_buf, null_count) = pack_validity(length, validity.iter().copied());

        let sizes: Vec<usize> = values.iter().map(|v| v.as_ref().len()).collect();
        let mut offsets = vec![O::zero(); length + 1];
        fill_offsets(&sizes, validity, &mut offsets);
        let offsets_buf = Buffer::pack_pod(&offsets);

        let mut payload: Vec<u8> = Vec::with_capacity(sizes.iter().sum());
        for (value, &valid) in values.iter().zip(validity) {
            if valid {
                payload.extend_from_slice(value.as_ref());
            }
        }
        let values_buf = Buffer::pack_pod(&payload);

        let data = ArrayDataBuilder::new(format_for::<O>())
            .length(length)
            .null_count(null_count)
            .add_buffer(validity_buf)
            .add_buffer(offsets_buf)
            .add_buffer(values_buf)
            .build()?;
        Self::try_new(data)
    }

    pub(crate) fn array_data(&self) -> &ArrayData {
        &self.data
    }

    fn offset_at(&self, storage_index: usize) -> usize {
        // SAFETY: `offsets_ptr` points at `data.buffers()[1]`, validated at construction to hold
        // `data.length() + 1` offsets of width `O::WIDTH`.
        unsafe { (*(self.offsets_ptr as *const O).add(storage_index)).to_usize() }
    }

    #[track_caller]
    pub(crate) fn value_bytes(&self, i: usize) -> &[u8] {
        let len = Array::len(self);
        assert!(i < len, "index {i} out of bounds for array of length {len}");
        let storage = self.data.offset() + i;
        let start = self.offset_at(storage);
        let end = self.offset_at(storage + 1);
        // SAFETY: `values_ptr` points at `data.buffers()[2]`, validated at construction to hold
        // at least `offsets[data.length()]` bytes; `start <= end <= that bound`.
        unsafe { std::slice::from_raw_parts(self.values_ptr.add(start), end - start) }
    }
}

impl<O: OffsetSize> Array for GenericBinaryArray<O> {
    type Item<'a> = &'a [u8];

    fn array_data(&self) -> &ArrayData {
        &self.data
    }

    #[track_caller]
    fn value(&self, i: usize) -> &[u8] {
        self.value_bytes(i)
    }
}

/// UTF-8 text column over the same physical layout as [`GenericBinaryArray`].
///
/// Validity is checked once, at construction: every byte slice this array hands back via
/// [`Array::value`] is guaranteed valid UTF-8, so decoding is an unchecked reinterpretation at
/// read time.
pub struct GenericStringArray<O: OffsetSize> {
    inner: GenericBinaryArray<O>,
}

impl<O: OffsetSize> GenericStringArray<O> {
    /// Wraps an already-built `ArrayData` record, checking both its format and that every valid
    /// slot holds well-formed UTF-8.
    pub fn try_new(data: ArrayData) -> Result<Self, Error> {
        let inner = GenericBinaryArray::try_new(data)?;
        for i in 0..Array::len(&inner) {
            if std::str::from_utf8(inner.value_bytes(i)).is_err() {
                return Err(Error::LayoutInvariantBroken {
                    reason: format!("element {i} is not valid utf-8"),
                });
            }
        }
        Ok(GenericStringArray { inner })
    }

    /// Builds a new array from parallel `values`/`validity` ranges.
    pub fn from_values<S: AsRef<str>>(values: &[S], validity: &[bool]) -> Result<Self, Error> {
        let bytes: Vec<&[u8]> = values.iter().map(|s| s.as_ref().as_bytes()).collect();
        let inner = GenericBinaryArray::from_byte_values(&bytes, validity)?;
        Ok(GenericStringArray { inner })
    }

    /// The backing layout record.
    pub fn array_data(&self) -> &ArrayData {
        self.inner.array_data()
    }
}

impl<O: OffsetSize> Array for GenericStringArray<O> {
    type Item<'a> = &'a str;

    fn array_data(&self) -> &ArrayData {
        self.inner.array_data()
    }

    #[track_caller]
    fn value(&self, i: usize) -> &str {
        // SAFETY: validated once for every slot in `try_new`/`from_values`.
        unsafe { std::str::from_utf8_unchecked(self.inner.value_bytes(i)) }
    }
}
