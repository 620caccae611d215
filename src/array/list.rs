use std::marker::PhantomData;

use super::{Array, ArrayRef};
use crate::array_data::{fill_offsets, pack_validity};
use crate::offset::OffsetSize;
use crate::value::ListValue;
use crate::{ArrayData, ArrayDataBuilder, Buffer, Error, Format};

/// Nested list column: `[validity, offsets]` plus one type-erased child array holding the flat
/// values. `O` selects the offset width: `i32` for `+l`, `i64` for `+L`.
pub struct GenericListArray<O: OffsetSize> {
    data: ArrayData,
    offsets_ptr: *const u8,
    child: ArrayRef,
    _marker: PhantomData<O>,
}

// SAFETY: `offsets_ptr` is derived once from `data`'s second buffer, kept alive by `data`; the
// pointer is read-only.
unsafe impl<O: OffsetSize> Send for GenericListArray<O> {}
unsafe impl<O: OffsetSize> Sync for GenericListArray<O> {}

fn format_for<O: OffsetSize>() -> Format {
    if O::WIDTH == 4 {
        Format::List
    } else {
        Format::LargeList
    }
}

impl<O: OffsetSize> GenericListArray<O> {
    /// Wraps an already-built `ArrayData` record and its type-erased child array.
    pub fn try_new(data: ArrayData, child: ArrayRef) -> Result<Self, Error> {
        let expected = format_for::<O>();
        if data.format() != expected {
            return Err(Error::FormatUnsupported {
                format: data.format().to_string(),
            });
        }
        let offsets_ptr = data.buffers()[1].data();
        Ok(GenericListArray {
            data,
            offsets_ptr,
            child,
            _marker: PhantomData,
        })
    }

    /// Builds a new list array over `child`, grouping its flat rows into `sizes.len()` lists
    /// list `i` covers `sizes[i]` flat rows when `validity[i]` holds, else zero.
    pub fn from_child(child: ArrayRef, sizes: &[usize], validity: &[bool]) -> Result<Self, Error> {
        if sizes.len() != validity.len() {
            return Err(Error::LengthMismatch {
                expected: sizes.len(),
                actual: validity.len(),
            });
        }
        let length = sizes.len();
        let (validity_buf, null_count) = pack_validity(length, validity.iter().copied());
        let mut offsets = vec![O::zero(); length + 1];
        fill_offsets(sizes, validity, &mut offsets);
        let offsets_buf = Buffer::pack_pod(&offsets);

        let data = ArrayDataBuilder::new(format_for::<O>())
            .length(length)
            .null_count(null_count)
            .add_buffer(validity_buf)
            .add_buffer(offsets_buf)
            .add_child(child.array_data().clone())
            .build()?;
        Self::try_new(data, child)
    }

    /// The backing layout record.
    pub fn array_data(&self) -> &ArrayData {
        &self.data
    }

    /// The flat child array holding every list's values.
    pub fn values(&self) -> &ArrayRef {
        &self.child
    }

    fn offset_at(&self, storage_index: usize) -> usize {
        // SAFETY: `offsets_ptr` points at `data.buffers()[1]`, validated at construction to hold
        // `data.length() + 1` offsets of width `O::WIDTH`.
        unsafe { (*(self.offsets_ptr as *const O).add(storage_index)).to_usize() }
    }

    /// Number of flat rows list `i` covers.
    #[track_caller]
    pub fn list_len(&self, i: usize) -> usize {
        let len = Array::len(self);
        assert!(i < len, "index {i} out of bounds for array of length {len}");
        let storage = self.data.offset() + i;
        self.offset_at(storage + 1) - self.offset_at(storage)
    }
}

impl<O: OffsetSize> Array for GenericListArray<O> {
    type Item<'a> = ListValue<'a>;

    fn array_data(&self) -> &ArrayData {
        &self.data
    }

    #[track_caller]
    fn value(&self, i: usize) -> ListValue<'_> {
        let len = self.len();
        assert!(i < len, "index {i} out of bounds for array of length {len}");
        let storage = self.data.offset() + i;
        let begin = self.offset_at(storage);
        let end = self.offset_at(storage + 1);
        ListValue::new(&self.child, begin, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::PrimitiveArray;
    use std::sync::Arc;

    fn flat() -> ArrayRef {
        let values = [1i32, 2, 3, 4, 5];
        let validity = [true, true, true, false, true];
        let array = PrimitiveArray::<i32>::from_values(&values, &validity).unwrap();
        ArrayRef::Int32(Arc::new(array))
    }

    #[test]
    fn list_over_nullable_ints() {
        let list = GenericListArray::<i64>::from_child(flat(), &[2, 1, 2], &[true, true, true])
            .unwrap();
        assert_eq!(list.list_len(0), 2);
        assert_eq!(list.list_len(1), 1);
        assert_eq!(list.list_len(2), 2);

        // list 2 covers flat rows [3, 5): flat[3] is null, flat[4] = Some(5).
        let lv2 = list.value(2);
        assert_eq!(lv2.len(), 2);
        assert_eq!(lv2.get(0).unwrap(), crate::Value::Null);
        assert_eq!(lv2.get(1).unwrap(), crate::Value::Int32(5));
    }

    #[test]
    fn list_with_a_null_row() {
        let list =
            GenericListArray::<i64>::from_child(flat(), &[2, 1, 2], &[true, true, false]).unwrap();
        assert_eq!(list.optional_value(2).unwrap(), None);
    }
}
