//! The runtime [`Value`] sum type and its nested [`ListValue`]/[`StructValue`] handles: a
//! dynamically-typed view over any constructed array, for callers that traverse heterogeneous
//! columns uniformly instead of through the statically-typed [`crate::array::Array`] surface.

use crate::array::Array;
use crate::array::StructArray;
use crate::{ArrayRef, Error};

/// A single element of any array kind, type-erased.
///
/// `Null` is the absent marker; every other variant mirrors one [`crate::Format`] primitive, one
/// of the two UTF-8 text representations, or one of the two nested container handles. `List` and
/// `Struct` carry [`ListValue`]/[`StructValue`]: small, `Copy` handles that realize their children
/// lazily rather than eagerly materializing a `Vec<Value>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Boolean(bool),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Utf8Owned(String),
    Utf8Borrowed(&'a str),
    List(ListValue<'a>),
    Struct(StructValue<'a>),
}

/// An ordered sequence of [`Value`]s realized lazily from a flat child array and a `[begin, end)`
/// window of flat indices, rather than eagerly copied out of it.
#[derive(Clone, Copy, Debug)]
pub struct ListValue<'a> {
    child: &'a ArrayRef,
    begin: usize,
    end: usize,
}

impl<'a> PartialEq for ListValue<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.child, other.child) && self.begin == other.begin && self.end == other.end
    }
}

impl<'a> ListValue<'a> {
    pub(crate) fn new(child: &'a ArrayRef, begin: usize, end: usize) -> Self {
        ListValue { child, begin, end }
    }

    /// Number of elements in this list.
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Whether this list has no elements.
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The value at list-relative index `i`, realized from the flat child on demand.
    pub fn get(&self, i: usize) -> Result<Value<'a>, Error> {
        if i >= self.len() {
            return Err(Error::OutOfBounds {
                index: i,
                len: self.len(),
            });
        }
        element_value(self.child, self.begin + i)
    }

    /// A lazy iterator over this list's elements.
    pub fn iter(&self) -> ListValueIter<'a> {
        ListValueIter {
            value: *self,
            index: 0,
        }
    }
}

/// Iterator returned by [`ListValue::iter`].
pub struct ListValueIter<'a> {
    value: ListValue<'a>,
    index: usize,
}

impl<'a> Iterator for ListValueIter<'a> {
    type Item = Result<Value<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.value.len() {
            return None;
        }
        let item = self.value.get(self.index);
        self.index += 1;
        Some(item)
    }
}

/// An ordered mapping from field name to [`Value`], realized lazily by indexing a struct array's
/// children with one shared row index.
#[derive(Clone, Copy, Debug)]
pub struct StructValue<'a> {
    array: &'a StructArray,
    index: usize,
}

impl<'a> PartialEq for StructValue<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.array, other.array) && self.index == other.index
    }
}

impl<'a> StructValue<'a> {
    pub(crate) fn new(array: &'a StructArray, index: usize) -> Self {
        StructValue { array, index }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.array.field_names().len()
    }

    /// Whether this struct has no fields.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field names, in declaration order.
    pub fn field_names(&self) -> &'a [Box<str>] {
        self.array.field_names()
    }

    /// The value of field `field_index` for this struct's row.
    pub fn get(&self, field_index: usize) -> Result<Value<'a>, Error> {
        let fields = self.array.field_values();
        if field_index >= fields.len() {
            return Err(Error::OutOfBounds {
                index: field_index,
                len: fields.len(),
            });
        }
        element_value(&fields[field_index], self.index)
    }
}

/// Realizes the element at flat `index` of a type-erased array as a [`Value`].
fn element_value<'a>(array: &'a ArrayRef, index: usize) -> Result<Value<'a>, Error> {
    Ok(match array {
        ArrayRef::Bool(a) => a.optional_value(index)?.map_or(Value::Null, Value::Boolean),
        ArrayRef::Int8(a) => a.optional_value(index)?.map_or(Value::Null, Value::Int8),
        ArrayRef::UInt8(a) => a.optional_value(index)?.map_or(Value::Null, Value::UInt8),
        ArrayRef::Int16(a) => a.optional_value(index)?.map_or(Value::Null, Value::Int16),
        ArrayRef::UInt16(a) => a.optional_value(index)?.map_or(Value::Null, Value::UInt16),
        ArrayRef::Int32(a) => a.optional_value(index)?.map_or(Value::Null, Value::Int32),
        ArrayRef::UInt32(a) => a.optional_value(index)?.map_or(Value::Null, Value::UInt32),
        ArrayRef::Int64(a) => a.optional_value(index)?.map_or(Value::Null, Value::Int64),
        ArrayRef::UInt64(a) => a.optional_value(index)?.map_or(Value::Null, Value::UInt64),
        ArrayRef::Float32(a) => a.optional_value(index)?.map_or(Value::Null, Value::Float32),
        ArrayRef::Float64(a) => a.optional_value(index)?.map_or(Value::Null, Value::Float64),
        ArrayRef::Utf8(a) => a
            .optional_value(index)?
            .map_or(Value::Null, Value::Utf8Borrowed),
        ArrayRef::LargeUtf8(a) => a
            .optional_value(index)?
            .map_or(Value::Null, Value::Utf8Borrowed),
        ArrayRef::List(a) => a.optional_value(index)?.map_or(Value::Null, Value::List),
        ArrayRef::LargeList(a) => a.optional_value(index)?.map_or(Value::Null, Value::List),
        ArrayRef::Struct(a) => a.optional_value(index)?.map_or(Value::Null, Value::Struct),
    })
}
