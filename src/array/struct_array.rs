use super::{Array, ArrayRef};
use crate::array_data::pack_validity;
use crate::value::StructValue;
use crate::{ArrayData, ArrayDataBuilder, Error, Format};

/// Struct column: `[validity]` plus one type-erased child array per field, with field names
/// carried alongside in a side table (`ArrayData` itself has no field-name concept).
#[derive(Debug)]
pub struct StructArray {
    data: ArrayData,
    fields: Vec<ArrayRef>,
    field_names: Vec<Box<str>>,
}

impl StructArray {
    /// Wraps an already-built `ArrayData` record and its type-erased field arrays, in the same
    /// order as `field_names`.
    pub fn try_new(
        data: ArrayData,
        field_names: Vec<Box<str>>,
        fields: Vec<ArrayRef>,
    ) -> Result<Self, Error> {
        if data.format() != Format::Struct {
            return Err(Error::FormatUnsupported {
                format: data.format().to_string(),
            });
        }
        if field_names.len() != fields.len() {
            return Err(Error::LengthMismatch {
                expected: field_names.len(),
                actual: fields.len(),
            });
        }
        Ok(StructArray {
            data,
            fields,
            field_names,
        })
    }

    /// Builds a new struct array from named, already-constructed field arrays and a row-level
    /// validity mask. Every field must have at least `validity.len()` stored rows.
    pub fn from_fields(
        named_fields: Vec<(&str, ArrayRef)>,
        validity: &[bool],
    ) -> Result<Self, Error> {
        let length = validity.len();
        let (validity_buf, null_count) = pack_validity(length, validity.iter().copied());

        let mut builder = ArrayDataBuilder::new(Format::Struct)
            .length(length)
            .null_count(null_count)
            .add_buffer(validity_buf);

        let mut field_names = Vec::with_capacity(named_fields.len());
        let mut fields = Vec::with_capacity(named_fields.len());
        for (name, field) in named_fields {
            builder = builder.add_child(field.array_data().clone());
            field_names.push(Box::from(name));
            fields.push(field);
        }

        let data = builder.build()?;
        Self::try_new(data, field_names, fields)
    }

    /// The backing layout record.
    pub fn array_data(&self) -> &ArrayData {
        &self.data
    }

    /// Field names, in declaration order.
    pub fn field_names(&self) -> &[Box<str>] {
        &self.field_names
    }

    /// Field arrays, in declaration order, parallel to [`StructArray::field_names`].
    pub fn field_values(&self) -> &[ArrayRef] {
        &self.fields
    }
}

impl Array for StructArray {
    type Item<'a> = StructValue<'a>;

    fn array_data(&self) -> &ArrayData {
        &self.data
    }

    #[track_caller]
    fn value(&self, i: usize) -> StructValue<'_> {
        let len = self.len();
        assert!(i < len, "index {i} out of bounds for array of length {len}");
        StructValue::new(self, i)
    }
}
