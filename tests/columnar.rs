//! End-to-end scenarios exercising each typed array kind and the format-tag visitor, one test
//! per scenario.

use std::sync::Arc;

use columnar_core::array::{
    Array, GenericListArray, GenericStringArray, PrimitiveArray, StructArray,
};
use columnar_core::{ArrayRef, Format, Value, Visitor};
use test_case::test_case;

#[test]
fn s1_numeric_with_nulls() {
    let values = [1i32, 2, 3, 4, 5];
    let validity = [true, true, true, false, true];
    let array = PrimitiveArray::<i32>::from_values(&values, &validity).unwrap();

    assert_eq!(array.len(), 5);
    for i in 0..5 {
        assert_eq!(array.value(i), values[i]);
        assert_eq!(array.is_valid(i).unwrap(), validity[i]);
    }
    assert_eq!(array.array_data().null_count(), 1);
    assert_eq!(array.optional_value(3).unwrap(), None);
}

#[test]
fn s2_big_strings_with_an_empty_and_a_null() {
    let values = ["hello", "world", "bolt", "is", "", "awesome"];
    let validity = [true, true, true, true, false, true];
    let array = GenericStringArray::<i64>::from_values(&values, &validity).unwrap();

    assert_eq!(array.len(), 6);
    assert_eq!(array.value(0), "hello");
    assert_eq!(array.value(4), "");
    assert!(!array.is_valid(4).unwrap());
    assert_eq!(array.array_data().null_count(), 1);

    let offsets: &[i64] = unsafe { array.array_data().buffers()[1].typed_view() };
    assert_eq!(&offsets[..7], &[0, 5, 10, 14, 16, 16, 23]);
}

#[test]
fn s3_list_over_nullable_ints() {
    let flat_values = [1i32, 2, 3, 4, 5];
    let flat_validity = [true, true, true, false, true];
    let flat = PrimitiveArray::<i32>::from_values(&flat_values, &flat_validity).unwrap();
    let child = ArrayRef::Int32(Arc::new(flat));

    let list = GenericListArray::<i64>::from_child(child, &[2, 1, 2], &[true, true, true]).unwrap();

    for (i, size) in [2usize, 1, 2].into_iter().enumerate() {
        assert_eq!(list.list_len(i), size);
    }

    let lists: Vec<_> = list.value_range().collect();
    assert_eq!(lists.len(), 3);
    // list 2 covers flat rows [3, 5): flat[3] is null, flat[4] = Some(5).
    assert_eq!(lists[2].len(), 2);
    assert_eq!(lists[2].get(0).unwrap(), Value::Null);
    assert_eq!(lists[2].get(1).unwrap(), Value::Int32(5));
}

#[test]
fn s4_list_with_a_null_row() {
    let flat_values = [1i32, 2, 3, 4, 5];
    let flat_validity = [true, true, true, false, true];
    let flat = PrimitiveArray::<i32>::from_values(&flat_values, &flat_validity).unwrap();
    let child = ArrayRef::Int32(Arc::new(flat));

    let list =
        GenericListArray::<i64>::from_child(child, &[2, 1, 2], &[true, true, false]).unwrap();

    assert_eq!(list.optional_value(2).unwrap(), None);
}

#[test]
fn s5_struct_with_three_fields() {
    let foo = PrimitiveArray::<i32>::from_values(&[1, 2, 3, 4, 5], &[true; 5]).unwrap();
    let bar = PrimitiveArray::<u8>::from_values(&[6, 7, 8, 9, 10], &[true; 5]).unwrap();
    let foobar = GenericStringArray::<i64>::from_values(
        &["hello", "world", "bolt", "is", "awesome"],
        &[true; 5],
    )
    .unwrap();

    let array = StructArray::from_fields(
        vec![
            ("foo", ArrayRef::Int32(Arc::new(foo))),
            ("bar", ArrayRef::UInt8(Arc::new(bar))),
            ("foobar", ArrayRef::LargeUtf8(Arc::new(foobar))),
        ],
        &[true; 5],
    )
    .unwrap();

    assert_eq!(array.len(), 5);
    let names: Vec<&str> = array.field_names().iter().map(|b| b.as_ref()).collect();
    assert_eq!(names, vec!["foo", "bar", "foobar"]);

    for i in 0..5 {
        let row = array.value(i);
        assert_eq!(row.get(0).unwrap(), Value::Int32(1 + i as i32));
        assert_eq!(row.get(1).unwrap(), Value::UInt8(6 + i as u8));
        assert!(matches!(row.get(2).unwrap(), Value::Utf8Borrowed(_)));
    }
}

/// Records which `Visitor` arm fired, for the S6 dispatch matrix below.
struct RecordingVisitor {
    seen: Option<Format>,
}

impl Visitor for RecordingVisitor {
    type Output = ();

    fn visit_bool(&mut self, _array: &PrimitiveArray<bool>) {
        self.seen = Some(Format::Bool);
    }
    fn visit_int8(&mut self, _array: &PrimitiveArray<i8>) {
        self.seen = Some(Format::Int8);
    }
    fn visit_uint8(&mut self, _array: &PrimitiveArray<u8>) {
        self.seen = Some(Format::UInt8);
    }
    fn visit_int16(&mut self, _array: &PrimitiveArray<i16>) {
        self.seen = Some(Format::Int16);
    }
    fn visit_uint16(&mut self, _array: &PrimitiveArray<u16>) {
        self.seen = Some(Format::UInt16);
    }
    fn visit_int32(&mut self, _array: &PrimitiveArray<i32>) {
        self.seen = Some(Format::Int32);
    }
    fn visit_uint32(&mut self, _array: &PrimitiveArray<u32>) {
        self.seen = Some(Format::UInt32);
    }
    fn visit_int64(&mut self, _array: &PrimitiveArray<i64>) {
        self.seen = Some(Format::Int64);
    }
    fn visit_uint64(&mut self, _array: &PrimitiveArray<u64>) {
        self.seen = Some(Format::UInt64);
    }
    fn visit_float32(&mut self, _array: &PrimitiveArray<f32>) {
        self.seen = Some(Format::Float32);
    }
    fn visit_float64(&mut self, _array: &PrimitiveArray<f64>) {
        self.seen = Some(Format::Float64);
    }
    fn visit_utf8(&mut self, _array: &GenericStringArray<i32>) {
        self.seen = Some(Format::Utf8);
    }
    fn visit_large_utf8(&mut self, _array: &GenericStringArray<i64>) {
        self.seen = Some(Format::LargeUtf8);
    }
    fn visit_list(&mut self, _array: &GenericListArray<i32>) {
        self.seen = Some(Format::List);
    }
    fn visit_large_list(&mut self, _array: &GenericListArray<i64>) {
        self.seen = Some(Format::LargeList);
    }
    fn visit_struct(&mut self, _array: &StructArray) {
        self.seen = Some(Format::Struct);
    }
}

fn minimum_array(format: Format) -> ArrayRef {
    match format {
        Format::Bool => ArrayRef::Bool(Arc::new(
            PrimitiveArray::<bool>::from_values(&[true], &[true]).unwrap(),
        )),
        Format::Int8 => ArrayRef::Int8(Arc::new(
            PrimitiveArray::<i8>::from_values(&[1], &[true]).unwrap(),
        )),
        Format::UInt8 => ArrayRef::UInt8(Arc::new(
            PrimitiveArray::<u8>::from_values(&[1], &[true]).unwrap(),
        )),
        Format::Int16 => ArrayRef::Int16(Arc::new(
            PrimitiveArray::<i16>::from_values(&[1], &[true]).unwrap(),
        )),
        Format::UInt16 => ArrayRef::UInt16(Arc::new(
            PrimitiveArray::<u16>::from_values(&[1], &[true]).unwrap(),
        )),
        Format::Int32 => ArrayRef::Int32(Arc::new(
            PrimitiveArray::<i32>::from_values(&[1], &[true]).unwrap(),
        )),
        Format::UInt32 => ArrayRef::UInt32(Arc::new(
            PrimitiveArray::<u32>::from_values(&[1], &[true]).unwrap(),
        )),
        Format::Int64 => ArrayRef::Int64(Arc::new(
            PrimitiveArray::<i64>::from_values(&[1], &[true]).unwrap(),
        )),
        Format::UInt64 => ArrayRef::UInt64(Arc::new(
            PrimitiveArray::<u64>::from_values(&[1], &[true]).unwrap(),
        )),
        Format::Float32 => ArrayRef::Float32(Arc::new(
            PrimitiveArray::<f32>::from_values(&[1.0], &[true]).unwrap(),
        )),
        Format::Float64 => ArrayRef::Float64(Arc::new(
            PrimitiveArray::<f64>::from_values(&[1.0], &[true]).unwrap(),
        )),
        Format::Utf8 => ArrayRef::Utf8(Arc::new(
            GenericStringArray::<i32>::from_values(&["a"], &[true]).unwrap(),
        )),
        Format::LargeUtf8 => ArrayRef::LargeUtf8(Arc::new(
            GenericStringArray::<i64>::from_values(&["a"], &[true]).unwrap(),
        )),
        Format::List => {
            let child = minimum_array(Format::Int32);
            ArrayRef::List(Arc::new(
                GenericListArray::<i32>::from_child(child, &[1], &[true]).unwrap(),
            ))
        }
        Format::LargeList => {
            let child = minimum_array(Format::Int32);
            ArrayRef::LargeList(Arc::new(
                GenericListArray::<i64>::from_child(child, &[1], &[true]).unwrap(),
            ))
        }
        Format::Struct => ArrayRef::Struct(Arc::new(
            StructArray::from_fields(
                vec![("only", minimum_array(Format::Int32))],
                &[true],
            )
            .unwrap(),
        )),
        Format::DenseUnion | Format::SparseUnion => {
            unreachable!("unions have no constructible typed array")
        }
    }
}

#[test_case(Format::Bool; "bool")]
#[test_case(Format::Int8; "int8")]
#[test_case(Format::UInt8; "uint8")]
#[test_case(Format::Int16; "int16")]
#[test_case(Format::UInt16; "uint16")]
#[test_case(Format::Int32; "int32")]
#[test_case(Format::UInt32; "uint32")]
#[test_case(Format::Int64; "int64")]
#[test_case(Format::UInt64; "uint64")]
#[test_case(Format::Float32; "float32")]
#[test_case(Format::Float64; "float64")]
#[test_case(Format::Utf8; "utf8")]
#[test_case(Format::LargeUtf8; "large utf8")]
#[test_case(Format::List; "list")]
#[test_case(Format::LargeList; "large list")]
#[test_case(Format::Struct; "struct")]
fn s6_visitor_dispatch_enters_exactly_the_matching_branch(format: Format) {
    let array = minimum_array(format);
    let mut visitor = RecordingVisitor { seen: None };
    array.accept(&mut visitor);
    assert_eq!(visitor.seen, Some(format));
}
