use std::sync::Arc;

use log::debug;

use crate::{Buffer, Error, Format};

/// Layout-neutral record backing every typed array: a format tag, logical length and offset, null
/// count, buffers, children, and an optional dictionary.
///
/// `ArrayData` is cheap to clone (an `Arc` bump) and, once built, has no mutator surface: all
/// construction-time mutation happens through [`ArrayDataBuilder`].
#[derive(Debug, Clone)]
pub struct ArrayData {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    format: Format,
    length: usize,
    offset: usize,
    null_count: usize,
    buffers: Vec<Buffer>,
    children: Vec<ArrayData>,
    dictionary: Option<ArrayData>,
}

impl ArrayData {
    /// The format tag of this array.
    pub fn format(&self) -> Format {
        self.inner.format
    }

    /// Logical row count as stored, before slicing.
    pub fn length(&self) -> usize {
        self.inner.length
    }

    /// Logical offset into the stored buffers.
    pub fn offset(&self) -> usize {
        self.inner.offset
    }

    /// Visible element count, `length - offset`.
    pub fn size(&self) -> usize {
        self.inner.length - self.inner.offset
    }

    /// Number of invalid elements in the visible window.
    pub fn null_count(&self) -> usize {
        self.inner.null_count
    }

    /// The buffers backing this array, in the order prescribed by its format.
    pub fn buffers(&self) -> &[Buffer] {
        &self.inner.buffers
    }

    /// Child array-data, e.g. list values or struct fields.
    pub fn children(&self) -> &[ArrayData] {
        &self.inner.children
    }

    /// The dictionary array-data, for dictionary-encoded columns.
    pub fn dictionary(&self) -> Option<&ArrayData> {
        self.inner.dictionary.as_ref()
    }
}

/// Builds an [`ArrayData`] record, validating the buffer-layout invariants on [`Self::build`].
///
/// This is the idiomatic Rust substitute for mutable setters (`set_length`, `set_offset`, …): a
/// consuming builder rather than mutable accessors on a published record.
pub struct ArrayDataBuilder {
    format: Format,
    length: usize,
    offset: usize,
    null_count: usize,
    buffers: Vec<Buffer>,
    children: Vec<ArrayData>,
    dictionary: Option<ArrayData>,
}

impl ArrayDataBuilder {
    /// Starts building an `ArrayData` record for the given format tag.
    pub fn new(format: Format) -> Self {
        ArrayDataBuilder {
            format,
            length: 0,
            offset: 0,
            null_count: 0,
            buffers: Vec::new(),
            children: Vec::new(),
            dictionary: None,
        }
    }

    /// Sets the stored logical length.
    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Sets the logical slice offset.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the null count of the visible window.
    pub fn null_count(mut self, null_count: usize) -> Self {
        self.null_count = null_count;
        self
    }

    /// Appends a buffer.
    pub fn add_buffer(mut self, buffer: Buffer) -> Self {
        self.buffers.push(buffer);
        self
    }

    /// Appends a child array-data.
    pub fn add_child(mut self, child: ArrayData) -> Self {
        self.children.push(child);
        self
    }

    /// Attaches a dictionary array-data.
    pub fn dictionary(mut self, dictionary: ArrayData) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// Validates the buffer-layout invariants and assembles the immutable `ArrayData`.
    pub fn build(self) -> Result<ArrayData, Error> {
        validate(&self)?;
        debug!(
            "built ArrayData format={} length={} offset={} null_count={} buffers={} children={}",
            self.format,
            self.length,
            self.offset,
            self.null_count,
            self.buffers.len(),
            self.children.len(),
        );
        Ok(ArrayData {
            inner: Arc::new(Inner {
                format: self.format,
                length: self.length,
                offset: self.offset,
                null_count: self.null_count,
                buffers: self.buffers,
                children: self.children,
                dictionary: self.dictionary,
            }),
        })
    }
}

fn broken(reason: impl Into<String>) -> Error {
    Error::LayoutInvariantBroken {
        reason: reason.into(),
    }
}

fn validate(b: &ArrayDataBuilder) -> Result<(), Error> {
    if b.offset > b.length {
        return Err(broken(format!(
            "offset {} is greater than length {}",
            b.offset, b.length
        )));
    }
    let visible = b.length - b.offset;
    if b.null_count > visible {
        return Err(broken(format!(
            "null_count {} exceeds visible length {}",
            b.null_count, visible
        )));
    }

    if b.format.is_union() {
        // Validity and child layout for unions are reserved, not yet fully defined.
        return Ok(());
    }

    let validity = b
        .buffers
        .first()
        .ok_or_else(|| broken("missing validity buffer at buffers[0]"))?;
    let min_validity_bytes = (b.length + 7) / 8;
    if validity.size() < min_validity_bytes {
        return Err(broken(format!(
            "validity buffer has {} bytes, needs at least {}",
            validity.size(),
            min_validity_bytes
        )));
    }

    match b.format {
        Format::Utf8 => validate_offsets::<i32>(b, false),
        Format::LargeUtf8 => validate_offsets::<i64>(b, false),
        Format::List => validate_offsets::<i32>(b, true),
        Format::LargeList => validate_offsets::<i64>(b, true),
        Format::Struct => validate_struct(b, visible),
        _ => validate_primitive(b),
    }
}

fn validate_primitive(b: &ArrayDataBuilder) -> Result<(), Error> {
    if b.buffers.len() != 2 {
        return Err(broken(format!(
            "primitive format '{}' expects 2 buffers, got {}",
            b.format,
            b.buffers.len()
        )));
    }
    let values = &b.buffers[1];

    #[cfg(feature = "bool-bitpacked")]
    if b.format == Format::Bool {
        let needed = (b.length + 7) / 8;
        if values.size() < needed {
            return Err(broken(format!(
                "values buffer has {} bytes, needs at least {}",
                values.size(),
                needed
            )));
        }
        return Ok(());
    }

    let width = primitive_width(b.format);
    let needed = b.length * width;
    if values.size() < needed {
        return Err(broken(format!(
            "values buffer has {} bytes, needs at least {}",
            values.size(),
            needed
        )));
    }
    Ok(())
}

#[cfg(feature = "bool-bitpacked")]
fn primitive_width(format: Format) -> usize {
    match format {
        Format::Bool => unreachable!("Format::Bool is handled separately in validate_primitive"),
        Format::Int8 | Format::UInt8 => 1,
        Format::Int16 | Format::UInt16 => 2,
        Format::Int32 | Format::UInt32 | Format::Float32 => 4,
        Format::Int64 | Format::UInt64 | Format::Float64 => 8,
        other => unreachable!("not a primitive format: {other}"),
    }
}

#[cfg(not(feature = "bool-bitpacked"))]
fn primitive_width(format: Format) -> usize {
    match format {
        Format::Bool | Format::Int8 | Format::UInt8 => 1,
        Format::Int16 | Format::UInt16 => 2,
        Format::Int32 | Format::UInt32 | Format::Float32 => 4,
        Format::Int64 | Format::UInt64 | Format::Float64 => 8,
        other => unreachable!("not a primitive format: {other}"),
    }
}

/// Offset-typed validation shared by variable-binary (`is_list = false`) and list (`is_list =
/// true`) formats: `buffers[1]` must hold `length + 1` monotone offsets starting at 0, and the
/// payload (`buffers[2]` for variable-binary, `children[0].length()` for lists) must be large
/// enough to cover `offsets[length]`.
fn validate_offsets<O>(b: &ArrayDataBuilder, is_list: bool) -> Result<(), Error>
where
    O: OffsetWidth,
{
    let expected_buffers = if is_list { 2 } else { 3 };
    if b.buffers.len() != expected_buffers {
        return Err(broken(format!(
            "format '{}' expects {} buffers, got {}",
            b.format,
            expected_buffers,
            b.buffers.len()
        )));
    }
    if is_list && b.children.len() != 1 {
        return Err(broken(format!(
            "list format '{}' expects exactly 1 child, got {}",
            b.format,
            b.children.len()
        )));
    }

    let offsets_buf = &b.buffers[1];
    let min_offsets_bytes = (b.length + 1) * O::WIDTH;
    if offsets_buf.size() < min_offsets_bytes {
        return Err(broken(format!(
            "offsets buffer has {} bytes, needs at least {}",
            offsets_buf.size(),
            min_offsets_bytes
        )));
    }
    // SAFETY: just checked `offsets_buf` holds at least `length + 1` values of width
    // `O::WIDTH`, and `O` is always `i32` or `i64`, both naturally aligned for a freshly
    // allocated buffer.
    let offsets: &[O] = unsafe { offsets_buf.typed_view::<O>() };
    if offsets[0].to_i64() != 0 {
        return Err(broken(format!(
            "offsets[0] must be 0, got {}",
            offsets[0].to_i64()
        )));
    }
    for i in 0..b.length {
        if offsets[i + 1].to_i64() < offsets[i].to_i64() {
            return Err(broken(format!(
                "offsets must be non-decreasing, offsets[{}]={} > offsets[{}]={}",
                i,
                offsets[i].to_i64(),
                i + 1,
                offsets[i + 1].to_i64()
            )));
        }
    }
    let last = offsets[b.length].to_i64();

    if is_list {
        let child_len = b.children[0].length() as i64;
        if last > child_len {
            return Err(broken(format!(
                "offsets[length]={} exceeds child length {}",
                last, child_len
            )));
        }
    } else {
        let values = &b.buffers[2];
        if (values.size() as i64) < last {
            return Err(broken(format!(
                "values buffer has {} bytes, needs at least {}",
                values.size(),
                last
            )));
        }
    }
    Ok(())
}

fn validate_struct(b: &ArrayDataBuilder, visible: usize) -> Result<(), Error> {
    if b.buffers.len() != 1 {
        return Err(broken(format!(
            "struct format expects 1 buffer, got {}",
            b.buffers.len()
        )));
    }
    for (i, child) in b.children.iter().enumerate() {
        if child.length() < visible {
            return Err(broken(format!(
                "struct field {} has length {}, shorter than parent visible length {}",
                i,
                child.length(),
                visible
            )));
        }
    }
    Ok(())
}

/// Sealed helper trait letting `validate_offsets` be generic over `i32`/`i64` offsets.
trait OffsetWidth: Copy {
    const WIDTH: usize;
    fn to_i64(self) -> i64;
}

impl OffsetWidth for i32 {
    const WIDTH: usize = 4;
    fn to_i64(self) -> i64 {
        self as i64
    }
}

impl OffsetWidth for i64 {
    const WIDTH: usize = 8;
    fn to_i64(self) -> i64 {
        self
    }
}

/// Packs a validity mask into an LSB-first bitmap and counts the invalid elements, in one pass.
pub fn pack_validity<I>(length: usize, validity: I) -> (Buffer, usize)
where
    I: IntoIterator<Item = bool>,
{
    let mut bytes = vec![0u8; (length + 7) / 8];
    let mut null_count = 0usize;
    for (i, valid) in validity.into_iter().enumerate().take(length) {
        if valid {
            bytes[i >> 3] |= 1 << (i & 7);
        } else {
            null_count += 1;
        }
    }
    (Buffer::pack_pod(&bytes), null_count)
}

/// Writes `length + 1` offsets into `out`: `out[0] = 0`, and `out[i + 1] = out[i] + sizes[i]` when
/// `validity[i]` holds, else `out[i + 1] = out[i]`.
pub fn fill_offsets<O: crate::offset::OffsetSize>(
    sizes: &[usize],
    validity: &[bool],
    out: &mut [O],
) {
    assert_eq!(sizes.len(), validity.len());
    assert_eq!(out.len(), sizes.len() + 1);
    out[0] = O::zero();
    for i in 0..sizes.len() {
        let step = if validity[i] { sizes[i] } else { 0 };
        out[i + 1] = O::from_len(out[i].to_usize() + step);
    }
}
