use thiserror::Error as ThisError;

/// Error type returned by fallible operations of this crate.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum Error {
    /// A values range and a validity range passed to a constructor disagreed in length.
    #[error("values and validity ranges disagree in length: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length of the values range.
        expected: usize,
        /// Length of the validity range.
        actual: usize,
    },
    /// A format tag was seen by a visitor or the base-array surface it does not know how to
    /// dispatch on.
    #[error("format '{format}' is not supported by this operation")]
    FormatUnsupported {
        /// The offending format tag.
        format: String,
    },
    /// An `ArrayData` failed a layout invariant at construction time.
    #[error("array data violates a layout invariant: {reason}")]
    LayoutInvariantBroken {
        /// Human readable description of the invariant that was violated.
        reason: String,
    },
    /// An index was out of the visible bounds of an array.
    #[error("index {index} out of bounds for array of length {len}")]
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// Visible length of the array the index was checked against.
        len: usize,
    },
}
