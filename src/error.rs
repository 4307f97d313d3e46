use thiserror::Error;

/// I/O errors that can occur when loading image bytes from a source
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// File or object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource exceeds the configured size limit
    #[error("File too large: {identifier} is {size} bytes, limit is {limit}")]
    TooLarge {
        identifier: String,
        size: u64,
        limit: u64,
    },

    /// Any other read failure
    #[error("Read error for {identifier}: {message}")]
    Read { identifier: String, message: String },
}

/// Errors that can occur while decoding EXIF/TIFF metadata
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExifError {
    /// A read would go past the end of the buffer
    #[error("Read out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    OutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// Structural violation in a tag directory (truncated table, bad type code, bad pointer)
    #[error("Malformed directory at offset {offset}: {reason}")]
    MalformedDirectory { offset: u64, reason: String },

    /// A directory offset points backwards or at a directory already parsed
    #[error("Cyclic directory reference to offset {offset}")]
    CyclicDirectory { offset: u64 },

    /// GPS hemisphere or altitude reference outside the allowed set
    #[error("Invalid GPS reference: {0:?}")]
    InvalidReference(String),

    /// A rational number with a zero denominator was evaluated
    #[error("Division by zero in rational value")]
    DivisionByZero,

    /// Byte order marker is neither "II" nor "MM"
    #[error("Unsupported byte order marker: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    UnsupportedByteOrder(u16),

    /// TIFF magic number is not 42
    #[error("Invalid TIFF version: expected 42, got {0}")]
    InvalidVersion(u16),

    /// Decoded byte length does not match `type_size * count`
    #[error("Value length mismatch: expected {expected} bytes, got {actual}")]
    ValueLengthMismatch { expected: u64, actual: u64 },

    /// A well-known tag is present but has the wrong type or count
    #[error("Invalid tag value for {tag}: {message}")]
    InvalidTagValue { tag: &'static str, message: String },

    /// JPEG marker structure is broken before the Exif segment was found
    #[error("Malformed JPEG segment at offset {offset}: {reason}")]
    MalformedSegment { offset: u64, reason: String },

    /// Container was recognized but carries no Exif payload
    #[error("No Exif data found")]
    NoExifData,
}

impl ExifError {
    pub(crate) fn malformed(offset: impl Into<u64>, reason: impl Into<String>) -> Self {
        ExifError::MalformedDirectory {
            offset: offset.into(),
            reason: reason.into(),
        }
    }
}

/// Errors produced when inspecting a file end to end
#[derive(Debug, Clone, Error)]
pub enum InspectError {
    /// Loading the file failed
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Decoding the metadata failed
    #[error("Exif error: {0}")]
    Exif(#[from] ExifError),

    /// The blocking parse task was cancelled or panicked
    #[error("Parse task failed: {0}")]
    Task(String),
}
