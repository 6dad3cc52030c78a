//! Error types for the lsb-stego crate.

/// Errors that can occur while hiding or recovering a message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The framed message needs more samples than the carrier has.
    #[error("message needs {required} bits but the image only has {available} samples")]
    Capacity {
        /// Bits in the framed message, terminator included.
        required: usize,
        /// Samples available in the carrier image.
        available: usize,
    },

    /// A character of the message does not fit in a single byte.
    #[error("character {ch:?} at position {position} cannot be encoded as a single byte")]
    UnencodableChar {
        /// The offending character.
        ch: char,
        /// Character index within the message.
        position: usize,
    },

    /// Cover noise options are out of range.
    #[error("invalid cover noise options: {0}")]
    InvalidNoiseOptions(String),

    /// The output format would re-compress the image and destroy the payload.
    #[error("refusing to write lossy format {0}: the hidden message would not survive")]
    LossyFormat(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
