//! Hide text in the least-significant bits of raster images.
//!
//! Each character of the message becomes one byte, the bytes are expanded to
//! bits (most significant first) and followed by a zero terminator byte, and
//! every bit replaces the lowest bit of one channel sample. Samples are visited
//! row by row, channel fastest, which is the raw layout of an
//! [`image::ImageBuffer`].
//!
//! # Quick Start
//!
//! ```no_run
//! use lsb_stego::codec;
//!
//! let img = image::open("cover.png").unwrap().to_rgb8();
//! let encoded = codec::embed(&img, "meet at noon").expect("image too small");
//! assert_eq!(codec::extract(&encoded), "meet at noon");
//! encoded.save("encoded.png").unwrap();
//! ```
//!
//! # Cover noise
//!
//! An optional pass jitters about one sample in ten by ±2 while keeping every
//! sample's lowest bit, so it can run after embedding without damaging the
//! message.
//!
//! ```no_run
//! use lsb_stego::{codec, noise};
//!
//! let img = image::open("cover.png").unwrap().to_rgb8();
//! let encoded = codec::embed(&img, "meet at noon").unwrap();
//! let noisy = noise::add_cover_noise(&encoded);
//! assert_eq!(codec::extract(&noisy), "meet at noon");
//! ```
//!
//! No encryption is applied and the message does not survive lossy
//! re-compression or resizing; save encoded images as PNG, BMP, TIFF or
//! lossless WebP.

#![deny(missing_docs)]

pub mod codec;
mod engine;
pub mod error;
pub mod noise;
pub mod payload;

pub use engine::{
    default_output_path, is_supported_image, looks_printable, save_image, DecodedMessage,
    ProcessOptions, ProcessResult, SecurityLevel, StegoEngine,
};
pub use error::{Error, Result};
