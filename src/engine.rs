//! File-level encode/decode pipeline.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::codec;
use crate::error::{Error, Result};
use crate::noise::{self, NoiseOptions};

/// How much post-processing is applied after embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityLevel {
    /// Plain LSB embedding (level 1).
    #[default]
    Basic,
    /// LSB embedding followed by a cover noise pass (level 2 and above).
    CoverNoise,
}

impl SecurityLevel {
    /// Map a numeric level to a [`SecurityLevel`]. Anything above 1 adds cover noise.
    #[must_use]
    pub fn from_level(level: u8) -> Self {
        if level > 1 {
            Self::CoverNoise
        } else {
            Self::Basic
        }
    }
}

/// Options controlling encode behavior.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Post-processing applied after embedding.
    pub security_level: SecurityLevel,
    /// Cover noise parameters, used when `security_level` asks for noise.
    pub noise: NoiseOptions,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Result of encoding a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the input file.
    pub path: PathBuf,
    /// Path the encoded image was written to, if any.
    pub output: Option<PathBuf>,
    /// Whether processing succeeded.
    pub success: bool,
    /// Bits written, terminator included.
    pub bits_used: usize,
    /// Samples available in the carrier.
    pub capacity: usize,
    /// Human-readable status message.
    pub message: String,
}

/// A message recovered from an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    /// The recovered text.
    pub text: String,
    /// Heuristic presence signal: non-empty and free of control characters
    /// other than whitespace. Carriers with no hidden message usually fail it.
    pub printable: bool,
}

impl DecodedMessage {
    fn new(text: String) -> Self {
        let printable = looks_printable(&text);
        Self { text, printable }
    }
}

/// Stateless entry point tying the codec, cover noise, and image I/O together.
#[derive(Debug, Clone, Copy, Default)]
pub struct StegoEngine;

impl StegoEngine {
    /// Create a new engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hide `text` in a copy of `image`, adding cover noise if requested.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Capacity`] or [`Error::UnencodableChar`] from the codec,
    /// or [`Error::InvalidNoiseOptions`] if noise is requested with bad options.
    pub fn encode_image(
        &self,
        image: &RgbImage,
        text: &str,
        opts: &ProcessOptions,
    ) -> Result<RgbImage> {
        let encoded = codec::embed(image, text)?;
        match opts.security_level {
            SecurityLevel::Basic => Ok(encoded),
            SecurityLevel::CoverNoise => {
                noise::add_cover_noise_with(&encoded, &opts.noise, &mut rand::thread_rng())
            }
        }
    }

    /// Recover the hidden text from `image`.
    #[must_use]
    pub fn decode_image(&self, image: &RgbImage) -> DecodedMessage {
        DecodedMessage::new(codec::extract(image))
    }

    /// Encode a single image file: load, embed, optional noise, save.
    ///
    /// Returns a [`ProcessResult`] indicating success or failure.
    #[must_use]
    pub fn encode_file(
        &self,
        input: &Path,
        output: &Path,
        text: &str,
        opts: &ProcessOptions,
    ) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            output: None,
            success: false,
            bits_used: 0,
            capacity: 0,
            message: String::new(),
        };

        let rgb_img = match image::open(input) {
            Ok(img) => img.to_rgb8(),
            Err(e) => {
                result.message = format!("Failed to load: {e}");
                return result;
            }
        };
        result.capacity = codec::capacity(&rgb_img);
        log::trace!(
            "{}: {}x{} carrier, {} samples",
            input.display(),
            rgb_img.width(),
            rgb_img.height(),
            result.capacity
        );

        let outcome = codec::required_bits(text)
            .and_then(|bits| self.encode_image(&rgb_img, text, opts).map(|img| (bits, img)));
        let encoded = match outcome {
            Ok((bits, img)) => {
                result.bits_used = bits;
                img
            }
            Err(e) => {
                result.message = format!("Failed to encode: {e}");
                return result;
            }
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    result.message = format!("Failed to create output directory: {e}");
                    return result;
                }
            }
        }

        match save_image(&encoded, output) {
            Ok(()) => {
                result.success = true;
                result.output = Some(output.to_path_buf());
                result.message = match opts.security_level {
                    SecurityLevel::Basic => "Message hidden".to_string(),
                    SecurityLevel::CoverNoise => "Message hidden (cover noise applied)".to_string(),
                };
            }
            Err(e) => {
                result.message = format!("Failed to save: {e}");
            }
        }

        result
    }

    /// Decode the hidden message from an image file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] if the file cannot be read or decoded.
    pub fn decode_file(&self, input: &Path) -> Result<DecodedMessage> {
        let rgb_img = image::open(input)?.to_rgb8();
        log::trace!("{}: decoding {} samples", input.display(), codec::capacity(&rgb_img));
        Ok(self.decode_image(&rgb_img))
    }

    /// Encode the same message into every supported image in a directory.
    ///
    /// Outputs are written to `output_dir` as `{stem}.png`. Uses parallel
    /// iteration when the `cli` feature is enabled (via rayon).
    #[must_use]
    pub fn encode_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        text: &str,
        opts: &ProcessOptions,
    ) -> Vec<ProcessResult> {
        let failed = |path: &Path, message: String| ProcessResult {
            path: path.to_path_buf(),
            output: None,
            success: false,
            bits_used: 0,
            capacity: 0,
            message,
        };

        let entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![failed(input_dir, format!("Failed to read directory: {e}"))];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![failed(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        let encode_one = |input_path: &PathBuf| {
            let output_path = output_dir.join(png_file_name(input_path));
            self.encode_file(input_path, &output_path, text, opts)
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            entries.par_iter().map(encode_one).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            entries.iter().map(encode_one).collect()
        }
    }
}

/// Heuristic check that decoded text looks like a real message.
#[must_use]
pub fn looks_printable(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| !c.is_control() || c.is_whitespace())
}

/// Check if a file has a supported input image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp" | "tif" | "tiff"
        ),
        None => false,
    }
}

/// Save an RGB image in a lossless format.
///
/// # Errors
///
/// Returns [`Error::LossyFormat`] for JPEG or AVIF, [`Error::UnsupportedFormat`] for
/// formats that cannot be written, or an I/O / encode error if writing fails.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff | ImageFormat::WebP => {
            img.save_with_format(path, format)?;
        }
        ImageFormat::Jpeg | ImageFormat::Avif => {
            return Err(Error::LossyFormat(format!("{format:?}")));
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_encoded.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_encoded.png"))
}

fn png_file_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    format!("{stem}.png")
}
