//! Least-significant-bit codec.
//!
//! Samples are visited in the buffer's raw order: row-major, channel
//! fastest. Embedding and extraction must agree on this order, otherwise
//! extraction silently returns the wrong bits.
//!
//! The image-level functions use value semantics: the input buffer is never
//! modified and [`embed`] returns a fresh copy.

use image::{ImageBuffer, Pixel};

use crate::error::{Error, Result};
use crate::payload::{self, ByteAssembler, TERMINATOR};

/// Number of samples (and therefore bits) an image can carry.
#[must_use]
pub fn capacity<P>(image: &ImageBuffer<P, Vec<u8>>) -> usize
where
    P: Pixel<Subpixel = u8>,
{
    usize::from(P::CHANNEL_COUNT) * image.width() as usize * image.height() as usize
}

/// Bits needed to carry `text`, terminator included.
///
/// # Errors
///
/// Returns [`Error::UnencodableChar`] if `text` has a character above `U+00FF`.
pub fn required_bits(text: &str) -> Result<usize> {
    Ok(payload::framed_bit_len(payload::encode_text(text)?.len()))
}

/// Hide `text` in a copy of `image`.
///
/// Only the least-significant bit of the first `8 * (len + 1)` samples
/// changes; every other bit of every sample is preserved.
///
/// # Errors
///
/// - [`Error::UnencodableChar`] if a character does not fit in one byte.
/// - [`Error::Capacity`] if the framed message has more bits than the image
///   has samples. The message is never truncated.
pub fn embed<P>(image: &ImageBuffer<P, Vec<u8>>, text: &str) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    let bytes = payload::encode_text(text)?;
    let bits = payload::frame_bits(&bytes);
    let available = capacity(image);

    log::debug!(
        "embedding {} message bytes ({} bits) into {available} samples",
        bytes.len(),
        bits.len()
    );

    let mut out = image.clone();
    let samples: &mut [u8] = &mut out;
    embed_bits(&mut samples[..available], &bits)?;
    Ok(out)
}

/// Recover the text hidden in `image`.
///
/// Never fails. An image without a hidden message yields an empty or
/// meaningless string; see [`extract_bytes`] for the exact scan rules.
#[must_use]
pub fn extract<P>(image: &ImageBuffer<P, Vec<u8>>) -> String
where
    P: Pixel<Subpixel = u8>,
{
    let samples: &[u8] = image;
    let bytes = extract_bytes(&samples[..capacity(image)]);
    payload::decode_text(&bytes)
}

/// Overwrite the least-significant bit of `samples[i]` with `bits[i]`.
///
/// Samples past `bits.len()` are left untouched.
///
/// # Errors
///
/// Returns [`Error::Capacity`] if `bits` is longer than `samples`.
pub fn embed_bits(samples: &mut [u8], bits: &[u8]) -> Result<()> {
    if bits.len() > samples.len() {
        return Err(Error::Capacity {
            required: bits.len(),
            available: samples.len(),
        });
    }

    for (sample, &bit) in samples.iter_mut().zip(bits) {
        *sample = (*sample & 0xFE) | (bit & 1);
    }
    Ok(())
}

/// Read least-significant bits until a byte-aligned terminator is found.
///
/// Returns the bytes preceding the terminator. Scanning stops as soon as the
/// terminator byte completes. If the samples run out first, every complete
/// byte read so far is returned and a trailing partial byte is dropped.
#[must_use]
pub fn extract_bytes(samples: &[u8]) -> Vec<u8> {
    let mut assembler = ByteAssembler::new();
    let mut bytes = Vec::new();

    for &sample in samples {
        if let Some(byte) = assembler.push(sample & 1) {
            if byte == TERMINATOR {
                log::debug!("terminator found after {} bytes", bytes.len());
                return bytes;
            }
            bytes.push(byte);
        }
    }

    log::debug!(
        "no terminator in {} samples, returning {} bytes",
        samples.len(),
        bytes.len()
    );
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb, RgbImage, RgbaImage};

    #[allow(clippy::cast_possible_truncation)]
    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 + y) as u8, (y * 13) as u8, (x ^ y) as u8])
        })
    }

    #[test]
    fn hi_in_blank_8x8_sets_expected_lsbs() {
        let img = RgbImage::new(8, 8);
        assert_eq!(capacity(&img), 192);

        let out = embed(&img, "Hi").unwrap();
        let expected = payload::frame_bits(b"Hi");
        assert_eq!(expected.len(), 24);

        let raw = out.as_raw();
        for (i, &bit) in expected.iter().enumerate() {
            assert_eq!(raw[i], bit, "sample {i}");
        }
        assert!(raw[24..].iter().all(|&s| s == 0));
        assert_eq!(extract(&out), "Hi");
    }

    #[test]
    fn capacity_error_reports_required_and_available() {
        let img = RgbImage::new(1, 1);
        match embed(&img, "Hi") {
            Err(Error::Capacity {
                required,
                available,
            }) => {
                assert_eq!(required, 24);
                assert_eq!(available, 3);
            }
            other => panic!("expected capacity error, got {other:?}"),
        }
    }

    #[test]
    fn exact_capacity_succeeds_and_one_over_fails() {
        // 8 x 1 RGB = 24 samples = "Hi" + terminator exactly.
        let exact = RgbImage::new(8, 1);
        let out = embed(&exact, "Hi").unwrap();
        assert_eq!(extract(&out), "Hi");

        // 23 grayscale samples is one short.
        let short = GrayImage::new(23, 1);
        assert!(matches!(
            embed(&short, "Hi"),
            Err(Error::Capacity {
                required: 24,
                available: 23
            })
        ));
    }

    #[test]
    fn empty_message_round_trips() {
        let img = gradient(4, 4);
        let out = embed(&img, "").unwrap();
        assert_eq!(extract(&out), "");
    }

    #[test]
    fn embed_changes_only_the_low_bit_of_the_prefix() {
        let img = gradient(16, 16);
        let text = "The quick brown fox";
        let out = embed(&img, text).unwrap();
        let used = required_bits(text).unwrap();

        for (i, (&before, &after)) in img.as_raw().iter().zip(out.as_raw()).enumerate() {
            if i < used {
                assert_eq!(before & 0xFE, after & 0xFE, "sample {i}");
            } else {
                assert_eq!(before, after, "sample {i}");
            }
        }
    }

    #[test]
    fn embed_leaves_input_untouched() {
        let img = gradient(8, 8);
        let copy = img.clone();
        let _ = embed(&img, "value semantics").unwrap();
        assert_eq!(img, copy);
    }

    #[test]
    fn works_for_other_channel_layouts() {
        let rgba = RgbaImage::new(4, 4);
        assert_eq!(capacity(&rgba), 64);
        assert_eq!(extract(&embed(&rgba, "rgba").unwrap()), "rgba");

        let gray = GrayImage::new(10, 10);
        assert_eq!(extract(&embed(&gray, "gray").unwrap()), "gray");
    }

    #[test]
    fn latin1_text_round_trips() {
        let img = gradient(20, 20);
        let text = "café ¿qué? ±½";
        assert_eq!(extract(&embed(&img, text).unwrap()), text);
    }

    #[test]
    fn wide_characters_are_rejected_before_touching_the_image() {
        let img = gradient(20, 20);
        assert!(matches!(
            embed(&img, "日本"),
            Err(Error::UnencodableChar { position: 0, .. })
        ));
    }

    #[test]
    fn extract_without_terminator_drops_partial_byte() {
        // 'A' then 3 stray bits; no terminator anywhere.
        let mut samples = payload::frame_bits(b"A")[..8].to_vec();
        samples.extend_from_slice(&[1, 1, 1]);
        assert_eq!(extract_bytes(&samples), b"A");
    }

    #[test]
    fn extract_stops_at_first_aligned_zero() {
        let mut samples = payload::frame_bits(b"ok");
        samples.extend(payload::frame_bits(b"ignored"));
        assert_eq!(extract_bytes(&samples), b"ok");
    }

    #[test]
    fn embed_bits_rejects_overflow_without_writing() {
        let mut samples = [0xFF_u8; 4];
        let err = embed_bits(&mut samples, &[0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(
            err,
            Error::Capacity {
                required: 5,
                available: 4
            }
        ));
        assert_eq!(samples, [0xFF; 4]);
    }

    #[test]
    fn required_bits_counts_terminator() {
        assert_eq!(required_bits("").unwrap(), 8);
        assert_eq!(required_bits("Hi").unwrap(), 24);
        assert!(required_bits("€").is_err());
    }
}
