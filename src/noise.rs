//! Parity-preserving cover noise.
//!
//! Jitters a random subset of samples by a small even-sized step to blur the
//! statistical flatness that LSB embedding leaves behind. The least-significant
//! bit of every sample is kept, so a message embedded by [`crate::codec`]
//! survives the pass wherever it sits in the image.

use image::RgbImage;
use rand::Rng;

use crate::error::{Error, Result};

/// Default per-sample selection probability.
pub const DEFAULT_PROBABILITY: f64 = 0.1;

/// Default jitter magnitude.
pub const DEFAULT_AMPLITUDE: u8 = 2;

/// Options controlling the cover noise pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseOptions {
    /// Probability that a given sample is perturbed (0.0-1.0).
    pub probability: f64,
    /// Magnitude of the signed jitter applied to a selected sample. Must be even.
    pub amplitude: u8,
}

impl Default for NoiseOptions {
    fn default() -> Self {
        Self {
            probability: DEFAULT_PROBABILITY,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }
}

impl NoiseOptions {
    /// Check that the options describe a usable noise pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNoiseOptions`] if `probability` is outside
    /// `[0, 1]` or `amplitude` is zero or odd.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(Error::InvalidNoiseOptions(format!(
                "probability {} is outside [0, 1]",
                self.probability
            )));
        }
        if self.amplitude == 0 {
            return Err(Error::InvalidNoiseOptions(
                "amplitude must be non-zero".to_string(),
            ));
        }
        if self.amplitude % 2 != 0 {
            return Err(Error::InvalidNoiseOptions(format!(
                "amplitude {} must be even",
                self.amplitude
            )));
        }
        Ok(())
    }
}

/// Apply the default cover noise to a copy of `image` using the thread RNG.
#[must_use]
pub fn add_cover_noise(image: &RgbImage) -> RgbImage {
    let mut out = image.clone();
    perturb_samples(&mut out, &NoiseOptions::default(), &mut rand::thread_rng());
    out
}

/// Apply cover noise to a copy of `image` with explicit options and RNG.
///
/// # Errors
///
/// Returns [`Error::InvalidNoiseOptions`] if `opts` fails validation.
pub fn add_cover_noise_with<R: Rng>(
    image: &RgbImage,
    opts: &NoiseOptions,
    rng: &mut R,
) -> Result<RgbImage> {
    opts.validate()?;
    let mut out = image.clone();
    let touched = perturb_samples(&mut out, opts, rng);
    log::debug!(
        "cover noise touched {touched} of {} samples",
        out.as_raw().len()
    );
    Ok(out)
}

/// Perturb samples in place in a single flat pass. Returns how many were selected.
///
/// Callers validate `opts` first; `gen_bool` panics outside `[0, 1]`.
fn perturb_samples<R: Rng>(
    samples: &mut [u8],
    opts: &NoiseOptions,
    rng: &mut R,
) -> usize {
    let amplitude = i16::from(opts.amplitude);
    let mut touched = 0;

    for sample in samples.iter_mut() {
        if !rng.gen_bool(opts.probability) {
            continue;
        }
        let delta = if rng.gen::<bool>() {
            amplitude
        } else {
            -amplitude
        };
        *sample = jitter(*sample, delta);
        touched += 1;
    }
    touched
}

/// Add `delta` to `sample`, keeping its least-significant bit.
///
/// The clamp is parity-aware: an even sample stays within `[0, 254]` and an
/// odd one within `[1, 255]`, so saturation at either edge cannot flip the bit.
fn jitter(sample: u8, delta: i16) -> u8 {
    let parity = i16::from(sample & 1);
    let mut candidate = i16::from(sample) + delta;
    if candidate & 1 != parity {
        candidate ^= 1;
    }
    let (lo, hi) = if parity == 0 { (0, 254) } else { (1, 255) };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        candidate.clamp(lo, hi) as u8
    }
}
