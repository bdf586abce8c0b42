//! Signal conditioning for 4-bit playback
//!
//! Each stage works in place on a PCM buffer. [`process`] runs all of them on a
//! copy of the original samples, so re-running with the same config always
//! reproduces the same output.

use serde::{Deserialize, Serialize};

use crate::{BLEND_OFFSET, DEFAULT_DITHER_DB, DITHER_SEED, FRAME_LEN, PinkNoise, clamp_i16, db_to_gain};

/// Pipeline settings for samples imported from PCM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Target peak level relative to full scale (dB)
    pub volume_db: i32,
    /// Dither noise level relative to full scale (dB)
    pub dither_db: i32,
    /// Whether the dither stage runs at all
    pub dither: bool,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            volume_db: 0,
            dither_db: DEFAULT_DITHER_DB,
            dither: true,
        }
    }
}

/// Run the full pipeline: normalize, dither (if enabled), blend wave frames
pub fn process(original: &[i16], config: &ProcessConfig) -> Vec<i16> {
    let mut samples = original.to_vec();
    normalize(&mut samples, config.volume_db);
    if config.dither {
        let mut noise = PinkNoise::new(DITHER_SEED);
        dither(&mut samples, config.dither_db, &mut noise);
    }
    blend_wave_frames(&mut samples);
    samples
}

/// Scale samples so the peak lands at `volume_db` relative to full scale
///
/// Negative samples are measured against -32768 and the rest against 32767.
/// Silent buffers are left untouched.
pub fn normalize(samples: &mut [i16], volume_db: i32) {
    let peak = samples
        .iter()
        .map(|&s| {
            if s < 0 {
                s as f64 / i16::MIN as f64
            } else {
                s as f64 / i16::MAX as f64
            }
        })
        .fold(0.0f64, f64::max);

    if peak == 0.0 {
        tracing::debug!("normalize: silent buffer, skipping");
        return;
    }

    let gain = db_to_gain(volume_db);
    tracing::debug!(peak, gain, "normalize");

    for sample in samples.iter_mut() {
        let scaled = (*sample as f64 * gain / peak).round();
        *sample = clamp_i16(scaled as i64);
    }
}

/// Add pink noise at `dither_db` relative to full scale
///
/// Results saturate at the 16-bit range.
pub fn dither(samples: &mut [i16], dither_db: i32, noise: &mut PinkNoise) {
    let noise_level = i16::MAX as f64 * db_to_gain(dither_db);
    tracing::debug!(noise_level, seed = noise.seed(), "dither");

    for sample in samples.iter_mut() {
        let dithered = *sample as f64 + noise.next_value() * noise_level;
        *sample = clamp_i16(dithered as i64);
    }
}

/// Smooth the seam the hardware leaves at each wave frame boundary
///
/// The first sample of a frame is played back with the value of the sample
/// [`BLEND_OFFSET`] positions before it. Both get their average.
pub fn blend_wave_frames(samples: &mut [i16]) {
    let mut blended = 0usize;
    for i in (FRAME_LEN..samples.len()).step_by(FRAME_LEN) {
        let j = i - BLEND_OFFSET;
        let avg = ((samples[i] as i32 + samples[j] as i32) / 2) as i16;
        samples[i] = avg;
        samples[j] = avg;
        blended += 1;
    }
    tracing::debug!(frames = blended, "blend_wave_frames");
}
