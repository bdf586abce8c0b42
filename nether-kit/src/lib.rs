//! Nether-Kit: 4-bit wave kit sample codec
//!
//! Converts between the packed nibble waveforms stored in a tracker cartridge's
//! sample kits and 16-bit PCM, and conditions imported audio so it survives the
//! reduction to 4 bits.
//!
//! **This is a pure codec** - WAV decoding, resampling and file handling live in
//! `kit-export`. The core only ever sees mono 16-bit PCM at [`KIT_SAMPLE_RATE`].
//!
//! # Nibble Format
//!
//! ```text
//! byte:   [ hi nibble | lo nibble ]   (hi nibble plays first)
//! nibble: 0..=15  ->  pcm = (n - 8) * 4096
//! ```
//!
//! # Processing Pipeline
//!
//! Imported PCM runs through three stages, always in this order:
//!
//! | Stage | What it does |
//! |-------|--------------|
//! | Normalize | Scale so the peak reaches `10^(volume_db/20)` of full scale |
//! | Dither (optional) | Add pink noise at `10^(dither_db/20)` of full scale |
//! | Blend wave frames | Average each frame's first sample with the one two before it |
//!
//! # Usage
//!
//! ```
//! use nether_kit::{ProcessConfig, Sample};
//!
//! // Decode nibble data from a kit
//! let sample = Sample::from_nibbles("hat", &[0x00, 0xff]);
//! assert_eq!(sample.processed(), &[-32768, -32768, 28672, 28672]);
//!
//! // Import PCM and condition it for 4-bit playback
//! let pcm: Vec<i16> = (0..256).map(|i| (i * 64) as i16).collect();
//! let sample = Sample::from_pcm("ramp", pcm, ProcessConfig::default());
//! assert_eq!(sample.length_in_bytes(), 128);
//! ```

mod nibble;
mod noise;
mod pipeline;
mod sample;

pub use nibble::{decode_nibble, decode_nibbles, encode_nibble, encode_nibbles, nibble_byte_len};
pub use noise::PinkNoise;
pub use pipeline::{ProcessConfig, blend_wave_frames, dither, normalize, process};
pub use sample::{PcmDecoder, Sample, SampleData};

// =============================================================================
// Constants
// =============================================================================

/// Sample rate kits are played back at (Hz)
pub const KIT_SAMPLE_RATE: u32 = 11468;

/// Samples per hardware wave frame
pub const FRAME_LEN: usize = 32;

/// Distance back from a frame boundary to the sample the hardware replays.
/// Tested on DMG-01 with a 440 Hz sine wave.
pub const BLEND_OFFSET: usize = 2;

/// Encoded sample data is padded down to a multiple of this many bytes
/// (one wave frame, two samples per byte)
pub const FRAME_BYTES: usize = FRAME_LEN / 2;

/// PCM distance between two adjacent nibble values
pub const NIBBLE_STEP: i32 = 4096;

/// Default dither level. Picked by ear: a slow DC slope dithered at this level
/// and truncated to 4 bits shows no audible steps between volumes.
pub const DEFAULT_DITHER_DB: i32 = -30;

/// Seed the dither noise is restarted from on every pipeline run
pub const DITHER_SEED: u64 = 1;

// =============================================================================
// Error Type
// =============================================================================

/// Errors raised by sample operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KitError {
    /// The sample was decoded from nibbles and kept no PCM to re-process
    #[error("sample '{name}' has no original PCM; volume and dither cannot be adjusted")]
    NoOriginalSamples { name: String },
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Clamp value to 16-bit signed range
#[inline]
pub(crate) fn clamp_i16(v: i64) -> i16 {
    v.clamp(i16::MIN as i64, i16::MAX as i64) as i16
}

/// Convert decibels to a linear amplitude factor
#[inline]
pub(crate) fn db_to_gain(db: i32) -> f64 {
    10f64.powf(db as f64 / 20.0)
}

// =============================================================================
// Tests
// =============================================================================
