//! kit-export library
//!
//! WAV import, kit sample file I/O and manifest builds on top of `nether-kit`.

pub mod audio;
pub mod kit;
pub mod manifest;
pub mod wav;

/// File extension for a single packed kit sample
pub const KIT_SAMPLE_EXT: &str = "kitsmp";

pub use audio::{convert_wav, preview_kit_sample};
pub use kit::{KitSampleInfo, read_kit_sample, write_kit_sample};
pub use wav::WavDecoder;
