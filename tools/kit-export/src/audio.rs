//! Audio converters (WAV -> .kitsmp, .kitsmp -> WAV)

use anyhow::Result;
use nether_kit::{KIT_SAMPLE_RATE, ProcessConfig, Sample};
use std::path::Path;

use crate::kit::{read_kit_sample, write_kit_sample};
use crate::wav::{WavDecoder, write_wav};

/// Import a WAV file, condition it for 4-bit playback and write a kit sample
pub fn convert_wav(input: &Path, output: &Path, config: &ProcessConfig) -> Result<Sample> {
    let mut sample = Sample::from_wav(input, &WavDecoder::default(), *config)?;
    let written = write_kit_sample(output, &mut sample)?;

    tracing::info!(
        "Converted audio: {} samples @ {}Hz, volume {} dB, dither {}, {} bytes ({} frames)",
        sample.length_in_samples(),
        KIT_SAMPLE_RATE,
        config.volume_db,
        if config.dither {
            format!("{} dB", config.dither_db)
        } else {
            "off".to_string()
        },
        written,
        written / nether_kit::FRAME_BYTES
    );

    Ok(sample)
}

/// Decode a kit sample back to a WAV file for listening
pub fn preview_kit_sample(input: &Path, output: &Path) -> Result<()> {
    let mut sample = read_kit_sample(input)?;

    sample.seek_start();
    let pcm: Vec<i16> = (0..sample.length_in_samples())
        .map(|_| sample.read())
        .collect();
    write_wav(output, &pcm, KIT_SAMPLE_RATE)?;

    tracing::info!(
        "Decoded kit sample '{}': {} samples @ {}Hz",
        sample.name(),
        pcm.len(),
        KIT_SAMPLE_RATE
    );
    Ok(())
}
