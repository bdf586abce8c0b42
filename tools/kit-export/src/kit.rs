//! Kit sample files (.kitsmp)
//!
//! POD format - no header. The file is the raw nibble stream exactly as it is
//! stored in the cartridge kit: two samples per byte, high nibble first, length
//! a whole number of 16-byte wave frames.

use anyhow::{Context, Result};
use nether_kit::{FRAME_LEN, KIT_SAMPLE_RATE, Sample};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Summary of a kit sample, as printed by `kit-export info`
#[derive(Debug, Clone, PartialEq)]
pub struct KitSampleInfo {
    pub name: String,
    pub samples: usize,
    pub bytes: usize,
    pub frames: usize,
    pub seconds: f64,
}

impl KitSampleInfo {
    pub fn of(sample: &Sample) -> Self {
        let bytes = sample.length_in_bytes();
        Self {
            name: sample.name().to_string(),
            samples: sample.length_in_samples(),
            bytes,
            frames: bytes * 2 / FRAME_LEN,
            seconds: sample.length_in_samples() as f64 / KIT_SAMPLE_RATE as f64,
        }
    }
}

/// Read a .kitsmp file; the sample is named after the file stem
pub fn read_kit_sample(path: &Path) -> Result<Sample> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read kit sample: {:?}", path))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Sample::from_nibbles(name, &bytes))
}

/// Encode `sample` to nibbles and write it as a .kitsmp file
///
/// Returns the number of bytes written.
pub fn write_kit_sample(path: &Path, sample: &mut Sample) -> Result<usize> {
    let dropped = sample.length_in_samples() - sample.length_in_bytes() * 2;
    if dropped > 0 {
        tracing::warn!(
            "Sample '{}': dropping {} trailing samples (partial wave frame)",
            sample.name(),
            dropped
        );
    }

    let nibbles = sample.to_nibbles();
    if nibbles.is_empty() {
        tracing::warn!("Sample '{}' is shorter than one wave frame", sample.name());
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&nibbles)?;
    writer.flush()?;

    Ok(nibbles.len())
}
