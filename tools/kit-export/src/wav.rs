//! WAV loading and writing
//!
//! Brings any PCM WAV down to what the kit pipeline expects: mono, 16-bit,
//! [`KIT_SAMPLE_RATE`].

use anyhow::{Context, Result, bail};
use nether_kit::{KIT_SAMPLE_RATE, PcmDecoder};
use std::io::{Read, Seek, Write};
use std::path::Path;

/// hound-backed decoder for [`nether_kit::Sample::from_wav`]
#[derive(Debug, Clone, Copy)]
pub struct WavDecoder {
    /// Output sample rate (Hz)
    pub sample_rate: u32,
}

impl Default for WavDecoder {
    fn default() -> Self {
        Self {
            sample_rate: KIT_SAMPLE_RATE,
        }
    }
}

impl PcmDecoder for WavDecoder {
    type Error = anyhow::Error;

    fn decode(&self, path: &Path) -> Result<Vec<i16>> {
        let reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to load WAV: {:?}", path))?;
        read_mono_pcm(reader, self.sample_rate)
            .with_context(|| format!("Failed to decode WAV: {:?}", path))
    }
}

/// Read all samples as mono 16-bit PCM resampled to `target_rate`
pub fn read_mono_pcm<R: Read>(mut reader: hound::WavReader<R>, target_rate: u32) -> Result<Vec<i16>> {
    let spec = reader.spec();
    if spec.sample_rate == 0 || target_rate == 0 {
        bail!(
            "Unsupported sample rate: {} -> {} Hz",
            spec.sample_rate,
            target_rate
        );
    }

    let samples: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int => match spec.bits_per_sample {
            16 => reader.samples::<i16>().collect::<Result<_, _>>()?,
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|s| (s as i16) << 8))
                .collect::<Result<_, _>>()?,
            24 | 32 => {
                let shift = spec.bits_per_sample - 16;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| (s >> shift) as i16))
                    .collect::<Result<_, _>>()?
            }
            _ => bail!("Unsupported bit depth: {}", spec.bits_per_sample),
        },
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|s| (s.clamp(-1.0, 1.0) * 32767.0) as i16))
            .collect::<Result<_, _>>()?,
    };

    let mono = mix_to_mono(&samples, spec.channels)?;

    let resampled = if spec.sample_rate != target_rate {
        resample(&mono, spec.sample_rate, target_rate)?
    } else {
        mono
    };

    tracing::debug!(
        channels = spec.channels,
        bits = spec.bits_per_sample,
        src_rate = spec.sample_rate,
        dst_rate = target_rate,
        samples = resampled.len(),
        "decoded WAV"
    );

    Ok(resampled)
}

/// Average interleaved channels down to one
pub fn mix_to_mono(samples: &[i16], channels: u16) -> Result<Vec<i16>> {
    match channels {
        0 => bail!("Unsupported channel count: 0"),
        1 => Ok(samples.to_vec()),
        n => Ok(samples
            .chunks_exact(n as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / n as i32) as i16
            })
            .collect()),
    }
}

/// Linear resampling from `src_rate` to `dst_rate`
///
/// Output length is `len * dst_rate / src_rate`, rounded down. Zero rates
/// come from malformed headers and are rejected.
pub fn resample(samples: &[i16], src_rate: u32, dst_rate: u32) -> Result<Vec<i16>> {
    if src_rate == 0 || dst_rate == 0 {
        bail!("Unsupported sample rate: {} -> {} Hz", src_rate, dst_rate);
    }
    let Some(&last) = samples.last() else {
        return Ok(Vec::new());
    };

    let output_len = (samples.len() as u64 * dst_rate as u64 / src_rate as u64) as usize;
    let step = src_rate as f64 / dst_rate as f64;

    Ok((0..output_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = pos as usize;
            match samples.get(idx + 1) {
                Some(&next) => {
                    let a = samples[idx] as f64;
                    (a + (next as f64 - a) * (pos - idx as f64)) as i16
                }
                None => last,
            }
        })
        .collect())
}

/// Write mono 16-bit PCM as a WAV file
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let writer = hound::WavWriter::create(path, wav_spec(sample_rate))
        .with_context(|| format!("Failed to create WAV: {:?}", path))?;
    write_samples(writer, samples)
}

fn write_samples<W: Write + Seek>(mut writer: hound::WavWriter<W>, samples: &[i16]) -> Result<()> {
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}
