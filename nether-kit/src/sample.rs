//! Kit sample entity
//!
//! A [`Sample`] either comes straight from kit nibble data (already final, no
//! processing) or from imported PCM, in which case the original PCM and the
//! pipeline settings are kept so the sample can be re-processed.

use std::path::Path;

use crate::{KitError, ProcessConfig, decode_nibbles, encode_nibbles, nibble_byte_len, process};

/// Audio decoder that feeds PCM into [`Sample::from_wav`]
///
/// Implementations return mono 16-bit PCM at [`crate::KIT_SAMPLE_RATE`];
/// channel mixing and resampling are their job, not the core's.
pub trait PcmDecoder {
    type Error;

    fn decode(&self, path: &Path) -> Result<Vec<i16>, Self::Error>;
}

/// Where a sample's PCM came from
#[derive(Debug, Clone, PartialEq)]
pub enum SampleData {
    /// Decoded from kit nibbles; nothing to re-process from
    NibbleDecoded { processed: Vec<i16> },
    /// Imported PCM plus the settings used to process it
    FromPcm {
        original: Vec<i16>,
        config: ProcessConfig,
        processed: Vec<i16>,
    },
}

impl SampleData {
    fn processed(&self) -> &[i16] {
        match self {
            SampleData::NibbleDecoded { processed } => processed,
            SampleData::FromPcm { processed, .. } => processed,
        }
    }
}

/// A named kit sample with a read cursor over its processed PCM
#[derive(Debug, Clone)]
pub struct Sample {
    name: String,
    data: SampleData,
    read_pos: usize,
}

impl Sample {
    /// Build a sample from packed kit nibbles (high nibble first)
    pub fn from_nibbles(name: impl Into<String>, nibbles: &[u8]) -> Self {
        Self {
            name: name.into(),
            data: SampleData::NibbleDecoded {
                processed: decode_nibbles(nibbles),
            },
            read_pos: 0,
        }
    }

    /// Build a sample from imported PCM and run the pipeline on it
    pub fn from_pcm(name: impl Into<String>, original: Vec<i16>, config: ProcessConfig) -> Self {
        let processed = process(&original, &config);
        Self {
            name: name.into(),
            data: SampleData::FromPcm {
                original,
                config,
                processed,
            },
            read_pos: 0,
        }
    }

    /// Decode an audio file with `decoder` and import it
    ///
    /// The sample is named after the file name of `path`.
    pub fn from_wav<D: PcmDecoder>(
        path: &Path,
        decoder: &D,
        config: ProcessConfig,
    ) -> Result<Self, D::Error> {
        let pcm = decoder.decode(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::from_pcm(name, pcm, config))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &SampleData {
        &self.data
    }

    /// PCM that is played back or re-encoded
    pub fn processed(&self) -> &[i16] {
        self.data.processed()
    }

    /// Imported PCM, if this sample kept it
    pub fn original(&self) -> Option<&[i16]> {
        match &self.data {
            SampleData::NibbleDecoded { .. } => None,
            SampleData::FromPcm { original, .. } => Some(original),
        }
    }

    pub fn config(&self) -> Option<&ProcessConfig> {
        match &self.data {
            SampleData::NibbleDecoded { .. } => None,
            SampleData::FromPcm { config, .. } => Some(config),
        }
    }

    /// Copy of the PCM an editor should work on: the original if kept,
    /// otherwise the processed buffer
    pub fn work_sample_data(&self) -> Vec<i16> {
        self.original().unwrap_or_else(|| self.processed()).to_vec()
    }

    /// Whether volume and dither can be changed (original PCM is kept)
    pub fn can_adjust_volume(&self) -> bool {
        matches!(self.data, SampleData::FromPcm { .. })
    }

    pub fn volume_db(&self) -> Option<i32> {
        self.config().map(|c| c.volume_db)
    }

    pub fn dither_db(&self) -> Option<i32> {
        self.config().map(|c| c.dither_db)
    }

    /// Change the target volume. Takes effect on the next [`Self::process_samples`].
    pub fn set_volume_db(&mut self, value: i32) -> Result<(), KitError> {
        self.config_mut()?.volume_db = value;
        Ok(())
    }

    /// Change the dither level. Takes effect on the next [`Self::process_samples`].
    pub fn set_dither_db(&mut self, value: i32) -> Result<(), KitError> {
        self.config_mut()?.dither_db = value;
        Ok(())
    }

    /// Rebuild the processed buffer from the original PCM
    ///
    /// Always starts over from the original; the read cursor is reset.
    pub fn process_samples(&mut self, dither: bool) -> Result<(), KitError> {
        let SampleData::FromPcm {
            original,
            config,
            processed,
        } = &mut self.data
        else {
            return Err(no_original(&self.name));
        };
        config.dither = dither;
        *processed = process(original, config);
        self.read_pos = 0;
        tracing::debug!(
            name = %self.name,
            volume_db = config.volume_db,
            dither_db = config.dither_db,
            dither,
            "re-processed sample"
        );
        Ok(())
    }

    pub fn length_in_samples(&self) -> usize {
        self.processed().len()
    }

    /// Size in kit bytes, rounded down to whole wave frames
    pub fn length_in_bytes(&self) -> usize {
        nibble_byte_len(self.length_in_samples())
    }

    pub fn seek_start(&mut self) {
        self.read_pos = 0;
    }

    /// Read the sample under the cursor and advance
    ///
    /// # Panics
    /// Panics when reading past [`Self::length_in_samples`].
    pub fn read(&mut self) -> i16 {
        let value = self.data.processed()[self.read_pos];
        self.read_pos += 1;
        value
    }

    /// Re-encode the processed PCM to kit nibbles
    ///
    /// Streams through the read cursor from the start; only whole wave frames
    /// are emitted.
    pub fn to_nibbles(&mut self) -> Vec<u8> {
        self.seek_start();
        let count = self.length_in_bytes() * 2;
        let pcm: Vec<i16> = (0..count).map(|_| self.read()).collect();
        encode_nibbles(&pcm)
    }

    fn config_mut(&mut self) -> Result<&mut ProcessConfig, KitError> {
        match &mut self.data {
            SampleData::FromPcm { config, .. } => Ok(config),
            SampleData::NibbleDecoded { .. } => Err(no_original(&self.name)),
        }
    }
}

fn no_original(name: &str) -> KitError {
    KitError::NoOriginalSamples {
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Decoder returning canned PCM, counting how often it was called
    struct FixedDecoder {
        pcm: Vec<i16>,
        calls: Cell<usize>,
    }

    impl PcmDecoder for FixedDecoder {
        type Error = String;

        fn decode(&self, path: &Path) -> Result<Vec<i16>, String> {
            self.calls.set(self.calls.get() + 1);
            if path.extension().is_some_and(|e| e == "wav") {
                Ok(self.pcm.clone())
            } else {
                Err(format!("not a wav: {}", path.display()))
            }
        }
    }

    fn no_dither() -> ProcessConfig {
        ProcessConfig {
            dither: false,
            ..ProcessConfig::default()
        }
    }

    #[test]
    fn test_from_nibbles() {
        let sample = Sample::from_nibbles("hat", &[0x00, 0xff]);
        assert_eq!(sample.name(), "hat");
        assert_eq!(sample.processed(), &[-32768, -32768, 28672, 28672]);
        assert!(sample.original().is_none());
        assert!(!sample.can_adjust_volume());
        assert_eq!(sample.volume_db(), None);
        assert!(matches!(sample.data(), SampleData::NibbleDecoded { .. }));
    }

    #[test]
    fn test_from_nibbles_is_not_processed() {
        // 64 samples: processing would blend index 30 and 32
        let bytes: Vec<u8> = (0..32u8).map(|i| ((i % 16) << 4) | (15 - i % 16)).collect();
        let sample = Sample::from_nibbles("raw", &bytes);
        assert_eq!(sample.processed(), decode_nibbles(&bytes).as_slice());
    }

    #[test]
    fn test_empty_inputs() {
        let sample = Sample::from_nibbles("empty", &[]);
        assert_eq!(sample.length_in_samples(), 0);
        assert_eq!(sample.length_in_bytes(), 0);

        let sample = Sample::from_pcm("empty", vec![], ProcessConfig::default());
        assert_eq!(sample.length_in_samples(), 0);
        assert_eq!(sample.length_in_bytes(), 0);
    }

    #[test]
    fn test_from_pcm_silence() {
        let sample = Sample::from_pcm("quiet", vec![0, 0, 0, 0], no_dither());
        assert_eq!(sample.processed(), &[0, 0, 0, 0]);
        assert_eq!(sample.length_in_bytes(), 0);
        assert!(sample.can_adjust_volume());
        assert_eq!(sample.original(), Some(&[0, 0, 0, 0][..]));
        assert!(matches!(
            sample.data(),
            SampleData::FromPcm { config, .. } if *config == no_dither()
        ));
    }

    #[test]
    fn test_length_in_bytes() {
        let sample = Sample::from_pcm("a", vec![0; 64], no_dither());
        assert_eq!(sample.length_in_bytes(), 32);
        let sample = Sample::from_pcm("b", vec![0; 70], no_dither());
        assert_eq!(sample.length_in_bytes(), 32);
    }

    #[test]
    fn test_read_cursor() {
        let mut sample = Sample::from_nibbles("s", &[0x08, 0xf0]);
        assert_eq!(sample.read(), -32768);
        assert_eq!(sample.read(), 0);
        assert_eq!(sample.read(), 28672);
        sample.seek_start();
        assert_eq!(sample.read(), -32768);
    }

    #[test]
    #[should_panic]
    fn test_read_past_end_panics() {
        let mut sample = Sample::from_nibbles("s", &[0x88]);
        sample.read();
        sample.read();
        sample.read();
    }

    #[test]
    fn test_nibble_sample_rejects_adjustment() {
        let mut sample = Sample::from_nibbles("kick", &[0x12]);
        let expected = KitError::NoOriginalSamples {
            name: "kick".to_string(),
        };
        assert_eq!(sample.set_volume_db(-3), Err(expected.clone()));
        assert_eq!(sample.set_dither_db(-20), Err(expected.clone()));
        assert_eq!(sample.process_samples(true), Err(expected));
    }

    #[test]
    fn test_reprocess_from_original() {
        let pcm: Vec<i16> = (0..128).map(|i| (i * 10) as i16).collect();
        let mut sample = Sample::from_pcm("ramp", pcm.clone(), no_dither());
        let full = sample.processed().to_vec();

        sample.set_volume_db(-6).unwrap();
        // Unchanged until re-processed
        assert_eq!(sample.processed(), full.as_slice());
        sample.process_samples(false).unwrap();
        let quiet = sample.processed().to_vec();
        assert!(quiet.iter().max() < full.iter().max());

        // Back to 0 dB reproduces the first result exactly
        sample.set_volume_db(0).unwrap();
        sample.process_samples(false).unwrap();
        assert_eq!(sample.processed(), full.as_slice());
        assert_eq!(sample.original(), Some(pcm.as_slice()));
    }

    #[test]
    fn test_reprocess_with_dither_is_reproducible() {
        let pcm: Vec<i16> = (0..300).map(|i| ((i * 97) % 2000 - 1000) as i16).collect();
        let mut a = Sample::from_pcm("a", pcm.clone(), ProcessConfig::default());
        let first = a.processed().to_vec();
        a.process_samples(true).unwrap();
        assert_eq!(a.processed(), first.as_slice());

        let b = Sample::from_pcm("b", pcm, ProcessConfig::default());
        assert_eq!(b.processed(), first.as_slice());
    }

    #[test]
    fn test_process_samples_toggles_dither() {
        let pcm: Vec<i16> = (0..300).map(|i| ((i * 97) % 2000 - 1000) as i16).collect();
        let mut sample = Sample::from_pcm("a", pcm, ProcessConfig::default());
        let dithered = sample.processed().to_vec();
        sample.process_samples(false).unwrap();
        assert_ne!(sample.processed(), dithered.as_slice());
        assert_eq!(sample.config().map(|c| c.dither), Some(false));
    }

    #[test]
    fn test_work_sample_data() {
        let pcm = vec![1, 2, 3, 4];
        let sample = Sample::from_pcm("a", pcm.clone(), no_dither());
        assert_eq!(sample.work_sample_data(), pcm);

        let sample = Sample::from_nibbles("b", &[0x8f]);
        assert_eq!(sample.work_sample_data(), vec![0, 28672]);
    }

    #[test]
    fn test_to_nibbles_roundtrip() {
        let bytes: Vec<u8> = (0..48u8).map(|i| i.wrapping_mul(37)).collect();
        let mut sample = Sample::from_nibbles("s", &bytes);
        assert_eq!(sample.to_nibbles(), bytes);
    }

    #[test]
    fn test_to_nibbles_drops_partial_frame() {
        let mut sample = Sample::from_nibbles("s", &[0x5a; 20]);
        assert_eq!(sample.to_nibbles(), vec![0x5a; 16]);
    }

    #[test]
    fn test_from_wav() {
        let decoder = FixedDecoder {
            pcm: vec![0, 100, -100, 25],
            calls: Cell::new(0),
        };
        let sample =
            Sample::from_wav(Path::new("drums/snare.wav"), &decoder, no_dither()).unwrap();
        assert_eq!(sample.name(), "snare.wav");
        assert_eq!(sample.processed(), &[0, 32767, -32767, 8192]);
        assert_eq!(decoder.calls.get(), 1);
    }

    #[test]
    fn test_from_wav_decoder_error() {
        let decoder = FixedDecoder {
            pcm: vec![],
            calls: Cell::new(0),
        };
        let result = Sample::from_wav(Path::new("snare.mp3"), &decoder, no_dither());
        assert!(result.is_err());
    }
}
