//! Manifest parsing and build orchestration
//!
//! Parses kit.toml and converts every listed sample.

use anyhow::{Context, Result};
use nether_kit::ProcessConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::KIT_SAMPLE_EXT;

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    /// Pipeline settings for samples that don't override them
    #[serde(default)]
    pub defaults: ProcessConfig,
    #[serde(default)]
    pub samples: BTreeMap<String, SampleEntry>,
    /// Directory relative sample paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("kit/")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SampleEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        volume_db: Option<i32>,
        #[serde(default)]
        dither_db: Option<i32>,
        #[serde(default)]
        dither: Option<bool>,
    },
}

impl SampleEntry {
    pub fn path(&self) -> &Path {
        match self {
            SampleEntry::Simple(p) => p,
            SampleEntry::Detailed { path, .. } => path,
        }
    }

    /// Pipeline settings for this sample, falling back to `defaults`
    pub fn config(&self, defaults: &ProcessConfig) -> ProcessConfig {
        match self {
            SampleEntry::Simple(_) => *defaults,
            SampleEntry::Detailed {
                volume_db,
                dither_db,
                dither,
                ..
            } => ProcessConfig {
                volume_db: volume_db.unwrap_or(defaults.volume_db),
                dither_db: dither_db.unwrap_or(defaults.dither_db),
                dither: dither.unwrap_or(defaults.dither),
            },
        }
    }
}

impl Manifest {
    /// Source path of an entry, resolved against the manifest's directory
    pub fn source_path(&self, entry: &SampleEntry) -> PathBuf {
        self.base_dir.join(entry.path())
    }
}

/// Parse manifest text; relative paths resolve against `base_dir`
pub fn parse_manifest(content: &str, base_dir: &Path) -> Result<Manifest> {
    let mut manifest: Manifest = toml::from_str(content)?;
    manifest.base_dir = base_dir.to_path_buf();
    Ok(manifest)
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let base_dir = path.parent().unwrap_or(Path::new(""));
    parse_manifest(&content, base_dir)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    if manifest.samples.is_empty() {
        tracing::warn!("Manifest lists no samples");
    }
    for (name, entry) in &manifest.samples {
        let source = manifest.source_path(entry);
        if !source.exists() {
            anyhow::bail!("Sample '{}' source not found: {:?}", name, source);
        }
    }
    Ok(())
}

/// Build all samples from a manifest
///
/// Returns the total number of kit bytes written.
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<usize> {
    validate(manifest)?;

    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => manifest.base_dir.join(&manifest.output.dir),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output dir: {:?}", output_dir))?;

    let mut total = 0;
    for (name, entry) in &manifest.samples {
        let output = output_dir.join(format!("{}.{}", name, KIT_SAMPLE_EXT));
        tracing::info!("Converting sample: {} -> {:?}", name, output);

        let config = entry.config(&manifest.defaults);
        let sample = crate::audio::convert_wav(&manifest.source_path(entry), &output, &config)
            .with_context(|| format!("Failed to convert sample '{}'", name))?;
        total += sample.length_in_bytes();
    }

    tracing::info!(
        "Built {} samples, {} kit bytes",
        manifest.samples.len(),
        total
    );
    Ok(total)
}
