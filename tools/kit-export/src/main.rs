//! kit-export - wave kit sample export tool
//!
//! Converts WAV files to 4-bit kit samples (.kitsmp) and decodes kit samples
//! back to WAV for previewing.

use anyhow::Result;
use clap::{Parser, Subcommand};
use nether_kit::{DEFAULT_DITHER_DB, ProcessConfig};
use std::path::PathBuf;

use kit_export::{KIT_SAMPLE_EXT, KitSampleInfo, audio, kit, manifest};

#[derive(Parser)]
#[command(name = "kit-export")]
#[command(about = "Wave kit sample export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all samples from a manifest file
    Build {
        /// Path to kit.toml manifest
        #[arg(default_value = "kit.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to kit.toml manifest
        #[arg(default_value = "kit.toml")]
        manifest: PathBuf,
    },

    /// Import a single WAV file
    Import {
        /// Input WAV file
        input: PathBuf,

        /// Output .kitsmp file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Peak level relative to full scale (dB)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        volume_db: i32,

        /// Dither noise level relative to full scale (dB)
        #[arg(long, default_value_t = DEFAULT_DITHER_DB, allow_negative_numbers = true)]
        dither_db: i32,

        /// Skip dithering
        #[arg(long)]
        no_dither: bool,
    },

    /// Decode a .kitsmp file to WAV
    Preview {
        /// Input .kitsmp file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show length and frame count of a .kitsmp file
    Info {
        /// Input .kitsmp file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { manifest, output } => {
            tracing::info!("Building kit from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Import {
            input,
            output,
            volume_db,
            dither_db,
            no_dither,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(KIT_SAMPLE_EXT));
            let config = ProcessConfig {
                volume_db,
                dither_db,
                dither: !no_dither,
            };
            tracing::info!("Converting {:?} -> {:?}", input, output);
            audio::convert_wav(&input, &output, &config)?;
            tracing::info!("Done!");
        }

        Commands::Preview { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension("wav"));
            tracing::info!("Decoding {:?} -> {:?}", input, output);
            audio::preview_kit_sample(&input, &output)?;
            tracing::info!("Done!");
        }

        Commands::Info { input } => {
            let sample = kit::read_kit_sample(&input)?;
            let info = KitSampleInfo::of(&sample);
            println!("name:    {}", info.name);
            println!("samples: {}", info.samples);
            println!("bytes:   {}", info.bytes);
            println!("frames:  {}", info.frames);
            println!("length:  {:.3}s", info.seconds);
        }
    }

    Ok(())
}
