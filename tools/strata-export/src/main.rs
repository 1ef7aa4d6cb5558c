//! strata-export - glTF 2.0 scene exporter
//!
//! Converts host scene descriptions (JSON) to .gltf + .bin or .glb

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use strata_export::{ExportSettings, ensure_gltf_extension, manifest};

#[derive(Parser)]
#[command(name = "strata-export")]
#[command(about = "Strata glTF scene exporter")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a single scene
    Export {
        /// Input scene description (JSON)
        scene: PathBuf,

        /// Output .gltf or .glb file (default: scene path with .gltf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export only selected objects and their children
        #[arg(long)]
        selected_only: bool,
    },

    /// Run every export listed in a manifest file
    Build {
        /// Path to strata.toml manifest
        #[arg(default_value = "strata.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest and scenes without writing
    Check {
        /// Path to strata.toml manifest
        #[arg(default_value = "strata.toml")]
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match cli.command {
        Commands::Export {
            scene,
            output,
            selected_only,
        } => {
            let output = output
                .map(|o| ensure_gltf_extension(&o))
                .unwrap_or_else(|| scene.with_extension("gltf"));
            tracing::info!("Exporting {:?} -> {:?}", scene, output);

            let host = manifest::load_scene(&scene)?;
            let settings = ExportSettings {
                selected_only,
                ..Default::default()
            };
            strata_export::export(&host, &output, &settings)
                .with_context(|| format!("Failed to export {:?}", scene))?;
            tracing::info!("Done!");
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building exports from {:?}", manifest);
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
    }

    Ok(())
}
