use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use material_palette_wasm::{
    ExtractionConfig, Material, PaletteExtractor, Rgb, SamplerKind, ThresholdProfile, search,
};

/// Extract named color palettes from material photos and search a catalog by color.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a palette from one or more images
    Extract {
        /// One or more input image paths
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// JSON file with extraction settings
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of palette colors (overrides the config file)
        #[arg(short = 'k', long)]
        count: Option<usize>,

        /// Sampling strategy: "grid" or "bytes" (overrides the config file)
        #[arg(short, long)]
        sampler: Option<SamplerKind>,

        /// Use the lightness-based naming rules instead of HSV
        #[arg(long)]
        lightness: bool,

        /// Print palettes as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the color name of one or more hex colors
    Classify {
        /// Colors such as "#8b4513" or "fa0"
        #[arg(required = true)]
        colors: Vec<String>,
    },
    /// Search a catalog of materials by name, location or color
    Search {
        /// JSON array of materials
        #[arg(short, long)]
        catalog: PathBuf,

        /// Search text, e.g. "green" or "shelf"
        query: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Command::Extract { inputs, config, count, sampler, lightness, json } => {
            let mut settings = match &config {
                Some(path) => ExtractionConfig::from_json_file(path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => ExtractionConfig::default(),
            };
            if let Some(count) = count {
                settings.count = count;
            }
            if let Some(kind) = sampler {
                settings.sampler = kind;
            }
            if lightness {
                settings.profile = ThresholdProfile::Lightness;
            }
            let extractor = PaletteExtractor::from_config(settings)?;

            for input in &inputs {
                let bytes = fs::read(input)
                    .with_context(|| format!("reading {}", input.display()))?;
                let palette = extractor
                    .extract(&bytes)
                    .with_context(|| format!("palette extraction failed for {}", input.display()))?;

                if json {
                    println!("{}", serde_json::to_string(&palette)?);
                } else {
                    println!("{}:", input.display());
                    for c in &palette {
                        let name = c.name.map(|n| n.as_str()).unwrap_or("unknown");
                        println!("  {} {:<7} {:>5.1}%", c.hex(), name, c.percent.unwrap_or(0.0));
                    }
                }
            }
        }
        Command::Classify { colors } => {
            for text in &colors {
                let rgb: Rgb = text.parse().with_context(|| format!("parsing {text:?}"))?;
                println!("{} {}", rgb.hex(), material_palette_wasm::classify(rgb));
            }
        }
        Command::Search { catalog, query } => {
            let text = fs::read_to_string(&catalog)
                .with_context(|| format!("reading {}", catalog.display()))?;
            let materials: Vec<Material> = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", catalog.display()))?;
            if materials.is_empty() {
                bail!("catalog {} contains no materials", catalog.display());
            }

            let found = search(&materials, &query, ThresholdProfile::default());
            for m in &found {
                println!("{}\t{}\t{}\t{}", m.id, m.name, m.location, m.colors.summary(3));
            }
            tracing::info!(matched = found.len(), total = materials.len(), "Search finished");
        }
    }

    Ok(())
}
