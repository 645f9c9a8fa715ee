//! citegraph CLI
//!
//! # Usage
//!
//! ```bash
//! # Table + GML for records with at least 5 citations
//! citegraph prepare -d raw/wos -o prepared -c 5
//!
//! # Density map from an external layout
//! citegraph render layout.csv -d raw/wos -s 10000 --scale 0.5
//!
//! # Either run from a JSON config
//! citegraph render --config render.json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use citegraph::config::{self, PrepareConfig, RenderConfig};
use citegraph::pipeline;

#[derive(Parser)]
#[command(name = "citegraph")]
#[command(about = "Citation graph preparation and density rendering", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the citation graph and write table and GML files
    Prepare {
        /// JSON config file (flags below are ignored when given)
        #[arg(long)]
        config: Option<PathBuf>,

        /// The directory to read the raw data from
        #[arg(short = 'd', long, default_value = "data/raw/wos")]
        data_dir: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "data/prepared")]
        output_dir: PathBuf,

        /// Threshold on references (discard publications with fewer)
        #[arg(short = 'r', long = "rth", default_value = "0")]
        ref_threshold: usize,

        /// Threshold on citations (discard publications with fewer)
        #[arg(short = 'c', long = "cth", default_value = "0")]
        cit_threshold: usize,

        /// Suffix of record files
        #[arg(long, default_value = citegraph::source::DEFAULT_SUFFIX)]
        suffix: String,
    },

    /// Render edge density and node positions to PNG
    Render {
        /// JSON config file (flags below are ignored when given)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Layout file with `id,x,y` rows
        #[arg(required_unless_present = "config")]
        layout_file: Option<PathBuf>,

        /// The directory to read the raw data from
        #[arg(short = 'd', long, default_value = "data/raw/wos")]
        data_dir: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Size of output bitmap
        #[arg(short, long, default_value = "10000")]
        size: u32,

        /// Scaling factor
        #[arg(long, default_value = "0.5")]
        scale: f32,

        /// Size of dots
        #[arg(long, default_value = "4")]
        dot_size: u32,

        /// Fixed point store capacity (default: sized from the layout file)
        #[arg(long)]
        capacity: Option<usize>,

        /// Suffix of record files
        #[arg(long, default_value = citegraph::source::DEFAULT_SUFFIX)]
        suffix: String,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Prepare { config: config_file, data_dir, output_dir, ref_threshold, cit_threshold, suffix } => {
            let cfg = match config_file {
                Some(path) => config::load_json::<PrepareConfig>(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => PrepareConfig {
                    output_dir,
                    suffix,
                    ref_threshold,
                    cit_threshold,
                    ..PrepareConfig::new(data_dir)
                },
            };
            let report = pipeline::prepare(&cfg)?;
            info!(
                table = %report.table_path.display(),
                gml = %report.markup_path.display(),
                "Prepared"
            );
        }
        Commands::Render {
            config: config_file,
            layout_file,
            data_dir,
            output,
            size,
            scale,
            dot_size,
            capacity,
            suffix,
        } => {
            let cfg = match (config_file, layout_file) {
                (Some(path), _) => config::load_json::<RenderConfig>(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                (None, Some(layout_file)) => RenderConfig {
                    output,
                    size,
                    scale,
                    dot_size,
                    capacity,
                    suffix,
                    ..RenderConfig::new(layout_file, data_dir)
                },
                (None, None) => anyhow::bail!("exactly one layout file is needed"),
            };
            let report = pipeline::render(&cfg)?;
            info!(image = %report.image_path.display(), "Rendered");
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
