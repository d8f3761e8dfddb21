//! voc2yolo: turn Pascal VOC XML annotations into a YOLO training set.
//!
//! For each dataset split (`train`, `test`, `val` by default) voc2yolo reads
//! the split's identifier list, writes a manifest with one image path per
//! line, and converts every referenced XML annotation into a YOLO label file
//! (`class_id cx cy w h`, relative to the image size).
//!
//! # Modules
//!
//! - [`ir`]: boxes, the class registry, and the VOC/YOLO readers and writers
//! - [`conversion`]: the per-image annotation converter and its reports
//! - [`split`]: per-split manifest building and the full run driver
//! - [`config`]: dataset layout and run configuration
//! - [`error`]: error types for voc2yolo operations

pub mod config;
pub mod conversion;
pub mod error;
pub mod ir;
pub mod split;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

pub use config::{ConvertConfig, DatasetLayout, FileConfig};
pub use conversion::{AnnotationConverter, ConversionObserver, RunReport, TracingObserver};
pub use error::Voc2YoloError;
pub use ir::ClassRegistry;
pub use split::{convert_dataset, SplitFailurePolicy, SplitManifestBuilder};

/// The voc2yolo CLI application.
#[derive(Parser)]
#[command(name = "voc2yolo")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert VOC annotations to YOLO labels and write split manifests.
    Convert(ConvertArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Dataset root containing Annotations/ and ImageSets/.
    #[arg(long, env = "VOC2YOLO_ROOT")]
    root: Option<PathBuf>,

    /// YAML config file with layout, classes and splits.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ordered class list; the position of a name is its class id.
    #[arg(long, value_delimiter = ',')]
    classes: Option<Vec<String>>,

    /// Splits to build, in order.
    #[arg(long, value_delimiter = ',')]
    splits: Option<Vec<String>>,

    /// Image file extension used in manifests.
    #[arg(long)]
    image_ext: Option<String>,

    /// Keep building the remaining splits when one fails.
    #[arg(long)]
    keep_going: bool,

    /// Do not write data.yaml after a successful run.
    #[arg(long)]
    no_data_yaml: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportOutput::Text)]
    output: ReportOutput,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReportOutput {
    Text,
    Json,
}

/// Run the voc2yolo CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Voc2YoloError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => {
            init_tracing();
            run_convert(args)
        }
        None => {
            println!("voc2yolo {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert Pascal VOC annotations into YOLO labels.");
            println!();
            println!("Run 'voc2yolo --help' for usage information.");
            Ok(())
        }
    }
}

/// Logs go to stderr so the report on stdout stays machine-readable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("voc2yolo=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_convert(args: ConvertArgs) -> Result<(), Voc2YoloError> {
    let config = resolve_config(&args)?;
    tracing::info!(root = %config.layout.root.display(), "converting dataset");

    let policy = if args.keep_going {
        SplitFailurePolicy::Isolate
    } else {
        SplitFailurePolicy::Abort
    };
    let report = convert_dataset(&config, policy, TracingObserver)?;

    match args.output {
        ReportOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportOutput::Text => {
            println!("Converted {} split(s):", report.splits.len());
            print!("{}", report);
        }
    }

    let report = report.into_result()?;

    if !args.no_data_yaml {
        let splits: Vec<(String, PathBuf)> = report
            .splits
            .iter()
            .map(|split| (split.split.clone(), split.manifest_path.clone()))
            .collect();
        let data_yaml = config.layout.data_yaml_path();
        ir::io_yolo::write_data_yaml(&data_yaml, &config.layout.root, &splits, &config.classes)?;
        tracing::info!(path = %data_yaml.display(), "wrote data.yaml");
    }

    Ok(())
}

/// Merges defaults, the optional config file and CLI flags, in that order.
fn resolve_config(args: &ConvertArgs) -> Result<ConvertConfig, Voc2YoloError> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let root = args
        .root
        .clone()
        .or_else(|| file.root.clone())
        .ok_or_else(|| {
            Voc2YoloError::InvalidConfig(
                "dataset root is required (--root, VOC2YOLO_ROOT or `root` in the config file)"
                    .to_string(),
            )
        })?;
    // Manifests list absolute image paths.
    let root = std::fs::canonicalize(&root).map_err(Voc2YoloError::io(&root))?;

    let mut layout = file.layout_for(root);
    if let Some(ext) = &args.image_ext {
        layout.image_extension = ext.trim_start_matches('.').to_string();
    }

    let classes = match (&args.classes, &file.classes) {
        (Some(names), _) => ClassRegistry::new(names.iter().map(|n| n.trim()))?,
        (None, Some(registry)) => registry.clone(),
        (None, None) => ClassRegistry::default(),
    };

    let splits = args
        .splits
        .clone()
        .or_else(|| file.splits.clone())
        .unwrap_or_else(|| config::DEFAULT_SPLITS.iter().map(|s| s.to_string()).collect());

    ConvertConfig::new(layout, classes, splits)
}
