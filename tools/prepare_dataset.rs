//! Gesture Dataset Preparation Tool
//!
//! Converts recorded hand-landmark datasets (JSON) into NumPy tensors for
//! sequence classifier training.
//!
//! # Output Format
//!
//! - **Features**: `features.npy` - Shape `[N, 30, 63]`, float32
//! - **Labels**: `labels.npy` - Shape `[N]`, int32 class indices
//! - **Label map**: `label_map.json` - `{token: index}` in index order
//! - **Metadata**: `metadata.json` - shapes, class distribution, skip counts
//!
//! # Usage
//!
//! ```bash
//! # From TOML config
//! cargo run --release --bin prepare_dataset -- --config configs/gestures.toml
//!
//! # Generate sample config
//! cargo run --release --bin prepare_dataset -- --generate-config gestures.toml
//!
//! # Quick conversion with default settings
//! cargo run --release --bin prepare_dataset -- --input a.json --input b.json --output out/
//! ```
//!
//! Set `RUST_LOG=debug` to see every skipped record.

use landmark_extractor::batch::{BatchBuilder, BatchConfig, SampleBatch};
use landmark_extractor::config::{ExperimentMetadata, ExportConfig, PipelineConfig};
use landmark_extractor::dataset::load_files;
use landmark_extractor::export::NumpyExporter;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--config" => {
            if args.len() < 3 {
                eprintln!("Error: --config requires a path argument");
                std::process::exit(1);
            }
            run_from_config(&args[2]);
        }
        "--generate-config" => {
            if args.len() < 3 {
                eprintln!("Error: --generate-config requires a path argument");
                std::process::exit(1);
            }
            generate_sample_config(&args[2]);
        }
        "--input" | "--output" => match parse_direct_args(&args[1..]) {
            Ok(export) => {
                let config = PipelineConfig::default().with_export(export);
                if let Err(e) = run(&config) {
                    eprintln!("❌ Export failed: {}", e);
                    std::process::exit(1);
                }
            }
            Err(msg) => {
                eprintln!("Error: {}", msg);
                print_usage(&args[0]);
                std::process::exit(1);
            }
        },
        "--help" | "-h" => {
            print_usage(&args[0]);
        }
        _ => {
            eprintln!("Unknown argument: {}", args[1]);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!(
        r#"
Gesture Dataset Preparation Tool

Usage:
    {program} --config <path.toml>                     Export dataset from config file
    {program} --generate-config <path>                 Generate sample config file
    {program} --input <file> [--input <file>...] --output <dir>
                                                       Export with default settings
    {program} --help                                   Show this help

Examples:
    # Export from an experiment config
    {program} --config configs/gestures.toml

    # Convert two database dumps into one dataset
    {program} --input dump_a.json --input dump_b.json --output out/gestures
"#
    );
}

/// Parse `--input <file>` (repeatable) and `--output <dir>`.
fn parse_direct_args(args: &[String]) -> Result<ExportConfig, String> {
    let mut inputs = Vec::new();
    let mut output = None;

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("{} requires a path argument", flag))?;
        match flag.as_str() {
            "--input" => inputs.push(PathBuf::from(value)),
            "--output" => output = Some(PathBuf::from(value)),
            other => return Err(format!("unexpected argument: {}", other)),
        }
    }

    let output = output.ok_or_else(|| "--output is required".to_string())?;
    let export = ExportConfig::new(inputs, output);
    export.validate()?;
    Ok(export)
}

/// Generate a sample configuration file
fn generate_sample_config(path: &str) {
    let mut experiment = ExperimentMetadata::named("Gesture Sequences");
    experiment.description = Some("Hand landmarks, 30 frames x 63 features".to_string());
    experiment.tags = Some(vec!["gestures".to_string(), "landmarks".to_string()]);

    let sample_config = PipelineConfig::default()
        .with_batch(BatchConfig::new().with_threads(4))
        .with_export(ExportConfig::new(
            vec![PathBuf::from("/path/to/gesture_training_data.json")], // User should modify
            "/path/to/exports/gestures",
        ))
        .with_metadata(experiment);

    match sample_config.save_toml(path) {
        Ok(()) => {
            println!("✅ Generated sample config: {}", path);
            println!("\nEdit the following fields before running:");
            println!("  - export.inputs: Dataset JSON files, in order");
            println!("  - export.output_dir: Path for exported tensors");
            println!("  - fields.*: Record keys if your export differs");
        }
        Err(e) => {
            eprintln!("Error generating config: {}", e);
            std::process::exit(1);
        }
    }
}

/// Run export from configuration file
fn run_from_config(config_path: &str) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Gesture Dataset Preparation Tool                ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let config = match PipelineConfig::load_toml(config_path) {
        Ok(c) => {
            println!("✅ Loaded configuration: {}", config_path);
            c
        }
        Err(e) => {
            eprintln!("❌ Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    if config.export.is_none() {
        eprintln!("❌ Configuration has no [export] section");
        std::process::exit(1);
    }

    print_config_summary(&config);

    if let Err(e) = run(&config) {
        eprintln!("❌ Export failed: {}", e);
        std::process::exit(1);
    }
}

fn print_config_summary(config: &PipelineConfig) {
    println!("┌─ Configuration Summary ───────────────────────────────────────┐");
    if let Some(metadata) = &config.metadata {
        println!("│ Experiment: {}", metadata.name);
    }
    println!(
        "│ Shape:      {} frames x {} features",
        config.sequence.target_length, config.sequence.feature_width
    );
    println!("│ Error mode: {:?}", config.batch.error_mode);
    println!(
        "│ Threads:    {}",
        if config.batch.parallel {
            config.batch.effective_threads().to_string()
        } else {
            "1 (sequential)".to_string()
        }
    );
    if let Some(export) = &config.export {
        for input in &export.inputs {
            println!("│ Input:      {}", input.display());
        }
        println!("│ Output:     {}", export.output_dir.display());
    }
    println!("└────────────────────────────────────────────────────────────────┘");
    println!();
}

/// Load, build and export.
fn run(config: &PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let export = config
        .export
        .as_ref()
        .ok_or("configuration has no export section")?;

    let records = load_files(&export.inputs, &config.fields)?;
    println!("📂 Loaded {} records", records.len());

    let builder = BatchBuilder::from_config(config)?;
    let batch = if config.batch.parallel {
        builder.build_parallel(&records)?
    } else {
        builder.build(&records)?
    };
    print_batch_summary(&batch);

    let mut exporter = NumpyExporter::new(&export.output_dir);
    if let Some(metadata) = &config.metadata {
        exporter = exporter.with_experiment(metadata.clone());
    }
    let result = exporter.export(&batch)?;

    println!();
    println!("✅ Export complete");
    println!("   Features: {}", result.features_path.display());
    println!("   Labels:   {}", result.labels_path.display());
    println!("   Classes:  {}", result.label_map_path.display());
    println!("   Metadata: {}", result.metadata_path.display());
    Ok(())
}

fn print_batch_summary(batch: &SampleBatch) {
    let stats = &batch.stats;
    println!(
        "🧮 Built {} samples {:?} in {:.2?}",
        batch.len(),
        batch.features.shape(),
        stats.elapsed
    );
    println!(
        "   Exact: {}, Truncated: {}, Padded: {}",
        stats.exact, stats.truncated, stats.padded
    );
    if stats.skipped() > 0 {
        println!(
            "   ⚠️  Skipped {} records ({} without landmarks, {} malformed)",
            stats.skipped(),
            stats.skipped_missing,
            stats.skipped_malformed
        );
    }

    let label_stats = batch.label_stats();
    println!("   Classes: {}", batch.num_classes());
    for class in &label_stats.classes {
        println!("     [{:>3}] {:<30} {}", class.index, class.token, class.count);
    }
}
