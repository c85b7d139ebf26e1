//! mpo-extract - Split Multi Picture Object files into standalone JPEGs.
//!
//! This binary is the file I/O front end of the decoder.

use bytes::Bytes;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mpo_extract::{
    config::{Cli, Command, ExtractConfig, InspectConfig, InspectFormat, ScanConfig},
    decode_container_with_limits, extract_ranges_with_strategy, output_path, scan_jpeg_candidates,
    ContainerView, ExportError, JpegExporter,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = cli.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    match cli.command {
        Command::Extract(config) => run_extract(config).await,
        Command::Inspect(config) => run_inspect(config).await,
        Command::Scan(config) => run_scan(config).await,
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "mpo_extract=debug"
    } else {
        "mpo_extract=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Extract Command
// =============================================================================

async fn run_extract(config: ExtractConfig) -> ExitCode {
    info!(
        files = config.files.len(),
        strategy = ?config.strategy(),
        mode = ?config.export_mode(),
        "Extracting"
    );

    if let Some(ref dir) = config.output_dir {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            error!("Failed to create {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
    }

    let config = Arc::new(config);
    let mut tasks = JoinSet::new();
    for path in config.files.iter().cloned() {
        let config = Arc::clone(&config);
        tasks.spawn(async move {
            let result = extract_file(&path, &config).await;
            (path, result)
        });
    }

    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((path, Ok(written))) => {
                info!("{}: wrote {} image(s)", path.display(), written.len());
                for output in &written {
                    debug!("  {}", output.display());
                }
            }
            Ok((path, Err(e))) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
            Err(e) => {
                error!("Extraction task failed: {}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        error!("{} of {} file(s) failed", failures, config.files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Split one file, returning the paths written.
async fn extract_file(path: &Path, config: &ExtractConfig) -> Result<Vec<PathBuf>, ExportError> {
    let data = tokio::fs::read(path).await?;

    let strategy = config.strategy();
    let limits = config.limits.decode_limits();
    let exporter = JpegExporter::new(config.export_mode());

    let images = tokio::task::spawn_blocking(move || -> Result<Vec<Bytes>, ExportError> {
        let ranges = extract_ranges_with_strategy(&data, strategy, limits)?;
        exporter.export_all(&data, &ranges)
    })
    .await
    .map_err(|e| ExportError::Io(e.to_string()))??;

    if images.is_empty() {
        warn!("{}: no embedded images found", path.display());
    }

    let mut written = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let out = output_path(path, config.output_dir.as_deref(), index);
        tokio::fs::write(&out, image).await?;
        written.push(out);
    }

    Ok(written)
}

// =============================================================================
// Inspect Command
// =============================================================================

async fn run_inspect(config: InspectConfig) -> ExitCode {
    let data = match tokio::fs::read(&config.file).await {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to read {}: {}", config.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let container = match decode_container_with_limits(&data, config.limits.decode_limits()) {
        Ok(container) => container,
        Err(e) => {
            error!("{}: {}", config.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match config.format {
        InspectFormat::Json => match serde_json::to_string_pretty(&container) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize container: {}", e);
                return ExitCode::FAILURE;
            }
        },
        InspectFormat::Text => print_container(&config.file, &data, &container),
    }

    ExitCode::SUCCESS
}

fn print_container(path: &Path, data: &[u8], container: &ContainerView) {
    println!("{}", path.display());
    if let Some(index) = container.index() {
        println!(
            "  MPF version {}, {} image(s){}",
            index.version_text().unwrap_or_else(|| "?".to_string()),
            index.image_count(),
            index
                .total_frames()
                .map(|frames| format!(", {} total frame(s)", frames))
                .unwrap_or_default()
        );
    }

    let exporter = JpegExporter::default();
    let unique_ids = container.index().and_then(|index| index.unique_ids.as_ref());

    for (i, (image, range)) in container.images.iter().zip(container.ranges()).enumerate() {
        println!();
        println!(
            "  Image {}: offset {}, {} bytes, {:?}",
            i, range.start, range.length, image.header.byte_order
        );

        if let Some(entry) = container.entries().get(i) {
            println!(
                "    Type: {:?}{}",
                entry.mp_type(),
                if entry.is_representative() {
                    " (representative)"
                } else {
                    ""
                }
            );
        }

        if let Some((width, height)) = range
            .slice(data)
            .and_then(|source| exporter.dimensions(source).ok())
        {
            println!("    Size: {}x{}", width, height);
        }

        if let Some(uid) = unique_ids.and_then(|ids| ids.get(i)) {
            if !uid.is_blank() {
                println!("    Unique ID: {}", uid.as_text());
            }
        }

        let Some(attributes) = image.attributes.as_ref() else {
            continue;
        };
        if let Some(number) = attributes.individual_number() {
            println!("    Individual number: {}", number);
        }
        if let Some(base) = attributes.base_viewpoint_number() {
            println!("    Base viewpoint: {}", base);
        }
        if let Some(angle) = attributes.convergence_angle() {
            println!("    Convergence angle: {:.3} deg", angle);
        }
        if let Some(length) = attributes.baseline_length() {
            println!("    Baseline length: {:.4} m", length);
        }
    }
}

// =============================================================================
// Scan Command
// =============================================================================

async fn run_scan(config: ScanConfig) -> ExitCode {
    let data = match tokio::fs::read(&config.file).await {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to read {}: {}", config.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match scan_jpeg_candidates(&data) {
        Ok(ranges) => {
            println!("{}: {} candidate(s)", config.file.display(), ranges.len());
            for (i, range) in ranges.iter().enumerate() {
                println!("  {}: offset {}, {} bytes", i, range.start, range.length);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}: {}", config.file.display(), e);
            ExitCode::FAILURE
        }
    }
}
