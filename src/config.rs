//! Command-line configuration for mpo-extract.
//!
//! Arguments are parsed with clap. Options that tune decoding can also be
//! set through environment variables with the `MPO_` prefix:
//!
//! - `MPO_OUTPUT_DIR` - Directory for extracted images (default: next to the input)
//! - `MPO_STRATEGY` - `auto`, `structured` or `brute-force` (default: auto)
//! - `MPO_REENCODE` - Re-encode images instead of copying bytes (default: false)
//! - `MPO_JPEG_QUALITY` - Re-encode quality (default: 90)
//! - `MPO_MAX_IMAGES` - Maximum NumberOfImages accepted (default: 64)
//! - `MPO_MAX_ENTRIES` - Maximum attribute directory entries (default: 64)
//! - `MPO_MAX_CANDIDATES` - Maximum APP2 markers examined per search (default: 4096)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::export::{ExportMode, DEFAULT_JPEG_QUALITY};
use crate::format::{DecodeLimits, ExtractStrategy};

// =============================================================================
// CLI Arguments
// =============================================================================

/// mpo-extract - Split Multi Picture Object files into standalone JPEGs.
///
/// Reads the MP Format metadata of stereo and multi-view camera files and
/// writes every embedded image to its own file.
#[derive(Parser, Debug, Clone)]
#[command(name = "mpo-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write every embedded image to `<stem>_<index>.jpg`.
    Extract(ExtractConfig),

    /// Print the decoded MPF metadata of a file.
    Inspect(InspectConfig),

    /// List JPEG start signatures without reading MPF metadata.
    Scan(ScanConfig),
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Extract(config) => config.validate(),
            Command::Inspect(config) => config.limits.validate(),
            Command::Scan(_) => Ok(()),
        }
    }
}

// =============================================================================
// Shared Options
// =============================================================================

/// Decode limits shared by the subcommands that read MPF metadata.
#[derive(Args, Debug, Clone)]
pub struct LimitArgs {
    /// Maximum number of images a container may declare.
    #[arg(long, default_value_t = DecodeLimits::DEFAULT_MAX_IMAGES, env = "MPO_MAX_IMAGES")]
    pub max_images: u32,

    /// Maximum entry count of an individual attributes directory.
    #[arg(long, default_value_t = DecodeLimits::DEFAULT_MAX_DIRECTORY_ENTRIES, env = "MPO_MAX_ENTRIES")]
    pub max_entries: u16,

    /// Maximum APP2 markers examined per segment search.
    #[arg(long, default_value_t = DecodeLimits::DEFAULT_MAX_SCAN_CANDIDATES, env = "MPO_MAX_CANDIDATES")]
    pub max_candidates: usize,
}

impl LimitArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_images == 0 {
            return Err("max_images must be greater than 0".to_string());
        }
        if self.max_candidates == 0 {
            return Err("max_candidates must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_images: self.max_images,
            max_directory_entries: self.max_entries,
            max_scan_candidates: self.max_candidates,
        }
    }
}

impl Default for LimitArgs {
    fn default() -> Self {
        Self {
            max_images: DecodeLimits::DEFAULT_MAX_IMAGES,
            max_entries: DecodeLimits::DEFAULT_MAX_DIRECTORY_ENTRIES,
            max_candidates: DecodeLimits::DEFAULT_MAX_SCAN_CANDIDATES,
        }
    }
}

/// Command-line spelling of [`ExtractStrategy`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyArg {
    #[default]
    Auto,
    Structured,
    BruteForce,
}

impl From<StrategyArg> for ExtractStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => ExtractStrategy::Auto,
            StrategyArg::Structured => ExtractStrategy::Structured,
            StrategyArg::BruteForce => ExtractStrategy::BruteForce,
        }
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ExtractConfig {
    /// MPO files to split.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory for the extracted images.
    ///
    /// If not specified, images are written next to their input file.
    #[arg(short, long, env = "MPO_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// How embedded images are located.
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto, env = "MPO_STRATEGY")]
    pub strategy: StrategyArg,

    /// Decode and re-encode each image instead of copying its bytes.
    #[arg(long, default_value_t = false, env = "MPO_REENCODE")]
    pub reencode: bool,

    /// JPEG quality used with --reencode (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "MPO_JPEG_QUALITY")]
    pub quality: u8,

    #[command(flatten)]
    pub limits: LimitArgs,
}

impl ExtractConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.files.is_empty() {
            return Err("At least one input file is required".to_string());
        }

        if self.quality == 0 || self.quality > 100 {
            return Err("quality must be between 1 and 100".to_string());
        }

        self.limits.validate()
    }

    pub fn export_mode(&self) -> ExportMode {
        if self.reencode {
            ExportMode::Reencode {
                quality: self.quality,
            }
        } else {
            ExportMode::Passthrough
        }
    }

    pub fn strategy(&self) -> ExtractStrategy {
        self.strategy.into()
    }
}

/// Output format of `inspect`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InspectFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct InspectConfig {
    /// MPO file to inspect.
    pub file: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = InspectFormat::Text)]
    pub format: InspectFormat,

    #[command(flatten)]
    pub limits: LimitArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ScanConfig {
    /// File to scan.
    pub file: PathBuf,
}

// =============================================================================
// Tests
// =============================================================================
