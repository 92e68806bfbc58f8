//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// scanctl - Camera and barcode decoder settings with persistent sync.
///
/// Device commands apply stored settings when the device opens and save the
/// final device state when they finish.
///
/// Robot Mode: Use --robot or --format json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "scanctl", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "SCANCTL_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Video device node
    #[arg(
        long,
        short = 'd',
        global = true,
        env = "SCANCTL_DEVICE",
        default_value = "/dev/video0"
    )]
    pub device: PathBuf,

    /// Use the built-in mock webcam instead of a real device
    #[arg(long, global = true)]
    pub mock: bool,

    /// Settings file (.toml, or .db/.sqlite for SQLite)
    #[arg(long, short = 's', global = true, env = "SCANCTL_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Discovery ===
    /// List video device nodes
    Devices(DevicesArgs),

    /// List symbologies and decoder settings compiled into this build
    Catalog,

    /// Apply stored settings, then show every control with its current value
    Controls,

    // === Synchronization ===
    /// Apply stored settings to the device
    Load,

    /// Save the current device state
    Save,

    /// Change a device control and persist it
    Set(SetArgs),

    /// Change a symbology's decoder setting and persist it
    Config(ConfigArgs),

    /// Show the store key a control or setting is saved under
    Key(KeyArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct DevicesArgs {
    /// Directory to scan for device nodes
    #[arg(long, default_value = "/dev")]
    pub dir: PathBuf,
}

/// Arguments for changing a device control.
///
/// # Examples
///
/// ```bash
/// scanctl set "Auto Focus" 1
/// scanctl set Auto_Focus true
/// ```
#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Control display name or store key
    pub control: String,

    /// New value (integer, or true/false)
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Arguments for changing a decoder setting.
///
/// # Examples
///
/// ```bash
/// scanctl config Code-39 min-length 4
/// scanctl config "QR code" enable false
/// ```
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Symbology display name
    pub symbology: String,

    /// Setting name, or "enable"
    pub setting: String,

    /// New value (integer, or true/false)
    pub value: String,
}

#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Control name, or setting name together with --symbology
    pub name: String,

    /// Treat NAME as a setting of this symbology
    #[arg(long)]
    pub symbology: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

/// Parse a user-supplied control value.
pub fn parse_value(name: &str, raw: &str) -> crate::error::Result<i64> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" => Ok(1),
        "false" | "off" | "no" => Ok(0),
        other => other.parse().map_err(|_| crate::error::ScanError::InvalidValue {
            name: name.to_string(),
            value: raw.to_string(),
        }),
    }
}
