//! scanctl - camera and barcode decoder settings with persistent sync.
//!
//! Provides both human-friendly and machine-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io;

use clap::Parser;
use console::style;
use serde::Serialize;
use tracing::debug;

use scanctl::catalog::{Catalog, ENABLE_SETTING_NAME};
use scanctl::cli::{self, Cli, Commands, parse_value};
use scanctl::device::mock::MockDevice;
use scanctl::device::{self, BoxedDevice, DeviceOperations};
use scanctl::error::{Result, ScanError};
use scanctl::logging;
use scanctl::output::{Output, OutputMode};
use scanctl::sanitize::{control_key, enable_key, setting_key};
use scanctl::store::{self, ConfigStore, StoreAdapter};
use scanctl::sync::{CAMERA_GROUP, ControlEdit, SYMBOLOGY_GROUP, Session, Synchronizer};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> bool {
        option_env!("VERGEN_GIT_DIRTY") == Some("true")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }
}

type CliSession<'a> = Session<'a, dyn DeviceOperations, Box<dyn ConfigStore>>;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.use_json(), cli.verbose, cli.quiet);

    let out = OutputMode::from_cli(&cli).into_output();

    if let Err(e) = run(&cli, out.as_ref()) {
        out.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, out: &dyn Output) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Devices(args)) => cmd_devices(out, args),
        Some(Commands::Catalog) => {
            out.catalog(&Catalog::builtin());
            Ok(())
        }
        Some(Commands::Controls) => cmd_controls(cli, out),
        Some(Commands::Load) => cmd_load(cli, out),
        Some(Commands::Save) => cmd_save(cli, out),
        Some(Commands::Set(args)) => cmd_set(cli, out, args),
        Some(Commands::Config(args)) => cmd_config(cli, out, args),
        Some(Commands::Key(args)) => cmd_key(out, args),
        Some(Commands::Version) => cmd_version(out),
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

// === Quick Start ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    commands: &'static [(&'static str, &'static str)],
    output_modes: &'static [&'static str],
}

const QUICK_START: &[(&str, &str)] = &[
    ("scanctl devices", "List video devices"),
    ("scanctl catalog", "List symbologies and settings"),
    ("scanctl controls", "Show controls with current values"),
    ("scanctl set \"Auto Focus\" 1", "Change and save a camera control"),
    ("scanctl config Code-39 min-length 4", "Change and save a decoder setting"),
    ("scanctl save", "Save the current device state"),
    ("scanctl --mock controls", "Try without a camera"),
];

fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        let help = RobotQuickStart {
            tool: "scanctl",
            version: build_info::VERSION,
            description: "Camera and barcode decoder settings with persistent sync",
            commands: QUICK_START,
            output_modes: &["--format=text", "--robot or --format=json", "--format=json-compact"],
        };
        match serde_json::to_string_pretty(&help) {
            Ok(json) => println!("{json}"),
            Err(e) => return Err(ScanError::Other(e.to_string())),
        }
        return Ok(());
    }

    println!(
        "{} {} - scanner settings\n",
        style("scanctl").bold().cyan(),
        build_info::VERSION
    );
    println!("{}", style("QUICK START").bold().underlined());
    println!();
    for (command, about) in QUICK_START {
        println!("  {}{about}", style(format!("{command:<40}")).green());
    }
    println!();
    println!("Run {} for full help", style("scanctl --help").yellow());
    Ok(())
}

// === Session Helpers ===

fn open_scanner(cli: &Cli) -> Result<BoxedDevice> {
    if cli.mock {
        debug!("Using mock webcam");
        return Ok(Box::new(MockDevice::webcam()));
    }
    device::open_device(&cli.device)
}

fn open_session<'a>(
    cli: &Cli,
    device: &'a (dyn DeviceOperations + 'static),
) -> Result<CliSession<'a>> {
    let path = match &cli.store {
        Some(path) => path.clone(),
        None => store::default_store_path()?,
    };
    debug!(path = %path.display(), "Using settings store");
    let backend = store::open_store(&path)?;
    Ok(Session::new(
        Synchronizer::default(),
        device,
        StoreAdapter::new(backend),
    ))
}

/// Runs `edit` inside a started session; the session is shut down even if
/// the edit fails.
fn with_edit(cli: &Cli, out: &dyn Output, edit: &ControlEdit) -> Result<()> {
    let device = open_scanner(cli)?;
    let mut session = open_session(cli, device.as_ref())?;
    session.startup();
    session.enable();
    let result = session.edit(edit);
    session.shutdown();
    out.edit_applied(&result?);
    Ok(())
}

// === Command Implementations ===

#[allow(clippy::unnecessary_wraps)]
fn cmd_devices(out: &dyn Output, args: &cli::DevicesArgs) -> Result<()> {
    out.device_list(&device::list_video_devices(&args.dir));
    Ok(())
}

fn cmd_controls(cli: &Cli, out: &dyn Output) -> Result<()> {
    let device = open_scanner(cli)?;
    let mut session = open_session(cli, device.as_ref())?;
    session.startup();
    session.enable();
    if let Some(model) = session.model() {
        out.control_model(model);
    }
    session.shutdown();
    Ok(())
}

fn cmd_load(cli: &Cli, out: &dyn Output) -> Result<()> {
    let device = open_scanner(cli)?;
    let mut session = open_session(cli, device.as_ref())?;
    session.startup();
    let report = session.enable();
    out.sync_report(&report);
    session.shutdown();
    Ok(())
}

fn cmd_save(cli: &Cli, out: &dyn Output) -> Result<()> {
    let device = open_scanner(cli)?;
    let mut session = open_session(cli, device.as_ref())?;
    session.startup();
    session.enable();
    let (report, _) = session.shutdown();
    out.sync_report(&report);
    Ok(())
}

fn cmd_set(cli: &Cli, out: &dyn Output, args: &cli::SetArgs) -> Result<()> {
    let edit = ControlEdit::Control {
        name: args.control.clone(),
        value: parse_value(&args.control, &args.value)?,
    };
    with_edit(cli, out, &edit)
}

fn cmd_config(cli: &Cli, out: &dyn Output, args: &cli::ConfigArgs) -> Result<()> {
    let catalog = Catalog::builtin();
    let entry = catalog.find_symbology(&args.symbology)?;
    let value = parse_value(&args.setting, &args.value)?;

    let edit = if args.setting.eq_ignore_ascii_case(ENABLE_SETTING_NAME) {
        ControlEdit::SymbologyEnabled {
            symbology: entry.symbology,
            enabled: value != 0,
        }
    } else {
        ControlEdit::SymbologySetting {
            symbology: entry.symbology,
            setting: catalog.find_setting(&args.setting)?.setting,
            value,
        }
    };
    with_edit(cli, out, &edit)
}

fn cmd_key(out: &dyn Output, args: &cli::KeyArgs) -> Result<()> {
    let Some(symbology) = &args.symbology else {
        out.persisted_key(&args.name, CAMERA_GROUP, &control_key(&args.name));
        return Ok(());
    };

    let catalog = Catalog::builtin();
    let entry = catalog.find_symbology(symbology)?;
    let key = if args.name.eq_ignore_ascii_case(ENABLE_SETTING_NAME) {
        enable_key(entry)
    } else {
        if entry.aggregate {
            return Err(ScanError::AggregateHasNoSettings {
                name: entry.name.to_string(),
            });
        }
        setting_key(entry, catalog.find_setting(&args.name)?)
    };
    out.persisted_key(&args.name, SYMBOLOGY_GROUP, &key);
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn cmd_version(out: &dyn Output) -> Result<()> {
    let sha = format!(
        "{}{}",
        build_info::git_sha(),
        if build_info::git_dirty() { " (dirty)" } else { "" }
    );
    out.version_info(
        build_info::VERSION,
        Some(&sha),
        Some(build_info::build_timestamp()),
    );
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn cmd_completions(args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "scanctl", &mut io::stdout());
    Ok(())
}
