//! Human-friendly output implementation using console styling.

use std::path::PathBuf;

use tracing::{debug, instrument, trace};

use crate::catalog::{Catalog, ValueKind};
use crate::control::ControlKind;
use crate::error::ScanError;
use crate::sanitize::PersistedKey;
use crate::sync::{ControlModel, ControlState, Direction, Outcome, SyncEntry, SyncReport};
use crate::theme::ScanTheme;

use super::Output;

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    theme: ScanTheme,
}

impl HumanOutput {
    #[instrument]
    pub fn new(color: bool) -> Self {
        debug!("Creating HumanOutput");
        if !color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        Self {
            theme: ScanTheme::default(),
        }
    }

    fn header(&self, title: &str) {
        println!("{}", self.theme.header.apply_to(title));
    }

    fn control_line(&self, control: &ControlState) -> String {
        let value = match (&control.kind, control.value) {
            (ControlKind::Boolean { .. }, Some(v)) => {
                if v == 0 { "off".to_string() } else { "on".to_string() }
            }
            (ControlKind::Menu { options, .. }, Some(v)) => options
                .iter()
                .find(|item| item.value == v)
                .map_or_else(|| v.to_string(), |item| format!("{} ({v})", item.label)),
            (_, Some(v)) => v.to_string(),
            (_, None) => "-".to_string(),
        };
        let detail = match &control.kind {
            ControlKind::Boolean { .. } => "bool".to_string(),
            ControlKind::Integer { min, max, step, .. } => {
                if *step > 1 {
                    format!("{min}..{max} step {step}")
                } else {
                    format!("{min}..{max}")
                }
            }
            ControlKind::Menu { options, .. } => format!("menu, {} options", options.len()),
            ControlKind::Button => "action".to_string(),
            ControlKind::Unsupported { typ } => typ.clone(),
        };
        let key = control
            .key
            .as_ref()
            .map(|k| format!("  {}", self.theme.key.apply_to(k)))
            .unwrap_or_default();
        format!(
            "  {:<34} {} {}{key}",
            control.name,
            self.theme.value.apply_to(format!("{value:<12}")),
            self.theme.muted.apply_to(format!("[{detail}]")),
        )
    }
}

impl Output for HumanOutput {
    fn success(&self, message: &str) {
        println!("{}{message}", self.theme.success.apply_to("[OK] "));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &ScanError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        eprintln!("{} {error}", self.theme.error.apply_to("Error:"));
        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            eprintln!("{} {}", self.theme.label.apply_to("Hint:"), suggestion);
        }
    }

    fn warning(&self, message: &str) {
        println!("{}{message}", self.theme.warning.apply_to("[WARN] "));
    }

    fn info(&self, message: &str) {
        println!("{}{message}", self.theme.accent.apply_to("[INFO] "));
    }

    #[instrument(skip(self, devices), fields(device_count = devices.len()))]
    fn device_list(&self, devices: &[PathBuf]) {
        if devices.is_empty() {
            self.warning("No video devices found");
            return;
        }
        self.header("Video devices:");
        for device in devices {
            println!("  {}", device.display());
        }
    }

    fn catalog(&self, catalog: &Catalog) {
        self.header("Symbologies:");
        for entry in catalog.symbologies() {
            let note = if entry.aggregate { " (enable only)" } else { "" };
            println!(
                "  {:<26}{}",
                format!("{}{note}", entry.name),
                self.theme.key.apply_to(crate::sanitize::enable_key(entry))
            );
        }
        println!();
        self.header("Settings:");
        for setting in catalog.settings() {
            let kind = match setting.kind {
                ValueKind::Boolean => "bool",
                ValueKind::Integer => "integer",
            };
            println!("  {:<14}{}", setting.name, self.theme.muted.apply_to(kind));
        }
    }

    #[instrument(skip_all, fields(device = %model.device))]
    fn control_model(&self, model: &ControlModel) {
        self.header(&model.device);
        println!();
        self.header("Symbologies:");
        for state in &model.symbologies {
            let flag = if state.enabled {
                self.theme.enabled.apply_to("on ")
            } else {
                self.theme.disabled.apply_to("off")
            };
            println!("  {flag} {}", state.name);
            if !state.settings.is_empty() {
                let settings: Vec<String> = state
                    .settings
                    .iter()
                    .map(|s| format!("{}={}", s.name, s.value))
                    .collect();
                println!("      {}", self.theme.muted.apply_to(settings.join(" ")));
            }
        }

        for group in &model.groups {
            println!();
            self.header(&format!("{}:", group.name));
            for control in &group.controls {
                println!("{}", self.control_line(control));
            }
        }
        if model.groups.is_empty() {
            println!();
            self.info("Device exposes no controls");
        }
    }

    #[instrument(skip_all, fields(direction = ?report.direction))]
    fn sync_report(&self, report: &SyncReport) {
        for entry in &report.entries {
            match entry.outcome {
                Outcome::Rejected => self.warning(&format!(
                    "{}/{} rejected {}: {}",
                    entry.group,
                    entry.key,
                    entry.value.unwrap_or_default(),
                    entry.reason.as_deref().unwrap_or("unknown reason")
                )),
                Outcome::Skipped => trace!(key = %entry.key, "skipped"),
                Outcome::Applied | Outcome::Persisted => {}
            }
        }

        let summary = report.summary();
        let message = match report.direction {
            Direction::Load => format!(
                "Applied {} stored values to {} ({} skipped, {} rejected)",
                summary.applied, report.device, summary.skipped, summary.rejected
            ),
            Direction::Save => format!(
                "Saved {} values from {} ({} skipped)",
                summary.persisted, report.device, summary.skipped
            ),
            Direction::Edit => format!(
                "Applied {} edits to {}",
                summary.applied + summary.persisted,
                report.device
            ),
        };
        self.success(&message);
    }

    fn edit_applied(&self, entry: &SyncEntry) {
        let value = entry
            .value
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        match entry.outcome {
            Outcome::Persisted => {
                self.success(&format!("{}/{} = {value} (saved)", entry.group, entry.key));
            }
            _ => self.success(&format!("{} triggered", entry.key)),
        }
    }

    fn persisted_key(&self, name: &str, group: &str, key: &PersistedKey) {
        println!(
            "{} {} {}",
            name,
            self.theme.muted.apply_to("->"),
            self.theme.key.apply_to(format!("{group}/{key}"))
        );
    }

    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        let label = |name: &str| format!("  {name:<10}");

        println!(
            "{}{}",
            self.theme.label.apply_to(label("Version")),
            self.theme.value.apply_to(version)
        );
        if let Some(sha) = git_sha {
            println!("{}{sha}", self.theme.label.apply_to(label("Commit")));
        }
        if let Some(time) = build_time {
            println!("{}{time}", self.theme.label.apply_to(label("Built")));
        }
    }
}
