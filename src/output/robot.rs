//! Robot mode JSON output implementation.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument, trace, warn};

use crate::catalog::Catalog;
use crate::error::ScanError;
use crate::sanitize::PersistedKey;
use crate::sync::{ControlModel, SyncEntry, SyncReport};

use super::{Output, RobotFormat};

/// JSON output implementation for scripting.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    /// Output any serializable data as JSON to stdout.
    #[instrument(skip(self, data), fields(format = ?self.format))]
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        match json {
            Ok(json) => {
                trace!(json_len = json.len(), "JSON serialized");
                println!("{json}");
            }
            Err(e) => warn!(error = %e, "JSON serialization failed"),
        }
    }

    /// Output pretty JSON to stderr.
    fn output_json_stderr<T: Serialize>(&self, data: &T) {
        match serde_json::to_string_pretty(data) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => warn!(error = %e, "JSON serialization failed"),
        }
    }
}

impl Output for RobotOutput {
    fn success(&self, message: &str) {
        self.output_json(&json!({
            "success": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &ScanError) {
        debug!(error = %error, "Robot: error");
        self.output_json_stderr(&json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        }));
    }

    fn warning(&self, message: &str) {
        self.output_json(&json!({
            "warning": true,
            "message": message
        }));
    }

    fn info(&self, message: &str) {
        self.output_json(&json!({
            "info": true,
            "message": message
        }));
    }

    fn device_list(&self, devices: &[PathBuf]) {
        self.output_json(devices);
    }

    fn catalog(&self, catalog: &Catalog) {
        self.output_json(&json!({
            "symbologies": catalog.symbologies(),
            "settings": catalog.settings(),
        }));
    }

    fn control_model(&self, model: &ControlModel) {
        self.output_json(model);
    }

    fn sync_report(&self, report: &SyncReport) {
        self.output_json(&json!({
            "direction": report.direction,
            "device": report.device,
            "summary": report.summary(),
            "entries": report.entries,
        }));
    }

    fn edit_applied(&self, entry: &SyncEntry) {
        self.output_json(entry);
    }

    fn persisted_key(&self, name: &str, group: &str, key: &PersistedKey) {
        self.output_json(&json!({
            "name": name,
            "group": group,
            "key": key,
        }));
    }

    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        self.output_json(&json!({
            "version": version,
            "git_sha": git_sha,
            "build_time": build_time,
        }));
    }
}
