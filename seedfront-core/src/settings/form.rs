//! Flat view of the settings for the HTML form, and validation of what the
//! form posts back.

use std::collections::HashMap;

use serde_yaml::Value;

use super::SettingsError;
use super::document::{SettingsDocument, scalar_text};
use super::mode::FileMode;

/// Fields that must be present and non-empty in every submission.
pub const REQUIRED_FIELDS: [&str; 4] = [
    "seedbox_host",
    "seedbox_port",
    "seedbox_login",
    "seedbox_password",
];

/// Health check targets, in form order.
pub const HEALTHCHECK_KEYS: [&str; 2] = ["sync_seedbox", "sync_blackhole"];

/// `seedbox` section as the form shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedboxFields {
    pub host: String,
    pub port: String,
    pub login: String,
    pub password: String,
    pub timeout_enabled: bool,
    pub timeout: String,
    pub protocol: String,
    pub chmod_enabled: bool,
    pub chmod: String,
    pub tmp_path: String,
    pub watch_path: String,
    pub finished_path: String,
    pub prefixed_path: String,
    pub part_suffix: String,
    pub exclude_syncing: String,
}

impl Default for SeedboxFields {
    fn default() -> Self {
        Self {
            host: "my-seedbox.ltd".to_string(),
            port: "22".to_string(),
            login: "me".to_string(),
            password: "p4sw0rd".to_string(),
            timeout_enabled: false,
            timeout: "30".to_string(),
            protocol: "sftp".to_string(),
            chmod_enabled: false,
            chmod: "0o644".to_string(),
            tmp_path: "./tmp".to_string(),
            watch_path: "./watch".to_string(),
            finished_path: "./files".to_string(),
            prefixed_path: "./files".to_string(),
            part_suffix: ".part".to_string(),
            exclude_syncing: String::new(),
        }
    }
}

/// `local` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalFields {
    pub watch_path: String,
    pub download_path: String,
    pub db_file: String,
}

/// One entry under `healthchecks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthcheckFields {
    pub enabled: bool,
    pub ping_url: String,
}

/// Everything the settings page displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub seedbox: SeedboxFields,
    pub local: LocalFields,
    pub sync_seedbox: HealthcheckFields,
    pub sync_blackhole: HealthcheckFields,
}

impl SettingsForm {
    /// Builds the form from a loaded document, defaulting every missing field.
    pub fn from_document(doc: &SettingsDocument) -> Self {
        let mut form = Self::default();
        let text = |section: &str, key: &str, target: &mut String| {
            if let Some(value) = doc.get_text(&[section, key]) {
                *target = value;
            }
        };

        let s = &mut form.seedbox;
        text("seedbox", "host", &mut s.host);
        text("seedbox", "port", &mut s.port);
        text("seedbox", "login", &mut s.login);
        text("seedbox", "password", &mut s.password);
        text("seedbox", "protocol", &mut s.protocol);
        text("seedbox", "tmp_path", &mut s.tmp_path);
        text("seedbox", "watch_path", &mut s.watch_path);
        text("seedbox", "finished_path", &mut s.finished_path);
        text("seedbox", "prefixed_path", &mut s.prefixed_path);
        text("seedbox", "part_suffix", &mut s.part_suffix);
        text("seedbox", "exclude_syncing", &mut s.exclude_syncing);

        match doc.get(&["seedbox", "timeout"]) {
            Some(Value::Number(n)) => {
                s.timeout_enabled = true;
                s.timeout = n.to_string();
            }
            Some(Value::String(t)) if t.trim().parse::<u64>().is_ok() => {
                s.timeout_enabled = true;
                s.timeout = t.trim().to_string();
            }
            _ => {}
        }

        match doc.get(&["seedbox", "chmod"]) {
            Some(Value::Number(n)) => {
                if let Some(bits) = n.as_u64() {
                    s.chmod_enabled = true;
                    s.chmod = FileMode::new(bits as u32).to_string();
                }
            }
            Some(Value::String(t)) if t.parse::<FileMode>().is_ok() => {
                s.chmod_enabled = true;
                s.chmod = t.clone();
            }
            _ => {}
        }

        let l = &mut form.local;
        text("local", "watch_path", &mut l.watch_path);
        text("local", "download_path", &mut l.download_path);
        text("local", "db_file", &mut l.db_file);

        for key in HEALTHCHECK_KEYS {
            let check = form.healthcheck_mut(key);
            if let Some(value) = doc.get(&["healthchecks", key, "enabled"]) {
                check.enabled = yaml_truthy(value);
            }
            if let Some(url) = doc.get_text(&["healthchecks", key, "ping_url"]) {
                check.ping_url = url;
            }
        }

        form
    }

    /// Rebuilds the form from raw posted fields so a rejected submission can be
    /// shown again as the user typed it.
    pub fn from_submitted(fields: &HashMap<String, String>) -> Self {
        let mut form = Self::default();
        let text = |name: &str, target: &mut String| {
            if let Some(value) = fields.get(name) {
                *target = value.clone();
            }
        };

        let s = &mut form.seedbox;
        text("seedbox_host", &mut s.host);
        text("seedbox_port", &mut s.port);
        text("seedbox_login", &mut s.login);
        text("seedbox_password", &mut s.password);
        text("seedbox_timeout", &mut s.timeout);
        text("seedbox_protocol", &mut s.protocol);
        text("seedbox_chmod", &mut s.chmod);
        text("seedbox_tmp_path", &mut s.tmp_path);
        text("seedbox_watch_path", &mut s.watch_path);
        text("seedbox_finished_path", &mut s.finished_path);
        text("seedbox_prefixed_path", &mut s.prefixed_path);
        text("seedbox_part_suffix", &mut s.part_suffix);
        text("seedbox_exclude_syncing", &mut s.exclude_syncing);
        s.timeout_enabled = checkbox(fields, "seedbox_timeout_enabled");
        s.chmod_enabled = checkbox(fields, "seedbox_chmod_enabled");

        let l = &mut form.local;
        text("local_watch_path", &mut l.watch_path);
        text("local_download_path", &mut l.download_path);
        text("local_db_file", &mut l.db_file);

        for key in HEALTHCHECK_KEYS {
            let enabled = checkbox(fields, &format!("healthchecks_{key}_enabled"));
            let url = fields.get(&format!("healthchecks_{key}_ping_url")).cloned();
            let check = form.healthcheck_mut(key);
            check.enabled = enabled;
            if let Some(url) = url {
                check.ping_url = url;
            }
        }

        form
    }

    /// Health check entry by its YAML key.
    pub fn healthcheck(&self, key: &str) -> &HealthcheckFields {
        match key {
            "sync_blackhole" => &self.sync_blackhole,
            _ => &self.sync_seedbox,
        }
    }

    fn healthcheck_mut(&mut self, key: &str) -> &mut HealthcheckFields {
        match key {
            "sync_blackhole" => &mut self.sync_blackhole,
            _ => &mut self.sync_seedbox,
        }
    }
}

/// One `healthchecks` entry of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthcheckSubmission {
    pub enabled: bool,
    pub ping_url: Option<String>,
}

/// A validated form post, ready to merge into a document.
///
/// Optional text fields are `None` when the post did not carry them, so the
/// document keeps its current value. Checkboxes are always written since an
/// unchecked box is simply absent from the post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSubmission {
    pub host: String,
    pub port: u16,
    pub login: String,
    pub password: String,
    /// `None` when the timeout checkbox is off
    pub timeout: Option<u64>,
    /// `None` when the chmod checkbox is off
    pub chmod: Option<FileMode>,
    pub protocol: Option<String>,
    pub tmp_path: Option<String>,
    pub watch_path: Option<String>,
    pub finished_path: Option<String>,
    pub prefixed_path: Option<String>,
    pub part_suffix: Option<String>,
    pub exclude_syncing: Option<String>,
    pub local_watch_path: Option<String>,
    pub local_download_path: Option<String>,
    pub local_db_file: Option<String>,
    pub sync_seedbox: HealthcheckSubmission,
    pub sync_blackhole: HealthcheckSubmission,
}

impl SettingsSubmission {
    /// Validates posted form fields.
    ///
    /// # Errors
    ///
    /// - `SettingsError::MissingFields` - If a required field is absent or empty
    /// - `SettingsError::InvalidPort` - If the port is not a `u16`
    /// - `SettingsError::InvalidTimeout` - If an enabled timeout is not a number
    /// - `SettingsError::InvalidChmod` - If an enabled chmod is not octal
    pub fn parse(fields: &HashMap<String, String>) -> Result<Self, SettingsError> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|name| fields.get(**name).is_none_or(|v| v.trim().is_empty()))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SettingsError::MissingFields { fields: missing });
        }

        let optional = |name: &str| fields.get(name).cloned();
        let field = |name: &str| optional(name).unwrap_or_default();

        let port_text = field("seedbox_port");
        let port = port_text
            .trim()
            .parse::<u16>()
            .map_err(|_| SettingsError::InvalidPort { value: port_text })?;

        let timeout = if checkbox(fields, "seedbox_timeout_enabled") {
            let value = field("seedbox_timeout");
            Some(
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| SettingsError::InvalidTimeout { value })?,
            )
        } else {
            None
        };

        let chmod = if checkbox(fields, "seedbox_chmod_enabled") {
            Some(field("seedbox_chmod").parse::<FileMode>()?)
        } else {
            None
        };

        let healthcheck = |key: &str| HealthcheckSubmission {
            enabled: checkbox(fields, &format!("healthchecks_{key}_enabled")),
            ping_url: optional(&format!("healthchecks_{key}_ping_url")),
        };

        Ok(Self {
            host: field("seedbox_host"),
            port,
            login: field("seedbox_login"),
            password: field("seedbox_password"),
            timeout,
            chmod,
            protocol: optional("seedbox_protocol"),
            tmp_path: optional("seedbox_tmp_path"),
            watch_path: optional("seedbox_watch_path"),
            finished_path: optional("seedbox_finished_path"),
            prefixed_path: optional("seedbox_prefixed_path"),
            part_suffix: optional("seedbox_part_suffix"),
            exclude_syncing: optional("seedbox_exclude_syncing"),
            local_watch_path: optional("local_watch_path"),
            local_download_path: optional("local_download_path"),
            local_db_file: optional("local_db_file"),
            sync_seedbox: healthcheck("sync_seedbox"),
            sync_blackhole: healthcheck("sync_blackhole"),
        })
    }
}

impl SettingsDocument {
    /// Merges a validated submission into the document.
    ///
    /// Keys the form does not cover, and optional fields missing from the
    /// post, are left alone.
    pub fn apply(&mut self, submission: &SettingsSubmission) {
        for (key, value) in [
            ("host", &submission.host),
            ("login", &submission.login),
            ("password", &submission.password),
        ] {
            self.set(&["seedbox", key], Value::from(value.as_str()));
        }
        self.set(&["seedbox", "port"], Value::from(submission.port));

        match submission.timeout {
            Some(timeout) => self.set(&["seedbox", "timeout"], Value::from(timeout)),
            None => self.set(&["seedbox", "timeout"], Value::Bool(false)),
        }
        match submission.chmod {
            Some(mode) => self.set_mode(&["seedbox", "chmod"], mode),
            None => self.set(&["seedbox", "chmod"], Value::Bool(false)),
        }

        let optional: [(&[&str], &Option<String>); 10] = [
            (&["seedbox", "protocol"], &submission.protocol),
            (&["seedbox", "tmp_path"], &submission.tmp_path),
            (&["seedbox", "watch_path"], &submission.watch_path),
            (&["seedbox", "finished_path"], &submission.finished_path),
            (&["seedbox", "prefixed_path"], &submission.prefixed_path),
            (&["seedbox", "part_suffix"], &submission.part_suffix),
            (&["seedbox", "exclude_syncing"], &submission.exclude_syncing),
            (&["local", "watch_path"], &submission.local_watch_path),
            (&["local", "download_path"], &submission.local_download_path),
            (&["local", "db_file"], &submission.local_db_file),
        ];
        for (path, value) in optional {
            if let Some(value) = value {
                self.set(path, Value::from(value.as_str()));
            }
        }

        for (key, check) in [
            ("sync_seedbox", &submission.sync_seedbox),
            ("sync_blackhole", &submission.sync_blackhole),
        ] {
            self.set(&["healthchecks", key, "enabled"], Value::Bool(check.enabled));
            if let Some(ping_url) = &check.ping_url {
                self.set(&["healthchecks", key, "ping_url"], Value::from(ping_url.as_str()));
            }
        }
    }
}

/// HTML checkbox semantics: present with a value other than empty, `0`,
/// `false` or `off`.
pub fn checkbox(fields: &HashMap<String, String>, name: &str) -> bool {
    fields.get(name).is_some_and(|value| {
        let value = value.trim().to_ascii_lowercase();
        !matches!(value.as_str(), "" | "0" | "false" | "off")
    })
}

fn yaml_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        other => scalar_text(other).is_some_and(|t| {
            matches!(t.to_ascii_lowercase().as_str(), "true" | "yes" | "on" | "1")
        }),
    }
}
