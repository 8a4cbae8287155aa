//! Editing the sync tool's YAML configuration.
//!
//! [`SettingsDocument`] holds the file contents, [`SettingsForm`] is what the
//! settings page shows and [`SettingsSubmission`] is a validated post ready to
//! be merged back and written.

pub mod document;
pub mod form;
pub mod mode;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use document::SettingsDocument;
pub use form::{
    HealthcheckFields, HealthcheckSubmission, LocalFields, SeedboxFields, SettingsForm,
    SettingsSubmission,
};
pub use mode::FileMode;

/// Errors raised while loading, validating or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Required form fields were absent or empty
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields {
        /// Field names, in form order
        fields: Vec<String>,
    },

    /// Port is not a number between 0 and 65535
    #[error("Port must be a number between 0 and 65535")]
    InvalidPort {
        /// Submitted text
        value: String,
    },

    /// Timeout is enabled but not a whole number of seconds
    #[error("Timeout must be a number")]
    InvalidTimeout {
        /// Submitted text
        value: String,
    },

    /// Chmod is enabled but not 1 to 4 octal digits
    #[error("Invalid chmod '{value}': expected octal digits such as 755 or 0o644")]
    InvalidChmod {
        /// Submitted text
        value: String,
    },

    /// The configuration file is missing or cannot be opened for writing
    #[error("Configuration file is read-only")]
    ReadOnly {
        /// Path that was checked
        path: PathBuf,
    },

    /// The YAML document's top level is not a mapping
    #[error("Configuration file must contain a YAML mapping")]
    NotMapping,

    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML could not be parsed or emitted
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Whether the settings file cannot be edited in place.
///
/// A missing file counts as read-only, as does one the process cannot open for
/// both reading and writing.
pub fn is_read_only(path: &Path) -> bool {
    if !path.is_file() {
        return true;
    }
    std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .is_err()
}

/// Validates posted fields, merges them into the file at `path` and saves it.
///
/// Nothing is written unless validation succeeds. Returns the saved document.
///
/// # Errors
///
/// - `SettingsError::ReadOnly` - If the file cannot be edited
/// - Validation errors from [`SettingsSubmission::parse`]
/// - `SettingsError::Io` / `SettingsError::Yaml` - If loading or saving fails
pub fn save_submission(
    path: &Path,
    fields: &HashMap<String, String>,
) -> Result<SettingsDocument, SettingsError> {
    if is_read_only(path) {
        return Err(SettingsError::ReadOnly {
            path: path.to_path_buf(),
        });
    }

    let submission = SettingsSubmission::parse(fields)?;
    let mut document = SettingsDocument::load(path)?;
    document.apply(&submission);
    document.save(path)?;

    tracing::info!("Saved settings to {}", path.display());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL: &str = "seedbox:\n  host: old.example.org\n  port: 22\n  chmod: false\nlog:\n  level: info\n";

    fn valid_fields() -> HashMap<String, String> {
        [
            ("seedbox_host", "new.example.org"),
            ("seedbox_port", "22"),
            ("seedbox_login", "me"),
            ("seedbox_password", "hunter2"),
            ("seedbox_chmod_enabled", "on"),
            ("seedbox_chmod", "755"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_missing_file_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_read_only(&dir.path().join("absent.yml")));
        assert!(is_read_only(dir.path()));
    }

    #[test]
    fn test_save_writes_octal_chmod() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seedboxsync.yml");
        std::fs::write(&path, ORIGINAL).unwrap();
        assert!(!is_read_only(&path));

        save_submission(&path, &valid_fields()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("chmod: 0o755"), "got:\n{text}");
        assert!(text.contains("host: new.example.org"));
        assert!(text.contains("level: info"));
    }

    #[test]
    fn test_save_keeps_values_not_posted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seedboxsync.yml");
        std::fs::write(
            &path,
            "seedbox:\n  host: a\n  protocol: ftp\nlocal:\n  db_file: /srv/sync.db\n",
        )
        .unwrap();

        let saved = save_submission(&path, &valid_fields()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("protocol: ftp"), "got:\n{text}");
        assert!(text.contains("db_file: /srv/sync.db"), "got:\n{text}");
        assert!(!text.contains("ping_url"), "got:\n{text}");
        assert_eq!(saved.get_text(&["local", "db_file"]).as_deref(), Some("/srv/sync.db"));
    }

    #[test]
    fn test_rejected_chmod_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seedboxsync.yml");
        std::fs::write(&path, ORIGINAL).unwrap();

        let mut fields = valid_fields();
        fields.insert("seedbox_chmod".to_string(), "789".to_string());
        let err = save_submission(&path, &fields).unwrap_err();

        assert!(matches!(err, SettingsError::InvalidChmod { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), ORIGINAL.as_bytes());
    }

    #[test]
    fn test_save_on_missing_file_is_read_only_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        let err = save_submission(&path, &valid_fields()).unwrap_err();
        assert_eq!(err.to_string(), "Configuration file is read-only");
        assert!(!path.exists());
    }
}
