//! Configuration for SeedFront.
//!
//! Two sources: the frontend's own settings, taken from `SEEDFRONT_*`
//! environment variables, and the sync tool's YAML file, found at the first
//! existing well-known location.

use std::path::{Path, PathBuf};

use crate::settings::{SettingsDocument, SettingsError};

/// Prefix of every environment variable SeedFront reads.
pub const ENV_PREFIX: &str = "SEEDFRONT_";

/// Database file used when the YAML names none.
pub const DEFAULT_DATABASE: &str = "default.db";

/// Errors raised while locating or loading the sync tool's YAML file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// None of the candidate locations holds a file
    #[error("No SeedboxSync configuration file found!")]
    NotFound {
        /// Locations that were checked, in order
        searched: Vec<PathBuf>,
    },

    /// The file exists but could not be read or parsed
    #[error("Failed to load configuration {}: {source}", path.display())]
    Load {
        /// File that failed
        path: PathBuf,
        /// I/O or YAML failure
        #[source]
        source: SettingsError,
    },
}

/// Frontend configuration, grouped by concern.
#[derive(Debug, Clone, Default)]
pub struct FrontConfig {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub paths: PathsConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Whether rendered responses are cached at all
    pub enabled: bool,
    /// Maximum number of cached responses
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 256,
        }
    }
}

/// Explicit file locations that bypass discovery.
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// YAML file checked before the candidate list
    pub config_file: Option<PathBuf>,
    /// Database file, overriding `local.db_file`
    pub database: Option<PathBuf>,
}

impl FrontConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads overrides through `lookup`, which maps a variable name to its value.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let var = |suffix: &str| {
            let name = format!("{ENV_PREFIX}{suffix}");
            lookup(&name).map(|value| (name, value))
        };

        if let Some((_, host)) = var("HOST").filter(|(_, v)| !v.trim().is_empty()) {
            config.server.host = host.trim().to_string();
        }

        if let Some((name, port)) = var("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => config.server.port = port,
                Err(_) => tracing::warn!("Ignoring {name}={port}: not a valid port"),
            }
        }

        if let Some((name, enabled)) = var("CACHE") {
            match parse_bool(&enabled) {
                Some(enabled) => config.cache.enabled = enabled,
                None => tracing::warn!("Ignoring {name}={enabled}: expected true or false"),
            }
        }

        if let Some((name, capacity)) = var("CACHE_CAPACITY") {
            match capacity.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => config.cache.capacity = capacity,
                _ => tracing::warn!("Ignoring {name}={capacity}: expected a positive integer"),
            }
        }

        if let Some((_, path)) = var("CONFIG").filter(|(_, v)| !v.is_empty()) {
            config.paths.config_file = Some(PathBuf::from(path));
        }

        if let Some((_, path)) = var("DATABASE").filter(|(_, v)| !v.is_empty()) {
            config.paths.database = Some(PathBuf::from(path));
        }

        config
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Parses the boolean spellings accepted in environment variables and query
/// strings.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Well-known locations of the sync tool's YAML file, in lookup order.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);
    if let Some(dirs) = directories::BaseDirs::new() {
        let home = dirs.home_dir();
        paths.push(home.join(".config/seedboxsync/seedboxsync.yml"));
        paths.push(home.join(".seedboxsync.yml"));
        paths.push(home.join(".seedboxsync/config/seedboxsync.yml"));
    }
    paths.push(PathBuf::from("/etc/seedboxsync/seedboxsync.yml"));
    paths
}

/// First existing file among `explicit` and the candidates.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(candidate_paths())
        .find(|path| path.is_file())
}

/// The sync tool's configuration as loaded at startup.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// File the document was read from
    pub path: PathBuf,
    pub document: SettingsDocument,
}

impl SyncConfig {
    /// Finds and loads the YAML file.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NotFound` - If no candidate file exists
    /// - `ConfigError::Load` - If the file cannot be read or parsed
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match locate_config_file(explicit) {
            Some(path) => Self::load(path),
            None => {
                let searched = explicit
                    .map(Path::to_path_buf)
                    .into_iter()
                    .chain(candidate_paths())
                    .collect();
                Err(ConfigError::NotFound { searched })
            }
        }
    }

    /// Loads a specific YAML file.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Load` - If the file cannot be read or parsed
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        match SettingsDocument::load(&path) {
            Ok(document) => {
                tracing::info!("Loaded SeedboxSync configuration from {}", path.display());
                Ok(Self { path, document })
            }
            Err(source) => Err(ConfigError::Load { path, source }),
        }
    }

    /// `local.db_file` exactly as written in the YAML.
    pub fn db_file(&self) -> Option<String> {
        self.document
            .get_text(&["local", "db_file"])
            .filter(|file| !file.trim().is_empty())
    }
}

/// Resolves the database file.
///
/// Precedence: `explicit`, then `local.db_file` from the YAML, then
/// `default.db`. Relative paths are resolved against the current directory and
/// a leading `~` against the home directory.
pub fn database_path(explicit: Option<&Path>, sync: Option<&SyncConfig>) -> PathBuf {
    let raw = match explicit {
        Some(path) => path.to_path_buf(),
        None => sync
            .and_then(SyncConfig::db_file)
            .map(|file| expand_home(&file))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
    };
    absolutize(raw)
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix("~/") {
        Some(rest) => rest,
        None if path == "~" => "",
        None => return PathBuf::from(path),
    };
    match directories::BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::path::absolute(&path).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = FrontConfig::from_lookup(lookup(&[]));
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.capacity, 256);
        assert!(config.paths.config_file.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = FrontConfig::from_lookup(lookup(&[
            ("SEEDFRONT_HOST", "0.0.0.0"),
            ("SEEDFRONT_PORT", "9090"),
            ("SEEDFRONT_CACHE", "false"),
            ("SEEDFRONT_CACHE_CAPACITY", "16"),
            ("SEEDFRONT_DATABASE", "/tmp/sync.db"),
        ]));
        assert_eq!(config.bind_address(), "0.0.0.0:9090");
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.capacity, 16);
        assert_eq!(config.paths.database, Some(PathBuf::from("/tmp/sync.db")));
    }

    #[test]
    fn test_unparsable_values_ignored() {
        let config = FrontConfig::from_lookup(lookup(&[
            ("SEEDFRONT_PORT", "eighty"),
            ("SEEDFRONT_CACHE", "maybe"),
            ("SEEDFRONT_CACHE_CAPACITY", "0"),
        ]));
        assert_eq!(config.server.port, 8000);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.capacity, 256);
    }

    #[test]
    fn test_explicit_config_checked_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yml");
        std::fs::write(&path, "local:\n  db_file: sync.db\n").unwrap();

        assert_eq!(locate_config_file(Some(path.as_path())), Some(path.clone()));
        let sync = SyncConfig::discover(Some(path.as_path())).unwrap();
        assert_eq!(sync.db_file().as_deref(), Some("sync.db"));
    }

    #[test]
    fn test_candidate_order() {
        let paths = candidate_paths();
        assert_eq!(
            paths.last(),
            Some(&PathBuf::from("/etc/seedboxsync/seedboxsync.yml"))
        );
        if paths.len() == 4 {
            assert!(paths[0].ends_with(".config/seedboxsync/seedboxsync.yml"));
            assert!(paths[1].ends_with(".seedboxsync.yml"));
        }
    }

    #[test]
    fn test_invalid_yaml_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yml");
        std::fs::write(&path, "seedbox: [unterminated").unwrap();
        assert!(matches!(SyncConfig::load(&path), Err(ConfigError::Load { .. })));
    }

    #[test]
    fn test_database_path_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("seedboxsync.yml");
        std::fs::write(&yaml, "local:\n  db_file: /var/lib/seedboxsync/sync.db\n").unwrap();
        let sync = SyncConfig::load(&yaml).unwrap();

        let explicit = dir.path().join("override.db");
        assert_eq!(database_path(Some(explicit.as_path()), Some(&sync)), explicit);
        assert_eq!(
            database_path(None, Some(&sync)),
            PathBuf::from("/var/lib/seedboxsync/sync.db")
        );

        let fallback = database_path(None, None);
        assert!(fallback.is_absolute());
        assert!(fallback.ends_with(DEFAULT_DATABASE));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("2"), None);
    }
}
