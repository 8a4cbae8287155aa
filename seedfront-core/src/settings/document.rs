//! The sync tool's YAML configuration as an editable document.
//!
//! The document keeps the whole mapping, including keys the settings form
//! never shows, so a save only rewrites what the user actually edited. Key
//! order survives the round trip; comments do not.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use super::SettingsError;
use super::mode::FileMode;

const OCTAL_MARKER_PREFIX: &str = "__seedfront_octal_";
const OCTAL_MARKER_SUFFIX: &str = "__";

/// A loaded YAML configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDocument {
    root: Mapping,
    /// Key paths whose integer value must be written back in octal notation
    octal_paths: Vec<Vec<String>>,
}

impl SettingsDocument {
    /// Parses YAML text. An empty document is an empty mapping.
    ///
    /// # Errors
    ///
    /// - `SettingsError::Yaml` - If the text is not valid YAML
    /// - `SettingsError::NotMapping` - If the top level is not a mapping
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        let value: Value = serde_yaml::from_str(text)?;
        let root = match value {
            Value::Null => Mapping::new(),
            Value::Mapping(mapping) => mapping,
            _ => return Err(SettingsError::NotMapping),
        };
        Ok(Self {
            root,
            octal_paths: Vec::new(),
        })
    }

    /// Reads and parses a YAML file.
    ///
    /// # Errors
    ///
    /// - `SettingsError::Io` - If the file cannot be read
    /// - `SettingsError::Yaml` / `SettingsError::NotMapping` - See [`Self::parse`]
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Serializes the document and writes it over `path`.
    ///
    /// # Errors
    ///
    /// - `SettingsError::Yaml` - If serialization fails
    /// - `SettingsError::Io` - If the file cannot be written
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let text = self.to_yaml_string()?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// The top-level mapping.
    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// Whether the document holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Looks up a nested value by key path.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.root.get(*first)?;
        for key in rest {
            current = current.as_mapping()?.get(*key)?;
        }
        Some(current)
    }

    /// Looks up a nested scalar and renders it as text.
    pub fn get_text(&self, path: &[&str]) -> Option<String> {
        self.get(path).and_then(scalar_text)
    }

    /// Stores a value at `path`, creating intermediate mappings.
    ///
    /// A non-mapping value sitting where a mapping is needed is replaced.
    pub fn set(&mut self, path: &[&str], value: Value) {
        self.octal_paths.retain(|p| !same_path(p, path));
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut current = &mut self.root;
        for key in parents {
            let slot = current
                .entry(Value::from(*key))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if !slot.is_mapping() {
                *slot = Value::Mapping(Mapping::new());
            }
            let Value::Mapping(next) = slot else {
                return;
            };
            current = next;
        }
        current.insert(Value::from(*last), value);
    }

    /// Stores a permission mode that serializes as an unquoted `0o…` literal.
    pub fn set_mode(&mut self, path: &[&str], mode: FileMode) {
        self.set(path, Value::from(mode.bits()));
        self.octal_paths
            .push(path.iter().map(|k| k.to_string()).collect());
    }

    /// Renders the document as YAML text.
    ///
    /// # Errors
    ///
    /// - `SettingsError::Yaml` - If serialization fails
    pub fn to_yaml_string(&self) -> Result<String, SettingsError> {
        if self.octal_paths.is_empty() {
            return Ok(serde_yaml::to_string(&self.root)?);
        }

        // Octal literals have no serde representation, so write a plain
        // marker scalar and substitute it in the emitted text.
        let mut marked = self.clone();
        marked.octal_paths.clear();
        let mut substitutions = Vec::new();
        for path in &self.octal_paths {
            let keys: Vec<&str> = path.iter().map(String::as_str).collect();
            let Some(bits) = self.get(&keys).and_then(Value::as_u64) else {
                continue;
            };
            let marker = format!("{OCTAL_MARKER_PREFIX}{bits:o}{OCTAL_MARKER_SUFFIX}");
            let literal = FileMode::new(bits as u32).to_string();
            marked.set(&keys, Value::String(marker.clone()));
            substitutions.push((marker, literal));
        }

        let mut text = serde_yaml::to_string(&marked.root)?;
        for (marker, literal) in substitutions {
            text = text.replace(&marker, &literal);
        }
        Ok(text)
    }
}

fn same_path(stored: &[String], path: &[&str]) -> bool {
    stored.len() == path.len() && stored.iter().zip(path).all(|(a, b)| a == b)
}

/// Text of a scalar value, `None` for null and collections.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
seedbox:
  host: example.org
  port: 22
  chmod: false
  extra_key: keep-me
local:
  db_file: ~/.seedboxsync/seedboxsync.db
log:
  level: debug
";

    #[test]
    fn test_parse_and_get() {
        let doc = SettingsDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.get_text(&["seedbox", "host"]).as_deref(), Some("example.org"));
        assert_eq!(doc.get_text(&["seedbox", "port"]).as_deref(), Some("22"));
        assert_eq!(doc.get(&["seedbox", "chmod"]), Some(&Value::Bool(false)));
        assert!(doc.get(&["seedbox", "missing"]).is_none());
        assert!(doc.get(&["seedbox", "host", "deeper"]).is_none());
    }

    #[test]
    fn test_empty_and_invalid_roots() {
        assert!(SettingsDocument::parse("").unwrap().is_empty());
        assert!(matches!(
            SettingsDocument::parse("- a\n- b\n"),
            Err(SettingsError::NotMapping)
        ));
        assert!(matches!(
            SettingsDocument::parse("a: [unclosed"),
            Err(SettingsError::Yaml(_))
        ));
    }

    #[test]
    fn test_set_creates_sections() {
        let mut doc = SettingsDocument::default();
        doc.set(&["healthchecks", "sync_seedbox", "enabled"], Value::Bool(true));
        assert_eq!(
            doc.get(&["healthchecks", "sync_seedbox", "enabled"]),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_mode_written_as_unquoted_octal() {
        let mut doc = SettingsDocument::parse(SAMPLE).unwrap();
        doc.set_mode(&["seedbox", "chmod"], "755".parse().unwrap());

        let text = doc.to_yaml_string().unwrap();
        assert!(text.contains("chmod: 0o755\n"), "got:\n{text}");
        assert!(!text.contains("493"));
        assert!(!text.contains(OCTAL_MARKER_PREFIX));

        let reloaded = SettingsDocument::parse(&text).unwrap();
        assert_eq!(
            reloaded.get(&["seedbox", "chmod"]).and_then(Value::as_u64),
            Some(0o755)
        );
    }

    #[test]
    fn test_overwriting_mode_drops_octal_flag() {
        let mut doc = SettingsDocument::parse(SAMPLE).unwrap();
        doc.set_mode(&["seedbox", "chmod"], FileMode::new(0o644));
        doc.set(&["seedbox", "chmod"], Value::Bool(false));

        let text = doc.to_yaml_string().unwrap();
        assert!(text.contains("chmod: false"));
    }

    #[test]
    fn test_unexposed_keys_and_order_survive() {
        let mut doc = SettingsDocument::parse(SAMPLE).unwrap();
        doc.set(&["seedbox", "host"], Value::from("other.org"));
        let text = doc.to_yaml_string().unwrap();

        assert!(text.contains("extra_key: keep-me"));
        assert!(text.contains("level: debug"));
        let seedbox = text.find("seedbox:").unwrap();
        let local = text.find("local:").unwrap();
        let log = text.find("log:").unwrap();
        assert!(seedbox < local && local < log);
    }

    #[test]
    fn test_numeric_looking_strings_stay_strings() {
        let mut doc = SettingsDocument::default();
        doc.set(&["seedbox", "password"], Value::from("0o755"));
        let text = doc.to_yaml_string().unwrap();

        let reloaded = SettingsDocument::parse(&text).unwrap();
        assert_eq!(
            reloaded.get(&["seedbox", "password"]),
            Some(&Value::from("0o755"))
        );
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seedboxsync.yml");

        let mut doc = SettingsDocument::parse(SAMPLE).unwrap();
        doc.set_mode(&["seedbox", "chmod"], FileMode::new(0o600));
        doc.save(&path).unwrap();

        let loaded = SettingsDocument::load(&path).unwrap();
        assert_eq!(
            loaded.get(&["seedbox", "chmod"]).and_then(Value::as_u64),
            Some(0o600)
        );
    }
}
