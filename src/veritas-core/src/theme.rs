//! Light/dark theme and its persisted preference.
//!
//! The preference lives under a single key, `theme`, in a small JSON state
//! file. Absence means dark.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Key under which the theme name is stored.
pub const THEME_KEY: &str = "theme";

/// The two mutually exclusive themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Resolve a stored preference. Nothing stored means dark; any stored
    /// value other than `dark` selects light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            None | Some("dark") => Theme::Dark,
            Some(_) => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}' (expected 'light' or 'dark')")),
        }
    }
}

/// Client-local storage for the theme preference.
pub trait ThemeStore: Send {
    /// The raw stored value, if any.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Persist `theme`.
    fn save(&mut self, theme: Theme) -> Result<(), StoreError>;
}

/// Theme store backed by a JSON file. Other keys in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .read_map()?
            .and_then(|map| map.get(THEME_KEY).and_then(Value::as_str).map(str::to_string)))
    }

    fn save(&mut self, theme: Theme) -> Result<(), StoreError> {
        let mut map = match self.read_map() {
            Ok(map) => map.unwrap_or_default(),
            Err(err) => {
                tracing::warn!("Replacing unreadable state file: {}", err);
                Map::new()
            }
        };
        map.insert(THEME_KEY.to_string(), Value::from(theme.as_str()));

        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(map)).map_err(|source| {
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, content).map_err(io_err)?;
        tracing::debug!(theme = %theme, path = %self.path.display(), "Theme saved");
        Ok(())
    }
}

/// In-memory theme store, for one-shot runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    value: Option<String>,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.value = Some(theme.as_str().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_stored() {
        assert_eq!(Theme::from_stored(None), Theme::Dark);
        assert_eq!(Theme::from_stored(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_stored(Some("light")), Theme::Light);
        assert_eq!(Theme::from_stored(Some("solarized")), Theme::Light);
    }

    #[test]
    fn test_toggle_is_involution() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Light".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!(" dark ".parse::<Theme>(), Ok(Theme::Dark));
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn test_file_store_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = FileThemeStore::new(dir.path().join("state.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"other": 1}"#).unwrap();

        let mut store = FileThemeStore::new(&path);
        store.save(Theme::Light).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("light"));

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["other"], 1);
        assert_eq!(raw["theme"], "light");
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = TempDir::new().unwrap();
        let mut store = FileThemeStore::new(dir.path().join("a").join("b").join("state.json"));
        store.save(Theme::Dark).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let mut store = FileThemeStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Parse { .. })));

        store.save(Theme::Light).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryThemeStore::with_value("light");
        assert_eq!(store.load().unwrap().as_deref(), Some("light"));
        store.save(Theme::Dark).unwrap();
        assert_eq!(store.value(), Some("dark"));
    }
}
