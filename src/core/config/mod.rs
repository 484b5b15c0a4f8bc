//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Two configuration scopes share one schema:
//! - **Global**: User-level settings
//! - **Project**: Settings stored next to an assembly file
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$ASML_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/assembly-lattice/config.toml`
//! 3. `~/.assembly-lattice/config.toml` (canonical write location)
//!
//! # Project Config Location
//!
//! `.assembly-lattice/config.toml` in the directory holding the assembly file.
//!
//! # Example
//!
//! ```no_run
//! use assembly_lattice::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/models"))).unwrap();
//! let config = result.config;
//!
//! println!("New parts are called: {}", config.new_part_label());
//! println!("Sort mode: {}", config.sort_mode().as_str());
//! ```

pub mod schema;

pub use schema::{LabelSettings, LatticeSettings, Settings, SortSettings};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::sort::{SortDirection, SortMode, SortOrdering};

/// Label used for nodes created by edits when nothing is configured.
pub const DEFAULT_LABEL: &str = "Unnamed item";

/// Keys understood by [`Config::value_of`] and [`Settings::set_key`].
pub const KNOWN_KEYS: &[&str] = &[
    "interactive",
    "confirm_edits",
    "labels.new_assembly",
    "labels.new_part",
    "sort.mode",
    "sort.direction",
    "lattice.x_spacing",
    "lattice.y_spacing",
    "lattice.default_colour",
    "lattice.selected_colour",
];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically: project settings override
/// global settings, which override built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: Settings,
    /// Project configuration (if one was found)
    pub project: Option<Settings>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the project config file (if loaded)
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, also loads project config from it.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load(project_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let global_path = Self::find_global();
        Self::load_from(global_path.as_deref(), project_dir)
    }

    /// Load configuration from an explicit global file (if any) and project
    /// directory (if any).
    pub fn load_from(
        global_file: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = match global_file {
            Some(path) if path.exists() => (Self::read_settings(path)?, Some(path.to_path_buf())),
            _ => (Settings::default(), None),
        };

        let (mut project, project_path) = match project_dir {
            Some(dir) => {
                let path = Self::project_config_path(dir);
                if path.exists() {
                    (Some(Self::read_settings(&path)?), Some(path))
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };

        if let (Some(p), Some(path)) = (project.as_mut(), project_path.as_ref()) {
            if p.interactive.take().is_some() {
                warnings.push(ConfigWarning {
                    message: "'interactive' is a global setting and is ignored in project config"
                        .to_string(),
                    path: path.clone(),
                });
            }
        }

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                project,
                global_path,
                project_path,
            },
            warnings,
        })
    }

    /// Locate the global config file, if one exists.
    fn find_global() -> Option<PathBuf> {
        // 1. Check $ASML_CONFIG
        if let Ok(path) = std::env::var("ASML_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/assembly-lattice/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("assembly-lattice/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.assembly-lattice/config.toml
        let home = dirs::home_dir()?;
        let path = home.join(".assembly-lattice/config.toml");
        path.exists().then_some(path)
    }

    /// Read and parse a config file.
    fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for global config.
    ///
    /// Returns `~/.assembly-lattice/config.toml`, or `$ASML_CONFIG` when set.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var("ASML_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".assembly-lattice/config.toml"))
    }

    /// Get the path for project config in `dir`.
    pub fn project_config_path(dir: &Path) -> PathBuf {
        dir.join(".assembly-lattice/config.toml")
    }

    /// Write global config atomically.
    pub fn write_global(config: &Settings) -> Result<PathBuf, ConfigError> {
        let path = Self::global_config_path()?;
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed, writes to a temp file in the
    /// same directory, then renames over the target.
    pub fn write_config_atomic<T: serde::Serialize>(
        path: &Path,
        config: &T,
    ) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    fn layered<T>(&self, pick: impl Fn(&Settings) -> Option<T>) -> Option<T> {
        self.project
            .as_ref()
            .and_then(&pick)
            .or_else(|| pick(&self.global))
    }

    /// Check if interactive mode is enabled by default.
    ///
    /// Global only. Defaults to `true`.
    pub fn interactive(&self) -> bool {
        self.global.interactive.unwrap_or(true)
    }

    /// Check if the first destructive edit must be confirmed.
    ///
    /// Defaults to `true`.
    pub fn confirm_edits(&self) -> bool {
        self.layered(|s| s.confirm_edits).unwrap_or(true)
    }

    /// Tag for assemblies created by assemble.
    pub fn new_assembly_label(&self) -> String {
        self.layered(|s| s.labels.as_ref()?.new_assembly.clone())
            .unwrap_or_else(|| DEFAULT_LABEL.to_string())
    }

    /// Tag for parts created by add and disaggregate.
    pub fn new_part_label(&self) -> String {
        self.layered(|s| s.labels.as_ref()?.new_part.clone())
            .unwrap_or_else(|| DEFAULT_LABEL.to_string())
    }

    /// Initial sort mode. Defaults to alphabetical.
    pub fn sort_mode(&self) -> SortMode {
        self.layered(|s| s.sort.as_ref()?.mode).unwrap_or_default()
    }

    /// Initial sort direction. Defaults to ascending.
    pub fn sort_direction(&self) -> SortDirection {
        self.layered(|s| s.sort.as_ref()?.direction)
            .unwrap_or_default()
    }

    /// Initial ordering policy.
    pub fn sort_ordering(&self) -> SortOrdering {
        SortOrdering::new(self.sort_mode(), self.sort_direction())
    }

    /// Horizontal lattice spacing. Defaults to 1.0.
    pub fn x_spacing(&self) -> f64 {
        self.layered(|s| s.lattice.as_ref()?.x_spacing)
            .unwrap_or(1.0)
    }

    /// Vertical lattice spacing. Defaults to 1.0.
    pub fn y_spacing(&self) -> f64 {
        self.layered(|s| s.lattice.as_ref()?.y_spacing)
            .unwrap_or(1.0)
    }

    /// Colour of unselected lattice vertices. Defaults to `gray`.
    pub fn default_colour(&self) -> String {
        self.layered(|s| s.lattice.as_ref()?.default_colour.clone())
            .unwrap_or_else(|| "gray".to_string())
    }

    /// Colour of selected lattice vertices. Defaults to `blue`.
    pub fn selected_colour(&self) -> String {
        self.layered(|s| s.lattice.as_ref()?.selected_colour.clone())
            .unwrap_or_else(|| "blue".to_string())
    }

    /// Resolved value of a dotted key, as text.
    pub fn value_of(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "interactive" => self.interactive().to_string(),
            "confirm_edits" => self.confirm_edits().to_string(),
            "labels.new_assembly" => self.new_assembly_label(),
            "labels.new_part" => self.new_part_label(),
            "sort.mode" => self.sort_mode().as_str().to_string(),
            "sort.direction" => self.sort_direction().as_str().to_string(),
            "lattice.x_spacing" => self.x_spacing().to_string(),
            "lattice.y_spacing" => self.y_spacing().to_string(),
            "lattice.default_colour" => self.default_colour(),
            "lattice.selected_colour" => self.selected_colour(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}

impl Settings {
    /// Set a dotted key from its text form, then re-validate.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
            value.parse().map_err(|_| {
                ConfigError::InvalidValue(format!("{} expects true or false, got '{}'", key, value))
            })
        }
        fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
            value.parse().map_err(|_| {
                ConfigError::InvalidValue(format!("{} expects a number, got '{}'", key, value))
            })
        }

        match key {
            "interactive" => self.interactive = Some(parse_bool(key, value)?),
            "confirm_edits" => self.confirm_edits = Some(parse_bool(key, value)?),
            "labels.new_assembly" => {
                self.labels.get_or_insert_with(Default::default).new_assembly =
                    Some(value.to_string())
            }
            "labels.new_part" => {
                self.labels.get_or_insert_with(Default::default).new_part = Some(value.to_string())
            }
            "sort.mode" => {
                let mode = match value {
                    "alphabetical" => SortMode::Alphabetical,
                    "identity" => SortMode::Identity,
                    _ => {
                        return Err(ConfigError::InvalidValue(format!(
                            "sort.mode must be alphabetical or identity, got '{}'",
                            value
                        )))
                    }
                };
                self.sort.get_or_insert_with(Default::default).mode = Some(mode);
            }
            "sort.direction" => {
                let direction = match value {
                    "ascending" => SortDirection::Ascending,
                    "descending" => SortDirection::Descending,
                    _ => {
                        return Err(ConfigError::InvalidValue(format!(
                            "sort.direction must be ascending or descending, got '{}'",
                            value
                        )))
                    }
                };
                self.sort.get_or_insert_with(Default::default).direction = Some(direction);
            }
            "lattice.x_spacing" => {
                self.lattice.get_or_insert_with(Default::default).x_spacing =
                    Some(parse_f64(key, value)?)
            }
            "lattice.y_spacing" => {
                self.lattice.get_or_insert_with(Default::default).y_spacing =
                    Some(parse_f64(key, value)?)
            }
            "lattice.default_colour" => {
                self.lattice.get_or_insert_with(Default::default).default_colour =
                    Some(value.to_string())
            }
            "lattice.selected_colour" => {
                self.lattice.get_or_insert_with(Default::default).selected_colour =
                    Some(value.to_string())
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_empty_defaults() {
        let result = Config::load_from(None, None).unwrap();
        let config = result.config;

        assert!(config.interactive());
        assert!(config.confirm_edits());
        assert_eq!(config.new_assembly_label(), DEFAULT_LABEL);
        assert_eq!(config.new_part_label(), DEFAULT_LABEL);
        assert_eq!(config.sort_mode(), SortMode::Alphabetical);
        assert_eq!(config.sort_direction(), SortDirection::Ascending);
        assert_eq!(config.x_spacing(), 1.0);
        assert_eq!(config.default_colour(), "gray");
        assert_eq!(config.selected_colour(), "blue");
    }

    #[test]
    fn load_global_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
            interactive = false
            [labels]
            new_part = "Widget"
            "#,
        )
        .unwrap();

        let result = Config::load_from(Some(&config_path), None).unwrap();
        let config = result.config;

        assert!(!config.interactive());
        assert_eq!(config.new_part_label(), "Widget");
        assert_eq!(config.global_config_loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    fn project_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global_path = temp.path().join("global.toml");
        fs::write(&global_path, "[sort]\nmode = \"identity\"\n[labels]\nnew_part = \"G\"\n")
            .unwrap();

        let project = temp.path().join("models");
        let project_cfg = Config::project_config_path(&project);
        fs::create_dir_all(project_cfg.parent().unwrap()).unwrap();
        fs::write(&project_cfg, "[labels]\nnew_part = \"P\"\n").unwrap();

        let config = Config::load_from(Some(&global_path), Some(&project))
            .unwrap()
            .config;

        assert_eq!(config.new_part_label(), "P");
        assert_eq!(config.sort_mode(), SortMode::Identity);
        assert_eq!(config.project_config_loaded_from(), Some(project_cfg.as_path()));
    }

    #[test]
    fn project_interactive_ignored_with_warning() {
        let temp = TempDir::new().unwrap();
        let project_cfg = Config::project_config_path(temp.path());
        fs::create_dir_all(project_cfg.parent().unwrap()).unwrap();
        fs::write(&project_cfg, "interactive = false\n").unwrap();

        let result = Config::load_from(None, Some(temp.path())).unwrap();
        assert!(result.config.interactive());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("global setting"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "palette = \"dark\"\n").unwrap();

        let result = Config::load_from(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "[lattice]\ny_spacing = -2.0\n").unwrap();

        let result = Config::load_from(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn write_then_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");
        let mut settings = Settings::default();
        settings.set_key("sort.direction", "descending").unwrap();
        settings.set_key("lattice.x_spacing", "2.5").unwrap();

        Config::write_config_atomic(&path, &settings).unwrap();
        assert!(path.exists());

        let config = Config::load_from(Some(&path), None).unwrap().config;
        assert_eq!(config.sort_direction(), SortDirection::Descending);
        assert_eq!(config.value_of("lattice.x_spacing").unwrap(), "2.5");
    }

    #[test]
    fn set_key_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set_key("nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(settings.set_key("confirm_edits", "maybe").is_err());
        assert!(settings.set_key("sort.mode", "random").is_err());
        assert!(settings.set_key("lattice.y_spacing", "0").is_err());
    }

    #[test]
    fn every_known_key_resolves() {
        let config = Config::default();
        for key in KNOWN_KEYS {
            assert!(config.value_of(key).is_ok(), "{}", key);
        }
    }
}
