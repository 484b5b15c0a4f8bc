//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same schema is used for both scopes (global and project); every field
//! is optional so a file only needs to name what it overrides.
//!
//! # Validation
//!
//! Config values are validated after parsing: spacings must be positive and
//! finite, labels and colours non-empty.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::sort::{SortDirection, SortMode};

/// One configuration file.
///
/// # Example
///
/// ```toml
/// interactive = true
/// confirm_edits = true
///
/// [labels]
/// new_assembly = "Sub-assembly"
/// new_part = "Part"
///
/// [sort]
/// mode = "alphabetical"
/// direction = "ascending"
///
/// [lattice]
/// x_spacing = 1.5
/// y_spacing = 1.0
/// default_colour = "gray"
/// selected_colour = "blue"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Default interactive mode
    pub interactive: Option<bool>,

    /// Ask before the first destructive edit of a session
    pub confirm_edits: Option<bool>,

    /// Labels for nodes created by edits
    pub labels: Option<LabelSettings>,

    /// Initial sibling ordering
    pub sort: Option<SortSettings>,

    /// Lattice layout and colours
    pub lattice: Option<LatticeSettings>,
}

impl Settings {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(labels) = &self.labels {
            labels.validate()?;
        }
        if let Some(lattice) = &self.lattice {
            lattice.validate()?;
        }
        Ok(())
    }
}

/// Labels given to nodes created by edit operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LabelSettings {
    /// Tag for assemblies created by assemble
    pub new_assembly: Option<String>,

    /// Tag for parts created by add/disaggregate
    pub new_part: Option<String>,
}

impl LabelSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("labels.new_assembly", &self.new_assembly),
            ("labels.new_part", &self.new_part),
        ] {
            if let Some(v) = value {
                if v.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(format!("{} cannot be empty", key)));
                }
            }
        }
        Ok(())
    }
}

/// Sorting defaults applied when an assembly is loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SortSettings {
    pub mode: Option<SortMode>,
    pub direction: Option<SortDirection>,
}

/// Lattice layout and colour settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LatticeSettings {
    /// Horizontal gap between neighbours on a level
    pub x_spacing: Option<f64>,

    /// Vertical gap between levels
    pub y_spacing: Option<f64>,

    /// Colour of unselected vertices
    pub default_colour: Option<String>,

    /// Colour of selected vertices
    pub selected_colour: Option<String>,
}

impl LatticeSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("lattice.x_spacing", self.x_spacing),
            ("lattice.y_spacing", self.y_spacing),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(ConfigError::InvalidValue(format!(
                        "{} must be a positive number, got {}",
                        key, v
                    )));
                }
            }
        }
        for (key, value) in [
            ("lattice.default_colour", &self.default_colour),
            ("lattice.selected_colour", &self.selected_colour),
        ] {
            if let Some(v) = value {
                if v.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(format!("{} cannot be empty", key)));
                }
            }
        }
        Ok(())
    }
}
