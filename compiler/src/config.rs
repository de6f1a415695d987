//! Generator settings that override a schema's file-level options, read
//! from JSON and from command-line flags.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{error::KiwiError, types::SchemaOptions};

/// Every setting is optional; unset ones leave the schema's own `option`
/// statements in effect.
///
/// ```json
/// { "equal_all": true, "testgen_all": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub equal_all:          Option<bool>,
    pub verbose_equal_all:  Option<bool>,
    pub testgen_all:        Option<bool>,
    pub extensions_map_all: Option<bool>,
}

impl GeneratorConfig {
    pub fn from_json(text: &str) -> Result<GeneratorConfig, KiwiError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<GeneratorConfig, KiwiError> {
        let text = fs::read_to_string(path)?;
        GeneratorConfig::from_json(&text)
    }

    /// Settings from `other` win where both are set.
    pub fn merge(self, other: GeneratorConfig) -> GeneratorConfig {
        GeneratorConfig {
            equal_all:          other.equal_all.or(self.equal_all),
            verbose_equal_all:  other.verbose_equal_all.or(self.verbose_equal_all),
            testgen_all:        other.testgen_all.or(self.testgen_all),
            extensions_map_all: other.extensions_map_all.or(self.extensions_map_all),
        }
    }

    pub fn apply(&self, options: &mut SchemaOptions) {
        if let Some(value) = self.equal_all {
            options.equal_all = value;
        }
        if let Some(value) = self.verbose_equal_all {
            options.verbose_equal_all = value;
        }
        if let Some(value) = self.testgen_all {
            options.testgen_all = value;
        }
        if let Some(value) = self.extensions_map_all {
            options.extensions_map_all = value;
        }
    }
}
