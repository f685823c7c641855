// crates/atlas-config/src/config.rs
// ============================================================================
// Module: Atlas Configuration
// Description: Configuration loading and validation for the generator.
// Purpose: Provide strict config parsing with hard limits.
// Dependencies: atlas-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. Unknown
//! keys, non-UTF-8 content and invalid values fail closed.
//!
//! ```toml
//! [guard]
//! prefix = "ATLAS"
//! separator = "_"
//! upcase = true
//!
//! [generation]
//! cpp_standard = 17
//! namespace = "app"
//! ```
//!
//! Every key is optional. Unset keys leave the corresponding
//! [`GeneratorOptions`] field unset, so file-level settings inside type and
//! interaction files still apply.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use atlas_core::CppStandard;
use atlas_core::GeneratorOptions;
use atlas_core::text::is_identifier;
use atlas_core::text::is_namespace;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "atlas.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "ATLAS_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level `atlas.toml` model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtlasConfig {
    /// Include-guard settings.
    #[serde(default)]
    pub guard: GuardConfig,
    /// Generation defaults.
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// `[guard]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    /// Guard prefix (`ATLAS` when unset).
    #[serde(default)]
    pub prefix: Option<String>,
    /// Separator between prefix and digest (`_` when unset).
    #[serde(default)]
    pub separator: Option<String>,
    /// Upper-case the guard (`true` when unset).
    #[serde(default)]
    pub upcase: Option<bool>,
}

/// `[generation]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Minimum C++ standard as a two-digit year.
    #[serde(default)]
    pub cpp_standard: Option<u16>,
    /// Namespace for types that do not name one.
    #[serde(default)]
    pub namespace: Option<String>,
}

impl AtlasConfig {
    /// Loads configuration from disk using the default resolution rules:
    /// the explicit `path`, then `ATLAS_CONFIG`, then `atlas.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.guard.validate()?;
        self.generation.validate()
    }

    /// Converts the configuration into generator overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the configuration does not
    /// validate.
    pub fn into_options(self) -> Result<GeneratorOptions, ConfigError> {
        self.validate()?;
        let cpp_standard = self.generation.standard()?;
        Ok(GeneratorOptions {
            guard_prefix: self.guard.prefix,
            guard_separator: self.guard.separator,
            upcase_guard: self.guard.upcase,
            cpp_standard,
            default_namespace: self.generation.namespace,
        })
    }
}

impl GuardConfig {
    /// Validates guard settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = &self.prefix
            && !is_identifier(prefix)
        {
            return Err(ConfigError::Invalid(format!(
                "guard.prefix `{prefix}` must be a macro name fragment"
            )));
        }
        if let Some(separator) = &self.separator
            && !separator.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            return Err(ConfigError::Invalid(format!(
                "guard.separator `{separator}` may only contain letters, digits and `_`"
            )));
        }
        Ok(())
    }
}

impl GenerationConfig {
    /// Validates generation defaults.
    fn validate(&self) -> Result<(), ConfigError> {
        self.standard()?;
        if let Some(namespace) = &self.namespace
            && !is_namespace(namespace)
        {
            return Err(ConfigError::Invalid(format!(
                "generation.namespace `{namespace}` is not a namespace path"
            )));
        }
        Ok(())
    }

    /// Resolves `cpp_standard` into a [`CppStandard`].
    fn standard(&self) -> Result<Option<CppStandard>, ConfigError> {
        self.cpp_standard
            .map(|year| {
                CppStandard::from_year(year).ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "generation.cpp_standard {year} is not one of 11, 14, 17, 20, 23"
                    ))
                })
            })
            .transpose()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}
