//! Accessor configuration
//!
//! Hosts embed the accessor with different tolerance levels: a strict
//! API layer wants exact kind matches, a form-binding layer wants the
//! looser scalar acceptance. Both knobs live in [`AccessorConfig`], which
//! is plain serde data so hosts can keep it in their own TOML config files.

use serde::{Deserialize, Serialize};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// How declared types accept runtime values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeMatch {
    /// Kinds must match exactly; int and float are distinct.
    #[default]
    Strict,
    /// Additionally accept int where float is declared, and let bool and
    /// int stand in for each other.
    Coercive,
}

/// Behavior switches for an accessor instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessorConfig {
    /// Type acceptance policy for parameter and field checks.
    pub type_match: TypeMatch,

    /// Consult the target's dynamic get/set hooks after static member
    /// lookup is exhausted.
    pub use_fallback_hooks: bool,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            type_match: TypeMatch::Strict,
            use_fallback_hooks: true,
        }
    }
}

impl AccessorConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render the config as TOML text.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
