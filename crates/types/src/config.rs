//! Runtime configuration for the grouped-navigation feature.
//!
//! The config endpoint returns a two-field payload; both fields are
//! optional and a failed fetch degrades to an empty payload. Resolution
//! into a [`NavConfig`] applies defaults and a lenient template parse so
//! a bad remote value can never disable the navigation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delimiter used to split display names when the config omits one.
pub const DEFAULT_DELIMITER: &str = " | ";

/// Raw two-field payload from the config endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Separator splitting display names into group and item segments.
    #[serde(default)]
    pub delimiter: Option<String>,
    /// Identifier of the renderer variant to use.
    #[serde(default)]
    pub template: Option<String>,
}

/// The three renderer variants.
///
/// The code default is [`NavTemplate::Accordion`]; product documentation
/// names `v5` as the shipped default, which deployments opt into via the
/// config endpoint. Unknown identifiers fall back to the code default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavTemplate {
    /// Collapsible groups; the active item's group auto-expands on first
    /// mount and single-item groups render flat.
    #[default]
    Accordion,
    /// Flat sections styled after the host's fifth-generation sidebar.
    V5,
    /// Plain list with group headings and no disclosure controls.
    Plain,
}

impl NavTemplate {
    /// Canonical identifier used in config payloads and CLI flags.
    pub fn id(&self) -> &'static str {
        match self {
            NavTemplate::Accordion => "accordion",
            NavTemplate::V5 => "v5",
            NavTemplate::Plain => "plain",
        }
    }

    /// Parses a config value, falling back to the default for unknown or
    /// missing identifiers. Selection must never fail at runtime.
    pub fn from_config_value(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for NavTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a template identifier is not one of the three
/// known variants.
#[derive(Debug, Error)]
#[error("unknown navigation template: {0}")]
pub struct ParseNavTemplateError(pub String);

impl FromStr for NavTemplate {
    type Err = ParseNavTemplateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "accordion" => Ok(NavTemplate::Accordion),
            "v5" => Ok(NavTemplate::V5),
            "plain" => Ok(NavTemplate::Plain),
            other => Err(ParseNavTemplateError(other.to_string())),
        }
    }
}

/// Fully resolved configuration consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavConfig {
    /// Exact substring splitting display names into group and item parts.
    pub delimiter: String,
    /// Selected renderer variant.
    pub template: NavTemplate,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            template: NavTemplate::default(),
        }
    }
}

impl NavConfig {
    /// Resolves a raw payload into usable configuration, applying the
    /// environment-style defaults for absent fields.
    pub fn resolve(raw: &RuntimeConfig) -> Self {
        Self {
            delimiter: raw
                .delimiter
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(DEFAULT_DELIMITER)
                .to_string(),
            template: NavTemplate::from_config_value(raw.template.as_deref()),
        }
    }
}
