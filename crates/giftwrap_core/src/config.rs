//! Gift option configuration.
//!
//! # Responsibility
//! - Carry the environment-specific gift variant, observation window and
//!   special-carrier marker.
//! - Parse optional JSON overrides on top of a catalog preset.
//!
//! # Invariants
//! - A config handed to the controller has passed `validate()`.
//! - The observation window is strictly positive and bounded.

use crate::model::cart::MerchandiseId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Gift variant used by the staging catalog.
pub const STAGING_GIFT_MERCHANDISE_ID: &str = "gid://shopify/ProductVariant/51625466396991";
/// Gift variant used by the production catalog.
pub const PRODUCTION_GIFT_MERCHANDISE_ID: &str = "gid://shopify/ProductVariant/48402156552416";
/// Default observation window after a toggle.
pub const DEFAULT_OBSERVATION_WINDOW_MS: u64 = 3_000;
/// Upper bound accepted for the observation window.
pub const MAX_OBSERVATION_WINDOW_MS: u64 = 60_000;
/// Title fragment identifying the carrier that cannot ship wrapped gifts.
pub const DEFAULT_CARRIER_MARKER: &str = "ネコポス";

static MERCHANDISE_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^gid://[a-z][a-z0-9-]*/ProductVariant/[0-9]+$")
        .expect("merchandise id pattern is valid")
});

/// Catalog environment selecting the gift variant preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogEnvironment {
    Staging,
    #[default]
    Production,
}

impl CatalogEnvironment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    pub fn gift_merchandise_id(self) -> &'static str {
        match self {
            Self::Staging => STAGING_GIFT_MERCHANDISE_ID,
            Self::Production => PRODUCTION_GIFT_MERCHANDISE_ID,
        }
    }

    /// Parses `staging|production`, trimmed and case-insensitive.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Runtime configuration for one gift option block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftOptionConfig {
    pub gift_merchandise_id: MerchandiseId,
    pub observation_window: Duration,
    pub carrier_marker: String,
}

impl GiftOptionConfig {
    /// Builds the preset for one catalog environment.
    pub fn for_environment(environment: CatalogEnvironment) -> Self {
        Self {
            gift_merchandise_id: MerchandiseId::new(environment.gift_merchandise_id()),
            observation_window: Duration::from_millis(DEFAULT_OBSERVATION_WINDOW_MS),
            carrier_marker: DEFAULT_CARRIER_MARKER.to_string(),
        }
    }

    pub fn staging() -> Self {
        Self::for_environment(CatalogEnvironment::Staging)
    }

    pub fn production() -> Self {
        Self::for_environment(CatalogEnvironment::Production)
    }

    /// Validates declaration-level config invariants.
    ///
    /// # Errors
    /// - `InvalidMerchandiseId` when the id is not a product variant gid.
    /// - `InvalidObservationWindow` when the window is zero or above the cap.
    /// - `EmptyCarrierMarker` when the marker is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !MERCHANDISE_ID_PATTERN.is_match(self.gift_merchandise_id.as_str()) {
            return Err(ConfigError::InvalidMerchandiseId(
                self.gift_merchandise_id.to_string(),
            ));
        }
        let window_ms = self.observation_window.as_millis();
        if window_ms == 0 || window_ms > u128::from(MAX_OBSERVATION_WINDOW_MS) {
            return Err(ConfigError::InvalidObservationWindow(window_ms));
        }
        if self.carrier_marker.trim().is_empty() {
            return Err(ConfigError::EmptyCarrierMarker);
        }
        Ok(())
    }

    /// Parses a JSON config document and validates the result.
    ///
    /// Missing fields fall back to the preset named by `environment`
    /// (production when absent).
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let document: ConfigDocument =
            serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        Self::from_document(document)
    }

    /// Reads and parses a JSON config file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub(crate) fn from_document(document: ConfigDocument) -> Result<Self, ConfigError> {
        let environment = match document.environment.as_deref() {
            Some(value) => CatalogEnvironment::parse(value)?,
            None => CatalogEnvironment::default(),
        };
        let mut config = Self::for_environment(environment);
        if let Some(id) = document.gift_merchandise_id {
            config.gift_merchandise_id = MerchandiseId::new(id.trim());
        }
        if let Some(window_ms) = document.observation_window_ms {
            config.observation_window = Duration::from_millis(window_ms);
        }
        if let Some(marker) = document.carrier_marker {
            config.carrier_marker = marker;
        }
        config.validate()?;
        Ok(config)
    }
}

impl Default for GiftOptionConfig {
    fn default() -> Self {
        Self::production()
    }
}

/// Serialized config overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub gift_merchandise_id: Option<String>,
    #[serde(default)]
    pub observation_window_ms: Option<u64>,
    #[serde(default)]
    pub carrier_marker: Option<String>,
}

/// Config parse and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    UnknownEnvironment(String),
    InvalidMerchandiseId(String),
    InvalidObservationWindow(u128),
    EmptyCarrierMarker,
    Parse(serde_json::Error),
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEnvironment(value) => write!(
                f,
                "unknown catalog environment `{value}`; expected staging|production"
            ),
            Self::InvalidMerchandiseId(value) => {
                write!(f, "gift merchandise id is not a product variant gid: {value}")
            }
            Self::InvalidObservationWindow(value) => write!(
                f,
                "observation window must be within 1..={MAX_OBSERVATION_WINDOW_MS} ms, got {value}"
            ),
            Self::EmptyCarrierMarker => write!(f, "carrier marker must not be empty"),
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::UnknownEnvironment(_)
            | Self::InvalidMerchandiseId(_)
            | Self::InvalidObservationWindow(_)
            | Self::EmptyCarrierMarker => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogEnvironment, ConfigError, GiftOptionConfig};
    use std::time::Duration;

    #[test]
    fn presets_differ_only_by_gift_variant() {
        let staging = GiftOptionConfig::staging();
        let production = GiftOptionConfig::production();
        assert_ne!(staging.gift_merchandise_id, production.gift_merchandise_id);
        assert_eq!(staging.observation_window, Duration::from_millis(3_000));
        assert_eq!(staging.carrier_marker, production.carrier_marker);
        staging.validate().expect("staging preset is valid");
        production.validate().expect("production preset is valid");
    }

    #[test]
    fn environment_parse_is_case_insensitive() {
        assert_eq!(
            CatalogEnvironment::parse(" Staging ").expect("staging should parse"),
            CatalogEnvironment::Staging
        );
        let err = CatalogEnvironment::parse("qa").expect_err("unknown env must fail");
        assert!(matches!(err, ConfigError::UnknownEnvironment(value) if value == "qa"));
    }

    #[test]
    fn rejects_zero_window_and_blank_marker() {
        let mut config = GiftOptionConfig::default();
        config.observation_window = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidObservationWindow(0))
        ));

        let mut config = GiftOptionConfig::default();
        config.carrier_marker = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyCarrierMarker)
        ));
    }

    #[test]
    fn rejects_non_variant_merchandise_id() {
        let err = GiftOptionConfig::from_json_str(
            r#"{"gift_merchandise_id": "gid://shopify/Product/123"}"#,
        )
        .expect_err("product gid is not a variant");
        assert!(matches!(err, ConfigError::InvalidMerchandiseId(_)));
    }
}
