//! Engine configuration.
//!
//! An [`EngineConfig`] is passed explicitly to [`crate::Engine::new`]; the
//! engine never reads environment variables or global state to pick its
//! backend or tolerances. Configuration can be built in code or parsed from
//! a TOML document:
//!
//! ```toml
//! backend = "software"
//! flatness = 0.1
//! hairline_width = 1.0
//! default_fill_mode = "winding"
//! ```

use serde::{Deserialize, Serialize};

use crate::basics::FillMode;
use crate::error::{Error, Result};

/// Default curve flattening tolerance in device units.
pub const DEFAULT_FLATNESS: f64 = 0.25;

/// Default device width drawn for zero-width pens.
pub const DEFAULT_HAIRLINE_WIDTH: f64 = 1.0;

/// Geometry backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Backend {
    /// Pure computation, no device.
    #[default]
    Software,
}

/// Engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which backend performs the work.
    pub backend: Backend,
    /// Largest allowed distance between a curve and its polyline.
    pub flatness: f64,
    /// Width used for pens of width zero.
    pub hairline_width: f64,
    /// Fill mode given to paths the engine creates.
    pub default_fill_mode: FillMode,
    /// Multiplier for round join and cap smoothness.
    pub round_approximation_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Software,
            flatness: DEFAULT_FLATNESS,
            hairline_width: DEFAULT_HAIRLINE_WIDTH,
            default_fill_mode: FillMode::Alternate,
            round_approximation_scale: 1.0,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tolerances that would stall or break flattening.
    pub fn validate(&self) -> Result<()> {
        if !(self.flatness.is_finite() && self.flatness > 0.0) {
            return Err(Error::invalid(format!(
                "flatness must be positive, got {}",
                self.flatness
            )));
        }
        if !(self.hairline_width.is_finite() && self.hairline_width >= 0.0) {
            return Err(Error::invalid(format!(
                "hairline_width must be non-negative, got {}",
                self.hairline_width
            )));
        }
        if !(self.round_approximation_scale.is_finite() && self.round_approximation_scale > 0.0) {
            return Err(Error::invalid(format!(
                "round_approximation_scale must be positive, got {}",
                self.round_approximation_scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.backend, Backend::Software);
        assert_eq!(c.flatness, 0.25);
        assert_eq!(c.hairline_width, 1.0);
        assert_eq!(c.default_fill_mode, FillMode::Alternate);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let c = EngineConfig::from_toml_str("flatness = 0.1\ndefault_fill_mode = \"winding\"\n")
            .unwrap();
        assert_eq!(c.flatness, 0.1);
        assert_eq!(c.default_fill_mode, FillMode::Winding);
        assert_eq!(c.hairline_width, 1.0);
    }

    #[test]
    fn test_from_toml_empty() {
        let c = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(c.flatness, DEFAULT_FLATNESS);
    }

    #[test]
    fn test_from_toml_bad_syntax() {
        assert!(matches!(
            EngineConfig::from_toml_str("flatness = ["),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("backend = \"gdiplus\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects() {
        let c = EngineConfig {
            flatness: 0.0,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(Error::InvalidArgument(_))));
        let c = EngineConfig {
            hairline_width: -1.0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
        let c = EngineConfig {
            round_approximation_scale: f64::NAN,
            ..Default::default()
        };
        assert!(c.validate().is_err());
        // Validation runs on parse too.
        assert!(EngineConfig::from_toml_str("flatness = -1.0").is_err());
    }
}
