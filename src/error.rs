//! Error types for geometry, region, stroke and paint operations.

use std::io;
use thiserror::Error;

/// Errors reported by the engine.
///
/// Every operation validates its input at the call that received it and
/// fails synchronously. The only silent adjustments are the documented
/// fallbacks: miter joins beyond the limit bevel, `WrapMode::Clamp` extends
/// edge pixels, and zero-width pens draw at the hairline width.
#[derive(Error, Debug)]
pub enum Error {
    /// Null, non-finite, or out-of-range operand.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested style combination has no defined geometry.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Float to integer conversion out of range.
    #[error("numeric overflow converting {value} to {target}")]
    NumericOverflow { value: f64, target: &'static str },

    /// Referenced resource is absent (font family, color name).
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration document could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error while reading or writing an image.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

/// Reject NaN and infinities in caller-supplied coordinates.
pub(crate) fn ensure_finite(what: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::invalid(format!("{what} must be finite")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Error::NumericOverflow {
            value: 1e20,
            target: "i32",
        };
        assert_eq!(e.to_string(), "numeric overflow converting 100000000000000000000 to i32");
        assert_eq!(
            Error::invalid("negative dash").to_string(),
            "invalid argument: negative dash"
        );
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("point", &[1.0, 2.0]).is_ok());
        assert!(matches!(
            ensure_finite("point", &[1.0, f64::NAN]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(ensure_finite("point", &[f64::INFINITY]).is_err());
    }
}
