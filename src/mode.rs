// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Limb band evaluation modes.
//!
//! A "band" test asks whether a pair of left/right joint angles lies inside
//! the `(lower, upper)` range. The two modes differ in how the two sides are
//! combined.

use std::fmt;
use std::str::FromStr;

/// How left and right joint angles are combined when testing a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LimbMode {
    /// `(left < upper || right < upper) && (left > lower || right > lower)`.
    ///
    /// The two bounds may be satisfied by different sides, so one joint at 10°
    /// and the other at 170° passes. This is the behaviour of the deployed
    /// detector.
    #[default]
    Legacy,
    /// At least one side must lie strictly inside the band on its own.
    Strict,
}

impl LimbMode {
    /// Returns the string representation used on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Strict => "strict",
        }
    }

    /// Evaluate a band for a left/right pair of angles.
    ///
    /// `None` marks an angle that could not be measured; it satisfies neither bound.
    #[must_use]
    pub fn band(self, left: Option<f32>, right: Option<f32>, lower: f32, upper: f32) -> bool {
        let below = |a: Option<f32>| a.is_some_and(|a| a < upper);
        let above = |a: Option<f32>| a.is_some_and(|a| a > lower);

        match self {
            Self::Legacy => (below(left) || below(right)) && (above(left) || above(right)),
            Self::Strict => (below(left) && above(left)) || (below(right) && above(right)),
        }
    }
}

impl fmt::Display for LimbMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LimbMode {
    type Err = LimbModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" | "loose" => Ok(Self::Legacy),
            "strict" | "per-leg" | "per_leg" => Ok(Self::Strict),
            _ => Err(LimbModeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid mode string.
#[derive(Debug, Clone)]
pub struct LimbModeParseError(String);

impl fmt::Display for LimbModeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid limb mode '{}', expected one of: legacy, strict",
            self.0
        )
    }
}

impl std::error::Error for LimbModeParseError {}
