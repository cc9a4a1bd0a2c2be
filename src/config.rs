// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Classifier and actuator configuration.
//!
//! [`ClassifierConfig`] controls the joint-angle band used by the wheelchair
//! classifier. [`ActuatorConfig`] describes the output pins driven from the
//! classification and is built once at process start.

use std::ops::Range;
use std::time::Duration;

use crate::error::{Result, SentinelError};
use crate::mode::LimbMode;

/// Configuration for the wheelchair posture classifier.
///
/// # Example
///
/// ```rust
/// use wheelchair_sentinel::{ClassifierConfig, LimbMode};
///
/// let config = ClassifierConfig::new()
///     .with_band(75.0, 115.0)
///     .with_mode(LimbMode::Strict);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Exclusive lower bound of the bent-joint band, in degrees.
    pub lower_bound: f32,
    /// Exclusive upper bound of the bent-joint band, in degrees.
    pub upper_bound: f32,
    /// How left and right angles are combined.
    pub mode: LimbMode,
    /// Substitute the `(0, 0)` origin for absent keypoints before measuring angles.
    /// When `false`, an angle touching an absent keypoint is unmeasured and fails the band.
    pub absent_as_origin: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            lower_bound: 70.0,
            upper_bound: 120.0,
            mode: LimbMode::Legacy,
            absent_as_origin: true,
        }
    }
}

impl ClassifierConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bent-joint band.
    ///
    /// # Arguments
    ///
    /// * `lower` - Exclusive lower bound in degrees.
    /// * `upper` - Exclusive upper bound in degrees.
    #[must_use]
    pub const fn with_band(mut self, lower: f32, upper: f32) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Set how left and right angles are combined.
    #[must_use]
    pub const fn with_mode(mut self, mode: LimbMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable the origin substitution for absent keypoints.
    #[must_use]
    pub const fn with_absent_as_origin(mut self, enabled: bool) -> Self {
        self.absent_as_origin = enabled;
        self
    }

    /// Check that the band is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ConfigError`] if a bound is not finite or the band is empty.
    pub fn validate(&self) -> Result<()> {
        if !self.lower_bound.is_finite() || !self.upper_bound.is_finite() {
            return Err(SentinelError::ConfigError(format!(
                "band bounds must be finite, got ({}, {})",
                self.lower_bound, self.upper_bound
            )));
        }
        if self.lower_bound >= self.upper_bound {
            return Err(SentinelError::ConfigError(format!(
                "band lower bound {} must be below upper bound {}",
                self.lower_bound, self.upper_bound
            )));
        }
        Ok(())
    }
}

/// Output pin configuration for the posture signal.
///
/// Exactly one of the two pins is high at any time after the first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorConfig {
    /// Pin driven high while a wheelchair posture is detected.
    pub detected_pin: u8,
    /// Pin driven high while every person is in a normal posture.
    pub normal_pin: u8,
    /// Delay after each toggle to let the outputs settle.
    pub settle: Duration,
    /// Pins probed as outputs at start-up and driven low at shutdown.
    pub probe_pins: Range<u8>,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            detected_pin: 9,
            normal_pin: 8,
            settle: Duration::from_millis(50),
            probe_pins: 0..41,
        }
    }
}

impl ActuatorConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pin signalling a wheelchair detection.
    #[must_use]
    pub const fn with_detected_pin(mut self, pin: u8) -> Self {
        self.detected_pin = pin;
        self
    }

    /// Set the pin signalling a normal frame.
    #[must_use]
    pub const fn with_normal_pin(mut self, pin: u8) -> Self {
        self.normal_pin = pin;
        self
    }

    /// Set the settle delay applied after each toggle.
    #[must_use]
    pub const fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Set the range of pins probed at start-up.
    #[must_use]
    pub const fn with_probe_pins(mut self, pins: Range<u8>) -> Self {
        self.probe_pins = pins;
        self
    }

    /// Check that the two signal pins are distinct.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ConfigError`] if both signals share a pin.
    pub fn validate(&self) -> Result<()> {
        if self.detected_pin == self.normal_pin {
            return Err(SentinelError::ConfigError(format!(
                "detected and normal signals share pin {}",
                self.detected_pin
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_config_default() {
        let config = ClassifierConfig::default();
        assert!((config.lower_bound - 70.0).abs() < f32::EPSILON);
        assert!((config.upper_bound - 120.0).abs() < f32::EPSILON);
        assert_eq!(config.mode, LimbMode::Legacy);
        assert!(config.absent_as_origin);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_classifier_config_builder() {
        let config = ClassifierConfig::new()
            .with_band(60.0, 130.0)
            .with_mode(LimbMode::Strict)
            .with_absent_as_origin(false);

        assert!((config.lower_bound - 60.0).abs() < f32::EPSILON);
        assert!((config.upper_bound - 130.0).abs() < f32::EPSILON);
        assert_eq!(config.mode, LimbMode::Strict);
        assert!(!config.absent_as_origin);
    }

    #[test]
    fn test_classifier_config_invalid_band() {
        assert!(ClassifierConfig::new().with_band(120.0, 70.0).validate().is_err());
        assert!(ClassifierConfig::new().with_band(f32::NAN, 70.0).validate().is_err());
    }

    #[test]
    fn test_actuator_config_default() {
        let config = ActuatorConfig::default();
        assert_eq!(config.detected_pin, 9);
        assert_eq!(config.normal_pin, 8);
        assert_eq!(config.settle, Duration::from_millis(50));
        assert_eq!(config.probe_pins, 0..41);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_actuator_config_builder() {
        let config = ActuatorConfig::new()
            .with_detected_pin(17)
            .with_normal_pin(27)
            .with_settle(Duration::ZERO)
            .with_probe_pins(17..28);

        assert_eq!(config.detected_pin, 17);
        assert_eq!(config.normal_pin, 27);
        assert_eq!(config.settle, Duration::ZERO);
        assert_eq!(config.probe_pins, 17..28);
    }

    #[test]
    fn test_actuator_config_shared_pin() {
        let config = ActuatorConfig::new().with_detected_pin(8);
        assert!(config.validate().is_err());
    }
}
