// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Result sinks.
//!
//! A [`PostureSink`] receives each frame's [`ResultVector`] from the pipeline.
//! [`GpioSink`] maps the frame status onto two mutually exclusive output pins.

use std::thread;

use crate::config::ActuatorConfig;
use crate::error::Result;
use crate::gpio::{GpioBackend, PinBank, PinLevel};
use crate::results::{PostureStatus, ResultVector};
use crate::verbose;

/// Consumer of per-frame classification results.
pub trait PostureSink {
    /// Handle the results of one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot apply the result.
    fn on_result(&mut self, results: &ResultVector) -> Result<()>;

    /// Release any outputs at end of stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the outputs cannot be reset.
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sink that discards results.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PostureSink for NullSink {
    fn on_result(&mut self, _results: &ResultVector) -> Result<()> {
        Ok(())
    }
}

/// Drives the detected/normal pins from the frame status.
pub struct GpioSink<B: GpioBackend> {
    bank: PinBank<B>,
    config: ActuatorConfig,
    last: Option<PostureStatus>,
}

impl<B: GpioBackend> GpioSink<B> {
    /// Claim the configured pins and drive them low.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a signal pin cannot be
    /// claimed, or the initial writes fail.
    pub fn new(backend: B, config: ActuatorConfig) -> Result<Self> {
        config.validate()?;

        // The probe range always covers both signal pins
        let lo = config.detected_pin.min(config.normal_pin);
        let hi = config.detected_pin.max(config.normal_pin).saturating_add(1);
        let probe = if config.probe_pins.is_empty() {
            lo..hi
        } else {
            config.probe_pins.start.min(lo)..config.probe_pins.end.max(hi)
        };
        let bank = PinBank::setup(backend, probe)?;

        for pin in [config.detected_pin, config.normal_pin] {
            if !bank.contains(pin) {
                return Err(crate::SentinelError::GpioError(format!(
                    "signal pin {pin} could not be configured as an output"
                )));
            }
        }

        Ok(Self {
            bank,
            config,
            last: None,
        })
    }

    /// Status applied by the most recent frame.
    #[must_use]
    pub const fn last_status(&self) -> Option<PostureStatus> {
        self.last
    }

    /// Get the pin bank.
    #[must_use]
    pub const fn bank(&self) -> &PinBank<B> {
        &self.bank
    }

    fn apply(&mut self, status: PostureStatus) -> Result<()> {
        let (low, high) = if status.is_detected() {
            (self.config.normal_pin, self.config.detected_pin)
        } else {
            (self.config.detected_pin, self.config.normal_pin)
        };
        if self.last_status() != Some(status) {
            verbose!("{status}: pin {high} HIGH, pin {low} LOW");
        }
        self.bank.write(low, PinLevel::Low)?;
        self.bank.write(high, PinLevel::High)?;
        if !self.config.settle.is_zero() {
            thread::sleep(self.config.settle);
        }
        self.last = Some(status);
        Ok(())
    }
}

impl<B: GpioBackend> PostureSink for GpioSink<B> {
    fn on_result(&mut self, results: &ResultVector) -> Result<()> {
        self.apply(results.status())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.last = None;
        self.bank.all_low()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::gpio::tests::RecordingBackend;

    fn sink() -> GpioSink<RecordingBackend> {
        let backend = RecordingBackend {
            max_pin: 40,
            ..Default::default()
        };
        let config = ActuatorConfig::new()
            .with_settle(Duration::ZERO)
            .with_probe_pins(8..10);
        GpioSink::new(backend, config).unwrap()
    }

    fn writes(sink: &GpioSink<RecordingBackend>) -> &[(u8, PinLevel)] {
        &sink.bank().backend().writes
    }

    #[test]
    fn test_initial_low() {
        let sink = sink();
        assert_eq!(writes(&sink), &[(8, PinLevel::Low), (9, PinLevel::Low)]);
        assert_eq!(sink.last_status(), None);
    }

    #[test]
    fn test_detected_toggles_pins() {
        let mut sink = sink();
        sink.on_result(&ResultVector::new(vec![0, 1])).unwrap();
        assert_eq!(&writes(&sink)[2..], &[(8, PinLevel::Low), (9, PinLevel::High)]);
        assert_eq!(sink.last_status(), Some(PostureStatus::WheelchairDetected));
    }

    #[test]
    fn test_normal_toggles_pins() {
        let mut sink = sink();
        sink.on_result(&ResultVector::new(vec![0, 0])).unwrap();
        assert_eq!(&writes(&sink)[2..], &[(9, PinLevel::Low), (8, PinLevel::High)]);

        // Empty frame is normal
        sink.on_result(&ResultVector::default()).unwrap();
        assert_eq!(sink.last_status(), Some(PostureStatus::Normal));
    }

    #[test]
    fn test_shutdown_drives_low() {
        let mut sink = sink();
        sink.on_result(&ResultVector::new(vec![1])).unwrap();
        sink.shutdown().unwrap();
        assert_eq!(&writes(&sink)[4..], &[(8, PinLevel::Low), (9, PinLevel::Low)]);
    }

    #[test]
    fn test_signal_pin_unavailable() {
        let backend = RecordingBackend {
            max_pin: 8,
            ..Default::default()
        };
        let config = ActuatorConfig::new().with_settle(Duration::ZERO);
        assert!(GpioSink::new(backend, config).is_err());
    }

    #[test]
    fn test_probe_range_extended_to_signal_pins() {
        let backend = RecordingBackend {
            max_pin: 40,
            ..Default::default()
        };
        let config = ActuatorConfig::new()
            .with_settle(Duration::ZERO)
            .with_probe_pins(0..0);
        let sink = GpioSink::new(backend, config).unwrap();
        assert_eq!(sink.bank().pins(), &[8, 9]);
    }
}
