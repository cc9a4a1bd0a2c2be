// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! GPIO output abstraction.
//!
//! [`GpioBackend`] is the narrow interface the sentinel needs from a platform
//! GPIO driver: configure a pin as an output and write a level to it.
//! [`PinBank`] performs the start-up enumeration once and owns the backend for
//! the lifetime of the process.

use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, SentinelError};
use crate::{info, verbose};

/// Logic level of an output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    const fn as_sysfs(self) -> &'static str {
        match self {
            Self::Low => "0",
            Self::High => "1",
        }
    }
}

impl fmt::Display for PinLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("LOW"),
            Self::High => f.write_str("HIGH"),
        }
    }
}

/// Platform GPIO driver.
pub trait GpioBackend {
    /// Configure `pin` as an output.
    ///
    /// # Errors
    ///
    /// Returns an error if the pin does not exist or cannot be claimed.
    fn setup_output(&mut self, pin: u8) -> Result<()>;

    /// Drive `pin` to `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write(&mut self, pin: u8, level: PinLevel) -> Result<()>;
}

impl<B: GpioBackend + ?Sized> GpioBackend for Box<B> {
    fn setup_output(&mut self, pin: u8) -> Result<()> {
        (**self).setup_output(pin)
    }

    fn write(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        (**self).write(pin, level)
    }
}

/// Linux sysfs GPIO driver (`/sys/class/gpio`).
#[derive(Debug, Clone)]
pub struct SysfsBackend {
    root: PathBuf,
}

impl Default for SysfsBackend {
    fn default() -> Self {
        Self::new("/sys/class/gpio")
    }
}

impl SysfsBackend {
    /// Create a backend rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn pin_dir(&self, pin: u8) -> PathBuf {
        self.root.join(format!("gpio{pin}"))
    }
}

impl GpioBackend for SysfsBackend {
    fn setup_output(&mut self, pin: u8) -> Result<()> {
        let dir = self.pin_dir(pin);
        if !dir.exists() {
            fs::write(self.root.join("export"), pin.to_string())
                .map_err(|e| SentinelError::GpioError(format!("export pin {pin}: {e}")))?;
        }
        fs::write(dir.join("direction"), "out")
            .map_err(|e| SentinelError::GpioError(format!("set pin {pin} direction: {e}")))
    }

    fn write(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        fs::write(self.pin_dir(pin).join("value"), level.as_sysfs())
            .map_err(|e| SentinelError::GpioError(format!("write pin {pin}: {e}")))
    }
}

/// Backend that only logs pin activity. Every pin can be configured.
#[derive(Debug, Clone, Default)]
pub struct DryRunBackend;

impl GpioBackend for DryRunBackend {
    fn setup_output(&mut self, _pin: u8) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        verbose!("GPIO {pin} -> {level}");
        Ok(())
    }
}

/// Selectable backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Log writes without touching hardware.
    #[default]
    DryRun,
    /// Linux sysfs GPIO.
    Sysfs,
}

impl BackendKind {
    /// Instantiate the backend.
    #[must_use]
    pub fn build(self) -> Box<dyn GpioBackend> {
        match self {
            Self::DryRun => Box::new(DryRunBackend),
            Self::Sysfs => Box::new(SysfsBackend::default()),
        }
    }
}

impl FromStr for BackendKind {
    type Err = SentinelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dry-run" | "dryrun" | "none" => Ok(Self::DryRun),
            "sysfs" => Ok(Self::Sysfs),
            _ => Err(SentinelError::ConfigError(format!(
                "invalid GPIO backend '{s}', expected one of: dry-run, sysfs"
            ))),
        }
    }
}

/// The set of output pins claimed at start-up.
pub struct PinBank<B: GpioBackend> {
    backend: B,
    pins: Vec<u8>,
    unavailable: Vec<u8>,
}

impl<B: GpioBackend> PinBank<B> {
    /// Probe every pin in `range` as an output and drive the claimed ones low.
    ///
    /// Pins that cannot be configured are skipped and always logged as `N/A`,
    /// whatever the verbosity.
    ///
    /// # Errors
    ///
    /// Returns an error if a claimed pin cannot be driven low.
    pub fn setup(mut backend: B, range: Range<u8>) -> Result<Self> {
        let mut pins = Vec::new();
        let mut unavailable = Vec::new();
        for pin in range {
            match backend.setup_output(pin) {
                Ok(()) => pins.push(pin),
                Err(_) => {
                    info!("{pin}\tN/A");
                    unavailable.push(pin);
                }
            }
        }

        let mut bank = Self {
            backend,
            pins,
            unavailable,
        };
        bank.all_low()?;
        Ok(bank)
    }

    /// Pins claimed during setup.
    #[must_use]
    pub fn pins(&self) -> &[u8] {
        &self.pins
    }

    /// Pins reported `N/A` during setup.
    #[must_use]
    pub fn unavailable(&self) -> &[u8] {
        &self.unavailable
    }

    /// Whether `pin` was claimed during setup.
    #[must_use]
    pub fn contains(&self, pin: u8) -> bool {
        self.pins.contains(&pin)
    }

    /// Drive a claimed pin.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::GpioError`] if the pin was not claimed or the write fails.
    pub fn write(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        if !self.contains(pin) {
            return Err(SentinelError::GpioError(format!("pin {pin} is not configured")));
        }
        self.backend.write(pin, level)
    }

    /// Drive every claimed pin low.
    ///
    /// # Errors
    ///
    /// Returns the first write error.
    pub fn all_low(&mut self) -> Result<()> {
        for &pin in &self.pins {
            self.backend.write(pin, PinLevel::Low)?;
        }
        Ok(())
    }

    /// Get the backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }
}
