//! Linux GPIO line backend implementation
//!
//! This module provides `LinuxGpioLines`, which implements the `LineBackend`
//! trait using Linux's GPIO character device interface (gpiocdev).
//!
//! Each requested line gets its own `Request`, so lines can be opened lazily
//! and released independently. Releasing a line drops its request, which
//! hands the line back to the kernel.

use crate::error::{LinuxGpioError, Result};

use bootgpio_core::{HardwareError, Level, LineBackend};

/// GPIO chip used when none is configured
pub const DEFAULT_CHIP: &str = "/dev/gpiochip0";

/// Configuration for the Linux GPIO backend
#[derive(Debug, Clone)]
pub struct LinuxGpioConfig {
    /// Device path (e.g., "/dev/gpiochip0")
    pub device: String,
}

impl Default for LinuxGpioConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_CHIP.to_string(),
        }
    }
}

impl LinuxGpioConfig {
    /// Create a new configuration for the given chip device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

/// GPIO lines on one Linux GPIO chip
#[derive(Debug)]
pub struct LinuxGpioLines {
    /// Chip device path
    device: String,
}

impl LinuxGpioLines {
    /// Create a backend for the configured chip
    ///
    /// The chip is not opened until the first line is requested.
    pub fn new(config: &LinuxGpioConfig) -> Self {
        Self {
            device: config.device.clone(),
        }
    }

    /// Chip device path
    pub fn device(&self) -> &str {
        &self.device
    }
}

#[cfg(target_os = "linux")]
mod imp {
    use super::*;

    use gpiocdev::line::{Offset, Value};
    use gpiocdev::request::{Config, Request};

    /// A single requested output line
    pub struct LineHandle {
        offset: Offset,
        request: Request,
    }

    impl std::fmt::Debug for LineHandle {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("LineHandle")
                .field("offset", &self.offset)
                .finish_non_exhaustive()
        }
    }

    fn value(level: Level) -> Value {
        if level.is_asserted() {
            Value::Active
        } else {
            Value::Inactive
        }
    }

    impl LinuxGpioLines {
        pub(super) fn request(
            &self,
            offset: Offset,
            level: Level,
            consumer: &str,
        ) -> Result<LineHandle> {
            let mut req_config = Config::default();
            req_config.with_line(offset).as_output(value(level));

            let request = Request::from_config(req_config)
                .on_chip(&self.device)
                .with_consumer(consumer)
                .request()
                .map_err(|source| LinuxGpioError::LineRequestFailed {
                    chip: self.device.clone(),
                    offset,
                    source,
                })?;

            log::debug!(
                "linux_gpio: Requested line {} on {} as output ({:?})",
                offset,
                self.device,
                level
            );

            Ok(LineHandle { offset, request })
        }

        pub(super) fn set(&self, handle: &LineHandle, level: Level) -> Result<()> {
            handle
                .request
                .set_value(handle.offset, value(level))
                .map_err(|source| LinuxGpioError::SetValueFailed {
                    offset: handle.offset,
                    source,
                })?;
            Ok(())
        }
    }

    impl LineBackend for LinuxGpioLines {
        type Handle = LineHandle;

        fn request_line(
            &mut self,
            pin: u32,
            level: Level,
            consumer: &str,
        ) -> std::result::Result<LineHandle, HardwareError> {
            Ok(self.request(pin, level, consumer)?)
        }

        fn set_line(
            &mut self,
            handle: &mut LineHandle,
            level: Level,
        ) -> std::result::Result<(), HardwareError> {
            Ok(self.set(handle, level)?)
        }

        fn release_line(&mut self, handle: LineHandle) -> std::result::Result<(), HardwareError> {
            log::debug!("linux_gpio: Releasing line {}", handle.offset);
            drop(handle.request);
            Ok(())
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod imp {
    use super::*;

    /// Placeholder handle; no line can be requested on this platform
    #[derive(Debug)]
    pub enum LineHandle {}

    impl LineBackend for LinuxGpioLines {
        type Handle = LineHandle;

        fn request_line(
            &mut self,
            _pin: u32,
            _level: Level,
            _consumer: &str,
        ) -> std::result::Result<LineHandle, HardwareError> {
            Err(LinuxGpioError::Unsupported.into())
        }

        fn set_line(
            &mut self,
            handle: &mut LineHandle,
            _level: Level,
        ) -> std::result::Result<(), HardwareError> {
            match *handle {}
        }

        fn release_line(&mut self, handle: LineHandle) -> std::result::Result<(), HardwareError> {
            match handle {}
        }
    }
}

pub use imp::LineHandle;

/// Parse backend options from a list of key-value pairs
///
/// # Supported Options
///
/// - `chip=/dev/gpiochipN` - GPIO chip device path
/// - `gpiochip=N` - GPIO chip number (alternative to chip)
///
/// Without either option the backend uses [`DEFAULT_CHIP`]. Options for
/// other parts of the programmer string are ignored.
pub fn parse_options(options: &[(&str, &str)]) -> Result<LinuxGpioConfig> {
    let mut device: Option<String> = None;
    let mut gpiochip: Option<u32> = None;

    for (key, value) in options {
        match *key {
            "chip" => {
                device = Some(value.to_string());
            }
            "gpiochip" => {
                gpiochip = Some(value.parse().map_err(|_| {
                    LinuxGpioError::InvalidParameter(format!("Invalid gpiochip value: {}", value))
                })?);
            }
            _ => {}
        }
    }

    match (device, gpiochip) {
        (Some(_), Some(_)) => Err(LinuxGpioError::InvalidParameter(
            "Only one of 'chip' or 'gpiochip' can be specified".to_string(),
        )),
        (Some(device), None) if device.is_empty() => Err(LinuxGpioError::InvalidParameter(
            "Empty 'chip' value".to_string(),
        )),
        (Some(device), None) => Ok(LinuxGpioConfig::new(device)),
        (None, Some(n)) => Ok(LinuxGpioConfig::new(format!("/dev/gpiochip{}", n))),
        (None, None) => Ok(LinuxGpioConfig::default()),
    }
}
