//! bootgpio-serial - Serial port transport
//!
//! This crate implements the [`bootgpio_core::Transport`] and
//! [`bootgpio_core::DeviceReset`] traits for a serial port, so sequences can
//! use the `rts`, `dtr` and `brk` pins and the exit path can fall back to
//! pulsing a reset line.
//!
//! # Example
//!
//! ```no_run
//! use bootgpio_core::{DeviceReset, Level, LogicalPin, Transport};
//! use bootgpio_serial::{SerialConfig, SerialPort};
//!
//! let mut port = SerialPort::open(&SerialConfig::new("/dev/ttyUSB0").with_baud(115200))?;
//!
//! // Hold BOOT0 (wired to RTS) while pulsing reset (wired to DTR)
//! port.drive_logical_pin(LogicalPin::Rts, Level::Asserted)?;
//! port.reset_device()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod port;

// Re-exports
pub use error::{Result, SerialError};
pub use port::{parse_options, SerialConfig, SerialPort, DEFAULT_BAUD};
