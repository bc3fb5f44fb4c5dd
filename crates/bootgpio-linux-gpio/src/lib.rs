//! bootgpio-linux-gpio - Linux GPIO line backend
//!
//! This crate implements [`bootgpio_core::LineBackend`] on top of the Linux
//! character device GPIO interface (gpiocdev), the modern replacement for
//! the deprecated sysfs interface.
//!
//! Every line is requested on its own as an output, so a sequence can open
//! lines one at a time as it first references them and drop them all when
//! it is done.
//!
//! # Example
//!
//! ```ignore
//! use bootgpio_core::{parse, Sequencer};
//! use bootgpio_linux_gpio::{LinuxGpioConfig, LinuxGpioLines};
//!
//! let lines = LinuxGpioLines::new(&LinuxGpioConfig::new("/dev/gpiochip0"));
//! let mut sequencer = Sequencer::new(lines);
//!
//! // Drive line 17 low, raise line 18, then raise 17 again
//! sequencer.execute(&parse("-17,18,17")?, &mut port);
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel 4.8+ with GPIO character device support (kernel 5.5+ for v2 API)
//! - Access to `/dev/gpiochipN` devices (may require root or udev rules)
//!
//! On other platforms the backend still builds, but every line request
//! fails with [`bootgpio_core::HardwareError::Unsupported`].

pub mod device;
pub mod error;

// Re-exports
pub use device::{parse_options, LinuxGpioConfig, LinuxGpioLines, DEFAULT_CHIP};
pub use error::{LinuxGpioError, Result};
