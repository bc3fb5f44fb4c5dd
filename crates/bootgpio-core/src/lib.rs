//! bootgpio-core - Bootloader entry/exit sequencing
//!
//! This crate drives a microcontroller into and out of its built-in
//! bootloader by toggling GPIO lines and serial control lines in a timed
//! order described by a small sequence language.
//!
//! # Sequence language
//!
//! A sequence is a comma-separated list of steps. Each step names a pin and
//! optionally starts with `-` to deassert it instead of asserting it:
//!
//! - `5` / `-5` - GPIO line offset 5 on the configured chip
//! - `rts` / `-rts` - the serial port RTS line
//! - `dtr` / `-dtr` - the serial port DTR line
//! - `brk` / `-brk` - the serial port BREAK condition
//!
//! A bootloader spec combines an entry and an exit sequence as
//! `entry[:exit]`. Without a `:` the exit falls back to a device reset;
//! with an empty exit half (`entry:`) nothing is done on exit.
//!
//! # Architecture
//!
//! - [`sequence`] - data model and parser
//! - [`lines`] - the [`LineBackend`] trait and the per-run [`HandleCache`]
//! - [`transport`] - traits for serial control lines and device reset
//! - [`executor`] - the [`Sequencer`] that walks steps with the inter-step delays
//! - [`bootloader`] - the entry/exit controller
//!
//! # Example
//!
//! ```ignore
//! use bootgpio_core::{BootloaderController, BootloaderSpec, Sequencer};
//!
//! let sequencer = Sequencer::new(lines);
//! let mut controller =
//!     BootloaderController::new(Some(BootloaderSpec::from("-rts,dtr,-dtr:rts")), sequencer);
//!
//! if !controller.enter(&mut port) {
//!     return Err("failed to enter bootloader".into());
//! }
//! // ... transfer firmware ...
//! controller.exit(&mut port);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bootloader;
pub mod error;
pub mod executor;
pub mod lines;
pub mod sequence;
pub mod transport;

pub use bootloader::{BootloaderController, BootloaderSpec, ExitAction};
pub use error::{HardwareError, ParseError, ParseErrorKind, SequenceError, TransportError};
pub use executor::{Sequencer, Timing, DEFAULT_CONSUMER};
pub use lines::{HandleCache, LineBackend};
pub use sequence::{parse, Level, LogicalPin, PinRef, Sequence, Step};
pub use transport::{DeviceReset, Transport};
