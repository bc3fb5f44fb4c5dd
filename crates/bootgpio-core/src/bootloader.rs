//! Bootloader entry/exit controller
//!
//! A [`BootloaderSpec`] has the form `entry[:exit]`:
//!
//! | Spec        | Entry runs | Exit does              |
//! |-------------|------------|------------------------|
//! | (none)      | nothing    | device reset           |
//! | `5,-6`      | `5,-6`     | device reset           |
//! | `5,-6:`     | `5,-6`     | nothing                |
//! | `5,-6:-5`   | `5,-6`     | `-5`                   |
//! | `:-5`       | nothing    | `-5`                   |
//!
//! Only the first `:` splits the spec. Whether the exit falls back to a
//! reset depends only on the presence of a `:`, not on whether the entry
//! half parses.

use crate::error::SequenceError;
use crate::executor::Sequencer;
use crate::lines::LineBackend;
use crate::transport::{DeviceReset, Transport};
use core::fmt;

/// Operator supplied `entry[:exit]` string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootloaderSpec {
    raw: String,
}

/// What to do when leaving the bootloader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitAction<'a> {
    /// No exit sequence given, reset the device
    Reset,
    /// Empty exit sequence, do nothing
    Nothing,
    /// Run this exit sequence text
    Sequence(&'a str),
}

impl BootloaderSpec {
    /// Wrap a raw spec string
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Entry sequence text (everything before the first `:`)
    pub fn entry(&self) -> &str {
        match self.raw.split_once(':') {
            Some((entry, _)) => entry,
            None => &self.raw,
        }
    }

    /// Exit behaviour (derived from the text after the first `:`)
    pub fn exit(&self) -> ExitAction<'_> {
        match self.raw.split_once(':') {
            None => ExitAction::Reset,
            Some((_, "")) => ExitAction::Nothing,
            Some((_, exit)) => ExitAction::Sequence(exit),
        }
    }
}

impl From<&str> for BootloaderSpec {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for BootloaderSpec {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for BootloaderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Drives the target into and out of its bootloader
///
/// Holds no state between calls apart from its configuration: each call
/// parses its half of the spec and runs it with a fresh set of line
/// handles.
pub struct BootloaderController<B: LineBackend> {
    spec: Option<BootloaderSpec>,
    sequencer: Sequencer<B>,
}

impl<B: LineBackend> BootloaderController<B> {
    /// Create a controller. `None` means no GPIO wiring at all.
    pub fn new(spec: Option<BootloaderSpec>, sequencer: Sequencer<B>) -> Self {
        Self { spec, sequencer }
    }

    /// The underlying sequencer
    pub fn sequencer(&self) -> &Sequencer<B> {
        &self.sequencer
    }

    /// Consume the controller and return the sequencer
    pub fn into_sequencer(self) -> Sequencer<B> {
        self.sequencer
    }

    /// Run the entry sequence, returning true on success
    pub fn enter<T: Transport + ?Sized>(&mut self, port: &mut T) -> bool {
        match self.try_enter(port) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to enter bootloader: {}", e);
                false
            }
        }
    }

    /// Run the entry sequence
    ///
    /// No spec or an empty entry half is a successful no-op.
    pub fn try_enter<T: Transport + ?Sized>(&mut self, port: &mut T) -> Result<(), SequenceError> {
        let Some(spec) = &self.spec else {
            return Ok(());
        };

        let entry = spec.entry();
        if entry.is_empty() {
            log::debug!("Empty entry sequence, nothing to do");
            return Ok(());
        }

        log::info!("Entering bootloader with GPIO sequence '{}'", entry);
        self.sequencer.run(entry, port)
    }

    /// Leave the bootloader, returning true on success
    pub fn exit<P: Transport + DeviceReset + ?Sized>(&mut self, port: &mut P) -> bool {
        match self.try_exit(port) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to exit bootloader: {}", e);
                false
            }
        }
    }

    /// Leave the bootloader
    ///
    /// Without a spec, or with a spec lacking `:`, the device is reset.
    /// Otherwise the exit half is run and the reset path is never used.
    pub fn try_exit<P: Transport + DeviceReset + ?Sized>(
        &mut self,
        port: &mut P,
    ) -> Result<(), SequenceError> {
        let action = self
            .spec
            .as_ref()
            .map_or(ExitAction::Reset, BootloaderSpec::exit);

        match action {
            ExitAction::Reset => {
                log::info!("Resetting device");
                port.reset_device()?;
                Ok(())
            }
            ExitAction::Nothing => {
                log::debug!("Empty exit sequence, nothing to do");
                Ok(())
            }
            ExitAction::Sequence(exit) => {
                log::info!("Leaving bootloader with GPIO sequence '{}'", exit);
                self.sequencer.run(exit, port)
            }
        }
    }
}
