//! Sequence execution
//!
//! The [`Sequencer`] walks a parsed [`Sequence`] front to back. Serial
//! control lines go to the [`Transport`], numeric pins go through a
//! [`HandleCache`] built fresh for every run. After each step it pauses so
//! the target can see the transition, and after the whole run it releases
//! every line it opened and waits for the target to settle.

use crate::error::SequenceError;
use crate::lines::{HandleCache, LineBackend};
use crate::sequence::{self, PinRef, Sequence, Step};
use crate::transport::Transport;
use std::time::Duration;

/// Consumer label attached to requested GPIO lines
pub const DEFAULT_CONSUMER: &str = "bootgpio";

/// Delays applied while running a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Pause after every step
    pub step_delay: Duration,
    /// Pause after the run, once all lines are released
    pub settle_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(100),
            settle_delay: Duration::from_millis(500),
        }
    }
}

impl Timing {
    /// No delays at all (dry runs and tests)
    pub const fn immediate() -> Self {
        Self {
            step_delay: Duration::ZERO,
            settle_delay: Duration::ZERO,
        }
    }

    fn pause(delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Runs sequences against a GPIO backend and a serial transport
pub struct Sequencer<B: LineBackend> {
    lines: B,
    timing: Timing,
    consumer: String,
}

impl<B: LineBackend> Sequencer<B> {
    /// Create a sequencer with default timing and consumer label
    pub fn new(lines: B) -> Self {
        Self {
            lines,
            timing: Timing::default(),
            consumer: DEFAULT_CONSUMER.to_string(),
        }
    }

    /// Set the delays
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Set the consumer label for requested lines
    pub fn with_consumer(mut self, consumer: impl Into<String>) -> Self {
        self.consumer = consumer.into();
        self
    }

    /// The GPIO backend
    pub fn lines(&self) -> &B {
        &self.lines
    }

    /// Consume the sequencer and return the backend
    pub fn into_lines(self) -> B {
        self.lines
    }

    /// Execute a sequence, logging the reason on failure
    ///
    /// Returns true if every step was executed.
    pub fn execute<T: Transport + ?Sized>(&mut self, sequence: &Sequence, port: &mut T) -> bool {
        match self.try_execute(sequence, port) {
            Ok(()) => true,
            Err(e) => {
                log::error!("GPIO sequence aborted: {}", e);
                false
            }
        }
    }

    /// Execute a sequence, stopping at the first failing step
    ///
    /// Lines opened before the failure are still released and the settle
    /// delay is still observed.
    pub fn try_execute<T: Transport + ?Sized>(
        &mut self,
        sequence: &Sequence,
        port: &mut T,
    ) -> Result<(), SequenceError> {
        log::debug!("Running GPIO sequence '{}'", sequence);
        let timing = self.timing;

        let result = {
            let mut cache = HandleCache::new(&mut self.lines, &self.consumer);
            let result = run_steps(sequence, port, &mut cache, timing.step_delay);
            cache.release_all();
            result
        };

        Timing::pause(timing.settle_delay);
        result
    }

    /// Parse and execute sequence text
    ///
    /// The whole text is parsed before any line is touched. A parse error
    /// performs no step and no step pause, but the settle delay is still
    /// observed before it is returned.
    pub fn run<T: Transport + ?Sized>(
        &mut self,
        text: &str,
        port: &mut T,
    ) -> Result<(), SequenceError> {
        let sequence = match sequence::parse(text) {
            Ok(sequence) => sequence,
            Err(e) => {
                Timing::pause(self.timing.settle_delay);
                return Err(e.into());
            }
        };
        self.try_execute(&sequence, port)
    }
}

fn run_steps<B: LineBackend, T: Transport + ?Sized>(
    sequence: &Sequence,
    port: &mut T,
    cache: &mut HandleCache<'_, B>,
    step_delay: Duration,
) -> Result<(), SequenceError> {
    for (index, step) in sequence.iter().enumerate() {
        log::debug!("Step {}: {}", index, step);
        let result = drive_step(step, port, cache);
        Timing::pause(step_delay);
        result?;
    }
    Ok(())
}

fn drive_step<B: LineBackend, T: Transport + ?Sized>(
    step: &Step,
    port: &mut T,
    cache: &mut HandleCache<'_, B>,
) -> Result<(), SequenceError> {
    match step.pin {
        PinRef::Logical(pin) => port.drive_logical_pin(pin, step.level)?,
        PinRef::Gpio(pin) => cache.acquire_or_update(pin, step.level)?,
    }
    Ok(())
}
