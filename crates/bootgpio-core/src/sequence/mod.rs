//! Sequence data model
//!
//! A [`Sequence`] is an ordered list of [`Step`]s. Each step drives one pin,
//! either a GPIO line on the configured chip or one of the serial port's
//! control lines, to a [`Level`].

mod parser;

pub use parser::parse;

use crate::error::ParseError;
use core::fmt;
use core::str::FromStr;

/// Serial transport control lines usable in a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalPin {
    /// Request To Send
    Rts,
    /// Data Terminal Ready
    Dtr,
    /// BREAK condition on TX
    Brk,
}

impl LogicalPin {
    /// All logical pins, in keyword matching order
    pub const ALL: [LogicalPin; 3] = [LogicalPin::Rts, LogicalPin::Dtr, LogicalPin::Brk];

    /// Keyword used for this pin in sequence text
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Rts => "rts",
            Self::Dtr => "dtr",
            Self::Brk => "brk",
        }
    }

    /// Look up a pin by its sequence keyword
    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pin| pin.keyword() == s)
    }
}

impl fmt::Display for LogicalPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rts => write!(f, "RTS"),
            Self::Dtr => write!(f, "DTR"),
            Self::Brk => write!(f, "BREAK"),
        }
    }
}

/// Pin referenced by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinRef {
    /// GPIO line offset on the configured chip
    Gpio(u32),
    /// Serial transport control line
    Logical(LogicalPin),
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(offset) => write!(f, "{}", offset),
            Self::Logical(pin) => f.write_str(pin.keyword()),
        }
    }
}

/// Level a step drives its pin to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Active (high for GPIO lines, set for control lines)
    Asserted,
    /// Inactive (low for GPIO lines, cleared for control lines)
    Deasserted,
}

impl Level {
    /// Returns true for [`Level::Asserted`]
    pub const fn is_asserted(self) -> bool {
        matches!(self, Self::Asserted)
    }
}

impl From<bool> for Level {
    fn from(asserted: bool) -> Self {
        if asserted {
            Self::Asserted
        } else {
            Self::Deasserted
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level.is_asserted()
    }
}

/// One pin transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    /// Pin to drive
    pub pin: PinRef,
    /// Level to drive it to
    pub level: Level,
}

impl Step {
    /// Create a new step
    pub const fn new(pin: PinRef, level: Level) -> Self {
        Self { pin, level }
    }

    /// Drive a GPIO line
    pub const fn gpio(offset: u32, level: Level) -> Self {
        Self::new(PinRef::Gpio(offset), level)
    }

    /// Drive a serial control line
    pub const fn logical(pin: LogicalPin, level: Level) -> Self {
        Self::new(PinRef::Logical(pin), level)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.level.is_asserted() {
            f.write_str("-")?;
        }
        write!(f, "{}", self.pin)
    }
}

/// Ordered list of steps, executed front to back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    steps: Vec<Step>,
}

impl Sequence {
    /// Create a sequence from a list of steps
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if there is nothing to execute
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate over the steps in execution order
    pub fn iter(&self) -> core::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl FromIterator<Step> for Sequence {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Step;
    type IntoIter = core::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Renders the canonical sequence text (`5,-6,rts,-dtr`)
impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl FromStr for Sequence {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
