//! Error types for bootloader sequencing
//!
//! Errors fall into three groups that mirror where a sequence can fail:
//! the text could not be parsed, a GPIO line could not be driven, or the
//! serial transport rejected a control-line change or reset.

use crate::sequence::LogicalPin;
use thiserror::Error;

/// What went wrong while parsing a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Expected a pin number or keyword, found something else
    #[error("character '{0}' is not a digit or pin name")]
    NotAPin(char),

    /// A step was followed by something other than `,` or end of input
    #[error("character '{0}' is not a separator")]
    NotASeparator(char),

    /// Input ended where a pin was expected (e.g. a lone `-`)
    #[error("unexpected end of input, expected a pin")]
    UnexpectedEnd,

    /// Pin number does not fit a GPIO line offset
    #[error("pin number is out of range")]
    PinOutOfRange,
}

/// Sequence syntax error with the byte offset where it was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} (at position {position})")]
pub struct ParseError {
    /// Error kind
    pub kind: ParseErrorKind,
    /// Byte offset into the sequence text
    pub position: usize,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// The character that caused the error, if there was one
    pub fn offending_char(&self) -> Option<char> {
        match self.kind {
            ParseErrorKind::NotAPin(c) | ParseErrorKind::NotASeparator(c) => Some(c),
            ParseErrorKind::UnexpectedEnd | ParseErrorKind::PinOutOfRange => None,
        }
    }
}

/// GPIO line errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    /// Failed to request a line as output
    #[error("Failed to request GPIO line {pin}: {reason}")]
    RequestFailed {
        /// Line offset
        pin: u32,
        /// Backend error message
        reason: String,
    },

    /// Failed to set the value of an already requested line
    #[error("Failed to set GPIO line {pin}: {reason}")]
    SetFailed {
        /// Line offset
        pin: u32,
        /// Backend error message
        reason: String,
    },

    /// Failed to release a line
    #[error("Failed to release GPIO line {pin}: {reason}")]
    ReleaseFailed {
        /// Line offset
        pin: u32,
        /// Backend error message
        reason: String,
    },

    /// GPIO control is not available on this platform or backend
    #[error("{0}")]
    Unsupported(String),
}

/// Serial transport errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The transport rejected a control-line change
    #[error("Failed to drive {pin}: {reason}")]
    PinDriveFailed {
        /// Control line that was being driven
        pin: LogicalPin,
        /// Transport error message
        reason: String,
    },

    /// The device reset failed
    #[error("Device reset failed: {0}")]
    ResetFailed(String),
}

/// Any failure that aborts a sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// Sequence text is malformed; nothing was executed
    #[error("Invalid GPIO sequence: {0}")]
    Parse(#[from] ParseError),

    /// GPIO line request or set failed
    #[error(transparent)]
    Hardware(#[from] HardwareError),

    /// Serial control line or reset failed
    #[error(transparent)]
    Transport(#[from] TransportError),
}
