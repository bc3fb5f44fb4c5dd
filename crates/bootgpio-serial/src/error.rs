//! Error types for serial port operations

use thiserror::Error;

/// Serial port errors
#[derive(Debug, Error)]
pub enum SerialError {
    /// Failed to open the serial port
    #[error("Failed to open serial port '{device}': {source}")]
    OpenFailed {
        device: String,
        #[source]
        source: serialport::Error,
    },

    /// Serial port error
    #[error("Serial port error: {0}")]
    Port(#[from] serialport::Error),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Missing required parameter
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Result type for serial port operations
pub type Result<T> = std::result::Result<T, SerialError>;
