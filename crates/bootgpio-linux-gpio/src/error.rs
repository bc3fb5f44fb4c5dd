//! Error types for Linux GPIO line operations

use bootgpio_core::HardwareError;
use thiserror::Error;

/// Linux GPIO line specific errors
#[derive(Debug, Error)]
pub enum LinuxGpioError {
    /// Failed to request a GPIO line
    #[cfg(target_os = "linux")]
    #[error("Failed to request GPIO line {offset} on '{chip}': {source}")]
    LineRequestFailed {
        chip: String,
        offset: u32,
        #[source]
        source: gpiocdev::Error,
    },

    /// Failed to set GPIO line value
    #[cfg(target_os = "linux")]
    #[error("Failed to set GPIO line {offset}: {source}")]
    SetValueFailed {
        offset: u32,
        #[source]
        source: gpiocdev::Error,
    },

    /// GPIO character devices are Linux only
    #[error("GPIO control only available in Linux")]
    Unsupported,

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for Linux GPIO line operations
pub type Result<T> = std::result::Result<T, LinuxGpioError>;

impl From<LinuxGpioError> for HardwareError {
    fn from(e: LinuxGpioError) -> Self {
        let reason = e.to_string();
        match e {
            #[cfg(target_os = "linux")]
            LinuxGpioError::LineRequestFailed { offset, .. } => HardwareError::RequestFailed {
                pin: offset,
                reason,
            },
            #[cfg(target_os = "linux")]
            LinuxGpioError::SetValueFailed { offset, .. } => HardwareError::SetFailed {
                pin: offset,
                reason,
            },
            LinuxGpioError::Unsupported | LinuxGpioError::InvalidParameter(_) => {
                HardwareError::Unsupported(reason)
            }
        }
    }
}
