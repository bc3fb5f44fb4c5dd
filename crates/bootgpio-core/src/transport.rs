//! Traits for the serial transport
//!
//! The serial port owns the RTS/DTR/BREAK lines and knows how to reset the
//! target. The sequencer only needs these two narrow operations from it.

use crate::error::TransportError;
use crate::sequence::{Level, LogicalPin};

/// Control lines owned by the serial transport
pub trait Transport {
    /// Drive a control line. Driving the same level twice must be harmless.
    fn drive_logical_pin(&mut self, pin: LogicalPin, level: Level) -> Result<(), TransportError>;
}

/// Hardware reset of the target device
pub trait DeviceReset {
    /// Reset the device, leaving bootloader mode
    fn reset_device(&mut self) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn drive_logical_pin(&mut self, pin: LogicalPin, level: Level) -> Result<(), TransportError> {
        (**self).drive_logical_pin(pin, level)
    }
}

impl<T: DeviceReset + ?Sized> DeviceReset for &mut T {
    fn reset_device(&mut self) -> Result<(), TransportError> {
        (**self).reset_device()
    }
}
