//! Serial port transport
//!
//! Drives the modem control lines of a serial port (RTS, DTR) and the
//! BREAK condition on TX. Many boards wire these to the target's reset and
//! boot-mode pins, which is enough to enter and leave the bootloader
//! without any GPIO lines.

use crate::error::{Result, SerialError};

use bootgpio_core::{DeviceReset, Level, LogicalPin, Transport, TransportError};
use serialport::{DataBits, FlowControl, Parity, StopBits};
use std::time::Duration;

/// Baud rate used when none is given
pub const DEFAULT_BAUD: u32 = 57600;

/// Default length of the reset pulse
const DEFAULT_RESET_PULSE: Duration = Duration::from_millis(100);

/// Configuration for opening a serial port
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Device path (e.g., "/dev/ttyUSB0" or "COM1")
    pub device: String,
    /// Baud rate
    pub baud: u32,
    /// Control line pulsed to reset the device
    pub reset_line: LogicalPin,
    /// How long the reset line is held asserted
    pub reset_pulse: Duration,
}

impl SerialConfig {
    /// Create a configuration with default baud rate and reset on DTR
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            baud: DEFAULT_BAUD,
            reset_line: LogicalPin::Dtr,
            reset_pulse: DEFAULT_RESET_PULSE,
        }
    }

    /// Set the baud rate
    pub fn with_baud(mut self, baud: u32) -> Self {
        self.baud = baud;
        self
    }

    /// Set the control line used for device reset
    pub fn with_reset_line(mut self, line: LogicalPin) -> Self {
        self.reset_line = line;
        self
    }
}

/// Serial port whose control lines take part in bootloader sequences
pub struct SerialPort {
    port: Box<dyn serialport::SerialPort>,
    device: String,
    reset_line: LogicalPin,
    reset_pulse: Duration,
}

impl SerialPort {
    /// Open the serial port described by `config`
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.device, config.baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_secs(5))
            .open()
            .map_err(|source| SerialError::OpenFailed {
                device: config.device.clone(),
                source,
            })?;

        log::info!("Opened serial port {} at {} baud", config.device, config.baud);

        Ok(Self {
            port,
            device: config.device.clone(),
            reset_line: config.reset_line,
            reset_pulse: config.reset_pulse,
        })
    }

    /// Device path
    pub fn device(&self) -> &str {
        &self.device
    }

    fn set_line(&mut self, pin: LogicalPin, level: Level) -> Result<()> {
        let asserted = level.is_asserted();
        match pin {
            LogicalPin::Rts => self.port.write_request_to_send(asserted)?,
            LogicalPin::Dtr => self.port.write_data_terminal_ready(asserted)?,
            LogicalPin::Brk if asserted => self.port.set_break()?,
            LogicalPin::Brk => self.port.clear_break()?,
        }
        Ok(())
    }

    fn pulse_reset(&mut self) -> Result<()> {
        self.set_line(self.reset_line, Level::Asserted)?;
        std::thread::sleep(self.reset_pulse);
        self.set_line(self.reset_line, Level::Deasserted)
    }
}

impl Transport for SerialPort {
    fn drive_logical_pin(
        &mut self,
        pin: LogicalPin,
        level: Level,
    ) -> std::result::Result<(), TransportError> {
        log::debug!("{}: {} {:?}", self.device, pin, level);
        self.set_line(pin, level)
            .map_err(|e| TransportError::PinDriveFailed {
                pin,
                reason: e.to_string(),
            })
    }
}

impl DeviceReset for SerialPort {
    /// Pulse the configured reset line
    fn reset_device(&mut self) -> std::result::Result<(), TransportError> {
        log::debug!(
            "{}: pulsing {} for {:?}",
            self.device,
            self.reset_line,
            self.reset_pulse
        );

        self.pulse_reset()
            .map_err(|e| TransportError::ResetFailed(e.to_string()))
    }
}

/// Parse serial options from a list of key-value pairs
///
/// # Supported Options
///
/// - `dev=/dev/ttyUSB0` - serial device (required); `dev=/dev/ttyUSB0:115200`
///   sets the baud rate too
/// - `baud=N` - baud rate (default 57600)
/// - `reset=rts|dtr` - control line pulsed for a device reset (default dtr)
/// - `reset_ms=N` - reset pulse length in milliseconds (default 100)
///
/// Unknown keys are left for other parts of the programmer string.
pub fn parse_options(options: &[(&str, &str)]) -> Result<SerialConfig> {
    let mut device: Option<&str> = None;
    let mut baud: Option<u32> = None;
    let mut reset_line = LogicalPin::Dtr;
    let mut reset_pulse = DEFAULT_RESET_PULSE;

    for (key, value) in options {
        match *key {
            "dev" => {
                if let Some((dev, baud_str)) = value.rsplit_once(':') {
                    baud = Some(parse_baud(baud_str)?);
                    device = Some(dev);
                } else {
                    device = Some(*value);
                }
            }
            "baud" => {
                baud = Some(parse_baud(value)?);
            }
            "reset" => {
                reset_line = match LogicalPin::from_keyword(value) {
                    Some(line @ (LogicalPin::Rts | LogicalPin::Dtr)) => line,
                    _ => {
                        return Err(SerialError::InvalidParameter(format!(
                            "Invalid reset line: {} (expected rts or dtr)",
                            value
                        )))
                    }
                };
            }
            "reset_ms" => {
                let ms: u64 = value.parse().map_err(|_| {
                    SerialError::InvalidParameter(format!("Invalid reset_ms value: {}", value))
                })?;
                reset_pulse = Duration::from_millis(ms);
            }
            _ => {}
        }
    }

    let device = device
        .filter(|d| !d.is_empty())
        .ok_or(SerialError::MissingParameter("dev"))?;

    let mut config = SerialConfig::new(device).with_reset_line(reset_line);
    if let Some(baud) = baud {
        config = config.with_baud(baud);
    }
    config.reset_pulse = reset_pulse;
    Ok(config)
}

fn parse_baud(s: &str) -> Result<u32> {
    match s.parse::<u32>() {
        Ok(0) | Err(_) => Err(SerialError::InvalidParameter(format!(
            "Invalid baud rate: {}",
            s
        ))),
        Ok(baud) => Ok(baud),
    }
}
