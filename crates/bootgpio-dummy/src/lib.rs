//! bootgpio-dummy - Recording GPIO backend and transport
//!
//! This crate provides a GPIO backend and a serial transport that touch no
//! hardware. Every call is appended to an event log, which makes them
//! useful for dry runs of a sequence and for testing without real hardware.
//! Failures can be injected per pin to exercise the error paths.

use bootgpio_core::{
    DeviceReset, HardwareError, Level, LineBackend, LogicalPin, Transport, TransportError,
};

/// A recorded hardware call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// GPIO line requested with an initial level
    Request { pin: u32, level: Level },
    /// Requested GPIO line driven
    Set { pin: u32, level: Level },
    /// GPIO line released
    Release { pin: u32 },
    /// Serial control line driven
    Logical { pin: LogicalPin, level: Level },
    /// Device reset
    Reset,
}

/// Failures to inject
#[derive(Debug, Clone, Default)]
pub struct DummyConfig {
    /// Requesting this GPIO line fails
    pub fail_request: Option<u32>,
    /// Releasing this GPIO line fails
    pub fail_release: Option<u32>,
    /// Driving this control line fails
    pub fail_logical: Option<LogicalPin>,
    /// Device reset fails
    pub fail_reset: bool,
}

/// Handle for a line requested from [`DummyLines`]
#[derive(Debug)]
pub struct DummyHandle {
    pin: u32,
}

/// GPIO backend that records calls instead of touching hardware
#[derive(Debug, Default)]
pub struct DummyLines {
    config: DummyConfig,
    events: Vec<Event>,
    open: Vec<u32>,
}

impl DummyLines {
    /// Create a backend with the given failure injection
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Recorded calls, oldest first
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Lines currently requested and not yet released
    pub fn open_lines(&self) -> &[u32] {
        &self.open
    }

    /// Number of times `pin` was requested
    pub fn requests_for(&self, pin: u32) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Request { pin: p, .. } if *p == pin))
            .count()
    }

    /// Number of times `pin` was released
    pub fn releases_for(&self, pin: u32) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Release { pin: p } if *p == pin))
            .count()
    }
}

impl LineBackend for DummyLines {
    type Handle = DummyHandle;

    fn request_line(
        &mut self,
        pin: u32,
        level: Level,
        consumer: &str,
    ) -> Result<DummyHandle, HardwareError> {
        if self.config.fail_request == Some(pin) {
            return Err(HardwareError::RequestFailed {
                pin,
                reason: "injected failure".to_string(),
            });
        }
        if self.open.contains(&pin) {
            return Err(HardwareError::RequestFailed {
                pin,
                reason: "line busy".to_string(),
            });
        }

        log::debug!("dummy: request line {} for {} ({:?})", pin, consumer, level);
        self.events.push(Event::Request { pin, level });
        self.open.push(pin);
        Ok(DummyHandle { pin })
    }

    fn set_line(&mut self, handle: &mut DummyHandle, level: Level) -> Result<(), HardwareError> {
        log::debug!("dummy: set line {} ({:?})", handle.pin, level);
        self.events.push(Event::Set {
            pin: handle.pin,
            level,
        });
        Ok(())
    }

    fn release_line(&mut self, handle: DummyHandle) -> Result<(), HardwareError> {
        let pin = handle.pin;
        self.events.push(Event::Release { pin });
        self.open.retain(|&p| p != pin);

        if self.config.fail_release == Some(pin) {
            return Err(HardwareError::ReleaseFailed {
                pin,
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Serial transport that records control-line changes and resets
#[derive(Debug, Default)]
pub struct DummyPort {
    config: DummyConfig,
    events: Vec<Event>,
}

impl DummyPort {
    /// Create a transport with the given failure injection
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            events: Vec::new(),
        }
    }

    /// Recorded calls, oldest first
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of device resets
    pub fn resets(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Reset).count()
    }
}

impl Transport for DummyPort {
    fn drive_logical_pin(&mut self, pin: LogicalPin, level: Level) -> Result<(), TransportError> {
        if self.config.fail_logical == Some(pin) {
            return Err(TransportError::PinDriveFailed {
                pin,
                reason: "injected failure".to_string(),
            });
        }

        log::debug!("dummy: drive {} ({:?})", pin, level);
        self.events.push(Event::Logical { pin, level });
        Ok(())
    }
}

impl DeviceReset for DummyPort {
    fn reset_device(&mut self) -> Result<(), TransportError> {
        if self.config.fail_reset {
            return Err(TransportError::ResetFailed("injected failure".to_string()));
        }

        log::debug!("dummy: reset device");
        self.events.push(Event::Reset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootgpio_core::{
        parse, BootloaderController, BootloaderSpec, SequenceError, Sequencer, Timing,
    };
    use std::time::{Duration, Instant};

    fn sequencer(config: DummyConfig) -> Sequencer<DummyLines> {
        Sequencer::new(DummyLines::new(config)).with_timing(Timing::immediate())
    }

    fn controller(spec: Option<&str>, config: DummyConfig) -> BootloaderController<DummyLines> {
        BootloaderController::new(spec.map(BootloaderSpec::from), sequencer(config))
    }

    #[test]
    fn test_execute_reuses_line() {
        let mut seq = sequencer(DummyConfig::default());
        let mut port = DummyPort::default();
        let steps = parse("3,-3").unwrap();

        assert!(seq.execute(&steps, &mut port));
        assert_eq!(
            seq.lines().events(),
            &[
                Event::Request {
                    pin: 3,
                    level: Level::Asserted
                },
                Event::Set {
                    pin: 3,
                    level: Level::Deasserted
                },
                Event::Release { pin: 3 },
            ]
        );
        assert!(seq.lines().open_lines().is_empty());
    }

    #[test]
    fn test_execute_mixed_order() {
        let mut seq = sequencer(DummyConfig::default());
        let mut port = DummyPort::default();
        let steps = parse("-rts,5,dtr,6,-5").unwrap();

        assert!(seq.execute(&steps, &mut port));
        assert_eq!(
            port.events(),
            &[
                Event::Logical {
                    pin: LogicalPin::Rts,
                    level: Level::Deasserted
                },
                Event::Logical {
                    pin: LogicalPin::Dtr,
                    level: Level::Asserted
                },
            ]
        );
        // Lines are released newest first
        let releases: Vec<_> = seq
            .lines()
            .events()
            .iter()
            .filter(|e| matches!(e, Event::Release { .. }))
            .copied()
            .collect();
        assert_eq!(
            releases,
            vec![Event::Release { pin: 6 }, Event::Release { pin: 5 }]
        );
    }

    #[test]
    fn test_request_failure_releases_earlier_lines() {
        let mut seq = sequencer(DummyConfig {
            fail_request: Some(6),
            ..Default::default()
        });
        let mut port = DummyPort::default();
        let steps = parse("5,6,7").unwrap();

        let err = seq.try_execute(&steps, &mut port).unwrap_err();
        assert!(matches!(
            err,
            SequenceError::Hardware(HardwareError::RequestFailed { pin: 6, .. })
        ));
        assert_eq!(seq.lines().requests_for(5), 1);
        assert_eq!(seq.lines().releases_for(5), 1);
        assert_eq!(seq.lines().requests_for(7), 0);
        assert!(seq.lines().open_lines().is_empty());
    }

    #[test]
    fn test_transport_failure_stops_sequence() {
        let mut seq = sequencer(DummyConfig::default());
        let mut port = DummyPort::new(DummyConfig {
            fail_logical: Some(LogicalPin::Dtr),
            ..Default::default()
        });
        let steps = parse("1,rts,dtr,2").unwrap();

        assert!(!seq.execute(&steps, &mut port));
        assert_eq!(port.events().len(), 1);
        assert_eq!(seq.lines().requests_for(2), 0);
        assert_eq!(seq.lines().releases_for(1), 1);
    }

    #[test]
    fn test_release_failure_keeps_verdict() {
        let mut seq = sequencer(DummyConfig {
            fail_release: Some(4),
            ..Default::default()
        });
        let mut port = DummyPort::default();

        assert!(seq.execute(&parse("4,-4").unwrap(), &mut port));
        assert!(seq.lines().open_lines().is_empty());
    }

    #[test]
    fn test_runs_do_not_share_handles() {
        let mut seq = sequencer(DummyConfig::default());
        let mut port = DummyPort::default();

        seq.run("8", &mut port).unwrap();
        seq.run("-8", &mut port).unwrap();
        assert_eq!(seq.lines().requests_for(8), 2);
        assert_eq!(seq.lines().releases_for(8), 2);
    }

    #[test]
    fn test_parse_error_touches_nothing() {
        let mut seq = sequencer(DummyConfig::default());
        let mut port = DummyPort::default();

        let err = seq.run("5,6x", &mut port).unwrap_err();
        assert!(matches!(err, SequenceError::Parse(_)));
        assert!(seq.lines().events().is_empty());
        assert!(port.events().is_empty());
    }

    #[test]
    fn test_execute_empty_sequence() {
        let mut seq = sequencer(DummyConfig::default());
        let mut port = DummyPort::default();

        assert!(seq.execute(&parse("").unwrap(), &mut port));
        assert!(seq.lines().events().is_empty());
    }

    #[test]
    fn test_enter_without_spec() {
        let mut ctrl = controller(None, DummyConfig::default());
        let mut port = DummyPort::default();

        assert!(ctrl.enter(&mut port));
        assert!(port.events().is_empty());
        assert!(ctrl.sequencer().lines().events().is_empty());
    }

    #[test]
    fn test_enter_empty_entry() {
        for spec in ["", ":", ":5"] {
            let mut ctrl = controller(Some(spec), DummyConfig::default());
            let mut port = DummyPort::default();

            assert!(ctrl.enter(&mut port));
            assert!(ctrl.sequencer().lines().events().is_empty());
        }
    }

    #[test]
    fn test_enter_runs_entry_half() {
        let mut ctrl = controller(Some("-rts,5:6"), DummyConfig::default());
        let mut port = DummyPort::default();

        assert!(ctrl.enter(&mut port));
        assert_eq!(port.events().len(), 1);
        assert_eq!(ctrl.sequencer().lines().requests_for(5), 1);
        assert_eq!(ctrl.sequencer().lines().requests_for(6), 0);
    }

    #[test]
    fn test_enter_malformed() {
        let mut ctrl = controller(Some("5x:6"), DummyConfig::default());
        let mut port = DummyPort::default();

        assert!(!ctrl.enter(&mut port));
        assert!(ctrl.sequencer().lines().events().is_empty());
    }

    #[test]
    fn test_exit_empty_half_does_nothing() {
        let mut ctrl = controller(Some("5:"), DummyConfig::default());
        let mut port = DummyPort::default();

        assert!(ctrl.exit(&mut port));
        assert!(port.events().is_empty());
        assert!(ctrl.sequencer().lines().events().is_empty());
    }

    #[test]
    fn test_exit_without_colon_resets() {
        let mut ctrl = controller(Some("5"), DummyConfig::default());
        let mut port = DummyPort::default();

        assert!(ctrl.exit(&mut port));
        assert_eq!(port.resets(), 1);
        assert!(ctrl.sequencer().lines().events().is_empty());
    }

    #[test]
    fn test_exit_without_spec_resets() {
        let mut ctrl = controller(None, DummyConfig::default());
        let mut port = DummyPort::default();

        assert!(ctrl.exit(&mut port));
        assert_eq!(port.resets(), 1);
    }

    #[test]
    fn test_exit_reset_failure() {
        let mut ctrl = controller(Some("5"), DummyConfig::default());
        let mut port = DummyPort::new(DummyConfig {
            fail_reset: true,
            ..Default::default()
        });

        assert!(!ctrl.exit(&mut port));
        assert!(matches!(
            ctrl.try_exit(&mut port),
            Err(SequenceError::Transport(TransportError::ResetFailed(_)))
        ));
    }

    #[test]
    fn test_exit_runs_exit_half() {
        let mut ctrl = controller(Some("5:6"), DummyConfig::default());
        let mut port = DummyPort::default();

        assert!(ctrl.exit(&mut port));
        assert_eq!(port.resets(), 0);
        assert_eq!(
            ctrl.sequencer().lines().events(),
            &[
                Event::Request {
                    pin: 6,
                    level: Level::Asserted
                },
                Event::Release { pin: 6 },
            ]
        );
    }

    #[test]
    fn test_exit_with_malformed_entry_never_resets() {
        let mut ctrl = controller(Some("garbage:-dtr"), DummyConfig::default());
        let mut port = DummyPort::default();

        assert!(ctrl.exit(&mut port));
        assert_eq!(port.resets(), 0);
        assert_eq!(
            port.events(),
            &[Event::Logical {
                pin: LogicalPin::Dtr,
                level: Level::Deasserted
            }]
        );
    }

    #[test]
    fn test_entry_and_exit_open_same_pin_independently() {
        let mut ctrl = controller(Some("-3,3:-3"), DummyConfig::default());
        let mut port = DummyPort::default();

        assert!(ctrl.enter(&mut port));
        assert!(ctrl.exit(&mut port));

        let lines = ctrl.into_sequencer().into_lines();
        assert_eq!(lines.requests_for(3), 2);
        assert_eq!(lines.releases_for(3), 2);
    }

    const STEP: Duration = Duration::from_millis(40);
    const SETTLE: Duration = Duration::from_millis(120);

    fn timed_sequencer(config: DummyConfig, step_delay: Duration) -> Sequencer<DummyLines> {
        Sequencer::new(DummyLines::new(config)).with_timing(Timing {
            step_delay,
            settle_delay: SETTLE,
        })
    }

    fn timed_run(
        seq: &mut Sequencer<DummyLines>,
        port: &mut DummyPort,
        text: &str,
    ) -> (bool, Duration) {
        let start = Instant::now();
        let ok = seq.run(text, port).is_ok();
        (ok, start.elapsed())
    }

    #[test]
    fn test_timing_success_pauses_every_step_then_settles() {
        let mut seq = timed_sequencer(DummyConfig::default(), STEP);
        let mut port = DummyPort::default();

        let (ok, elapsed) = timed_run(&mut seq, &mut port, "5,rts,-5");
        assert!(ok);
        assert!(elapsed >= STEP * 3 + SETTLE, "elapsed {:?}", elapsed);
    }

    #[test]
    fn test_timing_gpio_failure_pauses_failing_step_then_settles() {
        let config = DummyConfig {
            fail_request: Some(6),
            ..Default::default()
        };
        let mut seq = timed_sequencer(config, STEP);
        let mut port = DummyPort::default();

        let (ok, elapsed) = timed_run(&mut seq, &mut port, "5,6,7,8,9");
        assert!(!ok);
        assert!(elapsed >= STEP * 2 + SETTLE, "elapsed {:?}", elapsed);
        assert!(elapsed < STEP * 5 + SETTLE, "elapsed {:?}", elapsed);
        assert_eq!(seq.lines().releases_for(5), 1);
    }

    #[test]
    fn test_timing_transport_failure_pauses_failing_step_then_settles() {
        let config = DummyConfig {
            fail_logical: Some(LogicalPin::Dtr),
            ..Default::default()
        };
        let mut seq = timed_sequencer(config.clone(), STEP);
        let mut port = DummyPort::new(config);

        let (ok, elapsed) = timed_run(&mut seq, &mut port, "rts,dtr,brk,-rts");
        assert!(!ok);
        assert!(elapsed >= STEP * 2 + SETTLE, "elapsed {:?}", elapsed);
        assert!(elapsed < STEP * 4 + SETTLE, "elapsed {:?}", elapsed);
    }

    #[test]
    fn test_timing_parse_error_settles_without_step_pause() {
        let step = Duration::from_millis(400);
        let mut seq = timed_sequencer(DummyConfig::default(), step);
        let mut port = DummyPort::default();

        let (ok, elapsed) = timed_run(&mut seq, &mut port, "5,6x");
        assert!(!ok);
        assert!(elapsed >= SETTLE, "elapsed {:?}", elapsed);
        assert!(elapsed < step, "elapsed {:?}", elapsed);
        assert!(seq.lines().events().is_empty());
        assert!(port.events().is_empty());
    }

    #[test]
    fn test_timing_malformed_entry_settles() {
        let sequencer = timed_sequencer(DummyConfig::default(), STEP);
        let spec = BootloaderSpec::from("rts,,:rts");
        let mut ctrl = BootloaderController::new(Some(spec), sequencer);
        let mut port = DummyPort::default();

        let start = Instant::now();
        assert!(!ctrl.enter(&mut port));
        assert!(start.elapsed() >= SETTLE);
        assert!(port.events().is_empty());
    }
}

