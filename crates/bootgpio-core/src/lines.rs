//! GPIO line backend trait and per-run handle cache

use crate::error::HardwareError;
use crate::sequence::Level;

/// Access to GPIO lines on one chip
///
/// Implemented by the gpiocdev backend and by the in-memory dummy backend.
/// A backend only has to request, set and release single output lines; it
/// never decides when lines are opened or closed. That is the job of the
/// [`HandleCache`].
pub trait LineBackend {
    /// Handle for one requested line
    type Handle;

    /// Request `pin` as an output, initially driven to `level`
    fn request_line(
        &mut self,
        pin: u32,
        level: Level,
        consumer: &str,
    ) -> Result<Self::Handle, HardwareError>;

    /// Drive an already requested line
    fn set_line(&mut self, handle: &mut Self::Handle, level: Level) -> Result<(), HardwareError>;

    /// Give the line back to the kernel
    fn release_line(&mut self, handle: Self::Handle) -> Result<(), HardwareError>;
}

/// A line opened during the current run
#[derive(Debug)]
struct OpenLine<H> {
    pin: u32,
    handle: H,
    initial: Level,
}

/// Lines opened during one sequence run, keyed by pin
///
/// The first reference to a pin requests the line with the step's level as
/// its initial value; later references only set the value. Everything is
/// released in reverse acquisition order by [`HandleCache::release_all`],
/// and again on drop if the caller bailed out early.
///
/// Open lines live in a `Vec` in acquisition order, which is also the
/// release order walked backwards. Pin lookup is a linear scan over the
/// handful of lines one sequence touches; a pin appears at most once.
pub struct HandleCache<'a, B: LineBackend> {
    backend: &'a mut B,
    consumer: &'a str,
    lines: Vec<OpenLine<B::Handle>>,
}

impl<'a, B: LineBackend> HandleCache<'a, B> {
    /// Create an empty cache on top of `backend`
    pub fn new(backend: &'a mut B, consumer: &'a str) -> Self {
        Self {
            backend,
            consumer,
            lines: Vec::new(),
        }
    }

    /// Request `pin` if it is not open yet, otherwise drive the open line
    pub fn acquire_or_update(&mut self, pin: u32, level: Level) -> Result<(), HardwareError> {
        if let Some(line) = self.lines.iter_mut().find(|line| line.pin == pin) {
            log::debug!(
                "Reusing GPIO line {} (opened {:?}), driving {:?}",
                pin,
                line.initial,
                level
            );
            return self.backend.set_line(&mut line.handle, level);
        }

        log::debug!("New GPIO line {}, initial {:?}", pin, level);
        let handle = self.backend.request_line(pin, level, self.consumer)?;
        self.lines.push(OpenLine {
            pin,
            handle,
            initial: level,
        });
        Ok(())
    }

    /// Release every open line, newest first
    ///
    /// Every line is attempted even if an earlier release fails. Failures
    /// are logged and returned; the cache is empty afterwards either way.
    pub fn release_all(&mut self) -> Vec<HardwareError> {
        let mut errors = Vec::new();

        while let Some(line) = self.lines.pop() {
            log::debug!("Releasing GPIO line {}", line.pin);
            if let Err(e) = self.backend.release_line(line.handle) {
                log::warn!("{}", e);
                errors.push(e);
            }
        }

        errors
    }
}

impl<B: LineBackend> Drop for HandleCache<'_, B> {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts calls and hands out sequential ids as handles
    #[derive(Default)]
    struct CountingLines {
        requested: Vec<(u32, Level)>,
        set: Vec<(u32, Level)>,
        released: Vec<u32>,
        fail_release: Option<u32>,
    }

    impl LineBackend for CountingLines {
        type Handle = u32;

        fn request_line(
            &mut self,
            pin: u32,
            level: Level,
            consumer: &str,
        ) -> Result<u32, HardwareError> {
            assert_eq!(consumer, "test");
            self.requested.push((pin, level));
            Ok(pin)
        }

        fn set_line(&mut self, handle: &mut u32, level: Level) -> Result<(), HardwareError> {
            self.set.push((*handle, level));
            Ok(())
        }

        fn release_line(&mut self, handle: u32) -> Result<(), HardwareError> {
            self.released.push(handle);
            if self.fail_release == Some(handle) {
                return Err(HardwareError::ReleaseFailed {
                    pin: handle,
                    reason: "busy".into(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_reuses_open_line() {
        let mut lines = CountingLines::default();
        {
            let mut cache = HandleCache::new(&mut lines, "test");
            cache.acquire_or_update(3, Level::Asserted).unwrap();
            cache.acquire_or_update(3, Level::Deasserted).unwrap();
            assert!(cache.release_all().is_empty());
        }
        assert_eq!(lines.requested, vec![(3, Level::Asserted)]);
        assert_eq!(lines.set, vec![(3, Level::Deasserted)]);
        assert_eq!(lines.released, vec![3]);
    }

    #[test]
    fn test_release_order_and_idempotence() {
        let mut lines = CountingLines::default();
        {
            let mut cache = HandleCache::new(&mut lines, "test");
            for pin in [1, 2, 3] {
                cache.acquire_or_update(pin, Level::Asserted).unwrap();
            }
            assert!(cache.release_all().is_empty());
            assert!(cache.release_all().is_empty());
        }
        assert_eq!(lines.released, vec![3, 2, 1]);
    }

    #[test]
    fn test_rereferenced_pin_keeps_first_release_slot() {
        let mut lines = CountingLines::default();
        {
            let mut cache = HandleCache::new(&mut lines, "test");
            cache.acquire_or_update(1, Level::Asserted).unwrap();
            cache.acquire_or_update(2, Level::Asserted).unwrap();
            cache.acquire_or_update(1, Level::Deasserted).unwrap();
            cache.acquire_or_update(3, Level::Asserted).unwrap();
        }
        assert_eq!(
            lines.requested,
            vec![(1, Level::Asserted), (2, Level::Asserted), (3, Level::Asserted)]
        );
        assert_eq!(lines.set, vec![(1, Level::Deasserted)]);
        assert_eq!(lines.released, vec![3, 2, 1]);
    }

    #[test]
    fn test_release_continues_after_failure() {
        let mut lines = CountingLines {
            fail_release: Some(2),
            ..Default::default()
        };
        {
            let mut cache = HandleCache::new(&mut lines, "test");
            for pin in [1, 2, 3] {
                cache.acquire_or_update(pin, Level::Deasserted).unwrap();
            }
            let errors = cache.release_all();
            assert_eq!(errors.len(), 1);
        }
        assert_eq!(lines.released, vec![3, 2, 1]);
    }

    #[test]
    fn test_drop_releases() {
        let mut lines = CountingLines::default();
        {
            let mut cache = HandleCache::new(&mut lines, "test");
            cache.acquire_or_update(7, Level::Asserted).unwrap();
        }
        assert_eq!(lines.released, vec![7]);
    }

    #[test]
    fn test_release_empty() {
        let mut lines = CountingLines::default();
        let mut cache = HandleCache::new(&mut lines, "test");
        assert!(cache.release_all().is_empty());
        drop(cache);
        assert!(lines.released.is_empty());
    }
}
