//! Bootloader entry/exit actions

use bootgpio_core::{BootloaderController, DeviceReset, LineBackend, Transport};
use std::time::Duration;

/// What to do once the programmer is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Run the entry half
    Enter,
    /// Run the exit half, or reset the device
    Exit,
    /// Enter, wait `hold`, then exit
    Cycle { hold: Duration },
}

/// Run `action` through `controller`, returning the overall verdict
///
/// A cycle whose entry fails stops there; the exit half is not attempted.
pub fn run_action<B, P>(
    action: Action,
    controller: &mut BootloaderController<B>,
    port: &mut P,
) -> bool
where
    B: LineBackend,
    P: Transport + DeviceReset,
{
    match action {
        Action::Enter => controller.enter(port),
        Action::Exit => controller.exit(port),
        Action::Cycle { hold } => {
            if !controller.enter(port) {
                return false;
            }
            if !hold.is_zero() {
                log::info!("Holding bootloader for {} ms", hold.as_millis());
                std::thread::sleep(hold);
            }
            controller.exit(port)
        }
    }
}
