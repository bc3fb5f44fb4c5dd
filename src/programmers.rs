//! Programmer registration and dispatch
//!
//! A programmer pairs a GPIO line backend with a serial transport. This
//! module keeps the registry of programmers compiled in, parses the
//! `name:key=value,...` strings given with `-p`, and opens the hardware.

use crate::commands::run::{run_action, Action};
use bootgpio_core::{BootloaderController, BootloaderSpec, Sequencer, Timing};

/// Information about a programmer
pub struct ProgrammerInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "dummy")]
    programmers.push(ProgrammerInfo {
        name: "dummy",
        aliases: &["dry-run"],
        description: "Records every step without touching hardware \
                      (fail_pin=N,fail_logical=rts|dtr|brk,fail_reset=1)",
    });

    #[cfg(feature = "serial")]
    programmers.push(ProgrammerInfo {
        name: "serial",
        aliases: &["tty"],
        description: "Serial port control lines plus Linux GPIO lines \
                      (dev=<port>[:baud],gpiochip=N|chip=<path>,reset=rts|dtr)",
    });

    programmers
}

/// Generate help text listing all available programmers
pub fn programmer_help() -> String {
    let programmers = available_programmers();

    if programmers.is_empty() {
        return "No programmers available (recompile with programmer features enabled)".to_string();
    }

    let mut help = String::from("Available programmers:\n");
    for p in &programmers {
        help.push_str(&format!("  {:8} - {}\n", p.name, p.description));
    }
    help
}

/// Resolve a programmer name or alias to its canonical name
pub fn find_programmer(name: &str) -> Option<&'static str> {
    available_programmers()
        .into_iter()
        .find(|p| p.name == name || p.aliases.iter().any(|a| *a == name))
        .map(|p| p.name)
}

/// Open the programmer described by `programmer` and run `action` on it
///
/// The programmer string can be just the name (e.g., "dummy") or include
/// parameters (e.g., "serial:dev=/dev/ttyUSB0,gpiochip=1"). Returns the
/// verdict of the action; errors are reserved for problems opening the
/// programmer.
#[allow(unused_variables)]
pub fn with_programmer(
    programmer: &str,
    spec: Option<BootloaderSpec>,
    timing: Timing,
    action: Action,
) -> Result<bool, Box<dyn std::error::Error>> {
    let (name, options) = parse_programmer_string(programmer);

    let canonical_name = match find_programmer(name) {
        Some(n) => n,
        None => return Err(unknown_programmer_error(name)),
    };

    match canonical_name {
        #[cfg(feature = "dummy")]
        "dummy" => {
            use bootgpio_dummy::{DummyLines, DummyPort};

            warn_unknown_options(
                canonical_name,
                &options,
                &["fail_pin", "fail_release", "fail_logical", "fail_reset", "consumer"],
            );
            let config = parse_dummy_options(&options)
                .map_err(|e| format!("Invalid dummy parameters: {}", e))?;

            let mut sequencer = Sequencer::new(DummyLines::new(config.clone())).with_timing(timing);
            if let Some(consumer) = find_option(&options, "consumer") {
                sequencer = sequencer.with_consumer(consumer);
            }
            let mut port = DummyPort::new(config);
            let mut controller = BootloaderController::new(spec, sequencer);

            let verdict = run_action(action, &mut controller, &mut port);

            for event in controller.sequencer().lines().events() {
                println!("gpio:   {:?}", event);
            }
            for event in port.events() {
                println!("serial: {:?}", event);
            }
            Ok(verdict)
        }

        #[cfg(feature = "serial")]
        "serial" => {
            use bootgpio_linux_gpio::LinuxGpioLines;
            use bootgpio_serial::SerialPort;

            warn_unknown_options(
                canonical_name,
                &options,
                &["dev", "baud", "reset", "reset_ms", "chip", "gpiochip", "consumer"],
            );
            let serial_config = bootgpio_serial::parse_options(&options)
                .map_err(|e| format!("Invalid serial parameters: {}", e))?;
            let gpio_config = bootgpio_linux_gpio::parse_options(&options)
                .map_err(|e| format!("Invalid GPIO parameters: {}", e))?;

            log::info!("Opening serial programmer...");

            let mut port = SerialPort::open(&serial_config).map_err(|e| {
                format!(
                    "{}\nMake sure the device exists and you have read/write permissions.\n\
                     You may need to: sudo usermod -aG dialout $USER",
                    e
                )
            })?;

            let mut sequencer =
                Sequencer::new(LinuxGpioLines::new(&gpio_config)).with_timing(timing);
            if let Some(consumer) = find_option(&options, "consumer") {
                sequencer = sequencer.with_consumer(consumer);
            }
            let mut controller = BootloaderController::new(spec, sequencer);

            Ok(run_action(action, &mut controller, &mut port))
        }

        _ => Err(unknown_programmer_error(name)),
    }
}

/// Parse a programmer string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_programmer_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

#[allow(dead_code)]
fn find_option<'a>(options: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    options
        .iter()
        .rev()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .filter(|v| !v.is_empty())
}

#[allow(dead_code)]
fn warn_unknown_options(programmer: &str, options: &[(&str, &str)], known: &[&str]) {
    for (key, value) in options {
        if !known.contains(key) {
            log::warn!("Ignoring unknown {} option {}={}", programmer, key, value);
        }
    }
}

/// Parse dummy programmer options
///
/// - `fail_pin=N` - requesting GPIO line N fails
/// - `fail_release=N` - releasing GPIO line N fails
/// - `fail_logical=rts|dtr|brk` - driving that control line fails
/// - `fail_reset=1` - device reset fails
#[cfg(feature = "dummy")]
fn parse_dummy_options(options: &[(&str, &str)]) -> Result<bootgpio_dummy::DummyConfig, String> {
    use bootgpio_core::LogicalPin;

    let mut config = bootgpio_dummy::DummyConfig::default();

    for (key, value) in options {
        match *key {
            "fail_pin" => {
                config.fail_request = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid fail_pin value: {}", value))?,
                );
            }
            "fail_release" => {
                config.fail_release = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid fail_release value: {}", value))?,
                );
            }
            "fail_logical" => {
                config.fail_logical = Some(
                    LogicalPin::from_keyword(value)
                        .ok_or_else(|| format!("Invalid fail_logical value: {}", value))?,
                );
            }
            "fail_reset" => {
                config.fail_reset = match *value {
                    "1" | "yes" | "true" => true,
                    "0" | "no" | "false" => false,
                    _ => return Err(format!("Invalid fail_reset value: {}", value)),
                };
            }
            _ => {}
        }
    }

    Ok(config)
}

fn unknown_programmer_error(name: &str) -> Box<dyn std::error::Error> {
    let mut msg = format!("Unknown programmer: {}\n\n", name);
    msg.push_str(&programmer_help());
    msg.push_str("\nUse 'bootgpio list-programmers' for more details");
    msg.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_programmer_string() {
        let (name, options) = parse_programmer_string("dummy");
        assert_eq!(name, "dummy");
        assert!(options.is_empty());

        let (name, options) =
            parse_programmer_string("serial:dev=/dev/ttyUSB0:115200,gpiochip=1,bogus");
        assert_eq!(name, "serial");
        assert_eq!(
            options,
            vec![("dev", "/dev/ttyUSB0:115200"), ("gpiochip", "1")]
        );
    }

    #[test]
    fn test_find_option_last_wins() {
        let options = [("consumer", "a"), ("consumer", "b"), ("chip", "")];
        assert_eq!(find_option(&options, "consumer"), Some("b"));
        assert_eq!(find_option(&options, "chip"), None);
        assert_eq!(find_option(&options, "dev"), None);
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_find_programmer_alias() {
        assert_eq!(find_programmer("dummy"), Some("dummy"));
        assert_eq!(find_programmer("dry-run"), Some("dummy"));
        assert_eq!(find_programmer("ch341a"), None);
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_parse_dummy_options() {
        use bootgpio_core::LogicalPin;

        let config = parse_dummy_options(&[
            ("fail_pin", "17"),
            ("fail_logical", "brk"),
            ("fail_reset", "1"),
        ])
        .unwrap();
        assert_eq!(config.fail_request, Some(17));
        assert_eq!(config.fail_release, None);
        assert_eq!(config.fail_logical, Some(LogicalPin::Brk));
        assert!(config.fail_reset);

        assert!(parse_dummy_options(&[("fail_pin", "x")]).is_err());
        assert!(parse_dummy_options(&[("fail_logical", "RTS")]).is_err());
        assert!(parse_dummy_options(&[("fail_reset", "maybe")]).is_err());
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_with_programmer_dummy_verdicts() {
        let spec = || Some(BootloaderSpec::new("-rts,5,-5:rts"));

        let ok = with_programmer("dummy", spec(), Timing::immediate(), Action::Enter).unwrap();
        assert!(ok);

        let failed = with_programmer(
            "dummy:fail_pin=5",
            spec(),
            Timing::immediate(),
            Action::Enter,
        )
        .unwrap();
        assert!(!failed);

        let reset_failed = with_programmer(
            "dummy:fail_reset=1",
            None,
            Timing::immediate(),
            Action::Exit,
        )
        .unwrap();
        assert!(!reset_failed);
    }

    #[test]
    fn test_unknown_programmer() {
        let err = with_programmer("ch341a", None, Timing::immediate(), Action::Enter).unwrap_err();
        assert!(err.to_string().contains("Unknown programmer: ch341a"));
    }
}
