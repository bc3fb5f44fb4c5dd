//! `parse` command: show what a bootloader spec would do

use bootgpio_core::{parse, BootloaderSpec, ExitAction, PinRef, Sequence};

/// Parse `spec` and print both halves in canonical form
///
/// No hardware is touched. Fails if either half does not parse.
pub fn cmd_parse(spec: &str) -> Result<(), Box<dyn std::error::Error>> {
    let spec = BootloaderSpec::new(spec);
    print!("{}", describe(&spec)?);
    Ok(())
}

fn describe(spec: &BootloaderSpec) -> Result<String, Box<dyn std::error::Error>> {
    let mut out = String::new();

    let entry = parse(spec.entry())
        .map_err(|e| format!("Invalid entry sequence '{}': {}", spec.entry(), e))?;
    out.push_str(&format!("Entry: {}\n", summary(&entry)));
    push_steps(&mut out, &entry);

    match spec.exit() {
        ExitAction::Reset => out.push_str("Exit:  reset device\n"),
        ExitAction::Nothing => out.push_str("Exit:  nothing\n"),
        ExitAction::Sequence(text) => {
            let exit = parse(text)
                .map_err(|e| format!("Invalid exit sequence '{}': {}", text, e))?;
            out.push_str(&format!("Exit:  {}\n", summary(&exit)));
            push_steps(&mut out, &exit);
        }
    }

    Ok(out)
}

fn summary(sequence: &Sequence) -> String {
    match sequence.len() {
        0 => "(empty)".to_string(),
        1 => format!("{} (1 step)", sequence),
        n => format!("{} ({} steps)", sequence, n),
    }
}

fn push_steps(out: &mut String, sequence: &Sequence) {
    for (i, step) in sequence.iter().enumerate() {
        let level = if step.level.is_asserted() {
            "asserted"
        } else {
            "deasserted"
        };
        let pin = match step.pin {
            PinRef::Gpio(offset) => format!("GPIO {}", offset),
            PinRef::Logical(line) => line.to_string(),
        };
        out.push_str(&format!("  {:2}. {:<8} {}\n", i + 1, pin, level));
    }
}
