//! bootgpio - Bootloader entry/exit via GPIO and serial control lines
//!
//! Many microcontrollers pick their boot mode from a pin sampled at reset.
//! bootgpio drives those pins (host GPIO lines, or the RTS/DTR/BREAK lines
//! of the serial port the bootloader talks on) through a short sequence to
//! put the target into its bootloader, and through a second sequence, or a
//! plain reset, to bring it back out.
//!
//! # Sequences
//!
//! A bootloader spec is `entry[:exit]`. Each half is a comma separated list
//! of steps; a step is a GPIO number or `rts`, `dtr`, `brk`, with a leading
//! `-` to deassert. Without `:` the device is reset on exit instead.

mod cli;
mod commands;
mod programmers;

use bootgpio_core::{BootloaderSpec, Timing};
use clap::Parser;
use cli::{Cli, Commands, SequenceArgs};
use commands::run::Action;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let verdict = match cli.command {
        Commands::Parse { spec } => {
            commands::parse::cmd_parse(&spec)?;
            true
        }
        Commands::Enter {
            programmer,
            spec,
            sequence,
        } => programmers::with_programmer(
            &programmer,
            Some(BootloaderSpec::new(spec)),
            timing(&sequence),
            Action::Enter,
        )?,
        Commands::Exit {
            programmer,
            spec,
            sequence,
        } => programmers::with_programmer(
            &programmer,
            spec.map(BootloaderSpec::new),
            timing(&sequence),
            Action::Exit,
        )?,
        Commands::Cycle {
            programmer,
            spec,
            hold_ms,
            sequence,
        } => programmers::with_programmer(
            &programmer,
            Some(BootloaderSpec::new(spec)),
            timing(&sequence),
            Action::Cycle {
                hold: Duration::from_millis(hold_ms),
            },
        )?,
        Commands::ListProgrammers => {
            commands::list_programmers();
            true
        }
    };

    if !verdict {
        std::process::exit(1);
    }

    Ok(())
}

fn timing(args: &SequenceArgs) -> Timing {
    Timing {
        step_delay: Duration::from_millis(args.step_delay_ms),
        settle_delay: Duration::from_millis(args.settle_delay_ms),
    }
}
