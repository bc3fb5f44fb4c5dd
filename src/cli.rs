//! CLI argument parsing

use clap::{Parser, Subcommand};

const PROGRAMMER_HELP: &str = "Programmer to use: dummy[:fail_pin=N,...] or \
     serial:dev=<port>[,baud=N][,gpiochip=N|chip=<path>][,reset=rts|dtr][,consumer=NAME]";

const SPEC_HELP: &str = "GPIO sequence 'entry[:exit]', e.g. '-rts,dtr,-dtr:rts'. \
     Steps are GPIO numbers or rts/dtr/brk, prefixed with '-' to deassert";

#[derive(Parser)]
#[command(name = "bootgpio")]
#[command(
    author,
    version,
    about = "Enter and leave microcontroller bootloaders via GPIO and serial control lines",
    long_about = None
)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Sequence execution options shared across commands
#[derive(clap::Args, Debug, Clone)]
pub struct SequenceArgs {
    /// Pause after every step, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub step_delay_ms: u64,

    /// Pause after a sequence finishes, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub settle_delay_ms: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a GPIO sequence and show what it would do
    Parse {
        #[arg(short = 'i', long = "init", help = SPEC_HELP)]
        spec: String,
    },

    /// Run the entry half of a sequence
    Enter {
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,

        #[arg(short = 'i', long = "init", help = SPEC_HELP)]
        spec: String,

        #[command(flatten)]
        sequence: SequenceArgs,
    },

    /// Run the exit half of a sequence, or reset the device
    Exit {
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,

        /// Without this (or without ':' in it) the device is reset
        #[arg(short = 'i', long = "init", help = SPEC_HELP)]
        spec: Option<String>,

        #[command(flatten)]
        sequence: SequenceArgs,
    },

    /// Enter the bootloader, wait, then leave it again
    Cycle {
        #[arg(short, long, help = PROGRAMMER_HELP)]
        programmer: String,

        #[arg(short = 'i', long = "init", help = SPEC_HELP)]
        spec: String,

        /// Time to stay in the bootloader, in milliseconds
        #[arg(long, default_value_t = 0)]
        hold_ms: u64,

        #[command(flatten)]
        sequence: SequenceArgs,
    },

    /// List supported programmers
    ListProgrammers,
}
