//! Writes bootgpio man pages: `bootgpio.1` plus one `bootgpio-<command>.1`
//! per subcommand, into the directory given as the only argument (`man` by
//! default).

use clap::{Command, CommandFactory};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[path = "../cli.rs"]
#[allow(dead_code)]
mod cli;

fn main() -> io::Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));
    fs::create_dir_all(&out_dir)?;

    let cmd = cli::Cli::command();
    write_page(&out_dir, "bootgpio", cmd.clone())?;
    for sub in cmd.get_subcommands() {
        let title = format!("bootgpio-{}", sub.get_name());
        write_page(&out_dir, &title, sub.clone())?;
    }

    Ok(())
}

fn write_page(dir: &Path, title: &str, cmd: Command) -> io::Result<()> {
    let mut page = Vec::new();
    clap_mangen::Man::new(cmd).title(title).render(&mut page)?;

    let path = dir.join(format!("{}.1", title));
    fs::write(&path, page)?;
    println!("{}", path.display());
    Ok(())
}
