use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use std::io::{self, IsTerminal};
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

mod aia;
mod cli;
mod error;
mod inspect;
mod model;
mod platform;
mod print;
mod prompt;
mod store;
mod title;
mod util;
mod validate;

use crate::cli::Cli;
use crate::print::print_error;
use crate::prompt::read_thumbprint;
use crate::validate::OpensslPlatform;

/// Entry point wiring the prompt, the OpenSSL platform and the report.
fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let thumbprint = {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut stdout = io::stdout();
        match read_thumbprint(&mut input, &mut stdout)? {
            Some(tp) => tp,
            None => return Ok(()),
        }
    };

    let color = if io::stdout().is_terminal() { ColorChoice::Auto } else { ColorChoice::Never };
    let mut out = StandardStream::stdout(color);
    match OpensslPlatform::new(&cli.platform_config()) {
        Ok(platform) => inspect::run(&platform, &thumbprint, &mut out),
        Err(e) => print_error(&mut out, &format!("{:#}", e))?,
    }

    if !cli.no_wait {
        if let Err(e) = wait_for_keypress() {
            tracing::warn!("failed to wait for a key: {}", e);
        }
    }
    Ok(())
}

/// Block until a single key is pressed. Does nothing when stdin is not a terminal.
fn wait_for_keypress() -> Result<()> {
    if !io::stdin().is_terminal() {
        return Ok(());
    }
    terminal::enable_raw_mode()?;
    let pressed = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(()),
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };
    terminal::disable_raw_mode()?;
    pressed?;
    Ok(())
}
