use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::CliResult;

pub mod watch_keys;
pub mod write;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a line of text to a display.
    Write(WriteArgs),
    /// Print keypad bytes from a display until interrupted.
    WatchKeys(WatchKeysArgs),
}

pub fn run(command: Command) -> CliResult<i32> {
    match command {
        Command::Write(args) => write::run(args),
        Command::WatchKeys(args) => watch_keys::run(args),
    }
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Display target (a.b.c.d:port).
    pub target: String,
    /// Text to write (truncated or padded to the display width).
    pub text: String,
    /// Display width in characters.
    #[arg(long, default_value = "20")]
    pub width: u8,
    /// Display height in lines.
    #[arg(long, default_value = "4")]
    pub height: u8,
    /// Line to write on (1-based).
    #[arg(long, default_value = "1")]
    pub line: u8,
    /// Switch the backlight before writing.
    #[arg(long)]
    pub backlight: Option<bool>,
    /// Set the contrast level before writing.
    #[arg(long)]
    pub contrast: Option<u8>,
    /// Set the brightness level before writing.
    #[arg(long)]
    pub brightness: Option<u8>,
    /// Maximum time to wait for the display to come up (e.g. 500ms, 5s, 1m).
    #[arg(long, default_value = "10s", value_parser = parse_duration)]
    pub timeout: Duration,
}

#[derive(Args, Debug)]
pub struct WatchKeysArgs {
    /// Display target (a.b.c.d:port).
    pub target: String,
    /// Display width in characters.
    #[arg(long, default_value = "20")]
    pub width: u8,
    /// Display height in lines.
    #[arg(long, default_value = "4")]
    pub height: u8,
}

/// Value parser for wait bounds: `500ms`, `5s`, `1m`, or a bare number
/// of seconds.
fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let (digits, millis_per_unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, 1)
    } else if let Some(num) = input.strip_suffix('m') {
        (num, 60_000)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, 1_000)
    } else {
        (input, 1_000)
    };

    let value: u64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("expected a duration like 500ms, 5s or 1m, got {input:?}"))?;
    if value == 0 {
        return Err("duration must be greater than zero".into());
    }
    Ok(Duration::from_millis(value * millis_per_unit))
}
