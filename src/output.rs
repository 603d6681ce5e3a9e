//! User-facing console lines.
//!
//! Status messages carry a coloured prefix when the stream is a TTY. Results
//! (scan rows, previewed text) go to stdout unprefixed so they can be scripted.

use owo_colors::OwoColorize;
use owo_colors::Style;

use crate::encoding::EncodingType;
use crate::terminator::TermType;

fn stdout_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn stderr_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

fn prefixed(prefix: &str, style: Style, tty: bool, msg: &str) -> String {
    if tty {
        format!("{} {}", prefix.style(style), msg)
    } else {
        format!("{prefix} {msg}")
    }
}

pub fn print_info(msg: &str) {
    println!("{}", prefixed("info:", Style::new().cyan().bold(), stdout_tty(), msg));
}

pub fn print_warn(msg: &str) {
    eprintln!("{}", prefixed("warn:", Style::new().yellow().bold(), stderr_tty(), msg));
}

pub fn print_error(msg: &str) {
    eprintln!("{}", prefixed("error:", Style::new().red().bold(), stderr_tty(), msg));
}

pub fn print_success(msg: &str) {
    println!("{}", prefixed("ok:", Style::new().green().bold(), stdout_tty(), msg));
}

/// Print a plain user-facing line (no prefix).
pub fn print_user(msg: &str) {
    println!("{msg}");
}

/// One scan result: selection marker, encoding id, terminator, relative path.
pub fn format_row(
    selected: bool,
    encoding: Option<EncodingType>,
    term: TermType,
    relative: &str,
) -> String {
    let marker = if selected { "[*]" } else { "[ ]" };
    let enc = encoding.map(|e| e.id()).unwrap_or("unknown");
    format!("{marker} {enc:<13} {:<7} {relative}", term.name())
}

pub fn print_row(selected: bool, encoding: Option<EncodingType>, term: TermType, relative: &str) {
    let line = format_row(selected, encoding, term, relative);
    if stdout_tty() && encoding.is_none() {
        println!("{}", line.dimmed());
    } else if stdout_tty() && selected {
        println!("{}", line.bold());
    } else {
        println!("{line}");
    }
}
