//! Operator-facing CLI messages. Colours are dropped when `NO_COLOR` is set.

use std::fmt;
use std::sync::OnceLock;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";
const FG_CYAN: &str = "\x1b[36m";

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

fn colors_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var_os("NO_COLOR").is_none())
}

fn styled(color: &str, icon: &str, msg: impl fmt::Display) -> String {
    if colors_enabled() {
        format!("{color}{BOLD}{icon}{RESET} {msg}")
    } else {
        format!("{icon} {msg}")
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_BLUE, ICON_INFO, msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_GREEN, ICON_OK, msg));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_YELLOW, ICON_WARN, msg));
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", styled(FG_RED, ICON_ERR, msg));
}

/// Section header
pub fn header<T: fmt::Display>(msg: T) {
    if colors_enabled() {
        println!("{FG_BLUE}{BOLD}== {msg} =={RESET}\n");
    } else {
        println!("== {msg} ==\n");
    }
}

/// Aligned `label: value` line.
pub fn field<T: fmt::Display>(label: &str, value: T) {
    if colors_enabled() {
        println!("  {FG_CYAN}{label:<14}{RESET} {value}");
    } else {
        println!("  {label:<14} {value}");
    }
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` means no.
pub fn confirm<T: fmt::Display>(question: T) -> std::io::Result<bool> {
    use std::io::Write;

    warning(question);
    print!("Continue? [y/N]: ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;

    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
