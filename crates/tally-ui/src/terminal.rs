//! Terminal detection.

use std::env;

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Whether ANSI color codes should be written to stdout.
///
/// `NO_COLOR`, `CLICOLOR=0` and `TERM=dumb` disable color;
/// `CLICOLOR_FORCE` enables it off a TTY. Otherwise color follows
/// [`is_tty`].
pub fn supports_color() -> bool {
    color_enabled(|key| env::var(key).ok(), is_tty)
}

fn color_enabled(var: impl Fn(&str) -> Option<String>, tty: impl FnOnce() -> bool) -> bool {
    // <https://no-color.org/>: any value counts, including empty.
    if var("NO_COLOR").is_some() {
        return false;
    }
    if var("CLICOLOR").as_deref() == Some("0") || var("TERM").as_deref() == Some("dumb") {
        return false;
    }
    var("CLICOLOR_FORCE").is_some() || tty()
}
