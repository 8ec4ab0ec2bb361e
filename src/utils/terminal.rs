//! Terminal title handling

use std::io::{IsTerminal, Write};

/// Sets the terminal title to the specified text
///
/// Does nothing when stdout is not a terminal so redirected output stays clean.
pub fn set_terminal_title(title: &str) {
    if !std::io::stdout().is_terminal() {
        return;
    }
    print!("{}", title_sequence(title));
}

/// Sets the terminal title and flushes stdout
pub fn set_terminal_title_and_flush(title: &str) {
    set_terminal_title(title);
    // a title that fails to draw is not worth aborting over
    let _ = std::io::stdout().flush();
}

fn title_sequence(title: &str) -> String {
    format!("\x1b]0;{}\x07", title)
}
