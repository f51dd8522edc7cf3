//! Terminal output for the fgmap CLI.
//!
//! Status lines look like Cargo's: a right-aligned, coloured verb followed
//! by a message. They go to stderr so stdout stays free for listings and
//! shell completions.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width of the verb column.
const VERB_WIDTH: usize = 12;

/// Status printer. Colour is used only when stderr is a terminal.
#[derive(Debug, Clone)]
pub struct Printer {
    color: bool,
    quiet: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
            quiet: false,
        }
    }

    /// A printer that swallows status lines, for library callers and tests.
    pub fn quiet() -> Self {
        Self {
            color: false,
            quiet: true,
        }
    }

    /// e.g. "      Copied 3 images to campaign/images/Tavern"
    pub fn status(&self, verb: &str, message: &str) {
        self.line(GREEN, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.line(CYAN, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.line(YELLOW, verb, message);
    }

    /// Dim text, for secondary details like arrows and paths.
    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.color {
            format!("{style}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn line(&self, color: &str, verb: &str, message: &str) {
        if self.quiet {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = if self.color {
            writeln!(stderr, "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}")
        } else {
            writeln!(stderr, "{verb:>VERB_WIDTH$} {message}")
        };
    }
}

/// `plural(1, "map", "maps")` gives "1 map".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    let word = if n == 1 { singular } else { pluralized };
    format!("{} {}", n, word)
}

/// A path relative to the working directory when it lies below it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));

    match relative {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}
