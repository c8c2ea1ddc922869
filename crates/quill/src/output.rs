//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
    bold: Style,
    banner: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
            bold: Style::new().bold(),
            banner: Style::new().black().on_green().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print a list item header: `• name`.
    pub(crate) fn item(&self, name: &str) {
        let _ = self
            .term
            .write_line(&self.bold.apply_to(format!("• {name}")).to_string());
    }

    /// Print a completed step under an item: `  - msg` (green).
    pub(crate) fn step(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.green.apply_to(format!("  - {msg}")).to_string());
    }

    /// Print a failed step under an item: `  - msg` (red).
    pub(crate) fn step_failed(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.red.apply_to(format!("  - {msg}")).to_string());
    }

    /// Print a banner label followed by a message: ` DONE  msg`.
    pub(crate) fn banner(&self, label: &str, msg: &str) {
        let label = self.banner.apply_to(format!(" {label} "));
        let _ = self.term.write_line(&format!("{label} {msg}"));
    }
}
