//! Colored terminal output on stderr.

use console::{Style, Term};

/// Operator-facing messages. Logging goes through `tracing` instead.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.write(msg, None);
    }

    /// Completed remote writes.
    pub(crate) fn success(&self, msg: &str) {
        self.write(msg, Some(&self.green));
    }

    /// Dry-run banner and skipped steps.
    pub(crate) fn notice(&self, msg: &str) {
        self.write(msg, Some(&self.yellow));
    }

    pub(crate) fn error(&self, msg: &str) {
        self.write(msg, Some(&self.red));
    }

    fn write(&self, msg: &str, style: Option<&Style>) {
        let _ = self.term.write_line(&line(msg, style));
    }
}

fn line(msg: &str, style: Option<&Style>) -> String {
    style.map_or_else(|| msg.to_owned(), |s| s.apply_to(msg).to_string())
}
