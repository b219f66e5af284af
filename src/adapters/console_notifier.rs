//! Console implementation of the Notifier port.
//! Writes to stderr; stdout is reserved for the link itself.

use crate::ports::Notifier;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier {
    pub quiet: bool,
}

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    fn error(&self, message: &str) {
        eprintln!("error: {}", message);
    }
}
