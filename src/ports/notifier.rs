//! Notification port (trait).
//! User-facing messages, kept apart from the link written to stdout.

/// Port for reporting outcomes to the user.
pub trait Notifier {
    fn info(&self, message: &str);

    fn error(&self, message: &str);
}
