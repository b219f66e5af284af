pub mod arboard_clipboard;
pub mod console_notifier;
pub mod git2_adapter;
pub mod git_cli_adapter;
mod paths;

pub use arboard_clipboard::ArboardClipboard;
pub use console_notifier::ConsoleNotifier;
pub use git2_adapter::Git2Lookup;
pub use git_cli_adapter::GitCliLookup;
