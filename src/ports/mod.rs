pub mod clipboard;
pub mod git;
pub mod notifier;

pub use clipboard::Clipboard;
pub use git::RepositoryLookup;
pub use notifier::Notifier;
