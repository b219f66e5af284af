pub mod error;
pub mod permalink;
pub mod remote_url;
pub mod types;

pub use error::PermalinkError;
pub use permalink::{resolve_permalink, Permalink};
pub use types::{
    Head, LineRange, Remote, RepositorySnapshot, RepositoryState, Selection, WorkingTreeChange,
};
