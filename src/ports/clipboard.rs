//! Clipboard port (trait).

use anyhow::Result;

/// Port for placing text on the system clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}
