//! Arboard implementation of the Clipboard port.

use crate::ports::Clipboard;
use anyhow::{anyhow, Result};

/// System clipboard, opened on first write so headless runs only fail when
/// copying is actually requested.
#[derive(Default)]
pub struct ArboardClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ArboardClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for ArboardClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|err| anyhow!("clipboard unavailable: {err}"))?;
            self.inner = Some(clipboard);
        }

        if let Some(clipboard) = self.inner.as_mut() {
            clipboard
                .set_text(text)
                .map_err(|err| anyhow!("clipboard copy failed: {err}"))?;
        }
        Ok(())
    }
}
