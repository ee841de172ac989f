use anyhow::Context;
use arboard::Clipboard;
use domain::ClipboardSink;
use shared::types::Result;

/// System clipboard, opened on first use so headless sessions still start.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().context("System clipboard is not available")?,
        };
        let clipboard = self.inner.insert(clipboard);
        clipboard
            .set_text(text.to_owned())
            .context("Failed to write to the clipboard")?;
        Ok(())
    }
}
