use anyhow::{Context, Result};
use client_core::ClipboardSink;

/// System clipboard through `arboard`. A fresh handle per copy keeps the
/// sink `Send + Sync` on every platform.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("failed to open clipboard")?;
        clipboard
            .set_text(text.to_string())
            .context("failed to write clipboard text")?;
        Ok(())
    }
}
