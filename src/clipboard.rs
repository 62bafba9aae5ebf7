//! Clipboard access
//!
//! The sequence controller only ever writes; reading is used by the load
//! dialog to paste JSON.

use anyhow::{Context, Result};
use tracing::debug;

/// Something text can be copied into
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard backed by arboard.
///
/// The handle is created lazily and kept alive: on X11 the copied text is
/// only served while its owner exists.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self { inner: None }
    }

    fn ensure(&mut self) -> Result<&mut arboard::Clipboard> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().context("Failed to open system clipboard")?,
        };
        Ok(self.inner.insert(clipboard))
    }

    pub fn get_text(&mut self) -> Result<String> {
        self.ensure()?
            .get_text()
            .context("Failed to read text from clipboard")
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        debug!(len = text.len(), "Writing to system clipboard");
        self.ensure()?
            .set_text(text.to_string())
            .context("Failed to write text to clipboard")
    }
}

/// In-memory clipboard that remembers every write
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    pub writes: Vec<String>,
}

#[cfg(test)]
impl RecordingClipboard {
    pub fn last(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }
}

#[cfg(test)]
impl ClipboardSink for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.writes.push(text.to_string());
        Ok(())
    }
}

/// Clipboard whose writes always fail
#[cfg(test)]
pub struct BrokenClipboard;

#[cfg(test)]
impl ClipboardSink for BrokenClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        anyhow::bail!("clipboard unavailable")
    }
}
