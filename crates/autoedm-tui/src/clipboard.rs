use anyhow::{anyhow, Result};
use arboard::Clipboard;

/// Destination for exported email text.
pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// Lazily opened handle to the system clipboard.
///
/// On X11/Wayland the copied text is served by this process, so the handle
/// is kept for the lifetime of the app rather than dropped after each copy.
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
    /// Copies the given text to the system clipboard.
    fn copy(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().map_err(|e| {
                tracing::error!("Failed to initialize clipboard: {}", e);
                anyhow!("Failed to initialize clipboard: {}", e)
            })?,
        };
        let clipboard = self.inner.insert(clipboard);

        clipboard.set_text(text).map_err(|e| {
            tracing::error!("Failed to set clipboard text: {}", e);
            anyhow!("Failed to set clipboard text: {}", e)
        })?;

        tracing::info!(chars = text.chars().count(), "email content copied to clipboard");
        Ok(())
    }
}
