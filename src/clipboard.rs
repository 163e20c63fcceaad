/// Best-effort source of clipboard text.
///
/// Clipboard access is permission-gated and may be missing entirely (headless
/// sessions, SSH). Implementations return `None` on any failure.
pub trait ClipboardProvider {
    fn read_text(&mut self) -> Option<String>;
}

/// Provider for environments without a clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl ClipboardProvider for NoClipboard {
    fn read_text(&mut self) -> Option<String> {
        None
    }
}

/// Fixed clipboard contents; handy for tests and piped input.
#[derive(Debug, Default, Clone)]
pub struct StaticClipboard {
    text: Option<String>,
}

impl StaticClipboard {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}

impl ClipboardProvider for StaticClipboard {
    fn read_text(&mut self) -> Option<String> {
        self.text.clone()
    }
}

#[cfg(feature = "clipboard")]
mod system {
    use super::ClipboardProvider;
    use tracing::debug;

    /// The OS clipboard, opened lazily on first read.
    #[derive(Default)]
    pub struct SystemClipboard {
        inner: Option<arboard::Clipboard>,
    }

    impl SystemClipboard {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl ClipboardProvider for SystemClipboard {
        fn read_text(&mut self) -> Option<String> {
            if self.inner.is_none() {
                match arboard::Clipboard::new() {
                    Ok(cb) => self.inner = Some(cb),
                    Err(e) => {
                        debug!(error = %e, "Clipboard unavailable");
                        return None;
                    }
                }
            }

            let cb = self.inner.as_mut()?;
            match cb.get_text() {
                Ok(text) => Some(text),
                Err(e) => {
                    debug!(error = %e, "Failed to read clipboard contents");
                    None
                }
            }
        }
    }
}

#[cfg(feature = "clipboard")]
pub use system::SystemClipboard;
