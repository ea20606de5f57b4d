//! Native OS dialog automation seam.
//!
//! File-upload and save-image-as dialogs belong to the OS window manager,
//! not the browser; the driver cannot see them. The [`DialogAutomation`]
//! trait keeps that dependency narrow: clipboard text, a paste chord, single
//! keys, Enter. Everything built on it is best effort — no primitive can
//! confirm the dialog actually completed, and callers are expected to treat
//! these workflows as fire-and-forget.

use crate::result::PalparResult;

/// Primitive gestures against the native window manager.
pub trait DialogAutomation {
    /// Put text on the OS clipboard.
    fn set_clipboard(&mut self, text: &str) -> PalparResult<()>;

    /// Issue the paste chord (Ctrl+V or platform equivalent).
    fn paste(&mut self) -> PalparResult<()>;

    /// Type a single key.
    fn type_key(&mut self, key: char) -> PalparResult<()>;

    /// Press Enter.
    fn press_enter(&mut self) -> PalparResult<()>;
}

/// Records the gesture script instead of touching the OS, for tests.
#[derive(Debug, Default)]
pub struct MockDialog {
    gestures: Vec<String>,
}

impl MockDialog {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded gesture script, in order.
    #[must_use]
    pub fn script(&self) -> &[String] {
        &self.gestures
    }

    /// Whether any recorded gesture starts with `prefix`.
    #[must_use]
    pub fn was_issued(&self, prefix: &str) -> bool {
        self.gestures.iter().any(|g| g.starts_with(prefix))
    }
}

impl DialogAutomation for MockDialog {
    fn set_clipboard(&mut self, text: &str) -> PalparResult<()> {
        self.gestures.push(format!("clipboard:{text}"));
        Ok(())
    }

    fn paste(&mut self) -> PalparResult<()> {
        self.gestures.push("paste".to_string());
        Ok(())
    }

    fn type_key(&mut self, key: char) -> PalparResult<()> {
        self.gestures.push(format!("key:{key}"));
        Ok(())
    }

    fn press_enter(&mut self) -> PalparResult<()> {
        self.gestures.push("enter".to_string());
        Ok(())
    }
}
