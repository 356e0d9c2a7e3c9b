//!
//! Clipboard for copy/cut/paste of the masked value.
//!
//! The engine doesn't talk to any system clipboard. Connect one by
//! implementing [Clipboard]. The default is a [LocalClipboard], which
//! is shared between its clones.
//!

use dyn_clone::{clone_box, DynClone};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardError {
    /// The clipboard can't be reached.
    Unavailable,
    /// The clipboard holds something that is not text.
    NoText,
}

impl Display for ClipboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for ClipboardError {}

/// Text clipboard.
pub trait Clipboard: DynClone + Debug {
    /// Current text.
    fn get_string(&self) -> Result<String, ClipboardError>;

    /// Replace the text.
    fn set_string(&self, s: &str) -> Result<(), ClipboardError>;
}

/// Clipboard within the application.
///
/// All clones see the same text, so one LocalClipboard can be
/// handed to several engines.
#[derive(Debug, Default, Clone)]
pub struct LocalClipboard {
    shared: Arc<Mutex<String>>,
}

impl LocalClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for LocalClipboard {
    fn get_string(&self) -> Result<String, ClipboardError> {
        let text = self.shared.lock().map_err(|_| ClipboardError::Unavailable)?;
        Ok(text.clone())
    }

    fn set_string(&self, s: &str) -> Result<(), ClipboardError> {
        let mut text = self.shared.lock().map_err(|_| ClipboardError::Unavailable)?;
        text.clear();
        text.push_str(s);
        Ok(())
    }
}

impl Clone for Box<dyn Clipboard> {
    fn clone(&self) -> Self {
        clone_box(self.as_ref())
    }
}
