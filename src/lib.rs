#![doc = include_str!("../readme.md")]
#![allow(clippy::uninlined_format_args)]
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub mod clipboard;
pub mod format_chars;
pub mod mask_engine;
pub mod pattern;
pub mod undo_buffer;

pub use format_chars::{FormatCharacters, FormatClass};
pub use mask_engine::{MaskEngine, MaskOptions, PatternOptions};
pub use pattern::{Pattern, Slot};

/// Slot index type.
#[allow(non_camel_case_types)]
pub type upos_type = u32;

/// Character used to escape a format character in the mask source.
pub const ESCAPE_CHAR: char = '\\';

/// Default character for unfilled editable slots.
pub const DEFAULT_PLACEHOLDER: char = '_';

/// Errors from compiling a mask source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The source ends with an unescaped escape character.
    DanglingEscape(String),
    /// No character of the source resolves to a format character.
    NoEditableSlots(String),
}

impl Display for PatternError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for PatternError {}

/// Errors from configuring a [MaskEngine].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// Invalid mask source.
    Pattern(PatternError),
    /// The placeholder must be exactly one character.
    InvalidPlaceholder(String),
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MaskError::Pattern(e) => Some(e),
            MaskError::InvalidPlaceholder(_) => None,
        }
    }
}

impl From<PatternError> for MaskError {
    fn from(value: PatternError) -> Self {
        MaskError::Pattern(value)
    }
}

mod _private {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
