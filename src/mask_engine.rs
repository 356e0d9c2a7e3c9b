//!
//! Editing engine for a masked text field.
//!
//! The engine owns the compiled [Pattern], the slot buffer, the
//! selection and the undo history. The host feeds it chars, pastes and
//! selection changes, and reads back [MaskEngine::value] and
//! [MaskEngine::selection] to display.
//!
//! ```rust
//! use rat_mask::MaskEngine;
//!
//! let mut m = MaskEngine::with_pattern("(111) 111-1111")?;
//! for c in "5551234567".chars() {
//!     m.input(c);
//! }
//! assert_eq!(m.value(), "(555) 123-4567");
//! assert_eq!(m.raw_value(), "5551234567");
//! # Ok::<(), rat_mask::MaskError>(())
//! ```
//!
//! All edit operations return `false` if they couldn't do anything,
//! and the state is left as it was.
//!

use crate::_private::NonExhaustive;
use crate::clipboard::{Clipboard, LocalClipboard};
use crate::format_chars::{FormatCharacters, FormatClass};
use crate::pattern::Pattern;
use crate::undo_buffer::{EditOp, UndoBuffer, UndoEntry, UndoVec};
use crate::{upos_type, MaskError, PatternError, DEFAULT_PLACEHOLDER};
use dyn_clone::clone_box;
use log::{debug, trace};
use std::cmp::{max, min};
use std::ops::Range;

/// Configuration for a [MaskEngine].
#[derive(Debug, Clone)]
pub struct MaskOptions {
    /// Mask source.
    pub pattern: String,
    /// Overrides for the default format characters.
    /// `None` removes a format character.
    pub format_characters: Vec<(char, Option<FormatClass>)>,
    /// Hide unfilled trailing slots.
    pub revealing_mask: bool,
    /// Must be exactly one char.
    pub placeholder: String,
    /// Initial selection.
    pub selection: Range<upos_type>,
    /// Initial value.
    pub value: String,
    /// Capacity of the undo buffer.
    pub undo_count: u32,

    pub non_exhaustive: NonExhaustive,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            pattern: Default::default(),
            format_characters: Default::default(),
            revealing_mask: false,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            selection: 0..0,
            value: Default::default(),
            undo_count: 99,
            non_exhaustive: NonExhaustive,
        }
    }
}

impl From<&str> for MaskOptions {
    fn from(value: &str) -> Self {
        MaskOptions::new(value)
    }
}

impl From<String> for MaskOptions {
    fn from(value: String) -> Self {
        Self {
            pattern: value,
            ..Default::default()
        }
    }
}

impl MaskOptions {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    /// Add or replace a format character.
    pub fn format_char(mut self, c: char, class: FormatClass) -> Self {
        self.format_characters.push((c, Some(class)));
        self
    }

    /// Remove one of the default format characters.
    pub fn remove_format_char(mut self, c: char) -> Self {
        self.format_characters.push((c, None));
        self
    }

    pub fn revealing_mask(mut self, revealing: bool) -> Self {
        self.revealing_mask = revealing;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn selection(mut self, selection: Range<upos_type>) -> Self {
        self.selection = selection;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn undo_count(mut self, undo_count: u32) -> Self {
        self.undo_count = undo_count;
        self
    }
}

/// Settings for [MaskEngine::set_pattern].
#[derive(Debug, Clone, Default)]
pub struct PatternOptions {
    /// Initial value.
    pub value: String,
    /// Initial selection.
    pub selection: Range<upos_type>,
    /// Hide unfilled trailing slots.
    pub revealing_mask: bool,

    pub non_exhaustive: NonExhaustive,
}

/// Everything an edit may touch.
struct EditState {
    value: Vec<char>,
    selection: Range<upos_type>,
    undo: Option<Box<dyn UndoBuffer>>,
    last_op: Option<EditOp>,
    last_selection: Range<upos_type>,
}

/// Input mask engine.
#[derive(Debug)]
pub struct MaskEngine {
    format: FormatCharacters,
    pattern: Pattern,
    // one char per slot
    value: Vec<char>,
    selection: Range<upos_type>,
    empty_value: String,

    undo: Option<Box<dyn UndoBuffer>>,
    clip: Option<Box<dyn Clipboard>>,

    // last edit and the selection after it.
    // used for merging edits in the history.
    last_op: Option<EditOp>,
    last_selection: Range<upos_type>,
}

impl Clone for MaskEngine {
    fn clone(&self) -> Self {
        Self {
            format: self.format.clone(),
            pattern: self.pattern.clone(),
            value: self.value.clone(),
            selection: self.selection.clone(),
            empty_value: self.empty_value.clone(),
            undo: self.undo.as_ref().map(|v| clone_box(v.as_ref())),
            clip: self.clip.clone(),
            last_op: self.last_op,
            last_selection: self.last_selection.clone(),
        }
    }
}

impl MaskEngine {
    /// New engine.
    pub fn new(options: impl Into<MaskOptions>) -> Result<Self, MaskError> {
        let options = options.into();

        let mut chars = options.placeholder.chars();
        let placeholder = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                debug!("invalid placeholder {:?}", options.placeholder);
                return Err(MaskError::InvalidPlaceholder(options.placeholder));
            }
        };

        let format = FormatCharacters::with_overrides(options.format_characters);
        let pattern = Pattern::compile(
            &options.pattern,
            &format,
            placeholder,
            options.revealing_mask,
        )?;

        let mut engine = Self {
            format,
            pattern,
            value: Vec::new(),
            selection: 0..0,
            empty_value: String::new(),
            undo: Some(Box::new(UndoVec::new(options.undo_count))),
            clip: Some(Box::new(LocalClipboard::new())),
            last_op: None,
            last_selection: 0..0,
        };
        engine.reset(&options.value, options.selection);

        Ok(engine)
    }

    /// New engine for the mask with default settings.
    pub fn with_pattern(pattern: &str) -> Result<Self, MaskError> {
        Self::new(pattern)
    }

    /// Replace the pattern.
    ///
    /// Value and selection are taken from the options, the history
    /// is cleared. Format characters and placeholder stay the same.
    /// If the source is invalid, nothing changes.
    pub fn set_pattern(&mut self, source: &str, options: PatternOptions) -> Result<(), PatternError> {
        self.pattern = Pattern::compile(
            source,
            &self.format,
            self.pattern.placeholder(),
            options.revealing_mask,
        )?;
        self.reset(&options.value, options.selection);
        Ok(())
    }

    /// Replace the pattern. Keeps the revealing flag.
    pub fn set_mask(&mut self, source: &str) -> Result<(), PatternError> {
        let revealing = self.pattern.is_revealing();
        self.set_pattern(
            source,
            PatternOptions {
                revealing_mask: revealing,
                ..Default::default()
            },
        )
    }

    fn reset(&mut self, value: &str, selection: Range<upos_type>) {
        self.set_value(value);
        self.empty_value = self.pattern.empty_value();
        self.selection = self.clamp(selection);
        if let Some(undo) = self.undo.as_mut() {
            undo.clear();
        }
        self.last_op = None;
        self.last_selection = self.selection.clone();
    }

    fn clamp(&self, range: Range<upos_type>) -> Range<upos_type> {
        let len = self.pattern.len();
        let start = min(range.start, len);
        let end = min(range.end, len);
        min(start, end)..max(start, end)
    }
}

impl MaskEngine {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Mask source.
    pub fn mask(&self) -> &str {
        self.pattern.source()
    }

    pub fn format_characters(&self) -> &FormatCharacters {
        &self.format
    }

    /// Number of slots.
    pub fn len(&self) -> upos_type {
        self.pattern.len()
    }

    /// Value equals the empty value.
    pub fn is_empty(&self) -> bool {
        self.value() == self.empty_value
    }

    pub fn placeholder(&self) -> char {
        self.pattern.placeholder()
    }

    pub fn is_revealing(&self) -> bool {
        self.pattern.is_revealing()
    }

    /// Rendered value without any input.
    pub fn empty_value(&self) -> &str {
        &self.empty_value
    }

    /// Rendered value.
    pub fn value(&self) -> String {
        self.pattern.render(&self.value)
    }

    /// Chars of the editable slots.
    pub fn raw_value(&self) -> String {
        self.pattern.raw_value(&self.value)
    }

    /// Set the value. It's laid out over the pattern, static chars
    /// may be included or left out.
    ///
    /// Doesn't change the selection or the history.
    pub fn set_value(&mut self, raw: &str) {
        let raw = raw.chars().collect::<Vec<_>>();
        self.value = self.pattern.format_value(&raw);
    }

    /// Complete slot buffer regardless of revealing.
    fn buffer_string(&self) -> String {
        self.value.iter().collect()
    }

    pub fn selection(&self) -> Range<upos_type> {
        self.selection.clone()
    }

    pub fn has_selection(&self) -> bool {
        self.selection.start != self.selection.end
    }

    /// Cursor position. Start of the selection.
    pub fn cursor(&self) -> upos_type {
        self.selection.start
    }

    /// Visible text of the selection.
    pub fn selected_text(&self) -> String {
        let visible = self.pattern.visible_len(&self.value);
        let start = min(self.selection.start as usize, visible);
        let end = min(self.selection.end as usize, visible);
        self.value[start..end].iter().collect()
    }

    /// Set the selection.
    ///
    /// A range is stored as is. A cursor is moved back
    /// behind the last filled slot before it, or to the first
    /// editable slot.
    ///
    /// Returns true if the cursor has been moved.
    pub fn set_selection(&mut self, range: Range<upos_type>) -> bool {
        let requested = range.start;
        let range = self.clamp(range);
        if range.start != range.end {
            self.selection = range;
            return false;
        }

        let first = self.pattern.first_editable();
        let pos = if range.start < first {
            first
        } else {
            let mut idx = range.start;
            loop {
                if idx == first {
                    break idx;
                }
                let prev = idx - 1;
                if self.pattern.is_editable(prev)
                    && self.value[prev as usize] != self.pattern.placeholder()
                {
                    break idx;
                }
                idx -= 1;
            }
        };
        self.selection = pos..pos;

        pos != requested
    }

    /// Cursor to the start, which snaps to the first editable slot.
    pub fn set_default_cursor(&mut self) {
        self.set_selection(0..0);
    }

    /// Select everything.
    pub fn select_all(&mut self) -> bool {
        let old = self.selection.clone();
        self.selection = 0..self.pattern.len();
        old != self.selection
    }

    /// Move the cursor left. A selection collapses to its start.
    pub fn move_left(&mut self) -> bool {
        let old = self.selection.clone();
        let pos = if self.has_selection() {
            old.start
        } else {
            old.start.saturating_sub(1)
        };
        self.selection = pos..pos;
        old != self.selection
    }

    /// Move the cursor right. A selection collapses to its end.
    pub fn move_right(&mut self) -> bool {
        let old = self.selection.clone();
        let pos = if self.has_selection() {
            old.end
        } else {
            min(old.end + 1, self.pattern.len())
        };
        self.selection = pos..pos;
        old != self.selection
    }

    pub fn move_to_start(&mut self) -> bool {
        let old = self.selection.clone();
        self.selection = 0..0;
        old != self.selection
    }

    pub fn move_to_end(&mut self) -> bool {
        let old = self.selection.clone();
        let len = self.pattern.len();
        self.selection = len..len;
        old != self.selection
    }
}

impl MaskEngine {
    /// Type one char at the cursor, or replace the selection with it.
    ///
    /// Returns false if the char is not valid at that position
    /// or the cursor is at the end.
    pub fn input(&mut self, c: char) -> bool {
        let len = self.pattern.len();
        if self.selection.start == self.selection.end && self.selection.start == len {
            return false;
        }

        let value_before = self.buffer_string();
        let selection_before = self.selection.clone();

        let idx = max(self.selection.start, self.pattern.first_editable());
        if self.pattern.is_editable(idx) {
            if !self.pattern.is_valid_at(c, idx) {
                trace!("rejected {:?} at {}", c, idx);
                return false;
            }
            self.value[idx as usize] = self.pattern.transform(c, idx);
        }

        // blank the rest of the selection
        for i in (idx + 1..self.selection.end).rev() {
            if self.pattern.is_editable(i) {
                self.value[i as usize] = self.pattern.placeholder();
            }
        }

        let mut pos = idx + 1;
        while pos < len && !self.pattern.is_editable(pos) {
            pos += 1;
        }
        self.selection = pos..pos;

        self.record(EditOp::Input, value_before, selection_before);
        true
    }

    /// Delete the char before the cursor or the selection.
    pub fn backspace(&mut self) -> bool {
        if self.selection.start == 0 && self.selection.end == 0 {
            return false;
        }

        let value_before = self.buffer_string();
        let selection_before = self.selection.clone();

        if self.selection.start == self.selection.end {
            let prev = self.selection.start - 1;
            if self.pattern.is_editable(prev) {
                self.value[prev as usize] = self.pattern.placeholder();
            }
            self.selection = prev..prev;
        } else {
            for i in (self.selection.start..self.selection.end).rev() {
                if self.pattern.is_editable(i) {
                    self.value[i as usize] = self.pattern.placeholder();
                }
            }
            self.selection.end = self.selection.start;
        }

        self.record(EditOp::Backspace, value_before, selection_before);
        true
    }

    /// Paste some text at the cursor or over the selection.
    ///
    /// The text may contain the static chars of the mask. A rejected char
    /// is skipped if it is a separator next to the cursor. If any other
    /// char is rejected, the paste is rolled back completely.
    pub fn paste(&mut self, text: &str) -> bool {
        let initial = self.snapshot();

        let chars = text.chars().collect::<Vec<_>>();
        let mut skip = 0;

        let first = self.pattern.first_editable();
        if self.selection.start < first {
            // the text can supply the leading static chars, or start
            // with the editable part.
            let prefix = (self.selection.start..first)
                .filter_map(|i| self.pattern.literal_at(i))
                .collect::<Vec<_>>();
            let matched = prefix
                .iter()
                .zip(chars.iter())
                .take_while(|(a, b)| a == b)
                .count();
            if matched == prefix.len() {
                skip = matched;
            } else if matched > 0 {
                debug!("paste {:?} doesn't match the mask prefix", text);
                return false;
            }
            self.selection.start = first;
            self.selection.end = max(self.selection.end, first);
        }

        for c in chars.into_iter().skip(skip) {
            if self.selection.start > self.pattern.last_editable() {
                break;
            }
            if !self.input(c) {
                if self.pattern.is_separator_at(c, self.selection.start) {
                    continue;
                }
                debug!("paste {:?} rejected at {}", text, self.selection.start);
                self.restore(initial);
                return false;
            }
        }

        true
    }

    /// Reset to the empty value. Can be undone.
    pub fn clear(&mut self) -> bool {
        let value_before = self.buffer_string();
        let selection_before = self.selection.clone();

        self.value = self.pattern.format_value(&[]);
        self.set_default_cursor();

        if value_before == self.buffer_string() && selection_before == self.selection {
            return false;
        }
        self.record(EditOp::Clear, value_before, selection_before);
        true
    }

    /// Delete key. Removes the selection, without a
    /// selection everything is cleared.
    pub fn delete(&mut self) -> bool {
        if self.has_selection() {
            self.backspace()
        } else {
            self.clear()
        }
    }

    /// History bookkeeping after an edit.
    fn record(&mut self, op: EditOp, value_before: String, selection_before: Range<upos_type>) {
        if let Some(undo) = self.undo.as_mut() {
            let was_undoing = undo.is_undoing();
            undo.truncate_redo();

            if was_undoing
                || self.last_op != Some(op)
                || selection_before.start != selection_before.end
                || selection_before.start != self.last_selection.start
            {
                undo.append(UndoEntry::new(
                    value_before,
                    selection_before,
                    self.last_op,
                ));
            }
        }
        self.last_op = Some(op);
        self.last_selection = self.selection.clone();
    }

    fn snapshot(&self) -> EditState {
        EditState {
            value: self.value.clone(),
            selection: self.selection.clone(),
            undo: self.undo.as_ref().map(|v| clone_box(v.as_ref())),
            last_op: self.last_op,
            last_selection: self.last_selection.clone(),
        }
    }

    fn restore(&mut self, state: EditState) {
        self.value = state.value;
        self.selection = state.selection;
        self.undo = state.undo;
        self.last_op = state.last_op;
        self.last_selection = state.last_selection;
    }
}

impl MaskEngine {
    /// Set the undo buffer. None disables undo.
    pub fn set_undo_buffer(&mut self, undo: Option<impl UndoBuffer + 'static>) {
        self.undo = match undo {
            None => None,
            Some(v) => Some(Box::new(v)),
        };
    }

    pub fn undo_buffer(&self) -> Option<&dyn UndoBuffer> {
        self.undo.as_deref()
    }

    pub fn set_undo_count(&mut self, n: u32) {
        if let Some(undo) = self.undo.as_mut() {
            undo.set_undo_count(n);
        }
    }

    /// Undo the last edit.
    pub fn undo(&mut self) -> bool {
        let current = UndoEntry::new(self.buffer_string(), self.selection(), self.last_op);
        let Some(undo) = self.undo.as_mut() else {
            return false;
        };
        let Some(entry) = undo.undo(current) else {
            return false;
        };
        self.apply(entry);
        true
    }

    /// Redo the last undo.
    pub fn redo(&mut self) -> bool {
        let Some(undo) = self.undo.as_mut() else {
            return false;
        };
        let Some(entry) = undo.redo() else {
            return false;
        };
        self.apply(entry);
        true
    }

    fn apply(&mut self, entry: UndoEntry) {
        let UndoEntry {
            value,
            selection,
            op,
            ..
        } = entry;
        let value = value.chars().collect::<Vec<_>>();
        if value.len() == self.value.len() {
            self.value = value;
        }
        self.selection = self.clamp(selection);
        self.last_op = op;
    }
}

impl MaskEngine {
    /// Clipboard used. Default is a [LocalClipboard].
    pub fn set_clipboard(&mut self, clip: Option<impl Clipboard + 'static>) {
        self.clip = match clip {
            None => None,
            Some(v) => Some(Box::new(v)),
        };
    }

    pub fn clipboard(&self) -> Option<&dyn Clipboard> {
        self.clip.as_deref()
    }

    /// Copy the selection to the clipboard.
    pub fn copy_to_clip(&mut self) -> bool {
        let Some(clip) = self.clip.as_deref() else {
            return false;
        };
        if !self.has_selection() {
            return false;
        }
        match clip.set_string(&self.selected_text()) {
            Ok(_) => true,
            Err(e) => {
                debug!("clipboard {:?}", e);
                false
            }
        }
    }

    /// Copy the selection to the clipboard and remove it.
    pub fn cut_to_clip(&mut self) -> bool {
        if self.copy_to_clip() {
            self.backspace()
        } else {
            false
        }
    }

    /// Paste from the clipboard.
    pub fn paste_from_clip(&mut self) -> bool {
        let Some(clip) = self.clip.as_deref() else {
            return false;
        };
        match clip.get_string() {
            Ok(text) => self.paste(&text),
            Err(e) => {
                debug!("clipboard {:?}", e);
                false
            }
        }
    }
}
