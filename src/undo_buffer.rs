//! Undo functionality.
//!
//! The history is a stack of snapshots. Each snapshot holds the state
//! *before* an edit. Consecutive edits of the same kind at a continuing
//! cursor share one snapshot. That policy lives in the
//! [MaskEngine](crate::MaskEngine). The buffer only stores and replays.

use crate::_private::NonExhaustive;
use crate::upos_type;
use dyn_clone::DynClone;
use std::fmt::Debug;
use std::ops::Range;

/// Kind of edit that was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Typed char. Paste is a sequence of these.
    Input,
    /// Backspace or removing a selection.
    Backspace,
    /// Value was reset to the empty value.
    Clear,
}

/// One snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    /// Complete slot buffer, one char per slot.
    pub value: String,
    pub selection: Range<upos_type>,
    /// Last edit before this snapshot was taken.
    pub op: Option<EditOp>,
    /// Added by the first undo to be able to redo back
    /// to where the undo started.
    pub start_undo: bool,
    pub non_exhaustive: NonExhaustive,
}

impl UndoEntry {
    pub fn new(value: String, selection: Range<upos_type>, op: Option<EditOp>) -> Self {
        Self {
            value,
            selection,
            op,
            start_undo: false,
            non_exhaustive: NonExhaustive,
        }
    }
}

/// Undo buffer.
///
/// Keeps up to undo_count snapshots that can be undone/redone.
pub trait UndoBuffer: DynClone + Debug {
    /// How many snapshots are stored?
    fn undo_count(&self) -> u32;

    /// Change the capacity. The oldest snapshots are dropped
    /// if there are more than that, unless an undo is in progress.
    fn set_undo_count(&mut self, n: u32);

    /// Appends a new snapshot.
    ///
    /// Any redo is truncated by this call. Drops the oldest
    /// snapshot if the buffer is full.
    fn append(&mut self, entry: UndoEntry);

    /// Undo is in progress.
    fn is_undoing(&self) -> bool;

    /// Drop all snapshots from the current undo position onward
    /// and end the undo.
    fn truncate_redo(&mut self);

    /// Clear the buffer.
    fn clear(&mut self);

    /// Get the number of possible undo operations.
    fn open_undo(&self) -> usize;

    /// Get the number of possible redo operations.
    fn open_redo(&self) -> usize;

    /// Step back one snapshot.
    ///
    /// `current` is the live state. The first undo stores it, if it
    /// differs from the top of the stack.
    fn undo(&mut self, current: UndoEntry) -> Option<UndoEntry>;

    /// Step forward one snapshot.
    fn redo(&mut self) -> Option<UndoEntry>;

    /// All stored snapshots.
    fn entries(&self) -> &[UndoEntry];
}

/// Standard implementation for undo.
#[derive(Debug, Clone)]
pub struct UndoVec {
    undo_count: u32,
    buf: Vec<UndoEntry>,
    // undo position. None if not undoing.
    idx: Option<usize>,
}

impl Default for UndoVec {
    fn default() -> Self {
        Self {
            undo_count: 99,
            buf: Vec::default(),
            idx: None,
        }
    }
}

impl UndoVec {
    /// New undo.
    pub fn new(undo_count: u32) -> Self {
        Self {
            undo_count,
            ..Default::default()
        }
    }

    fn trim_undo(&mut self) {
        while self.buf.len() > self.undo_count as usize {
            self.buf.remove(0);
        }
    }
}

impl UndoBuffer for UndoVec {
    fn undo_count(&self) -> u32 {
        self.undo_count
    }

    fn set_undo_count(&mut self, n: u32) {
        self.undo_count = n;
        if self.idx.is_none() {
            self.trim_undo();
        }
    }

    fn append(&mut self, entry: UndoEntry) {
        self.truncate_redo();
        self.buf.push(entry);
        self.trim_undo();
    }

    fn is_undoing(&self) -> bool {
        self.idx.is_some()
    }

    fn truncate_redo(&mut self) {
        if let Some(idx) = self.idx.take() {
            self.buf.truncate(idx);
        }
    }

    fn clear(&mut self) {
        self.buf.clear();
        self.idx = None;
    }

    fn open_undo(&self) -> usize {
        match self.idx {
            None => self.buf.len(),
            Some(idx) => idx,
        }
    }

    fn open_redo(&self) -> usize {
        match self.idx {
            None => 0,
            Some(idx) => self.buf.len() - 1 - idx,
        }
    }

    fn undo(&mut self, current: UndoEntry) -> Option<UndoEntry> {
        match self.idx {
            _ if self.buf.is_empty() => None,
            Some(0) => None,
            Some(idx) => {
                self.idx = Some(idx - 1);
                Some(self.buf[idx - 1].clone())
            }
            None => {
                let idx = self.buf.len() - 1;
                let top = self.buf[idx].clone();
                if top.value != current.value || top.selection != current.selection {
                    self.buf.push(UndoEntry {
                        start_undo: true,
                        ..current
                    });
                }
                self.idx = Some(idx);
                Some(top)
            }
        }
    }

    fn redo(&mut self) -> Option<UndoEntry> {
        let idx = self.idx?;
        if idx + 1 >= self.buf.len() {
            return None;
        }
        let idx = idx + 1;
        if idx == self.buf.len() - 1 {
            self.idx = None;
            if self.buf[idx].start_undo {
                return self.buf.pop();
            }
        } else {
            self.idx = Some(idx);
        }
        Some(self.buf[idx].clone())
    }

    fn entries(&self) -> &[UndoEntry] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(v: &str, pos: upos_type) -> UndoEntry {
        UndoEntry::new(v.into(), pos..pos, Some(EditOp::Input))
    }

    #[test]
    fn test_undo_redo() {
        let mut u = UndoVec::new(10);
        u.append(entry("__", 0));
        u.append(entry("1_", 1));
        assert_eq!(u.open_undo(), 2);

        let e = u.undo(entry("12", 2)).expect("undo");
        assert_eq!(e.value, "1_");
        // live state was added
        assert_eq!(u.entries().len(), 3);
        assert_eq!(u.open_redo(), 1);

        let e = u.undo(entry("1_", 1)).expect("undo");
        assert_eq!(e.value, "__");
        assert!(u.undo(entry("__", 0)).is_none());

        assert_eq!(u.redo().expect("redo").value, "1_");
        let e = u.redo().expect("redo");
        assert_eq!(e.value, "12");
        assert!(e.start_undo);
        assert!(!u.is_undoing());
        assert_eq!(u.entries().len(), 2);
        assert!(u.redo().is_none());
    }

    #[test]
    fn test_undo_same_state() {
        let mut u = UndoVec::new(10);
        u.append(entry("__", 0));
        let e = u.undo(entry("__", 0)).expect("undo");
        assert_eq!(e.value, "__");
        assert_eq!(u.entries().len(), 1);
        // nothing to redo into
        assert!(u.redo().is_none());
        assert!(u.is_undoing());
    }

    #[test]
    fn test_truncate_and_count() {
        let mut u = UndoVec::new(3);
        for i in 0..5 {
            u.append(entry("x", i));
        }
        assert_eq!(u.entries().len(), 3);
        assert_eq!(u.entries()[0].selection, 2..2);

        u.undo(entry("y", 9));
        u.undo(entry("y", 9));
        assert!(u.is_undoing());
        u.truncate_redo();
        assert!(!u.is_undoing());
        assert_eq!(u.entries().len(), 1);
        assert_eq!(u.open_redo(), 0);
    }
}
