//!
//! Compiled input mask.
//!
//! The mask source is scanned char by char:
//!
//! * `\` escapes the following char, which becomes a static slot even
//!   if it is a format character.
//! * Any char found in the [FormatCharacters] becomes an editable slot.
//! * Everything else is a static slot showing that char.
//!
//! ```rust
//! use rat_mask::{FormatCharacters, Pattern};
//!
//! let p = Pattern::compile("(111) 111-1111", &FormatCharacters::default(), '_', false)?;
//! assert_eq!(p.len(), 14);
//! assert_eq!(p.empty_value(), "(___) ___-____");
//! # Ok::<(), rat_mask::PatternError>(())
//! ```
//!

use crate::format_chars::{FormatCharacters, FormatClass};
use crate::{upos_type, PatternError, ESCAPE_CHAR};
use log::debug;
use rustc_hash::FxHashSet;
use std::cmp::min;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

/// One slot of the pattern.
#[allow(variant_size_differences)]
#[derive(Clone, Copy)]
pub enum Slot {
    /// Literal char.
    Static(char),
    /// Editable slot for a format character.
    Editable { symbol: char, class: FormatClass },
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Slot::Static(a), Slot::Static(b)) => a == b,
            (Slot::Editable { symbol: a, .. }, Slot::Editable { symbol: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for Slot {}

impl Debug for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Static(c) => write!(f, "\\{}", c),
            Slot::Editable { symbol, .. } => write!(f, "{}", symbol),
        }
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Static(c) => write!(f, "{}", c),
            Slot::Editable { symbol, .. } => write!(f, "{}", symbol),
        }
    }
}

impl Slot {
    #[inline]
    pub fn is_editable(&self) -> bool {
        matches!(self, Slot::Editable { .. })
    }

    /// Literal of a static slot.
    #[inline]
    pub fn literal(&self) -> Option<char> {
        match self {
            Slot::Static(c) => Some(*c),
            Slot::Editable { .. } => None,
        }
    }
}

/// Compiled pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    slots: Vec<Slot>,
    first_editable: upos_type,
    last_editable: upos_type,
    editable: FxHashSet<upos_type>,
    placeholder: char,
    revealing: bool,
}

impl Pattern {
    /// Compile the mask source.
    pub fn compile(
        source: &str,
        format: &FormatCharacters,
        placeholder: char,
        revealing: bool,
    ) -> Result<Pattern, PatternError> {
        let mut slots = Vec::new();
        let mut editable = FxHashSet::default();
        let mut first_editable = None;
        let mut last_editable = None;

        let mut chars = source.chars();
        while let Some(c) = chars.next() {
            let idx = slots.len() as upos_type;
            if c == ESCAPE_CHAR {
                let Some(escaped) = chars.next() else {
                    return Err(PatternError::DanglingEscape(source.into()));
                };
                slots.push(Slot::Static(escaped));
            } else if let Some(class) = format.get(c) {
                if first_editable.is_none() {
                    first_editable = Some(idx);
                }
                last_editable = Some(idx);
                editable.insert(idx);
                slots.push(Slot::Editable {
                    symbol: c,
                    class: *class,
                });
            } else {
                slots.push(Slot::Static(c));
            }
        }

        let (Some(first_editable), Some(last_editable)) = (first_editable, last_editable) else {
            return Err(PatternError::NoEditableSlots(source.into()));
        };

        debug!(
            "compiled mask {:?}: {} slots, editable {}..={}",
            source,
            slots.len(),
            first_editable,
            last_editable
        );

        Ok(Pattern {
            source: source.into(),
            slots,
            first_editable,
            last_editable,
            editable,
            placeholder,
            revealing,
        })
    }

    /// Mask source as given.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[inline]
    pub fn slot(&self, idx: upos_type) -> Option<&Slot> {
        self.slots.get(idx as usize)
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> upos_type {
        self.slots.len() as upos_type
    }

    /// Never true, a pattern has at least one editable slot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn first_editable(&self) -> upos_type {
        self.first_editable
    }

    #[inline]
    pub fn last_editable(&self) -> upos_type {
        self.last_editable
    }

    #[inline]
    pub fn placeholder(&self) -> char {
        self.placeholder
    }

    #[inline]
    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    #[inline]
    pub fn is_editable(&self, idx: upos_type) -> bool {
        self.editable.contains(&idx)
    }

    /// Literal of the static slot at idx.
    #[inline]
    pub fn literal_at(&self, idx: upos_type) -> Option<char> {
        self.slot(idx).and_then(Slot::literal)
    }

    /// Some static slot shows this char.
    pub fn is_literal(&self, c: char) -> bool {
        self.slots.iter().any(|v| v.literal() == Some(c))
    }

    /// Char equals a literal in the static run right before idx,
    /// or in the first static run at or after idx.
    pub fn is_separator_at(&self, c: char, idx: upos_type) -> bool {
        let idx = min(idx as usize, self.slots.len());
        let behind = self.slots[..idx]
            .iter()
            .rev()
            .map_while(Slot::literal)
            .any(|v| v == c);
        behind
            || self.slots[idx..]
                .iter()
                .skip_while(|v| v.is_editable())
                .map_while(Slot::literal)
                .any(|v| v == c)
    }

    /// Char is acceptable at idx. Static slots accept nothing.
    #[inline]
    pub fn is_valid_at(&self, c: char, idx: upos_type) -> bool {
        match self.slot(idx) {
            Some(Slot::Editable { class, .. }) => class.is_valid(c),
            _ => false,
        }
    }

    /// Transform for the editable slot at idx.
    #[inline]
    pub fn transform(&self, c: char, idx: upos_type) -> char {
        match self.slot(idx) {
            Some(Slot::Editable { class, .. }) => class.apply(c),
            _ => c,
        }
    }

    /// Lay out the raw chars over the pattern.
    ///
    /// Returns one char per slot. Static slots get their literal, and a raw
    /// char equal to that literal is consumed with it. Editable slots take the
    /// next raw char if it is valid, otherwise the placeholder. An invalid raw
    /// char is consumed anyway, so placeholders in a formatted value stay in
    /// place.
    ///
    /// A revealing mask stops filling at the first editable slot where the
    /// raw chars are used up or the next one is not valid.
    pub fn format_value(&self, raw: &[char]) -> Vec<char> {
        let mut buf = Vec::with_capacity(self.slots.len());
        let mut raw_idx = 0;
        let mut filling = true;

        for slot in &self.slots {
            match slot {
                Slot::Static(lit) => {
                    buf.push(*lit);
                    if filling && raw.get(raw_idx) == Some(lit) {
                        raw_idx += 1;
                    }
                }
                Slot::Editable { class, .. } => {
                    let next = if filling {
                        raw.get(raw_idx).copied()
                    } else {
                        None
                    };
                    if self.revealing && !next.is_some_and(|c| class.is_valid(c)) {
                        filling = false;
                    }
                    match next {
                        Some(c) if filling => {
                            raw_idx += 1;
                            if class.is_valid(c) {
                                buf.push(class.apply(c));
                            } else {
                                buf.push(self.placeholder);
                            }
                        }
                        _ => buf.push(self.placeholder),
                    }
                }
            }
        }

        buf
    }

    /// Number of slots that are visible.
    ///
    /// For a revealing mask this ends before the first unfilled editable
    /// slot after the last filled one. Otherwise, it's the full length.
    pub fn visible_len(&self, buf: &[char]) -> usize {
        if !self.revealing {
            return buf.len();
        }
        let mut end = buf
            .iter()
            .enumerate()
            .rposition(|(idx, c)| self.is_editable(idx as upos_type) && *c != self.placeholder)
            .map(|v| v + 1)
            .unwrap_or(0);
        while end < buf.len() && !self.is_editable(end as upos_type) {
            end += 1;
        }
        end
    }

    /// Visible value.
    pub fn render(&self, buf: &[char]) -> String {
        buf[..self.visible_len(buf)].iter().collect()
    }

    /// Chars of the editable slots, in slot order.
    pub fn raw_value(&self, buf: &[char]) -> String {
        buf[..self.visible_len(buf)]
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.is_editable(*idx as upos_type))
            .map(|(_, c)| *c)
            .collect()
    }

    /// Rendered value without any input.
    pub fn empty_value(&self) -> String {
        self.render(&self.format_value(&[]))
    }
}
