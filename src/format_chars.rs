//!
//! Format characters.
//!
//! A format character is a symbol in the mask source that stands for an
//! editable slot. Each one maps to a [FormatClass] that decides which
//! input is acceptable and how it is stored.
//!
//! The default set:
//!
//! * `1`: digit
//! * `a`: letter
//! * `A`: letter, converted to uppercase
//! * `*`: letter or digit
//! * `#`: letter or digit, converted to uppercase
//! * `+`: any char
//!
//! Letters are the ASCII letters and the Cyrillic `А-Я`, `а-я`.
//! Digits are ASCII digits. Anything else has to be added as an
//! override.
//!

use rustc_hash::FxHashMap;
use std::fmt::{Debug, Formatter};

/// Validation and transform for one format character.
#[derive(Clone, Copy)]
pub struct FormatClass {
    /// Accepts a char for this class.
    pub validate: fn(char) -> bool,
    /// Converts an accepted char before it is stored.
    pub transform: Option<fn(char) -> char>,
}

impl Debug for FormatClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatClass")
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

impl FormatClass {
    /// Class with validation only.
    pub const fn new(validate: fn(char) -> bool) -> Self {
        Self {
            validate,
            transform: None,
        }
    }

    /// Class with validation and transform.
    pub const fn with_transform(validate: fn(char) -> bool, transform: fn(char) -> char) -> Self {
        Self {
            validate,
            transform: Some(transform),
        }
    }

    /// `1`
    pub const fn digit() -> Self {
        Self::new(is_digit)
    }

    /// `a`
    pub const fn letter() -> Self {
        Self::new(is_letter)
    }

    /// `A`
    pub const fn upper_letter() -> Self {
        Self::with_transform(is_letter, to_upper)
    }

    /// `*`
    pub const fn alphanumeric() -> Self {
        Self::new(is_alphanumeric)
    }

    /// `#`
    pub const fn upper_alphanumeric() -> Self {
        Self::with_transform(is_alphanumeric, to_upper)
    }

    /// `+`
    pub const fn any() -> Self {
        Self::new(is_any)
    }

    #[inline]
    pub fn is_valid(&self, c: char) -> bool {
        (self.validate)(c)
    }

    /// Applies the transform, if any.
    #[inline]
    pub fn apply(&self, c: char) -> char {
        match self.transform {
            Some(transform) => transform(c),
            None => c,
        }
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_letter(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | 'А'..='Я' | 'а'..='я')
}

fn is_alphanumeric(c: char) -> bool {
    c.is_ascii_digit() || is_letter(c)
}

fn is_any(_c: char) -> bool {
    true
}

fn to_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Table of format characters.
#[derive(Debug, Clone)]
pub struct FormatCharacters {
    classes: FxHashMap<char, FormatClass>,
}

impl Default for FormatCharacters {
    fn default() -> Self {
        let mut classes = FxHashMap::default();
        classes.insert('1', FormatClass::digit());
        classes.insert('a', FormatClass::letter());
        classes.insert('A', FormatClass::upper_letter());
        classes.insert('*', FormatClass::alphanumeric());
        classes.insert('#', FormatClass::upper_alphanumeric());
        classes.insert('+', FormatClass::any());
        Self { classes }
    }
}

impl FormatCharacters {
    /// The default set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table without any format character.
    pub fn empty() -> Self {
        Self {
            classes: FxHashMap::default(),
        }
    }

    /// Defaults merged with the given overrides.
    ///
    /// An override with `None` removes the format character.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (char, Option<FormatClass>)>,
    {
        let mut table = Self::default();
        table.merge(overrides);
        table
    }

    /// Merge overrides into this table.
    pub fn merge<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (char, Option<FormatClass>)>,
    {
        for (c, class) in overrides {
            match class {
                Some(class) => {
                    self.classes.insert(c, class);
                }
                None => {
                    self.classes.remove(&c);
                }
            }
        }
    }

    /// Add or replace a format character.
    pub fn insert(&mut self, c: char, class: FormatClass) {
        self.classes.insert(c, class);
    }

    /// Remove a format character.
    pub fn remove(&mut self, c: char) -> Option<FormatClass> {
        self.classes.remove(&c)
    }

    #[inline]
    pub fn get(&self, c: char) -> Option<&FormatClass> {
        self.classes.get(&c)
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.classes.contains_key(&c)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
