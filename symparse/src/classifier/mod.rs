//! Character classification
//!
//! A [`ClassifierBuilder`] collects the exact-character table, the inclusive
//! range table and an optional fallback function. Building a reader freezes
//! that configuration into a [`CharTable`]; the resulting [`CharSymbolReader`]
//! has no way to change it.
//!
//! Resolution order for a character:
//! 1. exact table
//! 2. ranges, in registration order, last match wins
//! 3. fallback function, if it returns a type
//! 4. the generic type
//!
//! End of input always yields the end-of-file type.
//!
//! A [`GroupingSource`] sits on top of any classified reader and joins runs of
//! one kind into a single symbol.

mod grouping;
mod kinds;

pub use grouping::{GroupingReader, GroupingSource};
pub use kinds::CharKind;

use crate::reader::{MementoReader, SymbolSource};
use crate::symbol::Symbol;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

pub type Fallback<T> = Arc<dyn Fn(char) -> Option<T> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CharRange<T> {
    min: char,
    max: char,
    kind: T,
}

impl<T> CharRange<T> {
    fn contains(&self, c: char) -> bool {
        self.min <= c && c <= self.max
    }
}

/// Configuration phase of a classifier
#[derive(Clone)]
pub struct ClassifierBuilder<T> {
    exact: HashMap<char, T>,
    ranges: Vec<CharRange<T>>,
    fallback: Option<Fallback<T>>,
    generic: T,
    eof: T,
}

impl<T: std::fmt::Debug> std::fmt::Debug for ClassifierBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierBuilder")
            .field("exact", &self.exact)
            .field("ranges", &self.ranges)
            .field("fallback", &self.fallback.is_some())
            .field("generic", &self.generic)
            .field("eof", &self.eof)
            .finish()
    }
}

impl<T: Clone + PartialEq> ClassifierBuilder<T> {
    pub fn new(generic: T, eof: T) -> Self {
        Self {
            exact: HashMap::new(),
            ranges: Vec::new(),
            fallback: None,
            generic,
            eof,
        }
    }

    pub fn register_char(&mut self, c: char, kind: T) -> &mut Self {
        self.exact.insert(c, kind);
        self
    }

    pub fn unregister_char(&mut self, c: char) -> &mut Self {
        self.exact.remove(&c);
        self
    }

    /// Register an inclusive range; bounds may be given in either order
    pub fn register_range(&mut self, first: char, last: char, kind: T) -> &mut Self {
        let (min, max) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };
        self.ranges.push(CharRange { min, max, kind });
        self
    }

    /// Remove every range registration with exactly these bounds
    pub fn unregister_range(&mut self, first: char, last: char) -> &mut Self {
        let (min, max) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };
        self.ranges.retain(|range| range.min != min || range.max != max);
        self
    }

    /// Clear the exact table, the ranges and the fallback
    pub fn unregister_all(&mut self) -> &mut Self {
        self.exact.clear();
        self.ranges.clear();
        self.fallback = None;
        self
    }

    pub fn set_fallback<F>(&mut self, fallback: F) -> &mut Self
    where
        F: Fn(char) -> Option<T> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    pub fn clear_fallback(&mut self) -> &mut Self {
        self.fallback = None;
        self
    }

    pub fn set_generic_type(&mut self, kind: T) -> &mut Self {
        self.generic = kind;
        self
    }

    pub fn set_eof_type(&mut self, kind: T) -> &mut Self {
        self.eof = kind;
        self
    }

    /// Freeze the current configuration
    pub fn table(&self) -> CharTable<T> {
        CharTable {
            exact: self.exact.clone(),
            ranges: self.ranges.clone(),
            fallback: self.fallback.clone(),
            generic: self.generic.clone(),
            eof: self.eof.clone(),
        }
    }

    pub fn reader<I: Iterator<Item = char>>(&self, chars: I) -> CharSymbolReader<I, T> {
        MementoReader::new(CharClassifier::new(self.table(), chars))
    }

    pub fn reader_from_str<'a>(&self, text: &'a str) -> CharSymbolReader<std::str::Chars<'a>, T> {
        self.reader(text.chars())
    }

    /// Read the whole input up front and classify it
    pub fn reader_from_io<R: Read>(
        &self,
        mut input: R,
    ) -> std::io::Result<CharSymbolReader<std::vec::IntoIter<char>, T>> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        let chars: Vec<char> = text.chars().collect();
        Ok(self.reader(chars.into_iter()))
    }
}

/// Frozen classification tables
#[derive(Clone)]
pub struct CharTable<T> {
    exact: HashMap<char, T>,
    ranges: Vec<CharRange<T>>,
    fallback: Option<Fallback<T>>,
    generic: T,
    eof: T,
}

impl<T: Clone> CharTable<T> {
    pub fn classify(&self, c: char) -> T {
        if let Some(kind) = self.exact.get(&c) {
            return kind.clone();
        }

        if let Some(range) = self.ranges.iter().rev().find(|range| range.contains(c)) {
            return range.kind.clone();
        }

        self.fallback
            .as_ref()
            .and_then(|fallback| fallback(c))
            .unwrap_or_else(|| self.generic.clone())
    }

    pub fn eof_type(&self) -> &T {
        &self.eof
    }

    pub fn generic_type(&self) -> &T {
        &self.generic
    }
}

/// Symbol source producing one single-character symbol per input character
pub struct CharClassifier<I: Iterator<Item = char>, T> {
    table: CharTable<T>,
    chars: std::iter::Fuse<I>,
}

impl<I: Iterator<Item = char>, T> CharClassifier<I, T> {
    pub fn new(table: CharTable<T>, chars: I) -> Self {
        Self {
            table,
            chars: chars.fuse(),
        }
    }

    pub fn table(&self) -> &CharTable<T> {
        &self.table
    }
}

impl<I: Iterator<Item = char>, T: Clone + PartialEq> SymbolSource for CharClassifier<I, T> {
    type Value = String;
    type Kind = T;

    fn next_symbol(&mut self) -> Symbol<String, T> {
        match self.chars.next() {
            Some(c) => Symbol::new(c.to_string(), self.table.classify(c)),
            None => Symbol::new(String::new(), self.table.eof.clone()),
        }
    }

    fn is_end_symbol(&self, symbol: &Symbol<String, T>) -> bool {
        symbol.kind() == &self.table.eof
    }
}

pub type CharSymbolReader<I, T> = MementoReader<CharClassifier<I, T>>;
