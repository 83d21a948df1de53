//! Buffered, backtrackable symbol readers
//!
//! Every layer of the pipeline pulls its input through a [`SymbolReader`].
//! [`MementoReader`] turns any forward-only [`SymbolSource`] into a reader that
//! remembers everything it has produced, so callers can peek ahead and step
//! back (`unget`) as far as the start of the run.

mod array;

pub use array::{ArraySource, ArraySymbolReader};

use crate::symbol::Symbol;

/// Pull interface shared by classifiers, tokenizers and array-backed readers
pub trait SymbolReader<V, T> {
    /// Next symbol without consuming it; repeated calls return the same symbol
    fn peek(&mut self) -> Symbol<V, T>;

    /// Next symbol, advancing the cursor. Past the end this keeps returning the end symbol.
    fn get(&mut self) -> Symbol<V, T>;

    /// Step the cursor back one position; a no-op at the start of the run
    fn unget(&mut self);

    fn is_at_end(&mut self) -> bool;

    fn is_end_symbol(&self, symbol: &Symbol<V, T>) -> bool;
}

impl<V, T, R: SymbolReader<V, T> + ?Sized> SymbolReader<V, T> for &mut R {
    fn peek(&mut self) -> Symbol<V, T> {
        (**self).peek()
    }

    fn get(&mut self) -> Symbol<V, T> {
        (**self).get()
    }

    fn unget(&mut self) {
        (**self).unget()
    }

    fn is_at_end(&mut self) -> bool {
        (**self).is_at_end()
    }

    fn is_end_symbol(&self, symbol: &Symbol<V, T>) -> bool {
        (**self).is_end_symbol(symbol)
    }
}

/// Forward-only producer wrapped by [`MementoReader`]
///
/// Once a source has returned its end symbol it is not asked for more.
pub trait SymbolSource {
    type Value: Clone;
    type Kind: Clone;

    fn next_symbol(&mut self) -> Symbol<Self::Value, Self::Kind>;

    fn is_end_symbol(&self, symbol: &Symbol<Self::Value, Self::Kind>) -> bool;
}

/// Saved cursor position, see [`MementoReader::save_memento`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Memento {
    position: usize,
}

impl Memento {
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Reader that buffers every symbol its source produced
///
/// Invariant: `cursor <= buffer.len()`. Symbols are appended only when the
/// cursor reaches the end of the buffer and are never removed.
pub struct MementoReader<S: SymbolSource> {
    source: S,
    buffer: Vec<Symbol<S::Value, S::Kind>>,
    cursor: usize,
    exhausted: bool,
}

impl<S> std::fmt::Debug for MementoReader<S>
where
    S: SymbolSource,
    S::Value: std::fmt::Debug,
    S::Kind: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MementoReader")
            .field("buffer", &self.buffer)
            .field("cursor", &self.cursor)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

impl<S: SymbolSource> MementoReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: Vec::new(),
            cursor: 0,
            exhausted: false,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Cursor position within the buffered history
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Every symbol produced so far, in order
    pub fn buffered(&self) -> &[Symbol<S::Value, S::Kind>] {
        &self.buffer
    }

    pub fn save_memento(&self) -> Memento {
        Memento {
            position: self.cursor,
        }
    }

    /// Rewind (or fast-forward) to a saved position; clamped to the buffered history
    pub fn restore_memento(&mut self, memento: Memento) {
        self.cursor = memento.position.min(self.buffer.len());
    }

    fn fill(&mut self) -> bool {
        if self.cursor < self.buffer.len() {
            return true;
        }
        if self.exhausted {
            return false;
        }

        let symbol = self.source.next_symbol();
        self.exhausted = self.source.is_end_symbol(&symbol);
        self.buffer.push(symbol);
        true
    }
}

impl<S: SymbolSource> SymbolReader<S::Value, S::Kind> for MementoReader<S> {
    fn peek(&mut self) -> Symbol<S::Value, S::Kind> {
        if self.fill() {
            self.buffer[self.cursor].clone()
        } else {
            // Exhausted and positioned past the end symbol: repeat it.
            self.buffer[self.buffer.len() - 1].clone()
        }
    }

    fn get(&mut self) -> Symbol<S::Value, S::Kind> {
        let symbol = self.peek();
        if self.cursor < self.buffer.len() {
            self.cursor += 1;
        }
        symbol
    }

    fn unget(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    fn is_at_end(&mut self) -> bool {
        let next = self.peek();
        self.source.is_end_symbol(&next)
    }

    fn is_end_symbol(&self, symbol: &Symbol<S::Value, S::Kind>) -> bool {
        self.source.is_end_symbol(symbol)
    }
}

/// Drain a reader up to, not including, its end symbol
pub fn read_all<V, T, R: SymbolReader<V, T>>(reader: &mut R) -> Vec<Symbol<V, T>> {
    let mut symbols = Vec::new();
    loop {
        let symbol = reader.get();
        if reader.is_end_symbol(&symbol) {
            return symbols;
        }
        symbols.push(symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts how often it is asked for a symbol
    struct CountingSource {
        remaining: Vec<char>,
        pulls: usize,
    }

    impl CountingSource {
        fn new(text: &str) -> Self {
            Self {
                remaining: text.chars().rev().collect(),
                pulls: 0,
            }
        }
    }

    impl SymbolSource for CountingSource {
        type Value = char;
        type Kind = &'static str;

        fn next_symbol(&mut self) -> Symbol<char, &'static str> {
            self.pulls += 1;
            match self.remaining.pop() {
                Some(c) => Symbol::new(c, "char"),
                None => Symbol::new('\0', "eof"),
            }
        }

        fn is_end_symbol(&self, symbol: &Symbol<char, &'static str>) -> bool {
            *symbol.kind() == "eof"
        }
    }

    #[test]
    fn test_peek_is_idempotent() {
        let mut reader = MementoReader::new(CountingSource::new("ab"));

        let first = reader.peek();
        let second = reader.peek();

        assert_eq!(first, second);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.source().pulls, 1);
        assert_eq!(reader.buffered().len(), 1);
    }

    #[test]
    fn test_unget_then_get_reproduces_symbol() {
        let mut reader = MementoReader::new(CountingSource::new("abc"));

        let a = reader.get();
        let b = reader.get();
        reader.unget();
        assert_eq!(reader.get(), b);
        reader.unget();
        reader.unget();
        assert_eq!(reader.get(), a);
        assert_eq!(reader.source().pulls, 2);
    }

    #[test]
    fn test_unget_at_origin_is_noop() {
        let mut reader = MementoReader::new(CountingSource::new("x"));

        reader.unget();
        assert_eq!(reader.position(), 0);
        assert_eq!(*reader.get().value(), 'x');
    }

    #[test]
    fn test_end_symbol_repeats_without_pulling() {
        let mut reader = MementoReader::new(CountingSource::new("z"));

        assert_eq!(*reader.get().value(), 'z');
        assert!(reader.is_at_end());
        let end = reader.get();
        assert!(reader.is_end_symbol(&end));
        assert_eq!(reader.get(), end);
        assert_eq!(reader.peek(), end);
        assert_eq!(reader.source().pulls, 2);

        reader.unget();
        assert_eq!(reader.get(), end);
    }

    #[test]
    fn test_memento_restores_position() {
        let mut reader = MementoReader::new(CountingSource::new("hello"));
        reader.get();
        let mark = reader.save_memento();

        let consumed: String = (0..3).map(|_| *reader.get().value()).collect();
        assert_eq!(consumed, "ell");

        reader.restore_memento(mark);
        assert_eq!(reader.position(), 1);
        assert_eq!(*reader.get().value(), 'e');
    }

    #[test]
    fn test_read_all_stops_at_end() {
        let mut reader = MementoReader::new(CountingSource::new("abc"));
        let values: String = read_all(&mut reader).iter().map(|s| *s.value()).collect();

        assert_eq!(values, "abc");
        assert!(reader.is_at_end());
    }
}
