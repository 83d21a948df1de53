use super::{MementoReader, SymbolSource};
use crate::symbol::Symbol;

/// Source over an already materialized list of symbols
#[derive(Debug, Clone)]
pub struct ArraySource<V, T> {
    symbols: std::vec::IntoIter<Symbol<V, T>>,
    end: Symbol<V, T>,
}

impl<V, T> ArraySource<V, T> {
    pub fn new(symbols: Vec<Symbol<V, T>>, end: Symbol<V, T>) -> Self {
        Self {
            symbols: symbols.into_iter(),
            end,
        }
    }
}

impl<V: Clone, T: Clone + PartialEq> SymbolSource for ArraySource<V, T> {
    type Value = V;
    type Kind = T;

    fn next_symbol(&mut self) -> Symbol<V, T> {
        self.symbols.next().unwrap_or_else(|| self.end.clone())
    }

    /// End is decided by type alone, so a listed symbol of the end type also ends the stream
    fn is_end_symbol(&self, symbol: &Symbol<V, T>) -> bool {
        symbol.kind() == self.end.kind()
    }
}

/// Flat, array-backed reader; interchangeable with classifier and tokenizer readers
pub type ArraySymbolReader<V, T> = MementoReader<ArraySource<V, T>>;

impl<V: Clone, T: Clone + PartialEq> MementoReader<ArraySource<V, T>> {
    pub fn from_symbols(symbols: Vec<Symbol<V, T>>, end: Symbol<V, T>) -> Self {
        MementoReader::new(ArraySource::new(symbols, end))
    }
}
