use std::num::NonZeroUsize;

use crate::reader::{MementoReader, SymbolReader, SymbolSource};
use crate::symbol::Symbol;

/// Joins runs of equally classified symbols into one symbol
///
/// A run ends at the first symbol of another kind, at the end of input, or once
/// it holds the group limit set for its kind. Kinds without a limit group
/// without bound.
pub struct GroupingSource<R, T> {
    input: R,
    limits: Vec<(T, NonZeroUsize)>,
}

impl<R, T: std::fmt::Debug> std::fmt::Debug for GroupingSource<R, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupingSource")
            .field("limits", &self.limits)
            .finish()
    }
}

impl<R, T> GroupingSource<R, T>
where
    R: SymbolReader<String, T>,
    T: Clone + PartialEq,
{
    pub fn new(input: R) -> Self {
        Self {
            input,
            limits: Vec::new(),
        }
    }

    /// At most `count` symbols of `kind` per group
    pub fn set_group_count(&mut self, kind: T, count: NonZeroUsize) -> &mut Self {
        match self.limits.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = count,
            None => self.limits.push((kind, count)),
        }
        self
    }

    pub fn set_unlimited(&mut self, kind: &T) -> &mut Self {
        self.limits.retain(|(k, _)| k != kind);
        self
    }

    pub fn set_all_unlimited(&mut self) -> &mut Self {
        self.limits.clear();
        self
    }

    pub fn group_count(&self, kind: &T) -> Option<NonZeroUsize> {
        self.limits
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, count)| *count)
    }

    pub fn into_reader(self) -> GroupingReader<R, T> {
        MementoReader::new(self)
    }

    pub fn into_input(self) -> R {
        self.input
    }
}

impl<R, T> SymbolSource for GroupingSource<R, T>
where
    R: SymbolReader<String, T>,
    T: Clone + PartialEq,
{
    type Value = String;
    type Kind = T;

    fn next_symbol(&mut self) -> Symbol<String, T> {
        let first = self.input.get();
        if self.input.is_end_symbol(&first) {
            return first;
        }

        let (mut value, kind) = first.into_parts();
        let limit = self.group_count(&kind).map_or(usize::MAX, NonZeroUsize::get);
        let mut count = 1;
        while count < limit {
            let next = self.input.peek();
            if self.input.is_end_symbol(&next) || *next.kind() != kind {
                break;
            }
            value.push_str(self.input.get().value());
            count += 1;
        }
        Symbol::new(value, kind)
    }

    fn is_end_symbol(&self, symbol: &Symbol<String, T>) -> bool {
        self.input.is_end_symbol(symbol)
    }
}

pub type GroupingReader<R, T> = MementoReader<GroupingSource<R, T>>;
