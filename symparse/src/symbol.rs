//! The `(value, type)` pair passed between every layer of the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed piece of input.
///
/// `V` is the payload (usually the matched text) and `T` the classification
/// that drives dispatch in the layers above. Symbols are plain values: once
/// produced they are never mutated, only cloned or taken apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol<V, T> {
    value: V,
    kind: T,
}

impl<V, T> Symbol<V, T> {
    pub fn new(value: V, kind: T) -> Self {
        Self { value, kind }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// The symbol type
    pub fn kind(&self) -> &T {
        &self.kind
    }

    pub fn into_parts(self) -> (V, T) {
        (self.value, self.kind)
    }

    pub fn is_kind(&self, kind: &T) -> bool
    where
        T: PartialEq,
    {
        &self.kind == kind
    }
}

impl<V: fmt::Display, T: fmt::Debug> fmt::Display for Symbol<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_and_parts() {
        let symbol = Symbol::new("42".to_string(), "integer");

        assert_eq!(symbol.value(), "42");
        assert_eq!(*symbol.kind(), "integer");
        assert!(symbol.is_kind(&"integer"));
        assert_eq!(symbol.into_parts(), ("42".to_string(), "integer"));
    }

    #[test]
    fn test_display() {
        let symbol = Symbol::new("a\tb".to_string(), 7u8);
        assert_eq!(symbol.to_string(), "7(\"a\\tb\")");
    }
}
