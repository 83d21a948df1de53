use std::collections::HashMap;

use super::TabularError;
use crate::config::compile_time::tabular::MAX_COLUMNS;
use crate::parsers::ValueParser;

/// Supplies the value parser for each field of a run
pub trait ParserProvider<E, V, T> {
    fn parser_for(&self, row: usize, column: usize) -> Option<&dyn ValueParser<E, V, T>>;

    /// Fields per row; longer rows are truncated, shorter ones reported
    fn expected_columns(&self) -> usize;
}

struct Column<E, V, T> {
    name: String,
    parser: Box<dyn ValueParser<E, V, T>>,
}

/// Ordered, named columns with one parser each
pub struct ColumnSet<E, V, T> {
    columns: Vec<Column<E, V, T>>,
}

impl<E, V, T> std::fmt::Debug for ColumnSet<E, V, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSet")
            .field("names", &self.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

impl<E, V, T> Default for ColumnSet<E, V, T> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}

impl<E, V, T> ColumnSet<E, V, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column<P>(&mut self, name: impl Into<String>, parser: P) -> Result<&mut Self, TabularError>
    where
        P: ValueParser<E, V, T> + 'static,
    {
        if self.columns.len() >= MAX_COLUMNS {
            return Err(TabularError::TooManyColumns {
                count: self.columns.len() + 1,
                max: MAX_COLUMNS,
            });
        }

        self.columns.push(Column {
            name: name.into(),
            parser: Box::new(parser),
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|c| c.name.as_str())
    }

    /// Position of the first column called `name`
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

impl<E, V, T> ParserProvider<E, V, T> for ColumnSet<E, V, T> {
    fn parser_for(&self, _row: usize, column: usize) -> Option<&dyn ValueParser<E, V, T>> {
        self.columns.get(column).map(|c| c.parser.as_ref())
    }

    fn expected_columns(&self) -> usize {
        self.columns.len()
    }
}

/// The same parser for every field of a fixed-width table
#[derive(Debug, Clone)]
pub struct Uniform<P> {
    parser: P,
    columns: usize,
}

impl<P> Uniform<P> {
    pub fn new(parser: P, columns: usize) -> Result<Self, TabularError> {
        if columns == 0 {
            return Err(TabularError::NoColumns);
        }
        if columns > MAX_COLUMNS {
            return Err(TabularError::TooManyColumns {
                count: columns,
                max: MAX_COLUMNS,
            });
        }
        Ok(Self { parser, columns })
    }
}

impl<E, V, T, P: ValueParser<E, V, T>> ParserProvider<E, V, T> for Uniform<P> {
    fn parser_for(&self, _row: usize, column: usize) -> Option<&dyn ValueParser<E, V, T>> {
        (column < self.columns).then_some(&self.parser as &dyn ValueParser<E, V, T>)
    }

    fn expected_columns(&self) -> usize {
        self.columns
    }
}

/// Parser lookup in three tiers: a single cell, then a whole column, then the default
///
/// Fields past `columns` have no parser, as with [`Uniform`].
pub struct LayeredProvider<E, V, T> {
    default: Box<dyn ValueParser<E, V, T>>,
    by_column: HashMap<usize, Box<dyn ValueParser<E, V, T>>>,
    by_cell: HashMap<(usize, usize), Box<dyn ValueParser<E, V, T>>>,
    columns: usize,
}

impl<E, V, T> std::fmt::Debug for LayeredProvider<E, V, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut by_column: Vec<_> = self.by_column.keys().copied().collect();
        by_column.sort_unstable();
        let mut by_cell: Vec<_> = self.by_cell.keys().copied().collect();
        by_cell.sort_unstable();
        f.debug_struct("LayeredProvider")
            .field("columns", &self.columns)
            .field("by_column", &by_column)
            .field("by_cell", &by_cell)
            .finish()
    }
}

impl<E, V, T> LayeredProvider<E, V, T> {
    pub fn new<P>(default: P, columns: usize) -> Result<Self, TabularError>
    where
        P: ValueParser<E, V, T> + 'static,
    {
        if columns == 0 {
            return Err(TabularError::NoColumns);
        }
        if columns > MAX_COLUMNS {
            return Err(TabularError::TooManyColumns {
                count: columns,
                max: MAX_COLUMNS,
            });
        }
        Ok(Self {
            default: Box::new(default),
            by_column: HashMap::new(),
            by_cell: HashMap::new(),
            columns,
        })
    }

    pub fn set_default<P>(&mut self, parser: P) -> &mut Self
    where
        P: ValueParser<E, V, T> + 'static,
    {
        self.default = Box::new(parser);
        self
    }

    /// Parser for every row of `column`; replaces any earlier one
    pub fn register_column<P>(&mut self, column: usize, parser: P) -> &mut Self
    where
        P: ValueParser<E, V, T> + 'static,
    {
        self.by_column.insert(column, Box::new(parser));
        self
    }

    /// Parser for the single field at (`row`, `column`), both zero-based
    pub fn register_cell<P>(&mut self, row: usize, column: usize, parser: P) -> &mut Self
    where
        P: ValueParser<E, V, T> + 'static,
    {
        self.by_cell.insert((row, column), Box::new(parser));
        self
    }

    /// Returns whether a column parser was registered
    pub fn unregister_column(&mut self, column: usize) -> bool {
        self.by_column.remove(&column).is_some()
    }

    pub fn unregister_cell(&mut self, row: usize, column: usize) -> bool {
        self.by_cell.remove(&(row, column)).is_some()
    }

    /// Drops every column and cell parser; the default stays
    pub fn clear(&mut self) {
        self.by_column.clear();
        self.by_cell.clear();
    }
}

impl<E, V, T> ParserProvider<E, V, T> for LayeredProvider<E, V, T> {
    fn parser_for(&self, row: usize, column: usize) -> Option<&dyn ValueParser<E, V, T>> {
        if column >= self.columns {
            return None;
        }
        let parser = self
            .by_cell
            .get(&(row, column))
            .or_else(|| self.by_column.get(&column))
            .unwrap_or(&self.default);
        Some(parser.as_ref())
    }

    fn expected_columns(&self) -> usize {
        self.columns
    }
}
