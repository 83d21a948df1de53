//! Pull-style access to a table, one row at a time
//!
//! [`RecordReader`] is the cursor counterpart of
//! [`TabularParser::parse`](super::TabularParser::parse): instead of pushing
//! rows into a container it parses a row per [`RecordReader::read`] call and
//! exposes the values by position or by column name.

use super::columns::ColumnSet;
use super::config::TabularConfig;
use super::parser::parse_fields;
use super::rows::RowScanner;
use super::TabularError;
use crate::diagnostics::DiagnosticLog;
use crate::reader::SymbolReader;
use std::fmt::Debug;
use std::marker::PhantomData;

pub struct RecordReader<R, E, V, T> {
    config: TabularConfig<T>,
    columns: ColumnSet<E, V, T>,
    reader: R,
    scanner: RowScanner,
    /// `None` before the first row and after the last
    current: Option<usize>,
    rows_read: usize,
    values: Vec<E>,
    row_log: DiagnosticLog,
    run_log: DiagnosticLog,
    _value: PhantomData<fn() -> V>,
}

impl<R, E, V, T> Debug for RecordReader<R, E, V, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordReader")
            .field("columns", &self.columns)
            .field("current", &self.current)
            .field("rows_read", &self.rows_read)
            .field("diagnostics", &self.run_log)
            .finish()
    }
}

impl<R, E, V, T> RecordReader<R, E, V, T>
where
    R: SymbolReader<V, T>,
    T: PartialEq + Debug,
{
    pub fn new(
        config: TabularConfig<T>,
        columns: ColumnSet<E, V, T>,
        reader: R,
    ) -> Result<Self, TabularError> {
        if columns.is_empty() {
            return Err(TabularError::NoColumns);
        }

        Ok(Self {
            config,
            columns,
            reader,
            scanner: RowScanner::new(),
            current: None,
            rows_read: 0,
            values: Vec::new(),
            row_log: DiagnosticLog::new(),
            run_log: DiagnosticLog::new(),
            _value: PhantomData,
        })
    }

    /// Advance to the next row; `false` once the input is exhausted
    pub fn read(&mut self) -> bool {
        let expected = self.columns.len();
        let next = self
            .scanner
            .next_row(&self.config, &mut self.reader, expected, &mut self.run_log);

        let Some(mut scanned) = next else {
            self.current = None;
            self.values.clear();
            self.row_log.clear();
            return false;
        };

        let row = self.rows_read;
        self.row_log = std::mem::take(&mut scanned.log);
        self.values = parse_fields(&self.columns, row, &scanned, &mut self.row_log);
        self.run_log.copy_from(&self.row_log);

        self.rows_read += 1;
        self.current = Some(row);
        true
    }
}

impl<R, E, V, T> RecordReader<R, E, V, T> {
    /// 0-based index of the current row
    pub fn current_row(&self) -> Option<usize> {
        self.current
    }

    pub fn values(&self) -> &[E] {
        &self.values
    }

    /// Value of column `index` in the current row; absent for missing fields of a short row
    pub fn get(&self, index: usize) -> Option<&E> {
        self.values.get(index)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&E> {
        self.columns.ordinal(name).and_then(|index| self.get(index))
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.columns.name(index)
    }

    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.columns.ordinal(name)
    }

    /// Configured number of columns
    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_errors(&self) -> bool {
        self.row_log.has_errors()
    }

    /// Independent copy of the current row's diagnostics
    pub fn row_diagnostics(&self) -> DiagnosticLog {
        self.row_log.clone()
    }

    /// Everything logged so far in this run
    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.run_log
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
