use super::adder::RowAdder;
use super::columns::{ColumnSet, ParserProvider};
use super::config::TabularConfig;
use super::record::RecordReader;
use super::rows::{RowScanner, ScannedRow};
use super::TabularError;
use crate::diagnostics::{DiagnosticLevel, DiagnosticLog};
use crate::logging::codes;
use crate::reader::SymbolReader;
use crate::{log_error, log_info, log_success};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt::Debug;

/// Diagnostics of one row, snapshotted when the row completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDiagnostics {
    /// 0-based index of the emitted row
    pub row: usize,
    /// 1-based line the row starts on
    pub line: usize,
    pub log: DiagnosticLog,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    pub rows: usize,
    pub lines: usize,
    /// Every diagnostic of the run, in order
    pub diagnostics: DiagnosticLog,
    /// Only rows that logged something
    pub row_diagnostics: Vec<RowDiagnostics>,
}

impl ParseReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub fn row_log(&self, row: usize) -> Option<&DiagnosticLog> {
        self.row_diagnostics
            .iter()
            .find(|entry| entry.row == row)
            .map(|entry| &entry.log)
    }
}

/// Marks a run in progress; the flag is released on drop, panics included
struct RunGuard<'a> {
    running: &'a Cell<bool>,
}

impl<'a> RunGuard<'a> {
    fn acquire(running: &'a Cell<bool>) -> Result<Self, TabularError> {
        if running.replace(true) {
            let error = TabularError::AlreadyRunning;
            log_error!(error.error_code(), "Rejected re-entrant tabular parse");
            return Err(error);
        }
        Ok(Self { running })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.set(false);
    }
}

/// Parse every field of a scanned row with the provider's parsers
///
/// Fields the provider has no parser for are dropped.
pub(crate) fn parse_fields<E, V, T, P>(
    provider: &P,
    row: usize,
    scanned: &ScannedRow<V, T>,
    log: &mut DiagnosticLog,
) -> Vec<E>
where
    P: ParserProvider<E, V, T> + ?Sized,
{
    scanned
        .fields
        .iter()
        .enumerate()
        .filter_map(|(column, symbols)| {
            provider
                .parser_for(row, column)
                .map(|parser| parser.parse(symbols, log))
        })
        .collect()
}

/// Delimiter-aware table parser
///
/// A single instance runs one parse at a time; starting another run from
/// inside a value parser or row adder fails with
/// [`TabularError::AlreadyRunning`].
#[derive(Debug)]
pub struct TabularParser<T> {
    config: TabularConfig<T>,
    running: Cell<bool>,
}

impl<T: Clone + PartialEq + Debug> TabularParser<T> {
    pub fn new(config: TabularConfig<T>) -> Self {
        Self {
            config,
            running: Cell::new(false),
        }
    }

    pub fn config(&self) -> &TabularConfig<T> {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Parse `reader` to its end, handing each row to `adder`
    ///
    /// Data problems never abort the run; they are collected in the report.
    pub fn parse<V, R, P, C, E, A>(
        &self,
        mut reader: R,
        provider: &P,
        target: &mut C,
        adder: &A,
    ) -> Result<ParseReport, TabularError>
    where
        R: SymbolReader<V, T>,
        P: ParserProvider<E, V, T> + ?Sized,
        A: RowAdder<C, E> + ?Sized,
    {
        let _guard = RunGuard::acquire(&self.running)?;

        let expected = provider.expected_columns();
        if expected == 0 {
            return Err(TabularError::NoColumns);
        }

        log_info!("Tabular parse started", "columns" => expected);

        let mut scanner = RowScanner::new();
        let mut report = ParseReport::default();

        while let Some(mut scanned) =
            scanner.next_row(&self.config, &mut reader, expected, &mut report.diagnostics)
        {
            let row = report.rows;
            let mut log = std::mem::take(&mut scanned.log);
            let values = parse_fields(provider, row, &scanned, &mut log);

            if log.has_logs() {
                if self.config.preferences().log_row_diagnostics {
                    log.emit(&format!("row {}", row));
                }
                report.diagnostics.copy_from(&log);
                report.row_diagnostics.push(RowDiagnostics {
                    row,
                    line: scanned.line,
                    log,
                });
            }

            adder.add(target, values);
            report.rows += 1;
        }
        report.lines = scanner.lines();

        log_success!(codes::success::TABULAR_PARSE_COMPLETE, "Tabular parse complete",
            "rows" => report.rows,
            "lines" => report.lines,
            "errors" => report.diagnostics.count_at(DiagnosticLevel::Error)
        );
        Ok(report)
    }

    /// Row-by-row cursor over `reader` using a copy of this configuration
    pub fn records<R, E, V>(
        &self,
        columns: ColumnSet<E, V, T>,
        reader: R,
    ) -> Result<RecordReader<R, E, V, T>, TabularError>
    where
        R: SymbolReader<V, T>,
    {
        RecordReader::new(self.config.clone(), columns, reader)
    }
}
