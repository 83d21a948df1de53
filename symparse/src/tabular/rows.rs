//! Row scanner: splits a symbol stream into rows of raw field symbols
//!
//! One call to [`RowScanner::next_row`] reads exactly one physical row,
//! skipping empty lines, and never looks past the line it is reading.

use super::config::TabularConfig;
use crate::diagnostics::DiagnosticLog;
use crate::log_debug;
use crate::logging::codes;
use crate::reader::SymbolReader;
use crate::symbol::Symbol;
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Nothing but ignored symbols read on this line yet
    StartOfRow,
    Reading,
    /// Inside at least one open delimiter; everything is field content
    Nested,
    End,
}

/// Raw fields of one row with the diagnostics raised while splitting it
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedRow<V, T> {
    pub fields: Vec<Vec<Symbol<V, T>>>,
    /// 1-based line the row starts on
    pub line: usize,
    pub log: DiagnosticLog,
}

enum LineOutcome<V, T> {
    Row(ScannedRow<V, T>),
    Empty,
    End,
}

#[derive(Debug, Clone, Default)]
pub struct RowScanner {
    lines: usize,
    finished: bool,
}

impl RowScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Physical lines consumed so far
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Next non-empty row, or `None` once the stream or the end marker is reached
    ///
    /// Empty lines are skipped; unless only the end of input follows them they
    /// are reported in `run_log`.
    pub fn next_row<V, T, R>(
        &mut self,
        config: &TabularConfig<T>,
        reader: &mut R,
        expected: usize,
        run_log: &mut DiagnosticLog,
    ) -> Option<ScannedRow<V, T>>
    where
        T: PartialEq + Debug,
        R: SymbolReader<V, T>,
    {
        while !self.finished {
            let line = self.lines + 1;
            match self.scan_line(config, reader, expected, line) {
                LineOutcome::Row(row) => return Some(row),
                LineOutcome::End => break,
                LineOutcome::Empty => {
                    let next = reader.peek();
                    let trailing = reader.is_end_symbol(&next) || config.is_end_marker(next.kind());
                    if !trailing && config.preferences().report_empty_lines {
                        run_log
                            .error_with_code(codes::tabular::EMPTY_LINE, format!("Empty line: {}", line));
                        log_debug!("Empty line skipped", "line" => line);
                    }
                }
            }
        }
        None
    }

    fn scan_line<V, T, R>(
        &mut self,
        config: &TabularConfig<T>,
        reader: &mut R,
        expected: usize,
        line: usize,
    ) -> LineOutcome<V, T>
    where
        T: PartialEq + Debug,
        R: SymbolReader<V, T>,
    {
        let mut fields: Vec<Vec<Symbol<V, T>>> = Vec::new();
        let mut field: Vec<Symbol<V, T>> = Vec::new();
        // Indices into the configured delimiter pairs, innermost last
        let mut stack: Vec<usize> = Vec::new();
        let mut log = DiagnosticLog::new();
        let mut state = ScanState::StartOfRow;

        while state != ScanState::End {
            let symbol = reader.get();

            if reader.is_end_symbol(&symbol) || config.is_end_marker(symbol.kind()) {
                self.finished = true;
                if state == ScanState::StartOfRow {
                    return LineOutcome::End;
                }
                if let Some(&open) = stack.first() {
                    let message = format!(
                        "Unterminated delimiter {:?} at line {}",
                        config.delimiters()[open].open,
                        line
                    );
                    log.error_with_code(codes::tabular::UNTERMINATED_DELIMITER, message);
                }
                self.lines += 1;
                fields.push(std::mem::take(&mut field));
                state = ScanState::End;
                continue;
            }

            if state == ScanState::Nested {
                if symbol.kind() == config.line_separator() {
                    self.lines += 1;
                }
                // Close before open, so pairs with identical open and close work.
                let closes = stack
                    .last()
                    .is_some_and(|&top| config.delimiters()[top].is_closed_by(symbol.kind()));
                if closes {
                    stack.pop();
                    if stack.is_empty() {
                        state = ScanState::Reading;
                    }
                } else if let Some(open) = config.open_index(symbol.kind()) {
                    stack.push(open);
                }
                field.push(symbol);
                continue;
            }

            if symbol.kind() == config.line_separator() {
                self.lines += 1;
                if state == ScanState::StartOfRow {
                    return LineOutcome::Empty;
                }
                fields.push(std::mem::take(&mut field));
                state = ScanState::End;
            } else if symbol.kind() == config.column_separator() {
                state = ScanState::Reading;
                fields.push(std::mem::take(&mut field));
                if fields.len() == expected {
                    self.discard_overflow(config, reader, expected, line, &mut log);
                    state = ScanState::End;
                }
            } else if let Some(open) = config.open_index(symbol.kind()) {
                stack.push(open);
                field.push(symbol);
                state = ScanState::Nested;
            } else if !config.is_ignored(symbol.kind()) {
                field.push(symbol);
                state = ScanState::Reading;
            }
        }

        if fields.len() < expected {
            log.error_with_code(codes::tabular::TOO_FEW_FIELDS, format!(
                "The number of read columns {} does not match the number of expected columns {} at line {}.",
                fields.len(),
                expected,
                line
            ));
            log_debug!("Short row", "line" => line, "found" => fields.len(), "expected" => expected);
        }

        LineOutcome::Row(ScannedRow { fields, line, log })
    }

    /// Skip the rest of an over-long line, counting the fields it would have held
    ///
    /// Delimiters are not tracked here: the first line separator ends the
    /// discarded tail even when it sits inside an open delimiter.
    fn discard_overflow<V, T, R>(
        &mut self,
        config: &TabularConfig<T>,
        reader: &mut R,
        expected: usize,
        line: usize,
        log: &mut DiagnosticLog,
    ) where
        T: PartialEq + Debug,
        R: SymbolReader<V, T>,
    {
        let mut found = expected + 1;
        loop {
            let symbol = reader.get();
            if reader.is_end_symbol(&symbol) || config.is_end_marker(symbol.kind()) {
                self.finished = true;
                break;
            }
            if symbol.kind() == config.line_separator() {
                break;
            }
            if symbol.kind() == config.column_separator() {
                found += 1;
            }
        }
        self.lines += 1;

        log.error_with_code(codes::tabular::TOO_MANY_FIELDS, format!(
            "The number of read columns {} exceeds the number of expected columns {} at line {}.",
            found, expected, line
        ));
        log_debug!("Long row truncated", "line" => line, "found" => found, "expected" => expected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::TabularConfigBuilder;
    use crate::ArraySymbolReader;

    fn chars(text: &str) -> ArraySymbolReader<char, char> {
        let symbols = text.chars().map(|c| Symbol::new(c, c)).collect();
        ArraySymbolReader::from_symbols(symbols, Symbol::new('\0', '\0'))
    }

    fn config() -> TabularConfig<char> {
        let mut builder = TabularConfigBuilder::new('\n', ';').unwrap();
        builder
            .map_delimiters('(', [')'])
            .unwrap()
            .map_delimiters('"', ['"'])
            .unwrap()
            .add_ignored(' ')
            .unwrap();
        builder.build()
    }

    fn texts(row: &ScannedRow<char, char>) -> Vec<String> {
        row.fields
            .iter()
            .map(|field| field.iter().map(|s| *s.value()).collect())
            .collect()
    }

    fn scan_all(text: &str, expected: usize) -> (Vec<ScannedRow<char, char>>, DiagnosticLog, RowScanner) {
        let config = config();
        let mut reader = chars(text);
        let mut scanner = RowScanner::new();
        let mut run_log = DiagnosticLog::new();
        let mut rows = Vec::new();
        while let Some(row) = scanner.next_row(&config, &mut reader, expected, &mut run_log) {
            rows.push(row);
        }
        (rows, run_log, scanner)
    }

    #[test]
    fn test_rows_and_columns() {
        let (rows, run_log, scanner) = scan_all("a;b\nc;d", 2);

        assert_eq!(rows.len(), 2);
        assert_eq!(texts(&rows[0]), vec!["a", "b"]);
        assert_eq!(texts(&rows[1]), vec!["c", "d"]);
        assert_eq!(rows[1].line, 2);
        assert!(!run_log.has_logs());
        assert_eq!(scanner.lines(), 2);
    }

    #[test]
    fn test_overflow_discards_rest_of_line() {
        let (rows, _, _) = scan_all("a;b;c;d\ne;f\n", 2);

        assert_eq!(texts(&rows[0]), vec!["a", "b"]);
        assert_eq!(
            rows[0].log.entries()[0].message,
            "The number of read columns 4 exceeds the number of expected columns 2 at line 1."
        );
        assert_eq!(texts(&rows[1]), vec!["e", "f"]);
        assert!(!rows[1].log.has_logs());
    }

    #[test]
    fn test_overflow_tail_ignores_delimiters() {
        let (rows, _, scanner) = scan_all("a;(b\nc);d", 1);

        assert_eq!(rows.len(), 2);
        assert_eq!(texts(&rows[0]), vec!["a"]);
        assert_eq!(
            rows[0].log.entries()[0].message,
            "The number of read columns 2 exceeds the number of expected columns 1 at line 1."
        );
        assert_eq!(texts(&rows[1]), vec!["c)"]);
        assert_eq!(rows[1].line, 2);
        assert_eq!(
            rows[1].log.entries()[0].message,
            "The number of read columns 2 exceeds the number of expected columns 1 at line 2."
        );
        assert_eq!(scanner.lines(), 2);
    }

    #[test]
    fn test_nested_delimiters_keep_everything() {
        let (rows, _, _) = scan_all("(a(b;\n)c) x;\"p q\"", 2);

        assert_eq!(rows.len(), 1);
        assert_eq!(texts(&rows[0]), vec!["(a(b;\n)c)x", "\"p q\""]);
    }

    #[test]
    fn test_unterminated_delimiter_still_emits_row() {
        let (rows, _, scanner) = scan_all("a;(b", 2);

        assert_eq!(texts(&rows[0]), vec!["a", "(b"]);
        assert_eq!(
            rows[0].log.entries()[0].message,
            "Unterminated delimiter '(' at line 1"
        );
        assert!(scanner.is_finished());
    }

    #[test]
    fn test_empty_lines() {
        let (rows, run_log, _) = scan_all("a;b\n\n  \nc;d\n\n", 2);

        assert_eq!(rows.len(), 2);
        let messages: Vec<&str> = run_log.entries().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["Empty line: 2", "Empty line: 3"]);
    }

    #[test]
    fn test_short_row() {
        let (rows, _, _) = scan_all("a\n", 3);

        assert_eq!(texts(&rows[0]), vec!["a"]);
        assert!(rows[0].log.has_errors());
    }

    #[test]
    fn test_end_marker_stops_the_run() {
        let mut builder = TabularConfigBuilder::new('\n', ';').unwrap();
        builder.set_end_marker('#').unwrap();
        let config = builder.build();

        let mut reader = chars("a;b\n#c;d\n");
        let mut scanner = RowScanner::new();
        let mut run_log = DiagnosticLog::new();

        assert!(scanner.next_row(&config, &mut reader, 2, &mut run_log).is_some());
        assert!(scanner.next_row(&config, &mut reader, 2, &mut run_log).is_none());
        assert!(scanner.is_finished());
    }
}
