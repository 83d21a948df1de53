//! Delimiter-aware tabular parsing
//!
//! Splits any symbol stream into rows and columns:
//! - the line separator ends a row, the column separator ends a field
//! - open delimiters push onto a stack; until it empties, every symbol is
//!   field content, separators and ignored types included
//! - ignored types are dropped everywhere else
//!
//! Each field's symbols go to a [`ValueParser`](crate::parsers::ValueParser)
//! chosen by a [`ParserProvider`]; finished rows go to a [`RowAdder`].
//! Data problems become diagnostics. Only configuration mistakes and
//! re-entrant runs are returned as [`TabularError`].

mod adder;
mod columns;
mod config;
mod parser;
mod record;
mod rows;

pub use adder::{ListAdder, PaddedTransposedAdder, RowAdder, TransposedAdder};
pub use columns::{ColumnSet, LayeredProvider, ParserProvider, Uniform};
pub use config::{DelimiterPair, TabularConfig, TabularConfigBuilder};
pub use parser::{ParseReport, RowDiagnostics, TabularParser};
pub use record::RecordReader;
pub use rows::{RowScanner, ScanState, ScannedRow};

use crate::logging::{codes, Code};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TabularError {
    #[error("Separator {symbol} is already used by another separator")]
    SeparatorConflict { symbol: String },

    #[error("Symbol {symbol} cannot be both a delimiter and a separator")]
    DelimiterConflict { symbol: String },

    #[error("Delimiter {open} needs at least one closing symbol")]
    EmptyCloseSet { open: String },

    #[error("Separator {symbol} cannot be ignored")]
    IgnoredSeparator { symbol: String },

    #[error("Delimiter {symbol} cannot be ignored")]
    IgnoredDelimiter { symbol: String },

    #[error("{count} columns exceed the maximum of {max}")]
    TooManyColumns { count: usize, max: usize },

    #[error("At least one column is required")]
    NoColumns,

    #[error("A parse is already running on this parser")]
    AlreadyRunning,
}

impl TabularError {
    pub fn error_code(&self) -> Code {
        match self {
            TabularError::SeparatorConflict { .. } => codes::configuration::SEPARATOR_CONFLICT,
            TabularError::DelimiterConflict { .. } => codes::configuration::DELIMITER_CONFLICT,
            TabularError::EmptyCloseSet { .. } => codes::configuration::EMPTY_CLOSE_SET,
            TabularError::IgnoredSeparator { .. } => codes::configuration::IGNORED_SEPARATOR,
            TabularError::IgnoredDelimiter { .. } => codes::configuration::DELIMITER_CONFLICT,
            TabularError::TooManyColumns { .. } => codes::configuration::TOO_MANY_COLUMNS,
            TabularError::NoColumns => codes::configuration::NO_COLUMNS,
            TabularError::AlreadyRunning => codes::tabular::PARSE_ALREADY_RUNNING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_registered() {
        let errors = [
            TabularError::SeparatorConflict { symbol: "';'".into() },
            TabularError::DelimiterConflict { symbol: "'('".into() },
            TabularError::EmptyCloseSet { open: "'('".into() },
            TabularError::IgnoredSeparator { symbol: "' '".into() },
            TabularError::IgnoredDelimiter { symbol: "'\"'".into() },
            TabularError::TooManyColumns { count: 5000, max: 4096 },
            TabularError::NoColumns,
            TabularError::AlreadyRunning,
        ];

        for error in &errors {
            let code = error.error_code();
            assert!(codes::get_error_metadata(code.as_str()).is_some(), "{}", code.as_str());
        }
        assert_eq!(
            TabularError::TooManyColumns { count: 5000, max: 4096 }.to_string(),
            "5000 columns exceed the maximum of 4096"
        );
    }
}
