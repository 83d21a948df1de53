// Internal modules
pub mod classifier;
pub mod config;
pub mod diagnostics;
#[macro_use]
pub mod logging;
pub mod parsers;
pub mod reader;
pub mod symbol;
pub mod tabular;
pub mod tokenizer;

// Re-export key types for library consumers
pub use classifier::{CharKind, ClassifierBuilder, GroupingSource};
pub use diagnostics::{Diagnostic, DiagnosticLevel, DiagnosticLog};
pub use parsers::{ValueParser, ValueParserExt};
pub use reader::{ArraySymbolReader, Memento, MementoReader, SymbolReader, SymbolSource};
pub use symbol::Symbol;
pub use tabular::{
    ColumnSet, LayeredProvider, ListAdder, PaddedTransposedAdder, ParseReport, RecordReader,
    RowAdder, TabularConfig, TabularConfigBuilder, TabularError, TabularParser, TransposedAdder,
};
pub use tokenizer::{TokenKind, Tokenizer, TokenizerBuilder};
