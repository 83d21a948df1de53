//! Value parsers: turn the symbols of one field into a typed value
//!
//! Parsers never fail. Problems are written to the supplied
//! [`DiagnosticLog`] and the type's default value is returned, so a bad
//! field costs one diagnostic rather than the whole parse run.

use crate::diagnostics::DiagnosticLog;
use crate::logging::codes;
use crate::symbol::Symbol;
use num_bigint::BigInt;
use rust_decimal::Decimal;
use std::marker::PhantomData;
use std::str::FromStr;

pub const MISSING_SYMBOL: &str = "No symbol was provided for reading.";

/// Parses the symbols of one field into an `E`
pub trait ValueParser<E, V, T> {
    fn parse(&self, symbols: &[Symbol<V, T>], log: &mut DiagnosticLog) -> E;
}

impl<E, V, T, F> ValueParser<E, V, T> for F
where
    F: Fn(&[Symbol<V, T>], &mut DiagnosticLog) -> E,
{
    fn parse(&self, symbols: &[Symbol<V, T>], log: &mut DiagnosticLog) -> E {
        self(symbols, log)
    }
}

pub trait ValueParserExt<E, V, T>: ValueParser<E, V, T> + Sized {
    /// Convert the parsed value with `f`
    fn map<U, F: Fn(E) -> U>(self, f: F) -> Mapped<Self, F, E> {
        Mapped {
            inner: self,
            f,
            _marker: PhantomData,
        }
    }
}

impl<E, V, T, P: ValueParser<E, V, T>> ValueParserExt<E, V, T> for P {}

pub struct Mapped<P, F, E> {
    inner: P,
    f: F,
    _marker: PhantomData<fn() -> E>,
}

impl<E, U, V, T, P, F> ValueParser<U, V, T> for Mapped<P, F, E>
where
    P: ValueParser<E, V, T>,
    F: Fn(E) -> U,
{
    fn parse(&self, symbols: &[Symbol<V, T>], log: &mut DiagnosticLog) -> U {
        (self.f)(self.inner.parse(symbols, log))
    }
}

/// Concatenated, trimmed text of the symbols
pub fn symbol_text<V: AsRef<str>, T>(symbols: &[Symbol<V, T>]) -> String {
    let joined: String = symbols.iter().map(|s| s.value().as_ref()).collect();
    joined.trim().to_string()
}

/// Shared path for the scalar parsers
fn parse_scalar<E: Default, V: AsRef<str>, T>(
    symbols: &[Symbol<V, T>],
    log: &mut DiagnosticLog,
    kind: &str,
    convert: impl FnOnce(&str) -> Option<E>,
) -> E {
    if symbols.is_empty() {
        log.error_with_code(codes::values::MISSING_VALUE, MISSING_SYMBOL);
        return E::default();
    }

    let text = symbol_text(symbols);
    match convert(&text) {
        Some(value) => value,
        None => {
            log.error_with_code(
                codes::values::INVALID_VALUE,
                format!("Invalid {} symbol value: {}", kind, text),
            );
            E::default()
        }
    }
}

macro_rules! from_str_parser {
    ($(#[$doc:meta])* $name:ident, $output:ty, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl<V: AsRef<str>, T> ValueParser<$output, V, T> for $name {
            fn parse(&self, symbols: &[Symbol<V, T>], log: &mut DiagnosticLog) -> $output {
                parse_scalar(symbols, log, $kind, |text| text.parse::<$output>().ok())
            }
        }
    };
}

from_str_parser!(
    /// 32-bit signed integer
    IntegerParser, i32, "integer"
);
from_str_parser!(
    /// 64-bit signed integer
    LongParser, i64, "long"
);
from_str_parser!(DoubleParser, f64, "double");
from_str_parser!(BigIntegerParser, BigInt, "big integer");

/// Exact decimal; accepts plain and scientific notation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecimalParser;

impl<V: AsRef<str>, T> ValueParser<Decimal, V, T> for DecimalParser {
    fn parse(&self, symbols: &[Symbol<V, T>], log: &mut DiagnosticLog) -> Decimal {
        parse_scalar(symbols, log, "decimal", |text| {
            Decimal::from_str(text)
                .or_else(|_| Decimal::from_scientific(text))
                .ok()
        })
    }
}

/// `true`/`false` in any letter case
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolParser;

impl<V: AsRef<str>, T> ValueParser<bool, V, T> for BoolParser {
    fn parse(&self, symbols: &[Symbol<V, T>], log: &mut DiagnosticLog) -> bool {
        parse_scalar(symbols, log, "boolean", |text| {
            if text.eq_ignore_ascii_case("true") {
                Some(true)
            } else if text.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        })
    }
}

/// Trimmed text; an empty field is the empty string, not an error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextParser;

impl<V: AsRef<str>, T> ValueParser<String, V, T> for TextParser {
    fn parse(&self, symbols: &[Symbol<V, T>], _log: &mut DiagnosticLog) -> String {
        symbol_text(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticLevel;

    fn field(parts: &[&str]) -> Vec<Symbol<String, ()>> {
        parts.iter().map(|p| Symbol::new(p.to_string(), ())).collect()
    }

    fn first_message(log: &DiagnosticLog) -> &str {
        log.entries()[0].message.as_str()
    }

    #[test]
    fn test_integer_round_trip() {
        for value in [0, 7, -42, i32::MAX, i32::MIN] {
            let mut log = DiagnosticLog::new();
            let parsed: i32 = IntegerParser.parse(&field(&[value.to_string().as_str()]), &mut log);
            assert_eq!(parsed, value);
            assert!(!log.has_logs());
        }
    }

    #[test]
    fn test_double_round_trip() {
        for value in [0.0, 3.25, -1.5e-7, f64::MAX] {
            let mut log = DiagnosticLog::new();
            let parsed: f64 = DoubleParser.parse(&field(&[value.to_string().as_str()]), &mut log);
            assert_eq!(parsed, value);
            assert!(!log.has_logs());
        }
    }

    #[test]
    fn test_bool_round_trip_and_case() {
        let mut log = DiagnosticLog::new();
        for value in [true, false] {
            let parsed: bool = BoolParser.parse(&field(&[value.to_string().as_str()]), &mut log);
            assert_eq!(parsed, value);
        }
        let parsed: bool = BoolParser.parse(&field(&["TRUE"]), &mut log);
        assert!(parsed);
        assert!(!log.has_logs());
    }

    #[test]
    fn test_symbols_are_concatenated_and_trimmed() {
        let mut log = DiagnosticLog::new();
        let parsed: i64 = LongParser.parse(&field(&[" ", "-", "12", "34", "\t"]), &mut log);

        assert_eq!(parsed, -1234);
        assert!(!log.has_logs());
    }

    #[test]
    fn test_missing_symbols_log_error_and_default() {
        let mut log = DiagnosticLog::new();
        let parsed: i32 = IntegerParser.parse(&field(&[]), &mut log);

        assert_eq!(parsed, 0);
        assert_eq!(log.count_at(DiagnosticLevel::Error), 1);
        assert_eq!(first_message(&log), MISSING_SYMBOL);
    }

    #[test]
    fn test_malformed_value_names_kind_and_text() {
        let mut log = DiagnosticLog::new();
        let parsed: f64 = DoubleParser.parse(&field(&["1.2.3"]), &mut log);

        assert_eq!(parsed, 0.0);
        assert_eq!(first_message(&log), "Invalid double symbol value: 1.2.3");

        let mut log = DiagnosticLog::new();
        let parsed: bool = BoolParser.parse(&field(&["yes"]), &mut log);
        assert!(!parsed);
        assert_eq!(first_message(&log), "Invalid boolean symbol value: yes");
    }

    #[test]
    fn test_integer_overflow_is_malformed() {
        let mut log = DiagnosticLog::new();
        let parsed: i32 = IntegerParser.parse(&field(&["4294967296"]), &mut log);

        assert_eq!(parsed, 0);
        assert!(log.has_errors());
    }

    #[test]
    fn test_big_integer_and_decimal() {
        let mut log = DiagnosticLog::new();
        let big: BigInt =
            BigIntegerParser.parse(&field(&["123456789012345678901234567890"]), &mut log);
        assert_eq!(big.to_string(), "123456789012345678901234567890");

        let exact: Decimal = DecimalParser.parse(&field(&["0.1"]), &mut log);
        assert_eq!(exact.to_string(), "0.1");

        let scientific: Decimal = DecimalParser.parse(&field(&["2.5e3"]), &mut log);
        assert_eq!(scientific, Decimal::from(2500));
        assert!(!log.has_logs());
    }

    #[test]
    fn test_text_accepts_empty_field() {
        let mut log = DiagnosticLog::new();
        let text: String = TextParser.parse(&field(&[]), &mut log);
        assert_eq!(text, "");

        let text: String = TextParser.parse(&field(&[" a", "b "]), &mut log);
        assert_eq!(text, "ab");
        assert!(!log.has_logs());
    }

    #[test]
    fn test_closure_and_map_adapters() {
        let length = |symbols: &[Symbol<String, ()>], _: &mut DiagnosticLog| symbols.len();
        let mut log = DiagnosticLog::new();
        assert_eq!(length.parse(&field(&["a", "b"]), &mut log), 2);

        let doubled = ValueParserExt::<i32, String, ()>::map(IntegerParser, |v| v * 2);
        assert_eq!(doubled.parse(&field(&["21"]), &mut log), 42);
    }
}
