//! Maximal-munch tokenizer over classified characters
//!
//! The tokenizer is itself a [`SymbolSource`]: wrapped in a [`MementoReader`]
//! it offers the same peek/get/unget interface as the character reader it
//! consumes, so the tabular parser can run on either.

mod states;

pub use states::{Draft, DraftKind, LexState, Lexer};

use crate::classifier::{CharKind, CharSymbolReader, ClassifierBuilder};
use crate::config::runtime::TokenizerPreferences;
use crate::logging::codes;
use crate::reader::{MementoReader, SymbolReader, SymbolSource};
use crate::symbol::Symbol;
use crate::{log_debug, log_success};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Keyword(String),
    Integer,
    Double,
    Blanks,

    // Operators
    Equal,
    DoubleEqual,
    Plus,
    DoublePlus,
    PlusEqual,
    Minus,
    DoubleMinus,
    MinusEqual,
    Times,
    DoubleTimes,
    TimesEqual,
    Over,
    OverEqual,
    Colon,
    DoubleColon,
    BitwiseAnd,
    DoubleAnd,
    AndEqual,
    BitwiseOr,
    DoubleOr,
    OrEqual,
    LessThan,
    DoubleLess,
    TripleLess,
    LessEqual,
    GreatThan,
    DoubleGreat,
    TripleGreat,
    GreatEqual,

    LineComment,
    BlockComment,

    /// A character no token rule claims, carried with its class
    Char(CharKind),
    Eof,
}

impl TokenKind {
    pub fn is_number(&self) -> bool {
        matches!(self, TokenKind::Integer | TokenKind::Double)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::DoubleEqual
                | TokenKind::Plus
                | TokenKind::DoublePlus
                | TokenKind::PlusEqual
                | TokenKind::Minus
                | TokenKind::DoubleMinus
                | TokenKind::MinusEqual
                | TokenKind::Times
                | TokenKind::DoubleTimes
                | TokenKind::TimesEqual
                | TokenKind::Over
                | TokenKind::OverEqual
                | TokenKind::Colon
                | TokenKind::DoubleColon
                | TokenKind::BitwiseAnd
                | TokenKind::DoubleAnd
                | TokenKind::AndEqual
                | TokenKind::BitwiseOr
                | TokenKind::DoubleOr
                | TokenKind::OrEqual
                | TokenKind::LessThan
                | TokenKind::DoubleLess
                | TokenKind::TripleLess
                | TokenKind::LessEqual
                | TokenKind::GreatThan
                | TokenKind::DoubleGreat
                | TokenKind::TripleGreat
                | TokenKind::GreatEqual
        )
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// Counters for one tokenizer run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerMetrics {
    pub tokens: usize,
    pub identifiers: usize,
    pub keywords: usize,
    pub numbers: usize,
    pub operators: usize,
    pub comments: usize,
    /// Characters given back after a speculative read
    pub backtracks: usize,
}

impl TokenizerMetrics {
    fn record(&mut self, kind: &TokenKind, backtracks: usize) {
        self.backtracks += backtracks;
        if *kind == TokenKind::Eof {
            return;
        }

        self.tokens += 1;
        match kind {
            TokenKind::Identifier => self.identifiers += 1,
            TokenKind::Keyword(_) => self.keywords += 1,
            k if k.is_number() => self.numbers += 1,
            k if k.is_operator() => self.operators += 1,
            k if k.is_comment() => self.comments += 1,
            _ => {}
        }
    }
}

// ============================================================================
// TOKEN SOURCE
// ============================================================================

/// Symbol source producing one token per call
pub struct TokenSource<R> {
    input: R,
    lexer: Lexer,
    metrics: TokenizerMetrics,
    finished: bool,
}

impl<R: SymbolReader<String, CharKind>> TokenSource<R> {
    pub fn new(input: R, lexer: Lexer) -> Self {
        Self {
            input,
            lexer,
            metrics: TokenizerMetrics::default(),
            finished: false,
        }
    }

    pub fn metrics(&self) -> &TokenizerMetrics {
        &self.metrics
    }

    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    pub fn into_input(self) -> R {
        self.input
    }
}

impl<R: SymbolReader<String, CharKind>> SymbolSource for TokenSource<R> {
    type Value = String;
    type Kind = TokenKind;

    fn next_symbol(&mut self) -> Symbol<String, TokenKind> {
        let draft = self.lexer.run(&mut self.input);
        let backtracks = draft.backtracks;
        let token = draft.finish(&self.lexer.keywords);
        self.metrics.record(token.kind(), backtracks);

        if *token.kind() == TokenKind::Eof && !self.finished {
            self.finished = true;
            log_debug!("Tokenizer metrics",
                "identifiers" => self.metrics.identifiers,
                "keywords" => self.metrics.keywords,
                "numbers" => self.metrics.numbers,
                "operators" => self.metrics.operators,
                "comments" => self.metrics.comments,
                "backtracks" => self.metrics.backtracks
            );
            log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization complete",
                "tokens" => self.metrics.tokens
            );
        }
        token
    }

    fn is_end_symbol(&self, symbol: &Symbol<String, TokenKind>) -> bool {
        *symbol.kind() == TokenKind::Eof
    }
}

/// Backtrackable token reader
pub type Tokenizer<R> = MementoReader<TokenSource<R>>;

// ============================================================================
// BUILDER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct TokenizerBuilder {
    keywords: HashMap<String, TokenKind>,
    preferences: TokenizerPreferences,
}

impl TokenizerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(preferences: TokenizerPreferences) -> Self {
        Self {
            keywords: HashMap::new(),
            preferences,
        }
    }

    /// Identifiers spelled `word` are emitted with `kind` instead
    pub fn register_keyword(&mut self, word: impl Into<String>, kind: TokenKind) -> &mut Self {
        self.keywords.insert(word.into(), kind);
        self
    }

    pub fn unregister_keyword(&mut self, word: &str) -> &mut Self {
        self.keywords.remove(word);
        self
    }

    pub fn clear_keywords(&mut self) -> &mut Self {
        self.keywords.clear();
        self
    }

    pub fn read_negative_numbers(&mut self, enabled: bool) -> &mut Self {
        self.preferences.read_negative_numbers = enabled;
        self
    }

    pub fn join_blanks(&mut self, enabled: bool) -> &mut Self {
        self.preferences.join_blanks = enabled;
        self
    }

    pub fn recognize_comments(&mut self, enabled: bool) -> &mut Self {
        self.preferences.recognize_comments = enabled;
        self
    }

    pub fn preferences(&self) -> &TokenizerPreferences {
        &self.preferences
    }

    pub fn lexer(&self) -> Lexer {
        Lexer::new(self.keywords.clone(), self.preferences.clone())
    }

    pub fn build<R: SymbolReader<String, CharKind>>(&self, input: R) -> Tokenizer<R> {
        MementoReader::new(TokenSource::new(input, self.lexer()))
    }

    /// Tokenize text classified with [`ClassifierBuilder::cpp_compliant`]
    pub fn build_from_str<'a>(
        &self,
        text: &'a str,
    ) -> Tokenizer<CharSymbolReader<std::str::Chars<'a>, CharKind>> {
        self.build(ClassifierBuilder::cpp_compliant().reader_from_str(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_all;

    fn tokens_with(builder: &TokenizerBuilder, text: &str) -> Vec<(TokenKind, String)> {
        let mut tokenizer = builder.build_from_str(text);
        read_all(&mut tokenizer)
            .into_iter()
            .map(|token| {
                let (value, kind) = token.into_parts();
                (kind, value)
            })
            .collect()
    }

    fn tokens(text: &str) -> Vec<(TokenKind, String)> {
        tokens_with(&TokenizerBuilder::new(), text)
    }

    fn t(kind: TokenKind, value: &str) -> (TokenKind, String) {
        (kind, value.to_string())
    }

    #[test]
    fn test_point_without_digit_is_pushed_back() {
        assert_eq!(
            tokens("3.x"),
            vec![
                t(TokenKind::Integer, "3"),
                t(TokenKind::Char(CharKind::Point), "."),
                t(TokenKind::Identifier, "x"),
            ]
        );
    }

    #[test]
    fn test_incomplete_signed_exponent_backtracks_two() {
        assert_eq!(
            tokens("2e-x"),
            vec![
                t(TokenKind::Integer, "2"),
                t(TokenKind::Identifier, "e"),
                t(TokenKind::Minus, "-"),
                t(TokenKind::Identifier, "x"),
            ]
        );
    }

    #[test]
    fn test_double_minus_after_exponent_marker() {
        assert_eq!(
            tokens("2e--3"),
            vec![
                t(TokenKind::Integer, "2"),
                t(TokenKind::Identifier, "e"),
                t(TokenKind::DoubleMinus, "--"),
                t(TokenKind::Integer, "3"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("12 3.25 1e5 2.5E-3 7e"),
            vec![
                t(TokenKind::Integer, "12"),
                t(TokenKind::Blanks, " "),
                t(TokenKind::Double, "3.25"),
                t(TokenKind::Blanks, " "),
                t(TokenKind::Double, "1e5"),
                t(TokenKind::Blanks, " "),
                t(TokenKind::Double, "2.5E-3"),
                t(TokenKind::Blanks, " "),
                t(TokenKind::Integer, "7"),
                t(TokenKind::Identifier, "e"),
            ]
        );
    }

    #[test]
    fn test_second_exponent_continues_the_number() {
        assert_eq!(tokens("1e2e3"), vec![t(TokenKind::Double, "1e2e3")]);
        assert_eq!(tokens("1.5e-2E4"), vec![t(TokenKind::Double, "1.5e-2E4")]);
    }

    #[test]
    fn test_dangling_second_exponent_is_pushed_back() {
        assert_eq!(
            tokens("1e2e;"),
            vec![
                t(TokenKind::Double, "1e2"),
                t(TokenKind::Identifier, "e"),
                t(TokenKind::Char(CharKind::SemiColon), ";"),
            ]
        );
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(
            tokens("-5 -.5 -x"),
            vec![
                t(TokenKind::Integer, "-5"),
                t(TokenKind::Blanks, " "),
                t(TokenKind::Double, "-.5"),
                t(TokenKind::Blanks, " "),
                t(TokenKind::Minus, "-"),
                t(TokenKind::Identifier, "x"),
            ]
        );

        let mut builder = TokenizerBuilder::new();
        builder.read_negative_numbers(false);
        assert_eq!(
            tokens_with(&builder, "-5"),
            vec![t(TokenKind::Minus, "-"), t(TokenKind::Integer, "5")]
        );
    }

    #[test]
    fn test_minus_point_without_digit() {
        assert_eq!(
            tokens("-.a"),
            vec![
                t(TokenKind::Minus, "-"),
                t(TokenKind::Char(CharKind::Point), "."),
                t(TokenKind::Identifier, "a"),
            ]
        );
    }

    #[test]
    fn test_compound_operators() {
        let kinds: Vec<TokenKind> = tokens("== += -= *= /= &= |= <= >= ++ -- ** && || :: << >> <<< >>>")
            .into_iter()
            .map(|(kind, _)| kind)
            .filter(|kind| *kind != TokenKind::Blanks)
            .collect();

        assert_eq!(
            kinds,
            vec![
                TokenKind::DoubleEqual,
                TokenKind::PlusEqual,
                TokenKind::MinusEqual,
                TokenKind::TimesEqual,
                TokenKind::OverEqual,
                TokenKind::AndEqual,
                TokenKind::OrEqual,
                TokenKind::LessEqual,
                TokenKind::GreatEqual,
                TokenKind::DoublePlus,
                TokenKind::DoubleMinus,
                TokenKind::DoubleTimes,
                TokenKind::DoubleAnd,
                TokenKind::DoubleOr,
                TokenKind::DoubleColon,
                TokenKind::DoubleLess,
                TokenKind::DoubleGreat,
                TokenKind::TripleLess,
                TokenKind::TripleGreat,
            ]
        );
    }

    #[test]
    fn test_doubled_forms_do_not_take_equal() {
        assert_eq!(
            tokens("||=:="),
            vec![
                t(TokenKind::DoubleOr, "||"),
                t(TokenKind::Equal, "="),
                t(TokenKind::Colon, ":"),
                t(TokenKind::Equal, "="),
            ]
        );
        assert_eq!(
            tokens("==="),
            vec![t(TokenKind::DoubleEqual, "=="), t(TokenKind::Equal, "=")]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            tokens("a // note\n/* b */c/* open"),
            vec![
                t(TokenKind::Identifier, "a"),
                t(TokenKind::Blanks, " "),
                t(TokenKind::LineComment, "// note"),
                t(TokenKind::Blanks, "\n"),
                t(TokenKind::BlockComment, "/* b */"),
                t(TokenKind::Identifier, "c"),
                t(TokenKind::BlockComment, "/* open"),
            ]
        );

        let mut builder = TokenizerBuilder::new();
        builder.recognize_comments(false);
        assert_eq!(
            tokens_with(&builder, "//"),
            vec![t(TokenKind::Over, "/"), t(TokenKind::Over, "/")]
        );
    }

    #[test]
    fn test_blanks_joined_or_split() {
        assert_eq!(
            tokens("a \t b"),
            vec![
                t(TokenKind::Identifier, "a"),
                t(TokenKind::Blanks, " \t "),
                t(TokenKind::Identifier, "b"),
            ]
        );

        let mut builder = TokenizerBuilder::new();
        builder.join_blanks(false);
        assert_eq!(
            tokens_with(&builder, " \n"),
            vec![
                t(TokenKind::Char(CharKind::Space), " "),
                t(TokenKind::Char(CharKind::NewLine), "\n"),
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let mut builder = TokenizerBuilder::new();
        builder
            .register_keyword("while", TokenKind::Keyword("while".into()))
            .register_keyword("do", TokenKind::Keyword("do".into()));
        builder.unregister_keyword("do");

        assert_eq!(
            tokens_with(&builder, "while do _x1"),
            vec![
                t(TokenKind::Keyword("while".into()), "while"),
                t(TokenKind::Blanks, " "),
                t(TokenKind::Identifier, "do"),
                t(TokenKind::Blanks, " "),
                t(TokenKind::Identifier, "_x1"),
            ]
        );
    }

    #[test]
    fn test_unclaimed_characters_keep_their_class() {
        assert_eq!(
            tokens("(é;"),
            vec![
                t(TokenKind::Char(CharKind::LeftParenthesis), "("),
                t(TokenKind::Char(CharKind::Any), "é"),
                t(TokenKind::Char(CharKind::SemiColon), ";"),
            ]
        );
    }

    #[test]
    fn test_tokenizer_is_a_backtrackable_reader() {
        let mut tokenizer = TokenizerBuilder::new().build_from_str("a+b");

        let first = tokenizer.get();
        assert_eq!(*tokenizer.peek().kind(), TokenKind::Plus);
        tokenizer.unget();
        assert_eq!(tokenizer.get(), first);

        read_all(&mut tokenizer);
        assert!(tokenizer.is_at_end());
        assert_eq!(*tokenizer.get().kind(), TokenKind::Eof);
    }

    #[test]
    fn test_metrics() {
        let mut builder = TokenizerBuilder::new();
        builder.register_keyword("let", TokenKind::Keyword("let".into()));
        let mut tokenizer = builder.build_from_str("let x = 3.x // c");
        read_all(&mut tokenizer);

        let metrics = tokenizer.source().metrics();
        assert_eq!(metrics.keywords, 1);
        assert_eq!(metrics.identifiers, 2);
        assert_eq!(metrics.numbers, 1);
        assert_eq!(metrics.operators, 1);
        assert_eq!(metrics.comments, 1);
        assert_eq!(metrics.backtracks, 1);
        assert_eq!(metrics.tokens, 11);
    }
}
