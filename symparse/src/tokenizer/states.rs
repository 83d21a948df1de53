//! Lexer states and their transition functions
//!
//! Each call to [`Lexer::step`] consumes at most one classified character,
//! updates the [`Draft`] token and names the next state. A token is complete
//! when the machine reaches [`LexState::End`].

use super::TokenKind;
use crate::classifier::CharKind;
use crate::config::runtime::TokenizerPreferences;
use crate::reader::SymbolReader;
use crate::symbol::Symbol;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexState {
    Start,
    Identifier,
    Number,
    Equal,
    Greater,
    Lesser,
    Or,
    And,
    Colon,
    Plus,
    Minus,
    Times,
    Over,
    Point,
    Blanks,
    Exponent,
    LineComment,
    BlockComment,
    End,
}

/// Provisional classification of the token being built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftKind {
    Empty,
    Token(TokenKind),
    /// Digits followed by `e`/`E`
    Exponent,
    /// Digits followed by `e-`
    ExponentMinus,
    /// A `-.` prefix waiting for a digit
    MinusPoint,
}

/// Token under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    pub kind: DraftKind,
    pub backtracks: usize,
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

impl Draft {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            kind: DraftKind::Empty,
            backtracks: 0,
        }
    }

    fn push(&mut self, symbol: &Symbol<String, CharKind>) {
        self.text.push_str(symbol.value());
    }

    /// Drop the last `count` characters
    fn retract(&mut self, count: usize) {
        for _ in 0..count {
            self.text.pop();
        }
        self.backtracks += 1;
    }

    fn is(&self, kind: &TokenKind) -> bool {
        matches!(&self.kind, DraftKind::Token(current) if current == kind)
    }

    fn set(&mut self, kind: TokenKind) {
        self.kind = DraftKind::Token(kind);
    }

    /// Settle the provisional kind and apply the keyword table
    pub fn finish(self, keywords: &HashMap<String, TokenKind>) -> Symbol<String, TokenKind> {
        let kind = match self.kind {
            DraftKind::Token(TokenKind::Identifier) => keywords
                .get(&self.text)
                .cloned()
                .unwrap_or(TokenKind::Identifier),
            DraftKind::Token(kind) => kind,
            DraftKind::Exponent | DraftKind::ExponentMinus => TokenKind::Double,
            DraftKind::MinusPoint => TokenKind::Minus,
            DraftKind::Empty => TokenKind::Eof,
        };
        Symbol::new(self.text, kind)
    }
}

/// Repeatable single-character operator: `+` `++` `+=`, `<` `<<` `<<<` `<=` and so on
struct Operator {
    symbol: CharKind,
    single: TokenKind,
    double: TokenKind,
    triple: Option<TokenKind>,
    takes_equal: bool,
    state: LexState,
}

const GREATER: Operator = Operator {
    symbol: CharKind::GreatThan,
    single: TokenKind::GreatThan,
    double: TokenKind::DoubleGreat,
    triple: Some(TokenKind::TripleGreat),
    takes_equal: true,
    state: LexState::Greater,
};

const LESSER: Operator = Operator {
    symbol: CharKind::LessThan,
    single: TokenKind::LessThan,
    double: TokenKind::DoubleLess,
    triple: Some(TokenKind::TripleLess),
    takes_equal: true,
    state: LexState::Lesser,
};

const OR: Operator = Operator {
    symbol: CharKind::BitwiseOr,
    single: TokenKind::BitwiseOr,
    double: TokenKind::DoubleOr,
    triple: None,
    takes_equal: true,
    state: LexState::Or,
};

const AND: Operator = Operator {
    symbol: CharKind::BitwiseAnd,
    single: TokenKind::BitwiseAnd,
    double: TokenKind::DoubleAnd,
    triple: None,
    takes_equal: true,
    state: LexState::And,
};

const COLON: Operator = Operator {
    symbol: CharKind::Colon,
    single: TokenKind::Colon,
    double: TokenKind::DoubleColon,
    triple: None,
    takes_equal: false,
    state: LexState::Colon,
};

const PLUS: Operator = Operator {
    symbol: CharKind::Plus,
    single: TokenKind::Plus,
    double: TokenKind::DoublePlus,
    triple: None,
    takes_equal: true,
    state: LexState::Plus,
};

const MINUS: Operator = Operator {
    symbol: CharKind::Minus,
    single: TokenKind::Minus,
    double: TokenKind::DoubleMinus,
    triple: None,
    takes_equal: true,
    state: LexState::Minus,
};

const TIMES: Operator = Operator {
    symbol: CharKind::Times,
    single: TokenKind::Times,
    double: TokenKind::DoubleTimes,
    triple: None,
    takes_equal: true,
    state: LexState::Times,
};

fn is_exponent_marker(text: &str) -> bool {
    text == "e" || text == "E"
}

/// The transition table; configuration is fixed once built
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    pub(crate) keywords: HashMap<String, TokenKind>,
    pub(crate) preferences: TokenizerPreferences,
}

impl Lexer {
    pub fn new(keywords: HashMap<String, TokenKind>, preferences: TokenizerPreferences) -> Self {
        Self {
            keywords,
            preferences,
        }
    }

    pub fn keywords(&self) -> &HashMap<String, TokenKind> {
        &self.keywords
    }

    pub fn preferences(&self) -> &TokenizerPreferences {
        &self.preferences
    }

    /// Run the machine from `Start` to `End` and return the finished draft
    pub fn run<R: SymbolReader<String, CharKind>>(&self, reader: &mut R) -> Draft {
        let mut draft = Draft::new();
        let mut state = LexState::Start;
        while state != LexState::End {
            state = self.step(state, &mut draft, reader);
        }
        draft
    }

    pub fn step<R: SymbolReader<String, CharKind>>(
        &self,
        state: LexState,
        draft: &mut Draft,
        reader: &mut R,
    ) -> LexState {
        match state {
            LexState::Start => self.start(draft, reader),
            LexState::Identifier => self.identifier(draft, reader),
            LexState::Number => self.number(draft, reader),
            LexState::Equal => self.equal(draft, reader),
            LexState::Greater => self.operator(&GREATER, draft, reader),
            LexState::Lesser => self.operator(&LESSER, draft, reader),
            LexState::Or => self.operator(&OR, draft, reader),
            LexState::And => self.operator(&AND, draft, reader),
            LexState::Colon => self.operator(&COLON, draft, reader),
            LexState::Plus => self.operator(&PLUS, draft, reader),
            LexState::Minus => self.minus(draft, reader),
            LexState::Times => self.operator(&TIMES, draft, reader),
            LexState::Over => self.over(draft, reader),
            LexState::Point => self.point(draft, reader),
            LexState::Blanks => self.blanks(draft, reader),
            LexState::Exponent => self.exponent(draft, reader),
            LexState::LineComment => self.line_comment(draft, reader),
            LexState::BlockComment => self.block_comment(draft, reader),
            LexState::End => LexState::End,
        }
    }

    // ========================================================================
    // STATE TRANSITIONS
    // ========================================================================

    fn start<R: SymbolReader<String, CharKind>>(&self, draft: &mut Draft, reader: &mut R) -> LexState {
        let next = reader.peek();
        if reader.is_end_symbol(&next) {
            draft.text.clear();
            draft.set(TokenKind::Eof);
            return LexState::End;
        }

        match *next.kind() {
            CharKind::Alpha | CharKind::Underscore => LexState::Identifier,
            CharKind::Digit => LexState::Number,
            CharKind::Equal => LexState::Equal,
            CharKind::GreatThan => LexState::Greater,
            CharKind::LessThan => LexState::Lesser,
            CharKind::BitwiseOr => LexState::Or,
            CharKind::BitwiseAnd => LexState::And,
            CharKind::Colon => LexState::Colon,
            CharKind::Plus => LexState::Plus,
            CharKind::Minus => LexState::Minus,
            CharKind::Times => LexState::Times,
            CharKind::Slash => LexState::Over,
            CharKind::Point => LexState::Point,
            kind if kind.is_whitespace() && self.preferences.join_blanks => LexState::Blanks,
            kind => {
                let symbol = reader.get();
                draft.push(&symbol);
                draft.set(TokenKind::Char(kind));
                LexState::End
            }
        }
    }

    fn identifier<R: SymbolReader<String, CharKind>>(
        &self,
        draft: &mut Draft,
        reader: &mut R,
    ) -> LexState {
        let symbol = reader.get();
        draft.push(&symbol);
        draft.set(TokenKind::Identifier);

        if reader.peek().kind().is_word() {
            LexState::Identifier
        } else {
            LexState::End
        }
    }

    fn number<R: SymbolReader<String, CharKind>>(&self, draft: &mut Draft, reader: &mut R) -> LexState {
        let symbol = reader.get();
        if draft.kind == DraftKind::Empty || draft.is(&TokenKind::Minus) {
            draft.set(TokenKind::Integer);
        }
        draft.push(&symbol);

        let next = reader.peek();
        match *next.kind() {
            CharKind::Digit => LexState::Number,
            CharKind::Point if draft.is(&TokenKind::Integer) => LexState::Point,
            CharKind::Alpha
                if is_exponent_marker(next.value())
                    && (draft.is(&TokenKind::Integer)
                        || draft.is(&TokenKind::Double)
                        || draft.kind == DraftKind::Exponent) =>
            {
                LexState::Exponent
            }
            _ => {
                if draft.kind == DraftKind::Exponent {
                    draft.set(TokenKind::Double);
                }
                LexState::End
            }
        }
    }

    fn point<R: SymbolReader<String, CharKind>>(&self, draft: &mut Draft, reader: &mut R) -> LexState {
        let symbol = reader.get();
        draft.push(&symbol);
        if draft.is(&TokenKind::Minus) {
            draft.kind = DraftKind::MinusPoint;
        } else if draft.is(&TokenKind::Integer) {
            draft.set(TokenKind::Double);
        } else {
            draft.set(TokenKind::Char(CharKind::Point));
        }

        if *reader.peek().kind() == CharKind::Digit {
            draft.set(TokenKind::Double);
            return LexState::Number;
        }

        // No digit after the point: give it back.
        if draft.kind == DraftKind::MinusPoint {
            draft.set(TokenKind::Minus);
            draft.retract(1);
            reader.unget();
        } else if draft.is(&TokenKind::Double) {
            draft.set(TokenKind::Integer);
            draft.retract(1);
            reader.unget();
        }
        LexState::End
    }

    fn exponent<R: SymbolReader<String, CharKind>>(
        &self,
        draft: &mut Draft,
        reader: &mut R,
    ) -> LexState {
        let symbol = reader.get();
        if draft.kind != DraftKind::ExponentMinus {
            draft.kind = DraftKind::Exponent;
        }
        draft.push(&symbol);

        let next = reader.peek();
        if *next.kind() == CharKind::Minus && draft.kind == DraftKind::Exponent {
            draft.kind = DraftKind::ExponentMinus;
            return LexState::Exponent;
        }
        if *next.kind() == CharKind::Digit {
            draft.kind = DraftKind::Exponent;
            return LexState::Number;
        }

        // Not an exponent after all: retract the marker, and the sign if one was read.
        reader.unget();
        if draft.kind == DraftKind::Exponent {
            draft.retract(1);
        } else {
            draft.retract(2);
            reader.unget();
        }
        if draft.text.contains(['.', 'e', 'E']) {
            draft.set(TokenKind::Double);
        } else {
            draft.set(TokenKind::Integer);
        }
        LexState::End
    }

    fn blanks<R: SymbolReader<String, CharKind>>(&self, draft: &mut Draft, reader: &mut R) -> LexState {
        let symbol = reader.get();
        draft.push(&symbol);
        draft.set(TokenKind::Blanks);

        if reader.peek().kind().is_whitespace() {
            LexState::Blanks
        } else {
            LexState::End
        }
    }

    fn equal<R: SymbolReader<String, CharKind>>(&self, draft: &mut Draft, reader: &mut R) -> LexState {
        let symbol = reader.get();
        let compound = match &draft.kind {
            DraftKind::Token(TokenKind::Equal) => Some(TokenKind::DoubleEqual),
            DraftKind::Token(TokenKind::Plus) => Some(TokenKind::PlusEqual),
            DraftKind::Token(TokenKind::Minus) => Some(TokenKind::MinusEqual),
            DraftKind::Token(TokenKind::Times) => Some(TokenKind::TimesEqual),
            DraftKind::Token(TokenKind::Over) => Some(TokenKind::OverEqual),
            DraftKind::Token(TokenKind::BitwiseOr) => Some(TokenKind::OrEqual),
            DraftKind::Token(TokenKind::BitwiseAnd) => Some(TokenKind::AndEqual),
            DraftKind::Token(TokenKind::GreatThan) => Some(TokenKind::GreatEqual),
            DraftKind::Token(TokenKind::LessThan) => Some(TokenKind::LessEqual),
            _ => None,
        };
        draft.push(&symbol);

        match compound {
            Some(kind) => {
                draft.set(kind);
                LexState::End
            }
            None => {
                draft.set(TokenKind::Equal);
                if *reader.peek().kind() == CharKind::Equal {
                    LexState::Equal
                } else {
                    LexState::End
                }
            }
        }
    }

    fn operator<R: SymbolReader<String, CharKind>>(
        &self,
        op: &Operator,
        draft: &mut Draft,
        reader: &mut R,
    ) -> LexState {
        let symbol = reader.get();
        let kind = match &op.triple {
            Some(triple) if draft.is(&op.double) => triple.clone(),
            _ if draft.is(&op.single) => op.double.clone(),
            _ => op.single.clone(),
        };
        draft.push(&symbol);
        draft.set(kind);

        let next = reader.peek();
        let can_repeat = draft.is(&op.single) || (op.triple.is_some() && draft.is(&op.double));
        if *next.kind() == op.symbol && can_repeat {
            return op.state;
        }
        if *next.kind() == CharKind::Equal && op.takes_equal && draft.is(&op.single) {
            return LexState::Equal;
        }
        LexState::End
    }

    fn minus<R: SymbolReader<String, CharKind>>(&self, draft: &mut Draft, reader: &mut R) -> LexState {
        let next_state = self.operator(&MINUS, draft, reader);
        if next_state != LexState::End
            || !draft.is(&TokenKind::Minus)
            || !self.preferences.read_negative_numbers
        {
            return next_state;
        }

        match *reader.peek().kind() {
            CharKind::Digit => LexState::Number,
            CharKind::Point => LexState::Point,
            _ => LexState::End,
        }
    }

    fn over<R: SymbolReader<String, CharKind>>(&self, draft: &mut Draft, reader: &mut R) -> LexState {
        let symbol = reader.get();
        draft.push(&symbol);
        draft.set(TokenKind::Over);

        match *reader.peek().kind() {
            CharKind::Equal => LexState::Equal,
            CharKind::Slash if self.preferences.recognize_comments => LexState::LineComment,
            CharKind::Times if self.preferences.recognize_comments => LexState::BlockComment,
            _ => LexState::End,
        }
    }

    /// `//` up to, not including, the line break
    fn line_comment<R: SymbolReader<String, CharKind>>(
        &self,
        draft: &mut Draft,
        reader: &mut R,
    ) -> LexState {
        let symbol = reader.get();
        draft.push(&symbol);
        draft.set(TokenKind::LineComment);

        let next = reader.peek();
        if reader.is_end_symbol(&next)
            || matches!(next.kind(), CharKind::NewLine | CharKind::CarriageReturn)
        {
            LexState::End
        } else {
            LexState::LineComment
        }
    }

    /// `/*` through the closing `*/`, or to end of input when unterminated
    fn block_comment<R: SymbolReader<String, CharKind>>(
        &self,
        draft: &mut Draft,
        reader: &mut R,
    ) -> LexState {
        let symbol = reader.get();
        draft.push(&symbol);
        draft.set(TokenKind::BlockComment);

        // "/*/" must not close itself, hence the length check.
        if draft.text.len() >= 4 && draft.text.ends_with("*/") {
            return LexState::End;
        }
        if reader.is_at_end() {
            LexState::End
        } else {
            LexState::BlockComment
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ArraySymbolReader;

    /// Classified input built by hand, so each state can be driven in isolation
    fn classified(text: &str) -> ArraySymbolReader<String, CharKind> {
        let table = crate::classifier::ClassifierBuilder::cpp_compliant().table();
        let symbols = text
            .chars()
            .map(|c| Symbol::new(c.to_string(), table.classify(c)))
            .collect();
        ArraySymbolReader::from_symbols(symbols, Symbol::new(String::new(), CharKind::Eof))
    }

    fn draft(text: &str, kind: DraftKind) -> Draft {
        Draft {
            text: text.to_string(),
            kind,
            backtracks: 0,
        }
    }

    fn lexer() -> Lexer {
        Lexer::new(
            HashMap::new(),
            TokenizerPreferences {
                read_negative_numbers: true,
                join_blanks: true,
                recognize_comments: true,
            },
        )
    }

    #[test]
    fn test_start_dispatches_on_lookahead_without_consuming() {
        let lexer = lexer();
        let mut reader = classified("9");
        let mut current = Draft::new();

        let next = lexer.step(LexState::Start, &mut current, &mut reader);

        assert_eq!(next, LexState::Number);
        assert_eq!(reader.position(), 0);
        assert!(current.text.is_empty());
    }

    #[test]
    fn test_start_at_end_yields_eof() {
        let lexer = lexer();
        let mut reader = classified("");
        let mut current = Draft::new();

        assert_eq!(lexer.step(LexState::Start, &mut current, &mut reader), LexState::End);
        assert_eq!(current.kind, DraftKind::Token(TokenKind::Eof));
    }

    #[test]
    fn test_point_without_digit_reverts_to_integer() {
        let lexer = lexer();
        let mut reader = classified(".x");
        let mut current = draft("3", DraftKind::Token(TokenKind::Integer));

        let next = lexer.step(LexState::Point, &mut current, &mut reader);

        assert_eq!(next, LexState::End);
        assert_eq!(current.text, "3");
        assert_eq!(current.kind, DraftKind::Token(TokenKind::Integer));
        assert_eq!(reader.position(), 0);
        assert_eq!(current.backtracks, 1);
    }

    #[test]
    fn test_point_followed_by_digit_promotes_to_double() {
        let lexer = lexer();
        let mut reader = classified(".5");
        let mut current = draft("3", DraftKind::Token(TokenKind::Integer));

        assert_eq!(lexer.step(LexState::Point, &mut current, &mut reader), LexState::Number);
        assert_eq!(current.text, "3.");
        assert_eq!(current.kind, DraftKind::Token(TokenKind::Double));
    }

    #[test]
    fn test_exponent_with_sign_then_letter_retracts_two() {
        let lexer = lexer();
        let mut reader = classified("e-x");
        let mut current = draft("2", DraftKind::Token(TokenKind::Integer));

        assert_eq!(lexer.step(LexState::Exponent, &mut current, &mut reader), LexState::Exponent);
        assert_eq!(current.kind, DraftKind::ExponentMinus);

        assert_eq!(lexer.step(LexState::Exponent, &mut current, &mut reader), LexState::End);
        assert_eq!(current.text, "2");
        assert_eq!(current.kind, DraftKind::Token(TokenKind::Integer));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_exponent_followed_by_digit_continues_number() {
        let lexer = lexer();
        let mut reader = classified("e7");
        let mut current = draft("1.5", DraftKind::Token(TokenKind::Double));

        assert_eq!(lexer.step(LexState::Exponent, &mut current, &mut reader), LexState::Number);
        assert_eq!(lexer.step(LexState::Number, &mut current, &mut reader), LexState::End);
        assert_eq!(current.text, "1.5e7");
        assert_eq!(current.kind, DraftKind::Token(TokenKind::Double));
    }

    #[test]
    fn test_equal_state_builds_compound_from_operator() {
        let lexer = lexer();
        let mut reader = classified("=");
        let mut current = draft("<", DraftKind::Token(TokenKind::LessThan));

        assert_eq!(lexer.step(LexState::Equal, &mut current, &mut reader), LexState::End);
        assert_eq!(current.text, "<=");
        assert_eq!(current.kind, DraftKind::Token(TokenKind::LessEqual));
    }

    #[test]
    fn test_greater_promotes_up_to_triple() {
        let lexer = lexer();
        let mut reader = classified(">>>>");
        let mut current = Draft::new();

        let mut state = LexState::Greater;
        while state != LexState::End {
            state = lexer.step(state, &mut current, &mut reader);
        }

        assert_eq!(current.text, ">>>");
        assert_eq!(current.kind, DraftKind::Token(TokenKind::TripleGreat));
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn test_minus_hands_digit_to_number_when_negatives_enabled() {
        let mut reader = classified("-4");
        let mut current = Draft::new();
        assert_eq!(lexer().step(LexState::Minus, &mut current, &mut reader), LexState::Number);

        let mut plain = lexer();
        plain.preferences.read_negative_numbers = false;
        let mut reader = classified("-4");
        let mut current = Draft::new();
        assert_eq!(plain.step(LexState::Minus, &mut current, &mut reader), LexState::End);
        assert_eq!(current.kind, DraftKind::Token(TokenKind::Minus));
    }

    #[test]
    fn test_block_comment_does_not_close_on_shared_star() {
        let lexer = lexer();
        let mut reader = classified("/*/ x */");
        let finished = lexer.run(&mut reader).finish(&HashMap::new());

        assert_eq!(finished, Symbol::new("/*/ x */".to_string(), TokenKind::BlockComment));
    }

    #[test]
    fn test_finish_applies_keywords_to_identifiers_only() {
        let mut keywords = HashMap::new();
        keywords.insert("if".to_string(), TokenKind::Keyword("if".to_string()));

        let word = draft("if", DraftKind::Token(TokenKind::Identifier)).finish(&keywords);
        assert_eq!(*word.kind(), TokenKind::Keyword("if".to_string()));

        let number = draft("if", DraftKind::Token(TokenKind::Integer)).finish(&keywords);
        assert_eq!(*number.kind(), TokenKind::Integer);
    }
}
