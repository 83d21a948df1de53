use super::ClassifierBuilder;
use serde::{Deserialize, Serialize};

/// Character classes understood by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharKind {
    Alpha,
    Digit,
    Underscore,
    LeftParenthesis,
    RightParenthesis,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    DoubleQuote,
    Quote,
    Plus,
    Minus,
    Times,
    Slash,
    Backslash,
    Point,
    Colon,
    SemiColon,
    Comma,
    Tilde,
    Hat,
    QuestionMark,
    ExclamationMark,
    LessThan,
    GreatThan,
    BitwiseOr,
    BitwiseAnd,
    Equal,
    At,
    Cardinal,
    Dollar,
    Percent,
    Pound,
    Chapter,
    Euro,
    Space,
    NewLine,
    Tab,
    CarriageReturn,
    Any,
    Eof,
}

impl CharKind {
    pub fn is_whitespace(self) -> bool {
        matches!(
            self,
            CharKind::Space | CharKind::NewLine | CharKind::Tab | CharKind::CarriageReturn
        )
    }

    /// Classes that may continue an identifier
    pub fn is_word(self) -> bool {
        matches!(self, CharKind::Alpha | CharKind::Underscore | CharKind::Digit)
    }
}

const PUNCTUATION: &[(char, CharKind)] = &[
    ('_', CharKind::Underscore),
    ('(', CharKind::LeftParenthesis),
    (')', CharKind::RightParenthesis),
    ('[', CharKind::LeftBracket),
    (']', CharKind::RightBracket),
    ('{', CharKind::LeftBrace),
    ('}', CharKind::RightBrace),
    ('"', CharKind::DoubleQuote),
    ('\'', CharKind::Quote),
    ('+', CharKind::Plus),
    ('-', CharKind::Minus),
    ('*', CharKind::Times),
    ('/', CharKind::Slash),
    ('\\', CharKind::Backslash),
    ('.', CharKind::Point),
    (':', CharKind::Colon),
    (';', CharKind::SemiColon),
    (',', CharKind::Comma),
    ('~', CharKind::Tilde),
    ('^', CharKind::Hat),
    ('?', CharKind::QuestionMark),
    ('!', CharKind::ExclamationMark),
    ('<', CharKind::LessThan),
    ('>', CharKind::GreatThan),
    ('|', CharKind::BitwiseOr),
    ('&', CharKind::BitwiseAnd),
    ('=', CharKind::Equal),
    ('@', CharKind::At),
    ('#', CharKind::Cardinal),
    ('$', CharKind::Dollar),
    ('%', CharKind::Percent),
    ('£', CharKind::Pound),
    ('§', CharKind::Chapter),
    ('€', CharKind::Euro),
    (' ', CharKind::Space),
    ('\n', CharKind::NewLine),
    ('\t', CharKind::Tab),
    ('\r', CharKind::CarriageReturn),
];

impl ClassifierBuilder<CharKind> {
    /// Classifier for C-like source text: ASCII letters, digits and the usual punctuation
    pub fn cpp_compliant() -> Self {
        let mut builder = ClassifierBuilder::new(CharKind::Any, CharKind::Eof);
        for &(c, kind) in PUNCTUATION {
            builder.register_char(c, kind);
        }
        builder.set_fallback(|c| {
            if c.is_ascii_alphabetic() {
                Some(CharKind::Alpha)
            } else if c.is_ascii_digit() {
                Some(CharKind::Digit)
            } else {
                None
            }
        });
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpp_compliant_classes() {
        let table = ClassifierBuilder::cpp_compliant().table();

        assert_eq!(table.classify('q'), CharKind::Alpha);
        assert_eq!(table.classify('Q'), CharKind::Alpha);
        assert_eq!(table.classify('7'), CharKind::Digit);
        assert_eq!(table.classify('_'), CharKind::Underscore);
        assert_eq!(table.classify('€'), CharKind::Euro);
        assert_eq!(table.classify('\r'), CharKind::CarriageReturn);
        assert_eq!(table.classify('é'), CharKind::Any);
        assert_eq!(*table.eof_type(), CharKind::Eof);
    }

    #[test]
    fn test_preset_stays_configurable() {
        let mut builder = ClassifierBuilder::cpp_compliant();
        builder.register_char('$', CharKind::Alpha);

        assert_eq!(builder.table().classify('$'), CharKind::Alpha);
    }
}
