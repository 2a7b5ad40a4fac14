/// The kind of a docblock token.
///
/// Only the characters that carry meaning in the annotation grammar become
/// tokens. Whitespace, `*` and arbitrary prose are skipped by the lexer and
/// never appear here.
///
/// The raw text of a token lives on [`DocToken`](crate::token::DocToken);
/// the kind itself is a plain tag so that parsers can compare and copy it
/// freely.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DocTokenKind {
    /// `@`
    At,
    /// `[A-Za-z_][A-Za-z0-9_:]*`, excluding the literal keywords below.
    Identifier,
    /// `true`, matched case-insensitively.
    True,
    /// `false`, matched case-insensitively.
    False,
    /// `null`, matched case-insensitively.
    Null,
    /// `\`
    NamespaceSeparator,
    /// A double-quoted string. `""` inside the quotes stands for one `"`.
    String,
    /// An optionally signed run of digits.
    Integer,
    /// A number with a fractional part and/or an exponent.
    Float,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `,`
    Comma,
    /// `=`
    Equals,
    /// `:` appearing on its own (a `:` inside an identifier is part of the
    /// identifier).
    Colon,
}

impl DocTokenKind {
    /// Token kinds that may appear as one segment of an annotation name.
    ///
    /// The literal keywords are accepted here so that names such as
    /// `@Null` or `@Acme\True` remain usable.
    pub const NAME_PARTS: [DocTokenKind; 4] = [
        DocTokenKind::Identifier,
        DocTokenKind::True,
        DocTokenKind::False,
        DocTokenKind::Null,
    ];

    /// Returns the fixed source text for punctuator kinds.
    pub fn as_punctuator_str(&self) -> Option<&'static str> {
        match self {
            DocTokenKind::At => Some("@"),
            DocTokenKind::NamespaceSeparator => Some("\\"),
            DocTokenKind::OpenParen => Some("("),
            DocTokenKind::CloseParen => Some(")"),
            DocTokenKind::OpenBrace => Some("{"),
            DocTokenKind::CloseBrace => Some("}"),
            DocTokenKind::Comma => Some(","),
            DocTokenKind::Equals => Some("="),
            DocTokenKind::Colon => Some(":"),
            DocTokenKind::Identifier
            | DocTokenKind::True
            | DocTokenKind::False
            | DocTokenKind::Null
            | DocTokenKind::String
            | DocTokenKind::Integer
            | DocTokenKind::Float => None,
        }
    }

    /// Returns `true` if this kind can be a segment of an annotation name.
    pub fn is_name_part(&self) -> bool {
        Self::NAME_PARTS.contains(self)
    }

    /// Human-readable description used in "expected ..." diagnostics.
    pub fn describe(&self) -> String {
        if let Some(punct) = self.as_punctuator_str() {
            return format!("`{punct}`");
        }
        match self {
            DocTokenKind::Identifier => "identifier",
            DocTokenKind::True => "true",
            DocTokenKind::False => "false",
            DocTokenKind::Null => "null",
            DocTokenKind::String => "string",
            DocTokenKind::Integer => "integer",
            DocTokenKind::Float => "float",
            _ => "token",
        }
        .to_string()
    }
}
