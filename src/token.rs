use serde::Serialize;
use std::fmt;

/// The different kinds of tokens recognised by the Quill lexer.
///
/// Every variant is a bare tag; the literal text lives on [`Token::lexeme`].
/// String contents scanned between two `QuotationMark` tokens are emitted as
/// an `Identifier`-typed token carrying the verbatim text.
/// `Eof` marks the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenType {
    // ── primitive values ────────────────────────────────────────────
    /// A numeric literal such as `42` or `3.14`.
    Number,

    /// The `null` keyword.
    Null,

    /// `true` or `false`.
    Boolean,

    /// A user-defined name (also carries verbatim string text).
    Identifier,

    /// The `unassigned` keyword / sentinel.
    Unassigned,

    // ── operators and punctuation ───────────────────────────────────
    /// `=`
    Equals,

    /// `(`
    OpenParen,

    /// `)`
    CloseParen,

    /// `{`
    OpenBrace,

    /// `}`
    CloseBrace,

    /// `[`
    OpenBracket,

    /// `]`
    CloseBracket,

    /// `:`
    Colon,

    /// `,`
    Comma,

    /// `.`
    Dot,

    /// `;`
    Semicolon,

    /// `"`
    QuotationMark,

    /// `+ - * / % ^ // && ||`; the operator text is the lexeme.
    BinaryOperator,

    /// Compound-assignment spellings (`+=`, `//=`, …).  Never emitted: the
    /// lexer desugars them into an `Equals` plus the expanded operand
    /// sequence.  Present so the symbol tables can classify them.
    AssignmentOperator,

    /// `==`
    Equality,

    /// `!=`
    Inequality,

    /// `<`
    LessThan,

    /// `>`
    GreaterThan,

    /// `<=`
    LessOrEqual,

    /// `>=`
    GreaterOrEqual,

    // ── declaration keywords ────────────────────────────────────────
    /// `let`
    Let,

    /// `const`
    Const,

    /// `function`
    Function,

    /// `int`: typed declaration, expects numbers.
    Int,

    /// `float`: typed declaration, expects numbers.
    Float,

    /// `str`: typed declaration, expects strings.
    Str,

    /// `bool`: typed declaration, expects booleans.
    Bool,

    /// `obj`: typed declaration, expects objects.
    Obj,

    /// `any`: typed declaration exempt from type enforcement.
    Any,

    // ── control flow keywords ───────────────────────────────────────
    /// `if`
    If,

    /// `else`
    Else,

    /// `while`
    While,

    /// `for`
    For,

    /// `return`
    Return,

    /// `continue`
    Continue,

    /// `break`
    Break,

    /// End-of-file marker.
    Eof,
}

/// A scanned token: its kind, the original lexeme, and the line number where
/// it was found.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact text that produced this token (verbatim string contents for
    /// quoted text).
    pub lexeme: String,

    /// 1-based line number in the source.
    pub line: usize,
}

impl Token {
    /// Create a new token with the given type, lexeme, and line.
    pub fn new<S: Into<String>>(token_type: TokenType, lexeme: S, line: usize) -> Self {
        Self {
            token_type,
            lexeme: lexeme.into(),
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {} [line {}]", self.token_type, self.lexeme, self.line)
    }
}
