//! Module `lexer` implements a one-pass lexer for the Quill language.
//!
//! It transforms source text into an ordered `Vec<Token>`, skipping
//! whitespace and backtick comments, and emitting exactly one `Eof` token at
//! the end.  Multi-character operators are resolved longest-match-first
//! against fixed symbol tables (3-char, then 2-char, then 1-char).
//!
//! Two behaviors are worth calling out:
//!
//! - **Compound assignment desugars in the token stream.**  `x += 1` emits
//!   `x`, `=`, `x`, `+`, `1`: the previous token is cloned back in after the
//!   synthesised `=`, so the parser never sees `+=` at all.
//! - **String text is flanked by quote tokens.**  `"abc"` emits
//!   `QuotationMark`, an `Identifier`-typed token holding `abc` verbatim
//!   (no escape processing), and the closing `QuotationMark`.  The parser
//!   consumes the quote tokens itself.

use crate::error::{QuillError, Result};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::{memchr, memchr_iter};
use phf::phf_map;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword / symbol tables (compile-time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"null"       => TokenType::Null,
    b"true"       => TokenType::Boolean,
    b"false"      => TokenType::Boolean,
    b"let"        => TokenType::Let,
    b"const"      => TokenType::Const,
    b"unassigned" => TokenType::Unassigned,
    b"function"   => TokenType::Function,
    b"if"         => TokenType::If,
    b"else"       => TokenType::Else,
    b"for"        => TokenType::For,
    b"while"      => TokenType::While,
    b"return"     => TokenType::Return,
    b"continue"   => TokenType::Continue,
    b"break"      => TokenType::Break,
    b"int"        => TokenType::Int,
    b"float"      => TokenType::Float,
    b"str"        => TokenType::Str,
    b"bool"       => TokenType::Bool,
    b"obj"        => TokenType::Obj,
    b"any"        => TokenType::Any,
};

static SYMBOLS_1: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"(" => TokenType::OpenParen,
    b")" => TokenType::CloseParen,
    b"{" => TokenType::OpenBrace,
    b"}" => TokenType::CloseBrace,
    b"[" => TokenType::OpenBracket,
    b"]" => TokenType::CloseBracket,
    b":" => TokenType::Colon,
    b"," => TokenType::Comma,
    b"." => TokenType::Dot,
    b"=" => TokenType::Equals,
    b";" => TokenType::Semicolon,
    b"+" => TokenType::BinaryOperator,
    b"-" => TokenType::BinaryOperator,
    b"*" => TokenType::BinaryOperator,
    b"/" => TokenType::BinaryOperator,
    b"%" => TokenType::BinaryOperator,
    b"^" => TokenType::BinaryOperator,
    b"<" => TokenType::LessThan,
    b">" => TokenType::GreaterThan,
};

static SYMBOLS_2: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"<=" => TokenType::LessOrEqual,
    b">=" => TokenType::GreaterOrEqual,
    b"&&" => TokenType::BinaryOperator,
    b"||" => TokenType::BinaryOperator,
    b"==" => TokenType::Equality,
    b"!=" => TokenType::Inequality,
    b"//" => TokenType::BinaryOperator,
    b"+=" => TokenType::AssignmentOperator,
    b"-=" => TokenType::AssignmentOperator,
    b"*=" => TokenType::AssignmentOperator,
    b"/=" => TokenType::AssignmentOperator,
    b"%=" => TokenType::AssignmentOperator,
    b"^=" => TokenType::AssignmentOperator,
};

static SYMBOLS_3: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"//=" => TokenType::AssignmentOperator,
};

/// Tokenize `source` into a sequence terminated by a single `Eof` token.
///
/// Fails on an unrecognised character, an unterminated backtick comment, or
/// an unterminated string literal.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).run()
}

/// Single-pass byte cursor over the source text.  Byte offsets only ever
/// land on ASCII boundaries (operators, quotes, backticks), so slicing the
/// original `&str` at them is always valid.
struct Lexer<'a> {
    text: &'a str,
    src: &'a [u8],
    curr: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        info!("Lexer created over {} bytes", text.len());

        Self {
            text,
            src: text.as_bytes(),
            curr: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    // ───────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Peek at the byte `offset` positions ahead.  Returns `0` past EOF to
    /// avoid branching at call-site.
    #[inline(always)]
    fn peek_at(&self, offset: usize) -> u8 {
        if self.curr + offset >= self.src.len() {
            0
        } else {
            self.src[self.curr + offset]
        }
    }

    #[inline(always)]
    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn push(&mut self, token_type: TokenType, lexeme: &str) {
        debug!("Scanned token ({:?}) on line {}", token_type, self.line);

        self.tokens.push(Token::new(token_type, lexeme, self.line));
    }

    // ───────────────────────── core lexing ──────────────────────────────

    fn run(mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.scan_token()?;
        }

        self.push(TokenType::Eof, "EndOfFile");

        Ok(self.tokens)
    }

    /// Scan a single lexeme starting at `self.curr`.  Whitespace and
    /// comments advance the cursor without emitting anything.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.peek();

        match b {
            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => {
                self.curr += 1;
            }

            b'\n' => {
                self.line += 1;
                self.curr += 1;
            }

            // U+00A0 no-break space (0xC2 0xA0 in UTF-8) is also skipped.
            0xC2 if self.peek_at(1) == 0xA0 => {
                self.curr += 2;
            }

            // ── number literal ───────────────────────────────────────────
            b'0'..=b'9' => self.scan_number(),

            // ── identifiers / keywords ───────────────────────────────────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(),

            // ── backtick comment ─────────────────────────────────────────
            b'`' => self.scan_comment()?,

            // ── string literal ───────────────────────────────────────────
            b'"' => self.scan_string()?,

            // ── operators / punctuation, longest match first ─────────────
            _ => self.scan_symbol()?,
        }

        Ok(())
    }

    /// Digit run with at most one embedded `.`; a second `.` terminates the
    /// number.
    fn scan_number(&mut self) {
        let start = self.curr;
        let mut seen_dot = false;

        loop {
            let c = self.peek();

            if c.is_ascii_digit() {
                self.curr += 1;
            } else if c == b'.' && !seen_dot {
                seen_dot = true;
                self.curr += 1;
            } else {
                break;
            }
        }

        let lexeme = &self.text[start..self.curr];

        self.push(TokenType::Number, lexeme);
    }

    /// Identifier run (letters, digits after the first, underscore), checked
    /// against the keyword table.
    fn scan_identifier(&mut self) {
        let start = self.curr;

        loop {
            let c = self.peek();

            if c.is_ascii_alphanumeric() || c == b'_' {
                self.curr += 1;
            } else {
                break;
            }
        }

        let slice = &self.src[start..self.curr];
        let tt = KEYWORDS.get(slice).copied().unwrap_or(TokenType::Identifier);

        let lexeme = &self.text[start..self.curr];
        self.push(tt, lexeme);
    }

    /// Backtick-delimited comment: produces no token.  `memchr` finds the
    /// closing backtick in bulk; newlines inside still bump the line counter.
    fn scan_comment(&mut self) -> Result<()> {
        let body_start = self.curr + 1;

        let Some(pos) = memchr(b'`', &self.src[body_start..]) else {
            return Err(QuillError::lex(self.line, "Unterminated comment"));
        };

        self.line += memchr_iter(b'\n', &self.src[body_start..body_start + pos]).count();
        self.curr = body_start + pos + 1;

        Ok(())
    }

    /// `"` … `"`: an opening `QuotationMark`, the verbatim contents as a
    /// single `Identifier`-typed token (omitted when empty), and the closing
    /// `QuotationMark`.  No escape processing.
    fn scan_string(&mut self) -> Result<()> {
        self.push(TokenType::QuotationMark, "\"");
        self.curr += 1;

        let body_start = self.curr;

        let Some(pos) = memchr(b'"', &self.src[body_start..]) else {
            return Err(QuillError::lex(self.line, "Unterminated string"));
        };

        if pos > 0 {
            let contents = &self.text[body_start..body_start + pos];
            self.push(TokenType::Identifier, contents);
        }

        // Multi-line strings are allowed; keep diagnostics accurate.
        self.line += memchr_iter(b'\n', &self.src[body_start..body_start + pos]).count();
        self.curr = body_start + pos;

        self.push(TokenType::QuotationMark, "\"");
        self.curr += 1;

        Ok(())
    }

    /// Operator / punctuation lookup: 3-char, then 2-char, then 1-char.
    /// Compound-assignment spellings are desugared on the spot.
    fn scan_symbol(&mut self) -> Result<()> {
        for width in (1..=3usize).rev() {
            if self.curr + width > self.src.len() {
                continue;
            }

            let slice = &self.src[self.curr..self.curr + width];
            let table = match width {
                3 => &SYMBOLS_3,
                2 => &SYMBOLS_2,
                _ => &SYMBOLS_1,
            };

            let Some(&tt) = table.get(slice) else {
                continue;
            };

            if tt == TokenType::AssignmentOperator {
                self.desugar_compound(width)?;
            } else {
                let lexeme = &self.text[self.curr..self.curr + width];
                self.push(tt, lexeme);
                self.curr += width;
            }

            return Ok(());
        }

        Err(QuillError::lex(
            self.line,
            format!("Unrecognized character: {}", self.text[self.curr..].chars().next().unwrap_or('\u{fffd}')),
        ))
    }

    /// Rewrite `lhs op= …` as `lhs = lhs op …` in the token stream.  The
    /// operand is the most recently emitted token; the operator is the
    /// compound spelling minus its trailing `=`.
    fn desugar_compound(&mut self, width: usize) -> Result<()> {
        let Some(prev) = self.tokens.last().cloned() else {
            return Err(QuillError::lex(
                self.line,
                "Compound assignment without a preceding operand",
            ));
        };

        let op = &self.text[self.curr..self.curr + width - 1];
        let op_table = if width == 3 { &SYMBOLS_2 } else { &SYMBOLS_1 };

        let Some(&op_tt) = op_table.get(op.as_bytes()) else {
            return Err(QuillError::internal(format!(
                "No bare operator for compound assignment '{}'",
                &self.text[self.curr..self.curr + width]
            )));
        };

        self.push(TokenType::Equals, "=");
        self.tokens.push(prev);
        self.push(op_tt, op);
        self.curr += width;

        Ok(())
    }
}
