//! Centralised error hierarchy for the **Quill interpreter**.
//!
//! All subsystems (lexer, parser, runtime, CLI) convert their internal
//! failure modes into one of the variants defined here.  This enables a
//! uniform `Result<T>` alias throughout the crate and ergonomic
//! inter-operation with `anyhow`, while still preserving rich diagnostic
//! detail.
//!
//! The module **does not** print diagnostics itself.

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuillError {
    /// Lexical error with source line information: unrecognised character,
    /// unterminated comment, unterminated string.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human-readable description.
        message: String,

        /// 1-based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}] Error: {message}")]
    Parse { message: String, line: usize },

    /// Runtime evaluation error: unresolved names, duplicate declarations,
    /// constant reassignment, bad operand types, and friends.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Implementation fault (a state the evaluator should never reach).
    /// Distinct from the user-facing classes above.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF-8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl QuillError {
    /// Helper constructor for the **lexer**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        QuillError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", line, message);

        QuillError::Parse { message, line }
    }

    /// Helper constructor for the **evaluator**.
    pub fn runtime<S: Into<String>>(msg: S) -> Self {
        QuillError::Runtime(msg.into())
    }

    /// Helper constructor for implementation faults.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        QuillError::Internal(msg.into())
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, QuillError>;
