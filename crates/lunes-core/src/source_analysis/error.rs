// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for the Luau parser.
//!
//! Errors carry source locations ([`Span`]) for precise diagnostics.
//! They integrate with [`miette`] for beautiful error reporting.
//!
//! There is no recovery: lexing and parsing both abort at the first error,
//! and both surface the same `{ span, message }` shape at the boundary.
//! A [`LexError`] converts into a [`ParseError`] so callers of
//! [`parse`](crate::source_analysis::parse) see a single error type.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use super::Span;

/// A lexical error encountered during tokenization.
///
/// The first malformed input aborts the lex; further lexing is not attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct LexError {
    /// The kind of lexical error.
    #[source]
    pub kind: LexErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// An unexpected character was encountered.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// A short string literal ran off the end of its line or the file.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A long string literal was not closed by a matching `]=*]`.
    #[error("unterminated long string literal")]
    UnterminatedLongString,

    /// An interpolated string was not closed by a backtick.
    #[error("unterminated interpolated string")]
    UnterminatedInterpolatedString,

    /// A block comment was not closed by a matching `]=*]`.
    #[error("unterminated block comment")]
    UnterminatedComment,

    /// An invalid escape sequence in a string.
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    /// An invalid number literal.
    #[error("malformed number literal")]
    MalformedNumber,
}

/// A parse error: the single structured failure returned by
/// [`parse`](crate::source_analysis::parse).
///
/// # Examples
///
/// ```
/// use lunes_core::source_analysis::parse;
///
/// let err = parse("local = 1").unwrap_err();
/// assert_eq!(err.span.start(), 6);
/// assert!(err.to_string().contains("binding"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct ParseError {
    /// The kind of parse error.
    #[source]
    pub kind: ParseErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        Self {
            kind: ParseErrorKind::Lex(error.kind),
            span: error.span,
        }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A lexical error surfaced through the parse boundary.
    #[error(transparent)]
    Lex(LexErrorKind),

    /// A token that no production could begin with.
    #[error("unexpected token '{0}'")]
    UnexpectedToken(EcoString),

    /// A specific token or construct was required but something else was found.
    #[error("expected {expected}, found '{found}'")]
    Expected {
        /// What the grammar required, e.g. `"')'"` or `"a binding"`.
        expected: EcoString,
        /// The text of the token actually found.
        found: EcoString,
    },

    /// A statement began with a var that does not end in a call suffix.
    #[error("expression statements must be function calls")]
    CallStatementWithoutCall,

    /// A named generic parameter appeared after a generic pack parameter.
    #[error("generic types come before generic type packs")]
    GenericNameAfterPack,

    /// A generic parameter without a default followed one with a default.
    #[error("expected default type after type name")]
    MissingDefaultAfterDefault,
}
