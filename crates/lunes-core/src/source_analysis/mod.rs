// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for Luau source code.
//!
//! This module contains the lexer, the recursive descent parser, and their
//! shared token and span types.
//!
//! # Lexical Analysis
//!
//! [`lex`] converts source text into a vector of [`Token`]s terminated by a
//! single EOF token. Each token carries its source location via [`Span`] and
//! the [`Trivia`] (whitespace, comments, shebang) that precedes it, so the
//! token stream reproduces the source byte-for-byte.
//!
//! ```
//! use lunes_core::source_analysis::{lex, TokenKind};
//!
//! let tokens = lex("x + 1").unwrap();
//! assert_eq!(tokens.len(), 4); // x, +, 1, EOF
//! assert_eq!(tokens[3].kind(), TokenKind::Eof);
//! ```
//!
//! # Parsing
//!
//! [`parse`] builds a lossless [`Cst`](crate::cst::Cst) from the token
//! stream. There is no error recovery: the first failure aborts and is
//! returned as a [`ParseError`] carrying a span and a message. Lex errors
//! surface through the same shape.

mod error;
mod lexer;
mod parser;
mod span;
mod token;

pub use error::{LexError, LexErrorKind, ParseError, ParseErrorKind};
pub use lexer::{lex, Lexer};
pub use parser::parse;
pub use span::Span;
pub use token::{Token, TokenKind, Trivia, TriviaKind};
