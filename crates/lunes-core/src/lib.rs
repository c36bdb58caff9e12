// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lossless Luau parser core.
//!
//! This crate parses Luau source — Lua 5.1 extended with static types,
//! generics with defaults, string interpolation, compound assignment,
//! `continue`, type assertions, and function attributes — into a concrete
//! syntax tree that preserves every byte of the input:
//!
//! - Lexical analysis with trivia capture ([`source_analysis`])
//! - The lossless CST model and span synthesis ([`cst`])
//! - Generic tree traversal ([`visit`])
//! - Byte-identical re-emit ([`unparse`])
//! - A lossy AST view and its lowering ([`ast`], [`lower`])
//!
//! The central invariant is the round trip: for any source `s` that parses,
//! `unparse(&parse(s)?) == s`.
//!
//! ```
//! use lunes_core::source_analysis::parse;
//! use lunes_core::unparse::unparse;
//!
//! let source = "local greeting = `hello {who}!` -- say hi\n";
//! let cst = parse(source).unwrap();
//! assert_eq!(unparse(&cst), source);
//! ```

pub mod ast;
pub mod cst;
pub mod lower;
pub mod source_analysis;
pub mod unparse;
pub mod visit;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::cst::{Block, Cst, Expr, LastStat, Spanned, Stat, Type};
    pub use crate::source_analysis::{lex, parse, ParseError, Span, Token, TokenKind};
    pub use crate::unparse::unparse;
    pub use crate::visit::{walk_cst, Visitor};
}
