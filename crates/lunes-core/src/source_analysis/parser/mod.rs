// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Luau source code.
//!
//! The parser consumes the eagerly-lexed token stream and builds a lossless
//! [`Cst`]: every delimiter, separator, and optional keyword token is stored
//! in the tree together with its trivia.
//!
//! # Design Philosophy
//!
//! - **No recovery** — the first error aborts the parse and is returned as a
//!   structured [`ParseError`]; the success path stays small and fast
//! - **One-token lookahead** plus targeted multi-token peeks at the grammar's
//!   ambiguity points (`(…)` type vs. pack, `type` declaration vs. call,
//!   assignment vs. call statement)
//! - **Precise spans** — every error points at the offending token
//!
//! # Binary Operator Precedence (Pratt Parsing)
//!
//! Binary operator precedence is handled using Pratt parsing (top-down
//! operator precedence parsing) with a declarative binding-power table; see
//! `binary_binding_power` in the expressions module.
//!
//! | Level | Operators | Associativity |
//! |-------|--------------------------|-------|
//! | 1  | `or`                        | Left  |
//! | 2  | `and`                       | Left  |
//! | 3  | `<` `<=` `>` `>=` `==` `~=` | Left  |
//! | 4  | `..`                        | Right |
//! | 5  | `+` `-`                     | Left  |
//! | 6  | `*` `/` `//` `%`            | Left  |
//! | 7  | unary `not` `#` `-` `+`     |       |
//! | 8  | `^`                         | Right |
//!
//! Type assertions (`expr :: T`) bind tighter than any operator and apply as
//! a postfix on primary expressions.
//!
//! # Usage
//!
//! ```
//! use lunes_core::source_analysis::parse;
//!
//! let cst = parse("local x = 1 + 2").unwrap();
//! assert_eq!(cst.block.stats.len(), 1);
//! ```

use crate::cst::{Block, Cst, LastStat, Punctuated};
use crate::source_analysis::{lex, ParseError, ParseErrorKind, Span, Token, TokenKind};
use ecow::EcoString;

mod expressions;
mod statements;
mod types;


/// The result type used throughout the parser.
pub(super) type ParseResult<T> = Result<T, ParseError>;

/// Parses a source buffer into a lossless CST.
///
/// This is the main entry point. Lexing happens eagerly; a lex failure
/// surfaces through the same [`ParseError`] shape as a grammar failure.
///
/// # Errors
///
/// Returns the first error encountered, with the span of the offending
/// token. No recovery is attempted.
///
/// # Examples
///
/// ```
/// use lunes_core::source_analysis::parse;
/// use lunes_core::unparse::unparse;
///
/// let source = "return 1";
/// let cst = parse(source).unwrap();
/// assert_eq!(unparse(&cst), source);
/// ```
pub fn parse(source: &str) -> Result<Cst, ParseError> {
    let tokens = lex(source)?;
    let mut parser = Parser::new(tokens);
    let block = parser.parse_block()?;
    let eof = parser.expect(TokenKind::Eof, "<eof>")?;
    Ok(Cst { block, eof })
}

/// The parser state: a token vector and a cursor.
pub(super) struct Parser {
    /// The tokens being parsed; always ends with EOF.
    tokens: Vec<Token>,
    /// Current token index.
    current: usize,
}

impl Parser {
    /// Creates a new parser for the given tokens.
    fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(Token::kind),
            Some(TokenKind::Eof)
        ));
        Self { tokens, current: 0 }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token.
    pub(super) fn current_token(&self) -> &Token {
        self.tokens
            .get(self.current)
            .or_else(|| self.tokens.last())
            .expect("parser has no tokens; expected at least an EOF token")
    }

    /// Returns the current token kind.
    pub(super) fn current_kind(&self) -> TokenKind {
        self.current_token().kind()
    }

    /// Returns the kind `offset` tokens ahead (EOF when out of range).
    pub(super) fn kind_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.current + offset)
            .map_or(TokenKind::Eof, Token::kind)
    }

    /// Checks if the current token matches the given kind.
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Checks if the current token can be used as a name.
    pub(super) fn check_name(&self) -> bool {
        self.current_kind().is_name_like()
    }

    /// Advances to the next token and returns the consumed one.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if !token.kind().is_eof() {
            self.current += 1;
        }
        token
    }

    /// Consumes the current token if it matches the given kind.
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consumes a token of the given kind, or fails naming `expected`.
    pub(super) fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_expected(expected))
        }
    }

    /// Consumes a name-like token, or fails naming `expected`.
    pub(super) fn expect_name(&mut self, expected: &str) -> ParseResult<Token> {
        if self.check_name() {
            Ok(self.advance())
        } else {
            Err(self.error_expected(expected))
        }
    }

    /// The display text of the current token, for error messages.
    fn found_text(&self) -> EcoString {
        let token = self.current_token();
        if token.kind().is_eof() {
            EcoString::from("<eof>")
        } else {
            EcoString::from(token.text())
        }
    }

    /// Builds an expected-X-found-Y error at the current token.
    pub(super) fn error_expected(&self, expected: &str) -> ParseError {
        ParseError::new(
            ParseErrorKind::Expected {
                expected: EcoString::from(expected),
                found: self.found_text(),
            },
            self.current_token().span(),
        )
    }

    /// Builds an error of the given kind at the given span.
    pub(super) fn error_at(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, span)
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Parses a block: statements with optional `;` separators, optionally
    /// terminated by a `return`/`break`/`continue` last-statement.
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        let mut stats = Vec::new();
        let mut last_stat = None;

        loop {
            match self.current_kind() {
                TokenKind::Return | TokenKind::Break | TokenKind::Continue => {
                    let stat = self.parse_last_stat()?;
                    let semi = self.eat(TokenKind::Semicolon);
                    last_stat = Some((stat, semi));
                    break;
                }
                TokenKind::End
                | TokenKind::Else
                | TokenKind::ElseIf
                | TokenKind::Until
                | TokenKind::Eof => break,
                _ => {
                    let stat = self.parse_stat()?;
                    let semi = self.eat(TokenKind::Semicolon);
                    stats.push((stat, semi));
                }
            }
        }

        Ok(Block { stats, last_stat })
    }

    /// Parses a `return`, `break`, or `continue`.
    fn parse_last_stat(&mut self) -> ParseResult<LastStat> {
        match self.current_kind() {
            TokenKind::Return => {
                let return_token = self.advance();
                let exprs = if self.begins_expression() {
                    self.parse_expr_list()?
                } else {
                    Punctuated::new()
                };
                Ok(LastStat::Return {
                    return_token,
                    exprs,
                })
            }
            TokenKind::Break => Ok(LastStat::Break(self.advance())),
            TokenKind::Continue => Ok(LastStat::Continue(self.advance())),
            _ => unreachable!("caller checked for a last-stat keyword"),
        }
    }

    /// Returns `true` if the current token can begin an expression.
    pub(super) fn begins_expression(&self) -> bool {
        match self.current_kind() {
            TokenKind::Nil
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::LongString
            | TokenKind::InterpStringSimple
            | TokenKind::InterpStringBegin
            | TokenKind::Ellipsis
            | TokenKind::LeftBrace
            | TokenKind::LeftParen
            | TokenKind::Function
            | TokenKind::At
            | TokenKind::If
            | TokenKind::Not
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Hash => true,
            kind => kind.is_name_like(),
        }
    }

    /// Parses a non-empty, comma-separated list without a trailing comma.
    pub(super) fn parse_punctuated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Punctuated<T>> {
        let mut list = Punctuated::new();
        loop {
            let node = item(self)?;
            match self.eat(TokenKind::Comma) {
                Some(comma) => list.push(node, Some(comma)),
                None => {
                    list.push(node, None);
                    return Ok(list);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{Expr, LastStat, Spanned, Stat, TableTypeField, VarSuffix};
    use crate::unparse::unparse;

    // ------------------------------------------------------------------
    // The concrete scenarios from the design notes.
    // ------------------------------------------------------------------

    #[test]
    fn return_statement_with_number() {
        let source = "return 1";
        let cst = parse(source).unwrap();
        assert!(cst.block.stats.is_empty());
        let Some((LastStat::Return { exprs, .. }, None)) = &cst.block.last_stat else {
            panic!("expected a return last-stat");
        };
        assert_eq!(exprs.len(), 1);
        assert!(matches!(exprs.iter().next(), Some(Expr::Number(_))));
        assert_eq!(unparse(&cst), source);
    }

    #[test]
    fn local_with_table_type_annotation() {
        let source = "local x: {a: number, [string]: boolean} = t";
        let cst = parse(source).unwrap();
        let Stat::LocalVariable(local) = &cst.block.stats[0].0 else {
            panic!("expected a local variable");
        };
        let binding = &local.bindings.first().unwrap().node;
        let annotation = binding.annotation.as_ref().unwrap();
        let crate::cst::Type::Table { fields, .. } = &annotation.ty else {
            panic!("expected a table type");
        };
        let fields: Vec<_> = fields.iter().collect();
        assert!(matches!(fields[0], TableTypeField::NameProp { .. }));
        assert!(matches!(fields[1], TableTypeField::Indexer { .. }));
        assert_eq!(unparse(&cst), source);
    }

    #[test]
    fn local_with_interpolated_string() {
        let source = "local s = `hi {name}!`";
        let cst = parse(source).unwrap();
        let Stat::LocalVariable(local) = &cst.block.stats[0].0 else {
            panic!("expected a local variable");
        };
        let Some(Expr::InterpString(crate::cst::InterpString::Complex { segments, .. })) =
            local.exprs.iter().next()
        else {
            panic!("expected a complex interpolated string");
        };
        assert_eq!(segments.len(), 1);
        assert!(matches!(segments[0].expr, Expr::Var(_)));
        assert_eq!(unparse(&cst), source);
    }

    #[test]
    fn numeric_for_with_step() {
        let source = "for i = 1, 10, 2 do end";
        let cst = parse(source).unwrap();
        let Stat::NumericFor(numeric_for) = &cst.block.stats[0].0 else {
            panic!("expected a numeric for");
        };
        assert!(matches!(numeric_for.start, Expr::Number(_)));
        assert!(matches!(numeric_for.end, Expr::Number(_)));
        assert!(numeric_for.step.is_some());
        assert!(numeric_for.block.is_empty());
        assert_eq!(cst.block.stats[0].0.span(), Span::new(0, 23));
    }

    #[test]
    fn chained_call_statement() {
        let source = "a.b:c(1)(2)";
        let cst = parse(source).unwrap();
        let Stat::Call(var) = &cst.block.stats[0].0 else {
            panic!("expected a call stat");
        };
        assert_eq!(var.suffixes.len(), 3);
        assert!(matches!(var.suffixes[0], VarSuffix::NameIndex { .. }));
        let VarSuffix::Call(method_call) = &var.suffixes[1] else {
            panic!("expected a method call");
        };
        assert!(method_call.method.is_some());
        let VarSuffix::Call(plain_call) = &var.suffixes[2] else {
            panic!("expected a plain call");
        };
        assert!(plain_call.method.is_none());
        assert!(var.ends_in_call());
    }

    #[test]
    fn compound_assignment() {
        let source = "x += y";
        let cst = parse(source).unwrap();
        let Stat::CompoundAssign(assign) = &cst.block.stats[0].0 else {
            panic!("expected a compound assignment");
        };
        assert_eq!(assign.op.kind(), TokenKind::PlusEqual);
        assert!(matches!(assign.expr, Expr::Var(_)));
        assert_eq!(unparse(&cst), source);
    }

    #[test]
    fn local_without_binding_reports_the_equals_token() {
        let err = parse("local = 1").unwrap_err();
        assert_eq!(err.span, Span::new(6, 7));
        assert!(err.to_string().contains("binding"), "{err}");
    }

    // ------------------------------------------------------------------
    // Entry-point behavior.
    // ------------------------------------------------------------------

    #[test]
    fn empty_source_parses_to_empty_block() {
        let cst = parse("").unwrap();
        assert!(cst.block.is_empty());
        assert_eq!(cst.eof.kind(), TokenKind::Eof);
    }

    #[test]
    fn stray_end_is_rejected_at_eof_check() {
        let err = parse("x = 1 end").unwrap_err();
        assert!(err.to_string().contains("<eof>"), "{err}");
    }

    #[test]
    fn parse_is_deterministic() {
        let source = "local a = { 1, f(x), `s {y}` } -- note\n";
        assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    }

    #[test]
    fn eof_is_unique_and_owns_trailing_trivia() {
        let cst = parse("x = 1 -- tail").unwrap();
        assert_eq!(cst.eof.kind(), TokenKind::Eof);
        assert!(cst.eof.has_leading_comment());
    }
}
