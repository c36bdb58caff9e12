// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing.
//!
//! Binary operators use Pratt parsing with the binding-power table in
//! [`binary_binding_power`]; unary operators bind between the multiplicative
//! level and `^`, and type assertions (`expr :: T`) apply as a postfix on
//! primary expressions, binding tighter than everything else.
//!
//! Vars (`a.b[c]:m(1)`) are parsed as a root plus a greedy run of suffixes;
//! a string or table constructor directly after a var is a call argument,
//! as in Lua.

use crate::cst::{
    Assertion, Call, Expr, FunctionArg, FunctionBody, FunctionExpr, IfElseBranch, IfElseExpr,
    InterpSegment, InterpString, MethodName, Param, Parens, Punctuated, ReturnType, TableConstructor,
    TableField, Bracks, Braces, Var, VarRoot, VarSuffix, VarargAnnotation,
};
use crate::source_analysis::TokenKind;

use super::{ParseResult, Parser};

// ============================================================================
// Pratt Parsing for Binary Operator Precedence
// ============================================================================

/// Binding power for binary operators (Pratt parsing).
///
/// Higher values bind tighter. Left and right binding powers differ for
/// associativity:
/// - Left-associative: `right == left + 1` (e.g. `+`, `*`)
/// - Right-associative: `right == left - 1` (e.g. `..`, `^`)
#[derive(Debug, Clone, Copy)]
pub(crate) struct BindingPower {
    /// How tightly the operator binds to its left operand.
    pub(crate) left: u8,
    /// How tightly the operator binds to its right operand.
    pub(crate) right: u8,
}

impl BindingPower {
    /// Creates a left-associative binding power.
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }

    /// Creates a right-associative binding power.
    const fn right_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence - 1,
        }
    }
}

/// Binding power of unary `not` `#` `-` `+`: above multiplicative, below `^`.
pub(crate) const UNARY_BINDING_POWER: u8 = 13;

/// Gets the binding power for a binary operator token.
///
/// Returns `None` for non-operators, which ends binary expression parsing.
///
/// # Precedence Levels (from lowest to highest)
///
/// | Level | Operators | Associativity |
/// |-------|--------------------------|-------|
/// | 1  | `or`                        | Left  |
/// | 3  | `and`                       | Left  |
/// | 5  | `<` `<=` `>` `>=` `==` `~=` | Left  |
/// | 8  | `..`                        | Right |
/// | 9  | `+` `-`                     | Left  |
/// | 11 | `*` `/` `//` `%`            | Left  |
/// | 16 | `^`                         | Right |
///
/// Unary operators sit at 13, so `-x ^ 2` is `-(x ^ 2)` and `^` chains
/// rightward through unary operands.
pub(crate) fn binary_binding_power(kind: TokenKind) -> Option<BindingPower> {
    match kind {
        TokenKind::Or => Some(BindingPower::left_assoc(1)),
        TokenKind::And => Some(BindingPower::left_assoc(3)),

        TokenKind::Less
        | TokenKind::LessEqual
        | TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::EqualEqual
        | TokenKind::NotEqual => Some(BindingPower::left_assoc(5)),

        TokenKind::DotDot => Some(BindingPower::right_assoc(8)),

        TokenKind::Plus | TokenKind::Minus => Some(BindingPower::left_assoc(9)),

        TokenKind::Star | TokenKind::Slash | TokenKind::DoubleSlash | TokenKind::Percent => {
            Some(BindingPower::left_assoc(11))
        }

        TokenKind::Caret => Some(BindingPower::right_assoc(16)),

        _ => None,
    }
}

impl Parser {
    // ========================================================================
    // Expression Parsing
    // ========================================================================

    /// Parses any expression.
    pub(super) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary_expr(0)
    }

    /// Parses a non-empty, comma-separated expression list.
    pub(super) fn parse_expr_list(&mut self) -> ParseResult<Punctuated<Expr>> {
        self.parse_punctuated(Self::parse_expr)
    }

    /// Parses expressions at or above the given binding power.
    fn parse_binary_expr(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut lhs = if matches!(
            self.current_kind(),
            TokenKind::Not | TokenKind::Hash | TokenKind::Minus | TokenKind::Plus
        ) {
            let op = self.advance();
            let expr = Box::new(self.parse_binary_expr(UNARY_BINDING_POWER)?);
            Expr::Unary { op, expr }
        } else {
            self.parse_assertion_expr()?
        };

        while let Some(bp) = binary_binding_power(self.current_kind()) {
            if bp.left <= min_bp {
                break;
            }
            let op = self.advance();
            let rhs = self.parse_binary_expr(bp.right)?;
            lhs = Expr::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    /// Parses a primary expression plus any `:: T` assertion postfixes.
    fn parse_assertion_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary_expr()?;
        while self.check(TokenKind::DoubleColon) {
            let colons = self.advance();
            let ty = self.parse_type()?;
            expr = Expr::Assertion(Box::new(Assertion { expr, colons, ty }));
        }
        Ok(expr)
    }

    /// Parses a primary expression: literal, varargs, table, function,
    /// if-expression, interpolated string, or var.
    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        match self.current_kind() {
            TokenKind::Nil => Ok(Expr::Nil(self.advance())),
            TokenKind::True => Ok(Expr::True(self.advance())),
            TokenKind::False => Ok(Expr::False(self.advance())),
            TokenKind::Number => Ok(Expr::Number(self.advance())),
            TokenKind::String | TokenKind::LongString => Ok(Expr::String(self.advance())),
            TokenKind::Ellipsis => Ok(Expr::Varargs(self.advance())),
            TokenKind::InterpStringSimple => {
                Ok(Expr::InterpString(InterpString::Simple(self.advance())))
            }
            TokenKind::InterpStringBegin => self.parse_interp_string(),
            TokenKind::LeftBrace => Ok(Expr::Table(self.parse_table_constructor()?)),
            TokenKind::Function => {
                let function_token = self.advance();
                let body = self.parse_function_body()?;
                Ok(Expr::Function(Box::new(FunctionExpr {
                    attributes: Vec::new(),
                    function_token,
                    body,
                })))
            }
            TokenKind::At => {
                let attributes = self.parse_attributes()?;
                let function_token = self.expect(TokenKind::Function, "'function'")?;
                let body = self.parse_function_body()?;
                Ok(Expr::Function(Box::new(FunctionExpr {
                    attributes,
                    function_token,
                    body,
                })))
            }
            TokenKind::If => self.parse_if_else_expr(),
            TokenKind::LeftParen => Ok(Expr::Var(self.parse_var()?)),
            kind if kind.is_name_like() => Ok(Expr::Var(self.parse_var()?)),
            _ => Err(self.error_expected("an expression")),
        }
    }

    /// Parses a complex interpolated string, starting at its begin segment.
    fn parse_interp_string(&mut self) -> ParseResult<Expr> {
        let begin = self.advance();
        let mut segments = Vec::new();
        loop {
            let expr = self.parse_expr()?;
            match self.current_kind() {
                TokenKind::InterpStringMiddle => {
                    segments.push(InterpSegment {
                        expr,
                        literal: self.advance(),
                    });
                }
                TokenKind::InterpStringEnd => {
                    segments.push(InterpSegment {
                        expr,
                        literal: self.advance(),
                    });
                    break;
                }
                _ => return Err(self.error_expected("'}' to close the interpolation")),
            }
        }
        Ok(Expr::InterpString(InterpString::Complex { begin, segments }))
    }

    /// Parses `if c then a elseif c2 then b else d` in expression position.
    fn parse_if_else_expr(&mut self) -> ParseResult<Expr> {
        let if_token = self.advance();
        let condition = self.parse_expr()?;
        let then_token = self.expect(TokenKind::Then, "'then'")?;
        let value = self.parse_expr()?;

        let mut else_if_branches = Vec::new();
        while self.check(TokenKind::ElseIf) {
            let elseif_token = self.advance();
            let condition = self.parse_expr()?;
            let then_token = self.expect(TokenKind::Then, "'then'")?;
            let value = self.parse_expr()?;
            else_if_branches.push(IfElseBranch {
                elseif_token,
                condition,
                then_token,
                value,
            });
        }

        let else_token = self.expect(TokenKind::Else, "'else'")?;
        let else_value = self.parse_expr()?;
        Ok(Expr::IfElse(Box::new(IfElseExpr {
            if_token,
            condition,
            then_token,
            value,
            else_if_branches,
            else_token,
            else_value,
        })))
    }

    // ========================================================================
    // Vars and calls
    // ========================================================================

    /// Parses a var: a name or parenthesized root, then a greedy run of
    /// `.name`, `[expr]`, `:m(args)`, and call suffixes.
    pub(super) fn parse_var(&mut self) -> ParseResult<Var> {
        let root = if self.check(TokenKind::LeftParen) {
            let open = self.advance();
            let expr = Box::new(self.parse_expr()?);
            let close = self.expect(TokenKind::RightParen, "')'")?;
            VarRoot::Paren {
                parens: Parens { open, close },
                expr,
            }
        } else {
            VarRoot::Name(self.expect_name("an expression")?)
        };

        let mut suffixes = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    let dot = self.advance();
                    let name = self.expect_name("a name after '.'")?;
                    suffixes.push(VarSuffix::NameIndex { dot, name });
                }
                TokenKind::LeftBracket => {
                    let open = self.advance();
                    let expr = self.parse_expr()?;
                    let close = self.expect(TokenKind::RightBracket, "']'")?;
                    suffixes.push(VarSuffix::ExprIndex {
                        bracks: Bracks { open, close },
                        expr,
                    });
                }
                TokenKind::Colon => {
                    let colon = self.advance();
                    let name = self.expect_name("a method name after ':'")?;
                    let arg = self.parse_call_args()?;
                    suffixes.push(VarSuffix::Call(Call {
                        method: Some(MethodName { colon, name }),
                        arg,
                    }));
                }
                TokenKind::LeftParen
                | TokenKind::LeftBrace
                | TokenKind::String
                | TokenKind::LongString => {
                    let arg = self.parse_call_args()?;
                    suffixes.push(VarSuffix::Call(Call { method: None, arg }));
                }
                _ => break,
            }
        }

        Ok(Var { root, suffixes })
    }

    /// Parses call arguments: `(…)`, a table constructor, or a string.
    fn parse_call_args(&mut self) -> ParseResult<FunctionArg> {
        match self.current_kind() {
            TokenKind::LeftParen => {
                let open = self.advance();
                let exprs = if self.check(TokenKind::RightParen) {
                    Punctuated::new()
                } else {
                    self.parse_expr_list()?
                };
                let close = self.expect(TokenKind::RightParen, "')'")?;
                Ok(FunctionArg::Pack {
                    parens: Parens { open, close },
                    exprs,
                })
            }
            TokenKind::LeftBrace => Ok(FunctionArg::Table(self.parse_table_constructor()?)),
            TokenKind::String | TokenKind::LongString => Ok(FunctionArg::String(self.advance())),
            _ => Err(self.error_expected("function arguments")),
        }
    }

    // ========================================================================
    // Tables
    // ========================================================================

    /// Parses a table constructor, separators (`,` or `;`) included.
    pub(super) fn parse_table_constructor(&mut self) -> ParseResult<TableConstructor> {
        let open = self.expect(TokenKind::LeftBrace, "'{'")?;
        let mut fields = Punctuated::new();
        while !self.check(TokenKind::RightBrace) {
            let field = self.parse_table_field()?;
            let sep = self
                .eat(TokenKind::Comma)
                .or_else(|| self.eat(TokenKind::Semicolon));
            let done = sep.is_none();
            fields.push(field, sep);
            if done {
                break;
            }
        }
        let close = self.expect(TokenKind::RightBrace, "'}'")?;
        Ok(TableConstructor {
            braces: Braces { open, close },
            fields,
        })
    }

    /// Parses one table field: `[k] = v`, `name = v`, or a positional value.
    fn parse_table_field(&mut self) -> ParseResult<TableField> {
        if self.check(TokenKind::LeftBracket) {
            let open = self.advance();
            let key = self.parse_expr()?;
            let close = self.expect(TokenKind::RightBracket, "']'")?;
            let eq = self.expect(TokenKind::Equal, "'='")?;
            let value = self.parse_expr()?;
            return Ok(TableField::ExprKey {
                bracks: Bracks { open, close },
                key,
                eq,
                value,
            });
        }

        if self.check_name() && self.kind_at(1) == TokenKind::Equal {
            let name = self.advance();
            let eq = self.advance();
            let value = self.parse_expr()?;
            return Ok(TableField::NameKey { name, eq, value });
        }

        Ok(TableField::NoKey(self.parse_expr()?))
    }

    // ========================================================================
    // Function bodies
    // ========================================================================

    /// Parses a function signature and body, from the optional generics
    /// through the closing `end`.
    pub(super) fn parse_function_body(&mut self) -> ParseResult<FunctionBody> {
        let generics = if self.check(TokenKind::Less) {
            Some(self.parse_generic_decl(false)?)
        } else {
            None
        };

        let open = self.expect(TokenKind::LeftParen, "'('")?;
        let mut params = Punctuated::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if self.check(TokenKind::Ellipsis) {
                    let ellipsis = self.advance();
                    let annotation = match self.eat(TokenKind::Colon) {
                        Some(colon) => Some(VarargAnnotation {
                            colon,
                            ty: self.parse_type_or_pack()?,
                        }),
                        None => None,
                    };
                    // Varargs close the parameter list.
                    params.push(Param::Varargs { ellipsis, annotation }, None);
                    break;
                }
                let binding = self.parse_binding()?;
                match self.eat(TokenKind::Comma) {
                    Some(comma) => params.push(Param::Name(binding), Some(comma)),
                    None => {
                        params.push(Param::Name(binding), None);
                        break;
                    }
                }
            }
        }
        let close = self.expect(TokenKind::RightParen, "')'")?;

        let return_type = match self.eat(TokenKind::Colon) {
            Some(colon) => Some(ReturnType {
                colon,
                ty: self.parse_type_or_pack()?,
            }),
            None => None,
        };

        let block = self.parse_block()?;
        let end_token = self.expect(TokenKind::End, "'end'")?;
        Ok(FunctionBody {
            generics,
            parens: Parens { open, close },
            params,
            return_type,
            block,
            end_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::{Expr, LastStat, Param, Stat};
    use crate::source_analysis::{parse, TokenKind};

    /// Extracts the single returned expression of `return <expr>`.
    fn return_expr(source: &str) -> Expr {
        let cst = parse(source).unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
        let Some((LastStat::Return { exprs, .. }, _)) = cst.block.last_stat else {
            panic!("expected return in {source:?}");
        };
        exprs.pairs()[0].node.clone()
    }

    /// Renders an expression tree as a parenthesized skeleton for precedence
    /// assertions.
    fn shape(expr: &Expr) -> String {
        match expr {
            Expr::Binary { lhs, op, rhs } => {
                format!("({} {} {})", shape(lhs), op.text(), shape(rhs))
            }
            Expr::Unary { op, expr } => {
                let sep = if op.text().chars().next().is_some_and(char::is_alphabetic) {
                    " "
                } else {
                    ""
                };
                format!("({}{}{})", op.text(), sep, shape(expr))
            }
            Expr::Assertion(assertion) => format!("({} :: _)", shape(&assertion.expr)),
            Expr::Number(token) | Expr::String(token) => token.text().to_string(),
            Expr::Var(var) => {
                let crate::cst::VarRoot::Name(name) = &var.root else {
                    return "(paren)".to_string();
                };
                name.text().to_string()
            }
            _ => "_".to_string(),
        }
    }

    #[track_caller]
    fn assert_shape(source: &str, expected: &str) {
        let expr = return_expr(source);
        assert_eq!(shape(&expr), expected, "for {source:?}");
    }

    #[test]
    fn additive_is_left_associative() {
        assert_shape("return 1 + 2 + 3", "((1 + 2) + 3)");
        assert_shape("return 1 - 2 + 3", "((1 - 2) + 3)");
    }

    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        assert_shape("return 1 + 2 * 3", "(1 + (2 * 3))");
        assert_shape("return 1 // 2 % 3", "((1 // 2) % 3)");
    }

    #[test]
    fn concat_is_right_associative_and_below_additive() {
        assert_shape("return a .. b .. c", "(a .. (b .. c))");
        assert_shape("return a .. b + c", "(a .. (b + c))");
    }

    #[test]
    fn comparison_sits_below_concat() {
        assert_shape("return a .. b < c .. d", "((a .. b) < (c .. d))");
    }

    #[test]
    fn and_or_are_lowest() {
        assert_shape("return a < b and c or d", "(((a < b) and c) or d)");
    }

    #[test]
    fn power_is_right_associative_and_above_unary() {
        assert_shape("return 2 ^ 3 ^ 4", "(2 ^ (3 ^ 4))");
        assert_shape("return -2 ^ 2", "(-(2 ^ 2))");
        assert_shape("return 2 ^ -3", "(2 ^ (-3))");
    }

    #[test]
    fn unary_binds_tighter_than_multiplication_of_operands() {
        assert_shape("return -a * b", "((-a) * b)");
        assert_shape("return not a and b", "((not a) and b)");
        assert_shape("return #t + 1", "((#t) + 1)");
    }

    #[test]
    fn assertion_binds_tighter_than_operators() {
        assert_shape("return 2 ^ x :: number", "(2 ^ (x :: _))");
        assert_shape("return -x :: number", "(-(x :: _))");
        assert_shape("return a :: number + b", "((a :: _) + b)");
    }

    #[test]
    fn if_else_expression() {
        let expr = return_expr("return if x then 1 elseif y then 2 else 3");
        let Expr::IfElse(if_else) = expr else {
            panic!("expected if-else expr");
        };
        assert_eq!(if_else.else_if_branches.len(), 1);
    }

    #[test]
    fn varargs_expression() {
        assert!(matches!(return_expr("return ..."), Expr::Varargs(_)));
    }

    #[test]
    fn function_expression_with_varargs_param() {
        let expr = return_expr("return function(a, ...: string) end");
        let Expr::Function(function) = expr else {
            panic!("expected function expr");
        };
        let params: Vec<_> = function.body.params.iter().collect();
        assert_eq!(params.len(), 2);
        assert!(matches!(params[1], Param::Varargs { annotation: Some(_), .. }));
    }

    #[test]
    fn varargs_must_be_last_parameter() {
        assert!(parse("return function(..., a) end").is_err());
    }

    #[test]
    fn call_arguments_forms() {
        for source in ["f(1, 2)", "f{}", "f'x'", "f[[x]]", "f:m(1)", "f:m'x'"] {
            let cst = parse(source).unwrap_or_else(|e| panic!("{source}: {e}"));
            assert!(matches!(cst.block.stats[0].0, Stat::Call(_)), "{source}");
        }
    }

    #[test]
    fn method_call_requires_arguments() {
        let err = parse("x:m").unwrap_err();
        assert!(err.to_string().contains("function arguments"), "{err}");
    }

    #[test]
    fn parenthesized_root_can_be_called() {
        let cst = parse("(f)(1)").unwrap();
        let Stat::Call(var) = &cst.block.stats[0].0 else {
            panic!("expected call");
        };
        assert!(matches!(var.root, crate::cst::VarRoot::Paren { .. }));
    }

    #[test]
    fn table_fields_and_separators() {
        let Expr::Table(table) = return_expr("return { 1, x = 2; [k] = 3, }") else {
            panic!("expected table");
        };
        let fields: Vec<_> = table.fields.pairs().iter().collect();
        assert_eq!(fields.len(), 3);
        assert!(matches!(fields[0].node, crate::cst::TableField::NoKey(_)));
        assert!(matches!(
            fields[1].node,
            crate::cst::TableField::NameKey { .. }
        ));
        assert!(matches!(
            fields[2].node,
            crate::cst::TableField::ExprKey { .. }
        ));
        assert_eq!(fields[1].sep.as_ref().unwrap().kind(), TokenKind::Semicolon);
        assert!(table.fields.trailing_sep().is_some());
    }

    #[test]
    fn name_equality_is_not_a_name_key() {
        // `x == 2` inside a table is a positional boolean expression.
        let Expr::Table(table) = return_expr("return { x == 2 }") else {
            panic!("expected table");
        };
        assert!(matches!(
            table.fields.pairs()[0].node,
            crate::cst::TableField::NoKey(Expr::Binary { .. })
        ));
    }

    #[test]
    fn interpolated_string_with_nested_table() {
        let Expr::InterpString(crate::cst::InterpString::Complex { segments, .. }) =
            return_expr("return `n: {#{1, 2}} done`")
        else {
            panic!("expected complex interp string");
        };
        assert_eq!(segments.len(), 1);
        assert!(matches!(segments[0].expr, Expr::Unary { .. }));
    }

    #[test]
    fn unclosed_interpolation_reports_expected_brace() {
        let err = parse("return `a {1 2}`").unwrap_err();
        assert!(err.to_string().contains("'}'"), "{err}");
    }
}
