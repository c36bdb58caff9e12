// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing.
//!
//! This module contains the statement-level productions: control flow,
//! declarations, and the assignment-vs-call disambiguation that Luau
//! inherits from Lua. A statement that starts with a var is an assignment
//! if `=` or a compound operator follows the var list; otherwise it must be
//! a single var whose final suffix is a call.

use crate::cst::{
    Assign, Attribute, Binding, CompoundAssign, DoStat, ElseBlock, ElseIfBlock, ForIn, ForStep,
    FunctionName, FunctionStat, IfStat, LocalFunction, LocalVariable, MethodName, NameSegment,
    NumericFor, Punctuated, RepeatStat, Spanned, Stat, TypeDecl, TypeSpecifier, WhileStat,
};
use crate::source_analysis::{ParseErrorKind, Token, TokenKind};

use super::{ParseResult, Parser};

impl Parser {
    /// Parses one statement.
    pub(super) fn parse_stat(&mut self) -> ParseResult<Stat> {
        match self.current_kind() {
            TokenKind::Do => self.parse_do(),
            TokenKind::While => self.parse_while(),
            TokenKind::Repeat => self.parse_repeat(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Function => self.parse_function_stat(Vec::new()),
            TokenKind::Local => self.parse_local(Vec::new()),
            TokenKind::At => self.parse_attributed_stat(),
            TokenKind::Type if self.begins_type_decl() => self.parse_type_decl(None),
            TokenKind::Export if self.kind_at(1) == TokenKind::Type => {
                let export = self.advance();
                self.parse_type_decl(Some(export))
            }
            _ => self.parse_expression_stat(),
        }
    }

    /// Returns `true` if the cursor sits on a `type NAME = …` or
    /// `type NAME<…> = …` declaration rather than a use of `type` as a
    /// plain name (`type(x)`, `type = f`).
    fn begins_type_decl(&self) -> bool {
        self.kind_at(1).is_name_like()
            && matches!(self.kind_at(2), TokenKind::Equal | TokenKind::Less)
    }

    /// Parses `do … end`.
    fn parse_do(&mut self) -> ParseResult<Stat> {
        let do_token = self.advance();
        let block = self.parse_block()?;
        let end_token = self.expect(TokenKind::End, "'end'")?;
        Ok(Stat::Do(DoStat {
            do_token,
            block,
            end_token,
        }))
    }

    /// Parses `while cond do … end`.
    fn parse_while(&mut self) -> ParseResult<Stat> {
        let while_token = self.advance();
        let condition = self.parse_expr()?;
        let do_token = self.expect(TokenKind::Do, "'do'")?;
        let block = self.parse_block()?;
        let end_token = self.expect(TokenKind::End, "'end'")?;
        Ok(Stat::While(WhileStat {
            while_token,
            condition,
            do_token,
            block,
            end_token,
        }))
    }

    /// Parses `repeat … until cond`.
    fn parse_repeat(&mut self) -> ParseResult<Stat> {
        let repeat_token = self.advance();
        let block = self.parse_block()?;
        let until_token = self.expect(TokenKind::Until, "'until'")?;
        let condition = self.parse_expr()?;
        Ok(Stat::Repeat(RepeatStat {
            repeat_token,
            block,
            until_token,
            condition,
        }))
    }

    /// Parses `if cond then … elseif … else … end`.
    fn parse_if(&mut self) -> ParseResult<Stat> {
        let if_token = self.advance();
        let condition = self.parse_expr()?;
        let then_token = self.expect(TokenKind::Then, "'then'")?;
        let block = self.parse_block()?;

        let mut else_if_blocks = Vec::new();
        while self.check(TokenKind::ElseIf) {
            let elseif_token = self.advance();
            let condition = self.parse_expr()?;
            let then_token = self.expect(TokenKind::Then, "'then'")?;
            let block = self.parse_block()?;
            else_if_blocks.push(ElseIfBlock {
                elseif_token,
                condition,
                then_token,
                block,
            });
        }

        let else_block = match self.eat(TokenKind::Else) {
            Some(else_token) => Some(ElseBlock {
                else_token,
                block: self.parse_block()?,
            }),
            None => None,
        };

        let end_token = self.expect(TokenKind::End, "'end'")?;
        Ok(Stat::If(IfStat {
            if_token,
            condition,
            then_token,
            block,
            else_if_blocks,
            else_block,
            end_token,
        }))
    }

    /// Parses a numeric or generic `for`, disambiguated by the token after
    /// the first binding: `=` means numeric, `,` or `in` means generic.
    fn parse_for(&mut self) -> ParseResult<Stat> {
        let for_token = self.advance();
        let first_binding = self.parse_binding()?;

        if self.check(TokenKind::Equal) {
            let eq = self.advance();
            let start = self.parse_expr()?;
            let comma = self.expect(TokenKind::Comma, "','")?;
            let end = self.parse_expr()?;
            let step = match self.eat(TokenKind::Comma) {
                Some(comma) => Some(ForStep {
                    comma,
                    expr: self.parse_expr()?,
                }),
                None => None,
            };
            let do_token = self.expect(TokenKind::Do, "'do'")?;
            let block = self.parse_block()?;
            let end_token = self.expect(TokenKind::End, "'end'")?;
            return Ok(Stat::NumericFor(Box::new(NumericFor {
                for_token,
                binding: first_binding,
                eq,
                start,
                comma,
                end,
                step,
                do_token,
                block,
                end_token,
            })));
        }

        let mut bindings = Punctuated::new();
        let mut binding = first_binding;
        while let Some(comma) = self.eat(TokenKind::Comma) {
            bindings.push(binding, Some(comma));
            binding = self.parse_binding()?;
        }
        bindings.push(binding, None);

        let in_token = self.expect(TokenKind::In, "'in'")?;
        let exprs = self.parse_expr_list()?;
        let do_token = self.expect(TokenKind::Do, "'do'")?;
        let block = self.parse_block()?;
        let end_token = self.expect(TokenKind::End, "'end'")?;
        Ok(Stat::ForIn(ForIn {
            for_token,
            bindings,
            in_token,
            exprs,
            do_token,
            block,
            end_token,
        }))
    }

    /// Parses `@attr`-prefixed statements: only function declarations may
    /// carry attributes.
    fn parse_attributed_stat(&mut self) -> ParseResult<Stat> {
        let attributes = self.parse_attributes()?;
        match self.current_kind() {
            TokenKind::Function => self.parse_function_stat(attributes),
            TokenKind::Local => self.parse_local(attributes),
            _ => Err(self.error_expected("'function' after attributes")),
        }
    }

    /// Parses a run of `@name` attributes.
    pub(super) fn parse_attributes(&mut self) -> ParseResult<Vec<Attribute>> {
        let mut attributes = Vec::new();
        while self.check(TokenKind::At) {
            let at = self.advance();
            let name = self.expect_name("an attribute name")?;
            attributes.push(Attribute { at, name });
        }
        Ok(attributes)
    }

    /// Parses `function a.b.c:m(…) … end`.
    fn parse_function_stat(&mut self, attributes: Vec<Attribute>) -> ParseResult<Stat> {
        let function_token = self.advance();
        let name = self.parse_function_name()?;
        let body = self.parse_function_body()?;
        Ok(Stat::Function(FunctionStat {
            attributes,
            function_token,
            name,
            body,
        }))
    }

    /// Parses the dotted, optionally method-terminated function name.
    fn parse_function_name(&mut self) -> ParseResult<FunctionName> {
        let base = self.expect_name("a function name")?;
        let mut segments = Vec::new();
        while let Some(dot) = self.eat(TokenKind::Dot) {
            let name = self.expect_name("a name after '.'")?;
            segments.push(NameSegment { dot, name });
        }
        let method = match self.eat(TokenKind::Colon) {
            Some(colon) => Some(MethodName {
                colon,
                name: self.expect_name("a method name after ':'")?,
            }),
            None => None,
        };
        Ok(FunctionName {
            base,
            segments,
            method,
        })
    }

    /// Parses `local function f(…) … end` or `local a, b = …`.
    fn parse_local(&mut self, attributes: Vec<Attribute>) -> ParseResult<Stat> {
        let local_token = self.advance();

        if self.check(TokenKind::Function) {
            let function_token = self.advance();
            let name = self.expect_name("a function name")?;
            let body = self.parse_function_body()?;
            return Ok(Stat::LocalFunction(LocalFunction {
                attributes,
                local_token,
                function_token,
                name,
                body,
            }));
        }

        if let Some(attribute) = attributes.first() {
            return Err(self.error_at(
                ParseErrorKind::Expected {
                    expected: "'function' after attributes".into(),
                    found: self.current_token().text().into(),
                },
                attribute.span(),
            ));
        }

        let bindings = self.parse_punctuated(Self::parse_binding)?;
        let eq = self.eat(TokenKind::Equal);
        let exprs = if eq.is_some() {
            self.parse_expr_list()?
        } else {
            Punctuated::new()
        };
        Ok(Stat::LocalVariable(LocalVariable {
            local_token,
            bindings,
            eq,
            exprs,
        }))
    }

    /// Parses a binding: a name with an optional `: T` annotation.
    pub(super) fn parse_binding(&mut self) -> ParseResult<Binding> {
        let name = self.expect_name("a binding name")?;
        let annotation = match self.eat(TokenKind::Colon) {
            Some(colon) => Some(TypeSpecifier {
                colon,
                ty: self.parse_type()?,
            }),
            None => None,
        };
        Ok(Binding { name, annotation })
    }

    /// Parses `type Name<…> = T`, with an already-consumed `export` token
    /// when the declaration is exported.
    fn parse_type_decl(&mut self, export: Option<Token>) -> ParseResult<Stat> {
        let type_token = self.advance();
        let name = self.expect_name("a type name")?;
        let generics = if self.check(TokenKind::Less) {
            Some(self.parse_generic_decl(true)?)
        } else {
            None
        };
        let eq = self.expect(TokenKind::Equal, "'='")?;
        let ty = self.parse_type()?;
        Ok(Stat::TypeDecl(TypeDecl {
            export,
            type_token,
            name,
            generics,
            eq,
            ty,
        }))
    }

    /// Parses an assignment, compound assignment, or call statement.
    ///
    /// All three begin with a var. A compound operator or `=` selects the
    /// assignment forms; otherwise the single var must end in a call suffix.
    fn parse_expression_stat(&mut self) -> ParseResult<Stat> {
        if !self.check_name() && !self.check(TokenKind::LeftParen) {
            return Err(self.error_expected("a statement"));
        }

        let first_var = self.parse_var()?;

        if is_compound_assign_op(self.current_kind()) {
            let op = self.advance();
            let expr = self.parse_expr()?;
            return Ok(Stat::CompoundAssign(CompoundAssign {
                var: first_var,
                op,
                expr,
            }));
        }

        let mut vars = Punctuated::new();
        let mut var = first_var;
        while let Some(comma) = self.eat(TokenKind::Comma) {
            vars.push(var, Some(comma));
            var = self.parse_var()?;
        }

        if self.check(TokenKind::Equal) {
            vars.push(var, None);
            let eq = self.advance();
            let exprs = self.parse_expr_list()?;
            return Ok(Stat::Assign(Assign { vars, eq, exprs }));
        }

        if vars.is_empty() && var.ends_in_call() {
            return Ok(Stat::Call(var));
        }

        let span = var.span();
        Err(self.error_at(ParseErrorKind::CallStatementWithoutCall, span))
    }
}

/// Returns `true` for compound-assignment operators.
fn is_compound_assign_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::PlusEqual
            | TokenKind::MinusEqual
            | TokenKind::StarEqual
            | TokenKind::SlashEqual
            | TokenKind::DoubleSlashEqual
            | TokenKind::PercentEqual
            | TokenKind::CaretEqual
            | TokenKind::DotDotEqual
    )
}

#[cfg(test)]
mod tests {
    use crate::cst::{Stat, Type};
    use crate::source_analysis::{parse, ParseErrorKind, Span};

    #[test]
    fn do_while_repeat() {
        let cst = parse("do end while x do end repeat until y").unwrap();
        assert!(matches!(cst.block.stats[0].0, Stat::Do(_)));
        assert!(matches!(cst.block.stats[1].0, Stat::While(_)));
        assert!(matches!(cst.block.stats[2].0, Stat::Repeat(_)));
    }

    #[test]
    fn if_with_branches() {
        let cst = parse("if a then elseif b then elseif c then else end").unwrap();
        let Stat::If(if_stat) = &cst.block.stats[0].0 else {
            panic!("expected if");
        };
        assert_eq!(if_stat.else_if_blocks.len(), 2);
        assert!(if_stat.else_block.is_some());
    }

    #[test]
    fn generic_for_with_annotations() {
        let cst = parse("for k: string, v in pairs(t) do end").unwrap();
        let Stat::ForIn(for_in) = &cst.block.stats[0].0 else {
            panic!("expected for-in");
        };
        assert_eq!(for_in.bindings.len(), 2);
        assert!(for_in.bindings.first().unwrap().node.annotation.is_some());
    }

    #[test]
    fn multiple_assignment() {
        let cst = parse("a, b.c = 1, 2").unwrap();
        let Stat::Assign(assign) = &cst.block.stats[0].0 else {
            panic!("expected assignment");
        };
        assert_eq!(assign.vars.len(), 2);
        assert_eq!(assign.exprs.len(), 2);
    }

    #[test]
    fn compound_assignment_operators() {
        for op in ["+=", "-=", "*=", "/=", "//=", "%=", "^=", "..="] {
            let source = format!("x {op} 1");
            let cst = parse(&source).unwrap();
            assert!(
                matches!(cst.block.stats[0].0, Stat::CompoundAssign(_)),
                "{source}"
            );
        }
    }

    #[test]
    fn bare_var_is_not_a_statement() {
        let err = parse("a.b").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::CallStatementWithoutCall);
        assert_eq!(err.span, Span::new(0, 3));
    }

    #[test]
    fn var_list_without_equals_is_rejected() {
        let err = parse("a, b").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::CallStatementWithoutCall);
    }

    #[test]
    fn local_function_and_attributes() {
        let cst = parse("@native local function f() end").unwrap();
        let Stat::LocalFunction(local_fn) = &cst.block.stats[0].0 else {
            panic!("expected local function");
        };
        assert_eq!(local_fn.attributes.len(), 1);
        assert_eq!(local_fn.attributes[0].name.text(), "native");
    }

    #[test]
    fn attribute_without_function_is_rejected() {
        assert!(parse("@native local x = 1").is_err());
        assert!(parse("@native x = 1").is_err());
    }

    #[test]
    fn type_declaration_vs_type_call() {
        let cst = parse("type Id = number").unwrap();
        assert!(matches!(cst.block.stats[0].0, Stat::TypeDecl(_)));

        let cst = parse("type(x)").unwrap();
        assert!(matches!(cst.block.stats[0].0, Stat::Call(_)));

        let cst = parse("type = 1").unwrap();
        assert!(matches!(cst.block.stats[0].0, Stat::Assign(_)));
    }

    #[test]
    fn export_type_declaration() {
        let cst = parse("export type Point = { x: number, y: number }").unwrap();
        let Stat::TypeDecl(decl) = &cst.block.stats[0].0 else {
            panic!("expected type decl");
        };
        assert!(decl.export.is_some());
        assert!(matches!(decl.ty, Type::Table { .. }));
    }

    #[test]
    fn function_name_with_segments_and_method() {
        let cst = parse("function a.b.c:m() end").unwrap();
        let Stat::Function(function) = &cst.block.stats[0].0 else {
            panic!("expected function stat");
        };
        assert_eq!(function.name.segments.len(), 2);
        assert!(function.name.method.is_some());
    }

    #[test]
    fn local_multi_bindings_without_init() {
        let cst = parse("local a, b, c").unwrap();
        let Stat::LocalVariable(local) = &cst.block.stats[0].0 else {
            panic!("expected local");
        };
        assert_eq!(local.bindings.len(), 3);
        assert!(local.eq.is_none());
        assert!(local.exprs.is_empty());
    }

    #[test]
    fn numeric_for_requires_comma() {
        let err = parse("for i = 1 do end").unwrap_err();
        assert!(err.to_string().contains("','"), "{err}");
    }

    #[test]
    fn call_with_assertion_inside() {
        let cst = parse("f(x :: number)").unwrap();
        let Stat::Call(var) = &cst.block.stats[0].0 else {
            panic!("expected call");
        };
        assert!(var.ends_in_call());
    }

    #[test]
    fn assign_to_expression_index() {
        let cst = parse("t[k], t.x = v, w").unwrap();
        let Stat::Assign(assign) = &cst.block.stats[0].0 else {
            panic!("expected assign");
        };
        let vars: Vec<_> = assign.vars.iter().collect();
        assert_eq!(vars.len(), 2);
        assert!(matches!(
            vars[0].suffixes[0],
            crate::cst::VarSuffix::ExprIndex { .. }
        ));
    }

    #[test]
    fn if_expression_in_statement_position_is_rejected() {
        // `if` at statement position is always the statement form.
        assert!(parse("if x then a() end").is_ok());
        let err = parse("if x then 1 else 2").unwrap_err();
        assert!(err.to_string().contains("a statement"), "{err}");
    }
}
