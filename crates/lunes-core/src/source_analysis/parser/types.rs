// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type and type-pack parsing.
//!
//! The trickiest production is `(…)`: after a `(` in type position the
//! parser collects a comma-separated group, then decides what it was by
//! what follows. An arrow makes it a function type's parameter list. With
//! no arrow, a single plain member is a parenthesized type; in return and
//! generic-argument positions anything else (zero members, several members,
//! a pack member, a trailing comma) is a type-pack list.
//!
//! Union and intersection are flat punctuated lists with an optional
//! leading separator; `&` binds tighter than `|`, and the `?` postfix binds
//! tighter than both.

use crate::cst::{
    Angles, Braces, Bracks, FunctionType, GenericArgs, GenericDecl, GenericDefault, GenericParam,
    GenericParamKind, Pair, Parens, Punctuated, TableTypeField, Type, TypeFunctionParam,
    TypeOrPack, TypePack, TypeParamName, TypePrefix, TypeReference, TypeofType,
};
use crate::source_analysis::{ParseErrorKind, Token, TokenKind};

use super::{ParseResult, Parser};

impl Parser {
    // ========================================================================
    // Types
    // ========================================================================

    /// Parses a type, including `|` unions with an optional leading `|`.
    pub(super) fn parse_type(&mut self) -> ParseResult<Type> {
        let leading = self.eat(TokenKind::Pipe);
        let first = self.parse_intersection_type()?;
        self.continue_union(leading, first)
    }

    /// Continues a union from an already-parsed first member.
    fn continue_union(&mut self, leading: Option<Token>, first: Type) -> ParseResult<Type> {
        if leading.is_none() && !self.check(TokenKind::Pipe) {
            return Ok(first);
        }
        let mut types = Punctuated::new();
        let mut item = first;
        while let Some(pipe) = self.eat(TokenKind::Pipe) {
            types.push(item, Some(pipe));
            item = self.parse_intersection_type()?;
        }
        types.push(item, None);
        Ok(Type::Union { leading, types })
    }

    /// Parses an intersection, with an optional leading `&`.
    fn parse_intersection_type(&mut self) -> ParseResult<Type> {
        let leading = self.eat(TokenKind::Ampersand);
        let first = self.parse_postfix_type()?;
        self.continue_intersection(leading, first)
    }

    /// Continues an intersection from an already-parsed first member.
    fn continue_intersection(&mut self, leading: Option<Token>, first: Type) -> ParseResult<Type> {
        if leading.is_none() && !self.check(TokenKind::Ampersand) {
            return Ok(first);
        }
        let mut types = Punctuated::new();
        let mut item = first;
        while let Some(ampersand) = self.eat(TokenKind::Ampersand) {
            types.push(item, Some(ampersand));
            item = self.parse_postfix_type()?;
        }
        types.push(item, None);
        Ok(Type::Intersection { leading, types })
    }

    /// Parses a simple type plus any `?` optional postfixes.
    fn parse_postfix_type(&mut self) -> ParseResult<Type> {
        let ty = self.parse_simple_type()?;
        Ok(self.continue_postfix(ty))
    }

    /// Applies any pending `?` postfixes to an already-parsed type.
    fn continue_postfix(&mut self, mut ty: Type) -> Type {
        while let Some(question) = self.eat(TokenKind::Question) {
            ty = Type::Optional {
                ty: Box::new(ty),
                question,
            };
        }
        ty
    }

    /// Parses a primary type.
    fn parse_simple_type(&mut self) -> ParseResult<Type> {
        match self.current_kind() {
            TokenKind::Nil => Ok(Type::Nil(self.advance())),
            TokenKind::True | TokenKind::False => Ok(Type::Boolean(self.advance())),
            TokenKind::String | TokenKind::LongString => Ok(Type::String(self.advance())),
            TokenKind::Typeof => self.parse_typeof_type(),
            TokenKind::LeftBrace => self.parse_table_or_array_type(),
            TokenKind::LeftParen | TokenKind::Less => self.parse_function_or_paren_type(),
            kind if kind.is_name_like() => self.parse_type_reference(),
            _ => Err(self.error_expected("a type")),
        }
    }

    /// Parses `typeof(expr)`; recognized only in type position.
    fn parse_typeof_type(&mut self) -> ParseResult<Type> {
        let typeof_token = self.advance();
        let open = self.expect(TokenKind::LeftParen, "'('")?;
        let expr = Box::new(self.parse_expr()?);
        let close = self.expect(TokenKind::RightParen, "')'")?;
        Ok(Type::Typeof(Box::new(TypeofType {
            typeof_token,
            parens: Parens { open, close },
            expr,
        })))
    }

    /// Parses a named reference: `Foo`, `mod.Foo`, `Foo<T, U...>`.
    fn parse_type_reference(&mut self) -> ParseResult<Type> {
        let first = self.advance();
        let (prefix, name) = match self.eat(TokenKind::Dot) {
            Some(dot) => {
                let name = self.expect_name("a type name after '.'")?;
                (Some(TypePrefix { name: first, dot }), name)
            }
            None => (None, first),
        };
        let generics = if self.check(TokenKind::Less) {
            Some(self.parse_generic_args()?)
        } else {
            None
        };
        Ok(Type::Reference(Box::new(TypeReference {
            prefix,
            name,
            generics,
        })))
    }

    /// Parses `{T}` (array) or `{fields}` (table), decided by lookahead:
    /// an empty body, a `[` key, a `name:` prop, or a `read`/`write`
    /// modifier means table; anything else is an array element type.
    fn parse_table_or_array_type(&mut self) -> ParseResult<Type> {
        let open = self.advance();

        let is_table = match self.current_kind() {
            TokenKind::RightBrace | TokenKind::LeftBracket => true,
            kind if kind.is_name_like() => {
                self.kind_at(1) == TokenKind::Colon || self.at_access_modifier()
            }
            _ => false,
        };

        if !is_table {
            let ty = Box::new(self.parse_type()?);
            let close = self.expect(TokenKind::RightBrace, "'}'")?;
            return Ok(Type::Array {
                braces: Braces { open, close },
                ty,
            });
        }

        let mut fields = Punctuated::new();
        while !self.check(TokenKind::RightBrace) {
            let field = self.parse_table_type_field()?;
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
        Ok(Type::Table {
            braces: Braces { open, close },
            fields,
        })
    }

    /// Returns `true` if the cursor sits on a `read`/`write` access modifier
    /// (as opposed to a property actually named `read` or `write`).
    fn at_access_modifier(&self) -> bool {
        matches!(self.current_token().text(), "read" | "write")
            && (self.kind_at(1) == TokenKind::LeftBracket
                || (self.kind_at(1).is_name_like() && self.kind_at(2) == TokenKind::Colon))
    }

    /// Parses one table-type field: property, string prop, or indexer.
    fn parse_table_type_field(&mut self) -> ParseResult<TableTypeField> {
        let access = if self.at_access_modifier() {
            Some(self.advance())
        } else {
            None
        };

        if self.check(TokenKind::LeftBracket) {
            let open = self.advance();
            if matches!(self.current_kind(), TokenKind::String | TokenKind::LongString) {
                let key = self.advance();
                let close = self.expect(TokenKind::RightBracket, "']'")?;
                let colon = self.expect(TokenKind::Colon, "':'")?;
                let ty = self.parse_type()?;
                return Ok(TableTypeField::StringProp {
                    access,
                    bracks: Bracks { open, close },
                    key,
                    colon,
                    ty,
                });
            }
            let key = self.parse_type()?;
            let close = self.expect(TokenKind::RightBracket, "']'")?;
            let colon = self.expect(TokenKind::Colon, "':'")?;
            let ty = self.parse_type()?;
            return Ok(TableTypeField::Indexer {
                access,
                bracks: Bracks { open, close },
                key,
                colon,
                ty,
            });
        }

        let name = self.expect_name("a property name")?;
        let colon = self.expect(TokenKind::Colon, "':'")?;
        let ty = self.parse_type()?;
        Ok(TableTypeField::NameProp {
            access,
            name,
            colon,
            ty,
        })
    }

    // ========================================================================
    // Parenthesized groups: function types, paren types, pack lists
    // ========================================================================

    /// Parses `(…)`/`<…>(…)` in plain type position: a function type when
    /// generics or an arrow are present, otherwise a parenthesized type.
    fn parse_function_or_paren_type(&mut self) -> ParseResult<Type> {
        let generics = if self.check(TokenKind::Less) {
            Some(self.parse_generic_decl(false)?)
        } else {
            None
        };
        let (parens, params) = self.parse_type_param_group()?;

        if generics.is_some() || self.check(TokenKind::Arrow) {
            let arrow = self.expect(TokenKind::Arrow, "'->'")?;
            let return_type = self.parse_type_or_pack()?;
            return Ok(Type::Function(Box::new(FunctionType {
                generics,
                parens,
                params,
                arrow,
                return_type,
            })));
        }

        self.paren_group_into_single_type(parens, params)
    }

    /// Reduces an arrowless `(…)` group to a parenthesized single type, or
    /// fails: a multi-member group is only meaningful before `->` or in
    /// pack position.
    fn paren_group_into_single_type(
        &mut self,
        parens: Parens,
        params: Punctuated<TypeFunctionParam>,
    ) -> ParseResult<Type> {
        let mut pairs = params.into_pairs();
        let len = pairs.len();
        match (len, pairs.pop()) {
            (
                1,
                Some(Pair {
                    node:
                        TypeFunctionParam {
                            name: None,
                            ty: TypeOrPack::Type(ty),
                        },
                    sep: None,
                }),
            ) => Ok(Type::Paren {
                parens,
                ty: Box::new(ty),
            }),
            _ => Err(self.error_expected("'->' after the type list")),
        }
    }

    /// Parses the `( … )` group shared by function types, paren types, and
    /// list packs, without deciding which it is.
    fn parse_type_param_group(
        &mut self,
    ) -> ParseResult<(Parens, Punctuated<TypeFunctionParam>)> {
        let open = self.expect(TokenKind::LeftParen, "'('")?;
        let mut params = Punctuated::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let param = self.parse_type_function_param()?;
                match self.eat(TokenKind::Comma) {
                    Some(comma) => params.push(param, Some(comma)),
                    None => {
                        params.push(param, None);
                        break;
                    }
                }
            }
        }
        let close = self.expect(TokenKind::RightParen, "')'")?;
        Ok((Parens { open, close }, params))
    }

    /// Parses one member of a type group: `name: T`, a pack, or a type.
    fn parse_type_function_param(&mut self) -> ParseResult<TypeFunctionParam> {
        let name = if self.check_name() && self.kind_at(1) == TokenKind::Colon {
            let name = self.advance();
            let colon = self.advance();
            Some(TypeParamName { name, colon })
        } else {
            None
        };
        let ty = self.parse_group_member_type()?;
        Ok(TypeFunctionParam { name, ty })
    }

    /// Parses a type-or-pack inside a parenthesized group.
    fn parse_group_member_type(&mut self) -> ParseResult<TypeOrPack> {
        if self.check(TokenKind::Ellipsis) {
            let ellipsis = self.advance();
            let ty = Box::new(self.parse_type()?);
            return Ok(TypeOrPack::Pack(TypePack::Variadic { ellipsis, ty }));
        }
        if self.check_name() && self.kind_at(1) == TokenKind::Ellipsis {
            let name = self.advance();
            let ellipsis = self.advance();
            return Ok(TypeOrPack::Pack(TypePack::Generic { name, ellipsis }));
        }
        Ok(TypeOrPack::Type(self.parse_type()?))
    }

    /// Parses a type or pack in return-type, vararg-annotation, generic
    /// argument, and generic-default positions.
    ///
    /// A `(…)` group here is a type pack when it holds zero members, more
    /// than one member, a trailing comma, or a pack member; a single plain
    /// member stays a parenthesized type (and may grow `->`, `?`, `|`, `&`).
    pub(super) fn parse_type_or_pack(&mut self) -> ParseResult<TypeOrPack> {
        match self.current_kind() {
            TokenKind::Ellipsis => {
                let ellipsis = self.advance();
                let ty = Box::new(self.parse_type()?);
                Ok(TypeOrPack::Pack(TypePack::Variadic { ellipsis, ty }))
            }
            kind if kind.is_name_like() && self.kind_at(1) == TokenKind::Ellipsis => {
                let name = self.advance();
                let ellipsis = self.advance();
                Ok(TypeOrPack::Pack(TypePack::Generic { name, ellipsis }))
            }
            TokenKind::LeftParen | TokenKind::Less => self.parse_return_group(),
            _ => Ok(TypeOrPack::Type(self.parse_type()?)),
        }
    }

    /// Parses a `(…)` group in pack-admitting position and classifies it.
    fn parse_return_group(&mut self) -> ParseResult<TypeOrPack> {
        let generics = if self.check(TokenKind::Less) {
            Some(self.parse_generic_decl(false)?)
        } else {
            None
        };
        let (parens, params) = self.parse_type_param_group()?;

        if generics.is_some() || self.check(TokenKind::Arrow) {
            let arrow = self.expect(TokenKind::Arrow, "'->'")?;
            let return_type = self.parse_type_or_pack()?;
            let ty = Type::Function(Box::new(FunctionType {
                generics,
                parens,
                params,
                arrow,
                return_type,
            }));
            return self.finish_group_type(ty);
        }

        let single_plain_type = params.len() == 1
            && params.trailing_sep().is_none()
            && matches!(
                params.first().map(|pair| &pair.node),
                Some(TypeFunctionParam {
                    name: None,
                    ty: TypeOrPack::Type(_),
                })
            );
        if single_plain_type {
            let ty = self.paren_group_into_single_type(parens, params)?;
            return self.finish_group_type(ty);
        }

        if params.iter().any(|param| param.name.is_some()) {
            return Err(self.error_expected("'->' after the parameter list"));
        }

        let mut types = Punctuated::new();
        for pair in params.into_pairs() {
            types.push(pair.node.ty, pair.sep);
        }
        Ok(TypeOrPack::Pack(TypePack::List { parens, types }))
    }

    /// Applies postfix/union/intersection continuations to a group that
    /// resolved to a type.
    fn finish_group_type(&mut self, ty: Type) -> ParseResult<TypeOrPack> {
        let ty = self.continue_postfix(ty);
        let ty = self.continue_intersection(None, ty)?;
        let ty = self.continue_union(None, ty)?;
        Ok(TypeOrPack::Type(ty))
    }

    // ========================================================================
    // Generic declarations and arguments
    // ========================================================================

    /// Parses `<T, U..., V = string>` in declaration position.
    ///
    /// Enforces the structural invariants: named parameters before packs,
    /// and defaults only on a suffix of the list. Defaults are only legal in
    /// `type` declarations (`allow_defaults`); in function signatures a `=`
    /// fails the close-angle expectation instead.
    pub(super) fn parse_generic_decl(&mut self, allow_defaults: bool) -> ParseResult<GenericDecl> {
        let open = self.expect(TokenKind::Less, "'<'")?;
        let mut params = Punctuated::new();
        let mut seen_pack = false;
        let mut seen_default = false;

        loop {
            let name = self.expect_name("a generic type name")?;
            let name_span = name.span();

            let kind = match self.eat(TokenKind::Ellipsis) {
                Some(ellipsis) => {
                    seen_pack = true;
                    GenericParamKind::Pack { name, ellipsis }
                }
                None => {
                    if seen_pack {
                        return Err(
                            self.error_at(ParseErrorKind::GenericNameAfterPack, name_span)
                        );
                    }
                    GenericParamKind::Name(name)
                }
            };

            let default = if allow_defaults {
                match self.eat(TokenKind::Equal) {
                    Some(eq) => {
                        seen_default = true;
                        let ty = match &kind {
                            GenericParamKind::Name(_) => TypeOrPack::Type(self.parse_type()?),
                            GenericParamKind::Pack { .. } => self.parse_type_or_pack()?,
                        };
                        Some(GenericDefault { eq, ty })
                    }
                    None => {
                        if seen_default {
                            return Err(self
                                .error_at(ParseErrorKind::MissingDefaultAfterDefault, name_span));
                        }
                        None
                    }
                }
            } else {
                None
            };

            let param = GenericParam { kind, default };
            match self.eat(TokenKind::Comma) {
                Some(comma) => params.push(param, Some(comma)),
                None => {
                    params.push(param, None);
                    break;
                }
            }
        }

        let close = self.expect(TokenKind::Greater, "'>'")?;
        Ok(GenericDecl {
            angles: Angles { open, close },
            params,
        })
    }

    /// Parses `<T, U..., (A, B)>` generic arguments on a type reference.
    fn parse_generic_args(&mut self) -> ParseResult<GenericArgs> {
        let open = self.advance();
        let mut args = Punctuated::new();
        if !self.check(TokenKind::Greater) {
            loop {
                let arg = self.parse_type_or_pack()?;
                match self.eat(TokenKind::Comma) {
                    Some(comma) => args.push(arg, Some(comma)),
                    None => {
                        args.push(arg, None);
                        break;
                    }
                }
            }
        }
        let close = self.expect(TokenKind::Greater, "'>'")?;
        Ok(GenericArgs {
            angles: Angles { open, close },
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::{GenericParamKind, Stat, TableTypeField, Type, TypeOrPack, TypePack};
    use crate::source_analysis::{parse, ParseErrorKind};

    /// Extracts the declared type of `type T = <ty>`.
    fn decl_type(source: &str) -> Type {
        let cst = parse(source).unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
        let Stat::TypeDecl(decl) = &cst.block.stats[0].0 else {
            panic!("expected type decl in {source:?}");
        };
        decl.ty.clone()
    }

    #[test]
    fn simple_types() {
        assert!(matches!(decl_type("type T = nil"), Type::Nil(_)));
        assert!(matches!(decl_type("type T = true"), Type::Boolean(_)));
        assert!(matches!(decl_type("type T = \"tag\""), Type::String(_)));
        assert!(matches!(decl_type("type T = number"), Type::Reference(_)));
    }

    #[test]
    fn prefixed_reference_with_generics() {
        let Type::Reference(reference) = decl_type("type T = mod.Map<string, number>") else {
            panic!("expected reference");
        };
        assert!(reference.prefix.is_some());
        assert_eq!(reference.name.text(), "Map");
        assert_eq!(reference.generics.as_ref().unwrap().args.len(), 2);
    }

    #[test]
    fn generic_args_admit_packs() {
        let Type::Reference(reference) = decl_type("type T = Fn<T..., ...number, (string, A)>")
        else {
            panic!("expected reference");
        };
        let args: Vec<_> = reference.generics.as_ref().unwrap().args.iter().collect();
        assert!(matches!(args[0], TypeOrPack::Pack(TypePack::Generic { .. })));
        assert!(matches!(args[1], TypeOrPack::Pack(TypePack::Variadic { .. })));
        assert!(matches!(args[2], TypeOrPack::Pack(TypePack::List { .. })));
    }

    #[test]
    fn array_vs_table() {
        assert!(matches!(decl_type("type T = {number}"), Type::Array { .. }));
        assert!(matches!(decl_type("type T = {}"), Type::Table { .. }));
        assert!(matches!(
            decl_type("type T = {x: number}"),
            Type::Table { .. }
        ));
        assert!(matches!(
            decl_type("type T = {[string]: number}"),
            Type::Table { .. }
        ));
        // An array of tables, not a table.
        assert!(matches!(
            decl_type("type T = {{x: number}}"),
            Type::Array { .. }
        ));
    }

    #[test]
    fn table_field_shapes() {
        let Type::Table { fields, .. } =
            decl_type("type T = {read x: number, write [\"k\"]: string, [number]: boolean}")
        else {
            panic!("expected table");
        };
        let fields: Vec<_> = fields.iter().collect();
        assert!(
            matches!(fields[0], TableTypeField::NameProp { access: Some(access), .. } if access.text() == "read")
        );
        assert!(matches!(
            fields[1],
            TableTypeField::StringProp {
                access: Some(_),
                ..
            }
        ));
        assert!(matches!(
            fields[2],
            TableTypeField::Indexer { access: None, .. }
        ));
    }

    #[test]
    fn property_named_read_is_not_a_modifier() {
        let Type::Table { fields, .. } = decl_type("type T = {read: number}") else {
            panic!("expected table");
        };
        assert!(
            matches!(fields.iter().next(), Some(TableTypeField::NameProp { access: None, name, .. }) if name.text() == "read")
        );
    }

    #[test]
    fn optional_postfix_stacks() {
        let Type::Optional { ty, .. } = decl_type("type T = number?") else {
            panic!("expected optional");
        };
        assert!(matches!(*ty, Type::Reference(_)));

        assert!(matches!(
            decl_type("type T = number??"),
            Type::Optional { .. }
        ));
    }

    #[test]
    fn intersection_binds_tighter_than_union() {
        let Type::Union { types, .. } = decl_type("type T = A | B & C | D") else {
            panic!("expected union");
        };
        let members: Vec<_> = types.iter().collect();
        assert_eq!(members.len(), 3);
        assert!(matches!(members[0], Type::Reference(_)));
        assert!(matches!(members[1], Type::Intersection { .. }));
        assert!(matches!(members[2], Type::Reference(_)));
    }

    #[test]
    fn leading_separators_are_kept() {
        let Type::Union { leading, types } = decl_type("type T = | A | B") else {
            panic!("expected union");
        };
        assert!(leading.is_some());
        assert_eq!(types.len(), 2);

        let Type::Intersection { leading, types } = decl_type("type T = & A & B") else {
            panic!("expected intersection");
        };
        assert!(leading.is_some());
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn leading_pipe_single_member_stays_a_union() {
        let Type::Union { types, .. } = decl_type("type T = | A") else {
            panic!("expected union");
        };
        assert_eq!(types.len(), 1);
    }

    #[test]
    fn typeof_type() {
        let Type::Typeof(typeof_type) = decl_type("type T = typeof(require(script.Parent))")
        else {
            panic!("expected typeof");
        };
        assert!(matches!(*typeof_type.expr, crate::cst::Expr::Var(_)));
    }

    #[test]
    fn function_types() {
        let Type::Function(function) = decl_type("type F = (number, string) -> boolean") else {
            panic!("expected function type");
        };
        assert_eq!(function.params.len(), 2);
        assert!(matches!(function.return_type, TypeOrPack::Type(_)));

        let Type::Function(function) = decl_type("type F = <T>(T) -> T") else {
            panic!("expected generic function type");
        };
        assert!(function.generics.is_some());

        let Type::Function(function) = decl_type("type F = (x: number, ...string) -> ()") else {
            panic!("expected function type");
        };
        let params: Vec<_> = function.params.iter().collect();
        assert!(params[0].name.is_some());
        assert!(matches!(params[1].ty, TypeOrPack::Pack(_)));
        assert!(matches!(
            function.return_type,
            TypeOrPack::Pack(TypePack::List { .. })
        ));
    }

    #[test]
    fn curried_function_type() {
        let Type::Function(outer) = decl_type("type F = (A) -> (B) -> C") else {
            panic!("expected function type");
        };
        let TypeOrPack::Type(Type::Function(_)) = &outer.return_type else {
            panic!("expected nested function return");
        };
    }

    #[test]
    fn paren_type_vs_pack() {
        assert!(matches!(decl_type("type T = (number)"), Type::Paren { .. }));
        assert!(matches!(
            decl_type("type T = (number)?"),
            Type::Optional { .. }
        ));
        // A bare multi-type group is only valid before an arrow.
        assert!(parse("type T = (number, string)").is_err());
    }

    #[test]
    fn optional_function_type_needs_parens() {
        let Type::Optional { ty, .. } = decl_type("type F = ((A) -> B)?") else {
            panic!("expected optional");
        };
        assert!(matches!(*ty, Type::Paren { .. }));
    }

    #[test]
    fn generic_defaults_in_type_declarations() {
        let cst = parse("type Box<T = string, U... = ...nil> = T").unwrap();
        let Stat::TypeDecl(decl) = &cst.block.stats[0].0 else {
            panic!("expected decl");
        };
        let params: Vec<_> = decl.generics.as_ref().unwrap().params.iter().collect();
        assert!(matches!(params[0].kind, GenericParamKind::Name(_)));
        assert!(params[0].default.is_some());
        assert!(matches!(params[1].kind, GenericParamKind::Pack { .. }));
        assert!(matches!(
            params[1].default.as_ref().unwrap().ty,
            TypeOrPack::Pack(_)
        ));
    }

    #[test]
    fn generic_names_must_precede_packs() {
        let err = parse("type T<U..., V> = V").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::GenericNameAfterPack);
    }

    #[test]
    fn generic_defaults_must_be_suffix() {
        let err = parse("type T<U = string, V> = V").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingDefaultAfterDefault);
    }

    #[test]
    fn function_signature_generics_reject_defaults() {
        let err = parse("function f<T = number>() end").unwrap_err();
        assert!(err.to_string().contains("'>'"), "{err}");
    }

    #[test]
    fn return_type_packs() {
        for source in [
            "function f(): () end",
            "function f(): (number, string) end",
            "function f(): ...number end",
            "function f(): T... end",
            "function f(): (string, ...number) end",
        ] {
            assert!(parse(source).is_ok(), "{source}");
        }
    }

    #[test]
    fn return_type_single_paren_is_a_type() {
        let cst = parse("function f(): (number) end").unwrap();
        let Stat::Function(function) = &cst.block.stats[0].0 else {
            panic!("expected function");
        };
        let ret = &function.body.return_type.as_ref().unwrap().ty;
        assert!(matches!(ret, TypeOrPack::Type(Type::Paren { .. })));
    }
}
