// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Generic CST traversal.
//!
//! A [`Visitor`] is a set of callbacks, one per node kind plus
//! [`Visitor::visit_token`], all defaulting to no-ops; implementors override
//! only the slots they care about, and the implementing struct carries
//! whatever context the callbacks need. The `walk_*` functions drive a
//! deterministic pre-order, left-to-right traversal that reaches **every
//! token in source order** — trivia is visited indirectly, since tokens carry
//! their preceding trivia.
//!
//! The printer ([`crate::unparse`]) overrides only `visit_token`; the span
//! computer ([`crate::cst::spans`]) does the same to find a subtree's first
//! and last tokens.
//!
//! # Example
//!
//! ```
//! use lunes_core::cst::Stat;
//! use lunes_core::source_analysis::{parse, Token};
//! use lunes_core::visit::{walk_cst, Visitor};
//!
//! #[derive(Default)]
//! struct Counter {
//!     stats: usize,
//!     tokens: usize,
//! }
//!
//! impl Visitor for Counter {
//!     fn visit_stat(&mut self, _stat: &Stat) {
//!         self.stats += 1;
//!     }
//!     fn visit_token(&mut self, _token: &Token) {
//!         self.tokens += 1;
//!     }
//! }
//!
//! let cst = parse("local x = 1\nprint(x)").unwrap();
//! let mut counter = Counter::default();
//! walk_cst(&mut counter, &cst);
//! assert_eq!(counter.stats, 2);
//! assert_eq!(counter.tokens, 9); // includes EOF
//! ```

use crate::cst::{
    Attribute, Binding, Block, Call, Cst, Expr, FunctionArg, FunctionBody, GenericDecl,
    GenericParam, GenericParamKind, InterpString, LastStat, Param, Punctuated, Stat,
    TableConstructor, TableField, TableTypeField, Type, TypeOrPack, TypePack, Var, VarSuffix,
    VarRoot,
};
use crate::source_analysis::Token;

/// A set of traversal callbacks, one per node kind.
///
/// Every method defaults to a no-op, so the trait itself is the "base
/// visitor"; implementors override only what they need.
#[allow(unused_variables)]
pub trait Visitor {
    /// Called for every token, in source order.
    fn visit_token(&mut self, token: &Token) {}

    /// Called for every non-empty or empty block.
    fn visit_block(&mut self, block: &Block) {}
    /// Called for every statement.
    fn visit_stat(&mut self, stat: &Stat) {}
    /// Called for every block-terminating statement.
    fn visit_last_stat(&mut self, last_stat: &LastStat) {}
    /// Called for every expression.
    fn visit_expr(&mut self, expr: &Expr) {}
    /// Called for every var.
    fn visit_var(&mut self, var: &Var) {}
    /// Called for every var suffix.
    fn visit_var_suffix(&mut self, suffix: &VarSuffix) {}
    /// Called for every call argument form.
    fn visit_function_arg(&mut self, arg: &FunctionArg) {}
    /// Called for every table constructor.
    fn visit_table_constructor(&mut self, table: &TableConstructor) {}
    /// Called for every table field.
    fn visit_table_field(&mut self, field: &TableField) {}
    /// Called for every function body.
    fn visit_function_body(&mut self, body: &FunctionBody) {}
    /// Called for every function parameter.
    fn visit_param(&mut self, param: &Param) {}
    /// Called for every binding.
    fn visit_binding(&mut self, binding: &Binding) {}
    /// Called for every function attribute.
    fn visit_attribute(&mut self, attribute: &Attribute) {}
    /// Called for every interpolated string.
    fn visit_interp_string(&mut self, istring: &InterpString) {}
    /// Called for every type.
    fn visit_type(&mut self, ty: &Type) {}
    /// Called for every type pack.
    fn visit_type_pack(&mut self, pack: &TypePack) {}
    /// Called for every table type field.
    fn visit_table_type_field(&mut self, field: &TableTypeField) {}
    /// Called for every generic declaration.
    fn visit_generic_decl(&mut self, decl: &GenericDecl) {}
    /// Called for every generic parameter.
    fn visit_generic_param(&mut self, param: &GenericParam) {}
}

/// Walks a punctuated list: each node via `f`, each separator as a token.
fn walk_punctuated<V: Visitor + ?Sized, T>(
    visitor: &mut V,
    list: &Punctuated<T>,
    mut f: impl FnMut(&mut V, &T),
) {
    for pair in list {
        f(visitor, &pair.node);
        if let Some(sep) = &pair.sep {
            visitor.visit_token(sep);
        }
    }
}

/// Walks a whole chunk: its block, then the EOF token.
pub fn walk_cst<V: Visitor + ?Sized>(visitor: &mut V, cst: &Cst) {
    walk_block(visitor, &cst.block);
    visitor.visit_token(&cst.eof);
}

/// Walks a block's statements and terminating statement.
pub fn walk_block<V: Visitor + ?Sized>(visitor: &mut V, block: &Block) {
    visitor.visit_block(block);
    for (stat, semi) in &block.stats {
        walk_stat(visitor, stat);
        if let Some(semi) = semi {
            visitor.visit_token(semi);
        }
    }
    if let Some((last_stat, semi)) = &block.last_stat {
        walk_last_stat(visitor, last_stat);
        if let Some(semi) = semi {
            visitor.visit_token(semi);
        }
    }
}

/// Walks one statement.
pub fn walk_stat<V: Visitor + ?Sized>(visitor: &mut V, stat: &Stat) {
    visitor.visit_stat(stat);
    match stat {
        Stat::Assign(assign) => {
            walk_punctuated(visitor, &assign.vars, walk_var);
            visitor.visit_token(&assign.eq);
            walk_punctuated(visitor, &assign.exprs, walk_expr);
        }
        Stat::CompoundAssign(assign) => {
            walk_var(visitor, &assign.var);
            visitor.visit_token(&assign.op);
            walk_expr(visitor, &assign.expr);
        }
        Stat::Call(var) => walk_var(visitor, var),
        Stat::Do(stat) => {
            visitor.visit_token(&stat.do_token);
            walk_block(visitor, &stat.block);
            visitor.visit_token(&stat.end_token);
        }
        Stat::While(stat) => {
            visitor.visit_token(&stat.while_token);
            walk_expr(visitor, &stat.condition);
            visitor.visit_token(&stat.do_token);
            walk_block(visitor, &stat.block);
            visitor.visit_token(&stat.end_token);
        }
        Stat::Repeat(stat) => {
            visitor.visit_token(&stat.repeat_token);
            walk_block(visitor, &stat.block);
            visitor.visit_token(&stat.until_token);
            walk_expr(visitor, &stat.condition);
        }
        Stat::If(stat) => {
            visitor.visit_token(&stat.if_token);
            walk_expr(visitor, &stat.condition);
            visitor.visit_token(&stat.then_token);
            walk_block(visitor, &stat.block);
            for branch in &stat.else_if_blocks {
                visitor.visit_token(&branch.elseif_token);
                walk_expr(visitor, &branch.condition);
                visitor.visit_token(&branch.then_token);
                walk_block(visitor, &branch.block);
            }
            if let Some(else_block) = &stat.else_block {
                visitor.visit_token(&else_block.else_token);
                walk_block(visitor, &else_block.block);
            }
            visitor.visit_token(&stat.end_token);
        }
        Stat::NumericFor(stat) => {
            visitor.visit_token(&stat.for_token);
            walk_binding(visitor, &stat.binding);
            visitor.visit_token(&stat.eq);
            walk_expr(visitor, &stat.start);
            visitor.visit_token(&stat.comma);
            walk_expr(visitor, &stat.end);
            if let Some(step) = &stat.step {
                visitor.visit_token(&step.comma);
                walk_expr(visitor, &step.expr);
            }
            visitor.visit_token(&stat.do_token);
            walk_block(visitor, &stat.block);
            visitor.visit_token(&stat.end_token);
        }
        Stat::ForIn(stat) => {
            visitor.visit_token(&stat.for_token);
            walk_punctuated(visitor, &stat.bindings, walk_binding);
            visitor.visit_token(&stat.in_token);
            walk_punctuated(visitor, &stat.exprs, walk_expr);
            visitor.visit_token(&stat.do_token);
            walk_block(visitor, &stat.block);
            visitor.visit_token(&stat.end_token);
        }
        Stat::Function(stat) => {
            for attribute in &stat.attributes {
                walk_attribute(visitor, attribute);
            }
            visitor.visit_token(&stat.function_token);
            visitor.visit_token(&stat.name.base);
            for segment in &stat.name.segments {
                visitor.visit_token(&segment.dot);
                visitor.visit_token(&segment.name);
            }
            if let Some(method) = &stat.name.method {
                visitor.visit_token(&method.colon);
                visitor.visit_token(&method.name);
            }
            walk_function_body(visitor, &stat.body);
        }
        Stat::LocalFunction(stat) => {
            for attribute in &stat.attributes {
                walk_attribute(visitor, attribute);
            }
            visitor.visit_token(&stat.local_token);
            visitor.visit_token(&stat.function_token);
            visitor.visit_token(&stat.name);
            walk_function_body(visitor, &stat.body);
        }
        Stat::LocalVariable(stat) => {
            visitor.visit_token(&stat.local_token);
            walk_punctuated(visitor, &stat.bindings, walk_binding);
            if let Some(eq) = &stat.eq {
                visitor.visit_token(eq);
            }
            walk_punctuated(visitor, &stat.exprs, walk_expr);
        }
        Stat::TypeDecl(stat) => {
            if let Some(export) = &stat.export {
                visitor.visit_token(export);
            }
            visitor.visit_token(&stat.type_token);
            visitor.visit_token(&stat.name);
            if let Some(generics) = &stat.generics {
                walk_generic_decl(visitor, generics);
            }
            visitor.visit_token(&stat.eq);
            walk_type(visitor, &stat.ty);
        }
    }
}

/// Walks one block-terminating statement.
pub fn walk_last_stat<V: Visitor + ?Sized>(visitor: &mut V, last_stat: &LastStat) {
    visitor.visit_last_stat(last_stat);
    match last_stat {
        LastStat::Return { return_token, exprs } => {
            visitor.visit_token(return_token);
            walk_punctuated(visitor, exprs, walk_expr);
        }
        LastStat::Break(token) | LastStat::Continue(token) => visitor.visit_token(token),
    }
}

/// Walks one expression.
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    visitor.visit_expr(expr);
    match expr {
        Expr::Nil(token)
        | Expr::True(token)
        | Expr::False(token)
        | Expr::Number(token)
        | Expr::String(token)
        | Expr::Varargs(token) => visitor.visit_token(token),
        Expr::InterpString(istring) => walk_interp_string(visitor, istring),
        Expr::Table(table) => walk_table_constructor(visitor, table),
        Expr::Function(function) => {
            for attribute in &function.attributes {
                walk_attribute(visitor, attribute);
            }
            visitor.visit_token(&function.function_token);
            walk_function_body(visitor, &function.body);
        }
        Expr::IfElse(if_else) => {
            visitor.visit_token(&if_else.if_token);
            walk_expr(visitor, &if_else.condition);
            visitor.visit_token(&if_else.then_token);
            walk_expr(visitor, &if_else.value);
            for branch in &if_else.else_if_branches {
                visitor.visit_token(&branch.elseif_token);
                walk_expr(visitor, &branch.condition);
                visitor.visit_token(&branch.then_token);
                walk_expr(visitor, &branch.value);
            }
            visitor.visit_token(&if_else.else_token);
            walk_expr(visitor, &if_else.else_value);
        }
        Expr::Var(var) => walk_var(visitor, var),
        Expr::Assertion(assertion) => {
            walk_expr(visitor, &assertion.expr);
            visitor.visit_token(&assertion.colons);
            walk_type(visitor, &assertion.ty);
        }
        Expr::Unary { op, expr } => {
            visitor.visit_token(op);
            walk_expr(visitor, expr);
        }
        Expr::Binary { lhs, op, rhs } => {
            walk_expr(visitor, lhs);
            visitor.visit_token(op);
            walk_expr(visitor, rhs);
        }
    }
}

/// Walks one var: its root, then its suffixes left to right.
pub fn walk_var<V: Visitor + ?Sized>(visitor: &mut V, var: &Var) {
    visitor.visit_var(var);
    match &var.root {
        VarRoot::Name(token) => visitor.visit_token(token),
        VarRoot::Paren { parens, expr } => {
            visitor.visit_token(&parens.open);
            walk_expr(visitor, expr);
            visitor.visit_token(&parens.close);
        }
    }
    for suffix in &var.suffixes {
        walk_var_suffix(visitor, suffix);
    }
}

/// Walks one var suffix.
pub fn walk_var_suffix<V: Visitor + ?Sized>(visitor: &mut V, suffix: &VarSuffix) {
    visitor.visit_var_suffix(suffix);
    match suffix {
        VarSuffix::NameIndex { dot, name } => {
            visitor.visit_token(dot);
            visitor.visit_token(name);
        }
        VarSuffix::ExprIndex { bracks, expr } => {
            visitor.visit_token(&bracks.open);
            walk_expr(visitor, expr);
            visitor.visit_token(&bracks.close);
        }
        VarSuffix::Call(call) => walk_call(visitor, call),
    }
}

/// Walks one call suffix.
pub fn walk_call<V: Visitor + ?Sized>(visitor: &mut V, call: &Call) {
    if let Some(method) = &call.method {
        visitor.visit_token(&method.colon);
        visitor.visit_token(&method.name);
    }
    walk_function_arg(visitor, &call.arg);
}

/// Walks one call argument form.
pub fn walk_function_arg<V: Visitor + ?Sized>(visitor: &mut V, arg: &FunctionArg) {
    visitor.visit_function_arg(arg);
    match arg {
        FunctionArg::Pack { parens, exprs } => {
            visitor.visit_token(&parens.open);
            walk_punctuated(visitor, exprs, walk_expr);
            visitor.visit_token(&parens.close);
        }
        FunctionArg::Table(table) => walk_table_constructor(visitor, table),
        FunctionArg::String(token) => visitor.visit_token(token),
    }
}

/// Walks one table constructor.
pub fn walk_table_constructor<V: Visitor + ?Sized>(visitor: &mut V, table: &TableConstructor) {
    visitor.visit_table_constructor(table);
    visitor.visit_token(&table.braces.open);
    walk_punctuated(visitor, &table.fields, walk_table_field);
    visitor.visit_token(&table.braces.close);
}

/// Walks one table field.
pub fn walk_table_field<V: Visitor + ?Sized>(visitor: &mut V, field: &TableField) {
    visitor.visit_table_field(field);
    match field {
        TableField::NameKey { name, eq, value } => {
            visitor.visit_token(name);
            visitor.visit_token(eq);
            walk_expr(visitor, value);
        }
        TableField::ExprKey {
            bracks,
            key,
            eq,
            value,
        } => {
            visitor.visit_token(&bracks.open);
            walk_expr(visitor, key);
            visitor.visit_token(&bracks.close);
            visitor.visit_token(eq);
            walk_expr(visitor, value);
        }
        TableField::NoKey(value) => walk_expr(visitor, value),
    }
}

/// Walks one interpolated string.
pub fn walk_interp_string<V: Visitor + ?Sized>(visitor: &mut V, istring: &InterpString) {
    visitor.visit_interp_string(istring);
    match istring {
        InterpString::Simple(token) => visitor.visit_token(token),
        InterpString::Complex { begin, segments } => {
            visitor.visit_token(begin);
            for segment in segments {
                walk_expr(visitor, &segment.expr);
                visitor.visit_token(&segment.literal);
            }
        }
    }
}

/// Walks one function attribute.
pub fn walk_attribute<V: Visitor + ?Sized>(visitor: &mut V, attribute: &Attribute) {
    visitor.visit_attribute(attribute);
    visitor.visit_token(&attribute.at);
    visitor.visit_token(&attribute.name);
}

/// Walks one function body: signature, block, `end`.
pub fn walk_function_body<V: Visitor + ?Sized>(visitor: &mut V, body: &FunctionBody) {
    visitor.visit_function_body(body);
    if let Some(generics) = &body.generics {
        walk_generic_decl(visitor, generics);
    }
    visitor.visit_token(&body.parens.open);
    walk_punctuated(visitor, &body.params, walk_param);
    visitor.visit_token(&body.parens.close);
    if let Some(return_type) = &body.return_type {
        visitor.visit_token(&return_type.colon);
        walk_type_or_pack(visitor, &return_type.ty);
    }
    walk_block(visitor, &body.block);
    visitor.visit_token(&body.end_token);
}

/// Walks one function parameter.
pub fn walk_param<V: Visitor + ?Sized>(visitor: &mut V, param: &Param) {
    visitor.visit_param(param);
    match param {
        Param::Name(binding) => walk_binding(visitor, binding),
        Param::Varargs {
            ellipsis,
            annotation,
        } => {
            visitor.visit_token(ellipsis);
            if let Some(annotation) = annotation {
                visitor.visit_token(&annotation.colon);
                walk_type_or_pack(visitor, &annotation.ty);
            }
        }
    }
}

/// Walks one binding.
pub fn walk_binding<V: Visitor + ?Sized>(visitor: &mut V, binding: &Binding) {
    visitor.visit_binding(binding);
    visitor.visit_token(&binding.name);
    if let Some(annotation) = &binding.annotation {
        visitor.visit_token(&annotation.colon);
        walk_type(visitor, &annotation.ty);
    }
}

/// Walks one generic declaration.
pub fn walk_generic_decl<V: Visitor + ?Sized>(visitor: &mut V, decl: &GenericDecl) {
    visitor.visit_generic_decl(decl);
    visitor.visit_token(&decl.angles.open);
    walk_punctuated(visitor, &decl.params, walk_generic_param);
    visitor.visit_token(&decl.angles.close);
}

/// Walks one generic parameter.
pub fn walk_generic_param<V: Visitor + ?Sized>(visitor: &mut V, param: &GenericParam) {
    visitor.visit_generic_param(param);
    match &param.kind {
        GenericParamKind::Name(name) => visitor.visit_token(name),
        GenericParamKind::Pack { name, ellipsis } => {
            visitor.visit_token(name);
            visitor.visit_token(ellipsis);
        }
    }
    if let Some(default) = &param.default {
        visitor.visit_token(&default.eq);
        walk_type_or_pack(visitor, &default.ty);
    }
}

/// Walks one type.
pub fn walk_type<V: Visitor + ?Sized>(visitor: &mut V, ty: &Type) {
    visitor.visit_type(ty);
    match ty {
        Type::Nil(token) | Type::Boolean(token) | Type::String(token) => {
            visitor.visit_token(token);
        }
        Type::Reference(reference) => {
            if let Some(prefix) = &reference.prefix {
                visitor.visit_token(&prefix.name);
                visitor.visit_token(&prefix.dot);
            }
            visitor.visit_token(&reference.name);
            if let Some(generics) = &reference.generics {
                visitor.visit_token(&generics.angles.open);
                walk_punctuated(visitor, &generics.args, walk_type_or_pack);
                visitor.visit_token(&generics.angles.close);
            }
        }
        Type::Typeof(typeof_type) => {
            visitor.visit_token(&typeof_type.typeof_token);
            visitor.visit_token(&typeof_type.parens.open);
            walk_expr(visitor, &typeof_type.expr);
            visitor.visit_token(&typeof_type.parens.close);
        }
        Type::Array { braces, ty } => {
            visitor.visit_token(&braces.open);
            walk_type(visitor, ty);
            visitor.visit_token(&braces.close);
        }
        Type::Table { braces, fields } => {
            visitor.visit_token(&braces.open);
            walk_punctuated(visitor, fields, walk_table_type_field);
            visitor.visit_token(&braces.close);
        }
        Type::Function(function) => {
            if let Some(generics) = &function.generics {
                walk_generic_decl(visitor, generics);
            }
            visitor.visit_token(&function.parens.open);
            walk_punctuated(visitor, &function.params, |visitor, param| {
                if let Some(name) = &param.name {
                    visitor.visit_token(&name.name);
                    visitor.visit_token(&name.colon);
                }
                walk_type_or_pack(visitor, &param.ty);
            });
            visitor.visit_token(&function.parens.close);
            visitor.visit_token(&function.arrow);
            walk_type_or_pack(visitor, &function.return_type);
        }
        Type::Paren { parens, ty } => {
            visitor.visit_token(&parens.open);
            walk_type(visitor, ty);
            visitor.visit_token(&parens.close);
        }
        Type::Optional { ty, question } => {
            walk_type(visitor, ty);
            visitor.visit_token(question);
        }
        Type::Union { leading, types } | Type::Intersection { leading, types } => {
            if let Some(leading) = leading {
                visitor.visit_token(leading);
            }
            walk_punctuated(visitor, types, walk_type);
        }
    }
}

/// Walks one type pack.
pub fn walk_type_pack<V: Visitor + ?Sized>(visitor: &mut V, pack: &TypePack) {
    visitor.visit_type_pack(pack);
    match pack {
        TypePack::Variadic { ellipsis, ty } => {
            visitor.visit_token(ellipsis);
            walk_type(visitor, ty);
        }
        TypePack::Generic { name, ellipsis } => {
            visitor.visit_token(name);
            visitor.visit_token(ellipsis);
        }
        TypePack::List { parens, types } => {
            visitor.visit_token(&parens.open);
            walk_punctuated(visitor, types, walk_type_or_pack);
            visitor.visit_token(&parens.close);
        }
    }
}

/// Walks a type-or-pack wrapper.
pub fn walk_type_or_pack<V: Visitor + ?Sized>(visitor: &mut V, ty: &TypeOrPack) {
    match ty {
        TypeOrPack::Type(ty) => walk_type(visitor, ty),
        TypeOrPack::Pack(pack) => walk_type_pack(visitor, pack),
    }
}

/// Walks one table type field.
pub fn walk_table_type_field<V: Visitor + ?Sized>(visitor: &mut V, field: &TableTypeField) {
    visitor.visit_table_type_field(field);
    match field {
        TableTypeField::NameProp {
            access,
            name,
            colon,
            ty,
        } => {
            if let Some(access) = access {
                visitor.visit_token(access);
            }
            visitor.visit_token(name);
            visitor.visit_token(colon);
            walk_type(visitor, ty);
        }
        TableTypeField::StringProp {
            access,
            bracks,
            key,
            colon,
            ty,
        } => {
            if let Some(access) = access {
                visitor.visit_token(access);
            }
            visitor.visit_token(&bracks.open);
            visitor.visit_token(key);
            visitor.visit_token(&bracks.close);
            visitor.visit_token(colon);
            walk_type(visitor, ty);
        }
        TableTypeField::Indexer {
            access,
            bracks,
            key,
            colon,
            ty,
        } => {
            if let Some(access) = access {
                visitor.visit_token(access);
            }
            visitor.visit_token(&bracks.open);
            walk_type(visitor, key);
            visitor.visit_token(&bracks.close);
            visitor.visit_token(colon);
            walk_type(visitor, ty);
        }
    }
}
