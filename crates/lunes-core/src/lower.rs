// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lowering from the lossless CST to the lossy AST.
//!
//! Lowering discards delimiters, separator tokens, and trivia, and flattens
//! punctuated lists into plain vectors. Everything semantic survives: the
//! resulting [`ast`] tree has the same structure the CST encodes, minus the
//! bytes needed only for round-tripping.
//!
//! The operator conversions use an `expect` on grammar invariants the parser
//! already enforced (an operator token in operator position); hitting one
//! would mean the CST and AST drifted apart.
//!
//! # Example
//!
//! ```
//! use lunes_core::ast;
//! use lunes_core::lower::lower;
//! use lunes_core::source_analysis::parse;
//!
//! let cst = parse("return 1").unwrap();
//! let block = lower(&cst);
//! assert!(matches!(block.last_stat, Some(ast::LastStat::Return { .. })));
//! ```

use ecow::EcoString;

use crate::ast;
use crate::cst;
use crate::source_analysis::{Token, TokenKind};

/// Lowers a parsed chunk to its lossy AST.
#[must_use]
pub fn lower(cst: &cst::Cst) -> ast::Block {
    lower_block(&cst.block)
}

fn text(token: &Token) -> EcoString {
    EcoString::from(token.text())
}

fn lower_block(block: &cst::Block) -> ast::Block {
    ast::Block {
        stats: block.stats.iter().map(|(stat, _)| lower_stat(stat)).collect(),
        last_stat: block
            .last_stat
            .as_ref()
            .map(|(last_stat, _)| lower_last_stat(last_stat)),
    }
}

fn lower_last_stat(last_stat: &cst::LastStat) -> ast::LastStat {
    match last_stat {
        cst::LastStat::Return { exprs, .. } => ast::LastStat::Return {
            exprs: exprs.iter().map(lower_expr).collect(),
        },
        cst::LastStat::Break(_) => ast::LastStat::Break,
        cst::LastStat::Continue(_) => ast::LastStat::Continue,
    }
}

fn lower_stat(stat: &cst::Stat) -> ast::Stat {
    match stat {
        cst::Stat::Assign(assign) => ast::Stat::Assign {
            vars: assign.vars.iter().map(lower_var).collect(),
            exprs: assign.exprs.iter().map(lower_expr).collect(),
        },
        cst::Stat::CompoundAssign(assign) => ast::Stat::CompoundAssign {
            var: lower_var(&assign.var),
            operator: ast::CompoundOp::from_token(assign.op.kind())
                .expect("parser stored a compound operator"),
            expr: lower_expr(&assign.expr),
        },
        cst::Stat::Call(var) => ast::Stat::Call {
            var: lower_var(var),
        },
        cst::Stat::Do(stat) => ast::Stat::Do {
            block: lower_block(&stat.block),
        },
        cst::Stat::While(stat) => ast::Stat::While {
            condition: lower_expr(&stat.condition),
            block: lower_block(&stat.block),
        },
        cst::Stat::Repeat(stat) => ast::Stat::Repeat {
            block: lower_block(&stat.block),
            condition: lower_expr(&stat.condition),
        },
        cst::Stat::If(stat) => {
            let mut branches = vec![(lower_expr(&stat.condition), lower_block(&stat.block))];
            for branch in &stat.else_if_blocks {
                branches.push((lower_expr(&branch.condition), lower_block(&branch.block)));
            }
            ast::Stat::If {
                branches,
                else_block: stat
                    .else_block
                    .as_ref()
                    .map(|else_block| lower_block(&else_block.block)),
            }
        }
        cst::Stat::NumericFor(stat) => ast::Stat::NumericFor {
            binding: lower_binding(&stat.binding),
            start: lower_expr(&stat.start),
            end: lower_expr(&stat.end),
            step: stat.step.as_ref().map(|step| lower_expr(&step.expr)),
            block: lower_block(&stat.block),
        },
        cst::Stat::ForIn(stat) => ast::Stat::ForIn {
            bindings: stat.bindings.iter().map(lower_binding).collect(),
            exprs: stat.exprs.iter().map(lower_expr).collect(),
            block: lower_block(&stat.block),
        },
        cst::Stat::Function(stat) => ast::Stat::Function {
            attributes: lower_attributes(&stat.attributes),
            name: ast::FunctionName {
                base: text(&stat.name.base),
                keys: stat
                    .name
                    .segments
                    .iter()
                    .map(|segment| text(&segment.name))
                    .collect(),
                method: stat.name.method.as_ref().map(|method| text(&method.name)),
            },
            body: lower_function_body(&stat.body),
        },
        cst::Stat::LocalFunction(stat) => ast::Stat::LocalFunction {
            attributes: lower_attributes(&stat.attributes),
            name: text(&stat.name),
            body: lower_function_body(&stat.body),
        },
        cst::Stat::LocalVariable(stat) => ast::Stat::LocalVariable {
            bindings: stat.bindings.iter().map(lower_binding).collect(),
            exprs: stat.exprs.iter().map(lower_expr).collect(),
        },
        cst::Stat::TypeDecl(stat) => ast::Stat::Type {
            export: stat.export.is_some(),
            name: text(&stat.name),
            generics: stat
                .generics
                .as_ref()
                .map(lower_generic_params)
                .unwrap_or_default(),
            ty: lower_type(&stat.ty),
        },
    }
}

fn lower_attributes(attributes: &[cst::Attribute]) -> Vec<EcoString> {
    attributes
        .iter()
        .map(|attribute| text(&attribute.name))
        .collect()
}

fn lower_binding(binding: &cst::Binding) -> ast::Binding {
    ast::Binding {
        name: text(&binding.name),
        ty: binding
            .annotation
            .as_ref()
            .map(|annotation| lower_type(&annotation.ty)),
    }
}

fn lower_function_body(body: &cst::FunctionBody) -> ast::FunctionBody {
    let mut params = Vec::new();
    let mut varargs = None;
    for param in body.params.iter() {
        match param {
            cst::Param::Name(binding) => params.push(lower_binding(binding)),
            cst::Param::Varargs { annotation, .. } => {
                varargs = Some(ast::Varargs {
                    annotation: annotation
                        .as_ref()
                        .map(|annotation| lower_type_or_pack(&annotation.ty)),
                });
            }
        }
    }
    ast::FunctionBody {
        generics: body.generics.as_ref().map(lower_generics),
        params,
        varargs,
        ret: body
            .return_type
            .as_ref()
            .map(|return_type| lower_type_or_pack(&return_type.ty)),
        body: lower_block(&body.block),
    }
}

/// Lowers signature generics (no defaults) to name lists.
fn lower_generics(decl: &cst::GenericDecl) -> ast::Generics {
    let mut generics = ast::Generics::default();
    for param in decl.params.iter() {
        match &param.kind {
            cst::GenericParamKind::Name(name) => generics.types.push(text(name)),
            cst::GenericParamKind::Pack { name, .. } => generics.packs.push(text(name)),
        }
    }
    generics
}

/// Lowers declaration generics, defaults included.
fn lower_generic_params(decl: &cst::GenericDecl) -> Vec<ast::GenericParam> {
    decl.params
        .iter()
        .map(|param| ast::GenericParam {
            kind: match &param.kind {
                cst::GenericParamKind::Name(name) => ast::GenericParamKind::Name(text(name)),
                cst::GenericParamKind::Pack { name, .. } => {
                    ast::GenericParamKind::Pack(text(name))
                }
            },
            default: param
                .default
                .as_ref()
                .map(|default| lower_type_or_pack(&default.ty)),
        })
        .collect()
}

// ============================================================================
// Expressions
// ============================================================================

fn lower_expr(expr: &cst::Expr) -> ast::Expr {
    match expr {
        cst::Expr::Nil(_) => ast::Expr::Nil,
        cst::Expr::True(_) => ast::Expr::Boolean { value: true },
        cst::Expr::False(_) => ast::Expr::Boolean { value: false },
        cst::Expr::Number(token) => ast::Expr::Number { value: text(token) },
        cst::Expr::String(token) => ast::Expr::String { value: text(token) },
        cst::Expr::Varargs(_) => ast::Expr::Varargs,
        cst::Expr::InterpString(istring) => ast::Expr::IString {
            value: lower_interp_string(istring),
        },
        cst::Expr::Table(table) => ast::Expr::Table {
            table: lower_table(table),
        },
        cst::Expr::Function(function) => ast::Expr::Function {
            attributes: lower_attributes(&function.attributes),
            body: lower_function_body(&function.body),
        },
        cst::Expr::IfElse(if_else) => {
            let mut branches = vec![(
                lower_expr(&if_else.condition),
                lower_expr(&if_else.value),
            )];
            for branch in &if_else.else_if_branches {
                branches.push((lower_expr(&branch.condition), lower_expr(&branch.value)));
            }
            ast::Expr::IfElse {
                branches,
                else_body: Box::new(lower_expr(&if_else.else_value)),
            }
        }
        cst::Expr::Var(var) => ast::Expr::Var {
            var: lower_var(var),
        },
        cst::Expr::Assertion(assertion) => ast::Expr::Assertion {
            expr: Box::new(lower_expr(&assertion.expr)),
            ty: lower_type(&assertion.ty),
        },
        cst::Expr::Unary { op, expr } => ast::Expr::Unary {
            operator: ast::UnOp::from_token(op.kind()).expect("parser stored a unary operator"),
            expr: Box::new(lower_expr(expr)),
        },
        cst::Expr::Binary { lhs, op, rhs } => ast::Expr::Binary {
            left: Box::new(lower_expr(lhs)),
            operator: ast::BinOp::from_token(op.kind())
                .expect("parser stored a binary operator"),
            right: Box::new(lower_expr(rhs)),
        },
    }
}

fn lower_interp_string(istring: &cst::InterpString) -> Vec<ast::IStringPart> {
    match istring {
        cst::InterpString::Simple(token) => vec![ast::IStringPart::Text(text(token))],
        cst::InterpString::Complex { begin, segments } => {
            let mut parts = vec![ast::IStringPart::Text(text(begin))];
            for segment in segments {
                parts.push(ast::IStringPart::Expr(lower_expr(&segment.expr)));
                parts.push(ast::IStringPart::Text(text(&segment.literal)));
            }
            parts
        }
    }
}

fn lower_var(var: &cst::Var) -> ast::Var {
    ast::Var {
        root: match &var.root {
            cst::VarRoot::Name(name) => ast::VarRoot::Name { name: text(name) },
            cst::VarRoot::Paren { expr, .. } => ast::VarRoot::Paren {
                expr: Box::new(lower_expr(expr)),
            },
        },
        suffixes: var.suffixes.iter().map(lower_var_suffix).collect(),
    }
}

fn lower_var_suffix(suffix: &cst::VarSuffix) -> ast::VarSuffix {
    match suffix {
        cst::VarSuffix::NameIndex { name, .. } => ast::VarSuffix::NameIndex { name: text(name) },
        cst::VarSuffix::ExprIndex { expr, .. } => ast::VarSuffix::ExprIndex {
            expr: lower_expr(expr),
        },
        cst::VarSuffix::Call(call) => ast::VarSuffix::Call {
            method: call.method.as_ref().map(|method| text(&method.name)),
            arg: lower_function_arg(&call.arg),
        },
    }
}

fn lower_function_arg(arg: &cst::FunctionArg) -> ast::FunctionArg {
    match arg {
        cst::FunctionArg::Pack { exprs, .. } => ast::FunctionArg::Pack {
            exprs: exprs.iter().map(lower_expr).collect(),
        },
        cst::FunctionArg::Table(table) => ast::FunctionArg::Table {
            table: lower_table(table),
        },
        cst::FunctionArg::String(token) => ast::FunctionArg::String { value: text(token) },
    }
}

fn lower_table(table: &cst::TableConstructor) -> Vec<ast::TableField> {
    table
        .fields
        .iter()
        .map(|field| match field {
            cst::TableField::NameKey { name, value, .. } => ast::TableField::NameKey {
                name: text(name),
                value: lower_expr(value),
            },
            cst::TableField::ExprKey { key, value, .. } => ast::TableField::ExprKey {
                key: lower_expr(key),
                value: lower_expr(value),
            },
            cst::TableField::NoKey(value) => ast::TableField::NoKey {
                value: lower_expr(value),
            },
        })
        .collect()
}

// ============================================================================
// Types
// ============================================================================

fn lower_type(ty: &cst::Type) -> ast::Type {
    match ty {
        cst::Type::Nil(_) => ast::Type::Nil,
        cst::Type::Boolean(token) => ast::Type::Boolean {
            value: token.kind() == TokenKind::True,
        },
        cst::Type::String(token) => ast::Type::String { value: text(token) },
        cst::Type::Reference(reference) => ast::Type::Reference {
            prefix: reference.prefix.as_ref().map(|prefix| text(&prefix.name)),
            name: text(&reference.name),
            generics: reference
                .generics
                .as_ref()
                .map(|generics| generics.args.iter().map(lower_type_or_pack).collect())
                .unwrap_or_default(),
        },
        cst::Type::Typeof(typeof_type) => ast::Type::Typeof {
            expr: Box::new(lower_expr(&typeof_type.expr)),
        },
        cst::Type::Array { ty, .. } => ast::Type::Array {
            ty: Box::new(lower_type(ty)),
        },
        cst::Type::Table { fields, .. } => ast::Type::Table {
            fields: fields.iter().map(lower_table_type_field).collect(),
        },
        cst::Type::Function(function) => {
            let mut params = Vec::new();
            let mut varargs = None;
            for param in function.params.iter() {
                match &param.ty {
                    cst::TypeOrPack::Type(ty) => params.push(lower_type(ty)),
                    cst::TypeOrPack::Pack(pack) => {
                        varargs = Some(Box::new(lower_type_pack(pack)));
                    }
                }
            }
            ast::Type::Function {
                generics: function.generics.as_ref().map(lower_generics),
                params,
                varargs,
                ret: Some(Box::new(lower_type_or_pack(&function.return_type))),
            }
        }
        cst::Type::Paren { ty, .. } => ast::Type::Paren {
            ty: Box::new(lower_type(ty)),
        },
        cst::Type::Optional { ty, .. } => ast::Type::Optional {
            ty: Box::new(lower_type(ty)),
        },
        cst::Type::Union { types, .. } => ast::Type::Union {
            types: types.iter().map(lower_type).collect(),
        },
        cst::Type::Intersection { types, .. } => ast::Type::Intersection {
            types: types.iter().map(lower_type).collect(),
        },
    }
}

fn lower_type_or_pack(ty: &cst::TypeOrPack) -> ast::TypeOrPack {
    match ty {
        cst::TypeOrPack::Type(ty) => ast::TypeOrPack::Type(lower_type(ty)),
        cst::TypeOrPack::Pack(pack) => ast::TypeOrPack::Pack(lower_type_pack(pack)),
    }
}

fn lower_type_pack(pack: &cst::TypePack) -> ast::TypePack {
    match pack {
        cst::TypePack::Variadic { ty, .. } => ast::TypePack::Variadic {
            ty: Box::new(lower_type(ty)),
        },
        cst::TypePack::Generic { name, .. } => ast::TypePack::Generic { name: text(name) },
        cst::TypePack::List { types: members, .. } => {
            let mut types = Vec::new();
            let mut tail = None;
            for member in members.iter() {
                match member {
                    cst::TypeOrPack::Type(ty) => types.push(lower_type(ty)),
                    cst::TypeOrPack::Pack(pack) => {
                        tail = Some(Box::new(lower_type_pack(pack)));
                    }
                }
            }
            ast::TypePack::List { types, tail }
        }
    }
}

fn lower_table_type_field(field: &cst::TableTypeField) -> ast::TableTypeField {
    let lower_access = |access: &Option<Token>| {
        access.as_ref().map(|token| match token.text() {
            "read" => ast::Access::Read,
            _ => ast::Access::Write,
        })
    };
    match field {
        cst::TableTypeField::NameProp {
            access, name, ty, ..
        } => ast::TableTypeField::NameProp {
            access: lower_access(access),
            name: text(name),
            ty: lower_type(ty),
        },
        cst::TableTypeField::StringProp {
            access, key, ty, ..
        } => ast::TableTypeField::StringProp {
            access: lower_access(access),
            key: text(key),
            ty: lower_type(ty),
        },
        cst::TableTypeField::Indexer {
            access, key, ty, ..
        } => ast::TableTypeField::Indexer {
            access: lower_access(access),
            key: lower_type(key),
            ty: lower_type(ty),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::parse;

    fn lower_source(source: &str) -> ast::Block {
        lower(&parse(source).unwrap())
    }

    #[test]
    fn lowers_return_number() {
        let block = lower_source("return 1");
        assert!(block.stats.is_empty());
        let Some(ast::LastStat::Return { exprs }) = block.last_stat else {
            panic!("expected return");
        };
        assert_eq!(exprs, vec![ast::Expr::Number { value: "1".into() }]);
    }

    #[test]
    fn lowers_compound_assign() {
        let block = lower_source("x ..= 'tail'");
        let ast::Stat::CompoundAssign { operator, .. } = &block.stats[0] else {
            panic!("expected compound assign");
        };
        assert_eq!(*operator, ast::CompoundOp::Concat);
    }

    #[test]
    fn lowers_interp_string_parts() {
        let block = lower_source("local s = `a {x} b`");
        let ast::Stat::LocalVariable { exprs, .. } = &block.stats[0] else {
            panic!("expected local");
        };
        let ast::Expr::IString { value } = &exprs[0] else {
            panic!("expected istring");
        };
        assert_eq!(value.len(), 3);
        assert!(matches!(&value[0], ast::IStringPart::Text(t) if t == "`a {"));
        assert!(matches!(&value[1], ast::IStringPart::Expr(_)));
        assert!(matches!(&value[2], ast::IStringPart::Text(t) if t == "} b`"));
    }

    #[test]
    fn lowers_numeric_for() {
        let block = lower_source("for i = 1, 10, 2 do end");
        let ast::Stat::NumericFor { binding, step, .. } = &block.stats[0] else {
            panic!("expected numeric for");
        };
        assert_eq!(binding.name, "i");
        assert!(step.is_some());
    }

    #[test]
    fn lowers_call_chain() {
        let block = lower_source("a.b:c(1)(2)");
        let ast::Stat::Call { var } = &block.stats[0] else {
            panic!("expected call");
        };
        assert_eq!(var.suffixes.len(), 3);
        assert!(
            matches!(&var.suffixes[1], ast::VarSuffix::Call { method: Some(m), .. } if m == "c")
        );
    }

    #[test]
    fn lowers_type_declaration_with_generics() {
        let block = lower_source("export type Box<T = string> = { value: T }");
        let ast::Stat::Type {
            export,
            name,
            generics,
            ty,
        } = &block.stats[0]
        else {
            panic!("expected type decl");
        };
        assert!(*export);
        assert_eq!(name, "Box");
        assert_eq!(generics.len(), 1);
        assert!(generics[0].default.is_some());
        assert!(matches!(ty, ast::Type::Table { .. }));
    }

    #[test]
    fn lowers_function_type_with_pack() {
        let block = lower_source("type F = (number, ...string) -> (boolean, ...nil)");
        let ast::Stat::Type { ty, .. } = &block.stats[0] else {
            panic!("expected type decl");
        };
        let ast::Type::Function {
            params,
            varargs,
            ret,
            ..
        } = ty
        else {
            panic!("expected function type");
        };
        assert_eq!(params.len(), 1);
        assert!(varargs.is_some());
        let Some(ret) = ret else {
            panic!("expected return");
        };
        assert!(
            matches!(&**ret, ast::TypeOrPack::Pack(ast::TypePack::List { types, tail }) if types.len() == 1 && tail.is_some())
        );
    }

    #[test]
    fn lowers_if_with_branches() {
        let block = lower_source("if a then elseif b then else end");
        let ast::Stat::If {
            branches,
            else_block,
        } = &block.stats[0]
        else {
            panic!("expected if");
        };
        assert_eq!(branches.len(), 2);
        assert!(else_block.is_some());
    }
}
