// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! On-demand span synthesis for CST nodes.
//!
//! Composite nodes do not store spans. A node's span is derived by walking
//! its subtree and joining the spans of its first and last tokens, which
//! yields exactly the rules of the grammar: a reference type spans from its
//! prefix (if any) through its generics (if any); a var spans from its root
//! through its final suffix; a block spans from its first statement through
//! its last statement or trailing semicolon, whichever is latest.
//!
//! Not storing spans halves node size and removes a class of update bugs, at
//! the cost of a recursive walk per query.
//!
//! # Empty blocks
//!
//! An empty block contains no tokens and therefore has no span:
//! [`Block::span`] returns `Option<Span>`, and `None` marks the error case.

use crate::source_analysis::{Span, Token};
use crate::visit::{
    walk_attribute, walk_binding, walk_block, walk_cst, walk_expr, walk_function_arg,
    walk_function_body, walk_generic_decl, walk_generic_param, walk_interp_string, walk_last_stat,
    walk_param, walk_stat, walk_table_constructor, walk_table_field, walk_table_type_field,
    walk_type, walk_type_or_pack, walk_type_pack, walk_var, walk_var_suffix, Visitor,
};

use super::{
    Attribute, Binding, Block, Cst, Expr, FunctionArg, FunctionBody, GenericDecl, GenericParam,
    InterpString, LastStat, Param, Stat, TableConstructor, TableField, TableTypeField, Type,
    TypeOrPack, TypePack, Var, VarSuffix,
};

/// A visitor that records the first and last token spans of a walk.
#[derive(Debug, Default)]
struct SpanCollector {
    first: Option<Span>,
    last: Option<Span>,
}

impl SpanCollector {
    /// The joined span, or `None` if the walk saw no tokens.
    fn joined(&self) -> Option<Span> {
        match (self.first, self.last) {
            (Some(first), Some(last)) => Some(first.through(last)),
            _ => None,
        }
    }
}

impl Visitor for SpanCollector {
    fn visit_token(&mut self, token: &Token) {
        let span = token.span();
        if self.first.is_none() {
            self.first = Some(span);
        }
        self.last = Some(span);
    }
}

/// A CST node with a derivable span.
pub trait Spanned {
    /// The byte range this node covers, from its first token's start to its
    /// last token's end.
    fn span(&self) -> Span;
}

impl Spanned for Token {
    fn span(&self) -> Span {
        Token::span(self)
    }
}

impl Spanned for Cst {
    fn span(&self) -> Span {
        let mut collector = SpanCollector::default();
        walk_cst(&mut collector, self);
        // The EOF token is always present.
        collector.joined().expect("a chunk always contains EOF")
    }
}

impl Block {
    /// The span of this block, or `None` if the block is empty.
    ///
    /// Every other node always contains at least one token; blocks are the
    /// one shape that may contain none, so their span is fallible.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        let mut collector = SpanCollector::default();
        walk_block(&mut collector, self);
        collector.joined()
    }
}

macro_rules! spanned_via_walk {
    ($($ty:ty => $walk:path),+ $(,)?) => {
        $(
            impl Spanned for $ty {
                fn span(&self) -> Span {
                    let mut collector = SpanCollector::default();
                    $walk(&mut collector, self);
                    collector
                        .joined()
                        .expect("non-block nodes contain at least one token")
                }
            }
        )+
    };
}

spanned_via_walk! {
    Type => walk_type,
    TypePack => walk_type_pack,
    TypeOrPack => walk_type_or_pack,
    TableTypeField => walk_table_type_field,
    GenericDecl => walk_generic_decl,
    GenericParam => walk_generic_param,
    Expr => walk_expr,
    InterpString => walk_interp_string,
    Var => walk_var,
    VarSuffix => walk_var_suffix,
    FunctionArg => walk_function_arg,
    TableConstructor => walk_table_constructor,
    TableField => walk_table_field,
    FunctionBody => walk_function_body,
    Param => walk_param,
    Binding => walk_binding,
    Attribute => walk_attribute,
    Stat => walk_stat,
    LastStat => walk_last_stat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::parse;

    #[test]
    fn numeric_for_spans_for_through_end() {
        let source = "for i = 1, 10, 2 do end";
        let cst = parse(source).unwrap();
        let (stat, _) = &cst.block.stats[0];
        assert_eq!(stat.span(), Span::new(0, source.len() as u32));
    }

    #[test]
    fn stat_span_excludes_surrounding_trivia() {
        let cst = parse("  -- leading\n  x = 1  ").unwrap();
        let (stat, _) = &cst.block.stats[0];
        assert_eq!(stat.span(), Span::new(15, 20));
    }

    #[test]
    fn block_span_includes_trailing_semicolon() {
        let cst = parse("x = 1 ;").unwrap();
        assert_eq!(cst.block.span(), Some(Span::new(0, 7)));
    }

    #[test]
    fn empty_block_has_no_span() {
        let cst = parse("").unwrap();
        assert_eq!(cst.block.span(), None);

        let cst = parse("while x do end").unwrap();
        let Stat::While(while_stat) = &cst.block.stats[0].0 else {
            panic!("expected while");
        };
        assert_eq!(while_stat.block.span(), None);
    }

    #[test]
    fn cst_span_covers_everything_via_eof() {
        let source = "return 1 -- trailing\n";
        let cst = parse(source).unwrap();
        let span = cst.span();
        assert_eq!(span.start(), 0);
        // EOF sits at the very end of the buffer.
        assert_eq!(span.end(), source.len() as u32);
    }

    #[test]
    fn var_span_runs_root_through_final_suffix() {
        let cst = parse("a.b:c(1)(2)").unwrap();
        let Stat::Call(var) = &cst.block.stats[0].0 else {
            panic!("expected call stat");
        };
        assert_eq!(var.span(), Span::new(0, 11));
        assert_eq!(var.suffixes[0].span(), Span::new(1, 3));
        assert_eq!(var.suffixes[1].span(), Span::new(3, 8));
        assert_eq!(var.suffixes[2].span(), Span::new(8, 11));
    }

    #[test]
    fn descendant_tokens_stay_within_ancestor_spans() {
        struct TokenSpans(Vec<Span>);
        impl Visitor for TokenSpans {
            fn visit_token(&mut self, token: &Token) {
                self.0.push(token.span());
            }
        }

        let cst = parse("local x: {a: number} = f(1, 2)").unwrap();
        let (stat, _) = &cst.block.stats[0];
        let stat_span = stat.span();
        let mut tokens = TokenSpans(Vec::new());
        crate::visit::walk_stat(&mut tokens, stat);
        for token_span in tokens.0 {
            assert!(stat_span.contains(token_span));
        }
    }
}
