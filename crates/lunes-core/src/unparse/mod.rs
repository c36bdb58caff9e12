// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! CST unparser: renders a parsed tree back to source text.
//!
//! Because the CST is lossless — every token is materialized and carries its
//! preceding trivia — unparsing is nothing more than a token walk: for each
//! token in source order, write its trivia texts, then its own text. The EOF
//! token contributes only its trivia.
//!
//! This establishes the round-trip invariant: for any source `s` that
//! parses, `unparse(&parse(s)?) == s` byte-for-byte.
//!
//! The output buffer is carried as visitor state rather than any global;
//! concurrent unparses need no coordination.
//!
//! # Example
//!
//! ```
//! use lunes_core::source_analysis::parse;
//! use lunes_core::unparse::unparse;
//!
//! let source = "local x = 1 -- one\n";
//! let cst = parse(source).unwrap();
//! assert_eq!(unparse(&cst), source);
//! ```

use crate::cst::Cst;
use crate::source_analysis::Token;
use crate::visit::{walk_cst, Visitor};

/// A visitor that writes every token (and its trivia) into a buffer.
#[derive(Debug, Default)]
struct Printer {
    out: String,
}

impl Visitor for Printer {
    fn visit_token(&mut self, token: &Token) {
        for trivia in token.trivia() {
            self.out.push_str(&trivia.text);
        }
        self.out.push_str(token.text());
    }
}

/// Renders a CST back to the exact source text it was parsed from.
#[must_use]
pub fn unparse(cst: &Cst) -> String {
    let mut printer = Printer::default();
    walk_cst(&mut printer, cst);
    printer.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::parse;

    fn assert_round_trip(source: &str) {
        let cst = parse(source).unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
        assert_eq!(unparse(&cst), source);
    }

    #[test]
    fn round_trips_empty_and_trivia_only_sources() {
        assert_round_trip("");
        assert_round_trip("   \n\t  ");
        assert_round_trip("-- just a comment");
        assert_round_trip("#!/usr/bin/env luau\n--[[ header ]]\n");
    }

    #[test]
    fn round_trips_statements() {
        assert_round_trip("return 1");
        assert_round_trip("local x = 1\nx += 1\nprint(x)\n");
        assert_round_trip("for i = 1, 10, 2 do end");
        assert_round_trip("for k, v in pairs(t) do print(k, v) end");
        assert_round_trip("while true do break end");
        assert_round_trip("repeat n -= 1 until n == 0");
        assert_round_trip("if a then b() elseif c then d() else e() end");
        assert_round_trip("do end;");
    }

    #[test]
    fn round_trips_trailing_separators() {
        assert_round_trip("local t = { 1, 2, 3, }");
        assert_round_trip("local t = { a = 1; b = 2; }");
        assert_round_trip("f(x, y);");
    }

    #[test]
    fn round_trips_comment_placement() {
        assert_round_trip("local x --[[ inline ]] = 1 -- eol\n-- trailing file comment");
        assert_round_trip("f(\n  1, -- first\n  2 -- second\n)");
    }

    #[test]
    fn round_trips_functions_and_types() {
        assert_round_trip("local function id<T>(x: T): T return x end");
        assert_round_trip("function M.util:dump(...: string) end");
        assert_round_trip("@native function hot() end");
        assert_round_trip("type Pair<K, V = nil> = { first: K, second: V }");
        assert_round_trip("export type Handler = (msg: string, ...any) -> ...any");
        assert_round_trip("local cb: ((number) -> string)? = nil");
        assert_round_trip("type U = | \"a\" | \"b\" | { x: number }");
    }

    #[test]
    fn round_trips_strings() {
        assert_round_trip("local s = 'single' .. \"double\" .. [[long]] .. [==[lvl]==]");
        assert_round_trip("local s = `interp {a} mid {b + 1} end`");
        assert_round_trip("local s = `plain`");
        assert_round_trip("f 'string arg'");
        assert_round_trip("f [[long arg]]");
    }

    #[test]
    fn round_trips_exact_crlf_and_tabs() {
        assert_round_trip("if x then\r\n\ty()\r\nend\r\n");
    }
}
