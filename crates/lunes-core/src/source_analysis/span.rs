// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Byte-offset spans over Luau source.
//!
//! A [`Span`] is a half-open `[start, end)` range of byte offsets into the
//! buffer being parsed. Only tokens and trivia store spans; composite CST
//! nodes derive theirs on demand by joining the spans of their first and
//! last tokens with [`Span::through`] (see [`crate::cst::spans`]). Because
//! trivia attaches to the token that follows it, the spans of a lexed chunk
//! tile the buffer: every byte falls in exactly one token or trivia span,
//! with no gaps and no overlap.
//!
//! Offsets are `u32`. Tokens dominate the memory profile of a lossless
//! tree, and a Luau chunk bigger than 4 GiB is not something this parser
//! supports; conversions from `usize` saturate rather than wrap.

use std::ops::Range;

/// A half-open range of byte offsets into the source buffer.
///
/// The synthetic EOF token carries the one empty span in a parsed chunk,
/// sitting at the very end of the buffer.
///
/// # Examples
///
/// ```
/// use lunes_core::source_analysis::Span;
///
/// let source = "local x = 1";
/// let name = Span::new(6, 7);
/// assert_eq!(name.slice(source), "x");
/// assert_eq!(name.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    /// Creates a span from start and end byte offsets.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Converts a `usize` byte position to a span offset, saturating at
    /// 4 GiB. The lexer runs every cursor position through this.
    #[must_use]
    pub fn offset(position: usize) -> u32 {
        u32::try_from(position).unwrap_or(u32::MAX)
    }

    /// Creates a span from `usize` byte offsets, saturating at 4 GiB.
    #[must_use]
    pub fn from_offsets(start: usize, end: usize) -> Self {
        Self::new(Self::offset(start), Self::offset(end))
    }

    /// Returns the start byte offset.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Returns the end byte offset (exclusive).
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` if the span covers no bytes.
    ///
    /// Among tokens, only the synthetic EOF has an empty span.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns the span from the start of `self` through the end of `last`.
    ///
    /// This is the join used for composite CST nodes: the span of a node is
    /// its first token's span `through` its last token's span. It is
    /// deliberately not a symmetric union — the walk hands over tokens in
    /// source order, so the receiver is always the earlier endpoint.
    #[must_use]
    pub const fn through(self, last: Self) -> Self {
        Self {
            start: self.start,
            end: last.end,
        }
    }

    /// Returns `true` if `other` lies fully within `self`.
    ///
    /// Derived spans nest: every token inside a composite node satisfies
    /// `node_span.contains(token_span)`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Converts to a `Range<usize>` for indexing into the source buffer.
    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Returns the source bytes this span covers.
    ///
    /// Panics if the span does not lie on char boundaries of `source`; the
    /// lexer only produces spans that do.
    #[must_use]
    pub fn slice(self, source: &str) -> &str {
        &source[self.as_range()]
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, span.len() as usize).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_covers_exact_bytes() {
        let source = "local greeting = `hi`";
        assert_eq!(Span::new(0, 5).slice(source), "local");
        assert_eq!(Span::new(6, 14).slice(source), "greeting");
        assert_eq!(Span::new(17, 21).slice(source), "`hi`");
    }

    #[test]
    fn eof_span_is_empty() {
        let source = "return 1";
        let eof = Span::new(8, 8);
        assert!(eof.is_empty());
        assert_eq!(eof.len(), 0);
        assert_eq!(eof.slice(source), "");
    }

    #[test]
    fn through_joins_first_and_last_tokens() {
        // `for` through `end` in "for i = 1, 10 do end".
        let for_token = Span::new(0, 3);
        let end_token = Span::new(17, 20);
        assert_eq!(for_token.through(end_token), Span::new(0, 20));
    }

    #[test]
    fn through_takes_receiver_start_and_argument_end() {
        let single = Span::new(4, 9);
        assert_eq!(single.through(single), single);
        // Not a union: the receiver supplies the start unconditionally.
        assert_eq!(Span::new(2, 8).through(Span::new(3, 5)), Span::new(2, 5));
    }

    #[test]
    fn derived_spans_contain_their_tokens() {
        // Token spans of "x = 1" inside the statement's derived span.
        let stat = Span::new(0, 5);
        for token in [Span::new(0, 1), Span::new(2, 3), Span::new(4, 5)] {
            assert!(stat.contains(token));
        }
        assert!(stat.contains(stat));
        assert!(!stat.contains(Span::new(4, 6)));
    }

    #[test]
    fn from_offsets_saturates_past_4gib() {
        let span = Span::from_offsets(3, 8);
        assert_eq!(span, Span::new(3, 8));

        let huge = Span::from_offsets(usize::MAX, usize::MAX);
        assert_eq!(huge.start(), u32::MAX);
        assert!(huge.is_empty());
    }

    #[test]
    fn converts_to_miette_source_span() {
        let span: miette::SourceSpan = Span::new(5, 15).into();
        assert_eq!(span.offset(), 5);
        assert_eq!(span.len(), 10);
    }
}
