// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Luau source code.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is hand-written for maximum control over trivia capture and spans.
//!
//! # Design Principles
//!
//! - **Lossless**: every byte of the input lands in exactly one token text
//!   or one piece of trivia, so the token stream re-emits the source exactly
//! - **Trivia preservation**: whitespace, comments, and the shebang line are
//!   attached to the token that follows them; the synthetic EOF token owns
//!   anything trailing
//! - **Precise spans**: every token and trivia record carries its byte range
//! - **First error aborts**: malformed literals return a [`LexError`] rather
//!   than an error token; further lexing is not attempted
//!
//! # Interpolated Strings
//!
//! A backtick begins an interpolated string. A literal with no `{` lexes as
//! one [`TokenKind::InterpStringSimple`] token. Otherwise the lexer emits a
//! [`TokenKind::InterpStringBegin`] segment (backtick through `{`), re-enters
//! normal mode for the expression tokens while tracking brace depth, and on
//! the `}` that closes the interpolation emits a middle or end segment. The
//! depth tracking nests, so interpolated strings may appear inside
//! interpolation expressions.
//!
//! # Example
//!
//! ```
//! use lunes_core::source_analysis::{lex, TokenKind};
//!
//! let tokens = lex("local x = 1").unwrap();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Local,
//!         TokenKind::Name,
//!         TokenKind::Equal,
//!         TokenKind::Number,
//!         TokenKind::Eof,
//!     ]
//! );
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{LexError, LexErrorKind, Span, Token, TokenKind, Trivia, TriviaKind};

/// How an interpolated string segment ended.
enum SegmentEnd {
    /// The segment ended at `{`; expression tokens follow.
    Brace,
    /// The segment ended at the closing backtick.
    Backtick,
}

/// A lexer that tokenizes Luau source code.
///
/// Produces tokens with their source spans and attached preceding trivia.
/// Use [`lex`] to tokenize a whole buffer at once.
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
    /// Pending trivia to attach to the next token.
    pending_trivia: Vec<Trivia>,
    /// Brace depth for each interpolated string currently open.
    ///
    /// A `}` at depth zero resumes string mode; any other brace adjusts the
    /// innermost depth.
    interp_braces: Vec<u32>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            pending_trivia: Vec::new(),
            interp_braces: Vec::new(),
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is the same as
    /// `peek_char`, n=1 returns the second character, etc.).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte position as a span offset.
    fn current_position(&self) -> u32 {
        Span::offset(self.position)
    }

    /// Creates a span from start to current position.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    /// Extracts source text for a span.
    fn text_for(&self, span: Span) -> &'src str {
        span.slice(self.source)
    }

    /// Lexes the next token, consuming any preceding trivia.
    ///
    /// Returns the synthetic EOF token (owning trailing trivia) at the end of
    /// input; calling again after that keeps returning EOF.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] on the first malformed literal, unterminated
    /// comment, or stray character.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;
        let trivia = std::mem::take(&mut self.pending_trivia);

        let start = self.current_position();
        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => self.lex_token_kind(c, start)?,
        };
        let span = self.span_from(start);

        let text = if kind.fixed_text().is_none() && kind != TokenKind::Eof {
            Some(EcoString::from(self.text_for(span)))
        } else {
            None
        };

        Ok(Token::with_trivia(kind, text, span, trivia))
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Skips whitespace, comments, and the shebang, collecting them as trivia.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        // A shebang is trivia only at the very start of the buffer.
        if self.position == 0 && self.peek_char() == Some('#') && self.peek_char_n(1) == Some('!') {
            let start = self.current_position();
            self.advance_while(|c| c != '\n');
            self.push_trivia(TriviaKind::Shebang, start);
        }

        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    let start = self.current_position();
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                    self.push_trivia(TriviaKind::Whitespace, start);
                }
                Some('-') if self.peek_char_n(1) == Some('-') => {
                    self.lex_comment()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Records accumulated text from `start` as trivia of the given kind.
    fn push_trivia(&mut self, kind: TriviaKind, start: u32) {
        let span = self.span_from(start);
        let text = EcoString::from(self.text_for(span));
        self.pending_trivia.push(Trivia::new(kind, text, span));
    }

    /// Lexes a `--` comment: a line comment, or a block comment when a long
    /// bracket immediately follows the dashes.
    fn lex_comment(&mut self) -> Result<(), LexError> {
        let start = self.current_position();
        self.advance(); // -
        self.advance(); // -

        if self.peek_char() == Some('[') {
            if let Some(level) = self.long_bracket_level() {
                self.consume_long_bracket(level).map_err(|span| {
                    LexError::new(LexErrorKind::UnterminatedComment, Span::new(start, span.end()))
                })?;
                self.push_trivia(TriviaKind::BlockComment, start);
                return Ok(());
            }
        }

        self.advance_while(|c| c != '\n');
        self.push_trivia(TriviaKind::LineComment, start);
        Ok(())
    }

    // ========================================================================
    // Token dispatch
    // ========================================================================

    /// Lexes a token kind based on the first character.
    fn lex_token_kind(&mut self, c: char, start: u32) -> Result<TokenKind, LexError> {
        match c {
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.lex_name_or_keyword()),
            '0'..='9' => self.lex_number(start),
            '\'' | '"' => self.lex_short_string(start),
            '`' => self.lex_interp_begin(start),

            '(' => Ok(self.single(TokenKind::LeftParen)),
            ')' => Ok(self.single(TokenKind::RightParen)),
            ']' => Ok(self.single(TokenKind::RightBracket)),
            ',' => Ok(self.single(TokenKind::Comma)),
            ';' => Ok(self.single(TokenKind::Semicolon)),
            '?' => Ok(self.single(TokenKind::Question)),
            '|' => Ok(self.single(TokenKind::Pipe)),
            '&' => Ok(self.single(TokenKind::Ampersand)),
            '@' => Ok(self.single(TokenKind::At)),
            '#' => Ok(self.single(TokenKind::Hash)),

            '[' => {
                if self.long_bracket_level().is_some() {
                    self.lex_long_string(start)
                } else {
                    Ok(self.single(TokenKind::LeftBracket))
                }
            }

            '{' => {
                if let Some(depth) = self.interp_braces.last_mut() {
                    *depth += 1;
                }
                Ok(self.single(TokenKind::LeftBrace))
            }
            '}' => self.lex_right_brace(start),

            ':' => Ok(self.one_or_two(TokenKind::Colon, ':', TokenKind::DoubleColon)),
            '=' => Ok(self.one_or_two(TokenKind::Equal, '=', TokenKind::EqualEqual)),
            '<' => Ok(self.one_or_two(TokenKind::Less, '=', TokenKind::LessEqual)),
            '>' => Ok(self.one_or_two(TokenKind::Greater, '=', TokenKind::GreaterEqual)),
            '+' => Ok(self.one_or_two(TokenKind::Plus, '=', TokenKind::PlusEqual)),
            '*' => Ok(self.one_or_two(TokenKind::Star, '=', TokenKind::StarEqual)),
            '%' => Ok(self.one_or_two(TokenKind::Percent, '=', TokenKind::PercentEqual)),
            '^' => Ok(self.one_or_two(TokenKind::Caret, '=', TokenKind::CaretEqual)),

            '~' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    Ok(TokenKind::NotEqual)
                } else {
                    Err(LexError::new(
                        LexErrorKind::UnexpectedCharacter('~'),
                        self.span_from(start),
                    ))
                }
            }

            '-' => {
                // `--` was consumed as a comment in skip_trivia.
                self.advance();
                match self.peek_char() {
                    Some('=') => {
                        self.advance();
                        Ok(TokenKind::MinusEqual)
                    }
                    Some('>') => {
                        self.advance();
                        Ok(TokenKind::Arrow)
                    }
                    _ => Ok(TokenKind::Minus),
                }
            }

            '/' => {
                self.advance();
                match self.peek_char() {
                    Some('/') => {
                        self.advance();
                        if self.peek_char() == Some('=') {
                            self.advance();
                            Ok(TokenKind::DoubleSlashEqual)
                        } else {
                            Ok(TokenKind::DoubleSlash)
                        }
                    }
                    Some('=') => {
                        self.advance();
                        Ok(TokenKind::SlashEqual)
                    }
                    _ => Ok(TokenKind::Slash),
                }
            }

            '.' => {
                if self.peek_char_n(1) == Some('.') {
                    self.advance(); // .
                    self.advance(); // .
                    match self.peek_char() {
                        Some('.') => {
                            self.advance();
                            Ok(TokenKind::Ellipsis)
                        }
                        Some('=') => {
                            self.advance();
                            Ok(TokenKind::DotDotEqual)
                        }
                        _ => Ok(TokenKind::DotDot),
                    }
                } else if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.lex_number(start)
                } else {
                    Ok(self.single(TokenKind::Dot))
                }
            }

            _ => {
                self.advance();
                Err(LexError::new(
                    LexErrorKind::UnexpectedCharacter(c),
                    self.span_from(start),
                ))
            }
        }
    }

    /// Consumes one character and returns the given kind.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Consumes one character, and a second if it matches `next`.
    fn one_or_two(&mut self, short: TokenKind, next: char, long: TokenKind) -> TokenKind {
        self.advance();
        if self.peek_char() == Some(next) {
            self.advance();
            long
        } else {
            short
        }
    }

    // ========================================================================
    // Names and numbers
    // ========================================================================

    /// Lexes a name, resolving reserved words to keyword kinds.
    fn lex_name_or_keyword(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = self.text_for(self.span_from(start));
        TokenKind::keyword(text).unwrap_or(TokenKind::Name)
    }

    /// Lexes a number literal: decimal (with optional fraction and exponent),
    /// `0x…` hex, or `0b…` binary, with `_` digit separators throughout.
    ///
    /// The token keeps the byte-exact text; no value is computed here.
    fn lex_number(&mut self, start: u32) -> Result<TokenKind, LexError> {
        let malformed = |lexer: &Self| {
            Err(LexError::new(
                LexErrorKind::MalformedNumber,
                lexer.span_from(start),
            ))
        };

        if self.peek_char() == Some('0') && matches!(self.peek_char_n(1), Some('x' | 'X')) {
            self.advance(); // 0
            self.advance(); // x
            let digits = self.count_digits(|c| c.is_ascii_hexdigit());
            if digits == 0 || self.number_has_bad_suffix() {
                return malformed(self);
            }
            return Ok(TokenKind::Number);
        }

        if self.peek_char() == Some('0') && matches!(self.peek_char_n(1), Some('b' | 'B')) {
            self.advance(); // 0
            self.advance(); // b
            let digits = self.count_digits(|c| matches!(c, '0' | '1'));
            if digits == 0 || self.number_has_bad_suffix() {
                return malformed(self);
            }
            return Ok(TokenKind::Number);
        }

        // Integer and fraction parts; a maximal munch of digits and dots so
        // that shapes like `1..2` surface as one malformed literal, matching
        // the reference lexer.
        let mut digits = 0usize;
        let mut dots = 0usize;
        while let Some(c) = self.peek_char() {
            match c {
                '0'..='9' => digits += 1,
                '.' => dots += 1,
                '_' => {}
                _ => break,
            }
            self.advance();
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.advance();
            }
            if self.count_digits(|c| c.is_ascii_digit()) == 0 {
                return malformed(self);
            }
        }

        if digits == 0 || dots > 1 || self.number_has_bad_suffix() {
            return malformed(self);
        }
        Ok(TokenKind::Number)
    }

    /// Consumes digits matching the predicate (and `_` separators), returning
    /// how many actual digits were seen.
    fn count_digits(&mut self, is_digit: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek_char() {
            if is_digit(c) {
                count += 1;
            } else if c != '_' {
                break;
            }
            self.advance();
        }
        count
    }

    /// Returns `true` if a word character directly follows a number literal
    /// (`3a`, `0xFFp`), consuming it so the error span covers the junk.
    fn number_has_bad_suffix(&mut self) -> bool {
        if self
            .peek_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Strings
    // ========================================================================

    /// Lexes a short string literal delimited by `'` or `"`.
    fn lex_short_string(&mut self, start: u32) -> Result<TokenKind, LexError> {
        let quote = self.advance().expect("caller saw the opening quote");

        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        self.span_from(start),
                    ));
                }
                Some('\\') => self.check_escape(start, LexErrorKind::UnterminatedString)?,
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(TokenKind::String);
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Validates and consumes one escape sequence (the `\` included).
    ///
    /// `unterminated` is the error to report when the input ends mid-escape;
    /// short strings and interpolated strings differ there.
    fn check_escape(&mut self, start: u32, unterminated: LexErrorKind) -> Result<(), LexError> {
        let escape_start = self.current_position();
        self.advance(); // backslash

        let Some(c) = self.peek_char() else {
            return Err(LexError::new(unterminated, self.span_from(start)));
        };

        match c {
            // Single-character escapes, the literal-brace and backtick escapes
            // used by interpolated strings, and an escaped real newline.
            'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '\'' | '"' | '`' | '{' | '\n'
            | '\r' => {
                self.advance();
                Ok(())
            }
            // \z skips following whitespace; the skipped run stays part of
            // the token text.
            'z' => {
                self.advance();
                self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                Ok(())
            }
            // \xHH — exactly two hex digits.
            'x' => {
                self.advance();
                for _ in 0..2 {
                    if !self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                        return Err(LexError::new(
                            LexErrorKind::InvalidEscape('x'),
                            self.span_from(escape_start),
                        ));
                    }
                    self.advance();
                }
                Ok(())
            }
            // \u{XXX} — one or more hex digits in braces.
            'u' => {
                self.advance();
                if self.peek_char() != Some('{') {
                    return Err(LexError::new(
                        LexErrorKind::InvalidEscape('u'),
                        self.span_from(escape_start),
                    ));
                }
                self.advance();
                let digits = self.count_digits(|c| c.is_ascii_hexdigit());
                if digits == 0 || self.peek_char() != Some('}') {
                    return Err(LexError::new(
                        LexErrorKind::InvalidEscape('u'),
                        self.span_from(escape_start),
                    ));
                }
                self.advance();
                Ok(())
            }
            // \NNN — up to three decimal digits.
            '0'..='9' => {
                for _ in 0..3 {
                    if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                        break;
                    }
                    self.advance();
                }
                Ok(())
            }
            other => {
                self.advance();
                Err(LexError::new(
                    LexErrorKind::InvalidEscape(other),
                    self.span_from(escape_start),
                ))
            }
        }
    }

    /// Returns the long-bracket level if the cursor sits on `[=*[`.
    ///
    /// Does not consume anything.
    fn long_bracket_level(&self) -> Option<usize> {
        debug_assert_eq!(self.peek_char_n(0), Some('['));
        let mut level = 0;
        loop {
            match self.peek_char_n(level + 1) {
                Some('=') => level += 1,
                Some('[') => return Some(level),
                _ => return None,
            }
        }
    }

    /// Consumes a full long bracket `[=*[ … ]=*]` of the given level.
    ///
    /// The opening bracket must be at the cursor. On unterminated input the
    /// error carries the span consumed so far.
    fn consume_long_bracket(&mut self, level: usize) -> Result<(), Span> {
        let start = self.current_position();
        self.advance(); // [
        for _ in 0..level {
            self.advance(); // =
        }
        self.advance(); // [

        loop {
            match self.peek_char() {
                None => return Err(self.span_from(start)),
                Some(']') => {
                    let mut matched = true;
                    for n in 0..level {
                        if self.peek_char_n(n + 1) != Some('=') {
                            matched = false;
                            break;
                        }
                    }
                    if matched && self.peek_char_n(level + 1) == Some(']') {
                        for _ in 0..level + 2 {
                            self.advance();
                        }
                        return Ok(());
                    }
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Lexes a long string literal `[=*[ … ]=*]`.
    fn lex_long_string(&mut self, start: u32) -> Result<TokenKind, LexError> {
        let level = self
            .long_bracket_level()
            .expect("caller checked for a long bracket");
        self.consume_long_bracket(level).map_err(|span| {
            LexError::new(
                LexErrorKind::UnterminatedLongString,
                Span::new(start, span.end()),
            )
        })?;
        Ok(TokenKind::LongString)
    }

    // ========================================================================
    // Interpolated strings
    // ========================================================================

    /// Scans one interpolated-string segment body, stopping after the `{`
    /// that opens an interpolation or the backtick that closes the string.
    fn scan_interp_segment(&mut self, start: u32) -> Result<SegmentEnd, LexError> {
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedInterpolatedString,
                        self.span_from(start),
                    ));
                }
                Some('\\') => {
                    self.check_escape(start, LexErrorKind::UnterminatedInterpolatedString)?;
                }
                Some('`') => {
                    self.advance();
                    return Ok(SegmentEnd::Backtick);
                }
                Some('{') => {
                    self.advance();
                    return Ok(SegmentEnd::Brace);
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Lexes the opening of an interpolated string at a backtick.
    fn lex_interp_begin(&mut self, start: u32) -> Result<TokenKind, LexError> {
        self.advance(); // `
        match self.scan_interp_segment(start)? {
            SegmentEnd::Backtick => Ok(TokenKind::InterpStringSimple),
            SegmentEnd::Brace => {
                self.interp_braces.push(0);
                Ok(TokenKind::InterpStringBegin)
            }
        }
    }

    /// Lexes a `}`: either a plain right brace or, at interpolation depth
    /// zero, the start of a middle/end string segment.
    fn lex_right_brace(&mut self, start: u32) -> Result<TokenKind, LexError> {
        match self.interp_braces.last_mut() {
            Some(0) => {
                self.advance(); // }
                match self.scan_interp_segment(start)? {
                    SegmentEnd::Backtick => {
                        self.interp_braces.pop();
                        Ok(TokenKind::InterpStringEnd)
                    }
                    SegmentEnd::Brace => Ok(TokenKind::InterpStringMiddle),
                }
            }
            Some(depth) => {
                *depth -= 1;
                Ok(self.single(TokenKind::RightBrace))
            }
            None => Ok(self.single(TokenKind::RightBrace)),
        }
    }
}

/// Tokenizes a whole source buffer, including the final EOF token.
///
/// # Errors
///
/// Returns the first [`LexError`]; no tokens are produced past it.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            return Ok(tokens);
        }
    }
}
