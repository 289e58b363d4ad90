//! Hand-written recursive-descent parser for Go.
//!
//! The parser never fails: every syntax error is recorded and the tree is
//! patched with `Bad` nodes, in the same shapes `go/parser` produces, so that
//! recovery code downstream can recognize them. In particular:
//!
//! - `expect` always consumes a token, even when it is the wrong one;
//! - a selector without a member name gets a synthesized `_` name positioned
//!   at the offending token (zero-width span);
//! - statement-level resynchronization skips to the next statement keyword.
//!
//! A few shapes intentionally differ from `go/parser` so that partially typed
//! code keeps its structure: an `if`/`for`/`switch` header cut off by a newline
//! ends the header there, and a lone array or slice type in value position
//! becomes `Expr::Bad`.

mod decl;
mod expr;
mod stmt;
mod types;

use crate::ast::*;
use crate::error::{DiagKind, ErrorList, SyntaxError};
use crate::lexer::{Lexer, Spanned, Tok};
use crate::mode::ParseMode;
use crate::source::SourceBuffer;

/// Without `ALL_ERRORS`, reporting stops after this many errors.
const MAX_ERRORS: usize = 10;

/// Resync attempts at the same position before `advance` gives up on it.
const MAX_SYNC: u32 = 10;

/// Deepest nesting of statements, expressions and types the parser descends
/// into. Past it the rest of the file is skipped.
const MAX_NEST_LEV: u32 = 128;

// =============================================================================
// Token sets used for resynchronization
// =============================================================================

fn is_stmt_start(t: Tok<'_>) -> bool {
    matches!(
        t,
        Tok::KwBreak
            | Tok::KwConst
            | Tok::KwContinue
            | Tok::KwDefer
            | Tok::KwFallthrough
            | Tok::KwFor
            | Tok::KwGo
            | Tok::KwGoto
            | Tok::KwIf
            | Tok::KwReturn
            | Tok::KwSelect
            | Tok::KwSwitch
            | Tok::KwType
            | Tok::KwVar
    )
}

fn is_decl_start(t: Tok<'_>) -> bool {
    matches!(t, Tok::KwImport | Tok::KwConst | Tok::KwType | Tok::KwVar)
}

fn is_expr_end(t: Tok<'_>) -> bool {
    matches!(
        t,
        Tok::Comma | Tok::Colon | Tok::Semi | Tok::RParen | Tok::RBrack | Tok::RBrace
    )
}

// =============================================================================
// Parser state
// =============================================================================

pub(crate) struct Parser<'src> {
    buf: &'src SourceBuffer,
    toks: Vec<Spanned<'src>>,
    idx: usize,

    /// Current token and its byte range.
    tok: Tok<'src>,
    pos: usize,
    tok_end: usize,
    /// End of the last consumed token.
    prev_end: usize,

    pub(crate) arena: AstArena,
    pub(crate) interner: Interner,

    errors: Vec<SyntaxError>,
    mode: ParseMode,

    /// `< 0` inside control clause headers, where `T {` is not a literal.
    expr_lev: i32,
    /// `> 0` where a bare type is a valid expression (call and index
    /// arguments, type switch cases).
    type_expr_ok: u32,

    sync_pos: usize,
    sync_cnt: u32,

    nest_lev: u32,
    /// Set once the nesting limit was hit; later errors are dropped.
    bailed: bool,

    comment_groups: Vec<CommentGroupId>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(
        buf: &'src SourceBuffer,
        mode: ParseMode,
        arena: AstArena,
        interner: Interner,
    ) -> Self {
        let mut lexer = Lexer::with_comments(buf.as_str());
        let mut toks = Vec::with_capacity(buf.len() / 4 + 1);
        let mut comments = Vec::new();
        for tok in lexer.by_ref() {
            match tok.1 {
                Tok::Comment(_) => comments.push((tok.0, tok.2)),
                _ => toks.push(tok),
            }
        }
        let lex_diags = lexer.take_diags();
        toks.push((buf.len(), Tok::Eof, buf.len()));

        let (pos, tok, tok_end) = toks[0];
        let mut p = Self {
            buf,
            toks,
            idx: 0,
            tok,
            pos,
            tok_end,
            prev_end: 0,
            arena,
            interner,
            errors: Vec::new(),
            mode,
            expr_lev: 0,
            type_expr_ok: 0,
            sync_pos: 0,
            sync_cnt: 0,
            nest_lev: 0,
            bailed: false,
            comment_groups: Vec::new(),
        };

        if let Some(bad) = buf.invalid_utf8() {
            p.push_error(
                DiagKind::Lex,
                Span::new(bad, bad + 1),
                crate::error::LexErrorKind::InvalidUtf8.to_string(),
            );
        }
        for diag in lex_diags {
            p.push_error(DiagKind::Lex, diag.span, diag.kind.to_string());
        }
        if mode.contains(ParseMode::PARSE_COMMENTS) {
            p.group_comments(&comments);
        }
        p
    }

    pub(crate) fn finish(mut self) -> (AstArena, Interner, ErrorList) {
        self.errors.sort_by_key(|e| (e.span.start, e.span.end));
        (self.arena, self.interner, ErrorList(self.errors))
    }

    // -------------------------------------------------------------------------
    // Comments
    // -------------------------------------------------------------------------

    /// Groups comments separated by at most one line break.
    fn group_comments(&mut self, comments: &[(usize, usize)]) {
        let mut current: Vec<(CommentId, Span)> = Vec::new();
        let mut last_line = 0;

        for &(start, end) in comments {
            let span = Span::new(start, end);
            let kind = if self.buf.byte_at(start + 1) == Some(b'/') {
                CommentKind::Line
            } else {
                CommentKind::Block
            };
            if !current.is_empty() && self.buf.line_of(start) > last_line + 1 {
                self.flush_comment_group(&mut current);
            }
            let id = self.arena.comments.alloc(Comment { kind }, span);
            current.push((id, span));
            last_line = self.buf.line_of(end.saturating_sub(1).max(start));
        }
        self.flush_comment_group(&mut current);
    }

    fn flush_comment_group(&mut self, current: &mut Vec<(CommentId, Span)>) {
        let (Some(&(_, first)), Some(&(_, last))) = (current.first(), current.last()) else {
            return;
        };
        let comments = self
            .arena
            .list_comment_ids(current.drain(..).map(|(id, _)| id));
        let group = self
            .arena
            .comment_groups
            .alloc(CommentGroup { comments }, first.to(last));
        self.comment_groups.push(group);
    }

    // -------------------------------------------------------------------------
    // Token handling
    // -------------------------------------------------------------------------

    #[inline]
    fn next(&mut self) {
        // Node spans never cover semicolons.
        if self.tok != Tok::Semi {
            self.prev_end = self.tok_end;
        }
        if self.idx + 1 < self.toks.len() {
            self.idx += 1;
        }
        let (pos, tok, end) = self.toks[self.idx];
        self.pos = pos;
        self.tok = tok;
        self.tok_end = end;
    }

    /// Token `n` positions ahead of the current one.
    #[inline]
    fn peek(&self, n: usize) -> Tok<'src> {
        self.toks.get(self.idx + n).map_or(Tok::Eof, |t| t.1)
    }

    #[inline]
    fn span_here(&self) -> Span {
        Span::new(self.pos, self.tok_end)
    }

    /// Whether the current token is a semicolon inserted at a line break.
    #[inline]
    fn at_auto_semi(&self) -> bool {
        self.tok == Tok::Semi && self.pos == self.tok_end
    }

    #[inline]
    fn at_ident(&self) -> bool {
        matches!(self.tok, Tok::Ident(_))
    }

    /// Consumes the current token, complaining if it is not `want`.
    fn expect(&mut self, want: Tok<'src>) -> Span {
        let span = self.span_here();
        if self.tok != want {
            let what = format!("'{}'", want.text());
            self.error_expected(self.pos, &what);
        }
        self.next();
        span
    }

    /// Like `expect`, but first swallows a newline that stands where a comma
    /// is needed, reporting it as such.
    fn expect_closing(&mut self, want: Tok<'src>, context: &str) -> Span {
        if self.tok != want && self.at_auto_semi() {
            let span = self.span_here();
            self.error(span, format!("missing ',' before newline in {context}"));
            self.next();
        }
        self.expect(want)
    }

    fn expect_semi(&mut self) {
        match self.tok {
            Tok::RParen | Tok::RBrace => {}
            Tok::Comma => {
                self.error_expected(self.pos, "';'");
                self.next();
            }
            Tok::Semi => self.next(),
            _ => {
                self.error_expected(self.pos, "';'");
                self.advance(is_stmt_start);
            }
        }
    }

    /// Skips to the next token in `to`. Gives up on a position after it was
    /// the sync target `MAX_SYNC` times, which guarantees progress.
    fn advance(&mut self, to: fn(Tok<'_>) -> bool) {
        while self.tok != Tok::Eof {
            if to(self.tok) {
                if self.pos == self.sync_pos && self.sync_cnt < MAX_SYNC {
                    self.sync_cnt += 1;
                    return;
                }
                if self.pos > self.sync_pos {
                    self.sync_pos = self.pos;
                    self.sync_cnt = 0;
                    return;
                }
            }
            self.next();
        }
    }

    /// Runs `f` one nesting level deeper. Past `MAX_NEST_LEV` the error is
    /// reported, the remaining tokens are skipped and `bad` builds the node
    /// covering them.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> T,
        bad: impl FnOnce(&mut Self, Span) -> T,
    ) -> T {
        if self.nest_lev < MAX_NEST_LEV {
            self.nest_lev += 1;
            let node = f(self);
            self.nest_lev -= 1;
            return node;
        }
        let start = self.pos;
        if !self.bailed {
            let span = self.span_here();
            self.error(span, "exceeded max nesting depth");
            self.bailed = true;
        }
        while self.tok != Tok::Eof {
            self.next();
        }
        bad(self, Span::new(start, self.prev_end.max(start)))
    }

    // -------------------------------------------------------------------------
    // Errors
    // -------------------------------------------------------------------------

    fn push_error(&mut self, kind: DiagKind, span: Span, message: String) {
        if self.bailed {
            return;
        }
        let (line, column) = self.buf.line_col(span.start_usize());
        if !self.mode.contains(ParseMode::ALL_ERRORS) {
            if self.errors.last().is_some_and(|e| e.line == line) {
                return;
            }
            if self.errors.len() >= MAX_ERRORS {
                return;
            }
        }
        self.errors.push(SyntaxError {
            kind,
            span,
            line,
            column,
            message,
        });
    }

    pub(crate) fn error(&mut self, span: Span, message: impl Into<String>) {
        self.push_error(DiagKind::Parse, span, message.into());
    }

    fn error_expected(&mut self, at: usize, what: &str) {
        let mut msg = format!("expected {what}");
        let mut span = Span::empty_at(at);
        if at == self.pos {
            span = self.span_here();
            match self.tok {
                Tok::Semi if self.at_auto_semi() => msg.push_str(", found newline"),
                t if t.is_literal() || matches!(t, Tok::Ident(_)) => {
                    msg.push_str(", found ");
                    msg.push_str(t.text());
                }
                t => {
                    msg.push_str(", found '");
                    msg.push_str(t.text());
                    msg.push('\'');
                }
            }
        }
        self.error(span, msg);
    }

    /// Whether any error was reported before offset `pos`.
    fn has_error_before(&self, pos: usize) -> bool {
        self.errors.iter().any(|e| e.span.start_usize() < pos)
    }

    // -------------------------------------------------------------------------
    // Identifiers
    // -------------------------------------------------------------------------

    /// Missing identifiers become `_` at the current token, which is consumed.
    fn parse_ident(&mut self) -> IdentName {
        let pos = self.span_here();
        if let Tok::Ident(name) = self.tok {
            let sym = self.interner.intern(name);
            self.next();
            IdentName { sym, pos }
        } else {
            self.error_expected(self.pos, "'IDENT'");
            self.next();
            self.blank_at(Span::empty_at(pos.start_usize()))
        }
    }

    fn blank_at(&mut self, pos: Span) -> IdentName {
        IdentName {
            sym: self.interner.intern("_"),
            pos,
        }
    }

    fn parse_ident_list(&mut self) -> Vec<IdentName> {
        let mut list = vec![self.parse_ident()];
        while self.tok == Tok::Comma {
            self.next();
            list.push(self.parse_ident());
        }
        list
    }

    // -------------------------------------------------------------------------
    // Source file
    // -------------------------------------------------------------------------

    pub(crate) fn parse_source_file(&mut self) -> SourceFile {
        let file_span = Span::new(0, self.buf.len());
        let package_pos = self.expect(Tok::KwPackage);
        let name = self.parse_ident();
        self.expect_semi();

        // The rest is not worth parsing when the package clause is broken.
        if self.has_error_before(self.pos) {
            return self.make_file(file_span, package_pos, name, Vec::new());
        }

        let mut decls = Vec::new();
        while self.tok == Tok::KwImport {
            let decl = self.parse_gen_decl(Tok::KwImport);
            decls.push(TopLevelDecl::Decl(decl));
        }

        if !self.mode.contains(ParseMode::IMPORTS_ONLY) {
            let mut prev = Tok::KwImport;
            while self.tok != Tok::Eof {
                if self.tok == Tok::KwImport && prev != Tok::KwImport {
                    let span = self.span_here();
                    self.error(span, "imports must appear before other declarations");
                }
                prev = self.tok;
                let start = self.idx;
                decls.push(self.parse_decl());
                if self.idx == start && self.tok != Tok::Eof {
                    self.next();
                }
            }
        }

        self.make_file(file_span, package_pos, name, decls)
    }

    fn make_file(
        &mut self,
        span: Span,
        package_pos: Span,
        name: IdentName,
        decls: Vec<TopLevelDecl>,
    ) -> SourceFile {
        let decls = self.arena.list_top_decls(decls);
        let groups = std::mem::take(&mut self.comment_groups);
        let comments = self.arena.list_comment_group_ids(groups);
        SourceFile {
            span,
            package_pos,
            name,
            decls,
            comments,
        }
    }
}

/// Parses `buf` into `arena`/`interner`, which may already hold other trees.
pub(crate) fn parse_into(
    arena: &mut AstArena,
    interner: &mut Interner,
    buf: &SourceBuffer,
    mode: ParseMode,
) -> (SourceFile, ErrorList) {
    let mut p = Parser::new(
        buf,
        mode,
        std::mem::take(arena),
        std::mem::take(interner),
    );
    let file = p.parse_source_file();
    let (a, i, errors) = p.finish();
    *arena = a;
    *interner = i;
    (file, errors)
}
