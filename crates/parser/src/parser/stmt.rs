//! Statements and blocks.

use super::{is_stmt_start, Parser};
use crate::ast::*;
use crate::lexer::Tok;

/// Where a simple statement appears, which decides what it may be.
#[derive(Clone, Copy, PartialEq, Eq)]
enum StmtMode {
    Basic,
    LabelOk,
    RangeOk,
}

enum SimpleOutcome {
    Simple(SimpleStmtId),
    Labeled(StmtId),
    Range(ForKind),
    Bad(Span),
}

fn assign_op(t: Tok<'_>) -> Option<AssignOp> {
    Some(match t {
        Tok::Assign => AssignOp::Assign,
        Tok::Define => AssignOp::Define,
        Tok::AddAssign => AssignOp::AddAssign,
        Tok::SubAssign => AssignOp::SubAssign,
        Tok::MulAssign => AssignOp::MulAssign,
        Tok::DivAssign => AssignOp::DivAssign,
        Tok::ModAssign => AssignOp::ModAssign,
        Tok::AndAssign => AssignOp::AndAssign,
        Tok::OrAssign => AssignOp::OrAssign,
        Tok::XorAssign => AssignOp::XorAssign,
        Tok::ShlAssign => AssignOp::ShlAssign,
        Tok::ShrAssign => AssignOp::ShrAssign,
        Tok::AndNotAssign => AssignOp::AndNotAssign,
        _ => return None,
    })
}

impl<'src> Parser<'src> {
    #[inline]
    fn alloc_stmt(&mut self, stmt: Stmt, span: Span) -> StmtId {
        self.arena.stmts.alloc(stmt, span)
    }

    /// `{ stmts }`. A wrong opening token is consumed as if it were `{`.
    pub(crate) fn parse_block(&mut self) -> Block {
        let l_brace = self.expect(Tok::LBrace);
        let stmts = self.parse_stmt_list();
        let r_brace = self.expect(Tok::RBrace);
        Block {
            l_brace,
            stmts,
            r_brace,
        }
    }

    fn parse_stmt_list(&mut self) -> ListRef<StmtId> {
        let mut list = Vec::new();
        while !matches!(
            self.tok,
            Tok::KwCase | Tok::KwDefault | Tok::RBrace | Tok::Eof
        ) {
            let start = self.idx;
            list.push(self.parse_stmt());
            if self.idx == start {
                self.next();
            }
        }
        self.arena.list_stmts(list)
    }

    pub(crate) fn parse_stmt(&mut self) -> StmtId {
        self.nested(Self::parse_stmt_inner, |p, span| {
            p.alloc_stmt(Stmt::Bad(span), span)
        })
    }

    fn parse_stmt_inner(&mut self) -> StmtId {
        let start = self.pos;
        match self.tok {
            Tok::KwConst | Tok::KwType | Tok::KwVar => {
                let decl = self.parse_gen_decl(self.tok);
                let span = self.arena.decls.span(decl);
                self.alloc_stmt(Stmt::Decl(decl), span)
            }
            Tok::Ident(_)
            | Tok::IntLit(_)
            | Tok::FloatLit(_)
            | Tok::ImagLit(_)
            | Tok::RuneLit(_)
            | Tok::StringLit(_)
            | Tok::RawStringLit(_)
            | Tok::KwFunc
            | Tok::LParen
            | Tok::LBrack
            | Tok::KwStruct
            | Tok::KwMap
            | Tok::KwChan
            | Tok::KwInterface
            | Tok::Plus
            | Tok::Minus
            | Tok::Star
            | Tok::Amp
            | Tok::Caret
            | Tok::Arrow
            | Tok::Bang
            | Tok::Tilde => match self.parse_simple_stmt(StmtMode::LabelOk) {
                SimpleOutcome::Labeled(stmt) => stmt,
                SimpleOutcome::Simple(s) => {
                    let span = self.arena.simple_stmts.span(s);
                    self.expect_semi();
                    self.alloc_stmt(Stmt::Simple(s), span)
                }
                SimpleOutcome::Bad(span) => {
                    self.expect_semi();
                    self.alloc_stmt(Stmt::Bad(span), span)
                }
                // `range` is only parsed in for headers.
                SimpleOutcome::Range(_) => {
                    let span = Span::new(start, self.prev_end);
                    self.expect_semi();
                    self.alloc_stmt(Stmt::Bad(span), span)
                }
            },
            Tok::KwGo | Tok::KwDefer => self.parse_go_defer_stmt(),
            Tok::KwReturn => self.parse_return_stmt(),
            Tok::KwBreak | Tok::KwContinue | Tok::KwGoto | Tok::KwFallthrough => {
                self.parse_branch_stmt()
            }
            Tok::LBrace => {
                let block = self.parse_block();
                let span = block.l_brace.to(block.r_brace);
                self.expect_semi();
                self.alloc_stmt(Stmt::Block(block), span)
            }
            Tok::KwIf => self.parse_if_stmt(),
            Tok::KwSwitch => self.parse_switch_stmt(),
            Tok::KwSelect => self.parse_select_stmt(),
            Tok::KwFor => self.parse_for_stmt(),
            Tok::Semi => {
                let span = self.span_here();
                self.next();
                let s = self.arena.simple_stmts.alloc(SimpleStmt::Empty, span);
                self.alloc_stmt(Stmt::Simple(s), span)
            }
            // A label right before `}` labels an empty statement.
            Tok::RBrace => {
                let span = Span::empty_at(start);
                let s = self.arena.simple_stmts.alloc(SimpleStmt::Empty, span);
                self.alloc_stmt(Stmt::Simple(s), span)
            }
            _ => {
                self.error_expected(start, "statement");
                self.advance(is_stmt_start);
                let span = Span::new(start, self.pos);
                self.alloc_stmt(Stmt::Bad(span), span)
            }
        }
    }

    fn parse_simple_stmt(&mut self, mode: StmtMode) -> SimpleOutcome {
        let start = self.pos;
        let lhs = self.parse_expr_list();

        if let Some(op) = assign_op(self.tok) {
            let op_pos = self.span_here();
            self.next();
            let plain = matches!(op, AssignOp::Assign | AssignOp::Define);
            if mode == StmtMode::RangeOk && plain && self.tok == Tok::KwRange {
                let range_pos = self.span_here();
                self.next();
                let expr = self.parse_rhs();
                if lhs.len() > 2 {
                    let span = self.arena.exprs.span(lhs[2]);
                    self.error(span, "expected at most 2 expressions");
                }
                return SimpleOutcome::Range(ForKind::Range {
                    key: lhs.first().copied(),
                    value: lhs.get(1).copied(),
                    op: Some(op),
                    op_pos: Some(op_pos),
                    range_pos,
                    expr,
                });
            }
            let rhs = self.parse_expr_list();
            let lhs = self.arena.list_exprs(lhs);
            let rhs = self.arena.list_exprs(rhs);
            let span = Span::new(start, self.prev_end);
            return SimpleOutcome::Simple(self.arena.simple_stmts.alloc(
                SimpleStmt::Assign {
                    lhs,
                    op,
                    op_pos,
                    rhs,
                },
                span,
            ));
        }

        if lhs.len() > 1 {
            self.error_expected(start, "1 expression");
        }
        let x = lhs[0];

        let stmt = match self.tok {
            Tok::Colon if mode == StmtMode::LabelOk => {
                let colon_pos = self.span_here();
                if let Expr::Ident(sym, pos) = self.arena.exprs[x] {
                    self.next();
                    let stmt = self.parse_stmt();
                    let span = Span::new(start, self.arena.stmts.span(stmt).end_usize())
                        .to(colon_pos);
                    let label = IdentName { sym, pos };
                    return SimpleOutcome::Labeled(self.alloc_stmt(
                        Stmt::Labeled {
                            label,
                            colon_pos,
                            stmt,
                        },
                        span,
                    ));
                }
                self.error(colon_pos, "illegal label declaration");
                return SimpleOutcome::Bad(Span::new(start, colon_pos.end_usize()));
            }
            Tok::Arrow => {
                let arrow_pos = self.span_here();
                self.next();
                let value = self.parse_rhs();
                SimpleStmt::Send {
                    chan: x,
                    arrow_pos,
                    value,
                }
            }
            Tok::Inc | Tok::Dec => {
                let op = if self.tok == Tok::Inc {
                    IncDecOp::Inc
                } else {
                    IncDecOp::Dec
                };
                let op_pos = self.span_here();
                self.next();
                SimpleStmt::IncDec { expr: x, op, op_pos }
            }
            _ => SimpleStmt::Expr(x),
        };
        let span = Span::new(start, self.prev_end);
        SimpleOutcome::Simple(self.arena.simple_stmts.alloc(stmt, span))
    }

    /// Simple statement in a control clause header.
    fn parse_header_stmt(&mut self) -> SimpleStmtId {
        match self.parse_simple_stmt(StmtMode::Basic) {
            SimpleOutcome::Simple(s) => s,
            SimpleOutcome::Labeled(stmt) => {
                let span = self.arena.stmts.span(stmt);
                self.bad_simple(span)
            }
            SimpleOutcome::Bad(span) => self.bad_simple(span),
            SimpleOutcome::Range(_) => {
                let span = Span::empty_at(self.pos);
                self.bad_simple(span)
            }
        }
    }

    fn bad_simple(&mut self, span: Span) -> SimpleStmtId {
        let x = self.arena.exprs.alloc(Expr::Bad(span), span);
        self.arena.simple_stmts.alloc(SimpleStmt::Expr(x), span)
    }

    /// Header statement used as an expression; anything else becomes a bad
    /// expression spanning the statement.
    fn make_expr(&mut self, s: SimpleStmtId, want: &str) -> ExprId {
        let found = match self.arena.simple_stmts[s] {
            SimpleStmt::Expr(x) => return x,
            SimpleStmt::Assign { .. } => "assignment",
            _ => "simple statement",
        };
        let span = self.arena.simple_stmts.span(s);
        self.error(
            Span::empty_at(span.start_usize()),
            format!("expected {want}, found {found} (missing parentheses around composite literal?)"),
        );
        self.arena.exprs.alloc(Expr::Bad(span), span)
    }

    fn parse_go_defer_stmt(&mut self) -> StmtId {
        let is_go = self.tok == Tok::KwGo;
        let kw_pos = self.span_here();
        self.next();
        let what = if is_go { "go" } else { "defer" };

        let mut call = self.parse_rhs();
        let outer = self.arena.exprs.span(call);
        if matches!(self.arena.exprs[call], Expr::Paren { .. }) {
            self.error(
                Span::empty_at(outer.start_usize()),
                format!("expression in {what} must not be parenthesized"),
            );
            while let Expr::Paren { expr, .. } = self.arena.exprs[call] {
                call = expr;
            }
        }
        let call = match self.arena.exprs[call] {
            Expr::Call { .. } => Some(call),
            Expr::Bad(_) => None,
            _ => {
                let end = self.arena.exprs.span(call).end_usize();
                self.error(
                    Span::empty_at(end),
                    format!("expression in {what} must be function call"),
                );
                None
            }
        };
        let end = self.prev_end;
        self.expect_semi();

        let Some(call) = call else {
            return self.alloc_stmt(Stmt::Bad(kw_pos), kw_pos);
        };
        let span = Span::new(kw_pos.start_usize(), end);
        let stmt = if is_go {
            Stmt::Go {
                go_pos: kw_pos,
                call,
            }
        } else {
            Stmt::Defer {
                defer_pos: kw_pos,
                call,
            }
        };
        self.alloc_stmt(stmt, span)
    }

    fn parse_return_stmt(&mut self) -> StmtId {
        let return_pos = self.expect(Tok::KwReturn);
        let results = if matches!(self.tok, Tok::Semi | Tok::RBrace) {
            Vec::new()
        } else {
            self.parse_expr_list()
        };
        let span = Span::new(return_pos.start_usize(), self.prev_end);
        self.expect_semi();
        let results = self.arena.list_exprs(results);
        self.alloc_stmt(
            Stmt::Return {
                return_pos,
                results,
            },
            span,
        )
    }

    fn parse_branch_stmt(&mut self) -> StmtId {
        let kind = match self.tok {
            Tok::KwBreak => BranchKind::Break,
            Tok::KwContinue => BranchKind::Continue,
            Tok::KwGoto => BranchKind::Goto,
            _ => BranchKind::Fallthrough,
        };
        let kw_pos = self.span_here();
        self.next();
        let label = (kind != BranchKind::Fallthrough && self.at_ident()).then(|| self.parse_ident());
        let span = Span::new(kw_pos.start_usize(), self.prev_end);
        self.expect_semi();
        self.alloc_stmt(
            Stmt::Branch {
                kind,
                kw_pos,
                label,
            },
            span,
        )
    }

    // -------------------------------------------------------------------------
    // if
    // -------------------------------------------------------------------------

    fn parse_if_stmt(&mut self) -> StmtId {
        let if_pos = self.expect(Tok::KwIf);
        let (init, cond) = self.parse_if_header();
        let then_block = self.parse_block();
        let mut end = then_block.r_brace.end_usize();

        let else_stmt = if self.tok == Tok::KwElse {
            self.next();
            let stmt = match self.tok {
                Tok::KwIf => self.parse_if_stmt(),
                Tok::LBrace => {
                    let block = self.parse_block();
                    let span = block.l_brace.to(block.r_brace);
                    self.expect_semi();
                    self.alloc_stmt(Stmt::Block(block), span)
                }
                _ => {
                    let pos = self.pos;
                    self.error_expected(pos, "if statement or block");
                    let span = Span::empty_at(pos);
                    self.alloc_stmt(Stmt::Bad(span), span)
                }
            };
            end = end.max(self.arena.stmts.span(stmt).end_usize());
            Some(stmt)
        } else {
            self.expect_semi();
            None
        };

        self.alloc_stmt(
            Stmt::If {
                if_pos,
                init,
                cond,
                then_block,
                else_stmt,
            },
            Span::new(if_pos.start_usize(), end),
        )
    }

    /// `[init ;] cond`. A header cut off by a newline ends there: what was
    /// parsed becomes the condition.
    fn parse_if_header(&mut self) -> (Option<SimpleStmtId>, ExprId) {
        if self.tok == Tok::LBrace {
            let span = Span::empty_at(self.pos);
            self.error(span, "missing condition in if statement");
            return (None, self.arena.exprs.alloc(Expr::Bad(span), span));
        }

        let prev_lev = self.expr_lev;
        self.expr_lev = -1;

        let mut init = None;
        if self.tok != Tok::Semi {
            if self.tok == Tok::KwVar {
                let span = self.span_here();
                self.next();
                self.error(span, "var declaration not allowed in if initializer");
            }
            init = Some(self.parse_header_stmt());
        }

        let mut cond_stmt = None;
        let mut semi = None;
        if self.tok != Tok::LBrace && !(init.is_some() && self.at_auto_semi()) {
            if self.tok == Tok::Semi {
                semi = Some(self.at_auto_semi());
                self.next();
            } else {
                self.expect(Tok::Semi);
            }
            if self.tok != Tok::LBrace {
                cond_stmt = Some(self.parse_header_stmt());
            }
        } else {
            cond_stmt = init.take();
        }

        let cond = match cond_stmt {
            Some(s) => self.make_expr(s, "boolean expression"),
            None => {
                let span = Span::empty_at(self.pos);
                let msg = match semi {
                    Some(true) => "unexpected newline, expected { after if clause",
                    _ => "missing condition in if statement",
                };
                self.error(span, msg);
                self.arena.exprs.alloc(Expr::Bad(span), span)
            }
        };

        self.expr_lev = prev_lev;
        (init, cond)
    }

    // -------------------------------------------------------------------------
    // switch / select
    // -------------------------------------------------------------------------

    fn parse_switch_stmt(&mut self) -> StmtId {
        let switch_pos = self.expect(Tok::KwSwitch);

        let (mut s1, mut s2) = (None, None);
        if self.tok != Tok::LBrace {
            let prev_lev = self.expr_lev;
            self.expr_lev = -1;
            if self.tok != Tok::Semi {
                s2 = Some(self.parse_header_stmt());
            }
            if self.tok == Tok::Semi && !(s2.is_some() && self.at_auto_semi()) {
                self.next();
                s1 = s2.take();
                if self.tok != Tok::LBrace {
                    s2 = Some(self.parse_header_stmt());
                }
            }
            self.expr_lev = prev_lev;
        }

        let guard = s2.filter(|&s| self.is_type_switch_guard(s));
        let l_brace = self.expect(Tok::LBrace);
        let mut clauses = Vec::new();
        while matches!(self.tok, Tok::KwCase | Tok::KwDefault) {
            clauses.push(self.parse_case_clause(guard.is_some()));
        }
        // Consumes whatever stands in place of the closing brace.
        let r_brace = self.expect(Tok::RBrace);
        self.expect_semi();

        let body = Block {
            l_brace,
            stmts: ListRef::EMPTY,
            r_brace,
        };
        let clauses = self.arena.list_switch_clause_ids(clauses);
        let span = switch_pos.to(r_brace);
        let stmt = match guard {
            Some(assign) => Stmt::TypeSwitch {
                switch_pos,
                init: s1,
                assign,
                body,
                clauses,
            },
            None => {
                let tag = s2.map(|s| self.make_expr(s, "switch expression"));
                Stmt::Switch {
                    switch_pos,
                    init: s1,
                    tag,
                    body,
                    clauses,
                }
            }
        };
        self.alloc_stmt(stmt, span)
    }

    /// `x.(type)` or `v := x.(type)`.
    fn is_type_switch_guard(&self, s: SimpleStmtId) -> bool {
        let is_guard = |x: ExprId| {
            matches!(self.arena.exprs[x], Expr::TypeAssert { typ: None, .. })
        };
        match self.arena.simple_stmts[s] {
            SimpleStmt::Expr(x) => is_guard(x),
            SimpleStmt::Assign {
                lhs,
                op: AssignOp::Define,
                rhs,
                ..
            } => {
                let lhs = self.arena.exprs_list(lhs);
                let rhs = self.arena.exprs_list(rhs);
                matches!(lhs, [l] if matches!(self.arena.exprs[*l], Expr::Ident(..)))
                    && matches!(rhs, [r] if is_guard(*r))
            }
            _ => false,
        }
    }

    fn parse_case_clause(&mut self, type_switch: bool) -> SwitchClauseId {
        let start = self.pos;
        let case_pos = self.span_here();
        let (items, is_default) = if self.tok == Tok::KwCase {
            self.next();
            if type_switch {
                self.type_expr_ok += 1;
            }
            let items = self.parse_expr_list();
            if type_switch {
                self.type_expr_ok -= 1;
            }
            (items, false)
        } else {
            self.expect(Tok::KwDefault);
            (Vec::new(), true)
        };
        let colon_pos = self.expect(Tok::Colon);
        let stmts = self.parse_stmt_list();
        let items = self.arena.list_exprs(items);
        let span = Span::new(start, self.prev_end.max(colon_pos.end_usize()));
        self.arena.switch_clauses.alloc(
            SwitchClause {
                case_pos,
                items,
                is_default,
                colon_pos,
                stmts,
            },
            span,
        )
    }

    fn parse_select_stmt(&mut self) -> StmtId {
        let select_pos = self.expect(Tok::KwSelect);
        let l_brace = self.expect(Tok::LBrace);
        let mut clauses = Vec::new();
        while matches!(self.tok, Tok::KwCase | Tok::KwDefault) {
            clauses.push(self.parse_comm_clause());
        }
        let r_brace = self.expect(Tok::RBrace);
        self.expect_semi();

        let clauses = self.arena.list_comm_clause_ids(clauses);
        let body = Block {
            l_brace,
            stmts: ListRef::EMPTY,
            r_brace,
        };
        self.alloc_stmt(
            Stmt::Select {
                select_pos,
                body,
                clauses,
            },
            select_pos.to(r_brace),
        )
    }

    fn parse_comm_clause(&mut self) -> CommClauseId {
        let start = self.pos;
        let case_pos = self.span_here();
        let comm = if self.tok == Tok::KwCase {
            self.next();
            Some(self.parse_header_stmt())
        } else {
            self.expect(Tok::KwDefault);
            None
        };
        let colon_pos = self.expect(Tok::Colon);
        let stmts = self.parse_stmt_list();
        let span = Span::new(start, self.prev_end.max(colon_pos.end_usize()));
        self.arena.comm_clauses.alloc(
            CommClause {
                case_pos,
                comm,
                colon_pos,
                stmts,
            },
            span,
        )
    }

    // -------------------------------------------------------------------------
    // for
    // -------------------------------------------------------------------------

    fn parse_for_stmt(&mut self) -> StmtId {
        let for_pos = self.expect(Tok::KwFor);

        let mut kind = ForKind::Infinite;
        if self.tok != Tok::LBrace {
            let prev_lev = self.expr_lev;
            self.expr_lev = -1;
            kind = self.parse_for_header();
            self.expr_lev = prev_lev;
        }

        let body = self.parse_block();
        let span = for_pos.to(body.r_brace);
        self.expect_semi();
        self.alloc_stmt(
            Stmt::For {
                for_pos,
                kind,
                body,
            },
            span,
        )
    }

    fn parse_for_header(&mut self) -> ForKind {
        let mut s2 = None;
        if self.tok != Tok::Semi {
            if self.tok == Tok::KwRange {
                // `for range ch`
                let range_pos = self.span_here();
                self.next();
                let expr = self.parse_rhs();
                return ForKind::Range {
                    key: None,
                    value: None,
                    op: None,
                    op_pos: None,
                    range_pos,
                    expr,
                };
            }
            match self.parse_simple_stmt(StmtMode::RangeOk) {
                SimpleOutcome::Range(range) => return range,
                SimpleOutcome::Simple(s) => s2 = Some(s),
                SimpleOutcome::Labeled(stmt) => {
                    let span = self.arena.stmts.span(stmt);
                    s2 = Some(self.bad_simple(span));
                }
                SimpleOutcome::Bad(span) => s2 = Some(self.bad_simple(span)),
            }
        }

        // A newline right after the first statement ends the header.
        if self.tok != Tok::Semi || (s2.is_some() && self.at_auto_semi()) {
            return match s2 {
                Some(s) => ForKind::Cond(self.make_expr(s, "boolean or range expression")),
                None => ForKind::Infinite,
            };
        }

        self.next();
        let init = s2;
        let cond = if self.tok != Tok::Semi && self.tok != Tok::LBrace {
            let s = self.parse_header_stmt();
            Some(self.make_expr(s, "boolean expression"))
        } else {
            None
        };

        let post = if cond.is_some() && self.at_auto_semi() {
            let span = Span::empty_at(self.pos);
            self.error_expected(self.pos, "for loop post statement");
            Some(self.bad_simple(span))
        } else {
            self.expect_semi();
            (self.tok != Tok::LBrace).then(|| self.parse_header_stmt())
        };

        ForKind::Clause { init, cond, post }
    }
}
