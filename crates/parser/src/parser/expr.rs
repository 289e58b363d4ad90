//! Expressions, including composite literals and types in value position.

use super::{is_stmt_start, Parser};
use crate::ast::*;
use crate::lexer::Tok;

fn binary_op(t: Tok<'_>) -> Option<BinaryOp> {
    Some(match t {
        Tok::Plus => BinaryOp::Add,
        Tok::Minus => BinaryOp::Sub,
        Tok::Star => BinaryOp::Mul,
        Tok::Slash => BinaryOp::Div,
        Tok::Percent => BinaryOp::Mod,
        Tok::Amp => BinaryOp::And,
        Tok::Pipe => BinaryOp::Or,
        Tok::Caret => BinaryOp::Xor,
        Tok::Shl => BinaryOp::Shl,
        Tok::Shr => BinaryOp::Shr,
        Tok::AndNot => BinaryOp::AndNot,
        Tok::LAnd => BinaryOp::LAnd,
        Tok::LOr => BinaryOp::LOr,
        Tok::EqEq => BinaryOp::Eq,
        Tok::NotEq => BinaryOp::Ne,
        Tok::Lt => BinaryOp::Lt,
        Tok::Le => BinaryOp::Le,
        Tok::Gt => BinaryOp::Gt,
        Tok::Ge => BinaryOp::Ge,
        _ => return None,
    })
}

fn unary_op(t: Tok<'_>) -> Option<UnaryOp> {
    Some(match t {
        Tok::Plus => UnaryOp::Add,
        Tok::Minus => UnaryOp::Sub,
        Tok::Bang => UnaryOp::Not,
        Tok::Caret => UnaryOp::Xor,
        Tok::Star => UnaryOp::Deref,
        Tok::Amp => UnaryOp::Addr,
        Tok::Arrow => UnaryOp::Recv,
        Tok::Tilde => UnaryOp::Tilde,
        _ => return None,
    })
}

impl<'src> Parser<'src> {
    #[inline]
    fn alloc_expr(&mut self, expr: Expr, span: Span) -> ExprId {
        self.arena.exprs.alloc(expr, span)
    }

    #[inline]
    fn expr_span(&self, x: ExprId) -> Span {
        self.arena.exprs.span(x)
    }

    pub(crate) fn parse_expr(&mut self) -> ExprId {
        self.parse_binary_expr(1)
    }

    /// Right-hand side of an assignment or argument; same grammar as
    /// `parse_expr`.
    pub(crate) fn parse_rhs(&mut self) -> ExprId {
        self.parse_expr()
    }

    pub(crate) fn parse_expr_list(&mut self) -> Vec<ExprId> {
        let mut list = vec![self.parse_expr()];
        while self.tok == Tok::Comma {
            self.next();
            list.push(self.parse_expr());
        }
        list
    }

    fn parse_binary_expr(&mut self, prec1: u8) -> ExprId {
        let mut x = self.parse_unary_expr();
        loop {
            let Some(op) = binary_op(self.tok) else {
                return x;
            };
            let prec = op.precedence();
            if prec < prec1 {
                return x;
            }
            let op_pos = self.span_here();
            self.next();
            let right = self.parse_binary_expr(prec + 1);
            let span = self.expr_span(x).to(self.expr_span(right));
            x = self.alloc_expr(
                Expr::Binary {
                    left: x,
                    op,
                    op_pos,
                    right,
                },
                span,
            );
        }
    }

    fn parse_unary_expr(&mut self) -> ExprId {
        self.nested(Self::parse_unary_inner, |p, span| {
            p.alloc_expr(Expr::Bad(span), span)
        })
    }

    fn parse_unary_inner(&mut self) -> ExprId {
        let Some(op) = unary_op(self.tok) else {
            return self.parse_primary_expr();
        };
        // `<-chan T` is a type, not a receive.
        if op == UnaryOp::Recv && self.peek(1) == Tok::KwChan {
            return self.parse_primary_expr();
        }
        let op_pos = self.span_here();
        self.next();
        let expr = self.parse_unary_expr();
        let span = op_pos.to(self.expr_span(expr));
        self.alloc_expr(Expr::Unary { op, op_pos, expr }, span)
    }

    pub(crate) fn parse_primary_expr(&mut self) -> ExprId {
        let mut x = self.parse_operand();
        loop {
            match self.tok {
                Tok::Dot => {
                    let dot_pos = self.span_here();
                    self.next();
                    x = match self.tok {
                        Tok::Ident(_) => {
                            let sel = self.parse_ident();
                            let span = self.expr_span(x).to(sel.pos);
                            self.alloc_expr(Expr::Selector { expr: x, dot_pos, sel }, span)
                        }
                        Tok::LParen => self.parse_type_assertion(x, dot_pos),
                        _ => self.parse_missing_selector(x, dot_pos),
                    };
                }
                Tok::LBrack => x = self.parse_index_or_slice(x),
                Tok::LParen => x = self.parse_call(x),
                Tok::LBrace => {
                    if !self.is_literal_type(x) {
                        return x;
                    }
                    let start = self.expr_span(x).start_usize();
                    let typ = self.expr_as_type(x);
                    x = self.parse_composite_lit(typ, start);
                }
                _ => return x,
            }
        }
    }

    /// `x.` followed by something that is not a name: the member becomes a
    /// zero-width `_` at the offending token, which is skipped unless it is
    /// a closing brace.
    fn parse_missing_selector(&mut self, x: ExprId, dot_pos: Span) -> ExprId {
        let pos = self.pos;
        self.error_expected(pos, "selector or type assertion");
        if self.tok != Tok::RBrace {
            self.next();
        }
        let sel = self.blank_at(Span::empty_at(pos));
        let span = self.expr_span(x).to(dot_pos);
        self.alloc_expr(Expr::Selector { expr: x, dot_pos, sel }, span)
    }

    fn parse_type_assertion(&mut self, x: ExprId, dot_pos: Span) -> ExprId {
        let l_paren = self.expect(Tok::LParen);
        let typ = if self.tok == Tok::KwType {
            self.next();
            None
        } else {
            Some(self.parse_type())
        };
        let r_paren = self.expect(Tok::RParen);
        let span = self.expr_span(x).to(r_paren);
        self.alloc_expr(
            Expr::TypeAssert {
                expr: x,
                dot_pos,
                l_paren,
                typ,
                r_paren,
            },
            span,
        )
    }

    fn parse_index_or_slice(&mut self, x: ExprId) -> ExprId {
        let l_brack = self.expect(Tok::LBrack);
        let start = self.expr_span(x).start_usize();

        if self.tok == Tok::RBrack {
            // `x[]` is only valid as a type.
            let pos = self.pos;
            self.error_expected(pos, "operand");
            let r_brack = self.span_here();
            self.next();
            let bad = self.alloc_expr(Expr::Bad(Span::empty_at(pos)), Span::empty_at(pos));
            let indices = self.arena.list_exprs([bad]);
            return self.alloc_expr(
                Expr::Index {
                    base: x,
                    l_brack,
                    indices,
                    r_brack,
                },
                Span::new(start, r_brack.end_usize()),
            );
        }

        self.expr_lev += 1;
        self.type_expr_ok += 1;
        let first = (self.tok != Tok::Colon).then(|| self.parse_rhs());
        let mut slice = [first, None, None];
        let mut colons = 0;
        let mut indices = Vec::new();
        if self.tok == Tok::Colon {
            while self.tok == Tok::Colon && colons < 2 {
                colons += 1;
                self.next();
                if !matches!(self.tok, Tok::Colon | Tok::RBrack | Tok::Eof) {
                    slice[colons] = Some(self.parse_rhs());
                }
            }
        } else {
            indices.extend(first);
            while self.tok == Tok::Comma {
                self.next();
                if self.tok == Tok::RBrack {
                    break;
                }
                indices.push(self.parse_rhs());
            }
        }
        self.type_expr_ok -= 1;
        self.expr_lev -= 1;
        let r_brack = self.expect(Tok::RBrack);
        let span = Span::new(start, r_brack.end_usize());

        if colons == 0 {
            let indices = self.arena.list_exprs(indices);
            return self.alloc_expr(
                Expr::Index {
                    base: x,
                    l_brack,
                    indices,
                    r_brack,
                },
                span,
            );
        }
        let [lo, hi, max] = slice;
        if colons == 2 {
            if hi.is_none() {
                self.error(r_brack, "middle index required in 3-index slice");
            }
            if max.is_none() {
                self.error(r_brack, "final index required in 3-index slice");
            }
        }
        self.alloc_expr(
            Expr::Slice {
                expr: x,
                l_brack,
                lo,
                hi,
                max,
                r_brack,
            },
            span,
        )
    }

    fn parse_call(&mut self, callee: ExprId) -> ExprId {
        let l_paren = self.expect(Tok::LParen);
        self.expr_lev += 1;
        self.type_expr_ok += 1;
        let mut args = Vec::new();
        let mut ellipsis = None;
        while self.tok != Tok::RParen && self.tok != Tok::Eof && ellipsis.is_none() {
            args.push(self.parse_rhs());
            if self.tok == Tok::Ellipsis {
                ellipsis = Some(self.span_here());
                self.next();
            }
            if self.tok != Tok::Comma {
                break;
            }
            self.next();
        }
        self.type_expr_ok -= 1;
        self.expr_lev -= 1;
        let r_paren = self.expect_closing(Tok::RParen, "argument list");
        let args = self.arena.list_exprs(args);
        let span = self.expr_span(callee).to(r_paren);
        self.alloc_expr(
            Expr::Call {
                callee,
                l_paren,
                args,
                ellipsis,
                r_paren,
            },
            span,
        )
    }

    fn parse_operand(&mut self) -> ExprId {
        let span = self.span_here();
        match self.tok {
            Tok::Ident(name) => {
                let sym = self.interner.intern(name);
                self.next();
                self.alloc_expr(Expr::Ident(sym, span), span)
            }
            Tok::IntLit(_)
            | Tok::FloatLit(_)
            | Tok::ImagLit(_)
            | Tok::RuneLit(_)
            | Tok::StringLit(_)
            | Tok::RawStringLit(_) => {
                let kind = match self.tok {
                    Tok::IntLit(_) => BasicLitKind::Int,
                    Tok::FloatLit(_) => BasicLitKind::Float,
                    Tok::ImagLit(_) => BasicLitKind::Imag,
                    Tok::RuneLit(_) => BasicLitKind::Rune,
                    _ => BasicLitKind::String,
                };
                self.next();
                self.alloc_expr(Expr::BasicLit(BasicLit { kind, raw: span }), span)
            }
            Tok::LParen => {
                self.next();
                self.expr_lev += 1;
                self.type_expr_ok += 1;
                let expr = self.parse_rhs();
                self.type_expr_ok -= 1;
                self.expr_lev -= 1;
                let r_paren = self.expect_closing(Tok::RParen, "parenthesized expression");
                self.alloc_expr(
                    Expr::Paren {
                        l_paren: span,
                        expr,
                        r_paren,
                    },
                    span.to(r_paren),
                )
            }
            Tok::KwFunc => self.parse_func_lit_or_type(),
            Tok::LBrack
            | Tok::KwStruct
            | Tok::KwMap
            | Tok::KwChan
            | Tok::KwInterface
            | Tok::Arrow => self.parse_type_operand(),
            _ => {
                let pos = self.pos;
                self.error_expected(pos, "operand");
                self.advance(is_stmt_start);
                let span = Span::new(pos, self.pos);
                self.alloc_expr(Expr::Bad(span), span)
            }
        }
    }

    fn parse_func_lit_or_type(&mut self) -> ExprId {
        let func_pos = self.expect(Tok::KwFunc);
        let sig = self.parse_signature();
        if self.tok != Tok::LBrace {
            let span = Span::new(func_pos.start_usize(), self.prev_end);
            let typ = self.arena.types.alloc(Type::Func { func_pos, sig }, span);
            return self.alloc_expr(Expr::Type(typ), span);
        }
        self.expr_lev += 1;
        let saved = std::mem::replace(&mut self.type_expr_ok, 0);
        let body = self.parse_block();
        self.type_expr_ok = saved;
        self.expr_lev -= 1;
        let span = func_pos.to(body.r_brace);
        self.alloc_expr(
            Expr::FuncLit {
                func_pos,
                sig,
                body,
            },
            span,
        )
    }

    /// A type literal where a value was expected: composite literal,
    /// conversion, type argument, or (otherwise) a bad expression.
    fn parse_type_operand(&mut self) -> ExprId {
        let typ = self.parse_type();
        let span = self.arena.types.span(typ);
        let kind = self.arena.types[typ];
        let literal_type = matches!(
            kind,
            Type::Array { .. } | Type::Slice { .. } | Type::Map { .. } | Type::Struct { .. }
        );
        if literal_type && self.tok == Tok::LBrace {
            return self.parse_composite_lit(Some(typ), span.start_usize());
        }

        let lone_type = literal_type || matches!(kind, Type::Chan { .. } | Type::Interface { .. });
        if lone_type && self.tok != Tok::LParen && self.type_expr_ok == 0 {
            self.error(span, "expected expression");
            return self.alloc_expr(Expr::Bad(span), span);
        }
        self.alloc_expr(Expr::Type(typ), span)
    }

    /// Whether `{` after `x` opens a composite literal. Plain and qualified
    /// names do not inside control clause headers.
    fn is_literal_type(&self, x: ExprId) -> bool {
        match self.arena.exprs[x] {
            Expr::Bad(_) | Expr::Ident(..) => self.expr_lev >= 0,
            Expr::Selector { expr, .. } => {
                matches!(self.arena.exprs[expr], Expr::Ident(..)) && self.expr_lev >= 0
            }
            Expr::Index { .. } => self.expr_lev >= 0,
            Expr::Type(t) => matches!(
                self.arena.types[t],
                Type::Array { .. } | Type::Slice { .. } | Type::Map { .. } | Type::Struct { .. }
            ),
            _ => false,
        }
    }

    /// Reinterprets a literal type written in expression syntax.
    fn expr_as_type(&mut self, x: ExprId) -> Option<TypeId> {
        let span = self.expr_span(x);
        let expr = self.arena.exprs[x];
        let typ = match expr {
            Expr::Type(t) => return Some(t),
            Expr::Ident(sym, pos) => Type::Named {
                pkg: None,
                name: IdentName { sym, pos },
                args: ListRef::EMPTY,
            },
            Expr::Selector { expr, sel, .. } => match self.arena.exprs[expr] {
                Expr::Ident(sym, pos) => Type::Named {
                    pkg: Some(IdentName { sym, pos }),
                    name: sel,
                    args: ListRef::EMPTY,
                },
                _ => Type::Bad(span),
            },
            Expr::Index { base, indices, .. } => {
                let Some(base) = self.expr_as_type(base) else {
                    return None;
                };
                let Type::Named { pkg, name, .. } = self.arena.types[base] else {
                    return Some(base);
                };
                let exprs = self.arena.exprs_list(indices).to_vec();
                let mut args = Vec::with_capacity(exprs.len());
                for e in exprs {
                    let arg = match self.expr_as_type(e) {
                        Some(t) => t,
                        None => {
                            let s = self.expr_span(e);
                            self.arena.types.alloc(Type::Bad(s), s)
                        }
                    };
                    args.push(arg);
                }
                let args = self.arena.list_types(args);
                Type::Named { pkg, name, args }
            }
            _ => Type::Bad(span),
        };
        Some(self.arena.types.alloc(typ, span))
    }

    fn parse_composite_lit(&mut self, typ: Option<TypeId>, start: usize) -> ExprId {
        let lit = self.parse_literal_value();
        let span = Span::new(start, lit.r_brace.end_usize());
        self.alloc_expr(Expr::CompositeLit { typ, lit }, span)
    }

    fn parse_literal_value(&mut self) -> LiteralValue {
        let l_brace = self.expect(Tok::LBrace);
        self.expr_lev += 1;
        let saved = std::mem::replace(&mut self.type_expr_ok, 0);
        let mut elts = Vec::new();
        while self.tok != Tok::RBrace && self.tok != Tok::Eof {
            elts.push(self.parse_element());
            if self.tok != Tok::Comma {
                break;
            }
            self.next();
        }
        self.type_expr_ok = saved;
        self.expr_lev -= 1;
        let r_brace = self.expect_closing(Tok::RBrace, "composite literal");
        let elts = self.arena.list_exprs(elts);
        LiteralValue {
            l_brace,
            elts,
            r_brace,
        }
    }

    fn parse_element(&mut self) -> ExprId {
        let key = self.parse_element_value();
        if self.tok != Tok::Colon {
            return key;
        }
        let colon_pos = self.span_here();
        self.next();
        let value = self.parse_element_value();
        let span = self.expr_span(key).to(self.expr_span(value));
        self.alloc_expr(
            Expr::KeyValue {
                key,
                colon_pos,
                value,
            },
            span,
        )
    }

    fn parse_element_value(&mut self) -> ExprId {
        if self.tok != Tok::LBrace {
            return self.parse_expr();
        }
        let start = self.pos;
        self.nested(
            |p| p.parse_composite_lit(None, start),
            |p, span| p.alloc_expr(Expr::Bad(span), span),
        )
    }
}
