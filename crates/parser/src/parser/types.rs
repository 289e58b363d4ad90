//! Type syntax.

use super::decl::starts_type;
use super::{is_expr_end, Parser};
use crate::ast::*;
use crate::lexer::Tok;

impl<'src> Parser<'src> {
    pub(crate) fn parse_type(&mut self) -> TypeId {
        if let Some(typ) = self.try_type() {
            return typ;
        }
        let pos = self.pos;
        self.error_expected(pos, "type");
        self.advance(is_expr_end);
        let span = Span::new(pos, self.pos);
        self.arena.types.alloc(Type::Bad(span), span)
    }

    /// Parses a type if the current token can start one.
    pub(crate) fn try_type(&mut self) -> Option<TypeId> {
        self.nested(Self::try_type_inner, |p, span| {
            Some(p.arena.types.alloc(Type::Bad(span), span))
        })
    }

    fn try_type_inner(&mut self) -> Option<TypeId> {
        let start = self.pos;
        let typ = match self.tok {
            Tok::Ident(_) => return Some(self.parse_named_type()),
            Tok::LBrack => {
                let l_brack = self.span_here();
                self.next();
                return Some(self.parse_array_or_slice_type(l_brack));
            }
            Tok::Star => {
                let star_pos = self.span_here();
                self.next();
                let elem = self.parse_type();
                Type::Pointer { star_pos, elem }
            }
            Tok::KwStruct => self.parse_struct_type(),
            Tok::KwInterface => self.parse_interface_type(),
            Tok::KwFunc => {
                let func_pos = self.span_here();
                self.next();
                let sig = self.parse_signature();
                Type::Func { func_pos, sig }
            }
            Tok::KwMap => {
                let map_pos = self.span_here();
                self.next();
                self.expect(Tok::LBrack);
                let key = self.parse_type();
                self.expect(Tok::RBrack);
                let val = self.parse_type();
                Type::Map { map_pos, key, val }
            }
            Tok::KwChan | Tok::Arrow => self.parse_chan_type(),
            Tok::LParen => {
                let l_paren = self.span_here();
                self.next();
                let typ = self.parse_type();
                let r_paren = self.expect(Tok::RParen);
                Type::Paren {
                    l_paren,
                    typ,
                    r_paren,
                }
            }
            _ => return None,
        };
        let span = Span::new(start, self.prev_end);
        Some(self.arena.types.alloc(typ, span))
    }

    /// `Name`, `pkg.Name`, optionally followed by `[Args]`.
    fn parse_named_type(&mut self) -> TypeId {
        let start = self.pos;
        let first = self.parse_ident();
        let (pkg, name) = if self.tok == Tok::Dot {
            self.next();
            (Some(first), self.parse_ident())
        } else {
            (None, first)
        };
        let args = if self.tok == Tok::LBrack {
            self.next();
            let mut args = Vec::new();
            while self.tok != Tok::RBrack && self.tok != Tok::Eof {
                args.push(self.parse_type());
                if self.tok != Tok::Comma {
                    break;
                }
                self.next();
            }
            self.expect_closing(Tok::RBrack, "type argument list");
            self.arena.list_types(args)
        } else {
            ListRef::EMPTY
        };
        let span = Span::new(start, self.prev_end);
        self.arena.types.alloc(Type::Named { pkg, name, args }, span)
    }

    /// After `[`: `[]T`, `[...]T` or `[N]T`.
    pub(crate) fn parse_array_or_slice_type(&mut self, l_brack: Span) -> TypeId {
        let start = l_brack.start_usize();
        if self.tok == Tok::RBrack {
            let r_brack = self.span_here();
            self.next();
            let elem = self.parse_type();
            let span = Span::new(start, self.prev_end);
            return self.arena.types.alloc(
                Type::Slice {
                    l_brack,
                    r_brack,
                    elem,
                },
                span,
            );
        }

        self.expr_lev += 1;
        let len = if self.tok == Tok::Ellipsis {
            let pos = self.span_here();
            self.next();
            ArrayLen::Ellipsis(pos)
        } else {
            ArrayLen::Expr(self.parse_rhs())
        };
        self.expr_lev -= 1;
        let r_brack = self.expect(Tok::RBrack);
        let elem = self.parse_type();
        let span = Span::new(start, self.prev_end);
        self.arena.types.alloc(
            Type::Array {
                l_brack,
                len,
                r_brack,
                elem,
            },
            span,
        )
    }

    fn parse_chan_type(&mut self) -> Type {
        if self.tok == Tok::Arrow {
            let arrow = self.span_here();
            self.next();
            let chan_pos = self.expect(Tok::KwChan);
            let elem = self.parse_type();
            return Type::Chan {
                dir: ChanDir::Recv,
                chan_pos,
                arrow_pos: Some(arrow),
                elem,
            };
        }
        let chan_pos = self.expect(Tok::KwChan);
        let (dir, arrow_pos) = if self.tok == Tok::Arrow {
            let arrow = self.span_here();
            self.next();
            (ChanDir::Send, Some(arrow))
        } else {
            (ChanDir::Both, None)
        };
        let elem = self.parse_type();
        Type::Chan {
            dir,
            chan_pos,
            arrow_pos,
            elem,
        }
    }

    fn parse_struct_type(&mut self) -> Type {
        let struct_pos = self.expect(Tok::KwStruct);
        let open = self.expect(Tok::LBrace);
        let mut fields = Vec::new();
        while matches!(self.tok, Tok::Ident(_) | Tok::Star | Tok::LParen) {
            let start = self.idx;
            fields.push(self.parse_field_decl());
            if self.idx == start {
                self.next();
            }
        }
        let close = self.expect(Tok::RBrace);
        let fields = self.arena.list_fields(fields);
        Type::Struct {
            struct_pos,
            fields: FieldList {
                open,
                fields,
                close,
            },
        }
    }

    fn parse_field_decl(&mut self) -> FieldId {
        let start = self.pos;
        let embedded = match self.tok {
            Tok::Ident(_) => match self.peek(1) {
                Tok::Dot | Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_) => {
                    true
                }
                Tok::LBrack => !self.bracket_starts_array(1),
                _ => false,
            },
            _ => true,
        };

        let (names, typ) = if embedded {
            if self.tok == Tok::LParen {
                let span = self.span_here();
                self.error(span, "cannot parenthesize embedded type");
            }
            (ListRef::EMPTY, self.parse_type())
        } else {
            let names = self.parse_ident_list();
            let names = self.arena.list_ident_names(names);
            (names, self.parse_type())
        };

        let tag = match self.tok {
            Tok::StringLit(_) | Tok::RawStringLit(_) => {
                let raw = self.span_here();
                self.next();
                Some(StringLit { raw })
            }
            _ => None,
        };
        let span = Span::new(start, self.prev_end);
        self.expect_semi();
        self.arena.fields.alloc(
            Field {
                names,
                ellipsis_pos: None,
                typ,
                tag,
            },
            span,
        )
    }

    fn parse_interface_type(&mut self) -> Type {
        let interface_pos = self.expect(Tok::KwInterface);
        let l_brace = self.expect(Tok::LBrace);
        let mut elems = Vec::new();
        while self.tok != Tok::RBrace && self.tok != Tok::Eof {
            let start = self.idx;
            if self.at_ident() && self.peek(1) == Tok::LParen {
                let name = self.parse_ident();
                let sig = self.parse_signature();
                elems.push(InterfaceElem::Method { name, sig });
            } else if starts_type(self.tok) || self.tok == Tok::Tilde {
                elems.push(InterfaceElem::Embed(self.parse_constraint()));
            } else {
                let pos = self.pos;
                self.error_expected(pos, "method or embedded type");
                self.advance(is_expr_end);
            }
            self.expect_semi();
            if self.idx == start {
                self.next();
            }
        }
        let r_brace = self.expect(Tok::RBrace);
        let elems = self.arena.list_interface_elems(elems);
        Type::Interface {
            interface_pos,
            l_brace,
            elems,
            r_brace,
        }
    }

    /// `T`, `~T`, or a union `A | ~B`.
    pub(crate) fn parse_constraint(&mut self) -> TypeId {
        let start = self.pos;
        let mut terms = vec![self.parse_type_term()];
        while self.tok == Tok::Pipe {
            self.next();
            terms.push(self.parse_type_term());
        }
        if let [TypeTerm {
            tilde_pos: None,
            typ,
        }] = terms[..]
        {
            return typ;
        }
        let terms = self.arena.list_type_terms(terms);
        let span = Span::new(start, self.prev_end);
        self.arena.types.alloc(Type::Union { terms }, span)
    }

    fn parse_type_term(&mut self) -> TypeTerm {
        let tilde_pos = (self.tok == Tok::Tilde).then(|| {
            let pos = self.span_here();
            self.next();
            pos
        });
        TypeTerm {
            tilde_pos,
            typ: self.parse_type(),
        }
    }
}
