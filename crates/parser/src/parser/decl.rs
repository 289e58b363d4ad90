//! Declarations: `import`/`const`/`type`/`var`, functions, parameter lists.

use super::{is_decl_start, Parser};
use crate::ast::*;
use crate::lexer::Tok;
use crate::parser_support::{resolve_param_list, ParamDecl};

/// Top-level resync set; `func` is included so one stray token does not
/// swallow the functions after it.
fn is_top_level_start(t: Tok<'_>) -> bool {
    is_decl_start(t) || t == Tok::KwFunc
}

/// Tokens that can begin a type.
pub(super) fn starts_type(t: Tok<'_>) -> bool {
    matches!(
        t,
        Tok::Ident(_)
            | Tok::LBrack
            | Tok::Star
            | Tok::LParen
            | Tok::Arrow
            | Tok::KwMap
            | Tok::KwChan
            | Tok::KwFunc
            | Tok::KwStruct
            | Tok::KwInterface
    )
}

impl<'src> Parser<'src> {
    pub(super) fn parse_decl(&mut self) -> TopLevelDecl {
        match self.tok {
            Tok::KwImport | Tok::KwConst | Tok::KwType | Tok::KwVar => {
                TopLevelDecl::Decl(self.parse_gen_decl(self.tok))
            }
            Tok::KwFunc => TopLevelDecl::Func(self.parse_func_decl()),
            _ => {
                let pos = self.pos;
                self.error_expected(pos, "declaration");
                self.advance(is_top_level_start);
                let span = Span::new(pos, self.pos);
                TopLevelDecl::Decl(self.arena.decls.alloc(Decl::Bad(span), span))
            }
        }
    }

    pub(super) fn parse_gen_decl(&mut self, keyword: Tok<'src>) -> DeclId {
        let kw_pos = self.expect(keyword);
        let kind = match keyword {
            Tok::KwImport => GenDeclKind::Import,
            Tok::KwConst => GenDeclKind::Const,
            Tok::KwType => GenDeclKind::Type,
            _ => GenDeclKind::Var,
        };

        let mut specs = Vec::new();
        let (l_paren, r_paren, end);
        if self.tok == Tok::LParen {
            l_paren = Some(self.span_here());
            self.next();
            while self.tok != Tok::RParen && self.tok != Tok::Eof {
                let start = self.idx;
                specs.push(self.parse_spec(kind));
                if self.idx == start {
                    self.next();
                }
            }
            let close = self.expect(Tok::RParen);
            r_paren = Some(close);
            end = close.end_usize();
            self.expect_semi();
        } else {
            l_paren = None;
            r_paren = None;
            let (spec, spec_end) = self.parse_spec_with_end(kind);
            specs.push(spec);
            end = spec_end;
        }

        let specs = self.arena.list_specs(specs);
        let decl = GenDecl {
            kw_pos,
            kind,
            l_paren,
            specs,
            r_paren,
        };
        let span = Span::new(kw_pos.start_usize(), end.max(kw_pos.end_usize()));
        self.arena.decls.alloc(Decl::Gen(decl), span)
    }

    fn parse_spec(&mut self, kind: GenDeclKind) -> Spec {
        self.parse_spec_with_end(kind).0
    }

    /// Parses one spec and its terminating semicolon; also returns where the
    /// spec itself ended.
    fn parse_spec_with_end(&mut self, kind: GenDeclKind) -> (Spec, usize) {
        let spec = match kind {
            GenDeclKind::Import => Spec::Import(self.parse_import_spec()),
            GenDeclKind::Const | GenDeclKind::Var => Spec::Value(self.parse_value_spec(kind)),
            GenDeclKind::Type => Spec::Type(self.parse_type_spec()),
        };
        let end = self.prev_end;
        self.expect_semi();
        (spec, end)
    }

    fn parse_import_spec(&mut self) -> ImportSpec {
        let name = match self.tok {
            Tok::Ident(_) => Some(self.parse_ident()),
            Tok::Dot => {
                let pos = self.span_here();
                let sym = self.interner.intern(".");
                self.next();
                Some(IdentName { sym, pos })
            }
            _ => None,
        };

        let raw = match self.tok {
            Tok::StringLit(_) | Tok::RawStringLit(_) => {
                let raw = self.span_here();
                self.next();
                raw
            }
            t if t.is_literal() => {
                let raw = self.span_here();
                self.error(raw, "import path must be a string");
                self.next();
                raw
            }
            _ => {
                let raw = Span::empty_at(self.pos);
                self.error(raw, "missing import path");
                self.advance(super::is_expr_end);
                raw
            }
        };
        ImportSpec {
            name,
            path: StringLit { raw },
        }
    }

    fn parse_value_spec(&mut self, kind: GenDeclKind) -> ValueSpec {
        let names = self.parse_ident_list();
        let mut typ = None;
        let mut assign_pos = None;
        let mut values = Vec::new();

        let wants_more = match kind {
            // Type and values are both optional inside const groups.
            GenDeclKind::Const => !matches!(self.tok, Tok::Eof | Tok::Semi | Tok::RParen),
            _ => true,
        };
        if wants_more {
            if self.tok != Tok::Assign {
                typ = match kind {
                    GenDeclKind::Const => self.try_type(),
                    _ => Some(self.parse_type()),
                };
            }
            if self.tok == Tok::Assign {
                assign_pos = Some(self.span_here());
                self.next();
                values = self.parse_expr_list();
            }
        }

        let names = self.arena.list_ident_names(names);
        let values = self.arena.list_exprs(values);
        ValueSpec {
            names,
            typ,
            assign_pos,
            values,
        }
    }

    fn parse_type_spec(&mut self) -> TypeSpec {
        let name = self.parse_ident();
        let type_params = if self.tok == Tok::LBrack && self.looks_like_type_params() {
            Some(self.parse_type_params())
        } else {
            None
        };
        let assign_pos = if self.tok == Tok::Assign {
            let pos = self.span_here();
            self.next();
            Some(pos)
        } else {
            None
        };
        let typ = self.parse_type();
        TypeSpec {
            name,
            type_params,
            assign_pos,
            typ,
        }
    }

    /// At `[` after a type name: `[P any]` vs the array length in `[N]int`.
    fn looks_like_type_params(&self) -> bool {
        matches!(self.peek(1), Tok::Ident(_))
            && matches!(
                self.peek(2),
                Tok::Ident(_)
                    | Tok::Comma
                    | Tok::Tilde
                    | Tok::LBrack
                    | Tok::KwInterface
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::KwFunc
                    | Tok::KwStruct
            )
    }

    pub(super) fn parse_type_params(&mut self) -> TypeParamsId {
        let l_brack = self.expect(Tok::LBrack);
        let mut decls = Vec::new();
        while self.at_ident() {
            let start = self.pos;
            let names = self.parse_ident_list();
            let constraint = self.parse_constraint();
            let names = self.arena.list_ident_names(names);
            let span = Span::new(start, self.prev_end);
            decls.push(
                self.arena
                    .type_param_decls
                    .alloc(TypeParamDecl { names, constraint }, span),
            );
            if self.tok != Tok::Comma {
                break;
            }
            self.next();
        }
        if decls.is_empty() {
            let span = self.span_here();
            self.error(span, "empty type parameter list");
        }
        let r_brack = self.expect_closing(Tok::RBrack, "type parameter list");
        let decls = self.arena.list_type_param_decl_ids(decls);
        self.arena.type_params.alloc(
            TypeParams {
                l_brack,
                decls,
                r_brack,
            },
            l_brack.to(r_brack),
        )
    }

    fn parse_func_decl(&mut self) -> FuncDeclId {
        let func_pos = self.expect(Tok::KwFunc);
        let recv = (self.tok == Tok::LParen).then(|| self.parse_parameters());
        let name = self.parse_ident();
        let type_params = (self.tok == Tok::LBrack).then(|| self.parse_type_params());
        let sig = self.parse_signature();

        let mut end = self.prev_end;
        let body = match self.tok {
            Tok::Semi => {
                self.next();
                if self.tok == Tok::LBrace {
                    let span = self.span_here();
                    self.error(span, "unexpected semicolon or newline before {");
                    Some(self.parse_func_body(&mut end))
                } else {
                    None
                }
            }
            Tok::LBrace => Some(self.parse_func_body(&mut end)),
            _ => {
                self.expect_semi();
                None
            }
        };

        let func = FuncDecl {
            func_pos,
            recv,
            name,
            type_params,
            sig,
            body,
        };
        self.arena
            .funcs
            .alloc(func, Span::new(func_pos.start_usize(), end))
    }

    fn parse_func_body(&mut self, end: &mut usize) -> Block {
        let body = self.parse_block();
        *end = self.prev_end;
        self.expect_semi();
        body
    }

    /// Parameters and results; the span covers both.
    pub(super) fn parse_signature(&mut self) -> SignatureId {
        let params = self.parse_parameters();
        let results = self.parse_results();
        let span = Span::new(params.open.start_usize(), self.prev_end);
        self.arena
            .signatures
            .alloc(Signature { params, results }, span)
    }

    pub(super) fn parse_parameters(&mut self) -> FieldList {
        let open = self.expect(Tok::LParen);
        let mut params = Vec::new();
        while self.tok != Tok::RParen && self.tok != Tok::Eof {
            params.push(self.parse_param_decl());
            if self.tok != Tok::Comma {
                break;
            }
            self.next();
        }
        let fields = resolve_param_list(&mut self.arena, params);
        let fields = self.arena.list_fields(fields);
        let close = self.expect_closing(Tok::RParen, "parameter list");
        FieldList {
            open,
            fields,
            close,
        }
    }

    fn parse_param_decl(&mut self) -> ParamDecl {
        let start = self.pos;
        if self.at_ident() {
            match self.peek(1) {
                Tok::Comma | Tok::RParen => {
                    let name = self.parse_ident();
                    return ParamDecl {
                        names: vec![name],
                        ellipsis_pos: None,
                        typ: None,
                        span: name.pos,
                    };
                }
                // Qualified or instantiated type without a name.
                Tok::Dot => {}
                Tok::LBrack if !self.bracket_starts_array(1) => {}
                _ => {
                    let name = self.parse_ident();
                    let (ellipsis_pos, typ) = self.parse_param_type();
                    return ParamDecl {
                        names: vec![name],
                        ellipsis_pos,
                        typ: Some(typ),
                        span: Span::new(start, self.prev_end),
                    };
                }
            }
        }
        let (ellipsis_pos, typ) = self.parse_param_type();
        ParamDecl {
            names: Vec::new(),
            ellipsis_pos,
            typ: Some(typ),
            span: Span::new(start, self.prev_end),
        }
    }

    fn parse_param_type(&mut self) -> (Option<Span>, TypeId) {
        if self.tok == Tok::Ellipsis {
            let ellipsis = self.span_here();
            self.next();
            (Some(ellipsis), self.parse_type())
        } else {
            (None, self.parse_type())
        }
    }

    fn parse_results(&mut self) -> Option<Results> {
        if self.tok == Tok::LParen {
            return Some(Results::List(self.parse_parameters()));
        }
        self.try_type().map(Results::Type)
    }

    /// With `[` at lookahead `at`, decides between `name [N]T` / `name []T`
    /// (true) and an instantiated type `G[T]` (false).
    pub(super) fn bracket_starts_array(&self, at: usize) -> bool {
        if self.peek(at + 1) == Tok::RBrack {
            return true;
        }
        let mut depth = 0usize;
        let mut i = at;
        loop {
            match self.peek(i) {
                Tok::LBrack => depth += 1,
                Tok::RBrack => {
                    depth -= 1;
                    if depth == 0 {
                        return starts_type(self.peek(i + 1));
                    }
                }
                Tok::Eof | Tok::Semi | Tok::LBrace | Tok::RBrace => return false,
                _ => {}
            }
            i += 1;
        }
    }
}
