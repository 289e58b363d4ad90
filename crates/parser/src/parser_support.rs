use crate::ast::{self, Span};

/// One comma-separated entry of a parameter list, before grouping.
///
/// A bare identifier (`typ == None`) is either a parameter name waiting for a
/// type further right, or a type on its own; only the whole list decides.
#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub names: Vec<ast::IdentName>,
    pub ellipsis_pos: Option<Span>,
    pub typ: Option<ast::TypeId>,
    pub span: Span,
}

/// Groups `a, b int, c string` into fields; leftover bare identifiers are
/// types (`func(int, string)`).
pub fn resolve_param_list(
    arena: &mut ast::AstArena,
    params: Vec<ParamDecl>,
) -> Vec<ast::FieldId> {
    let mut out = Vec::new();
    let mut pending_names: Vec<ast::IdentName> = Vec::new();
    let mut pending_start: Option<u32> = None;

    for param in params {
        if let Some(typ) = param.typ {
            let mut names = Vec::new();
            if !pending_names.is_empty() {
                names.append(&mut pending_names);
            }
            names.extend(param.names);

            let names_ref = if names.is_empty() {
                ast::ListRef::EMPTY
            } else {
                arena.list_ident_names(names)
            };
            let start = pending_start.unwrap_or(param.span.start);
            let span = Span {
                start,
                end: param.span.end,
            };
            let field = ast::Field {
                names: names_ref,
                ellipsis_pos: param.ellipsis_pos,
                typ,
                tag: None,
            };
            out.push(arena.fields.alloc(field, span));
            pending_start = None;
        } else {
            if pending_names.is_empty() {
                pending_start = Some(param.span.start);
            }
            pending_names.extend(param.names);
        }
    }

    for name in pending_names {
        let typ = named_type_from_ident(arena, name);
        let field = ast::Field {
            names: ast::ListRef::EMPTY,
            ellipsis_pos: None,
            typ,
            tag: None,
        };
        out.push(arena.fields.alloc(field, name.pos));
    }

    out
}

pub fn named_type_from_ident(arena: &mut ast::AstArena, name: ast::IdentName) -> ast::TypeId {
    arena.types.alloc(
        ast::Type::Named {
            pkg: None,
            name,
            args: ast::ListRef::EMPTY,
        },
        name.pos,
    )
}
