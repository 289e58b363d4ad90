//! Swapping one immediate child of a node for another of the same kind.

use go125_parser::ast::*;
use go125_parser::Node;

/// A value that occupies a child slot of some node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Stmt(StmtId),
    Simple(SimpleStmtId),
    Expr(ExprId),
    Type(TypeId),
    /// Member, label, declared or type name.
    Name(IdentName),
}

/// Replaces the first slot of `parent` holding `old` with `new`.
///
/// Direct, optional and list slots are searched in field order. Returns
/// false (leaving the tree untouched) when `old` and `new` are of different
/// kinds or `old` is not an immediate child of `parent`.
pub fn replace(arena: &mut AstArena, parent: Node, old: Child, new: Child) -> bool {
    match (old, new) {
        (Child::Stmt(o), Child::Stmt(n)) => replace_stmt(arena, parent, o, n),
        (Child::Simple(o), Child::Simple(n)) => replace_simple(arena, parent, o, n),
        (Child::Expr(o), Child::Expr(n)) => replace_expr(arena, parent, o, n),
        (Child::Type(o), Child::Type(n)) => replace_type(arena, parent, o, n),
        (Child::Name(o), Child::Name(n)) => replace_name(arena, parent, o, n),
        _ => false,
    }
}

#[inline]
fn swap<T: Copy + PartialEq>(slot: &mut T, old: T, new: T) -> bool {
    if *slot == old {
        *slot = new;
        return true;
    }
    false
}

#[inline]
fn swap_opt<T: Copy + PartialEq>(slot: &mut Option<T>, old: T, new: T) -> bool {
    slot.as_mut().is_some_and(|s| swap(s, old, new))
}

#[inline]
fn swap_in<T: Copy + PartialEq>(slots: &mut [T], old: T, new: T) -> bool {
    slots.iter_mut().any(|s| swap(s, old, new))
}

fn replace_stmt(arena: &mut AstArena, parent: Node, old: StmtId, new: StmtId) -> bool {
    let list = match parent {
        Node::Stmt(id) => match &mut arena.stmts[id] {
            Stmt::Labeled { stmt, .. } => return swap(stmt, old, new),
            Stmt::Block(b) => b.stmts,
            Stmt::If {
                then_block,
                else_stmt,
                ..
            } => {
                let list = then_block.stmts;
                if swap_opt(else_stmt, old, new) {
                    return true;
                }
                list
            }
            Stmt::For { body, .. }
            | Stmt::Switch { body, .. }
            | Stmt::TypeSwitch { body, .. }
            | Stmt::Select { body, .. } => body.stmts,
            _ => return false,
        },
        Node::Func(id) => match arena.funcs[id].body {
            Some(body) => body.stmts,
            None => return false,
        },
        Node::Expr(id) => match arena.exprs[id] {
            Expr::FuncLit { body, .. } => body.stmts,
            _ => return false,
        },
        Node::SwitchClause(id) => arena.switch_clauses[id].stmts,
        Node::CommClause(id) => arena.comm_clauses[id].stmts,
        _ => return false,
    };
    swap_in(arena.stmts_list_mut(list), old, new)
}

fn replace_simple(
    arena: &mut AstArena,
    parent: Node,
    old: SimpleStmtId,
    new: SimpleStmtId,
) -> bool {
    match parent {
        Node::Stmt(id) => match &mut arena.stmts[id] {
            Stmt::Simple(s) => swap(s, old, new),
            Stmt::If { init, .. } | Stmt::Switch { init, .. } => swap_opt(init, old, new),
            Stmt::TypeSwitch { init, assign, .. } => {
                swap_opt(init, old, new) || swap(assign, old, new)
            }
            Stmt::For {
                kind: ForKind::Clause { init, post, .. },
                ..
            } => swap_opt(init, old, new) || swap_opt(post, old, new),
            _ => false,
        },
        Node::CommClause(id) => swap_opt(&mut arena.comm_clauses[id].comm, old, new),
        _ => false,
    }
}

fn replace_expr(arena: &mut AstArena, parent: Node, old: ExprId, new: ExprId) -> bool {
    let lists: [ListRef<ExprId>; 2] = match parent {
        Node::Stmt(id) => match &mut arena.stmts[id] {
            Stmt::Go { call, .. } | Stmt::Defer { call, .. } => return swap(call, old, new),
            Stmt::Return { results, .. } => [*results, ListRef::EMPTY],
            Stmt::If { cond, .. } => return swap(cond, old, new),
            Stmt::Switch { tag, .. } => return swap_opt(tag, old, new),
            Stmt::For { kind, .. } => {
                return match kind {
                    ForKind::Infinite => false,
                    ForKind::Cond(cond) => swap(cond, old, new),
                    ForKind::Clause { cond, .. } => swap_opt(cond, old, new),
                    ForKind::Range {
                        key, value, expr, ..
                    } => {
                        swap_opt(key, old, new)
                            || swap_opt(value, old, new)
                            || swap(expr, old, new)
                    }
                };
            }
            _ => return false,
        },
        Node::Simple(id) => match &mut arena.simple_stmts[id] {
            SimpleStmt::Empty => return false,
            SimpleStmt::Expr(x) => return swap(x, old, new),
            SimpleStmt::Send { chan, value, .. } => {
                return swap(chan, old, new) || swap(value, old, new);
            }
            SimpleStmt::IncDec { expr, .. } => return swap(expr, old, new),
            SimpleStmt::Assign { lhs, rhs, .. } => [*lhs, *rhs],
        },
        Node::Expr(id) => match &mut arena.exprs[id] {
            Expr::CompositeLit { lit, .. } => [lit.elts, ListRef::EMPTY],
            Expr::KeyValue { key, value, .. } => {
                return swap(key, old, new) || swap(value, old, new);
            }
            Expr::Index { base, indices, .. } => {
                if swap(base, old, new) {
                    return true;
                }
                [*indices, ListRef::EMPTY]
            }
            Expr::Paren { expr, .. }
            | Expr::Selector { expr, .. }
            | Expr::TypeAssert { expr, .. }
            | Expr::Unary { expr, .. } => return swap(expr, old, new),
            Expr::Slice {
                expr, lo, hi, max, ..
            } => {
                return swap(expr, old, new)
                    || swap_opt(lo, old, new)
                    || swap_opt(hi, old, new)
                    || swap_opt(max, old, new);
            }
            Expr::Call { callee, args, .. } => {
                if swap(callee, old, new) {
                    return true;
                }
                [*args, ListRef::EMPTY]
            }
            Expr::Binary { left, right, .. } => {
                return swap(left, old, new) || swap(right, old, new);
            }
            _ => return false,
        },
        Node::Type(id) => match &mut arena.types[id] {
            Type::Array {
                len: ArrayLen::Expr(len),
                ..
            } => return swap(len, old, new),
            _ => return false,
        },
        Node::SwitchClause(id) => [arena.switch_clauses[id].items, ListRef::EMPTY],
        Node::Decl(id) => {
            let Decl::Gen(decl) = arena.decls[id] else {
                return false;
            };
            let values: Vec<ListRef<ExprId>> = arena
                .specs_list(decl.specs)
                .iter()
                .filter_map(|spec| match spec {
                    Spec::Value(vs) => Some(vs.values),
                    _ => None,
                })
                .collect();
            return values
                .into_iter()
                .any(|list| swap_in(arena.exprs_list_mut(list), old, new));
        }
        _ => return false,
    };
    lists
        .into_iter()
        .any(|list| swap_in(arena.exprs_list_mut(list), old, new))
}

fn replace_type(arena: &mut AstArena, parent: Node, old: TypeId, new: TypeId) -> bool {
    match parent {
        Node::Expr(id) => match &mut arena.exprs[id] {
            Expr::Type(t) => swap(t, old, new),
            Expr::CompositeLit { typ, .. } | Expr::TypeAssert { typ, .. } => {
                swap_opt(typ, old, new)
            }
            _ => false,
        },
        Node::Type(id) => {
            let (args, terms, elems) = match &mut arena.types[id] {
                Type::Named { args, .. } => (*args, ListRef::EMPTY, ListRef::EMPTY),
                Type::Pointer { elem, .. }
                | Type::Array { elem, .. }
                | Type::Slice { elem, .. }
                | Type::Chan { elem, .. } => return swap(elem, old, new),
                Type::Map { key, val, .. } => return swap(key, old, new) || swap(val, old, new),
                Type::Paren { typ, .. } => return swap(typ, old, new),
                Type::Union { terms } => (ListRef::EMPTY, *terms, ListRef::EMPTY),
                Type::Interface { elems, .. } => (ListRef::EMPTY, ListRef::EMPTY, *elems),
                _ => return false,
            };
            swap_in(arena.types_list_mut(args), old, new)
                || arena
                    .type_terms_mut(terms)
                    .iter_mut()
                    .any(|term| swap(&mut term.typ, old, new))
                || arena.interface_elems_mut(elems).iter_mut().any(|e| match e {
                    InterfaceElem::Embed(t) => swap(t, old, new),
                    InterfaceElem::Method { .. } => false,
                })
        }
        Node::Field(id) => swap(&mut arena.fields[id].typ, old, new),
        Node::Signature(id) => match &mut arena.signatures[id].results {
            Some(Results::Type(t)) => swap(t, old, new),
            _ => false,
        },
        Node::TypeParamDecl(id) => swap(&mut arena.type_param_decls[id].constraint, old, new),
        Node::Decl(id) => {
            let Decl::Gen(decl) = arena.decls[id] else {
                return false;
            };
            arena
                .specs_list_mut(decl.specs)
                .iter_mut()
                .any(|spec| match spec {
                    Spec::Value(vs) => swap_opt(&mut vs.typ, old, new),
                    Spec::Type(ts) => swap(&mut ts.typ, old, new),
                    Spec::Import(_) => false,
                })
        }
        _ => false,
    }
}

fn replace_name(arena: &mut AstArena, parent: Node, old: IdentName, new: IdentName) -> bool {
    let names = match parent {
        Node::Expr(id) => match &mut arena.exprs[id] {
            Expr::Selector { sel, .. } => return swap(sel, old, new),
            _ => return false,
        },
        Node::Stmt(id) => match &mut arena.stmts[id] {
            Stmt::Labeled { label, .. } => return swap(label, old, new),
            Stmt::Branch { label, .. } => return swap_opt(label, old, new),
            _ => return false,
        },
        Node::Func(id) => return swap(&mut arena.funcs[id].name, old, new),
        Node::Type(id) => match &mut arena.types[id] {
            Type::Named { pkg, name, .. } => {
                return swap_opt(pkg, old, new) || swap(name, old, new);
            }
            Type::Interface { elems, .. } => {
                let elems = *elems;
                return arena.interface_elems_mut(elems).iter_mut().any(|e| match e {
                    InterfaceElem::Method { name, .. } => swap(name, old, new),
                    InterfaceElem::Embed(_) => false,
                });
            }
            _ => return false,
        },
        Node::Field(id) => arena.fields[id].names,
        Node::TypeParamDecl(id) => arena.type_param_decls[id].names,
        Node::Decl(id) => {
            let Decl::Gen(decl) = arena.decls[id] else {
                return false;
            };
            let mut lists = Vec::new();
            for spec in arena.specs_list_mut(decl.specs) {
                let hit = match spec {
                    Spec::Import(is) => swap_opt(&mut is.name, old, new),
                    Spec::Type(ts) => swap(&mut ts.name, old, new),
                    Spec::Value(vs) => {
                        lists.push(vs.names);
                        false
                    }
                };
                if hit {
                    return true;
                }
            }
            return lists
                .into_iter()
                .any(|list| swap_in(arena.ident_names_mut(list), old, new));
        }
        _ => return false,
    };
    swap_in(arena.ident_names_mut(names), old, new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use go125_parser::{parse_file, ParseMode, SourceBuffer};

    fn first_stmt(src: &str) -> (go125_parser::SyntaxTree, FuncDeclId, StmtId) {
        let (tree, _) = parse_file(&SourceBuffer::from_text(src), ParseMode::FULL);
        let TopLevelDecl::Func(f) = tree.arena.top_decls(tree.file.decls)[0] else {
            panic!("no func");
        };
        let body = tree.arena.funcs[f].body.unwrap();
        let s = tree.arena.stmts_list(body.stmts)[0];
        (tree, f, s)
    }

    #[test]
    fn replaces_statement_in_body() {
        let (mut tree, f, s) = first_stmt("package p\nfunc f() {\n\tx()\n}\n");
        let span = Span::empty_at(0);
        let new = tree.arena.stmts.alloc(Stmt::Bad(span), span);
        assert!(replace(&mut tree.arena, Node::Func(f), Child::Stmt(s), Child::Stmt(new)));
        let body = tree.arena.funcs[f].body.unwrap();
        assert_eq!(tree.arena.stmts_list(body.stmts), &[new]);
        // `s` is gone now
        assert!(!replace(&mut tree.arena, Node::Func(f), Child::Stmt(s), Child::Stmt(new)));
    }

    #[test]
    fn kind_mismatch_is_refused() {
        let (mut tree, f, s) = first_stmt("package p\nfunc f() {\n\tx()\n}\n");
        let span = Span::empty_at(0);
        let x = tree.arena.exprs.alloc(Expr::Bad(span), span);
        assert!(!replace(&mut tree.arena, Node::Func(f), Child::Stmt(s), Child::Expr(x)));
    }

    #[test]
    fn replaces_call_argument_and_selector_name() {
        let (mut tree, _, s) = first_stmt("package p\nfunc f() {\n\ta.b(c)\n}\n");
        let Stmt::Simple(simple) = tree.arena.stmts[s] else {
            panic!("not simple");
        };
        let SimpleStmt::Expr(call) = tree.arena.simple_stmts[simple] else {
            panic!("not expr");
        };
        let Expr::Call { callee, args, .. } = tree.arena.exprs[call] else {
            panic!("not call");
        };
        let arg = tree.arena.exprs_list(args)[0];
        let span = Span::empty_at(0);
        let new = tree.arena.exprs.alloc(Expr::Bad(span), span);
        assert!(replace(&mut tree.arena, Node::Expr(call), Child::Expr(arg), Child::Expr(new)));
        assert_eq!(tree.arena.exprs_list(args), &[new]);

        let Expr::Selector { sel, .. } = tree.arena.exprs[callee] else {
            panic!("not selector");
        };
        let renamed = IdentName {
            sym: tree.interner.intern("var"),
            pos: sel.pos,
        };
        assert!(replace(&mut tree.arena, Node::Expr(callee), Child::Name(sel), Child::Name(renamed)));
        let Expr::Selector { sel, .. } = tree.arena.exprs[callee] else {
            unreachable!()
        };
        assert_eq!(tree.interner.resolve(sel.sym), "var");
    }

    #[test]
    fn grandchildren_are_not_replaced() {
        let (mut tree, f, s) = first_stmt("package p\nfunc f() {\n\tif x {\n\t\ty()\n\t}\n}\n");
        let Stmt::If { then_block, .. } = tree.arena.stmts[s] else {
            panic!("not if");
        };
        let inner = tree.arena.stmts_list(then_block.stmts)[0];
        let span = Span::empty_at(0);
        let new = tree.arena.stmts.alloc(Stmt::Bad(span), span);
        assert!(!replace(&mut tree.arena, Node::Func(f), Child::Stmt(inner), Child::Stmt(new)));
        assert!(replace(&mut tree.arena, Node::Stmt(s), Child::Stmt(inner), Child::Stmt(new)));
    }
}
