//! Read-only traversal of the arena AST.
//!
//! Node types implement [`Walk`] through `#[derive(WalkAst)]`, which walks
//! every field in declaration order. Ids route through the matching
//! [`Visitor`] hook, so a visitor sees each reachable node exactly once and
//! never the orphans a rewrite leaves behind in the arena.

use crate::ast::*;

pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V);
}

/// Generates one hook per id kind plus the `Walk` impl that calls it.
/// The default hook descends; override it to intercept.
macro_rules! visitor {
    ($($visit:ident($id:ty) => $store:ident),* $(,)?) => {
        pub trait Visitor<'ast> {
            #[inline(always)]
            fn visit_source_file(&mut self, a: &'ast AstArena, f: &'ast SourceFile) {
                f.walk(a, self);
            }

            $(
                #[inline(always)]
                fn $visit(&mut self, a: &'ast AstArena, id: $id) {
                    a.$store[id].walk(a, self);
                }
            )*
        }

        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

visitor! {
    visit_decl(DeclId) => decls,
    visit_func_decl(FuncDeclId) => funcs,
    visit_stmt(StmtId) => stmts,
    visit_simple_stmt(SimpleStmtId) => simple_stmts,
    visit_expr(ExprId) => exprs,
    visit_type(TypeId) => types,
    visit_field(FieldId) => fields,
    visit_signature(SignatureId) => signatures,
    visit_switch_clause(SwitchClauseId) => switch_clauses,
    visit_comm_clause(CommClauseId) => comm_clauses,
    visit_type_params(TypeParamsId) => type_params,
    visit_type_param_decl(TypeParamDeclId) => type_param_decls,
    visit_comment(CommentId) => comments,
    visit_comment_group(CommentGroupId) => comment_groups,
}

/// Walks `file` with `v`.
pub fn walk_file<'ast, V: Visitor<'ast> + ?Sized>(a: &'ast AstArena, file: &'ast SourceFile, v: &mut V) {
    v.visit_source_file(a, file);
}

/// Arena accessor for the items of a list.
pub trait ListSlice<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListSlice<T>,
    T: Walk<'ast>,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        a.slice(*self).iter().for_each(|item| item.walk(a, v));
    }
}

macro_rules! list_slices {
    ($($t:ty => $getter:ident),* $(,)?) => {
        $(
            impl ListSlice<$t> for AstArena {
                #[inline(always)]
                fn slice(&self, r: ListRef<$t>) -> &[$t] {
                    self.$getter(r)
                }
            }
        )*
    };
}

list_slices! {
    ExprId => exprs_list,
    StmtId => stmts_list,
    TypeId => types_list,
    FieldId => fields_list,
    Spec => specs_list,
    TopLevelDecl => top_decls,
    SwitchClauseId => switch_clause_ids,
    CommClauseId => comm_clause_ids,
    TypeTerm => type_terms,
    InterfaceElem => interface_elems,
    IdentName => ident_names,
    TypeParamDeclId => type_param_decl_ids,
    CommentId => comment_ids,
    CommentGroupId => comment_group_ids,
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(x) = self {
            x.walk(a, v);
        }
    }
}

macro_rules! leaves {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, _: &'ast AstArena, _: &mut V) {}
            }
        )*
    };
}

leaves! {
    Span,
    Symbol,
    bool,
    GenDeclKind,
    BasicLitKind,
    BranchKind,
    ChanDir,
    UnaryOp,
    BinaryOp,
    AssignOp,
    IncDecOp,
    CommentKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_file, ParseMode, SourceBuffer};

    #[derive(Default)]
    struct Counts {
        stmts: usize,
        bad_exprs: usize,
        calls: usize,
    }

    impl<'ast> Visitor<'ast> for Counts {
        fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
            self.stmts += 1;
            a.stmts[id].walk(a, self);
        }

        fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
            match a.exprs[id] {
                Expr::Bad(_) => self.bad_exprs += 1,
                Expr::Call { .. } => self.calls += 1,
                _ => {}
            }
            a.exprs[id].walk(a, self);
        }
    }

    #[test]
    fn visits_reachable_nodes() {
        let src = "package p\nfunc f() {\n\tg(h(1))\n\tif x := 0 {\n\t}\n}\n";
        let (tree, _) = parse_file(&SourceBuffer::from_text(src), ParseMode::FULL);
        let mut counts = Counts::default();
        walk_file(&tree.arena, &tree.file, &mut counts);
        assert_eq!(counts.calls, 2);
        assert_eq!(counts.bad_exprs, 1);
        assert!(counts.stmts >= 2);
    }
}
