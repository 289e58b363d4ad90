//! `if x := f()` with the `;` not yet typed: the header statement lands in
//! the condition slot as a bad expression. Move it to the initializer.

use go125_parser::ast::{Expr, ExprId, ForKind, Span, Stmt};
use go125_parser::{Node, SourceBuffer, SyntaxTree};
use tracing::debug;

use crate::snippet;

pub(super) fn fix(tree: &mut SyntaxTree, src: &SourceBuffer, bad: ExprId, parent: Node) -> bool {
    let Node::Stmt(owner) = parent else {
        return false;
    };
    let in_header = match tree.arena.stmts[owner] {
        Stmt::If {
            init: None, cond, ..
        } => cond == bad,
        Stmt::For {
            kind: ForKind::Cond(cond),
            ..
        } => cond == bad,
        Stmt::For {
            kind:
                ForKind::Clause {
                    init: None,
                    cond: Some(cond),
                    ..
                },
            ..
        } => cond == bad,
        Stmt::Switch {
            init: None,
            tag: Some(tag),
            ..
        } => tag == bad,
        _ => false,
    };
    if !in_header {
        return false;
    }

    let span = tree.arena.exprs.span(bad);
    let (start, end) = (span.start_usize(), span.end_usize());
    assert!(end <= src.len(), "offset overflow");

    let stmt = match snippet::parse_stmt(tree, src.len(), start, &src.as_str().as_bytes()[start..end]) {
        Ok(stmt) => stmt,
        Err(err) => {
            debug!(%err, "cannot reparse condition as a statement");
            return false;
        }
    };
    let Stmt::Simple(init) = tree.arena.stmts[stmt] else {
        return false;
    };

    let stmt_end = tree.arena.stmts.span(stmt).end_usize();
    let blank = tree.interner.intern("_");
    let at = Span::empty_at(stmt_end);
    let placeholder = tree.arena.exprs.alloc(Expr::Ident(blank, at), at);

    match &mut tree.arena.stmts[owner] {
        Stmt::If {
            init: slot, cond, ..
        } => {
            *slot = Some(init);
            *cond = placeholder;
        }
        Stmt::For { kind, .. } => {
            let post = match *kind {
                ForKind::Clause { post, .. } => post,
                _ => None,
            };
            *kind = ForKind::Clause {
                init: Some(init),
                cond: Some(placeholder),
                post,
            };
        }
        Stmt::Switch { init: slot, tag, .. } => {
            *slot = Some(init);
            *tag = None;
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use go125_parser::ast::{SimpleStmt, StmtId, TopLevelDecl};
    use go125_parser::{parse_file, ParseMode};

    fn first_stmt(body: &str) -> (SyntaxTree, SourceBuffer, StmtId) {
        let src = format!("package p\nfunc f() {{\n\t{body}\n}}\n");
        let buf = SourceBuffer::from_text(src);
        let (tree, _) = parse_file(&buf, ParseMode::FULL);
        let TopLevelDecl::Func(f) = tree.arena.top_decls(tree.file.decls)[0] else {
            panic!("no func");
        };
        let body = tree.arena.funcs[f].body.unwrap();
        let stmt = tree.arena.stmts_list(body.stmts)[0];
        (tree, buf, stmt)
    }

    #[test]
    fn if_initializer() {
        let (mut tree, buf, stmt) = first_stmt("if x := 0\n\t\ty()");
        let Stmt::If { cond, .. } = tree.arena.stmts[stmt] else {
            panic!("not an if");
        };
        assert!(matches!(tree.arena.exprs[cond], Expr::Bad(_)));
        assert!(fix(&mut tree, &buf, cond, Node::Stmt(stmt)));

        let Stmt::If {
            init: Some(init),
            cond,
            ..
        } = tree.arena.stmts[stmt]
        else {
            panic!("initializer not set");
        };
        assert!(matches!(
            tree.arena.simple_stmts[init],
            SimpleStmt::Assign { .. }
        ));
        let Expr::Ident(name, at) = tree.arena.exprs[cond] else {
            panic!("placeholder missing");
        };
        assert_eq!(tree.interner.resolve(name), "_");
        assert_eq!(at.start, tree.arena.simple_stmts.span(init).end);
    }

    #[test]
    fn switch_tag_cleared() {
        let (mut tree, buf, stmt) = first_stmt("switch x := 0\n\t\ty()");
        let Stmt::Switch { tag: Some(tag), .. } = tree.arena.stmts[stmt] else {
            panic!("no tag");
        };
        if !matches!(tree.arena.exprs[tag], Expr::Bad(_)) {
            return;
        }
        assert!(fix(&mut tree, &buf, tag, Node::Stmt(stmt)));
        assert!(matches!(
            tree.arena.stmts[stmt],
            Stmt::Switch {
                init: Some(_),
                tag: None,
                ..
            }
        ));
    }

    #[test]
    fn existing_initializer_is_kept() {
        let (mut tree, buf, stmt) = first_stmt("if a := 1; b := 2 {\n\t}");
        let Stmt::If { init, cond, .. } = tree.arena.stmts[stmt] else {
            panic!("not an if");
        };
        assert!(init.is_some());
        assert!(!fix(&mut tree, &buf, cond, Node::Stmt(stmt)));
    }
}
