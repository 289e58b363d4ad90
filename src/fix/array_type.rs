//! A lone `[]T` or `[N]T` where a value is expected parses as a bad
//! expression. Reparse it as the type of a composite literal and keep the
//! type.

use go125_parser::ast::{Expr, ExprId, Type};
use go125_parser::{Node, SourceBuffer, SyntaxTree};
use tracing::debug;

use crate::replace::{replace, Child};
use crate::snippet;

pub(super) fn fix(
    tree: &mut SyntaxTree,
    src: &SourceBuffer,
    bad: ExprId,
    parent: Node,
) -> Option<ExprId> {
    let span = tree.arena.exprs.span(bad);
    let raw = src.as_str().as_bytes().get(span.start_usize()..span.end_usize())?;

    let mut bytes = raw.trim_ascii().to_vec();
    // `[]` alone still needs an element type.
    if bytes.ends_with(b"]") {
        bytes.push(b'_');
    }
    // `[...]T` only parses as a literal type.
    bytes.extend_from_slice(b"{}");

    let lit = match snippet::parse_expr(tree, src.len(), span.start_usize(), &bytes) {
        Ok(x) => x,
        Err(err) => {
            debug!(%err, "cannot reparse bad expression as a literal");
            return None;
        }
    };
    let Expr::CompositeLit { typ: Some(typ), .. } = tree.arena.exprs[lit] else {
        return None;
    };
    if !matches!(tree.arena.types[typ], Type::Array { .. } | Type::Slice { .. }) {
        return None;
    }

    let expr = tree.arena.exprs.alloc(Expr::Type(typ), tree.arena.types.span(typ));
    replace(&mut tree.arena, parent, Child::Expr(bad), Child::Expr(expr)).then_some(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use go125_parser::ast::{SimpleStmt, Stmt, TopLevelDecl};
    use go125_parser::{parse_file, ParseMode};

    /// Body of the only function, parsed from `body`.
    fn parse_body(body: &str) -> (SyntaxTree, SourceBuffer, String) {
        let src = format!("package p\nfunc f() {{\n\t{body}\n}}\n");
        let buf = SourceBuffer::from_text(src.clone());
        let (tree, _) = parse_file(&buf, ParseMode::FULL);
        (tree, buf, src)
    }

    fn assign_rhs(tree: &SyntaxTree) -> (Node, ExprId) {
        let TopLevelDecl::Func(f) = tree.arena.top_decls(tree.file.decls)[0] else {
            panic!("no func");
        };
        let body = tree.arena.funcs[f].body.unwrap();
        let Stmt::Simple(s) = tree.arena.stmts[tree.arena.stmts_list(body.stmts)[0]] else {
            panic!("not a simple statement");
        };
        let SimpleStmt::Assign { rhs, .. } = tree.arena.simple_stmts[s] else {
            panic!("not an assignment");
        };
        (Node::Simple(s), tree.arena.exprs_list(rhs)[0])
    }

    #[test]
    fn slice_type_in_value_position() {
        let (mut tree, buf, src) = parse_body("x := []int");
        let (parent, bad) = assign_rhs(&tree);
        assert!(matches!(tree.arena.exprs[bad], Expr::Bad(_)));

        let expr = fix(&mut tree, &buf, bad, parent).expect("fixed");
        let Expr::Type(typ) = tree.arena.exprs[expr] else {
            panic!("not a type");
        };
        assert!(matches!(tree.arena.types[typ], Type::Slice { .. }));
        assert_eq!(tree.arena.types.span(typ).start_usize(), src.find("[]").unwrap());
        assert_eq!(assign_rhs(&tree).1, expr);
    }

    #[test]
    fn map_type_is_left_alone() {
        let (mut tree, buf, _) = parse_body("x := map[int]int");
        let (parent, bad) = assign_rhs(&tree);
        if matches!(tree.arena.exprs[bad], Expr::Bad(_)) {
            assert!(fix(&mut tree, &buf, bad, parent).is_none());
        }
    }
}
