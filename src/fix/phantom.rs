//! `foo.var` parses with a made-up `_` member because `var` is a keyword.
//! Put the keyword back as the member name.

use go125_parser::ast::{Expr, ExprId, IdentName, Span};
use go125_parser::{Node, SourceBuffer, SyntaxTree};

use crate::replace::{replace, Child};
use crate::scan;

pub(super) fn fix(tree: &mut SyntaxTree, src: &SourceBuffer, selector: ExprId) -> bool {
    let Expr::Selector { expr, sel, .. } = tree.arena.exprs[selector] else {
        return false;
    };
    if !scan::is_phantom_underscore(tree, src, sel) {
        return false;
    }

    // Only a name right after the dot; `foo.\nvar x` is a different story.
    let start = tree.arena.exprs.span(expr).end_usize() + 1;
    if sel.pos.start_usize() != start {
        return false;
    }
    let Some(keyword) = scan::read_keyword(src.as_bytes(), start) else {
        return false;
    };

    let name = IdentName {
        sym: tree.interner.intern(keyword),
        pos: Span::new(start, start + keyword.len()),
    };
    if !replace(&mut tree.arena, Node::Expr(selector), Child::Name(sel), Child::Name(name)) {
        return false;
    }
    let span = tree.arena.exprs.span(selector);
    tree.arena.exprs.set_span(selector, span.to(name.pos));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors(tree: &SyntaxTree) -> Vec<ExprId> {
        tree.arena
            .exprs
            .iter()
            .filter(|(_, x, _)| matches!(x, Expr::Selector { .. }))
            .map(|(id, _, _)| id)
            .collect()
    }

    fn parse(src: &str) -> (SyntaxTree, SourceBuffer) {
        let buf = SourceBuffer::from_text(src);
        let (tree, _) = go125_parser::parse_file(&buf, go125_parser::ParseMode::FULL);
        (tree, buf)
    }

    #[test]
    fn keyword_after_dot() {
        let src = "package p\nfunc f() {\n\tfoo.var\n}\n";
        let (mut tree, buf) = parse(src);
        let sel = selectors(&tree)[0];
        assert!(fix(&mut tree, &buf, sel));

        let Expr::Selector { sel: name, .. } = tree.arena.exprs[sel] else {
            unreachable!()
        };
        assert_eq!(tree.name(name), "var");
        assert_eq!(name.pos.start_usize(), src.find("var").unwrap());
        assert_eq!(tree.arena.exprs.span(sel).end_usize(), src.find("var").unwrap() + 3);
    }

    #[test]
    fn name_on_next_line_is_not_taken() {
        let (mut tree, buf) = parse("package p\nfunc f() {\n\tfoo.\n\tvar x int\n}\n");
        for sel in selectors(&tree) {
            assert!(!fix(&mut tree, &buf, sel));
        }
    }

    #[test]
    fn real_names_are_kept() {
        let (mut tree, buf) = parse("package p\nfunc f() {\n\tfoo.bar()\n}\n");
        let sel = selectors(&tree)[0];
        assert!(!fix(&mut tree, &buf, sel));
    }
}
