//! In `switch {\ndef\n}` the half-typed `def` stands where the parser
//! wanted the closing brace, so the statement ends on that line. Move the
//! brace one line down to keep the line inside the body.

use go125_parser::ast::{Span, Stmt, StmtId};
use go125_parser::{SourceBuffer, SyntaxTree};

pub(super) fn fix(tree: &mut SyntaxTree, src: &SourceBuffer, stmt: StmtId) -> bool {
    let r_brace = match &tree.arena.stmts[stmt] {
        Stmt::Switch { body, clauses, .. } | Stmt::TypeSwitch { body, clauses, .. } => {
            if !clauses.is_empty() {
                return false;
            }
            body.r_brace
        }
        Stmt::Select { body, clauses, .. } => {
            if !clauses.is_empty() {
                return false;
            }
            body.r_brace
        }
        _ => return false,
    };

    let at = r_brace.start_usize();
    if src.byte_at(at) == Some(b'}') {
        return false;
    }
    let line = src.line_of(at);
    if line >= src.line_count() {
        return false;
    }
    let Some(next) = src.line_start(line + 1) else {
        return false;
    };
    let moved = Span::new(next, next + 1);

    match &mut tree.arena.stmts[stmt] {
        Stmt::Switch { body, .. } | Stmt::TypeSwitch { body, .. } | Stmt::Select { body, .. } => {
            body.r_brace = moved;
        }
        _ => return false,
    }
    let span = tree.arena.stmts.span(stmt);
    tree.arena.stmts.set_span(stmt, span.to(moved));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use go125_parser::ast::TopLevelDecl;
    use go125_parser::{parse_file, ParseMode};

    fn first_stmt(src: &str) -> (SyntaxTree, SourceBuffer, StmtId) {
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
    fn brace_moves_past_partial_keyword() {
        let src = "package p\nfunc f() {\n\tswitch {\n\tcas\n\t}\n}\n";
        let (mut tree, buf, stmt) = first_stmt(src);
        assert!(fix(&mut tree, &buf, stmt));

        let Stmt::Switch { body, .. } = tree.arena.stmts[stmt] else {
            panic!("not a switch");
        };
        let cas_line = buf.line_of(src.find("cas").unwrap());
        assert_eq!(buf.line_of(body.r_brace.start_usize()), cas_line + 1);
        assert_eq!(tree.arena.stmts.span(stmt).end, body.r_brace.end);
    }

    #[test]
    fn real_brace_is_left_alone() {
        let (mut tree, buf, stmt) = first_stmt("package p\nfunc f() {\n\tselect {\n\t}\n}\n");
        assert!(!fix(&mut tree, &buf, stmt));
    }

    #[test]
    fn brace_on_the_last_line_stays() {
        let src = "package p\nfunc f() {\n\tswitch {\n\tcas";
        let (mut tree, buf, stmt) = first_stmt(src);
        assert!(!fix(&mut tree, &buf, stmt));

        let Stmt::Switch { body, .. } = tree.arena.stmts[stmt] else {
            panic!("not a switch");
        };
        assert_eq!(buf.line_of(body.r_brace.start_usize()), buf.line_count());
    }
}
