//! Parsing detached source fragments into the session's tree.
//!
//! A fragment is wrapped into a one-function file, parsed into the same arena
//! as the tree being repaired, and the nodes it produced are shifted so that
//! the fragment's first statement starts at the requested offset.

use go125_parser::ast::{ExprId, SimpleStmt, Stmt, StmtId, TopLevelDecl};
use go125_parser::{parse_file_into, ParseMode, SourceBuffer, SyntaxTree};
use thiserror::Error;
use tracing::debug;

use crate::remap;

const PREFIX: &str = "package fake;func _(){";
const SUFFIX: &str = "}";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnippetError {
    #[error("no function in wrapped fragment {0:?}")]
    NoFunc(String),
    #[error("no statement in {0:?}")]
    NoStmt(String),
    #[error("no expression in {0:?}")]
    NotExpr(String),
}

/// Parses `fragment` as a statement positioned at `target` in a file of
/// `file_len` bytes.
pub(crate) fn parse_stmt(
    tree: &mut SyntaxTree,
    file_len: usize,
    target: usize,
    fragment: &[u8],
) -> Result<StmtId, SnippetError> {
    let text = String::from_utf8_lossy(fragment);
    let buf = SourceBuffer::from_text(format!("{PREFIX}{text}{SUFFIX}"));

    let mark = tree.arena.mark();
    let (file, _) = parse_file_into(
        &mut tree.arena,
        &mut tree.interner,
        &buf,
        ParseMode::SKIP_OBJECT_RESOLUTION,
    );

    let Some(&TopLevelDecl::Func(func)) = tree.arena.top_decls(file.decls).first() else {
        return Err(SnippetError::NoFunc(text.into_owned()));
    };
    let Some(body) = tree.arena.funcs[func].body else {
        return Err(SnippetError::NoFunc(text.into_owned()));
    };
    let Some(&stmt) = tree.arena.stmts_list(body.stmts).first() else {
        return Err(SnippetError::NoStmt(text.into_owned()));
    };

    let stmt_start = tree.arena.stmts.span(stmt).start_usize();
    let delta = target as i64 - stmt_start as i64;
    let fragment_range = PREFIX.len()..PREFIX.len() + text.len();
    let clamped = remap::shift_since(&mut tree.arena, mark, delta, file_len, fragment_range);
    if clamped > 0 {
        debug!(clamped, target, "clamped fragment positions to the file");
    }
    Ok(stmt)
}

/// Parses `fragment` as an expression statement and returns the expression.
pub(crate) fn parse_expr(
    tree: &mut SyntaxTree,
    file_len: usize,
    target: usize,
    fragment: &[u8],
) -> Result<ExprId, SnippetError> {
    let stmt = parse_stmt(tree, file_len, target, fragment)?;
    if let Stmt::Simple(s) = tree.arena.stmts[stmt] {
        if let SimpleStmt::Expr(x) = tree.arena.simple_stmts[s] {
            return Ok(x);
        }
    }
    Err(SnippetError::NotExpr(
        String::from_utf8_lossy(fragment).into_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use go125_parser::ast::Expr;
    use go125_parser::parse_file;

    fn empty_tree(src: &str) -> (SyntaxTree, SourceBuffer) {
        let buf = SourceBuffer::from_text(src);
        let (tree, _) = parse_file(&buf, ParseMode::FULL);
        (tree, buf)
    }

    #[test]
    fn expression_lands_at_target() {
        let (mut tree, buf) = empty_tree("package p\n\nvar _ = 1\n");
        let x = parse_expr(&mut tree, buf.len(), 11, b"a.b").unwrap();
        assert_eq!(tree.arena.exprs.span(x).start, 11);
        assert_eq!(tree.arena.exprs.span(x).end, 14);
        assert!(matches!(tree.arena.exprs[x], Expr::Selector { .. }));
    }

    #[test]
    fn statement_is_not_an_expression() {
        let (mut tree, buf) = empty_tree("package p\n");
        let err = parse_expr(&mut tree, buf.len(), 0, b"x := 1").unwrap_err();
        assert!(matches!(err, SnippetError::NotExpr(_)));
    }

    #[test]
    fn empty_fragment_has_no_statement() {
        let (mut tree, buf) = empty_tree("package p\n");
        let err = parse_stmt(&mut tree, buf.len(), 0, b"").unwrap_err();
        assert!(matches!(err, SnippetError::NoStmt(_)));
    }

    #[test]
    fn positions_are_clamped_to_the_file() {
        let (mut tree, buf) = empty_tree("package p\n");
        let x = parse_expr(&mut tree, buf.len(), 8, b"abcdef").unwrap();
        let span = tree.arena.exprs.span(x);
        assert_eq!(span.start, 8);
        assert_eq!(span.end as usize, buf.len());
    }
}
