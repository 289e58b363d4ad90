//! Byte-level repairs for errors that would otherwise swallow the rest of
//! the file. At most one is applied per call; the caller re-parses.

use go125_parser::ast::{Block, Expr, ExprId, ForKind, SimpleStmt, Span, Stmt, StmtId};
use go125_parser::lexer::Tok;
use go125_parser::{Node, SourceBuffer, SyntaxTree};

use crate::result::FixKind;
use crate::scan;

/// New buffer with the first applicable repair, found in preorder.
pub(crate) fn fix_src(tree: &SyntaxTree, src: &SourceBuffer) -> Option<(SourceBuffer, FixKind)> {
    let scan = SrcScan {
        tree,
        src,
        comments: scan::comment_spans(tree),
    };
    scan.visit(Node::File)
}

enum Step {
    Visit(Node),
    Curlies(StmtId, Block),
}

struct SrcScan<'a> {
    tree: &'a SyntaxTree,
    src: &'a SourceBuffer,
    comments: Vec<Span>,
}

impl SrcScan<'_> {
    /// Preorder walk with an explicit work list. A control statement's
    /// missing braces are checked between its header and its body.
    fn visit(&self, root: Node) -> Option<(SourceBuffer, FixKind)> {
        let mut work = vec![Step::Visit(root)];
        while let Some(step) = work.pop() {
            let node = match step {
                Step::Visit(node) => node,
                Step::Curlies(stmt, block) => {
                    if let Some(buf) = self.missing_curlies(stmt, block) {
                        return Some((buf, FixKind::Curlies));
                    }
                    continue;
                }
            };
            if let Node::Expr(id) = node {
                if let Some(buf) = self.dangling_selector(id) {
                    return Some((buf, FixKind::DanglingSelector));
                }
            }

            let children = self.tree.children(node);
            let mut steps = Vec::with_capacity(children.len() + 1);
            let mut body = match node {
                Node::Stmt(id) => control_body(self.tree, id).map(|b| (id, b)),
                _ => None,
            };
            for child in children {
                if let Some((stmt, block)) = body {
                    if self.tree.span(child).start >= block.l_brace.start {
                        steps.push(Step::Curlies(stmt, block));
                        body = None;
                    }
                }
                steps.push(Step::Visit(child));
            }
            if let Some((stmt, block)) = body {
                steps.push(Step::Curlies(stmt, block));
            }
            work.extend(steps.into_iter().rev());
        }
        None
    }

    /// `if foo\n` → `if foo{}\n`.
    fn missing_curlies(&self, stmt: StmtId, body: Block) -> Option<SourceBuffer> {
        let src = self.src;
        if src.byte_at(body.l_brace.start_usize()) == Some(b'{') {
            return None;
        }

        let line = src.line_of(self.tree.arena.stmts.span(stmt).start_usize());
        if line >= src.line_count() {
            return None;
        }
        // The newline ending the statement's first line.
        let mut insert = src.line_start(line + 1)?.checked_sub(1)?;
        let mut moved = true;
        while moved {
            moved = false;
            for c in &self.comments {
                if c.start_usize() < insert && insert <= c.end_usize() {
                    insert = c.start_usize();
                    moved = true;
                }
            }
        }

        match scan::preceding_token(src.as_str(), insert) {
            Some(Tok::Ident(_) | Tok::Dot) => {}
            _ => return None,
        }

        let text = if self.needs_post_semi(stmt) { ";{}" } else { "{}" };
        Some(src.splice(insert, text))
    }

    /// A three-clause `for` whose post statement was cut off needs its `;`
    /// back too: `for i := 0; i < n; i` → `for i := 0; i < n; i;{}`.
    fn needs_post_semi(&self, stmt: StmtId) -> bool {
        let arena = &self.tree.arena;
        let Stmt::For {
            kind: ForKind::Clause {
                cond,
                post: Some(post),
                ..
            },
            ..
        } = arena.stmts[stmt]
        else {
            return false;
        };
        let cond_bad = cond.is_some_and(|c| matches!(arena.exprs[c], Expr::Bad(_)));
        let post_bad = matches!(
            arena.simple_stmts[post],
            SimpleStmt::Expr(x) if matches!(arena.exprs[x], Expr::Bad(_))
        );
        !cond_bad && post_bad
    }

    /// `x.` followed by something that is not a name → `x._`.
    fn dangling_selector(&self, id: ExprId) -> Option<SourceBuffer> {
        let Expr::Selector { expr, sel, .. } = self.tree.arena.exprs[id] else {
            return None;
        };
        if !scan::is_phantom_underscore(self.tree, self.src, sel) {
            return None;
        }
        let at = self.tree.arena.exprs.span(expr).end_usize() + 1;
        if self.src.byte_at(at - 1) != Some(b'.') {
            return None;
        }
        Some(self.src.splice(at, "_"))
    }
}

/// Body block of a statement whose `{` may be missing.
fn control_body(tree: &SyntaxTree, id: StmtId) -> Option<Block> {
    match tree.arena.stmts[id] {
        Stmt::If { then_block, .. } => Some(then_block),
        Stmt::For { body, .. }
        | Stmt::Switch { body, .. }
        | Stmt::TypeSwitch { body, .. }
        | Stmt::Select { body, .. } => Some(body),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use go125_parser::{parse_file, ParseMode};

    fn run(src: &str) -> Option<(String, FixKind)> {
        let buf = SourceBuffer::from_text(src);
        let (tree, _) = parse_file(&buf, ParseMode::FULL);
        fix_src(&tree, &buf).map(|(b, k)| (b.as_str().to_string(), k))
    }

    #[test]
    fn braces_after_if_header() {
        let (out, kind) = run("package p\nfunc f() {\n\tif foo\n\tbar()\n}\n").unwrap();
        assert_eq!(kind, FixKind::Curlies);
        assert_eq!(out, "package p\nfunc f() {\n\tif foo{}\n\tbar()\n}\n");
    }

    #[test]
    fn braces_go_before_trailing_comment() {
        let (out, _) = run("package p\nfunc f() {\n\tif foo // check\n\tbar()\n}\n").unwrap();
        assert_eq!(out, "package p\nfunc f() {\n\tif foo {}// check\n\tbar()\n}\n");
    }

    #[test]
    fn operator_at_line_end_is_left_alone() {
        assert_eq!(run("package p\nfunc f() {\n\tif foo &&\n\t\tbar\n}\n"), None);
    }

    #[test]
    fn dangling_dot() {
        let (out, kind) = run("package p\nfunc f() {\n\tx.\n}\n").unwrap();
        assert_eq!(kind, FixKind::DanglingSelector);
        assert_eq!(out, "package p\nfunc f() {\n\tx._\n}\n");
    }

    #[test]
    fn clean_source_has_nothing_to_fix() {
        assert_eq!(run("package p\nfunc f() {\n\tif x {\n\t}\n}\n"), None);
    }

    #[test]
    fn three_clause_for_gets_its_semicolon_back() {
        let (out, kind) = run("package p\nfunc f() {\n\tfor i := foo(); foo\n}\n").unwrap();
        assert_eq!(kind, FixKind::Curlies);
        assert_eq!(out, "package p\nfunc f() {\n\tfor i := foo(); foo;{}\n}\n");

        let (_, errors) = parse_file(&SourceBuffer::from_text(out), ParseMode::FULL);
        assert!(errors.is_empty(), "{errors}");
    }

    #[test]
    fn header_on_the_last_line_is_left_alone() {
        assert_eq!(run("package p\nfunc f() {\n\tif foo"), None);
    }
}
