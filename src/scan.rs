//! On-demand re-tokenization of the buffer being repaired.

use std::ops::Range;

use go125_parser::ast::{AstArena, Expr, ExprId, IdentName, Span, Stmt, StmtId};
use go125_parser::lexer::{self, Lexer, Tok};
use go125_parser::walk::{walk_file, Visitor, Walk};
use go125_parser::{SourceBuffer, SyntaxTree};

/// Longest run of lowercase letters `read_keyword` will look at.
const MAX_KEYWORD_LEN: usize = 15;

/// Token right before `offset` (the last one starting before it), comments
/// skipped, inserted semicolons included.
pub(crate) fn preceding_token(src: &str, offset: usize) -> Option<Tok<'_>> {
    Lexer::new(src)
        .take_while(|&(start, _, _)| start < offset)
        .last()
        .map(|(_, tok, _)| tok)
}

/// The Go keyword spelled by the lowercase run starting at `offset`.
pub(crate) fn read_keyword(src: &[u8], offset: usize) -> Option<&'static str> {
    let rest = src.get(offset..)?;
    let len = rest.iter().take_while(|b| b.is_ascii_lowercase()).count();
    if len > MAX_KEYWORD_LEN {
        return None;
    }
    let word = std::str::from_utf8(&rest[..len]).ok()?;
    lexer::KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == word)
        .map(|(kw, _)| *kw)
}

/// A selector name the parser made up: spelled `_` but with something else
/// in the source at its offset.
pub(crate) fn is_phantom_underscore(tree: &SyntaxTree, src: &SourceBuffer, name: IdentName) -> bool {
    tree.name(name) == "_" && src.byte_at(name.pos.start_usize()).is_some_and(|b| b != b'_')
}

/// Spans of the file's comment groups.
pub(crate) fn comment_spans(tree: &SyntaxTree) -> Vec<Span> {
    tree.arena
        .comment_group_ids(tree.file.comments)
        .iter()
        .map(|&g| tree.arena.comment_groups.span(g))
        .collect()
}

/// Bad statements and expressions still reachable from the file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BadNodes {
    pub stmts: usize,
    pub exprs: usize,
}

impl<'ast> Visitor<'ast> for BadNodes {
    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        if let Stmt::Bad(_) = a.stmts[id] {
            self.stmts += 1;
        }
        a.stmts[id].walk(a, self);
    }

    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        if let Expr::Bad(_) = a.exprs[id] {
            self.exprs += 1;
        }
        a.exprs[id].walk(a, self);
    }
}

pub(crate) fn bad_nodes(tree: &SyntaxTree) -> BadNodes {
    let mut count = BadNodes::default();
    walk_file(&tree.arena, &tree.file, &mut count);
    count
}

/// Empties every top-level `{...}` region not opened right after `struct`
/// or `interface`: function bodies, and also composite literal values of
/// package-level variables. The braces themselves stay.
pub fn purge_func_bodies(src: &str) -> String {
    kept_ranges(src).into_iter().map(|r| &src[r]).collect()
}

/// `purge_func_bodies` over a buffer, keeping its input bytes as they are.
pub(crate) fn purge_buffer(src: &SourceBuffer) -> SourceBuffer {
    src.keep(&kept_ranges(src.as_str()))
}

/// Byte ranges that survive the purge.
fn kept_ranges(src: &str) -> Vec<Range<usize>> {
    let mut kept = Vec::new();
    let mut cursor = 0;
    // Offsets of unclosed braces; `None` marks a struct or interface type.
    let mut braces: Vec<Option<usize>> = Vec::new();
    let mut prev = Tok::Eof;

    for (start, tok, _) in Lexer::new(src) {
        match tok {
            Tok::LBrace => {
                let open = !matches!(prev, Tok::KwStruct | Tok::KwInterface);
                braces.push(open.then_some(start));
            }
            Tok::RBrace => {
                if let Some(Some(open)) = braces.pop() {
                    if braces.is_empty() {
                        kept.push(cursor..open + 1);
                        cursor = start;
                    }
                }
            }
            _ => {}
        }
        prev = tok;
    }
    kept.push(cursor..src.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_run() {
        let src = b"x.var)";
        assert_eq!(read_keyword(src, 2), Some("var"));
        assert_eq!(read_keyword(src, 1), None);
        assert_eq!(read_keyword(b"x.variance", 2), None);
        assert_eq!(read_keyword(b"abcdefghijklmnopq", 0), None);
    }

    #[test]
    fn preceding() {
        let src = "if foo\nbar()\n";
        assert!(matches!(preceding_token(src, 6), Some(Tok::Ident("foo"))));
        assert!(matches!(preceding_token(src, 2), Some(Tok::KwIf)));
        assert!(preceding_token(src, 0).is_none());
    }

    #[test]
    fn counts_bad_nodes() {
        use go125_parser::{parse_file, ParseMode};

        let count = |src: &str| {
            let (tree, _) = parse_file(&SourceBuffer::from_text(src), ParseMode::FULL);
            bad_nodes(&tree)
        };
        assert_eq!(
            count("package p\nfunc f() {\n\tdefer x\n\ty := []int\n}\n"),
            BadNodes { stmts: 1, exprs: 1 }
        );
        assert_eq!(count("package p\nfunc f() {\n\tdefer x()\n}\n"), BadNodes::default());
    }

    #[test]
    fn purge_keeps_types_and_signatures() {
        let src = "package p\ntype T struct{ x int }\nfunc f() int { return 1 }\nvar v = []int{1, 2}\n";
        assert_eq!(
            purge_func_bodies(src),
            "package p\ntype T struct{ x int }\nfunc f() int {}\nvar v = []int{}\n"
        );
    }

    #[test]
    fn purge_nested_bodies_once() {
        let src = "package p\nfunc f() { if x { y() } }\n";
        assert_eq!(purge_func_bodies(src), "package p\nfunc f() {}\n");
    }
}
