//! `defer x.` and `go f` parse as bad statements because what follows the
//! keyword is not a call. Rebuild them around a synthesized empty call.

use go125_parser::ast::{Expr, ListRef, Span, Stmt, StmtId};
use go125_parser::lexer::{Lexer, Tok};
use go125_parser::{Node, SourceBuffer, SyntaxTree};
use tracing::debug;

use crate::replace::{replace, Child};
use crate::snippet;

pub(super) fn fix(
    tree: &mut SyntaxTree,
    src: &SourceBuffer,
    bad: StmtId,
    parent: Node,
) -> Option<StmtId> {
    let Stmt::Bad(span) = tree.arena.stmts[bad] else {
        return None;
    };

    let mut tokens = Lexer::new(src.as_str());
    let (kw, is_go) = loop {
        let (start, tok, end) = tokens.next()?;
        if start < span.start_usize() {
            continue;
        }
        match tok {
            Tok::KwGo => break (Span::new(start, end), true),
            Tok::KwDefer => break (Span::new(start, end), false),
            _ => return None,
        }
    };

    let (from, to, phantoms) = call_extent(src, &mut tokens)?;
    if from >= src.len() || to >= src.len() {
        return None;
    }

    let mut bytes = Vec::with_capacity(to - from + phantoms.len());
    let mut pending = phantoms.iter().copied().peekable();
    for (i, &b) in src.as_str().as_bytes()[from..to].iter().enumerate() {
        if pending.next_if_eq(&(from + i)).is_some() {
            bytes.push(b'_');
        }
        bytes.push(b);
    }
    if pending.peek().is_some() {
        bytes.push(b'_');
    }

    let callee = match snippet::parse_expr(tree, src.len(), from, &bytes) {
        Ok(x) => x,
        Err(err) => {
            debug!(%err, "cannot rebuild go/defer operand");
            return None;
        }
    };

    let parens = Span::empty_at(to);
    let call_span = tree.arena.exprs.span(callee).to(parens);
    let call = tree.arena.exprs.alloc(
        Expr::Call {
            callee,
            l_paren: parens,
            args: ListRef::EMPTY,
            ellipsis: None,
            r_paren: parens,
        },
        call_span,
    );
    let stmt = if is_go {
        Stmt::Go { go_pos: kw, call }
    } else {
        Stmt::Defer {
            defer_pos: kw,
            call,
        }
    };
    let stmt = tree.arena.stmts.alloc(stmt, kw.to(call_span));

    replace(&mut tree.arena, parent, Child::Stmt(bad), Child::Stmt(stmt)).then_some(stmt)
}

/// Finds where the operand of `go`/`defer` ends, scanning from the token
/// after the keyword. Returns `(from, to, phantoms)`: the operand's byte
/// range and the offsets where a `_` must be inserted after a dangling dot.
/// `None` when the input ends first.
fn call_extent(src: &SourceBuffer, tokens: &mut Lexer<'_>) -> Option<(usize, usize, Vec<usize>)> {
    let mut from = None;
    let mut to;
    let mut depth = 0i32;
    let mut last: Option<(usize, Tok<'_>)> = None;
    let mut phantoms = Vec::new();

    loop {
        let (start, tok, _) = tokens.next()?;
        to = start;
        from.get_or_insert(start);

        match tok {
            Tok::Semi if depth == 0 => break,
            Tok::LBrace => depth += 1,
            _ => {}
        }

        if let Some((dot, Tok::Dot)) = last {
            if tok == Tok::RBrace || src.line_of(start) > src.line_of(dot) {
                phantoms.push(dot + 1);
                if depth == 0 {
                    to = dot + 1;
                    break;
                }
            }
        }

        last = Some((start, tok));

        if tok == Tok::RBrace {
            depth -= 1;
            if depth <= 0 {
                if depth == 0 {
                    // include the brace
                    to += 1;
                }
                break;
            }
        }
    }

    Some((from?, to, phantoms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use go125_parser::ast::TopLevelDecl;
    use go125_parser::{parse_file, ParseMode};

    fn bad_stmt(src: &str) -> (SyntaxTree, SourceBuffer, Node, StmtId) {
        let buf = SourceBuffer::from_text(src);
        let (tree, _) = parse_file(&buf, ParseMode::FULL);
        let TopLevelDecl::Func(f) = tree.arena.top_decls(tree.file.decls)[0] else {
            panic!("no func");
        };
        let body = tree.arena.funcs[f].body.unwrap();
        let bad = *tree
            .arena
            .stmts_list(body.stmts)
            .iter()
            .find(|&&s| matches!(tree.arena.stmts[s], Stmt::Bad(_)))
            .expect("bad statement");
        (tree, buf, Node::Func(f), bad)
    }

    #[test]
    fn defer_dangling_selector() {
        let src = "package p\nfunc f() {\n\tdefer fmt.\n\ty := 1\n}\n";
        let (mut tree, buf, parent, bad) = bad_stmt(src);
        let stmt = fix(&mut tree, &buf, bad, parent).expect("fixed");

        let Stmt::Defer { defer_pos, call } = tree.arena.stmts[stmt] else {
            panic!("not a defer");
        };
        assert_eq!(defer_pos.start_usize(), src.find("defer").unwrap());
        let Expr::Call { callee, r_paren, .. } = tree.arena.exprs[call] else {
            panic!("not a call");
        };
        let dot = src.find("fmt.").unwrap() + 3;
        assert_eq!(r_paren.start_usize(), dot + 1);
        let Expr::Selector { sel, .. } = tree.arena.exprs[callee] else {
            panic!("not a selector");
        };
        assert_eq!(tree.name(sel), "_");
        assert_eq!(sel.pos.start_usize(), dot + 1);
    }

    #[test]
    fn go_without_call() {
        let src = "package p\nfunc f() {\n\tgo g\n\tx()\n}\n";
        let (mut tree, buf, parent, bad) = bad_stmt(src);
        let stmt = fix(&mut tree, &buf, bad, parent).expect("fixed");
        let Stmt::Go { call, .. } = tree.arena.stmts[stmt] else {
            panic!("not a go statement");
        };
        let Expr::Call { callee, .. } = tree.arena.exprs[call] else {
            panic!("not a call");
        };
        assert!(matches!(tree.arena.exprs[callee], Expr::Ident(..)));
        assert_eq!(tree.arena.exprs.span(callee).start_usize(), src.find("g\n").unwrap());
    }

    #[test]
    fn operand_running_to_the_end_is_declined() {
        let src = "package p\nfunc f() {\n\tdefer func() {\n";
        let buf = SourceBuffer::from_text(src);
        let (mut tree, _) = parse_file(&buf, ParseMode::FULL);
        let bad = tree.arena.stmts.iter().find(|(_, s, _)| matches!(s, Stmt::Bad(_)));
        if let Some((bad, _, _)) = bad {
            assert!(fix(&mut tree, &buf, bad, Node::File).is_none());
        }
    }
}
