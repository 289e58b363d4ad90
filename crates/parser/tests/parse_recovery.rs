//! Shapes the parser leaves behind around syntax errors.

use go125_parser::ast::{Expr, ExprId, SimpleStmt, Stmt, StmtId, TopLevelDecl, Type};
use go125_parser::{parse_file, ErrorList, ParseMode, SourceBuffer, SyntaxTree};

fn parse(src: &str) -> (SyntaxTree, ErrorList) {
    parse_file(&SourceBuffer::from_text(src), ParseMode::FULL)
}

fn body(tree: &SyntaxTree) -> Vec<StmtId> {
    let decls = tree.arena.top_decls(tree.file.decls);
    let Some(TopLevelDecl::Func(f)) = decls.iter().find(|d| matches!(d, TopLevelDecl::Func(_))) else {
        panic!("no func in {decls:?}");
    };
    let body = tree.arena.funcs[*f].body.expect("func body");
    tree.arena.stmts_list(body.stmts).to_vec()
}

fn expr_stmt(tree: &SyntaxTree, stmt: StmtId) -> ExprId {
    let Stmt::Simple(s) = tree.arena.stmts[stmt] else {
        panic!("not a simple statement: {:?}", tree.arena.stmts[stmt]);
    };
    let SimpleStmt::Expr(x) = tree.arena.simple_stmts[s] else {
        panic!("not an expression statement");
    };
    x
}

#[test]
fn missing_selector_gets_blank_at_next_token() {
    let src = "package p\nfunc f() {\n\tx.\n}\n";
    let (tree, errors) = parse(src);
    assert!(!errors.is_empty());

    let x = expr_stmt(&tree, body(&tree)[0]);
    let Expr::Selector { expr, sel, .. } = tree.arena.exprs[x] else {
        panic!("not a selector");
    };
    assert_eq!(tree.name(sel), "_");
    assert_eq!(sel.pos.start_usize(), src.rfind('}').unwrap());
    assert_eq!(tree.arena.exprs.span(expr).end_usize(), src.find("x.").unwrap() + 1);
    // the closing brace is not consumed
    assert_eq!(body(&tree).len(), 1);
}

#[test]
fn keyword_after_dot_is_consumed() {
    let src = "package p\nfunc f() {\n\tfoo.var\n}\n";
    let (tree, _) = parse(src);
    let x = expr_stmt(&tree, body(&tree)[0]);
    let Expr::Selector { sel, .. } = tree.arena.exprs[x] else {
        panic!("not a selector");
    };
    assert_eq!(tree.name(sel), "_");
    assert_eq!(sel.pos.start_usize(), src.find("var").unwrap());
}

#[test]
fn defer_without_call_is_bad() {
    let src = "package p\nfunc f() {\n\tdefer x\n}\n";
    let (tree, errors) = parse(src);
    let stmts = body(&tree);
    let Stmt::Bad(span) = tree.arena.stmts[stmts[0]] else {
        panic!("expected a bad statement");
    };
    assert_eq!(span.start_usize(), src.find("defer").unwrap());
    assert_eq!(span.len(), 5);
    assert!(errors.iter().any(|e| e.message.contains("must be function call")));
}

#[test]
fn if_header_statement_is_bad_condition() {
    let (tree, errors) = parse("package p\nfunc f() {\n\tif x := 0 {\n\t}\n}\n");
    let Stmt::If { init, cond, .. } = tree.arena.stmts[body(&tree)[0]] else {
        panic!("not an if");
    };
    assert!(init.is_none());
    assert!(matches!(tree.arena.exprs[cond], Expr::Bad(_)));
    assert!(errors.iter().any(|e| e.message.contains("found assignment")));
}

#[test]
fn header_cut_by_newline_misses_brace() {
    let src = "package p\nfunc f() {\n\tif foo\n\tbar()\n}\n";
    let (tree, errors) = parse(src);
    let Stmt::If { cond, then_block, .. } = tree.arena.stmts[body(&tree)[0]] else {
        panic!("not an if");
    };
    assert!(matches!(tree.arena.exprs[cond], Expr::Ident(..)));
    assert_ne!(src.as_bytes()[then_block.l_brace.start_usize()], b'{');
    assert!(!errors.is_empty());
}

#[test]
fn lone_slice_type_is_bad_expression() {
    let (tree, errors) = parse("package p\nfunc f() {\n\tx := []int\n}\n");
    let Stmt::Simple(s) = tree.arena.stmts[body(&tree)[0]] else {
        panic!("not simple");
    };
    let SimpleStmt::Assign { rhs, .. } = tree.arena.simple_stmts[s] else {
        panic!("not an assignment");
    };
    let rhs = tree.arena.exprs_list(rhs)[0];
    assert!(matches!(tree.arena.exprs[rhs], Expr::Bad(_)));
    assert!(errors.iter().any(|e| e.message == "expected expression"));
}

#[test]
fn types_are_fine_as_arguments() {
    let (tree, errors) = parse("package p\nfunc f() {\n\tg([]int)\n}\n");
    assert!(errors.is_empty(), "{errors}");
    let x = expr_stmt(&tree, body(&tree)[0]);
    let Expr::Call { args, .. } = tree.arena.exprs[x] else {
        panic!("not a call");
    };
    let Expr::Type(t) = tree.arena.exprs[tree.arena.exprs_list(args)[0]] else {
        panic!("not a type");
    };
    assert!(matches!(tree.arena.types[t], Type::Slice { .. }));
}

#[test]
fn first_error_per_line_without_all_errors() {
    let src = "package p\nfunc f() {\n\tx := := :=\n}\n";
    let buf = SourceBuffer::from_text(src);
    let (_, all) = parse_file(&buf, ParseMode::FULL);
    let (_, some) = parse_file(&buf, ParseMode::PARSE_COMMENTS);
    assert!(some.len() <= all.len());
    let mut lines: Vec<u32> = some.iter().map(|e| e.line).collect();
    lines.dedup();
    assert_eq!(lines.len(), some.len());
}

#[test]
fn every_span_stays_in_the_buffer() {
    let src = "package p\nfunc f() {\n\tswitch {\n\tcas\n\t}\n\tdefer fmt.\n\tif a := b\n";
    let (tree, _) = parse(src);
    let len = src.len() as u32;
    for (_, _, span) in tree.arena.exprs.iter() {
        assert!(span.start <= span.end && span.end <= len, "{span:?}");
    }
    for (_, _, span) in tree.arena.stmts.iter() {
        assert!(span.start <= span.end && span.end <= len, "{span:?}");
    }
}

fn nesting_errors(errors: &ErrorList) -> usize {
    errors
        .iter()
        .filter(|e| e.message == "exceeded max nesting depth")
        .count()
}

#[test]
fn nesting_limit_stops_runaway_expressions() {
    let src = format!("package p\nvar _ = {}x{}\n", "(".repeat(100_000), ")".repeat(100_000));
    let (tree, errors) = parse(&src);
    assert_eq!(nesting_errors(&errors), 1, "{errors}");
    assert_eq!(errors.len(), 1);
    assert!(tree.arena.exprs.iter().any(|(_, x, _)| matches!(x, Expr::Bad(_))));
}

#[test]
fn nesting_limit_covers_types_and_literals() {
    let pointers = format!("package p\nvar _ {}int\n", "*".repeat(10_000));
    let (tree, errors) = parse(&pointers);
    assert_eq!(nesting_errors(&errors), 1, "{errors}");
    assert!(tree.arena.types.iter().any(|(_, t, _)| matches!(t, Type::Bad(_))));

    let literal = format!("package p\nvar _ = [][]int{{{}", "{".repeat(10_000));
    let (_, errors) = parse_file(&SourceBuffer::from_text(literal), ParseMode::FULL | ParseMode::ALL_ERRORS);
    assert_eq!(nesting_errors(&errors), 1, "{errors}");
    assert_eq!(errors.len(), 1);
}

#[test]
fn shallow_nesting_is_fine() {
    let src = format!("package p\nvar _ = {}x{}\n", "(".repeat(50), ")".repeat(50));
    let (_, errors) = parse(&src);
    assert!(errors.is_empty(), "{errors}");
}

#[test]
fn invalid_utf8_errors_use_input_offsets() {
    let src: &[u8] = b"package p\nfunc f() {\n\ts := \"\xff\"\n\tx.\n}\n";
    let (_, errors) = parse_file(&SourceBuffer::new(src), ParseMode::FULL);
    let starts: Vec<usize> = errors.iter().map(|e| e.span.start_usize()).collect();
    assert_eq!(starts, vec![28, 35], "{errors}");
}
