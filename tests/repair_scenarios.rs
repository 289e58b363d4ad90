//! End-to-end repair sessions on small broken files.

use std::sync::Arc;

use go125_repair::ast::{Expr, SimpleStmt, Stmt, StmtId, TopLevelDecl, Type};
use go125_repair::{
    parse_file, repair, FixKind, ParseMode, ParseResult, PositionSpace, RepairOptions, SourceBuffer,
    MAX_SRC_FIXES,
};

fn run(src: &str) -> ParseResult {
    repair(&PositionSpace::shared(), "a.go", src, &RepairOptions::default())
}

fn func(body: &str) -> String {
    format!("package p\n\nfunc f() {{\n{body}\n}}\n")
}

fn body(res: &ParseResult) -> Vec<StmtId> {
    let arena = &res.tree.arena;
    let decls = arena.top_decls(res.tree.file.decls);
    let Some(&TopLevelDecl::Func(f)) = decls.iter().find(|d| matches!(d, TopLevelDecl::Func(_))) else {
        panic!("no func in {:?}", res.src.as_str());
    };
    let body = arena.funcs[f].body.expect("func body");
    arena.stmts_list(body.stmts).to_vec()
}

fn count(res: &ParseResult, kind: FixKind) -> usize {
    res.fixes.iter().filter(|&&k| k == kind).count()
}

#[test]
fn clean_file_is_untouched() {
    let src = func("\tx := []int{1, 2}\n\tfor _, v := range x {\n\t\tg(v)\n\t}");
    let res = run(&src);
    assert!(!res.has_errors());
    assert!(res.fixes.is_empty());
    assert!(!res.fixed());
    assert_eq!(res.src.as_str(), src);
}

#[test]
fn missing_curlies_once_then_clean() {
    let src = func("\tif foo\n\tbar()");
    let res = run(&src);
    assert!(res.has_errors());
    assert_eq!(count(&res, FixKind::Curlies), 1);
    assert!(res.src.as_str().contains("if foo{}\n"));
    assert!(res.fixed_src);

    let (_, again) = parse_file(&res.src, ParseMode::FULL);
    assert!(again.is_empty(), "{again}");
}

#[test]
fn initializer_moves_out_of_the_condition() {
    let res = run(&func("\tif x := 0 {\n\t\ty()\n\t}"));
    assert_eq!(res.fixes, vec![FixKind::InitStmt]);
    assert!(!res.fixed_src);
    assert!(res.fixed_ast);

    let Stmt::If { init, cond, .. } = res.tree.arena.stmts[body(&res)[0]] else {
        panic!("not an if");
    };
    assert!(init.is_some());
    let Expr::Ident(name, _) = res.tree.arena.exprs[cond] else {
        panic!("condition is not the placeholder");
    };
    assert_eq!(res.tree.interner.resolve(name), "_");
}

#[test]
fn empty_switch_brace_moves_past_partial_case() {
    let src = func("\tswitch {\n\tcas\n\t}");
    let res = run(&src);
    assert_eq!(count(&res, FixKind::EmptySwitch), 1);

    let Stmt::Switch { body: block, .. } = res.tree.arena.stmts[body(&res)[0]] else {
        panic!("not a switch");
    };
    let cas_line = res.src.line_of(src.find("cas").unwrap());
    assert!(res.src.line_of(block.r_brace.start_usize()) > cas_line);
}

#[test]
fn dangling_dot_gets_a_name() {
    let res = run(&func("\tx."));
    assert_eq!(count(&res, FixKind::DanglingSelector), 1);
    assert!(res.src.as_str().contains("\tx._\n"));
    assert!(res.has_errors());
}

#[test]
fn keyword_selector_is_kept() {
    let src = func("\tfoo.var");
    let res = run(&src);
    assert!(res.fixes.contains(&FixKind::PhantomSelector));

    let names: Vec<&str> = res
        .tree
        .arena
        .exprs
        .iter()
        .filter_map(|(_, x, _)| match x {
            Expr::Selector { sel, .. } => Some(res.tree.name(*sel)),
            _ => None,
        })
        .collect();
    assert!(names.contains(&"var"), "{names:?}");
}

#[test]
fn defer_without_call_is_rebuilt() {
    let res = run(&func("\tdefer fmt.\n\ty := 1"));
    assert!(res.fixes.contains(&FixKind::DeferOrGo));
    assert!(
        res.tree
            .arena
            .stmts
            .iter()
            .any(|(_, s, _)| matches!(s, Stmt::Defer { .. }))
    );
}

#[test]
fn slice_type_becomes_a_type_expression() {
    let res = run(&func("\tx := []int"));
    assert!(res.fixes.contains(&FixKind::ArrayType));

    let arena = &res.tree.arena;
    let Stmt::Simple(s) = arena.stmts[body(&res)[0]] else {
        panic!("not a simple statement");
    };
    let SimpleStmt::Assign { rhs, .. } = arena.simple_stmts[s] else {
        panic!("not an assignment");
    };
    let Expr::Type(typ) = arena.exprs[arena.exprs_list(rhs)[0]] else {
        panic!("right-hand side is not a type");
    };
    assert!(matches!(arena.types[typ], Type::Slice { .. }));
}

#[test]
fn source_fixes_stop_at_the_ceiling() {
    let src = func(&"\tif a\n".repeat(15));
    let res = run(&src);
    let source_fixes = res.fixes.iter().filter(|k| k.is_source_fix()).count();
    assert_eq!(source_fixes, MAX_SRC_FIXES);

    let (_, left) = parse_file(&res.src, ParseMode::FULL);
    assert!(!left.is_empty());
}

#[test]
fn errors_come_from_the_first_parse() {
    let src = func("\tif foo\n\tbar()\n\tx.");
    let res = run(&src);
    let (_, first) = parse_file(&SourceBuffer::from_text(src.as_str()), ParseMode::FULL);
    assert_eq!(res.errors, first);
    assert!(res.fixed_src);
}

#[test]
fn file_is_registered_once_with_final_size() {
    let space = PositionSpace::shared();
    let res = repair(&space, "b.go", func("\tif foo\n\tbar()"), &RepairOptions::default());
    assert_eq!(space.len(), 1);
    assert_eq!(res.file.size(), res.src.len());
    assert!(Arc::ptr_eq(&space, &res.space));

    let end = res.file.pos(res.src.len());
    assert_eq!(space.file_for(end).map(|f| f.base()), Some(res.file.base()));
    assert_eq!(space.file_for(res.file.pos(usize::MAX)), space.file_for(end));
}

#[test]
fn purged_bodies_are_empty() {
    let options = RepairOptions::default().purging_func_bodies();
    let res = repair(
        &PositionSpace::shared(),
        "c.go",
        "package p\n\nfunc f() int {\n\tif x\n\treturn 1\n}\n",
        &options,
    );
    assert_eq!(res.src.as_str(), "package p\n\nfunc f() int {}\n");
    assert!(!res.has_errors());
    assert!(body(&res).is_empty());
}

#[test]
fn header_mode_is_carried() {
    let options = RepairOptions::default().with_mode(ParseMode::HEADER);
    let res = repair(&PositionSpace::shared(), "d.go", "package p\nimport \"fmt\"\n", &options);
    assert_eq!(res.mode, ParseMode::HEADER);
    assert!(!res.has_errors());
}

#[test]
fn initializer_without_braces_moves_out_of_the_condition() {
    let res = run(&func("\tif x := 0\n\t  y()"));
    assert_eq!(res.fixes, vec![FixKind::InitStmt]);
    assert!(!res.fixed_src);

    let Stmt::If { init, cond, .. } = res.tree.arena.stmts[body(&res)[0]] else {
        panic!("not an if");
    };
    assert!(init.is_some());
    let Expr::Ident(name, _) = res.tree.arena.exprs[cond] else {
        panic!("condition is not the placeholder");
    };
    assert_eq!(res.tree.interner.resolve(name), "_");
}

#[test]
fn invalid_utf8_keeps_error_offsets() {
    let src: &[u8] = b"package p\nfunc f() {\n\ts := \"\xff\"\n\tx.\n}\n";
    assert_eq!(src.len(), 37);
    let res = repair(&PositionSpace::shared(), "e.go", src, &RepairOptions::default());

    assert!(res.errors.iter().any(|e| e.span.start_usize() == 28), "{}", res.errors);
    let selector = res
        .errors
        .iter()
        .find(|e| e.line == 5)
        .expect("error at the closing brace");
    assert_eq!(selector.span.start_usize(), 35);
    assert_eq!(selector.column, 1);

    assert_eq!(res.fixes, vec![FixKind::DanglingSelector]);
    assert_eq!(
        res.src.as_bytes(),
        b"package p\nfunc f() {\n\ts := \"\xff\"\n\tx._\n}\n"
    );
    assert_eq!(res.file.size(), 38);
}

#[test]
fn invalid_utf8_in_comment_leaves_bytes_alone() {
    let src: &[u8] = b"package p\n// caf\xe9\nfunc f() {}\n";
    let res = repair(&PositionSpace::shared(), "f.go", src, &RepairOptions::default());
    assert!(res.fixes.is_empty());
    assert!(!res.fixed_src);
    assert_eq!(res.src.as_bytes(), src);
    assert_eq!(res.file.size(), src.len());
}

#[test]
fn deep_nesting_is_reported_not_followed() {
    let src = format!("package p\nvar _ = {}x", "(".repeat(1000));
    let res = run(&src);
    let nesting: Vec<_> = res
        .errors
        .iter()
        .filter(|e| e.message.contains("exceeded max nesting depth"))
        .collect();
    assert_eq!(nesting.len(), 1, "{}", res.errors);
    assert_eq!(nesting[0].line, 2);
    for (_, _, span) in res.tree.arena.exprs.iter() {
        assert!(span.start <= span.end && span.end_usize() <= src.len());
    }
}

#[test]
fn deeply_nested_blocks_survive_repair() {
    let src = func(&format!("{}\tx.", "{".repeat(100_000)));
    let res = run(&src);
    assert!(res.errors.iter().any(|e| e.message.contains("nesting")));
    assert_eq!(res.src.len(), src.len());
}
