use go125_repair::{repair, PositionSpace, RepairOptions, MAX_SRC_FIXES};
use proptest::prelude::*;

fn session(src: &str) -> go125_repair::ParseResult {
    repair(&PositionSpace::shared(), "p.go", src, &RepairOptions::default())
}

fn wrap(lines: &[&str]) -> String {
    let mut out = String::from("package p\n\nfunc f(x int, ch chan int) {\n");
    for line in lines {
        out.push('\t');
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

const VALID: &[&str] = &[
    "y := 1",
    "g(x)",
    "if x > 0 { x-- }",
    "for i := 0; i < x; i++ { g(i) }",
    "defer g()",
    "go g(x)",
    "switch x { case 1: }",
    "select { case v := <-ch: _ = v }",
    "var s []int",
    "_ = map[int]string{1: \"a\"}",
    "fmt.Println(x)",
];

/// Lines that are often cut short while typing.
const BROKEN: &[&str] = &[
    "if x",
    "for i := 0",
    "switch {",
    "cas",
    "}",
    "x.",
    "fmt.",
    "defer g",
    "go fmt.",
    "y := []int",
    "if v := x {",
    "a.var",
    "// note",
];

fn valid_line() -> impl Strategy<Value = &'static str> {
    prop::sample::select(VALID)
}

fn broken_line() -> impl Strategy<Value = &'static str> {
    prop::sample::select([VALID, BROKEN].concat())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn valid_files_come_back_unchanged(lines in prop::collection::vec(valid_line(), 0..12)) {
        let src = wrap(&lines);
        let res = session(&src);
        prop_assert!(!res.has_errors(), "{}", res.errors);
        prop_assert!(res.fixes.is_empty());
        prop_assert_eq!(res.src.as_str(), src.as_str());
    }

    #[test]
    fn every_node_lies_in_the_final_buffer(lines in prop::collection::vec(broken_line(), 0..16)) {
        let res = session(&wrap(&lines));
        let len = res.src.len();
        for node in res.index.preorder() {
            let span = res.tree.span(node);
            prop_assert!(span.start <= span.end, "{node:?} {span:?}");
            prop_assert!(span.end_usize() <= len, "{node:?} {span:?} len={len}");
        }
        prop_assert_eq!(res.file.size(), len);
    }

    #[test]
    fn source_fixes_are_bounded(lines in prop::collection::vec(broken_line(), 0..40)) {
        let res = session(&wrap(&lines));
        let source_fixes = res.fixes.iter().filter(|k| k.is_source_fix()).count();
        prop_assert!(source_fixes <= MAX_SRC_FIXES);
        prop_assert_eq!(res.fixed_src, source_fixes > 0);
    }

    #[test]
    fn arbitrary_bytes_do_not_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let res = repair(&PositionSpace::shared(), "p.go", bytes, &RepairOptions::default());
        prop_assert_eq!(res.file.size(), res.src.len());
        prop_assert!(!res.index.is_empty());
    }

    #[test]
    fn arbitrary_text_does_not_panic(s in "(package p\n)?[a-z{}().:=;\n \t\\[\\]]{0,120}") {
        let res = session(&s);
        prop_assert!(res.index.len() >= 1);
    }
}
