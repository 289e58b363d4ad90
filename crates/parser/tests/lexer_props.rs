use go125_parser::lexer::{Lexer, Tok};
use go125_parser::{parse_file, ParseMode, SourceBuffer};
use proptest::prelude::*;

/// Go-ish fragments, so the parser sees more than identifier soup.
fn go_fragment() -> impl Strategy<Value = String> {
    let piece = prop::sample::select(vec![
        "package p\n",
        "func f() {",
        "}",
        "{",
        "if x",
        "for i := 0",
        "switch {",
        "case 1:",
        "defer fmt.",
        "go g",
        "x.",
        "[]int",
        "var",
        ":=",
        "// c",
        "\n",
        " ",
        "(",
        ")",
    ]);
    prop::collection::vec(piece, 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn tokens_stay_ordered_and_in_bounds(s in ".*") {
        let mut frontier = 0usize;
        let mut count = 0usize;
        for (start, tok, end) in Lexer::new(&s) {
            prop_assert!(start <= end && end <= s.len(), "({start},{end}) {tok:?} in {s:?}");
            prop_assert!(start >= frontier, "{tok:?} at {start} before {frontier} in {s:?}");
            if tok == Tok::Semi && start == end {
                // inserted semicolons take no room
            } else {
                frontier = end;
            }
            count += 1;
            prop_assert!(count <= s.len() * 2 + 2, "runaway lexer on {s:?}");
        }
    }

    #[test]
    fn parser_keeps_spans_inside_the_buffer(s in go_fragment()) {
        let src = SourceBuffer::from_text(&s);
        let (tree, _) = parse_file(&src, ParseMode::FULL);
        let len = s.len() as u32;
        for (_, _, span) in tree.arena.exprs.iter() {
            prop_assert!(span.start <= span.end && span.end <= len, "{span:?} in {s:?}");
        }
        for (_, _, span) in tree.arena.stmts.iter() {
            prop_assert!(span.start <= span.end && span.end <= len, "{span:?} in {s:?}");
        }
    }
}
