use go125_parser::lexer::{tokenize, Lexer, Tok};

/// Offsets of the semicolons the lexer inserted (zero-width ones).
fn inserted(input: &str) -> Vec<usize> {
    Lexer::new(input)
        .filter(|&(s, t, e)| t == Tok::Semi && s == e)
        .map(|(s, _, _)| s)
        .collect()
}

fn spelled(input: &str) -> String {
    tokenize(input)
        .iter()
        .map(|(_, t, _)| match t {
            Tok::Ident(_) => "IDENT",
            Tok::IntLit(_) | Tok::FloatLit(_) | Tok::ImagLit(_) => "NUM",
            Tok::StringLit(_) | Tok::RawStringLit(_) | Tok::RuneLit(_) => "LIT",
            other => other.text(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[rustfmt::skip]
const TABLE: &[(&str, &str)] = &[
    ("", ""),
    ("foo\n", "IDENT ;"),
    ("123\n", "NUM ;"),
    ("`x`\n", "LIT ;"),
    ("x++\n", "IDENT ++ ;"),
    (")\n", ") ;"),
    ("]\n", "] ;"),
    ("}\n", "} ;"),
    ("return\n", "return ;"),
    ("break\n", "break ;"),
    // no semicolon after these
    ("x.\n", "IDENT ."),
    ("x &&\n", "IDENT &&"),
    ("if\n", "if"),
    ("go\n", "go"),
    ("defer\n", "defer"),
    ("{\n", "{"),
    (",\n", ","),
    ("foo // c\n", "IDENT ;"),
    ("foo /* c */\n", "IDENT ;"),
    ("foo /*\n*/ bar", "IDENT ; IDENT ;"),
    ("package p", "package IDENT ;"),
];

#[test]
fn semicolon_table() {
    for &(input, want) in TABLE {
        assert_eq!(spelled(input), want, "input={input:?}");
    }
}

#[test]
fn inserted_semicolon_sits_on_the_newline() {
    let src = "if foo\nbar()\n";
    assert_eq!(inserted(src), vec![6, 12]);
}

#[test]
fn eof_semicolon_sits_at_the_end() {
    let src = "x//c";
    assert_eq!(inserted(src), vec![src.len()]);
}

#[test]
fn dangling_dot_continues_on_the_next_line() {
    let toks: Vec<_> = Lexer::new("defer fmt.\ny := 1\n").map(|(_, t, _)| t).collect();
    assert_eq!(toks[..4], [Tok::KwDefer, Tok::Ident("fmt"), Tok::Dot, Tok::Ident("y")]);
}

#[test]
fn comments_are_reported_when_asked() {
    let toks: Vec<_> = Lexer::with_comments("x // c\n").map(|(_, t, _)| t).collect();
    assert!(toks.contains(&Tok::Comment("// c")));
    assert!(!Lexer::new("x // c\n").any(|(_, t, _)| matches!(t, Tok::Comment(_))));
}
