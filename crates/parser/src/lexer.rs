use crate::ast::Span;
use crate::error::{LexError, LexErrorKind};
use logos::{Lexer as LogosLexer, Logos};
use std::ops::Range;

// =============================================================================
// 0. Shared helpers
// =============================================================================

#[inline(always)]
fn first_newline_offset(s: &str) -> Option<usize> {
    memchr::memchr2(b'\n', b'\r', s.as_bytes())
}

#[inline(always)]
const fn digit_ok(b: u8, base: u8) -> bool {
    match base {
        2 => matches!(b, b'0' | b'1'),
        8 => matches!(b, b'0'..=b'7'),
        16 => b.is_ascii_hexdigit(),
        _ => b.is_ascii_digit(),
    }
}

// =============================================================================
// 1. Block comment scanner
// =============================================================================

#[inline]
fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    use memchr::memchr;

    let rem = lex.remainder().as_bytes();
    let mut search_start = 0;

    while let Some(star_pos) = memchr(b'*', &rem[search_start..]) {
        let abs_pos = search_start + star_pos;
        if rem.get(abs_pos + 1) == Some(&b'/') {
            lex.bump(abs_pos + 2);
            return Ok(());
        }
        search_start = abs_pos + 1;
    }

    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

// =============================================================================
// 2. String / rune validation
// =============================================================================

/// Checks escape sequences of an interpreted string or rune body.
fn validate_escapes(body: &[u8], quote: u8) -> Result<(), LexErrorKind> {
    let mut i = 0;
    while i < body.len() {
        if body[i] != b'\\' {
            i += 1;
            continue;
        }
        let Some(&esc) = body.get(i + 1) else {
            return Err(LexErrorKind::InvalidEscape);
        };
        let (digits, base) = match esc {
            b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => (0, 0),
            b'x' => (2, 16),
            b'u' => (4, 16),
            b'U' => (8, 16),
            b'0'..=b'7' => (3, 8),
            c if c == quote => (0, 0),
            _ => return Err(LexErrorKind::InvalidEscape),
        };
        if digits == 0 {
            i += 2;
            continue;
        }
        // Octal escapes count the first digit as part of the escape.
        let first = if base == 8 { i + 1 } else { i + 2 };
        let end = first + digits;
        let Some(run) = body.get(first..end) else {
            return Err(LexErrorKind::InvalidEscape);
        };
        if !run.iter().all(|&b| digit_ok(b, base)) {
            return Err(LexErrorKind::InvalidEscape);
        }
        let value = run
            .iter()
            .fold(0u32, |acc, &b| acc * base as u32 + (b as char).to_digit(16).unwrap_or(0));
        let too_big = match esc {
            b'u' | b'U' => value > 0x10_FFFF || (0xD800..=0xDFFF).contains(&value),
            b'0'..=b'7' => value > 255,
            _ => false,
        };
        if too_big {
            return Err(LexErrorKind::InvalidEscape);
        }
        i = end;
    }
    Ok(())
}

fn validate_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice().as_bytes();
    validate_escapes(&s[1..s.len() - 1], b'"')
}

fn validate_rune(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice();
    let body = &s[1..s.len() - 1];
    if body.starts_with('\\') {
        validate_escapes(body.as_bytes(), b'\'')
    } else if body.chars().count() == 1 {
        Ok(())
    } else {
        Err(LexErrorKind::InvalidToken)
    }
}

fn unterminated_string(_: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedString)
}

fn unterminated_raw_string(_: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedRawString)
}

fn unterminated_rune(_: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedRune)
}

// =============================================================================
// 3. Numbers
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumKind {
    Int,
    Float,
    Imag,
}

/// Logos callback: extend a number to maximal munch, then classify it.
///
/// Digits outside the base are munched too (`0b2`, `09`) so the whole literal
/// is reported as one invalid token.
fn lex_number(lex: &mut LogosLexer<'_, RawTok>) -> Result<NumKind, LexErrorKind> {
    let src = lex.source().as_bytes();
    let start = lex.span().start;
    let n = src.len();

    let munch = |mut i: usize, hex: bool| {
        while i < n && (src[i] == b'_' || src[i].is_ascii_digit() || (hex && src[i].is_ascii_hexdigit())) {
            i += 1;
        }
        i
    };

    let mut i = start;
    let mut base = 10u8;
    let mut kind = NumKind::Int;

    if src[i] == b'0' && i + 1 < n && matches!(src[i + 1] | 0x20, b'x' | b'o' | b'b') {
        base = match src[i + 1] | 0x20 {
            b'x' => 16,
            b'o' => 8,
            _ => 2,
        };
        i += 2;
    }
    let digits_start = i;
    i = munch(i, base == 16);

    if i < n && src[i] == b'.' && !(i + 1 < n && src[i + 1] == b'.') {
        kind = NumKind::Float;
        i = munch(i + 1, base == 16);
    }

    if i < n {
        let e = src[i] | 0x20;
        let is_exp = if base == 16 { e == b'p' } else { e == b'e' };
        if is_exp {
            kind = NumKind::Float;
            i += 1;
            if i < n && matches!(src[i], b'+' | b'-') {
                i += 1;
            }
            let exp_start = i;
            i = munch(i, false);
            if i == exp_start {
                bump_to(lex, i);
                return Err(LexErrorKind::InvalidNumber);
            }
        }
    }

    if i < n && src[i] == b'i' {
        kind = NumKind::Imag;
        i += 1;
    }
    bump_to(lex, i);

    let body = &src[digits_start..i];
    let mantissa: Vec<u8> = body
        .iter()
        .copied()
        .take_while(|&b| b != b'i' && !(b | 0x20 == b'e' && base != 16) && b | 0x20 != b'p')
        .filter(|&b| b != b'_' && b != b'.')
        .collect();

    let legacy_octal = base == 10
        && kind == NumKind::Int
        && src[start] == b'0'
        && i - start > 1;
    let check_base = if legacy_octal { 8 } else { base };
    let digits_ok = mantissa.iter().all(|&b| digit_ok(b, check_base));
    let has_digits = !mantissa.is_empty() || kind == NumKind::Float && base == 10;
    let bad_hex_float = base == 16 && kind == NumKind::Float && !body.iter().any(|&b| b | 0x20 == b'p');
    let bad_prefixed_float = matches!(base, 2 | 8) && kind == NumKind::Float;
    let bad_underscore = body.ends_with(b"_") || body.windows(2).any(|w| w == b"__");

    if !digits_ok || !has_digits || bad_hex_float || bad_prefixed_float || bad_underscore {
        return Err(LexErrorKind::InvalidNumber);
    }
    Ok(kind)
}

#[inline]
fn bump_to(lex: &mut LogosLexer<'_, RawTok>, end: usize) {
    let already = lex.span().end;
    if end > already {
        lex.bump(end - already);
    }
}

// =============================================================================
// 4. Token Definition (RawTok)
// =============================================================================

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[regex(r"\r\n|\n|\r")] Newline,
    #[regex(r"//[^\n\r]*", allow_greedy = true)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords (before Ident)
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    #[regex(r"[0-9]|\.[0-9]", lex_number)] Number(NumKind),

    // Strings / runes (the unterminated forms lose on length when closed)
    #[regex(r"`[^`]*`")] RawString,
    #[regex(r"`[^`]*", unterminated_raw_string, allow_greedy = true)] UnterminatedRawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#, validate_string)] String,
    #[regex(r#""([^"\\\n\r]|\\.)*"#, unterminated_string, allow_greedy = true)] UnterminatedString,
    #[regex(r"'([^'\\\n\r]|\\.)+'", validate_rune)] Rune,
    #[regex(r"'([^'\\\n\r]|\\.)*", unterminated_rune, allow_greedy = true)] UnterminatedRune,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)] Error,
}

impl RawTok {
    /// Tokens after which a newline becomes `;`.
    #[inline(always)]
    const fn can_insert_semicolon(self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::Number(_)
                | Self::Rune
                | Self::String
                | Self::RawString
                | Self::KwBreak
                | Self::KwContinue
                | Self::KwFallthrough
                | Self::KwReturn
                | Self::Inc
                | Self::Dec
                | Self::RParen
                | Self::RBrack
                | Self::RBrace
        )
    }

    #[rustfmt::skip]
    fn to_token(self, slice: &str) -> Tok<'_> {
        match self {
            Self::Ident => Tok::Ident(slice),
            Self::Number(NumKind::Int) => Tok::IntLit(slice),
            Self::Number(NumKind::Float) => Tok::FloatLit(slice),
            Self::Number(NumKind::Imag) => Tok::ImagLit(slice),
            Self::Rune => Tok::RuneLit(slice),
            Self::String => Tok::StringLit(slice),
            Self::RawString => Tok::RawStringLit(slice),
            Self::LineComment | Self::BlockComment => Tok::Comment(slice),

            Self::KwBreak => Tok::KwBreak, Self::KwCase => Tok::KwCase, Self::KwChan => Tok::KwChan,
            Self::KwConst => Tok::KwConst, Self::KwContinue => Tok::KwContinue,
            Self::KwDefault => Tok::KwDefault, Self::KwDefer => Tok::KwDefer, Self::KwElse => Tok::KwElse,
            Self::KwFallthrough => Tok::KwFallthrough, Self::KwFor => Tok::KwFor, Self::KwFunc => Tok::KwFunc,
            Self::KwGo => Tok::KwGo, Self::KwGoto => Tok::KwGoto, Self::KwIf => Tok::KwIf,
            Self::KwImport => Tok::KwImport, Self::KwInterface => Tok::KwInterface, Self::KwMap => Tok::KwMap,
            Self::KwPackage => Tok::KwPackage, Self::KwRange => Tok::KwRange, Self::KwReturn => Tok::KwReturn,
            Self::KwSelect => Tok::KwSelect, Self::KwStruct => Tok::KwStruct, Self::KwSwitch => Tok::KwSwitch,
            Self::KwType => Tok::KwType, Self::KwVar => Tok::KwVar,

            Self::Ellipsis => Tok::Ellipsis, Self::ShlAssign => Tok::ShlAssign, Self::ShrAssign => Tok::ShrAssign,
            Self::AndNotAssign => Tok::AndNotAssign, Self::AddAssign => Tok::AddAssign,
            Self::SubAssign => Tok::SubAssign, Self::MulAssign => Tok::MulAssign, Self::DivAssign => Tok::DivAssign,
            Self::ModAssign => Tok::ModAssign, Self::AndAssign => Tok::AndAssign, Self::OrAssign => Tok::OrAssign,
            Self::XorAssign => Tok::XorAssign, Self::Shl => Tok::Shl, Self::Shr => Tok::Shr,
            Self::AndNot => Tok::AndNot, Self::LAnd => Tok::LAnd, Self::LOr => Tok::LOr, Self::EqEq => Tok::EqEq,
            Self::NotEq => Tok::NotEq, Self::Le => Tok::Le, Self::Ge => Tok::Ge, Self::Inc => Tok::Inc,
            Self::Dec => Tok::Dec, Self::Define => Tok::Define, Self::Arrow => Tok::Arrow, Self::Assign => Tok::Assign,
            Self::Plus => Tok::Plus, Self::Minus => Tok::Minus, Self::Star => Tok::Star, Self::Slash => Tok::Slash,
            Self::Percent => Tok::Percent, Self::Amp => Tok::Amp, Self::Pipe => Tok::Pipe, Self::Caret => Tok::Caret,
            Self::Tilde => Tok::Tilde, Self::Bang => Tok::Bang, Self::Lt => Tok::Lt, Self::Gt => Tok::Gt,

            Self::LParen => Tok::LParen, Self::RParen => Tok::RParen, Self::LBrack => Tok::LBrack,
            Self::RBrack => Tok::RBrack, Self::LBrace => Tok::LBrace, Self::RBrace => Tok::RBrace,
            Self::Comma => Tok::Comma, Self::Semi => Tok::Semi, Self::Colon => Tok::Colon, Self::Dot => Tok::Dot,

            Self::Bom | Self::Newline | Self::Error | Self::UnterminatedRawString
            | Self::UnterminatedString | Self::UnterminatedRune => Tok::Error,
        }
    }
}

// =============================================================================
// 5. Public Token Definition (zero-copy)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    ImagLit(&'input str),
    RuneLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),
    /// Only produced by `Lexer::with_comments`.
    Comment(&'input str),

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators / Delimiters
    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    Error,
    /// Never produced by the lexer; marks the end of input for the parser.
    Eof,
}

impl Tok<'_> {
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Tok::IntLit(_)
                | Tok::FloatLit(_)
                | Tok::ImagLit(_)
                | Tok::RuneLit(_)
                | Tok::StringLit(_)
                | Tok::RawStringLit(_)
        )
    }

    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Tok::KwBreak
                | Tok::KwCase
                | Tok::KwChan
                | Tok::KwConst
                | Tok::KwContinue
                | Tok::KwDefault
                | Tok::KwDefer
                | Tok::KwElse
                | Tok::KwFallthrough
                | Tok::KwFor
                | Tok::KwFunc
                | Tok::KwGo
                | Tok::KwGoto
                | Tok::KwIf
                | Tok::KwImport
                | Tok::KwInterface
                | Tok::KwMap
                | Tok::KwPackage
                | Tok::KwRange
                | Tok::KwReturn
                | Tok::KwSelect
                | Tok::KwStruct
                | Tok::KwSwitch
                | Tok::KwType
                | Tok::KwVar
        )
    }

    /// Source spelling of fixed tokens, or the literal text.
    pub fn text(&self) -> &str {
        match *self {
            Tok::Ident(s)
            | Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::ImagLit(s)
            | Tok::RuneLit(s)
            | Tok::StringLit(s)
            | Tok::RawStringLit(s)
            | Tok::Comment(s) => s,
            ref fixed => fixed_spelling(fixed),
        }
    }
}

#[rustfmt::skip]
fn fixed_spelling(tok: &Tok<'_>) -> &'static str {
    if let Some(&(kw, _)) = KEYWORDS.iter().find(|(_, t)| t == tok) {
        return kw;
    }
    match tok {
        Tok::Ellipsis => "...", Tok::ShlAssign => "<<=", Tok::ShrAssign => ">>=", Tok::AndNotAssign => "&^=",
        Tok::AddAssign => "+=", Tok::SubAssign => "-=", Tok::MulAssign => "*=", Tok::DivAssign => "/=",
        Tok::ModAssign => "%=", Tok::AndAssign => "&=", Tok::OrAssign => "|=", Tok::XorAssign => "^=",
        Tok::Shl => "<<", Tok::Shr => ">>", Tok::AndNot => "&^", Tok::LAnd => "&&", Tok::LOr => "||",
        Tok::EqEq => "==", Tok::NotEq => "!=", Tok::Le => "<=", Tok::Ge => ">=", Tok::Inc => "++",
        Tok::Dec => "--", Tok::Define => ":=", Tok::Arrow => "<-", Tok::Assign => "=", Tok::Plus => "+",
        Tok::Minus => "-", Tok::Star => "*", Tok::Slash => "/", Tok::Percent => "%", Tok::Amp => "&",
        Tok::Pipe => "|", Tok::Caret => "^", Tok::Tilde => "~", Tok::Bang => "!", Tok::Lt => "<",
        Tok::Gt => ">", Tok::LParen => "(", Tok::RParen => ")", Tok::LBrack => "[", Tok::RBrack => "]",
        Tok::LBrace => "{", Tok::RBrace => "}", Tok::Comma => ",", Tok::Semi => ";", Tok::Colon => ":",
        Tok::Dot => ".", Tok::Eof => "EOF",
        _ => "ILLEGAL",
    }
}

impl std::fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

// =============================================================================
// 6. Keyword table
// =============================================================================

/// Reserved words, sorted for binary search.
pub const KEYWORDS: [(&str, Tok<'static>); 25] = [
    ("break", Tok::KwBreak),
    ("case", Tok::KwCase),
    ("chan", Tok::KwChan),
    ("const", Tok::KwConst),
    ("continue", Tok::KwContinue),
    ("default", Tok::KwDefault),
    ("defer", Tok::KwDefer),
    ("else", Tok::KwElse),
    ("fallthrough", Tok::KwFallthrough),
    ("for", Tok::KwFor),
    ("func", Tok::KwFunc),
    ("go", Tok::KwGo),
    ("goto", Tok::KwGoto),
    ("if", Tok::KwIf),
    ("import", Tok::KwImport),
    ("interface", Tok::KwInterface),
    ("map", Tok::KwMap),
    ("package", Tok::KwPackage),
    ("range", Tok::KwRange),
    ("return", Tok::KwReturn),
    ("select", Tok::KwSelect),
    ("struct", Tok::KwStruct),
    ("switch", Tok::KwSwitch),
    ("type", Tok::KwType),
    ("var", Tok::KwVar),
];

/// Keyword token for `word`, if it is reserved.
pub fn lookup_keyword(word: &str) -> Option<Tok<'static>> {
    KEYWORDS
        .binary_search_by(|(kw, _)| kw.cmp(&word))
        .ok()
        .map(|i| KEYWORDS[i].1)
}

#[inline]
pub fn is_keyword(word: &str) -> bool {
    lookup_keyword(word).is_some()
}

// =============================================================================
// 7. Lexer wrapper: semicolon insertion + comments + diags
// =============================================================================

pub type Spanned<'src> = (usize, Tok<'src>, usize);

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<Spanned<'src>>,
    diags: Vec<LexError>,
    last_can_insert_semi: bool,
    emit_comments: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    /// Lexer that drops comments.
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::with_capacity(16),
            last_can_insert_semi: false,
            emit_comments: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    /// Lexer that yields `Tok::Comment` for every comment.
    pub fn with_comments(input: &'src str) -> Self {
        let mut lx = Self::new(input);
        lx.emit_comments = true;
        lx
    }

    pub fn take_diags(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.diags)
    }

    #[inline]
    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        self.diags.push(LexError {
            kind,
            span: Span::new(span.start, span.end),
        });
    }

    /// Returns the token to emit now, if any.
    fn handle_trivia(&mut self, raw: RawTok, span: Range<usize>, slice: &'src str) -> Option<Spanned<'src>> {
        let comment = self
            .emit_comments
            .then_some((span.start, Tok::Comment(slice), span.end));
        match raw {
            RawTok::Newline => {
                if self.last_can_insert_semi {
                    self.last_can_insert_semi = false;
                    return Some((span.start, Tok::Semi, span.start));
                }
                None
            }
            RawTok::BlockComment if self.last_can_insert_semi => {
                match first_newline_offset(slice) {
                    Some(off) => {
                        self.last_can_insert_semi = false;
                        let at = span.start + off;
                        self.pending = comment;
                        Some((at, Tok::Semi, at))
                    }
                    None => comment,
                }
            }
            _ => comment,
        }
    }

    fn handle_eof(&mut self) -> Option<Spanned<'src>> {
        self.eof_done = true;
        if self.last_can_insert_semi {
            self.last_can_insert_semi = false;
            return Some((self.src_len, Tok::Semi, self.src_len));
        }
        None
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Spanned<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }
            if self.eof_done {
                return None;
            }

            let Some(raw) = self.logos.next() else {
                match self.handle_eof() {
                    Some(semi) => return Some(semi),
                    None => continue,
                }
            };
            let span = self.logos.span();
            let slice = self.logos.slice();

            let raw = match raw {
                Ok(raw) => raw,
                Err(kind) => {
                    self.push_lex_diag(kind, span.clone());
                    if kind == LexErrorKind::UnterminatedComment {
                        // Trailing comment: treat like EOF for semicolons.
                        if self.emit_comments {
                            self.pending = Some((span.start, Tok::Comment(slice), span.end));
                        }
                        continue;
                    }
                    self.last_can_insert_semi = false;
                    return Some((span.start, Tok::Error, span.end));
                }
            };

            match raw {
                RawTok::Bom if span.start == 0 => continue,
                RawTok::Bom => {
                    self.push_lex_diag(LexErrorKind::MisplacedBom, span.clone());
                    self.last_can_insert_semi = false;
                    return Some((span.start, Tok::Error, span.end));
                }
                RawTok::Newline | RawTok::LineComment | RawTok::BlockComment => {
                    if let Some(tok) = self.handle_trivia(raw, span, slice) {
                        return Some(tok);
                    }
                }
                RawTok::Error => {
                    self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
                    self.last_can_insert_semi = false;
                    return Some((span.start, Tok::Error, span.end));
                }
                _ => {
                    self.last_can_insert_semi = raw.can_insert_semicolon();
                    return Some((span.start, raw.to_token(slice), span.end));
                }
            }
        }
    }
}

/// Tokens of `src` without comments, with inserted semicolons.
pub fn tokenize(src: &str) -> Vec<Spanned<'_>> {
    Lexer::new(src).collect()
}
