#![no_main]

use go125_parser::lexer::{Lexer, Tok};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let mut frontier = 0usize;
    for (start, tok, end) in Lexer::with_comments(&s) {
        assert!(start <= end && end <= s.len());
        assert!(start >= frontier);
        if !(tok == Tok::Semi && start == end) {
            frontier = end;
        }
    }
});
