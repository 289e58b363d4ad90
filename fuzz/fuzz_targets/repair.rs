#![no_main]

use go125_repair::{repair, PositionSpace, RepairOptions, MAX_SRC_FIXES};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let space = PositionSpace::shared();
    let res = repair(&space, "fuzz.go", data, &RepairOptions::default());

    let len = res.src.len();
    for node in res.index.preorder() {
        let span = res.tree.span(node);
        assert!(span.start <= span.end);
        assert!(span.end_usize() <= len);
    }
    assert!(res.fixes.iter().filter(|k| k.is_source_fix()).count() <= MAX_SRC_FIXES);
    assert_eq!(res.file.size(), len);
    assert_eq!(space.len(), 1);
});
