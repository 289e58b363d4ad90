use go125_repair::{repair, PositionSpace, RepairOptions};
use walkdir::WalkDir;

#[test]
fn repairs_go_corpus_if_configured() {
    let Some(root) = std::env::var_os("GO125_REPAIR_CORPUS") else {
        eprintln!("GO125_REPAIR_CORPUS not set; skipping corpus test");
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let space = PositionSpace::shared();
    let options = RepairOptions::default();
    let mut total = 0usize;
    let mut broken = 0usize;
    let mut fixed = 0usize;

    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        total += 1;

        let name = path.to_string_lossy();
        let res = repair(&space, &name, bytes, &options);
        if res.has_errors() {
            broken += 1;
        }
        if res.fixed() {
            fixed += 1;
        }

        let len = res.src.len();
        for node in res.index.preorder() {
            let span = res.tree.span(node);
            assert!(
                span.start <= span.end && span.end_usize() <= len,
                "{}: {node:?} at {span:?} outside {len} bytes",
                path.display()
            );
        }
        if !res.has_errors() {
            assert!(res.fixes.is_empty(), "{}: fixed a clean file", path.display());
        }
    }

    assert_eq!(space.len(), total);
    eprintln!("Repaired {total} Go files: {broken} with errors, {fixed} fixed.");
}
