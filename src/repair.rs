//! The repair loop: parse, patch the tree, patch the bytes, parse again.

use std::sync::Arc;

use difference::{Changeset, Difference};
use go125_parser::{parse_file, SourceBuffer};
use tracing::{debug, debug_span, trace, warn};

use crate::fix::fix_ast;
use crate::nav::NodeIndex;
use crate::position::PositionSpace;
use crate::result::{ParseResult, RepairOptions};
use crate::scan::{bad_nodes, purge_buffer};
use crate::src_fix::fix_src;

/// Upper bound on byte-level repairs per session.
pub const MAX_SRC_FIXES: usize = 10;

/// Parses `bytes` as the file `name`, repairing the tree when the source has
/// syntax errors.
///
/// The returned tree always belongs to the returned bytes. Errors are those
/// of the first parse, before any repair; the file is registered in `space`
/// once, with its final size.
pub fn repair(
    space: &Arc<PositionSpace>,
    name: &str,
    bytes: impl Into<Vec<u8>>,
    options: &RepairOptions,
) -> ParseResult {
    let mut src = SourceBuffer::new(bytes);
    if options.purge_func_bodies {
        src = purge_buffer(&src);
    }

    let session = debug_span!("parse_go_src", file = name);
    let _enter = session.enter();

    let mode = options.mode;
    let (mut tree, errors) = parse_file(&src, mode);
    let mut fixes = Vec::new();
    let mut fixed_src = false;
    let mut fixed_ast = false;

    if !errors.is_empty() {
        let bad = bad_nodes(&tree);
        debug!(errors = errors.len(), bad_stmts = bad.stmts, bad_exprs = bad.exprs, "repairing");
        let ast_fixes = fix_ast(&mut tree, &src);
        fixed_ast = !ast_fixes.is_empty();
        fixes.extend(ast_fixes);

        for round in 0..MAX_SRC_FIXES {
            let Some((new_src, fix)) = fix_src(&tree, &src) else {
                break;
            };
            if round == MAX_SRC_FIXES - 1 {
                warn!(
                    diff = %line_diff(src.as_str(), new_src.as_str()),
                    "source fixes did not converge; last change"
                );
            }

            let (new_tree, new_errors) = parse_file(&new_src, mode);
            tree = new_tree;
            src = new_src;
            trace!(target: "go125_repair::fix", %fix, round, "applied source fix");
            fixes.push(fix);
            fixed_src = true;

            if new_errors.is_empty() {
                break;
            }
            let ast_fixes = fix_ast(&mut tree, &src);
            fixed_ast = !ast_fixes.is_empty();
            fixes.extend(ast_fixes);
        }

        let bad = bad_nodes(&tree);
        debug!(fixes = fixes.len(), bad_stmts = bad.stmts, bad_exprs = bad.exprs, "repair finished");
    }

    let file = space.add_file(name, src.len());
    let index = NodeIndex::build(&tree);
    ParseResult {
        name: name.to_string(),
        mode,
        src,
        tree,
        index,
        space: Arc::clone(space),
        file,
        errors,
        fixes,
        fixed_src,
        fixed_ast,
    }
}

/// Same as [`repair`].
#[inline]
pub fn parse(
    space: &Arc<PositionSpace>,
    name: &str,
    bytes: impl Into<Vec<u8>>,
    options: &RepairOptions,
) -> ParseResult {
    repair(space, name, bytes, options)
}

/// Line diff, one line per entry, prefixed with ` `, `+` or `-`.
fn line_diff(before: &str, after: &str) -> String {
    let changeset = Changeset::new(before, after, "\n");
    let mut out = String::new();
    for diff in &changeset.diffs {
        let (prefix, text) = match diff {
            Difference::Same(x) => (' ', x),
            Difference::Add(x) => ('+', x),
            Difference::Rem(x) => ('-', x),
        };
        for line in text.split('\n') {
            out.push(prefix);
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_marks_changed_lines() {
        let diff = line_diff("a\nif x\nb", "a\nif x{}\nb");
        assert!(diff.contains("-if x\n"));
        assert!(diff.contains("+if x{}\n"));
        assert!(diff.contains(" a\n"));
    }
}
