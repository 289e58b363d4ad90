//! Syntax error recovery for Go source that is being edited.
//!
//! [`repair`] parses a file with `go125_parser` and, when the parse reports
//! errors, patches the result until it stops improving:
//!
//! - tree fixes rewrite bad statements and expressions in place
//!   (`go`/`defer` without a call, lone array types, misplaced header
//!   statements, keyword selectors, empty switch bodies);
//! - source fixes insert a few bytes (`{}` after a header, `_` after a
//!   dangling dot) and force a re-parse, at most ten times.
//!
//! The result keeps the errors of the first parse and records every fix
//! applied, so callers know positions may not match what was typed.

mod fix;
mod nav;
mod position;
mod remap;
mod repair;
mod replace;
mod result;
mod scan;
mod snippet;
mod src_fix;

pub use nav::NodeIndex;
pub use position::{FileHandle, Pos, PositionSpace};
pub use repair::{parse, repair, MAX_SRC_FIXES};
pub use replace::{replace, Child};
pub use result::{FixKind, ParseResult, RepairOptions};
pub use scan::purge_func_bodies;
pub use snippet::SnippetError;

pub use go125_parser::{
    ast, parse_file, ErrorList, Node, ParseMode, SourceBuffer, SyntaxError, SyntaxTree,
};
