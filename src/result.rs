//! What a repair session hands back.

use std::fmt;
use std::sync::Arc;

use go125_parser::{ErrorList, ParseMode, SourceBuffer, SyntaxTree};

use crate::nav::NodeIndex;
use crate::position::{FileHandle, PositionSpace};

/// One applied repair. Recorded in the order applied; the same kind may
/// appear several times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixKind {
    /// `{}` inserted after a control clause header.
    Curlies,
    /// `_` inserted after a dangling `.`.
    DanglingSelector,
    /// Bad statement rebuilt as `go`/`defer` with a synthesized call.
    DeferOrGo,
    /// Bad expression rebuilt as an array or slice type.
    ArrayType,
    /// Header statement moved from the condition into the initializer.
    InitStmt,
    /// Synthesized selector name replaced by the keyword typed after the dot.
    PhantomSelector,
    /// Closing brace of an empty switch/select moved down one line.
    EmptySwitch,
}

impl FixKind {
    pub const fn name(self) -> &'static str {
        match self {
            FixKind::Curlies => "curlies",
            FixKind::DanglingSelector => "dangling-selector",
            FixKind::DeferOrGo => "defer-or-go",
            FixKind::ArrayType => "array-type",
            FixKind::InitStmt => "init-stmt",
            FixKind::PhantomSelector => "phantom-selector",
            FixKind::EmptySwitch => "empty-switch",
        }
    }

    /// Whether the fix rewrites source bytes (as opposed to tree nodes).
    pub const fn is_source_fix(self) -> bool {
        matches!(self, FixKind::Curlies | FixKind::DanglingSelector)
    }
}

impl fmt::Display for FixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairOptions {
    pub mode: ParseMode,
    /// Blank out top-level brace bodies before parsing.
    pub purge_func_bodies: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            mode: ParseMode::FULL,
            purge_func_bodies: false,
        }
    }
}

impl RepairOptions {
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn purging_func_bodies(mut self) -> Self {
        self.purge_func_bodies = true;
        self
    }
}

/// Final bytes and tree of a session, plus how they were obtained.
#[derive(Debug)]
pub struct ParseResult {
    pub name: String,
    pub mode: ParseMode,
    /// Bytes `tree` was parsed from; differs from the input when a source
    /// fix was applied.
    pub src: SourceBuffer,
    pub tree: SyntaxTree,
    pub index: NodeIndex,
    pub space: Arc<PositionSpace>,
    pub file: FileHandle,
    /// Errors of the first parse, before any repair.
    pub errors: ErrorList,
    pub fixes: Vec<FixKind>,
    pub fixed_src: bool,
    pub fixed_ast: bool,
}

impl ParseResult {
    /// Whether positions in the tree may not match what the user typed.
    #[inline]
    pub fn fixed(&self) -> bool {
        self.fixed_src || self.fixed_ast
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
