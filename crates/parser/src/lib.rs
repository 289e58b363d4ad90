//! Go 1.25 lexer and error-tolerant parser.
//!
//! - The lexer uses Logos and implements Go semicolon insertion.
//! - The parser is hand-written and never fails: it returns a tree together
//!   with the list of syntax errors, reproducing the recovery shapes of
//!   `go/parser`.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod mode;
pub mod node;
mod parser;
mod parser_support;
pub mod resolve;
pub mod shift;
pub mod source;
pub mod walk;

pub use error::{ErrorList, SyntaxError};
pub use lexer::Lexer;
pub use mode::ParseMode;
pub use node::Node;
pub use source::SourceBuffer;

use crate::ast::{AstArena, IdentName, Interner, SourceFile, Span};
use crate::resolve::FileScope;

/// A parsed file: arena, interned names, root and (optionally) its scope.
#[derive(Debug)]
pub struct SyntaxTree {
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
    pub scope: Option<FileScope>,
}

impl SyntaxTree {
    #[inline]
    pub fn span(&self, node: Node) -> Span {
        node.span(&self.arena, &self.file)
    }

    #[inline]
    pub fn children(&self, node: Node) -> smallvec::SmallVec<[Node; 8]> {
        node.children(&self.arena, &self.file)
    }

    #[inline]
    pub fn name(&self, ident: IdentName) -> &str {
        self.interner.resolve(ident.sym)
    }
}

/// Parses one file. Errors never abort the parse.
pub fn parse_file(buf: &SourceBuffer, mode: ParseMode) -> (SyntaxTree, ErrorList) {
    let mut arena = AstArena::new();
    let mut interner = Interner::new();
    let (file, errors) = parse_file_into(&mut arena, &mut interner, buf, mode);
    let scope = (!mode.contains(ParseMode::SKIP_OBJECT_RESOLUTION))
        .then(|| resolve::resolve_file(&arena, &interner, &file));
    let tree = SyntaxTree {
        arena,
        interner,
        file,
        scope,
    };
    (tree, errors)
}

/// Parses `buf` into an arena that may already hold other trees; new nodes
/// are appended after `arena.mark()`.
pub fn parse_file_into(
    arena: &mut AstArena,
    interner: &mut Interner,
    buf: &SourceBuffer,
    mode: ParseMode,
) -> (SourceFile, ErrorList) {
    parser::parse_into(arena, interner, buf, mode)
}
