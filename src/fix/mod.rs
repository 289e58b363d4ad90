//! Tree-level repairs.
//!
//! One preorder pass over the tree. Each repair looks at a single node and
//! its immediate parent; the bytes are never touched, so positions keep
//! pointing into the buffer the tree was parsed from.

mod array_type;
mod defer_go;
mod empty_switch;
mod init_stmt;
mod phantom;

use go125_parser::ast::{Expr, ExprId, Stmt, StmtId};
use go125_parser::{Node, SourceBuffer, SyntaxTree};
use tracing::trace;

use crate::result::FixKind;

/// Runs every tree repair once over `tree`, returning the repairs applied.
pub(crate) fn fix_ast(tree: &mut SyntaxTree, src: &SourceBuffer) -> Vec<FixKind> {
    let mut pass = FixPass {
        tree,
        src,
        stack: Vec::new(),
        fixes: Vec::new(),
    };
    pass.run();
    pass.fixes
}

struct FixPass<'a> {
    tree: &'a mut SyntaxTree,
    src: &'a SourceBuffer,
    /// Ancestors of the node being visited, innermost last.
    stack: Vec<Node>,
    fixes: Vec<FixKind>,
}

enum Step {
    Visit(Node),
    Leave,
}

/// What to do after a node was looked at.
enum Next {
    Descend,
    /// The node was replaced; visit the replacement under the same parent.
    Revisit(Node),
    Skip,
}

impl FixPass<'_> {
    /// Preorder walk with an explicit work list.
    fn run(&mut self) {
        let mut work = vec![Step::Visit(Node::File)];
        while let Some(step) = work.pop() {
            let node = match step {
                Step::Visit(node) => node,
                Step::Leave => {
                    self.stack.pop();
                    continue;
                }
            };
            match self.visit(node) {
                Next::Descend => {
                    self.stack.push(node);
                    work.push(Step::Leave);
                    let children = self.tree.children(node);
                    work.extend(children.into_iter().rev().map(Step::Visit));
                }
                Next::Revisit(node) => work.push(Step::Visit(node)),
                Next::Skip => {}
            }
        }
    }

    fn visit(&mut self, node: Node) -> Next {
        let parent = self.stack.last().copied();
        match node {
            Node::Stmt(id) => match self.tree.arena.stmts[id] {
                Stmt::Bad(_) => {
                    return match parent.and_then(|parent| self.fix_bad_stmt(id, parent)) {
                        Some(stmt) => Next::Revisit(Node::Stmt(stmt)),
                        None => Next::Skip,
                    };
                }
                Stmt::Switch { .. } | Stmt::TypeSwitch { .. } | Stmt::Select { .. } => {
                    if empty_switch::fix(self.tree, self.src, id) {
                        self.record(FixKind::EmptySwitch, node);
                    }
                }
                _ => {}
            },
            Node::Expr(id) => match self.tree.arena.exprs[id] {
                Expr::Bad(_) => {
                    return match parent.and_then(|parent| self.fix_bad_expr(id, parent)) {
                        Some(expr) => Next::Revisit(Node::Expr(expr)),
                        None => Next::Skip,
                    };
                }
                Expr::Selector { .. } => {
                    if phantom::fix(self.tree, self.src, id) {
                        self.record(FixKind::PhantomSelector, node);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        Next::Descend
    }

    fn fix_bad_stmt(&mut self, bad: StmtId, parent: Node) -> Option<StmtId> {
        let stmt = defer_go::fix(self.tree, self.src, bad, parent);
        match stmt {
            Some(stmt) => self.record(FixKind::DeferOrGo, Node::Stmt(stmt)),
            None => trace!(?bad, "bad statement left as is"),
        }
        stmt
    }

    fn fix_bad_expr(&mut self, bad: ExprId, parent: Node) -> Option<ExprId> {
        if let Some(expr) = array_type::fix(self.tree, self.src, bad, parent) {
            self.record(FixKind::ArrayType, Node::Expr(expr));
            return Some(expr);
        }
        if init_stmt::fix(self.tree, self.src, bad, parent) {
            self.record(FixKind::InitStmt, parent);
        } else {
            trace!(?bad, "bad expression left as is");
        }
        None
    }

    fn record(&mut self, fix: FixKind, node: Node) {
        let span = self.tree.span(node);
        trace!(%fix, start = span.start, end = span.end, "applied tree fix");
        self.fixes.push(fix);
    }
}
