//! Depth-first index over a finished tree.

use std::collections::HashMap;

use go125_parser::ast::Span;
use go125_parser::{Node, SyntaxTree};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy)]
struct Entry {
    node: Node,
    span: Span,
    parent: Option<u32>,
    /// Index one past the last descendant.
    end: u32,
}

/// Preorder listing of every node with parent links.
#[derive(Debug, Default)]
pub struct NodeIndex {
    entries: Vec<Entry>,
    by_node: HashMap<Node, u32>,
}

impl NodeIndex {
    pub fn build(tree: &SyntaxTree) -> Self {
        let mut index = NodeIndex::default();
        // `Err(at)` closes the subtree rooted at entry `at`.
        let mut work: Vec<Result<(Node, Option<u32>), u32>> = vec![Ok((Node::File, None))];
        while let Some(step) = work.pop() {
            match step {
                Ok((node, parent)) => {
                    let at = index.push(tree, node, parent);
                    work.push(Err(at));
                    let children = tree.children(node);
                    work.extend(children.into_iter().rev().map(|c| Ok((c, Some(at)))));
                }
                Err(at) => index.entries[at as usize].end = index.entries.len() as u32,
            }
        }
        index
    }

    fn push(&mut self, tree: &SyntaxTree, node: Node, parent: Option<u32>) -> u32 {
        let at = self.entries.len() as u32;
        self.entries.push(Entry {
            node,
            span: tree.span(node),
            parent,
            end: at + 1,
        });
        self.by_node.insert(node, at);
        at
    }

    #[inline]
    pub fn root(&self) -> Node {
        Node::File
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, node: Node) -> bool {
        self.by_node.contains_key(&node)
    }

    pub fn parent(&self, node: Node) -> Option<Node> {
        let at = *self.by_node.get(&node)?;
        let parent = self.entries[at as usize].parent?;
        Some(self.entries[parent as usize].node)
    }

    /// Immediate children in source order.
    pub fn children(&self, node: Node) -> SmallVec<[Node; 8]> {
        let mut out = SmallVec::new();
        let Some(&at) = self.by_node.get(&node) else {
            return out;
        };
        let end = self.entries[at as usize].end;
        let mut i = at + 1;
        while i < end {
            let entry = &self.entries[i as usize];
            out.push(entry.node);
            i = entry.end;
        }
        out
    }

    /// Every node, parents before children.
    pub fn preorder(&self) -> impl Iterator<Item = Node> + '_ {
        self.entries.iter().map(|e| e.node)
    }

    /// Deepest node whose span contains `offset` (end inclusive).
    pub fn innermost(&self, offset: usize) -> Option<Node> {
        let offset = u32::try_from(offset).ok()?;
        let root = self.entries.first()?;
        if !root.span.contains(offset) {
            return None;
        }
        let mut best = 0u32;
        let mut i = 1u32;
        let mut end = root.end;
        while i < end {
            let entry = &self.entries[i as usize];
            if entry.span.contains(offset) {
                best = i;
                end = entry.end;
                i += 1;
            } else {
                i = entry.end;
            }
        }
        Some(self.entries[best as usize].node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use go125_parser::ast::{Expr, Stmt};
    use go125_parser::{parse_file, ParseMode, SourceBuffer};

    fn index(src: &str) -> (SyntaxTree, NodeIndex) {
        let (tree, _) = parse_file(&SourceBuffer::from_text(src), ParseMode::FULL);
        let index = NodeIndex::build(&tree);
        (tree, index)
    }

    #[test]
    fn parents_and_children_agree() {
        let (_, index) = index("package p\nfunc f() {\n\tx := 1\n\tg(x)\n}\n");
        assert_eq!(index.preorder().next(), Some(Node::File));
        for node in index.preorder() {
            for child in index.children(node) {
                assert_eq!(index.parent(child), Some(node));
            }
        }
        assert_eq!(index.parent(Node::File), None);
    }

    #[test]
    fn innermost_finds_identifier() {
        let src = "package p\nfunc f() {\n\tg(abc)\n}\n";
        let (tree, index) = index(src);
        let at = src.find("abc").unwrap() + 1;
        let Some(Node::Expr(id)) = index.innermost(at) else {
            panic!("expected an expression");
        };
        assert!(matches!(tree.arena.exprs[id], Expr::Ident(..)));

        let Some(Node::Expr(call)) = index.parent(Node::Expr(id)) else {
            panic!("expected the call");
        };
        assert!(matches!(tree.arena.exprs[call], Expr::Call { .. }));
        let Some(Node::Simple(_)) = index.parent(Node::Expr(call)) else {
            panic!("expected the expression statement");
        };
    }

    #[test]
    fn innermost_outside_the_file() {
        let (tree, index) = index("package p\n");
        assert_eq!(index.innermost(100), None);
        assert_eq!(index.innermost(0), Some(Node::File));
        assert!(!tree.arena.stmts.iter().any(|(_, s, _)| matches!(s, Stmt::Bad(_))));
    }
}
