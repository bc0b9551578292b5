//! Arena-backed call tree
//!
//! The tree owns all nodes in a single `Vec`; parent links are non-owning
//! indices and each node owns the list of its children's indices. This
//! keeps backward (child → parent) traversal cheap without reference
//! cycles, and a [`NodeId`] stays valid for the lifetime of the tree.
//!
//! The tree is built by the upstream span aligner and is read-only here;
//! conversion never mutates it, so one tree can be flattened repeatedly
//! (e.g. full view and filtered view).

use crate::span::SpanAlignment;
use std::fmt;

/// Index of one node inside its [`CallTree`] arena.
///
/// Only meaningful for the tree that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node:{}", self.0)
    }
}

#[derive(Debug)]
struct Node {
    value: SpanAlignment,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Hierarchical structure linking spans by caller/callee relationship.
///
/// A tree always has a root; it is created around the root's alignment.
#[derive(Debug)]
pub struct CallTree {
    nodes: Vec<Node>,
}

impl CallTree {
    /// Create a tree holding only the root alignment.
    pub fn new(root: SpanAlignment) -> Self {
        Self { nodes: vec![Node { value: root, parent: None, children: Vec::new() }] }
    }

    /// The root node. Always index 0.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a child under `parent`, preserving insertion order among
    /// siblings. Returns the new node's id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_child(&mut self, parent: NodeId, value: SpanAlignment) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { value, parent: Some(parent), children: Vec::new() });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// The alignment stored at `node`.
    pub fn value(&self, node: NodeId) -> &SpanAlignment {
        &self.nodes[node.0].value
    }

    /// Structural parent of `node`; `None` only for the root.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Children of `node` in insertion order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Number of nodes in the tree (always >= 1).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A call tree is never empty; provided for lint symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth-first pre-order traversal starting at the root: each node is
    /// yielded before its children, siblings in insertion order. This is
    /// the display order of the call stack view.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst { tree: self, stack: vec![self.root()] }
    }
}

/// Iterator over a [`CallTree`] in depth-first pre-order.
#[derive(Debug)]
pub struct DepthFirst<'a> {
    tree: &'a CallTree,
    stack: Vec<NodeId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        // Reverse push so the first child is popped first
        for &child in self.tree.children(node).iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
