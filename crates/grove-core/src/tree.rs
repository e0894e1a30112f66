//! Arena-backed structural tree, immutable after build

use crate::graph::{RelationGraph, Relationship, RelationshipKind};
use crate::model::{Location, Node, NodeId, NodeKind};

/// One version of a codebase's structural tree plus its relationship graph.
///
/// Nodes live in a flat arena indexed by [`NodeId`]; parent/child ownership
/// and the cross-cutting relationship graph are index-based, so the tree is
/// cheap to clone ids out of and trivially hashable at the node level.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    relations: RelationGraph,
}

impl Tree {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Top-level nodes in declaration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of a container, or the root list for `None`.
    pub fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(id) => &self.node(id).children,
            None => &self.roots,
        }
    }

    pub fn relations(&self) -> &RelationGraph {
        &self.relations
    }

    /// Nodes referencing `target` through `kind`, in insertion order.
    pub fn referencers(&self, target: NodeId, kind: RelationshipKind) -> &[NodeId] {
        self.relations.referencers(target, kind)
    }

    /// Depth-first preorder traversal yielding each node with its nesting
    /// depth. Root-level nodes have depth 0.
    pub fn walk(&self) -> Walk<'_> {
        let mut stack: Vec<(NodeId, usize)> =
            self.roots.iter().rev().map(|id| (*id, 0)).collect();
        stack.reserve(self.nodes.len().saturating_sub(stack.len()));
        Walk { tree: self, stack }
    }
}

/// Iterator state for [`Tree::walk`].
pub struct Walk<'a> {
    tree: &'a Tree,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for Walk<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        for child in self.tree.node(id).children.iter().rev() {
            self.stack.push((*child, depth + 1));
        }
        Some((id, depth))
    }
}

/// Incrementally assembles a [`Tree`]. Nodes, children, and relationships
/// are frozen once `build` runs.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    relationships: Vec<Relationship>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node.
    pub fn add_root(
        &mut self,
        kind: NodeKind,
        name: impl Into<String>,
        location: Location,
    ) -> NodeId {
        let id = self.push_node(kind, name.into(), location, None);
        self.roots.push(id);
        id
    }

    /// Add a node owned by `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        name: impl Into<String>,
        location: Location,
    ) -> NodeId {
        let id = self.push_node(kind, name.into(), location, Some(parent));
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Record a typed relationship between two already-added nodes.
    pub fn add_relationship(&mut self, kind: RelationshipKind, source: NodeId, target: NodeId) {
        self.relationships.push(Relationship {
            kind,
            source,
            target,
        });
    }

    /// Freeze into an immutable tree with its reverse-relationship index.
    pub fn build(self) -> Tree {
        let relations = RelationGraph::build(self.nodes.len(), &self.relationships);
        tracing::debug!(
            "built tree: {} nodes, {} relationships",
            self.nodes.len(),
            relations.relationship_count()
        );
        Tree {
            nodes: self.nodes,
            roots: self.roots,
            relations,
        }
    }

    fn push_node(
        &mut self,
        kind: NodeKind,
        name: String,
        location: Location,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            kind,
            name,
            location,
            parent,
            children: Vec::new(),
        });
        id
    }
}
