//! Intra-tree relationship graph using petgraph::StableDiGraph

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::model::NodeId;

/// What kind of relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    /// Source node references (calls, reads, instantiates) the target.
    Use,
    /// Source node is a subtype of the target.
    Subtype,
}

/// A typed directed edge between two nodes of the same tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub source: NodeId,
    pub target: NodeId,
}

/// Relationship graph over one tree's nodes, read-only after build.
///
/// Reverse-edge queries go through an index built once at construction, so
/// `referencers` costs only the size of its answer.
#[derive(Debug)]
pub struct RelationGraph {
    inner: StableDiGraph<NodeId, RelationshipKind>,
    /// (target, kind) -> referencing sources, in edge-insertion order.
    reverse: HashMap<(NodeId, RelationshipKind), Vec<NodeId>>,
}

impl RelationGraph {
    /// Build the graph and its reverse index. One graph node is created per
    /// tree node so arena ids map 1:1 onto petgraph indices.
    pub(crate) fn build(node_count: usize, relationships: &[Relationship]) -> Self {
        let mut inner = StableDiGraph::with_capacity(node_count, relationships.len());
        for i in 0..node_count {
            inner.add_node(NodeId(i as u32));
        }
        let mut reverse: HashMap<(NodeId, RelationshipKind), Vec<NodeId>> = HashMap::new();
        for rel in relationships {
            inner.add_edge(
                NodeIndex::new(rel.source.index()),
                NodeIndex::new(rel.target.index()),
                rel.kind,
            );
            reverse
                .entry((rel.target, rel.kind))
                .or_default()
                .push(rel.source);
        }
        RelationGraph { inner, reverse }
    }

    /// Total number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// All nodes referencing `target` through `kind`, in insertion order.
    pub fn referencers(&self, target: NodeId, kind: RelationshipKind) -> &[NodeId] {
        self.reverse
            .get(&(target, kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All nodes `source` references through `kind`, in insertion order.
    pub fn targets(&self, source: NodeId, kind: RelationshipKind) -> Vec<NodeId> {
        let idx = NodeIndex::new(source.index());
        let mut out: Vec<NodeId> = self
            .inner
            .edges_directed(idx, Direction::Outgoing)
            .filter(|edge_ref| *edge_ref.weight() == kind)
            .map(|edge_ref| NodeId(edge_ref.target().index() as u32))
            .collect();
        // edges_directed walks the newest edge first
        out.reverse();
        out
    }

    /// Check if a relationship of a specific kind exists between two nodes.
    pub fn has_relationship_between(
        &self,
        source: NodeId,
        target: NodeId,
        kind: RelationshipKind,
    ) -> bool {
        self.targets(source, kind).contains(&target)
    }

    /// Every relationship in insertion order.
    pub fn relationships(&self) -> Vec<Relationship> {
        self.inner
            .edge_indices()
            .filter_map(|idx| {
                let (source, target) = self.inner.edge_endpoints(idx)?;
                let kind = *self.inner.edge_weight(idx)?;
                Some(Relationship {
                    kind,
                    source: NodeId(source.index() as u32),
                    target: NodeId(target.index() as u32),
                })
            })
            .collect()
    }
}
