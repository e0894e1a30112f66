//! Diff result types

use grove_core::{NodeId, Tree};
use serde::{Deserialize, Serialize};

/// How a before-node relates to an after-node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrespondenceKind {
    /// Same kind and same non-empty name, found under matching containers.
    Same,
    /// Same kind, different name, paired by similarity.
    Rename,
    /// Same kind and name, paired by similarity rather than by container.
    Move,
    /// A fragment of the before-node's body became the after-node.
    Extract,
}

/// A discovered pairing between a before-tree node and an after-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correspondence {
    pub kind: CorrespondenceKind,
    pub before: NodeId,
    pub after: NodeId,
}

/// The outcome of one comparison: both trees plus every correspondence in
/// discovery order. Read-only once handed to the caller.
#[derive(Debug)]
pub struct StructuralDiff {
    before: Tree,
    after: Tree,
    correspondences: Vec<Correspondence>,
    removed: Vec<NodeId>,
    added: Vec<NodeId>,
}

impl StructuralDiff {
    pub(crate) fn new(
        before: Tree,
        after: Tree,
        correspondences: Vec<Correspondence>,
        removed: Vec<NodeId>,
        added: Vec<NodeId>,
    ) -> Self {
        StructuralDiff {
            before,
            after,
            correspondences,
            removed,
            added,
        }
    }

    pub fn before(&self) -> &Tree {
        &self.before
    }

    pub fn after(&self) -> &Tree {
        &self.after
    }

    /// All correspondences in discovery order.
    pub fn correspondences(&self) -> &[Correspondence] {
        &self.correspondences
    }

    /// Correspondences of one kind, in discovery order.
    pub fn of_kind(&self, kind: CorrespondenceKind) -> impl Iterator<Item = &Correspondence> {
        self.correspondences.iter().filter(move |c| c.kind == kind)
    }

    /// Before-nodes with no correspondence: entities the edit removed.
    pub fn removed(&self) -> &[NodeId] {
        &self.removed
    }

    /// After-nodes with no correspondence: entities the edit added.
    pub fn added(&self) -> &[NodeId] {
        &self.added
    }

    /// The after-form of a before-node, if it was matched (extractions do
    /// not count: they pair a caller with a new entity, not with itself).
    pub fn matched_after(&self, before: NodeId) -> Option<NodeId> {
        self.correspondences
            .iter()
            .find(|c| c.kind != CorrespondenceKind::Extract && c.before == before)
            .map(|c| c.after)
    }

    /// The before-form of a matched after-node.
    pub fn matched_before(&self, after: NodeId) -> Option<NodeId> {
        self.correspondences
            .iter()
            .find(|c| c.kind != CorrespondenceKind::Extract && c.after == after)
            .map(|c| c.before)
    }
}
