//! Core data structures for structural trees

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stable identifier of a node within its tree. Dense and creation-ordered,
/// so it doubles as an arena index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Discriminates what kind of code entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Module,
    Class,
    Interface,
    Enum,
    Function,
    Method,
    Field,
    Unknown,
}

/// Byte span of a node's source text within a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub begin: usize,
    pub end: usize,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, begin: usize, end: usize) -> Self {
        Location {
            file: file.into(),
            begin,
            end,
        }
    }
}

/// A single entity in the structural tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Local name; empty for anonymous entities.
    pub name: String,
    pub location: Location,
    /// Owning node; `None` for root-level nodes.
    pub parent: Option<NodeId>,
    /// Children in declaration order.
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}
