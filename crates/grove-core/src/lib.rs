//! Grove Core — structural tree model, relationship graph, and parsing contracts

pub mod error;
pub mod graph;
pub mod model;
pub mod parse;
pub mod source;
pub mod tree;


#[cfg(test)]
pub mod test_utils;

pub use error::Error;
pub use graph::{RelationGraph, Relationship, RelationshipKind};
pub use model::{Location, Node, NodeId, NodeKind};
pub use parse::{SourceTokenizer, TreeParser};
pub use source::{SourceFile, SourceFileSet};
pub use tree::{Tree, TreeBuilder, Walk};
