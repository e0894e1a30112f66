//! Test fixtures for grove-core

use crate::graph::RelationshipKind;
use crate::model::{Location, NodeKind};
use crate::tree::{Tree, TreeBuilder};

/// Span into the single fixture file used by unit tests.
pub fn loc(begin: usize, end: usize) -> Location {
    Location::new("src/app.x", begin, end)
}

/// A class with two methods where the first uses the second.
pub fn sample_tree() -> Tree {
    let mut builder = TreeBuilder::new();
    let class = builder.add_root(NodeKind::Class, "Account", loc(0, 10));
    let deposit = builder.add_child(class, NodeKind::Method, "deposit", loc(10, 30));
    let log = builder.add_child(class, NodeKind::Method, "log", loc(30, 50));
    builder.add_relationship(RelationshipKind::Use, deposit, log);
    builder.build()
}
