//! Three-phase structural matching engine
//!
//! Pairs the nodes of two structural trees in three fixed phases: exact
//! container matching, similarity-driven move/rename matching, and
//! usage-guided extract matching. Every traversal and pool iteration runs
//! in node-creation order, so a comparison is deterministic end to end.

use std::cmp::Ordering;

use grove_core::{
    Error, NodeId, RelationshipKind, SourceFileSet, SourceTokenizer, Tree, TreeParser,
};
use tracing::debug;

use crate::config::MatchConfig;
use crate::result::{Correspondence, CorrespondenceKind, StructuralDiff};
use crate::similarity::SourceRepresentationBuilder;

/// Compares two versions of a codebase through the external parsing,
/// tokenization, and similarity contracts.
pub struct StructuralComparator<P, T, B> {
    parser: P,
    tokenizer: T,
    builder: B,
    config: MatchConfig,
}

impl<P, T, B> StructuralComparator<P, T, B>
where
    P: TreeParser,
    T: SourceTokenizer,
    B: SourceRepresentationBuilder,
{
    pub fn new(parser: P, tokenizer: T, builder: B) -> Self {
        StructuralComparator {
            parser,
            tokenizer,
            builder,
            config: MatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one full comparison. Any failure aborts with no partial result.
    pub fn compare(
        &self,
        files_before: &SourceFileSet,
        files_after: &SourceFileSet,
    ) -> Result<StructuralDiff, Error> {
        let before = self.parser.parse(files_before).map_err(Error::Parse)?;
        let after = self.parser.parse(files_after).map_err(Error::Parse)?;
        self.compare_trees(before, after, files_before, files_after)
    }

    /// Compare two already-built trees. The file sets are still required to
    /// slice node spans for representation building.
    pub fn compare_trees(
        &self,
        before: Tree,
        after: Tree,
        files_before: &SourceFileSet,
        files_after: &SourceFileSet,
    ) -> Result<StructuralDiff, Error> {
        let (correspondences, removed, added) = {
            let mut state = MatchState::new(
                &self.builder,
                &self.tokenizer,
                self.config.similarity_threshold,
                &before,
                &after,
                files_before,
                files_after,
            )?;
            state.run();
            (
                state.correspondences,
                state.pool_before.snapshot(),
                state.pool_after.snapshot(),
            )
        };
        Ok(StructuralDiff::new(
            before,
            after,
            correspondences,
            removed,
            added,
        ))
    }
}

/// A transient move/rename candidate; dropped once Phase 2 resolves.
#[derive(Debug, Clone, Copy)]
struct CandidateMatch {
    before: NodeId,
    after: NodeId,
    /// Tie-break depth: the deeper end of the pair.
    depth: usize,
    score: f64,
}

impl CandidateMatch {
    /// Higher score first, then deeper pair, then node-creation order.
    fn priority(a: &Self, b: &Self) -> Ordering {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(b.depth.cmp(&a.depth))
            .then(a.before.cmp(&b.before))
            .then(a.after.cmp(&b.after))
    }
}

/// Insertion-ordered membership set over a tree's dense node ids.
#[derive(Debug)]
struct Pool {
    members: Vec<bool>,
    remaining: usize,
}

impl Pool {
    fn full(len: usize) -> Self {
        Pool {
            members: vec![true; len],
            remaining: len,
        }
    }

    fn contains(&self, id: NodeId) -> bool {
        self.members[id.index()]
    }

    fn remove(&mut self, id: NodeId) {
        if std::mem::replace(&mut self.members[id.index()], false) {
            self.remaining -= 1;
        }
    }

    fn len(&self) -> usize {
        self.remaining
    }

    /// Remaining ids in node-creation order.
    fn snapshot(&self) -> Vec<NodeId> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, member)| **member)
            .map(|(index, _)| NodeId(index as u32))
            .collect()
    }
}

/// Bidirectional before/after node mapping, Vec-indexed by dense NodeId.
#[derive(Debug)]
struct NodeMapping {
    before_to_after: Vec<Option<NodeId>>,
    after_to_before: Vec<Option<NodeId>>,
}

impl NodeMapping {
    fn with_capacity(before: usize, after: usize) -> Self {
        NodeMapping {
            before_to_after: vec![None; before],
            after_to_before: vec![None; after],
        }
    }

    fn add(&mut self, before: NodeId, after: NodeId) {
        self.before_to_after[before.index()] = Some(after);
        self.after_to_before[after.index()] = Some(before);
    }

    fn after_of(&self, before: NodeId) -> Option<NodeId> {
        self.before_to_after[before.index()]
    }

    fn before_of(&self, after: NodeId) -> Option<NodeId> {
        self.after_to_before[after.index()]
    }
}

/// Matching state threaded through the three phases: unmatched pools, the
/// before/after mapping, and the precomputed representations and depths.
struct MatchState<'a, B: SourceRepresentationBuilder> {
    builder: &'a B,
    threshold: f64,
    before: &'a Tree,
    after: &'a Tree,
    reprs_before: Vec<B::Repr>,
    reprs_after: Vec<B::Repr>,
    depths_before: Vec<usize>,
    depths_after: Vec<usize>,
    pool_before: Pool,
    pool_after: Pool,
    mapping: NodeMapping,
    correspondences: Vec<Correspondence>,
}

impl<'a, B: SourceRepresentationBuilder> MatchState<'a, B> {
    /// Eagerly build every node's representation up front; a location that
    /// cannot be sliced aborts the comparison here.
    fn new<T: SourceTokenizer>(
        builder: &'a B,
        tokenizer: &T,
        threshold: f64,
        before: &'a Tree,
        after: &'a Tree,
        files_before: &SourceFileSet,
        files_after: &SourceFileSet,
    ) -> Result<Self, Error> {
        let reprs_before = build_representations(builder, tokenizer, before, files_before)?;
        let reprs_after = build_representations(builder, tokenizer, after, files_after)?;
        Ok(MatchState {
            builder,
            threshold,
            before,
            after,
            reprs_before,
            reprs_after,
            depths_before: depths(before),
            depths_after: depths(after),
            pool_before: Pool::full(before.node_count()),
            pool_after: Pool::full(after.node_count()),
            mapping: NodeMapping::with_capacity(before.node_count(), after.node_count()),
            correspondences: Vec::new(),
        })
    }

    fn run(&mut self) {
        self.match_exact_children(None, None);
        let exact = self.correspondences.len();
        debug!("phase 1: {} matches", exact);

        self.match_moves_and_renames();
        let with_moves = self.correspondences.len();
        debug!("phase 2: {} matches", with_moves - exact);

        self.match_extractions();
        debug!(
            "phase 3: {} matches, {} removed, {} added",
            self.correspondences.len() - with_moves,
            self.pool_before.len(),
            self.pool_after.len()
        );
    }

    /// Phase 1: pair identically kinded and named children of a matched
    /// container pair. First-found wins per parent scan, in creation order.
    fn match_exact_children(
        &mut self,
        parent_before: Option<NodeId>,
        parent_after: Option<NodeId>,
    ) {
        let before = self.before;
        let after = self.after;
        let before_children: Vec<NodeId> = before
            .children(parent_before)
            .iter()
            .copied()
            .filter(|id| self.pool_before.contains(*id))
            .collect();
        let after_children: Vec<NodeId> = after
            .children(parent_after)
            .iter()
            .copied()
            .filter(|id| self.pool_after.contains(*id))
            .collect();
        for n1 in before_children {
            for n2 in &after_children {
                if self.same_name(n1, *n2) && self.same_kind(n1, *n2) {
                    self.accept(CorrespondenceKind::Same, n1, *n2);
                }
            }
        }
    }

    /// Phase 2: pair remaining same-kind nodes whose representations score
    /// strictly above the threshold, best candidates first.
    fn match_moves_and_renames(&mut self) {
        let before_nodes = self.pool_before.snapshot();
        let after_nodes = self.pool_after.snapshot();
        let mut candidates = Vec::new();
        for &n1 in &before_nodes {
            for &n2 in &after_nodes {
                if !self.same_kind(n1, n2) {
                    continue;
                }
                let score = self
                    .builder
                    .similarity(&self.reprs_before[n1.index()], &self.reprs_after[n2.index()]);
                if score > self.threshold {
                    candidates.push(CandidateMatch {
                        before: n1,
                        after: n2,
                        depth: self.depths_before[n1.index()].max(self.depths_after[n2.index()]),
                        score,
                    });
                }
            }
        }
        candidates.sort_by(CandidateMatch::priority);
        for candidate in candidates {
            let kind = if self.same_name(candidate.before, candidate.after) {
                CorrespondenceKind::Move
            } else {
                CorrespondenceKind::Rename
            };
            // accept drops candidates whose nodes were consumed earlier
            self.accept(kind, candidate.before, candidate.after);
        }
    }

    /// Phase 3: attribute still-unmatched after-nodes to matched callers
    /// whose removed source fragment they absorb. Only the after-node
    /// leaves its pool; a caller may source several extractions.
    fn match_extractions(&mut self) {
        let after = self.after;
        for extracted in self.pool_after.snapshot() {
            for &caller_after in after.referencers(extracted, RelationshipKind::Use) {
                let Some(caller_before) = self.mapping.before_of(caller_after) else {
                    continue;
                };
                if self.before.node(caller_before).kind != after.node(caller_after).kind {
                    continue;
                }
                let removed = self.builder.subtract(
                    &self.reprs_before[caller_before.index()],
                    &self.reprs_after[caller_after.index()],
                );
                let score = self
                    .builder
                    .partial_similarity(&self.reprs_after[extracted.index()], &removed);
                if score > self.threshold {
                    self.correspondences.push(Correspondence {
                        kind: CorrespondenceKind::Extract,
                        before: caller_before,
                        after: extracted,
                    });
                    self.pool_after.remove(extracted);
                    // an after-node is consumed at most once
                    break;
                }
            }
        }
    }

    /// Record a correspondence if both sides are still unmatched, then give
    /// the new pair's children one pass of exact matching.
    fn accept(&mut self, kind: CorrespondenceKind, before: NodeId, after: NodeId) {
        if !self.pool_before.contains(before) || !self.pool_after.contains(after) {
            return;
        }
        debug_assert!(self.mapping.after_of(before).is_none());
        debug_assert!(self.mapping.before_of(after).is_none());
        self.correspondences.push(Correspondence {
            kind,
            before,
            after,
        });
        self.mapping.add(before, after);
        self.pool_before.remove(before);
        self.pool_after.remove(after);
        self.match_exact_children(Some(before), Some(after));
    }

    /// Names match only when both are non-empty and equal.
    fn same_name(&self, before: NodeId, after: NodeId) -> bool {
        let n1 = self.before.node(before);
        n1.has_name() && n1.name == self.after.node(after).name
    }

    fn same_kind(&self, before: NodeId, after: NodeId) -> bool {
        self.before.node(before).kind == self.after.node(after).kind
    }
}

fn build_representations<T, B>(
    builder: &B,
    tokenizer: &T,
    tree: &Tree,
    files: &SourceFileSet,
) -> Result<Vec<B::Repr>, Error>
where
    T: SourceTokenizer,
    B: SourceRepresentationBuilder,
{
    let mut reprs = Vec::with_capacity(tree.node_count());
    for node in tree.nodes() {
        let source = files.slice(&node.location)?;
        reprs.push(builder.build(node, tokenizer.tokenize(source)));
    }
    Ok(reprs)
}

fn depths(tree: &Tree) -> Vec<usize> {
    let mut depths = vec![0; tree.node_count()];
    for (id, depth) in tree.walk() {
        depths[id.index()] = depth;
    }
    depths
}
