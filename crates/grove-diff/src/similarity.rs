//! Source representations and similarity scoring
//!
//! The matching engine treats a node's source representation as opaque; it
//! only compares representations through the oracle contract below. One
//! oracle implementation exists per source language. [`TokenBagBuilder`] is
//! the language-independent default over plain token multisets.

use std::collections::HashMap;

use grove_core::Node;
use serde::{Deserialize, Serialize};

/// Builds and compares opaque source representations.
pub trait SourceRepresentationBuilder {
    /// Representation of one node's source tokens.
    type Repr;

    /// Derive a node's representation from its source tokens.
    fn build(&self, node: &Node, tokens: Vec<String>) -> Self::Repr;

    /// Symmetric similarity in [0, 1].
    fn similarity(&self, a: &Self::Repr, b: &Self::Repr) -> f64;

    /// How much of `a` is contained in `b`, in [0, 1]. Asymmetric.
    fn partial_similarity(&self, a: &Self::Repr, b: &Self::Repr) -> f64;

    /// Representation of the tokens of `a` absent from `b`.
    fn subtract(&self, a: &Self::Repr, b: &Self::Repr) -> Self::Repr;
}

/// A multiset of source tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenBag {
    counts: HashMap<String, u32>,
    total: u32,
}

impl TokenBag {
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        let mut counts: HashMap<String, u32> = HashMap::new();
        let total = tokens.len() as u32;
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
        TokenBag { counts, total }
    }

    /// Token count including multiplicity.
    pub fn len(&self) -> usize {
        self.total as usize
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Size of the multiset intersection with `other`.
    fn overlap(&self, other: &TokenBag) -> u32 {
        self.counts
            .iter()
            .map(|(token, count)| (*count).min(other.counts.get(token).copied().unwrap_or(0)))
            .sum()
    }
}

/// Multiset oracle: Sørensen–Dice similarity, containment-ratio partial
/// similarity, saturating multiset subtraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenBagBuilder;

impl SourceRepresentationBuilder for TokenBagBuilder {
    type Repr = TokenBag;

    fn build(&self, _node: &Node, tokens: Vec<String>) -> TokenBag {
        TokenBag::from_tokens(tokens)
    }

    fn similarity(&self, a: &TokenBag, b: &TokenBag) -> f64 {
        if a.total == 0 && b.total == 0 {
            return 1.0;
        }
        2.0 * a.overlap(b) as f64 / (a.total + b.total) as f64
    }

    fn partial_similarity(&self, a: &TokenBag, b: &TokenBag) -> f64 {
        // An empty representation is never "contained" anywhere
        if a.total == 0 {
            return 0.0;
        }
        a.overlap(b) as f64 / a.total as f64
    }

    fn subtract(&self, a: &TokenBag, b: &TokenBag) -> TokenBag {
        let mut counts: HashMap<String, u32> = HashMap::new();
        let mut total = 0;
        for (token, count) in &a.counts {
            let remaining = count.saturating_sub(b.counts.get(token).copied().unwrap_or(0));
            if remaining > 0 {
                counts.insert(token.clone(), remaining);
                total += remaining;
            }
        }
        TokenBag { counts, total }
    }
}
