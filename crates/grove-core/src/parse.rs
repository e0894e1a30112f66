//! External parsing contracts
//!
//! Grove never parses source text itself. Per-language parsers and
//! tokenizers are supplied by the caller through these traits.

use crate::source::SourceFileSet;
use crate::tree::Tree;

/// Parses a set of source files into a structural tree.
///
/// One implementation exists per source language; the engine only sees the
/// resulting tree.
pub trait TreeParser {
    fn parse(&self, files: &SourceFileSet) -> anyhow::Result<Tree>;
}

/// Splits a source slice into the tokens representation building consumes.
pub trait SourceTokenizer {
    fn tokenize(&self, source: &str) -> Vec<String>;
}
