//! Synthetic files, trees, and oracles for engine tests

use grove_core::{
    Location, Node, SourceFile, SourceFileSet, SourceTokenizer, Tree, TreeBuilder, TreeParser,
};

use crate::similarity::SourceRepresentationBuilder;

/// Parser stub for tests that hand the engine already-built trees.
pub struct UnusedParser;

impl TreeParser for UnusedParser {
    fn parse(&self, _files: &SourceFileSet) -> anyhow::Result<Tree> {
        Ok(TreeBuilder::new().build())
    }
}

/// Splits on anything that is not alphanumeric or `_`. Adequate for
/// fixtures; real tokenizers are supplied per language by the caller.
pub struct SimpleTokenizer;

impl SourceTokenizer for SimpleTokenizer {
    fn tokenize(&self, source: &str) -> Vec<String> {
        source
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Oracle returning one fixed score for every pair, for threshold tests.
pub struct FixedScore(pub f64);

impl SourceRepresentationBuilder for FixedScore {
    type Repr = ();

    fn build(&self, _node: &Node, _tokens: Vec<String>) {}

    fn similarity(&self, _a: &(), _b: &()) -> f64 {
        self.0
    }

    fn partial_similarity(&self, _a: &(), _b: &()) -> f64 {
        self.0
    }

    fn subtract(&self, _a: &(), _b: &()) {}
}

/// Accumulates one synthetic source file and hands out spans into it.
pub struct FileFixture {
    path: &'static str,
    content: String,
}

impl FileFixture {
    pub fn new(path: &'static str) -> Self {
        FileFixture {
            path,
            content: String::new(),
        }
    }

    /// Append a snippet and return its span.
    pub fn span(&mut self, snippet: &str) -> Location {
        let begin = self.content.len();
        self.content.push_str(snippet);
        self.content.push('\n');
        Location::new(self.path, begin, begin + snippet.len())
    }

    pub fn into_file(self) -> SourceFile {
        SourceFile::new(self.path, self.content)
    }
}
