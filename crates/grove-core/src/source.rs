//! In-memory source files and location slicing

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::model::Location;

/// A single versioned source file: path plus full text, read once up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Load a file from disk.
    pub fn from_path(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        Ok(SourceFile { path, content })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// The "before" or "after" collection of source files for one comparison.
#[derive(Debug, Clone, Default)]
pub struct SourceFileSet {
    files: Vec<SourceFile>,
}

impl SourceFileSet {
    pub fn new(files: Vec<SourceFile>) -> Self {
        SourceFileSet { files }
    }

    pub fn push(&mut self, file: SourceFile) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Find a file by path (first match).
    pub fn find(&self, path: &Path) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.path() == path)
    }

    /// Slice the text a location points at. Failing to resolve the file or
    /// the span is fatal for the whole comparison.
    pub fn slice(&self, location: &Location) -> Result<&str, Error> {
        let file = self.find(&location.file).ok_or_else(|| Error::MissingSourceFile {
            path: location.file.clone(),
        })?;
        file.content()
            .get(location.begin..location.end)
            .ok_or_else(|| Error::SpanOutOfBounds {
                path: location.file.clone(),
                begin: location.begin,
                end: location.end,
                len: file.content().len(),
            })
    }
}

impl FromIterator<SourceFile> for SourceFileSet {
    fn from_iter<I: IntoIterator<Item = SourceFile>>(iter: I) -> Self {
        SourceFileSet {
            files: iter.into_iter().collect(),
        }
    }
}
