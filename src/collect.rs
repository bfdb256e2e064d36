//! Source-document collection and main-document selection.
//!
//! A TeX bundle usually holds several `.tex` files: the main document plus
//! included chapters, appendices or macro files. The main document is the
//! first file that declares a document class.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::encoding::read_file_with_fallback;
use crate::error::{Error, Result};
use crate::options::Options;

/// One decoded source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocument {
    /// Path relative to the collection root, `/`-separated.
    pub name: String,
    /// Decoded file content.
    pub content: String,
}

impl SourceDocument {
    /// Create a document from a name and its content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Whether this is the empty placeholder (no name, no content).
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty() && self.content.is_empty()
    }
}

/// Source documents of one archive, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    documents: Vec<SourceDocument>,
}

impl DocumentSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document, keeping insertion order.
    pub fn push(&mut self, document: SourceDocument) {
        self.documents.push(document);
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the set holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceDocument> {
        self.documents.iter()
    }

    /// Select the main document.
    ///
    /// The first document containing `marker` wins; without a match the
    /// first document is used; an empty set yields the empty placeholder.
    ///
    /// ```rust
    /// use tex2corpus::{DocumentSet, SourceDocument};
    ///
    /// let mut set = DocumentSet::new();
    /// set.push(SourceDocument::new("macros.tex", "\\newcommand{\\R}{\\mathbb{R}}"));
    /// set.push(SourceDocument::new("paper.tex", "\\documentclass{article}"));
    /// assert_eq!(set.select_main("\\documentclass").name, "paper.tex");
    ///
    /// assert!(DocumentSet::new().select_main("\\documentclass").is_placeholder());
    /// ```
    #[must_use]
    pub fn select_main(&self, marker: &str) -> SourceDocument {
        self.documents
            .iter()
            .find(|doc| doc.content.contains(marker))
            .or_else(|| self.documents.first())
            .cloned()
            .unwrap_or_default()
    }
}

impl FromIterator<SourceDocument> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = SourceDocument>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

/// Recursively gather files with `extension`, visiting directory entries
/// in sorted order so discovery order is stable across runs.
fn collect_files_rec(dir: &Path, extension: &str, acc: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(fs::DirEntry::path);

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files_rec(&path, extension, acc)?;
        } else if file_type.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            acc.push(path);
        }
    }

    Ok(())
}

/// Relative, `/`-separated display name of a collected file.
fn document_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read every source document under `root`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the tree cannot be walked or a file cannot be
/// read, and [`Error::Decode`] if a file matches none of the configured
/// encodings.
pub fn collect_documents(root: &Path, options: &Options) -> Result<DocumentSet> {
    let mut paths = Vec::new();
    collect_files_rec(root, &options.source_extension, &mut paths)
        .map_err(|e| Error::io(root, e))?;

    let mut set = DocumentSet::new();
    for path in paths {
        let content = read_file_with_fallback(&path, &options.encodings)?;
        let name = document_name(root, &path);
        debug!("Collected {name} ({} chars)", content.chars().count());
        set.push(SourceDocument::new(name, content));
    }

    Ok(set)
}

/// Collect the documents under `root` and select the main one.
///
/// # Errors
///
/// Propagates the errors of [`collect_documents`].
pub fn find_main_document(root: &Path, options: &Options) -> Result<SourceDocument> {
    let set = collect_documents(root, options)?;
    Ok(set.select_main(&options.document_class_marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = r"\documentclass";

    #[test]
    fn marker_wins_regardless_of_order() {
        let set: DocumentSet = [
            SourceDocument::new("a.tex", "intro"),
            SourceDocument::new("b.tex", "\\documentclass{article} body"),
            SourceDocument::new("c.tex", "appendix"),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.select_main(MARKER).name, "b.tex");
    }

    #[test]
    fn first_marker_match_wins() {
        let set: DocumentSet = [
            SourceDocument::new("x.tex", "\\documentclass{book}"),
            SourceDocument::new("y.tex", "\\documentclass{article}"),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.select_main(MARKER).name, "x.tex");
    }

    #[test]
    fn falls_back_to_first_document() {
        let set: DocumentSet = [
            SourceDocument::new("first.tex", "one"),
            SourceDocument::new("second.tex", "two"),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.select_main(MARKER).name, "first.tex");
    }

    #[test]
    fn empty_set_yields_placeholder() {
        let main = DocumentSet::new().select_main(MARKER);
        assert!(main.is_placeholder());
        assert_eq!(main, SourceDocument::default());
    }

    #[test]
    fn document_name_is_relative() {
        let name = document_name(Path::new("/tmp/x"), Path::new("/tmp/x/sec/intro.tex"));
        assert_eq!(name, "sec/intro.tex");
    }
}
