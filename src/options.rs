//! Configuration for the conversion pipeline.
//!
//! The `Options` struct is the single immutable context passed through
//! every stage: archive extraction, file decoding, document selection,
//! pre-cleaning and batch processing.

use std::path::PathBuf;

/// Maximum size of a single archive entry (100 MB).
///
/// Entries exceeding this limit are skipped during extraction.
pub const DEFAULT_MAX_ENTRY_SIZE: u64 = 100_000_000;

/// Configuration options for the conversion pipeline.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use tex2corpus::Options;
///
/// let options = Options {
///     force: true,
///     debug: true,
///     ..Options::default()
/// };
/// assert_eq!(options.archive_suffix, ".tar.gz");
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Character encodings tried in order when reading a source file.
    ///
    /// Labels are resolved with the WHATWG label table, so `latin-1` and
    /// `iso-8859-1` both resolve to windows-1252.
    ///
    /// Default: `["utf-8", "latin-1", "iso-8859-1"]`
    pub encodings: Vec<String>,

    /// File-name suffix identifying archives in the input folder.
    ///
    /// Default: `".tar.gz"`
    pub archive_suffix: String,

    /// Extension of source-document files (without the dot).
    ///
    /// Default: `"tex"`
    pub source_extension: String,

    /// Substring marking the main document of a bundle.
    ///
    /// Default: `"\documentclass"`
    pub document_class_marker: String,

    /// Report every block removed by the markup pre-cleaner.
    ///
    /// Default: `false`
    pub debug: bool,

    /// Reprocess archives whose output text file already exists.
    ///
    /// Default: `false`
    pub force: bool,

    /// Number of characters shown when previewing a removed block.
    ///
    /// Default: `100`
    pub preview_chars: usize,

    /// Treat a gzip stream that is not a tar archive as a single
    /// compressed source file (arXiv single-file submissions).
    ///
    /// Default: `true`
    pub accept_bare_gzip: bool,

    /// Maximum size of a single extracted entry, in bytes.
    ///
    /// Default: `100_000_000`
    pub max_entry_size: u64,

    /// Parent directory for per-archive scratch directories.
    ///
    /// Default: `None` (system temp directory)
    pub scratch_dir: Option<PathBuf>,
}

impl Options {
    /// File stem of an archive name, or `None` if it lacks the archive suffix.
    ///
    /// ```rust
    /// use tex2corpus::Options;
    ///
    /// let options = Options::default();
    /// assert_eq!(options.archive_stem("2101.00001.tar.gz"), Some("2101.00001"));
    /// assert_eq!(options.archive_stem("notes.zip"), None);
    /// ```
    #[must_use]
    pub fn archive_stem<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.archive_suffix.as_str())
            .filter(|stem| !stem.is_empty())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            encodings: vec![
                "utf-8".to_string(),
                "latin-1".to_string(),
                "iso-8859-1".to_string(),
            ],
            archive_suffix: ".tar.gz".to_string(),
            source_extension: "tex".to_string(),
            document_class_marker: r"\documentclass".to_string(),
            debug: false,
            force: false,
            preview_chars: 100,
            accept_bare_gzip: true,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            scratch_dir: None,
        }
    }
}
