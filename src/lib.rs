//! # tex2corpus
//!
//! Turns folders of LaTeX source archives (arXiv-style `.tar.gz` bundles)
//! into plain natural-language text for corpus building.
//!
//! Each archive goes through the same pipeline: extract, collect the `.tex`
//! files with a tolerant decoder, pick the main document, strip tables,
//! figures and math, convert the remaining TeX to text, and normalize the
//! result. A batch driver runs the pipeline over a folder and records
//! per-archive statistics in a CSV table.
//!
//! ## Quick Start
//!
//! ```rust
//! use tex2corpus::clean_tex;
//!
//! let tex = "See \\cite{foo2020} and Table~1.\n\n\
//!            \\begin{table}\\begin{tabular}A & B\\end{tabular}\\end{table}\n\n\
//!            Result: $x=1$ holds.";
//! assert_eq!(clean_tex(tex), "See  and Table 1.\n\nResult: holds.");
//! ```
//!
//! ## Features
//!
//! - **Archive Extraction**: tar.gz bundles, single-file archives and bare
//!   gzip submissions, with path sanitization and size limits
//! - **Resilient Decoding**: ordered encoding fallback per source file
//! - **Markup Pre-Cleaning**: tables, figures and math removed in a fixed order
//! - **Pluggable Conversion**: built-in TeX renderer or any external command
//! - **Normalization**: encoding repair, command stripping, line unwrapping
//! - **Idempotent Batches**: already-converted archives are skipped

mod error;
mod options;
mod patterns;

/// Source archive extraction.
pub mod archive;

/// Batch driver and single-archive pipeline.
pub mod batch;

/// Source-document collection and main-document selection.
pub mod collect;

/// TeX-to-text converters.
pub mod convert;

/// Encoding fallback when reading source files.
pub mod encoding;

/// Post-conversion text normalization.
pub mod normalize;

/// Table, figure and math removal from TeX source.
pub mod preclean;

/// Encoding-artifact repair for text.
pub mod sanitize;

/// Per-archive statistics table.
pub mod stats;

// Public API - re-exports
pub use batch::{process_archive, BatchDriver, BatchReport, Document};
pub use collect::{DocumentSet, SourceDocument};
pub use convert::{CommandConverter, LatexConverter, LatexToText};
pub use error::{ArchiveError, ConversionError, Error, Result};
pub use options::Options;
pub use patterns::{CITATION_PLACEHOLDER, REFERENCE_PLACEHOLDER};
pub use stats::{StatsRecord, StatsTable};

/// Cleans TeX source into plain text using default options and the
/// built-in converter.
///
/// Never fails: a conversion error falls back to the pre-cleaned source,
/// which is then normalized like converted text.
///
/// # Example
///
/// ```rust
/// use tex2corpus::clean_tex;
///
/// assert_eq!(clean_tex(r"\section{Intro} Some \textit{text}."), "Intro\n\nSome text.");
/// ```
#[must_use]
pub fn clean_tex(tex: &str) -> String {
    clean_tex_with_options(tex, &Options::default())
}

/// Cleans TeX source into plain text with custom options.
///
/// # Example
///
/// ```rust
/// use tex2corpus::{clean_tex_with_options, Options};
///
/// let options = Options {
///     debug: true,
///     ..Options::default()
/// };
/// let text = clean_tex_with_options("Mass $m$ and energy.", &options);
/// assert_eq!(text, "Mass and energy.");
/// ```
#[must_use]
pub fn clean_tex_with_options(tex: &str, options: &Options) -> String {
    clean_tex_with_converter(tex, options, &LatexConverter::new())
}

/// Cleans TeX source into plain text with a caller-supplied converter.
///
/// Runs the markup pre-cleaner, the converter and the normalizer in order.
///
/// # Example
///
/// ```rust
/// use tex2corpus::{clean_tex_with_converter, ConversionError, LatexToText, Options};
///
/// struct Upper;
///
/// impl LatexToText for Upper {
///     fn latex_to_text(&self, tex: &str) -> Result<String, ConversionError> {
///         Ok(tex.to_uppercase())
///     }
/// }
///
/// let text = clean_tex_with_converter("loud $x$ words", &Options::default(), &Upper);
/// assert_eq!(text, "LOUD WORDS");
/// ```
#[must_use]
pub fn clean_tex_with_converter(
    tex: &str,
    options: &Options,
    converter: &dyn LatexToText,
) -> String {
    clean_tex_reporting(tex, options, converter).0
}

/// Like [`clean_tex_with_converter`], also handing back a conversion
/// failure that was recovered from.
pub(crate) fn clean_tex_reporting(
    tex: &str,
    options: &Options,
    converter: &dyn LatexToText,
) -> (String, Option<ConversionError>) {
    let cleaned = preclean::preclean(tex, options);
    let (text, failure) = convert::convert_or_passthrough(converter, &cleaned);
    (normalize::normalize(&text), failure)
}
