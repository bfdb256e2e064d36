//! TeX-to-text conversion.
//!
//! Conversion goes through the [`LatexToText`] trait so the pipeline does
//! not care whether text comes from the built-in renderer or an external
//! program. A failed conversion never aborts a batch:
//! [`convert_or_passthrough`] logs the error and hands the pre-cleaned TeX
//! on unchanged, returning the error next to it for the caller's records.

mod command;
mod latex;

pub use command::CommandConverter;
pub use latex::{LatexConverter, DEFAULT_MAX_DEPTH};

use log::warn;

use crate::error::ConversionError;

/// A capability turning TeX-flavored source into natural-language text.
pub trait LatexToText {
    /// Convert `tex` to plain text.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] when the input cannot be converted.
    fn latex_to_text(&self, tex: &str) -> Result<String, ConversionError>;
}

/// Convert `tex`, falling back to the input itself when conversion fails.
///
/// The conversion error, if any, comes back with the fallback text.
///
/// # Example
///
/// ```rust
/// use tex2corpus::{convert::convert_or_passthrough, LatexConverter};
///
/// let (text, failure) = convert_or_passthrough(&LatexConverter::new(), r"\textbf{Bold} claim");
/// assert_eq!(text, "Bold claim");
/// assert!(failure.is_none());
/// ```
pub fn convert_or_passthrough(
    converter: &dyn LatexToText,
    tex: &str,
) -> (String, Option<ConversionError>) {
    match converter.latex_to_text(tex) {
        Ok(text) => (text, None),
        Err(e) => {
            warn!("Error converting TeX to text, using source verbatim: {e}");
            (tex.to_string(), Some(e))
        }
    }
}
