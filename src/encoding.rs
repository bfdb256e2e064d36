//! Resilient source-file decoding.
//!
//! Source files in TeX bundles come in whatever encoding the author's editor
//! used. Each file is decoded strictly with every configured encoding in
//! priority order and the first clean decode wins.

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, WINDOWS_1252};
use log::{debug, warn};

use crate::error::{Error, Result};

/// Look up one encoding label.
///
/// Accepts the WHATWG labels plus the common `latin-1`/`latin_1` spellings,
/// which WHATWG does not list. Latin-1 resolves to windows-1252.
#[must_use]
pub fn lookup_encoding(label: &str) -> Option<&'static Encoding> {
    let label = label.trim();
    Encoding::for_label(label.as_bytes()).or_else(|| {
        match label.to_ascii_lowercase().replace('_', "-").as_str() {
            "latin-1" => Some(WINDOWS_1252),
            other => Encoding::for_label(other.as_bytes()),
        }
    })
}

/// Resolve encoding labels to `encoding_rs` encodings, preserving order.
///
/// Unknown labels are dropped with a warning.
#[must_use]
pub fn resolve_encodings(labels: &[String]) -> Vec<(&str, &'static Encoding)> {
    labels
        .iter()
        .filter_map(|label| match lookup_encoding(label) {
            Some(encoding) => Some((label.as_str(), encoding)),
            None => {
                warn!("Ignoring unknown encoding label: {label}");
                None
            }
        })
        .collect()
}

/// Decode bytes with a single encoding, failing on any malformed sequence.
///
/// No BOM sniffing and no replacement characters.
#[must_use]
pub fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(std::borrow::Cow::into_owned)
}

/// Decode bytes with the first encoding that succeeds.
///
/// Returns the decoded text together with the label that worked.
///
/// # Examples
///
/// ```
/// use tex2corpus::encoding::decode_with_fallback;
///
/// let labels = vec!["utf-8".to_string(), "latin-1".to_string()];
/// let (text, label) = decode_with_fallback(b"Caf\xE9", &labels).unwrap();
/// assert_eq!(text, "Café");
/// assert_eq!(label, "latin-1");
/// ```
#[must_use]
pub fn decode_with_fallback<'a>(bytes: &[u8], labels: &'a [String]) -> Option<(String, &'a str)> {
    resolve_encodings(labels)
        .into_iter()
        .find_map(|(label, encoding)| decode_strict(bytes, encoding).map(|text| (text, label)))
}

/// Read a text file, trying each configured encoding in order.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Decode`]
/// (naming the path and every attempted encoding) if no encoding decodes it.
pub fn read_file_with_fallback(path: &Path, labels: &[String]) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;

    match decode_with_fallback(&bytes, labels) {
        Some((text, label)) => {
            debug!("Decoded {} as {label}", path.display());
            Ok(text)
        }
        None => Err(Error::Decode {
            path: path.to_path_buf(),
            tried: labels.to_vec(),
        }),
    }
}
