//! Error types for tex2corpus.
//!
//! Only [`Error::Decode`] is fatal for an individual archive. Archive,
//! conversion and cleanup failures are recoverable and are returned as
//! typed values so the caller picks the fallback explicitly.

use std::path::PathBuf;

/// Error type for corpus conversion operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No encoding in the fallback list could decode a source file.
    #[error("Failed to decode {} with encodings [{}]", path.display(), tried.join(", "))]
    Decode {
        /// File that could not be decoded.
        path: PathBuf,
        /// Encoding labels attempted, in order.
        tried: Vec<String>,
    },

    /// The archive was invalid or could not be extracted.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The TeX-to-text step failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// A scratch directory could not be removed.
    #[error("Failed to remove scratch directory {}: {source}", path.display())]
    Cleanup {
        /// Scratch directory that was left behind.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Filesystem failure outside of archive extraction.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Statistics table could not be written.
    #[error("Failed to write statistics: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Wraps an I/O error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures while validating or unpacking a source archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The file does not start with the gzip magic bytes.
    #[error("Not a gzip archive: {}", .0.display())]
    NotGzip(PathBuf),

    /// The compressed stream or the tar structure inside it is damaged.
    #[error("Corrupt archive {}: {source}", path.display())]
    Corrupt {
        /// Archive being read.
        path: PathBuf,
        /// Decoder or tar parser failure.
        source: std::io::Error,
    },

    /// The archive holds no extractable entries.
    #[error("Archive has no entries: {}", .0.display())]
    Empty(PathBuf),

    /// Reading the archive or writing an entry failed.
    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a LaTeX-to-text conversion capability.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Group or environment nesting exceeded the renderer limit.
    #[error("LaTeX nesting too deep (max depth {max})")]
    TooDeep {
        /// Maximum supported depth.
        max: usize,
    },

    /// The external converter program could not be started.
    #[error("Failed to run converter `{program}`: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying spawn failure.
        source: std::io::Error,
    },

    /// The external converter exited unsuccessfully.
    #[error("Converter exited with {status}: {stderr}")]
    CommandFailed {
        /// Exit status description.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The external converter produced output that is not UTF-8.
    #[error("Converter produced invalid UTF-8 output")]
    InvalidOutput,
}

/// Result type alias for corpus conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_names_path_and_encodings() {
        let err = Error::Decode {
            path: PathBuf::from("paper/main.tex"),
            tried: vec!["utf-8".to_string(), "latin-1".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("paper/main.tex"));
        assert!(message.contains("utf-8, latin-1"));
    }

    #[test]
    fn archive_error_is_transparent() {
        let err: Error = ArchiveError::NotGzip(PathBuf::from("a.tar.gz")).into();
        assert_eq!(err.to_string(), "Not a gzip archive: a.tar.gz");
    }
}
