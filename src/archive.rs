//! Source-archive extraction.
//!
//! Archives are gzip-compressed tarballs. Extraction writes the entries
//! under a destination directory with these rules:
//!
//! - an archive whose only entry is a regular file is written flat into the
//!   destination root, so single-file bundles don't gain a nested directory;
//! - every other archive is unpacked preserving relative paths;
//! - a gzip stream that is not a tar archive at all (how arXiv ships
//!   single-file submissions) is written as one source file, if enabled.
//!
//! Entry paths are sanitized so nothing escapes the destination, and links
//! or device files are never materialized.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, warn};
use tar::{Archive, EntryType};

use crate::error::ArchiveError;
use crate::options::Options;

/// Gzip magic bytes (RFC 1952).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Size of a tar header block.
const TAR_BLOCK: usize = 512;

/// Offset and value of the POSIX `ustar` magic inside a header block.
const USTAR_OFFSET: usize = 257;
const USTAR_MAGIC: &[u8; 5] = b"ustar";

/// Offset and width of the header checksum field.
const CHECKSUM_OFFSET: usize = 148;
const CHECKSUM_LEN: usize = 8;

/// Kind of a tar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic or hard link.
    Link,
    /// Device, FIFO or extension header.
    Other,
}

impl From<EntryType> for EntryKind {
    fn from(entry_type: EntryType) -> Self {
        if entry_type.is_file() {
            Self::File
        } else if entry_type.is_dir() {
            Self::Directory
        } else if entry_type.is_symlink() || entry_type.is_hard_link() {
            Self::Link
        } else {
            Self::Other
        }
    }
}

/// Metadata of a single archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Entry path as recorded in the archive.
    pub path: PathBuf,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Entry kind.
    pub kind: EntryKind,
}

/// How an archive was laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Exactly one regular file, written into the destination root.
    SingleFile,
    /// Multiple entries, unpacked preserving relative paths.
    Tree,
    /// A compressed single file without tar framing.
    BareStream,
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Layout that was applied.
    pub layout: Layout,
    /// Files written, in archive order.
    pub files: Vec<PathBuf>,
}

/// Keep only normal path components, dropping `..`, `.`, roots and
/// drive prefixes. Returns `None` when nothing is left.
fn sanitize_path(path: &Path) -> Option<PathBuf> {
    let sanitized: PathBuf = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    (!sanitized.as_os_str().is_empty()).then_some(sanitized)
}

/// macOS resource-fork companions (`._name`).
fn is_resource_fork(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("._"))
}

fn corrupt(path: &Path, source: io::Error) -> ArchiveError {
    ArchiveError::Corrupt {
        path: path.to_path_buf(),
        source,
    }
}

/// Fail with [`ArchiveError::NotGzip`] unless the file starts with the gzip magic.
fn check_gzip_magic(path: &Path) -> Result<(), ArchiveError> {
    let mut magic = [0u8; 2];
    let mut file = File::open(path)?;
    match file.read_exact(&mut magic) {
        Ok(()) if magic == GZIP_MAGIC => Ok(()),
        Ok(()) => Err(ArchiveError::NotGzip(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            Err(ArchiveError::NotGzip(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

fn open_decoder(path: &Path) -> Result<GzDecoder<BufReader<File>>, ArchiveError> {
    Ok(GzDecoder::new(BufReader::new(File::open(path)?)))
}

/// Parse an octal header field, tolerating NUL and space padding.
fn parse_octal(field: &[u8]) -> Option<u32> {
    let digits: Vec<u8> = field
        .iter()
        .copied()
        .skip_while(|b| *b == b' ')
        .take_while(|b| (b'0'..=b'7').contains(b))
        .collect();
    if digits.is_empty() {
        return None;
    }
    std::str::from_utf8(&digits)
        .ok()
        .and_then(|s| u32::from_str_radix(s, 8).ok())
}

/// Whether a decompressed first block is a tar header.
///
/// Accepts POSIX/GNU headers by their `ustar` magic and old V7 headers by
/// a valid checksum.
fn looks_like_tar(block: &[u8]) -> bool {
    if block.len() < TAR_BLOCK {
        return false;
    }
    if &block[USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len()] == USTAR_MAGIC {
        return true;
    }
    // End-of-archive marker: an empty tarball
    if block[..TAR_BLOCK].iter().all(|b| *b == 0) {
        return true;
    }

    let Some(recorded) = parse_octal(&block[CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_LEN])
    else {
        return false;
    };
    let computed: u32 = block[..TAR_BLOCK]
        .iter()
        .enumerate()
        .map(|(i, b)| {
            if (CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_LEN).contains(&i) {
                u32::from(b' ')
            } else {
                u32::from(*b)
            }
        })
        .sum();
    recorded == computed
}

/// Read the first decompressed block of a gzip file.
fn sniff_first_block(path: &Path) -> Result<Vec<u8>, ArchiveError> {
    let mut block = Vec::with_capacity(TAR_BLOCK);
    open_decoder(path)?
        .take(TAR_BLOCK as u64)
        .read_to_end(&mut block)
        .map_err(|e| corrupt(path, e))?;
    Ok(block)
}

/// List the entries of a gzip-compressed tar archive without extracting.
///
/// Reads the whole stream, so a truncated or corrupt archive is reported
/// here rather than halfway through extraction.
///
/// # Errors
///
/// Returns [`ArchiveError::NotGzip`] for non-gzip input and
/// [`ArchiveError::Corrupt`] when the stream cannot be decoded.
pub fn list_entries(path: &Path) -> Result<Vec<EntryInfo>, ArchiveError> {
    check_gzip_magic(path)?;

    let mut archive = Archive::new(open_decoder(path)?);
    let mut entries = Vec::new();

    for entry in archive.entries().map_err(|e| corrupt(path, e))? {
        let mut entry = entry.map_err(|e| corrupt(path, e))?;
        let header = entry.header();
        let kind = EntryKind::from(header.entry_type());
        let size = header.size().map_err(|e| corrupt(path, e))?;
        let entry_path = entry.path().map_err(|e| corrupt(path, e))?.into_owned();

        // Drain the body so decoder errors surface while listing
        io::copy(&mut entry, &mut io::sink()).map_err(|e| corrupt(path, e))?;

        entries.push(EntryInfo {
            path: entry_path,
            size,
            kind,
        });
    }

    Ok(entries)
}

/// Extract a source archive into `dest`.
///
/// # Errors
///
/// Returns an [`ArchiveError`] when the archive is not gzip, is corrupt,
/// holds no entries, or an entry cannot be written. Files written before
/// the failure are left in place; callers treat a failed extraction as
/// having produced no documents.
pub fn extract_archive(
    path: &Path,
    dest: &Path,
    options: &Options,
) -> Result<Extraction, ArchiveError> {
    check_gzip_magic(path)?;
    fs::create_dir_all(dest)?;

    let first_block = sniff_first_block(path)?;
    if !looks_like_tar(&first_block) {
        if options.accept_bare_gzip && !first_block.is_empty() {
            return extract_bare_stream(path, dest, options);
        }
        return Err(corrupt(
            path,
            io::Error::new(io::ErrorKind::InvalidData, "gzip payload is not a tar archive"),
        ));
    }

    let entries = list_entries(path)?;
    if entries.is_empty() {
        return Err(ArchiveError::Empty(path.to_path_buf()));
    }

    if let [only] = entries.as_slice() {
        if only.kind == EntryKind::File {
            return extract_single_file(path, dest, options);
        }
    }

    extract_tree(path, dest, options)
}

/// Write the archive's only regular file directly under `dest`.
fn extract_single_file(
    path: &Path,
    dest: &Path,
    options: &Options,
) -> Result<Extraction, ArchiveError> {
    let mut archive = Archive::new(open_decoder(path)?);

    for entry in archive.entries().map_err(|e| corrupt(path, e))? {
        let mut entry = entry.map_err(|e| corrupt(path, e))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let entry_path = entry.path().map_err(|e| corrupt(path, e))?.into_owned();
        let Some(file_name) = entry_path.file_name() else {
            warn!("Skipping unnamed entry in {}", path.display());
            break;
        };

        let size = entry.header().size().map_err(|e| corrupt(path, e))?;
        if size > options.max_entry_size {
            warn!(
                "Skipping large file: {} ({size} bytes exceeds {} bytes limit)",
                entry_path.display(),
                options.max_entry_size
            );
            break;
        }

        let target = dest.join(file_name);
        io::copy(&mut entry, &mut File::create(&target)?)?;
        debug!("Extracted single file {}", target.display());

        return Ok(Extraction {
            layout: Layout::SingleFile,
            files: vec![target],
        });
    }

    Err(ArchiveError::Empty(path.to_path_buf()))
}

/// Unpack every entry under `dest`, preserving relative paths.
fn extract_tree(path: &Path, dest: &Path, options: &Options) -> Result<Extraction, ArchiveError> {
    let mut archive = Archive::new(open_decoder(path)?);
    let mut files = Vec::new();

    for entry in archive.entries().map_err(|e| corrupt(path, e))? {
        let mut entry = entry.map_err(|e| corrupt(path, e))?;
        let kind = EntryKind::from(entry.header().entry_type());
        let raw_path = entry.path().map_err(|e| corrupt(path, e))?.into_owned();

        let Some(relative) = sanitize_path(&raw_path) else {
            warn!(
                "Skipping invalid path: {} (path traversal attempt or empty)",
                raw_path.display()
            );
            continue;
        };
        let target = dest.join(&relative);

        match kind {
            EntryKind::Directory => fs::create_dir_all(&target)?,
            EntryKind::File => {
                if is_resource_fork(&relative) {
                    continue;
                }
                let size = entry.header().size().map_err(|e| corrupt(path, e))?;
                if size > options.max_entry_size {
                    warn!(
                        "Skipping large file: {} ({size} bytes exceeds {} bytes limit)",
                        relative.display(),
                        options.max_entry_size
                    );
                    continue;
                }
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                io::copy(&mut entry, &mut File::create(&target)?)?;
                files.push(target);
            }
            EntryKind::Link | EntryKind::Other => {
                debug!("Skipping non-regular entry {}", raw_path.display());
            }
        }
    }

    Ok(Extraction {
        layout: Layout::Tree,
        files,
    })
}

/// Decompress a tar-less gzip stream into a single source file.
fn extract_bare_stream(
    path: &Path,
    dest: &Path,
    options: &Options,
) -> Result<Extraction, ArchiveError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let stem = options
        .archive_stem(file_name)
        .or_else(|| file_name.strip_suffix(".gz"))
        .filter(|stem| !stem.is_empty())
        .unwrap_or("main");
    let target = dest.join(format!("{stem}.{}", options.source_extension));

    let mut payload = Vec::new();
    open_decoder(path)?
        .take(options.max_entry_size.saturating_add(1))
        .read_to_end(&mut payload)
        .map_err(|e| corrupt(path, e))?;
    if payload.len() as u64 > options.max_entry_size {
        warn!(
            "Skipping large stream: {} exceeds {} bytes limit",
            path.display(),
            options.max_entry_size
        );
        return Err(ArchiveError::Empty(path.to_path_buf()));
    }

    fs::write(&target, payload)?;
    debug!("Extracted bare gzip stream to {}", target.display());

    Ok(Extraction {
        layout: Layout::BareStream,
        files: vec![target],
    })
}
