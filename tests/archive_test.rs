//! Archive extraction tests against real tar.gz fixtures.

#![allow(clippy::expect_used)] // expect() is appropriate in tests for clear panic messages

mod common;

use std::fs;

use common::{write_bare_gz, write_tar_gz};
use tex2corpus::archive::{extract_archive, list_entries, EntryKind, Layout};
use tex2corpus::{ArchiveError, Options};

#[test]
fn single_file_archive_extracts_into_destination_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("2401.00001.tar.gz");
    write_tar_gz(&archive, &[("paper/main.tex", "\\documentclass{article}")]);
    let dest = dir.path().join("out");

    let extraction = extract_archive(&archive, &dest, &Options::default()).expect("extract");

    assert_eq!(extraction.layout, Layout::SingleFile);
    assert_eq!(extraction.files, vec![dest.join("main.tex")]);
    assert!(dest.join("main.tex").is_file());
    assert!(!dest.join("paper").exists());
}

#[test]
fn multi_file_archive_preserves_relative_paths() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("tree.tar.gz");
    write_tar_gz(
        &archive,
        &[
            ("paper/main.tex", "main"),
            ("paper/sections/intro.tex", "intro"),
            ("paper/fig.pdf", "%PDF"),
        ],
    );
    let dest = dir.path().join("out");

    let extraction = extract_archive(&archive, &dest, &Options::default()).expect("extract");

    assert_eq!(extraction.layout, Layout::Tree);
    assert_eq!(extraction.files.len(), 3);
    assert_eq!(
        fs::read_to_string(dest.join("paper/sections/intro.tex")).expect("read"),
        "intro"
    );
}

#[test]
fn resource_forks_are_not_extracted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("mac.tar.gz");
    write_tar_gz(&archive, &[("._main.tex", "junk"), ("main.tex", "real")]);
    let dest = dir.path().join("out");

    let extraction = extract_archive(&archive, &dest, &Options::default()).expect("extract");

    assert_eq!(extraction.files, vec![dest.join("main.tex")]);
    assert!(!dest.join("._main.tex").exists());
}

#[test]
fn oversized_entries_are_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("big.tar.gz");
    write_tar_gz(&archive, &[("big.tex", "far too long"), ("ok.tex", "ok")]);
    let dest = dir.path().join("out");
    let options = Options {
        max_entry_size: 4,
        ..Options::default()
    };

    let extraction = extract_archive(&archive, &dest, &options).expect("extract");

    assert_eq!(extraction.files, vec![dest.join("ok.tex")]);
}

#[test]
fn bare_gzip_stream_becomes_one_source_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("2401.00002.tar.gz");
    write_bare_gz(&archive, b"\\documentclass{article}\nBare.");
    let dest = dir.path().join("out");

    let extraction = extract_archive(&archive, &dest, &Options::default()).expect("extract");

    assert_eq!(extraction.layout, Layout::BareStream);
    assert_eq!(
        fs::read_to_string(dest.join("2401.00002.tex")).expect("read"),
        "\\documentclass{article}\nBare."
    );
}

#[test]
fn bare_gzip_rejected_when_disabled() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("bare.tar.gz");
    write_bare_gz(&archive, b"not a tarball, just text");
    let options = Options {
        accept_bare_gzip: false,
        ..Options::default()
    };

    let err = extract_archive(&archive, &dir.path().join("out"), &options).unwrap_err();
    assert!(matches!(err, ArchiveError::Corrupt { .. }));
}

#[test]
fn non_gzip_file_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("plain.tar.gz");
    fs::write(&archive, "\\documentclass{article}").expect("write");

    let err = extract_archive(&archive, &dir.path().join("out"), &Options::default()).unwrap_err();
    assert!(matches!(err, ArchiveError::NotGzip(_)));
}

#[test]
fn truncated_archive_is_corrupt() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("cut.tar.gz");
    let body = "lorem ipsum ".repeat(4000);
    write_tar_gz(&archive, &[("main.tex", body.as_str()), ("b.tex", "b")]);
    let bytes = fs::read(&archive).expect("read");
    fs::write(&archive, &bytes[..bytes.len() / 2]).expect("truncate");

    let err = extract_archive(&archive, &dir.path().join("out"), &Options::default()).unwrap_err();
    assert!(matches!(err, ArchiveError::Corrupt { .. }));
}

#[test]
fn empty_tarball_is_reported_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("empty.tar.gz");
    write_tar_gz::<&str>(&archive, &[]);

    let err = extract_archive(&archive, &dir.path().join("out"), &Options::default()).unwrap_err();
    assert!(matches!(err, ArchiveError::Empty(_)));
}

#[test]
fn list_entries_reports_kinds_and_sizes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("list.tar.gz");
    write_tar_gz(&archive, &[("a.tex", "abc"), ("b/c.tex", "")]);

    let entries = list_entries(&archive).expect("list");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].size, 3);
    assert!(entries.iter().all(|e| e.kind == EntryKind::File));
}
