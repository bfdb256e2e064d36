//! End-to-end batch runs over folders of fixture archives.

#![allow(clippy::expect_used)] // expect() is appropriate in tests for clear panic messages

mod common;

use std::fs;
use std::path::{Path, PathBuf};

use common::{main_tex, write_bare_gz, write_tar_gz};
use tex2corpus::{BatchDriver, BatchReport, ConversionError, LatexToText, Options};

struct Folders {
    _root: tempfile::TempDir,
    input: PathBuf,
    output: PathBuf,
    stats: PathBuf,
}

fn folders() -> Folders {
    let root = tempfile::tempdir().expect("tempdir");
    let input = root.path().join("in");
    fs::create_dir(&input).expect("create input");
    Folders {
        input,
        output: root.path().join("out"),
        stats: root.path().join("stats.csv"),
        _root: root,
    }
}

fn sample_archives(input: &Path) {
    write_tar_gz(
        &input.join("2401.00001.tar.gz"),
        &[
            ("paper/appendix.tex", "\\section{Appendix} Not the main file."),
            (
                "paper/main.tex",
                "\\documentclass{article}\n\\title{T}\n\\begin{document}\n\\section{Intro}\n\
                 Hello \\textbf{world}, see \\cite{a}.\nSecond line with $x$ math.\n\
                 \\input{appendix}\n\\end{document}\n",
            ),
        ],
    );
    write_tar_gz(
        &input.join("2401.00002.tar.gz"),
        &[("only.tex", main_tex("Just one file."))],
    );
}

fn run(folders: &Folders, options: Options) -> BatchReport {
    BatchDriver::new(options)
        .run(&folders.input, &folders.output, &folders.stats)
        .expect("batch run")
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}

#[test]
fn batch_writes_text_and_stats() {
    let folders = folders();
    sample_archives(&folders.input);

    let report = run(&folders, Options::default());

    assert_eq!(report.processed.len(), 2);
    assert!(report.skipped.is_empty());
    assert!(report.failed.is_empty());
    assert!(report.degraded.is_empty());

    assert_eq!(
        read(&folders.output.join("2401.00001.txt")),
        "Intro\n\nHello world, see . Second line with math."
    );
    assert_eq!(read(&folders.output.join("2401.00002.txt")), "Just one file.");

    let stats = read(&folders.stats);
    let lines: Vec<&str> = stats.lines().collect();
    assert_eq!(lines[0], "file,num_words,num_paragraphs,num_chars,extraction_time");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2401.00001.tar.gz,9,2,48,"));
    assert!(lines[2].starts_with("2401.00002.tar.gz,3,1,14,"));
}

#[test]
fn second_run_skips_everything() {
    let folders = folders();
    sample_archives(&folders.input);

    run(&folders, Options::default());
    let first = read(&folders.output.join("2401.00001.txt"));

    let report = run(&folders, Options::default());

    assert!(report.processed.is_empty());
    assert_eq!(report.skipped, ["2401.00001.tar.gz", "2401.00002.tar.gz"]);
    assert_eq!(
        read(&folders.stats),
        "file,num_words,num_paragraphs,num_chars,extraction_time\n"
    );
    assert_eq!(read(&folders.output.join("2401.00001.txt")), first);
}

#[test]
fn new_archives_are_picked_up_on_rerun() {
    let folders = folders();
    sample_archives(&folders.input);
    run(&folders, Options::default());

    write_tar_gz(
        &folders.input.join("2401.00003.tar.gz"),
        &[("late.tex", main_tex("Arrived later."))],
    );
    let report = run(&folders, Options::default());

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.processed[0].file, "2401.00003.tar.gz");
    assert_eq!(report.skipped.len(), 2);
}

#[test]
fn force_reprocesses_existing_output() {
    let folders = folders();
    sample_archives(&folders.input);
    run(&folders, Options::default());
    fs::write(folders.output.join("2401.00002.txt"), "stale").expect("overwrite");

    let report = run(
        &folders,
        Options {
            force: true,
            ..Options::default()
        },
    );

    assert_eq!(report.processed.len(), 2);
    assert_eq!(read(&folders.output.join("2401.00002.txt")), "Just one file.");
}

#[test]
fn corrupt_archive_yields_empty_output_and_a_stats_row() {
    let folders = folders();
    fs::write(folders.input.join("broken.tar.gz"), "definitely not gzip").expect("write");

    let report = run(&folders, Options::default());

    assert_eq!(report.processed.len(), 1);
    let record = &report.processed[0];
    assert_eq!((record.num_words, record.num_paragraphs, record.num_chars), (0, 1, 0));
    assert_eq!(read(&folders.output.join("broken.txt")), "");
    assert_eq!(report.degraded.len(), 1);
    assert_eq!(report.degraded[0].0, "broken.tar.gz");
    assert!(report.degraded[0].1.contains("Not a gzip archive"));
}

#[test]
fn undecodable_source_skips_the_archive() {
    let folders = folders();
    write_tar_gz(
        &folders.input.join("latin.tar.gz"),
        &[("main.tex", b"\\documentclass{article} caf\xe9".to_vec())],
    );
    sample_archives(&folders.input);

    let report = run(
        &folders,
        Options {
            encodings: vec!["utf-8".to_string()],
            ..Options::default()
        },
    );

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "latin.tar.gz");
    assert_eq!(report.processed.len(), 2);
    assert!(!folders.output.join("latin.txt").exists());
    assert!(!read(&folders.stats).contains("latin.tar.gz"));
}

#[test]
fn latin1_source_decodes_with_default_fallback() {
    let folders = folders();
    write_tar_gz(
        &folders.input.join("latin.tar.gz"),
        &[("main.tex", b"\\documentclass{article} caf\xe9".to_vec())],
    );

    let report = run(&folders, Options::default());

    assert!(report.failed.is_empty());
    assert_eq!(read(&folders.output.join("latin.txt")), "caf\u{e9}");
}

#[test]
fn bare_gzip_submission_is_processed() {
    let folders = folders();
    write_bare_gz(
        &folders.input.join("2401.00009.tar.gz"),
        main_tex("A single-file submission.").as_bytes(),
    );

    run(&folders, Options::default());

    assert_eq!(
        read(&folders.output.join("2401.00009.txt")),
        "A single-file submission."
    );
}

#[test]
fn scratch_directories_are_removed() {
    let folders = folders();
    sample_archives(&folders.input);
    let scratch = folders.input.parent().expect("root").join("scratch");
    fs::create_dir(&scratch).expect("create scratch");

    run(
        &folders,
        Options {
            scratch_dir: Some(scratch.clone()),
            ..Options::default()
        },
    );

    assert_eq!(fs::read_dir(&scratch).expect("list scratch").count(), 0);
}

#[test]
fn custom_suffix_selects_archives() {
    let folders = folders();
    write_tar_gz(&folders.input.join("a.tgz"), &[("a.tex", main_tex("Suffix ok."))]);
    sample_archives(&folders.input);

    let report = run(
        &folders,
        Options {
            archive_suffix: ".tgz".to_string(),
            ..Options::default()
        },
    );

    assert_eq!(report.processed.len(), 1);
    assert_eq!(read(&folders.output.join("a.txt")), "Suffix ok.");
}

struct Shouting;

impl LatexToText for Shouting {
    fn latex_to_text(&self, tex: &str) -> Result<String, ConversionError> {
        Ok(tex.to_uppercase())
    }
}

#[test]
fn custom_converter_is_used() {
    let folders = folders();
    write_tar_gz(&folders.input.join("x.tar.gz"), &[("x.tex", "quiet words")]);

    BatchDriver::new(Options::default())
        .with_converter(Box::new(Shouting))
        .run(&folders.input, &folders.output, &folders.stats)
        .expect("batch run");

    assert_eq!(read(&folders.output.join("x.txt")), "QUIET WORDS");
}
