//! Debug reporting of the markup pre-cleaner, observed through the `log` facade.

#![allow(clippy::expect_used)] // expect() is appropriate in tests for clear panic messages

use std::sync::{Mutex, Once};

use log::{LevelFilter, Log, Metadata, Record};
use tex2corpus::preclean::preclean;
use tex2corpus::Options;

/// Logger keeping every message from the pre-cleaner module.
struct Capture;

static LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());
static INIT: Once = Once::new();

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if record.target().ends_with("preclean") {
            LINES
                .lock()
                .expect("log lock")
                .push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

fn captured<F: FnOnce()>(f: F) -> Vec<String> {
    INIT.call_once(|| {
        log::set_logger(&Capture).expect("install logger");
        log::set_max_level(LevelFilter::Trace);
    });
    let mut lines = LINES.lock().expect("log lock");
    lines.clear();
    drop(lines);

    f();

    std::mem::take(&mut *LINES.lock().expect("log lock"))
}

const TEX: &str = "A \\begin{table}first table\\end{table} B $x$ C $y$ D \
                   \\begin{table}second\\end{table}.";

// Both cases share one test so the global log buffer is never read by two
// tests at once.
#[test]
fn debug_mode_reports_counts_and_previews() {
    let quiet = captured(|| {
        let _ = preclean(TEX, &Options::default());
    });
    assert!(quiet.is_empty(), "unexpected output: {quiet:?}");

    let options = Options {
        debug: true,
        preview_chars: 12,
        ..Options::default()
    };
    let mut cleaned = String::new();
    let lines = captured(|| cleaned = preclean(TEX, &options));

    assert_eq!(cleaned, preclean(TEX, &Options::default()));
    assert_eq!(
        lines,
        [
            "Found 2 table blocks.",
            "Removing table block: \\begin{table...",
            "Removing table block: \\begin{table...",
            "Found 2 inline math blocks.",
            "Removing inline math block: $x$...",
            "Removing inline math block: $y$...",
        ]
    );
}
