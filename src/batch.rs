//! Batch processing of an input folder of source archives.
//!
//! Each archive is extracted into its own scratch directory, reduced to the
//! text of its main document and written to `<output>/<stem>.txt`. Archives
//! whose output already exists are skipped unless `force` is set, so an
//! interrupted run can be resumed. The skip set is fixed before the first
//! archive is processed.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::archive::extract_archive;
use crate::clean_tex_reporting;
use crate::collect::{find_main_document, SourceDocument};
use crate::convert::{LatexConverter, LatexToText};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::stats::{StatsRecord, StatsTable};

/// Cleaned text of one archive.
#[derive(Debug, Default)]
pub struct Document {
    /// Name of the selected main document; empty when none was found.
    pub name: String,
    /// Normalized plain text.
    pub text: String,
    /// Failures that were recovered from. Either [`Error::Archive`] (the
    /// text is empty) or [`Error::Conversion`] (the text is the normalized
    /// pre-cleaned source).
    pub recovered: Vec<Error>,
}

/// Extract `archive` into `scratch` and clean its main document.
///
/// An archive that cannot be extracted yields an empty document and a
/// failed conversion yields the pre-cleaned source; both are logged and
/// listed in [`Document::recovered`], not returned as errors.
///
/// # Errors
///
/// Returns [`Error::Decode`] when a source file matches none of the
/// configured encodings and [`Error::Io`] when the extracted tree cannot
/// be read.
pub fn process_archive(
    archive: &Path,
    scratch: &Path,
    options: &Options,
    converter: &dyn LatexToText,
) -> Result<Document> {
    let mut recovered = Vec::new();
    let main = match extract_archive(archive, scratch, options) {
        Ok(extraction) => {
            debug!(
                "Extracted {} file(s) from {} ({:?})",
                extraction.files.len(),
                archive.display(),
                extraction.layout
            );
            find_main_document(scratch, options)?
        }
        Err(e) => {
            warn!("Error extracting {}: {e}", archive.display());
            recovered.push(Error::Archive(e));
            SourceDocument::default()
        }
    };

    if main.is_placeholder() {
        warn!("No source document found in {}", archive.display());
    } else {
        debug!("Main document of {}: {}", archive.display(), main.name);
    }

    let (text, failure) = clean_tex_reporting(&main.content, options, converter);
    recovered.extend(failure.map(Error::Conversion));
    Ok(Document {
        name: main.name,
        text,
        recovered,
    })
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Stats rows of archives processed in this run.
    pub processed: Vec<StatsRecord>,
    /// Archives skipped because their output already existed.
    pub skipped: Vec<String>,
    /// Archives abandoned, with the reason.
    pub failed: Vec<(String, String)>,
    /// Archives written from a fallback, with the recovered failure. These
    /// also appear in `processed`.
    pub degraded: Vec<(String, String)>,
}

/// An archive found in the input folder.
#[derive(Debug, Clone)]
struct ArchiveJob {
    file_name: String,
    stem: String,
    path: PathBuf,
}

/// Drives the conversion of a whole input folder.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// use tex2corpus::{BatchDriver, Options};
///
/// let report = BatchDriver::new(Options::default())
///     .run(Path::new("arxiv/src"), Path::new("arxiv/txt"), Path::new("arxiv/stats.csv"))?;
/// println!("{} processed, {} skipped", report.processed.len(), report.skipped.len());
/// # Ok::<(), tex2corpus::Error>(())
/// ```
pub struct BatchDriver {
    options: Options,
    converter: Box<dyn LatexToText>,
}

impl BatchDriver {
    /// Driver using the built-in [`LatexConverter`].
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            options,
            converter: Box::new(LatexConverter::new()),
        }
    }

    /// Replace the TeX-to-text converter.
    #[must_use]
    pub fn with_converter(mut self, converter: Box<dyn LatexToText>) -> Self {
        self.converter = converter;
        self
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Process every archive in `input_folder`, write one text file per
    /// archive to `output_folder` and the statistics table to `stats_path`.
    ///
    /// Per-archive failures are logged and recorded in the report; the
    /// batch continues.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the input folder cannot be listed or an
    /// output file cannot be written, and [`Error::Csv`] if the statistics
    /// table cannot be written.
    pub fn run(
        &self,
        input_folder: &Path,
        output_folder: &Path,
        stats_path: &Path,
    ) -> Result<BatchReport> {
        fs::create_dir_all(output_folder).map_err(|e| Error::io(output_folder, e))?;

        let jobs = self.list_archives(input_folder)?;
        let existing: HashSet<PathBuf> = jobs
            .iter()
            .map(|job| output_path(output_folder, &job.stem))
            .filter(|path| path.exists())
            .collect();
        info!(
            "Found {} archive(s) in {}, {} already processed",
            jobs.len(),
            input_folder.display(),
            existing.len()
        );

        let mut report = BatchReport::default();
        let mut table = StatsTable::new();

        for job in &jobs {
            let target = output_path(output_folder, &job.stem);
            if !self.options.force && existing.contains(&target) {
                info!("Skipping already processed file: {}", job.file_name);
                report.skipped.push(job.file_name.clone());
                continue;
            }

            info!("Processing {}", job.file_name);
            let (document, elapsed) = match self.convert(job) {
                Ok(converted) => converted,
                Err(e) => {
                    error!("Skipping {}: {e}", job.file_name);
                    report.failed.push((job.file_name.clone(), e.to_string()));
                    continue;
                }
            };

            fs::write(&target, &document.text).map_err(|e| Error::io(&target, e))?;
            report.degraded.extend(
                document
                    .recovered
                    .iter()
                    .map(|e| (job.file_name.clone(), e.to_string())),
            );

            let record = StatsRecord::from_text(job.file_name.as_str(), &document.text, elapsed);
            debug!(
                "{}: {} words, {} paragraphs in {:.3}s",
                job.file_name, record.num_words, record.num_paragraphs, record.extraction_time
            );
            table.push(record);
        }

        if table.is_empty() {
            info!("No new archives to process");
        }
        table.write_to_path(stats_path)?;
        report.processed = table.records().to_vec();
        info!(
            "Extraction complete. Statistics for {} archive(s) saved to {}",
            table.len(),
            stats_path.display()
        );

        Ok(report)
    }

    /// Archives in `input_folder`, sorted by file name. Not recursive.
    fn list_archives(&self, input_folder: &Path) -> Result<Vec<ArchiveJob>> {
        let entries = fs::read_dir(input_folder).map_err(|e| Error::io(input_folder, e))?;

        let mut jobs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(input_folder, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(stem) = self.options.archive_stem(file_name) else {
                continue;
            };
            jobs.push(ArchiveJob {
                file_name: file_name.to_string(),
                stem: stem.to_string(),
                path: path.clone(),
            });
        }

        jobs.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(jobs)
    }

    /// Run one archive through the pipeline inside a fresh scratch directory.
    ///
    /// The scratch directory is removed afterwards whatever the outcome;
    /// a removal failure is logged.
    fn convert(&self, job: &ArchiveJob) -> Result<(Document, Duration)> {
        let start = Instant::now();

        let parent = self
            .options
            .scratch_dir
            .clone()
            .unwrap_or_else(env::temp_dir);
        let scratch = tempfile::Builder::new()
            .prefix(&format!("{}-", job.stem))
            .tempdir_in(&parent)
            .map_err(|e| Error::io(&parent, e))?;
        let scratch_path = scratch.path().to_path_buf();

        let result = process_archive(
            &job.path,
            &scratch_path,
            &self.options,
            self.converter.as_ref(),
        );
        let elapsed = start.elapsed();

        if let Err(source) = scratch.close() {
            warn!(
                "{}",
                Error::Cleanup {
                    path: scratch_path,
                    source,
                }
            );
        }

        result.map(|document| (document, elapsed))
    }
}

fn output_path(output_folder: &Path, stem: &str) -> PathBuf {
    output_folder.join(format!("{stem}.txt"))
}
