use clap::Parser;
use log::info;
use std::error::Error;
use std::path::PathBuf;
use tex2corpus::{BatchDriver, CommandConverter, Options};

/// Extract text from arXiv TeX archives and generate statistics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Folder containing the tar.gz files
    input_folder: PathBuf,

    /// Folder to save the extracted text files
    output_folder: PathBuf,

    /// CSV file to save the statistics
    output_file: PathBuf,

    /// Force reprocessing of already processed files
    #[arg(short, long)]
    force: bool,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// File-name suffix identifying archives
    #[arg(long, default_value = ".tar.gz")]
    suffix: String,

    /// Encodings tried in order when reading source files
    #[arg(long, value_delimiter = ',', default_value = "utf-8,latin-1,iso-8859-1")]
    encodings: Vec<String>,

    /// External converter reading TeX on stdin, e.g. "pandoc -f latex -t plain"
    #[arg(long)]
    converter_cmd: Option<String>,

    /// Parent directory for per-archive scratch directories
    #[arg(long)]
    scratch_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let options = Options {
        encodings: cli.encodings,
        archive_suffix: cli.suffix,
        debug: cli.debug,
        force: cli.force,
        scratch_dir: cli.scratch_dir,
        ..Options::default()
    };

    let mut driver = BatchDriver::new(options);
    if let Some(line) = cli.converter_cmd.as_deref() {
        let converter = CommandConverter::from_command_line(line)
            .ok_or("--converter-cmd must name a program")?;
        info!("Using external converter: {}", converter.program());
        driver = driver.with_converter(Box::new(converter));
    }

    let report = driver.run(&cli.input_folder, &cli.output_folder, &cli.output_file)?;

    info!(
        "Processed {} ({} degraded), skipped {}, failed {}",
        report.processed.len(),
        report.degraded.len(),
        report.skipped.len(),
        report.failed.len()
    );

    Ok(())
}
