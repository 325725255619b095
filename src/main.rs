//! Video Scanner CLI
//!
//! Scans a directory tree concurrently and reports recognized video files.

use clap::Parser;
use env_logger::Env;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

use video_scanner::{render_text, ScanConfig, Scanner};

/// Concurrent video file scanner
#[derive(Parser)]
#[command(name = "video_scanner")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Number of concurrent workers (0 = auto-detect)
    #[arg(short = 't', long, default_value_t = video_scanner::config::DEFAULT_WORKERS)]
    threads: usize,

    /// Recognized extension, repeatable (defaults to common video formats)
    #[arg(short = 'e', long = "ext")]
    extensions: Vec<String>,

    /// Print the scan outcome as JSON
    #[arg(long)]
    json: bool,

    /// Write JSON progress lines to stderr
    #[arg(long)]
    progress: bool,

    /// Progress interval in milliseconds
    #[arg(long, default_value = "500")]
    progress_interval: u64,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let root = match std::path::absolute(&cli.dir) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("error: cannot resolve {:?}: {}", cli.dir, e);
            return ExitCode::FAILURE;
        }
    };

    let mut builder = ScanConfig::builder().workers(cli.threads);
    if !cli.extensions.is_empty() {
        builder = builder.extensions(&cli.extensions);
    }
    let config = builder.build();

    info!("Root: {:?}", root);
    info!("Extensions: {:?}", config.extensions);

    let mut scanner = Scanner::new(&config);
    if cli.progress {
        scanner = scanner.with_progress(cli.progress_interval);
    }

    let outcome = match scanner.scan(&root) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: scan failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: cannot serialize outcome: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", render_text(&outcome));
    }

    ExitCode::SUCCESS
}
