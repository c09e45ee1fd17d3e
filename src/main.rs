//! Main entry point for the wadx CLI application.
//!
//! This binary lists, prints and extracts the contents of WWAD archives.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

use wadx::{ArchiveMetadata, Cli, default_destination, normalize_path};

/// Application entry point.
///
/// Parses command-line arguments, loads the archive tables and dispatches
/// to listing, piping or extraction.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let meta = wadx::load(&cli.file).await?;

    // List mode: display archive contents and exit
    if cli.list || cli.verbose {
        list_files(&meta, cli.verbose);
        return Ok(());
    }

    // Pipe mode with no selection streams every object in table order
    if cli.files.is_empty() && cli.pipe {
        let show_names = meta.object_count() > 1;
        for path in &meta.relative_paths {
            pipe_file(&meta, path, show_names).await?;
        }
        return Ok(());
    }

    let root = cli
        .extract_dir
        .clone()
        .unwrap_or_else(|| default_destination(meta.source_path()));

    // No selection: extract the whole archive
    if cli.files.is_empty() {
        wadx::extract_all_with(&meta, Some(&root), &cli.extract_options()).await?;
        return Ok(());
    }

    // Archive paths are usually quoted from Windows tooling, so accept
    // backslashes in the selection.
    let selected: Vec<String> = cli.files.iter().map(|f| normalize_path(f)).collect();
    if let Some(missing) = selected.iter().find(|f| !meta.exists(f)) {
        anyhow::bail!("{} does not contain {missing}", cli.file.display());
    }

    let show_names = cli.pipe && selected.len() > 1;
    for path in &selected {
        if cli.pipe {
            pipe_file(&meta, path, show_names).await?;
        } else {
            let target = wadx::extract_object(&meta, path, &root).await?;
            tracing::info!("  extracting: {}", target.display());
        }
    }

    Ok(())
}

/// Install the tracing subscriber on stderr so piped output stays clean.
///
/// `RUST_LOG` takes precedence over the `-q` flags.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// List files in the archive.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just relative paths, one per line
/// - Verbose format (`-v`): Table with version, size, offset and the
///   original authoring path
fn list_files(meta: &ArchiveMetadata, verbose: bool) {
    if verbose {
        println!(
            "{:>7}  {:>10}  {:>10}  Name (original path)",
            "Version", "Size", "Offset"
        );
        println!("{}", "-".repeat(70));
    }

    let mut total_size = 0u64;

    for (record, rel_path, abs_path) in meta.entries() {
        if verbose {
            println!(
                "{:>7}  {:>10}  {:>#10x}  {} ({})",
                record.version, record.file_size, record.offset, rel_path, abs_path
            );
            total_size += u64::from(record.file_size);
        } else {
            println!("{rel_path}");
        }
    }

    if verbose {
        println!("{}", "-".repeat(70));
        println!(
            "{:>7}  {:>10}  {:>10}  {} files",
            "",
            format_size(total_size),
            "",
            meta.object_count()
        );
    }
}

/// Stream one object to stdout without buffering it whole.
async fn pipe_file(meta: &ArchiveMetadata, path: &str, show_name: bool) -> Result<()> {
    let record = meta.get_record(path)?;
    let mut stdout = tokio::io::stdout();

    if show_name {
        stdout.write_all(format!("--- {path} ---\n").as_bytes()).await?;
    }

    let mut stream = wadx::open_object_stream(meta.source_path(), &record).await?;
    tokio::io::copy(&mut stream, &mut stdout)
        .await
        .with_context(|| format!("failed to read {path}"))?;
    stdout.flush().await?;

    Ok(())
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
