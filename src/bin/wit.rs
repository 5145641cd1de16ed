//! # Wit CLI - Minimal local version control
//!
//! Command-line front end for the Wit library. Every subcommand maps onto
//! one engine operation and prints a human-readable summary.
//!
//! ## Usage
//! ```bash
//! # Initialize a repository in the current directory
//! wit init
//!
//! # Stage files and commit
//! wit add src README.md
//! wit add .
//! wit commit -m "Initial import"
//!
//! # Inspect
//! wit status
//! wit log --oneline
//!
//! # Restore an earlier snapshot (full id or unique prefix)
//! wit checkout 3f2a9c0
//! ```

use clap::{Parser, Subcommand};
use colored::*;
use humantime::format_duration;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wit::utils::format_bytes;
use wit::{AddReport, Commit, InitOutcome, Result, Wit, WitBuilder, WitError};

/// Wit CLI - stage, commit, log and checkout directory snapshots
#[derive(Parser)]
#[command(name = "wit")]
#[command(version)]
#[command(about = "Minimal local version control - full directory snapshots per commit")]
#[command(long_about = None)]
struct Cli {
    /// Path to the repository root (defaults to current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty repository (safe to run again)
    Init {
        /// Reject commits whose message already exists in history
        #[arg(long)]
        reject_duplicates: bool,

        /// Extra ignore patterns (glob syntax)
        #[arg(short, long)]
        ignore: Vec<String>,
    },

    /// Stage files or directories (`.` stages everything)
    Add {
        /// Paths to stage
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Commit the staging area
    #[command(alias = "ci")]
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Show staged, committed and untracked files
    #[command(alias = "st")]
    Status,

    /// List commits, oldest first
    Log {
        /// Show only the most recent N commits
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// One line per commit
        #[arg(long)]
        oneline: bool,
    },

    /// Restore the working directory to a commit
    #[command(alias = "co")]
    Checkout {
        /// Commit id or unique prefix
        commit: String,
    },

    /// Show a commit and the files in its snapshot
    Show {
        /// Commit id or unique prefix
        commit: String,
    },

    /// Remove snapshot directories no commit references
    Gc {
        /// Report without deleting
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_env("WIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e.user_message());
        if e.is_recoverable() {
            eprintln!("{}", "Another wit process may be writing; retry the command.".dimmed());
        }
        std::process::exit(1);
    }
}

/// Main command runner
fn run(cli: Cli) -> Result<()> {
    let root_path = cli.path.unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::Init { reject_duplicates, ignore } => cmd_init(root_path, reject_duplicates, ignore),
        Commands::Add { paths } => cmd_add(root_path, paths),
        Commands::Commit { message } => cmd_commit(root_path, &message),
        Commands::Status => cmd_status(root_path),
        Commands::Log { limit, oneline } => cmd_log(root_path, limit, oneline),
        Commands::Checkout { commit } => cmd_checkout(root_path, &commit),
        Commands::Show { commit } => cmd_show(root_path, &commit),
        Commands::Gc { dry_run } => cmd_gc(root_path, dry_run),
    }
}

/// Initialize a repository
///
/// Creates `.wit/` with an empty snapshot store, staging area and ledger.
/// Running it again on an existing repository changes nothing.
fn cmd_init(root_path: PathBuf, reject_duplicates: bool, ignore: Vec<String>) -> Result<()> {
    let (wit, outcome) = WitBuilder::new()
        .reject_duplicate_messages(reject_duplicates)
        .ignore_patterns(ignore)
        .init(root_path)?;

    let location = wit.store().metadata_dir().display().to_string();
    match outcome {
        InitOutcome::Created => {
            println!("{} Initialized empty wit repository in {}", "✓".green().bold(), location.cyan());
            println!("\nNext steps:");
            println!("  - Stage files: {}", "wit add .".yellow());
            println!("  - Commit them: {}", "wit commit -m \"Initial import\"".yellow());
        }
        InitOutcome::Reinitialized => {
            println!(
                "{} Reinitialized existing wit repository in {} (history and settings kept)",
                "!".yellow().bold(),
                location.cyan()
            );
        }
    }

    Ok(())
}

/// Stage paths
///
/// A path that does not exist is reported and skipped; the remaining
/// paths are still staged. The command fails only if every path failed.
fn cmd_add(root_path: PathBuf, paths: Vec<PathBuf>) -> Result<()> {
    let wit = open_wit(root_path)?;

    let mut total = AddReport::default();
    let mut first_error = None;
    let mut succeeded = 0;

    for path in &paths {
        let result = if path == Path::new(".") {
            wit.add_all()
        } else {
            wit.add(path)
        };

        match result {
            Ok(report) => {
                succeeded += 1;
                total.merge(report);
            }
            Err(e @ (WitError::PathNotFound(_) | WitError::PathOutsideRepository(_))) => {
                eprintln!("{}: {}", "Error".red().bold(), e.user_message());
                first_error.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }

    if succeeded == 0 {
        if let Some(e) = first_error {
            return Err(e);
        }
    }

    for (file, reason) in &total.failed {
        println!("  {} {}: {}", "skipped".yellow(), file.display(), reason.dimmed());
    }
    println!(
        "{} Staged {} files ({})",
        "✓".green().bold(),
        total.staged.len().to_string().cyan(),
        format_bytes(total.bytes_staged)
    );
    if total.ignored > 0 {
        println!("  Ignored: {}", total.ignored.to_string().dimmed());
    }

    Ok(())
}

/// Commit the staging area as a new snapshot
fn cmd_commit(root_path: PathBuf, message: &str) -> Result<()> {
    let wit = open_wit(root_path)?;
    let summary = wit.commit(message)?;

    println!(
        "[{}] {}",
        summary.commit.short_id().yellow().bold(),
        summary.commit.message
    );
    println!(
        " {} files staged, {} insertions(+), {} files in snapshot",
        summary.files_staged.to_string().cyan(),
        summary.insertions.to_string().green(),
        summary.snapshot_files
    );

    if !summary.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &summary.warnings {
            println!("  - {}", warning.yellow());
        }
    }

    Ok(())
}

/// Show staged, committed and untracked paths
fn cmd_status(root_path: PathBuf) -> Result<()> {
    let wit = open_wit(root_path)?;
    let status = wit.status()?;

    match &status.last_commit {
        Some(commit) => println!("On commit {} {}", commit.short_id().yellow(), commit.message.dimmed()),
        None => println!("{}", "No commits yet".yellow()),
    }

    if !status.staged.is_empty() {
        println!("\n{}", "Changes to be committed:".bold());
        for path in status.new_files() {
            println!("  {}{}", "new file:  ".green(), path.display());
        }
        for path in &status.modified {
            println!("  {}{}", "modified:  ".yellow(), path.display());
        }
    }

    if !status.untracked.is_empty() {
        println!("\n{}", "Untracked files:".bold());
        for path in &status.untracked {
            println!("  {}", path.display().to_string().red());
        }
    }

    if status.is_clean() {
        println!("\n{}", "Nothing to commit, working tree clean".dimmed());
    }

    Ok(())
}

/// List commits oldest first
fn cmd_log(root_path: PathBuf, limit: Option<usize>, oneline: bool) -> Result<()> {
    let wit = open_wit(root_path)?;
    let commits = wit.log()?;

    if commits.is_empty() {
        println!("{}", "No commits yet.".yellow());
        return Ok(());
    }

    let skip = limit.map_or(0, |n| commits.len().saturating_sub(n));
    for commit in commits.iter().skip(skip) {
        if oneline {
            println!("{} {}", commit.short_id().yellow(), commit.message);
        } else {
            print_commit(commit);
            println!();
        }
    }

    if skip > 0 {
        println!("{}", format!("Showing {} of {} commits", commits.len() - skip, commits.len()).dimmed());
    }

    Ok(())
}

/// Restore the working directory to a commit
///
/// Tracked files missing from the snapshot are deleted and every snapshot
/// file is written back. Untracked ignored files are left alone.
fn cmd_checkout(root_path: PathBuf, commit: &str) -> Result<()> {
    let wit = open_wit(root_path)?;
    let commit_id = resolve_id(&wit, commit)?;

    println!("{} {}", "Checking out".blue().bold(), commit_id.yellow());
    let result = wit.checkout(&commit_id)?;

    println!("{} Checkout complete", "✓".green().bold());
    println!("  Files restored: {}", result.files_restored.to_string().cyan());
    println!("  Files deleted: {}", result.files_deleted.to_string().yellow());
    println!("  Bytes written: {}", format_bytes(result.bytes_written).cyan());
    println!(
        "  Time: {}",
        format_duration(Duration::from_millis(result.duration_ms)).to_string().cyan()
    );

    Ok(())
}

/// Show a commit and its snapshot's files
fn cmd_show(root_path: PathBuf, commit: &str) -> Result<()> {
    let wit = open_wit(root_path)?;
    let commit = wit.resolve_commit(commit)?;
    let files = wit.snapshot_files(&commit.id)?;

    print_commit(&commit);
    println!("\n{} ({} files)", "Snapshot:".bold(), files.len());
    for file in &files {
        println!("  {}", file.display());
    }

    Ok(())
}

/// Garbage collect orphaned snapshots
fn cmd_gc(root_path: PathBuf, dry_run: bool) -> Result<()> {
    let wit = open_wit(root_path)?;

    if dry_run {
        println!("{}", "Analyzing garbage collection (dry run)...".blue().bold());
    } else {
        println!("{}", "Running garbage collection...".blue().bold());
    }
    let stats = wit.gc(dry_run)?;

    println!("  Snapshots examined: {}", stats.snapshots_examined);
    println!("  Orphaned snapshots: {}", stats.orphaned.len().to_string().yellow());
    for id in &stats.orphaned {
        println!("    - {}", id.dimmed());
    }

    if dry_run {
        println!("  Space to reclaim: {}", format_bytes(stats.bytes_reclaimed).green());
        println!("\n{}", "No changes made (dry run)".dimmed());
    } else {
        println!("\n{} Garbage collection complete", "✓".green().bold());
        println!("  Snapshots deleted: {}", stats.snapshots_deleted.to_string().green());
        println!("  Space reclaimed: {}", format_bytes(stats.bytes_reclaimed).green());
    }

    Ok(())
}

fn open_wit(root_path: PathBuf) -> Result<Wit> {
    Wit::open(root_path)
}

/// Full id for a prefix; unknown ids pass through so checkout reports them
fn resolve_id(wit: &Wit, commit: &str) -> Result<String> {
    match wit.resolve_commit(commit) {
        Ok(found) => Ok(found.id),
        Err(WitError::UnknownCommit(_)) => Ok(commit.to_string()),
        Err(e) => Err(e),
    }
}

fn print_commit(commit: &Commit) {
    println!("{} {}", "commit".yellow(), commit.id.yellow());
    println!("Date:   {}", commit.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();
    for line in commit.message.lines() {
        println!("    {}", line);
    }
}
