//! CLI command handling for tsmove

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::error;
use tsmove_config::{logging, AppConfig};
use tsmove_foundation::paths::{absolutize, to_unix};
use tsmove_foundation::{MoveError, MoveResult};
use tsmove_services::{move_in_project, MoveReport, ReferenceIndexer};

/// Exit code when the move target is already present
const EXIT_TARGET_EXISTS: i32 = 2;
const EXIT_FAILURE: i32 = 1;

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "tsmove")]
#[command(about = "Move TypeScript files and directories and rewrite every import that points at them")]
#[command(version)]
pub struct Cli {
    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Move a file or directory; paths are relative to the project root
    Move {
        /// File or directory to move
        source: PathBuf,
        /// Destination path, must not exist yet
        target: PathBuf,
        /// Project root to index
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// List every indexed import of a file as `path:start-end`
    Refs {
        /// File whose referrers are listed
        file: PathBuf,
        /// Project root to index
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Parse arguments, run the command and return the process exit code
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let root = match &cli.command {
        Commands::Move { root, .. } | Commands::Refs { root, .. } => root.clone(),
    };

    let config = match AppConfig::load(&root) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_FAILURE;
        }
    };
    logging::initialize(&config);

    let result = match cli.command {
        Commands::Move {
            source,
            target,
            root,
            format,
        } => run_move(&root, &source, &target, format, &config).await,
        Commands::Refs { file, root } => run_refs(&root, &file, &config).await,
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            exit_code(&e)
        }
    }
}

fn exit_code(error: &MoveError) -> i32 {
    match error {
        MoveError::TargetExists { .. } => EXIT_TARGET_EXISTS,
        _ => EXIT_FAILURE,
    }
}

async fn run_move(
    root: &Path,
    source: &Path,
    target: &Path,
    format: OutputFormat,
    config: &AppConfig,
) -> MoveResult<()> {
    let report = move_in_project(root, source, target, config).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Pretty => print!("{}", render_report(root, &report)),
    }
    Ok(())
}

async fn run_refs(root: &Path, file: &Path, config: &AppConfig) -> MoveResult<()> {
    let mut indexer = ReferenceIndexer::with_defaults(root, config.scan.clone())?;
    indexer.initialize().await?;

    let project_root = indexer.root().to_path_buf();
    for reference in indexer.references_to(file) {
        println!("{}:{}", display_path(&project_root, &reference.file), reference.span);
    }
    Ok(())
}

/// Root-relative, forward-slash rendering for terminal output
fn display_path(root: &Path, path: &Path) -> String {
    to_unix(path.strip_prefix(root).unwrap_or(path))
}

fn render_report(root: &Path, report: &MoveReport) -> String {
    let root = std::env::current_dir()
        .map(|cwd| absolutize(&cwd, root))
        .unwrap_or_else(|_| root.to_path_buf());
    let mut out = String::new();

    out.push_str(&format!("Moved {} file(s)\n", report.moved.len()));
    for moved in &report.moved {
        out.push_str(&format!(
            "  {} -> {}\n",
            display_path(&root, &moved.from),
            display_path(&root, &moved.to)
        ));
    }

    out.push_str(&format!("Updated imports in {} file(s)\n", report.rewritten.len()));
    for file in &report.rewritten {
        out.push_str(&format!("  {}\n", display_path(&root, file)));
    }

    if !report.failed.is_empty() {
        out.push_str(&format!("Could not update {} file(s), fix manually:\n", report.failed.len()));
        for failure in &report.failed {
            out.push_str(&format!("  {}: {}\n", display_path(&root, &failure.file), failure.error));
        }
    }
    out
}
