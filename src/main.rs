use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use value_train::commands::{
    self, AdvanceOptions, ArtifactCheckOptions, ChecklistOptions, CommandStatus, MigrateOptions,
};
use value_train::config::ProjectLayout;

#[derive(Parser)]
#[command(name = "vt")]
#[command(version, about = "Session document automation for phase-driven delivery pipelines")]
struct Cli {
    /// Root directory of the project (default: current directory)
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Advance the session to the next pipeline phase
    Advance {
        /// Show what would be updated without making changes
        #[arg(long)]
        dry_run: bool,

        /// Force advance to a specific phase (bypasses normal progression)
        #[arg(long)]
        force_phase: Option<String>,
    },
    /// Migrate a legacy session file to the current session document format
    Migrate {
        /// Path to the legacy session file
        #[arg(long)]
        legacy_file: PathBuf,

        /// Output file (default: the project's session document)
        #[arg(long)]
        output_file: Option<PathBuf>,

        /// Show what would be generated without creating files
        #[arg(long)]
        dry_run: bool,

        /// Back up an existing session document first
        #[arg(long)]
        backup: bool,
    },
    /// Check that the artifacts required by a phase exist
    CheckArtifacts {
        /// Phase to check (default: current phase from the session document)
        #[arg(long)]
        phase: Option<String>,

        /// Exit with code 1 if any artifacts are missing
        #[arg(long)]
        strict: bool,

        /// Create placeholder files for missing artifacts
        #[arg(long)]
        create_missing: bool,
    },
    /// Check the current mode's checklist for unchecked items
    CheckTodo {
        /// Exit with code 1 if any unchecked items are found
        #[arg(long)]
        strict: bool,
    },
}

/// Initialize tracing on stderr so dry-run previews own stdout
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "value_train=info,vt=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<CommandStatus> {
    let root = match cli.project_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let layout = ProjectLayout::from_env(root);
    let now = chrono::Local::now().naive_local();

    match cli.command {
        Commands::Advance {
            dry_run,
            force_phase,
        } => commands::advance(
            &layout,
            &AdvanceOptions {
                dry_run,
                force_phase,
            },
            now,
        ),
        Commands::Migrate {
            legacy_file,
            output_file,
            dry_run,
            backup,
        } => commands::migrate(
            &layout,
            &MigrateOptions {
                legacy_file,
                output_file,
                dry_run,
                backup,
            },
            now,
        ),
        Commands::CheckArtifacts {
            phase,
            strict,
            create_missing,
        } => commands::check_artifacts(
            &layout,
            &ArtifactCheckOptions {
                phase,
                strict,
                create_missing,
            },
        ),
        Commands::CheckTodo { strict } => {
            commands::check_todo(&layout, &ChecklistOptions { strict })
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(CommandStatus::Success) => ExitCode::SUCCESS,
        Ok(CommandStatus::Failed) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
