//! Engram CLI — one-shot, synchronous commands over the memory stores.
//!
//! Diagnostics go to stderr (and the append-only debug log); data output is
//! stdout only. Exit code 0 on success, non-zero on fatal error.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use engram_core::config::{default_agents_home, EngramConfig};

mod commands;
mod context;
mod logging;

use context::AppContext;

#[derive(Parser)]
#[command(
    name = "engram",
    about = "Persistent agentic memory: capture, rank, and inject session facts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the agents-home directory (default: ~/.agents)
    #[arg(long, global = true)]
    home: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LoadMode {
    SessionStart,
    Prompt,
}

#[derive(Clone, Copy, ValueEnum)]
enum SaveMode {
    Explicit,
    Auto,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database, schema, and vector collection
    Init,

    /// Emit memory context for injection (stdin: prompt JSON in prompt mode)
    Load {
        #[arg(value_enum)]
        mode: LoadMode,
        /// Project path for scoping (default: current directory)
        #[arg(long)]
        project: Option<String>,
    },

    /// Save a memory (stdin: content or hook JSON)
    Save {
        #[arg(value_enum)]
        mode: SaveMode,
        /// Agent or user responsible
        #[arg(long, default_value = "claude-code")]
        who: String,
        /// Project path (default: current directory)
        #[arg(long)]
        project: Option<String>,
        /// Content to save (alternative to stdin)
        #[arg(long)]
        content: Option<String>,
    },

    /// Hybrid search over stored memories
    Query {
        search: String,
        #[arg(long, short = 'n', default_value_t = 20)]
        limit: usize,
        /// Emit results as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Delete old low-value auto-extracted memories
    Prune,

    /// Apply pending schema migrations
    Migrate {
        #[command(subcommand)]
        action: Option<MigrateAction>,
        /// Load migrations from a directory instead of the built-in set
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Re-embed every memory into the vector collection
    Reindex,

    /// Report provider, vector collection, and database health
    Status,

    /// Import legacy markdown memory files
    ImportMarkdown { dir: PathBuf },

    /// Regenerate the MEMORY.md working-memory document
    Digest,
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Show applied and pending migrations
    Status,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let agents_home = match cli.home {
        Some(home) => home,
        None => default_agents_home().context("resolving agents home")?,
    };
    logging::init(&agents_home);

    let config = EngramConfig::load(&agents_home).context("loading config")?;
    let ctx = AppContext::new(agents_home, config);

    match cli.command {
        Commands::Init => commands::init::run(&ctx),
        Commands::Load { mode, project } => {
            let project = project_or_cwd(project);
            match mode {
                LoadMode::SessionStart => commands::load::session_start(&ctx, project.as_deref()),
                LoadMode::Prompt => commands::load::prompt(&ctx, project.as_deref()),
            }
        }
        Commands::Save {
            mode,
            who,
            project,
            content,
        } => match mode {
            SaveMode::Explicit => {
                let project = project_or_cwd(project);
                commands::save::explicit(&ctx, &who, project.as_deref(), content)
            }
            SaveMode::Auto => commands::save::auto(&ctx),
        },
        Commands::Query {
            search,
            limit,
            json,
        } => commands::query::run(&ctx, &search, limit, json),
        Commands::Prune => commands::maintain::prune(&ctx),
        Commands::Migrate { action, dir } => match action {
            Some(MigrateAction::Status) => commands::migrate::status(&ctx, dir.as_deref()),
            None => commands::migrate::run(&ctx, dir.as_deref()),
        },
        Commands::Reindex => commands::maintain::reindex(&ctx),
        Commands::Status => commands::status::run(&ctx),
        Commands::ImportMarkdown { dir } => commands::maintain::import_markdown(&ctx, &dir),
        Commands::Digest => commands::maintain::digest(&ctx),
    }
}

fn project_or_cwd(project: Option<String>) -> Option<String> {
    project.or_else(|| {
        std::env::current_dir()
            .ok()
            .map(|p| p.display().to_string())
    })
}
