//! editor-projects: search and open VS Code, Cursor and Antigravity projects
//!
//! Recent projects are read from the editor's own history; local projects are
//! discovered under the configured project roots.

use anyhow::Result;
use clap::{Parser, Subcommand};

use editor_projects::config::Editor;
use editor_projects::editor::ScanLimits;
use editor_projects::logging;

mod commands;

#[derive(Parser)]
#[command(name = "editor-projects")]
#[command(about = "Search and open recent and local editor projects", long_about = None)]
#[command(version)]
struct Cli {
    /// Editor to read history from and open projects with
    #[arg(
        long,
        short,
        global = true,
        value_enum,
        default_value = "code",
        env = "EDITOR_PROJECTS_EDITOR"
    )]
    editor: Editor,

    /// Show debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recent and local projects
    List {
        /// Comma-separated directories to scan for local projects (~ allowed)
        #[arg(long, env = "EDITOR_PROJECTS_ROOTS", default_value = "")]
        roots: String,

        /// Only show recent projects
        #[arg(long, conflicts_with = "local")]
        recent: bool,

        /// Only show local projects
        #[arg(long)]
        local: bool,

        /// Only show projects whose path contains this pattern
        #[arg(long, short)]
        filter: Option<String>,

        /// Limit number of results per section
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Deepest directory level listed below each root
        #[arg(long, default_value_t = ScanLimits::default().max_depth)]
        max_depth: usize,

        /// Maximum number of local projects across all roots
        #[arg(long, default_value_t = ScanLimits::default().max_projects)]
        max_projects: usize,
    },

    /// Open a project in the editor
    Open {
        /// Project path (~ allowed)
        project_path: String,

        /// Open in a new window
        #[arg(short = 'n', long)]
        new_window: bool,
    },

    /// Show the storage file and launcher locations for the editor
    Paths,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Commands::List {
            roots,
            recent,
            local,
            filter,
            limit,
            json,
            max_depth,
            max_projects,
        } => {
            // Neither flag means both sections
            let both = !recent && !local;
            let options = commands::list::ListOptions {
                editor: cli.editor,
                project_roots: roots,
                show_recent: recent || both,
                show_local: local || both,
                filter,
                limit,
                json,
                scan_limits: ScanLimits {
                    max_depth,
                    max_projects,
                },
            };
            let output = commands::list::execute(options)?;
            println!("{}", output);
        }

        Commands::Open {
            project_path,
            new_window,
        } => {
            commands::open::execute(cli.editor, &project_path, new_window)?;
        }

        Commands::Paths => {
            println!("{}", commands::paths::execute(cli.editor)?);
        }
    }

    Ok(())
}
