//! # QuickKnowledge CLI (`qk`)
//!
//! The `qk` binary is the command-line interface to the FAQ knowledge
//! base. It covers setup, browsing and search, admin editing, CSV
//! import/export, search analytics, and the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! qk --config ./config/qk.toml [--user you@example.com] <command>
//! ```
//!
//! ## Examples
//!
//! ```bash
//! # Create the database and load sample data
//! qk init
//! qk --user owner@example.com seed
//!
//! # Search (logged for analytics) and open a result
//! qk search wifi
//! qk show <id>
//!
//! # Bulk import from a spreadsheet export
//! qk --user owner@example.com import faqs.csv --dry-run
//!
//! # Serve the JSON API
//! qk serve
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use quickknowledge::admin_cmd::{self, FaqEdit};
use quickknowledge::context::AppContext;
use quickknowledge::{
    analytics, config, controller, export, get, import_cmd, migrate, ranking_cmd, search, server,
};

/// QuickKnowledge: an internal FAQ knowledge base.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/qk.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "qk",
    about = "QuickKnowledge, an internal FAQ knowledge base",
    version,
    long_about = "QuickKnowledge stores question/answer pairs in SQLite, offers keyword and \
    category search with search analytics, CSV import and export for bulk editing, and a \
    JSON HTTP API for the browser front end."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/qk.toml")]
    config: PathBuf,

    /// Act as this account (overrides `[auth].user`).
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// Insert five sample FAQs (admin).
    Seed,

    /// List FAQs, newest first.
    List {
        /// Only this category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Search question, answer and tags. The keyword is logged for analytics.
    Search {
        keyword: String,

        /// Only this category.
        #[arg(long)]
        category: Option<String>,
    },

    /// List categories with record counts.
    Categories,

    /// Show one FAQ and count the view.
    Show {
        id: String,

        /// Print the answer rendered as HTML.
        #[arg(long)]
        html: bool,
    },

    /// Recently updated FAQs.
    Recent,

    /// Most viewed FAQs.
    Popular,

    /// Your favorite FAQs.
    Favorites,

    /// Add or remove a favorite.
    Favorite { id: String },

    /// Mark an FAQ as helpful (once per profile).
    Helpful { id: String },

    /// Create an FAQ (admin).
    Add {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        category: Option<String>,
        /// Repeat for each tag.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Edit an FAQ (admin). Omitted fields keep their value.
    Update {
        id: String,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Replaces all tags. Repeat for each tag.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete an FAQ (admin).
    Delete { id: String },

    /// Import FAQs from a CSV file (admin).
    ///
    /// Required headers: `question`, `answer`. Optional: `category`, `tags`
    /// (space separated).
    Import {
        file: PathBuf,

        /// Show the preview without writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Export all FAQs as CSV (admin).
    Export {
        /// Output file. Defaults to `faq_export_<date>.csv`.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Delete every FAQ (admin).
    DeleteAll {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Top search keywords over the analytics window (admin).
    Analytics,

    /// Manage administrators.
    Admins {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Interactive search over stdin.
    Browse,

    /// Start the JSON HTTP server.
    Serve,
}

#[derive(Subcommand)]
enum AdminAction {
    /// List admins.
    List,
    /// Add an admin (super-admin only).
    Add { email: String },
    /// Remove an admin (super-admin only).
    Remove { email: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
            return Ok(());
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
            return Ok(());
        }
        _ => {}
    }

    let ctx = AppContext::open(&cfg, cli.user.as_deref()).await?;
    let result = run_command(&ctx, cli.command).await;
    ctx.close().await;
    result
}

async fn run_command(ctx: &AppContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init | Commands::Serve => unreachable!("handled before opening a context"),
        Commands::Seed => admin_cmd::run_seed(ctx).await,
        Commands::List { category } => search::run_list(ctx, category).await,
        Commands::Search { keyword, category } => {
            search::run_search(ctx, &keyword, category).await
        }
        Commands::Categories => search::run_categories(ctx).await,
        Commands::Show { id, html } => get::run_show(ctx, &id, html).await,
        Commands::Recent => ranking_cmd::run_recent(ctx).await,
        Commands::Popular => ranking_cmd::run_popular(ctx).await,
        Commands::Favorites => ranking_cmd::run_favorites(ctx).await,
        Commands::Favorite { id } => ranking_cmd::run_favorite(ctx, &id).await,
        Commands::Helpful { id } => ranking_cmd::run_helpful(ctx, &id).await,
        Commands::Add {
            question,
            answer,
            category,
            tags,
        } => {
            let edit = FaqEdit {
                question: Some(question),
                answer: Some(answer),
                category,
                tags,
            };
            admin_cmd::run_add(ctx, edit).await
        }
        Commands::Update {
            id,
            question,
            answer,
            category,
            tags,
        } => {
            let edit = FaqEdit {
                question,
                answer,
                category,
                tags,
            };
            admin_cmd::run_update(ctx, &id, edit).await
        }
        Commands::Delete { id } => admin_cmd::run_delete(ctx, &id).await,
        Commands::Import { file, dry_run } => import_cmd::run_import(ctx, &file, dry_run).await,
        Commands::Export { output } => export::run_export(ctx, output.as_deref()).await,
        Commands::DeleteAll { yes } => admin_cmd::run_delete_all(ctx, yes).await,
        Commands::Analytics => analytics::run_analytics(ctx).await,
        Commands::Admins { action } => match action {
            AdminAction::List => admin_cmd::run_admins_list(ctx).await,
            AdminAction::Add { email } => admin_cmd::run_admins_add(ctx, &email).await,
            AdminAction::Remove { email } => admin_cmd::run_admins_remove(ctx, &email).await,
        },
        Commands::Browse => controller::run_browse(ctx).await,
    }
}
