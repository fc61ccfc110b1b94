//! attendlog library root.
//! Exposes the CLI parser, the HTTP router, the high-level run() function and
//! the attendance engine modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod server;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use db::initialize::init_db;
use db::pool::DbPool;
use errors::AppResult;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Serve { .. } => commands::serve::handle(&cli.command, cfg),
        Commands::Scan { .. } => commands::scan::handle(&cli.command, cfg),
        Commands::List { .. } => commands::list::handle(&cli.command, cfg),
        Commands::Report { .. } => commands::report::handle(&cli.command, cfg),
        Commands::Settings { .. } => commands::settings::handle(&cli.command, cfg),
        Commands::Year { .. } => commands::year::handle(&cli.command, cfg),
        Commands::Student { .. } => commands::student::handle(&cli.command, cfg),
        Commands::Teacher { .. } => commands::teacher::handle(&cli.command, cfg),
        Commands::Purge { .. } => commands::purge::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the default.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second install (tests, embedding) is not an error worth reporting.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let serving = matches!(cli.command, Commands::Serve { .. });
    init_tracing(if serving {
        "attendlog=info,tower_http=info"
    } else {
        "warn"
    });

    let mut cfg = Config::load()?;
    cfg.apply_env_overrides()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    // Every data command runs on an up-to-date schema; `serve` migrates on start.
    let needs_schema = !matches!(
        cli.command,
        Commands::Init | Commands::Config { .. } | Commands::Serve { .. } | Commands::Backup { .. }
    );
    if needs_schema {
        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;
    }

    dispatch(&cli, &cfg)
}
