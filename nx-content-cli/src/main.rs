//! nx-content CLI
//!
//! Command-line front end for the NX content catalog.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_content_lib::settings::load_preferences;

use cli_types::{CacheAction, Cli, Commands, ConfigAction};
use commands::AppContext;
use error::CliError;

fn main() {
    let Cli {
        quiet,
        verbose,
        logfile,
        diagnostics: diagnostics_path,
        offline_dir,
        command,
    } = Cli::parse();

    let diagnostics = match logging::init(quiet, verbose, logfile.as_deref()) {
        Ok(diagnostics) => diagnostics,
        Err(e) => {
            eprintln!("Failed to open log file: {e}");
            std::process::exit(1);
        }
    };

    let prefs = load_preferences().with_env_overrides();
    let ctx = AppContext::new(prefs, offline_dir, quiet);
    let result = run(&ctx, command);

    if let Err(e) = &result {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
    }
    if let Some(path) = &diagnostics_path {
        logging::export_diagnostics(&diagnostics, path);
    }
    log::logger().flush();
    if result.is_err() {
        std::process::exit(1);
    }
}

fn run(ctx: &AppContext, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Link { args, game } => {
            commands::list::run_link(ctx, args, game);
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
            ConfigAction::Set { key, value } => commands::config::run_config_set(&key, &value),
            ConfigAction::Reset => commands::config::run_config_reset(),
        },
        Commands::Cache { action } => {
            match action {
                CacheAction::List => commands::cache::run_cache_list(),
                CacheAction::Clear => commands::cache::run_cache_clear(),
            }
            Ok(())
        }
        command => {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {e}")))?;
            rt.block_on(run_async(ctx, command))
        }
    }
}

async fn run_async(ctx: &AppContext, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::List { args } => commands::list::run_list(ctx, args).await,
        Commands::Show { tid, no_remote } => commands::show::run_show(ctx, tid, no_remote).await,
        Commands::Recent { kind, limit } => commands::recent::run_recent(ctx, kind, limit).await,
        Commands::Stats => commands::stats::run_stats(ctx).await,
        Commands::Random => commands::stats::run_random(ctx).await,
        Commands::Artwork { tid, out, kind } => {
            commands::artwork::run_artwork(ctx, tid, &out, kind).await
        }
        Commands::Link { .. } | Commands::Config { .. } | Commands::Cache { .. } => Ok(()),
    }
}
