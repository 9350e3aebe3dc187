use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_content_catalog::random_base_title;
use nx_content_core::util::format_bytes;

use super::{AppContext, print_record_banner};
use crate::error::CliError;

/// Show catalog counts.
pub(crate) async fn run_stats(ctx: &AppContext) -> Result<(), CliError> {
    let catalog = ctx.load_catalog().await?;
    let stats = catalog.stats();
    let report = catalog.report();

    log::info!(
        "{}",
        "Catalog statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    log::info!("  Total:       {}", stats.total);
    log::info!("  Base titles: {}", stats.base);
    log::info!("  Updates:     {}", stats.updates);
    log::info!("  DLC:         {}", stats.addons);
    log::info!("");
    log::info!("  With release date:    {}", stats.with_date);
    log::info!("  Without release date: {}", stats.without_date);
    log::info!("  From version history: {}", stats.synthesized);
    log::info!("  Known size total:     {}", format_bytes(stats.total_size));
    log::info!("");
    log::info!(
        "  Manifest rows: {} ({} duplicates dropped, {} unnamed)",
        report.rows_read,
        report.duplicates_dropped,
        report.unnamed,
    );
    Ok(())
}

/// Show a random base title.
pub(crate) async fn run_random(ctx: &AppContext) -> Result<(), CliError> {
    let catalog = ctx.load_catalog().await?;
    match random_base_title(catalog.records(), &mut rand::thread_rng()) {
        Some(record) => {
            print_record_banner(record);
            Ok(())
        }
        None => Err(CliError::other("The catalog has no base titles")),
    }
}
