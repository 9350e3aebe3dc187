use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_content_core::ContentRole;
use nx_content_lib::fetch_recent;
use nx_content_sources::RecentItem;

use super::{AppContext, role_label};
use crate::error::CliError;
use crate::spinner::Spinner;

/// Show the newest items from the RSS feeds.
pub(crate) async fn run_recent(
    ctx: &AppContext,
    kind: Option<ContentRole>,
    limit: usize,
) -> Result<(), CliError> {
    let fetcher = ctx.fetcher()?;
    let spinner = Spinner::start("Fetching feeds...", ctx.quiet);
    let recent = fetch_recent(&fetcher, &ctx.feed_preferences()).await;
    spinner.finish();

    let items: Vec<&RecentItem> = match kind {
        Some(role) => recent.for_role(role).iter().collect(),
        None => recent.merged(),
    };

    let heading = match kind {
        Some(role) => format!("Recently added ({})", role_label(role)),
        None => "Recently added".to_string(),
    };
    log::info!("{}", heading.if_supports_color(Stdout, |t| t.bold()));
    log::info!("");

    if items.is_empty() {
        log::info!(
            "{}",
            "Nothing to show.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }

    for item in items.into_iter().take(limit) {
        print_item(item);
    }
    Ok(())
}

fn print_item(item: &RecentItem) {
    let published = item
        .published
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    log::info!(
        "  {} {}",
        item.title.if_supports_color(Stdout, |t| t.bold()),
        published.if_supports_color(Stdout, |t| t.dimmed()),
    );

    let mut fields = Vec::new();
    if let Some(id) = &item.title_id {
        fields.push(id.to_string());
    }
    if let Some(kind) = &item.kind {
        fields.push(kind.clone());
    }
    if let Some(version) = &item.version {
        fields.push(format!("v{version}"));
    }
    if let Some(size) = &item.size {
        fields.push(size.clone());
    }
    if let Some(format) = &item.format {
        fields.push(format.clone());
    }
    if !fields.is_empty() {
        log::info!("    {}", fields.join(" | "));
    }
}
