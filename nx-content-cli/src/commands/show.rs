use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_content_catalog::ViewState;
use nx_content_core::dates::format_date;
use nx_content_core::util::{format_bytes, format_size};
use nx_content_core::{ContentRecord, ContentRole, TitleId};
use nx_content_sources::{ArtworkUrls, DetailsCache, DetailsClient, TitleDetails};

use super::{AppContext, print_record_line, role_label};
use crate::error::CliError;

/// Show one title: its record(s), related content and remote details.
pub(crate) async fn run_show(
    ctx: &AppContext,
    tid: TitleId,
    no_remote: bool,
) -> Result<(), CliError> {
    let catalog = ctx.load_catalog().await?;
    let records: Vec<&ContentRecord> = catalog.by_id(&tid).collect();
    let Some(primary) = records.first() else {
        return Err(CliError::not_found(tid.to_string()));
    };

    log::info!(
        "{}",
        primary
            .name_or_unknown()
            .if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "  {} [{}]",
        tid.if_supports_color(Stdout, |t| t.cyan()),
        role_label(tid.role()),
    );
    for record in &records {
        log::info!(
            "  Version: {}, Size: {}, Released: {}",
            record.version.as_deref().unwrap_or("-"),
            format_size(record.known_size()),
            format_date(record.release_date.as_deref()),
        );
    }

    let related = catalog.related(&tid);
    if tid.role() != ContentRole::Base {
        match (&related.base, &related.base_id) {
            (Some(base), _) => log::info!(
                "  Base title: {} ({})",
                base.name_or_unknown(),
                base.identifier
            ),
            (None, Some(base_id)) => log::info!("  Base title: {base_id} (not in catalog)"),
            (None, None) => {}
        }
    }

    if !related.updates.is_empty() && tid.role() != ContentRole::Update {
        print_limited("Updates", &related.updates, ctx.prefs.max_update_display);
    }
    if !related.addons.is_empty() && tid.role() == ContentRole::Base {
        print_limited("DLC", &related.addons, ctx.prefs.max_dlc_display);
    }

    let link = ViewState {
        game: Some(tid.clone()),
        ..ViewState::default()
    };
    log::info!("");
    log::info!("  Link: {}", link.if_supports_color(Stdout, |t| t.dimmed()));

    if no_remote {
        return Ok(());
    }
    show_remote(ctx, &tid).await;
    Ok(())
}

fn print_limited(heading: &str, records: &[&ContentRecord], limit: usize) {
    log::info!("");
    log::info!(
        "{} ({})",
        heading.if_supports_color(Stdout, |t| t.bold()),
        records.len()
    );
    for record in records.iter().take(limit) {
        print_record_line(record);
    }
    if records.len() > limit {
        log::info!(
            "  {}",
            format!("... and {} more", records.len() - limit)
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

/// Details API, download count and artwork. Failures here only warn.
async fn show_remote(ctx: &AppContext, tid: &TitleId) {
    let client = match DetailsClient::new(ctx.prefs.details_config()) {
        Ok(client) => client,
        Err(e) => {
            log::warn!("Remote details unavailable: {e}");
            return;
        }
    };
    let client = match DetailsCache::open_default() {
        Ok(cache) => client.with_cache(cache),
        Err(e) => {
            log::debug!("Details cache disabled: {e}");
            client
        }
    };

    let (details, downloads) = tokio::join!(client.fetch_details(tid), client.download_count(tid));

    log::info!("");
    match details {
        Ok(details) => print_details(&details),
        Err(e) => log::warn!(
            "{} {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            e,
        ),
    }
    if let Some(count) = downloads {
        log::info!("  Downloads: {count}");
    }

    let artwork = ArtworkUrls::for_title(tid);
    log::info!("");
    log::info!("{}", "Artwork".if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Banner: {}", artwork.banner);
    log::info!("  Icon:   {}", artwork.icon_large);
    for (i, url) in artwork.screenshots.iter().enumerate() {
        log::info!("  Screenshot {}: {url}", i + 1);
    }
}

fn print_details(details: &TitleDetails) {
    log::info!("{}", "Details".if_supports_color(Stdout, |t| t.bold()));
    let fields = [
        ("Name", details.name.clone()),
        ("Publisher", details.publisher.clone()),
        ("Version", details.version.clone()),
        ("Released", details.release_date.as_deref().map(|d| format_date(Some(d)))),
        ("Size", details.size.map(format_bytes)),
        ("Rating", details.rating.clone()),
        (
            "Categories",
            (!details.categories.is_empty()).then(|| details.categories.join(", ")),
        ),
        (
            "Languages",
            (!details.languages.is_empty()).then(|| details.languages.join(", ")),
        ),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            log::info!("  {label}: {value}");
        }
    }
    if let Some(description) = &details.description {
        log::info!("");
        for line in description.lines() {
            log::info!("  {line}");
        }
    }
}
