use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_content_catalog::{DisplayMode, paginate};
use nx_content_core::TitleId;

use super::{AppContext, print_record_banner, print_record_line};
use crate::cli_types::ListArgs;
use crate::error::CliError;

/// List one page of the filtered, sorted catalog.
pub(crate) async fn run_list(ctx: &AppContext, args: ListArgs) -> Result<(), CliError> {
    let state = args.view_state(&ctx.prefs);
    let per_page = args.per_page(&ctx.prefs);
    let catalog = ctx.load_catalog().await?;

    let query = state.search_query(ctx.prefs.name_search_options());
    let matches = catalog.list(&query, state.sort_spec());
    let page = paginate(&matches, state.page, per_page);

    if page.items.is_empty() {
        log::info!(
            "{}",
            "No matching titles.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }

    for record in page.items {
        match state.display {
            DisplayMode::Grid => print_record_line(record),
            DisplayMode::Banner => print_record_banner(record),
        }
    }

    log::info!("");
    log::info!(
        "Page {} of {} ({}-{} of {} titles)",
        page.page,
        page.total_pages,
        page.first_index(),
        page.first_index() + page.items.len() - 1,
        page.total_items,
    );
    if page.has_next() {
        let mut next = state.clone();
        next.page = page.page + 1;
        log::info!(
            "Next page: {}",
            next.to_string().if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Print the query string that reproduces a listing.
pub(crate) fn run_link(ctx: &AppContext, args: ListArgs, game: Option<TitleId>) {
    let mut state = args.view_state(&ctx.prefs);
    if game.is_some() {
        state.game = game;
    }
    let link = state.to_string();
    if link.is_empty() {
        log::info!("?");
    } else {
        log::info!("{link}");
    }
}
