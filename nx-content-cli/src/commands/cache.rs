use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_content_core::util::format_bytes;
use nx_content_sources::DetailsCache;

/// List cached title details.
pub(crate) fn run_cache_list() {
    let listing = DetailsCache::open_default().and_then(|cache| cache.list());
    match listing {
        Ok(entries) => {
            if entries.is_empty() {
                log::info!(
                    "{}",
                    "No cached title details.".if_supports_color(Stdout, |t| t.dimmed()),
                );
                log::info!("Details are cached when 'nx-content show <tid>' fetches them.");
                return;
            }

            log::info!(
                "{}",
                "Cached title details:".if_supports_color(Stdout, |t| t.bold()),
            );
            log::info!("");

            let mut total_size = 0u64;
            for entry in &entries {
                total_size += entry.file_size;
                log::info!(
                    "  {} {}",
                    entry.title_id.if_supports_color(Stdout, |t| t.cyan()),
                    entry.name.as_deref().unwrap_or("Unknown Title"),
                );
                log::info!(
                    "    Size: {}, Fetched: {}{}",
                    format_bytes(entry.file_size),
                    entry.fetched_at.format("%Y-%m-%d %H:%M"),
                    if entry.expired {
                        format!(" {}", "(expired)".if_supports_color(Stdout, |t| t.yellow()))
                    } else {
                        String::new()
                    },
                );
            }
            log::info!("");
            log::info!(
                "Total: {} entries, {}",
                entries.len(),
                format_bytes(total_size)
            );
        }
        Err(e) => {
            log::warn!(
                "{} Error listing cache: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
        }
    }
}

/// Clear the details cache.
pub(crate) fn run_cache_clear() {
    match DetailsCache::open_default().and_then(|cache| cache.clear()) {
        Ok(freed) => {
            log::info!(
                "{} Cache cleared ({} freed)",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                format_bytes(freed),
            );
        }
        Err(e) => {
            log::warn!(
                "{} Error clearing cache: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
        }
    }
}
