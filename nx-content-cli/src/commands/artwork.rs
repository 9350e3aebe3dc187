use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_content_core::TitleId;
use nx_content_core::util::format_bytes;
use nx_content_sources::ArtworkUrls;

use super::AppContext;
use crate::cli_types::ArtworkKind;
use crate::error::CliError;

/// Download the first available image of `kind` to `out`.
pub(crate) async fn run_artwork(
    ctx: &AppContext,
    tid: TitleId,
    out: &Path,
    kind: ArtworkKind,
) -> Result<(), CliError> {
    let urls = ArtworkUrls::for_title(&tid);
    let chain = match kind {
        ArtworkKind::Banner => urls.banner_chain(),
        ArtworkKind::Icon => urls.icon_chain(),
    };
    log::debug!("Artwork candidates for {tid}: {:?}", chain.candidates());

    let fetcher = ctx.fetcher()?;
    let Some((url, bytes)) = chain.fetch_first(fetcher.client()).await else {
        return Err(CliError::other(format!("No artwork available for {tid}")));
    };

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, &bytes)?;

    log::info!(
        "{} Saved {} ({}) to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        url.if_supports_color(Stdout, |t| t.cyan()),
        format_bytes(bytes.len() as u64),
        out.display(),
    );
    Ok(())
}
