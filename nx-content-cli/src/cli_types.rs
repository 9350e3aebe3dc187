//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use nx_content_catalog::{DisplayMode, RoleFilter, SortDirection, SortField, ViewState};
use nx_content_core::{ContentRole, TitleId};
use nx_content_lib::Preferences;

#[derive(Parser)]
#[command(name = "nx-content")]
#[command(about = "Browse and search the NX content catalog", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Export the diagnostic log to this file on exit
    #[arg(long, global = true)]
    pub diagnostics: Option<PathBuf>,

    /// Read every data source from this directory instead of the network
    /// (working.txt, titles_db.txt, working.json, versions.json)
    #[arg(long, global = true)]
    pub offline_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filter, sort and paging options shared by `list` and `link`.
#[derive(Args, Clone, Default)]
pub(crate) struct ListArgs {
    /// Start from a shared query string (e.g. "?sort=name&type=dlc")
    #[arg(long)]
    pub query: Option<String>,

    /// Content type: all, base, update or dlc
    #[arg(short = 't', long = "type")]
    pub role: Option<RoleFilter>,

    /// Fuzzy match on the title name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Substring match on the title ID
    #[arg(long)]
    pub tid: Option<String>,

    /// Sort field: id, name, size or date
    #[arg(short, long)]
    pub sort: Option<SortField>,

    /// Sort order: asc or desc
    #[arg(short, long)]
    pub order: Option<SortDirection>,

    /// Page to show (1-based)
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Items per page (default from preferences)
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Layout: grid (one line per title) or banner
    #[arg(long)]
    pub display: Option<DisplayMode>,
}

impl ListArgs {
    /// Combine `--query` with the individual flags; flags win.
    pub(crate) fn view_state(&self, prefs: &Preferences) -> ViewState {
        let mut state = match &self.query {
            Some(q) => ViewState::from_query(q),
            None => ViewState {
                display: prefs.view_mode,
                ..ViewState::default()
            },
        };
        if let Some(role) = self.role {
            state.role = role;
        }
        if let Some(name) = &self.name {
            state.name = name.clone();
        }
        if let Some(tid) = &self.tid {
            state.tid = tid.clone();
        }
        if let Some(sort) = self.sort {
            state.sort = sort;
        }
        if let Some(order) = self.order {
            state.order = order;
        }
        if let Some(page) = self.page {
            state.page = page.max(1);
        }
        if let Some(display) = self.display {
            state.display = display;
        }
        state
    }

    pub(crate) fn per_page(&self, prefs: &Preferences) -> usize {
        self.per_page.unwrap_or(prefs.items_per_page).max(1)
    }
}

/// Which artwork to download.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub(crate) enum ArtworkKind {
    #[default]
    Banner,
    Icon,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List catalog entries
    List {
        #[command(flatten)]
        args: ListArgs,
    },

    /// Show one title with its updates, add-ons and remote details
    Show {
        /// Title ID (16 hex digits)
        tid: TitleId,

        /// Skip the details API, download stats and artwork lookups
        #[arg(long)]
        no_remote: bool,
    },

    /// Show recently added content from the RSS feeds
    Recent {
        /// Only this feed: base, update or dlc
        #[arg(short, long)]
        kind: Option<ContentRole>,

        /// Maximum number of items to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show catalog statistics
    Stats,

    /// Pick a random base title
    Random,

    /// Print the shareable query string for a listing
    Link {
        #[command(flatten)]
        args: ListArgs,

        /// Also open the detail view for this title
        #[arg(long)]
        game: Option<TitleId>,
    },

    /// Download a title's artwork, falling back through smaller images
    Artwork {
        /// Title ID (16 hex digits); updates and add-ons use their base title
        tid: TitleId,

        /// Output file
        #[arg(short, long)]
        out: PathBuf,

        #[arg(long, value_enum, default_value_t)]
        kind: ArtworkKind,
    },

    /// Manage preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage the title details cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current preferences and where data sources come from
    Show,

    /// Print the preferences file path
    Path,

    /// Change one preference (dotted keys for nested tables, e.g. data_sources.manifest)
    Set { key: String, value: String },

    /// Restore default preferences
    Reset,
}

#[derive(Subcommand)]
pub(crate) enum CacheAction {
    /// List cached title details
    List,

    /// Remove all cached title details
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_query() {
        let cli = Cli::try_parse_from([
            "nx-content",
            "list",
            "--query",
            "?sort=name&order=asc&page=4&name=kart",
            "--order",
            "desc",
            "--type",
            "dlc",
        ])
        .unwrap();
        let Commands::List { args } = cli.command else {
            panic!("expected list");
        };
        let state = args.view_state(&Preferences::default());
        assert_eq!(state.sort, SortField::Name);
        assert_eq!(state.order, SortDirection::Desc);
        assert_eq!(state.page, 4);
        assert_eq!(state.name, "kart");
        assert_eq!(state.role, RoleFilter::Only(ContentRole::Addon));
    }

    #[test]
    fn test_preferences_drive_defaults() {
        let mut prefs = Preferences::default();
        prefs.items_per_page = 40;
        prefs.view_mode = DisplayMode::Banner;
        let args = ListArgs::default();
        assert_eq!(args.per_page(&prefs), 40);
        assert_eq!(args.view_state(&prefs).display, DisplayMode::Banner);
    }

    #[test]
    fn test_rejects_bad_title_id() {
        assert!(Cli::try_parse_from(["nx-content", "show", "not-an-id"]).is_err());
        assert!(Cli::try_parse_from(["nx-content", "show", "0100000000010000"]).is_ok());
    }
}
