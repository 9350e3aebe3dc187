//! The in-memory catalog: merging parsed sources into records, and the
//! search, sort, pagination and grouping that listings are built from.

pub mod catalog;
pub mod merge;
pub mod paginate;
pub mod related;
pub mod search;
pub mod sort;
pub mod stats;
pub mod view_state;

pub use catalog::Catalog;
pub use merge::{MergeOptions, MergeOutput, MergeReport, merge};
pub use paginate::{Page, paginate, total_pages};
pub use related::{RelatedContent, related};
pub use search::{RoleFilter, SearchOptions, SearchQuery, search};
pub use sort::{SortDirection, SortField, SortSpec, compare, sort_records, sorted};
pub use stats::{CatalogStats, random_base_title};
pub use view_state::{DisplayMode, ViewState};
