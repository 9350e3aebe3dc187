//! Input side of nx-content: every snapshot format the catalog is built
//! from, the fetcher that retrieves them, and the per-title detail and
//! artwork lookups.

pub mod artwork;
pub mod cache;
pub mod details;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod metadata;
pub mod rss;
pub mod title_index;
pub mod version_history;

pub use artwork::{ArtworkUrls, FallbackChain};
pub use cache::{DetailsCache, DetailsCacheEntry};
pub use details::{DetailsClient, DetailsConfig, TitleDetails};
pub use error::SourceError;
pub use fetch::{DataSources, ParsedSources, RawSnapshots, SourceFetcher, SourceLocation};
pub use manifest::ManifestEntry;
pub use metadata::{MetadataEntry, MetadataMap};
pub use rss::RecentItem;
pub use title_index::{TitleIndex, TitleIndexEntry};
pub use version_history::VersionHistory;
