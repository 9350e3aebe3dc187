//! Core types shared by every nx-content crate.
//!
//! Title identifiers and their roles, base-identifier canonicalization,
//! version encoding, the merged [`ContentRecord`], and the small formatting
//! helpers used when displaying records.

pub mod dates;
pub mod error;
pub mod record;
pub mod title_id;
pub mod util;
pub mod version;

pub use dates::{is_valid_release_date, parse_release_date, release_timestamp};
pub use error::CoreError;
pub use record::{ContentRecord, UNKNOWN_TITLE};
pub use title_id::{ContentRole, TitleId, base_title_id, base_title_id_str};
pub use version::{EncodedVersion, decode_version, encode_version};
