//! Multi-field record ordering.
//!
//! Records lacking a value for the sort field always go last, whichever way
//! the sort runs. Among records that do have one, reversing the direction
//! reverses the order exactly: every remaining tie is broken by instance
//! key under the same direction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use nx_content_core::ContentRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Name,
    Size,
    #[default]
    Date,
}

impl SortField {
    pub const ALL: &'static [SortField] = &[Self::Id, Self::Name, Self::Size, Self::Date];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Size => "size",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" | "tid" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "size" => Ok(Self::Size),
            "date" | "releasedate" | "release_date" => Ok(Self::Date),
            other => Err(format!(
                "Unknown sort field '{other}' (expected id, name, size or date)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("Unknown sort order '{other}' (expected asc or desc)")),
        }
    }
}

/// A sort field and direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

fn name_key(record: &ContentRecord) -> Option<String> {
    record.display_name.as_deref().map(str::to_lowercase)
}

/// Date tie-break by name. Unnamed records go after named ones in both
/// directions.
fn name_tiebreak(a: &ContentRecord, b: &ContentRecord, direction: SortDirection) -> Ordering {
    match (name_key(a), name_key(b)) {
        (Some(x), Some(y)) => direction.apply(x.cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare the sort values of two records that both have one.
fn cmp_present(a: &ContentRecord, b: &ContentRecord, field: SortField) -> Option<Ordering> {
    let ord = match field {
        SortField::Id => a.identifier.cmp(&b.identifier),
        SortField::Name => name_key(a)?.cmp(&name_key(b)?),
        SortField::Size => a.known_size()?.cmp(&b.known_size()?),
        SortField::Date => a.release_timestamp()?.cmp(&b.release_timestamp()?),
    };
    Some(ord)
}

fn has_value(record: &ContentRecord, field: SortField) -> bool {
    match field {
        SortField::Id => true,
        SortField::Name => record.display_name.is_some(),
        SortField::Size => record.known_size().is_some(),
        SortField::Date => record.release_timestamp().is_some(),
    }
}

/// Total order of two records under `spec`.
pub fn compare(a: &ContentRecord, b: &ContentRecord, spec: SortSpec) -> Ordering {
    let (a_has, b_has) = (has_value(a, spec.field), has_value(b, spec.field));
    match (a_has, b_has) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    let primary = spec
        .direction
        .apply(cmp_present(a, b, spec.field).unwrap_or(Ordering::Equal));
    if primary != Ordering::Equal {
        return primary;
    }
    if spec.field == SortField::Date && a_has && b_has {
        let by_name = name_tiebreak(a, b, spec.direction);
        if by_name != Ordering::Equal {
            return by_name;
        }
    }
    spec.direction.apply(a.instance_key.cmp(&b.instance_key))
}

/// Sort records in place. Stable.
pub fn sort_records(records: &mut [&ContentRecord], spec: SortSpec) {
    records.sort_by(|a, b| compare(a, b, spec));
}

/// A sorted copy of `records`.
pub fn sorted<'a>(records: &[&'a ContentRecord], spec: SortSpec) -> Vec<&'a ContentRecord> {
    let mut out = records.to_vec();
    sort_records(&mut out, spec);
    out
}

#[cfg(test)]
#[path = "tests/sort_tests.rs"]
mod tests;
