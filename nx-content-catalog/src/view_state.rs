//! Link-shareable navigation state.
//!
//! Everything needed to reproduce a listing (page, sort, filters, the
//! selected title, display mode) round-trips through a URL query string.
//! Unknown keys are ignored and unparsable values fall back to their
//! defaults, so any link opens something sensible.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use nx_content_core::TitleId;

use crate::search::{RoleFilter, SearchOptions, SearchQuery};
use crate::sort::{SortDirection, SortField, SortSpec};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Grid,
    Banner,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Banner => "banner",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "banner" => Ok(Self::Banner),
            other => Err(format!("Unknown display mode '{other}' (expected grid or banner)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub page: usize,
    pub sort: SortField,
    pub order: SortDirection,
    pub role: RoleFilter,
    pub name: String,
    pub tid: String,
    /// Title whose detail view is open.
    pub game: Option<TitleId>,
    pub display: DisplayMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: 1,
            sort: SortField::default(),
            order: SortDirection::default(),
            role: RoleFilter::default(),
            name: String::new(),
            tid: String::new(),
            game: None,
            display: DisplayMode::default(),
        }
    }
}

fn parse_or_default<T: FromStr + Default>(key: &str, value: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        log::debug!("Ignoring invalid '{key}' value '{value}'");
        T::default()
    })
}

impl ViewState {
    /// Parse a query string, with or without its leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut state = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    state.page = value.trim().parse::<usize>().unwrap_or(1).max(1);
                }
                "sort" => state.sort = parse_or_default(&key, &value),
                "order" => state.order = parse_or_default(&key, &value),
                "type" => state.role = parse_or_default(&key, &value),
                "name" => state.name = value.into_owned(),
                "tid" => state.tid = value.into_owned(),
                "game" => state.game = TitleId::parse(&value).ok(),
                "display" => state.display = parse_or_default(&key, &value),
                other => log::debug!("Ignoring unknown query key '{other}'"),
            }
        }
        state
    }

    /// Serialise to a query string, omitting default values. An all-default
    /// state gives an empty string.
    pub fn to_query(&self) -> String {
        let defaults = Self::default();
        let mut ser = form_urlencoded::Serializer::new(String::new());

        if self.page != defaults.page {
            ser.append_pair("page", &self.page.to_string());
        }
        if self.sort != defaults.sort {
            ser.append_pair("sort", self.sort.as_str());
        }
        if self.order != defaults.order {
            ser.append_pair("order", self.order.as_str());
        }
        if self.role != defaults.role {
            ser.append_pair("type", &self.role.to_string());
        }
        if !self.name.is_empty() {
            ser.append_pair("name", &self.name);
        }
        if !self.tid.is_empty() {
            ser.append_pair("tid", &self.tid);
        }
        if let Some(game) = &self.game {
            ser.append_pair("game", game.as_str());
        }
        if self.display != defaults.display {
            ser.append_pair("display", self.display.as_str());
        }
        ser.finish()
    }

    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.sort, self.order)
    }

    pub fn search_query(&self, options: SearchOptions) -> SearchQuery {
        SearchQuery {
            name: self.name.clone(),
            title_id: self.tid.clone(),
            role: self.role,
            options,
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self.to_query();
        if query.is_empty() {
            Ok(())
        } else {
            write!(f, "?{query}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nx_content_core::ContentRole;

    #[test]
    fn test_defaults_serialise_empty() {
        assert_eq!(ViewState::default().to_query(), "");
        assert_eq!(ViewState::from_query(""), ViewState::default());
        assert_eq!(ViewState::default().to_string(), "");
    }

    #[test]
    fn test_parse_all_keys() {
        let state = ViewState::from_query(
            "?page=3&sort=name&order=asc&type=dlc&name=kart+racer&tid=0100&game=0100000000010000&display=banner",
        );
        assert_eq!(state.page, 3);
        assert_eq!(state.sort, SortField::Name);
        assert_eq!(state.order, SortDirection::Asc);
        assert_eq!(state.role, RoleFilter::Only(ContentRole::Addon));
        assert_eq!(state.name, "kart racer");
        assert_eq!(state.tid, "0100");
        assert_eq!(state.game.unwrap().as_str(), "0100000000010000");
        assert_eq!(state.display, DisplayMode::Banner);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let state = ViewState::from_query("page=zero&sort=colour&order=up&type=movies&game=xyz&display=list&foo=bar");
        assert_eq!(state, ViewState::default());
        assert_eq!(ViewState::from_query("page=0").page, 1);
    }

    #[test]
    fn test_serialise_non_defaults() {
        let state = ViewState {
            page: 2,
            role: RoleFilter::Only(ContentRole::Update),
            name: "a&b c".into(),
            ..Default::default()
        };
        let query = state.to_query();
        assert_eq!(query, "page=2&type=update&name=a%26b+c");
        assert_eq!(ViewState::from_query(&query), state);
        assert_eq!(state.to_string(), format!("?{query}"));
    }

    #[test]
    fn test_search_and_sort_from_state() {
        let state = ViewState::from_query("sort=size&order=asc&tid=abc");
        assert_eq!(state.sort_spec(), SortSpec::new(SortField::Size, SortDirection::Asc));
        let query = state.search_query(SearchOptions::default());
        assert_eq!(query.title_id, "abc");
        assert_eq!(query.role, RoleFilter::All);
    }
}
