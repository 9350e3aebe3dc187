//! "Recently added" RSS feeds.
//!
//! The feeds carry their useful fields inside the free-text `<description>`
//! of each item, so extraction is a set of regexes over that text. Anything
//! that doesn't match is left empty; a broken feed yields no items rather
//! than an error for the caller.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use regex::Regex;

use crate::error::SourceError;

const ICON_BASE_URL: &str = "https://nx-missing.ghostland.at/icons";

pub const DEFAULT_BASE_FEED_URL: &str = "https://data.ghostland.at/rss_feed_base.xml";
pub const DEFAULT_UPDATE_FEED_URL: &str = "https://data.ghostland.at/rss_feed_updates.xml";
pub const DEFAULT_DLC_FEED_URL: &str = "https://data.ghostland.at/rss_feed_dlc.xml";

static TITLE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Title ID: ([0-9A-Fa-f]+)").expect("valid regex"));
static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Size: ([0-9.]+ [KMGT]iB)").expect("valid regex"));
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Version: v([0-9.]+)").expect("valid regex"));
static TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Type: ([^\[]+)").expect("valid regex"));
static FORMAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Format: ([A-Z]+)").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*?\]").expect("valid regex"));

/// One item of a "recently added" feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentItem {
    pub title: String,
    /// Identifier as written in the feed (not validated).
    pub title_id: Option<String>,
    /// Human-readable size, e.g. `"1.5 GiB"`.
    pub size: Option<String>,
    pub version: Option<String>,
    pub kind: Option<String>,
    pub format: Option<String>,
    pub published: Option<DateTime<FixedOffset>>,
    pub icon_url: Option<String>,
}

#[derive(Default)]
struct RawItem {
    title: String,
    description: String,
    pub_date: String,
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    None,
    Title,
    Description,
    PubDate,
}

/// Parse an RSS document into items, newest first.
pub fn parse_feed(xml_text: &str) -> Result<Vec<RecentItem>, SourceError> {
    let mut xml = Reader::from_str(xml_text);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut items = Vec::new();
    let mut current: Option<RawItem> = None;
    let mut field = Field::None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"item" => current = Some(RawItem::default()),
                b"title" => field = Field::Title,
                b"description" => field = Field::Description,
                b"pubDate" => field = Field::PubDate,
                _ => field = Field::None,
            },
            Event::Text(ref e) => {
                if let Some(item) = current.as_mut() {
                    let text = e.unescape()?;
                    push_field(item, field, &text);
                }
            }
            Event::CData(ref e) => {
                if let Some(item) = current.as_mut() {
                    let text = String::from_utf8_lossy(e);
                    push_field(item, field, &text);
                }
            }
            Event::End(ref e) => {
                if e.name().as_ref() == b"item" {
                    if let Some(raw) = current.take() {
                        items.push(extract(raw));
                    }
                }
                field = Field::None;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    sort_newest_first(&mut items);
    Ok(items)
}

fn push_field(item: &mut RawItem, field: Field, text: &str) {
    let target = match field {
        Field::Title => &mut item.title,
        Field::Description => &mut item.description,
        Field::PubDate => &mut item.pub_date,
        Field::None => return,
    };
    target.push_str(text);
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract(raw: RawItem) -> RecentItem {
    let title_id = capture(&TITLE_ID_RE, &raw.description);
    let icon_url = title_id
        .as_ref()
        .map(|tid| format!("{ICON_BASE_URL}/{tid}.jpg"));

    RecentItem {
        title: TAG_RE.replace_all(&raw.title, "").trim().to_string(),
        size: capture(&SIZE_RE, &raw.description),
        version: capture(&VERSION_RE, &raw.description),
        kind: capture(&TYPE_RE, &raw.description),
        format: capture(&FORMAT_RE, &raw.description),
        published: DateTime::parse_from_rfc2822(raw.pub_date.trim()).ok(),
        title_id,
        icon_url,
    }
}

/// Newest first; undated items go last in their original order.
fn sort_newest_first(items: &mut [RecentItem]) {
    items.sort_by(|a, b| match (&a.published, &b.published) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
