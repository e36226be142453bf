use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use super::page::collapse_ws;

pub const BGG_BASE: &str = "https://boardgamegeek.com";
const USER_AGENT: &str = "pnp-links-profile-fetch/0.1 (+manual curation)";
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static DESIGNER_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/boardgamedesigner/\d+/").unwrap());
static PUBLISHER_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/boardgamepublisher/\d+/").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Designer,
    Publisher,
}

impl EntryKind {
    pub fn object_type(self) -> &'static str {
        match self {
            EntryKind::Designer => "boardgamedesigner",
            EntryKind::Publisher => "boardgamepublisher",
        }
    }

    /// Roster section name, also used as the log/update label prefix.
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Designer => "designers",
            EntryKind::Publisher => "publishers",
        }
    }

    fn href_re(self) -> &'static Regex {
        match self {
            EntryKind::Designer => &DESIGNER_HREF_RE,
            EntryKind::Publisher => &PUBLISHER_HREF_RE,
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct BggClient {
    http: reqwest::blocking::Client,
}

impl BggClient {
    pub fn new() -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(BggClient { http })
    }

    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        Ok(self.http.get(url).send()?.error_for_status()?.text()?)
    }

    /// Search the geeksearch catalog for `name` and return the best profile
    /// URL, or `None` when the search page lists no profiles at all.
    pub fn search_person(&self, name: &str, kind: EntryKind) -> Result<Option<String>, FetchError> {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("action", "search")
            .append_pair("objecttype", kind.object_type())
            .append_pair("q", name)
            .finish();
        let search_url = format!("{BGG_BASE}/geeksearch.php?{query}");
        let page = self.get_text(&search_url)?;
        Ok(pick_candidate(&page, name, kind))
    }
}

/// Pick the search result whose anchor text equals `name` after folding case
/// and punctuation; fall back to the first result. BGG search puts the best
/// fuzzy match first, so the fallback is usually right for pen names.
pub fn pick_candidate(html: &str, name: &str, kind: EntryKind) -> Option<String> {
    let doc = Html::parse_document(html);
    let href_re = kind.href_re();

    let mut candidates: Vec<(String, String)> = Vec::new();
    for anchor in doc.select(&ANCHOR_SEL) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href_re.is_match(href) {
            continue;
        }
        let label = collapse_ws(&anchor.text().collect::<String>());
        candidates.push((href.to_string(), label));
    }
    if candidates.is_empty() {
        return None;
    }

    let target = fold_name(name);
    let href = candidates
        .iter()
        .find(|(_, label)| fold_name(label) == target)
        .map(|(href, _)| href.clone())
        .unwrap_or_else(|| candidates[0].0.clone());

    absolutize(&href)
}

fn absolutize(href: &str) -> Option<String> {
    let base = Url::parse(BGG_BASE).ok()?;
    base.join(href).ok().map(String::from)
}

/// Case- and punctuation-insensitive comparison key for entity names.
pub fn fold_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ── Tests ──
