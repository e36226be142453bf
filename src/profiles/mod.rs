pub mod bgg;
pub mod page;

use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::{export, input};
use bgg::{BggClient, EntryKind, FetchError};

/// One designer or publisher in the roster. Unknown fields ride along in
/// `extra` so a rewrite never loses hand-curated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "bggUrl", default, skip_serializing_if = "Option::is_none")]
    pub bgg_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    fn has_url(&self) -> bool {
        self.bgg_url.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    fn has_bio(&self) -> bool {
        self.bio.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// Already complete unless a force refresh is requested.
    fn needs_fetch(&self, force: bool) -> bool {
        force || !(self.has_url() && self.has_bio())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub designers: Vec<Entry>,
    #[serde(default)]
    pub publishers: Vec<Entry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Enrich one roster section in place. Per-entry failures are logged and
/// skipped; the politeness delay runs after every fetched entry except the
/// last one in the section. A search with no candidates moves straight to
/// the next entry without the delay.
pub fn update_entries<F>(
    entries: &mut [Entry],
    kind: EntryKind,
    force: bool,
    delay: Duration,
    mut fetch: F,
) -> Vec<String>
where
    F: FnMut(&str) -> Result<Option<(String, String)>, FetchError>,
{
    let mut updated = Vec::new();
    let total = entries.len();

    for (idx, entry) in entries.iter_mut().enumerate() {
        let name = entry.name.trim().to_string();
        if name.is_empty() || !entry.needs_fetch(force) {
            continue;
        }

        match fetch(&name) {
            Ok(Some((profile_url, writeup))) => {
                entry.bgg_url = Some(profile_url);
                if !writeup.is_empty() {
                    entry.bio = Some(writeup);
                }
                updated.push(format!("{}:{}", kind.label(), name));
            }
            Ok(None) => continue,
            Err(err) => {
                warn!(kind = kind.label(), name = %name, error = %err, "profile fetch failed");
            }
        }

        if idx < total - 1 && !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    updated
}

fn enrich_one(
    client: &BggClient,
    name: &str,
    kind: EntryKind,
) -> Result<Option<(String, String)>, FetchError> {
    let Some(profile_url) = client.search_person(name, kind)? else {
        return Ok(None);
    };
    let profile_page = client.get_text(&profile_url)?;
    let writeup = page::extract_writeup(&profile_page);
    Ok(Some((profile_url, writeup)))
}

pub fn run(path: &Path, write: bool, dry_run: bool, force: bool, delay_ms: u64) -> Result<()> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }

    let raw = input::read_strict(path)?;
    let mut roster: Roster = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse roster {}", path.display()))?;

    let client = BggClient::new()?;
    let delay = Duration::from_millis(delay_ms);

    let mut updated = Vec::new();
    updated.extend(update_entries(
        &mut roster.designers,
        EntryKind::Designer,
        force,
        delay,
        |name| enrich_one(&client, name, EntryKind::Designer),
    ));
    updated.extend(update_entries(
        &mut roster.publishers,
        EntryKind::Publisher,
        force,
        delay,
        |name| enrich_one(&client, name, EntryKind::Publisher),
    ));

    if updated.is_empty() {
        println!("No entries updated.");
        return Ok(());
    }

    println!("Updated entries:");
    for item in &updated {
        println!("- {item}");
    }

    let should_write = write && !dry_run;
    if should_write {
        export::write_json(path, &roster)?;
        println!("\nWrote changes to: {}", path.display());
    } else {
        println!("\nDry-run mode: no file changes written. Use --write to save.");
    }

    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_round_trips_unknown_fields() {
        let raw = r#"{
            "title": "Weekly roundup",
            "designers": [
                {"name": "Jane Doe", "country": "SE", "bggUrl": "https://boardgamegeek.com/boardgamedesigner/200/jane-doe"}
            ],
            "publishers": []
        }"#;
        let roster: Roster = serde_json::from_str(raw).unwrap();
        assert_eq!(roster.designers[0].name, "Jane Doe");
        assert!(roster.designers[0].has_url());
        assert!(!roster.designers[0].has_bio());

        let back = serde_json::to_value(&roster).unwrap();
        assert_eq!(back["title"], "Weekly roundup");
        assert_eq!(back["designers"][0]["country"], "SE");
        assert_eq!(
            back["designers"][0]["bggUrl"],
            "https://boardgamegeek.com/boardgamedesigner/200/jane-doe"
        );
        // Absent optionals stay absent, not null.
        assert!(back["designers"][0].get("bio").is_none());
    }

    #[test]
    fn needs_fetch_logic() {
        let complete = Entry {
            name: "Jane".into(),
            bgg_url: Some("https://boardgamegeek.com/boardgamedesigner/1/jane".into()),
            bio: Some("Designer.".into()),
            extra: Map::new(),
        };
        assert!(!complete.needs_fetch(false));
        assert!(complete.needs_fetch(true));

        let partial = Entry {
            name: "Jane".into(),
            bgg_url: Some("https://example".into()),
            bio: None,
            extra: Map::new(),
        };
        assert!(partial.needs_fetch(false));

        let blank_strings = Entry {
            name: "Jane".into(),
            bgg_url: Some("  ".into()),
            bio: Some("".into()),
            extra: Map::new(),
        };
        assert!(blank_strings.needs_fetch(false));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let roster: Roster = serde_json::from_str(r#"{"designers": []}"#).unwrap();
        assert!(roster.publishers.is_empty());
    }

    fn entry(name: &str) -> Entry {
        Entry {
            name: name.into(),
            bgg_url: None,
            bio: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn update_entries_applies_fetched_profiles() {
        let mut entries = vec![entry("Jane Doe"), entry(""), entry("Doe Games")];
        let updated = update_entries(
            &mut entries,
            EntryKind::Designer,
            false,
            Duration::ZERO,
            |name| {
                Ok(Some((
                    format!("https://boardgamegeek.com/boardgamedesigner/1/{name}"),
                    "A short bio.".into(),
                )))
            },
        );
        assert_eq!(updated, vec!["designers:Jane Doe", "designers:Doe Games"]);
        assert!(entries[0].has_url());
        assert_eq!(entries[0].bio.as_deref(), Some("A short bio."));
        // The blank-name entry is untouched.
        assert!(entries[1].bgg_url.is_none());
    }

    #[test]
    fn no_candidate_skips_politeness_delay() {
        let mut entries = vec![entry("A"), entry("B"), entry("C")];
        let started = std::time::Instant::now();
        let updated = update_entries(
            &mut entries,
            EntryKind::Designer,
            false,
            Duration::from_secs(5),
            |_| Ok(None),
        );
        assert!(updated.is_empty());
        // No profile was fetched for any entry, so no delay ran either.
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
