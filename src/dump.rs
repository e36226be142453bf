use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::links::{
    canonicalize, dedupe_by_key, filter, normalize_url, resolve_l_facebook, FilterConfig, Platform,
};

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).unwrap());

/// Half-width of the context window around a match, in characters.
const SNIPPET_RADIUS: usize = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    #[serde(rename = "direct")]
    Direct,
    #[serde(rename = "l_facebook_redirect")]
    LFacebookRedirect,
}

#[derive(Debug, Clone, Serialize)]
pub struct DumpRecord {
    pub source_file: String,
    /// Character offset of the match within the cleaned input text.
    pub offset: usize,
    pub source_kind: SourceKind,
    pub raw_url: String,
    pub resolved_url: String,
    pub canonical_url: String,
    pub platform: Platform,
    pub context_snippet: String,
}

#[derive(Debug, Serialize)]
pub struct DumpCounts {
    pub relevant_records: usize,
    pub unique_urls: usize,
}

#[derive(Debug, Serialize)]
pub struct DumpReport {
    pub input_file: String,
    pub counts: DumpCounts,
    pub unique_records: Vec<DumpRecord>,
    pub all_records: Vec<DumpRecord>,
}

/// Single forward pass over the cleaned text: discover URL-shaped substrings,
/// undo the l.facebook.com shim, filter to project hosts, and attach the
/// surrounding context snippet. Nothing here mutates records after creation.
pub fn scan(text: &str, source_file: &str, config: &FilterConfig) -> Vec<DumpRecord> {
    let mut records = Vec::new();

    for m in URL_RE.find_iter(text) {
        let raw_url = normalize_url(m.as_str());

        let (resolved, source_kind) = match resolve_l_facebook(&raw_url) {
            Some(target) => (target, SourceKind::LFacebookRedirect),
            None => (raw_url.clone(), SourceKind::Direct),
        };
        let resolved = normalize_url(&resolved);

        if !filter::is_relevant_project_url(&resolved) {
            continue;
        }

        let snippet = context_snippet(text, m.start(), SNIPPET_RADIUS);
        if filter::snippet_is_blocklisted(&snippet) {
            continue;
        }

        let platform = Platform::detect(&resolved);
        if platform == Platform::YouTube && !config.youtube_snippet_ok(&snippet) {
            continue;
        }

        records.push(DumpRecord {
            source_file: source_file.to_string(),
            offset: text[..m.start()].chars().count(),
            source_kind,
            canonical_url: canonicalize(&resolved),
            raw_url,
            resolved_url: resolved,
            platform,
            context_snippet: snippet,
        });
    }

    records
}

pub fn build_report(input_file: &str, all_records: Vec<DumpRecord>) -> DumpReport {
    let unique_records = dedupe_by_key(all_records.clone(), |r| r.canonical_url.clone());
    DumpReport {
        input_file: input_file.to_string(),
        counts: DumpCounts {
            relevant_records: all_records.len(),
            unique_urls: unique_records.len(),
        },
        unique_records,
        all_records,
    }
}

pub const CSV_HEADER: &[&str] = &[
    "platform",
    "canonical_url",
    "resolved_url",
    "source_kind",
    "offset",
    "source_file",
    "context_snippet",
];

pub fn csv_row(record: &DumpRecord) -> Vec<String> {
    let kind = match record.source_kind {
        SourceKind::Direct => "direct",
        SourceKind::LFacebookRedirect => "l_facebook_redirect",
    };
    vec![
        record.platform.to_string(),
        record.canonical_url.clone(),
        record.resolved_url.clone(),
        kind.to_string(),
        record.offset.to_string(),
        record.source_file.clone(),
        record.context_snippet.clone(),
    ]
}

/// Whitespace-collapsed window of `radius` characters on each side of the
/// match at byte position `idx`. The width is counted in characters, not
/// bytes, so multi-byte text gets the same reach as plain ASCII.
fn context_snippet(text: &str, idx: usize, radius: usize) -> String {
    let left = text[..idx]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(idx, |(i, _)| i);
    let right = text[idx..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| idx + i);
    text[left..right].split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_default(text: &str) -> Vec<DumpRecord> {
        scan(text, "dump.txt", &FilterConfig::default())
    }

    #[test]
    fn direct_project_url_is_kept() {
        let records = scan_default("intro https://www.kickstarter.com/projects/foo/bar outro");
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.source_kind, SourceKind::Direct);
        assert_eq!(r.platform, Platform::Kickstarter);
        assert_eq!(r.raw_url, r.resolved_url);
        assert_eq!(r.canonical_url, "https://www.kickstarter.com/projects/foo/bar");
        assert_eq!(r.offset, 6);
    }

    #[test]
    fn asset_paths_are_dropped() {
        let records = scan_default(
            "https://www.kickstarter.com/assets/x.jpg and https://www.kickstarter.com/projects/foo/bar",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].platform, Platform::Kickstarter);
        assert!(records[0].resolved_url.contains("/projects/"));
    }

    #[test]
    fn shim_resolves_and_records_kind() {
        let text = "x https://l.facebook.com/l.php?u=https%3A%2F%2Fitch.io%2Fjam%2Fxyz&h=AT0 y";
        let records = scan_default(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_kind, SourceKind::LFacebookRedirect);
        assert_eq!(records[0].resolved_url, "https://itch.io/jam/xyz");
        assert!(records[0].raw_url.starts_with("https://l.facebook.com/"));
    }

    #[test]
    fn shim_without_target_stays_direct_and_filters_out() {
        // No decodable target: the shim URL itself is not on the allow-list.
        let records = scan_default("https://l.facebook.com/l.php?h=AT0 tail");
        assert!(records.is_empty());
    }

    #[test]
    fn blocklisted_snippet_discards_regardless_of_host() {
        let text = "block_list_url:[https://www.kickstarter.com/projects/foo/bar]";
        assert!(scan_default(text).is_empty());
    }

    #[test]
    fn youtube_needs_context_marker() {
        let bare = "embed chrome https://www.youtube.com/watch?v=abc123 more chrome";
        assert!(scan_default(bare).is_empty());

        let marked = "body\":{\"text\" says watch https://www.youtube.com/watch?v=abc123 now";
        let records = scan_default(marked);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].canonical_url, "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn youtube_marker_list_is_swappable() {
        let config = FilterConfig {
            youtube_markers: vec!["custom cue".into()],
        };
        let text = "custom cue here https://youtu.be/abc123";
        let records = scan(text, "dump.txt", &config);
        assert_eq!(records.len(), 1);

        // The same text fails under an unrelated marker set.
        let other = FilterConfig {
            youtube_markers: vec!["absent".into()],
        };
        assert!(scan(text, "dump.txt", &other).is_empty());
    }

    #[test]
    fn embedded_escape_tail_is_cut() {
        let records = scan_default(r"see https://itch.io/jam/xyz\nNext paragraph");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].resolved_url, "https://itch.io/jam/xyz");
    }

    #[test]
    fn report_dedups_on_canonical_url() {
        let text = "https://itch.io/jam/x?ref=a then https://itch.io/jam/x/ then https://itch.io/jam/y";
        let report = build_report("dump.txt", scan_default(text));
        assert_eq!(report.counts.relevant_records, 3);
        assert_eq!(report.counts.unique_urls, 2);
        // First occurrence wins.
        assert_eq!(report.unique_records[0].raw_url, "https://itch.io/jam/x?ref=a");
        assert_eq!(report.unique_records[1].raw_url, "https://itch.io/jam/y");
    }

    #[test]
    fn scan_is_deterministic() {
        let text = "https://itch.io/a https://itch.io/b https://itch.io/a";
        let first = scan_default(text);
        let second = scan_default(text);
        let urls = |rs: &[DumpRecord]| rs.iter().map(|r| r.canonical_url.clone()).collect::<Vec<_>>();
        assert_eq!(urls(&first), urls(&second));
    }

    #[test]
    fn snippet_clamps_on_multibyte_text() {
        let text = format!("{} https://itch.io/jam/x {}", "é".repeat(200), "ü".repeat(200));
        let records = scan_default(&text);
        assert_eq!(records.len(), 1);
        assert!(!records[0].context_snippet.is_empty());
    }

    #[test]
    fn snippet_window_counts_chars_not_bytes() {
        // The marker sits 169 characters (319 bytes) before the URL. The
        // window reaches 180 characters back, so the record is kept even
        // though the marker is outside a 180-byte window.
        let text = format!(
            "Play through video {}https://www.youtube.com/watch?v=abc123",
            "é".repeat(150)
        );
        let records = scan_default(&text);
        assert_eq!(records.len(), 1);
        assert!(records[0].context_snippet.contains("Play through video"));
    }

    #[test]
    fn offset_counts_chars_not_bytes() {
        let text = format!("{} https://itch.io/jam/x", "é".repeat(10));
        let records = scan_default(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].offset, 11);
    }

    #[test]
    fn snippet_is_whitespace_collapsed() {
        let text = "before\n\n\t  https://itch.io/jam/x   \n after";
        let records = scan_default(text);
        assert_eq!(records[0].context_snippet, "before https://itch.io/jam/x after");
    }

    #[test]
    fn record_serializes_with_original_field_names() {
        let records = scan_default("https://itch.io/jam/x");
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["source_kind"], "direct");
        assert_eq!(json["platform"], "Itch.io");
        assert!(json.get("canonical_url").is_some());
        assert!(json.get("context_snippet").is_some());
    }
}
