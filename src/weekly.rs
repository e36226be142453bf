use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::links::{dedupe_by_key, Platform};

static INLINE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(https?://[^`]+)`").unwrap());
static SCREENSHOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^## Screenshot `([^`]+)`\s*$").unwrap());
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^##\s+(.+?)\s*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlQuality {
    Full,
    Truncated,
    Template,
}

impl UrlQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlQuality::Full => "full",
            UrlQuality::Truncated => "truncated",
            UrlQuality::Template => "template",
        }
    }
}

/// Notes sometimes carry URLs copied from screenshots: cut off mid-path, or
/// written as a fill-in placeholder.
pub fn url_quality(url: &str) -> UrlQuality {
    if url.contains("...") {
        UrlQuality::Truncated
    } else if url.contains("<creator>") {
        UrlQuality::Template
    } else {
        UrlQuality::Full
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyRecord {
    pub source_file: String,
    pub screenshot: String,
    pub creator: String,
    pub url: String,
    pub url_quality: UrlQuality,
    pub platform: Platform,
    pub section: String,
}

#[derive(Debug, Serialize)]
pub struct WeeklyCounts {
    pub source_records: usize,
    pub unique_source_urls: usize,
    pub all_urls_seen: usize,
    pub unique_all_urls: usize,
}

#[derive(Debug, Serialize)]
pub struct WeeklyReport {
    pub input_file: String,
    pub counts: WeeklyCounts,
    pub source_records: Vec<WeeklyRecord>,
    pub unique_source_urls: Vec<WeeklyRecord>,
    pub unique_all_urls: Vec<WeeklyRecord>,
}

struct CreatorBlock {
    creator: String,
    urls: Vec<String>,
    next_index: usize,
}

/// A creator block is a `- Name` list item followed by one or more two-space
/// indented `- ` sub-items. URLs are the backtick-quoted literals inside the
/// sub-items, deduped within the block in first-seen order. A `- `…`` line is
/// a bare URL list item, never a creator.
fn parse_creator_block(lines: &[&str], start: usize) -> Option<CreatorBlock> {
    let line = lines[start];
    if !line.starts_with("- ") || line.starts_with("- `") {
        return None;
    }
    let creator = line[2..].trim().to_string();
    if creator.is_empty() {
        return None;
    }

    let mut sub_items = 0;
    let mut urls: Vec<String> = Vec::new();
    let mut i = start + 1;
    while i < lines.len() && lines[i].starts_with("  - ") {
        sub_items += 1;
        for caps in INLINE_URL_RE.captures_iter(lines[i]) {
            let url = caps[1].to_string();
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        i += 1;
    }

    if sub_items == 0 {
        return None;
    }
    Some(CreatorBlock {
        creator,
        urls,
        next_index: i,
    })
}

/// One forward pass over the document. Heading state (`current_section`,
/// `current_screenshot`) and the creator-block / generic-scan fallthrough are
/// order-sensitive; keep them in this single loop.
pub fn parse(text: &str, source_file: &str) -> WeeklyReport {
    let lines: Vec<&str> = text.lines().collect();

    let mut source_records: Vec<WeeklyRecord> = Vec::new();
    let mut all_urls: Vec<WeeklyRecord> = Vec::new();

    let mut current_section = String::new();
    let mut current_screenshot = String::new();

    let make_record = |url: &str, creator: &str, screenshot: &str, section: &str| WeeklyRecord {
        source_file: source_file.to_string(),
        screenshot: screenshot.to_string(),
        creator: creator.to_string(),
        url: url.to_string(),
        url_quality: url_quality(url),
        platform: Platform::detect(url),
        section: section.to_string(),
    };

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if let Some(caps) = SCREENSHOT_RE.captures(line) {
            current_screenshot = caps[1].to_string();
            current_section = line[3..].trim().to_string();
            i += 1;
            continue;
        }

        if let Some(caps) = SECTION_RE.captures(line) {
            current_section = caps[1].trim().to_string();
            if !current_section.starts_with("Screenshot ") {
                current_screenshot.clear();
            }
            i += 1;
            continue;
        }

        // Creator blocks are only attributed under a screenshot heading;
        // outside one the block's lines fall through to the generic scan.
        if !current_screenshot.is_empty() {
            if let Some(block) = parse_creator_block(&lines, i) {
                for url in &block.urls {
                    let rec = make_record(url, &block.creator, &current_screenshot, &current_section);
                    source_records.push(rec.clone());
                    all_urls.push(rec);
                }
                i = block.next_index;
                continue;
            }
        }

        for caps in INLINE_URL_RE.captures_iter(line) {
            all_urls.push(make_record(&caps[1], "", &current_screenshot, &current_section));
        }
        i += 1;
    }

    let unique_source_urls = dedupe_by_key(source_records.clone(), |r| r.url.clone());
    let unique_all_urls = dedupe_by_key(all_urls.clone(), |r| r.url.clone());

    WeeklyReport {
        input_file: source_file.to_string(),
        counts: WeeklyCounts {
            source_records: source_records.len(),
            unique_source_urls: unique_source_urls.len(),
            all_urls_seen: all_urls.len(),
            unique_all_urls: unique_all_urls.len(),
        },
        source_records,
        unique_source_urls,
        unique_all_urls,
    }
}

pub const CSV_HEADER: &[&str] = &[
    "screenshot",
    "creator",
    "platform",
    "url_quality",
    "url",
    "section",
    "source_file",
];

pub fn csv_row(record: &WeeklyRecord) -> Vec<String> {
    vec![
        record.screenshot.clone(),
        record.creator.clone(),
        record.platform.to_string(),
        record.url_quality.as_str().to_string(),
        record.url.clone(),
        record.section.clone(),
        record.source_file.clone(),
    ]
}

// ── Tests ──
