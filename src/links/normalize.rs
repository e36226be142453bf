/// Characters a broad URL regex tends to drag along from surrounding prose.
const TRAILING_JUNK: &[char] = &[')', '.', ',', ';', '"', '\'', ' '];

/// Escaped-newline spellings that show up when a URL sits inside a
/// JSON-encoded text block.
const BREAK_MARKERS: &[&str] = &["\\n", "\\r", "\n", "\r", "\\u000a", "\\u000d"];

/// Decode the HTML entities that occur in script-blob exports and unescape
/// JSON-style `\/` sequences. `&amp;` goes last so one decode level is
/// applied, not two.
pub fn clean_source(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
        .replace("\\/", "/")
}

/// Trim trailing punctuation captured by the broad regex and cut the URL at
/// the first embedded newline marker.
pub fn normalize_url(url: &str) -> String {
    let mut url = url.trim_end_matches(TRAILING_JUNK);
    for marker in BREAK_MARKERS {
        if let Some(pos) = url.find(marker) {
            url = &url[..pos];
        }
    }
    url.trim_end_matches(TRAILING_JUNK).to_string()
}

// ── Tests ──
