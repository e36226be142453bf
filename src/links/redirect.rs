use std::sync::LazyLock;

use regex::Regex;

use super::normalize::normalize_url;

static LFB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://l\.facebook\.com/l\.php\?(.*)$").unwrap());

/// Decode an l.facebook.com link shim. Returns the normalized target from the
/// `u` query parameter, or `None` when the URL is not a shim or carries no
/// target (callers then keep the original URL as-is).
pub fn resolve_l_facebook(url: &str) -> Option<String> {
    let caps = LFB_RE.captures(url)?;
    let query = caps.get(1)?.as_str();

    let target = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "u")
        .map(|(_, value)| value.into_owned())?;
    if target.is_empty() {
        return None;
    }
    Some(normalize_url(&target))
}

// ── Tests ──
