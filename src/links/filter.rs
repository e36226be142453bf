use url::Url;

/// Hosts whose links are worth keeping, matched exactly (with their `www.`
/// spellings where those occur in the wild).
const PROJECT_HOSTS: &[&str] = &[
    "kickstarter.com",
    "www.kickstarter.com",
    "gamefound.com",
    "www.gamefound.com",
    "itch.io",
    "www.itch.io",
    "etsy.com",
    "www.etsy.com",
    "youtube.com",
    "www.youtube.com",
    "youtu.be",
    "drive.google.com",
];

/// Context-snippet markers that indicate the URL sits inside tracking
/// configuration rather than user content. Any hit discards the match.
const SNIPPET_BLOCKLIST: &[&str] = &["ClickIDURLBlocklistSVConfig", "block_list_url"];

/// Snippet-level heuristics for the dump scan.
///
/// The YouTube marker list is data, not logic: it is tuned per export and is
/// expected to grow as new dump shapes appear, so it lives here where callers
/// and tests can swap it out.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub youtube_markers: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            youtube_markers: [
                "body\":{\"text\"",
                "Link for Folding",
                "Play through video",
                "youtu.be/",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
        }
    }
}

impl FilterConfig {
    /// A YouTube match survives only when its snippet carries at least one
    /// known content marker; otherwise it is boilerplate or an unrelated embed.
    pub fn youtube_snippet_ok(&self, snippet: &str) -> bool {
        self.youtube_markers.iter().any(|m| snippet.contains(m.as_str()))
    }
}

pub fn snippet_is_blocklisted(snippet: &str) -> bool {
    SNIPPET_BLOCKLIST.iter().any(|m| snippet.contains(m))
}

/// Host allow-list plus per-host path policy. A URL that fails to parse has
/// no host and is excluded, never an error.
pub fn is_relevant_project_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let host = parsed.host_str().unwrap_or("").to_lowercase();
    if !PROJECT_HOSTS.contains(&host.as_str()) {
        return false;
    }

    let path = parsed.path().to_lowercase();

    // Media/asset paths on allow-listed hosts are not project pages.
    if host.ends_with("kickstarter.com") && path.starts_with("/assets/") {
        return false;
    }
    if host.ends_with("itch.io") && path.starts_with("/images/") {
        return false;
    }

    if host.ends_with("kickstarter.com") || host.ends_with("gamefound.com") {
        return path.contains("/projects/");
    }
    if host.ends_with("etsy.com") {
        return path.contains("/listing/");
    }
    if host.ends_with("drive.google.com") {
        return path.contains("/file/") || path.contains("/drive/");
    }
    if host.ends_with("youtube.com") || host == "youtu.be" {
        return true;
    }
    if host.ends_with("itch.io") {
        return true;
    }
    false
}

// ── Tests ──
