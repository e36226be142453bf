use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of link destinations we track. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Kickstarter,
    Gamefound,
    #[serde(rename = "Itch.io")]
    ItchIo,
    Etsy,
    YouTube,
    #[serde(rename = "Google Drive")]
    GoogleDrive,
    Other,
}

impl Platform {
    /// Classify by host substring, case-insensitive. Works on full URLs and
    /// on truncated/template URL text from the notes.
    pub fn detect(url: &str) -> Platform {
        let value = url.to_lowercase();
        if value.contains("kickstarter.com") {
            Platform::Kickstarter
        } else if value.contains("gamefound.com") {
            Platform::Gamefound
        } else if value.contains("itch.io") {
            Platform::ItchIo
        } else if value.contains("etsy.com") {
            Platform::Etsy
        } else if value.contains("youtube.com") || value.contains("youtu.be") {
            Platform::YouTube
        } else if value.contains("drive.google.com") {
            Platform::GoogleDrive
        } else {
            Platform::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Kickstarter => "Kickstarter",
            Platform::Gamefound => "Gamefound",
            Platform::ItchIo => "Itch.io",
            Platform::Etsy => "Etsy",
            Platform::YouTube => "YouTube",
            Platform::GoogleDrive => "Google Drive",
            Platform::Other => "Other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ──
