use url::Url;

/// Map a resolved URL to its stable identity key: lowercase host, one
/// trailing slash stripped from the path, query and fragment dropped.
/// YouTube `/watch` keeps its `v` parameter (first value) since that alone
/// names the video. Unparseable input is returned unchanged — still a
/// deterministic key.
pub fn canonicalize(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let host = parsed.host_str().unwrap_or("").to_lowercase();
    let host = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    };
    let path = parsed.path().strip_suffix('/').unwrap_or(parsed.path());

    let mut canonical = format!("{}://{}{}", parsed.scheme(), host, path);

    if host.contains("youtube.com") && parsed.path() == "/watch" {
        let video = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned());
        if let Some(v) = video {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("v", &v)
                .finish();
            canonical.push('?');
            canonical.push_str(&query);
        }
    }

    canonical
}

// ── Tests ──
