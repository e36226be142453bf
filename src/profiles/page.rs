use std::sync::LazyLock;

use scraper::{Html, Selector};

static OG_DESC_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:description"]"#).unwrap());
static META_DESC_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static PARA_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Short write-up from a profile page: Open Graph description, else the
/// generic meta description, else the first paragraph. Empty string when the
/// page offers none of those.
pub fn extract_writeup(html: &str) -> String {
    let doc = Html::parse_document(html);

    for selector in [&*OG_DESC_SEL, &*META_DESC_SEL] {
        if let Some(meta) = doc.select(selector).next() {
            if let Some(content) = meta.value().attr("content") {
                let cleaned = collapse_ws(content);
                if !cleaned.is_empty() {
                    return cleaned;
                }
            }
        }
    }

    if let Some(para) = doc.select(&PARA_SEL).next() {
        let cleaned = collapse_ws(&para.text().collect::<String>());
        if !cleaned.is_empty() {
            return cleaned;
        }
    }

    String::new()
}

pub(crate) fn collapse_ws(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ──
