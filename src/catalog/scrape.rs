use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::catalog::CatalogItem;

static RE_ARTICLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<article\b([^>]*)>(.*?)</article>").expect("article pattern")
});
static RE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w-]+)\s*=\s*"([^"]*)""#).expect("attribute pattern"));
static RE_TITLE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h3\b[^>]*>\s*<a\b([^>]*)>(.*?)</a>").expect("title pattern")
});
static RE_FIRST_P: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").expect("paragraph pattern"));
static RE_LEAF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(\w+)\b([^>]*)>([^<]*)</\w+>").expect("leaf element pattern")
});
static RE_IMG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b([^>]*)>").expect("img pattern"));
static RE_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("markup pattern"));

/// Pull blog post cards (`<article class="post-card" ...>`) out of page
/// markup. Missing pieces become empty; cards without a title are skipped.
pub fn scrape_post_cards(html: &str) -> Vec<CatalogItem> {
    let mut items = Vec::new();

    for article in RE_ARTICLE.captures_iter(html) {
        let attrs = &article[1];
        let body = &article[2];
        if !has_class(attrs, "post-card") {
            continue;
        }

        let Some(title_cap) = RE_TITLE_LINK.captures(body) else {
            continue;
        };
        let title = text_of(&title_cap[2]);
        if title.is_empty() {
            continue;
        }
        let link = attr(&title_cap[1], "href").filter(|h| !h.is_empty());

        let mut tags = Vec::new();
        let mut read_time = None;
        for leaf in RE_LEAF.captures_iter(body) {
            let leaf_attrs = &leaf[2];
            if has_class(leaf_attrs, "tag") {
                let t = text_of(&leaf[3]);
                if !t.is_empty() {
                    tags.push(t);
                }
            } else if read_time.is_none() && has_class(leaf_attrs, "read-time") {
                read_time = Some(text_of(&leaf[3]));
            }
        }

        let description = RE_FIRST_P
            .captures(body)
            .map(|c| text_of(&c[1]))
            .unwrap_or_default();
        let image = RE_IMG
            .captures(body)
            .and_then(|c| attr(&c[1], "src"))
            .unwrap_or_default();
        let date = attr(attrs, "data-date")
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());

        items.push(CatalogItem {
            id: items.len() + 1,
            title,
            category: attr(attrs, "data-category").unwrap_or_default(),
            tags,
            description,
            date,
            image,
            link,
            read_time,
            ..Default::default()
        });
    }

    items
}

fn attr(attrs: &str, name: &str) -> Option<String> {
    RE_ATTR
        .captures_iter(attrs)
        .find(|c| c[1].eq_ignore_ascii_case(name))
        .map(|c| decode_entities(&c[2]))
}

fn has_class(attrs: &str, class: &str) -> bool {
    attr(attrs, "class")
        .map(|c| c.split_whitespace().any(|token| token == class))
        .unwrap_or(false)
}

/// Inner text: markup stripped, entities decoded, whitespace collapsed.
fn text_of(fragment: &str) -> String {
    let stripped = RE_TAGS.replace_all(fragment, "");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
