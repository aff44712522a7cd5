use chrono::NaiveDate;

use crate::catalog::pages::PageKind;
use crate::catalog::{CatalogView, FilterState};
use crate::models::catalog::CatalogItem;
use crate::models::post::Post;

const NAV: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/trails", "Trails"),
    ("/blog", "Blog"),
    ("/community", "Community"),
    ("/temples", "Temples"),
];

/// Minimal layout shared by every page.
pub fn page_shell(title: &str, active: &str, body: &str) -> String {
    let mut nav = String::from("<nav id=\"nav-links\">");
    for (href, label) in NAV {
        let class = if *href == active { " class=\"active\"" } else { "" };
        nav.push_str(&format!("<a href=\"{}\"{}>{}</a>", href, class, label));
    }
    nav.push_str("</nav>");

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\
         <meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title} | Zimbabwe Hiking Guide</title>\
         <link rel=\"stylesheet\" href=\"/static/css/site.css\">\
         </head>\n<body>\
         <header><h1>Zimbabwe Hiking Guide</h1>{nav}</header>\
         <main>{body}</main>\
         <footer><p>Zimbabwe Hiking Guide</p></footer>\
         </body>\n</html>",
        title = html_escape(title),
        nav = nav,
        body = body,
    )
}

/// `aria-live` region carrying the last announcement, if any.
pub fn live_region(message: Option<&str>) -> String {
    format!(
        "<div id=\"live-region\" class=\"sr-only\" aria-live=\"polite\" aria-atomic=\"true\">{}</div>",
        html_escape(message.unwrap_or(""))
    )
}

// ── Community ───────────────────────────────────────────────────────

pub fn post_fragment(post: &Post) -> String {
    let image = if post.has_image() {
        format!(
            "<img src=\"{}\" alt=\"Photo from {}\" loading=\"lazy\">",
            html_escape(&post.image),
            html_escape(&post.author)
        )
    } else {
        String::new()
    };
    format!(
        "<article class=\"community-post\">\
         <header><strong>{author}</strong> <time>{timestamp}</time></header>\
         <p>{message}</p>{image}</article>",
        author = html_escape(&post.author),
        timestamp = html_escape(&post.timestamp),
        message = html_escape(&post.message),
        image = image,
    )
}

pub fn community_page(
    posts: &[Post],
    notice: Option<&str>,
    error: Option<&str>,
    author: &str,
    message: &str,
) -> String {
    let mut body = String::from("<section class=\"community\"><h2>Share Your Hiking Story</h2>");

    if let Some(e) = error {
        body.push_str(&format!(
            "<p class=\"form-error\" role=\"alert\">{}</p>",
            html_escape(e)
        ));
    }
    if let Some(n) = notice {
        body.push_str(&format!(
            "<p class=\"form-notice\" role=\"status\">{}</p>",
            html_escape(n)
        ));
    }

    body.push_str(&format!(
        "<form id=\"community-form\" method=\"post\" action=\"/community\" enctype=\"multipart/form-data\">\
         <label for=\"username\">Your name</label>\
         <input id=\"username\" name=\"username\" type=\"text\" value=\"{}\" required>\
         <label for=\"message\">Your story</label>\
         <textarea id=\"message\" name=\"message\" rows=\"5\" required>{}</textarea>\
         <label for=\"photo\">Photo (optional)</label>\
         <input id=\"photo\" name=\"photo\" type=\"file\" accept=\"image/*\">\
         <button type=\"submit\">Post</button></form>",
        html_escape(author),
        html_escape(message)
    ));

    body.push_str("<div id=\"community-posts\">");
    if posts.is_empty() {
        body.push_str("<p class=\"empty\">No stories yet. Be the first to share one.</p>");
    }
    for post in posts {
        body.push_str(&post_fragment(post));
    }
    body.push_str("</div></section>");

    page_shell("Community", "/community", &body)
}

// ── Catalog cards ───────────────────────────────────────────────────

pub fn trail_card(item: &CatalogItem, show_region: bool) -> String {
    let mut facts = format!(
        "<p><strong>Difficulty:</strong> {}</p>",
        html_escape(&item.category)
    );
    if show_region {
        if let Some(region) = item.attribute("Region") {
            facts.push_str(&format!("<p><strong>Region:</strong> {}</p>", html_escape(region)));
        }
    }
    if let Some(distance) = item.attribute("Distance") {
        facts.push_str(&format!("<p><strong>Distance:</strong> {}</p>", html_escape(distance)));
    }
    format!(
        "<article class=\"trail-card\">\
         <img src=\"{image}\" alt=\"{title}\" loading=\"lazy\">\
         <h3>{title}</h3>{facts}<p>{description}</p></article>",
        image = html_escape(&item.image),
        title = html_escape(&item.title),
        facts = facts,
        description = html_escape(&item.description),
    )
}

pub fn blog_card(item: &CatalogItem) -> String {
    let link = item
        .link
        .clone()
        .unwrap_or_else(|| format!("#post-{}", item.id));
    let date = match item.date {
        Some(d) => format!(
            "<time datetime=\"{}\">{}</time>",
            d.format("%Y-%m-%d"),
            format_date_long(d)
        ),
        None => String::new(),
    };
    let views = item
        .views
        .map(|v| format!("<span class=\"view-count\">{} views</span>", v))
        .unwrap_or_default();
    let read_time = item
        .read_time
        .as_deref()
        .map(|r| format!("<div class=\"read-time\">{}</div>", html_escape(r)))
        .unwrap_or_default();
    let tags: String = item
        .tags
        .iter()
        .map(|t| format!("<span class=\"tag\">{}</span>", html_escape(t)))
        .collect();

    format!(
        "<article class=\"post-card\" data-category=\"{category}\">\
         <div class=\"post-image\"><img src=\"{image}\" alt=\"{title}\" loading=\"lazy\">{read_time}</div>\
         <div class=\"post-content\">\
         <div class=\"post-meta\"><span class=\"category\">{label}</span>{date}{views}</div>\
         <h3><a href=\"{link}\">{title}</a></h3>\
         <p>{excerpt}</p>\
         <div class=\"post-tags\">{tags}</div>\
         <a href=\"{link}\" class=\"read-more\" aria-label=\"Read article: {title}\">Read More &rarr;</a>\
         </div></article>",
        category = html_escape(&item.category),
        image = html_escape(&item.image),
        title = html_escape(&item.title),
        read_time = read_time,
        label = html_escape(&category_label(&item.category)),
        date = date,
        views = views,
        link = html_escape(&link),
        excerpt = html_escape(&item.description),
        tags = tags,
    )
}

pub fn temple_figure(item: &CatalogItem) -> String {
    let area = item
        .metric
        .map(|a| format!("<p>Area: {} sq. ft.</p>", a))
        .unwrap_or_default();
    format!(
        "<figure><img src=\"{image}\" alt=\"{title}\" loading=\"lazy\">\
         <figcaption><h3>{title}</h3>\
         <p>Location: {location}</p><p>Dedicated: {dedicated}</p>{area}\
         </figcaption></figure>",
        image = html_escape(&item.image),
        title = html_escape(&item.title),
        location = html_escape(item.attribute("Location").unwrap_or("")),
        dedicated = html_escape(item.attribute("Dedicated").unwrap_or("")),
        area = area,
    )
}

/// Container contents for one page, replaced wholesale on every request.
pub fn catalog_fragment(kind: PageKind, view: &CatalogView<'_>) -> String {
    if view.no_results {
        return match kind {
            PageKind::Home => "<p>No trails found matching your search.</p>".to_string(),
            _ => no_results_block(kind),
        };
    }

    let mut html = String::new();
    for item in &view.items {
        html.push_str(&match kind {
            PageKind::Home => trail_card(item, false),
            PageKind::Trails => trail_card(item, true),
            PageKind::Blog => blog_card(item),
            PageKind::Temples => temple_figure(item),
        });
    }

    if view.show_load_more {
        html.push_str(&format!(
            "<div class=\"load-more-container\">\
             <a class=\"load-more-btn\" href=\"{}\">Load More Posts</a></div>",
            html_escape(&blog_query(view.state, Some(view.items.len() + 1)))
        ));
    }
    html
}

fn no_results_block(kind: PageKind) -> String {
    let clear = match kind {
        PageKind::Blog => "/blog/clear",
        PageKind::Trails => "/trails",
        PageKind::Temples => "/temples",
        PageKind::Home => "/?q=",
    };
    format!(
        "<div class=\"no-results-message\"><div class=\"no-results-content\">\
         <h3>No posts found</h3>\
         <p>Try adjusting your search terms or filter settings.</p>\
         <a class=\"clear-filters-btn\" href=\"{}\">Clear All Filters</a>\
         </div></div>",
        clear
    )
}

/// `/blog?...` link carrying the current state.
/// `shown` asks for at least that many items to be visible.
pub fn blog_query(state: &FilterState, shown: Option<usize>) -> String {
    let mut parts = Vec::new();
    if !state.search_term.is_empty() {
        parts.push(format!("q={}", urlencoding_simple(&state.search_term)));
    }
    if !state.category.is_empty() {
        parts.push(format!("category={}", urlencoding_simple(&state.category)));
    }
    if let Some(n) = shown {
        parts.push(format!("shown={}", n));
    }
    if parts.is_empty() {
        "/blog".to_string()
    } else {
        format!("/blog?{}", parts.join("&"))
    }
}

// ── Pages ───────────────────────────────────────────────────────────

pub fn home_page(view: &CatalogView<'_>, search: &str, announcement: Option<&str>) -> String {
    let body = format!(
        "<section class=\"hero\"><h2>Explore Zimbabwe on Foot</h2>\
         <form id=\"trail-search-form\" method=\"get\" action=\"/\">\
         <label for=\"search\">Search trails</label>\
         <input id=\"search\" name=\"q\" type=\"search\" value=\"{search}\" placeholder=\"Name, difficulty or season\">\
         <button type=\"submit\">Search</button></form></section>\
         <section><h2>Featured Trails</h2><div id=\"featured-container\">{cards}</div></section>{live}",
        search = html_escape(search),
        cards = catalog_fragment(PageKind::Home, view),
        live = live_region(announcement),
    );
    page_shell("Home", "/", &body)
}

pub fn trails_page(view: &CatalogView<'_>, announcement: Option<&str>) -> String {
    let active = if view.state.category.is_empty() { "all" } else { view.state.category.as_str() };
    let mut buttons = String::from("<div class=\"filters\">");
    for (value, label) in [("all", "All"), ("Easy", "Easy"), ("Moderate", "Moderate"), ("Challenging", "Challenging")] {
        let class = if value == active { "filter-btn active" } else { "filter-btn" };
        buttons.push_str(&format!(
            "<a class=\"{}\" data-difficulty=\"{}\" href=\"/trails?difficulty={}\">{}</a>",
            class, value, value, label
        ));
    }
    buttons.push_str("</div>");

    let body = format!(
        "<section><h2>All Trails</h2>{buttons}<div id=\"trails-list\">{cards}</div></section>{live}",
        buttons = buttons,
        cards = catalog_fragment(PageKind::Trails, view),
        live = live_region(announcement),
    );
    page_shell("Trails", "/trails", &body)
}

pub fn blog_page(view: &CatalogView<'_>, categories: &[String], announcement: Option<&str>) -> String {
    let mut options = String::from("<option value=\"\">All categories</option>");
    for c in categories {
        let selected = if *c == view.state.category { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            html_escape(c),
            selected,
            html_escape(&category_label(c))
        ));
    }
    let tag_links: String = categories
        .iter()
        .map(|c| {
            format!(
                "<a class=\"tag-link\" data-category=\"{0}\" href=\"/blog?tag={1}\">{2}</a>",
                html_escape(c),
                urlencoding_simple(c),
                html_escape(&category_label(c))
            )
        })
        .collect();

    let clear = if view.state.is_clear() || view.no_results {
        ""
    } else {
        "<a class=\"clear-filters-btn\" href=\"/blog/clear\">Clear All Filters</a>"
    };

    let body = format!(
        "<section class=\"blog-hero\"><h2>Hiking Blog</h2>\
         <form class=\"blog-search\" method=\"get\" action=\"/blog\">\
         <label for=\"blog-search\">Search posts</label>\
         <input id=\"blog-search\" name=\"q\" type=\"search\" value=\"{search}\">\
         <select id=\"category-filter\" name=\"category\">{options}</select>\
         <button type=\"submit\" class=\"search-button\">Search</button></form>\
         <nav class=\"tag-links\">{tag_links}</nav>{clear}</section>\
         <section class=\"blog-posts\"><p class=\"result-count\">{total} post(s)</p>\
         <div class=\"posts-grid\">{cards}</div></section>{live}",
        search = html_escape(&view.state.search_term),
        options = options,
        tag_links = tag_links,
        clear = clear,
        total = view.total,
        cards = catalog_fragment(PageKind::Blog, view),
        live = live_region(announcement),
    );
    page_shell("Blog", "/blog", &body)
}

pub fn temples_page(view: &CatalogView<'_>, announcement: Option<&str>) -> String {
    let mut nav = String::from("<nav id=\"navmenu\">");
    for (value, label) in [("home", "Home"), ("old", "Old"), ("new", "New"), ("large", "Large"), ("small", "Small")] {
        nav.push_str(&format!("<a href=\"/temples?filter={}\">{}</a>", value, label));
    }
    nav.push_str("</nav>");

    let body = format!(
        "<section><h2>Temple Album</h2>{nav}<div id=\"templeCards\">{cards}</div></section>{live}",
        nav = nav,
        cards = catalog_fragment(PageKind::Temples, view),
        live = live_region(announcement),
    );
    page_shell("Temples", "/temples", &body)
}

// ── Formatting helpers ──────────────────────────────────────────────

/// "July 5, 2025"
pub fn format_date_long(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `trail-guide` -> `Trail Guide`
pub fn category_label(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn urlencoding_simple(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(b as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", b));
            }
        }
    }
    result
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
