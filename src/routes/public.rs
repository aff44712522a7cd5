use std::sync::Arc;

use rocket::response::content::RawHtml;
use rocket::State;

use super::{given, page_filter};
use crate::catalog::pages::{blog_reserve, Catalogs, PageKind};
use crate::catalog::FilterState;
use crate::config::SiteConfig;
use crate::render;
use crate::store::Store;

// ── Home ───────────────────────────────────────────────

/// `q` present and non-empty: search and remember it. `q` present but
/// blank: show everything, the stored search is left alone. `q` absent:
/// replay the stored search.
#[get("/?<q>")]
pub fn home(
    store: &State<Arc<dyn Store>>,
    catalogs: &State<Catalogs>,
    config: &State<SiteConfig>,
    q: Option<&str>,
) -> RawHtml<String> {
    let (mut filter, live) = page_filter(catalogs, PageKind::Home);
    let key = config.last_search_key.as_str();

    let term = match q {
        Some(raw) => {
            let term = FilterState::normalize_search(raw);
            if !term.is_empty() {
                if let Err(e) = store.item_set(key, &term) {
                    log::warn!("Could not update {}: {}", key, e);
                }
            }
            term
        }
        None => store.item_get(key).unwrap_or_default(),
    };
    if !term.is_empty() {
        filter.set_search(&term);
    }

    let message = live.message();
    RawHtml(render::home_page(&filter.view(), &term, message.as_deref()))
}

// ── Trails ─────────────────────────────────────────────

#[get("/trails?<difficulty>")]
pub fn trails(catalogs: &State<Catalogs>, difficulty: Option<&str>) -> RawHtml<String> {
    let (mut filter, live) = page_filter(catalogs, PageKind::Trails);
    if let Some(d) = given(difficulty) {
        filter.set_category(d);
    }
    let message = live.message();
    RawHtml(render::trails_page(&filter.view(), message.as_deref()))
}

// ── Blog ───────────────────────────────────────────────

/// `tag` comes from the tag links and overrides `category`.
#[get("/blog?<q>&<category>&<tag>&<shown>")]
pub fn blog(
    catalogs: &State<Catalogs>,
    q: Option<&str>,
    category: Option<&str>,
    tag: Option<&str>,
    shown: Option<usize>,
) -> RawHtml<String> {
    let (mut filter, live) = page_filter(catalogs, PageKind::Blog);
    let mut rng = rand::thread_rng();
    match given(tag) {
        Some(t) => {
            filter.apply_query(given(q), None, None, &mut rng);
            filter.select_tag(t);
        }
        None => filter.apply_query(given(q), given(category), shown, &mut rng),
    }
    let message = live.message();
    RawHtml(render::blog_page(
        &filter.view(),
        &blog_categories(catalogs),
        message.as_deref(),
    ))
}

#[get("/blog/clear")]
pub fn blog_clear(catalogs: &State<Catalogs>) -> RawHtml<String> {
    let (mut filter, live) = page_filter(catalogs, PageKind::Blog);
    filter.clear_filters();
    let message = live.message();
    RawHtml(render::blog_page(
        &filter.view(),
        &blog_categories(catalogs),
        message.as_deref(),
    ))
}

/// Distinct categories in catalog order, reserve posts included.
fn blog_categories(catalogs: &Catalogs) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let reserve = blog_reserve();
    for item in catalogs.items(PageKind::Blog).iter().chain(reserve.iter()) {
        if !item.category.is_empty() && !out.contains(&item.category) {
            out.push(item.category.clone());
        }
    }
    out
}

// ── Temples ────────────────────────────────────────────

#[get("/temples?<filter>")]
pub fn temples(catalogs: &State<Catalogs>, filter: Option<&str>) -> RawHtml<String> {
    let (mut temple_filter, live) = page_filter(catalogs, PageKind::Temples);
    if let Some(preset) = given(filter) {
        temple_filter.set_category(preset);
    }
    let message = live.message();
    RawHtml(render::temples_page(&temple_filter.view(), message.as_deref()))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![home, trails, blog, blog_clear, temples]
}
