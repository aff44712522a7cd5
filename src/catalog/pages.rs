use std::fs;
use std::time::Duration;

use chrono::NaiveDate;
use log::{info, warn};
use rand::Rng;

use crate::catalog::scrape::scrape_post_cards;
use crate::catalog::{category_equals, CatalogFilter, PageSpec, SearchScope};
use crate::config::SiteConfig;
use crate::models::catalog::{Attribute, CatalogItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Trails,
    Blog,
    Temples,
}

impl PageKind {
    pub const ALL: [PageKind; 4] = [PageKind::Home, PageKind::Trails, PageKind::Blog, PageKind::Temples];

    pub fn slug(self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::Trails => "trails",
            PageKind::Blog => "blog",
            PageKind::Temples => "temples",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }
}

/// Each page's catalog, loaded once at startup. Request handlers build a
/// fresh `CatalogFilter` from it.
pub struct Catalogs {
    home: Vec<CatalogItem>,
    trails: Vec<CatalogItem>,
    blog: Vec<CatalogItem>,
    temples: Vec<CatalogItem>,
    blog_page_size: usize,
    debounce: Duration,
}

impl Catalogs {
    pub fn load(config: &SiteConfig) -> Self {
        let blog = match fs::read_to_string(&config.blog_markup) {
            Ok(html) => scrape_post_cards(&html),
            Err(e) => {
                warn!("Blog markup {} unavailable: {}", config.blog_markup, e);
                Vec::new()
            }
        };
        info!("Loaded {} blog post(s) from {}", blog.len(), config.blog_markup);
        Self::with_blog(blog, config, &mut rand::thread_rng())
    }

    /// Build from already-scraped blog items; view counts are simulated.
    pub fn with_blog<R: Rng + ?Sized>(
        mut blog: Vec<CatalogItem>,
        config: &SiteConfig,
        rng: &mut R,
    ) -> Self {
        for item in blog.iter_mut() {
            item.views = Some(rng.gen_range(50..550));
        }
        Catalogs {
            home: featured_trails(),
            trails: all_trails(),
            blog,
            temples: temples(),
            blog_page_size: config.blog_page_size.max(1),
            debounce: config.search_debounce(),
        }
    }

    pub fn items(&self, kind: PageKind) -> &[CatalogItem] {
        match kind {
            PageKind::Home => &self.home,
            PageKind::Trails => &self.trails,
            PageKind::Blog => &self.blog,
            PageKind::Temples => &self.temples,
        }
    }

    pub fn spec(&self, kind: PageKind) -> PageSpec {
        match kind {
            PageKind::Home => PageSpec {
                noun: "trail",
                scope: SearchScope {
                    title: true,
                    description: false,
                    tags: false,
                    category: true,
                    attributes: &["Season"],
                },
                category_rule: category_equals,
                page_size: None,
                reserve: Vec::new(),
                debounce: self.debounce,
            },
            PageKind::Trails => PageSpec {
                noun: "trail",
                scope: SearchScope::default(),
                category_rule: category_equals,
                page_size: None,
                reserve: Vec::new(),
                debounce: self.debounce,
            },
            PageKind::Blog => PageSpec {
                noun: "post",
                scope: SearchScope::default(),
                category_rule: category_equals,
                page_size: Some(self.blog_page_size),
                reserve: blog_reserve(),
                debounce: self.debounce,
            },
            PageKind::Temples => PageSpec {
                noun: "temple",
                scope: SearchScope {
                    category: false,
                    attributes: &["Location"],
                    ..SearchScope::default()
                },
                category_rule: temple_preset,
                page_size: None,
                reserve: Vec::new(),
                debounce: self.debounce,
            },
        }
    }

    pub fn filter(&self, kind: PageKind) -> CatalogFilter {
        CatalogFilter::new(self.spec(kind), self.items(kind).to_vec())
    }
}

/// Temple navigation presets. Unknown presets show everything.
pub fn temple_preset(item: &CatalogItem, preset: &str) -> bool {
    match preset.to_ascii_lowercase().as_str() {
        "old" => item.year().map(|y| y < 1900).unwrap_or(false),
        "new" => item.year().map(|y| y > 2000).unwrap_or(false),
        "large" => item.metric.map(|a| a > 90_000).unwrap_or(false),
        "small" => item.metric.map(|a| a < 10_000).unwrap_or(false),
        _ => true,
    }
}

// ── Hardcoded catalogs ──────────────────────────────────────────────

struct TrailRow {
    name: &'static str,
    difficulty: &'static str,
    distance: &'static str,
    region: &'static str,
    season: &'static str,
    image: &'static str,
    description: &'static str,
}

const NYANGA: TrailRow = TrailRow {
    name: "Nyanga Mountain Trail",
    difficulty: "Easy",
    distance: "4 km",
    region: "Eastern Highlands",
    season: "Spring",
    image: "images/4x4ventures_sa-08082025-0010.jpg",
    description: "Gentle slopes with lush green views and clear skies.",
};

const MATOPOS: TrailRow = TrailRow {
    name: "Matopos Rock Path",
    difficulty: "Moderate",
    distance: "8 km",
    region: "Matopos National Park",
    season: "Dry Season",
    image: "images/bosnian_girl_in_africa-08082025-0002.webp",
    description: "Unique balancing rock formations and cultural sites.",
};

const CHIMANIMANI: TrailRow = TrailRow {
    name: "Chimanimani Ridge",
    difficulty: "Challenging",
    distance: "15 km",
    region: "Chimanimani",
    season: "Winter",
    image: "images/iconicmoments.travel-09082025-0001.jpg",
    description: "Steep climb with breathtaking mountain views.",
};

const VUMBA: TrailRow = TrailRow {
    name: "Vumba Botanical Trail",
    difficulty: "Easy",
    distance: "3 km",
    region: "Eastern Highlands",
    season: "Summer",
    image: "images/putjepathfinder-09082025-0001.jpg",
    description: "A short scenic route through botanical gardens.",
};

fn trail_items(rows: &[TrailRow]) -> Vec<CatalogItem> {
    rows.iter()
        .enumerate()
        .map(|(i, t)| CatalogItem {
            id: i + 1,
            title: t.name.to_string(),
            category: t.difficulty.to_string(),
            description: t.description.to_string(),
            image: t.image.to_string(),
            attributes: vec![
                Attribute::new("Distance", t.distance),
                Attribute::new("Region", t.region),
                Attribute::new("Season", t.season),
            ],
            ..Default::default()
        })
        .collect()
}

pub fn featured_trails() -> Vec<CatalogItem> {
    trail_items(&[NYANGA, MATOPOS, CHIMANIMANI, VUMBA])
}

/// The trails page ships a different Chimanimani photo.
pub fn all_trails() -> Vec<CatalogItem> {
    let chimanimani = TrailRow {
        image: "images/_pamushana_-09082025-0001.jpg",
        ..CHIMANIMANI
    };
    trail_items(&[NYANGA, MATOPOS, chimanimani, VUMBA])
}

const TEMPLE_IMAGES: &str = "https://content.churchofjesuschrist.org/templesldsorg/bc/Temples/photo-galleries";
const TEMPLE_ASSETS: &str = "https://churchofjesuschristtemples.org/assets/img/temples";

pub fn temples() -> Vec<CatalogItem> {
    let rows: [(&str, &str, (i32, u32, u32), &str, i64, String); 10] = [
        ("Aba Nigeria", "Aba, Nigeria", (2005, 8, 7), "2005, August, 7", 11500,
            format!("{}/aba-nigeria/400x250/aba-nigeria-temple-lds-273999-wallpaper.jpg", TEMPLE_IMAGES)),
        ("Manti Utah", "Manti, Utah, United States", (1888, 5, 21), "1888, May, 21", 74792,
            format!("{}/manti-utah/400x250/manti-temple-768192-wallpaper.jpg", TEMPLE_IMAGES)),
        ("Payson Utah", "Payson, Utah, United States", (2015, 6, 7), "2015, June, 7", 96630,
            format!("{}/payson-utah/400x225/payson-utah-temple-exterior-1416671-wallpaper.jpg", TEMPLE_IMAGES)),
        ("Yigo Guam", "Yigo, Guam", (2020, 5, 2), "2020, May, 2", 6861,
            format!("{}/yigo-guam/400x250/yigo_guam_temple_2.jpg", TEMPLE_IMAGES)),
        ("Washington D.C.", "Kensington, Maryland, United States", (1974, 11, 19), "1974, November, 19", 156558,
            format!("{}/washington-dc/400x250/washington_dc_temple-exterior-2.jpeg", TEMPLE_IMAGES)),
        ("Lima Perú", "Lima, Perú", (1986, 1, 10), "1986, January, 10", 9600,
            format!("{}/lima-peru/400x250/lima-peru-temple-evening-1075606-wallpaper.jpg", TEMPLE_IMAGES)),
        ("Mexico City Mexico", "Mexico City, Mexico", (1983, 12, 2), "1983, December, 2", 116642,
            format!("{}/mexico-city-mexico/400x250/mexico-city-temple-exterior-1518361-wallpaper.jpg", TEMPLE_IMAGES)),
        ("Praia Cape Verde Temple", "Praia, Santiago Cape Verde", (2022, 6, 19), "2022, June, 19", 8759,
            format!("{}/praia-cape-verde-temple/praia-cape-verde-temple-27204-main.jpg", TEMPLE_ASSETS)),
        ("Freetown Sierra Leone Temple", "Kossoh Town, Freetown, Sierra Leone", (2019, 10, 5), "2019, October, 5", 18000,
            format!("{}/freetown-sierra-leone-temple/freetown-sierra-leone-temple-24087-main.jpg", TEMPLE_ASSETS)),
        ("Stockholm Sweden Temple", "SE-13742 Västerhaninge, Sweden", (1985, 7, 4), "1985, July, 4", 31000,
            format!("{}/stockholm-sweden-temple/stockholm-sweden-temple-30267-main.jpg", TEMPLE_ASSETS)),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (name, location, (y, m, d), dedicated, area, image))| CatalogItem {
            id: i + 1,
            title: name.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d),
            metric: Some(area),
            image,
            attributes: vec![
                Attribute::new("Location", location),
                Attribute::new("Dedicated", dedicated),
            ],
            ..Default::default()
        })
        .collect()
}

/// Posts "load more" appends once the scraped list is exhausted.
pub fn blog_reserve() -> Vec<CatalogItem> {
    vec![
        CatalogItem {
            title: "Chinanimani Mountains: Hidden Waterfalls and Secret Trails".to_string(),
            category: "trail-guide".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 7, 5),
            description: "Discover the lesser-known trails of Chinanimani Mountains, where pristine waterfalls and untouched wilderness await adventurous hikers.".to_string(),
            tags: vec!["chinanimani".into(), "waterfalls".into(), "wilderness".into()],
            read_time: Some("11 min read".to_string()),
            image: "images/_pamushana_-09082025-0001.jpg".to_string(),
            ..Default::default()
        },
        CatalogItem {
            title: "Seasonal Hiking Calendar: When to Visit Zimbabwe's Best Trails".to_string(),
            category: "hiking-tips".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 30),
            description: "Plan your hiking adventures with our comprehensive seasonal guide. Learn the best times to visit each region for optimal weather and wildlife viewing.".to_string(),
            tags: vec!["seasons".into(), "planning".into(), "weather".into()],
            read_time: Some("8 min read".to_string()),
            image: "images/trekroute.np-08082025-0001.jpg".to_string(),
            ..Default::default()
        },
    ]
}
