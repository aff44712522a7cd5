use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub label: String,
    pub value: String,
}

impl Attribute {
    pub fn new(label: &str, value: &str) -> Self {
        Attribute {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// One listing entry: a trail, a blog post or a temple.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct CatalogItem {
    /// 1-based position in the catalog at load time.
    pub id: usize,
    pub title: String,
    /// Difficulty for trails, slug for blog posts, empty for temples.
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub date: Option<NaiveDate>,
    /// Numeric sort/filter value (temple floor area in sq. ft.).
    pub metric: Option<i64>,
    #[serde(default)]
    pub image: String,
    pub link: Option<String>,
    pub read_time: Option<String>,
    /// Simulated view count, presentation only.
    pub views: Option<u32>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Appended at runtime by "load more", never persisted.
    #[serde(default)]
    pub synthetic: bool,
}

impl CatalogItem {
    pub fn attribute(&self, label: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.label.eq_ignore_ascii_case(label))
            .map(|a| a.value.as_str())
    }

    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }
}
