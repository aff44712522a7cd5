use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// A community story. Stored newest first as a JSON array under the
/// board's key. The aliases accept records written by the old browser
/// scripts (`username`, `date`, `photo`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Post {
    #[serde(alias = "username")]
    pub author: String,
    pub message: String,
    #[serde(alias = "date")]
    pub timestamp: String,
    /// `data:` URL, empty when no photo was attached.
    #[serde(alias = "photo", default)]
    pub image: String,
}

/// Raw submission fields, untrimmed.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PostForm {
    pub author: String,
    pub message: String,
}

impl Post {
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

/// `M/D/YYYY, h:mm:ss AM` in the zone of `at`.
pub fn display_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
