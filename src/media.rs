use std::fmt;

use serde::{Deserialize, Serialize};

use crate::youtube::{self, VideoId};

/// A movie shown as one tile on the generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub summary: String,
    pub poster_url: String,
    pub youtube_id: VideoId,
}

impl Movie {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        poster_url: impl Into<String>,
        youtube_id: VideoId,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            poster_url: poster_url.into(),
            youtube_id,
        }
    }

    /// The trailer's watch page on YouTube.
    pub fn youtube_url(&self) -> String {
        youtube::watch_url(self.youtube_id.as_str())
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Movie: {}>", self.title)
    }
}
