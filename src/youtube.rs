use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

const LONG_HOSTNAMES: [&str; 3] = ["www.youtube.com", "youtube.com", "m.youtube.com"];
const SHORT_HOSTNAMES: [&str; 1] = ["youtu.be"];

/// A token that may be a YouTube video id.
///
/// Only ASCII letters, digits, `-` and `_` are accepted, so an id is always
/// safe to splice into a URL path or an HTML attribute. The length is not
/// checked since YouTube could change it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    pub fn new(candidate: &str) -> Option<Self> {
        is_potential_id(candidate).then(|| Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VideoId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_potential_id(&value) {
            Ok(Self(value))
        } else {
            Err(format!("not a YouTube video id: {value:?}"))
        }
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

pub fn is_potential_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Player URL loaded into the trailer modal.
///
/// The id is substituted verbatim.
pub fn embed_url(id: &str) -> String {
    format!("https://www.youtube.com/embed/{id}?autoplay=1&html5=1")
}

/// Regular watch page, used as the tile's link target.
pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

fn parse_url(source: &str) -> Option<Url> {
    // Without a scheme the host would be parsed as part of the path
    match Url::parse(source) {
        Ok(url) if url.has_host() => Some(url),
        _ => Url::parse(&format!("https://{source}")).ok(),
    }
}

fn id_from_url(source: &str) -> Option<VideoId> {
    let url = parse_url(source)?;
    let host = url.host_str()?;

    if LONG_HOSTNAMES.contains(&host) {
        let (_, v) = url.query_pairs().find(|(k, v)| k == "v" && !v.is_empty())?;
        VideoId::new(&v)
    } else if SHORT_HOSTNAMES.contains(&host) {
        VideoId::new(url.path().strip_prefix('/')?)
    } else {
        None
    }
}

/// Resolve a config `youtube` value, either a bare id or a YouTube URL.
pub fn resolve_video_id(source: &str, title: &str) -> Result<VideoId, ConfigError> {
    if let Some(id) = VideoId::new(source) {
        return Ok(id);
    }
    id_from_url(source).ok_or_else(|| ConfigError::InvalidVideoId {
        title: title.to_string(),
        video_source: source.to_string(),
        source_type: "ID or URL",
    })
}
