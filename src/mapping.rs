use crate::config::{MovieConfig, MovieSection};
use crate::error::ConfigError;
use crate::media::Movie;
use crate::youtube::resolve_video_id;

fn value<'a>(section: &'a MovieSection, key: &str) -> &'a str {
    section.get(key).unwrap_or_default()
}

pub fn movie_from_section(section: &MovieSection) -> Result<Movie, ConfigError> {
    let youtube_id = resolve_video_id(value(section, "youtube"), &section.title)?;
    Ok(Movie::new(
        section.title.clone(),
        value(section, "summary"),
        value(section, "poster"),
        youtube_id,
    ))
}

/// Movies in config order. The first unresolvable trailer aborts.
pub fn movies_from_config(config: &MovieConfig) -> Result<Vec<Movie>, ConfigError> {
    config.sections().iter().map(movie_from_section).collect()
}
