//! Parsing and validation of user-written movie config files.
//!
//! The format is INI-style:
//!
//! ```text
//! [Movie Title]
//! summary: Brief description of the plot.
//! poster: https://url/of/poster/image
//! youtube: YouTube_video-id
//! ```
//!
//! The `youtube` value may also be a full YouTube URL. Any number of movie
//! sections may appear in one file.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, Error, MovieKeyErrors};

/// Keys every movie section must define, and the only keys it may define.
pub const MOVIE_KEYS: [&str; 3] = ["summary", "poster", "youtube"];

const DEFAULT_SECTION: &str = "DEFAULT";

/// Config bundled with the binary, used when no path is given.
pub const SAMPLE_CONFIG: &str = include_str!("../sample.cfg");

/// One `[title]` section with its options, defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieSection {
    pub title: String,
    options: BTreeMap<String, String>,
}

impl MovieSection {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }
}

/// Parsed config: movie sections in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieConfig {
    sections: Vec<MovieSection>,
}

impl MovieConfig {
    pub fn sections(&self) -> &[MovieSection] {
        &self.sections
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.title.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Parse config text without validating its keys.
    ///
    /// Parsing is not strict: a repeated section merges into the first one
    /// and a repeated key overwrites the earlier value.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut defaults: BTreeMap<String, String> = BTreeMap::new();
        let mut order: Vec<String> = Vec::new();
        let mut raw: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();

        let mut current: Option<String> = None;
        let mut last_key: Option<String> = None;
        let mut blank_run = 0usize;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                blank_run += 1;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indented = line.starts_with(|c: char| c.is_whitespace());
            let blanks = std::mem::take(&mut blank_run);

            // Continuation of the previous value
            if indented {
                if let (Some(section), Some(key)) = (&current, &last_key) {
                    let target = if section == DEFAULT_SECTION {
                        &mut defaults
                    } else {
                        raw.entry(section.clone()).or_default()
                    };
                    // Blank lines inside a continued value are kept
                    if let Some(value) = target.get_mut(key) {
                        value.extend(std::iter::repeat('\n').take(blanks + 1));
                        value.push_str(trimmed);
                    }
                    continue;
                }
            }

            if !indented && trimmed.starts_with('[') {
                let title = parse_header(trimmed).ok_or_else(|| ConfigError::Syntax {
                    line: line_no,
                    message: format!("malformed section header: {trimmed}"),
                })?;
                if title != DEFAULT_SECTION && !raw.contains_key(&title) {
                    order.push(title.clone());
                    raw.insert(title.clone(), BTreeMap::new());
                }
                current = Some(title);
                last_key = None;
                continue;
            }

            let Some(section) = &current else {
                return Err(ConfigError::Syntax {
                    line: line_no,
                    message: "settings must follow a [movie title] header".into(),
                });
            };

            let Some(pos) = trimmed.find(['=', ':']) else {
                return Err(ConfigError::Syntax {
                    line: line_no,
                    message: format!("expected `key: value`, found: {trimmed}"),
                });
            };
            let key = trimmed[..pos].trim().to_lowercase();
            let value = trimmed[pos + 1..].trim().to_string();
            if key.is_empty() {
                return Err(ConfigError::Syntax {
                    line: line_no,
                    message: format!("missing key before delimiter: {trimmed}"),
                });
            }

            let target = if section == DEFAULT_SECTION {
                &mut defaults
            } else {
                raw.entry(section.clone()).or_default()
            };
            target.insert(key.clone(), value);
            last_key = Some(key);
        }

        let sections = order
            .into_iter()
            .map(|title| {
                let mut options = defaults.clone();
                if let Some(own) = raw.remove(&title) {
                    options.extend(own);
                }
                MovieSection { title, options }
            })
            .collect();

        Ok(Self { sections })
    }

    /// Check that every section has exactly `valid_keys` and nothing else.
    ///
    /// Section values are not inspected here.
    pub fn verify_keys(&self, valid_keys: &[&str]) -> Result<(), ConfigError> {
        let valid: BTreeSet<&str> = valid_keys.iter().copied().collect();

        let errors: Vec<MovieKeyErrors> = self
            .sections
            .iter()
            .filter_map(|section| {
                let keys: BTreeSet<&str> = section.keys().collect();
                if keys == valid {
                    return None;
                }
                Some(MovieKeyErrors {
                    title: section.title.clone(),
                    missing: valid.difference(&keys).map(|k| k.to_string()).collect(),
                    unexpected: keys.difference(&valid).map(|k| k.to_string()).collect(),
                })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::InvalidKeys(errors))
        }
    }
}

fn parse_header(line: &str) -> Option<String> {
    let close = line.rfind(']')?;
    let title = line[1..close].trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Parse and validate movie config text.
pub fn parse_movie_config(text: &str) -> Result<MovieConfig, ConfigError> {
    let config = MovieConfig::parse(text)?;
    config.verify_keys(&MOVIE_KEYS)?;
    Ok(config)
}

/// Read, parse and validate the movie config at `path`.
pub async fn read_movie_config(path: &Path) -> Result<MovieConfig, Error> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::ReadConfig { path: path.to_path_buf(), source })?;
    let config = parse_movie_config(&text)?;
    debug!(path = %path.display(), movies = config.sections().len(), "loaded movie config");
    Ok(config)
}
