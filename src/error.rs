use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

const CONFIG_ERROR_HEADER: &str =
    "ERROR IN CONFIG FILE\nPlease update your config file and run the program again.";

/// Key problems found in a single `[movie]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieKeyErrors {
    pub title: String,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

/// Problems in a user-written movie config file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{}\n{}", CONFIG_ERROR_HEADER, KeyReport(.0))]
    InvalidKeys(Vec<MovieKeyErrors>),

    #[error(
        "{}\n\nInvalid YouTube {source_type} for movie:  {title}\n   Invalid {source_type}:\n    {video_source}",
        CONFIG_ERROR_HEADER
    )]
    InvalidVideoId {
        title: String,
        video_source: String,
        source_type: &'static str,
    },

    #[error("{}\n\nLine {line}: {message}", CONFIG_ERROR_HEADER)]
    Syntax { line: usize, message: String },
}

struct KeyReport<'a>(&'a [MovieKeyErrors]);

impl fmt::Display for KeyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for movie in self.0 {
            write!(f, "\nInvalid config settings for movie:  {}", movie.title)?;
            if !movie.missing.is_empty() {
                write!(f, "\n   This information is missing:")?;
                for key in &movie.missing {
                    write!(f, "\n    - {key}")?;
                }
            }
            if !movie.unexpected.is_empty() {
                write!(f, "\n   This information should not be included:")?;
                for key in &movie.unexpected {
                    write!(f, "\n    - {key}")?;
                }
            }
        }
        Ok(())
    }
}

/// Crate level error returned by the [`crate::Tomatillos`] facade.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}", describe_read(.path, .source))]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}", describe_write(.path, .source))]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn describe_read(path: &Path, err: &io::Error) -> String {
    let path = path.display();
    match err.kind() {
        io::ErrorKind::NotFound => format!("The specified filename was not found: {path}"),
        io::ErrorKind::PermissionDenied => format!("You don't have read access to the file: {path}"),
        io::ErrorKind::IsADirectory => format!("Expected a file, but found a directory: {path}"),
        io::ErrorKind::InvalidData => format!("The config file is not valid UTF-8: {path}"),
        _ => format!("Unable to read {path}: {err}"),
    }
}

fn describe_write(path: &Path, err: &io::Error) -> String {
    let path = path.display();
    match err.kind() {
        io::ErrorKind::PermissionDenied => format!("Couldn't write the output file: {path}"),
        io::ErrorKind::IsADirectory => format!("Expected an output file, but found a directory: {path}"),
        _ => format!("Unable to write {path}: {err}"),
    }
}
