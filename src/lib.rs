pub mod check;
pub mod config;
pub mod error;
pub mod mapping;
pub mod media;
pub mod page;
pub mod render;
pub mod settings;
pub mod youtube;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::check::{check_page, CheckReport};
    pub use crate::error::{ConfigError, Error};
    pub use crate::media::Movie;
    pub use crate::page::{Capabilities, ClickOutcome, Page, Strategy};
    pub use crate::settings::Settings;
    pub use crate::youtube::VideoId;
    pub use crate::Tomatillos;
}

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::config::{parse_movie_config, read_movie_config, SAMPLE_CONFIG};
use crate::error::Error;
use crate::mapping::movies_from_config;
use crate::media::Movie;
use crate::page::{Capabilities, Page};
use crate::render::{render_page, PageOptions};
use crate::settings::Settings;

/// Library entry point: a validated movie list plus the settings used to
/// render and publish it.
#[derive(Debug, Clone)]
pub struct Tomatillos {
    movies: Vec<Movie>,
    settings: Settings,
}

impl Tomatillos {
    /// Load movies from `config_path`, or from the bundled sample when `None`.
    pub async fn load(config_path: Option<&Path>, settings: Settings) -> Result<Self, Error> {
        let config = match config_path {
            Some(path) => read_movie_config(path).await?,
            None => {
                debug!("no config given; using the bundled sample");
                parse_movie_config(SAMPLE_CONFIG)?
            }
        };
        let movies = movies_from_config(&config)?;
        Ok(Self::from_movies(movies, settings))
    }

    pub fn from_movies(movies: Vec<Movie>, settings: Settings) -> Self {
        Self { movies, settings }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn render(&self) -> String {
        let options = PageOptions { title: self.settings.page_title.clone() };
        render_page(&self.movies, &options)
    }

    /// Write the page to `output` (or the configured location) and return
    /// where it went. Parent directories are created as needed.
    pub async fn write_page(&self, output: Option<&Path>) -> Result<PathBuf, Error> {
        let path = match output {
            Some(path) => path.to_path_buf(),
            None => self.settings.output_path().ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "unable to determine a data directory for the output page",
                ))
            })?,
        };
        let write_err = |source| Error::WriteOutput { path: path.clone(), source };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        tokio::fs::write(&path, self.render()).await.map_err(write_err)?;
        info!(path = %path.display(), movies = self.movies.len(), "page written");
        Ok(path)
    }

    /// A loaded headless model of the page for `caps`.
    pub fn preview(&self, caps: Capabilities) -> Page {
        let mut page = Page::new(&self.movies);
        page.load(caps);
        page
    }
}

/// Ask the platform to open `path`. Failure is logged, never returned.
pub fn open_in_browser(path: &Path) -> bool {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    command.arg(path);
    run_opener(command, path)
}

/// Run the platform opener to completion. Openers hand the page to the
/// browser and exit, so waiting here also reaps the child.
fn run_opener(mut command: Command, path: &Path) -> bool {
    match command.status() {
        Ok(status) if status.success() => {
            debug!(path = %path.display(), "browser launched");
            true
        }
        Ok(status) => {
            warn!(path = %path.display(), %status, "browser opener failed");
            false
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "unable to open a browser");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_loads_and_renders() {
        let app = Tomatillos::load(None, Settings::default()).await.unwrap();
        assert_eq!(app.movies().len(), 4);
        let html = app.render();
        assert!(html.contains("<title>Fresh Tomatillos!</title>"));
        assert_eq!(html.matches("class=\"col-md-6 col-lg-4 movie-tile text-center\"").count(), 4);
    }

    #[tokio::test]
    async fn write_page_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings { output_dir: Some(dir.path().join("nested")), ..Settings::default() };
        let app = Tomatillos::load(None, settings).await.unwrap();
        let path = app.write_page(None).await.unwrap();
        assert_eq!(path, dir.path().join("nested").join("tomatillos.html"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, app.render());
    }

    #[tokio::test]
    async fn write_into_a_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let app = Tomatillos::from_movies(Vec::new(), Settings::default());
        let err = app.write_page(Some(dir.path())).await.unwrap_err();
        assert!(matches!(err, Error::WriteOutput { .. }));
    }

    #[tokio::test]
    async fn missing_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.cfg");
        let err = Tomatillos::load(Some(&path), Settings::default()).await.unwrap_err();
        assert_eq!(err.to_string(), format!("The specified filename was not found: {}", path.display()));
    }

    #[cfg(unix)]
    #[test]
    fn opener_status_is_reported() {
        let path = Path::new("page.html");
        assert!(run_opener(Command::new("true"), path));
        assert!(!run_opener(Command::new("false"), path));
        assert!(!run_opener(Command::new("tomatillos-no-such-opener"), path));
    }

    #[test]
    fn preview_is_loaded() {
        let app = Tomatillos::from_movies(Vec::new(), Settings::default());
        assert_eq!(app.preview(Capabilities::legacy()).strategy(), Some(page::Strategy::Disabled));
    }
}
