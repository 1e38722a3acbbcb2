//! HTML rendering of the movie trailer page.
//!
//! Templates and static assets are compiled into the binary. Placeholders
//! are `{name}` and are filled in a single pass, so values inserted into a
//! template are never scanned for placeholders themselves.

use v_htmlescape::escape;

use crate::media::Movie;

const MAIN_PAGE: &str = include_str!("../templates/main_page.html");
const MOVIE_TILE: &str = include_str!("../templates/movie_tile.html");
pub const SCRIPTS: &str = include_str!("../static/scripts.js");
pub const STYLES: &str = include_str!("../static/styles.css");

pub const DEFAULT_PAGE_TITLE: &str = "Fresh Tomatillos!";

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self { title: DEFAULT_PAGE_TITLE.to_string() }
    }
}

/// Replace each `{name}` in `template` with its value; unknown names are kept.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match replaced {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn render_tile(movie: &Movie) -> String {
    let youtube_url = movie.youtube_url();
    let title = escape(&movie.title).to_string();
    let summary = escape(&movie.summary).to_string();
    let poster_url = escape(&movie.poster_url).to_string();

    fill(
        MOVIE_TILE,
        &[
            ("youtube_id", movie.youtube_id.as_str()),
            ("youtube_url", &youtube_url),
            ("poster_url", &poster_url),
            ("title", &title),
            ("summary", &summary),
        ],
    )
}

pub fn render_tiles(movies: &[Movie]) -> String {
    movies.iter().map(render_tile).collect::<Vec<_>>().join("\n")
}

/// Render the complete page, including styles and the client script.
pub fn render_page(movies: &[Movie], options: &PageOptions) -> String {
    let tiles = render_tiles(movies);
    let page_title = escape(&options.title).to_string();
    fill(
        MAIN_PAGE,
        &[
            ("page_title", &page_title),
            ("styles", STYLES),
            ("scripts", SCRIPTS),
            ("movie_tiles", &tiles),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::VideoId;

    fn movie(title: &str, id: &str) -> Movie {
        Movie::new(title, "A summary.", "https://x.test/p.jpg", VideoId::new(id).unwrap())
    }

    #[test]
    fn fill_is_single_pass() {
        let out = fill("<{a}|{b}|{c}>", &[("a", "{b}"), ("b", "B")]);
        assert_eq!(out, "<{b}|B|{c}>");
    }

    #[test]
    fn fill_keeps_unmatched_braces() {
        assert_eq!(fill("x { y", &[("y", "z")]), "x { y");
        assert_eq!(fill("{", &[]), "{");
    }

    #[test]
    fn tile_carries_modal_attributes() {
        let html = render_tile(&movie("Moon", "twuScTcDP_Q"));
        assert!(html.contains(r#"class="col-md-6 col-lg-4 movie-tile text-center""#));
        assert!(html.contains(r#"data-trailer-youtube-id="twuScTcDP_Q""#));
        assert!(html.contains(r##"data-toggle="modal" data-target="#trailer""##));
        assert!(html.contains(r#"<a href="https://www.youtube.com/watch?v=twuScTcDP_Q">"#));
        assert!(html.contains("<h2>Moon</h2>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut m = movie("<b>Bold & \"Loud\"", "abc");
        m.summary = "{title}".into();
        let html = render_tile(&m);
        assert!(html.contains("&lt;b&gt;Bold &amp; &quot;Loud&quot;"));
        assert!(html.contains(r#"<p class="movie-summary">{title}</p>"#));
    }

    #[test]
    fn page_embeds_tiles_script_and_styles() {
        let page = render_page(&[movie("A", "a1"), movie("B", "b2")], &PageOptions::default());
        assert!(page.contains("<title>Fresh Tomatillos!</title>"));
        assert!(page.contains(r#"id="trailer-video-container""#));
        assert!(page.contains("'matchMedia' in window"));
        assert!(page.contains(".movie-tile:hover"));
        let a = page.find(r#"data-trailer-youtube-id="a1""#).unwrap();
        let b = page.find(r#"data-trailer-youtube-id="b2""#).unwrap();
        assert!(a < b);
        assert!(!page.contains("{movie_tiles}"));
    }

    #[test]
    fn empty_page_has_no_tiles() {
        let page = render_page(&[], &PageOptions::default());
        assert!(!page.contains("<article"));
    }
}
