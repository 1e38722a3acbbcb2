//! Drive a headless [`Page`] through a full session and report anything the
//! generated page would get wrong.

use serde::Serialize;
use tracing::{debug, info};

use crate::media::Movie;
use crate::page::{Capabilities, Page, Strategy};
use crate::youtube::{embed_url, watch_url};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckReport {
    pub strategy: Strategy,
    pub tiles: usize,
    pub revealed_in_order: bool,
    pub all_visible: bool,
    pub trailers_opened: usize,
    pub navigations: Vec<String>,
    pub violations: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Load the page for `movies`, let the reveal finish, then click every tile
/// (and the close control after each one on the trailer path).
pub fn check_page(movies: &[Movie], caps: Capabilities) -> CheckReport {
    let mut page = Page::new(movies);
    let strategy = page.load(caps);
    page.run_until_idle();

    let tiles = page.tiles();
    let mut violations = Vec::new();

    let revealed_in_order = page.reveal_order() == tiles.as_slice();
    if !revealed_in_order {
        violations.push("tiles were not revealed in document order".to_string());
    }
    let all_visible = tiles.iter().all(|t| page.dom().is_visible(*t));
    if !all_visible {
        violations.push("some tiles are still hidden after the reveal".to_string());
    }

    let mut trailers_opened = 0;
    for (movie, &tile) in movies.iter().zip(&tiles) {
        let outcome = page.click(tile);
        let players = page.players();
        debug!(title = %movie.title, players = players.len(), "tile clicked");

        match strategy {
            Strategy::TrailerModal => {
                let expected = embed_url(movie.youtube_id.as_str());
                if players.len() != 1 {
                    violations.push(format!("{}: expected one player, found {}", movie.title, players.len()));
                } else if page.player_src() != Some(expected.as_str()) {
                    violations.push(format!("{}: player does not embed {expected}", movie.title));
                } else {
                    trailers_opened += 1;
                }
                if let Some(href) = &outcome.navigation {
                    violations.push(format!("{}: tile click navigated to {href}", movie.title));
                }

                match page.close_control() {
                    Some(close) => {
                        page.click(close);
                        if !page.players().is_empty() {
                            violations.push(format!("{}: closing left a player mounted", movie.title));
                        }
                        if page.modal_open() {
                            violations.push(format!("{}: closing left the modal open", movie.title));
                        }
                    }
                    None => violations.push("no close control on the modal".to_string()),
                }
            }
            Strategy::Disabled => {
                if !players.is_empty() {
                    violations.push(format!("{}: a player was mounted with the modal disabled", movie.title));
                }
                // Clicking the tile body has no link to follow; the poster link does.
                if let Some(link) = page.tile_link(tile) {
                    let outcome = page.click(link);
                    let expected = watch_url(movie.youtube_id.as_str());
                    if outcome.navigation.as_deref() != Some(expected.as_str()) {
                        violations.push(format!("{}: link does not lead to {expected}", movie.title));
                    }
                }
            }
        }
    }

    let report = CheckReport {
        strategy,
        tiles: tiles.len(),
        revealed_in_order,
        all_visible,
        trailers_opened,
        navigations: page.navigations().to_vec(),
        violations,
    };
    info!(?strategy, tiles = report.tiles, violations = report.violations.len(), "page check finished");
    report
}
