use serde::{Deserialize, Serialize};

/// What the host browser supports, probed once at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// `window.matchMedia` exists; stands in for "modern enough for the modal".
    pub match_media: bool,
}

impl Capabilities {
    pub fn modern() -> Self {
        Self { match_media: true }
    }

    pub fn legacy() -> Self {
        Self { match_media: false }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::modern()
    }
}

/// How tile clicks are wired for the lifetime of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Tiles open the trailer modal and mount a player.
    TrailerModal,
    /// The modal is switched off; tiles keep their plain links.
    Disabled,
}

impl Strategy {
    pub fn negotiate(caps: &Capabilities) -> Self {
        if caps.match_media {
            Strategy::TrailerModal
        } else {
            Strategy::Disabled
        }
    }
}
