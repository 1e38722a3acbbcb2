//! Trailer modal wiring: the capable path, the disabler path and the modal
//! overlay the tiles open.

use tracing::{debug, trace};

use super::dom::{Dom, NodeId, Visibility};
use super::events::{EventType, Handler, ListenerStore};
use super::selector::Selector;
use crate::youtube::embed_url;

pub const TILE_CLASS: &str = "movie-tile";
pub const TRAILER_ID_ATTR: &str = "data-trailer-youtube-id";
pub const MODAL_TARGET_ATTR: &str = "data-target";
pub const PLAYER_ID: &str = "trailer-video";

pub fn tile_selector() -> Selector {
    Selector::class(TILE_CLASS)
}

/// `.movie-tile a`
pub fn tile_link_selector() -> Selector {
    Selector::descendant(tile_selector(), Selector::tag("a"))
}

/// `.hanging-close, .modal-backdrop, .modal`
pub fn close_selector() -> Selector {
    Selector::any([
        Selector::class("hanging-close"),
        Selector::class("modal-backdrop"),
        Selector::class("modal"),
    ])
}

/// Capable path: tiles stop navigating and clicks drive the player.
pub fn install_trailer_modal(dom: &mut Dom, listeners: &mut ListenerStore) {
    let links = dom.query_all(&tile_link_selector());
    for link in &links {
        dom.remove_attr(*link, "href");
    }
    debug!(links = links.len(), "tile links disabled");

    let root = dom.root();
    listeners.on(root, EventType::Click, close_selector(), Handler::ClearTrailer);
    listeners.on(root, EventType::Click, tile_selector(), Handler::PlayTrailer);
}

/// Disabler path: tiles no longer name a modal to open.
pub fn disable_modal(dom: &mut Dom) {
    let tiles = dom.query_all(&tile_selector());
    for tile in &tiles {
        dom.remove_attr(*tile, MODAL_TARGET_ATTR);
    }
    debug!(tiles = tiles.len(), "trailer modal disabled");
}

/// Remove any mounted player. Dropping the element is what stops playback.
pub fn clear_trailer(dom: &mut Dom, container: NodeId) {
    let removed = dom.empty(container);
    trace!(removed, "trailer container emptied");
}

/// Replace the container's content with a player for `tile`'s trailer.
pub fn play_trailer(dom: &mut Dom, container: NodeId, tile: NodeId) -> NodeId {
    let id = dom.attr(tile, TRAILER_ID_ATTR).unwrap_or_default().to_string();
    let src = embed_url(&id);

    dom.empty(container);
    let player = dom.append_element(
        container,
        "iframe",
        &[("id", PLAYER_ID), ("type", "text-html"), ("src", src.as_str()), ("frameborder", "0")],
    );
    debug!(%src, "trailer mounted");
    player
}

/// The modal element plus the backdrop shown behind it while open.
#[derive(Debug, Clone)]
pub struct ModalOverlay {
    modal: NodeId,
    host: NodeId,
    backdrop: Option<NodeId>,
}

impl ModalOverlay {
    /// `modal` starts hidden; backdrops are appended to `host`.
    pub fn new(dom: &mut Dom, modal: NodeId, host: NodeId) -> Self {
        dom.set_visibility(modal, Visibility::Hidden);
        Self { modal, host, backdrop: None }
    }

    pub fn modal(&self) -> NodeId {
        self.modal
    }

    pub fn backdrop(&self) -> Option<NodeId> {
        self.backdrop
    }

    pub fn is_open(&self) -> bool {
        self.backdrop.is_some()
    }

    pub fn show(&mut self, dom: &mut Dom) {
        if self.is_open() {
            return;
        }
        dom.set_visibility(self.modal, Visibility::Shown);
        let backdrop = dom.append_element(self.host, "div", &[("class", "modal-backdrop in")]);
        self.backdrop = Some(backdrop);
    }

    pub fn hide(&mut self, dom: &mut Dom) {
        dom.set_visibility(self.modal, Visibility::Hidden);
        if let Some(backdrop) = self.backdrop.take() {
            dom.detach(backdrop);
        }
    }

}

/// Register the modal data-api listeners every page gets, whatever its path.
pub fn install_modal_data_api(dom: &Dom, listeners: &mut ListenerStore, overlay: &ModalOverlay) {
    let root = dom.root();
    listeners.on(
        root,
        EventType::Click,
        Selector::attr_eq("data-toggle", "modal"),
        Handler::ShowModal,
    );
    listeners.on(
        overlay.modal(),
        EventType::Click,
        Selector::attr_eq("data-dismiss", "modal"),
        Handler::DismissModal,
    );
    listeners.on(root, EventType::Click, Selector::class("modal-backdrop"), Handler::DismissModal);
    listeners.on_self(overlay.modal(), EventType::Click, Handler::DismissOnSelf);
}
