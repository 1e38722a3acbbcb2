//! Headless model of the generated page's client-side behavior.
//!
//! The markup mirrors `templates/`, and the wiring mirrors
//! `static/scripts.js` plus the modal data-api it relies on. A [`Page`] is
//! loaded once with the host's [`Capabilities`]; afterwards clicks are handled
//! according to the [`Strategy`] picked at load, and reveal transitions run
//! on a virtual clock.

pub mod capability;
pub mod dom;
pub mod event_loop;
pub mod events;
pub mod modal;
pub mod reveal;
pub mod selector;

use std::time::Duration;

use tracing::{debug, trace, warn};

pub use capability::{Capabilities, Strategy};
pub use dom::{Dom, NodeId, Visibility};
pub use selector::{Selector, SelectorError};

use crate::media::Movie;
use event_loop::{EventLoop, Task};
use events::{EventType, Handler, Invocation, ListenerStore};
use modal::ModalOverlay;
use reveal::TileRevealer;

pub const TRAILER_CONTAINER_ID: &str = "trailer-video-container";

/// What a click did beyond running its handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    pub handlers_run: usize,
    pub default_prevented: bool,
    /// Where the browser would have navigated, if anywhere.
    pub navigation: Option<String>,
}

pub struct Page {
    dom: Dom,
    listeners: ListenerStore,
    event_loop: EventLoop,
    overlay: ModalOverlay,
    container: NodeId,
    revealer: Option<TileRevealer>,
    strategy: Option<Strategy>,
    reveal_order: Vec<NodeId>,
    navigations: Vec<String>,
}

struct Skeleton {
    body: NodeId,
    modal: NodeId,
    container: NodeId,
}

fn build_skeleton(dom: &mut Dom, movies: &[Movie]) -> Skeleton {
    let root = dom.root();
    let html = dom.append_element(root, "html", &[("lang", "en")]);
    let body = dom.append_element(html, "body", &[]);

    let modal = dom.append_element(body, "div", &[("class", "modal"), ("id", "trailer")]);
    let dialog = dom.append_element(modal, "div", &[("class", "modal-dialog")]);
    let content = dom.append_element(dialog, "div", &[("class", "modal-content")]);
    let close = dom.append_element(
        content,
        "a",
        &[
            ("href", "#"),
            ("class", "hanging-close"),
            ("data-dismiss", "modal"),
            ("aria-hidden", "true"),
        ],
    );
    dom.append_element(close, "img", &[("alt", "Close")]);
    let container = dom.append_element(
        content,
        "div",
        &[("class", "scale-media"), ("id", TRAILER_CONTAINER_ID)],
    );

    let list = dom.append_element(body, "main", &[("class", "container movie-list")]);
    for movie in movies {
        let youtube_url = movie.youtube_url();
        let tile = dom.append_element(
            list,
            "article",
            &[
                ("class", "col-md-6 col-lg-4 movie-tile text-center"),
                (modal::TRAILER_ID_ATTR, movie.youtube_id.as_str()),
                ("data-toggle", "modal"),
                (modal::MODAL_TARGET_ATTR, "#trailer"),
            ],
        );
        let link = dom.append_element(tile, "a", &[("href", youtube_url.as_str())]);
        dom.append_element(
            link,
            "img",
            &[("alt", ""), ("src", movie.poster_url.as_str()), ("width", "220"), ("height", "342")],
        );
        let heading = dom.append_element(link, "h2", &[]);
        dom.append_text(heading, &movie.title);
        let summary = dom.append_element(tile, "p", &[("class", "movie-summary")]);
        dom.append_text(summary, &movie.summary);
    }

    Skeleton { body, modal, container }
}

impl Page {
    /// Build the page for `movies`. Nothing runs until [`Page::load`].
    pub fn new(movies: &[Movie]) -> Self {
        let mut dom = Dom::new();
        let skeleton = build_skeleton(&mut dom, movies);
        Self::from_parts(dom, skeleton)
    }

    fn from_parts(mut dom: Dom, skeleton: Skeleton) -> Self {
        let overlay = ModalOverlay::new(&mut dom, skeleton.modal, skeleton.body);
        let mut listeners = ListenerStore::default();
        modal::install_modal_data_api(&dom, &mut listeners, &overlay);
        Self {
            dom,
            listeners,
            event_loop: EventLoop::new(),
            overlay,
            container: skeleton.container,
            revealer: None,
            strategy: None,
            reveal_order: Vec::new(),
            navigations: Vec::new(),
        }
    }

    /// Run the page script: start the reveal, probe capabilities once and
    /// wire the selected path. Later calls keep the first strategy.
    pub fn load(&mut self, caps: Capabilities) -> Strategy {
        if let Some(strategy) = self.strategy {
            warn!(?strategy, "page already loaded; capabilities are not probed again");
            return strategy;
        }

        let tiles = self.dom.query_all(&modal::tile_selector());
        let mut revealer = TileRevealer::new(tiles, reveal::FAST);
        revealer.start(&mut self.dom, &mut self.event_loop);
        self.revealer = Some(revealer);

        let strategy = Strategy::negotiate(&caps);
        match strategy {
            Strategy::TrailerModal => modal::install_trailer_modal(&mut self.dom, &mut self.listeners),
            Strategy::Disabled => modal::disable_modal(&mut self.dom),
        }
        self.strategy = Some(strategy);
        debug!(?strategy, tiles = self.tiles().len(), "page loaded");
        strategy
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::TransitionEnd { node } => {
                let Some(revealer) = self.revealer.as_mut() else { return };
                if revealer.on_transition_end(&mut self.dom, &mut self.event_loop, node) {
                    self.reveal_order.push(node);
                }
            }
        }
    }

    /// Drain every scheduled task, moving the clock as far as needed.
    pub fn run_until_idle(&mut self) {
        while let Some(task) = self.event_loop.next_due(None) {
            self.run_task(task);
        }
    }

    /// Let `by` of virtual time pass, running whatever falls due.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.event_loop.now() + by;
        while let Some(task) = self.event_loop.next_due(Some(deadline)) {
            self.run_task(task);
        }
        self.event_loop.advance_clock_to(deadline);
    }

    pub fn now(&self) -> Duration {
        self.event_loop.now()
    }

    /// Click `target`: run its handlers to completion, then the default action.
    ///
    /// A node that does not belong to this page is ignored.
    pub fn click(&mut self, target: NodeId) -> ClickOutcome {
        if !self.dom.contains(target) {
            warn!(node = target.index(), "click on a node from another page");
            return ClickOutcome::default();
        }
        let plan = self.listeners.plan(&self.dom, target, EventType::Click);
        let mut outcome = ClickOutcome { handlers_run: plan.len(), ..ClickOutcome::default() };

        for invocation in plan {
            if self.invoke(invocation) {
                outcome.default_prevented = true;
            }
        }

        if !outcome.default_prevented {
            outcome.navigation = self.default_navigation(target);
        }
        if let Some(href) = &outcome.navigation {
            debug!(%href, "navigation");
            self.navigations.push(href.clone());
        }
        outcome
    }

    /// Run one handler; returns whether it prevented the default action.
    fn invoke(&mut self, Invocation { handler, this, target }: Invocation) -> bool {
        trace!(?handler, this = this.index(), "handler");
        match handler {
            Handler::ClearTrailer => {
                modal::clear_trailer(&mut self.dom, self.container);
                false
            }
            Handler::PlayTrailer => {
                modal::play_trailer(&mut self.dom, self.container, this);
                false
            }
            Handler::ShowModal => {
                let prevent = self.dom.tag_name(this) == Some("a");
                let Some(target_selector) = self.dom.attr(this, modal::MODAL_TARGET_ATTR) else {
                    return prevent;
                };
                let opens_ours = match target_selector.parse::<Selector>() {
                    Ok(sel) => self.dom.query(&sel) == Some(self.overlay.modal()),
                    Err(err) => {
                        warn!(%err, "ignoring invalid modal target");
                        false
                    }
                };
                if opens_ours {
                    self.overlay.show(&mut self.dom);
                }
                prevent
            }
            Handler::DismissModal => {
                self.overlay.hide(&mut self.dom);
                true
            }
            Handler::DismissOnSelf => {
                if target == this {
                    self.overlay.hide(&mut self.dom);
                }
                false
            }
        }
    }

    fn default_navigation(&self, target: NodeId) -> Option<String> {
        self.dom
            .ancestors_inclusive(target)
            .find(|n| self.dom.tag_name(*n) == Some("a"))
            .and_then(|a| self.dom.attr(a, "href"))
            .map(str::to_string)
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector: Selector = selector.parse()?;
        Ok(self.dom.query_all(&selector))
    }

    pub fn tiles(&self) -> Vec<NodeId> {
        self.dom.query_all(&modal::tile_selector())
    }

    /// The first link inside `tile`, if it still exists.
    pub fn tile_link(&self, tile: NodeId) -> Option<NodeId> {
        self.dom.query_all_within(tile, &Selector::tag("a")).into_iter().next()
    }

    pub fn close_control(&self) -> Option<NodeId> {
        self.dom
            .query_all_within(self.overlay.modal(), &Selector::class("hanging-close"))
            .into_iter()
            .next()
    }

    pub fn trailer_container(&self) -> NodeId {
        self.container
    }

    /// Players currently mounted in the trailer container.
    pub fn players(&self) -> Vec<NodeId> {
        self.dom.element_children(self.container).collect()
    }

    pub fn player_src(&self) -> Option<&str> {
        let player = self.players().into_iter().next()?;
        self.dom.attr(player, "src")
    }

    pub fn modal(&self) -> NodeId {
        self.overlay.modal()
    }

    pub fn backdrop(&self) -> Option<NodeId> {
        self.overlay.backdrop()
    }

    pub fn modal_open(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub fn reveal_complete(&self) -> bool {
        self.revealer.as_ref().is_some_and(TileRevealer::is_complete)
    }

    /// Tiles in the order their reveal finished.
    pub fn reveal_order(&self) -> &[NodeId] {
        &self.reveal_order
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::VideoId;

    fn movies(ids: &[&str]) -> Vec<Movie> {
        ids.iter()
            .map(|id| Movie::new(format!("Movie {id}"), "s", "https://x.test/p.jpg", VideoId::new(id).unwrap()))
            .collect()
    }

    fn loaded(ids: &[&str], caps: Capabilities) -> Page {
        let mut page = Page::new(&movies(ids));
        page.load(caps);
        page.run_until_idle();
        page
    }

    #[test]
    fn skeleton_mirrors_the_template() {
        let page = Page::new(&movies(&["a1", "b2"]));
        let tiles = page.tiles();
        assert_eq!(tiles.len(), 2);
        assert_eq!(page.dom().attr(tiles[0], "data-trailer-youtube-id"), Some("a1"));
        assert_eq!(page.dom().attr(tiles[1], "data-target"), Some("#trailer"));
        assert_eq!(page.dom().by_id(TRAILER_CONTAINER_ID), Some(page.trailer_container()));
        assert_eq!(
            page.dom().attr(page.tile_link(tiles[0]).unwrap(), "href"),
            Some("https://www.youtube.com/watch?v=a1")
        );
        assert!(page.close_control().is_some());
        assert!(!page.dom().is_visible(page.modal()));
        assert_eq!(page.strategy(), None);
    }

    #[test]
    fn reveal_advances_with_the_clock() {
        let mut page = Page::new(&movies(&["a", "b", "c"]));
        page.load(Capabilities::modern());
        let tiles = page.tiles();

        page.advance(Duration::from_millis(199));
        assert!(page.reveal_order().is_empty());
        page.advance(Duration::from_millis(1));
        assert_eq!(page.reveal_order(), &tiles[..1]);
        assert_eq!(page.dom().visibility(tiles[1]), Some(Visibility::Showing));
        assert_eq!(page.dom().visibility(tiles[2]), Some(Visibility::Hidden));

        page.run_until_idle();
        assert_eq!(page.reveal_order(), tiles.as_slice());
        assert!(page.reveal_complete());
        assert_eq!(page.now(), Duration::from_millis(600));
    }

    #[test]
    fn capable_path_opens_and_closes_the_trailer() {
        let mut page = loaded(&["abc123", "def456"], Capabilities::modern());
        let tiles = page.tiles();
        assert_eq!(page.strategy(), Some(Strategy::TrailerModal));

        let link = page.tile_link(tiles[0]).unwrap();
        assert!(!page.dom().has_attr(link, "href"));

        let outcome = page.click(link);
        assert_eq!(outcome.navigation, None);
        assert!(page.modal_open());
        assert_eq!(page.players().len(), 1);
        assert_eq!(page.player_src(), Some("https://www.youtube.com/embed/abc123?autoplay=1&html5=1"));

        let close = page.close_control().unwrap();
        let outcome = page.click(close);
        assert!(outcome.default_prevented);
        assert_eq!(outcome.navigation, None);
        assert!(page.players().is_empty());
        assert!(!page.modal_open());
        assert!(page.navigations().is_empty());
    }

    #[test]
    fn clicking_the_backdrop_closes() {
        let mut page = loaded(&["abc123"], Capabilities::modern());
        let tile = page.tiles()[0];
        page.click(tile);
        let backdrop = page.backdrop().unwrap();
        page.click(backdrop);
        assert!(page.players().is_empty());
        assert!(!page.modal_open());
    }

    #[test]
    fn clicking_the_modal_surface_closes() {
        let mut page = loaded(&["abc123"], Capabilities::modern());
        let tile = page.tiles()[0];
        page.click(tile);
        let modal = page.modal();
        page.click(modal);
        assert!(page.players().is_empty());
        assert!(!page.modal_open());
    }

    #[test]
    fn disabler_path_keeps_links() {
        let mut page = loaded(&["abc123"], Capabilities::legacy());
        let tile = page.tiles()[0];
        assert_eq!(page.strategy(), Some(Strategy::Disabled));
        assert!(!page.dom().has_attr(tile, "data-target"));

        let heading = page.select(".movie-tile h2").unwrap()[0];
        let outcome = page.click(heading);
        assert!(page.players().is_empty());
        assert!(!page.modal_open());
        assert_eq!(outcome.navigation.as_deref(), Some("https://www.youtube.com/watch?v=abc123"));
    }

    #[test]
    fn load_probes_only_once() {
        let mut page = Page::new(&movies(&["abc123"]));
        assert_eq!(page.load(Capabilities::legacy()), Strategy::Disabled);
        assert_eq!(page.load(Capabilities::modern()), Strategy::Disabled);
        page.run_until_idle();
        let tile = page.tiles()[0];
        page.click(tile);
        assert!(page.players().is_empty());
    }

    #[test]
    fn clicks_before_load_do_nothing_to_the_container() {
        let mut page = Page::new(&movies(&["abc123"]));
        let tile = page.tiles()[0];
        page.click(tile);
        assert!(page.players().is_empty());
    }

    #[test]
    fn foreign_nodes_are_ignored() {
        let mut small = Page::new(&[]);
        small.load(Capabilities::modern());
        let big = Page::new(&movies(&["a", "b", "c"]));
        let foreign = *big.tiles().last().unwrap();
        assert!(!small.dom().contains(foreign));

        assert_eq!(small.click(foreign), ClickOutcome::default());
        assert!(small.navigations().is_empty());
    }

    #[test]
    fn select_reports_bad_selectors() {
        let page = Page::new(&[]);
        assert!(page.select("a > b").is_err());
        assert!(page.select(".movie-tile").unwrap().is_empty());
    }
}
