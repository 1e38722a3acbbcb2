use std::time::Duration;

use tracing::trace;

use super::dom::{Dom, NodeId, Visibility};
use super::event_loop::{EventLoop, Task};

/// jQuery's `'fast'` duration.
pub const FAST: Duration = Duration::from_millis(200);

/// Shows tiles one after another, each after the previous transition ends.
#[derive(Debug, Clone)]
pub struct TileRevealer {
    tiles: Vec<NodeId>,
    next: usize,
    shown: usize,
    duration: Duration,
}

impl TileRevealer {
    pub fn new(tiles: Vec<NodeId>, duration: Duration) -> Self {
        Self { tiles, next: 0, shown: 0, duration }
    }

    /// Hide every tile, then start the first transition.
    pub fn start(&mut self, dom: &mut Dom, event_loop: &mut EventLoop) {
        for tile in &self.tiles {
            dom.set_visibility(*tile, Visibility::Hidden);
        }
        self.next = 0;
        self.shown = 0;
        self.show_next(dom, event_loop);
    }

    fn show_next(&mut self, dom: &mut Dom, event_loop: &mut EventLoop) {
        let Some(&tile) = self.tiles.get(self.next) else {
            trace!(tiles = self.tiles.len(), "reveal complete");
            return;
        };
        self.next += 1;
        dom.set_visibility(tile, Visibility::Showing);
        event_loop.schedule(self.duration, Task::TransitionEnd { node: tile });
    }

    /// Completion callback for a transition; returns whether `node` was ours.
    pub fn on_transition_end(&mut self, dom: &mut Dom, event_loop: &mut EventLoop, node: NodeId) -> bool {
        let current = self.next.checked_sub(1).and_then(|i| self.tiles.get(i));
        if current != Some(&node) {
            return false;
        }
        dom.set_visibility(node, Visibility::Shown);
        self.shown += 1;
        self.show_next(dom, event_loop);
        true
    }

    pub fn is_complete(&self) -> bool {
        self.shown == self.tiles.len()
    }

    pub fn tiles(&self) -> &[NodeId] {
        &self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(n: usize) -> (Dom, Vec<NodeId>) {
        let mut dom = Dom::new();
        let root = dom.root();
        let tiles = (0..n)
            .map(|_| dom.append_element(root, "article", &[("class", "movie-tile")]))
            .collect();
        (dom, tiles)
    }

    #[test]
    fn one_transition_at_a_time() {
        let (mut dom, ids) = tiles(3);
        let mut el = EventLoop::new();
        let mut revealer = TileRevealer::new(ids.clone(), FAST);
        revealer.start(&mut dom, &mut el);

        assert_eq!(dom.visibility(ids[0]), Some(Visibility::Showing));
        assert_eq!(dom.visibility(ids[1]), Some(Visibility::Hidden));
        assert_eq!(dom.visibility(ids[2]), Some(Visibility::Hidden));
        assert_eq!(el.pending(), 1);

        let Some(Task::TransitionEnd { node }) = el.next_due(None) else { panic!("no task") };
        assert!(revealer.on_transition_end(&mut dom, &mut el, node));
        assert!(dom.is_visible(ids[0]));
        assert_eq!(dom.visibility(ids[1]), Some(Visibility::Showing));
        assert_eq!(el.now(), FAST);
    }

    #[test]
    fn empty_sequence_is_a_no_op() {
        let (mut dom, _) = tiles(0);
        let mut el = EventLoop::new();
        let mut revealer = TileRevealer::new(Vec::new(), FAST);
        revealer.start(&mut dom, &mut el);
        assert!(el.is_idle());
        assert!(revealer.is_complete());
    }

    #[test]
    fn stray_completion_is_ignored() {
        let (mut dom, ids) = tiles(2);
        let mut el = EventLoop::new();
        let mut revealer = TileRevealer::new(ids.clone(), FAST);
        revealer.start(&mut dom, &mut el);
        assert!(!revealer.on_transition_end(&mut dom, &mut el, ids[1]));
        assert_eq!(dom.visibility(ids[1]), Some(Visibility::Hidden));
    }
}
