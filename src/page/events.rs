//! Delegated event listeners.
//!
//! A listener is registered on a stable ancestor with an optional selector.
//! With a selector it fires once for every node between the event target and
//! the ancestor (exclusive) that matches, with that node as `this`. Without a
//! selector it fires for the ancestor itself.

use std::collections::HashMap;

use super::dom::{Dom, NodeId};
use super::selector::Selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
}

/// Everything a listener can do on the page. A closed set, dispatched by
/// [`super::Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Empty the trailer container.
    ClearTrailer,
    /// Mount a player for the clicked tile.
    PlayTrailer,
    /// Modal data-api: show the modal named by `data-target`.
    ShowModal,
    /// Modal data-api: hide the open modal.
    DismissModal,
    /// Hide the modal when the click landed on the modal element itself.
    DismissOnSelf,
}

#[derive(Debug, Clone)]
struct Listener {
    event: EventType,
    selector: Option<Selector>,
    handler: Handler,
}

/// One handler call produced by a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub handler: Handler,
    pub this: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Default, Clone)]
pub struct ListenerStore {
    map: HashMap<NodeId, Vec<Listener>>,
}

impl ListenerStore {
    /// Delegate `handler` from `ancestor` to descendants matching `selector`.
    pub fn on(&mut self, ancestor: NodeId, event: EventType, selector: Selector, handler: Handler) {
        self.map.entry(ancestor).or_default().push(Listener {
            event,
            selector: Some(selector),
            handler,
        });
    }

    /// Listen on `node` itself.
    pub fn on_self(&mut self, node: NodeId, event: EventType, handler: Handler) {
        self.map.entry(node).or_default().push(Listener {
            event,
            selector: None,
            handler,
        });
    }

    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Work out, up front, which handlers an event at `target` will run.
    ///
    /// The event bubbles from `target` to the document. At each node that has
    /// listeners, delegated matches run deepest first, then the node's own
    /// listeners, each group in registration order.
    pub fn plan(&self, dom: &Dom, target: NodeId, event: EventType) -> Vec<Invocation> {
        let path: Vec<NodeId> = dom.ancestors_inclusive(target).collect();
        let mut out = Vec::new();

        for (depth, current) in path.iter().enumerate() {
            let Some(listeners) = self.map.get(current) else { continue };
            let below = &path[..depth];

            for node in below {
                for l in listeners.iter().filter(|l| l.event == event) {
                    if l.selector.as_ref().is_some_and(|s| s.matches(dom, *node)) {
                        out.push(Invocation { handler: l.handler, this: *node, target });
                    }
                }
            }
            for l in listeners.iter().filter(|l| l.event == event && l.selector.is_none()) {
                out.push(Invocation { handler: l.handler, this: *current, target });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delegated_listener_fires_for_each_matching_ancestor() {
        let mut dom = Dom::new();
        let root = dom.root();
        let modal = dom.append_element(root, "div", &[("class", "modal")]);
        let close = dom.append_element(modal, "a", &[("class", "hanging-close")]);
        let img = dom.append_element(close, "img", &[]);

        let mut store = ListenerStore::default();
        store.on(
            root,
            EventType::Click,
            Selector::any([Selector::class("hanging-close"), Selector::class("modal")]),
            Handler::ClearTrailer,
        );

        let plan = store.plan(&dom, img, EventType::Click);
        let this: Vec<_> = plan.iter().map(|i| i.this).collect();
        assert_eq!(this, [close, modal]);
        assert!(plan.iter().all(|i| i.target == img && i.handler == Handler::ClearTrailer));
    }

    #[test]
    fn delegate_root_itself_is_not_matched() {
        let mut dom = Dom::new();
        let root = dom.root();
        let tile = dom.append_element(root, "article", &[("class", "movie-tile")]);

        let mut store = ListenerStore::default();
        store.on(tile, EventType::Click, Selector::class("movie-tile"), Handler::PlayTrailer);
        assert!(store.plan(&dom, tile, EventType::Click).is_empty());
    }

    #[test]
    fn own_listeners_fire_after_delegated_ones() {
        let mut dom = Dom::new();
        let root = dom.root();
        let modal = dom.append_element(root, "div", &[("class", "modal")]);
        let close = dom.append_element(modal, "a", &[("data-dismiss", "modal")]);

        let mut store = ListenerStore::default();
        store.on_self(modal, EventType::Click, Handler::DismissOnSelf);
        store.on(modal, EventType::Click, Selector::attr_eq("data-dismiss", "modal"), Handler::DismissModal);
        assert_eq!(store.len(), 2);

        let plan = store.plan(&dom, close, EventType::Click);
        let handlers: Vec<_> = plan.iter().map(|i| (i.handler, i.this)).collect();
        assert_eq!(handlers, [(Handler::DismissModal, close), (Handler::DismissOnSelf, modal)]);
    }

    #[test]
    fn detached_targets_only_reach_their_own_ancestors() {
        let mut dom = Dom::new();
        let root = dom.root();
        let orphan = dom.create_element("div");

        let mut store = ListenerStore::default();
        store.on(root, EventType::Click, Selector::tag("div"), Handler::ClearTrailer);
        assert!(store.plan(&dom, orphan, EventType::Click).is_empty());
    }
}
