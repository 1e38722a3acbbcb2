use proptest::prelude::*;

use tomatillos::media::Movie;
use tomatillos::page::{Capabilities, Page, Strategy, Visibility};
use tomatillos::youtube::VideoId;

fn movie(id: &str) -> Movie {
    Movie::new(
        format!("Movie {id}"),
        "A summary.",
        "https://img.test/poster.jpg",
        VideoId::new(id).unwrap(),
    )
}

fn loaded(ids: &[&str], caps: Capabilities) -> Page {
    let movies: Vec<_> = ids.iter().map(|id| movie(id)).collect();
    let mut page = Page::new(&movies);
    page.load(caps);
    page.run_until_idle();
    page
}

proptest! {
    #[test]
    fn reveal_shows_every_tile_in_document_order(ids in prop::collection::vec("[A-Za-z0-9_-]{1,11}", 0..16)) {
        let movies: Vec<_> = ids.iter().map(|id| movie(id)).collect();
        let mut page = Page::new(&movies);
        page.load(Capabilities::modern());

        let tiles = page.tiles();
        for tile in tiles.iter().skip(1) {
            prop_assert_eq!(page.dom().visibility(*tile), Some(Visibility::Hidden));
        }

        page.run_until_idle();
        prop_assert_eq!(page.reveal_order(), tiles.as_slice());
        prop_assert!(tiles.iter().all(|t| page.dom().is_visible(*t)));
        prop_assert!(page.reveal_complete());
    }

    #[test]
    fn open_then_close_always_empties_the_container(n in 1usize..6, pick in 0usize..6) {
        let ids: Vec<String> = (0..n).map(|i| format!("vid{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut page = loaded(&refs, Capabilities::modern());

        let tile = page.tiles()[pick % n];
        page.click(tile);
        prop_assert_eq!(page.players().len(), 1);

        let close = page.close_control().unwrap();
        page.click(close);
        prop_assert!(page.players().is_empty());
    }
}

#[test]
fn second_tile_replaces_the_first_player() {
    let mut page = loaded(&["aaa", "bbb"], Capabilities::modern());
    let tiles = page.tiles();

    page.click(tiles[0]);
    assert!(page.modal_open());
    page.click(tiles[1]);

    assert!(page.modal_open());
    assert!(page.dom().is_visible(page.modal()));
    assert_eq!(page.players().len(), 1);
    assert_eq!(page.player_src(), Some("https://www.youtube.com/embed/bbb?autoplay=1&html5=1"));
}

#[test]
fn embed_url_is_exact() {
    let mut page = loaded(&["abc123"], Capabilities::modern());
    let tile = page.tiles()[0];
    page.click(tile);
    assert_eq!(page.player_src(), Some("https://www.youtube.com/embed/abc123?autoplay=1&html5=1"));
    let player = page.players()[0];
    assert_eq!(page.dom().attr(player, "id"), Some("trailer-video"));
}

#[test]
fn clicking_inside_a_tile_plays_its_trailer() {
    let mut page = loaded(&["abc123"], Capabilities::modern());
    let poster = page.select(".movie-tile img").unwrap()[0];
    let outcome = page.click(poster);
    assert_eq!(outcome.navigation, None);
    assert_eq!(page.players().len(), 1);
    assert!(page.modal_open());
}

#[test]
fn disabler_never_mounts_a_player() {
    let mut page = loaded(&["abc123", "def456"], Capabilities::legacy());
    assert_eq!(page.strategy(), Some(Strategy::Disabled));
    let container = page.trailer_container();

    for tile in page.tiles() {
        let before = page.dom().children(container).len();
        page.click(tile);
        assert_eq!(page.dom().children(container).len(), before);
        assert!(!page.modal_open());
    }

    let link = page.tile_link(page.tiles()[1]).unwrap();
    let outcome = page.click(link);
    assert_eq!(outcome.navigation.as_deref(), Some("https://www.youtube.com/watch?v=def456"));
    assert!(page.players().is_empty());
}

#[test]
fn capable_path_never_navigates() {
    let mut page = loaded(&["abc123", "def456"], Capabilities::modern());
    for tile in page.tiles() {
        let link = page.tile_link(tile).unwrap();
        assert_eq!(page.click(link).navigation, None);
        let close = page.close_control().unwrap();
        assert_eq!(page.click(close).navigation, None);
    }
    assert!(page.navigations().is_empty());
}

#[test]
fn clicks_during_the_reveal_still_work() {
    let movies = [movie("abc123"), movie("def456")];
    let mut page = Page::new(&movies);
    page.load(Capabilities::modern());
    let tile = page.tiles()[1];
    assert_eq!(page.dom().visibility(tile), Some(Visibility::Hidden));

    page.click(tile);
    assert_eq!(page.player_src(), Some("https://www.youtube.com/embed/def456?autoplay=1&html5=1"));

    page.run_until_idle();
    assert!(page.reveal_complete());
}
