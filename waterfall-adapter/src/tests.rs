use crate::*;

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use waterfall::{MasonryOptions, Tile};

fn tiles(n: u64) -> Vec<Tile> {
    (0..n).map(|i| Tile::new(i, 300.0, 200.0 + (i % 5) as f64 * 80.0)).collect()
}

fn options() -> ControllerOptions<Tile> {
    ControllerOptions::new(
        MasonryOptions::default()
            .with_initial_viewport_height(800.0)
            .with_initial_container_width(1000.0),
    )
}

fn store_with(key: &str, raw: &str) -> MemoryScrollStore {
    let mut s = MemoryScrollStore::new();
    s.set(key, raw.to_string()).unwrap();
    s
}

/// Reads fine, refuses every write.
struct ReadOnlyStore(MemoryScrollStore);

impl ScrollStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key)
    }

    fn set(&mut self, key: &str, _value: String) -> Result<()> {
        Err(Error::Store {
            key: key.to_string(),
            reason: "quota exceeded".to_string(),
        })
    }
}

#[test]
fn restores_recorded_offset_on_mount() {
    let mut c = Controller::new(options(), store_with("scroll::all", "1500"), "scroll::all");
    assert_eq!(c.masonry().scroll_offset(), 1500.0);
    assert_eq!(c.take_scroll_request(), Some(1500.0));
    // Consumed once.
    assert_eq!(c.take_scroll_request(), None);
}

#[test]
fn missing_or_unusable_records_do_not_jump() {
    for raw in ["", "   ", "abc", "NaN", "inf", "-40", "0"] {
        let mut c = Controller::new(options(), store_with("k", raw), "k");
        assert_eq!(c.take_scroll_request(), None, "record {raw:?}");
        assert_eq!(c.masonry().scroll_offset(), 0.0, "record {raw:?}");
    }

    let mut c = Controller::new(options(), MemoryScrollStore::new(), "nothing-here");
    assert_eq!(c.take_scroll_request(), None);
}

#[test]
fn switching_restore_key_restores_once_per_transition() {
    let mut store = MemoryScrollStore::new();
    store.set("scroll:cats:", "2400".to_string()).unwrap();
    store.set("scroll:dogs:", "600".to_string()).unwrap();

    let mut c = Controller::new(options(), store, "scroll:cats:");
    assert_eq!(c.take_scroll_request(), Some(2400.0));

    assert_eq!(c.set_restore_key("scroll:dogs:"), Some(600.0));
    assert_eq!(c.take_scroll_request(), Some(600.0));
    assert_eq!(c.masonry().scroll_offset(), 600.0);

    // Same key again: nothing happens.
    assert_eq!(c.set_restore_key("scroll:dogs:"), None);
    assert_eq!(c.take_scroll_request(), None);

    // A key without a record keeps the current offset and does not request a jump.
    assert_eq!(c.set_restore_key("scroll:birds:"), None);
    assert_eq!(c.take_scroll_request(), None);
    assert_eq!(c.restore_key(), "scroll:birds:");
}

#[test]
fn pending_scroll_is_saved_under_the_old_key() {
    let mut c = Controller::new(options(), MemoryScrollStore::new(), "a");
    c.on_scroll(750.0);
    // Key changes before the frame runs.
    c.set_restore_key("b");
    assert_eq!(c.store().get("a").as_deref(), Some("750"));
    assert_eq!(c.store().get("b"), None);
    assert!(!c.on_frame());
}

#[test]
fn scroll_events_request_one_frame_and_keep_the_latest_value() {
    let mut c = Controller::new(options(), MemoryScrollStore::new(), "feed");
    c.set_items(tiles(200));

    assert!(c.on_scroll(10.0));
    assert!(!c.on_scroll(20.0));
    assert!(!c.on_scroll(1234.0));
    assert!(c.is_frame_requested());

    // Nothing is applied before the frame.
    assert_eq!(c.masonry().scroll_offset(), 0.0);

    let relayouts = c.masonry().relayout_count();
    assert!(c.on_frame());
    assert!(!c.is_frame_requested());
    assert_eq!(c.masonry().scroll_offset(), 1234.0);
    // Scrolling never relayouts.
    assert_eq!(c.masonry().relayout_count(), relayouts);
    assert_eq!(c.store().get("feed").as_deref(), Some("1234"));

    // An idle frame does nothing.
    assert!(!c.on_frame());

    // The next event starts a new frame.
    assert!(c.on_scroll(1300.0));
}

#[test]
fn resize_measurements_and_scroll_share_one_relayout() {
    let mut c = Controller::new(options(), MemoryScrollStore::new(), "feed");
    c.set_items(tiles(50));
    assert_eq!(c.masonry().column_count(), 3);

    let relayouts = c.masonry().relayout_count();
    let version = c.masonry().layout_version();

    assert!(c.on_resize(HostGeometry::new(900.0, 100.0, 1600.0)));
    assert!(!c.measure(1, 412.0));
    assert!(!c.measure(2, 380.0));
    assert!(!c.measure(3, 290.5));
    assert!(!c.on_scroll(300.0));

    assert!(c.on_frame());
    assert_eq!(c.masonry().relayout_count(), relayouts + 1);
    assert_eq!(c.masonry().layout_version(), version + 3);
    assert_eq!(c.masonry().viewport_height(), 800.0);
    assert_eq!(c.masonry().container_width(), 1600.0);
    assert_eq!(c.masonry().column_count(), 6);
    assert_eq!(c.masonry().scroll_offset(), 300.0);
    assert_eq!(c.cache_len(), 3);
}

#[test]
fn repeated_reports_keep_the_latest_height_per_key() {
    let mut c = Controller::new(options(), MemoryScrollStore::new(), "feed");
    c.set_items(tiles(10));
    let version = c.masonry().layout_version();

    assert!(c.measure(3, 300.0));
    for i in 0..1000 {
        assert!(!c.measure(3, 300.0 + (i % 7) as f64 * 20.0));
    }
    assert!(!c.measure(3, 410.0));
    assert!(!c.measure(5, 250.0));
    assert_eq!(c.pending_measurements(), 2);

    assert!(c.on_frame());
    assert_eq!(c.pending_measurements(), 0);
    assert_eq!(c.masonry().cached_height(&3), Some(410.0));
    assert_eq!(c.masonry().cached_height(&5), Some(250.0));
    // One insert per key, not one update per report.
    assert_eq!(c.masonry().layout_version(), version + 2);
}

#[test]
fn frame_request_tracks_every_pending_source() {
    let mut c = Controller::new(options(), MemoryScrollStore::new(), "a");
    assert!(!c.is_frame_requested());

    // Whichever event comes first asks for the frame; the rest ride along.
    assert!(c.measure(1, 200.0));
    assert!(!c.on_scroll(40.0));
    assert!(!c.on_resize(HostGeometry::new(800.0, 0.0, 1000.0)));
    assert!(c.on_frame());
    assert!(!c.is_frame_requested());

    assert!(c.on_resize(HostGeometry::new(700.0, 0.0, 1000.0)));
    assert!(!c.measure(2, 200.0));
    assert!(c.on_frame());

    // A key switch flushes the pending tick, so the next event needs a new frame.
    assert!(c.on_scroll(90.0));
    c.set_restore_key("b");
    assert!(!c.is_frame_requested());
    assert!(c.on_scroll(10.0));
}

#[test]
fn sub_threshold_measurements_do_not_relayout() {
    let mut c = Controller::new(options(), MemoryScrollStore::new(), "feed");
    c.set_items(tiles(10));
    c.measure(4, 300.0);
    c.on_frame();

    let relayouts = c.masonry().relayout_count();
    c.measure(4, 301.5);
    c.measure(4, 298.2);
    assert!(c.on_frame());
    assert_eq!(c.masonry().relayout_count(), relayouts);
    assert_eq!(c.masonry().cached_height(&4), Some(300.0));

    assert_eq!(c.measure_now(4, 302.0), waterfall::MeasureOutcome::Updated { previous: 300.0 });
    assert_eq!(c.masonry().relayout_count(), relayouts + 1);
}

#[test]
fn failed_writes_are_swallowed() {
    let mut inner = MemoryScrollStore::new();
    inner.set("feed", "900".to_string()).unwrap();
    let mut c = Controller::new(options(), ReadOnlyStore(inner), "feed");
    assert_eq!(c.take_scroll_request(), Some(900.0));

    c.on_scroll(1000.0);
    assert!(c.on_frame());
    assert_eq!(c.masonry().scroll_offset(), 1000.0);
    assert_eq!(c.store().get("feed").as_deref(), Some("900"));
}

#[test]
fn persistence_can_be_turned_off() {
    let opts = options().with_persist_scroll(false);
    let mut c = Controller::new(opts, MemoryScrollStore::new(), "feed");
    c.on_scroll(640.0);
    c.on_frame();
    assert!(c.store().is_empty());
}

#[test]
fn controllers_can_share_a_store() {
    let shared = Rc::new(RefCell::new(MemoryScrollStore::new()));
    let mut feed = Controller::new(options(), Rc::clone(&shared), restore_key("scroll", &["", ""]));
    let mut search = Controller::new(
        options(),
        Rc::clone(&shared),
        restore_key("search", &["sunset", "travel"]),
    );

    feed.on_scroll(420.0);
    feed.on_frame();
    search.on_scroll(88.5);
    search.on_frame();

    let s = shared.borrow();
    assert_eq!(s.len(), 2);
    assert_eq!(s.get("scroll::").as_deref(), Some("420"));
    assert_eq!(s.get("search:sunset:travel").as_deref(), Some("88.5"));
}

#[test]
fn stats_reflect_the_engine() {
    let mut c = Controller::new(options(), MemoryScrollStore::new(), "feed");
    c.set_items(tiles(500));
    c.measure_now(0, 250.0);

    let s = c.stats();
    assert_eq!(s.total, 500);
    assert_eq!(s.cache_size, 1);
    assert_eq!(s.overscan, waterfall::DEFAULT_OVERSCAN);
    assert!(s.virtualization_enabled);
    assert!(s.rendered > 0 && s.rendered < 500);
    assert_eq!(s.rendered, c.masonry().visible_count());
    assert_eq!(s.layout_version, 1);

    c.set_enabled(false);
    let s = c.stats();
    assert_eq!(s.rendered, 500);
    assert_eq!(
        s.to_string(),
        "Virtualization: OFF | Overscan: 900 | Rendered: 500 | Total: 500 | Height Cache: 1"
    );
}

#[test]
fn visible_cards_follow_applied_scroll() {
    let mut c = Controller::new(options(), MemoryScrollStore::new(), "feed");
    c.set_items(tiles(1000));
    c.set_overscan(0.0);

    let mut top = Vec::new();
    c.collect_visible(&mut top);
    assert!(!top.is_empty());
    assert!(top.iter().all(|p| p.y <= 800.0));

    c.on_scroll(c.total_height() / 2.0);
    c.on_frame();
    let mut middle = Vec::new();
    c.for_each_visible(|p, item| {
        assert_eq!(p.key, item.key);
        middle.push(p.index);
    });
    assert!(!middle.is_empty());
    assert!(middle.iter().all(|&i| i > top.last().map_or(0, |p| p.index)));
}

#[test]
fn host_viewport_excludes_the_header() {
    assert_eq!(HostGeometry::new(900.0, 120.0, 1000.0).viewport_height(), 780.0);
    // Scrolled past the top of the container.
    assert_eq!(HostGeometry::new(900.0, -300.0, 1000.0).viewport_height(), 900.0);
    // Container below the fold falls back to the whole window.
    assert_eq!(HostGeometry::new(900.0, 1200.0, 1000.0).viewport_height(), 900.0);
    assert_eq!(HostGeometry::new(f64::NAN, 0.0, 1000.0).viewport_height(), 0.0);
}

#[test]
fn scroll_records_parse_and_format() {
    assert_eq!(parse_scroll_offset("1234"), Ok(1234.0));
    assert_eq!(parse_scroll_offset(" 12.5\n"), Ok(12.5));
    assert_eq!(parse_scroll_offset(""), Ok(0.0));
    assert_eq!(
        parse_scroll_offset("12px"),
        Err(Error::InvalidScrollRecord {
            raw: "12px".to_string()
        })
    );
    assert!(parse_scroll_offset("inf").is_err());

    assert_eq!(format_scroll_offset(1234.0), "1234");
    assert_eq!(format_scroll_offset(88.5), "88.5");
    assert_eq!(format_scroll_offset(0.0), "0");

    assert_eq!(read_scroll_offset(&store_with("k", "oops"), "k"), 0.0);
    assert_eq!(read_scroll_offset(&store_with("k", "77"), "k"), 77.0);
}

#[test]
fn restore_keys_join_scope_and_parts() {
    assert_eq!(restore_key("scroll", &["cats", "photo"]), "scroll:cats:photo");
    assert_eq!(restore_key("search", &["", ""]), "search::");
    assert_eq!(restore_key("feed", &[]), "feed");
}

#[test]
fn frame_throttle_keeps_latest() {
    let mut t = FrameThrottle::new();
    assert!(t.schedule(1));
    assert!(!t.schedule(2));
    assert_eq!(t.peek(), Some(&2));
    assert_eq!(t.take(), Some(2));
    assert!(!t.is_scheduled());
    assert!(t.schedule(3));
    assert!(t.is_scheduled());
    assert_eq!(t.take(), Some(3));
    assert_eq!(t.take(), None);
}

#[test]
fn error_messages_name_the_record() {
    let e = Error::InvalidScrollRecord {
        raw: "x".to_string(),
    };
    assert_eq!(e.to_string(), "invalid scroll record \"x\"");
    let e = Error::Store {
        key: "feed".to_string(),
        reason: "quota exceeded".to_string(),
    };
    assert_eq!(
        e.to_string(),
        "scroll store write failed for \"feed\": quota exceeded"
    );
}
