use std::cell::RefCell;
use std::rc::Rc;

use waterfall::{MasonryOptions, Tile};
use waterfall_adapter::{Controller, ControllerOptions, HostGeometry, MemoryScrollStore, restore_key};

fn main() {
    // Example: a feed page driven by a simulated host event loop.
    //
    // An adapter would:
    // - forward scroll/resize events and rendered card heights to the controller
    // - request an animation frame whenever one of those calls returns true
    // - call on_frame() in that frame, then render the visible cards
    // - jump to take_scroll_request() after mount or after a filter change
    let session = Rc::new(RefCell::new(MemoryScrollStore::new()));
    let items: Vec<Tile> = (0..2_000u64)
        .map(|i| Tile::new(i, 400.0, 300.0 + (i * 53 % 500) as f64))
        .collect();

    let mut c = Controller::new(
        ControllerOptions::new(MasonryOptions::default()),
        Rc::clone(&session),
        restore_key("scroll", &["", "all"]),
    );
    c.set_items(items.clone());
    c.on_resize(HostGeometry::new(900.0, 64.0, 1280.0));
    c.on_frame();

    let mut frames = 0;
    for step in 1..=40u64 {
        // Several scroll events land between two frames.
        let mut wants_frame = false;
        for sub in 0..4u64 {
            wants_frame |= c.on_scroll((step * 4 + sub) as f64 * 90.0);
        }
        // Freshly rendered cards turn out a bit taller than estimated.
        let mut visible = Vec::new();
        c.for_each_visible(|p, _| visible.push((p.key, p.height)));
        visible.retain(|(key, _)| c.masonry().cached_height(key).is_none());
        for (key, height) in visible {
            wants_frame |= c.measure(key, height + 12.0);
        }
        if wants_frame && c.on_frame() {
            frames += 1;
        }
        if step % 10 == 0 {
            println!("frame {frames}: {}", c.stats());
        }
    }

    // Switch to another category, then come back.
    let away = c.set_restore_key(restore_key("scroll", &["", "travel"]));
    println!("travel restore={away:?}");
    c.set_items(items);
    let back = c.set_restore_key(restore_key("scroll", &["", "all"]));
    println!(
        "all restore={back:?} total_height={} relayouts={}",
        c.total_height(),
        c.masonry().relayout_count()
    );
}
