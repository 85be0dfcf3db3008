// Example: feeding rendered heights back into the layout.
use waterfall::{Masonry, MasonryOptions, Tile};

fn main() {
    let items: Vec<Tile> = (0..200).map(|i| Tile::new(i, 400.0, 600.0)).collect();
    let mut m = Masonry::with_items(
        MasonryOptions::new(14.0, 250.0)
            .with_overscan(300.0)
            .with_initial_container_width(1100.0)
            .with_initial_viewport_height(800.0),
        items,
    );
    println!(
        "estimated: total={} visible={} relayouts={}",
        m.total_height(),
        m.visible_count(),
        m.relayout_count()
    );

    // The renderer reports heights once the images decode. One batch, one relayout.
    let mut reports = Vec::new();
    m.for_each_visible(|p, _| reports.push((p.key, p.height - 40.0)));
    m.measure_many(reports);
    println!(
        "measured: total={} cached={} relayouts={}",
        m.total_height(),
        m.cache_len(),
        m.relayout_count()
    );

    // Sub-threshold jitter is ignored.
    let outcome = m.measure(0, m.cached_height(&0).unwrap_or_default() + 0.5);
    println!("jitter: {outcome:?} relayouts={}", m.relayout_count());
}
