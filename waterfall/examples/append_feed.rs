// Example: infinite-scroll pages appended to an existing layout.
use waterfall::{Masonry, MasonryOptions, Tile};

fn page(n: u64) -> impl Iterator<Item = Tile> {
    (n * 20..(n + 1) * 20).map(|i| Tile::new(i, 300.0, 240.0 + (i * 37 % 300) as f64))
}

fn main() {
    let mut m = Masonry::new(MasonryOptions::default().with_initial_viewport_height(900.0));
    for n in 0..5 {
        m.append_items(page(n));
        println!(
            "page {n}: items={} total_height={} columns={}",
            m.len(),
            m.total_height(),
            m.column_count()
        );
    }

    m.set_scroll_offset(m.total_height() / 2.0);
    println!("mid-feed visible={}", m.visible_count());
}
