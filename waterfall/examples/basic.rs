use waterfall::{HeightCache, Tile, layout, visible};

fn main() {
    let items: Vec<Tile> = (0..40)
        .map(|i| Tile::new(i, 300.0, 200.0 + (i % 7) as f64 * 60.0))
        .collect();

    let l = layout(&items, 1000.0, 12.0, 240.0, &HeightCache::new());
    println!(
        "columns={} column_width={} total_height={}",
        l.column_count, l.column_width, l.total_height
    );

    for p in visible(&l.positions, 0.0, 600.0, 200.0) {
        println!("#{} at ({}, {}) {}x{}", p.key, p.x, p.y, p.width, p.height);
    }
}
