use criterion::{Criterion, criterion_group, criterion_main};
use geocoin_core::*;
use std::hint::black_box;

fn bench_cells_within(c: &mut Criterion) {
    let config = GameConfig::default();
    let mut index = CellIndex::new(config.tile_width);

    c.bench_function("cells_within/radius_8", |b| {
        b.iter(|| {
            let cells = index.cells_within(black_box(config.origin), black_box(8));
            black_box(cells.len());
        });
    });
}

fn bench_spawn_scan(c: &mut Criterion) {
    let config = GameConfig::default();

    c.bench_function("oracle/spawn_scan_17x17", |b| {
        b.iter(|| {
            let mut spawned = 0;
            for row in 369886..=369902 {
                for col in -1220636..=-1220620 {
                    if config.has_cache(black_box(Cell::new(row, col))) {
                        spawned += 1;
                    }
                }
            }
            black_box(spawned);
        });
    });
}

fn bench_walk(c: &mut Criterion) {
    c.bench_function("engine/walk_and_collect", |b| {
        b.iter(|| {
            let mut engine = Engine::new(GameConfig::default(), MemoryStorage::new()).unwrap();
            for _ in 0..20 {
                engine.apply(Command::Move(Direction::North));
                let here = engine.player_cell();
                black_box(engine.apply(Command::Collect(here)));
            }
        });
    });
}

criterion_group!(benches, bench_cells_within, bench_spawn_scan, bench_walk);
criterion_main!(benches);
