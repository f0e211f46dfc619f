use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use shotmap_terminal::demo_data::generate_raw_shots;
use shotmap_terminal::engine::{self, FilterSelector};
use shotmap_terminal::loader::{self, NormalizeOptions};
use shotmap_terminal::render::{MapVariant, RenderConfig};

fn bench_normalize(c: &mut Criterion) {
    let raw = generate_raw_shots(2024, 500);
    c.bench_function("normalize_3000_rows", |b| {
        b.iter(|| {
            let report = loader::normalize(black_box(raw.clone()), NormalizeOptions::default())
                .expect("demo rows are valid");
            black_box(report.table.len());
        })
    });
}

fn bench_apply(c: &mut Criterion) {
    let raw = generate_raw_shots(2024, 500);
    let table = loader::normalize(raw, NormalizeOptions::default())
        .expect("demo rows are valid")
        .table;
    let render = RenderConfig::for_variant(MapVariant::Annotated);
    let all = FilterSelector::all();
    let team = FilterSelector::team("Spain");
    let player = FilterSelector::team_player("Spain", "Lamine Yamal");

    c.bench_function("apply_all", |b| {
        b.iter(|| black_box(engine::apply(&table, black_box(&all), &render).stats))
    });
    c.bench_function("apply_team", |b| {
        b.iter(|| black_box(engine::apply(&table, black_box(&team), &render).stats))
    });
    c.bench_function("apply_team_player", |b| {
        b.iter(|| black_box(engine::apply(&table, black_box(&player), &render).stats))
    });
}

criterion_group!(benches, bench_normalize, bench_apply);
criterion_main!(benches);
