use criterion::{black_box, criterion_group, criterion_main, Criterion};

use konj_core::cache::ScoreCache;
use konj_core::model::Item;
use konj_core::parser::parse_table_str;
use konj_core::score::CounterScore;
use konj_core::statistics::{compute_buckets, score_histogram, Histogram};
use std::path::Path;

fn make_items(groups: usize) -> Vec<Item> {
    let prompts = ["1sg", "2sg", "3sg", "1pl", "2pl", "3pl"];
    (0..groups)
        .flat_map(|g| {
            prompts
                .iter()
                .map(move |p| Item::new(*p, format!("verb{g}"), format!("form{g}{p}")))
        })
        .collect()
}

fn make_cache(items: &[Item]) -> ScoreCache<CounterScore> {
    let mut cache = ScoreCache::new();
    for (i, item) in items.iter().enumerate() {
        for _ in 0..(i % 7) {
            cache.record(&item.group, &item.prompt, true, 3);
        }
    }
    cache
}

fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_histogram");

    for groups in [50, 500] {
        let items = make_items(groups);
        let cache = make_cache(&items);
        group.bench_function(format!("items={}", items.len()), |b| {
            b.iter(|| score_histogram(black_box(&items), black_box(&cache)))
        });
    }

    group.finish();
}

fn bench_buckets(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_buckets");

    let narrow: Histogram = (0..7).map(|s| (s * 3, 40)).collect();
    let wide: Histogram = (0..1000).map(|s| (s, (s as usize % 5) + 1)).collect();

    group.bench_function("narrow", |b| b.iter(|| compute_buckets(black_box(&narrow))));
    group.bench_function("wide", |b| b.iter(|| compute_buckets(black_box(&wide))));

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut table = String::from("group,1sg,2sg,on/ona,1pl,2pl,3pl\n");
    for g in 0..300 {
        table.push_str(&format!("verb{g},a{g},b{g},c{g}/d{g},e{g},,f{g}\n"));
    }
    let path = Path::new("bench.csv");

    c.bench_function("parse_table/300_rows", |b| {
        b.iter(|| parse_table_str(black_box(&table), path))
    });
}

criterion_group!(benches, bench_histogram, bench_buckets, bench_parse);
criterion_main!(benches);
