use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use folio_core::Money;
use folio_invoicing::{DocumentKind, LineItem, aggregate};
use folio_layout::{DocumentLayoutOrchestrator, PageGeometryPolicy, paginate};
use rust_decimal::Decimal;

const RATES: [i64; 4] = [0, 55, 100, 200];

fn items(count: usize) -> Vec<LineItem> {
    (0..count)
        .map(|i| {
            LineItem::new(
                i as i64,
                format!("Poste {i}"),
                Decimal::new(i as i64 % 7 + 1, 0),
                Money::from_minor_units(1_999 + i as i64),
            )
            .with_discount(Decimal::new(i as i64 % 3 * 5, 0))
            .with_tax_rate(Decimal::new(RATES[i % RATES.len()], 1))
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let orchestrator = DocumentLayoutOrchestrator::new(PageGeometryPolicy::a4());

    for count in [10usize, 100, 1_000] {
        let list = items(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("quote", count), &list, |b, list| {
            b.iter(|| {
                orchestrator
                    .build(black_box(list), DocumentKind::Quote)
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_paginate_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate");
    let policy = PageGeometryPolicy::a4();

    for count in [10usize, 100, 1_000] {
        let list = items(count);
        let totals = aggregate(&list).unwrap();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("invoice", count), &list, |b, list| {
            b.iter(|| paginate(black_box(list), &policy, &totals, DocumentKind::Invoice).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_paginate_only);
criterion_main!(benches);
