//! FILENAME: table-engine/benches/row_model.rs
//! Pipeline throughput: full builds and the narrower re-runs triggered by
//! typical state changes.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use table_engine::{
    AggregationFn, CellValue, ColumnDef, ColumnSort, ExpandedState, FilterValue, PaginationState, Record, Table,
    TableOptions,
};

struct Sale {
    region: &'static str,
    product: String,
    quarter: u32,
    amount: f64,
}

impl Record for Sale {
    fn field(&self, key: &str) -> Option<CellValue> {
        match key {
            "region" => Some(CellValue::text(self.region)),
            "product" => Some(CellValue::text(&self.product)),
            "quarter" => Some(CellValue::from(self.quarter)),
            "amount" => Some(CellValue::Number(self.amount)),
            _ => None,
        }
    }
}

const REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];

fn sales(rows: usize) -> Vec<Sale> {
    (0..rows)
        .map(|i| Sale {
            region: REGIONS[i % REGIONS.len()],
            product: format!("Product {}", i % 97),
            quarter: (i % 4) as u32 + 1,
            amount: ((i * 7919) % 10_000) as f64 / 10.0,
        })
        .collect()
}

fn columns() -> Vec<ColumnDef<Sale>> {
    vec![
        ColumnDef::accessor("region"),
        ColumnDef::accessor("product"),
        ColumnDef::accessor("quarter"),
        ColumnDef::accessor("amount").aggregation(AggregationFn::Sum),
    ]
}

fn bench_full_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_build");
    for rows in [1_000usize, 10_000, 50_000] {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter_batched(
                || TableOptions::new(sales(rows), columns()),
                |options| black_box(Table::new(options)),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_state_changes(c: &mut Criterion) {
    let rows = 10_000;
    let mut table = Table::new(TableOptions::new(sales(rows), columns()));
    table.set_pagination(Some(PaginationState::new(0, 50)));

    c.bench_function("sort_toggle", |b| {
        b.iter(|| {
            table.set_sorting(vec![ColumnSort::desc("amount")]);
            table.set_sorting(Vec::new());
        })
    });

    c.bench_function("global_filter", |b| {
        b.iter(|| {
            table.set_global_filter(Some(FilterValue::text("product 4")));
            table.set_global_filter(None);
        })
    });

    table.set_grouping(vec!["region".to_string(), "quarter".to_string()]);
    c.bench_function("group_and_expand", |b| {
        b.iter(|| {
            table.set_expanded(ExpandedState::All);
            table.set_expanded(ExpandedState::default());
        })
    });

    c.bench_function("page_flip", |b| {
        b.iter(|| {
            table.set_page_index(3);
            table.set_page_index(0);
        })
    });

    black_box(table.row_model().len());
}

criterion_group!(benches, bench_full_build, bench_state_changes);
criterion_main!(benches);
