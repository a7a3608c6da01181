use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use flatconv::{parse, stringify, Shape, Value, ValueMap};

fn benchmark_stringify_scalar(c: &mut Criterion) {
    let value = Value::I64(1_234_567);
    c.bench_function("stringify_scalar", |b| b.iter(|| stringify(black_box(&value))));
}

fn benchmark_parse_scalar(c: &mut Criterion) {
    c.bench_function("parse_scalar", |b| {
        b.iter(|| {
            let mut slot = Value::I64(0);
            parse(black_box("1234567"), &mut slot)
        })
    });
}

fn benchmark_stringify_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("stringify_list");
    for size in [10, 100, 1000] {
        let value = Value::list(Shape::I32, (0..size).map(Value::I32).collect());
        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| stringify(black_box(value)))
        });
    }
    group.finish();
}

fn benchmark_parse_map(c: &mut Criterion) {
    let map = Value::Map(ValueMap::from_entries(
        Shape::Str,
        Shape::I32,
        (0..50).map(|i| (Value::from(format!("key{i}")), Value::I32(i))),
    ));
    let input = stringify(&map).unwrap();

    c.bench_function("parse_map_50_entries", |b| {
        b.iter(|| {
            let mut slot = map.shape().default_value();
            parse(black_box(&input), &mut slot)
        })
    });
}

criterion_group!(
    benches,
    benchmark_stringify_scalar,
    benchmark_parse_scalar,
    benchmark_stringify_list,
    benchmark_parse_map,
);
criterion_main!(benches);
