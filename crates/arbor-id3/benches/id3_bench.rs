//! Criterion benchmarks for arbor-id3: tree induction and batch classification.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arbor_id3::{Attribute, Catalog, Dataset, ValueIndex, train};

fn make_dataset(
    n_instances: usize,
    n_attributes: usize,
    n_values: usize,
    n_classes: usize,
    seed: u64,
) -> (Catalog, Dataset) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let attributes = (0..n_attributes)
        .map(|a| {
            let values = (0..n_values).map(|v| format!("v{v}")).collect();
            Attribute::new(format!("a{a}"), values).unwrap()
        })
        .collect();
    let classes = (0..n_classes).map(|c| format!("c{c}")).collect();
    let catalog = Catalog::new(attributes, classes).unwrap();

    let rows = (0..n_instances)
        .map(|_| {
            let mut row: Vec<ValueIndex> = (0..n_attributes)
                .map(|_| ValueIndex::new(rng.gen_range(0..n_values)).unwrap())
                .collect();
            let class = (row[0].index() + row[1].index()) % n_classes;
            row.push(ValueIndex::new(class).unwrap());
            row
        })
        .collect();
    let dataset = Dataset::new(&catalog, rows).unwrap();
    (catalog, dataset)
}

fn bench_train(c: &mut Criterion) {
    let (catalog, dataset) = make_dataset(1728, 6, 4, 4, 42);

    c.bench_function("id3_train_1728x6_4values_4class", |b| {
        b.iter(|| train(&catalog, &dataset).unwrap());
    });
}

fn bench_classify_batch(c: &mut Criterion) {
    let (catalog, dataset) = make_dataset(1728, 6, 4, 4, 42);
    let tree = train(&catalog, &dataset).unwrap();

    c.bench_function("id3_classify_batch_1728x6", |b| {
        b.iter(|| tree.classify_batch(&dataset).unwrap());
    });
}

criterion_group!(benches, bench_train, bench_classify_batch);
criterion_main!(benches);
