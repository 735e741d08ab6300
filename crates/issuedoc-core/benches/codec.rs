use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use issuedoc_core::codec::{decode, encode, validate};
use issuedoc_core::flow::{SAMPLE_DOCUMENTS, collect_bugs, seed_raw};
use issuedoc_core::store::MemoryStore;

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(SAMPLE_DOCUMENTS.len() as u64));

    group.bench_function("decode", |b| {
        b.iter(|| {
            for raw in SAMPLE_DOCUMENTS {
                let _ = black_box(decode(raw.as_bytes()));
            }
        });
    });

    let docs: Vec<_> = SAMPLE_DOCUMENTS
        .iter()
        .filter_map(|raw| decode(raw.as_bytes()).ok())
        .collect();
    group.bench_function("validate", |b| {
        b.iter(|| {
            for doc in &docs {
                let _ = black_box(validate(doc));
            }
        });
    });

    let issues: Vec<_> = docs.iter().filter_map(|doc| validate(doc).ok()).collect();
    group.bench_function("encode", |b| {
        b.iter(|| {
            for issue in &issues {
                let _ = black_box(encode(issue));
            }
        });
    });
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut store = MemoryStore::new();
    for _ in 0..1_000 {
        let _ = seed_raw(&mut store, SAMPLE_DOCUMENTS);
    }

    let mut group = c.benchmark_group("batch");
    group.throughput(Throughput::Elements(store.len() as u64));
    group.bench_function("collect_bugs", |b| {
        b.iter(|| black_box(collect_bugs(&store)));
    });
    group.finish();
}

criterion_group!(benches, bench_codec, bench_batch);
criterion_main!(benches);
