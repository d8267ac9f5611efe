use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use strcache::{LruCache, SharedCache};

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("key:{:08}", i)).collect()
}

fn bench_find_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("find_1k_resident", |b| {
        let keys = keys(1000);
        let mut cache = LruCache::new(1000).unwrap();
        for key in &keys {
            cache.insert(key, vec![b'x'; 64]).unwrap();
        }

        let mut counter = 0;
        b.iter(|| {
            black_box(cache.find(&keys[counter % 1000]));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_insert_evict(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_evict");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("insert_10k_keys_cap_100", |b| {
        let keys = keys(10_000);
        let mut cache = LruCache::new(100).unwrap();

        let mut counter = 0;
        b.iter(|| {
            black_box(cache.insert(&keys[counter % 10_000], counter).unwrap());
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_find_50_insert_shared", |b| {
        let keys = keys(2000);
        let cache = SharedCache::new(1000).unwrap();
        for key in &keys[..1000] {
            cache.insert(key, 0u64).unwrap();
        }

        let mut counter = 0u64;
        b.iter(|| {
            let key = &keys[(counter as usize) % 2000];
            if counter % 2 == 0 {
                black_box(cache.find(key));
            } else {
                black_box(cache.insert(key, counter).ok());
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_find_hit, bench_insert_evict, bench_mixed_50_50);
criterion_main!(benches);
