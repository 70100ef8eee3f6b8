use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tinylru::LruCache;

fn bench_cached_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_1kb_cached", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        let data = vec![b'x'; 1024];

        for key in 0..100u64 {
            cache.put(key, data.clone());
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 100)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_read_50_write", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        let data = vec![b'x'; 1024];

        for key in 0..100u64 {
            cache.put(key, data.clone());
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter.is_multiple_of(2) {
                black_box(cache.get(&(counter % 100)));
            } else {
                cache.put(counter, data.clone());
            }
            counter += 1;
        });
    });

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_miss_then_put", |b| {
        let mut cache = LruCache::new(10).unwrap(); // Small cache

        let mut counter = 0u64;
        b.iter(|| {
            // Cycling over 100 keys with room for 10 guarantees misses
            let key = counter % 100;
            if cache.get(&key).is_none() {
                cache.put(key, counter);
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cached_get, bench_mixed_50_50, bench_churn);
criterion_main!(benches);
