//! Performance benchmarks for directory walks
//!
//! Measures walker overhead on in-memory trees (no I/O cost) and the gain
//! from prefetching sibling listings when each listing has latency.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gallery_scan_core::{DirectoryWalker, FsLister, WalkOptions};
use gallery_scan_test_utils::{MockFileSystem, TempTree};
use std::hint::black_box;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Tree with `albums` directories of `per_album` files, half of them nested
fn gallery_tree(albums: usize, per_album: usize) -> MockFileSystem {
    let mut fs = MockFileSystem::new();
    for album in 0..albums {
        for shot in 0..per_album {
            let path = if shot % 2 == 0 {
                format!("/gallery/album{album:04}/IMG_{shot:05}.png")
            } else {
                format!("/gallery/album{album:04}/edited/IMG_{shot:05}.jpg")
            };
            fs.add_file(&path);
        }
    }
    fs
}

fn benchmark_in_memory_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("in_memory_walk");
    let runtime = Runtime::new().unwrap();

    for albums in [10, 100, 1_000] {
        let per_album = 20;
        let walker = DirectoryWalker::new(gallery_tree(albums, per_album));
        group.throughput(Throughput::Elements((albums * per_album) as u64));

        group.bench_with_input(BenchmarkId::new("sequential", albums), &walker, |b, walker| {
            b.iter(|| {
                let report = runtime.block_on(walker.walk("/gallery")).unwrap();
                black_box(report.files.len());
            })
        });
    }

    group.finish();
}

fn benchmark_prefetch_with_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("prefetch_with_latency");
    group.sample_size(10);
    let runtime = Runtime::new().unwrap();

    for limit in [1, 4, 16] {
        let walker = DirectoryWalker::new(
            gallery_tree(32, 4).with_delay(Duration::from_millis(1)),
        )
        .with_options(WalkOptions::new().with_max_concurrency(limit));

        group.bench_with_input(BenchmarkId::new("concurrency", limit), &walker, |b, walker| {
            b.iter(|| {
                let report = runtime.block_on(walker.walk("/gallery")).unwrap();
                black_box(report.files.len());
            })
        });
    }

    group.finish();
}

fn benchmark_disk_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("disk_walk");
    let runtime = Runtime::new().unwrap();

    let tree = TempTree::new().unwrap();
    for album in 0..20 {
        for shot in 0..10 {
            tree.add_file(&format!("album{album}/shot{shot}.png")).unwrap();
        }
    }

    for limit in [1, 8] {
        let walker = DirectoryWalker::new(FsLister::new())
            .with_options(WalkOptions::new().with_max_concurrency(limit));
        group.bench_with_input(BenchmarkId::new("concurrency", limit), &walker, |b, walker| {
            b.iter(|| {
                let files = runtime.block_on(walker.walk_files(tree.path()));
                black_box(files.len());
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_in_memory_walk,
    benchmark_prefetch_with_latency,
    benchmark_disk_walk
);
criterion_main!(benches);
