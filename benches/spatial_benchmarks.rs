use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use cragmap::compute::spatial::{DistanceMetric, cluster_locations};
use cragmap::prelude::*;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

fn grid_location(i: usize) -> NewLocation {
    let lat = 39.0 + (i % 100) as f64 * 0.02;
    let lng = -106.0 + (i / 100) as f64 * 0.02;
    let kind = if i % 5 == 0 {
        ClimbingType::Gym
    } else {
        ClimbingType::Boulder
    };
    NewLocation::new(format!("crag-{}", i), kind, lat, lng).with_difficulty(format!("V{}", i % 8))
}

fn seeded_catalog(size: usize) -> Catalog {
    let catalog = Catalog::memory().unwrap();
    for i in 0..size {
        catalog.upsert(grid_location(i)).unwrap();
    }
    catalog
}

fn benchmark_upserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("upserts");

    let catalog = Catalog::memory().unwrap();
    group.bench_function("insert", |b| {
        let mut counter = 0;
        b.iter(|| {
            catalog.upsert(black_box(grid_location(counter))).unwrap();
            counter += 1;
        })
    });

    let catalog = seeded_catalog(1_000);
    group.bench_function("update_existing", |b| {
        let mut counter = 0;
        b.iter(|| {
            catalog
                .upsert(black_box(grid_location(counter % 1_000)))
                .unwrap();
            counter += 1;
        })
    });

    group.finish();
}

fn benchmark_nearby(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearby");

    for size in [1_000, 10_000, 50_000] {
        let catalog = seeded_catalog(size);

        group.bench_with_input(BenchmarkId::new("find_nearby_10km", size), &size, |b, _| {
            let query = NearbyQuery::new(39.5, -105.5).with_radius_km(10.0);
            b.iter(|| catalog.find_nearby(black_box(&query)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("count_nearby_50km", size), &size, |b, _| {
            let query = NearbyQuery::new(39.5, -105.5);
            b.iter(|| catalog.count_nearby(black_box(&query)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("filtered_page", size), &size, |b, _| {
            let query = NearbyQuery::new(39.5, -105.5)
                .with_filter(LocationFilter::any().with_type(ClimbingType::Gym));
            b.iter(|| {
                catalog
                    .nearby_page(black_box(&query), PageRequest::new(2, 25))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn benchmark_clusters(c: &mut Criterion) {
    let mut group = c.benchmark_group("clusters");

    let catalog = seeded_catalog(10_000);
    let viewport = Viewport::new(41.0, 39.0, -104.0, -106.0);

    for zoom in [5u8, 8, 12] {
        group.bench_with_input(BenchmarkId::new("viewport", zoom), &zoom, |b, &zoom| {
            let query = ClusterQuery::new(viewport).with_zoom(zoom);
            b.iter(|| catalog.clusters(black_box(&query)).unwrap())
        });
    }

    let locations: Vec<Arc<ClimbingLocation>> = (0..5_000)
        .map(|i| Arc::new(ClimbingLocation::create(grid_location(i), UNIX_EPOCH)))
        .collect();
    group.bench_function("cluster_locations_5k", |b| {
        b.iter(|| {
            cluster_locations(
                black_box(&locations),
                2_000.0,
                DistanceMetric::Haversine,
                None,
            )
        })
    });

    group.finish();
}

fn benchmark_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("listing");

    let catalog = seeded_catalog(10_000);
    group.bench_function("list_page", |b| {
        let query = ListQuery::new().with_page(PageRequest::new(10, 50));
        b.iter(|| catalog.list(black_box(&query)).unwrap())
    });

    group.bench_function("search_term", |b| {
        let query = ListQuery::new().with_search_term("crag-99");
        b.iter(|| catalog.list(black_box(&query)).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_upserts,
    benchmark_nearby,
    benchmark_clusters,
    benchmark_listing
);
criterion_main!(benches);
