//! Benchmarks for buffers and ring buffers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geo::{Coord, Geometry, LineString, Polygon};
use layerkit_algorithms::vector::{buffer_geometry, ring_buffers, BufferParams, RingParams};
use layerkit_core::FeatureId;

/// Star-shaped polygon with `n` vertices, alternating radii
fn create_polygon(n: usize) -> Geometry<f64> {
    let coords: Vec<Coord<f64>> = (0..n)
        .map(|i| {
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            let r = if i % 2 == 0 { 100.0 } else { 60.0 };
            Coord {
                x: r * angle.cos(),
                y: r * angle.sin(),
            }
        })
        .collect();
    Polygon::new(LineString::new(coords), vec![]).into()
}

fn bench_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer");

    for size in [16, 64, 256].iter() {
        let geom = create_polygon(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| buffer_geometry(black_box(&geom), &BufferParams::new(10.0, 8)).unwrap())
        });
    }

    group.finish();
}

fn bench_rings(c: &mut Criterion) {
    let mut group = c.benchmark_group("rings");
    let geom = create_polygon(32);

    for count in [1_u32, 3, 5].iter() {
        let params = RingParams {
            initial_distance: 10.0,
            increment: 10.0,
            ring_count: *count,
        };

        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| ring_buffers(vec![(FeatureId(1), black_box(&geom))], &params).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_buffer, bench_rings);
criterion_main!(benches);
