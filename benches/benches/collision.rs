// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_dnd::collision::{CollisionAlgorithm, CollisionDetector, DragGeometry};
use understory_dnd::id::DndId;

/// A `side × side` grid of 40×40 cells with a 10 px gutter.
fn grid(side: usize) -> Vec<(DndId, Rect)> {
    let mut out = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let x = col as f64 * 50.0;
            let y = row as f64 * 50.0;
            out.push((
                DndId::from(format!("cell-{row}-{col}")),
                Rect::new(x, y, x + 40.0, y + 40.0),
            ));
        }
    }
    out
}

fn bench_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision/detect");

    // Detection is a linear scan; cost should track candidate count for all three.
    for side in [8usize, 32, 64] {
        let candidates = grid(side);
        let middle = side as f64 * 25.0;
        let geometry = DragGeometry {
            pointer: Point::new(middle + 5.0, middle + 5.0),
            rect: Rect::new(middle - 15.0, middle - 15.0, middle + 25.0, middle + 25.0),
        };
        group.throughput(Throughput::Elements(candidates.len() as u64));

        for (name, algorithm) in [
            ("pointer_within", CollisionAlgorithm::PointerWithin),
            ("rectangle_intersection", CollisionAlgorithm::RectangleIntersection),
            ("closest_center", CollisionAlgorithm::ClosestCenter),
        ] {
            let detector = CollisionDetector::new(algorithm);
            group.bench_with_input(
                BenchmarkId::new(name, candidates.len()),
                &candidates,
                |b, candidates| {
                    b.iter(|| {
                        black_box(detector.detect(
                            black_box(&geometry),
                            candidates.iter().map(|(id, rect)| (id, *rect)),
                        ))
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_algorithms);
criterion_main!(benches);
