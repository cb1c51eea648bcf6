// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_dnd::event::EventKind;
use understory_dnd::id::DndId;
use understory_dnd::kernel::{Kernel, KernelOptions};
use understory_dnd::registry::{DraggableOptions, DroppableOptions};
use understory_dnd::sensor::{SensorEvent, SensorKind, SensorPhase};
use understory_sortable::{SortableExt, SortableOptions};

fn sensor(phase: SensorPhase, at: Point) -> SensorEvent {
    SensorEvent::new(SensorKind::Pointer, DndId::from("card"), phase, at)
}

/// A kernel with one draggable, a row of `zones` droppables 50 px wide, and
/// one subscriber per drag channel.
fn kernel_with_zones(zones: usize) -> Kernel {
    let kernel = Kernel::new(KernelOptions::default());
    kernel
        .draggable(
            Rc::new(Rect::new(0.0, 0.0, 20.0, 20.0)),
            DraggableOptions::new("card"),
        )
        .unwrap();
    for i in 0..zones {
        let x = i as f64 * 50.0;
        kernel
            .droppable(
                Rc::new(Rect::new(x, 100.0, x + 50.0, 200.0)),
                DroppableOptions::new(format!("zone-{i}")),
            )
            .unwrap();
    }
    for kind in [
        EventKind::DragMove,
        EventKind::DragEnter,
        EventKind::DragLeave,
    ] {
        kernel.on(kind, |event| {
            black_box(event);
        });
    }
    kernel
}

fn bench_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel/move");

    // Each step crosses a zone boundary, so it pays for leave + enter + move.
    for zones in [4usize, 64, 512] {
        let kernel = kernel_with_zones(zones);
        kernel.dispatch_sensor(sensor(SensorPhase::Start, Point::new(10.0, 10.0)));
        let span = zones as f64 * 50.0;
        let mut x = 0.0;

        group.bench_function(BenchmarkId::new("crossing", zones), |b| {
            b.iter(|| {
                x = (x + 50.0) % span;
                kernel.dispatch_sensor(sensor(SensorPhase::Move, Point::new(x + 25.0, 150.0)));
            });
        });
    }

    group.finish();
}

fn bench_sortable_drop(c: &mut Criterion) {
    let mut group = c.benchmark_group("sortable/drop");

    for len in [16usize, 256] {
        group.bench_function(BenchmarkId::new("first_to_last", len), |b| {
            b.iter_batched(
                || {
                    let kernel = Kernel::new(KernelOptions::default());
                    let ids: Vec<String> = (0..len).map(|i| format!("item-{i}")).collect();
                    for (i, id) in ids.iter().enumerate() {
                        let y = i as f64 * 20.0;
                        let row = Rc::new(Rect::new(0.0, y, 100.0, y + 20.0));
                        kernel
                            .draggable(row.clone(), DraggableOptions::new(id))
                            .unwrap();
                        kernel.droppable(row, DroppableOptions::new(id)).unwrap();
                    }
                    let list = kernel
                        .sortable(
                            Rc::new(Rect::new(0.0, 0.0, 100.0, len as f64 * 20.0)),
                            SortableOptions::new("list").with_items(ids.iter()),
                        )
                        .unwrap();
                    (kernel, list)
                },
                |(kernel, list)| {
                    let last = Point::new(50.0, len as f64 * 20.0 - 10.0);
                    let item = |phase, at| {
                        SensorEvent::new(SensorKind::Pointer, DndId::from("item-0"), phase, at)
                    };
                    kernel.dispatch_sensor(item(SensorPhase::Start, Point::new(50.0, 10.0)));
                    kernel.dispatch_sensor(item(SensorPhase::Move, last));
                    kernel.dispatch_sensor(item(SensorPhase::End, last));
                    black_box(list.items());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_moves, bench_sortable_drop);
criterion_main!(benches);
