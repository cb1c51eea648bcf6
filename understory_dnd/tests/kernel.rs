// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests for the `understory_dnd` kernel.
//!
//! These drive the kernel through raw input the way a host would and check
//! the event stream subscribers observe.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use understory_dnd::element::BoxElement;
use understory_dnd::error::{DndError, HandlerError, RecordKind};
use understory_dnd::event::{DndEvent, EventKind};
use understory_dnd::id::{DndId, Payload};
use understory_dnd::input::{InputEvent, Key, PointerInput};
use understory_dnd::kernel::{Kernel, KernelOptions};
use understory_dnd::plugin::SnapToGrid;
use understory_dnd::registry::{Accept, DraggableOptions, DroppableOptions};
use understory_dnd::sensor::{SensorEvent, SensorKind, SensorPhase, SensorSet};
use understory_dnd::session::DragStatus;

type Log = Rc<RefCell<Vec<String>>>;

fn describe(event: &DndEvent) -> String {
    match event {
        DndEvent::DragEnter { droppable, .. } => format!("drag:enter {}", droppable.id),
        DndEvent::DragLeave { droppable, .. } => format!("drag:leave {}", droppable.id),
        DndEvent::Drop { droppable, .. } => format!("drop {}", droppable.id),
        DndEvent::DragEnd { droppable, .. } => match droppable {
            Some(droppable) => format!("drag:end {}", droppable.id),
            None => "drag:end -".to_owned(),
        },
        DndEvent::DragMove { over, .. } => match over {
            Some(over) => format!("drag:move {over}"),
            None => "drag:move -".to_owned(),
        },
        DndEvent::Error { source_event, .. } => format!("error {source_event}"),
        other => other.kind().to_string(),
    }
}

/// Record every non-sensor event.
fn record(kernel: &Kernel) -> Log {
    let log: Log = Rc::default();
    for kind in EventKind::ALL {
        if matches!(
            kind,
            EventKind::SensorStart
                | EventKind::SensorMove
                | EventKind::SensorEnd
                | EventKind::SensorCancel
        ) {
            continue;
        }
        let log = log.clone();
        kernel.on(kind, move |event| log.borrow_mut().push(describe(event)));
    }
    log
}

fn down(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerDown(PointerInput::mouse(Point::new(x, y), 0))
}

fn moved(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMove(PointerInput::mouse(Point::new(x, y), 0))
}

fn up(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerUp(PointerInput::mouse(Point::new(x, y), 0))
}

fn feed(kernel: &Kernel, inputs: &[InputEvent]) {
    for input in inputs {
        kernel.handle_input(input);
    }
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rc<Rect> {
    Rc::new(Rect::new(x0, y0, x1, y1))
}

/// A 20×20 card at the origin and two 100×100 zones side by side.
fn two_zones() -> Kernel {
    let kernel = Kernel::new(KernelOptions::default());
    kernel
        .draggable(rect(0.0, 0.0, 20.0, 20.0), DraggableOptions::new("card"))
        .unwrap();
    kernel
        .droppable(rect(0.0, 0.0, 100.0, 100.0), DroppableOptions::new("left"))
        .unwrap();
    kernel
        .droppable(rect(100.0, 0.0, 200.0, 100.0), DroppableOptions::new("right"))
        .unwrap();
    kernel
}

#[test]
fn leave_precedes_enter_precedes_move() {
    let kernel = two_zones();
    let log = record(&kernel);

    feed(
        &kernel,
        &[
            down(10.0, 10.0),
            moved(50.0, 50.0),
            moved(150.0, 50.0),
            up(150.0, 50.0),
        ],
    );

    assert_eq!(
        *log.borrow(),
        [
            "drag:start",
            "drag:enter left",
            "drag:leave left",
            "drag:enter right",
            "drag:move right",
            "drop right",
            "drag:end right",
        ]
    );
    assert_eq!(kernel.status(), DragStatus::Idle);
}

#[test]
fn nested_droppables_resolve_to_the_inner_one() {
    let kernel = Kernel::new(KernelOptions::default());
    kernel
        .draggable(rect(300.0, 300.0, 320.0, 320.0), DraggableOptions::new("card"))
        .unwrap();
    kernel
        .droppable(rect(0.0, 0.0, 200.0, 200.0), DroppableOptions::new("A"))
        .unwrap();
    kernel
        .droppable(rect(0.0, 0.0, 50.0, 50.0), DroppableOptions::new("B"))
        .unwrap();
    let log = record(&kernel);

    feed(
        &kernel,
        &[down(310.0, 310.0), moved(10.0, 10.0), up(10.0, 10.0)],
    );

    assert_eq!(
        *log.borrow(),
        ["drag:start", "drag:enter B", "drop B", "drag:end B"]
    );
}

#[test]
fn cancel_never_drops() {
    let kernel = two_zones();
    let log = record(&kernel);

    feed(
        &kernel,
        &[
            down(10.0, 10.0),
            moved(150.0, 50.0),
            InputEvent::KeyDown {
                key: Key::Escape,
                focused: None,
            },
            up(150.0, 50.0),
        ],
    );

    assert_eq!(
        *log.borrow(),
        ["drag:start", "drag:enter right", "drag:cancel"]
    );
    assert!(!kernel.is_dragging());
}

#[test]
fn release_over_nothing_ends_without_drop() {
    let kernel = two_zones();
    let log = record(&kernel);

    feed(
        &kernel,
        &[down(10.0, 10.0), moved(500.0, 500.0), up(500.0, 500.0)],
    );

    assert_eq!(*log.borrow(), ["drag:start", "drag:end -"]);
}

#[test]
fn click_is_not_a_drag() {
    let kernel = two_zones();
    let log = record(&kernel);
    feed(&kernel, &[down(10.0, 10.0), moved(12.0, 11.0), up(12.0, 11.0)]);
    assert!(log.borrow().is_empty());
}

#[test]
fn duplicate_ids_are_rejected_until_destroyed() {
    let kernel = Kernel::new(KernelOptions::default());
    let first = kernel
        .draggable(rect(0.0, 0.0, 10.0, 10.0), DraggableOptions::new("x"))
        .unwrap();

    let err = kernel
        .draggable(rect(0.0, 0.0, 10.0, 10.0), DraggableOptions::new("x"))
        .unwrap_err();
    assert_eq!(
        err,
        DndError::DuplicateId {
            kind: RecordKind::Draggable,
            id: DndId::from("x"),
        }
    );

    first.destroy().unwrap();
    kernel
        .draggable(rect(0.0, 0.0, 10.0, 10.0), DraggableOptions::new("x"))
        .unwrap();
}

#[test]
fn empty_id_is_missing() {
    let kernel = Kernel::new(KernelOptions::default());
    let err = kernel
        .droppable(rect(0.0, 0.0, 10.0, 10.0), DroppableOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        DndError::MissingId {
            kind: RecordKind::Droppable
        }
    );
}

#[test]
fn destroying_the_dragged_draggable_cancels() {
    let kernel = Kernel::new(KernelOptions::default());
    let card = kernel
        .draggable(rect(0.0, 0.0, 20.0, 20.0), DraggableOptions::new("card"))
        .unwrap();
    let log = record(&kernel);

    feed(&kernel, &[down(10.0, 10.0), moved(50.0, 50.0)]);
    assert!(kernel.is_dragging());

    card.destroy().unwrap();
    assert!(!kernel.is_dragging());

    // The pointer sensor was reset, so the rest of the gesture is inert.
    feed(&kernel, &[moved(60.0, 60.0), up(60.0, 60.0)]);
    assert_eq!(*log.borrow(), ["drag:start", "drag:cancel"]);
}

#[test]
fn destroying_the_current_droppable_leaves_it() {
    let kernel = Kernel::new(KernelOptions::default());
    kernel
        .draggable(rect(0.0, 0.0, 20.0, 20.0), DraggableOptions::new("card"))
        .unwrap();
    let zone = kernel
        .droppable(rect(100.0, 0.0, 200.0, 100.0), DroppableOptions::new("zone"))
        .unwrap();
    let log = record(&kernel);

    feed(&kernel, &[down(10.0, 10.0), moved(150.0, 50.0)]);
    zone.destroy().unwrap();
    feed(&kernel, &[moved(160.0, 50.0), up(160.0, 50.0)]);

    assert_eq!(
        *log.borrow(),
        [
            "drag:start",
            "drag:enter zone",
            "drag:leave zone",
            "drag:move -",
            "drag:end -",
        ]
    );
}

#[test]
fn accept_rules_filter_candidates() {
    let kernel = Kernel::new(KernelOptions::default());
    kernel
        .draggable(
            rect(0.0, 0.0, 20.0, 20.0),
            DraggableOptions::new("photo").with_kind("image"),
        )
        .unwrap();
    kernel
        .droppable(
            rect(100.0, 0.0, 200.0, 100.0),
            DroppableOptions::new("docs").with_accept(Accept::kinds(["text"])),
        )
        .unwrap();
    // Covers "docs" and accepts images.
    kernel
        .droppable(
            rect(0.0, 0.0, 400.0, 400.0),
            DroppableOptions::new("gallery")
                .with_accept(Accept::predicate(|d| d.kind.as_deref() == Some("image"))),
        )
        .unwrap();
    let log = record(&kernel);

    feed(
        &kernel,
        &[down(10.0, 10.0), moved(150.0, 50.0), up(150.0, 50.0)],
    );

    assert_eq!(
        *log.borrow(),
        ["drag:start", "drag:enter gallery", "drop gallery", "drag:end gallery"]
    );
}

#[test]
fn disabled_droppable_becomes_a_target_once_enabled() {
    let kernel = Kernel::new(KernelOptions::default());
    kernel
        .draggable(rect(0.0, 0.0, 20.0, 20.0), DraggableOptions::new("card"))
        .unwrap();
    let zone = kernel
        .droppable(
            rect(100.0, 0.0, 200.0, 100.0),
            DroppableOptions::new("zone").disabled(),
        )
        .unwrap();
    let log = record(&kernel);

    feed(&kernel, &[down(10.0, 10.0), moved(150.0, 50.0)]);
    assert_eq!(kernel.session().over, None);

    zone.enable().unwrap();
    feed(&kernel, &[moved(151.0, 50.0), up(151.0, 50.0)]);

    assert_eq!(
        *log.borrow(),
        [
            "drag:start",
            "drag:enter zone",
            "drag:move zone",
            "drop zone",
            "drag:end zone",
        ]
    );
}

#[test]
fn disabling_over_target_before_release_skips_drop() {
    let kernel = Kernel::new(KernelOptions::default());
    kernel
        .draggable(rect(0.0, 0.0, 20.0, 20.0), DraggableOptions::new("card"))
        .unwrap();
    let zone = kernel
        .droppable(rect(100.0, 0.0, 200.0, 100.0), DroppableOptions::new("zone"))
        .unwrap();
    let log = record(&kernel);

    feed(&kernel, &[down(10.0, 10.0), moved(150.0, 50.0)]);
    zone.disable().unwrap();
    feed(&kernel, &[up(150.0, 50.0)]);

    assert_eq!(
        *log.borrow(),
        ["drag:start", "drag:enter zone", "drag:end -"]
    );
}

#[test]
fn failing_handler_is_reported_and_drag_continues() {
    let kernel = two_zones();
    let log = record(&kernel);
    kernel.on_fallible(EventKind::DragStart, |_| Err(HandlerError::new("nope")));

    feed(
        &kernel,
        &[down(10.0, 10.0), moved(150.0, 50.0), up(150.0, 50.0)],
    );

    assert_eq!(
        *log.borrow(),
        [
            "drag:start",
            "error drag:start",
            "drag:enter right",
            "drop right",
            "drag:end right",
        ]
    );
}

#[test]
fn handlers_may_register_during_a_drag() {
    let kernel = Kernel::new(KernelOptions::default());
    kernel
        .draggable(rect(0.0, 0.0, 20.0, 20.0), DraggableOptions::new("card"))
        .unwrap();
    let log = record(&kernel);

    let weak = kernel.downgrade();
    let late = Rc::new(RefCell::new(None));
    let slot = late.clone();
    kernel.once(EventKind::DragStart, move |_| {
        if let Some(kernel) = weak.upgrade() {
            let handle = kernel
                .droppable(rect(100.0, 0.0, 200.0, 100.0), DroppableOptions::new("late"))
                .unwrap();
            *slot.borrow_mut() = Some(handle);
        }
    });

    feed(
        &kernel,
        &[down(10.0, 10.0), moved(50.0, 50.0), moved(150.0, 50.0), up(150.0, 50.0)],
    );

    assert!(late.borrow().is_some());
    assert_eq!(
        *log.borrow(),
        [
            "drag:start",
            "drag:enter late",
            "drag:move late",
            "drop late",
            "drag:end late",
        ]
    );
}

#[test]
fn destroying_the_kernel_from_a_drop_handler() {
    let kernel = two_zones();
    let weak = kernel.downgrade();
    kernel.on(EventKind::Drop, move |_| {
        if let Some(kernel) = weak.upgrade() {
            kernel.destroy();
        }
    });
    let ended = Rc::new(RefCell::new(false));
    let flag = ended.clone();
    kernel.on(EventKind::DragEnd, move |_| *flag.borrow_mut() = true);

    feed(
        &kernel,
        &[down(10.0, 10.0), moved(150.0, 50.0), up(150.0, 50.0)],
    );

    assert!(kernel.is_destroyed());
    assert_eq!(kernel.status(), DragStatus::Idle);
    assert!(!*ended.borrow());
    // Input after destroy is ignored.
    feed(&kernel, &[down(10.0, 10.0), moved(150.0, 50.0)]);
    assert!(!kernel.is_dragging());
}

#[test]
fn destroy_cancels_active_drag_once() {
    let kernel = two_zones();
    let log = record(&kernel);
    feed(&kernel, &[down(10.0, 10.0), moved(150.0, 50.0)]);

    kernel.destroy();
    kernel.destroy();

    assert_eq!(
        *log.borrow(),
        ["drag:start", "drag:enter right", "drag:cancel"]
    );
}

#[test]
fn touch_hold_then_drag() {
    let kernel = Kernel::new(KernelOptions::default().with_sensors(SensorSet::TOUCH));
    kernel
        .draggable(rect(0.0, 0.0, 20.0, 20.0), DraggableOptions::new("card"))
        .unwrap();
    kernel
        .droppable(rect(100.0, 0.0, 200.0, 100.0), DroppableOptions::new("zone"))
        .unwrap();
    let log = record(&kernel);

    kernel.handle_input(&InputEvent::PointerDown(PointerInput::touch(
        1,
        Point::new(10.0, 10.0),
        1_000,
    )));
    kernel.tick(1_100);
    assert!(!kernel.is_dragging());
    kernel.tick(1_260);
    assert!(kernel.is_dragging());

    kernel.handle_input(&InputEvent::PointerMove(PointerInput::touch(
        1,
        Point::new(150.0, 50.0),
        1_300,
    )));
    kernel.handle_input(&InputEvent::PointerUp(PointerInput::touch(
        1,
        Point::new(150.0, 50.0),
        1_400,
    )));

    assert_eq!(
        *log.borrow(),
        [
            "drag:start",
            "drag:enter zone",
            "drag:move zone",
            "drop zone",
            "drag:end zone",
        ]
    );
}

#[test]
fn keyboard_drag_uses_focused_draggable() {
    let kernel = Kernel::new(KernelOptions::default());
    kernel
        .draggable(rect(0.0, 0.0, 50.0, 50.0), DraggableOptions::new("card"))
        .unwrap();
    kernel
        .droppable(rect(50.0, 0.0, 100.0, 50.0), DroppableOptions::new("next"))
        .unwrap();
    let log = record(&kernel);

    let key = |key| InputEvent::KeyDown {
        key,
        focused: Some(DndId::from("card")),
    };
    feed(&kernel, &[key(Key::Enter), key(Key::ArrowRight), key(Key::ArrowRight), key(Key::Enter)]);

    assert_eq!(
        *log.borrow(),
        [
            "drag:start",
            "drag:enter next",
            "drag:move next",
            "drag:move next",
            "drop next",
            "drag:end next",
        ]
    );
}

#[test]
fn pickup_rejected_during_another_drag_does_not_linger() {
    let kernel = Kernel::new(KernelOptions::default());
    kernel
        .draggable(rect(0.0, 0.0, 20.0, 20.0), DraggableOptions::new("a"))
        .unwrap();
    kernel
        .draggable(rect(100.0, 0.0, 120.0, 20.0), DraggableOptions::new("b"))
        .unwrap();
    let space = || InputEvent::KeyDown {
        key: Key::Space,
        focused: Some(DndId::from("b")),
    };

    feed(&kernel, &[down(10.0, 10.0), moved(40.0, 10.0), space()]);
    assert_eq!(kernel.session().active_id(), Some(&DndId::from("a")));
    feed(&kernel, &[up(40.0, 10.0)]);
    assert!(!kernel.is_dragging());

    feed(&kernel, &[space()]);
    assert!(kernel.is_dragging(), "second Space picks up b");
    assert_eq!(kernel.session().sensor, Some(SensorKind::Keyboard));
    assert_eq!(kernel.session().active_id(), Some(&DndId::from("b")));
}

#[test]
fn start_for_disabled_draggable_resets_its_sensor() {
    let kernel = Kernel::new(KernelOptions::default());
    let card = kernel
        .draggable(rect(0.0, 0.0, 20.0, 20.0), DraggableOptions::new("card"))
        .unwrap();
    let sensed = Rc::new(RefCell::new(Vec::new()));
    for kind in [EventKind::SensorStart, EventKind::SensorMove, EventKind::SensorEnd] {
        let sensed = sensed.clone();
        kernel.on(kind, move |event| sensed.borrow_mut().push(event.kind()));
    }

    // Armed on press, disabled before the travel threshold is crossed.
    feed(&kernel, &[down(10.0, 10.0)]);
    card.disable().unwrap();
    feed(&kernel, &[moved(40.0, 10.0)]);
    assert!(!kernel.is_dragging());
    card.enable().unwrap();

    // The rejected gesture is over: no moves or release follow it.
    feed(&kernel, &[moved(60.0, 10.0), up(60.0, 10.0)]);
    assert_eq!(*sensed.borrow(), [EventKind::SensorStart]);
    assert!(!kernel.is_dragging());

    feed(&kernel, &[down(10.0, 10.0), moved(40.0, 10.0)]);
    assert!(kernel.is_dragging(), "the pointer sensor accepts a new press");
}

#[test]
fn detached_draggable_collides_at_the_pointer() {
    let kernel = Kernel::new(
        KernelOptions::default()
            .with_collision(understory_dnd::collision::CollisionAlgorithm::RectangleIntersection),
    );
    let card = BoxElement::new(Rect::new(0.0, 0.0, 20.0, 20.0));
    kernel
        .draggable(card.clone(), DraggableOptions::new("card"))
        .unwrap();
    kernel
        .droppable(rect(100.0, 0.0, 200.0, 100.0), DroppableOptions::new("zone"))
        .unwrap();

    // Start via an external sensor after the element went away.
    card.detach();
    kernel.dispatch_sensor(SensorEvent::new(
        SensorKind::Custom(7),
        DndId::from("card"),
        SensorPhase::Start,
        Point::new(10.0, 10.0),
    ));
    kernel.dispatch_sensor(SensorEvent::new(
        SensorKind::Custom(7),
        DndId::from("card"),
        SensorPhase::Move,
        Point::new(150.0, 50.0),
    ));

    // A zero-size rect has no intersection area.
    assert!(kernel.is_dragging());
    assert_eq!(kernel.session().over, None);
    assert_eq!(
        kernel.session().dragged_rect(),
        Some(Rect::new(150.0, 50.0, 150.0, 50.0))
    );
}

#[test]
fn snap_to_grid_plugin_rounds_positions() {
    let kernel = Kernel::new(KernelOptions::default().with_plugin(SnapToGrid::new(25.0)));
    kernel
        .draggable(rect(0.0, 0.0, 20.0, 20.0), DraggableOptions::new("card"))
        .unwrap();
    let positions = Rc::new(RefCell::new(Vec::new()));
    let sink = positions.clone();
    kernel.on(EventKind::DragMove, move |event| {
        if let DndEvent::DragMove { position, offset, .. } = event {
            sink.borrow_mut().push((*position, *offset));
        }
    });

    feed(&kernel, &[down(10.0, 10.0), moved(30.0, 10.0), moved(61.0, 37.0)]);

    assert_eq!(
        *positions.borrow(),
        [(Point::new(50.0, 25.0), kurbo::Vec2::new(25.0, 25.0))]
    );
}

#[test]
fn payloads_reach_subscribers_by_reference() {
    let kernel = two_zones();
    let data = Payload::new(String::from("card data"));
    kernel
        .draggable(
            rect(300.0, 0.0, 320.0, 20.0),
            DraggableOptions::new("rich").with_payload(data.clone()),
        )
        .unwrap();
    let seen = Rc::new(RefCell::new(None));
    let sink = seen.clone();
    kernel.on(EventKind::DragStart, move |event| {
        if let DndEvent::DragStart { draggable, .. } = event {
            *sink.borrow_mut() = Some(draggable.data.clone());
        }
    });

    feed(&kernel, &[down(310.0, 10.0), moved(350.0, 10.0)]);

    let seen = seen.borrow();
    let seen = seen.as_ref().unwrap();
    assert!(seen.ptr_eq(&data));
    assert_eq!(seen.downcast_ref::<String>().unwrap(), "card data");
}

#[test]
fn second_start_while_dragging_is_ignored() {
    let kernel = two_zones();
    kernel
        .draggable(rect(300.0, 0.0, 320.0, 20.0), DraggableOptions::new("other"))
        .unwrap();
    feed(&kernel, &[down(10.0, 10.0), moved(50.0, 50.0)]);

    kernel.dispatch_sensor(SensorEvent::new(
        SensorKind::Keyboard,
        DndId::from("other"),
        SensorPhase::Start,
        Point::new(310.0, 10.0),
    ));

    let session = kernel.session();
    assert_eq!(session.active_id().unwrap(), "card");
    assert_eq!(session.sensor, Some(SensorKind::Pointer));
}

#[test]
fn error_types_are_reachable_from_the_crate_root() {
    let err = "drag:over".parse::<EventKind>().unwrap_err();
    let root: understory_dnd::UnknownEventName = err;
    assert_eq!(root, understory_dnd::UnknownEventName(String::from("drag:over")));
    assert_eq!(
        "drag:move".parse::<EventKind>(),
        Ok(EventKind::DragMove)
    );
}
