use std::hint::black_box;
use std::sync::Arc;

use campusnav_core::prelude::*;
use chrono::{DateTime, Utc};
use criterion::{Criterion, criterion_group, criterion_main};

const SIDE: usize = 30;
const SPACING_DEG: f64 = 0.0002;

/// Square grid of outdoor waypoints roughly 22 m apart
fn grid_campus() -> CampusGraph {
    let id = |row: usize, col: usize| format!("r{row}c{col}");
    let mut nodes = Vec::with_capacity(SIDE * SIDE);
    let mut edges = Vec::with_capacity(2 * SIDE * SIDE);

    for row in 0..SIDE {
        for col in 0..SIDE {
            nodes.push(NodeRecord::outdoor(
                &id(row, col),
                &id(row, col),
                row as f64 * SPACING_DEG,
                col as f64 * SPACING_DEG,
                Category::Other,
            ));
            if col + 1 < SIDE {
                edges.push(EdgeRecord::new(&id(row, col), &id(row, col + 1), 22.2));
            }
            if row + 1 < SIDE {
                edges.push(EdgeRecord::new(&id(row, col), &id(row + 1, col), 22.2));
            }
        }
    }
    build_graph(&nodes, &edges).expect("grid campus is valid")
}

fn bench_routing(c: &mut Criterion) {
    let graph = grid_campus();
    let far_corner = format!("r{}c{}", SIDE - 1, SIDE - 1);

    c.bench_function("shortest_path_corner_to_corner", |b| {
        b.iter(|| shortest_path(black_box(&graph), "r0c0", black_box(&far_corner)));
    });

    let from = Position::outdoor(0.00011, 0.00009);
    c.bench_function("route_from_position", |b| {
        b.iter(|| route(black_box(&graph), black_box(&from), &far_corner));
    });

    let destinations: Vec<String> = (0..SIDE).map(|row| format!("r{row}c{}", SIDE - 1)).collect();
    c.bench_function("route_to_many_30", |b| {
        b.iter(|| {
            route_to_many(
                black_box(&graph),
                &from,
                &destinations,
                &RoutingOptions::default(),
            )
        });
    });
}

fn bench_tracking(c: &mut Criterion) {
    let graph = Arc::new(grid_campus());
    let far_corner = format!("r{}c{}", SIDE - 1, SIDE - 1);
    let t0 = DateTime::<Utc>::from_timestamp_millis(0).expect("valid timestamp");
    let start = PositionSample::new(Position::outdoor(0.0, 0.0), 4.0, t0);
    let config = NavigationConfig {
        min_update_interval_ms: 0,
        ..NavigationConfig::default()
    };
    let mut session =
        start_session(graph, &far_corner, start, config).expect("session starts on the grid");

    let mut step: i64 = 0;
    c.bench_function("submit_position_on_route", |b| {
        b.iter(|| {
            step += 1;
            let lng = (step % 20) as f64 * 0.00001;
            let sample = PositionSample::new(
                Position::outdoor(0.0, lng),
                4.0,
                t0 + chrono::Duration::milliseconds(step * 10),
            );
            black_box(session.submit_position(sample))
        });
    });
}

criterion_group!(benches, bench_routing, bench_tracking);
criterion_main!(benches);
