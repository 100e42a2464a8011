use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use serde_json::Value;

use agent_overlay::demo_feed::demo_snapshot;
use agent_overlay::ui::draw_view;
use agent_overlay::validate::validate_snapshot;
use agent_overlay::view::Renderer;

fn bench_validate(c: &mut Criterion) {
    let value: Value = serde_json::to_value(demo_snapshot()).expect("demo snapshot serializes");
    c.bench_function("validate_snapshot", |b| {
        b.iter(|| {
            let snapshot = validate_snapshot(black_box(&value)).unwrap();
            black_box(snapshot.iteration);
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let snapshot = demo_snapshot();
    let mut renderer = Renderer::new("assets");
    c.bench_function("render_view", |b| {
        b.iter(|| {
            let view = renderer.render(black_box(&snapshot));
            black_box(view.party.len());
        })
    });
}

fn bench_paint(c: &mut Criterion) {
    let mut renderer = Renderer::new("assets");
    renderer.render(&demo_snapshot());
    let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
    c.bench_function("paint_dashboard", |b| {
        b.iter(|| {
            let view = renderer.view().unwrap();
            terminal.draw(|f| draw_view(f, f.size(), view)).unwrap();
        })
    });
}

criterion_group!(benches, bench_validate, bench_render, bench_paint);
criterion_main!(benches);
