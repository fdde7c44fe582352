use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use elk_svg_renderer::beautify::{DEFAULT_INDENT, beautify};
use elk_svg_renderer::ir::{Edge, EdgeRouting, Label, LayoutNode, Point, Section};
use elk_svg_renderer::ownership::resolve;
use elk_svg_renderer::render::render_svg;
use elk_svg_renderer::renderer::Renderer;
use elk_svg_renderer::theme::Theme;
use std::hint::black_box;

/// `groups` containers of `per_group` nodes each, chained by edges declared at
/// the root so every edge has to be re-attached to its group.
fn grouped_chain(groups: usize, per_group: usize) -> LayoutNode {
    let mut root = LayoutNode::new("root");
    root.width = Some(groups as f64 * 200.0);
    root.height = Some(per_group as f64 * 60.0);
    for g in 0..groups {
        let mut group = LayoutNode::new(format!("g{g}"));
        group.x = Some(g as f64 * 200.0);
        group.width = Some(180.0);
        group.height = Some(per_group as f64 * 60.0);
        for n in 0..per_group {
            let mut node = LayoutNode::new(format!("g{g}n{n}"));
            node.x = Some(20.0);
            node.y = Some(n as f64 * 60.0);
            node.width = Some(40.0);
            node.height = Some(30.0);
            node.labels = Some(vec![Label {
                id: format!("g{g}n{n}_label"),
                text: format!("Node {n}"),
                ..Default::default()
            }]);
            group.children.push(node);
        }
        for n in 1..per_group {
            root.edges.push(chain_edge(g, n));
        }
        root.children.push(group);
    }
    root
}

fn chain_edge(group: usize, n: usize) -> Edge {
    let y = n as f64 * 60.0;
    Edge {
        id: format!("g{group}e{n}"),
        sources: vec![format!("g{group}n{}", n - 1)],
        targets: vec![format!("g{group}n{n}")],
        sections: vec![Section {
            start_point: Some(Point::new(40.0, y - 30.0)),
            bend_points: vec![Point::new(60.0, y - 20.0), Point::new(60.0, y - 10.0)],
            end_point: Some(Point::new(40.0, y)),
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn sizes() -> [(&'static str, LayoutNode); 3] {
    [
        ("tiny", grouped_chain(1, 4)),
        ("medium", grouped_chain(8, 25)),
        ("large", grouped_chain(40, 50)),
    ]
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_ownership");
    for (name, tree) in sizes() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &tree, |b, data| {
            b.iter(|| {
                let ownership = resolve(black_box(data), EdgeRouting::Polyline).expect("resolve failed");
                black_box(ownership.edges_of("root").len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    let theme = Theme::elk_default();
    for (name, tree) in sizes() {
        let ownership = resolve(&tree, EdgeRouting::Splines).expect("resolve failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &tree, |b, data| {
            b.iter(|| {
                let svg = render_svg(black_box(data), &ownership, &theme);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_beautify(c: &mut Criterion) {
    let mut group = c.benchmark_group("beautify");
    let theme = Theme::elk_default();
    for (name, tree) in sizes() {
        let ownership = resolve(&tree, EdgeRouting::Polyline).expect("resolve failed");
        let raw = render_svg(&tree, &ownership, &theme);
        group.bench_with_input(BenchmarkId::from_parameter(name), &raw, |b, data| {
            b.iter(|| black_box(beautify(black_box(data), DEFAULT_INDENT).len()));
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let renderer = Renderer::new();
    for (name, tree) in sizes() {
        let json = serde_json::to_string(&tree).expect("serialize failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &json, |b, data| {
            b.iter(|| {
                let svg = renderer.render_json(black_box(data)).expect("render failed");
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_resolve, bench_render, bench_beautify, bench_end_to_end
);
criterion_main!(benches);
