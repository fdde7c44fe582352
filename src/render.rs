use crate::geometry::{flatten_sections, fmt_num, polyline_points, spline_path};
use crate::ir::{ClassList, Edge, EdgeRouting, Label, LayoutNode, Port};
use crate::ownership::Ownership;
use crate::svg::{Element, Node};
use crate::theme::Theme;
use anyhow::Result;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;

#[cfg(feature = "png")]
use crate::config::RenderConfig;

const DEFAULT_EXTENT: f64 = 100.0;

/// Builds the markup tree for `root`.
///
/// `root.css` and `root.defs` take precedence over `theme`; an empty override
/// suppresses the corresponding block instead of falling back.
pub fn render_document(root: &LayoutNode, ownership: &Ownership<'_>, theme: &Theme) -> Element {
    let style = root.css.as_deref().unwrap_or(&theme.style);
    let defs_text = root.defs.as_deref().unwrap_or(&theme.defs);

    let mut defs = Element::new("defs");
    if !style.is_empty() {
        defs.push(
            Element::new("style")
                .attr("type", "text/css")
                .child(Node::CData(style.to_string())),
        );
    }
    if !defs_text.is_empty() {
        defs.push(Node::Raw(defs_text.to_string()));
    }

    Element::new("svg")
        .attr("version", "1.1")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("width", fmt_num(extent(root.width)))
        .attr("height", fmt_num(extent(root.height)))
        .child(defs)
        .child(render_graph(root, ownership))
}

/// Raw (unindented) markup for `root`.
pub fn render_svg(root: &LayoutNode, ownership: &Ownership<'_>, theme: &Theme) -> String {
    crate::svg::write(&render_document(root, ownership, theme).into())
}

fn extent(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v != 0.0 => v,
        _ => DEFAULT_EXTENT,
    }
}

/// One translated group per container. Edges paint first so ports sit on top
/// of their strokes; nested containers follow the flat children.
fn render_graph(graph: &LayoutNode, ownership: &Ownership<'_>) -> Element {
    tracing::trace!(container = %graph.id, "rendering container");
    let mut group = Element::new("g").attr("transform", translate(graph.x, graph.y));
    for edge in ownership.edges_of(&graph.id) {
        let routing = ownership.routing().resolve(&graph.id);
        group.children.extend(render_edge(edge, routing));
    }
    for child in &graph.children {
        group.children.extend(render_node(child));
    }
    for child in graph.children.iter().filter(|c| c.has_children()) {
        group.push(render_graph(child, ownership));
    }
    group
}

fn render_node(node: &LayoutNode) -> Vec<Node> {
    let rect = shape_rect(
        &node.id,
        [node.x, node.y, node.width, node.height],
        node.class.as_ref(),
        node.style.as_deref(),
        &node.attributes,
    );
    if node.ports.is_none() && node.labels.is_none() {
        return vec![rect.into()];
    }
    let decorations = Element::new("g")
        .attr("transform", translate(node.x, node.y))
        .children(node.ports().iter().flat_map(render_port))
        .children(node.labels().iter().map(|label| Node::from(render_label(label))));
    vec![rect.into(), decorations.into()]
}

fn render_port(port: &Port) -> Vec<Node> {
    let rect = shape_rect(
        &port.id,
        [port.x, port.y, port.width, port.height],
        port.class.as_ref(),
        port.style.as_deref(),
        &port.attributes,
    );
    if port.labels.is_none() {
        return vec![rect.into()];
    }
    let labels = Element::new("g")
        .attr("class", "port")
        .attr("transform", translate(port.x, port.y))
        .children(port.labels().iter().map(|label| Node::from(render_label(label))));
    vec![rect.into(), labels.into()]
}

fn shape_rect(
    id: &str,
    bounds: [Option<f64>; 4],
    class: Option<&ClassList>,
    style: Option<&str>,
    attributes: &IndexMap<String, Value>,
) -> Element {
    let rect = id_class(Element::new("rect"), id, class, Some("node"));
    passthrough(pos_size(rect, bounds), style, attributes)
}

fn render_edge(edge: &Edge, routing: EdgeRouting) -> Vec<Node> {
    let points = flatten_sections(&edge.sections);
    tracing::debug!(edge = %edge.id, routing = routing.as_str(), points = points.len(), "rendering edge");
    let shape = match routing {
        EdgeRouting::Splines => Element::new("path").attr("d", spline_path(&points)),
        EdgeRouting::Polyline => Element::new("polyline").attr("points", polyline_points(&points)),
    };
    let shape = passthrough(
        id_class(shape, &edge.id, edge.class.as_ref(), Some("edge")),
        edge.style.as_deref(),
        &edge.attributes,
    );

    let mut nodes: Vec<Node> = vec![shape.into()];
    nodes.extend(edge.labels.iter().map(|label| Node::from(render_label(label))));
    nodes
}

/// Label text is emitted as-is; it must already be markup-safe.
fn render_label(label: &Label) -> Element {
    let text = id_class(Element::new("text"), &label.id, label.class.as_ref(), None);
    passthrough(
        pos_size(text, [label.x, label.y, label.width, label.height]),
        label.style.as_deref(),
        &label.attributes,
    )
    .child(Node::Text(label.text.clone()))
}

fn translate(x: Option<f64>, y: Option<f64>) -> String {
    format!(
        "translate({},{})",
        fmt_num(x.unwrap_or(0.0)),
        fmt_num(y.unwrap_or(0.0))
    )
}

/// Position and size are written as integers, truncated toward zero.
fn pos_size(element: Element, [x, y, width, height]: [Option<f64>; 4]) -> Element {
    element
        .attr("x", int_attr(x))
        .attr("y", int_attr(y))
        .attr("width", int_attr(width))
        .attr("height", int_attr(height))
}

fn int_attr(value: Option<f64>) -> String {
    let value = value.unwrap_or(0.0);
    if value.is_finite() {
        (value.trunc() as i64).to_string()
    } else {
        "0".to_string()
    }
}

fn id_class(
    element: Element,
    id: &str,
    class: Option<&ClassList>,
    structural: Option<&str>,
) -> Element {
    let classes = class
        .map(ClassList::tokens)
        .unwrap_or_default()
        .into_iter()
        .chain(structural)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    element
        .attr_opt("id", (!id.is_empty()).then_some(id))
        .attr_opt("class", (!classes.is_empty()).then_some(classes))
}

fn passthrough(
    element: Element,
    style: Option<&str>,
    attributes: &IndexMap<String, Value>,
) -> Element {
    element
        .attr_opt("style", style.filter(|s| !s.is_empty()))
        .attrs(attributes.iter().map(|(k, v)| (k.as_str(), attribute_text(v))))
}

/// Attribute values print the way they would when interpolated into a JS
/// template: numbers in shortest form, arrays comma-joined.
fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number
            .as_f64()
            .map(fmt_num)
            .unwrap_or_else(|| number.to_string()),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => attribute_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid default canvas size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some([r, g, b, a]) = render_cfg.background_rgba() {
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}
