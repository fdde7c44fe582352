use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node of the layout tree as produced by ELK.
///
/// The root node is the graph itself; every other node is positioned relative
/// to its parent. Child order is paint order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
    /// `Some(vec![])` is kept distinct from an absent list: a present list,
    /// even an empty one, opens the node's decoration group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<Port>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label>>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassList>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub layout_options: IndexMap<String, serde_json::Value>,
    /// Root only: replaces the configured stylesheet. An empty string drops the
    /// `<style>` block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    /// Root only: replaces the configured `<defs>` content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defs: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassList>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassList>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, serde_json::Value>,
}

/// One routed sub-path of an edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub start_point: Option<Point>,
    #[serde(default)]
    pub bend_points: Vec<Point>,
    #[serde(default)]
    pub end_point: Option<Point>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassList>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// `class` may be given either as a single token string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassList {
    One(String),
    Many(Vec<String>),
}

impl Port {
    pub fn labels(&self) -> &[Label] {
        self.labels.as_deref().unwrap_or_default()
    }
}

impl ClassList {
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            ClassList::One(class) => vec![class.as_str()],
            ClassList::Many(classes) => classes.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EdgeRouting {
    #[default]
    Polyline,
    Splines,
}

impl EdgeRouting {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "POLYLINE" => Some(Self::Polyline),
            "SPLINES" => Some(Self::Splines),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polyline => "POLYLINE",
            Self::Splines => "SPLINES",
        }
    }
}

const EDGE_ROUTING_KEY: &str = "edgeRouting";

impl LayoutNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn ports(&self) -> &[Port] {
        self.ports.as_deref().unwrap_or_default()
    }

    pub fn labels(&self) -> &[Label] {
        self.labels.as_deref().unwrap_or_default()
    }

    /// The routing style this node sets for edges drawn inside it, if any.
    ///
    /// Both `properties` and `layoutOptions` are consulted; keys match either
    /// exactly (`edgeRouting`) or by their last dotted segment
    /// (`org.eclipse.elk.edgeRouting`). Unknown values are ignored.
    pub fn edge_routing(&self) -> Option<EdgeRouting> {
        self.properties
            .iter()
            .chain(self.layout_options.iter())
            .filter(|(key, _)| option_suffix(key) == EDGE_ROUTING_KEY)
            .find_map(|(_, value)| value.as_str().and_then(EdgeRouting::from_token))
    }
}

fn option_suffix(key: &str) -> &str {
    match key.rfind('.') {
        Some(idx) => &key[idx + 1..],
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_elk_json_with_defaults() {
        let json = r#"{
            "id": "root",
            "children": [
                { "id": "n1", "width": 30, "height": 30, "class": ["a", "b"] },
                { "id": "n2", "ports": [{ "id": "p1", "x": 2 }] }
            ],
            "edges": [{
                "id": "e1",
                "sources": ["n1"],
                "targets": ["n2:p1"],
                "sections": [{
                    "startPoint": { "x": 0, "y": 0 },
                    "bendPoints": [{ "x": 5, "y": 5 }],
                    "endPoint": { "x": 10, "y": 10 }
                }]
            }]
        }"#;
        let root: LayoutNode = serde_json::from_str(json).unwrap();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.x, None);
        assert_eq!(root.children[0].width, Some(30.0));
        assert_eq!(
            root.children[0].class,
            Some(ClassList::Many(vec!["a".into(), "b".into()]))
        );
        assert_eq!(root.children[1].ports()[0].x, Some(2.0));
        let section = &root.edges[0].sections[0];
        assert_eq!(section.start_point, Some(Point::new(0.0, 0.0)));
        assert_eq!(section.bend_points, vec![Point::new(5.0, 5.0)]);
    }

    #[test]
    fn class_accepts_single_token() {
        let label: Label = serde_json::from_str(r#"{"id":"l","class":"title"}"#).unwrap();
        assert_eq!(label.class.unwrap().tokens(), vec!["title"]);
    }

    #[test]
    fn attributes_keep_declaration_order() {
        let label: Label =
            serde_json::from_str(r#"{"id":"l","attributes":{"z":"1","a":"2","m":"3"}}"#).unwrap();
        let keys: Vec<&str> = label.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn empty_lists_stay_distinct_from_absent_ones() {
        let node: LayoutNode =
            serde_json::from_str(r#"{"id":"n","ports":[],"labels":[]}"#).unwrap();
        assert_eq!(node.ports.as_deref().map(<[Port]>::len), Some(0));
        assert_eq!(node.labels.as_deref().map(<[Label]>::len), Some(0));

        let node: LayoutNode = serde_json::from_str(r#"{"id":"n"}"#).unwrap();
        assert!(node.ports.is_none() && node.labels.is_none());
        assert!(node.ports().is_empty());
    }

    #[test]
    fn attribute_values_accept_scalars() {
        let node: LayoutNode = serde_json::from_str(
            r#"{"id":"n","attributes":{"data-rank":3,"data-live":true,"title":"x"}}"#,
        )
        .unwrap();
        assert_eq!(node.attributes["data-rank"], serde_json::json!(3));
        assert_eq!(node.attributes["data-live"], serde_json::json!(true));
        assert_eq!(node.attributes["title"], serde_json::json!("x"));
    }

    #[test]
    fn edge_routing_reads_suffixed_keys() {
        let node: LayoutNode = serde_json::from_str(
            r#"{"id":"g","properties":{"org.eclipse.elk.edgeRouting":"SPLINES"}}"#,
        )
        .unwrap();
        assert_eq!(node.edge_routing(), Some(EdgeRouting::Splines));

        let node: LayoutNode =
            serde_json::from_str(r#"{"id":"g","layoutOptions":{"elk.edgeRouting":"POLYLINE"}}"#)
                .unwrap();
        assert_eq!(node.edge_routing(), Some(EdgeRouting::Polyline));

        let node: LayoutNode =
            serde_json::from_str(r#"{"id":"g","properties":{"edgeRouting":"ORTHOGONAL"}}"#).unwrap();
        assert_eq!(node.edge_routing(), None);

        let node: LayoutNode =
            serde_json::from_str(r#"{"id":"g","properties":{"notEdgeRouting":"SPLINES"}}"#).unwrap();
        assert_eq!(node.edge_routing(), None);
    }
}
