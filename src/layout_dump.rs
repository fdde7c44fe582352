use crate::ir::{EdgeRouting, LayoutNode};
use crate::ownership::Ownership;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Snapshot of the tables the renderer derives before painting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub root: String,
    pub global_edge_routing: EdgeRouting,
    pub containers: Vec<ContainerDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDump {
    pub id: String,
    pub parent: Option<String>,
    pub edge_routing: Option<EdgeRouting>,
    pub edges: Vec<String>,
}

impl LayoutDump {
    pub fn from_ownership(root: &LayoutNode, ownership: &Ownership<'_>) -> Self {
        let routing = ownership.routing();
        let containers = ownership
            .containers()
            .map(|id| ContainerDump {
                id: id.to_string(),
                parent: ownership.parent_of(id).map(str::to_string),
                edge_routing: routing.explicit(id),
                edges: ownership
                    .edges_of(id)
                    .iter()
                    .map(|edge| edge.id.clone())
                    .collect(),
            })
            .collect();

        LayoutDump {
            root: root.id.clone(),
            global_edge_routing: routing.global(),
            containers,
        }
    }
}

pub fn write_layout_dump(path: &Path, root: &LayoutNode, ownership: &Ownership<'_>) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_ownership(root, ownership);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
