//! Ownership tables derived from a layout tree.
//!
//! Edges may be declared at any level of the input, but ELK gives their
//! coordinates relative to one specific container: the source node itself when
//! the target is nested inside it, otherwise the source's parent. Rendering
//! therefore has to re-attach every edge to that container before painting.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::ir::{Edge, EdgeRouting, LayoutNode};

/// Per-container routing style with a single global fallback.
///
/// There is no inheritance chain: a container either sets a style itself or
/// uses the global one.
#[derive(Debug, Clone)]
pub struct RoutingTable<'a> {
    explicit: HashMap<&'a str, EdgeRouting>,
    global: EdgeRouting,
}

impl<'a> RoutingTable<'a> {
    pub fn new(global: EdgeRouting) -> Self {
        Self {
            explicit: HashMap::new(),
            global,
        }
    }

    pub fn global(&self) -> EdgeRouting {
        self.global
    }

    pub fn explicit(&self, container: &str) -> Option<EdgeRouting> {
        self.explicit.get(container).copied()
    }

    pub fn resolve(&self, container: &str) -> EdgeRouting {
        self.explicit(container).unwrap_or(self.global)
    }
}

#[derive(Debug, Clone)]
pub struct Ownership<'a> {
    parents: HashMap<&'a str, &'a str>,
    port_owners: HashMap<&'a str, &'a str>,
    routing: RoutingTable<'a>,
    edges: HashMap<&'a str, Vec<&'a Edge>>,
    /// Node ids in pre-order, root first.
    order: Vec<&'a str>,
}

/// Builds the parent, routing and edge-container tables for `root`.
///
/// An edge with several source/target pairs is appended once per pair, so it
/// can appear more than once in a container.
pub fn resolve(root: &LayoutNode, global: EdgeRouting) -> Result<Ownership<'_>> {
    let mut ownership = Ownership {
        parents: HashMap::new(),
        port_owners: HashMap::new(),
        routing: RoutingTable::new(global),
        edges: HashMap::new(),
        order: Vec::new(),
    };
    ownership.register_nodes(root);
    ownership.register_edges(root)?;
    Ok(ownership)
}

impl<'a> Ownership<'a> {
    pub fn parent_of(&self, id: &str) -> Option<&'a str> {
        self.parents.get(id).copied()
    }

    pub fn routing(&self) -> &RoutingTable<'a> {
        &self.routing
    }

    /// Edges to paint inside `container`, in assignment order.
    pub fn edges_of(&self, container: &str) -> &[&'a Edge] {
        self.edges.get(container).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn containers(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.order.iter().copied()
    }

    /// True iff `ancestor` lies on the parent chain above `node`. A node is not
    /// its own descendant.
    pub fn is_descendant(&self, ancestor: &str, node: &str) -> bool {
        let mut current = node;
        while let Some(parent) = self.parents.get(current) {
            if *parent == ancestor {
                return true;
            }
            current = *parent;
        }
        false
    }

    fn register_nodes(&mut self, node: &'a LayoutNode) {
        self.order.push(&node.id);
        self.edges.insert(&node.id, Vec::new());
        if let Some(routing) = node.edge_routing() {
            self.routing.explicit.insert(&node.id, routing);
        }
        for port in node.ports() {
            self.port_owners.insert(&port.id, &node.id);
        }
        for child in &node.children {
            self.parents.insert(&child.id, &node.id);
            self.register_nodes(child);
        }
    }

    fn register_edges(&mut self, node: &'a LayoutNode) -> Result<()> {
        for edge in &node.edges {
            for source in &edge.sources {
                let source = self.endpoint_node(edge, source)?;
                for target in &edge.targets {
                    let target = self.endpoint_node(edge, target)?;
                    let container = if self.is_descendant(source, target) {
                        source
                    } else {
                        self.parent_of(source).ok_or_else(|| Error::DetachedEdge {
                            edge: edge.id.clone(),
                            root: source.to_string(),
                        })?
                    };
                    tracing::debug!(edge = %edge.id, source, target, container, "assigned edge");
                    if let Some(list) = self.edges.get_mut(container) {
                        list.push(edge);
                    }
                }
            }
        }
        for child in &node.children {
            self.register_edges(child)?;
        }
        Ok(())
    }

    /// Resolves an endpoint reference (`node`, `node:port` or a bare port id)
    /// to the id of the node it belongs to.
    fn endpoint_node(&self, edge: &Edge, endpoint: &str) -> Result<&'a str> {
        if let Some((id, _)) = self.edges.get_key_value(endpoint) {
            return Ok(*id);
        }
        if let Some(owner) = self.port_owners.get(endpoint) {
            return Ok(*owner);
        }
        if let Some((node, _port)) = endpoint.split_once(':') {
            if let Some((id, _)) = self.edges.get_key_value(node) {
                return Ok(*id);
            }
        }
        Err(Error::UnknownNode {
            edge: edge.id.clone(),
            node: endpoint.to_string(),
        })
    }
}
