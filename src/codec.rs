//! JSON node-link codec for topology documents.
//!
//! The on-disk format is frozen for compatibility with existing consumers:
//! a top-level object with `name`, a `nodes` array of
//! `{id, label, type, nodeobj: {nodetype, interfaces}}` records, and a
//! `links` array of `{source, target, label, capacity, delay}` records that
//! additionally carry one `<nodename>: <ifname>` key per endpoint. Interface
//! values use the micro-format `"<name> mac:<mac>[ ip:<ip>/<mask>]"`.
//!
//! Output is deterministic: nodes and links are emitted in sorted order, and
//! `source` is always the lexicographically smaller endpoint, so equal
//! topologies serialize to identical bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TopologyError;
use crate::interface::Interface;
use crate::link::{Link, NodePair};
use crate::node::{Node, NodeType};
use crate::topology::Topology;

#[derive(Debug, Serialize, Deserialize)]
struct TopologyDoc {
    name: String,
    nodes: Vec<NodeRecord>,
    links: Vec<LinkRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: String,
    label: String,
    #[serde(rename = "type")]
    node_type: String,
    nodeobj: NodeObjRecord,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeObjRecord {
    nodetype: String,
    interfaces: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LinkRecord {
    source: String,
    target: String,
    label: String,
    capacity: u64,
    delay: f64,
    /// The two dynamic `<nodename>: <ifname>` keys
    #[serde(flatten)]
    endpoints: BTreeMap<String, String>,
}

/// Serialize a topology to its JSON document form
pub fn serialize(topology: &Topology) -> Result<String, TopologyError> {
    let nodes = topology
        .nodes()
        .iter()
        .map(|(name, node)| NodeRecord {
            id: name.clone(),
            label: name.clone(),
            node_type: node.node_type().tag().to_string(),
            nodeobj: NodeObjRecord {
                nodetype: node.node_type().tag().to_string(),
                interfaces: node
                    .interfaces()
                    .iter()
                    .map(|(ifname, intf)| (ifname.clone(), intf.to_string()))
                    .collect(),
            },
        })
        .collect();

    let links = topology
        .links()
        .iter()
        .map(|(pair, link)| LinkRecord {
            source: pair.first().to_string(),
            target: pair.second().to_string(),
            label: link.label().to_string(),
            capacity: link.capacity_bps(),
            delay: link.delay_sec(),
            endpoints: link
                .endpoint_ifaces()
                .iter()
                .map(|(node, ifname)| (node.clone(), ifname.clone()))
                .collect(),
        })
        .collect();

    let doc = TopologyDoc {
        name: topology.name().to_string(),
        nodes,
        links,
    };
    serde_json::to_string(&doc).map_err(|e| TopologyError::MalformedTopology(e.to_string()))
}

/// Rebuild a topology from its JSON document form.
///
/// Fails with `MalformedTopology` on missing fields, unrecognized node-type
/// tags, malformed interface encodings, or links whose endpoints name absent
/// nodes.
pub fn deserialize(json: &str) -> Result<Topology, TopologyError> {
    let doc: TopologyDoc = serde_json::from_str(json)
        .map_err(|e| TopologyError::MalformedTopology(e.to_string()))?;

    let mut nodes: BTreeMap<String, Node> = BTreeMap::new();
    for record in doc.nodes {
        let node_type = NodeType::from_tag(&record.nodeobj.nodetype).ok_or_else(|| {
            TopologyError::MalformedTopology(format!(
                "node '{}' has an unrecognized type tag '{}'",
                record.id, record.nodeobj.nodetype
            ))
        })?;
        let mut interfaces = Vec::new();
        for (ifname, encoded) in &record.nodeobj.interfaces {
            interfaces.push(Interface::from_encoded(ifname, encoded)?);
        }
        if nodes
            .insert(record.id.clone(), Node::from_interfaces(node_type, interfaces))
            .is_some()
        {
            return Err(TopologyError::MalformedTopology(format!(
                "node '{}' appears twice",
                record.id
            )));
        }
    }

    let mut links: BTreeMap<NodePair, Link> = BTreeMap::new();
    for record in doc.links {
        for endpoint in [&record.source, &record.target] {
            if !nodes.contains_key(endpoint) {
                return Err(TopologyError::MalformedTopology(format!(
                    "link {}-{} references the absent node '{}'",
                    record.source, record.target, endpoint
                )));
            }
        }
        let iface_for = |node: &str| {
            record.endpoints.get(node).cloned().ok_or_else(|| {
                TopologyError::MalformedTopology(format!(
                    "link {}-{} is missing the interface mapping for '{}'",
                    record.source, record.target, node
                ))
            })
        };
        let source_if = iface_for(&record.source)?;
        let target_if = iface_for(&record.target)?;
        let pair = NodePair::new(&record.source, &record.target);
        let link = Link::new(
            record.capacity,
            record.delay,
            record.label.clone(),
            (&record.source, &source_if),
            (&record.target, &target_if),
        );
        if links.insert(pair, link).is_some() {
            return Err(TopologyError::MalformedTopology(format!(
                "link {}-{} appears twice",
                record.source, record.target
            )));
        }
    }

    Ok(Topology::from_parts(doc.name, nodes, links))
}
