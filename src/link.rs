//! Undirected links and the unordered node pairs that key them.

use std::collections::BTreeMap;
use std::fmt;

/// An unordered pair of node names, stored lexicographically sorted.
///
/// Keys the topology's link map; the sort gives every traversal that
/// iterates links a single deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePair {
    first: String,
    second: String,
}

impl NodePair {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            NodePair {
                first: a.to_string(),
                second: b.to_string(),
            }
        } else {
            NodePair {
                first: b.to_string(),
                second: a.to_string(),
            }
        }
    }

    /// The lexicographically smaller endpoint
    pub fn first(&self) -> &str {
        &self.first
    }

    /// The lexicographically larger endpoint
    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, node: &str) -> bool {
        self.first == node || self.second == node
    }

    /// The endpoint opposite to `node`, if `node` is an endpoint
    pub fn other(&self, node: &str) -> Option<&str> {
        if self.first == node {
            Some(&self.second)
        } else if self.second == node {
            Some(&self.first)
        } else {
            None
        }
    }
}

impl fmt::Display for NodePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<->{}", self.first, self.second)
    }
}

/// Attributes of one undirected link between two distinct nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    capacity_bps: u64,
    delay_sec: f64,
    label: String,
    /// Endpoint node name -> local interface name; always exactly two entries
    endpoint_ifaces: BTreeMap<String, String>,
}

impl Link {
    pub fn new(
        capacity_bps: u64,
        delay_sec: f64,
        label: String,
        endpoint_a: (&str, &str),
        endpoint_b: (&str, &str),
    ) -> Self {
        let mut endpoint_ifaces = BTreeMap::new();
        endpoint_ifaces.insert(endpoint_a.0.to_string(), endpoint_a.1.to_string());
        endpoint_ifaces.insert(endpoint_b.0.to_string(), endpoint_b.1.to_string());
        Link {
            capacity_bps,
            delay_sec,
            label,
            endpoint_ifaces,
        }
    }

    /// Link capacity in bits per second
    pub fn capacity_bps(&self) -> u64 {
        self.capacity_bps
    }

    /// Link propagation delay in seconds
    pub fn delay_sec(&self) -> f64 {
        self.delay_sec
    }

    /// Human-readable display label, e.g. `"100 Mb/s 10 ms"`
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The local interface name at the given endpoint node
    pub fn interface_at(&self, node: &str) -> Option<&str> {
        self.endpoint_ifaces.get(node).map(String::as_str)
    }

    /// Endpoint node name -> local interface name mapping
    pub fn endpoint_ifaces(&self) -> &BTreeMap<String, String> {
        &self.endpoint_ifaces
    }

    /// Rename an endpoint node, keeping its interface assignment.
    ///
    /// Used when a topology prefixes its node labels.
    pub(crate) fn rename_endpoint(&mut self, old: &str, new: &str) {
        if let Some(ifname) = self.endpoint_ifaces.remove(old) {
            self.endpoint_ifaces.insert(new.to_string(), ifname);
        }
    }
}
