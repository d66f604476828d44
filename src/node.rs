//! Network devices: hosts, switches, and routers.
//!
//! A node is a flat record: a type tag plus an ordered map of named
//! interfaces. The three device kinds behave identically; the tag only
//! matters for serialization and for type-filtered queries (switches are
//! skipped during IP assignment, for example).

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use crate::addr::EthAddr;
use crate::error::TopologyError;
use crate::interface::Interface;

/// The closed set of device kinds a topology can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Host,
    Switch,
    Router,
}

impl NodeType {
    /// The tag used for this kind in serialized documents
    pub fn tag(&self) -> &'static str {
        match self {
            NodeType::Host => "Host",
            NodeType::Switch => "Switch",
            NodeType::Router => "Router",
        }
    }

    /// Map a serialized tag back to a kind; unknown tags are rejected by the
    /// codec with `MalformedTopology`.
    pub fn from_tag(tag: &str) -> Option<NodeType> {
        match tag {
            "Host" => Some(NodeType::Host),
            "Switch" => Some(NodeType::Switch),
            "Router" => Some(NodeType::Router),
            _ => None,
        }
    }
}

/// One device in a topology, owning its interfaces
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    node_type: NodeType,
    interfaces: BTreeMap<String, Interface>,
    next_ifnum: u64,
}

impl Node {
    /// Create a node of the given kind with no interfaces
    pub fn new(node_type: NodeType) -> Self {
        Node {
            node_type,
            interfaces: BTreeMap::new(),
            next_ifnum: 0,
        }
    }

    /// Rebuild a node from already-constructed interfaces.
    ///
    /// The interface-name counter resumes past the highest `eth<N>` present
    /// so that names allocated later never collide with deserialized ones.
    pub fn from_interfaces(node_type: NodeType, interfaces: Vec<Interface>) -> Self {
        let mut next_ifnum = 0;
        for intf in &interfaces {
            if let Some(num) = intf
                .name()
                .strip_prefix("eth")
                .and_then(|n| n.parse::<u64>().ok())
            {
                next_ifnum = next_ifnum.max(num + 1);
            }
        }
        let interfaces = interfaces
            .into_iter()
            .map(|intf| (intf.name().to_string(), intf))
            .collect();
        Node {
            node_type,
            interfaces,
            next_ifnum,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Allocate the next sequential `eth<N>` interface and return its name.
    ///
    /// Absent addresses take the documented defaults, so this never fails.
    pub fn add_interface(
        &mut self,
        eth_addr: Option<EthAddr>,
        ip_addr: Option<Ipv4Addr>,
        netmask: Option<Ipv4Addr>,
    ) -> String {
        let ifname = format!("eth{}", self.next_ifnum);
        self.next_ifnum += 1;
        let intf = Interface::new(&ifname, eth_addr, ip_addr, netmask);
        self.interfaces.insert(ifname.clone(), intf);
        ifname
    }

    /// Look up an interface by name
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.get(name)
    }

    pub fn interface_mut(&mut self, name: &str) -> Option<&mut Interface> {
        self.interfaces.get_mut(name)
    }

    /// All interfaces, keyed by name
    pub fn interfaces(&self) -> &BTreeMap<String, Interface> {
        &self.interfaces
    }

    /// Missing-interface error for this node, used by the topology layer
    pub(crate) fn interface_not_found(node_name: &str, ifname: &str) -> TopologyError {
        TopologyError::InterfaceNotFound {
            node: node_name.to_string(),
            interface: ifname.to_string(),
        }
    }
}
