//! The topology model: an undirected graph of named nodes and links.
//!
//! Node and link storage is a pair of adjacency maps (node name to [`Node`],
//! unordered [`NodePair`] to [`Link`]), so every traversal that depends on
//! order (serialization, IP assignment) walks the maps in lexicographic order
//! and is fully deterministic.
//!
//! Every mutating operation validates its inputs before touching any state:
//! a failed call leaves the topology exactly as it was.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::addr::{parse_ipv4, EthAddr, Ipv4Prefix};
use crate::error::TopologyError;
use crate::link::{Link, NodePair};
use crate::node::{Node, NodeType};
use crate::units::{humanize_capacity, humanize_delay, unhumanize_capacity, unhumanize_delay};

/// Subnet used by `assign_ip_addresses` when no prefix is given
const DEFAULT_ASSIGNMENT_PREFIX: &str = "10.0.0.0/8";

/// An undirected network topology of hosts, switches, and routers
#[derive(Debug, Clone)]
pub struct Topology {
    name: String,
    nodes: BTreeMap<String, Node>,
    links: BTreeMap<NodePair, Link>,
    next_host_num: u64,
    next_switch_num: u64,
    next_router_num: u64,
    auto_macs: bool,
    next_mac_index: u64,
}

impl Topology {
    /// Create an empty topology with sequential auto-MAC assignment enabled
    pub fn new(name: &str) -> Self {
        Self::with_auto_macs(name, true)
    }

    /// Create an empty topology, choosing whether links assign MACs
    /// automatically. With auto-MACs disabled, link endpoints keep the
    /// all-zero MAC until set explicitly.
    pub fn with_auto_macs(name: &str, auto_macs: bool) -> Self {
        Topology {
            name: name.to_string(),
            nodes: BTreeMap::new(),
            links: BTreeMap::new(),
            next_host_num: 0,
            next_switch_num: 0,
            next_router_num: 0,
            auto_macs,
            next_mac_index: 1,
        }
    }

    /// Rebuild a topology from deserialized parts.
    ///
    /// The auto-MAC counter resumes past the highest MAC present so links
    /// added after a load still get globally unique addresses.
    pub(crate) fn from_parts(
        name: String,
        nodes: BTreeMap<String, Node>,
        links: BTreeMap<NodePair, Link>,
    ) -> Self {
        let highest_mac = nodes
            .values()
            .flat_map(|node| node.interfaces().values())
            .map(|intf| intf.eth_addr().as_index())
            .max()
            .unwrap_or(0);
        Topology {
            name,
            nodes,
            links,
            next_host_num: 0,
            next_switch_num: 0,
            next_router_num: 0,
            auto_macs: true,
            next_mac_index: highest_mac + 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Whether links assign sequential MACs to their endpoint interfaces
    pub fn auto_macs(&self) -> bool {
        self.auto_macs
    }

    /// All nodes, keyed by name
    pub fn nodes(&self) -> &BTreeMap<String, Node> {
        &self.nodes
    }

    /// All links, keyed by sorted endpoint pair
    pub fn links(&self) -> &BTreeMap<NodePair, Link> {
        &self.links
    }

    /// All node names in lexicographic order
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    fn names_of_type(&self, node_type: NodeType) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.node_type() == node_type)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Names of all host nodes
    pub fn hosts(&self) -> Vec<String> {
        self.names_of_type(NodeType::Host)
    }

    /// Names of all switch nodes
    pub fn switches(&self) -> Vec<String> {
        self.names_of_type(NodeType::Switch)
    }

    /// Names of all router nodes
    pub fn routers(&self) -> Vec<String> {
        self.names_of_type(NodeType::Router)
    }

    /// Look up a node by name
    pub fn node(&self, name: &str) -> Result<&Node, TopologyError> {
        self.nodes
            .get(name)
            .ok_or_else(|| TopologyError::UnknownNode(name.to_string()))
    }

    fn node_mut(&mut self, name: &str) -> Result<&mut Node, TopologyError> {
        self.nodes
            .get_mut(name)
            .ok_or_else(|| TopologyError::UnknownNode(name.to_string()))
    }

    fn add_node(&mut self, name: &str, node_type: NodeType) -> Result<(), TopologyError> {
        if self.nodes.contains_key(name) {
            return Err(TopologyError::DuplicateNode(name.to_string()));
        }
        self.nodes.insert(name.to_string(), Node::new(node_type));
        log::debug!("added {} node '{}'", node_type.tag(), name);
        Ok(())
    }

    /// Generate the next unused auto-name for a node kind. The counter
    /// advances even when it skips an occupied name, so auto-names are
    /// never reused.
    fn next_auto_name(counter: &mut u64, prefix: &str, nodes: &BTreeMap<String, Node>) -> String {
        loop {
            let candidate = format!("{}{}", prefix, *counter);
            *counter += 1;
            if !nodes.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Add a host, auto-naming it `h<N>` when no name is given
    pub fn add_host(&mut self, name: Option<&str>) -> Result<String, TopologyError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => Self::next_auto_name(&mut self.next_host_num, "h", &self.nodes),
        };
        self.add_node(&name, NodeType::Host)?;
        Ok(name)
    }

    /// Add a switch, auto-naming it `s<N>` when no name is given
    pub fn add_switch(&mut self, name: Option<&str>) -> Result<String, TopologyError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => Self::next_auto_name(&mut self.next_switch_num, "s", &self.nodes),
        };
        self.add_node(&name, NodeType::Switch)?;
        Ok(name)
    }

    /// Add a router, auto-naming it `r<N>` when no name is given
    pub fn add_router(&mut self, name: Option<&str>) -> Result<String, TopologyError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => Self::next_auto_name(&mut self.next_router_num, "r", &self.nodes),
        };
        self.add_node(&name, NodeType::Router)?;
        Ok(name)
    }

    /// Add a bidirectional link between two existing, distinct nodes.
    ///
    /// `capacity` and `delay` are human-readable strings ("100mbps", "10ms")
    /// parsed into canonical bits-per-second and seconds; the humanized forms
    /// become the link's display label. Exactly one new interface is created
    /// on each endpoint, with sequential globally unique MACs when auto-MAC
    /// assignment is enabled.
    pub fn add_link(
        &mut self,
        node_a: &str,
        node_b: &str,
        capacity: &str,
        delay: &str,
    ) -> Result<(), TopologyError> {
        if node_a == node_b {
            return Err(TopologyError::SelfLink(node_a.to_string()));
        }
        for name in [node_a, node_b] {
            if !self.nodes.contains_key(name) {
                return Err(TopologyError::UnknownNode(name.to_string()));
            }
        }
        let pair = NodePair::new(node_a, node_b);
        if self.links.contains_key(&pair) {
            return Err(TopologyError::DuplicateLink(
                node_a.to_string(),
                node_b.to_string(),
            ));
        }
        let capacity_bps = unhumanize_capacity(capacity)?;
        let delay_sec = unhumanize_delay(delay)?;

        // All validation has passed; mutation starts here.
        let (mac_a, mac_b) = if self.auto_macs {
            (Some(self.next_auto_mac()), Some(self.next_auto_mac()))
        } else {
            (None, None)
        };
        let ifname_a = self
            .node_mut(node_a)
            .map(|node| node.add_interface(mac_a, None, None))?;
        let ifname_b = self
            .node_mut(node_b)
            .map(|node| node.add_interface(mac_b, None, None))?;

        let label = format!(
            "{} {}",
            humanize_capacity(capacity_bps),
            humanize_delay(delay_sec)
        );
        log::debug!(
            "linking {}:{} <-> {}:{} ({})",
            node_a,
            ifname_a,
            node_b,
            ifname_b,
            label
        );
        self.links.insert(
            pair,
            Link::new(
                capacity_bps,
                delay_sec,
                label,
                (node_a, &ifname_a),
                (node_b, &ifname_b),
            ),
        );
        Ok(())
    }

    fn next_auto_mac(&mut self) -> EthAddr {
        let mac = EthAddr::from_index(self.next_mac_index);
        self.next_mac_index += 1;
        mac
    }

    /// Look up the link between two nodes; symmetric in its arguments
    pub fn link(&self, node_a: &str, node_b: &str) -> Result<&Link, TopologyError> {
        for name in [node_a, node_b] {
            if !self.nodes.contains_key(name) {
                return Err(TopologyError::UnknownNode(name.to_string()));
            }
        }
        self.links
            .get(&NodePair::new(node_a, node_b))
            .ok_or_else(|| TopologyError::UnknownLink(node_a.to_string(), node_b.to_string()))
    }

    /// The interface names at each end of a link, in argument order
    pub fn link_interfaces(
        &self,
        node_a: &str,
        node_b: &str,
    ) -> Result<(String, String), TopologyError> {
        let link = self.link(node_a, node_b)?;
        let ifname = |node: &str| {
            link.interface_at(node)
                .map(str::to_string)
                .ok_or_else(|| TopologyError::UnknownLink(node_a.to_string(), node_b.to_string()))
        };
        Ok((ifname(node_a)?, ifname(node_b)?))
    }

    /// Names of all nodes sharing a link with `node`
    pub fn neighbors(&self, node: &str) -> Result<Vec<String>, TopologyError> {
        self.node(node)?;
        Ok(self
            .links
            .keys()
            .filter_map(|pair| pair.other(node))
            .map(str::to_string)
            .collect())
    }

    /// The endpoint pairs of all links incident to `node`
    pub fn links_from(&self, node: &str) -> Result<Vec<NodePair>, TopologyError> {
        self.node(node)?;
        Ok(self
            .links
            .keys()
            .filter(|pair| pair.contains(node))
            .cloned()
            .collect())
    }

    /// Set any of MAC, IP, and netmask on one interface.
    ///
    /// All given strings are parsed strictly before anything is applied, so a
    /// malformed value fails with `InvalidAddress` without a partial update.
    pub fn set_interface_addresses(
        &mut self,
        node: &str,
        interface: &str,
        mac: Option<&str>,
        ip: Option<&str>,
        netmask: Option<&str>,
    ) -> Result<(), TopologyError> {
        let mac: Option<EthAddr> = mac.map(EthAddr::from_str).transpose()?;
        let ip: Option<Ipv4Addr> = ip.map(parse_ipv4).transpose()?;
        let netmask: Option<Ipv4Addr> = netmask.map(parse_ipv4).transpose()?;

        let node_name = node;
        let node = self.node_mut(node)?;
        let intf = node
            .interface_mut(interface)
            .ok_or_else(|| Node::interface_not_found(node_name, interface))?;
        if let Some(mac) = mac {
            intf.set_eth_addr(mac);
        }
        if let Some(ip) = ip {
            intf.set_ip_addr(ip);
        }
        if let Some(netmask) = netmask {
            intf.set_netmask(netmask);
        }
        Ok(())
    }

    /// The MAC, IP, and netmask assigned to one interface
    pub fn interface_addresses(
        &self,
        node: &str,
        interface: &str,
    ) -> Result<(EthAddr, Ipv4Addr, Ipv4Addr), TopologyError> {
        let intf = self
            .node(node)?
            .interface(interface)
            .ok_or_else(|| Node::interface_not_found(node, interface))?;
        Ok((intf.eth_addr(), intf.ip_addr(), intf.netmask()))
    }

    /// Assign one IPv4 address per link interface on every host and router.
    ///
    /// Addresses are the usable hosts of `prefix` (default `10.0.0.0/8`) in
    /// increasing order; links are visited in sorted endpoint-pair order and
    /// the two endpoints of each link in pair order, so assignment is fully
    /// deterministic. Switch interfaces are never numbered.
    ///
    /// Fails with `AddressSpaceExhausted` before assigning anything if the
    /// subnet is too small.
    pub fn assign_ip_addresses(&mut self, prefix: Option<&str>) -> Result<(), TopologyError> {
        let prefix: Ipv4Prefix = prefix.unwrap_or(DEFAULT_ASSIGNMENT_PREFIX).parse()?;

        // Collect the interfaces to number, in assignment order
        let mut targets: Vec<(String, String)> = Vec::new();
        for (pair, link) in &self.links {
            for endpoint in [pair.first(), pair.second()] {
                let node = self.node(endpoint)?;
                if matches!(node.node_type(), NodeType::Host | NodeType::Router) {
                    let ifname = link.interface_at(endpoint).ok_or_else(|| {
                        TopologyError::UnknownLink(
                            pair.first().to_string(),
                            pair.second().to_string(),
                        )
                    })?;
                    targets.push((endpoint.to_string(), ifname.to_string()));
                }
            }
        }

        if targets.len() as u64 > prefix.usable_hosts() {
            return Err(TopologyError::AddressSpaceExhausted {
                subnet: prefix.to_string(),
                usable: prefix.usable_hosts(),
                needed: targets.len() as u64,
            });
        }

        let netmask = prefix.netmask();
        let assigned = targets.len();
        let mut addresses = prefix.hosts();
        for (node_name, ifname) in targets {
            // The iterator cannot run dry: the count was checked above
            let Some(address) = addresses.next() else {
                break;
            };
            let node = self.node_mut(&node_name)?;
            let intf = node
                .interface_mut(&ifname)
                .ok_or_else(|| Node::interface_not_found(&node_name, &ifname))?;
            intf.set_ip_addr(address);
            intf.set_netmask(netmask);
            log::debug!("assigned {}/{} to {}:{}", address, netmask, node_name, ifname);
        }
        log::info!("assigned {} addresses from {}", assigned, prefix);
        Ok(())
    }

    /// Rename every node `x` to `<prefix>_x` in place, updating link
    /// endpoint-interface mappings to match. The prefix defaults to the
    /// topology's own name. Used to make node names unique before
    /// composing topologies.
    pub fn add_node_label_prefix(&mut self, prefix: Option<&str>) {
        let prefix = prefix.unwrap_or(&self.name).to_string();

        let nodes = std::mem::take(&mut self.nodes);
        self.nodes = nodes
            .into_iter()
            .map(|(name, node)| (format!("{}_{}", prefix, name), node))
            .collect();

        let links = std::mem::take(&mut self.links);
        self.links = links
            .into_iter()
            .map(|(pair, mut link)| {
                let new_first = format!("{}_{}", prefix, pair.first());
                let new_second = format!("{}_{}", prefix, pair.second());
                link.rename_endpoint(pair.first(), &new_first);
                link.rename_endpoint(pair.second(), &new_second);
                (NodePair::new(&new_first, &new_second), link)
            })
            .collect();
    }

    /// Like [`add_node_label_prefix`](Self::add_node_label_prefix) but returns
    /// an independent renamed copy, leaving `self` untouched
    pub fn with_node_label_prefix(&self, prefix: Option<&str>) -> Topology {
        let mut copy = self.clone();
        copy.add_node_label_prefix(prefix);
        copy
    }

    /// Produce a new topology containing the disjoint union of both node and
    /// link sets. Neither input is ever modified.
    ///
    /// With `rename` set, both sides are first relabeled with their own
    /// topology name as a prefix (node `h1` of topology `A` becomes `A_h1`).
    /// Without it, any node name present on both sides fails with
    /// `NodeNameCollision`. The result is named `"<self>_<other>"`.
    pub fn union(&self, other: &Topology, rename: bool) -> Result<Topology, TopologyError> {
        let (left, right) = if rename {
            (
                self.with_node_label_prefix(None),
                other.with_node_label_prefix(None),
            )
        } else {
            (self.clone(), other.clone())
        };

        for name in right.nodes.keys() {
            if left.nodes.contains_key(name) {
                return Err(TopologyError::NodeNameCollision(name.clone()));
            }
        }

        let mut merged = Topology::with_auto_macs(
            &format!("{}_{}", self.name, other.name),
            self.auto_macs,
        );
        merged.next_mac_index = left.next_mac_index.max(right.next_mac_index);
        merged.nodes = left.nodes;
        merged.links = left.links;
        merged.nodes.extend(right.nodes);
        merged.links.extend(right.links);
        log::debug!(
            "unioned '{}' and '{}' into '{}' ({} nodes, {} links)",
            self.name,
            other.name,
            merged.name,
            merged.nodes.len(),
            merged.links.len()
        );
        Ok(merged)
    }

    /// Serialize to the node-link JSON document format
    pub fn serialize(&self) -> Result<String, TopologyError> {
        crate::codec::serialize(self)
    }

    /// Rebuild a topology from its node-link JSON document form
    pub fn deserialize(json: &str) -> Result<Topology, TopologyError> {
        crate::codec::deserialize(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_hosts_one_switch() -> Topology {
        let mut topo = Topology::new("pair");
        topo.add_host(None).unwrap();
        topo.add_host(None).unwrap();
        topo.add_switch(None).unwrap();
        topo.add_link("h0", "s0", "100mbps", "10ms").unwrap();
        topo.add_link("h1", "s0", "100mbps", "10ms").unwrap();
        topo
    }

    #[test]
    fn test_auto_names_are_sequential_per_type() {
        let mut topo = Topology::new("t");
        assert_eq!(topo.add_host(None).unwrap(), "h0");
        assert_eq!(topo.add_host(None).unwrap(), "h1");
        assert_eq!(topo.add_switch(None).unwrap(), "s0");
        assert_eq!(topo.add_router(None).unwrap(), "r0");
        assert_eq!(topo.add_router(None).unwrap(), "r1");
    }

    #[test]
    fn test_auto_names_skip_explicit_names() {
        let mut topo = Topology::new("t");
        topo.add_host(Some("h0")).unwrap();
        // The generator must not collide with the explicitly added h0
        assert_eq!(topo.add_host(None).unwrap(), "h1");
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut topo = Topology::new("t");
        topo.add_host(Some("a")).unwrap();
        assert_eq!(
            topo.add_switch(Some("a")),
            Err(TopologyError::DuplicateNode("a".to_string()))
        );
        // The failed add must not have replaced the host
        assert_eq!(topo.hosts(), vec!["a".to_string()]);
    }

    #[test]
    fn test_type_filters() {
        let topo = two_hosts_one_switch();
        assert_eq!(topo.hosts(), vec!["h0".to_string(), "h1".to_string()]);
        assert_eq!(topo.switches(), vec!["s0".to_string()]);
        assert!(topo.routers().is_empty());
    }

    #[test]
    fn test_add_link_creates_one_interface_per_endpoint() {
        let topo = two_hosts_one_switch();
        assert_eq!(topo.node("h0").unwrap().interfaces().len(), 1);
        assert_eq!(topo.node("h1").unwrap().interfaces().len(), 1);
        assert_eq!(topo.node("s0").unwrap().interfaces().len(), 2);
    }

    #[test]
    fn test_link_lookup_is_symmetric() {
        let topo = two_hosts_one_switch();
        let forward = topo.link("h0", "s0").unwrap();
        let reverse = topo.link("s0", "h0").unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(forward.capacity_bps(), 100_000_000);
        assert!((forward.delay_sec() - 0.010).abs() < 1e-12);
        assert_eq!(forward.label(), "100 Mb/s 10 ms");
    }

    #[test]
    fn test_link_errors() {
        let mut topo = two_hosts_one_switch();
        assert_eq!(
            topo.add_link("h0", "s0", "1mbps", "1ms"),
            Err(TopologyError::DuplicateLink("h0".to_string(), "s0".to_string()))
        );
        assert_eq!(
            topo.add_link("h0", "h9", "1mbps", "1ms"),
            Err(TopologyError::UnknownNode("h9".to_string()))
        );
        assert_eq!(
            topo.add_link("h0", "h0", "1mbps", "1ms"),
            Err(TopologyError::SelfLink("h0".to_string()))
        );
        assert!(matches!(
            topo.add_link("h0", "h1", "very fast", "1ms"),
            Err(TopologyError::InvalidUnit(_))
        ));
        // The failed adds must not have created interfaces
        assert_eq!(topo.node("h0").unwrap().interfaces().len(), 1);
        assert!(topo.link("h0", "h1").is_err());
    }

    #[test]
    fn test_link_interfaces_in_argument_order() {
        let topo = two_hosts_one_switch();
        let (at_h0, at_s0) = topo.link_interfaces("h0", "s0").unwrap();
        assert_eq!(at_h0, "eth0");
        assert_eq!(at_s0, "eth0");
        let (at_s0, at_h1) = topo.link_interfaces("s0", "h1").unwrap();
        assert_eq!(at_s0, "eth1");
        assert_eq!(at_h1, "eth0");
    }

    #[test]
    fn test_neighbors() {
        let topo = two_hosts_one_switch();
        assert_eq!(topo.neighbors("s0").unwrap(), vec!["h0", "h1"]);
        assert_eq!(topo.neighbors("h0").unwrap(), vec!["s0"]);
        assert!(topo.neighbors("h9").is_err());
        assert_eq!(topo.links_from("s0").unwrap().len(), 2);
    }

    #[test]
    fn test_auto_macs_are_sequential_and_unique() {
        let topo = two_hosts_one_switch();
        let mut macs: Vec<EthAddr> = topo
            .nodes()
            .values()
            .flat_map(|node| node.interfaces().values())
            .map(|intf| intf.eth_addr())
            .collect();
        macs.sort();
        let indexes: Vec<u64> = macs.iter().map(EthAddr::as_index).collect();
        assert_eq!(indexes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_auto_macs_disabled_leaves_zero_macs() {
        let mut topo = Topology::with_auto_macs("quiet", false);
        topo.add_host(None).unwrap();
        topo.add_switch(None).unwrap();
        topo.add_link("h0", "s0", "1gbps", "1ms").unwrap();
        let (mac, _, _) = topo.interface_addresses("h0", "eth0").unwrap();
        assert!(mac.is_zero());
    }

    #[test]
    fn test_interface_address_overrides() {
        let mut topo = two_hosts_one_switch();
        topo.set_interface_addresses(
            "h0",
            "eth0",
            Some("de:ad:be:ef:00:01"),
            Some("172.16.0.2"),
            Some("255.255.0.0"),
        )
        .unwrap();
        let (mac, ip, mask) = topo.interface_addresses("h0", "eth0").unwrap();
        assert_eq!(mac.to_string(), "de:ad:be:ef:00:01");
        assert_eq!(ip.to_string(), "172.16.0.2");
        assert_eq!(mask.to_string(), "255.255.0.0");

        assert!(matches!(
            topo.set_interface_addresses("h9", "eth0", None, None, None),
            Err(TopologyError::UnknownNode(_))
        ));
        assert!(matches!(
            topo.set_interface_addresses("h0", "eth9", None, None, None),
            Err(TopologyError::InterfaceNotFound { .. })
        ));
        // A malformed address must not apply the valid ones
        assert!(topo
            .set_interface_addresses("h0", "eth0", None, Some("10.0.0.9"), Some("garbage"))
            .is_err());
        let (_, ip, _) = topo.interface_addresses("h0", "eth0").unwrap();
        assert_eq!(ip.to_string(), "172.16.0.2");
    }

    #[test]
    fn test_assign_ip_addresses_in_link_order() {
        let mut topo = two_hosts_one_switch();
        topo.assign_ip_addresses(Some("192.168.1.0/24")).unwrap();

        // Links sort as (h0,s0), (h1,s0); h0 then h1 get the first addresses
        let (_, ip_h0, mask_h0) = topo.interface_addresses("h0", "eth0").unwrap();
        assert_eq!(ip_h0.to_string(), "192.168.1.1");
        assert_eq!(mask_h0.to_string(), "255.255.255.0");
        let (_, ip_h1, _) = topo.interface_addresses("h1", "eth0").unwrap();
        assert_eq!(ip_h1.to_string(), "192.168.1.2");

        // Switch interfaces stay unnumbered
        for ifname in ["eth0", "eth1"] {
            let (_, ip, _) = topo.interface_addresses("s0", ifname).unwrap();
            assert_eq!(ip.to_string(), "0.0.0.0");
        }
    }

    #[test]
    fn test_assign_ip_addresses_includes_routers() {
        let mut topo = Topology::new("routed");
        topo.add_router(None).unwrap();
        topo.add_router(None).unwrap();
        topo.add_link("r0", "r1", "1gbps", "5ms").unwrap();
        topo.assign_ip_addresses(Some("10.1.0.0/30")).unwrap();
        let (_, ip_r0, _) = topo.interface_addresses("r0", "eth0").unwrap();
        let (_, ip_r1, _) = topo.interface_addresses("r1", "eth0").unwrap();
        assert_eq!(ip_r0.to_string(), "10.1.0.1");
        assert_eq!(ip_r1.to_string(), "10.1.0.2");
    }

    #[test]
    fn test_assign_ip_addresses_exhaustion() {
        let mut topo = Topology::new("crowded");
        for _ in 0..3 {
            topo.add_host(None).unwrap();
        }
        topo.add_switch(None).unwrap();
        for host in ["h0", "h1", "h2"] {
            topo.add_link(host, "s0", "10mbps", "1ms").unwrap();
        }
        // Three host interfaces need addresses but a /30 only has two
        let result = topo.assign_ip_addresses(Some("10.0.0.0/30"));
        assert!(matches!(
            result,
            Err(TopologyError::AddressSpaceExhausted { usable: 2, needed: 3, .. })
        ));
        // Nothing may have been assigned
        let (_, ip, _) = topo.interface_addresses("h0", "eth0").unwrap();
        assert_eq!(ip.to_string(), "0.0.0.0");
    }

    #[test]
    fn test_label_prefix_in_place() {
        let mut topo = two_hosts_one_switch();
        topo.add_node_label_prefix(None);
        assert_eq!(
            topo.node_names(),
            vec!["pair_h0", "pair_h1", "pair_s0"]
        );
        let link = topo.link("pair_h0", "pair_s0").unwrap();
        assert_eq!(link.interface_at("pair_h0"), Some("eth0"));
        assert_eq!(link.interface_at("h0"), None);
    }

    #[test]
    fn test_label_prefix_copy_leaves_original() {
        let topo = two_hosts_one_switch();
        let renamed = topo.with_node_label_prefix(Some("left"));
        assert_eq!(topo.node_names(), vec!["h0", "h1", "s0"]);
        assert_eq!(renamed.node_names(), vec!["left_h0", "left_h1", "left_s0"]);
    }

    #[test]
    fn test_union_disjoint() {
        let mut left = Topology::new("left");
        left.add_host(None).unwrap();
        left.add_switch(None).unwrap();
        left.add_link("h0", "s0", "1mbps", "1ms").unwrap();

        let mut right = Topology::new("right");
        right.add_host(Some("hx")).unwrap();
        right.add_router(Some("rx")).unwrap();
        right.add_link("hx", "rx", "2mbps", "2ms").unwrap();

        let merged = left.union(&right, false).unwrap();
        assert_eq!(merged.name(), "left_right");
        assert_eq!(merged.nodes().len(), 4);
        assert_eq!(merged.links().len(), 2);
        assert!(merged.link("hx", "rx").is_ok());
    }

    #[test]
    fn test_union_collision() {
        let mut left = Topology::new("left");
        left.add_host(None).unwrap();
        let mut right = Topology::new("right");
        right.add_host(None).unwrap();
        match left.union(&right, false) {
            Err(TopologyError::NodeNameCollision(name)) => assert_eq!(name, "h0"),
            other => panic!("expected a name collision, got {:?}", other),
        }
    }

    #[test]
    fn test_union_rename_never_mutates_inputs() {
        let mut left = Topology::new("left");
        left.add_host(None).unwrap();
        let mut right = Topology::new("right");
        right.add_host(None).unwrap();

        let merged = left.union(&right, true).unwrap();
        assert_eq!(merged.node_names(), vec!["left_h0", "right_h0"]);
        // Both inputs keep their original names
        assert_eq!(left.node_names(), vec!["h0"]);
        assert_eq!(right.node_names(), vec!["h0"]);
    }

    #[test]
    fn test_union_keeps_macs_unique() {
        let mut left = Topology::new("left");
        left.add_host(None).unwrap();
        left.add_switch(None).unwrap();
        left.add_link("h0", "s0", "1mbps", "1ms").unwrap();
        let right = Topology::new("right");

        let mut merged = left.union(&right, true).unwrap();
        merged.add_host(Some("fresh")).unwrap();
        merged
            .add_link("fresh", "left_s0", "1mbps", "1ms")
            .unwrap();

        let mut indexes: Vec<u64> = merged
            .nodes()
            .values()
            .flat_map(|node| node.interfaces().values())
            .map(|intf| intf.eth_addr().as_index())
            .collect();
        indexes.sort();
        indexes.dedup();
        // Two interfaces from the original link plus two new ones, no reuse
        assert_eq!(indexes.len(), 4);
    }
}
