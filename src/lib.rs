//! # Topobuild - Builder and JSON codec for small simulated network topologies
//!
//! This library models a small computer-network topology: nodes (hosts,
//! switches, routers), their named interfaces with MAC/IPv4 addressing, and
//! undirected links carrying capacity and delay attributes. Topologies
//! round-trip through a deterministic node-link JSON format that simulators,
//! visualizers, and graders consume.
//!
//! ## Overview
//!
//! Callers build a [`topology::Topology`] by adding nodes and then links;
//! each link creates one interface on each endpoint and, by default, assigns
//! sequential globally unique MAC addresses. `assign_ip_addresses` numbers
//! every host and router interface from an IPv4 prefix in a deterministic
//! order. The whole structure serializes to JSON and deserializes back into
//! an equivalent topology.
//!
//! ## Architecture
//!
//! - `addr`: MAC address and IPv4 prefix primitives
//! - `units`: capacity/delay string parsing and humanizing
//! - `interface`: the per-port addressing record
//! - `node`: device kinds and interface ownership
//! - `link`: unordered node pairs and link attributes
//! - `topology`: the graph model and its construction API
//! - `codec`: the node-link JSON document format
//! - `io`: whole-file load and save
//! - `dot`: Graphviz DOT export for external renderers
//!
//! ## Example
//!
//! ```rust
//! use topobuild::topology::Topology;
//!
//! let mut topo = Topology::new("demo");
//! let h0 = topo.add_host(None)?;
//! let s0 = topo.add_switch(None)?;
//! topo.add_link(&h0, &s0, "100mbps", "10ms")?;
//! topo.assign_ip_addresses(Some("192.168.1.0/24"))?;
//!
//! let json = topo.serialize()?;
//! let restored = topobuild::topology::Topology::deserialize(&json)?;
//! assert_eq!(restored.serialize()?, json);
//! # Ok::<(), topobuild::error::TopologyError>(())
//! ```
//!
//! ## Error Handling
//!
//! Construction and codec errors use the typed [`error::TopologyError`];
//! every failed operation leaves the topology in its prior valid state.
//! File I/O uses `color_eyre` for contextual reports.

pub mod addr;
pub mod codec;
pub mod dot;
pub mod error;
pub mod interface;
pub mod io;
pub mod link;
pub mod node;
pub mod topology;
pub mod units;

pub use error::TopologyError;
pub use topology::Topology;
