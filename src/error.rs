//! Error taxonomy for topology construction and serialization.
//!
//! Every construction-time error is raised before any mutation takes place,
//! so a failed operation always leaves the topology in its prior valid state.

use crate::units::UnitError;

/// Errors that can occur while building, querying, or (de)serializing a topology
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyError {
    #[error("a node named '{0}' already exists")]
    DuplicateNode(String),

    #[error("a link between '{0}' and '{1}' already exists")]
    DuplicateLink(String, String),

    #[error("no node named '{0}' exists")]
    UnknownNode(String),

    #[error("no link exists between '{0}' and '{1}'")]
    UnknownLink(String, String),

    #[error("cannot link node '{0}' to itself")]
    SelfLink(String),

    #[error("node '{node}' has no interface named '{interface}'")]
    InterfaceNotFound { node: String, interface: String },

    #[error("subnet {subnet} has {usable} usable addresses but {needed} interfaces need one")]
    AddressSpaceExhausted {
        subnet: String,
        usable: u64,
        needed: u64,
    },

    #[error("node name '{0}' appears in both topologies; union requires disjoint names or rename")]
    NodeNameCollision(String),

    #[error("malformed topology document: {0}")]
    MalformedTopology(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid capacity or delay: {0}")]
    InvalidUnit(#[from] UnitError),
}
