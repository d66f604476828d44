//! A single logical interface on a network device.
//!
//! An interface has an immutable name, a 48-bit Ethernet MAC address, and
//! optionally a 32-bit IPv4 address and netmask. Unset fields take documented
//! defaults: the all-zero MAC, `0.0.0.0`, and `255.255.255.255`.

use std::fmt;
use std::net::Ipv4Addr;

use crate::addr::{parse_ipv4, EthAddr};
use crate::error::TopologyError;

/// Default IP for interfaces that have not been numbered yet
pub const UNNUMBERED_IP: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

/// Default netmask for interfaces that have not been numbered yet
pub const DEFAULT_NETMASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 255);

/// One named network port on a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    name: String,
    eth_addr: EthAddr,
    ip_addr: Ipv4Addr,
    netmask: Ipv4Addr,
}

impl Interface {
    /// Create an interface, substituting defaults for any absent address
    pub fn new(
        name: &str,
        eth_addr: Option<EthAddr>,
        ip_addr: Option<Ipv4Addr>,
        netmask: Option<Ipv4Addr>,
    ) -> Self {
        Interface {
            name: name.to_string(),
            eth_addr: eth_addr.unwrap_or_default(),
            ip_addr: ip_addr.unwrap_or(UNNUMBERED_IP),
            netmask: netmask.unwrap_or(DEFAULT_NETMASK),
        }
    }

    /// The interface name; immutable once created
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eth_addr(&self) -> EthAddr {
        self.eth_addr
    }

    pub fn ip_addr(&self) -> Ipv4Addr {
        self.ip_addr
    }

    pub fn netmask(&self) -> Ipv4Addr {
        self.netmask
    }

    pub fn set_eth_addr(&mut self, eth_addr: EthAddr) {
        self.eth_addr = eth_addr;
    }

    pub fn set_ip_addr(&mut self, ip_addr: Ipv4Addr) {
        self.ip_addr = ip_addr;
    }

    pub fn set_netmask(&mut self, netmask: Ipv4Addr) {
        self.netmask = netmask;
    }

    /// Parse and set the MAC address from its string form.
    ///
    /// Parsing is strict: malformed input fails with
    /// [`TopologyError::InvalidAddress`] and leaves the interface unchanged.
    pub fn set_eth_addr_str(&mut self, value: &str) -> Result<(), TopologyError> {
        self.eth_addr = value.parse()?;
        Ok(())
    }

    /// Parse and set the IPv4 address from its string form (strict)
    pub fn set_ip_addr_str(&mut self, value: &str) -> Result<(), TopologyError> {
        self.ip_addr = parse_ipv4(value)?;
        Ok(())
    }

    /// Parse and set the netmask from its string form (strict)
    pub fn set_netmask_str(&mut self, value: &str) -> Result<(), TopologyError> {
        self.netmask = parse_ipv4(value)?;
        Ok(())
    }

    /// Parse the serialized micro-format produced by `Display`:
    /// `"<name> mac:<mac>[ ip:<ip>/<mask>]"`.
    ///
    /// The name embedded in the string must match `name`; any shape mismatch
    /// fails with [`TopologyError::MalformedTopology`].
    pub fn from_encoded(name: &str, encoded: &str) -> Result<Self, TopologyError> {
        let malformed = |detail: &str| {
            TopologyError::MalformedTopology(format!(
                "interface '{}' has a bad encoding '{}': {}",
                name, encoded, detail
            ))
        };

        let mut parts = encoded.split_whitespace();
        let embedded_name = parts.next().ok_or_else(|| malformed("empty string"))?;
        if embedded_name != name {
            return Err(malformed("embedded name does not match the interface key"));
        }

        let mac_part = parts.next().ok_or_else(|| malformed("missing mac clause"))?;
        let mac_str = mac_part
            .strip_prefix("mac:")
            .ok_or_else(|| malformed("missing 'mac:' prefix"))?;
        let eth_addr: EthAddr = mac_str.parse()?;

        let mut ip_addr = None;
        let mut netmask = None;
        if let Some(ip_part) = parts.next() {
            let ip_str = ip_part
                .strip_prefix("ip:")
                .ok_or_else(|| malformed("missing 'ip:' prefix"))?;
            let (ip, mask) = ip_str
                .split_once('/')
                .ok_or_else(|| malformed("ip clause is not in ip/mask form"))?;
            ip_addr = Some(parse_ipv4(ip)?);
            netmask = Some(parse_ipv4(mask)?);
        }
        if parts.next().is_some() {
            return Err(malformed("trailing garbage"));
        }

        Ok(Interface::new(name, Some(eth_addr), ip_addr, netmask))
    }
}

impl fmt::Display for Interface {
    /// The serialized micro-format; the IP clause is omitted while the
    /// interface is unnumbered.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mac:{}", self.name, self.eth_addr)?;
        if self.ip_addr != UNNUMBERED_IP {
            write!(f, " ip:{}/{}", self.ip_addr, self.netmask)?;
        }
        Ok(())
    }
}
