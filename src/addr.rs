//! Hardware and IPv4 addressing primitives.
//!
//! This module provides the 48-bit MAC address type used by interfaces and a
//! small IPv4 prefix type used for sequential address assignment. Host IPv4
//! addresses themselves are plain `std::net::Ipv4Addr`.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::TopologyError;

/// A 48-bit Ethernet MAC address.
///
/// The default value is the all-zero MAC, which the topology model treats as
/// "not yet assigned".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EthAddr([u8; 6]);

impl EthAddr {
    /// The all-zero MAC address
    pub fn zero() -> Self {
        EthAddr([0; 6])
    }

    /// Build a MAC address from the low 48 bits of a counter value.
    ///
    /// Used for sequential auto-MAC assignment: index 1 maps to
    /// `00:00:00:00:00:01`, index 256 to `00:00:00:00:01:00`, and so on.
    pub fn from_index(index: u64) -> Self {
        let bytes = index.to_be_bytes();
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&bytes[2..8]);
        EthAddr(mac)
    }

    /// The MAC address as a 48-bit integer
    pub fn as_index(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes[2..8].copy_from_slice(&self.0);
        u64::from_be_bytes(bytes)
    }

    /// Returns true if this is the all-zero (unassigned) MAC
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }

    /// The raw octets of the address
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for EthAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for EthAddr {
    type Err = TopologyError;

    /// Parse a colon-separated MAC address such as `de:ad:be:ef:00:01`.
    ///
    /// Parsing is strict: exactly six colon-separated hex octets are required.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(TopologyError::InvalidAddress(format!(
                "'{}' is not a colon-separated 48-bit MAC address",
                s
            )));
        }
        let mut mac = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            mac[i] = u8::from_str_radix(part, 16).map_err(|_| {
                TopologyError::InvalidAddress(format!("'{}' has a non-hex octet '{}'", s, part))
            })?;
        }
        Ok(EthAddr(mac))
    }
}

/// Parse an IPv4 address, mapping failures to [`TopologyError::InvalidAddress`]
pub fn parse_ipv4(s: &str) -> Result<Ipv4Addr, TopologyError> {
    s.parse::<Ipv4Addr>()
        .map_err(|_| TopologyError::InvalidAddress(format!("'{}' is not an IPv4 address", s)))
}

/// An IPv4 network prefix, e.g. `192.168.1.0/24`.
///
/// Host bits in the given address are masked off rather than rejected, so
/// `10.1.2.3/8` denotes the same prefix as `10.0.0.0/8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Prefix {
    network: Ipv4Addr,
    prefix_len: u8,
}

impl Ipv4Prefix {
    /// Construct a prefix from an address and a prefix length (0-32)
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<Self, TopologyError> {
        if prefix_len > 32 {
            return Err(TopologyError::InvalidAddress(format!(
                "prefix length /{} is out of range",
                prefix_len
            )));
        }
        let masked = u32::from(addr) & Self::mask_bits(prefix_len);
        Ok(Ipv4Prefix {
            network: Ipv4Addr::from(masked),
            prefix_len,
        })
    }

    fn mask_bits(prefix_len: u8) -> u32 {
        if prefix_len == 0 {
            0
        } else {
            u32::MAX << (32 - prefix_len)
        }
    }

    /// The network address of the prefix
    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    /// The prefix length
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// The netmask corresponding to the prefix length
    pub fn netmask(&self) -> Ipv4Addr {
        Ipv4Addr::from(Self::mask_bits(self.prefix_len))
    }

    /// Number of usable host addresses in the prefix.
    ///
    /// Network and broadcast addresses are excluded for prefixes of /30 and
    /// shorter; /31 yields both addresses and /32 yields the single address.
    pub fn usable_hosts(&self) -> u64 {
        match self.prefix_len {
            32 => 1,
            31 => 2,
            len => (1u64 << (32 - len)) - 2,
        }
    }

    /// Iterate the usable host addresses in increasing order
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> {
        let base = u32::from(self.network) as u64;
        let (start, count) = match self.prefix_len {
            31 | 32 => (base, self.usable_hosts()),
            _ => (base + 1, self.usable_hosts()),
        };
        (start..start + count).map(|value| Ipv4Addr::from(value as u32))
    }
}

impl fmt::Display for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

impl FromStr for Ipv4Prefix {
    type Err = TopologyError;

    /// Parse a prefix in `a.b.c.d/len` form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_part, len_part) = s.split_once('/').ok_or_else(|| {
            TopologyError::InvalidAddress(format!("'{}' is not in address/length form", s))
        })?;
        let addr = parse_ipv4(addr_part.trim())?;
        let prefix_len = len_part.trim().parse::<u8>().map_err(|_| {
            TopologyError::InvalidAddress(format!("'{}' has an invalid prefix length", s))
        })?;
        Ipv4Prefix::new(addr, prefix_len)
    }
}
