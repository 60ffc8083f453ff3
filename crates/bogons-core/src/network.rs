//! Network ranges and address families
//!
//! The family of a range is decided from the parsed address variant, never
//! from its printed form: `::ffff:10.0.0.0/104` prints with dots but is an
//! IPv6 network.

use ipnet::IpNet;
use std::fmt;
use std::str::FromStr;

/// Address family of a feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Name of the nftables definition holding this family's ranges
    pub fn definition_name(self) -> &'static str {
        match self {
            Family::V4 => "IPV4_BOGONS",
            Family::V6 => "IPV6_BOGONS",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => f.write_str("IPv4"),
            Family::V6 => f.write_str("IPv6"),
        }
    }
}

/// A CIDR block, stored as its network address and prefix length
///
/// Host bits present in the parsed literal are cleared, so `10.1.2.3/8`
/// becomes `10.0.0.0/8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkRange(IpNet);

impl NetworkRange {
    /// Address family of this range
    pub fn family(&self) -> Family {
        match self.0 {
            IpNet::V4(_) => Family::V4,
            IpNet::V6(_) => Family::V6,
        }
    }
}

impl From<IpNet> for NetworkRange {
    fn from(net: IpNet) -> Self {
        Self(net.trunc())
    }
}

impl FromStr for NetworkRange {
    type Err = ipnet::AddrParseError;

    /// Parse a strict `address/prefix` literal
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<IpNet>().map(Self::from)
    }
}

impl fmt::Display for NetworkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Whether `network` belongs to `family`
pub fn is_family(network: &NetworkRange, family: Family) -> bool {
    network.family() == family
}
