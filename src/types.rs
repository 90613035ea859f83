//! Typed results returned by the lookup operations
//!
//! Each handler on the remote API gets its own result type, so callers
//! never have to pick the meaningful fields out of a sparse shared record.

use std::fmt;
use std::str::FromStr;

use ipnet::IpNet;

use crate::error::Error;

/// An AS path returned by the `aspath` handler
///
/// `path` is in propagation order: the first entry is the AS closest to
/// the collector and the last entry is the origin. `set` carries the
/// unordered AS-SET of an aggregated route and is usually empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsPath {
    /// Ordered AS path; the last entry is the origin ASN
    pub path: Vec<u32>,
    /// Unordered AS-SET for aggregated routes, if any
    pub set: Vec<u32>,
}

impl AsPath {
    /// The originating ASN, i.e. the last entry of the ordered path.
    pub fn origin(&self) -> Option<u32> {
        self.path.last().copied()
    }
}

/// RPKI validation state of a prefix/origin pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoaStatus {
    /// A ROA covers the prefix and authorizes the origin
    Valid,
    /// A ROA covers the prefix but the announcement violates it
    Invalid,
    /// No ROA covers the prefix
    Unknown,
}

impl FromStr for RoaStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VALID" => Ok(RoaStatus::Valid),
            "INVALID" => Ok(RoaStatus::Invalid),
            "UNKNOWN" => Ok(RoaStatus::Unknown),
            other => Err(Error::Decode(format!("unrecognized ROA status {other:?}"))),
        }
    }
}

impl fmt::Display for RoaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoaStatus::Valid => "VALID",
            RoaStatus::Invalid => "INVALID",
            RoaStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Name and locale of an autonomous system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsName {
    /// Registered short name, e.g. `LEVEL3`
    pub name: String,
    /// Two-letter locale the AS is registered in, e.g. `US`
    pub locale: String,
}

/// Prefixes sourced by an ASN, from the `sourced` handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced {
    /// All prefixes the ASN currently originates
    pub prefixes: Vec<IpNet>,
    /// Count of originated IPv4 prefixes
    pub ipv4: u32,
    /// Count of originated IPv6 prefixes
    pub ipv6: u32,
}

/// Global table sizes, from the `totals` handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// IPv4 prefixes in the table
    pub ipv4: u32,
    /// IPv6 prefixes in the table
    pub ipv6: u32,
    /// Unix timestamp of the snapshot
    pub time: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_path_origin() {
        let path = AsPath {
            path: vec![701, 3356, 13335],
            set: vec![],
        };
        assert_eq!(path.origin(), Some(13335));

        let empty = AsPath {
            path: vec![],
            set: vec![],
        };
        assert_eq!(empty.origin(), None);
    }

    #[test]
    fn test_roa_status_round_trip() {
        for (text, status) in [
            ("VALID", RoaStatus::Valid),
            ("INVALID", RoaStatus::Invalid),
            ("UNKNOWN", RoaStatus::Unknown),
        ] {
            assert_eq!(text.parse::<RoaStatus>().unwrap(), status);
            assert_eq!(status.to_string(), text);
        }
        // Case-insensitive on the way in
        assert_eq!("valid".parse::<RoaStatus>().unwrap(), RoaStatus::Valid);
        assert!("PARTIAL".parse::<RoaStatus>().is_err());
    }
}
