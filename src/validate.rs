//! Validators for publicly routable IP addresses and AS numbers
//!
//! Every lookup that takes an IP or ASN runs these checks before any
//! network I/O. An input that fails validation never produces a request.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::{Error, Result};

/// AS_TRANS, the 16-bit placeholder for 32-bit ASNs (RFC 6793).
const AS_TRANS: u32 = 23456;

/// Highest 32-bit ASN inside the region IANA has delegated to the RIRs.
/// Everything between this and the private-use block is unallocated and
/// treated as a bogon.
const MAX_DELEGATED_ASN: u32 = 401_308;

/// Parse an IP address and check that it is publicly routable unicast.
///
/// Rejects anything unparsable as well as private, link-local, loopback,
/// multicast, documentation, and otherwise reserved ranges for both IPv4
/// and IPv6.
pub fn parse_public_ip(input: &str) -> Result<IpAddr> {
    let ip: IpAddr = input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidIp(input.to_string()))?;
    if !is_public_ip(&ip) {
        return Err(Error::InvalidIp(input.to_string()));
    }
    Ok(ip)
}

/// Check whether an already-parsed address is publicly routable unicast.
pub fn is_public_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => is_public_v6(v6),
    }
}

/// Check that an AS number is nonzero and inside the public, globally
/// routable ASN space.
///
/// Documentation, private-use, and IANA-reserved blocks are rejected, as
/// is the unallocated tail of the 32-bit range above the delegated region.
pub fn validate_public_asn(asn: u32) -> Result<()> {
    if is_public_asn(asn) {
        Ok(())
    } else {
        Err(Error::InvalidAsn(asn))
    }
}

/// Check whether an AS number is public and globally routable.
pub fn is_public_asn(asn: u32) -> bool {
    match asn {
        0 => false,
        AS_TRANS => false,
        64_496..=64_511 => false,  // documentation (RFC 5398)
        64_512..=65_534 => false,  // 16-bit private use (RFC 6996)
        65_535 => false,           // reserved (RFC 7300)
        65_536..=65_551 => false,  // documentation (RFC 5398)
        65_552..=131_071 => false, // IANA reserved
        a if a > MAX_DELEGATED_ASN => false,
        _ => true,
    }
}

fn is_public_v4(ip: &Ipv4Addr) -> bool {
    let octets = ip.octets();
    // 100.64.0.0/10, carrier-grade NAT (RFC 6598)
    let is_cgnat = octets[0] == 100 && (64..128).contains(&octets[1]);
    // 192.0.0.0/24, IETF protocol assignments (RFC 6890)
    let is_ietf_protocol = octets[0] == 192 && octets[1] == 0 && octets[2] == 0;
    // 198.18.0.0/15, benchmarking (RFC 2544)
    let is_benchmarking = octets[0] == 198 && (octets[1] & 0xfe) == 18;
    // 240.0.0.0/4, reserved for future use
    let is_reserved = octets[0] >= 240;

    !(ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_multicast()
        || is_cgnat
        || is_ietf_protocol
        || is_benchmarking
        || is_reserved)
}

fn is_public_v6(ip: &Ipv6Addr) -> bool {
    if ip.is_unspecified() || ip.is_loopback() || ip.is_multicast() {
        return false;
    }
    // Embedded or mapped IPv4 is never a routable IPv6 destination here.
    if ip.to_ipv4_mapped().is_some() {
        return false;
    }
    let segments = ip.segments();
    // 2001:db8::/32, documentation (RFC 3849)
    if segments[0] == 0x2001 && segments[1] == 0x0db8 {
        return false;
    }
    // Global unicast is currently assigned out of 2000::/3; everything
    // else (link-local fe80::/10, unique-local fc00::/7, ...) is not
    // globally routable.
    (segments[0] & 0xe000) == 0x2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_v4() {
        for good in ["1.1.1.1", "8.8.8.8", "193.0.14.129", "199.9.14.201"] {
            assert!(parse_public_ip(good).is_ok(), "{good} should be public");
        }
        for bad in [
            "0.0.0.0",
            "10.1.1.1",
            "127.0.0.1",
            "169.254.10.1",
            "172.16.5.4",
            "192.168.1.1",
            "100.64.0.1",
            "192.0.0.8",
            "192.0.2.1",
            "198.18.0.1",
            "224.0.0.1",
            "240.0.0.1",
            "255.255.255.255",
        ] {
            assert!(parse_public_ip(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_public_v6() {
        for good in ["2600::", "2001:4860:4860::8888", "2a00:1450::1"] {
            assert!(parse_public_ip(good).is_ok(), "{good} should be public");
        }
        for bad in [
            "::",
            "::1",
            "fe80::1",
            "fc00::1",
            "fd12:3456::1",
            "ff02::1",
            "2001:db8::1",
            "::ffff:1.1.1.1",
        ] {
            assert!(parse_public_ip(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_unparsable_input() {
        for input in ["", "🥺", "not-an-ip", "1.1.1", "1.1.1.1/24"] {
            match parse_public_ip(input) {
                Err(Error::InvalidIp(got)) => assert_eq!(got, input),
                other => panic!("expected InvalidIp for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_public_asn() {
        for good in [1, 3356, 13335, 15169, 131072, 397444, MAX_DELEGATED_ASN] {
            assert!(is_public_asn(good), "{good} should be public");
        }
        for bad in [
            0,
            AS_TRANS,
            64496,
            64511,
            64512,
            65534,
            65535,
            65536,
            131071,
            4_199_999_999,
            4_200_000_000,
            u32::MAX,
        ] {
            assert!(!is_public_asn(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_validate_public_asn_error() {
        match validate_public_asn(64512) {
            Err(Error::InvalidAsn(64512)) => {}
            other => panic!("expected InvalidAsn, got {other:?}"),
        }
    }
}
