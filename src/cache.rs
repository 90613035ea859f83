//! Reference-data caches for bulk-loaded datasets
//!
//! The bgpstuff.net API exposes two full-dataset handlers (`asnames` and
//! `invalids`). These caches hold the result of one such bulk fetch so
//! targeted lookups can be answered without another round trip. Loads
//! replace the whole mapping; entries never expire on their own.

use std::collections::HashMap;

use ipnet::IpNet;

use crate::types::AsName;

/// ASN-to-name mapping populated by a bulk `asnames` fetch
///
/// A never-loaded cache is distinct from a loaded-but-empty one, so a
/// lookup miss after a load is an authoritative "no such AS name".
#[derive(Debug, Default, Clone)]
pub struct AsNameCache {
    entries: Option<HashMap<u32, AsName>>,
}

impl AsNameCache {
    /// Create an empty, not-yet-loaded cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a bulk load has completed at least once
    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    /// Look up the name for an ASN; `None` on a miss or before any load
    pub fn get(&self, asn: u32) -> Option<AsName> {
        self.entries.as_ref()?.get(&asn).cloned()
    }

    /// Replace the entire mapping with a freshly fetched dataset
    pub fn replace(&mut self, entries: HashMap<u32, AsName>) {
        self.entries = Some(entries);
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, HashMap::len)
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// ASN-to-invalid-prefixes mapping populated by a bulk `invalids` fetch
#[derive(Debug, Default, Clone)]
pub struct InvalidsCache {
    entries: Option<HashMap<u32, Vec<IpNet>>>,
}

impl InvalidsCache {
    /// Create an empty, not-yet-loaded cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a bulk load has completed at least once
    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    /// Invalid prefixes originated by an ASN; an ASN absent from the
    /// dataset yields an empty list. `None` before any load.
    pub fn get(&self, asn: u32) -> Option<Vec<IpNet>> {
        let entries = self.entries.as_ref()?;
        Some(entries.get(&asn).cloned().unwrap_or_default())
    }

    /// Replace the entire mapping with a freshly fetched dataset
    pub fn replace(&mut self, entries: HashMap<u32, Vec<IpNet>>) {
        self.entries = Some(entries);
    }

    /// Number of ASNs with at least one invalid prefix
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, HashMap::len)
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
