//! Wire-format decoding for the bgpstuff.net response envelope
//!
//! Every handler answers with the same JSON shape, `{"Response": {...}}`,
//! where only the fields relevant to the queried handler are populated.
//! The envelope stays private to the crate: lookup operations extract the
//! fields they need and hand callers a typed result instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level decode target for every API response.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Envelope {
    #[serde(rename = "Response", default)]
    pub response: Payload,
}

/// The sparse per-handler payload. Fields not populated by the queried
/// handler decode to their zero values.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Payload {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Route")]
    pub route: String,
    #[serde(rename = "ASPath")]
    pub as_path: Vec<String>,
    #[serde(rename = "ASSet")]
    pub as_set: Vec<String>,
    // The server encodes the origin ASN as a JSON string.
    #[serde(rename = "Origin", with = "as_string")]
    pub origin: u32,
    #[serde(rename = "ROA")]
    pub roa: String,
    #[serde(rename = "ASName")]
    pub as_name: String,
    #[serde(rename = "ASLocale")]
    pub as_locale: String,
    #[serde(rename = "ASNames")]
    pub as_names: Vec<AsNumName>,
    #[serde(rename = "Invalids")]
    pub invalids: Vec<InvalidSet>,
    #[serde(rename = "Sourced")]
    pub sourced: SourcedData,
    #[serde(rename = "Totals")]
    pub totals: TotalsData,
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "Exists")]
    pub exists: bool,
    #[serde(rename = "CacheTime", skip_serializing_if = "Option::is_none")]
    pub cache_time: Option<DateTime<Utc>>,
}

/// One entry of the bulk `asnames` dataset.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AsNumName {
    #[serde(rename = "ASN")]
    pub asn: u32,
    #[serde(rename = "ASName")]
    pub as_name: String,
    #[serde(rename = "ASLocale")]
    pub as_locale: String,
}

/// One entry of the bulk `invalids` dataset.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct InvalidSet {
    #[serde(rename = "ASN", with = "as_string")]
    pub asn: u32,
    #[serde(rename = "Prefixes")]
    pub prefixes: Vec<String>,
}

/// Prefix counts and listing for the `sourced` handler.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SourcedData {
    #[serde(rename = "Ipv4")]
    pub ipv4: u32,
    #[serde(rename = "Ipv6")]
    pub ipv6: u32,
    #[serde(rename = "Prefixes")]
    pub prefixes: Vec<String>,
}

/// Table sizes for the `totals` handler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct TotalsData {
    #[serde(rename = "Ipv4")]
    pub ipv4: u32,
    #[serde(rename = "Ipv6")]
    pub ipv6: u32,
    #[serde(rename = "Time")]
    pub time: u64,
}

/// (De)serialize an integer that travels as a JSON string.
mod as_string {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
