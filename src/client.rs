//! Rate-limited client for the bgpstuff.net REST API
//!
//! All lookups go through a single request path: validate the input,
//! wait for a token from the shared limiter, issue exactly one GET, and
//! decode the response envelope. There are no retries and no caching at
//! the request layer; the only caches are the explicit bulk-loaded
//! reference datasets.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use ipnet::IpNet;
use reqwest::header;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::{AsNameCache, InvalidsCache};
use crate::error::{Error, Result};
use crate::response::{Envelope, Payload};
use crate::types::{AsName, AsPath, RoaStatus, Sourced, Totals};
use crate::validate;

const PRODUCTION_API: &str = "https://bgpstuff.net";
const TEST_API: &str = "https://test.bgpstuff.net";

/// Global request quota shared by all callers of one client.
const REQUESTS_PER_MINUTE: u32 = 30;

/// Per-request timeout, generous enough for the bulk dataset handlers.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

const USER_AGENT: &str = concat!("bgpstuff-rs/", env!("CARGO_PKG_VERSION"));

/// Which bgpstuff.net instance a client talks to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// The live instance at bgpstuff.net
    #[default]
    Production,
    /// The staging instance at test.bgpstuff.net
    Test,
    /// An arbitrary base URL, e.g. a local mock server
    Custom(String),
}

impl Endpoint {
    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        match self {
            Endpoint::Production => PRODUCTION_API,
            Endpoint::Test => TEST_API,
            Endpoint::Custom(url) => url.as_str(),
        }
    }
}

/// Client for the bgpstuff.net REST API
///
/// Holds the HTTP client, a shared token-bucket limiter capping the whole
/// client at 30 outbound requests per minute, and the two bulk-loaded
/// reference caches. Cloning is cheap and clones share the
/// limiter, the caches, and the cancellation token, so concurrent callers
/// are throttled globally rather than per handle.
///
/// # Examples
///
/// ```no_run
/// use bgpstuff::{Client, Endpoint};
///
/// #[tokio::main]
/// async fn main() -> Result<(), bgpstuff::Error> {
///     let client = Client::new(Endpoint::Production)?;
///
///     if let Some(prefix) = client.route("1.1.1.1").await? {
///         println!("covering prefix: {prefix}");
///     }
///     if let Some(path) = client.as_path("1.1.1.1").await? {
///         println!("origin: {:?}", path.origin());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base: String,
    http: reqwest::Client,
    limiter: Arc<DefaultDirectRateLimiter>,
    cancel: CancellationToken,
    as_names: Arc<RwLock<AsNameCache>>,
    invalids: Arc<RwLock<InvalidsCache>>,
}

impl Client {
    /// Create a client against the given endpoint.
    pub fn new(endpoint: Endpoint) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Transport)?;
        let quota = Quota::per_minute(
            NonZeroU32::new(REQUESTS_PER_MINUTE).expect("quota constant is non-zero"),
        );

        Ok(Self {
            base: endpoint.base_url().trim_end_matches('/').to_string(),
            http,
            limiter: Arc::new(RateLimiter::direct(quota)),
            cancel: CancellationToken::new(),
            as_names: Arc::new(RwLock::new(AsNameCache::new())),
            invalids: Arc::new(RwLock::new(InvalidsCache::new())),
        })
    }

    /// Token that aborts calls blocked on the rate limiter.
    ///
    /// Cancelling it makes every pending and future lookup on this client
    /// (and its clones) fail with [`Error::Cancelled`] before any request
    /// is sent.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The covering prefix for an IP address, via the `route` handler.
    ///
    /// Returns `None` when the table holds no route for the address.
    pub async fn route(&self, ip: &str) -> Result<Option<IpNet>> {
        let ip = validate::parse_public_ip(ip)?;
        let payload = self.execute(&["route", &ip.to_string()]).await?;
        // The server can answer an existing query with an empty or "/0"
        // route; both mean no usable prefix.
        if !payload.exists || payload.route.is_empty() || payload.route == "/0" {
            return Ok(None);
        }
        parse_prefix(&payload.route).map(Some)
    }

    /// The origin ASN for an IP address, via the `origin` handler.
    pub async fn origin(&self, ip: &str) -> Result<Option<u32>> {
        let ip = validate::parse_public_ip(ip)?;
        let payload = self.execute(&["origin", &ip.to_string()]).await?;
        if !payload.exists {
            return Ok(None);
        }
        Ok(Some(payload.origin))
    }

    /// The AS path towards an IP address, via the `aspath` handler.
    pub async fn as_path(&self, ip: &str) -> Result<Option<AsPath>> {
        let ip = validate::parse_public_ip(ip)?;
        let payload = self.execute(&["aspath", &ip.to_string()]).await?;
        if !payload.exists {
            return Ok(None);
        }
        Ok(as_path_from(&payload))
    }

    /// RPKI validation state for the route covering an IP address, via
    /// the `roa` handler.
    ///
    /// Returns `None` when there is no route, and therefore no origin to
    /// check a ROA against.
    pub async fn roa(&self, ip: &str) -> Result<Option<RoaStatus>> {
        let ip = validate::parse_public_ip(ip)?;
        let payload = self.execute(&["roa", &ip.to_string()]).await?;
        if !payload.exists || payload.origin == 0 {
            return Ok(None);
        }
        payload.roa.parse().map(Some)
    }

    /// The registered name of an ASN.
    ///
    /// After a [`load_as_names`](Self::load_as_names) bulk fetch this is a
    /// pure in-memory lookup, and a miss is an authoritative `None`.
    /// Before any bulk fetch it falls back to one targeted `asname` query.
    pub async fn as_name(&self, asn: u32) -> Result<Option<AsName>> {
        validate::validate_public_asn(asn)?;

        {
            let cache = self.as_names.read().await;
            if cache.is_loaded() {
                return Ok(cache.get(asn));
            }
        }

        let payload = self.execute(&["asname", &asn.to_string()]).await?;
        if !payload.exists {
            return Ok(None);
        }
        Ok(Some(AsName {
            name: payload.as_name,
            locale: payload.as_locale,
        }))
    }

    /// Fetch the full ASN-to-name dataset via the `asnames` handler and
    /// replace the name cache with it. Returns the number of entries.
    pub async fn load_as_names(&self) -> Result<usize> {
        let payload = self.execute(&["asnames"]).await?;
        let mut entries = HashMap::with_capacity(payload.as_names.len());
        for entry in payload.as_names {
            entries.insert(
                entry.asn,
                AsName {
                    name: entry.as_name,
                    locale: entry.as_locale,
                },
            );
        }
        let count = entries.len();
        self.as_names.write().await.replace(entries);
        debug!(entries = count, "replaced AS name cache");
        Ok(count)
    }

    /// Fetch all ROA-invalid announcements via the `invalids` handler and
    /// replace the invalids cache with them. Returns the number of ASNs
    /// in the dataset.
    pub async fn load_invalids(&self) -> Result<usize> {
        let payload = self.execute(&["invalids"]).await?;
        let mut entries = HashMap::with_capacity(payload.invalids.len());
        for set in payload.invalids {
            let prefixes = set
                .prefixes
                .iter()
                .map(|p| parse_prefix(p))
                .collect::<Result<Vec<_>>>()?;
            entries.insert(set.asn, prefixes);
        }
        let count = entries.len();
        self.invalids.write().await.replace(entries);
        debug!(entries = count, "replaced invalids cache");
        Ok(count)
    }

    /// ROA-invalid prefixes originated by an ASN.
    ///
    /// Purely in-memory: there is no targeted handler for this on the
    /// remote API, so [`load_invalids`](Self::load_invalids) must have
    /// run first or the call fails with [`Error::CacheNotLoaded`]. An ASN
    /// originating no invalids yields an empty list.
    pub async fn invalid(&self, asn: u32) -> Result<Vec<IpNet>> {
        validate::validate_public_asn(asn)?;
        let cache = self.invalids.read().await;
        cache.get(asn).ok_or(Error::CacheNotLoaded)
    }

    /// All prefixes sourced by an ASN plus v4/v6 counts, via the
    /// `sourced` handler.
    pub async fn sourced(&self, asn: u32) -> Result<Option<Sourced>> {
        validate::validate_public_asn(asn)?;
        let payload = self.execute(&["sourced", &asn.to_string()]).await?;
        if !payload.exists {
            return Ok(None);
        }
        let prefixes = payload
            .sourced
            .prefixes
            .iter()
            .map(|p| parse_prefix(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(Sourced {
            prefixes,
            ipv4: payload.sourced.ipv4,
            ipv6: payload.sourced.ipv6,
        }))
    }

    /// Global table sizes, via the `totals` handler.
    pub async fn totals(&self) -> Result<Totals> {
        let payload = self.execute(&["totals"]).await?;
        Ok(Totals {
            ipv4: payload.totals.ipv4,
            ipv6: payload.totals.ipv6,
            time: payload.totals.time,
        })
    }

    /// Issue one GET against the endpoint: wait for a limiter token,
    /// send, check the status, and decode the envelope.
    async fn execute(&self, segments: &[&str]) -> Result<Payload> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            _ = self.limiter.until_ready() => {}
        }

        let url = self.request_url(segments);
        debug!(%url, "issuing request");

        let response = self
            .http
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                code: status.as_u16(),
                text: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        let body = response.bytes().await.map_err(Error::Transport)?;
        let envelope: Envelope =
            serde_json::from_slice(&body).map_err(|e| Error::Decode(e.to_string()))?;
        Ok(envelope.response)
    }

    fn request_url(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url
    }
}

fn parse_prefix(raw: &str) -> Result<IpNet> {
    raw.parse()
        .map_err(|_| Error::MalformedPrefix(raw.to_string()))
}

fn as_path_from(payload: &Payload) -> Option<AsPath> {
    if payload.as_path.is_empty() {
        return None;
    }
    // An entry that fails to parse degrades to 0 instead of failing the
    // whole path. Known weakness, kept for compatibility with existing
    // consumers.
    let parse = |s: &String| s.parse().unwrap_or(0);
    Some(AsPath {
        path: payload.as_path.iter().map(parse).collect(),
        set: payload.as_set.iter().map(parse).collect(),
    })
}
