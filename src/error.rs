//! Error types for bgpstuff.net API operations

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for bgpstuff.net lookups
///
/// "No data for this query" is never an error: lookups whose answer can be
/// absent return `Option` instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The supplied IP address is unparsable or not publicly routable
    #[error("invalid IP address: {0:?}")]
    InvalidIp(String),

    /// The supplied AS number is zero, reserved, private, or unallocated
    #[error("invalid AS number: {0}")]
    InvalidAsn(u32),

    /// The call was cancelled while waiting for a rate-limit token
    #[error("cancelled while waiting for a request slot")]
    Cancelled,

    /// Network-level failure, including per-request timeouts
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success HTTP status
    #[error("received status: {text} ({code})")]
    Status {
        /// Numeric HTTP status code
        code: u16,
        /// Canonical reason phrase for the status
        text: String,
    },

    /// The response body is not the expected JSON envelope
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// The server returned a prefix that is not valid CIDR notation
    #[error("malformed prefix in response: {0:?}")]
    MalformedPrefix(String),

    /// A targeted invalids lookup was attempted before the bulk load
    #[error("invalids cache not loaded; call load_invalids first")]
    CacheNotLoaded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::InvalidIp("🥺".to_string()).to_string(),
            "invalid IP address: \"🥺\""
        );
        assert_eq!(Error::InvalidAsn(0).to_string(), "invalid AS number: 0");
        assert!(Error::CacheNotLoaded.to_string().contains("load_invalids"));
        let status = Error::Status {
            code: 429,
            text: "Too Many Requests".to_string(),
        };
        assert_eq!(status.to_string(), "received status: Too Many Requests (429)");
    }
}
