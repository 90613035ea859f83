//! Async client for the [bgpstuff.net](https://bgpstuff.net) BGP looking glass
//!
//! Given an IP address or AS number, the client answers routing questions
//! from the global table: covering prefix, origin ASN, AS path, ROA
//! validation state, AS names, ROA-invalid announcements, sourced
//! prefixes, and table totals.
//!
//! All requests share one token-bucket limiter (30 requests per minute),
//! inputs are validated before any network I/O, and the bulk datasets
//! (`asnames`, `invalids`) can be loaded once into client-owned caches so
//! targeted lookups need no further round trips.
//!
//! # Examples
//!
//! ```no_run
//! use bgpstuff::{Client, Endpoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bgpstuff::Error> {
//!     let client = Client::new(Endpoint::Production)?;
//!
//!     if let Some(prefix) = client.route("1.1.1.1").await? {
//!         println!("1.1.1.1 is covered by {prefix}");
//!     }
//!
//!     client.load_as_names().await?;
//!     if let Some(as_name) = client.as_name(3356).await? {
//!         println!("AS3356 is {}", as_name.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod types;
pub mod validate;

mod response;

pub use client::{Client, Endpoint};
pub use error::{Error, Result};
pub use types::{AsName, AsPath, RoaStatus, Sourced, Totals};
