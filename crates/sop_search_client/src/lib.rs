//! Shared SOP Assistant search client library (config, `/search` protocol, HTTP transport).
//! Used by the search controller and the `sop-search` binary.

pub mod client;
pub mod config;
pub mod messages;

pub use client::{Client, ClientError, SearchBackend};
pub use config::{default_config_path, Config, ConfigError, SearchSection, ServerSection};
pub use messages::{Domain, QueryRequest, SearchOutcome, SearchResponse, Source};
