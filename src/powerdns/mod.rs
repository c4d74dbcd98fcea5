//! PowerDNS HTTP API client and its wire types.
pub mod client;
pub mod types;
