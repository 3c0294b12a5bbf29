//! Google Ads REST client used by the MCP bridge.
//!
//! Authenticates with a service account, runs GAQL searches and mutations,
//! and returns the `results` rows untouched.

pub mod accounts;
pub mod client;
pub mod config;
pub mod credentials;
pub mod customer;
pub mod error;
pub mod mutations;
pub mod queries;
pub mod request;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::AdsClient;
pub use config::AdsConfig;
pub use customer::CustomerId;
pub use error::{AdsError, AdsResult};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
