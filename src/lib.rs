//! Declarative, idempotent management of PowerDNS zones and RRsets.
//!
//! [`reconcile::ZoneReconciler`] and [`reconcile::RrsetReconciler`] compare a
//! desired state with what the server reports and issue the smallest set of
//! API calls that closes the gap, or none at all in check mode.

pub mod config;
pub mod error;
pub mod model;
pub mod powerdns;
pub mod reconcile;
pub mod validation;

pub use config::ApiConfig;
pub use error::ConvergeError;
pub use powerdns::client::PowerDnsClient;
pub use reconcile::{AuthoritativeDnsClient, Mode, Outcome, RrsetReconciler, ZoneReconciler};
