//! Reconciliation of desired zone/RRset state against the server.
//!
//! Every run follows the same sequence: fetch the current state, decide
//! whether a change is needed, stop there in check mode, otherwise apply the
//! minimal mutation and report. Nothing is cached between runs and no call
//! is retried; the first failing call aborts the run.

pub mod rrset;
pub mod zone;

#[cfg(test)]
mod fake;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::ConvergeError;
use crate::model::{DesiredState, NewZone, RrsetSpec, Zone};

pub use rrset::{RrsetReconciler, matches};
pub use zone::{ZoneAction, ZoneReconciler, plan_zone, zone_matches};

/// Operations the reconcilers need from the authoritative server.
#[async_trait]
pub trait AuthoritativeDnsClient: Send + Sync {
    /// Full zone state, or `None` when the server does not know the zone.
    async fn get_zone(&self, name: &str) -> Result<Option<Zone>, ConvergeError>;

    /// Fails with [`ConvergeError::Conflict`] if the zone already exists.
    async fn create_zone(&self, zone: &NewZone) -> Result<(), ConvergeError>;

    /// Removes the zone together with all its RRsets.
    async fn delete_zone(&self, name: &str) -> Result<(), ConvergeError>;

    /// Replaces whatever RRset exists for (name, type).
    async fn create_rrset(
        &self,
        zone: &str,
        rrset: &RrsetSpec,
    ) -> Result<Option<Value>, ConvergeError>;

    /// Removes the RRset for (name, type); expected to succeed when absent.
    async fn delete_rrset(
        &self,
        zone: &str,
        rrset: &RrsetSpec,
    ) -> Result<Option<Value>, ConvergeError>;
}

#[async_trait]
impl<T: AuthoritativeDnsClient + ?Sized> AuthoritativeDnsClient for std::sync::Arc<T> {
    async fn get_zone(&self, name: &str) -> Result<Option<Zone>, ConvergeError> {
        (**self).get_zone(name).await
    }

    async fn create_zone(&self, zone: &NewZone) -> Result<(), ConvergeError> {
        (**self).create_zone(zone).await
    }

    async fn delete_zone(&self, name: &str) -> Result<(), ConvergeError> {
        (**self).delete_zone(name).await
    }

    async fn create_rrset(
        &self,
        zone: &str,
        rrset: &RrsetSpec,
    ) -> Result<Option<Value>, ConvergeError> {
        (**self).create_rrset(zone, rrset).await
    }

    async fn delete_rrset(
        &self,
        zone: &str,
        rrset: &RrsetSpec,
    ) -> Result<Option<Value>, ConvergeError> {
        (**self).delete_rrset(zone, rrset).await
    }
}

/// Whether mutations may be issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Apply,
    /// Dry run: fetch and decide, never mutate.
    Check,
}

impl Mode {
    pub fn from_check_flag(check: bool) -> Self {
        if check { Mode::Check } else { Mode::Apply }
    }

    pub fn is_check(self) -> bool {
        self == Mode::Check
    }
}

/// Result reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub changed: bool,
    /// Payload of the mutating call, if one was made and it returned a body.
    pub response: Option<Value>,
}

impl Outcome {
    pub fn new(changed: bool) -> Self {
        Self {
            changed,
            response: None,
        }
    }

    pub fn with_response(mut self, response: Option<Value>) -> Self {
        self.response = response;
        self
    }
}

/// Change decision shared by both reconcilers.
pub fn needs_change(state: DesiredState, exists: bool) -> bool {
    match state {
        DesiredState::Present => !exists,
        DesiredState::Absent => exists,
    }
}
