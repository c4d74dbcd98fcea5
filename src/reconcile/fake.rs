//! In-memory server used by the reconciler tests.
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::AuthoritativeDnsClient;
use crate::error::ConvergeError;
use crate::model::{NewZone, Record, Rrset, RrsetSpec, Zone};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetZone(String),
    CreateZone(NewZone),
    DeleteZone(String),
    CreateRrset(String, RrsetSpec),
    DeleteRrset(String, RrsetSpec),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Call::GetZone(_))
    }
}

#[derive(Default)]
struct Inner {
    zones: BTreeMap<String, Zone>,
    calls: Vec<Call>,
    fail_create_zone: bool,
}

/// Cloning shares the same server state.
#[derive(Clone, Default)]
pub struct FakeServer {
    inner: Arc<Mutex<Inner>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(self, zone: Zone) -> Self {
        self.inner
            .lock()
            .unwrap()
            .zones
            .insert(zone.name.clone(), zone);
        self
    }

    pub fn failing_create_zone(self) -> Self {
        self.inner.lock().unwrap().fail_create_zone = true;
        self
    }

    pub fn zone(&self, name: &str) -> Option<Zone> {
        self.inner.lock().unwrap().zones.get(name).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl AuthoritativeDnsClient for FakeServer {
    async fn get_zone(&self, name: &str) -> Result<Option<Zone>, ConvergeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::GetZone(name.to_string()));
        Ok(inner.zones.get(name).cloned())
    }

    async fn create_zone(&self, zone: &NewZone) -> Result<(), ConvergeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::CreateZone(zone.clone()));
        if inner.fail_create_zone {
            return Err(ConvergeError::api(
                "create_zone",
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                "backend unavailable",
            ));
        }
        if inner.zones.contains_key(&zone.name) {
            return Err(ConvergeError::Conflict {
                zone: zone.name.clone(),
            });
        }
        inner.zones.insert(
            zone.name.clone(),
            Zone {
                name: zone.name.clone(),
                kind: zone.kind.clone(),
                masters: zone.masters.clone(),
                dnssec: zone.dnssec,
                api_rectify: zone.api_rectify,
                rrsets: Vec::new(),
            },
        );
        Ok(())
    }

    async fn delete_zone(&self, name: &str) -> Result<(), ConvergeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::DeleteZone(name.to_string()));
        match inner.zones.remove(name) {
            Some(_) => Ok(()),
            None => Err(ConvergeError::api(
                "delete_zone",
                reqwest::StatusCode::NOT_FOUND,
                "Not Found",
            )),
        }
    }

    async fn create_rrset(
        &self,
        zone: &str,
        rrset: &RrsetSpec,
    ) -> Result<Option<Value>, ConvergeError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(Call::CreateRrset(zone.to_string(), rrset.clone()));
        let target = inner
            .zones
            .get_mut(zone)
            .ok_or_else(|| ConvergeError::ZoneMissing {
                zone: zone.to_string(),
            })?;
        target
            .rrsets
            .retain(|rr| !(rr.name == rrset.name && rr.rtype == rrset.rtype));
        target.rrsets.push(Rrset {
            name: rrset.name.clone(),
            rtype: rrset.rtype.clone(),
            ttl: rrset.ttl,
            records: rrset
                .records
                .iter()
                .map(|content| Record {
                    content: content.clone(),
                    disabled: false,
                })
                .collect(),
        });
        Ok(None)
    }

    async fn delete_rrset(
        &self,
        zone: &str,
        rrset: &RrsetSpec,
    ) -> Result<Option<Value>, ConvergeError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(Call::DeleteRrset(zone.to_string(), rrset.clone()));
        if let Some(target) = inner.zones.get_mut(zone) {
            target
                .rrsets
                .retain(|rr| !(rr.name == rrset.name && rr.rtype == rrset.rtype));
        }
        Ok(None)
    }
}

pub fn zone(name: &str) -> Zone {
    Zone {
        name: name.to_string(),
        kind: crate::model::ZoneKind::Master,
        masters: Vec::new(),
        dnssec: false,
        api_rectify: true,
        rrsets: Vec::new(),
    }
}

pub fn rrset(name: &str, rtype: crate::model::RrType, ttl: u32, contents: &[&str]) -> Rrset {
    Rrset {
        name: name.to_string(),
        rtype,
        ttl,
        records: contents
            .iter()
            .map(|c| Record {
                content: c.to_string(),
                disabled: false,
            })
            .collect(),
    }
}
