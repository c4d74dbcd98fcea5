use tracing::debug;

use super::{AuthoritativeDnsClient, Mode, Outcome, needs_change};
use crate::error::ConvergeError;
use crate::model::{DesiredState, RrsetSpec, Zone};

/// True iff some RRset of `zone` has the desired name, type and TTL and the
/// same set of record contents (order and duplicates ignored).
///
/// RRsets sharing (name, type) but with another TTL are separate candidates.
pub fn matches(zone: &Zone, desired: &RrsetSpec) -> bool {
    let wanted = desired.contents();
    zone.rrsets.iter().any(|rrset| {
        rrset.name == desired.name
            && rrset.rtype == desired.rtype
            && rrset.ttl == desired.ttl
            && rrset.contents() == wanted
    })
}

/// Keeps a single RRset in an existing zone in the desired state.
pub struct RrsetReconciler<C> {
    client: C,
}

impl<C: AuthoritativeDnsClient> RrsetReconciler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn reconcile(&self, spec: &RrsetSpec, mode: Mode) -> Result<Outcome, ConvergeError> {
        let spec = spec.normalized()?;

        let zone = self
            .client
            .get_zone(&spec.zone)
            .await?
            .ok_or_else(|| ConvergeError::ZoneMissing {
                zone: spec.zone.clone(),
            })?;

        let present = matches(&zone, &spec);
        let changed = needs_change(spec.state, present);
        debug!(
            zone = %spec.zone,
            name = %spec.name,
            rtype = %spec.rtype,
            present,
            changed,
            "rrset compared"
        );

        if mode.is_check() {
            return Ok(Outcome::new(changed));
        }

        let response = match spec.state {
            DesiredState::Present if changed => {
                self.client.create_rrset(&spec.zone, &spec).await?
            }
            DesiredState::Present => None,
            // Issued even when nothing matched; deleting an absent RRset is a
            // no-op on the server.
            DesiredState::Absent => self.client.delete_rrset(&spec.zone, &spec).await?,
        };

        Ok(Outcome::new(changed).with_response(response))
    }
}
