use tracing::{debug, error, warn};

use super::{AuthoritativeDnsClient, Mode, Outcome};
use crate::error::ConvergeError;
use crate::model::{DesiredState, NewZone, Zone, ZoneSpec};

/// Mutation needed to bring a zone to its desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneAction {
    None,
    Create,
    /// Delete then create; RRsets in the old zone are lost.
    Recreate,
    Delete,
}

impl ZoneAction {
    pub fn is_change(self) -> bool {
        self != ZoneAction::None
    }
}

/// Compares kind, masters (as a set), dnssec and api_rectify.
pub fn zone_matches(actual: &Zone, desired: &ZoneSpec) -> bool {
    let actual_masters = actual
        .masters
        .iter()
        .map(String::as_str)
        .collect::<std::collections::HashSet<_>>();

    actual.kind == desired.kind
        && actual_masters == desired.master_set()
        && actual.dnssec == desired.dnssec
        && actual.api_rectify == desired.api_rectify
}

pub fn plan_zone(actual: Option<&Zone>, desired: &ZoneSpec) -> ZoneAction {
    match (desired.state, actual) {
        (DesiredState::Present, None) => ZoneAction::Create,
        (DesiredState::Present, Some(zone)) if zone_matches(zone, desired) => ZoneAction::None,
        (DesiredState::Present, Some(_)) => ZoneAction::Recreate,
        (DesiredState::Absent, Some(_)) => ZoneAction::Delete,
        (DesiredState::Absent, None) => ZoneAction::None,
    }
}

/// Keeps a zone's existence and attributes in the desired state.
///
/// Attribute changes are applied by deleting and recreating the zone, the
/// update endpoint does not reliably change `kind` or `masters`. If the
/// create fails after the delete went through, the zone stays absent until
/// the next run.
pub struct ZoneReconciler<C> {
    client: C,
}

impl<C: AuthoritativeDnsClient> ZoneReconciler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn reconcile(&self, spec: &ZoneSpec, mode: Mode) -> Result<Outcome, ConvergeError> {
        let spec = spec.normalized()?;

        let actual = self.client.get_zone(&spec.name).await?;
        let action = plan_zone(actual.as_ref(), &spec);
        debug!(
            zone = %spec.name,
            exists = actual.is_some(),
            ?action,
            "zone compared"
        );

        if mode.is_check() {
            return Ok(Outcome::new(action.is_change()));
        }

        match action {
            ZoneAction::None => {}
            ZoneAction::Create => {
                self.client.create_zone(&NewZone::from(&spec)).await?;
            }
            ZoneAction::Recreate => {
                warn!(
                    zone = %spec.name,
                    "zone attributes differ, recreating zone; existing rrsets are discarded"
                );
                self.client.delete_zone(&spec.name).await?;
                if let Err(err) = self.client.create_zone(&NewZone::from(&spec)).await {
                    error!(zone = %spec.name, "zone deleted but recreate failed: {err}");
                    return Err(err);
                }
            }
            ZoneAction::Delete => {
                self.client.delete_zone(&spec.name).await?;
            }
        }

        Ok(Outcome::new(action.is_change()))
    }
}
