use serde::{Deserialize, Serialize};

use crate::model::{NewZone, Record, RrType, Rrset, RrsetSpec, Zone, ZoneKind};

#[derive(Debug, Serialize, Deserialize)]
pub struct PdnsZone {
    #[serde(default)]
    pub id: String, // "/api/.../zones/example.com."
    pub name: String, // "example.com."
    #[serde(rename = "type", default)]
    pub zone_type: Option<String>, // "Zone"
    pub kind: String, // "Native", "Master", "Slave", ...
    #[serde(default)]
    pub masters: Vec<String>,
    #[serde(default)]
    pub dnssec: bool,
    #[serde(default)]
    pub api_rectify: bool,
    #[serde(default)]
    pub serial: Option<u32>,
    pub rrsets: Option<Vec<PdnsRrset>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PdnsRrset {
    pub name: String, // "www.example.com."
    #[serde(rename = "type")]
    pub rrtype: String, // "A", "NS", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>, // omitted on DELETE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changetype: Option<Changetype>, // only when patching
    #[serde(default)]
    pub records: Vec<PdnsRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<PdnsComment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Changetype {
    Replace,
    Delete,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PdnsRecord {
    pub content: String, // "192.0.2.1" or "ns1.example.net."
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PdnsComment {
    pub content: String,
    pub account: String,
    pub modified_at: u64,
}

// Used when creating a zone
#[derive(Debug, Serialize, Deserialize)]
pub struct PdnsZoneCreate {
    pub name: String,             // "example.com."
    pub kind: String,             // "Master"
    pub nameservers: Vec<String>, // empty: NS records are managed as RRsets
    pub masters: Vec<String>,     // only meaningful for "Slave"
    pub dnssec: bool,
    pub api_rectify: bool,
}

/// Body of a PATCH on a zone.
#[derive(Debug, Serialize)]
pub struct PdnsRrsetPatch<'a> {
    pub rrsets: &'a [PdnsRrset],
}

/// `{"error": "..."}` body PowerDNS sends with failures.
#[derive(Debug, Deserialize)]
pub struct PdnsErrorBody {
    pub error: String,
}

impl From<PdnsZone> for Zone {
    fn from(z: PdnsZone) -> Self {
        Zone {
            name: z.name,
            kind: ZoneKind::from_wire(&z.kind),
            masters: z.masters,
            dnssec: z.dnssec,
            api_rectify: z.api_rectify,
            rrsets: z
                .rrsets
                .unwrap_or_default()
                .into_iter()
                .map(Rrset::from)
                .collect(),
        }
    }
}

impl From<PdnsRrset> for Rrset {
    fn from(rr: PdnsRrset) -> Self {
        Rrset {
            name: rr.name,
            rtype: RrType::from_wire(&rr.rrtype),
            ttl: rr.ttl.unwrap_or_default(),
            records: rr
                .records
                .into_iter()
                .map(|rec| Record {
                    content: rec.content,
                    disabled: rec.disabled,
                })
                .collect(),
        }
    }
}

impl PdnsRrset {
    /// Full replacement of the RRset identified by (name, type).
    pub fn replace(spec: &RrsetSpec) -> Self {
        PdnsRrset {
            name: spec.name.clone(),
            rrtype: spec.rtype.to_string(),
            ttl: Some(spec.ttl),
            changetype: Some(Changetype::Replace),
            records: spec
                .records
                .iter()
                .map(|content| PdnsRecord {
                    content: content.clone(),
                    disabled: false,
                })
                .collect(),
            comments: Vec::new(),
        }
    }

    /// Removal of the RRset identified by (name, type).
    pub fn delete(spec: &RrsetSpec) -> Self {
        PdnsRrset {
            name: spec.name.clone(),
            rrtype: spec.rtype.to_string(),
            ttl: None,
            changetype: Some(Changetype::Delete),
            records: Vec::new(),
            comments: Vec::new(),
        }
    }
}

impl From<&NewZone> for PdnsZoneCreate {
    fn from(z: &NewZone) -> Self {
        PdnsZoneCreate {
            name: z.name.clone(),
            kind: z.kind.to_string(),
            nameservers: z.nameservers.clone(),
            masters: z.masters.clone(),
            dnssec: z.dnssec,
            api_rectify: z.api_rectify,
        }
    }
}
