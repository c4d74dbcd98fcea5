//! Typed desired and actual state for zones and RRsets.
//!
//! Actual state is built from the PowerDNS wire types at the client
//! boundary; desired state comes from the caller and is normalized before
//! use.
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::{
    ValidationError, ensure_in_zone, normalize_fqdn, validate_master, validate_ttl,
};

pub const DEFAULT_TTL: u32 = 86400;

/// Whether the managed object should exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    #[default]
    Present,
    Absent,
}

impl FromStr for DesiredState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "present" => Ok(DesiredState::Present),
            "absent" => Ok(DesiredState::Absent),
            _ => Err(ValidationError::UnknownState(s.to_string())),
        }
    }
}

/// Zone kind as PowerDNS names it. `Primary`/`Secondary` are the newer
/// spellings of `Master`/`Slave` and are folded into them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ZoneKind {
    Native,
    #[default]
    Master,
    Slave,
    /// Kinds reported by the server that cannot be requested (e.g. Producer).
    Other(String),
}

impl ZoneKind {
    pub fn as_str(&self) -> &str {
        match self {
            ZoneKind::Native => "Native",
            ZoneKind::Master => "Master",
            ZoneKind::Slave => "Slave",
            ZoneKind::Other(kind) => kind,
        }
    }

    /// Lenient parse for values coming back from the server.
    pub fn from_wire(kind: &str) -> Self {
        kind.parse().unwrap_or_else(|_| ZoneKind::Other(kind.to_string()))
    }
}

impl FromStr for ZoneKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(ZoneKind::Native),
            "master" | "primary" => Ok(ZoneKind::Master),
            "slave" | "secondary" => Ok(ZoneKind::Slave),
            _ => Err(ValidationError::UnknownZoneKind(s.to_string())),
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! rr_types {
    ($($variant:ident => $token:literal,)+) => {
        /// Record types that may be managed.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum RrType {
            $($variant,)+
            /// A type the server returned that is not in the managed set.
            Other(String),
        }

        impl RrType {
            pub const ALL: &'static [RrType] = &[$(RrType::$variant,)+];

            pub fn as_str(&self) -> &str {
                match self {
                    $(RrType::$variant => $token,)+
                    RrType::Other(token) => token,
                }
            }
        }

        impl FromStr for RrType {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_uppercase().as_str() {
                    $($token => Ok(RrType::$variant),)+
                    _ => Err(ValidationError::UnknownRrType(s.to_string())),
                }
            }
        }
    };
}

rr_types! {
    A => "A",
    Aaaa => "AAAA",
    Afsdb => "AFSDB",
    Alias => "ALIAS",
    Caa => "CAA",
    Cert => "CERT",
    Cdnskey => "CDNSKEY",
    Cds => "CDS",
    Cname => "CNAME",
    Dnskey => "DNSKEY",
    Dname => "DNAME",
    Ds => "DS",
    Hinfo => "HINFO",
    Key => "KEY",
    Loc => "LOC",
    Mx => "MX",
    Naptr => "NAPTR",
    Ns => "NS",
    Nsec => "NSEC",
    Nsec3 => "NSEC3",
    Nsec3param => "NSEC3PARAM",
    Openpgpkey => "OPENPGPKEY",
    Ptr => "PTR",
    Rp => "RP",
    Rrsig => "RRSIG",
    Soa => "SOA",
    Spf => "SPF",
    Sshfp => "SSHFP",
    Srv => "SRV",
    Tkey => "TKEY",
    Tsig => "TSIG",
    Tlsa => "TLSA",
    Smimea => "SMIMEA",
    Txt => "TXT",
    Uri => "URI",
}

impl RrType {
    pub fn from_wire(token: &str) -> Self {
        token
            .parse()
            .unwrap_or_else(|_| RrType::Other(token.to_string()))
    }
}

impl fmt::Display for RrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single record inside a fetched RRset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub content: String,
    pub disabled: bool,
}

/// An RRset as currently served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rrset {
    pub name: String,
    pub rtype: RrType,
    pub ttl: u32,
    pub records: Vec<Record>,
}

impl Rrset {
    /// Record contents as a set; `disabled` is ignored.
    pub fn contents(&self) -> HashSet<&str> {
        self.records.iter().map(|r| r.content.as_str()).collect()
    }
}

/// A zone as currently served, reduced to the attributes we manage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub name: String,
    pub kind: ZoneKind,
    pub masters: Vec<String>,
    pub dnssec: bool,
    pub api_rectify: bool,
    pub rrsets: Vec<Rrset>,
}

/// Desired zone attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSpec {
    pub name: String,
    pub kind: ZoneKind,
    pub masters: Vec<String>,
    pub dnssec: bool,
    pub api_rectify: bool,
    pub state: DesiredState,
}

impl ZoneSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ZoneKind::Master,
            masters: Vec::new(),
            dnssec: false,
            api_rectify: true,
            state: DesiredState::Present,
        }
    }

    pub fn with_kind(mut self, kind: ZoneKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_masters<I, S>(mut self, masters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.masters = masters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dnssec(mut self, dnssec: bool) -> Self {
        self.dnssec = dnssec;
        self
    }

    pub fn with_api_rectify(mut self, api_rectify: bool) -> Self {
        self.api_rectify = api_rectify;
        self
    }

    pub fn with_state(mut self, state: DesiredState) -> Self {
        self.state = state;
        self
    }

    /// Validated copy with a canonical name and trimmed masters.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        if let ZoneKind::Other(kind) = &self.kind {
            return Err(ValidationError::UnknownZoneKind(kind.clone()));
        }
        let masters = self
            .masters
            .iter()
            .map(|m| {
                validate_master(m)?;
                Ok(m.trim().to_string())
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(Self {
            name: normalize_fqdn(&self.name)?,
            masters,
            ..self.clone()
        })
    }

    pub fn master_set(&self) -> HashSet<&str> {
        self.masters.iter().map(String::as_str).collect()
    }
}

/// Desired RRset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrsetSpec {
    pub name: String,
    pub rtype: RrType,
    pub ttl: u32,
    pub records: Vec<String>,
    pub zone: String,
    pub state: DesiredState,
}

impl RrsetSpec {
    pub fn new(name: impl Into<String>, rtype: RrType, zone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rtype,
            ttl: DEFAULT_TTL,
            records: Vec::new(),
            zone: zone.into(),
            state: DesiredState::Present,
        }
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_records<I, S>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records = records.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_state(mut self, state: DesiredState) -> Self {
        self.state = state;
        self
    }

    /// Validated copy with canonical names, checked to lie inside the zone.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        if let RrType::Other(token) = &self.rtype {
            return Err(ValidationError::UnknownRrType(token.clone()));
        }
        validate_ttl(self.ttl)?;
        let name = normalize_fqdn(&self.name)?;
        let zone = normalize_fqdn(&self.zone)?;
        ensure_in_zone(&name, &zone)?;
        if self.state == DesiredState::Present && self.records.is_empty() {
            return Err(ValidationError::NoRecords);
        }

        Ok(Self {
            name,
            zone,
            ..self.clone()
        })
    }

    pub fn contents(&self) -> HashSet<&str> {
        self.records.iter().map(String::as_str).collect()
    }
}

/// Parameters for creating a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewZone {
    pub name: String,
    pub kind: ZoneKind,
    pub nameservers: Vec<String>,
    pub masters: Vec<String>,
    pub dnssec: bool,
    pub api_rectify: bool,
}

impl From<&ZoneSpec> for NewZone {
    fn from(spec: &ZoneSpec) -> Self {
        Self {
            name: spec.name.clone(),
            kind: spec.kind.clone(),
            nameservers: Vec::new(),
            masters: spec.masters.clone(),
            dnssec: spec.dnssec,
            api_rectify: spec.api_rectify,
        }
    }
}
