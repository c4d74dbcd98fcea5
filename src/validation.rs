//! Input validation run before any request reaches the server.
use std::net::IpAddr;

use regex::Regex;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is empty")]
    Empty,
    #[error("label '{0}' too long (max 63 characters)")]
    LabelTooLong(String),
    #[error("name too long (max 253 characters)")]
    NameTooLong,
    #[error("name '{0}' contains an empty label")]
    EmptyLabel(String),
    #[error("label '{0}' contains invalid characters (only letters, digits, '-' and '_' allowed)")]
    InvalidCharacters(String),
    #[error("label '{0}' must not start or end with '-'")]
    LeadingOrTrailingHyphen(String),
    #[error("'{name}' is not inside zone '{zone}'")]
    OutsideZone { name: String, zone: String },
    #[error("an rrset that should be present needs at least one record")]
    NoRecords,
    #[error("ttl must be a positive number of seconds")]
    ZeroTtl,
    #[error("master '{0}' is not an IP address")]
    InvalidMaster(String),
    #[error("unsupported record type '{0}'")]
    UnknownRrType(String),
    #[error("unsupported zone kind '{0}' (expected Native, Master or Slave)")]
    UnknownZoneKind(String),
    #[error("unsupported state '{0}' (expected present or absent)")]
    UnknownState(String),
}

lazy_static::lazy_static! {
    /// Letters, digits, '-' and '_' (service labels such as `_sip._tcp`)
    static ref LABEL_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.len() > 63 {
        return Err(ValidationError::LabelTooLong(label.to_string()));
    }
    if !LABEL_RE.is_match(label) {
        return Err(ValidationError::InvalidCharacters(label.to_string()));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(ValidationError::LeadingOrTrailingHyphen(label.to_string()));
    }
    Ok(())
}

/// Validate a domain name and return it in canonical form: lowercase, with
/// exactly one trailing dot. PowerDNS reports owner names in lowercase.
///
/// A leading `*` label is accepted so wildcard RRsets can be managed.
pub fn normalize_fqdn(input: &str) -> Result<String, ValidationError> {
    let input = input.trim();
    let trimmed = input.strip_suffix('.').unwrap_or(input);
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if trimmed.len() > 253 {
        return Err(ValidationError::NameTooLong);
    }
    for (idx, label) in trimmed.split('.').enumerate() {
        if label.is_empty() {
            return Err(ValidationError::EmptyLabel(input.to_string()));
        }
        if idx == 0 && label == "*" {
            continue;
        }
        validate_label(label)?;
    }
    Ok(format!("{}.", trimmed.to_ascii_lowercase()))
}

/// Check that the canonical `name` equals `zone` or lies below it.
pub fn ensure_in_zone(name: &str, zone: &str) -> Result<(), ValidationError> {
    let lname = name.to_ascii_lowercase();
    let lzone = zone.to_ascii_lowercase();
    if lname == lzone || lname.ends_with(&format!(".{lzone}")) {
        return Ok(());
    }
    Err(ValidationError::OutsideZone {
        name: name.to_string(),
        zone: zone.to_string(),
    })
}

/// Masters must be literal IP addresses; PowerDNS also accepts `ip:port`.
pub fn validate_master(master: &str) -> Result<(), ValidationError> {
    let master = master.trim();
    if master.parse::<IpAddr>().is_ok() || master.parse::<std::net::SocketAddr>().is_ok() {
        return Ok(());
    }
    Err(ValidationError::InvalidMaster(master.to_string()))
}

pub fn validate_ttl(ttl: u32) -> Result<(), ValidationError> {
    if ttl == 0 {
        return Err(ValidationError::ZeroTtl);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_trailing_dot() {
        assert_eq!(normalize_fqdn("example.com").unwrap(), "example.com.");
        assert_eq!(normalize_fqdn(" example.com. ").unwrap(), "example.com.");
    }

    #[test]
    fn normalize_lowercases() {
        assert_eq!(
            normalize_fqdn("Host01.Example.COM.").unwrap(),
            "host01.example.com."
        );
    }

    #[test]
    fn normalize_accepts_service_and_wildcard_labels() {
        assert_eq!(
            normalize_fqdn("_sip._tcp.example.com").unwrap(),
            "_sip._tcp.example.com."
        );
        assert_eq!(normalize_fqdn("*.example.com.").unwrap(), "*.example.com.");
        assert_eq!(
            normalize_fqdn("xn--bcher-kva.example").unwrap(),
            "xn--bcher-kva.example."
        );
    }

    #[test]
    fn normalize_rejects_malformed_names() {
        assert_eq!(normalize_fqdn(""), Err(ValidationError::Empty));
        assert_eq!(normalize_fqdn("."), Err(ValidationError::Empty));
        assert_eq!(normalize_fqdn(".."), Err(ValidationError::EmptyLabel("..".into())));
        assert_eq!(
            normalize_fqdn("example.com.."),
            Err(ValidationError::EmptyLabel("example.com..".into()))
        );
        assert_eq!(
            normalize_fqdn("example.com..."),
            Err(ValidationError::EmptyLabel("example.com...".into()))
        );
        assert!(matches!(
            normalize_fqdn("a..example.com"),
            Err(ValidationError::EmptyLabel(_))
        ));
        assert!(matches!(
            normalize_fqdn("host name.example.com"),
            Err(ValidationError::InvalidCharacters(_))
        ));
        assert!(matches!(
            normalize_fqdn("-host.example.com"),
            Err(ValidationError::LeadingOrTrailingHyphen(_))
        ));
        assert!(matches!(
            normalize_fqdn("www.*.example.com"),
            Err(ValidationError::InvalidCharacters(_))
        ));
        let long_label = "a".repeat(64);
        assert!(matches!(
            normalize_fqdn(&format!("{long_label}.com")),
            Err(ValidationError::LabelTooLong(_))
        ));
        let long_name = vec!["abcdefghij"; 25].join(".");
        assert_eq!(normalize_fqdn(&long_name), Err(ValidationError::NameTooLong));
    }

    #[test]
    fn in_zone_check() {
        assert!(ensure_in_zone("example.com.", "example.com.").is_ok());
        assert!(ensure_in_zone("host01.Example.com.", "example.com.").is_ok());
        assert!(ensure_in_zone("badexample.com.", "example.com.").is_err());
        assert!(ensure_in_zone("host.example.org.", "example.com.").is_err());
    }

    #[test]
    fn masters_must_be_addresses() {
        assert!(validate_master("10.0.0.1").is_ok());
        assert!(validate_master("2001:db8::1").is_ok());
        assert!(validate_master("192.0.2.1:5300").is_ok());
        assert_eq!(
            validate_master("ns1.example.com"),
            Err(ValidationError::InvalidMaster("ns1.example.com".into()))
        );
    }

    #[test]
    fn ttl_must_be_positive() {
        assert_eq!(validate_ttl(0), Err(ValidationError::ZeroTtl));
        assert!(validate_ttl(1).is_ok());
    }
}
