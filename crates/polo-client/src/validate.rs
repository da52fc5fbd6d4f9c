//! Request validation.
//!
//! Pure functions, no I/O. Check order is a contract callers may rely on
//! for diagnostics: multicast groups first, then the service name, then
//! flags in declaration order (permanent, root, delete_file).

use std::net::Ipv4Addr;

use polo_types::{Action, RequestEnvelope};
use serde_json::Value;

use crate::error::PoloError;

/// Whether `addr` is a usable multicast group address: IPv4 dotted-quad,
/// first octet in 224–239, and not inside the 224.0.0.0/24 block reserved
/// for network control traffic.
pub fn is_multicast_group(addr: &str) -> bool {
    let Ok(ip) = addr.parse::<Ipv4Addr>() else {
        return false;
    };
    let octets = ip.octets();
    if !(224..=239).contains(&octets[0]) {
        return false;
    }
    !(octets[0] == 224 && octets[1] == 0 && octets[2] == 0)
}

/// Validate a whole request envelope in the contract order.
pub fn validate_request(envelope: &RequestEnvelope) -> Result<(), PoloError> {
    validate_groups(&envelope.multicast_groups)?;
    validate_service_name(&envelope.service)?;

    let flags: &[&'static str] = match envelope.action {
        Action::Publish => &["permanent", "root"],
        Action::Unpublish => &["delete_file"],
        Action::Info => &[],
    };
    for &flag in flags {
        if let Some(value) = envelope.flags.get(flag) {
            validate_flag(value, flag)?;
        }
    }
    Ok(())
}

/// Every member must be a text value passing [`is_multicast_group`]; the
/// first offender fails the whole set, named verbatim. An empty set is
/// valid and means "use the daemon's configured defaults".
pub fn validate_groups(groups: &[Value]) -> Result<(), PoloError> {
    for value in groups {
        if !value.as_str().is_some_and(is_multicast_group) {
            return Err(PoloError::InvalidMulticastGroup(render(value)));
        }
    }
    Ok(())
}

/// The service name must be a non-empty text value.
pub fn validate_service_name(name: &Value) -> Result<(), PoloError> {
    match name.as_str() {
        Some(text) if !text.is_empty() => Ok(()),
        _ => Err(PoloError::InvalidServiceName(render(name))),
    }
}

/// A flag must be a genuine boolean; no truthiness coercion.
pub fn validate_flag(value: &Value, flag: &'static str) -> Result<(), PoloError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(PoloError::InvalidFlag { flag })
    }
}

/// Render an offending value for an error message: the text itself for
/// strings, the JSON form otherwise (`1`, `null`, `"x"` stays `x`).
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
