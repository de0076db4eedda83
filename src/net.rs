//! Strict validation for IP- and CIDR-shaped properties.
//!
//! Octets with leading zeros are rejected even when numerically valid, so
//! that a downstream consumer which treats `01` as octal cannot disagree
//! with us about which address was configured.

use crate::error::ResolveError;
use regex::Regex;
use std::sync::LazyLock;

// Each octet is 0, or a 1-3 digit run with no leading zero. Range checking
// happens after the shape check.
static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|[1-9][0-9]{0,2})\.(0|[1-9][0-9]{0,2})\.(0|[1-9][0-9]{0,2})\.(0|[1-9][0-9]{0,2})$")
        .expect("dotted-quad pattern")
});

static PREFIX_LENGTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|[1-9][0-9]?)$").expect("prefix-length pattern"));

/// Validate a dotted-quad IP address property.
pub fn validate_ip(property: &str, value: &str) -> Result<(), ResolveError> {
    if !quad_ok(value) {
        return Err(ResolveError::invalid_address(property, value));
    }
    Ok(())
}

/// Validate a CIDR-shaped property (`a.b.c.d/len`).
pub fn validate_cidr(property: &str, value: &str) -> Result<(), ResolveError> {
    let invalid = || ResolveError::invalid_address(property, value);

    let (quad, prefix) = value.split_once('/').ok_or_else(invalid)?;
    if !quad_ok(quad) {
        return Err(invalid());
    }
    if !PREFIX_LENGTH.is_match(prefix) {
        return Err(invalid());
    }
    let prefix: u32 = prefix.parse().map_err(|_| invalid())?;
    if prefix > 32 {
        return Err(invalid());
    }
    Ok(())
}

fn quad_ok(value: &str) -> bool {
    let Some(caps) = DOTTED_QUAD.captures(value) else {
        return false;
    };
    (1..=4).all(|i| caps[i].parse::<u32>().is_ok_and(|octet| octet <= 255))
}
