//! Certificate passthrough: property values emitted as raw text blobs
//! rather than JSON documents.

use crate::error::ResolveError;
use crate::input::PropertyBag;

/// The controller's database CA renders verbatim.
pub fn database_ca(properties: &PropertyBag) -> Result<String, ResolveError> {
    properties.require_string("database.ca_cert")
}

/// Loggregator cert material renders with the surrounding newlines the
/// agent's credential loader expects.
pub fn loggregator(properties: &PropertyBag, property: &str) -> Result<String, ResolveError> {
    let value = properties.require_string(property)?;
    Ok(format!("\n{value}\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bag(value: serde_json::Value) -> PropertyBag {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn database_ca_renders_the_property_verbatim() {
        let properties = bag(json!({"database": {"ca_cert": "the ca cert"}}));
        assert_eq!(database_ca(&properties).unwrap(), "the ca cert");
    }

    #[test]
    fn database_ca_requires_the_property() {
        assert_eq!(
            database_ca(&PropertyBag::default()).unwrap_err(),
            ResolveError::missing("database.ca_cert")
        );
    }

    #[test]
    fn loggregator_certs_render_with_surrounding_newlines() {
        let properties = bag(json!({"loggregator": {
            "ca_cert": "some-ca-cert",
            "cert": "some-client-cert",
            "key": "some-client-key"
        }}));
        assert_eq!(
            loggregator(&properties, "loggregator.ca_cert").unwrap(),
            "\nsome-ca-cert\n\n"
        );
        assert_eq!(
            loggregator(&properties, "loggregator.cert").unwrap(),
            "\nsome-client-cert\n\n"
        );
        assert_eq!(
            loggregator(&properties, "loggregator.key").unwrap(),
            "\nsome-client-key\n\n"
        );
    }
}
