//! Resolution layer: one module per target document.
//!
//! Each target owns its output schema, defaults table, and resolution
//! function; `resolve` dispatches on the `Target` variant. A render is a
//! single linear pass that stops at the first validation failure: a
//! deploy-time configuration error must stop the deploy, so a partial
//! document is never produced.

pub mod certs;
pub mod chain;
pub mod cni;
pub mod iptables_logger;
pub mod paths;
pub mod silk_controller;
pub mod silk_daemon;
pub mod teardown;
pub mod vxlan_policy_agent;

use crate::error::ResolveError;
use crate::input::{InstanceMetadata, LinkSet, PropertyBag};
use clap::ValueEnum;
use serde::Serialize;

/// Shared log prefix for the cf-networking components.
pub(crate) const LOG_PREFIX: &str = "cfnetworking";

/// Loopback host the metron agent and debug servers listen on.
pub(crate) const LOOPBACK: &str = "127.0.0.1";

/// Accepted values for `logging.format.timestamp`.
pub(crate) const TIMESTAMP_FORMATS: [&str; 2] = ["rfc3339", "deprecated"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    CniWrapperConf,
    CniWrapperConflist,
    SilkDaemon,
    SilkController,
    VxlanPolicyAgent,
    IptablesLogger,
    Teardown,
    DatabaseCaCert,
    LoggregatorCaCert,
    LoggregatorClientCert,
    LoggregatorClientKey,
}

impl Target {
    /// Designated location the rendered document is written to when the
    /// caller does not override it.
    pub fn output_path(self) -> &'static str {
        match self {
            Target::CniWrapperConf => "/var/vcap/jobs/cni/config/cni/cni-wrapper-plugin.conf",
            Target::CniWrapperConflist => {
                "/var/vcap/jobs/silk-cni/config/cni/cni-wrapper-plugin.conflist"
            }
            Target::SilkDaemon => "/var/vcap/jobs/silk-daemon/config/client-config.json",
            Target::SilkController => "/var/vcap/jobs/silk-controller/config/silk-controller.json",
            Target::VxlanPolicyAgent => {
                "/var/vcap/jobs/vxlan-policy-agent/config/vxlan-policy-agent.json"
            }
            Target::IptablesLogger => "/var/vcap/jobs/iptables-logger/config/iptables-logger.json",
            Target::Teardown => "/var/vcap/jobs/silk-cni/config/teardown-config.json",
            Target::DatabaseCaCert => paths::DATABASE_CA_CERT,
            Target::LoggregatorCaCert => paths::LOGGREGATOR_CA_CERT,
            Target::LoggregatorClientCert => paths::LOGGREGATOR_CLIENT_CERT,
            Target::LoggregatorClientKey => paths::LOGGREGATOR_CLIENT_KEY,
        }
    }
}

/// A finalized document: JSON for the config consumers, raw text for the
/// certificate passthrough targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Json(serde_json::Value),
    Text(String),
}

impl Rendered {
    /// Byte form written to the output path.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Rendered::Json(value) => {
                // Infallible: the value was built from our own Serialize types.
                let mut out = serde_json::to_string_pretty(value).expect("JSON value serializes");
                out.push('\n');
                out.into_bytes()
            }
            Rendered::Text(text) => text.clone().into_bytes(),
        }
    }
}

/// Resolve one target document. Pure apart from the error it may raise:
/// identical inputs always produce identical output.
pub fn resolve(
    target: Target,
    properties: &PropertyBag,
    links: &LinkSet,
    instance: &InstanceMetadata,
) -> Result<Rendered, ResolveError> {
    let rendered = match target {
        Target::CniWrapperConf => to_json(&cni::conf(properties, instance)?),
        Target::CniWrapperConflist => to_json(&cni::conflist(properties, links, instance)?),
        Target::SilkDaemon => to_json(&silk_daemon::client_config(properties, links, instance)?),
        Target::SilkController => to_json(&silk_controller::config(properties, links)?),
        Target::VxlanPolicyAgent => {
            to_json(&vxlan_policy_agent::config(properties, links, instance)?)
        }
        Target::IptablesLogger => to_json(&iptables_logger::config(properties, instance)?),
        Target::Teardown => to_json(&teardown::config()),
        Target::DatabaseCaCert => Rendered::Text(certs::database_ca(properties)?),
        Target::LoggregatorCaCert => {
            Rendered::Text(certs::loggregator(properties, "loggregator.ca_cert")?)
        }
        Target::LoggregatorClientCert => {
            Rendered::Text(certs::loggregator(properties, "loggregator.cert")?)
        }
        Target::LoggregatorClientKey => {
            Rendered::Text(certs::loggregator(properties, "loggregator.key")?)
        }
    };
    Ok(rendered)
}

fn to_json<T: Serialize>(document: &T) -> Rendered {
    // Infallible: every target schema is a plain string-keyed tree.
    Rendered::Json(serde_json::to_value(document).expect("target schemas serialize"))
}

/// Resolve and validate `logging.format.timestamp` (shared by the jobs that
/// configure a lager-style logger).
pub(crate) fn timestamp_format(properties: &PropertyBag) -> Result<String, ResolveError> {
    let format = properties
        .string("logging.format.timestamp")?
        .unwrap_or_else(|| "deprecated".to_string());
    if !TIMESTAMP_FORMATS.contains(&format.as_str()) {
        return Err(ResolveError::invalid_enum(
            "logging.format.timestamp",
            format,
            "timestamp format",
            &TIMESTAMP_FORMATS,
        ));
    }
    Ok(format)
}

/// Inclusive-bound check for integer properties.
pub(crate) fn bounded(
    property: &str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<i64, ResolveError> {
    if value < min || value > max {
        return Err(ResolveError::out_of_range(property, min, max));
    }
    Ok(value)
}

/// VXLAN network identifier for an overlay subnet: subnets are numbered
/// from 1 in overlay-network-list order. Both silk and the policy agent run
/// a single overlay today, so the derived VNI is 1.
pub(crate) fn vni_for(overlay_networks: &[String], subnet: &str) -> i64 {
    let position = overlay_networks
        .iter()
        .position(|network| network == subnet)
        .unwrap_or(0);
    position as i64 + 1
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
    fn timestamp_format_defaults_and_validates() {
        assert_eq!(timestamp_format(&PropertyBag::default()).unwrap(), "deprecated");
        assert_eq!(
            timestamp_format(&bag(json!({
                "logging": {"format": {"timestamp": "rfc3339"}}
            })))
            .unwrap(),
            "rfc3339"
        );
        let err = timestamp_format(&bag(json!({
            "logging": {"format": {"timestamp": "meow"}}
        })))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'meow' is not a valid timestamp format for the property 'logging.format.timestamp'. \
             Valid options are: 'rfc3339' and 'deprecated'."
        );
    }

    #[test]
    fn bounded_is_inclusive() {
        assert_eq!(bounded("subnet_prefix_length", 1, 1, 30).unwrap(), 1);
        assert_eq!(bounded("subnet_prefix_length", 30, 1, 30).unwrap(), 30);
        assert!(bounded("subnet_prefix_length", 0, 1, 30).is_err());
        assert!(bounded("subnet_prefix_length", 31, 1, 30).is_err());
    }

    #[test]
    fn vni_numbers_overlay_subnets_from_one() {
        let networks = vec!["10.255.0.0/16".to_string(), "10.200.0.0/16".to_string()];
        assert_eq!(vni_for(&networks, "10.255.0.0/16"), 1);
        assert_eq!(vni_for(&networks, "10.200.0.0/16"), 2);
    }

    #[test]
    fn rendered_json_bytes_end_with_a_newline() {
        let rendered = Rendered::Json(json!({"a": 1}));
        let bytes = rendered.to_bytes();
        assert_eq!(bytes.last(), Some(&b'\n'));
    }

    #[test]
    fn every_target_has_a_designated_path() {
        for target in [
            Target::CniWrapperConf,
            Target::CniWrapperConflist,
            Target::SilkDaemon,
            Target::SilkController,
            Target::VxlanPolicyAgent,
            Target::IptablesLogger,
            Target::Teardown,
            Target::DatabaseCaCert,
            Target::LoggregatorCaCert,
            Target::LoggregatorClientCert,
            Target::LoggregatorClientKey,
        ] {
            assert!(target.output_path().starts_with("/var/vcap/"));
        }
    }
}
