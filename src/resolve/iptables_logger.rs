//! Iptables kernel-log forwarder config (config/iptables-logger.json).

use crate::error::ResolveError;
use crate::input::{InstanceMetadata, PropertyBag};
use crate::resolve::{paths, timestamp_format, LOOPBACK};
use serde::Serialize;

mod defaults {
    pub const KERNEL_LOG_FILE: &str = "/var/log/kern.log";
    pub const METRON_PORT: i64 = 3457;
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    kernel_log_file: String,
    container_metadata_file: &'static str,
    output_log_file: &'static str,
    metron_address: String,
    host_ip: String,
    host_guid: String,
    log_timestamp_format: String,
}

pub fn config(
    properties: &PropertyBag,
    instance: &InstanceMetadata,
) -> Result<Config, ResolveError> {
    let metron_port = properties
        .integer("metron_port")?
        .unwrap_or(defaults::METRON_PORT);
    Ok(Config {
        kernel_log_file: properties
            .string("kernel_log_file")?
            .unwrap_or_else(|| defaults::KERNEL_LOG_FILE.to_string()),
        container_metadata_file: paths::CONTAINER_METADATA_STORE,
        output_log_file: paths::IPTABLES_OUTPUT_LOG,
        metron_address: format!("{LOOPBACK}:{metron_port}"),
        host_ip: instance.ip.clone(),
        host_guid: instance.id.clone(),
        log_timestamp_format: timestamp_format(properties)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn instance() -> InstanceMetadata {
        serde_json::from_value(json!({"ip": "1.2.3.4", "id": "some-guid"})).unwrap()
    }

    #[test]
    fn renders_from_manifest_properties() {
        let properties: PropertyBag = serde_json::from_value(json!({
            "kernel_log_file": "mylog.file",
            "metron_port": 12345,
            "disable": false,
            "logging": {"format": {"timestamp": "rfc3339"}}
        }))
        .unwrap();
        let config = config(&properties, &instance()).unwrap();
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "kernel_log_file": "mylog.file",
                "container_metadata_file": "/var/vcap/data/container-metadata/store.json",
                "output_log_file": "/var/vcap/sys/log/iptables-logger/iptables.log",
                "metron_address": "127.0.0.1:12345",
                "host_ip": "1.2.3.4",
                "host_guid": "some-guid",
                "log_timestamp_format": "rfc3339"
            })
        );
    }

    #[test]
    fn invalid_timestamp_format_is_rejected_with_the_accepted_list() {
        let properties: PropertyBag = serde_json::from_value(json!({
            "logging": {"format": {"timestamp": "meow"}}
        }))
        .unwrap();
        let err = config(&properties, &instance()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'meow' is not a valid timestamp format for the property 'logging.format.timestamp'. \
             Valid options are: 'rfc3339' and 'deprecated'."
        );
    }
}
