//! Silk daemon client config (config/client-config.json).

use crate::error::ResolveError;
use crate::input::{InstanceMetadata, LinkSet, PropertyBag};
use crate::resolve::{bounded, chain, paths, timestamp_format, vni_for, LOG_PREFIX};
use serde::Serialize;

mod defaults {
    pub const LISTEN_PORT: i64 = 23954;
    pub const POLL_INTERVAL_SECONDS: i64 = 30;
    pub const DEBUG_PORT: i64 = 22233;
    pub const PARTITION_TOLERANCE_HOURS: i64 = 24;
    pub const CLIENT_TIMEOUT_SECONDS: i64 = 5;
    pub const METRON_PORT: i64 = 3457;
    pub const VTEP_PORT: i64 = 4789;
    pub const VTEP_NAME: &str = "silk-vtep";
    pub const CONTROLLER_HOSTNAME: &str = "silk-controller.service.cf.internal";
    pub const CONTROLLER_LISTEN_PORT: i64 = 4103;
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientConfig {
    underlay_ip: String,
    subnet_prefix_length: i64,
    overlay_network: String,
    health_check_port: i64,
    vtep_name: String,
    connectivity_server_url: String,
    ca_cert_file: String,
    client_cert_file: String,
    client_key_file: String,
    vni: i64,
    poll_interval: i64,
    debug_server_port: i64,
    datastore: String,
    partition_tolerance_seconds: i64,
    client_timeout_seconds: i64,
    metron_port: i64,
    vtep_port: i64,
    log_prefix: String,
    vxlan_interface_name: String,
    single_ip_only: bool,
}

pub fn client_config(
    properties: &PropertyBag,
    links: &LinkSet,
    instance: &InstanceMetadata,
) -> Result<ClientConfig, ResolveError> {
    // The daemon reads the format out of its own logging config; rendering
    // only has to reject values the logger would choke on.
    timestamp_format(properties)?;

    if properties.has("temporary_vxlan_interface") && properties.has("vxlan_network") {
        return Err(ResolveError::exclusive(
            "temporary_vxlan_interface",
            "vxlan_network",
        ));
    }

    let underlay_ip = match properties.string("vxlan_network")? {
        Some(network) => instance
            .network_ip(&network)
            .ok_or_else(|| ResolveError::UnknownNetwork(network.clone()))?
            .to_string(),
        None => instance.ip.clone(),
    };

    let overlay_network = chain::property::<String>(properties, links, "overlay_network")
        .or_link("cf_network", "network")
        .required("cf_network.network")?;

    let subnet_prefix_length = chain::property::<i64>(properties, links, "subnet_prefix_length")
        .or_link("cf_network", "subnet_prefix_length")
        .required("cf_network.subnet_prefix_length")?;
    let subnet_prefix_length = bounded("subnet_prefix_length", subnet_prefix_length, 1, 30)?;

    let listen_port = properties
        .integer("listen_port")?
        .unwrap_or(defaults::LISTEN_PORT);

    let controller_hostname = properties
        .string("silk_controller.hostname")?
        .unwrap_or_else(|| defaults::CONTROLLER_HOSTNAME.to_string());
    let controller_port = properties
        .integer("silk_controller.listen_port")?
        .unwrap_or(defaults::CONTROLLER_LISTEN_PORT);

    let overlay_networks = vec![overlay_network.clone()];

    Ok(ClientConfig {
        underlay_ip,
        subnet_prefix_length,
        vni: vni_for(&overlay_networks, &overlay_network),
        overlay_network,
        health_check_port: listen_port,
        vtep_name: properties
            .string("vtep_name")?
            .unwrap_or_else(|| defaults::VTEP_NAME.to_string()),
        connectivity_server_url: format!("https://{controller_hostname}:{controller_port}"),
        ca_cert_file: properties
            .string("ca_cert_file")?
            .unwrap_or_else(|| paths::SILK_DAEMON_CA_CERT.to_string()),
        client_cert_file: properties
            .string("client_cert_file")?
            .unwrap_or_else(|| paths::SILK_DAEMON_CLIENT_CERT.to_string()),
        client_key_file: properties
            .string("client_key_file")?
            .unwrap_or_else(|| paths::SILK_DAEMON_CLIENT_KEY.to_string()),
        poll_interval: properties
            .integer("poll_interval")?
            .unwrap_or(defaults::POLL_INTERVAL_SECONDS),
        debug_server_port: properties
            .integer("debug_port")?
            .unwrap_or(defaults::DEBUG_PORT),
        datastore: properties
            .string("datastore")?
            .unwrap_or_else(|| paths::SILK_DATASTORE.to_string()),
        partition_tolerance_seconds: properties
            .integer("partition_tolerance_hours")?
            .unwrap_or(defaults::PARTITION_TOLERANCE_HOURS)
            * 3600,
        client_timeout_seconds: properties
            .integer("client_timeout_seconds")?
            .unwrap_or(defaults::CLIENT_TIMEOUT_SECONDS),
        metron_port: properties
            .integer("metron_port")?
            .unwrap_or(defaults::METRON_PORT),
        vtep_port: properties
            .integer("vtep_port")?
            .unwrap_or(defaults::VTEP_PORT),
        log_prefix: properties
            .string("log_prefix")?
            .unwrap_or_else(|| LOG_PREFIX.to_string()),
        vxlan_interface_name: properties
            .string("temporary_vxlan_interface")?
            .unwrap_or_default(),
        single_ip_only: properties.boolean("single_ip_only")?.unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{resolve, Rendered, Target};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bag(value: serde_json::Value) -> PropertyBag {
        serde_json::from_value(value).unwrap()
    }

    fn cf_network_links() -> LinkSet {
        serde_json::from_value(json!([{
            "name": "cf_network",
            "instances": [{"address": ""}],
            "properties": {"network": "10.255.0.0/16", "subnet_prefix_length": 24}
        }]))
        .unwrap()
    }

    fn full_properties() -> PropertyBag {
        bag(json!({
            "listen_port": 12345,
            "vtep_name": "silk-vtep",
            "silk_controller": {"hostname": "some-host", "listen_port": 12345},
            "ca_cert_file": "/var/vcap/jobs/silk-daemon/config/certs/ca.crt",
            "client_cert_file": "/var/vcap/jobs/silk-daemon/config/certs/client.crt",
            "client_key_file": "/var/vcap/jobs/silk-daemon/config/certs/client.key",
            "datastore": "/var/vcap/data/silk/store.json",
            "partition_tolerance_hours": 1,
            "client_timeout_seconds": 5,
            "debug_port": 89,
            "metron_port": 5678,
            "vtep_port": 6666,
            "log_prefix": "cfnetworking",
            "single_ip_only": true,
            "logging": {"format": {"timestamp": "rfc3339"}}
        }))
    }

    fn default_instance() -> InstanceMetadata {
        serde_json::from_value(json!({"ip": "192.168.0.0"})).unwrap()
    }

    #[test]
    fn renders_from_manifest_properties_and_the_cf_network_link() {
        let config =
            client_config(&full_properties(), &cf_network_links(), &default_instance()).unwrap();
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "underlay_ip": "192.168.0.0",
                "subnet_prefix_length": 24,
                "overlay_network": "10.255.0.0/16",
                "health_check_port": 12345,
                "vtep_name": "silk-vtep",
                "connectivity_server_url": "https://some-host:12345",
                "ca_cert_file": "/var/vcap/jobs/silk-daemon/config/certs/ca.crt",
                "client_cert_file": "/var/vcap/jobs/silk-daemon/config/certs/client.crt",
                "client_key_file": "/var/vcap/jobs/silk-daemon/config/certs/client.key",
                "vni": 1,
                "poll_interval": 30,
                "debug_server_port": 89,
                "datastore": "/var/vcap/data/silk/store.json",
                "partition_tolerance_seconds": 3600,
                "client_timeout_seconds": 5,
                "metron_port": 5678,
                "vtep_port": 6666,
                "log_prefix": "cfnetworking",
                "vxlan_interface_name": "",
                "single_ip_only": true
            })
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let properties = full_properties();
        let links = cf_network_links();
        let instance = default_instance();
        let first = resolve(Target::SilkDaemon, &properties, &links, &instance).unwrap();
        let second = resolve(Target::SilkDaemon, &properties, &links, &instance).unwrap();
        assert_eq!(first.to_bytes(), second.to_bytes());
        assert!(matches!(first, Rendered::Json(_)));
    }

    #[test]
    fn vxlan_interface_and_network_are_mutually_exclusive() {
        let properties = bag(json!({
            "temporary_vxlan_interface": "some-vxlan-interface",
            "vxlan_network": "some-vxlan-network"
        }));
        let err = client_config(&properties, &cf_network_links(), &default_instance()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot specify both 'temporary_vxlan_interface' and 'vxlan_network' properties."
        );
    }

    #[test]
    fn temporary_vxlan_interface_sets_the_interface_name() {
        let properties = bag(json!({"temporary_vxlan_interface": "some-vxlan-interface"}));
        let config =
            client_config(&properties, &cf_network_links(), &default_instance()).unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["vxlan_interface_name"], json!("some-vxlan-interface"));
    }

    #[test]
    fn vxlan_network_selects_the_matching_network_ip() {
        let properties = bag(json!({"vxlan_network": "fake-network"}));
        let instance: InstanceMetadata = serde_json::from_value(json!({
            "address": "cloudfoundry.org",
            "bootstrap": true,
            "networks": {
                "fake-network": {"fake-network-settings": {}, "ip": "192.74.65.4"}
            }
        }))
        .unwrap();
        let config = client_config(&properties, &cf_network_links(), &instance).unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["underlay_ip"], json!("192.74.65.4"));
    }

    #[test]
    fn vxlan_network_missing_from_the_instance_is_an_error() {
        let properties = bag(json!({"vxlan_network": "absent"}));
        let err = client_config(&properties, &cf_network_links(), &default_instance()).unwrap_err();
        assert_eq!(err, ResolveError::UnknownNetwork("absent".to_string()));
    }

    #[test]
    fn invalid_timestamp_format_is_rejected_with_the_accepted_list() {
        let properties = bag(json!({"logging": {"format": {"timestamp": "meow"}}}));
        let err = client_config(&properties, &cf_network_links(), &default_instance()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'meow' is not a valid timestamp format for the property 'logging.format.timestamp'. \
             Valid options are: 'rfc3339' and 'deprecated'."
        );
    }

    #[test]
    fn missing_cf_network_link_names_the_requirement() {
        let err =
            client_config(&PropertyBag::default(), &LinkSet::default(), &default_instance())
                .unwrap_err();
        assert_eq!(err, ResolveError::missing("cf_network.network"));
    }
}
