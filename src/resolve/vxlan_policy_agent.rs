//! VXLAN policy agent config (config/vxlan-policy-agent.json).
//!
//! Beyond manifest properties, this target consumes two links: `cf_network`
//! for the overlay subnet and `cni_config` for the ASG-logging and
//! outbound-connection settings the CNI job owns.

use crate::error::ResolveError;
use crate::input::{InstanceMetadata, LinkSet, PropertyBag};
use crate::resolve::{chain, paths, vni_for, LOG_PREFIX, LOOPBACK};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Internal listen port of the policy server's TLS API.
const POLICY_SERVER_PORT: i64 = 4003;

/// Loggregator v2 ingress port.
const LOGGREGATOR_API_PORT: i64 = 3458;

mod defaults {
    pub const CLIENT_TIMEOUT_SECONDS: i64 = 5;
    pub const DEBUG_SERVER_PORT: i64 = 8721;
    pub const FORCE_POLICY_POLL_CYCLE_PORT: i64 = 8722;
    pub const LOG_LEVEL: &str = "info";
    pub const METRON_PORT: i64 = 3457;
    pub const POLICY_SERVER_HOSTNAME: &str = "policy-server.service.cf.internal";
    pub const POLICY_POLL_INTERVAL_SECONDS: i64 = 30;
    pub const ASG_POLL_INTERVAL_SECONDS: i64 = 60;
    pub const IPTABLES_ACCEPTED_UDP_LOGS_PER_SEC: i64 = 100;
    pub const IPTABLES_DENIED_LOGS_PER_SEC: i64 = 1;
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    ca_cert_file: &'static str,
    client_cert_file: &'static str,
    client_key_file: &'static str,
    client_timeout_seconds: i64,
    cni_datastore_path: &'static str,
    debug_server_host: &'static str,
    debug_server_port: i64,
    iptables_accepted_udp_logs_per_sec: i64,
    iptables_c2c_logging: bool,
    iptables_lock_file: &'static str,
    log_level: String,
    log_prefix: String,
    underlay_ips: Vec<String>,
    metron_address: String,
    enable_overlay_ingress_rules: bool,
    policy_server_url: String,
    poll_interval: i64,
    enable_asg_syncing: bool,
    asg_poll_interval: i64,
    vni: i64,
    force_policy_poll_cycle_host: &'static str,
    force_policy_poll_cycle_port: i64,
    disable_container_network_policy: bool,
    overlay_network: String,
    iptables_asg_logging: bool,
    iptables_denied_logs_per_sec: i64,
    deny_networks: Value,
    outbound_connections: Map<String, Value>,
    loggregator: Loggregator,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Loggregator {
    loggregator_use_v2_api: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    loggregator_api_port: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    loggregator_ca_path: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    loggregator_cert_path: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    loggregator_key_path: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    loggregator_job_deployment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    loggregator_job_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    loggregator_job_index: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    loggregator_job_ip: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    loggregator_job_origin: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    loggregator_source_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    loggregator_instance_id: Option<String>,
}

pub fn config(
    properties: &PropertyBag,
    links: &LinkSet,
    instance: &InstanceMetadata,
) -> Result<Config, ResolveError> {
    let overlay_network = chain::property::<String>(properties, links, "overlay_network")
        .or_link("cf_network", "network")
        .required("cf_network.network")?;
    let overlay_networks = vec![overlay_network.clone()];

    // ASG logging settings come from the CNI job's link, not this job's
    // properties; the same link flag also gates outbound-connection logging.
    let cni_iptables_logging = links
        .get_as::<bool>("cni_config", "iptables_logging")?
        .unwrap_or(false);

    let mut outbound_connections = links
        .get_as::<Map<String, Value>>("cni_config", "outbound_connections")?
        .unwrap_or_else(default_outbound_connections);
    outbound_connections.insert("logging".to_string(), Value::Bool(cni_iptables_logging));

    let metron_port = properties
        .integer("metron_port")?
        .unwrap_or(defaults::METRON_PORT);

    let policy_server_hostname = properties
        .string("policy_server.hostname")?
        .unwrap_or_else(|| defaults::POLICY_SERVER_HOSTNAME.to_string());

    Ok(Config {
        ca_cert_file: paths::POLICY_AGENT_CA_CERT,
        client_cert_file: paths::POLICY_AGENT_CLIENT_CERT,
        client_key_file: paths::POLICY_AGENT_CLIENT_KEY,
        client_timeout_seconds: properties
            .integer("client_timeout_seconds")?
            .unwrap_or(defaults::CLIENT_TIMEOUT_SECONDS),
        cni_datastore_path: paths::CONTAINER_METADATA_STORE,
        debug_server_host: LOOPBACK,
        debug_server_port: properties
            .integer("debug_port")?
            .unwrap_or(defaults::DEBUG_SERVER_PORT),
        iptables_accepted_udp_logs_per_sec: properties
            .integer("iptables_accepted_udp_logs_per_sec")?
            .unwrap_or(defaults::IPTABLES_ACCEPTED_UDP_LOGS_PER_SEC),
        iptables_c2c_logging: properties.boolean("iptables_logging")?.unwrap_or(false),
        iptables_lock_file: paths::GARDEN_IPTABLES_LOCK,
        log_level: properties
            .string("log_level")?
            .unwrap_or_else(|| defaults::LOG_LEVEL.to_string()),
        log_prefix: properties
            .string("log_prefix")?
            .unwrap_or_else(|| LOG_PREFIX.to_string()),
        underlay_ips: instance.network_ips(),
        metron_address: format!("{LOOPBACK}:{metron_port}"),
        enable_overlay_ingress_rules: properties
            .boolean("enable_overlay_ingress_rules")?
            .unwrap_or(true),
        policy_server_url: format!("https://{policy_server_hostname}:{POLICY_SERVER_PORT}"),
        poll_interval: properties
            .integer("policy_poll_interval_seconds")?
            .unwrap_or(defaults::POLICY_POLL_INTERVAL_SECONDS),
        enable_asg_syncing: properties.boolean("enable_asg_syncing")?.unwrap_or(true),
        asg_poll_interval: properties
            .integer("asg_poll_interval_seconds")?
            .unwrap_or(defaults::ASG_POLL_INTERVAL_SECONDS),
        vni: vni_for(&overlay_networks, &overlay_network),
        force_policy_poll_cycle_host: LOOPBACK,
        force_policy_poll_cycle_port: properties
            .integer("force_policy_poll_cycle_port")?
            .unwrap_or(defaults::FORCE_POLICY_POLL_CYCLE_PORT),
        disable_container_network_policy: properties
            .boolean("disable_container_network_policy")?
            .unwrap_or(false),
        overlay_network,
        iptables_asg_logging: cni_iptables_logging,
        iptables_denied_logs_per_sec: links
            .get_as::<i64>("cni_config", "iptables_denied_logs_per_sec")?
            .unwrap_or(defaults::IPTABLES_DENIED_LOGS_PER_SEC),
        deny_networks: links
            .get_as::<Value>("cni_config", "deny_networks")?
            .unwrap_or_else(default_deny_networks),
        outbound_connections,
        loggregator: loggregator(properties, instance)?,
    })
}

fn loggregator(
    properties: &PropertyBag,
    instance: &InstanceMetadata,
) -> Result<Loggregator, ResolveError> {
    if !properties.boolean("loggregator.use_v2_api")?.unwrap_or(false) {
        return Ok(Loggregator::default());
    }
    Ok(Loggregator {
        loggregator_use_v2_api: true,
        loggregator_api_port: Some(LOGGREGATOR_API_PORT),
        loggregator_ca_path: Some(paths::LOGGREGATOR_CA_CERT),
        loggregator_cert_path: Some(paths::LOGGREGATOR_CLIENT_CERT),
        loggregator_key_path: Some(paths::LOGGREGATOR_CLIENT_KEY),
        loggregator_job_deployment: Some(instance.deployment.clone()),
        loggregator_job_name: Some(instance.name.clone()),
        loggregator_job_index: Some(instance.id.clone()),
        loggregator_job_ip: Some(instance.address.clone()),
        loggregator_job_origin: Some(instance.name.clone()),
        loggregator_source_id: Some(instance.name.clone()),
        loggregator_instance_id: Some(instance.id.clone()),
    })
}

fn default_deny_networks() -> Value {
    json!({"always": [], "running": [], "staging": []})
}

fn default_outbound_connections() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("limit".to_string(), Value::Bool(false));
    map.insert("burst".to_string(), json!(1000));
    map.insert("rate_per_sec".to_string(), json!(100));
    map
}
