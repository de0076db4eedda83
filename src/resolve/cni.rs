//! CNI wrapper plugin configs: the flat conf consumed directly by the
//! container runtime, and the conflist variant that wraps the same plugin
//! entry in a plugin list. Both embed a delegate section describing the
//! chained silk plugin.

use crate::error::ResolveError;
use crate::input::{InstanceMetadata, LinkSet, PropertyBag};
use crate::resolve::{chain, paths};
use serde::Serialize;

const CNI_VERSION: &str = "0.3.1";
const WRAPPER_NAME: &str = "cni-wrapper";
const WRAPPER_TYPE: &str = "cni-wrapper-plugin";
const DELEGATE_NAME: &str = "silk";
const DELEGATE_TYPE: &str = "silk-cni";

/// Tag applied to traffic entering the overlay.
const INGRESS_TAG: &str = "ffff0000";

/// VXLAN encapsulation overhead subtracted from a caller-supplied MTU.
const VXLAN_OVERHEAD: i64 = 50;

/// Bandwidth properties arrive in kilobytes per second; the delegate wants
/// bytes per second.
const KILOBYTES: i64 = 1024;

mod defaults {
    pub const VTEP_NAME: &str = "silk-vtep";
    pub const SILK_DAEMON_LISTEN_PORT: i64 = 23954;
    pub const MTU: i64 = 0;
    pub const IPTABLES_DENIED_LOGS_PER_SEC: i64 = 1;
    pub const IPTABLES_ACCEPTED_UDP_LOGS_PER_SEC: i64 = 100;
}

#[derive(Debug, Clone, Serialize)]
pub struct Conf {
    name: &'static str,

    #[serde(rename = "type")]
    plugin_type: &'static str,

    #[serde(rename = "cniVersion")]
    cni_version: &'static str,

    #[serde(flatten)]
    wrapper: Wrapper,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfList {
    name: &'static str,

    #[serde(rename = "cniVersion")]
    cni_version: &'static str,

    plugins: Vec<Plugin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Plugin {
    #[serde(rename = "type")]
    plugin_type: &'static str,

    #[serde(flatten)]
    wrapper: Wrapper,
}

/// Plugin fields common to both variants. The conflist adds the masquerade
/// exclusion and host service list on top.
#[derive(Debug, Clone, Serialize)]
pub struct Wrapper {
    datastore: &'static str,
    iptables_lock_file: &'static str,
    instance_address: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    no_masquerade_cidr_range: Option<String>,

    temporary_underlay_interface_names: Vec<String>,
    underlay_ips: Vec<String>,
    iptables_asg_logging: bool,
    iptables_c2c_logging: bool,
    iptables_denied_logs_per_sec: i64,
    iptables_accepted_udp_logs_per_sec: i64,
    ingress_tag: &'static str,
    vtep_name: String,
    dns_servers: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    host_tcp_services: Option<Vec<String>>,

    delegate: Delegate,
}

#[derive(Debug, Clone, Serialize)]
pub struct Delegate {
    #[serde(rename = "cniVersion")]
    cni_version: &'static str,

    name: &'static str,

    #[serde(rename = "type")]
    delegate_type: &'static str,

    #[serde(rename = "daemonPort")]
    daemon_port: i64,

    #[serde(rename = "dataDir")]
    data_dir: &'static str,

    datastore: &'static str,
    mtu: i64,

    #[serde(rename = "bandwidthLimits", skip_serializing_if = "Option::is_none")]
    bandwidth_limits: Option<BandwidthLimits>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BandwidthLimits {
    rate: i64,
    burst: i64,
}

pub fn conf(
    properties: &PropertyBag,
    instance: &InstanceMetadata,
) -> Result<Conf, ResolveError> {
    Ok(Conf {
        name: WRAPPER_NAME,
        plugin_type: WRAPPER_TYPE,
        cni_version: CNI_VERSION,
        wrapper: wrapper(properties, instance)?,
    })
}

pub fn conflist(
    properties: &PropertyBag,
    links: &LinkSet,
    instance: &InstanceMetadata,
) -> Result<ConfList, ResolveError> {
    let mut wrapper = wrapper(properties, instance)?;
    wrapper.no_masquerade_cidr_range = Some(
        chain::property::<String>(properties, links, "no_masquerade_cidr_range")
            .or_link("cf_network", "network")
            .or_default(String::new())?,
    );
    wrapper.host_tcp_services = Some(properties.string_list("host_tcp_services")?.unwrap_or_default());
    Ok(ConfList {
        name: WRAPPER_NAME,
        cni_version: CNI_VERSION,
        plugins: vec![Plugin {
            plugin_type: WRAPPER_TYPE,
            wrapper,
        }],
    })
}

fn wrapper(
    properties: &PropertyBag,
    instance: &InstanceMetadata,
) -> Result<Wrapper, ResolveError> {
    let iptables_logging = properties.boolean("iptables_logging")?.unwrap_or(false);

    // The temporary override exists for underlay interface migrations; when
    // absent the instance's own network IPs are used.
    let underlay_ips = match properties.string_list("temporary.underlay_interface_ips")? {
        Some(ips) => ips,
        None => instance.network_ips(),
    };

    Ok(Wrapper {
        datastore: paths::CONTAINER_METADATA_STORE,
        iptables_lock_file: paths::GARDEN_IPTABLES_LOCK,
        instance_address: instance.ip.clone(),
        no_masquerade_cidr_range: None,
        temporary_underlay_interface_names: properties
            .string_list("temporary.underlay_interface_names")?
            .unwrap_or_default(),
        underlay_ips,
        iptables_asg_logging: iptables_logging,
        iptables_c2c_logging: iptables_logging,
        iptables_denied_logs_per_sec: properties
            .integer("iptables_denied_logs_per_sec")?
            .unwrap_or(defaults::IPTABLES_DENIED_LOGS_PER_SEC),
        iptables_accepted_udp_logs_per_sec: properties
            .integer("iptables_accepted_udp_logs_per_sec")?
            .unwrap_or(defaults::IPTABLES_ACCEPTED_UDP_LOGS_PER_SEC),
        ingress_tag: INGRESS_TAG,
        vtep_name: properties
            .string("vtep_name")?
            .unwrap_or_else(|| defaults::VTEP_NAME.to_string()),
        dns_servers: properties.string_list("dns_servers")?.unwrap_or_default(),
        host_tcp_services: None,
        delegate: delegate(properties)?,
    })
}

fn delegate(properties: &PropertyBag) -> Result<Delegate, ResolveError> {
    let mtu = properties.integer("mtu")?.unwrap_or(defaults::MTU);
    Ok(Delegate {
        cni_version: CNI_VERSION,
        name: DELEGATE_NAME,
        delegate_type: DELEGATE_TYPE,
        daemon_port: properties
            .integer("silk_daemon.listen_port")?
            .unwrap_or(defaults::SILK_DAEMON_LISTEN_PORT),
        data_dir: paths::HOST_LOCAL_DATA_DIR,
        datastore: paths::SILK_DATASTORE,
        mtu: delegate_mtu("mtu", mtu)?,
        bandwidth_limits: bandwidth_limits(properties)?,
    })
}

/// An MTU of exactly 0 means "no override, let the OS pick"; any positive
/// MTU loses the VXLAN encapsulation overhead before it reaches the
/// delegate.
fn delegate_mtu(property: &str, mtu: i64) -> Result<i64, ResolveError> {
    if mtu < 0 {
        return Err(ResolveError::out_of_range(property, 0, 65535));
    }
    if mtu == 0 {
        return Ok(0);
    }
    Ok(mtu - VXLAN_OVERHEAD)
}

fn bandwidth_limits(properties: &PropertyBag) -> Result<Option<BandwidthLimits>, ResolveError> {
    let rate = properties.integer("rate")?;
    let burst = properties.integer("burst")?;
    match (rate, burst) {
        (None, None) => Ok(None),
        (Some(rate), Some(burst)) => Ok(Some(BandwidthLimits {
            rate: rate * KILOBYTES,
            burst: burst * KILOBYTES,
        })),
        (Some(_), None) => Err(ResolveError::missing("burst")),
        (None, Some(_)) => Err(ResolveError::missing("rate")),
    }
}
