//! Instance metadata supplied per render: the deploying instance's
//! addresses, identity, and per-network IP map. Read-only.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstanceMetadata {
    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub ip: String,

    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub index: u64,

    #[serde(default)]
    pub deployment: String,

    /// Job name of the deploying instance.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub bootstrap: bool,

    #[serde(default)]
    pub networks: BTreeMap<String, Network>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub ip: String,

    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl InstanceMetadata {
    /// All per-network IPs, in network-name order so repeated renders agree.
    pub fn network_ips(&self) -> Vec<String> {
        self.networks.values().map(|network| network.ip.clone()).collect()
    }

    pub fn network_ip(&self, name: &str) -> Option<&str> {
        self.networks.get(name).map(|network| network.ip.as_str())
    }
}
