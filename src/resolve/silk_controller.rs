//! Silk controller config (config/silk-controller.json), including the
//! conditional database sub-schema.

use crate::error::ResolveError;
use crate::input::{LinkSet, PropertyBag};
use crate::net;
use crate::resolve::{bounded, chain, paths, LOG_PREFIX};
use serde::Serialize;

/// Database drivers the controller can speak.
pub const DRIVERS: [&str; 2] = ["postgres", "mysql"];

mod defaults {
    pub const NETWORK: &str = "10.255.0.0/16";
    pub const SUBNET_PREFIX_LENGTH: i64 = 24;
    pub const SUBNET_LEASE_EXPIRATION_HOURS: i64 = 168;
    pub const LISTEN_IP: &str = "0.0.0.0";
    pub const LISTEN_PORT: i64 = 4103;
    pub const DEBUG_PORT: i64 = 46455;
    pub const HEALTH_CHECK_PORT: i64 = 19683;
    pub const METRON_PORT: i64 = 3457;
    pub const STALENESS_THRESHOLD_SECONDS: i64 = 3600;
    pub const METRICS_EMIT_SECONDS: i64 = 30;
    pub const MAX_IDLE_CONNECTIONS: i64 = 10;
    pub const MAX_OPEN_CONNECTIONS: i64 = 200;
    pub const CONNECTIONS_MAX_LIFETIME_SECONDS: i64 = 3600;
    pub const CONNECT_TIMEOUT_SECONDS: i64 = 120;
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    debug_server_port: i64,
    health_check_port: i64,
    listen_host: String,
    listen_port: i64,
    ca_cert_file: &'static str,
    server_cert_file: &'static str,
    server_key_file: &'static str,
    network: String,
    subnet_prefix_length: i64,
    database: Database,
    lease_expiration_seconds: i64,
    metron_port: i64,
    staleness_threshold_seconds: i64,
    metrics_emit_seconds: i64,
    log_prefix: String,
    max_idle_connections: i64,
    max_open_connections: i64,
    connections_max_lifetime_seconds: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Database {
    #[serde(rename = "type")]
    driver: String,
    user: String,
    password: String,
    host: String,
    port: i64,
    timeout: i64,
    database_name: String,
    require_ssl: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    ca_cert: Option<&'static str>,

    skip_hostname_validation: bool,
}

pub fn config(properties: &PropertyBag, links: &LinkSet) -> Result<Config, ResolveError> {
    let network = properties
        .string("network")?
        .unwrap_or_else(|| defaults::NETWORK.to_string());
    net::validate_cidr("network", &network)?;

    let listen_host = properties
        .string("listen_ip")?
        .unwrap_or_else(|| defaults::LISTEN_IP.to_string());
    net::validate_ip("listen_ip", &listen_host)?;

    let subnet_prefix_length = properties
        .integer("subnet_prefix_length")?
        .unwrap_or(defaults::SUBNET_PREFIX_LENGTH);
    let subnet_prefix_length = bounded("subnet_prefix_length", subnet_prefix_length, 1, 30)?;

    Ok(Config {
        debug_server_port: properties
            .integer("debug_port")?
            .unwrap_or(defaults::DEBUG_PORT),
        health_check_port: properties
            .integer("health_check_port")?
            .unwrap_or(defaults::HEALTH_CHECK_PORT),
        listen_host,
        listen_port: properties
            .integer("listen_port")?
            .unwrap_or(defaults::LISTEN_PORT),
        ca_cert_file: paths::SILK_CONTROLLER_CA_CERT,
        server_cert_file: paths::SILK_CONTROLLER_SERVER_CERT,
        server_key_file: paths::SILK_CONTROLLER_SERVER_KEY,
        network,
        subnet_prefix_length,
        database: database(properties, links)?,
        lease_expiration_seconds: properties
            .integer("subnet_lease_expiration_hours")?
            .unwrap_or(defaults::SUBNET_LEASE_EXPIRATION_HOURS)
            * 3600,
        metron_port: properties
            .integer("metron_port")?
            .unwrap_or(defaults::METRON_PORT),
        staleness_threshold_seconds: defaults::STALENESS_THRESHOLD_SECONDS,
        metrics_emit_seconds: defaults::METRICS_EMIT_SECONDS,
        log_prefix: properties
            .string("log_prefix")?
            .unwrap_or_else(|| LOG_PREFIX.to_string()),
        max_idle_connections: defaults::MAX_IDLE_CONNECTIONS,
        max_open_connections: properties
            .integer("max_open_connections")?
            .unwrap_or(defaults::MAX_OPEN_CONNECTIONS),
        connections_max_lifetime_seconds: properties
            .integer("connections_max_lifetime_seconds")?
            .unwrap_or(defaults::CONNECTIONS_MAX_LIFETIME_SECONDS),
    })
}

/// The `database.type` field selects the sub-schema; required fields are
/// checked in a fixed order so the operator sees the first missing one.
fn database(properties: &PropertyBag, links: &LinkSet) -> Result<Database, ResolveError> {
    let driver = match properties.string("database.type")? {
        Some(driver) => driver,
        None => return Err(ResolveError::MissingDriverType),
    };
    if !DRIVERS.contains(&driver.as_str()) {
        return Err(ResolveError::UnknownDriverType(driver));
    }

    let user = properties.require_string("database.username")?;
    let password = properties.require_string("database.password")?;
    let port = properties.require_integer("database.port")?;
    let database_name = properties.require_string("database.name")?;

    let host = chain::property::<String>(properties, links, "database.host")
        .or_link_address("database")
        .or_err(ResolveError::MissingDatabaseHost)?;

    Ok(Database {
        driver,
        user,
        password,
        host,
        port,
        timeout: properties
            .integer("database.connect_timeout_seconds")?
            .unwrap_or(defaults::CONNECT_TIMEOUT_SECONDS),
        database_name,
        require_ssl: properties.boolean("database.require_ssl")?.unwrap_or(false),
        ca_cert: properties
            .has("database.ca_cert")
            .then_some(paths::DATABASE_CA_CERT),
        skip_hostname_validation: properties
            .boolean("database.skip_hostname_validation")?
            .unwrap_or(false),
    })
}
