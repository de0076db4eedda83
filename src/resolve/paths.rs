//! Well-known filesystem locations under the conventional runtime-data
//! root. One table so the contract between jobs stays auditable.

pub const CONTAINER_METADATA_DIR: &str = "/var/vcap/data/container-metadata";
pub const CONTAINER_METADATA_STORE: &str = "/var/vcap/data/container-metadata/store.json";
pub const GARDEN_IPTABLES_LOCK: &str = "/var/vcap/data/garden-cni/iptables.lock";
pub const HOST_LOCAL_DATA_DIR: &str = "/var/vcap/data/host-local";
pub const SILK_DATA_DIR: &str = "/var/vcap/data/silk";
pub const SILK_DATASTORE: &str = "/var/vcap/data/silk/store.json";

pub const SILK_DAEMON_CA_CERT: &str = "/var/vcap/jobs/silk-daemon/config/certs/ca.crt";
pub const SILK_DAEMON_CLIENT_CERT: &str = "/var/vcap/jobs/silk-daemon/config/certs/client.crt";
pub const SILK_DAEMON_CLIENT_KEY: &str = "/var/vcap/jobs/silk-daemon/config/certs/client.key";

pub const SILK_CONTROLLER_CA_CERT: &str = "/var/vcap/jobs/silk-controller/config/certs/ca.crt";
pub const SILK_CONTROLLER_SERVER_CERT: &str =
    "/var/vcap/jobs/silk-controller/config/certs/server.crt";
pub const SILK_CONTROLLER_SERVER_KEY: &str =
    "/var/vcap/jobs/silk-controller/config/certs/server.key";
pub const DATABASE_CA_CERT: &str = "/var/vcap/jobs/silk-controller/config/certs/database_ca.crt";

pub const POLICY_AGENT_CA_CERT: &str = "/var/vcap/jobs/vxlan-policy-agent/config/certs/ca.crt";
pub const POLICY_AGENT_CLIENT_CERT: &str =
    "/var/vcap/jobs/vxlan-policy-agent/config/certs/client.crt";
pub const POLICY_AGENT_CLIENT_KEY: &str =
    "/var/vcap/jobs/vxlan-policy-agent/config/certs/client.key";
pub const LOGGREGATOR_CA_CERT: &str =
    "/var/vcap/jobs/vxlan-policy-agent/config/certs/loggregator/ca.crt";
pub const LOGGREGATOR_CLIENT_CERT: &str =
    "/var/vcap/jobs/vxlan-policy-agent/config/certs/loggregator/client.crt";
pub const LOGGREGATOR_CLIENT_KEY: &str =
    "/var/vcap/jobs/vxlan-policy-agent/config/certs/loggregator/client.key";

pub const IPTABLES_OUTPUT_LOG: &str = "/var/vcap/sys/log/iptables-logger/iptables.log";
