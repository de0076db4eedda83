//! Static teardown config: the data directories removed when silk leaves a
//! cell. Takes no inputs.

use crate::resolve::paths;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    paths_to_delete: [&'static str; 3],
}

pub fn config() -> Config {
    Config {
        paths_to_delete: [
            paths::CONTAINER_METADATA_DIR,
            paths::HOST_LOCAL_DATA_DIR,
            paths::SILK_DATA_DIR,
        ],
    }
}
