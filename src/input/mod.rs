//! Input layer: the three read-only structures a render consumes.
//!
//! This module is intentionally separate from resolution and output
//! emission. It owns:
//! - PropertyBag (manifest properties, dotted-path addressed)
//! - LinkSet (data contributed by other deployment jobs)
//! - InstanceMetadata (the deploying instance's addresses and identity)

pub mod instance;
pub mod links;
pub mod properties;

pub use instance::InstanceMetadata;
pub use links::{Link, LinkInstance, LinkSet};
pub use properties::PropertyBag;
