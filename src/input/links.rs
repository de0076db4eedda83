//! BOSH links: structured data contributed by other deployment jobs.
//!
//! JSON shape (a flat list, one entry per consumed link):
//! [
//!   {
//!     "name": "cf_network",
//!     "instances": [{"address": "10.0.16.5"}],
//!     "properties": {"network": "10.255.0.0/16"}
//!   },
//!   ...
//! ]
//!
//! Link properties are addressed the same dotted way as manifest
//! properties, and serve as fallback sources when a property is absent.

use crate::error::ResolveError;
use crate::input::properties::{self, FromValue};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LinkSet(Vec<Link>);

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub name: String,

    #[serde(default)]
    pub instances: Vec<LinkInstance>,

    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkInstance {
    #[serde(default)]
    pub address: String,
}

impl LinkSet {
    pub fn link(&self, name: &str) -> Option<&Link> {
        self.0.iter().find(|link| link.name == name)
    }

    /// Typed property from a named link. Ok(None) when the link itself is
    /// absent or does not carry the property.
    pub fn get_as<T: FromValue>(
        &self,
        link: &str,
        path: &str,
    ) -> Result<Option<T>, ResolveError> {
        match self.link(link) {
            Some(link) => link.get_as(path),
            None => Ok(None),
        }
    }

    /// Address of the named link's first instance, if it has any.
    pub fn first_instance_address(&self, link: &str) -> Option<&str> {
        self.link(link)?.first_instance_address()
    }
}

impl Link {
    pub fn property(&self, path: &str) -> Option<&Value> {
        properties::lookup(&self.properties, path).filter(|value| !value.is_null())
    }

    pub fn get_as<T: FromValue>(&self, path: &str) -> Result<Option<T>, ResolveError> {
        match self.property(path) {
            None => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| ResolveError::wrong_type(format!("{}.{path}", self.name), T::EXPECTED)),
        }
    }

    pub fn first_instance_address(&self) -> Option<&str> {
        self.instances.first().map(|instance| instance.address.as_str())
    }
}
