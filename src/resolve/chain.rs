//! Ordered fallback chains over (PropertyBag, LinkSet).
//!
//! A field that can come from more than one place resolves through an
//! ordered list of sources (manifest property, named link property, link
//! instance address, declared default) evaluated until one yields a value.
//! A wrong-typed value at any source fails the chain immediately instead of
//! falling through to the next source.

use crate::error::ResolveError;
use crate::input::properties::FromValue;
use crate::input::{LinkSet, PropertyBag};

pub struct Chain<'a, T> {
    links: &'a LinkSet,
    state: Result<Option<T>, ResolveError>,
}

/// Start a chain from a manifest property.
pub fn property<'a, T: FromValue>(
    properties: &'a PropertyBag,
    links: &'a LinkSet,
    path: &str,
) -> Chain<'a, T> {
    Chain {
        links,
        state: properties.get_as(path),
    }
}

impl<'a, T: FromValue> Chain<'a, T> {
    /// Fall back to a named link's property.
    pub fn or_link(mut self, link: &str, path: &str) -> Self {
        if matches!(self.state, Ok(None)) {
            self.state = self.links.get_as(link, path);
        }
        self
    }

    pub fn or_default(self, default: T) -> Result<T, ResolveError> {
        Ok(self.state?.unwrap_or(default))
    }

    /// All sources exhausted: fail naming the requirement.
    pub fn required(self, property: &str) -> Result<T, ResolveError> {
        self.state?.ok_or_else(|| ResolveError::missing(property))
    }

    /// All sources exhausted: fail with a caller-supplied error.
    pub fn or_err(self, err: ResolveError) -> Result<T, ResolveError> {
        self.state?.ok_or(err)
    }
}

impl<'a> Chain<'a, String> {
    /// Fall back to the address of a named link's first instance. A link
    /// with zero instances yields nothing.
    pub fn or_link_address(mut self, link: &str) -> Self {
        if matches!(self.state, Ok(None)) {
            if let Some(address) = self.links.first_instance_address(link) {
                self.state = Ok(Some(address.to_string()));
            }
        }
        self
    }
}
