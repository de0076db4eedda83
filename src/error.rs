//! Resolution error taxonomy.
//!
//! Every variant carries the operator-facing message for one class of
//! deploy-time configuration mistake. Messages name the offending property
//! and, where applicable, the valid alternatives, because they surface in
//! deploy output where the operator has to act on them. All errors are
//! terminal for the render that raised them.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("{property} must be specified")]
    MissingRequiredValue { property: String },

    /// The database host is special-cased: it can come from either the
    /// `database.host` property or the `database` link's instance address.
    #[error("must provide database link or set database.host")]
    MissingDatabaseHost,

    #[error("Cannot specify both '{first}' and '{second}' properties.")]
    MutuallyExclusiveProperties { first: String, second: String },

    #[error("'{value}' is not a valid {noun} for the property '{property}'. Valid options are: {options}.")]
    InvalidEnumValue {
        property: String,
        value: String,
        noun: String,
        options: String,
    },

    #[error("Invalid {property}: {value}")]
    InvalidNetworkAddress { property: String, value: String },

    #[error("{property} must be a value between {min}-{max}")]
    OutOfRangeValue {
        property: String,
        min: i64,
        max: i64,
    },

    #[error("unknown driver {0}")]
    UnknownDriverType(String),

    #[error("database.type must be specified")]
    MissingDriverType,

    #[error("property '{property}' must be {expected}")]
    WrongType {
        property: String,
        expected: &'static str,
    },

    #[error("instance has no network named '{0}'")]
    UnknownNetwork(String),
}

impl ResolveError {
    pub fn missing(property: impl Into<String>) -> Self {
        ResolveError::MissingRequiredValue {
            property: property.into(),
        }
    }

    pub fn exclusive(first: impl Into<String>, second: impl Into<String>) -> Self {
        ResolveError::MutuallyExclusiveProperties {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn invalid_enum(
        property: impl Into<String>,
        value: impl Into<String>,
        noun: impl Into<String>,
        accepted: &[&str],
    ) -> Self {
        ResolveError::InvalidEnumValue {
            property: property.into(),
            value: value.into(),
            noun: noun.into(),
            options: options_list(accepted),
        }
    }

    pub fn invalid_address(property: impl Into<String>, value: impl Into<String>) -> Self {
        ResolveError::InvalidNetworkAddress {
            property: property.into(),
            value: value.into(),
        }
    }

    pub fn out_of_range(property: impl Into<String>, min: i64, max: i64) -> Self {
        ResolveError::OutOfRangeValue {
            property: property.into(),
            min,
            max,
        }
    }

    pub fn wrong_type(property: impl Into<String>, expected: &'static str) -> Self {
        ResolveError::WrongType {
            property: property.into(),
            expected,
        }
    }
}

/// Quote the accepted values the way they read in an error message:
/// `'a' and 'b'`, or `'a', 'b' and 'c'`.
fn options_list(accepted: &[&str]) -> String {
    match accepted {
        [] => String::new(),
        [only] => format!("'{only}'"),
        [init @ .., last] => {
            let init = init
                .iter()
                .map(|option| format!("'{option}'"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{init} and '{last}'")
        }
    }
}
