//! Domain models for the feature sheet.
//!
//! # Core Concepts
//!
//! - [`Category`]: A user-named group of feature rows.
//! - [`Row`]: One feature under consideration, with its criticality, status,
//!   assigned actors and their aggregated cost.
//! - [`Actor`]: A contributor assigned to a row, with a role and a cost.
//!
//! Entities carry no identity of their own. They are addressed by position in
//! the enclosing sequence (see [`crate::sheet::Sheet`]).
//!
//! Scalar inputs coming from the outside (costs, criticality) are coerced
//! rather than validated: anything that does not parse becomes zero.

mod actor;
mod category;
mod row;

pub use actor::*;
pub use category::*;
pub use row::*;

use serde::Deserialize;

/// Loosely typed numeric input, as sent by form fields.
///
/// Numbers and numeric strings are accepted; any other JSON value falls
/// through to `Other` and is coerced by the caller.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum NumericInput {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl NumericInput {
    /// Resolve to a float, `None` when nothing numeric was sent.
    pub(crate) fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Other(_) => None,
        }
    }
}
