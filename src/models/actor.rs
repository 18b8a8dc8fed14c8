use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::NumericInput;

/// A contributor assigned to a feature row.
///
/// Duplicates (same name, same role) are allowed; actors are kept in
/// insertion order, which is also their display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Free-text label, may be empty.
    pub name: String,
    pub role: Role,
    pub cost: Cost,
}

impl Actor {
    pub fn new(name: impl Into<String>, role: Role, cost: Cost) -> Self {
        Self {
            name: name.into(),
            role,
            cost,
        }
    }
}

impl Default for Actor {
    /// A freshly added actor: no name, `Other`, zero cost.
    fn default() -> Self {
        Self::new("", Role::Other, Cost::ZERO)
    }
}

/// The role an actor plays on a row.
///
/// The three built-in roles are what the editor offers. Any other label is
/// kept verbatim as `Custom` and rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Dev,
    Design,
    Other,
    Custom(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Dev => "Dev",
            Self::Design => "Design",
            Self::Other => "Other",
            Self::Custom(label) => label,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "Dev" => Self::Dev,
            "Design" => Self::Design,
            "Other" => Self::Other,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Custom(label) => label,
            builtin => builtin.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-negative amount in currency units.
///
/// Construction never fails: negative, NaN, infinite and unparseable inputs
/// all collapse to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Cost(f64);

impl Cost {
    pub const ZERO: Cost = Cost(0.0);

    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self::ZERO
        }
    }

    /// Parse user input, coercing failures to zero.
    pub fn parse(input: &str) -> Self {
        input
            .trim()
            .parse::<f64>()
            .map(Self::new)
            .unwrap_or(Self::ZERO)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Cost {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let input = NumericInput::deserialize(deserializer)?;
        Ok(input.to_f64().map(Self::new).unwrap_or(Self::ZERO))
    }
}

/// A single-field edit on an actor.
///
/// Serialized as `{ "field": "cost", "value": 150 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ActorField {
    Name(String),
    Role(Role),
    Cost(Cost),
}

impl ActorField {
    pub fn apply(self, actor: &mut Actor) {
        match self {
            Self::Name(name) => actor.name = name,
            Self::Role(role) => actor.role = role,
            Self::Cost(cost) => actor.cost = cost,
        }
    }
}
