use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::{Actor, NumericInput};

/// Highest criticality a row can be rated with.
pub const MAX_CRITICALITY: u8 = 5;

/// One feature under consideration.
///
/// `total_cost` is derived from `actors` and is only reachable through
/// accessors: every operation that touches the actor list ends with
/// [`Row::recalc_total`], so `total_cost == sum(actors[].cost)` holds
/// whenever a caller can observe the row. A serialized `total_cost` is
/// ignored on input and recomputed from the actors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RowData")]
pub struct Row {
    pub feature: String,
    pub description: String,
    pub criticality: Criticality,
    pub status: Status,
    actors: Vec<Actor>,
    total_cost: f64,
}

impl Row {
    pub fn new(feature: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Replace the actor list and recompute the total.
    pub fn with_actors(mut self, actors: Vec<Actor>) -> Self {
        self.actors = actors;
        self.recalc_total();
        self
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Recompute `total_cost` from the actor list.
    ///
    /// A sum that overflows saturates at `f64::MAX`.
    pub fn recalc_total(&mut self) {
        let sum: f64 = self
            .actors
            .iter()
            .map(|a| a.cost.value())
            .filter(|c| c.is_finite())
            .sum();
        self.total_cost = if sum.is_finite() { sum } else { f64::MAX };
    }

    /// Mutable access to the actor list for the sheet operations.
    ///
    /// Callers must finish with [`Row::recalc_total`].
    pub(crate) fn actors_mut(&mut self) -> &mut Vec<Actor> {
        &mut self.actors
    }
}

impl Default for Row {
    /// A freshly added row: empty text, criticality 0, mandatory, no actors.
    fn default() -> Self {
        Self {
            feature: String::new(),
            description: String::new(),
            criticality: Criticality::default(),
            status: Status::Mandatory,
            actors: Vec::new(),
            total_cost: 0.0,
        }
    }
}

/// Wire shape of a row. Carries no total: it is always derived.
#[derive(Deserialize)]
struct RowData {
    #[serde(default)]
    feature: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    criticality: Criticality,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    actors: Vec<Actor>,
}

impl From<RowData> for Row {
    fn from(data: RowData) -> Self {
        let mut row = Self {
            feature: data.feature,
            description: data.description,
            criticality: data.criticality,
            status: data.status,
            ..Self::default()
        };
        row.actors = data.actors;
        row.recalc_total();
        row
    }
}

/// Subjective priority rating, 0 (none) to 5 (highest).
///
/// Out-of-range values are clamped; unparseable input becomes 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Criticality(u8);

impl Criticality {
    pub fn new(value: u8) -> Self {
        Self(value.min(MAX_CRITICALITY))
    }

    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Self(0);
        }
        Self::new(value.round().min(f64::from(MAX_CRITICALITY)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Criticality {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let input = NumericInput::deserialize(deserializer)?;
        Ok(input.to_f64().map(Self::from_f64).unwrap_or_default())
    }
}

/// Whether a feature must ship or may be cut.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    #[default]
    Mandatory,
    Optional,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mandatory => "Mandatory",
            Self::Optional => "Optional",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Mandatory" => Some(Self::Mandatory),
            "Optional" => Some(Self::Optional),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-field edit on a row's scalar fields.
///
/// Actors and the total are not reachable from here: they change only through the
/// actor operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum RowField {
    Feature(String),
    Description(String),
    Criticality(Criticality),
    Status(Status),
}

impl RowField {
    pub fn apply(self, row: &mut Row) {
        match self {
            Self::Feature(feature) => row.feature = feature,
            Self::Description(description) => row.description = description,
            Self::Criticality(criticality) => row.criticality = criticality,
            Self::Status(status) => row.status = status,
        }
    }
}
