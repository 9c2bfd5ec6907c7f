//! Selector query language.
//!
//! A selector names one or more entity types and optional field constraints:
//!
//! ```text
//! Property                      every property tile
//! Property[group=France]        properties in the France group
//! Player[balance>=1500]         players holding at least 1500
//! Player[data.character.color=red, position<10]
//! ```
//!
//! Field paths are dotted; the first segment names a field of the entity's
//! type and the rest indexes into nested data. When both sides of a
//! constraint parse as numbers the comparison is numeric, otherwise only
//! `=`, `==` and `!=` apply and compare the textual values.
mod eval;
mod parse;

use std::collections::BTreeMap;
use std::fmt;

use strum::{AsRefStr, Display, EnumString};

use crate::error::{ErrorSeverity, GameError};

pub use eval::{Metric, cyclic_distance, forward_distance, nearest};
pub(crate) use eval::stringify;

/// Comparison operator of a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
pub enum Op {
    #[strum(serialize = "=")]
    Eq,
    #[strum(serialize = "==")]
    EqEq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
}

impl Op {
    /// Whether the operator is defined for non-numeric operands.
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::EqEq | Self::Ne)
    }
}

/// Field path to `(operator, literal)` constraints of one type.
pub type Constraints = BTreeMap<String, (Op, String)>;

/// A parsed selector: type names mapped to their constraints.
///
/// `None` constraints match every entity of the type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    types: BTreeMap<String, Option<Constraints>>,
}

impl Selector {
    /// Parses a single `TypeName[field op value, ...]...` selector.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let (name, constraints) = parse::parse(input)?;
        let mut types = BTreeMap::new();
        types.insert(name, constraints);
        Ok(Self { types })
    }

    /// Parses several selectors and unions them.
    pub fn parse_all<'a>(inputs: impl IntoIterator<Item = &'a str>) -> Result<Self, SelectorError> {
        inputs
            .into_iter()
            .try_fold(Self::default(), |acc, input| Ok(acc.union(Self::parse(input)?)))
    }

    /// Unions two selectors. A type present in both keeps `other`'s constraints.
    pub fn union(mut self, other: Self) -> Self {
        self.types.extend(other.types);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The constraints attached to `type_name`, if the selector names it.
    pub fn constraints(&self, type_name: &str) -> Option<&Option<Constraints>> {
        self.types.get(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.types.keys().map(String::as_str)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, constraints) in &self.types {
            if !first {
                write!(f, " ")?;
            }
            first = false;

            write!(f, "{name}")?;
            if let Some(constraints) = constraints {
                let parts: Vec<_> = constraints
                    .iter()
                    .map(|(path, (op, value))| format!("{path}{op}{value}"))
                    .collect();
                write!(f, "[{}]", parts.join(", "))?;
            }
        }
        Ok(())
    }
}

/// Malformed selector text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("selector {input:?} has no type name")]
    MissingType { input: String },

    #[error("selector {input:?} has an unclosed '['")]
    Unclosed { input: String },

    #[error("unexpected {found:?} after constraints in selector {input:?}")]
    Trailing { input: String, found: String },

    #[error("constraint {constraint:?} has no comparison operator")]
    MissingOperator { constraint: String },

    #[error("unknown comparison operator {op:?}")]
    UnknownOperator { op: String },

    #[error("constraint {constraint:?} has no field")]
    MissingField { constraint: String },
}

impl GameError for SelectorError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingType { .. } => "SELECTOR_MISSING_TYPE",
            Self::Unclosed { .. } => "SELECTOR_UNCLOSED",
            Self::Trailing { .. } => "SELECTOR_TRAILING",
            Self::MissingOperator { .. } => "SELECTOR_MISSING_OPERATOR",
            Self::UnknownOperator { .. } => "SELECTOR_UNKNOWN_OPERATOR",
            Self::MissingField { .. } => "SELECTOR_MISSING_FIELD",
        }
    }
}
