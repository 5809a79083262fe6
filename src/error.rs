//! Error types for the demonstration runner.
//!
//! Two families exist: [`RegistryError`] is raised while the registry is
//! assembled and is fatal, [`UnitError`] is raised by a single unit and is
//! recovered by the runner.

use thiserror::Error;

use crate::value::TypeTag;

/// Problems detected while building or narrowing a registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("duplicate unit name: '{0}'")]
    DuplicateName(String),

    #[error("unit at position {position} has an empty name")]
    EmptyName { position: usize },

    #[error("unknown unit: '{name}'")]
    UnknownUnit {
        name: String,
        suggestion: Option<String>,
    },
}

impl RegistryError {
    pub fn unknown_unit(name: impl Into<String>, suggestion: Option<String>) -> Self {
        Self::UnknownUnit {
            name: name.into(),
            suggestion,
        }
    }
}

/// A failure raised by one demonstration unit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Plain value error; displays as the bare message.
    #[error("{0}")]
    Value(String),

    #[error("expected {expected}, got {actual}")]
    TypeMismatch { expected: TypeTag, actual: TypeTag },

    #[error("name '{0}' is not defined")]
    Undefined(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A value could not be inspected for a runtime type check.
    #[error("could not inspect value: {0}")]
    Inspect(String),

    #[error("panicked: {0}")]
    Panicked(String),
}

impl UnitError {
    pub fn value(message: impl Into<String>) -> Self {
        Self::Value(message.into())
    }

    pub fn mismatch(expected: TypeTag, actual: TypeTag) -> Self {
        Self::TypeMismatch { expected, actual }
    }
}

impl From<serde_json::Error> for UnitError {
    fn from(err: serde_json::Error) -> Self {
        UnitError::Inspect(err.to_string())
    }
}
