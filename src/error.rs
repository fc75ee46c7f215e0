//! Errors raised while fixing up, validating and compiling the dogma graph.
//!
//! Both kinds abort the build. There is no degraded output.

use std::fmt;
use thiserror::Error;

use crate::model::EntityKind;

/// How a missing entity was looked up
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKey {
    Id(i32),
    Name(String),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Id(id) => write!(f, "#{}", id),
            EntityKey::Name(name) => write!(f, "{:?}", name),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    /// An assumption about the shape or content of the graph does not hold.
    #[error("precondition violated: {message}")]
    PreconditionViolation { message: String },

    /// A lookup by id or name found nothing.
    #[error("referential integrity: {kind} {key} not found")]
    ReferentialIntegrity { kind: EntityKind, key: EntityKey },
}

impl DataError {
    pub fn precondition(message: impl Into<String>) -> Self {
        DataError::PreconditionViolation {
            message: message.into(),
        }
    }

    pub fn missing_id(kind: EntityKind, id: i32) -> Self {
        DataError::ReferentialIntegrity {
            kind,
            key: EntityKey::Id(id),
        }
    }

    pub fn missing_name(kind: EntityKind, name: &str) -> Self {
        DataError::ReferentialIntegrity {
            kind,
            key: EntityKey::Name(name.to_string()),
        }
    }

    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, DataError::PreconditionViolation { .. })
    }
}

pub type DataResult<T> = Result<T, DataError>;

/// Return early with a [`DataError::PreconditionViolation`] unless the condition holds.
#[macro_export]
macro_rules! precondition {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::DataError::precondition(format!($($arg)+)));
        }
    };
}
