//! World-level errors.

use std::error::Error;
use std::fmt;

use neurite_core::{AgentId, AgentKind, AttachError};
use neurite_field::FieldError;

use crate::config::ConfigError;

/// Errors from constructing or mutating a [`World`](crate::World).
#[derive(Clone, Debug, PartialEq)]
pub enum WorldError {
    /// The configuration failed validation.
    Config(ConfigError),
    /// A substance grid is invalid or unstable at the configured `dt`.
    Field(FieldError),
    /// A behavior could not be attached.
    Attach(AttachError),
    /// The handle does not name a live agent.
    UnknownAgent(AgentId),
    /// The operation needs a different agent variant.
    WrongAgentKind {
        /// The agent the operation was applied to.
        agent: AgentId,
        /// The variant the operation requires.
        expected: AgentKind,
    },
    /// A direction vector has zero length or is not finite.
    InvalidDirection,
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Field(e) => write!(f, "field: {e}"),
            Self::Attach(e) => write!(f, "attach: {e}"),
            Self::UnknownAgent(id) => write!(f, "unknown agent {id:?}"),
            Self::WrongAgentKind { agent, expected } => {
                write!(f, "agent {agent:?} is not a {expected}")
            }
            Self::InvalidDirection => write!(f, "direction must be finite and non-zero"),
        }
    }
}

impl Error for WorldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Field(e) => Some(e),
            Self::Attach(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for WorldError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<FieldError> for WorldError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<AttachError> for WorldError {
    fn from(e: AttachError) -> Self {
        Self::Attach(e)
    }
}
