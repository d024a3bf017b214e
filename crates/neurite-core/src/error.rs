//! Error types shared across the workspace.
//!
//! The growth decision steps never fail; incompatibilities are rejected
//! when a behavior is attached, not discovered mid-run.

use std::error::Error;
use std::fmt;

use crate::traits::AgentKind;

/// Errors from attaching a behavior to an agent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttachError {
    /// The behavior cannot operate on this agent variant.
    IncompatibleAgent {
        /// Name of the behavior variant.
        behavior: &'static str,
        /// Variant of the target agent.
        agent: AgentKind,
    },
    /// The target handle does not name a live agent.
    UnknownAgent,
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompatibleAgent { behavior, agent } => {
                write!(f, "behavior '{behavior}' cannot be attached to a {agent}")
            }
            Self::UnknownAgent => write!(f, "unknown agent"),
        }
    }
}

impl Error for AttachError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_both_sides() {
        let e = AttachError::IncompatibleAgent {
            behavior: "grow_divide",
            agent: AgentKind::NeuriteSegment,
        };
        assert_eq!(
            e.to_string(),
            "behavior 'grow_divide' cannot be attached to a neurite segment"
        );
    }
}
