use thiserror::Error;

use super::action::Action;
use super::role::Role;

/// Contract violations raised while evaluating an authorization request
///
/// None of these are denials. A denial is a successful evaluation that
/// returns an [`AccessDecision`](super::AccessDecision); these errors mean
/// the caller handed the evaluator inputs it cannot reason about.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Invalid role: '{0}'")]
    InvalidRole(String),

    #[error("Course metadata is required for action '{0}'")]
    MissingResource(Action),

    #[error("Unsupported action: '{0}'")]
    UnsupportedAction(String),

    #[error("Scope '{scope}' cannot be evaluated for role '{role}'")]
    ScopeMismatch { role: Role, scope: &'static str },

    #[error("Invalid capability name: '{0}'")]
    InvalidCapability(String),

    #[error("Role '{role}' requires a {field} to derive its scope")]
    MissingAssignment { role: Role, field: &'static str },
}
