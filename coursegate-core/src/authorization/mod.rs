//! Course authorization model for coursegate
//!
//! A decision is computed from four inputs: the user's [`Role`], the
//! [`Scope`] derived from that role and the user's organizational
//! assignment, the user's [`CapabilitySet`], and the requested [`Action`]
//! on a [`Course`]. [`AuthorizationEvaluator::evaluate`] is a pure function
//! over those inputs; resolving them is left to the caller.

pub mod action;
pub mod capability;
pub mod course;
pub mod decision;
pub mod error;
pub mod evaluator;
pub mod role;
pub mod scope;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use capability::{Capability, CapabilitySet};
pub use course::{BranchId, BusinessId, Course, CourseId, UserId};
pub use decision::{AccessDecision, DecisionReason};
pub use error::AuthorizationError;
pub use evaluator::AuthorizationEvaluator;
pub use role::Role;
pub use scope::{OrgAssignment, Scope};
