use super::action::Action;
use super::capability::{CapabilitySet, DELETE_COURSES, MANAGE_COURSES};
use super::course::Course;
use super::decision::{AccessDecision, DecisionReason};
use super::error::AuthorizationError;
use super::role::Role;
use super::scope::Scope;

/// Decides whether a user may perform an action on a course
///
/// Evaluation runs as an ordered list of guards: the role/scope contract,
/// then course visibility, then role eligibility for the action, then the
/// capability the action needs. The first failing guard determines the
/// result. A course outside the scope is denied before capabilities are
/// looked at, so no grant can reach an invisible course.
pub struct AuthorizationEvaluator;

impl AuthorizationEvaluator {
    pub fn evaluate(
        role: Role,
        scope: &Scope,
        capabilities: &CapabilitySet,
        action: Action,
        course: Option<&Course>,
    ) -> Result<AccessDecision, AuthorizationError> {
        if !scope.belongs_to(role) {
            return Err(AuthorizationError::ScopeMismatch {
                role,
                scope: scope.kind(),
            });
        }

        if action.requires_course() {
            let course = course.ok_or(AuthorizationError::MissingResource(action))?;
            if !scope.contains(course) {
                return Ok(AccessDecision::deny(DecisionReason::NotVisible));
            }
        }

        Ok(Self::authorize_action(role, capabilities, action))
    }

    /// Same as [`evaluate`](Self::evaluate) for callers holding role and
    /// action as free-form labels
    pub fn evaluate_labels(
        role: &str,
        scope: &Scope,
        capabilities: &CapabilitySet,
        action: &str,
        course: Option<&Course>,
    ) -> Result<AccessDecision, AuthorizationError> {
        let role: Role = role.parse()?;
        let action: Action = action.parse()?;
        Self::evaluate(role, scope, capabilities, action, course)
    }

    fn authorize_action(role: Role, capabilities: &CapabilitySet, action: Action) -> AccessDecision {
        match action {
            Action::View => AccessDecision::permit(),
            Action::Create => {
                if !role.can_author() {
                    return AccessDecision::deny(DecisionReason::RoleNotPermitted);
                }
                AccessDecision::permit()
            }
            Action::Edit => {
                if !role.can_author() {
                    return AccessDecision::deny(DecisionReason::RoleNotPermitted);
                }
                if !capabilities.contains(MANAGE_COURSES) {
                    return AccessDecision::deny(DecisionReason::CapabilityMissing);
                }
                AccessDecision::permit()
            }
            Action::Delete => {
                if role.is_administrative() {
                    return AccessDecision::permit();
                }
                if !role.can_author() {
                    return AccessDecision::deny(DecisionReason::RoleNotPermitted);
                }
                if !capabilities.contains(DELETE_COURSES) {
                    return AccessDecision::deny(DecisionReason::CapabilityMissing);
                }
                AccessDecision::permit()
            }
        }
    }
}
