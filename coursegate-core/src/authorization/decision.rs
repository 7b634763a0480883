use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an evaluation ended the way it did
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    Permitted,
    /// The course lies outside the user's scope
    NotVisible,
    /// The role is never eligible for the action
    RoleNotPermitted,
    /// The role is eligible but a required capability was not granted
    CapabilityMissing,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::Permitted => "permitted",
            DecisionReason::NotVisible => "not_visible",
            DecisionReason::RoleNotPermitted => "role_not_permitted",
            DecisionReason::CapabilityMissing => "capability_missing",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one evaluation
///
/// `permit` is true exactly when `reason` is [`DecisionReason::Permitted`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(try_from = "DecisionWire")]
#[readonly::make]
pub struct AccessDecision {
    pub permit: bool,
    pub reason: DecisionReason,
}

impl AccessDecision {
    pub fn permit() -> Self {
        Self {
            permit: true,
            reason: DecisionReason::Permitted,
        }
    }

    /// A denial; passing `Permitted` yields a permit instead
    pub fn deny(reason: DecisionReason) -> Self {
        Self {
            permit: reason == DecisionReason::Permitted,
            reason,
        }
    }

    pub fn is_permitted(&self) -> bool {
        self.permit
    }
}

#[derive(Deserialize)]
struct DecisionWire {
    permit: bool,
    reason: DecisionReason,
}

impl TryFrom<DecisionWire> for AccessDecision {
    type Error = String;

    fn try_from(wire: DecisionWire) -> Result<Self, Self::Error> {
        let decision = AccessDecision::deny(wire.reason);
        if decision.permit != wire.permit {
            return Err(format!(
                "permit={} contradicts reason '{}'",
                wire.permit, wire.reason
            ));
        }
        Ok(decision)
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.permit {
            write!(f, "permit")
        } else {
            write!(f, "deny ({})", self.reason)
        }
    }
}
