use chrono::{DateTime, Utc};
use coursegate_core::authorization::{
    BranchId, BusinessId, Capability, Course, CourseId, OrgAssignment, Role, UserId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Either a specific capability or wildcard (*)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityOrWildcard {
    Capability(Capability),
    Wildcard,
}

impl CapabilityOrWildcard {
    pub fn as_str(&self) -> &str {
        match self {
            CapabilityOrWildcard::Capability(capability) => capability.as_str(),
            CapabilityOrWildcard::Wildcard => "*",
        }
    }
}

/// Policy store loaded from `policy.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Capability catalog: name -> description
    #[serde(default)]
    pub capabilities: BTreeMap<String, String>,
    #[serde(default)]
    pub custom_roles: BTreeMap<String, CustomRoleConfig>,
    #[serde(default)]
    pub users: BTreeMap<UserId, UserConfig>,
    #[serde(default)]
    pub courses: BTreeMap<CourseId, CourseConfig>,
}

/// Named bundle of capabilities that can be assigned to users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRoleConfig {
    #[serde(with = "capability_serde")]
    pub capabilities: Vec<CapabilityOrWildcard>,
    pub description: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<BusinessId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_roles: Vec<String>,
    /// Capabilities granted to this user directly
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub capabilities: BTreeSet<Capability>,
}

impl UserConfig {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            business_id: None,
            branch_id: None,
            custom_roles: Vec::new(),
            capabilities: BTreeSet::new(),
        }
    }

    pub fn org(&self) -> OrgAssignment {
        OrgAssignment {
            business_id: self.business_id,
            branch_id: self.branch_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    pub business_id: BusinessId,
    pub branch_id: BranchId,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub instructors: BTreeSet<UserId>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub learners: BTreeSet<UserId>,
}

impl CourseConfig {
    pub fn to_course(&self, id: CourseId) -> Course {
        Course {
            id,
            business_id: self.business_id,
            branch_id: self.branch_id,
            instructors: self.instructors.clone(),
            learners: self.learners.clone(),
        }
    }
}

/// Custom serde module for capability lists that may contain "*"
pub mod capability_serde {
    use super::{Capability, CapabilityOrWildcard};
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(caps: &[CapabilityOrWildcard], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let strings: Vec<&str> = caps.iter().map(CapabilityOrWildcard::as_str).collect();
        strings.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<CapabilityOrWildcard>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings: Vec<String> = Vec::deserialize(deserializer)?;
        strings
            .into_iter()
            .map(|s| {
                if s == "*" {
                    Ok(CapabilityOrWildcard::Wildcard)
                } else {
                    Capability::new(s)
                        .map(CapabilityOrWildcard::Capability)
                        .map_err(D::Error::custom)
                }
            })
            .collect()
    }
}
