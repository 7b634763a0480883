use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type CourseId = u64;
pub type BusinessId = u64;
pub type BranchId = u64;
pub type UserId = String;

/// Ownership and membership metadata of a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Course {
    pub id: CourseId,
    pub business_id: BusinessId,
    pub branch_id: BranchId,
    #[serde(default)]
    pub instructors: BTreeSet<UserId>,
    #[serde(default)]
    pub learners: BTreeSet<UserId>,
}

impl Course {
    pub fn new(id: CourseId, business_id: BusinessId, branch_id: BranchId) -> Self {
        Self {
            id,
            business_id,
            branch_id,
            instructors: BTreeSet::new(),
            learners: BTreeSet::new(),
        }
    }

    pub fn with_instructor(mut self, user: impl Into<UserId>) -> Self {
        self.instructors.insert(user.into());
        self
    }

    pub fn with_learner(mut self, user: impl Into<UserId>) -> Self {
        self.learners.insert(user.into());
        self
    }

    pub fn has_instructor(&self, user: &str) -> bool {
        self.instructors.contains(user)
    }

    pub fn has_learner(&self, user: &str) -> bool {
        self.learners.contains(user)
    }
}
