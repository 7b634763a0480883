use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::course::{BranchId, BusinessId, Course, CourseId};
use super::error::AuthorizationError;
use super::role::Role;

/// Organizational placement of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgAssignment {
    #[serde(default)]
    pub business_id: Option<BusinessId>,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
}

/// Set of courses a role's visibility is restricted to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    AllCourses,
    BusinessCourses { business_id: BusinessId },
    BranchCourses { branch_id: BranchId },
    AssignedCourses { course_ids: BTreeSet<CourseId> },
    EnrolledCourses { course_ids: BTreeSet<CourseId> },
}

impl Scope {
    /// Derive the scope of `user` holding `role`
    ///
    /// Instructor and learner scopes are collected from the course
    /// memberships in `courses`; administrative scopes come from `org`.
    pub fn derive<'a>(
        role: Role,
        user: &str,
        org: &OrgAssignment,
        courses: impl IntoIterator<Item = &'a Course>,
    ) -> Result<Scope, AuthorizationError> {
        match role {
            Role::GlobalAdmin => Ok(Scope::AllCourses),
            Role::SuperAdmin => org
                .business_id
                .map(|business_id| Scope::BusinessCourses { business_id })
                .ok_or(AuthorizationError::MissingAssignment {
                    role,
                    field: "business_id",
                }),
            Role::Admin => org
                .branch_id
                .map(|branch_id| Scope::BranchCourses { branch_id })
                .ok_or(AuthorizationError::MissingAssignment {
                    role,
                    field: "branch_id",
                }),
            Role::Instructor => Ok(Scope::AssignedCourses {
                course_ids: courses
                    .into_iter()
                    .filter(|c| c.has_instructor(user))
                    .map(|c| c.id)
                    .collect(),
            }),
            Role::Learner => Ok(Scope::EnrolledCourses {
                course_ids: courses
                    .into_iter()
                    .filter(|c| c.has_learner(user))
                    .map(|c| c.id)
                    .collect(),
            }),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scope::AllCourses => "all_courses",
            Scope::BusinessCourses { .. } => "business_courses",
            Scope::BranchCourses { .. } => "branch_courses",
            Scope::AssignedCourses { .. } => "assigned_courses",
            Scope::EnrolledCourses { .. } => "enrolled_courses",
        }
    }

    /// Whether this is the kind of scope `role` is restricted to
    pub fn belongs_to(&self, role: Role) -> bool {
        matches!(
            (role, self),
            (Role::GlobalAdmin, Scope::AllCourses)
                | (Role::SuperAdmin, Scope::BusinessCourses { .. })
                | (Role::Admin, Scope::BranchCourses { .. })
                | (Role::Instructor, Scope::AssignedCourses { .. })
                | (Role::Learner, Scope::EnrolledCourses { .. })
        )
    }

    /// Bring a membership scope in line with `course`'s own instructor or
    /// learner list
    ///
    /// The course record is authoritative for its own id, so a course
    /// served by a directory other than the one the scope was derived from
    /// is judged by its actual membership. Organizational scopes are
    /// returned unchanged.
    pub fn with_course_membership(&self, user: &str, course: &Course) -> Scope {
        fn sync(mut ids: BTreeSet<CourseId>, id: CourseId, member: bool) -> BTreeSet<CourseId> {
            if member {
                ids.insert(id);
            } else {
                ids.remove(&id);
            }
            ids
        }

        match self {
            Scope::AssignedCourses { course_ids } => Scope::AssignedCourses {
                course_ids: sync(course_ids.clone(), course.id, course.has_instructor(user)),
            },
            Scope::EnrolledCourses { course_ids } => Scope::EnrolledCourses {
                course_ids: sync(course_ids.clone(), course.id, course.has_learner(user)),
            },
            other => other.clone(),
        }
    }

    /// Whether `course` is visible within this scope
    pub fn contains(&self, course: &Course) -> bool {
        match self {
            Scope::AllCourses => true,
            Scope::BusinessCourses { business_id } => course.business_id == *business_id,
            Scope::BranchCourses { branch_id } => course.branch_id == *branch_id,
            Scope::AssignedCourses { course_ids } | Scope::EnrolledCourses { course_ids } => {
                course_ids.contains(&course.id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreeset;

    fn courses() -> Vec<Course> {
        vec![
            Course::new(34, 1, 10).with_instructor("ines").with_learner("lea"),
            Course::new(35, 1, 11).with_learner("lea"),
            Course::new(36, 2, 20).with_instructor("ines"),
        ]
    }

    #[test]
    fn test_derive_membership_scopes() {
        let courses = courses();
        let org = OrgAssignment::default();

        assert_eq!(
            Scope::derive(Role::Instructor, "ines", &org, &courses).unwrap(),
            Scope::AssignedCourses {
                course_ids: btreeset! {34, 36}
            }
        );
        assert_eq!(
            Scope::derive(Role::Learner, "lea", &org, &courses).unwrap(),
            Scope::EnrolledCourses {
                course_ids: btreeset! {34, 35}
            }
        );
        assert_eq!(
            Scope::derive(Role::Learner, "nobody", &org, &courses).unwrap(),
            Scope::EnrolledCourses {
                course_ids: btreeset! {}
            }
        );
    }

    #[test]
    fn test_derive_org_scopes() {
        let org = OrgAssignment {
            business_id: Some(1),
            branch_id: Some(10),
        };
        assert_eq!(
            Scope::derive(Role::GlobalAdmin, "root", &OrgAssignment::default(), &[]).unwrap(),
            Scope::AllCourses
        );
        assert_eq!(
            Scope::derive(Role::SuperAdmin, "sam", &org, &[]).unwrap(),
            Scope::BusinessCourses { business_id: 1 }
        );
        assert_eq!(
            Scope::derive(Role::Admin, "ada", &org, &[]).unwrap(),
            Scope::BranchCourses { branch_id: 10 }
        );
    }

    #[test]
    fn test_derive_requires_org_ids() {
        let org = OrgAssignment::default();
        assert_eq!(
            Scope::derive(Role::SuperAdmin, "sam", &org, &[]),
            Err(AuthorizationError::MissingAssignment {
                role: Role::SuperAdmin,
                field: "business_id"
            })
        );
        assert_eq!(
            Scope::derive(Role::Admin, "ada", &org, &[]),
            Err(AuthorizationError::MissingAssignment {
                role: Role::Admin,
                field: "branch_id"
            })
        );
    }

    #[test]
    fn test_scope_belongs_to_exactly_one_role() {
        let scopes = vec![
            Scope::AllCourses,
            Scope::BusinessCourses { business_id: 1 },
            Scope::BranchCourses { branch_id: 1 },
            Scope::AssignedCourses {
                course_ids: btreeset! {},
            },
            Scope::EnrolledCourses {
                course_ids: btreeset! {},
            },
        ];
        for scope in &scopes {
            let owners: Vec<Role> = Role::all()
                .into_iter()
                .filter(|r| scope.belongs_to(*r))
                .collect();
            assert_eq!(owners.len(), 1, "scope {} has owners {:?}", scope.kind(), owners);
        }
    }

    #[test]
    fn test_course_membership_overrides_derived_ids() {
        let remote = Course::new(700, 1, 10).with_instructor("ines");

        let scope = Scope::AssignedCourses {
            course_ids: btreeset! {34},
        }
        .with_course_membership("ines", &remote);
        assert_eq!(
            scope,
            Scope::AssignedCourses {
                course_ids: btreeset! {34, 700}
            }
        );
        assert!(scope.contains(&remote));

        // Dropped from the course's learner list
        let scope = Scope::EnrolledCourses {
            course_ids: btreeset! {34, 700},
        }
        .with_course_membership("lea", &remote);
        assert!(!scope.contains(&remote));

        let branch = Scope::BranchCourses { branch_id: 11 };
        assert_eq!(branch.with_course_membership("ines", &remote), branch);
    }

    #[test]
    fn test_scope_contains() {
        let course = Course::new(34, 1, 10);
        assert!(Scope::AllCourses.contains(&course));
        assert!(Scope::BusinessCourses { business_id: 1 }.contains(&course));
        assert!(!Scope::BusinessCourses { business_id: 2 }.contains(&course));
        assert!(Scope::BranchCourses { branch_id: 10 }.contains(&course));
        assert!(!Scope::BranchCourses { branch_id: 11 }.contains(&course));
        assert!(Scope::AssignedCourses {
            course_ids: btreeset! {34}
        }
        .contains(&course));
        assert!(!Scope::EnrolledCourses {
            course_ids: btreeset! {35}
        }
        .contains(&course));
    }
}
