use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::AuthorizationError;

/// Coarse-grained identity classification of a user
///
/// Roles are ordered by the breadth of their scope, `GlobalAdmin` being the
/// widest and `Learner` the narrowest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    GlobalAdmin,
    SuperAdmin,
    Admin,
    Instructor,
    Learner,
}

impl Role {
    /// All roles, widest first
    pub fn all() -> Vec<Role> {
        vec![
            Role::GlobalAdmin,
            Role::SuperAdmin,
            Role::Admin,
            Role::Instructor,
            Role::Learner,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::GlobalAdmin => "global_admin",
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Instructor => "instructor",
            Role::Learner => "learner",
        }
    }

    /// Rank of the role's scope breadth; higher means wider
    pub fn breadth(&self) -> u8 {
        match self {
            Role::GlobalAdmin => 4,
            Role::SuperAdmin => 3,
            Role::Admin => 2,
            Role::Instructor => 1,
            Role::Learner => 0,
        }
    }

    /// Roles that manage courses for their organization unit and may delete
    /// visible courses without an explicit capability grant
    pub fn is_administrative(&self) -> bool {
        matches!(self, Role::GlobalAdmin | Role::SuperAdmin | Role::Admin)
    }

    /// Roles eligible to create and edit course content
    pub fn can_author(&self) -> bool {
        !matches!(self, Role::Learner)
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        self.breadth().cmp(&other.breadth())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthorizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "global_admin" => Ok(Role::GlobalAdmin),
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "instructor" => Ok(Role::Instructor),
            "learner" => Ok(Role::Learner),
            _ => Err(AuthorizationError::InvalidRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_are_ordered_by_breadth() {
        let mut roles = Role::all();
        roles.sort();
        assert_eq!(
            roles,
            vec![
                Role::Learner,
                Role::Instructor,
                Role::Admin,
                Role::SuperAdmin,
                Role::GlobalAdmin
            ]
        );
        assert!(Role::GlobalAdmin > Role::SuperAdmin);
    }

    #[test]
    fn test_parse_role_labels() {
        assert_eq!("global_admin".parse::<Role>().unwrap(), Role::GlobalAdmin);
        assert_eq!("Super-Admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!(" learner ".parse::<Role>().unwrap(), Role::Learner);
        assert_eq!(
            "tutor".parse::<Role>(),
            Err(AuthorizationError::InvalidRole("tutor".to_string()))
        );
    }

    #[test]
    fn test_administrative_roles() {
        let administrative: Vec<Role> = Role::all()
            .into_iter()
            .filter(Role::is_administrative)
            .collect();
        assert_eq!(
            administrative,
            vec![Role::GlobalAdmin, Role::SuperAdmin, Role::Admin]
        );
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&Role::GlobalAdmin).unwrap();
        assert_eq!(json, "\"global_admin\"");
        for role in Role::all() {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }
}
