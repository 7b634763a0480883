use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::error::AuthorizationError;

/// Permission to edit course content and settings
pub const MANAGE_COURSES: &str = "manage_courses";
/// Permission to delete courses; instructors need it explicitly
pub const DELETE_COURSES: &str = "delete_courses";
/// Permission to create courses
pub const CREATE_COURSES: &str = "create_courses";

/// Named, independently grantable permission flag
///
/// Names are lowercase ASCII letters, digits and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(try_from = "String", into = "String")]
pub struct Capability(String);

impl Capability {
    pub fn new(name: impl Into<String>) -> Result<Self, AuthorizationError> {
        let name = name.into();
        let well_formed = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !well_formed {
            return Err(AuthorizationError::InvalidCapability(name));
        }
        Ok(Capability(name))
    }

    pub fn manage_courses() -> Self {
        Capability(MANAGE_COURSES.to_string())
    }

    pub fn delete_courses() -> Self {
        Capability(DELETE_COURSES.to_string())
    }

    pub fn create_courses() -> Self {
        Capability(CREATE_COURSES.to_string())
    }

    /// Capabilities the evaluator knows about, with a short description
    pub fn well_known() -> Vec<(Capability, &'static str)> {
        vec![
            (
                Capability::manage_courses(),
                "Edit course content and settings",
            ),
            (Capability::delete_courses(), "Delete courses"),
            (Capability::create_courses(), "Create courses"),
        ]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Capability {
    type Error = AuthorizationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Capability::new(value)
    }
}

impl From<Capability> for String {
    fn from(value: Capability) -> Self {
        value.0
    }
}

impl FromStr for Capability {
    type Err = AuthorizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::new(s)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of capabilities held by a user for one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c.as_str() == name)
    }

    /// Returns `false` if the capability was already present
    pub fn insert(&mut self, capability: Capability) -> bool {
        self.0.insert(capability)
    }

    /// Returns `false` if the capability was not present
    pub fn remove(&mut self, capability: &Capability) -> bool {
        self.0.remove(capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.0.iter()
    }

    /// Capability names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|c| c.as_str().to_string()).collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        CapabilitySet(iter.into_iter().collect())
    }
}

impl Extend<Capability> for CapabilitySet {
    fn extend<T: IntoIterator<Item = Capability>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl IntoIterator for CapabilitySet {
    type Item = Capability;
    type IntoIter = std::collections::btree_set::IntoIter<Capability>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
