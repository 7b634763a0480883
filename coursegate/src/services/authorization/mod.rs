//! Authorization service for coursegate
//!
//! Resolves who a user is (role, scope, capability grants) from the policy
//! store, resolves effective capabilities through a Casbin enforcer, and
//! hands everything to the pure evaluator in `coursegate_core`.

pub mod casbin;
pub mod config;
pub mod directory;
pub mod error;
pub mod fallback;
pub mod service;
pub mod types;


pub use directory::{CourseDirectory, IdentityProvider, PolicyStore, UserContext};
pub use error::ServiceError;
pub use service::AuthorizationService;
pub use types::{CapabilityOrWildcard, CourseConfig, CustomRoleConfig, PolicyConfig, UserConfig};
