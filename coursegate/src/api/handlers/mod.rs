pub mod authorize;
pub mod capabilities;
pub mod courses;
pub mod health;
