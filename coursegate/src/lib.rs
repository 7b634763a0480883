//! coursegate library
//!
//! Exposes the authorization service and router creation for the binary and
//! for integration tests.

pub mod api;
pub mod app_state;
pub mod http;
pub mod init_telemetry;
pub mod services;
pub mod settings;
pub mod stop_flag;

pub use app_state::AppState;
