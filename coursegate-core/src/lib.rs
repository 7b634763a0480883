pub mod authorization;
pub mod settings;
