//! HTTP handlers for the Pitchside gateway.

pub mod health;
pub mod navigation;

pub use health::{api_health, health_check};
pub use navigation::navigate;
