pub use gateway_config::{BackendConfig, CorsConfig, GatewayConfig, ServerConfig, SessionConfig};

mod gateway_config;
