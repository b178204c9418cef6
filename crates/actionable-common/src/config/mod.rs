//! Configuration structs

mod actionable;
mod app_config;

pub use actionable::ActionableSettings;
pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    RateLimitConfig, RedisConfig, ServerConfig,
};
