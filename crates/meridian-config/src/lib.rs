//! Typed layered configuration for the Meridian backend.
//!
//! Configuration is assembled in layers, later layers overriding earlier
//! ones: built-in defaults, an optional TOML file, then environment
//! variables in the `MERIDIAN__SECTION__FIELD` form. The result is
//! validated before use.
//!
//! ```no_run
//! use meridian_config::{ConfigLoader, ENV_PREFIX};
//!
//! # fn main() -> Result<(), meridian_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()
//!     .with_optional_file("meridian.toml")?
//!     .with_env_prefix(ENV_PREFIX)
//!     .load()?;
//! println!("serving on {}", config.server.rpc_addr);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod schema;

pub use config::MeridianConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, ENV_PREFIX};
pub use schema::{
    AuthConfig, LogFormat, LoggingSection, MetricsSection, RateLimitConfig, RevocationConfig,
    ServerConfig, TelemetrySection, TracingSection,
};
