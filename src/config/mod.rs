//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → read once at startup by the dispatcher wiring and the server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload, since routes are frozen
//!   before serving starts
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DispatcherConfig, LimitsConfig, ListenerConfig, LogFormat, MessagingConfig, ObservabilityConfig,
    ServerConfig, TimeoutConfig, TransportKind,
};
pub use validation::{validate_config, ValidationError};
