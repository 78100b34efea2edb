//! venvboot configuration layer
//!
//! All environment variable reads go through this module; callers use the typed
//! structs instead of calling `std::env::var` directly.
//!
//! - `loader`: env_or, env_optional, env_bool and `.env` loading
//! - `schema`: BootstrapConfig, ObservabilityConfig
//! - `env_keys`: key constants

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or, load_dotenv_from_dir, set_env_var};
pub use schema::{BootstrapConfig, CliOverrides, ObservabilityConfig};
