pub mod checks;
pub mod settings;

pub use checks::{default_checks, load_check_configs};
pub use settings::{AppConfig, LoggingConfig, ServerConfig};
