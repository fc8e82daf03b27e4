pub mod settings;

pub use settings::{
    DatabaseConfig, LoggingConfig, SecurityConfig, SeedConfig, ServerConfig, Settings,
};
