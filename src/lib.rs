pub mod config;
pub mod error;
pub mod legacy;

pub use config::{AlphaConfig, Config};
pub use error::{MigrationError, ProviderConversionError, UriParseError};
pub use legacy::{LegacyConfig, Migration, MigrationWarning};
