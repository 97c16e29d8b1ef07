pub mod models;

use crate::foundation::FoundationService;

pub use models::Configuration;

pub type ConfigurationService = FoundationService<Configuration>;
