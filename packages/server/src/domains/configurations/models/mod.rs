pub mod configuration;

pub use configuration::{Configuration, CONFIGURATION_NAME_MAX_LEN};
