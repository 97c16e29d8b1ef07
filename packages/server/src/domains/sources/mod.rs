pub mod models;

use crate::foundation::FoundationService;

// Re-export commonly used types
pub use models::Source;

pub type SourceService = FoundationService<Source>;
