pub mod models;

use crate::foundation::FoundationService;

pub use models::Repository;

pub type RepositoryService = FoundationService<Repository>;
