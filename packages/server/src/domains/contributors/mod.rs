pub mod models;

use crate::foundation::FoundationService;

pub use models::Contributor;

pub type ContributorService = FoundationService<Contributor>;
