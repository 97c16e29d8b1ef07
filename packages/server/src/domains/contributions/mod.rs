pub mod models;

use crate::foundation::FoundationService;

pub use models::Contribution;

pub type ContributionService = FoundationService<Contribution>;
