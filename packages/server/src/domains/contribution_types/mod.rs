pub mod models;

use crate::foundation::FoundationService;

pub use models::ContributionType;

pub type ContributionTypeService = FoundationService<ContributionType>;
