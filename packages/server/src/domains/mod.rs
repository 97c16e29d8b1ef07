// Tracked entities, one foundation service each
pub mod configurations;
pub mod contribution_types;
pub mod contributions;
pub mod contributors;
pub mod repositories;
pub mod sources;
