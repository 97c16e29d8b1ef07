pub mod contribution_type;

pub use contribution_type::ContributionType;
