pub mod contribution;

pub use contribution::Contribution;
