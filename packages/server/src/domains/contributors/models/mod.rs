pub mod contributor;

pub use contributor::Contributor;
