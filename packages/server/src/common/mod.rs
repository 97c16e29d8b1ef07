// Common types shared across the foundation, kernel and domain layers

pub mod entity_ids;
pub mod id;
pub mod text;

pub use entity_ids::*;
pub use text::nullable_text;
