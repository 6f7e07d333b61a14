pub mod envelope;
pub mod field;
pub mod lineage;
pub mod metadata;

pub use envelope::*;
pub use field::*;
pub use lineage::{correlated, follow, follows};
pub use metadata::*;
