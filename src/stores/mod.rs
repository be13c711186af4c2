//! In-memory stores for the catalog, its reference values and sessions

mod catalog_store;
mod reference_index;
mod session_store;

pub use catalog_store::{Catalog, Selection};
pub use reference_index::ReferenceIndex;
pub use session_store::SessionStore;
