//! Storage backends behind the [`store::BlogStore`] seam.

pub mod memory_store;
pub mod sqlite_store;
pub mod store;
