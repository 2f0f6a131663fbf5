//! Sea-ORM entities for the catalog tables.

pub mod product;
pub mod sync_history;
