//! Application layer for the Story Catalog.

pub mod loader;
