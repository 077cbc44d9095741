//! Domain layer for the Story Catalog.

pub mod catalog;
pub mod profile;
