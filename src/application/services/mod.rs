//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, Selector)
//! but are themselves concrete structs, not traits.

mod catalog;
mod render;

pub use catalog::{Catalog, CatalogService, LoadFailure};
pub use render::{GameView, ReferenceEntry, RenderService};
