//! Dataset loading and feature models.
//!
//! Two static GeoJSON documents feed the viewer: the pharmacies point
//! collection and the areas polygon collection. `loader` retrieves them
//! asynchronously; `features` parses them into typed collections.

mod features;
mod loader;

pub use features::{Area, AreaCollection, AreaPolygon, LonLatBounds, Pharmacy, PharmacyCollection};
pub use loader::{DatasetKind, FetchChannel, FetchResult};
