//! Map layer system: projection, named sources/styles, and rendering.
//!
//! This is the viewer's rendering surface. Layers hold the two data
//! sources (pharmacies, areas) with their paint styles; the renderer
//! draws them through the projection and resolves pointer hits.

mod layer;
mod projection;
mod renderer;

pub use layer::{AreaLayer, CircleStyle, FillStyle, LabelStyle, LineStyle, MapLayerSet, PointLayer};
pub use projection::{MapProjection, BASE_RANGE_DEG};
pub use renderer::{hit_test, polygon_contains, render_map_layers, HitTarget};
