//! Named map sources and styled layers.
//!
//! The layer set mirrors the viewer's two data sources: the pharmacies
//! point layer (drawn as circles) and the areas polygon layer (fill,
//! outline, and centroid labels). Setting a source again replaces the
//! layer's data in place and keeps its style.

use crate::data::{AreaCollection, PharmacyCollection};
use eframe::egui::Color32;

/// Paint style for point layers.
#[derive(Debug, Clone, Copy)]
pub struct CircleStyle {
    pub radius: f32,
    pub color: Color32,
    pub stroke_width: f32,
    pub stroke_color: Color32,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            radius: 8.0,
            color: Color32::from_rgb(43, 140, 190),
            stroke_width: 2.0,
            stroke_color: Color32::WHITE,
        }
    }
}

/// Paint style for polygon fills.
#[derive(Debug, Clone, Copy)]
pub struct FillStyle {
    pub color: Color32,
}

impl Default for FillStyle {
    fn default() -> Self {
        // Translucent amber so the basemap reads through
        Self {
            color: Color32::from_rgba_unmultiplied(241, 196, 15, 31),
        }
    }
}

/// Paint style for polygon outlines.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub color: Color32,
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color32::from_rgb(243, 156, 18),
            width: 2.0,
        }
    }
}

/// Paint style for area labels.
#[derive(Debug, Clone, Copy)]
pub struct LabelStyle {
    pub size: f32,
    pub color: Color32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            size: 12.0,
            color: Color32::from_rgb(235, 225, 200),
        }
    }
}

/// Point layer: the pharmacies source drawn as styled circles.
#[derive(Debug, Clone)]
pub struct PointLayer {
    pub source: PharmacyCollection,
    pub style: CircleStyle,
    pub visible: bool,
}

impl PointLayer {
    pub fn new(source: PharmacyCollection) -> Self {
        Self {
            source,
            style: CircleStyle::default(),
            visible: true,
        }
    }
}

/// Polygon layer: the areas source drawn as fill + outline + labels.
#[derive(Debug, Clone)]
pub struct AreaLayer {
    pub source: AreaCollection,
    pub fill: FillStyle,
    pub outline: LineStyle,
    pub labels: LabelStyle,
    pub visible: bool,
}

impl AreaLayer {
    pub fn new(source: AreaCollection) -> Self {
        Self {
            source,
            fill: FillStyle::default(),
            outline: LineStyle::default(),
            labels: LabelStyle::default(),
            visible: true,
        }
    }
}

/// All map layers, in draw order: areas render beneath pharmacies.
#[derive(Debug, Clone, Default)]
pub struct MapLayerSet {
    pub pharmacies: Option<PointLayer>,
    pub areas: Option<AreaLayer>,
}

impl MapLayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the pharmacies source, or updates its data if already added.
    pub fn set_pharmacies(&mut self, source: PharmacyCollection) {
        match self.pharmacies.as_mut() {
            Some(layer) => layer.source = source,
            None => self.pharmacies = Some(PointLayer::new(source)),
        }
    }

    /// Adds the areas source, or updates its data if already added.
    pub fn set_areas(&mut self, source: AreaCollection) {
        match self.areas.as_mut() {
            Some(layer) => layer.source = source,
            None => self.areas = Some(AreaLayer::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Pharmacy;
    use geo_types::Coord;

    fn one_pharmacy(name: &str) -> PharmacyCollection {
        PharmacyCollection {
            features: vec![Pharmacy {
                id: "1".to_string(),
                name: name.to_string(),
                address: String::new(),
                rating: String::new(),
                coord: Coord { x: 0.0, y: 0.0 },
            }],
        }
    }

    #[test]
    fn test_set_source_replaces_data_and_keeps_style() {
        let mut layers = MapLayerSet::new();
        layers.set_pharmacies(one_pharmacy("First"));

        // Restyle, then update the source
        layers.pharmacies.as_mut().unwrap().style.radius = 12.0;
        layers.set_pharmacies(one_pharmacy("Second"));

        let layer = layers.pharmacies.as_ref().unwrap();
        assert_eq!(layer.source.features[0].name, "Second");
        assert_eq!(layer.style.radius, 12.0);
        assert!(layer.visible);
    }
}
