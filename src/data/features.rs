//! Typed feature collections parsed from the GeoJSON datasets.
//!
//! Two documents feed the viewer: a point collection of pharmacies
//! (id/name/address/rating properties) and a polygon collection of named
//! areas. Parsing is lenient: features with unusable geometry are skipped
//! and logged, and property values are coerced to display strings.

use geo_types::Coord;
use geojson::{Feature, FeatureCollection, GeoJson, Value};
use serde_json::Value as JsonValue;

/// A single pharmacy point feature.
#[derive(Debug, Clone)]
pub struct Pharmacy {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Rating as it appeared in the source document ("" when absent).
    /// Parsed to a number only when ordering; see `state::table`.
    pub rating: String,
    /// Location as (lon, lat).
    pub coord: Coord<f64>,
}

/// One polygon of an area feature (exterior ring plus holes).
#[derive(Debug, Clone)]
pub struct AreaPolygon {
    pub exterior: Vec<Coord<f64>>,
    pub holes: Vec<Vec<Coord<f64>>>,
}

/// A named area feature. MultiPolygon features carry several polygons.
#[derive(Debug, Clone)]
pub struct Area {
    /// From the `name` property, falling back to `id`.
    pub label: Option<String>,
    pub polygons: Vec<AreaPolygon>,
}

impl Area {
    /// Label shown in popups; unnamed areas display as "Area".
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("Area")
    }
}

/// Geographic bounding box in lon/lat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLatBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl LonLatBounds {
    /// Smallest box containing the given coordinates; None when empty.
    pub fn from_coords<'a>(coords: impl Iterator<Item = &'a Coord<f64>>) -> Option<Self> {
        let mut bounds: Option<LonLatBounds> = None;
        for c in coords {
            bounds = Some(match bounds {
                None => LonLatBounds {
                    min_lon: c.x,
                    min_lat: c.y,
                    max_lon: c.x,
                    max_lat: c.y,
                },
                Some(b) => LonLatBounds {
                    min_lon: b.min_lon.min(c.x),
                    min_lat: b.min_lat.min(c.y),
                    max_lon: b.max_lon.max(c.x),
                    max_lat: b.max_lat.max(c.y),
                },
            });
        }
        bounds
    }

    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.min_lon + self.max_lon) / 2.0,
            y: (self.min_lat + self.max_lat) / 2.0,
        }
    }
}

/// Parsed pharmacies dataset.
#[derive(Debug, Clone, Default)]
pub struct PharmacyCollection {
    pub features: Vec<Pharmacy>,
}

impl PharmacyCollection {
    /// Parses a GeoJSON FeatureCollection of point features.
    pub fn from_geojson(geojson_str: &str) -> Result<Self, String> {
        let fc = parse_feature_collection(geojson_str)?;

        let mut features = Vec::with_capacity(fc.features.len());
        for feature in &fc.features {
            match convert_pharmacy(feature) {
                Some(pharmacy) => features.push(pharmacy),
                None => log::warn!("Skipping pharmacy feature without point geometry"),
            }
        }

        Ok(Self { features })
    }

    /// Bounding box of all pharmacy locations.
    pub fn bounds(&self) -> Option<LonLatBounds> {
        LonLatBounds::from_coords(self.features.iter().map(|p| &p.coord))
    }
}

/// Parsed areas dataset.
#[derive(Debug, Clone, Default)]
pub struct AreaCollection {
    pub features: Vec<Area>,
}

impl AreaCollection {
    /// Parses a GeoJSON FeatureCollection of polygon features.
    pub fn from_geojson(geojson_str: &str) -> Result<Self, String> {
        let fc = parse_feature_collection(geojson_str)?;

        let mut features = Vec::with_capacity(fc.features.len());
        for feature in &fc.features {
            match convert_area(feature) {
                Some(area) => features.push(area),
                None => log::warn!("Skipping area feature without polygon geometry"),
            }
        }

        Ok(Self { features })
    }
}

fn parse_feature_collection(geojson_str: &str) -> Result<FeatureCollection, String> {
    let geojson: GeoJson = geojson_str
        .parse()
        .map_err(|e| format!("Failed to parse GeoJSON: {}", e))?;

    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        other => Err(format!(
            "Expected a FeatureCollection, got {}",
            geojson_type_name(&other)
        )),
    }
}

fn geojson_type_name(geojson: &GeoJson) -> &'static str {
    match geojson {
        GeoJson::FeatureCollection(_) => "FeatureCollection",
        GeoJson::Feature(_) => "Feature",
        GeoJson::Geometry(_) => "Geometry",
    }
}

fn convert_pharmacy(feature: &Feature) -> Option<Pharmacy> {
    let coord = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(coords)) if coords.len() >= 2 => Coord {
            x: coords[0],
            y: coords[1],
        },
        _ => return None,
    };

    Some(Pharmacy {
        id: property_text(feature, "id"),
        name: property_text(feature, "name"),
        address: property_text(feature, "address"),
        rating: property_text(feature, "rating"),
        coord,
    })
}

fn convert_area(feature: &Feature) -> Option<Area> {
    let label = ["name", "id"].iter().find_map(|key| {
        feature
            .properties
            .as_ref()
            .and_then(|p| p.get(*key))
            .map(json_to_text)
            .filter(|s| !s.is_empty())
    });

    let polygons = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Polygon(rings)) => convert_polygon(rings).into_iter().collect(),
        Some(Value::MultiPolygon(multi)) => {
            multi.iter().filter_map(|rings| convert_polygon(rings)).collect()
        }
        _ => Vec::new(),
    };

    if polygons.is_empty() {
        return None;
    }

    Some(Area { label, polygons })
}

fn convert_polygon(rings: &[Vec<Vec<f64>>]) -> Option<AreaPolygon> {
    if rings.is_empty() {
        return None;
    }

    let exterior = convert_ring(&rings[0]);
    if exterior.len() < 3 {
        return None;
    }

    let holes = rings[1..].iter().map(|ring| convert_ring(ring)).collect();

    Some(AreaPolygon { exterior, holes })
}

fn convert_ring(ring: &[Vec<f64>]) -> Vec<Coord<f64>> {
    ring.iter()
        .filter(|c| c.len() >= 2)
        .map(|c| Coord { x: c[0], y: c[1] })
        .collect()
}

/// Reads a property as display text. Missing and null become "".
fn property_text(feature: &Feature, key: &str) -> String {
    feature
        .properties
        .as_ref()
        .and_then(|p| p.get(key))
        .map(json_to_text)
        .unwrap_or_default()
}

fn json_to_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHARMACIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-122.31, 47.65]},
                "properties": {"id": 1, "name": "Corner Drugs", "address": "100 Main St", "rating": 4.5}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-122.35, 47.61]},
                "properties": {"id": "2", "name": "Hill Pharmacy", "address": "5 Pine St", "rating": "3.9"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-122.33, 47.60]},
                "properties": {"id": 3, "name": "No Rating", "address": "9 Elm St"}
            }
        ]
    }"#;

    const AREAS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-122.4, 47.6], [-122.3, 47.6], [-122.3, 47.7], [-122.4, 47.7], [-122.4, 47.6]]]
                },
                "properties": {"name": "University District"}
            },
            {
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-122.2, 47.5], [-122.1, 47.5], [-122.1, 47.6], [-122.2, 47.5]]],
                        [[[-122.0, 47.5], [-121.9, 47.5], [-121.9, 47.6], [-122.0, 47.5]]]
                    ]
                },
                "properties": {"id": "a-17"}
            }
        ]
    }"#;

    #[test]
    fn test_parse_pharmacies() {
        let collection = PharmacyCollection::from_geojson(PHARMACIES).unwrap();
        assert_eq!(collection.features.len(), 3);

        let first = &collection.features[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.name, "Corner Drugs");
        assert_eq!(first.address, "100 Main St");
        assert_eq!(first.rating, "4.5");
        assert_eq!(first.coord, Coord { x: -122.31, y: 47.65 });

        // String-typed rating is kept as-is
        assert_eq!(collection.features[1].rating, "3.9");

        // Missing rating becomes empty display text
        assert_eq!(collection.features[2].rating, "");
    }

    #[test]
    fn test_parse_areas() {
        let collection = AreaCollection::from_geojson(AREAS).unwrap();
        assert_eq!(collection.features.len(), 2);

        let first = &collection.features[0];
        assert_eq!(first.display_label(), "University District");
        assert_eq!(first.polygons.len(), 1);
        assert_eq!(first.polygons[0].exterior.len(), 5);
        assert!(first.polygons[0].holes.is_empty());

        // Label falls back to the id property, MultiPolygon splits out
        let second = &collection.features[1];
        assert_eq!(second.display_label(), "a-17");
        assert_eq!(second.polygons.len(), 2);
    }

    #[test]
    fn test_unnamed_area_falls_back_to_generic_label() {
        let area = Area {
            label: None,
            polygons: Vec::new(),
        };
        assert_eq!(area.display_label(), "Area");
    }

    #[test]
    fn test_features_without_geometry_are_skipped() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null, "properties": {"id": 1}},
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [-122.0, 47.0]},
                    "properties": {"id": 2, "name": "Kept", "address": "", "rating": 5}
                }
            ]
        }"#;

        let collection = PharmacyCollection::from_geojson(doc).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.features[0].id, "2");
    }

    #[test]
    fn test_non_collection_document_is_an_error() {
        let err = PharmacyCollection::from_geojson(
            r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#,
        )
        .unwrap_err();
        assert!(err.contains("FeatureCollection"));
    }

    #[test]
    fn test_bounds_cover_all_points() {
        let collection = PharmacyCollection::from_geojson(PHARMACIES).unwrap();
        let bounds = collection.bounds().unwrap();
        assert_eq!(bounds.min_lon, -122.35);
        assert_eq!(bounds.max_lon, -122.31);
        assert_eq!(bounds.min_lat, 47.60);
        assert_eq!(bounds.max_lat, 47.65);

        let center = bounds.center();
        assert!((center.x - -122.33).abs() < 1e-9);
        assert!((center.y - 47.625).abs() < 1e-9);
    }

    #[test]
    fn test_empty_collection_has_no_bounds() {
        let collection = PharmacyCollection::default();
        assert!(collection.bounds().is_none());
    }
}
