//! Map projection and coordinate transformation.
//!
//! Converts between geographic coordinates (lon/lat) and screen
//! coordinates for rendering and hit-testing on the canvas.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;

/// Lon/lat span visible at zoom 1.0, in degrees. Sized for a city
/// district rather than a whole region.
pub const BASE_RANGE_DEG: f64 = 0.05;

/// Map projection for converting geographic to screen coordinates.
///
/// Uses a simple equirectangular projection with a cosine latitude
/// correction, adequate for city-scale extents.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Center of the view as (lon, lat)
    pub center: Coord<f64>,
    /// Current zoom level
    pub zoom: f32,
    /// Pan offset in screen pixels
    pub pan_offset: Vec2,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl MapProjection {
    pub fn new(center: Coord<f64>, zoom: f32, pan_offset: Vec2, screen_rect: Rect) -> Self {
        Self {
            center,
            zoom,
            pan_offset,
            screen_rect,
        }
    }

    /// Lon/lat degrees spanned by half the canvas at the current zoom.
    fn effective_range(&self) -> f64 {
        BASE_RANGE_DEG / self.zoom.max(0.001) as f64
    }

    /// Cosine shrink factor applied to longitudes at the view latitude.
    fn lat_correction(&self) -> f64 {
        self.center.y.to_radians().cos().max(0.01)
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let range = self.effective_range();

        let rel_lon = (coord.x - self.center.x) * self.lat_correction();
        let rel_lat = coord.y - self.center.y;

        // Screen Y grows downward, latitude grows upward
        let norm_x = rel_lon / range;
        let norm_y = -rel_lat / range;

        let center = self.screen_rect.center() + self.pan_offset;
        let half_size = self.screen_rect.size().min_elem() / 2.0;

        Pos2::new(
            center.x + (norm_x as f32) * half_size,
            center.y + (norm_y as f32) * half_size,
        )
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let range = self.effective_range();

        let center = self.screen_rect.center() + self.pan_offset;
        let half_size = self.screen_rect.size().min_elem() / 2.0;

        let norm_x = (pos.x - center.x) / half_size;
        let norm_y = (pos.y - center.y) / half_size;

        Coord {
            x: self.center.x + (norm_x as f64) * range / self.lat_correction(),
            y: self.center.y - (norm_y as f64) * range,
        }
    }

    /// Returns the visible geographic bounds as (min_lon, min_lat, max_lon, max_lat).
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let top_left = self.screen_to_geo(self.screen_rect.left_top());
        let bottom_right = self.screen_to_geo(self.screen_rect.right_bottom());

        (
            top_left.x.min(bottom_right.x),
            top_left.y.min(bottom_right.y),
            top_left.x.max(bottom_right.x),
            top_left.y.max(bottom_right.y),
        )
    }

    /// Checks if a coordinate is within the visible bounds (with margin).
    pub fn is_visible(&self, coord: Coord<f64>, margin_deg: f64) -> bool {
        let (min_lon, min_lat, max_lon, max_lat) = self.visible_bounds();
        coord.x >= min_lon - margin_deg
            && coord.x <= max_lon + margin_deg
            && coord.y >= min_lat - margin_deg
            && coord.y <= max_lat + margin_deg
    }

    /// Checks if a bounding box intersects the visible bounds.
    pub fn bbox_visible(&self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> bool {
        let (vis_min_lon, vis_min_lat, vis_max_lon, vis_max_lat) = self.visible_bounds();

        let margin = BASE_RANGE_DEG;
        !(max_lon < vis_min_lon - margin
            || min_lon > vis_max_lon + margin
            || max_lat < vis_min_lat - margin
            || min_lat > vis_max_lat + margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_projection() -> MapProjection {
        MapProjection::new(
            Coord {
                x: -122.3137,
                y: 47.6561,
            },
            1.0,
            Vec2::ZERO,
            Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        )
    }

    #[test]
    fn test_center_projects_to_screen_center() {
        let projection = test_projection();
        let pos = projection.geo_to_screen(projection.center);
        assert!((pos.x - 400.0).abs() < 0.001);
        assert!((pos.y - 300.0).abs() < 0.001);
    }

    #[test]
    fn test_round_trip() {
        let projection = test_projection();
        let coord = Coord {
            x: -122.30,
            y: 47.66,
        };
        let back = projection.screen_to_geo(projection.geo_to_screen(coord));
        assert!((back.x - coord.x).abs() < 1e-6);
        assert!((back.y - coord.y).abs() < 1e-6);
    }

    #[test]
    fn test_north_is_up() {
        let projection = test_projection();
        let north = projection.geo_to_screen(Coord {
            x: projection.center.x,
            y: projection.center.y + 0.01,
        });
        assert!(north.y < 300.0);
    }

    #[test]
    fn test_zoom_scales_offsets() {
        let mut projection = test_projection();
        let coord = Coord {
            x: -122.30,
            y: 47.6561,
        };
        let at_1x = projection.geo_to_screen(coord).x - 400.0;
        projection.zoom = 2.0;
        let at_2x = projection.geo_to_screen(coord).x - 400.0;
        assert!((at_2x - at_1x * 2.0).abs() < 0.001);
    }

    #[test]
    fn test_visible_bounds_contain_center() {
        let projection = test_projection();
        let (min_lon, min_lat, max_lon, max_lat) = projection.visible_bounds();
        assert!(min_lon < projection.center.x && projection.center.x < max_lon);
        assert!(min_lat < projection.center.y && projection.center.y < max_lat);
        assert!(projection.is_visible(projection.center, 0.0));
    }
}
