//! View state: map center, zoom, pan offset, and the fly-to animation.

use crate::data::LonLatBounds;
use crate::geo::BASE_RANGE_DEG;
use eframe::egui::Vec2;
use geo_types::Coord;
use std::time::Duration;
use web_time::Instant;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;

/// Zoom used when flying to a single feature (a table row or popup
/// target), a step past the default overview.
pub const POI_ZOOM: f32 = 4.0;

/// Fit-to-bounds never zooms in past this, so a tight cluster of points
/// still shows surrounding context.
const FIT_MAX_ZOOM: f32 = 6.0;

/// Padding factor applied around fitted bounds.
const FIT_PADDING: f64 = 1.25;

const FLY_DURATION: Duration = Duration::from_millis(900);

/// An in-flight camera animation.
#[derive(Debug, Clone)]
struct FlyTo {
    from_center: Coord<f64>,
    to_center: Coord<f64>,
    from_zoom: f32,
    to_zoom: f32,
    from_pan: Vec2,
    started: Instant,
}

/// Camera state for the map canvas. Owned by `AppState` and handed to
/// the projection each frame; nothing here is global.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// View center as (lon, lat)
    pub center: Coord<f64>,
    /// Current zoom level (1.0 = city-district overview)
    pub zoom: f32,
    /// Pan offset in screen pixels
    pub pan_offset: Vec2,
    fly: Option<FlyTo>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            // University District, Seattle
            center: Coord {
                x: -122.3137,
                y: 47.6561,
            },
            zoom: 1.0,
            pan_offset: Vec2::ZERO,
            fly: None,
        }
    }
}

impl ViewState {
    /// Starts an eased pan/zoom toward the target. Any pan offset is
    /// animated back to zero so the target ends up centered.
    pub fn fly_to(&mut self, target: Coord<f64>, target_zoom: f32) {
        self.fly = Some(FlyTo {
            from_center: self.center,
            to_center: target,
            from_zoom: self.zoom,
            to_zoom: target_zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            from_pan: self.pan_offset,
            started: Instant::now(),
        });
    }

    /// Recenters and rescales instantly so the bounds fit the view.
    /// Used once the point dataset arrives.
    pub fn fit_bounds(&mut self, bounds: &LonLatBounds) {
        self.center = bounds.center();
        self.zoom = zoom_for_bounds(bounds);
        self.pan_offset = Vec2::ZERO;
        self.fly = None;
    }

    /// Cancels any in-flight animation, keeping the current camera.
    /// Called when the user grabs the map mid-flight.
    pub fn interrupt_fly(&mut self) {
        self.fly = None;
    }

    #[allow(dead_code)] // Exercised by tests
    pub fn is_flying(&self) -> bool {
        self.fly.is_some()
    }

    /// Advances the fly-to animation. Returns true while animating, so
    /// the caller keeps requesting repaints.
    pub fn tick(&mut self) -> bool {
        let Some(fly) = self.fly.as_ref() else {
            return false;
        };

        let t = fly.started.elapsed().as_secs_f32() / FLY_DURATION.as_secs_f32();
        if t >= 1.0 {
            self.center = fly.to_center;
            self.zoom = fly.to_zoom;
            self.pan_offset = Vec2::ZERO;
            self.fly = None;
            return false;
        }

        let s = ease(t) as f64;
        self.center = Coord {
            x: fly.from_center.x + (fly.to_center.x - fly.from_center.x) * s,
            y: fly.from_center.y + (fly.to_center.y - fly.from_center.y) * s,
        };
        self.zoom = fly.from_zoom + (fly.to_zoom - fly.from_zoom) * s as f32;
        self.pan_offset = fly.from_pan * (1.0 - s as f32);
        true
    }
}

/// Smoothstep ease: zero slope at both ends.
fn ease(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Zoom at which the given bounds (plus padding) fit the canvas.
pub fn zoom_for_bounds(bounds: &LonLatBounds) -> f32 {
    let lat_correction = bounds.center().y.to_radians().cos().max(0.01);
    let half_lon = (bounds.max_lon - bounds.min_lon) * lat_correction / 2.0;
    let half_lat = (bounds.max_lat - bounds.min_lat) / 2.0;
    let needed_range = half_lon.max(half_lat) * FIT_PADDING;

    if needed_range <= f64::EPSILON {
        // Single point (or degenerate box): cap instead of zooming forever
        return FIT_MAX_ZOOM;
    }

    ((BASE_RANGE_DEG / needed_range) as f32).clamp(MIN_ZOOM, FIT_MAX_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> LonLatBounds {
        LonLatBounds {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(1.0), 1.0);
        assert!(ease(0.5) > 0.4 && ease(0.5) < 0.6);
        // Clamped outside [0, 1]
        assert_eq!(ease(-1.0), 0.0);
        assert_eq!(ease(2.0), 1.0);
    }

    #[test]
    fn test_zoom_for_bounds_shrinks_with_span() {
        let tight = zoom_for_bounds(&bounds(-122.32, 47.65, -122.31, 47.66));
        let wide = zoom_for_bounds(&bounds(-122.5, 47.4, -122.0, 47.9));
        assert!(tight > wide);
        assert!(wide >= MIN_ZOOM);
    }

    #[test]
    fn test_zoom_for_degenerate_bounds_is_capped() {
        let z = zoom_for_bounds(&bounds(-122.3, 47.6, -122.3, 47.6));
        assert_eq!(z, FIT_MAX_ZOOM);
    }

    #[test]
    fn test_fit_bounds_centers_view() {
        let mut view = ViewState::default();
        view.pan_offset = Vec2::new(40.0, -20.0);
        view.fit_bounds(&bounds(-122.4, 47.5, -122.2, 47.7));

        assert!((view.center.x - -122.3).abs() < 1e-9);
        assert!((view.center.y - 47.6).abs() < 1e-9);
        assert_eq!(view.pan_offset, Vec2::ZERO);
        assert!(!view.is_flying());
    }

    #[test]
    fn test_fly_to_animates_toward_target() {
        let mut view = ViewState::default();
        let start_center = view.center;
        let target = Coord {
            x: start_center.x + 0.1,
            y: start_center.y + 0.1,
        };

        view.fly_to(target, POI_ZOOM);
        assert!(view.is_flying());

        // A tick right after the start stays between start and target
        let animating = view.tick();
        assert!(animating);
        assert!(view.center.x >= start_center.x && view.center.x <= target.x);
        assert!(view.center.y >= start_center.y && view.center.y <= target.y);

        // Interrupting freezes the camera where it is
        view.interrupt_fly();
        assert!(!view.is_flying());
        assert!(!view.tick());
    }
}
